//! Multinomial Naive Bayes over non-negative feature rows.

use serde::{Deserialize, Serialize};

/// Laplace smoothing constant used when fitting.
const ALPHA: f64 = 1.0;

/// Multinomial-event-model classifier.
///
/// Stores log priors and per-class feature log probabilities; prediction is
/// a dot product per class followed by log-sum-exp normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    /// Log prior per class, indexed by class id.
    class_log_prior: Vec<f64>,
    /// Feature log probabilities, one row of `n_features` per class.
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    /// Fit the classifier from feature rows and their class ids.
    pub fn fit(rows: &[Vec<f64>], labels: &[usize], n_classes: usize) -> Result<Self, String> {
        if rows.is_empty() {
            return Err("Empty training set".to_string());
        }
        if rows.len() != labels.len() {
            return Err("Mismatched training inputs/labels".to_string());
        }
        if n_classes == 0 {
            return Err("No classes available for training".to_string());
        }
        let n_features = rows[0].len();
        for row in rows {
            if row.len() != n_features {
                return Err("Inconsistent feature row length".to_string());
            }
        }
        for &label in labels {
            if label >= n_classes {
                return Err(format!(
                    "Label {label} out of range for {n_classes} classes"
                ));
            }
        }

        let mut class_counts = vec![0usize; n_classes];
        let mut feature_totals = vec![vec![0.0f64; n_features]; n_classes];
        for (row, &label) in rows.iter().zip(labels) {
            class_counts[label] += 1;
            for (idx, &value) in row.iter().enumerate() {
                feature_totals[label][idx] += value;
            }
        }

        let n_samples = rows.len() as f64;
        let mut class_log_prior = Vec::with_capacity(n_classes);
        let mut feature_log_prob = Vec::with_capacity(n_classes);
        for class in 0..n_classes {
            if class_counts[class] == 0 {
                return Err(format!("Class {class} has no training samples"));
            }
            class_log_prior.push((class_counts[class] as f64 / n_samples).ln());
            let total: f64 = feature_totals[class].iter().sum();
            let denominator = total + ALPHA * n_features as f64;
            feature_log_prob.push(
                feature_totals[class]
                    .iter()
                    .map(|&count| ((count + ALPHA) / denominator).ln())
                    .collect(),
            );
        }

        Ok(Self {
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Number of classes this model was fitted on.
    pub fn n_classes(&self) -> usize {
        self.class_log_prior.len()
    }

    /// Compute normalized class probabilities for a feature row.
    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, String> {
        let n_classes = self.n_classes();
        if n_classes == 0 {
            return Err("Classifier has not been fitted".to_string());
        }
        let mut joint = Vec::with_capacity(n_classes);
        for class in 0..n_classes {
            let log_prob = &self.feature_log_prob[class];
            if row.len() != log_prob.len() {
                return Err(format!(
                    "Feature row has {} values, expected {}",
                    row.len(),
                    log_prob.len()
                ));
            }
            let likelihood: f64 = row
                .iter()
                .zip(log_prob)
                .map(|(&value, &logp)| value * logp)
                .sum();
            joint.push(self.class_log_prior[class] + likelihood);
        }

        let max = joint.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut proba: Vec<f64> = joint.iter().map(|&l| (l - max).exp()).collect();
        let total: f64 = proba.iter().sum();
        for p in &mut proba {
            *p /= total;
        }
        Ok(proba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_model() -> MultinomialNb {
        // Class 0 leans on feature 0, class 1 on feature 1.
        let rows = vec![
            vec![3.0, 0.0],
            vec![2.0, 1.0],
            vec![0.0, 3.0],
            vec![1.0, 2.0],
        ];
        let labels = vec![0, 0, 1, 1];
        MultinomialNb::fit(&rows, &labels, 2).unwrap()
    }

    #[test]
    fn probabilities_sum_to_one() {
        let model = toy_model();
        let proba = model.predict_proba(&[1.0, 1.0]).unwrap();
        let sum: f64 = proba.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn favors_the_dominant_feature_class() {
        let model = toy_model();
        let proba = model.predict_proba(&[4.0, 0.0]).unwrap();
        assert!(proba[0] > proba[1]);
        let proba = model.predict_proba(&[0.0, 4.0]).unwrap();
        assert!(proba[1] > proba[0]);
    }

    #[test]
    fn zero_row_falls_back_to_priors() {
        let rows = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        let labels = vec![0, 0, 1];
        let model = MultinomialNb::fit(&rows, &labels, 2).unwrap();
        let proba = model.predict_proba(&[0.0, 0.0]).unwrap();
        assert!((proba[0] - 2.0 / 3.0).abs() < 1e-9);
        assert!((proba[1] - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn fit_rejects_label_out_of_range() {
        let err = MultinomialNb::fit(&[vec![1.0]], &[2], 2).unwrap_err();
        assert!(err.contains("out of range"));
    }

    #[test]
    fn fit_rejects_mismatched_rows() {
        let err = MultinomialNb::fit(&[vec![1.0], vec![1.0]], &[0], 1).unwrap_err();
        assert!(err.contains("Mismatched"));
    }
}
