//! Two-stage sentiment pipeline: TF-IDF vectorizer feeding a Naive Bayes
//! classifier, trained on a small fixed example set.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::naive_bayes::MultinomialNb;
use super::tfidf::TfidfVectorizer;

/// Vocabulary cap for the vectorization stage.
pub const MAX_FEATURES: usize = 100;

/// Fixed training examples: (text, label).
pub const TRAINING_EXAMPLES: &[(&str, &str)] = &[
    ("Me encanta este producto, es excelente", "positivo"),
    ("Muy buena calidad, lo recomiendo", "positivo"),
    ("Fantástico servicio al cliente", "positivo"),
    ("Terrible experiencia, no lo recomiendo", "negativo"),
    ("Muy mala calidad, decepcionante", "negativo"),
    ("Pésimo servicio, nunca más", "negativo"),
    ("Es aceptable, nada especial", "neutral"),
    ("Cumple su función básica", "neutral"),
];

/// Per-request prediction output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// The winning class label.
    pub prediction: String,
    /// Probability of the winning class.
    pub confidence: f64,
    /// Probability per known class; values sum to 1.
    pub probabilities: BTreeMap<String, f64>,
}

/// Fitted vectorizer + classifier pair with its class list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentPipeline {
    /// Class labels in index order (sorted at fit time).
    classes: Vec<String>,
    vectorizer: TfidfVectorizer,
    classifier: MultinomialNb,
}

impl SentimentPipeline {
    /// Train the pipeline on the fixed example set.
    pub fn train() -> Result<Self, String> {
        Self::fit(TRAINING_EXAMPLES)
    }

    /// Fit both stages over arbitrary (text, label) pairs.
    pub fn fit(examples: &[(&str, &str)]) -> Result<Self, String> {
        if examples.is_empty() {
            return Err("Empty training set".to_string());
        }

        let class_set: BTreeSet<&str> = examples.iter().map(|(_, label)| *label).collect();
        let classes: Vec<String> = class_set.iter().map(|label| label.to_string()).collect();

        let texts: Vec<&str> = examples.iter().map(|(text, _)| *text).collect();
        let mut vectorizer = TfidfVectorizer::new(MAX_FEATURES);
        vectorizer.fit(&texts)?;

        let mut rows = Vec::with_capacity(examples.len());
        let mut labels = Vec::with_capacity(examples.len());
        for (text, label) in examples {
            rows.push(vectorizer.transform(text)?);
            let class_idx = classes
                .iter()
                .position(|known| known == label)
                .ok_or_else(|| format!("Unknown label {label}"))?;
            labels.push(class_idx);
        }
        let classifier = MultinomialNb::fit(&rows, &labels, classes.len())?;

        Ok(Self {
            classes,
            vectorizer,
            classifier,
        })
    }

    /// Class labels in index order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether the pipeline carries a fitted class list.
    pub fn is_trained(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Number of distinct terms the vectorizer retained.
    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }

    /// Predict the sentiment of a text.
    pub fn predict(&self, text: &str) -> Result<Prediction, String> {
        if self.classes.is_empty() {
            return Err("Model has not been trained".to_string());
        }
        let row = self.vectorizer.transform(text)?;
        let proba = self.classifier.predict_proba(&row)?;

        let mut best_idx = 0usize;
        let mut best_val = f64::NEG_INFINITY;
        for (idx, &p) in proba.iter().enumerate() {
            if p > best_val {
                best_val = p;
                best_idx = idx;
            }
        }

        let probabilities: BTreeMap<String, f64> = self
            .classes
            .iter()
            .cloned()
            .zip(proba.iter().copied())
            .collect();

        Ok(Prediction {
            prediction: self.classes[best_idx].clone(),
            confidence: best_val,
            probabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trained_classes_are_sorted_and_complete() {
        let pipeline = SentimentPipeline::train().unwrap();
        assert_eq!(pipeline.classes(), &["negativo", "neutral", "positivo"]);
        assert!(pipeline.vocabulary_size() > 0);
        assert!(pipeline.vocabulary_size() <= MAX_FEATURES);
    }

    #[test]
    fn in_sample_positive_text_wins() {
        let pipeline = SentimentPipeline::train().unwrap();
        let result = pipeline
            .predict("Me encanta este producto, es excelente")
            .unwrap();
        assert_eq!(result.prediction, "positivo");
        let positive = result.probabilities["positivo"];
        assert!(positive > result.probabilities["negativo"]);
        assert!(positive > result.probabilities["neutral"]);
    }

    #[test]
    fn probabilities_cover_all_classes_and_sum_to_one() {
        let pipeline = SentimentPipeline::train().unwrap();
        let result = pipeline.predict("algo totalmente distinto").unwrap();
        assert_eq!(result.probabilities.len(), 3);
        let sum: f64 = result.probabilities.values().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn confidence_matches_probability_maximum() {
        let pipeline = SentimentPipeline::train().unwrap();
        let result = pipeline.predict("muy mala experiencia").unwrap();
        let max = result
            .probabilities
            .values()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(result.confidence, max);
        assert_eq!(result.probabilities[&result.prediction], max);
    }

    #[test]
    fn survives_a_serde_round_trip() {
        let pipeline = SentimentPipeline::train().unwrap();
        let before = pipeline.predict("buena calidad").unwrap();
        let json = serde_json::to_string(&pipeline).unwrap();
        let restored: SentimentPipeline = serde_json::from_str(&json).unwrap();
        let after = restored.predict("buena calidad").unwrap();
        assert_eq!(before.prediction, after.prediction);
        assert_eq!(before.confidence, after.confidence);
    }

    #[test]
    fn fit_rejects_empty_examples() {
        let err = SentimentPipeline::fit(&[]).unwrap_err();
        assert!(err.contains("Empty training set"));
    }
}
