//! Bag-of-terms TF-IDF vectorizer for short text.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Word tokens of two or more word characters, lowercased.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?u)\b\w\w+\b").expect("valid token pattern"))
}

/// Split a text into lowercase word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|token| token.as_str().to_string())
        .collect()
}

/// TF-IDF vectorizer fitted over a document corpus.
///
/// Vocabulary indices are assigned in alphabetical term order so that
/// transformed rows are stable across runs and across a save/load cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term -> column index, alphabetically ordered.
    vocabulary: BTreeMap<String, usize>,
    /// Smoothed inverse document frequency per column.
    idf: Vec<f64>,
    /// Maximum number of distinct terms retained during fitting.
    max_features: usize,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer with the given vocabulary cap.
    pub fn new(max_features: usize) -> Self {
        Self {
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
            max_features,
        }
    }

    /// Fit the vocabulary and IDF weights over the given documents.
    pub fn fit(&mut self, documents: &[&str]) -> Result<(), String> {
        if documents.is_empty() {
            return Err("Cannot fit vectorizer on an empty corpus".to_string());
        }

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut term_count: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let tokens = tokenize(doc);
            for token in &tokens {
                *term_count.entry(token.clone()).or_insert(0) += 1;
            }
            let unique: std::collections::HashSet<_> = tokens.into_iter().collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }
        if term_count.is_empty() {
            return Err("Corpus produced no tokens".to_string());
        }

        let mut terms: Vec<String> = term_count.keys().cloned().collect();
        if terms.len() > self.max_features {
            // Keep the most frequent terms; break count ties alphabetically.
            terms.sort_by(|a, b| {
                term_count[b]
                    .cmp(&term_count[a])
                    .then_with(|| a.cmp(b))
            });
            terms.truncate(self.max_features);
        }
        terms.sort();

        let n_documents = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(terms.len());
        for (idx, term) in terms.into_iter().enumerate() {
            let df = document_frequency.get(&term).copied().unwrap_or(0) as f64;
            idf.push(((n_documents + 1.0) / (df + 1.0)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        self.vocabulary = vocabulary;
        self.idf = idf;
        Ok(())
    }

    /// Transform a text into an L2-normalized TF-IDF row.
    pub fn transform(&self, text: &str) -> Result<Vec<f64>, String> {
        if self.vocabulary.is_empty() {
            return Err("Vectorizer has not been fitted".to_string());
        }
        let mut row = vec![0.0f64; self.vocabulary.len()];
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                row[idx] += 1.0;
            }
        }
        for (idx, value) in row.iter_mut().enumerate() {
            *value *= self.idf[idx];
        }
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut row {
                *value /= norm;
            }
        }
        Ok(row)
    }

    /// Number of distinct terms in the fitted vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_drops_single_chars() {
        let tokens = tokenize("Me encanta, es EXCELENTE y 1A");
        assert_eq!(tokens, vec!["me", "encanta", "es", "excelente", "1a"]);
    }

    #[test]
    fn fit_builds_alphabetical_vocabulary() {
        let mut vectorizer = TfidfVectorizer::new(100);
        vectorizer
            .fit(&["muy buena calidad", "muy mala calidad"])
            .unwrap();
        assert_eq!(vectorizer.vocabulary_size(), 4);
        let keys: Vec<&String> = vectorizer.vocabulary.keys().collect();
        assert_eq!(keys, vec!["buena", "calidad", "mala", "muy"]);
    }

    #[test]
    fn transform_rows_are_unit_length() {
        let mut vectorizer = TfidfVectorizer::new(100);
        vectorizer
            .fit(&["terrible experiencia", "fantastico servicio"])
            .unwrap();
        let row = vectorizer.transform("terrible servicio").unwrap();
        let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn transform_ignores_unknown_terms() {
        let mut vectorizer = TfidfVectorizer::new(100);
        vectorizer.fit(&["muy buena calidad"]).unwrap();
        let row = vectorizer.transform("palabras desconocidas").unwrap();
        assert!(row.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn max_features_keeps_most_frequent_terms() {
        let mut vectorizer = TfidfVectorizer::new(2);
        vectorizer
            .fit(&["uno uno uno dos dos tres", "uno dos cuatro"])
            .unwrap();
        assert_eq!(vectorizer.vocabulary_size(), 2);
        assert!(vectorizer.vocabulary.contains_key("uno"));
        assert!(vectorizer.vocabulary.contains_key("dos"));
    }

    #[test]
    fn transform_before_fit_is_an_error() {
        let vectorizer = TfidfVectorizer::new(100);
        let err = vectorizer.transform("hola mundo").unwrap_err();
        assert!(err.contains("not been fitted"));
    }
}
