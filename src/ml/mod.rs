//! Machine learning building blocks for the sentiment classifier.
//!
//! The pipeline pairs a TF-IDF vectorization stage with a multinomial Naive
//! Bayes classifier; both stages serialize with serde so the fitted pipeline
//! can be persisted as a single artifact.

pub mod naive_bayes;
pub mod pipeline;
pub mod tfidf;

pub use pipeline::{Prediction, SentimentPipeline};
