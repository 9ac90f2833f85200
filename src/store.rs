//! Model artifact persistence and the load-or-train startup path.
//!
//! On startup the store either deserializes an existing artifact or trains
//! the fixed pipeline and writes a fresh artifact. Both failure paths are
//! fatal to startup; the serving layer never retrains.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ml::{Prediction, SentimentPipeline};

/// Default artifact location, relative to the working directory.
pub const DEFAULT_ARTIFACT_NAME: &str = "sentiment_model.json";

/// Errors raised while establishing or using the model store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read an existing artifact file.
    #[error("Failed to read model artifact {path}: {source}")]
    ReadArtifact {
        path: PathBuf,
        source: std::io::Error,
    },
    /// An existing artifact did not deserialize into a pipeline.
    #[error("Failed to parse model artifact {path}: {source}")]
    ParseArtifact {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Training the fixed pipeline failed.
    #[error("Failed to train model: {0}")]
    Train(String),
    /// The freshly trained pipeline could not be serialized.
    #[error("Failed to serialize model artifact: {0}")]
    SerializeArtifact(serde_json::Error),
    /// The artifact (or its parent directory) could not be written.
    #[error("Failed to write model artifact {path}: {source}")]
    WriteArtifact {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Inference failed on an established pipeline.
    #[error("Prediction failed: {0}")]
    Predict(String),
}

/// Where the in-memory pipeline came from during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactSource {
    /// Deserialized from an existing artifact file.
    Loaded,
    /// Trained in-process and persisted.
    Trained,
}

/// Immutable handle to the fitted pipeline, shared by all request handlers.
#[derive(Debug)]
pub struct ModelStore {
    pipeline: SentimentPipeline,
    source: ArtifactSource,
    path: PathBuf,
}

impl ModelStore {
    /// Load the artifact at `path`, or train and persist it if absent.
    ///
    /// After a successful return the artifact file exists on disk. A second
    /// initialization against the same path loads without retraining.
    pub fn initialize(path: &Path) -> Result<Self, StoreError> {
        if path.exists() {
            let bytes = fs::read(path).map_err(|source| StoreError::ReadArtifact {
                path: path.to_path_buf(),
                source,
            })?;
            let pipeline = serde_json::from_slice(&bytes).map_err(|source| {
                StoreError::ParseArtifact {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            tracing::info!("Model loaded from {}", path.display());
            return Ok(Self {
                pipeline,
                source: ArtifactSource::Loaded,
                path: path.to_path_buf(),
            });
        }

        tracing::info!("No model artifact at {}; training a new model", path.display());
        let pipeline = SentimentPipeline::train().map_err(StoreError::Train)?;
        save_pipeline(path, &pipeline)?;
        tracing::info!("Model trained and saved to {}", path.display());
        Ok(Self {
            pipeline,
            source: ArtifactSource::Trained,
            path: path.to_path_buf(),
        })
    }

    /// Predict the sentiment of a text.
    pub fn predict(&self, text: &str) -> Result<Prediction, StoreError> {
        self.pipeline.predict(text).map_err(StoreError::Predict)
    }

    /// Whether the in-memory pipeline is fit for serving.
    pub fn is_ready(&self) -> bool {
        self.pipeline.is_trained()
    }

    /// Whether initialization loaded an existing artifact or trained anew.
    pub fn source(&self) -> ArtifactSource {
        self.source
    }

    /// Path of the backing artifact file.
    pub fn artifact_path(&self) -> &Path {
        &self.path
    }
}

/// Write a fitted pipeline to `path` as pretty JSON, creating parent dirs.
pub fn save_pipeline(path: &Path, pipeline: &SentimentPipeline) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StoreError::WriteArtifact {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    let bytes = serde_json::to_vec_pretty(pipeline).map_err(StoreError::SerializeArtifact)?;
    fs::write(path, bytes).map_err(|source| StoreError::WriteArtifact {
        path: path.to_path_buf(),
        source,
    })
}
