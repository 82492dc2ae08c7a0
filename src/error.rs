use std::path::PathBuf;

use crate::model::ModelError;

/// Result alias for the analysis pipeline.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Every way an analysis run can stop.
///
/// Variants are grouped by pipeline stage: model load, input reading,
/// feature extraction, inference and export. No stage recovers on its own;
/// the caller decides how to present the fault.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The model path does not point at an existing file.
    #[error("model artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    /// The model file exists but could not be turned into a classifier.
    #[error("model artifact {} is corrupt: {reason}", path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// The uploaded table could not be read as a numeric dataset.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The dataset is narrower than the feature slice.
    #[error("input has {actual} columns, at least {expected} are required")]
    InsufficientColumns { actual: usize, expected: usize },

    /// The cut-off is outside the open interval (0, 1).
    #[error("cut-off must lie strictly between 0 and 1, got {0}")]
    InvalidCutoff(f64),

    /// The classifier failed while scoring the batch.
    #[error("inference failed")]
    Inference(#[source] ModelError),

    /// The report could not be written.
    #[error("failed to serialize report: {0}")]
    Serialization(String),
}

impl AnalysisError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl std::fmt::Display) -> Self {
        Self::Serialization(msg.to_string())
    }
}

impl From<ModelError> for AnalysisError {
    fn from(err: ModelError) -> Self {
        Self::Inference(err)
    }
}
