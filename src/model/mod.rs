//! Classifier capability and the models that ship with the crate.
//!
//! The pipeline only ever sees `dyn Classifier`; any model that can score a
//! [`FeatureMatrix`] into two class probabilities can be plugged in.

pub mod artifact;
pub mod forest;
pub mod loader;
pub mod logistic;

use crate::data::model::FeatureMatrix;

pub use artifact::{ARTIFACT_FORMAT_VERSION, ModelArtifact, ModelSpec};
pub use forest::{DecisionTree, RandomForest};
pub use loader::ModelLoader;
pub use logistic::LogisticRegression;

/// Binary classifier capability.
pub trait Classifier: Send + Sync {
    /// Model name, for logs and the UI.
    fn name(&self) -> &str;

    /// Number of features each sample must have.
    fn n_features(&self) -> usize;

    /// `[P(class0), P(class1)]` for every row, in row order.
    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<[f64; 2]>, ModelError>;

    /// Native decision (0 or 1) for every row, using the model's own 0.5
    /// boundary.
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<u8>, ModelError> {
        Ok(self
            .predict_proba(features)?
            .into_iter()
            .map(|[p0, p1]| u8::from(p1 > p0))
            .collect())
    }
}

/// Errors raised by a classifier while scoring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("model expects {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("non-finite value {value} at row {row}, column {column}")]
    NonFiniteInput { row: usize, column: usize, value: f64 },

    #[error("model returned probability {value} at row {row}; expected a value in [0, 1]")]
    InvalidProbability { row: usize, value: f64 },

    #[error("model returned {actual} probability rows for {expected} samples")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("{0}")]
    Other(String),
}

/// Shared input checks for the built-in models.
pub(crate) fn check_input(features: &FeatureMatrix, n_features: usize) -> Result<(), ModelError> {
    if features.n_cols() != n_features {
        return Err(ModelError::DimensionMismatch {
            expected: n_features,
            actual: features.n_cols(),
        });
    }
    for (row, sample) in features.rows().enumerate() {
        if let Some((column, &value)) = sample.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::NonFiniteInput { row, column, value });
        }
    }
    Ok(())
}
