use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::model::FeatureMatrix;
use crate::error::{AnalysisError, Result};
use crate::model::{Classifier, ModelError};

/// Default operating point, chosen for wheel inspection instead of the
/// model's native 0.5.
pub const DEFAULT_CUTOFF: f64 = 0.64;

/// Decision threshold on P(class1), strictly inside (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Cutoff(f64);

impl Cutoff {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && value > 0.0 && value < 1.0 {
            Ok(Self(value))
        } else {
            Err(AnalysisError::InvalidCutoff(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Final decision for one sample.
    #[inline]
    #[must_use]
    pub fn label(self, positive_probability: f64) -> Label {
        if positive_probability > self.0 {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

impl Default for Cutoff {
    fn default() -> Self {
        Self(DEFAULT_CUTOFF)
    }
}

impl TryFrom<f64> for Cutoff {
    type Error = AnalysisError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Cutoff> for f64 {
    fn from(cutoff: Cutoff) -> Self {
        cutoff.0
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0 * 100.0)
    }
}

/// Final binary decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    #[must_use]
    pub fn is_positive(self) -> bool {
        matches!(self, Self::Positive)
    }
}

/// Class probabilities for one sample and the label derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    /// P(class0)
    pub negative_probability: f64,
    /// P(class1)
    pub positive_probability: f64,
    pub label: Label,
}

/// Score the whole batch with one `predict_proba` call and apply `cutoff`.
///
/// Every returned probability must be finite and within `[0, 1]`.
pub fn classify(
    classifier: &dyn Classifier,
    features: &FeatureMatrix,
    cutoff: Cutoff,
) -> Result<Vec<PredictionResult>> {
    let proba = classifier.predict_proba(features)?;
    if proba.len() != features.n_rows() {
        return Err(ModelError::RowCountMismatch {
            expected: features.n_rows(),
            actual: proba.len(),
        }
        .into());
    }

    proba
        .into_iter()
        .enumerate()
        .map(|(row, [p0, p1])| {
            if let Some(value) = [p0, p1].into_iter().find(|p| !(0.0..=1.0).contains(p)) {
                return Err(AnalysisError::from(ModelError::InvalidProbability { row, value }));
            }
            Ok(PredictionResult {
                negative_probability: p0,
                positive_probability: p1,
                label: cutoff.label(p1),
            })
        })
        .collect()
}
