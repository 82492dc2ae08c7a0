//! Wheel thermal-profile analysis.
//!
//! Reads a table of thermal measurements, scores every row with a
//! pre-trained binary classifier, labels each row against a tunable cut-off
//! and builds a spreadsheet report of features, labels and probabilities.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod report;

pub use analysis::{AnalysisOptions, Analyzer, Cutoff, ExtraColumns, Label, run_analysis};
pub use data::model::{FeatureMatrix, RawDataset, RawValue};
pub use error::{AnalysisError, Result};
pub use model::{Classifier, ModelLoader};
pub use report::{Report, ReportFormat};
