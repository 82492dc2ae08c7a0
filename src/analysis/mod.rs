//! Threshold decision and the end-to-end pipeline.

pub mod pipeline;
pub mod threshold;

pub use pipeline::{AnalysisOptions, Analyzer, ExtraColumns, run_analysis};
pub use threshold::{Cutoff, DEFAULT_CUTOFF, Label, PredictionResult, classify};
