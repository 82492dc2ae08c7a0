use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::threshold::{Cutoff, classify};
use crate::data::features::{check_width, extra_columns, extract};
use crate::data::model::RawDataset;
use crate::error::Result;
use crate::model::{Classifier, ModelLoader};
use crate::report::{LabelTokens, Report, assemble};

/// What to do with input columns past the feature slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraColumns {
    /// Leave them out of the report.
    #[default]
    Discard,
    /// Copy them into the report after the features.
    Passthrough,
}

/// Per-run knobs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisOptions {
    pub cutoff: Cutoff,
    pub extra_columns: ExtraColumns,
    pub labels: LabelTokens,
}

/// Run the pipeline against an already loaded classifier.
///
/// Either the complete report comes back or the first error does.
pub fn run_analysis(
    raw: &RawDataset,
    options: &AnalysisOptions,
    classifier: &dyn Classifier,
) -> Result<Report> {
    let features = extract(raw)?;
    let results = classify(classifier, &features, options.cutoff)?;

    let report = assemble(&features, &results, &options.labels);
    let report = match options.extra_columns {
        ExtraColumns::Discard => report,
        ExtraColumns::Passthrough => report.with_passthrough(extra_columns(raw)),
    };

    let positives = results.iter().filter(|r| r.label.is_positive()).count();
    log::info!(
        "Analysed {} rows with '{}' at cut-off {}: {} positive, {} negative",
        report.len(),
        classifier.name(),
        options.cutoff,
        positives,
        report.len() - positives
    );
    Ok(report)
}

/// Pipeline bound to a model path, resolving the model through a
/// [`ModelLoader`] on every run.
pub struct Analyzer {
    model_path: PathBuf,
    options: AnalysisOptions,
    loader: &'static ModelLoader,
}

impl Analyzer {
    /// Analyzer using the process-wide model cache.
    pub fn new(model_path: impl Into<PathBuf>, options: AnalysisOptions) -> Self {
        Self::with_loader(model_path, options, ModelLoader::global())
    }

    pub fn with_loader(
        model_path: impl Into<PathBuf>,
        options: AnalysisOptions,
        loader: &'static ModelLoader,
    ) -> Self {
        Self {
            model_path: model_path.into(),
            options,
            loader,
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn set_cutoff(&mut self, cutoff: Cutoff) {
        self.options.cutoff = cutoff;
    }

    /// Validate the input, load the model (cached after the first run),
    /// classify and assemble.
    pub fn run(&self, raw: &RawDataset) -> Result<Report> {
        // Fail on the input shape before touching storage.
        check_width(raw)?;
        let classifier = self.loader.load(&self.model_path)?;
        run_analysis(raw, &self.options, classifier.as_ref())
    }
}
