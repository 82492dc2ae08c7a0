use std::path::{Path, PathBuf};

use thermo_wheel::analysis::{Analyzer, Cutoff, ExtraColumns};
use thermo_wheel::config::AnalysisConfig;
use thermo_wheel::data::loader::load_file;
use thermo_wheel::report::{self, ReportFormat, ReportSummary};
use thermo_wheel::{AnalysisError, RawDataset, Report};

use crate::color::LabelColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Model path, cut-off and report settings.
    pub config: AnalysisConfig,

    /// File the dataset was read from.
    pub input_path: Option<PathBuf>,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<RawDataset>,

    /// Last successful analysis. Cleared whenever a run fails.
    pub report: Option<Report>,

    /// Chart data for `report`.
    pub summary: Option<ReportSummary>,

    /// Cut-off as edited in the UI; validated before use.
    pub cutoff_input: f64,

    /// Colours for the two labels.
    pub colors: LabelColors,

    /// Error message shown in the UI.
    pub status_message: Option<String>,

    /// Success message shown in the UI.
    pub info_message: Option<String>,
}

impl AppState {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            cutoff_input: config.cutoff.value(),
            config,
            input_path: None,
            dataset: None,
            report: None,
            summary: None,
            colors: LabelColors::default(),
            status_message: None,
            info_message: None,
        }
    }

    /// Read an input table; the previous report no longer applies.
    pub fn load_input(&mut self, path: &Path) {
        self.clear_report();
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows x {} columns from {}",
                    dataset.len(),
                    dataset.width(),
                    path.display()
                );
                self.info_message = Some(format!(
                    "File loaded: {} rows, {} columns. Click 'Run analysis' to process it.",
                    dataset.len(),
                    dataset.width()
                ));
                self.status_message = None;
                self.dataset = Some(dataset);
                self.input_path = Some(path.to_path_buf());
            }
            Err(e) => {
                self.dataset = None;
                self.input_path = None;
                self.fail("Failed to load file", e);
            }
        }
    }

    pub fn set_model_path(&mut self, path: PathBuf) {
        self.config.model_path = path;
        self.clear_report();
        self.status_message = None;
    }

    /// Change the extra-column policy. A report already on screen is
    /// regenerated so it never shows the old layout.
    pub fn set_extra_columns(&mut self, policy: ExtraColumns) {
        if self.config.extra_columns == policy {
            return;
        }
        self.config.extra_columns = policy;
        if self.report.is_some() {
            self.run_analysis();
        }
    }

    /// Validate `cutoff_input` and store it.
    pub fn apply_cutoff(&mut self) -> bool {
        match Cutoff::new(self.cutoff_input) {
            Ok(cutoff) => {
                self.config.cutoff = cutoff;
                true
            }
            Err(e) => {
                self.fail("Invalid cut-off", e);
                false
            }
        }
    }

    /// Run the full pipeline on the loaded dataset.
    pub fn run_analysis(&mut self) {
        if !self.apply_cutoff() {
            return;
        }
        let Some(dataset) = &self.dataset else {
            self.status_message = Some("Load a data file first.".to_string());
            return;
        };

        let analyzer = Analyzer::new(self.config.model_path.clone(), self.config.options());
        match analyzer.run(dataset) {
            Ok(report) => {
                self.summary = Some(ReportSummary::from_report(&report));
                self.report = Some(report);
                self.status_message = None;
                self.info_message = Some("Analysis complete, report generated.".to_string());
            }
            Err(e) => {
                self.clear_report();
                self.fail("Analysis failed", e);
            }
        }
    }

    /// Export the current report to `path`. The format follows the file
    /// extension, falling back to the configured one.
    pub fn save_report(&mut self, path: &Path) {
        let Some(report) = &self.report else {
            return;
        };
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse::<ReportFormat>().ok())
            .unwrap_or(self.config.report_format);

        let written = report::export(report, format).and_then(|bytes| {
            std::fs::write(path, bytes).map_err(AnalysisError::serialization)
        });
        match written {
            Ok(()) => {
                log::info!("Saved report to {}", path.display());
                self.info_message = Some(format!("Report saved to {}", path.display()));
            }
            Err(e) => self.fail("Failed to save report", e),
        }
    }

    fn clear_report(&mut self) {
        self.report = None;
        self.summary = None;
        self.info_message = None;
    }

    fn fail(&mut self, what: &str, err: AnalysisError) {
        let err = anyhow::Error::new(err);
        log::error!("{what}: {err:#}");
        self.status_message = Some(format!("{what}: {err:#}"));
        self.info_message = None;
    }
}
