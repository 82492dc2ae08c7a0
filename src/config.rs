use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisOptions, Cutoff, ExtraColumns};
use crate::report::{LabelTokens, ReportFormat};

/// Default location of the model artifact, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/modelo_p_t_rod_3_smt.json";

/// Settings read from an optional JSON file. Missing fields take defaults.
///
/// ```json
/// {
///   "model_path": "models/modelo_p_t_rod_3_smt.json",
///   "cutoff": 0.64,
///   "extra_columns": "discard",
///   "labels": { "positive": "Verdadeiro", "negative": "Falso" },
///   "report_format": "xlsx"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub model_path: PathBuf,
    pub cutoff: Cutoff,
    pub extra_columns: ExtraColumns,
    pub labels: LabelTokens,
    pub report_format: ReportFormat,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            cutoff: Cutoff::default(),
            extra_columns: ExtraColumns::default(),
            labels: LabelTokens::default(),
            report_format: ReportFormat::default(),
        }
    }
}

impl AnalysisConfig {
    /// Read a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .labels
            .validate()
            .with_context(|| format!("invalid labels in config {}", path.display()))?;
        log::debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Read `path` when given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            cutoff: self.cutoff,
            extra_columns: self.extra_columns,
            labels: self.labels.clone(),
        }
    }
}
