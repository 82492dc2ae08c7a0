//! Report assembly, summary and export.
//!
//! ```text
//!  FeatureMatrix + [PredictionResult]
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ assemble │  features | passthrough | Result | neg(%) | pos(%)
//!   └──────────┘
//!        │
//!        ├──────────────► summary  (counts, probability histogram)
//!        ▼
//!   ┌──────────┐
//!   │  export  │  .xlsx / .csv bytes
//!   └──────────┘
//! ```

pub mod export;
pub mod summary;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::threshold::{Label, PredictionResult};
use crate::data::model::{FeatureMatrix, RawValue};
use crate::error::{AnalysisError, Result};

pub use export::{ReportFormat, XLSX_MIME, export};
pub use summary::ReportSummary;

/// Header of the label column.
pub const RESULT_COLUMN: &str = "Result";

/// Default file name offered when saving a report.
pub const DEFAULT_REPORT_FILE: &str = "relatorio_analise_rodas.xlsx";

// ---------------------------------------------------------------------------
// Label tokens
// ---------------------------------------------------------------------------

/// Words written for each label; also name the probability columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelTokens {
    pub positive: String,
    pub negative: String,
}

impl Default for LabelTokens {
    fn default() -> Self {
        Self {
            positive: "Verdadeiro".to_string(),
            negative: "Falso".to_string(),
        }
    }
}

impl LabelTokens {
    pub fn text(&self, label: Label) -> &str {
        match label {
            Label::Positive => &self.positive,
            Label::Negative => &self.negative,
        }
    }

    /// Header of the P(class0) × 100 column, e.g. `Falso(%)`.
    pub fn negative_column(&self) -> String {
        format!("{}(%)", self.negative)
    }

    /// Header of the P(class1) × 100 column, e.g. `Verdadeiro(%)`.
    pub fn positive_column(&self) -> String {
        format!("{}(%)", self.positive)
    }

    /// Both tokens must be non-empty and distinct, or the report would have
    /// ambiguous labels and duplicate probability headers.
    pub fn validate(&self) -> Result<()> {
        if self.positive.trim().is_empty() || self.negative.trim().is_empty() {
            return Err(AnalysisError::invalid_input("label tokens must not be empty"));
        }
        if self.positive == self.negative {
            return Err(AnalysisError::invalid_input(format!(
                "positive and negative labels are both '{}'",
                self.positive
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One report row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub features: Vec<f64>,
    pub passthrough: Vec<RawValue>,
    pub label: Label,
    /// P(class0) × 100
    pub negative_pct: f64,
    /// P(class1) × 100
    pub positive_pct: f64,
}

/// A rendered cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Number(f64),
    Text(&'a str),
}

/// Features, labels and probability percentages, one row per input sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    feature_columns: Vec<String>,
    passthrough_columns: Vec<String>,
    labels: LabelTokens,
    rows: Vec<ReportRow>,
}

/// Join features and predictions row by row.
///
/// # Panics
///
/// If `results` and `features` do not have the same number of rows. The
/// pipeline guarantees this, so a mismatch is a bug in the caller.
pub fn assemble(
    features: &FeatureMatrix,
    results: &[PredictionResult],
    labels: &LabelTokens,
) -> Report {
    assert_eq!(
        features.n_rows(),
        results.len(),
        "report rows: {} feature rows but {} predictions",
        features.n_rows(),
        results.len()
    );

    let rows = features
        .rows()
        .zip(results)
        .map(|(sample, result)| ReportRow {
            features: sample.to_vec(),
            passthrough: Vec::new(),
            label: result.label,
            negative_pct: result.negative_probability * 100.0,
            positive_pct: result.positive_probability * 100.0,
        })
        .collect();

    Report {
        feature_columns: (0..features.n_cols()).map(|i| format!("feature_{i}")).collect(),
        passthrough_columns: Vec::new(),
        labels: labels.clone(),
        rows,
    }
}

impl Report {
    /// Attach input columns beyond the feature slice.
    ///
    /// A header that collides with another report column gets a `.1`, `.2`, …
    /// suffix so every header stays unique.
    ///
    /// # Panics
    ///
    /// If a column does not have one value per report row.
    pub fn with_passthrough(mut self, columns: Vec<(String, Vec<RawValue>)>) -> Self {
        let mut taken: HashSet<String> = self
            .feature_columns
            .iter()
            .cloned()
            .chain([
                RESULT_COLUMN.to_string(),
                self.labels.negative_column(),
                self.labels.positive_column(),
            ])
            .chain(self.passthrough_columns.iter().cloned())
            .collect();

        for (name, values) in columns {
            assert_eq!(
                values.len(),
                self.rows.len(),
                "passthrough column '{name}' has {} values for {} rows",
                values.len(),
                self.rows.len()
            );
            for (row, value) in self.rows.iter_mut().zip(values) {
                row.passthrough.push(value);
            }
            let name = unique_name(name, &taken);
            taken.insert(name.clone());
            self.passthrough_columns.push(name);
        }
        self
    }

    /// Column headers, in output order.
    pub fn columns(&self) -> Vec<String> {
        self.feature_columns
            .iter()
            .chain(&self.passthrough_columns)
            .cloned()
            .chain([
                RESULT_COLUMN.to_string(),
                self.labels.negative_column(),
                self.labels.positive_column(),
            ])
            .collect()
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> &LabelTokens {
        &self.labels
    }

    /// Cells of `row` in the same order as [`Report::columns`].
    pub fn cells<'a>(&'a self, row: &'a ReportRow) -> impl Iterator<Item = Cell<'a>> + 'a {
        row.features
            .iter()
            .map(|&v| Cell::Number(v))
            .chain(row.passthrough.iter().map(|v| match v {
                RawValue::Number(n) => Cell::Number(*n),
                RawValue::Text(s) => Cell::Text(s),
            }))
            .chain([
                Cell::Text(self.labels.text(row.label)),
                Cell::Number(row.negative_pct),
                Cell::Number(row.positive_pct),
            ])
    }
}

fn unique_name(name: String, taken: &HashSet<String>) -> String {
    if !taken.contains(&name) {
        return name;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{name}.{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(p1: f64, label: Label) -> PredictionResult {
        PredictionResult {
            negative_probability: 1.0 - p1,
            positive_probability: p1,
            label,
        }
    }

    fn features(n_rows: usize) -> FeatureMatrix {
        let values = (0..n_rows * 36).map(|v| v as f64).collect();
        FeatureMatrix::from_row_major(values, n_rows, 36).unwrap()
    }

    #[test]
    fn test_column_order() {
        let report = assemble(
            &features(1),
            &[prediction(0.5, Label::Negative)],
            &LabelTokens::default(),
        );
        let columns = report.columns();

        assert_eq!(columns.len(), 39);
        assert_eq!(columns[0], "feature_0");
        assert_eq!(columns[35], "feature_35");
        assert_eq!(&columns[36..], &["Result", "Falso(%)", "Verdadeiro(%)"]);
    }

    #[test]
    fn test_rows_follow_input_order() {
        let results = [
            prediction(0.9, Label::Positive),
            prediction(0.1, Label::Negative),
        ];
        let report = assemble(&features(2), &results, &LabelTokens::default());

        assert_eq!(report.len(), 2);
        assert_eq!(report.rows()[1].features[0], 36.0);
        let cells: Vec<Cell> = report.cells(&report.rows()[0]).collect();
        assert_eq!(cells.len(), 39);
        assert_eq!(cells[36], Cell::Text("Verdadeiro"));
        let Cell::Number(pos) = cells[38] else {
            panic!("expected a number");
        };
        assert!((pos - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_tokens_rename_columns() {
        let tokens = LabelTokens {
            positive: "Defect".to_string(),
            negative: "Ok".to_string(),
        };
        let report = assemble(&features(1), &[prediction(0.2, Label::Negative)], &tokens);

        assert_eq!(&report.columns()[36..], &["Result", "Ok(%)", "Defect(%)"]);
        assert_eq!(report.cells(&report.rows()[0]).nth(36), Some(Cell::Text("Ok")));
    }

    #[test]
    fn test_passthrough_sits_between_features_and_result() {
        let report = assemble(
            &features(2),
            &[prediction(0.9, Label::Positive), prediction(0.1, Label::Negative)],
            &LabelTokens::default(),
        )
        .with_passthrough(vec![
            ("wheel_id".to_string(), vec![7.0.into(), 8.0.into()]),
            (
                "serial".to_string(),
                vec![RawValue::Text("AB-123".to_string()), RawValue::Text("AB-124".to_string())],
            ),
        ]);

        let columns = report.columns();
        assert_eq!(columns[36], "wheel_id");
        assert_eq!(columns[37], "serial");
        assert_eq!(columns[38], "Result");
        let cells: Vec<Cell> = report.cells(&report.rows()[1]).collect();
        assert_eq!(cells[36], Cell::Number(8.0));
        assert_eq!(cells[37], Cell::Text("AB-124"));
        assert_eq!(cells[38], Cell::Text("Falso"));
    }

    #[test]
    fn test_clashing_passthrough_headers_are_renamed() {
        let report = assemble(
            &features(1),
            &[prediction(0.9, Label::Positive)],
            &LabelTokens::default(),
        )
        .with_passthrough(vec![
            ("Result".to_string(), vec![1.0.into()]),
            ("Falso(%)".to_string(), vec![2.0.into()]),
            ("feature_0".to_string(), vec![3.0.into()]),
            ("Result".to_string(), vec![4.0.into()]),
        ]);

        let columns = report.columns();
        assert_eq!(&columns[36..40], &["Result.1", "Falso(%).1", "feature_0.1", "Result.2"]);
        let unique: HashSet<&String> = columns.iter().collect();
        assert_eq!(unique.len(), columns.len());
    }

    #[test]
    fn test_label_tokens_validation() {
        assert!(LabelTokens::default().validate().is_ok());

        let same = LabelTokens {
            positive: "Ok".to_string(),
            negative: "Ok".to_string(),
        };
        assert!(matches!(same.validate(), Err(AnalysisError::InvalidInput(_))));

        let blank = LabelTokens {
            positive: " ".to_string(),
            negative: "Falso".to_string(),
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    #[should_panic(expected = "2 feature rows but 1 predictions")]
    fn test_row_count_mismatch_panics() {
        assemble(
            &features(2),
            &[prediction(0.9, Label::Positive)],
            &LabelTokens::default(),
        );
    }
}
