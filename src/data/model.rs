use std::fmt;

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// RawValue – one input cell
// ---------------------------------------------------------------------------

/// A cell of the uploaded table. Numbers stay numbers; anything that does
/// not parse as one (serials, notes) is kept as text.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Parse a textual cell. Blank cells are `NaN`, like an empty numeric cell.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Self::Number(f64::NAN);
        }
        match trimmed.parse::<f64>() {
            Ok(v) => Self::Number(v),
            Err(_) => Self::Text(s.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// RawDataset – the uploaded table
// ---------------------------------------------------------------------------

/// A table exactly as read from the uploaded file.
///
/// Rows are samples, columns keep the header order of the file. Empty cells
/// are stored as `NaN`. Nothing here requires a column to be numeric; the
/// feature extractor checks the columns it slices.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    /// Header names, one per column.
    pub column_names: Vec<String>,
    /// Row-major cells; every row has `column_names.len()` entries.
    pub rows: Vec<Vec<RawValue>>,
}

impl RawDataset {
    /// Build a dataset, checking that every row is as wide as the header.
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<RawValue>>) -> Result<Self> {
        let width = column_names.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(AnalysisError::invalid_input(format!(
                "row {i} has {} values but the header has {width} columns",
                row.len()
            )));
        }
        Ok(Self { column_names, rows })
    }

    /// Build an all-numeric dataset with generated column names
    /// (`column_0`, `column_1`, …).
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        let names = (0..width).map(|i| format!("column_{i}")).collect();
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(RawValue::Number).collect())
            .collect();
        Self::new(names, rows)
    }

    /// Number of rows (samples).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.column_names.len()
    }
}

// ---------------------------------------------------------------------------
// FeatureMatrix – fixed-width slice consumed by the classifier
// ---------------------------------------------------------------------------

/// Row-major feature matrix. Owns its values.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    values: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl FeatureMatrix {
    /// Wrap row-major values. `values.len()` must equal `n_rows * n_cols`.
    pub fn from_row_major(values: Vec<f64>, n_rows: usize, n_cols: usize) -> Result<Self> {
        if values.len() != n_rows * n_cols {
            return Err(AnalysisError::invalid_input(format!(
                "{} values cannot fill a {n_rows}x{n_cols} matrix",
                values.len()
            )));
        }
        Ok(Self {
            values,
            n_rows,
            n_cols,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// One sample.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n_cols..(i + 1) * self.n_cols]
    }

    /// Iterate samples in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact(0) panics; a zero-width matrix still has n_rows samples.
        (0..self.n_rows).map(move |i| self.row(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = RawDataset::new(
            vec!["a".into(), "b".into()],
            vec![vec![1.0.into(), 2.0.into()], vec![3.0.into()]],
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_raw_value_parse() {
        assert_eq!(RawValue::parse(" 7 "), RawValue::Number(7.0));
        assert!(RawValue::parse("  ").as_f64().is_some_and(f64::is_nan));
        assert_eq!(RawValue::parse("AB-123"), RawValue::Text("AB-123".to_string()));
    }

    #[test]
    fn test_matrix_rows() {
        let m = FeatureMatrix::from_row_major(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.rows().count(), 2);
    }

    #[test]
    fn test_matrix_shape_mismatch() {
        assert!(FeatureMatrix::from_row_major(vec![1.0; 5], 2, 3).is_err());
    }
}
