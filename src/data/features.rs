use super::model::{FeatureMatrix, RawDataset, RawValue};
use crate::error::{AnalysisError, Result};

/// Number of leading columns the classifier was trained on.
pub const FEATURE_COUNT: usize = 36;

/// Fail with `InsufficientColumns` unless `dataset` has at least
/// [`FEATURE_COUNT`] columns.
pub fn check_width(dataset: &RawDataset) -> Result<()> {
    if dataset.width() < FEATURE_COUNT {
        return Err(AnalysisError::InsufficientColumns {
            actual: dataset.width(),
            expected: FEATURE_COUNT,
        });
    }
    Ok(())
}

/// Slice the first [`FEATURE_COUNT`] columns out of `dataset`.
///
/// Columns past the slice are ignored here and may hold anything. Inside the
/// slice every cell must be numeric. Values are copied as-is: the classifier
/// expects raw temperatures in file order, so nothing is scaled or imputed.
pub fn extract(dataset: &RawDataset) -> Result<FeatureMatrix> {
    check_width(dataset)?;

    let mut values = Vec::with_capacity(dataset.len() * FEATURE_COUNT);
    for (row_no, row) in dataset.rows.iter().enumerate() {
        for (col, cell) in row[..FEATURE_COUNT].iter().enumerate() {
            match cell {
                RawValue::Number(v) => values.push(*v),
                RawValue::Text(s) => {
                    return Err(AnalysisError::invalid_input(format!(
                        "row {row_no}, column '{}': '{s}' is not a number",
                        dataset.column_names[col]
                    )));
                }
            }
        }
    }

    FeatureMatrix::from_row_major(values, dataset.len(), FEATURE_COUNT)
}

/// Columns past the feature slice, as `(name, cells per row)`.
pub fn extra_columns(dataset: &RawDataset) -> Vec<(String, Vec<RawValue>)> {
    dataset
        .column_names
        .iter()
        .enumerate()
        .skip(FEATURE_COUNT)
        .map(|(col, name)| {
            let values = dataset.rows.iter().map(|row| row[col].clone()).collect();
            (name.clone(), values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n_rows: usize, n_cols: usize) -> RawDataset {
        let rows = (0..n_rows)
            .map(|r| (0..n_cols).map(|c| (r * 100 + c) as f64).collect())
            .collect();
        RawDataset::from_rows(rows).unwrap()
    }

    #[test]
    fn test_exact_width_is_copied_verbatim() {
        let ds = dataset(4, FEATURE_COUNT);
        let features = extract(&ds).unwrap();

        assert_eq!(features.n_rows(), 4);
        assert_eq!(features.n_cols(), FEATURE_COUNT);
        for (row, original) in features.rows().zip(&ds.rows) {
            let original: Vec<f64> = original.iter().filter_map(RawValue::as_f64).collect();
            assert_eq!(row, original.as_slice());
        }
    }

    #[test]
    fn test_one_column_short_fails() {
        let err = extract(&dataset(2, 35)).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientColumns {
                actual: 35,
                expected: 36
            }
        ));
    }

    #[test]
    fn test_wider_input_is_sliced() {
        let ds = dataset(3, 40);
        let features = extract(&ds).unwrap();

        assert_eq!(features.n_cols(), FEATURE_COUNT);
        assert_eq!(features.row(2)[35], 235.0);

        let extra = extra_columns(&ds);
        assert_eq!(extra.len(), 4);
        assert_eq!(extra[0].0, "column_36");
        assert_eq!(extra[0].1, vec![36.0.into(), 136.0.into(), 236.0.into()]);
    }

    #[test]
    fn test_extracted_matrix_is_independent_of_source() {
        let mut ds = dataset(1, FEATURE_COUNT);
        let features = extract(&ds).unwrap();
        ds.rows[0][0] = RawValue::Number(-1.0);
        assert_eq!(features.row(0)[0], 0.0);
    }

    #[test]
    fn test_text_after_the_features_is_kept() {
        let mut ds = dataset(2, FEATURE_COUNT + 1);
        ds.column_names[FEATURE_COUNT] = "serial".to_string();
        ds.rows[0][FEATURE_COUNT] = RawValue::Text("AB-123".to_string());

        let features = extract(&ds).unwrap();
        assert_eq!(features.n_rows(), 2);

        let extra = extra_columns(&ds);
        assert_eq!(extra[0].0, "serial");
        assert_eq!(extra[0].1[0], RawValue::Text("AB-123".to_string()));
    }

    #[test]
    fn test_text_inside_the_features_is_invalid_input() {
        let mut ds = dataset(2, FEATURE_COUNT);
        ds.rows[1][4] = RawValue::Text("hot".to_string());

        let err = extract(&ds).unwrap_err();
        let AnalysisError::InvalidInput(msg) = err else {
            panic!("expected InvalidInput, got {err:?}");
        };
        assert!(msg.contains("row 1, column 'column_4'"), "{msg}");
        assert!(msg.contains("'hot' is not a number"), "{msg}");
    }

    #[test]
    fn test_empty_table_with_enough_columns() {
        let names = (0..FEATURE_COUNT).map(|i| i.to_string()).collect();
        let ds = RawDataset::new(names, Vec::new()).unwrap();
        let features = extract(&ds).unwrap();
        assert_eq!(features.n_rows(), 0);
    }
}
