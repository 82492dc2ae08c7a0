use std::io::{Cursor, Read, Seek};
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use calamine::{Data, Range, Reader, Xlsx, open_workbook_auto, open_workbook_from_rs};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{RawDataset, RawValue};
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an uploaded table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, header in row 1
/// * `.csv`     – header row, one sample per line
/// * `.parquet` – one numeric column per feature
///
/// Every failure is reported as [`AnalysisError::InvalidInput`] with the
/// full context chain in the message.
pub fn load_file(path: &Path) -> Result<RawDataset, AnalysisError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => load_spreadsheet(path),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(anyhow::anyhow!("Unsupported file extension: .{other}")),
    };

    loaded
        .with_context(|| format!("loading {}", path.display()))
        .map_err(|e| AnalysisError::invalid_input(format!("{e:#}")))
}

/// Load an `.xlsx` workbook held in memory (e.g. an upload buffer).
pub fn load_xlsx_bytes(bytes: &[u8]) -> Result<RawDataset, AnalysisError> {
    load_xlsx_reader(Cursor::new(bytes)).map_err(|e| AnalysisError::invalid_input(format!("{e:#}")))
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Same layout `pandas.read_excel` expects: first row is the header, every
/// following row is a sample. Only the first worksheet is read.
fn load_spreadsheet(path: &Path) -> Result<RawDataset> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;
    range_to_dataset(&range)
}

fn load_xlsx_reader<RS: Read + Seek>(reader: RS) -> Result<RawDataset> {
    let mut workbook: Xlsx<RS> = open_workbook_from_rs(reader).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;
    range_to_dataset(&range)
}

fn range_to_dataset(range: &Range<Data>) -> Result<RawDataset> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        bail!("worksheet is empty");
    };

    let column_names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => format!("column_{i}"),
            other => other.to_string(),
        })
        .collect();

    let values = rows
        .map(|row| row.iter().map(cell_to_value).collect())
        .collect();

    Ok(RawDataset::new(column_names, values)?)
}

/// Numbers, booleans and dates become numbers; strings are parsed and kept
/// as text when they are not numeric.
fn cell_to_value(cell: &Data) -> RawValue {
    match cell {
        Data::Float(f) => RawValue::Number(*f),
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Bool(b) => RawValue::Number(if *b { 1.0 } else { 0.0 }),
        Data::Empty => RawValue::Number(f64::NAN),
        Data::DateTime(dt) => RawValue::Number(dt.as_f64()),
        Data::String(s) => RawValue::parse(s),
        other => RawValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names, then one sample per line.
/// Empty fields become `NaN`; fields that are not numbers are kept as text.
fn load_csv(path: &Path) -> Result<RawDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let column_names: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(RawValue::parse).collect());
    }

    Ok(RawDataset::new(column_names, rows)?)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one numeric column per feature.
///
/// Integer, float, decimal and boolean columns are cast to `Float64`; other
/// columns are read as text. Nulls become `NaN`. Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<RawValue>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let n_rows = batch.num_rows();

        let columns = batch
            .columns()
            .iter()
            .zip(&column_names)
            .map(|(col, name)| {
                ParquetColumn::from_array(col)
                    .with_context(|| format!("column '{name}' ({:?})", col.data_type()))
            })
            .collect::<Result<Vec<ParquetColumn>>>()?;

        for row in 0..n_rows {
            rows.push(columns.iter().map(|col| col.value(row)).collect());
        }
    }

    Ok(RawDataset::new(column_names, rows)?)
}

/// A Parquet column cast to one of the two cell kinds.
enum ParquetColumn {
    Number(Float64Array),
    Text(StringArray),
}

impl ParquetColumn {
    fn from_array(col: &ArrayRef) -> Result<Self> {
        let data_type = col.data_type();
        if data_type.is_numeric() || *data_type == DataType::Boolean {
            let cast_col = cast(col, &DataType::Float64).context("casting to Float64")?;
            let arr = cast_col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array after cast")?;
            Ok(Self::Number(arr.clone()))
        } else {
            let cast_col = cast(col, &DataType::Utf8).context("casting to text")?;
            let arr = cast_col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray after cast")?;
            Ok(Self::Text(arr.clone()))
        }
    }

    fn value(&self, row: usize) -> RawValue {
        match self {
            Self::Number(arr) if !arr.is_null(row) => RawValue::Number(arr.value(row)),
            Self::Text(arr) if !arr.is_null(row) => RawValue::parse(arr.value(row)),
            _ => RawValue::Number(f64::NAN),
        }
    }
}
