use std::fmt;
use std::str::FromStr;

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook};
use serde::{Deserialize, Serialize};

use super::{Cell, Report};
use crate::error::{AnalysisError, Result};

/// MIME type of the `.xlsx` report.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Sheet1";

/// Output format of an exported report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Xlsx => XLSX_MIME,
            Self::Csv => "text/csv",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown report format '{other}' (expected xlsx or csv)")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Serialize `report` with a header row and no index column.
///
/// Output is byte-for-byte reproducible: the workbook creation date is
/// pinned instead of taken from the clock. Non-finite numbers become empty
/// cells.
pub fn export(report: &Report, format: ReportFormat) -> Result<Vec<u8>> {
    let bytes = match format {
        ReportFormat::Xlsx => export_xlsx(report),
        ReportFormat::Csv => export_csv(report),
    }?;
    log::debug!(
        "Exported {} report rows as {format} ({} bytes)",
        report.len(),
        bytes.len()
    );
    Ok(bytes)
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

fn export_xlsx(report: &Report) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1).map_err(AnalysisError::serialization)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let header_format = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(AnalysisError::serialization)?;

    for (col, name) in report.columns().iter().enumerate() {
        sheet
            .write_string_with_format(0, column_index(col)?, name, &header_format)
            .map_err(AnalysisError::serialization)?;
    }

    for (i, row) in report.rows().iter().enumerate() {
        let r = u32::try_from(i + 1)
            .map_err(|_| AnalysisError::serialization(format!("row {i} is out of range")))?;
        for (col, cell) in report.cells(row).enumerate() {
            let c = column_index(col)?;
            match cell {
                Cell::Number(v) if v.is_finite() => {
                    sheet.write_number(r, c, v).map_err(AnalysisError::serialization)?;
                }
                Cell::Number(_) => {}
                Cell::Text(s) => {
                    sheet.write_string(r, c, s).map_err(AnalysisError::serialization)?;
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(AnalysisError::serialization)
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|_| AnalysisError::serialization(format!("column {col} is out of range")))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn export_csv(report: &Report) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(report.columns())
        .map_err(AnalysisError::serialization)?;

    for row in report.rows() {
        let record = report.cells(row).map(|cell| match cell {
            Cell::Number(v) if v.is_finite() => v.to_string(),
            Cell::Number(_) => String::new(),
            Cell::Text(s) => s.to_string(),
        });
        writer
            .write_record(record)
            .map_err(AnalysisError::serialization)?;
    }

    writer.into_inner().map_err(AnalysisError::serialization)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};

    use super::*;
    use crate::analysis::threshold::{Cutoff, PredictionResult};
    use crate::data::model::FeatureMatrix;
    use crate::report::{LabelTokens, assemble};

    fn sample_report() -> Report {
        let cutoff = Cutoff::default();
        let mut values: Vec<f64> = (0..2 * 36).map(|v| 100.0 + v as f64 * 0.5).collect();
        values[3] = f64::NAN;
        let features = FeatureMatrix::from_row_major(values, 2, 36).unwrap();
        let results: Vec<PredictionResult> = [0.8, 0.3]
            .iter()
            .map(|&p| PredictionResult {
                negative_probability: 1.0 - p,
                positive_probability: p,
                label: cutoff.label(p),
            })
            .collect();
        assemble(&features, &results, &LabelTokens::default())
    }

    #[test]
    fn test_xlsx_reads_back() {
        let report = sample_report();
        let bytes = export(&report, ReportFormat::Xlsx).unwrap();

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let rows: Vec<&[Data]> = range.rows().collect();

        assert_eq!(rows.len(), 3);
        let header: Vec<String> = rows[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(header, report.columns());

        assert_eq!(rows[1][0], Data::Float(100.0));
        assert_eq!(rows[1][3], Data::Empty);
        assert_eq!(rows[2][35], Data::Float(100.0 + 71.0 * 0.5));
        assert_eq!(rows[1][36], Data::String("Verdadeiro".to_string()));
        assert_eq!(rows[2][36], Data::String("Falso".to_string()));

        let Data::Float(neg) = rows[2][37] else {
            panic!("expected a number, got {:?}", rows[2][37]);
        };
        let Data::Float(pos) = rows[2][38] else {
            panic!("expected a number, got {:?}", rows[2][38]);
        };
        assert!((neg - 70.0).abs() < 1e-9);
        assert!((pos - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_xlsx_is_deterministic() {
        let report = sample_report();
        let first = export(&report, ReportFormat::Xlsx).unwrap();
        let second = export(&report, ReportFormat::Xlsx).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_csv_layout() {
        let report = sample_report();
        let text = String::from_utf8(export(&report, ReportFormat::Csv).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("feature_0,feature_1,"));
        assert!(lines[0].ends_with(",Result,Falso(%),Verdadeiro(%)"));
        assert!(lines[1].starts_with("100,100.5,101,,102,"));
        assert!(lines[1].contains(",Verdadeiro,"));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("XLSX".parse::<ReportFormat>(), Ok(ReportFormat::Xlsx));
        assert_eq!("csv".parse::<ReportFormat>(), Ok(ReportFormat::Csv));
        assert!("ods".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::default().mime(), XLSX_MIME);
    }
}
