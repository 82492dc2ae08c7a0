use super::Report;

/// Number of bins in the positive-probability histogram.
pub const HISTOGRAM_BINS: usize = 10;

/// Width of one histogram bin, in percentage points.
pub const BIN_WIDTH: f64 = 100.0 / HISTOGRAM_BINS as f64;

/// Aggregates the charts are drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub positive: usize,
    pub negative: usize,
    /// Counts of P(class1) × 100 per 10-point bin; 100 lands in the last bin.
    pub histogram: [usize; HISTOGRAM_BINS],
}

impl ReportSummary {
    pub fn from_report(report: &Report) -> Self {
        let mut summary = Self {
            positive: 0,
            negative: 0,
            histogram: [0; HISTOGRAM_BINS],
        };

        for row in report.rows() {
            if row.label.is_positive() {
                summary.positive += 1;
            } else {
                summary.negative += 1;
            }
            if row.positive_pct.is_finite() {
                let bin = (row.positive_pct.clamp(0.0, 100.0) / BIN_WIDTH) as usize;
                summary.histogram[bin.min(HISTOGRAM_BINS - 1)] += 1;
            }
        }

        summary
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative
    }

    /// Lower edge of bin `i`, in percent.
    pub fn bin_start(i: usize) -> f64 {
        i as f64 * BIN_WIDTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::threshold::{Cutoff, PredictionResult};
    use crate::data::model::FeatureMatrix;
    use crate::report::{LabelTokens, assemble};

    fn report(p1: &[f64]) -> Report {
        let cutoff = Cutoff::default();
        let features = FeatureMatrix::from_row_major(vec![0.0; p1.len() * 36], p1.len(), 36).unwrap();
        let results: Vec<PredictionResult> = p1
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
    fn test_counts_and_bins() {
        let summary = ReportSummary::from_report(&report(&[0.0, 0.05, 0.64, 0.65, 0.999, 1.0]));

        assert_eq!(summary.positive, 3);
        assert_eq!(summary.negative, 3);
        assert_eq!(summary.total(), 6);
        assert_eq!(summary.histogram[0], 2);
        assert_eq!(summary.histogram[6], 2);
        assert_eq!(summary.histogram[9], 2);
        assert_eq!(summary.histogram.iter().sum::<usize>(), 6);
    }

    #[test]
    fn test_empty_report() {
        let summary = ReportSummary::from_report(&report(&[]));
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.histogram, [0; HISTOGRAM_BINS]);
    }

    #[test]
    fn test_bin_edges() {
        assert_eq!(ReportSummary::bin_start(0), 0.0);
        assert_eq!(ReportSummary::bin_start(9), 90.0);
    }
}
