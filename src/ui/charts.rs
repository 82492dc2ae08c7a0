use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, LineStyle, Plot, VLine};

use thermo_wheel::report::summary::{BIN_WIDTH, HISTOGRAM_BINS};
use thermo_wheel::report::{LabelTokens, ReportSummary};
use thermo_wheel::Cutoff;

use crate::color::LabelColors;

// ---------------------------------------------------------------------------
// Result distribution
// ---------------------------------------------------------------------------

/// One bar per label with its row count.
pub fn result_distribution(
    ui: &mut Ui,
    summary: &ReportSummary,
    labels: &LabelTokens,
    colors: &LabelColors,
) {
    ui.strong("Result distribution");

    let negative = BarChart::new(vec![
        Bar::new(0.0, summary.negative as f64)
            .width(0.6)
            .name(&labels.negative),
    ])
    .name(&labels.negative)
    .color(colors.negative);
    let positive = BarChart::new(vec![
        Bar::new(1.0, summary.positive as f64)
            .width(0.6)
            .name(&labels.positive),
    ])
    .name(&labels.positive)
    .color(colors.positive);

    Plot::new("result_distribution")
        .legend(Legend::default())
        .height(220.0)
        .y_axis_label("Count")
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(negative);
            plot_ui.bar_chart(positive);
        });
}

// ---------------------------------------------------------------------------
// Positive-probability histogram
// ---------------------------------------------------------------------------

/// Histogram of P(class1) × 100 with a dashed line at the cut-off.
pub fn probability_histogram(
    ui: &mut Ui,
    summary: &ReportSummary,
    cutoff: Cutoff,
    labels: &LabelTokens,
) {
    ui.strong(format!("Distribution of {}", labels.positive_column()));

    let bars: Vec<Bar> = (0..HISTOGRAM_BINS)
        .map(|i| {
            let start = ReportSummary::bin_start(i);
            Bar::new(start + BIN_WIDTH / 2.0, summary.histogram[i] as f64)
                .width(BIN_WIDTH * 0.95)
                .name(format!("{start:.0}-{:.0}%", start + BIN_WIDTH))
        })
        .collect();
    let chart = BarChart::new(bars)
        .name(labels.positive_column())
        .color(Color32::from_rgb(0x1f, 0x77, 0xb4));

    let line = VLine::new(cutoff.value() * 100.0)
        .name(format!("Cut-off: {cutoff}"))
        .color(Color32::RED)
        .style(LineStyle::dashed_loose());

    Plot::new("probability_histogram")
        .legend(Legend::default())
        .height(260.0)
        .x_axis_label(labels.positive_column())
        .y_axis_label("Count")
        .include_x(0.0)
        .include_x(100.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            plot_ui.vline(line);
        });
}
