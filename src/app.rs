use eframe::egui::{self, ScrollArea, Ui};

use thermo_wheel::config::AnalysisConfig;

use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ThermoWheelApp {
    pub state: AppState,
}

impl ThermoWheelApp {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for ThermoWheelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: report and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            report_view(ui, &self.state);
        });
    }
}

fn report_view(ui: &mut Ui, state: &AppState) {
    let (Some(report), Some(summary)) = (&state.report, &state.summary) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let hint = if state.dataset.is_some() {
                "Click 'Run analysis' to process the data"
            } else {
                "Open a spreadsheet to start  (File → Open data…)"
            };
            ui.heading(hint);
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Report");
            table::report_table(ui, report, &state.colors);
            ui.add_space(12.0);

            ui.heading("Charts");
            charts::result_distribution(ui, summary, report.labels(), &state.colors);
            ui.add_space(8.0);
            charts::probability_histogram(ui, summary, state.config.cutoff, report.labels());
        });
}
