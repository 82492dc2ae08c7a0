use eframe::egui::{self, Color32, RichText, Ui};

use thermo_wheel::ExtraColumns;
use thermo_wheel::report::DEFAULT_REPORT_FILE;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – analysis controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Analysis");
    ui.separator();

    // ---- Input ----
    ui.strong("Data file");
    match (&state.input_path, &state.dataset) {
        (Some(path), Some(ds)) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(name);
            ui.label(format!("{} rows, {} columns", ds.len(), ds.width()));
        }
        _ => {
            ui.label("No file loaded.");
        }
    }
    if ui.button("Open…").clicked() {
        open_input_dialog(state);
    }
    ui.separator();

    // ---- Model ----
    ui.strong("Model");
    ui.label(state.config.model_path.display().to_string());
    if ui.button("Choose model…").clicked() {
        open_model_dialog(state);
    }
    ui.separator();

    // ---- Decision ----
    ui.strong("Cut-off");
    let slider = egui::Slider::new(&mut state.cutoff_input, 0.01..=0.99)
        .step_by(0.01)
        .fixed_decimals(2);
    if ui.add(slider).changed() && state.report.is_some() {
        // The model is cached, so re-running on every change is cheap.
        state.run_analysis();
    }

    let mut passthrough = state.config.extra_columns == ExtraColumns::Passthrough;
    if ui
        .checkbox(&mut passthrough, "Keep columns after the features")
        .changed()
    {
        state.set_extra_columns(if passthrough {
            ExtraColumns::Passthrough
        } else {
            ExtraColumns::Discard
        });
    }
    ui.add_space(8.0);

    let can_run = state.dataset.is_some();
    if ui
        .add_enabled(can_run, egui::Button::new(RichText::new("Run analysis").strong()))
        .clicked()
    {
        state.run_analysis();
    }

    // ---- Summary ----
    if let Some(summary) = &state.summary {
        ui.separator();
        ui.strong("Results");
        let labels = &state.config.labels;
        ui.label(
            RichText::new(format!("{}: {}", labels.positive, summary.positive))
                .color(state.colors.positive),
        );
        ui.label(
            RichText::new(format!("{}: {}", labels.negative, summary.negative))
                .color(state.colors.negative),
        );
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data…").clicked() {
                open_input_dialog(state);
                ui.close_menu();
            }
            if ui.button("Choose model…").clicked() {
                open_model_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(state.report.is_some(), egui::Button::new("Save report…"))
                .clicked()
            {
                save_report_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(report) = &state.report {
            ui.label(format!(
                "{} rows analysed at cut-off {}",
                report.len(),
                state.config.cutoff
            ));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        } else if let Some(msg) = &state.info_message {
            ui.label(RichText::new(msg).color(Color32::DARK_GREEN));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_input_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open thermal profile data")
        .add_filter("Supported files", &["xlsx", "xlsm", "xls", "ods", "csv", "parquet", "pq"])
        .add_filter("Excel", &["xlsx", "xlsm", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_input(&path);
    }
}

pub fn open_model_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Choose model artifact")
        .add_filter("Model artifact", &["json"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Model path set to {}", path.display());
        state.set_model_path(path);
    }
}

pub fn save_report_dialog(state: &mut AppState) {
    let default_name = std::path::Path::new(DEFAULT_REPORT_FILE)
        .with_extension(state.config.report_format.extension());
    let file = rfd::FileDialog::new()
        .set_title("Save report")
        .set_file_name(default_name.to_string_lossy())
        .add_filter("Excel", &["xlsx"])
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.save_report(&path);
    }
}
