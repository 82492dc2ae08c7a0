use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use thermo_wheel::Report;
use thermo_wheel::report::Cell;

use crate::color::LabelColors;

// ---------------------------------------------------------------------------
// Report table
// ---------------------------------------------------------------------------

/// Scrollable view of the whole report. The `#` column is display-only; the
/// exported file has no index column.
pub fn report_table(ui: &mut Ui, report: &Report, colors: &LabelColors) {
    let columns = report.columns();

    egui::ScrollArea::horizontal()
        .id_salt("report_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(320.0)
                .column(Column::auto().at_least(32.0))
                .columns(Column::auto().at_least(64.0), columns.len())
                .header(22.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("#");
                    });
                    for name in &columns {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, report.len(), |mut row| {
                        let i = row.index();
                        let data = &report.rows()[i];
                        row.col(|ui| {
                            ui.label(i.to_string());
                        });
                        for cell in report.cells(data) {
                            row.col(|ui| match cell {
                                Cell::Number(v) if v.is_finite() => {
                                    ui.label(format!("{v:.2}"));
                                }
                                Cell::Number(_) => {
                                    ui.label("");
                                }
                                Cell::Text(s) => {
                                    ui.label(
                                        RichText::new(s).color(colors.color_for(data.label)),
                                    );
                                }
                            });
                        }
                    });
                });
        });
}
