use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};
use temp_range_finder::data::model::DailyAggregate;

const ROW_HEIGHT: f32 = 18.0;

/// Two-column table of the days inside the selected range.
pub fn matching_days(ui: &mut Ui, days: &[DailyAggregate]) {
    if days.is_empty() {
        ui.label("No day falls in the selected range.");
        return;
    }

    TableBuilder::new(ui)
        .id_salt("matching_days")
        .striped(true)
        .resizable(true)
        .max_scroll_height(360.0)
        .column(Column::auto().at_least(140.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Date");
            });
            header.col(|ui| {
                ui.strong("Daily avg temp (°C)");
            });
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, days.len(), |mut row| {
                let day = &days[row.index()];
                row.col(|ui| {
                    ui.label(day.display_date());
                });
                row.col(|ui| {
                    ui.monospace(day.display_temperature());
                });
            });
        });
}
