use std::path::PathBuf;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use temp_range_finder::data::export::DEFAULT_EXPORT_NAME;
use temp_range_finder::data::model::SourceFormat;
use temp_range_finder::data::pipeline::FileStatus;

use crate::state::{AppState, group_thousands};
use crate::ui::{plot, table};

const EXAMPLE_CSV: &str = "Time; Consumption (net) kWh; Production (net) kWh; \
Daily average temperature\n\
2025-01-01T00:00:00.000+02:00;1,569;0,000;-4,7\n\
2025-01-01T01:00:00.000+02:00;1,879;0,000;-4,8\n";

// ---------------------------------------------------------------------------
// Left side panel – inputs and range filter
// ---------------------------------------------------------------------------

/// Deferred edits collected while the source list is borrowed.
enum SourceAction {
    Remove(usize),
    SetFormat(usize, SourceFormat),
}

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Input files");
            ui.separator();

            ui.strong("Format of new files");
            format_combo(ui, "import_format", &mut state.import_format);

            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Open files…").clicked() {
                    if let Some(paths) = pick_csv_files() {
                        state.open_files(&paths);
                    }
                }
                if ui.button("Add files…").clicked() {
                    if let Some(paths) = pick_csv_files() {
                        state.add_files(&paths);
                    }
                }
            });
            ui.add_space(4.0);

            source_list(ui, state);

            if let Some(bounds) = state.bounds {
                ui.add_space(8.0);
                ui.heading("Filter");
                ui.separator();
                ui.label("Daily average temperature range (°C)");

                let (mut lo, mut hi) = state.selection;
                let step = state.config.slider_step;
                let range = bounds.min..=bounds.max;
                let lo_changed = ui
                    .add(egui::Slider::new(&mut lo, range.clone()).step_by(step).text("min"))
                    .changed();
                let hi_changed = ui
                    .add(egui::Slider::new(&mut hi, range).step_by(step).text("max"))
                    .changed();
                if lo_changed || hi_changed {
                    state.set_selection(lo, hi);
                }
                if lo > hi {
                    ui.label(
                    RichText::new("min is above max: nothing can match").color(Color32::YELLOW),
                );
                }
                if ui.small_button("Reset range").clicked() {
                    let (lo, hi) = bounds.initial;
                    state.set_selection(lo, hi);
                }

                ui.add_space(4.0);
                ui.checkbox(&mut state.show_source_series, "Show each file on the chart");
            }
        });
}

fn source_list(ui: &mut Ui, state: &mut AppState) {
    let mut action = None;

    let reports = state.run.as_ref().map(|r| r.reports.as_slice()).unwrap_or(&[]);
    for (i, src) in state.sources.iter().enumerate() {
        let report = reports.get(i);
        let color = match report.map(|r| r.status()) {
            Some(FileStatus::Ok) => state.colors.color_for(&src.name),
            Some(FileStatus::Empty) => Color32::YELLOW,
            Some(FileStatus::Failed) | None => Color32::RED,
        };

        egui::CollapsingHeader::new(RichText::new(&src.name).strong().color(color))
            .id_salt(("source", i))
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                if let Some(report) = report {
                    ui.label(report.summary());
                    if let Ok(agg) = &report.outcome {
                        ui.weak(format!("time: '{}'", agg.time_column));
                        ui.weak(format!("temperature: '{}'", agg.temperature_column));
                    }
                }
                let mut format = src.format;
                if format_combo(ui, ("format", i), &mut format) {
                    action = Some(SourceAction::SetFormat(i, format));
                }
                if ui.small_button("Remove").clicked() {
                    action = Some(SourceAction::Remove(i));
                }
            });
    }

    for file in &state.unreadable {
        ui.label(RichText::new(format!("✗ {}: {}", file.name, file.error)).color(Color32::RED));
    }

    match action {
        Some(SourceAction::Remove(i)) => state.remove_source(i),
        Some(SourceAction::SetFormat(i, f)) => state.set_source_format(i, f),
        None => {}
    }
}

/// Preset selector. Returns whether the value changed.
fn format_combo(ui: &mut Ui, id: impl std::hash::Hash, format: &mut SourceFormat) -> bool {
    let before = *format;
    egui::ComboBox::from_id_salt(id)
        .selected_text(format.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for preset in SourceFormat::PRESETS {
                ui.selectable_value(format, preset, preset.to_string());
            }
        });
    *format != before
}

// ---------------------------------------------------------------------------
// Central panel – summary, table, chart
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("🌡 Daily Temperature Range Finder");
    ui.label(
        "Open your hourly CSV files and get the list of days where the daily average \
         temperature is between the values you choose.",
    );

    egui::CollapsingHeader::new("CSV format expected (example)")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.code(EXAMPLE_CSV);
            ui.label("• Delimiter: semicolon ';' (or ',' for the international format)");
            ui.label("• Decimals: comma ',' e.g. -4,7 (or '.' for the international format)");
            let zone = state.config.reference_zone.name();
            ui.label(format!(
                "• Time zone: offsets like +02:00 are converted to {zone}; \
                 times without an offset are read as {zone} local time"
            ));
        });
    ui.separator();

    if state.sources.is_empty() {
        ui.label(RichText::new("Open your CSV files to begin.").color(Color32::LIGHT_BLUE));
        return;
    }

    let (Some(summary), Some(result)) = (state.summary(), state.result.as_ref()) else {
        ui.label(
            RichText::new("No valid data could be read from the opened files.")
                .color(Color32::RED)
                .strong(),
        );
        return;
    };

    ui.columns(3, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Days matched", &group_thousands(summary.days_matched));
        metric(
            &mut cols[1],
            "Date range in data",
            &format!("{} → {}", summary.first_date, summary.last_date),
        );
        metric(
            &mut cols[2],
            "Selected range (°C)",
            &format!("{:.1} to {:.1}", summary.selection.0, summary.selection.1),
        );
    });
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Matching days");
        if ui.button("⬇ Save matching days…").clicked() {
            save_result_dialog(state);
        }
    });
    table::matching_days(ui, &result.days);

    ui.add_space(8.0);
    egui::CollapsingHeader::new("Show chart of daily temperatures (full data)")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            plot::daily_plot(ui, state);
        });

    ui.weak(
        "Tip: if your file repeats a 'Daily average temperature' value for each hour, \
         the days are still grouped and the mean value is used.",
    );
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.weak(label);
        ui.label(RichText::new(value).size(22.0));
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                if let Some(paths) = pick_csv_files() {
                    state.open_files(&paths);
                }
                ui.close_menu();
            }
            if ui.button("Save matching days…").clicked() {
                save_result_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(series) = state.series() {
            ui.label(format!(
                "{} files, {} days, {} matching",
                state.sources.len(),
                series.len(),
                state.result.as_ref().map_or(0, |r| r.len())
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn pick_csv_files() -> Option<Vec<PathBuf>> {
    rfd::FileDialog::new()
        .set_title("Open hourly CSV files")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_files()
}

fn save_result_dialog(state: &AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save matching days")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .save_file();

    if let Some(path) = file {
        let saved = state
            .export(&path)
            .with_context(|| format!("saving matching days to {}", path.display()));
        if let Err(e) = saved {
            log::error!("{e:#}");
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("Save failed")
                .set_description(format!("{e:#}"))
                .show();
        }
    }
}
