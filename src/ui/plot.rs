use chrono::{Duration, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{HLine, Legend, Line, Plot, PlotPoints};
use temp_range_finder::data::model::DailyAggregate;

use crate::color::COMBINED_COLOR;
use crate::state::AppState;

/// Plot x coordinates are whole days since 1970-01-01.
fn x_origin() -> NaiveDate {
    NaiveDate::default()
}

fn to_x(date: NaiveDate) -> f64 {
    (date - x_origin()).num_days() as f64
}

fn x_label(x: f64) -> String {
    x_origin()
        .checked_add_signed(Duration::days(x.round() as i64))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn points(days: &[DailyAggregate]) -> PlotPoints<'_> {
    days.iter()
        .map(|d| [to_x(d.date), d.mean_temperature])
        .collect()
}

// ---------------------------------------------------------------------------
// Daily temperature chart
// ---------------------------------------------------------------------------

/// Line chart of the full combined series, with the selected range marked.
pub fn daily_plot(ui: &mut Ui, state: &AppState) {
    let Some(series) = state.series() else {
        return;
    };

    Plot::new("daily_plot")
        .height(250.0)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("°C")
        .x_axis_formatter(|mark, _range| x_label(mark.value))
        .label_formatter(|name, value| {
            let prefix = if name.is_empty() { String::new() } else { format!("{name}\n") };
            format!("{prefix}{}\n{:.2} °C", x_label(value.x), value.y)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if state.show_source_series {
                if let Some(run) = &state.run {
                    for report in &run.reports {
                        let Ok(agg) = &report.outcome else { continue };
                        plot_ui.line(
                            Line::new(points(&agg.days))
                                .name(&report.name)
                                .color(state.colors.color_for(&report.name))
                                .width(1.0),
                        );
                    }
                }
            }

            plot_ui.line(
                Line::new(points(series.days()))
                    .name("Daily average")
                    .color(COMBINED_COLOR)
                    .width(1.5),
            );

            let (lo, hi) = state.selection;
            for (label, y) in [("Range min", lo), ("Range max", hi)] {
                plot_ui.hline(HLine::new(y).name(label).color(Color32::LIGHT_GREEN).width(1.0));
            }
        });
}
