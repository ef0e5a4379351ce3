use std::path::PathBuf;

use eframe::egui;
use temp_range_finder::config::ViewerConfig;
use temp_range_finder::data::pipeline::Source;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TempRangeApp {
    pub state: AppState,
}

impl TempRangeApp {
    /// Build the app, opening `initial_files` (from the command line) if any.
    pub fn new(config: ViewerConfig, initial_files: &[PathBuf]) -> Self {
        let mut state = AppState::new(config);
        if !initial_files.is_empty() {
            state.open_files(initial_files);
        }
        Self { state }
    }
}

impl eframe::App for TempRangeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Dropped files join the current session ----
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let mut paths = Vec::new();
        for file in dropped {
            match (file.path, file.bytes) {
                (Some(path), _) => paths.push(path),
                (None, Some(bytes)) => {
                    let source = Source::new(file.name, bytes, self.state.import_format);
                    self.state.add_source(source);
                }
                (None, None) => log::warn!("Ignoring dropped item '{}' without content", file.name),
            }
        }
        if !paths.is_empty() {
            self.state.add_files(&paths);
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: inputs + range ----
        egui::SidePanel::left("input_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: summary, table, chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                panels::central_panel(ui, &self.state);
            });
        });
    }
}
