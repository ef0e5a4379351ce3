mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::TempRangeApp;
use eframe::egui;
use temp_range_finder::config::ViewerConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = load_config().unwrap_or_else(|e| {
        log::error!("{e:#}; falling back to default settings");
        ViewerConfig::default()
    });
    log::info!("Reference zone: {}", config.reference_zone.name());

    // Any positional arguments are CSV files to open at start-up.
    let initial_files: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Daily Temperature Range Finder",
        options,
        Box::new(move |_cc| Ok(Box::new(TempRangeApp::new(config, &initial_files)))),
    )
}

fn load_config() -> anyhow::Result<ViewerConfig> {
    ViewerConfig::load().context("loading viewer configuration")
}
