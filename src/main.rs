use std::path::Path;

use anyhow::{anyhow, Context};
use eframe::egui;

use student_dashboard::app::DashboardApp;
use student_dashboard::data::loader::load_file;
use student_dashboard::layout::TITLE;

/// Dataset location, relative to the working directory.
const DATA_PATH: &str = "student_performance_dataset.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // The window only opens once a valid dataset is in memory.
    let dataset = load_file(Path::new(DATA_PATH))
        .inspect_err(|e| log::error!("Failed to load {DATA_PATH}: {e}"))
        .with_context(|| format!("loading {DATA_PATH}"))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(dataset)))),
    )
    .map_err(|e| anyhow!("failed to start the dashboard window: {e}"))
}
