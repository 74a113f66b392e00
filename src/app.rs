use eframe::egui;

use crate::data::model::Dataset;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            state: AppState::new(dataset),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title, gender filter, tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: dataset summary ----
        // Read-only: selection changes only come from the top bar.
        egui::SidePanel::left("dataset_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: current view ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::view_panel(ui, &self.state);
        });
    }
}
