use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct CohortApp {
    pub state: AppState,
}

impl eframe::App for CohortApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart or record table ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Chart => plot::group_chart(ui, &self.state),
            View::Records => table::record_table(ui, &self.state),
        });
    }
}
