use eframe::egui;

use ranking_dashboard::config::Config;

use crate::state::AppState;
use crate::ui::{panels, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: Config) -> Self {
        let mut state = AppState::new(config);
        state.refresh();
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Reloads from source once the cached dataset has expired.
        self.state.refresh();
        if let Some(remaining) = self.state.expires_in() {
            ctx.request_repaint_after(remaining);
        }

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

        // ---- Central panel: KPIs and tables ----
        egui::CentralPanel::default().show(ctx, |ui| {
            tables::dashboard(ui, &self.state);
        });
    }
}
