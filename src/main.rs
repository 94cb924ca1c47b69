mod app;
mod state;
mod ui;

use app::DashboardApp;
use clap::Parser;
use eframe::egui;
use ranking_dashboard::config::Config;

fn main() -> eframe::Result {
    env_logger::init();
    let config = Config::parse();
    log::info!(
        "Starting dashboard on {} (cache ttl {}s)",
        config.data.display(),
        config.cache_ttl_secs
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard Avance y Ranking",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the logo images.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(DashboardApp::new(config)))
        }),
    )
}
