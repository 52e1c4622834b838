mod app;
mod color;
mod config;
mod data;
mod export;
mod state;
mod ui;

use app::AbsorptionGraphApp;
use config::PlotSettings;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = PlotSettings::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Absorption Graph",
        options,
        Box::new(|_cc| Ok(Box::new(AbsorptionGraphApp::new(settings)))),
    )
}
