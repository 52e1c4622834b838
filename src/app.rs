use eframe::egui;

use crate::config::PlotSettings;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AbsorptionGraphApp {
    pub state: AppState,
}

impl AbsorptionGraphApp {
    pub fn new(settings: PlotSettings) -> Self {
        Self {
            state: AppState::new(settings),
        }
    }
}

impl eframe::App for AbsorptionGraphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: bounds and styling ----
        egui::SidePanel::left("settings_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: filtered data summary ----
        egui::TopBottomPanel::bottom("summary_panel")
            .resizable(false)
            .show(ctx, |ui| {
                panels::summary_table(ui, &self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::absorption_plot(ui, &self.state);
        });

        // Auto-export once a drag is released or a text field loses focus.
        let editing = ctx.input(|i| i.pointer.any_down()) || ctx.memory(|m| m.focused().is_some());
        self.state.flush_pending_export(editing);
        if self.state.pending_export {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }
}
