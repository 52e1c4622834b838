use eframe::egui::{Align2, FontId, RichText, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoints, Points};

use crate::color::{GRAY, WATERMARK_ALPHA};
use crate::state::AppState;

const MARKER_RADIUS: f32 = 3.0;
const WATERMARK_SIZE: f32 = 36.0;

// ---------------------------------------------------------------------------
// Absorption plot (central panel)
// ---------------------------------------------------------------------------

/// Render the theoretical/experimental scatter comparison.
pub fn absorption_plot(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload a CSV or Excel file to plot  (File → Open…)");
        });
        return;
    }

    let comparison = match &state.comparison {
        Some(Ok(cmp)) => cmp,
        Some(Err(e)) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(RichText::new(format!("No data to plot: {e}")).color(GRAY.to_color32()));
            });
            return;
        }
        None => return,
    };

    let settings = &state.settings;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new(&settings.title).strong());
        // A series that did not survive the bounds is reported in its own colour.
        for e in comparison.failures() {
            let color = settings.series_color(e.series()).to_color32();
            ui.label(RichText::new(format!("No data to plot: {e}")).color(color));
        }
    });

    let response = ui
        .scope(|ui: &mut Ui| {
            // egui_plot paints its background with this colour.
            ui.visuals_mut().extreme_bg_color = settings.background.to_color32();

            Plot::new("absorption_plot")
                .legend(Legend::default())
                .x_axis_label(settings.x_title.clone())
                .y_axis_label(settings.y_title.clone())
                .allow_boxed_zoom(true)
                .allow_drag(true)
                .allow_scroll(true)
                .allow_zoom(true)
                .show(ui, |plot_ui| {
                    for series in comparison.plotted() {
                        let points: PlotPoints = series.points().map(|(x, y)| [x, y]).collect();

                        plot_ui.points(
                            Points::new(points)
                                .name(settings.legend_label(series.kind))
                                .color(settings.series_color(series.kind).to_color32())
                                .shape(MarkerShape::Circle)
                                .filled(true)
                                .radius(MARKER_RADIUS),
                        );
                    }
                })
        })
        .inner;

    if let Some(text) = settings.watermark_text() {
        ui.painter().text(
            response.response.rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(WATERMARK_SIZE),
            GRAY.to_color32_alpha(WATERMARK_ALPHA),
        );
    }
}
