use eframe::egui::{self, Color32, DragValue, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::loader::SUPPORTED_EXTENSIONS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – bounds and styling
// ---------------------------------------------------------------------------

/// Render the settings panel. Any edit triggers one recompute.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Settings");
    ui.separator();

    let mut changed = false;
    let settings = &mut state.settings;

    ui.strong("Wavelength (nm)");
    egui::Grid::new("wavelength_bounds")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Minimum");
            changed |= ui
                .add(DragValue::new(&mut settings.bounds.min_wavelength).speed(1.0))
                .changed();
            ui.end_row();
            ui.label("Maximum");
            changed |= ui
                .add(DragValue::new(&mut settings.bounds.max_wavelength).speed(1.0))
                .changed();
            ui.end_row();
        });

    ui.add_space(4.0);
    ui.strong("Absorption");
    egui::Grid::new("absorption_bounds")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Minimum");
            changed |= ui
                .add(DragValue::new(&mut settings.bounds.min_absorption).speed(0.01))
                .changed();
            ui.end_row();
            ui.label("Maximum");
            changed |= ui
                .add(DragValue::new(&mut settings.bounds.max_absorption).speed(0.01))
                .changed();
            ui.end_row();
        });

    if settings.bounds.min_wavelength > settings.bounds.max_wavelength
        || settings.bounds.min_absorption > settings.bounds.max_absorption
    {
        ui.label(RichText::new("Minimum is above maximum").color(Color32::YELLOW));
    }

    ui.separator();
    ui.strong("Figure");
    egui::Grid::new("figure_style")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Title");
            changed |= ui.text_edit_singleline(&mut settings.title).changed();
            ui.end_row();
            ui.label("X axis");
            changed |= ui.text_edit_singleline(&mut settings.x_title).changed();
            ui.end_row();
            ui.label("Y axis");
            changed |= ui.text_edit_singleline(&mut settings.y_title).changed();
            ui.end_row();
            ui.label("Background");
            changed |= ui.color_edit_button_srgb(&mut settings.background.0).changed();
            ui.end_row();
            ui.label("Watermark");
            changed |= ui.text_edit_singleline(&mut settings.watermark).changed();
            ui.end_row();
        });

    changed |= ui
        .checkbox(&mut settings.swap_series_labels, "Legacy legend (swap labels)")
        .on_hover_text("Label theoretical points \"Experimental\" and vice versa")
        .changed();

    ui.separator();
    ui.strong("Export");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("DPI");
        ui.add(DragValue::new(&mut settings.export_dpi).range(72..=2400));
    });
    changed |= ui
        .checkbox(&mut settings.auto_export, "Export on every change")
        .changed();

    if changed {
        state.settings_changed();
    }

    if ui
        .add_enabled(state.can_export(), egui::Button::new("Export image"))
        .clicked()
    {
        state.export();
    }
    if let Some(path) = &state.last_export {
        ui.label(format!("Saved {}", path.display()));
    }
}

// ---------------------------------------------------------------------------
// Bottom panel – filtered data summary
// ---------------------------------------------------------------------------

/// Per-series table of how much data survives the current bounds.
pub fn summary_table(ui: &mut Ui, state: &AppState) {
    if state.summaries.is_empty() {
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(100.0))
        .columns(Column::auto().at_least(90.0), 3)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["Series", "Points kept", "Legend", "Wavelength span", "Max absorption"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for summary in &state.summaries {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(
                            RichText::new(summary.kind.label())
                                .color(state.settings.series_color(summary.kind).to_color32()),
                        );
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{} / {}", summary.kept, summary.total));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(state.settings.legend_label(summary.kind));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(match summary.wavelength_span {
                            Some((lo, hi)) => format!("{lo:.1} – {hi:.1} nm"),
                            None => "–".to_string(),
                        });
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(match summary.raw_max {
                            Some(max) => format!("{max:.4}"),
                            None => "–".to_string(),
                        });
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.can_export(), egui::Button::new("Export image"))
                .clicked()
            {
                state.export();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{}: {} theoretical, {} experimental points",
                ds.source_name,
                ds.theoretical.len(),
                ds.experimental.len()
            ));
        }

        for msg in [&state.status_message, &state.export_message].into_iter().flatten() {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload absorption data")
        .add_filter("Supported files", SUPPORTED_EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx", "xlsm", "xls"])
        .add_filter("OpenDocument", &["ods"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
