use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::{Rgb, DEFAULT_BACKGROUND, EXPERIMENTAL_COLOR, THEORETICAL_COLOR};
use crate::data::model::{Bounds, SeriesKind};

/// Environment variable naming an optional JSON settings file.
pub const SETTINGS_ENV: &str = "ABSORPTION_GRAPH_SETTINGS";

pub const DEFAULT_X_TITLE: &str = "Wavelength (nm)";
pub const DEFAULT_Y_TITLE: &str = "Absorption";
pub const DEFAULT_TITLE: &str = "Absorption Spectra of the Investigated Complexes";
pub const DEFAULT_EXPORT_DPI: u32 = 1200;

// ---------------------------------------------------------------------------
// PlotSettings – every user-tweakable knob and its default
// ---------------------------------------------------------------------------

/// Startup values for the filter window, figure styling and export.
///
/// Every field is optional in the settings file; missing ones keep the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub bounds: Bounds,
    pub x_title: String,
    pub y_title: String,
    pub title: String,
    pub background: Rgb,
    /// Text drawn faintly across the figure; empty disables it.
    pub watermark: String,
    pub export_dpi: u32,
    /// Where exported images go. `None` means the working directory.
    pub export_dir: Option<PathBuf>,
    /// Label theoretical points "Experimental" and vice versa, the way the
    /// legacy script's legend did.
    pub swap_series_labels: bool,
    /// Export after every parameter change, not only on request.
    pub auto_export: bool,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            x_title: DEFAULT_X_TITLE.to_string(),
            y_title: DEFAULT_Y_TITLE.to_string(),
            title: DEFAULT_TITLE.to_string(),
            background: DEFAULT_BACKGROUND,
            watermark: String::new(),
            export_dpi: DEFAULT_EXPORT_DPI,
            export_dir: None,
            swap_series_labels: false,
            auto_export: false,
        }
    }
}

impl PlotSettings {
    /// Legend text for a series.
    pub fn legend_label(&self, kind: SeriesKind) -> &'static str {
        if self.swap_series_labels {
            kind.other().label()
        } else {
            kind.label()
        }
    }

    /// Marker colour for a series. Colours follow the data, never the label.
    pub fn series_color(&self, kind: SeriesKind) -> Rgb {
        match kind {
            SeriesKind::Theoretical => THEORETICAL_COLOR,
            SeriesKind::Experimental => EXPERIMENTAL_COLOR,
        }
    }

    pub fn watermark_text(&self) -> Option<&str> {
        let text = self.watermark.trim();
        (!text.is_empty()).then_some(text)
    }

    /// Read settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing settings file {}", path.display()))
    }

    /// Settings named by [`SETTINGS_ENV`], or the defaults.
    ///
    /// A broken settings file is logged and ignored so the application
    /// still starts.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(SETTINGS_ENV) else {
            return Self::default();
        };
        let path = PathBuf::from(path);
        match Self::from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings: {e:#}");
                Self::default()
            }
        }
    }
}
