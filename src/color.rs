use std::fmt;
use std::str::FromStr;

use eframe::egui::Color32;
use palette::Srgb;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Fixed figure colours
// ---------------------------------------------------------------------------

/// Default plot-area background, a pale cream.
pub const DEFAULT_BACKGROUND: Rgb = Rgb([0xFF, 0xF1, 0xD7]);
/// Theoretical series markers.
pub const THEORETICAL_COLOR: Rgb = Rgb([0xFF, 0x00, 0x00]);
/// Experimental series markers.
pub const EXPERIMENTAL_COLOR: Rgb = Rgb([0x00, 0x80, 0x00]);
/// Grid lines and watermark text.
pub const GRAY: Rgb = Rgb([0x80, 0x80, 0x80]);

pub const GRID_ALPHA: f64 = 0.3;
pub const WATERMARK_ALPHA: f64 = 0.3;

#[derive(Debug, Error)]
#[error("'{0}' is not a hex colour such as #FFF1D7")]
pub struct ColorError(String);

// ---------------------------------------------------------------------------
// Rgb – an opaque sRGB colour shared by the egui view and the exporter
// ---------------------------------------------------------------------------

/// Opaque 8-bit sRGB colour, (de)serialised as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Parse `#RRGGBB`, `RRGGBB` or the short `#RGB` form.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let parsed: Srgb<u8> = Srgb::from_str(s.trim()).map_err(|_| ColorError(s.to_string()))?;
        Ok(Rgb([parsed.red, parsed.green, parsed.blue]))
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    pub fn to_color32(self) -> Color32 {
        let [r, g, b] = self.0;
        Color32::from_rgb(r, g, b)
    }

    /// Same colour with straight (non-premultiplied) alpha in `0.0..=1.0`.
    pub fn to_color32_alpha(self, alpha: f64) -> Color32 {
        let [r, g, b] = self.0;
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    pub fn to_plotters(self) -> RGBColor {
        let [r, g, b] = self.0;
        RGBColor(r, g, b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        DEFAULT_BACKGROUND
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_background() {
        assert_eq!(Rgb::from_hex("#FFF1D7").unwrap(), DEFAULT_BACKGROUND);
        assert_eq!(Rgb::from_hex("fff1d7").unwrap(), DEFAULT_BACKGROUND);
    }

    #[test]
    fn hex_round_trips_upper_case() {
        assert_eq!(Rgb([0, 128, 255]).to_hex(), "#0080FF");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Rgb::from_hex("beige").is_err());
        assert!(Rgb::from_hex("#12345").is_err());
    }

    #[test]
    fn alpha_is_scaled_to_byte() {
        assert_eq!(GRAY.to_color32_alpha(0.5).a(), 128);
        assert_eq!(GRAY.to_color32_alpha(2.0).a(), 255);
    }
}
