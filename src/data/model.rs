use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SeriesKind – which column pair a series came from
// ---------------------------------------------------------------------------

/// The two column pairs of an input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    /// Columns 0 (wavelength) and 1 (absorption).
    Theoretical,
    /// Columns 2 (wavelength) and 3 (absorption).
    Experimental,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 2] = [SeriesKind::Theoretical, SeriesKind::Experimental];

    /// Capitalised name used for legends and tables.
    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::Theoretical => "Theoretical",
            SeriesKind::Experimental => "Experimental",
        }
    }

    /// The other series.
    pub fn other(self) -> SeriesKind {
        match self {
            SeriesKind::Theoretical => SeriesKind::Experimental,
            SeriesKind::Experimental => SeriesKind::Theoretical,
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Theoretical => write!(f, "theoretical"),
            SeriesKind::Experimental => write!(f, "experimental"),
        }
    }
}

// ---------------------------------------------------------------------------
// Series – one wavelength/absorption column pair
// ---------------------------------------------------------------------------

/// Paired wavelength (nm) and absorption values, in file row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub wavelength: Vec<f64>,
    pub absorption: Vec<f64>,
}

impl Series {
    pub fn push(&mut self, wavelength: f64, absorption: f64) {
        self.wavelength.push(wavelength);
        self.absorption.push(absorption);
    }

    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }

    /// Iterate over `(wavelength, absorption)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelength
            .iter()
            .copied()
            .zip(self.absorption.iter().copied())
    }

    /// Largest absorption value, `None` for an empty series.
    pub fn max_absorption(&self) -> Option<f64> {
        self.absorption.iter().copied().reduce(f64::max)
    }

    /// `(min, max)` wavelength, `None` for an empty series.
    pub fn wavelength_span(&self) -> Option<(f64, f64)> {
        let min = self.wavelength.iter().copied().reduce(f64::min)?;
        let max = self.wavelength.iter().copied().reduce(f64::max)?;
        Some((min, max))
    }
}

impl FromIterator<(f64, f64)> for Series {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let mut series = Series::default();
        for (wl, abs) in iter {
            series.push(wl, abs);
        }
        series
    }
}

// ---------------------------------------------------------------------------
// AbsorptionDataset – the loaded file
// ---------------------------------------------------------------------------

/// A loaded input table split into its two series.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsorptionDataset {
    /// File name the data was read from (no directory).
    pub source_name: String,
    pub theoretical: Series,
    pub experimental: Series,
}

impl AbsorptionDataset {
    /// Build a dataset from rows of the first four columns.
    ///
    /// A missing cell drops that row from its own series only; the other
    /// series keeps the row's values.
    pub fn from_rows<I>(source_name: impl Into<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = [Option<f64>; 4]>,
    {
        let mut theoretical = Series::default();
        let mut experimental = Series::default();

        for [t_wl, t_abs, e_wl, e_abs] in rows {
            if let (Some(wl), Some(abs)) = (t_wl, t_abs) {
                theoretical.push(wl, abs);
            }
            if let (Some(wl), Some(abs)) = (e_wl, e_abs) {
                experimental.push(wl, abs);
            }
        }

        AbsorptionDataset {
            source_name: source_name.into(),
            theoretical,
            experimental,
        }
    }

    pub fn series(&self, kind: SeriesKind) -> &Series {
        match kind {
            SeriesKind::Theoretical => &self.theoretical,
            SeriesKind::Experimental => &self.experimental,
        }
    }
}

// ---------------------------------------------------------------------------
// Bounds – the user-selected window
// ---------------------------------------------------------------------------

/// Inclusive wavelength and absorption window applied to both series.
///
/// `min <= max` is not enforced; an inverted window retains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub min_wavelength: f64,
    pub max_wavelength: f64,
    pub min_absorption: f64,
    pub max_absorption: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_wavelength: 200.0,
            max_wavelength: 600.0,
            min_absorption: 0.0,
            max_absorption: 2.0,
        }
    }
}

impl Bounds {
    /// Whether a point lies inside both ranges (inclusive).
    pub fn contains(&self, wavelength: f64, absorption: f64) -> bool {
        (self.min_wavelength..=self.max_wavelength).contains(&wavelength)
            && (self.min_absorption..=self.max_absorption).contains(&absorption)
    }
}
