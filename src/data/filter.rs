use super::error::NormalizeError;
use super::model::{AbsorptionDataset, Bounds, Series, SeriesKind};

// ---------------------------------------------------------------------------
// Range filter
// ---------------------------------------------------------------------------

/// Keep only the points of `series` inside `bounds`, preserving row order.
pub fn filter_series(series: &Series, bounds: &Bounds) -> Series {
    series
        .points()
        .filter(|&(wl, abs)| bounds.contains(wl, abs))
        .collect()
}

// ---------------------------------------------------------------------------
// Max-normalization
// ---------------------------------------------------------------------------

/// A filtered series divided by its own maximum absorption.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub kind: SeriesKind,
    pub wavelength: Vec<f64>,
    /// Absorption scaled so the largest value is exactly 1.
    pub absorption: Vec<f64>,
    /// The maximum the series was divided by.
    pub raw_max: f64,
}

impl NormalizedSeries {
    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelength
            .iter()
            .copied()
            .zip(self.absorption.iter().copied())
    }
}

/// Divide every absorption value by the series maximum.
///
/// Fails instead of producing NaN/inf when the series is empty or its
/// maximum is not strictly positive.
pub fn normalize(kind: SeriesKind, series: &Series) -> Result<NormalizedSeries, NormalizeError> {
    let max = series
        .max_absorption()
        .ok_or(NormalizeError::EmptySeries(kind))?;
    // `!(max > 0)` also catches NaN.
    if !(max > 0.0) {
        return Err(NormalizeError::NonPositiveMaximum { series: kind, max });
    }

    Ok(NormalizedSeries {
        kind,
        wavelength: series.wavelength.clone(),
        absorption: series.absorption.iter().map(|&a| a / max).collect(),
        raw_max: max,
    })
}

// ---------------------------------------------------------------------------
// Comparison – both series, filtered and normalized independently
// ---------------------------------------------------------------------------

/// Plot-ready output: each series normalized on its own. Lengths may
/// differ, and one series may have failed while the other survived.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub theoretical: Result<NormalizedSeries, NormalizeError>,
    pub experimental: Result<NormalizedSeries, NormalizeError>,
}

impl Comparison {
    pub fn outcome(&self, kind: SeriesKind) -> &Result<NormalizedSeries, NormalizeError> {
        match kind {
            SeriesKind::Theoretical => &self.theoretical,
            SeriesKind::Experimental => &self.experimental,
        }
    }

    /// The normalized series, or `None` if it could not be normalized.
    pub fn series(&self, kind: SeriesKind) -> Option<&NormalizedSeries> {
        self.outcome(kind).as_ref().ok()
    }

    /// Series that can be drawn, theoretical first.
    pub fn plotted(&self) -> impl Iterator<Item = &NormalizedSeries> + '_ {
        SeriesKind::ALL.into_iter().filter_map(move |kind| self.series(kind))
    }

    /// Why a series is missing from the plot.
    pub fn failures(&self) -> impl Iterator<Item = &NormalizeError> + '_ {
        SeriesKind::ALL
            .into_iter()
            .filter_map(move |kind| self.outcome(kind).as_ref().err())
    }
}

/// Filter both series by `bounds` and max-normalize each on its own.
///
/// Fails only when neither series survives; the error then names the
/// theoretical one.
pub fn compare(dataset: &AbsorptionDataset, bounds: &Bounds) -> Result<Comparison, NormalizeError> {
    let comparison = Comparison {
        theoretical: normalize(
            SeriesKind::Theoretical,
            &filter_series(&dataset.theoretical, bounds),
        ),
        experimental: normalize(
            SeriesKind::Experimental,
            &filter_series(&dataset.experimental, bounds),
        ),
    };
    match (&comparison.theoretical, &comparison.experimental) {
        (Err(e), Err(_)) => Err(e.clone()),
        _ => Ok(comparison),
    }
}

// ---------------------------------------------------------------------------
// Per-series summary for the data table
// ---------------------------------------------------------------------------

/// What survived the filter for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub kind: SeriesKind,
    pub total: usize,
    pub kept: usize,
    pub wavelength_span: Option<(f64, f64)>,
    pub raw_max: Option<f64>,
}

pub fn summarize(dataset: &AbsorptionDataset, bounds: &Bounds) -> Vec<SeriesSummary> {
    SeriesKind::ALL
        .iter()
        .map(|&kind| {
            let source = dataset.series(kind);
            let kept = filter_series(source, bounds);
            SeriesSummary {
                kind,
                total: source.len(),
                kept: kept.len(),
                wavelength_span: kept.wavelength_span(),
                raw_max: kept.max_absorption(),
            }
        })
        .collect()
}
