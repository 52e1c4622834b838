use thiserror::Error;

use super::model::SeriesKind;

/// Failures while turning an input file into an [`AbsorptionDataset`].
///
/// [`AbsorptionDataset`]: super::model::AbsorptionDataset
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0} (expected .csv, .xlsx, .xlsm, .xls or .ods)")]
    UnsupportedExtension(String),

    #[error(
        "expected at least 4 numeric columns \
         (theoretical wavelength/absorption, experimental wavelength/absorption), found {found}"
    )]
    TooFewColumns { found: usize },

    /// `row` is 1-based and counts the header, so it matches what a spreadsheet shows.
    #[error("row {row}, column {column}: '{value}' is not a number")]
    NotANumber {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("spreadsheet has no worksheets")]
    NoWorksheet,

    #[error("reading CSV")]
    Csv(#[from] csv::Error),

    #[error("reading spreadsheet")]
    Spreadsheet(#[from] calamine::Error),

    #[error("reading file")]
    Io(#[from] std::io::Error),
}

/// Max-normalization cannot produce a meaningful series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("no {0} data points fall inside the selected bounds")]
    EmptySeries(SeriesKind),

    #[error("{series} absorption maximum is {max}, cannot normalize")]
    NonPositiveMaximum { series: SeriesKind, max: f64 },
}

impl NormalizeError {
    pub fn series(&self) -> SeriesKind {
        match self {
            NormalizeError::EmptySeries(kind) => *kind,
            NormalizeError::NonPositiveMaximum { series, .. } => *series,
        }
    }
}
