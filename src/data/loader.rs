use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::error::LoadError;
use super::model::AbsorptionDataset;

/// Columns every input table must provide: theoretical wavelength and
/// absorption, then experimental wavelength and absorption.
pub const REQUIRED_COLUMNS: usize = 4;

/// Extensions offered by the file dialog.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xlsm", "xls", "ods"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an absorption table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`                      – header row, then numeric rows
/// * `.xlsx` `.xlsm` `.xls` `.ods` – first worksheet, header row, then numeric rows
///
/// Only the first four columns are read; anything to the right is ignored.
pub fn load_file(path: &Path) -> Result<AbsorptionDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)?;
            read_csv(source_name, file)
        }
        "xlsx" | "xlsm" | "xls" | "ods" => load_spreadsheet(source_name, path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: one header row with column names, then one row per
/// measurement.  Empty cells, and short rows missing trailing cells,
/// drop the row from the affected series only.
pub fn read_csv<R: Read>(source_name: String, input: R) -> Result<AbsorptionDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let found = reader.headers()?.len();
    if found < REQUIRED_COLUMNS {
        return Err(LoadError::TooFewColumns { found });
    }

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        // Row 1 is the header.
        let row_no = i + 2;
        let mut cells = [None; REQUIRED_COLUMNS];
        for (col, cell) in cells.iter_mut().enumerate() {
            *cell = parse_text_cell(record.get(col).unwrap_or(""), row_no, col)?;
        }
        rows.push(cells);
    }

    log::debug!("read {} CSV rows from {source_name}", rows.len());
    Ok(AbsorptionDataset::from_rows(source_name, rows))
}

fn parse_text_cell(text: &str, row: usize, column: usize) -> Result<Option<f64>, LoadError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| LoadError::NotANumber {
            row,
            column,
            value: text.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Read the first worksheet of an Excel or OpenDocument workbook.
fn load_spreadsheet(source_name: String, path: &Path) -> Result<AbsorptionDataset, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoWorksheet)??;

    let mut sheet_rows = range.rows();
    let found = sheet_rows.next().map_or(0, |header| header.len());
    if found < REQUIRED_COLUMNS {
        return Err(LoadError::TooFewColumns { found });
    }

    let mut rows = Vec::new();
    for (i, sheet_row) in sheet_rows.enumerate() {
        let row_no = i + 2;
        let mut cells = [None; REQUIRED_COLUMNS];
        for (col, cell) in cells.iter_mut().enumerate() {
            *cell = match sheet_row.get(col) {
                Some(value) => spreadsheet_cell(value, row_no, col)?,
                None => None,
            };
        }
        rows.push(cells);
    }

    log::debug!("read {} spreadsheet rows from {source_name}", rows.len());
    Ok(AbsorptionDataset::from_rows(source_name, rows))
}

fn spreadsheet_cell(cell: &Data, row: usize, column: usize) -> Result<Option<f64>, LoadError> {
    match cell {
        Data::Float(f) => Ok(Some(*f)),
        Data::Int(i) => Ok(Some(*i as f64)),
        Data::Empty => Ok(None),
        Data::String(s) => parse_text_cell(s, row, column),
        other => Err(LoadError::NotANumber {
            row,
            column,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(text: &str) -> Result<AbsorptionDataset, LoadError> {
        read_csv("test.csv".to_string(), text.as_bytes())
    }

    #[test]
    fn reads_four_columns_after_header() {
        let ds = parse(
            "wl_theo,abs_theo,wl_exp,abs_exp\n\
             250,0.5,255,1.0\n\
             300, 0.75 ,305,1.25\n",
        )
        .unwrap();
        assert_eq!(ds.source_name, "test.csv");
        assert_eq!(ds.theoretical.wavelength, vec![250.0, 300.0]);
        assert_eq!(ds.theoretical.absorption, vec![0.5, 0.75]);
        assert_eq!(ds.experimental.wavelength, vec![255.0, 305.0]);
        assert_eq!(ds.experimental.absorption, vec![1.0, 1.25]);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let ds = parse("a,b,c,d,note\n250,0.5,255,1.0,sample A\n").unwrap();
        assert_eq!(ds.theoretical.len(), 1);
        assert_eq!(ds.experimental.len(), 1);
    }

    #[test]
    fn three_columns_fail_fast() {
        let err = parse("wl,abs,wl2\n250,0.5,255\n").unwrap_err();
        assert!(matches!(err, LoadError::TooFewColumns { found: 3 }));
        assert!(err.to_string().contains("at least 4 numeric columns"));
    }

    #[test]
    fn non_numeric_cell_is_reported_with_position() {
        let err = parse("a,b,c,d\n250,0.5,255,1.0\n260,high,265,1.1\n").unwrap_err();
        match err {
            LoadError::NotANumber { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, 1);
                assert_eq!(value, "high");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn shorter_experimental_column_is_allowed() {
        let ds = parse("a,b,c,d\n250,0.5,255,1.0\n260,0.6,,\n270,0.7,,\n").unwrap();
        assert_eq!(ds.theoretical.len(), 3);
        assert_eq!(ds.experimental.len(), 1);
    }

    #[test]
    fn ragged_rows_drop_only_missing_series() {
        let ds = parse("a,b,c,d\n250,0.5,255,1.0\n260,0.6\n").unwrap();
        assert_eq!(ds.theoretical.wavelength, vec![250.0, 260.0]);
        assert_eq!(ds.experimental.wavelength, vec![255.0]);
    }

    #[test]
    fn header_only_gives_empty_series() {
        let ds = parse("a,b,c,d\n").unwrap();
        assert!(ds.theoretical.is_empty());
        assert!(ds.experimental.is_empty());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("spectra.txt")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ref e) if e == "txt"));
    }

    #[test]
    fn loads_csv_from_disk_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Complexes.CSV");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "wl_theo,abs_theo,wl_exp,abs_exp").unwrap();
        writeln!(file, "410,0.42,412,0.38").unwrap();
        drop(file);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.source_name, "Complexes.CSV");
        assert_eq!(ds.theoretical.absorption, vec![0.42]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn reads_first_worksheet_of_workbook() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/absorption.xlsx");
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.source_name, "absorption.xlsx");
        assert_eq!(ds.theoretical.wavelength, vec![250.0, 300.0, 350.0]);
        assert_eq!(ds.theoretical.absorption, vec![0.5, 0.75, 1.5]);
        // Row 3 has no experimental cells.
        assert_eq!(ds.experimental.wavelength, vec![255.0, 355.0]);
        assert_eq!(ds.experimental.absorption, vec![1.0, 1.25]);
    }

    #[test]
    fn spreadsheet_cells_convert_to_numbers() {
        assert_eq!(spreadsheet_cell(&Data::Float(0.25), 2, 1).unwrap(), Some(0.25));
        assert_eq!(spreadsheet_cell(&Data::Int(350), 2, 0).unwrap(), Some(350.0));
        assert_eq!(spreadsheet_cell(&Data::Empty, 2, 3).unwrap(), None);
        assert_eq!(
            spreadsheet_cell(&Data::String(" 1.5 ".into()), 2, 3).unwrap(),
            Some(1.5)
        );
        assert!(matches!(
            spreadsheet_cell(&Data::Bool(true), 4, 2),
            Err(LoadError::NotANumber { row: 4, column: 2, .. })
        ));
    }
}
