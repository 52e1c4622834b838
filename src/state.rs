use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::PlotSettings;
use crate::data::error::NormalizeError;
use crate::data::filter::{compare, summarize, Comparison, SeriesSummary};
use crate::data::loader::load_file;
use crate::data::model::{AbsorptionDataset, SeriesKind};
use crate::export::export_comparison;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Bounds, titles, colours and export options shown in the side panel.
    pub settings: PlotSettings,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<AbsorptionDataset>,

    /// Filtered, normalized series for the current settings (cached).
    pub comparison: Option<Result<Comparison, NormalizeError>>,

    /// Per-series counts for the summary table (cached).
    pub summaries: Vec<SeriesSummary>,

    /// Load status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Outcome of the last failed export, kept apart from load errors.
    pub export_message: Option<String>,

    /// An auto-export is due once the user stops editing.
    pub pending_export: bool,

    /// Path of the most recent successful export.
    pub last_export: Option<PathBuf>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PlotSettings::default())
    }
}

impl AppState {
    pub fn new(settings: PlotSettings) -> Self {
        Self {
            settings,
            dataset: None,
            comparison: None,
            summaries: Vec::new(),
            status_message: None,
            export_message: None,
            pending_export: false,
            last_export: None,
        }
    }

    /// Load `path` and make it the current dataset.
    ///
    /// On failure the previous dataset stays loaded and the error is shown.
    pub fn open_path(&mut self, path: &Path) {
        let loaded = load_file(path).with_context(|| format!("loading {}", path.display()));
        match loaded {
            Ok(dataset) => {
                log::info!(
                    "Loaded {}: {} theoretical and {} experimental points",
                    dataset.source_name,
                    dataset.theoretical.len(),
                    dataset.experimental.len()
                );
                for kind in SeriesKind::ALL {
                    if dataset.series(kind).is_empty() {
                        log::warn!("{}: no {kind} rows", dataset.source_name);
                    }
                }
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and compute its comparison.
    pub fn set_dataset(&mut self, dataset: AbsorptionDataset) {
        self.dataset = Some(dataset);
        self.status_message = None;
        self.export_message = None;
        self.last_export = None;
        self.settings_changed();
    }

    /// Recompute after any bound or style change. With `auto_export` on,
    /// the figure is only marked for export; see [`Self::flush_pending_export`].
    pub fn settings_changed(&mut self) {
        self.recompute();
        self.pending_export = self.settings.auto_export && self.can_export();
    }

    /// Run a due auto-export unless a widget is still being dragged or typed in.
    pub fn flush_pending_export(&mut self, editing: bool) {
        if self.pending_export && !editing {
            self.pending_export = false;
            self.export();
        }
    }

    /// Re-run filtering and normalization for the current bounds.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            self.comparison = None;
            self.summaries.clear();
            return;
        };
        let bounds = &self.settings.bounds;
        let comparison = compare(ds, bounds);
        match &comparison {
            Ok(cmp) => {
                let kept = |kind| cmp.series(kind).map_or(0, |s| s.len());
                log::debug!(
                    "{bounds:?}: {} theoretical / {} experimental points",
                    kept(SeriesKind::Theoretical),
                    kept(SeriesKind::Experimental)
                );
                for e in cmp.failures() {
                    log::warn!("{bounds:?}: {e}");
                }
            }
            Err(e) => log::warn!("{bounds:?}: {e}"),
        }
        self.summaries = summarize(ds, bounds);
        self.comparison = Some(comparison);
    }

    /// Write the current figure to disk, reporting a failure in `export_message`.
    pub fn export(&mut self) {
        match self.try_export() {
            Ok(path) => {
                self.export_message = None;
                self.last_export = Some(path);
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.export_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }

    fn try_export(&self) -> Result<PathBuf> {
        let ds = self.dataset.as_ref().context("no file loaded")?;
        let cmp = match &self.comparison {
            Some(Ok(cmp)) => cmp,
            Some(Err(e)) => return Err(e.clone()).context("nothing to plot"),
            None => anyhow::bail!("nothing to plot"),
        };
        export_comparison(cmp, &self.settings, &ds.source_name)
    }

    /// Whether there is a plot that could be exported.
    pub fn can_export(&self) -> bool {
        matches!(self.comparison, Some(Ok(_)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn dataset() -> AbsorptionDataset {
        AbsorptionDataset::from_rows(
            "complexes.csv",
            [
                [Some(190.0), Some(0.1), Some(195.0), Some(0.2)],
                [Some(250.0), Some(0.5), Some(255.0), Some(1.0)],
                [Some(610.0), Some(0.9), Some(615.0), Some(1.5)],
            ],
        )
    }

    #[test]
    fn loading_computes_comparison() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        let cmp = state.comparison.as_ref().unwrap().as_ref().unwrap();
        assert_eq!(cmp.series(SeriesKind::Theoretical).unwrap().absorption, vec![1.0]);
        assert_eq!(state.summaries.len(), 2);
        assert!(state.can_export());
    }

    #[test]
    fn narrowing_bounds_surfaces_no_data() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.settings.bounds.max_absorption = 0.05;
        state.settings.bounds.min_wavelength = 0.0;
        state.settings.bounds.max_wavelength = 1000.0;
        state.settings_changed();

        let err = state.comparison.as_ref().unwrap().as_ref().unwrap_err();
        assert_eq!(err.series(), SeriesKind::Theoretical);
        assert!(!state.can_export());
    }

    #[test]
    fn export_without_data_reports_error() {
        let mut state = AppState::default();
        state.export();
        assert!(state.export_message.unwrap().contains("no file loaded"));
        assert!(state.last_export.is_none());
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let narrow = dir.path().join("narrow.csv");
        let mut file = std::fs::File::create(&narrow).unwrap();
        writeln!(file, "wl,abs\n300,0.5").unwrap();
        drop(file);

        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.open_path(&narrow);

        assert_eq!(state.dataset.as_ref().unwrap().source_name, "complexes.csv");
        let msg = state.status_message.unwrap();
        assert!(msg.contains("narrow.csv"));
        assert!(msg.contains("found 2"));
    }

    #[test]
    fn open_path_replaces_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uv.csv");
        std::fs::write(&path, "a,b,c,d\n300,0.4,302,0.8\n350,0.8,352,0.4\n").unwrap();

        let mut state = AppState::default();
        state.open_path(&path);
        assert!(state.status_message.is_none());
        let cmp = state.comparison.unwrap().unwrap();
        assert_eq!(cmp.series(SeriesKind::Theoretical).unwrap().absorption, vec![0.5, 1.0]);
        assert_eq!(cmp.series(SeriesKind::Experimental).unwrap().absorption, vec![1.0, 0.5]);
    }

    #[test]
    fn one_surviving_series_can_still_be_exported() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        // Only the theoretical row at 250 nm stays below 0.6.
        state.settings.bounds.max_absorption = 0.6;
        state.settings_changed();

        let cmp = state.comparison.as_ref().unwrap().as_ref().unwrap();
        assert!(cmp.series(SeriesKind::Theoretical).is_some());
        assert!(cmp.series(SeriesKind::Experimental).is_none());
        assert!(state.can_export());
    }

    fn auto_exporting(dir: &Path) -> AppState {
        AppState::new(PlotSettings {
            export_dpi: 20,
            export_dir: Some(dir.to_path_buf()),
            auto_export: true,
            ..PlotSettings::default()
        })
    }

    #[test]
    fn auto_export_waits_until_editing_stops() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = auto_exporting(dir.path());
        state.set_dataset(dataset());

        // A drag produces many changes; none of them writes a file.
        for step in 0..5 {
            state.settings.bounds.max_wavelength = 600.0 - step as f64;
            state.settings_changed();
            state.flush_pending_export(true);
        }
        assert!(state.pending_export);
        assert!(state.last_export.is_none());

        state.flush_pending_export(false);
        assert!(!state.pending_export);
        let path = state.last_export.clone().unwrap();
        assert_eq!(path, dir.path().join("complexes.jpg"));
        assert!(path.exists());

        // Nothing is written again until the next change.
        std::fs::remove_file(&path).unwrap();
        state.flush_pending_export(false);
        assert!(!path.exists());
    }

    #[test]
    fn auto_export_off_never_schedules() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.settings_changed();
        assert!(!state.pending_export);
    }

    #[test]
    fn successful_export_keeps_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = auto_exporting(dir.path());
        state.set_dataset(dataset());
        state.open_path(&dir.path().join("missing.csv"));
        let load_error = state.status_message.clone().unwrap();

        state.export();
        assert!(state.last_export.is_some());
        assert_eq!(state.status_message, Some(load_error));
        assert!(state.export_message.is_none());
    }

    #[test]
    fn successful_export_clears_previous_export_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = auto_exporting(dir.path());
        state.set_dataset(dataset());

        state.settings.export_dpi = 0;
        state.export();
        assert!(state.export_message.is_some());

        state.settings.export_dpi = 20;
        state.export();
        assert!(state.export_message.is_none());
        assert!(state.last_export.is_some());
    }
}
