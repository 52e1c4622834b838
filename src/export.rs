use std::fs::File;
use std::io::BufWriter;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

use crate::color::{GRAY, GRID_ALPHA, WATERMARK_ALPHA};
use crate::config::PlotSettings;
use crate::data::filter::Comparison;

/// Figure size in inches, the usual 4:3 plotting default.
pub const FIGURE_SIZE_IN: (f64, f64) = (6.4, 4.8);
pub const IMAGE_EXTENSION: &str = "jpg";
pub const JPEG_QUALITY: u8 = 95;

/// Font sizes in points; converted to pixels at the export DPI.
const TITLE_PT: f64 = 16.0;
const AXIS_TITLE_PT: f64 = 14.0;
const LEGEND_PT: f64 = 12.0;
const TICK_PT: f64 = 10.0;
const WATERMARK_PT: f64 = 36.0;
const MARKER_RADIUS_PT: f64 = 2.2;

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// `spectra.final.csv` → `spectra.jpg`: everything up to the first dot.
pub fn export_file_name(source_name: &str) -> String {
    let base = source_name.split('.').next().unwrap_or("");
    let base = if base.is_empty() { "absorption" } else { base };
    format!("{base}.{IMAGE_EXTENSION}")
}

pub fn export_path(settings: &PlotSettings, source_name: &str) -> PathBuf {
    let dir = settings
        .export_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(export_file_name(source_name))
}

/// Pixel size of the exported figure at `dpi`.
pub fn figure_pixels(dpi: u32) -> (u32, u32) {
    let (w, h) = FIGURE_SIZE_IN;
    (
        (w * dpi as f64).round() as u32,
        (h * dpi as f64).round() as u32,
    )
}

// ---------------------------------------------------------------------------
// Figure – an RGB buffer plus the drawing area that paints into it
// ---------------------------------------------------------------------------

/// Owns the pixel buffer for one exported figure.
///
/// The drawing area only lives inside [`Figure::draw`], which always
/// presents it before returning, whether drawing succeeded or not.
struct Figure {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Figure {
    fn new(dpi: u32) -> Self {
        let (width, height) = figure_pixels(dpi);
        Self {
            width,
            height,
            buffer: vec![0; width as usize * height as usize * 3],
        }
    }

    fn draw<F>(&mut self, paint: F) -> Result<()>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
    {
        let root =
            BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height)).into_drawing_area();
        let painted = paint(&root);
        let flushed = root.present().context("flushing figure buffer");
        painted?;
        flushed
    }

    fn into_image(self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.buffer)
            .context("figure buffer does not match its dimensions")
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Render `comparison` with `settings` and write it as a JPEG next to
/// the other exports. Returns the written path.
pub fn export_comparison(
    comparison: &Comparison,
    settings: &PlotSettings,
    source_name: &str,
) -> Result<PathBuf> {
    let dpi = settings.export_dpi;
    if dpi == 0 {
        bail!("export DPI must be positive");
    }

    let path = export_path(settings, source_name);
    if let Some(dir) = &settings.export_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating export directory {}", dir.display()))?;
    }

    let mut figure = Figure::new(dpi);
    log::debug!(
        "rendering {}x{} px figure at {dpi} dpi",
        figure.width,
        figure.height
    );
    figure.draw(|root| draw_comparison(root, comparison, settings, dpi as f64 / 72.0))?;

    encode_jpeg(&figure.into_image()?, dpi, &path)?;
    log::info!("Exported figure to {}", path.display());
    Ok(path)
}

fn encode_jpeg(image: &RgbImage, dpi: u32, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    encoder.set_pixel_density(PixelDensity::dpi(u16::try_from(dpi).unwrap_or(u16::MAX)));
    encoder
        .encode_image(image)
        .with_context(|| format!("encoding {}", path.display()))
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Axis ranges covering both series with a 5 % margin on each side.
pub fn axis_ranges(comparison: &Comparison) -> (Range<f64>, Range<f64>) {
    let all = move || comparison.plotted().flat_map(|series| series.points());
    let (x_min, x_max) = min_max(all().map(|(x, _)| x));
    let (y_min, y_max) = min_max(all().map(|(_, y)| y));
    (padded(x_min, x_max), padded(y_min, y_max))
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn padded(min: f64, max: f64) -> Range<f64> {
    let span = max - min;
    let pad = if span > f64::EPSILON {
        span * 0.05
    } else {
        (min.abs() * 0.05).max(0.05)
    };
    (min - pad)..(max + pad)
}

fn draw_comparison(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    comparison: &Comparison,
    settings: &PlotSettings,
    px_per_pt: f64,
) -> Result<()> {
    let px = |pt: f64| pt * px_per_pt;
    let grid = GRAY.to_plotters();

    root.fill(&WHITE)?;

    let (x_range, y_range) = axis_ranges(comparison);
    let mut chart = ChartBuilder::on(root)
        .caption(
            &settings.title,
            ("sans-serif", px(TITLE_PT), FontStyle::Bold),
        )
        .margin(px(12.0) as u32)
        .x_label_area_size(px(40.0) as u32)
        .y_label_area_size(px(48.0) as u32)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .plotting_area()
        .fill(&settings.background.to_plotters())?;

    chart
        .configure_mesh()
        .x_desc(settings.x_title.as_str())
        .y_desc(settings.y_title.as_str())
        .axis_desc_style(("sans-serif", px(AXIS_TITLE_PT)))
        .label_style(("sans-serif", px(TICK_PT)))
        .bold_line_style(grid.mix(GRID_ALPHA))
        .light_line_style(grid.mix(GRID_ALPHA / 3.0))
        .draw()?;

    let radius = px(MARKER_RADIUS_PT).max(1.0) as i32;
    for series in comparison.plotted() {
        let color = settings.series_color(series.kind).to_plotters();
        chart
            .draw_series(
                series
                    .points()
                    .map(|p| Circle::new(p, radius, color.filled())),
            )?
            .label(settings.legend_label(series.kind))
            .legend(move |(x, y)| Circle::new((x, y), radius, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", px(LEGEND_PT)))
        .draw()?;

    if let Some(text) = settings.watermark_text() {
        let (w, h) = root.dim_in_pixel();
        let faint = grid.mix(WATERMARK_ALPHA);
        let style = TextStyle::from(("sans-serif", px(WATERMARK_PT)).into_font())
            .color(&faint)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(text, (w as i32 / 2, h as i32 / 2), style))?;
    }

    Ok(())
}
