//! Histogram presentation
//!
//! Binning is a plain function of the data so it can be tested on its own;
//! drawing goes through `plotters` with its SVG backend.

use crate::error::{AppError, Result};
use crate::models::Stats;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::{
    ChartBuilder, Color, IntoDrawingArea, IntoFont, Rectangle, RGBColor, SVGBackend, Text, TextStyle, BLACK,
    WHITE,
};
use std::path::Path;

const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
const BOX_COLOR: RGBColor = RGBColor(245, 222, 179);
const BOX_PADDING: i32 = 8;
const LINE_SPACING: i32 = 4;

/// Equal-width bin counts over the measurement range
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Left edge of the first bin
    pub lower: f64,
    /// Width of every bin
    pub bin_width: f64,
    /// Number of measurements per bin
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `measurements` into `bins` equal-width bins over `[min, max]`.
    ///
    /// The last bin is closed, so the maximum lands in it. When every
    /// value is the same a single bin of width 1 centred on it is used.
    pub fn from_measurements(measurements: &[f64], bins: usize) -> Result<Self> {
        if measurements.is_empty() {
            return Err(AppError::render("Nothing to plot: no measurements"));
        }
        if bins == 0 {
            return Err(AppError::render("Histogram needs at least one bin"));
        }
        if measurements.iter().any(|v| !v.is_finite()) {
            return Err(AppError::render("Cannot plot non-finite measurements"));
        }

        let min = measurements.iter().copied().fold(f64::INFINITY, f64::min);
        let max = measurements.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if min == max {
            return Ok(Self {
                lower: min - 0.5,
                bin_width: 1.0,
                counts: vec![measurements.len()],
            });
        }

        let bin_width = (max - min) / bins as f64;
        let mut counts = vec![0; bins];
        for &value in measurements {
            let index = (((value - min) / bin_width) as usize).min(bins - 1);
            counts[index] += 1;
        }

        Ok(Self {
            lower: min,
            bin_width,
            counts,
        })
    }

    /// Right edge of the last bin
    pub fn upper(&self) -> f64 {
        self.lower + self.bin_width * self.counts.len() as f64
    }

    /// Edges of bin `index`
    pub fn bin_range(&self, index: usize) -> (f64, f64) {
        let start = self.lower + self.bin_width * index as f64;
        (start, start + self.bin_width)
    }

    /// Largest bin count
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Sum of all bin counts
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Draws the latency histogram to an SVG file
#[derive(Debug, Clone)]
pub struct HistogramRenderer {
    bins: usize,
    size: (u32, u32),
}

impl HistogramRenderer {
    /// Renderer using `bins` bins at the default size
    pub fn new(bins: usize) -> Self {
        Self {
            bins,
            size: (1024, 768),
        }
    }

    /// Change the image size in pixels
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Render the histogram of `measurements` with the `stats` overlays
    pub fn render(&self, path: &Path, measurements: &[f64], stats: &Stats) -> Result<()> {
        let histogram = Histogram::from_measurements(measurements, self.bins)?;
        let root = SVGBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| render_error(path, e))?;

        let y_top = histogram.max_count() as u32 + 1;
        let mut chart = ChartBuilder::on(&root)
            .caption("Latency Histogram", ("sans-serif", 28).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(histogram.lower..histogram.upper(), 0u32..y_top)
            .map_err(|e| render_error(path, e))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Latency (ms)")
            .y_desc("Frequency")
            .draw()
            .map_err(|e| render_error(path, e))?;

        chart
            .draw_series(histogram.counts.iter().enumerate().map(|(index, &count)| {
                let (start, end) = histogram.bin_range(index);
                Rectangle::new([(start, 0u32), (end, count as u32)], BAR_COLOR.mix(0.8).filled())
            }))
            .map_err(|e| render_error(path, e))?;

        let (x_pixels, y_pixels) = chart.plotting_area().get_pixel_range();
        let text_style: TextStyle = ("sans-serif", 18).into_font().color(&BLACK);

        let left_lines = [
            format!("min = {:.2}", stats.min),
            format!("max = {:.2}", stats.max),
            format!("median = {:.2}", stats.median),
        ];
        let right_lines = [
            format!("\u{3bc} = {:.2}", stats.mean),
            format!("\u{3c3} = {:.2}", stats.std_dev),
        ];

        let left_size = Self::text_block_size(&root, &left_lines, &text_style)?;
        let right_size = Self::text_block_size(&root, &right_lines, &text_style)?;

        let top = y_pixels.start + BOX_PADDING;
        let left_origin = (x_pixels.start + BOX_PADDING, top);
        let right_origin = (x_pixels.end - BOX_PADDING - right_size.0, top);

        for (origin, size, lines) in [
            (left_origin, left_size, &left_lines[..]),
            (right_origin, right_size, &right_lines[..]),
        ] {
            let corner = (origin.0 + size.0, origin.1 + size.1);
            root.draw(&Rectangle::new([origin, corner], BOX_COLOR.mix(0.5).filled()))
                .map_err(|e| render_error(path, e))?;
            root.draw(&Rectangle::new([origin, corner], BLACK.mix(0.3).stroke_width(1)))
                .map_err(|e| render_error(path, e))?;

            let mut y = origin.1 + BOX_PADDING;
            for line in lines {
                root.draw(&Text::new(line.clone(), (origin.0 + BOX_PADDING, y), text_style.clone()))
                    .map_err(|e| render_error(path, e))?;
                let (_, height) = root.estimate_text_size(line, &text_style).map_err(|e| render_error(path, e))?;
                y += height as i32 + LINE_SPACING;
            }
        }

        root.present().map_err(|e| render_error(path, e))?;
        Ok(())
    }

    /// Padded width and height of a block of text lines
    fn text_block_size(
        area: &DrawingArea<SVGBackend<'_>, Shift>,
        lines: &[String],
        style: &TextStyle,
    ) -> Result<(i32, i32)> {
        let mut width = 0;
        let mut height = 0;
        for line in lines {
            let (w, h) = area
                .estimate_text_size(line, style)
                .map_err(|e| AppError::render(format!("Failed to measure text: {}", e)))?;
            width = width.max(w as i32);
            height += h as i32 + LINE_SPACING;
        }
        Ok((width + 2 * BOX_PADDING, height - LINE_SPACING + 2 * BOX_PADDING))
    }
}

fn render_error(path: &Path, error: impl std::fmt::Display) -> AppError {
    AppError::render(format!("Failed to draw {}: {}", path.display(), error))
}

/// Open `path` with the platform's default viewer
pub fn show_histogram(path: &Path) -> Result<()> {
    opener::open(path).map_err(|e| AppError::render(format!("Could not open {}: {}", path.display(), e)))
}
