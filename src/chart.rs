//! Log-scale population histogram with a density overlay, rendered to PNG.

use crate::constants::MAX_HISTOGRAM_BINS;
use crate::errors::{AppError, AppResult};
use image::{ImageFormat, Rgb, RgbImage};
use std::f64::consts::PI;
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 600;

const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 20;
const MARGIN_BOTTOM: u32 = 40;
const CURVE_SAMPLES: usize = 200;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
const BAR_FILL: Rgb<u8> = Rgb([70, 130, 180]);
const BAR_EDGE: Rgb<u8> = Rgb([35, 75, 110]);
const CURVE: Rgb<u8> = Rgb([200, 60, 40]);

/// Histogram of `log10(population)` over the positive populations.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Left edge of the first bin, in decades.
    pub log_min: f64,
    /// Width of every bin, in decades.
    pub bin_width: f64,
    pub counts: Vec<usize>,
    log_values: Vec<f64>,
}

/// Sturges' rule: `ceil(log2(n)) + 1` bins.
pub fn sturges_bins(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    (n as f64).log2().ceil() as usize + 1
}

impl Histogram {
    /// Bins the positive values on a log10 axis.
    ///
    /// Zero populations cannot be placed on a log axis and are ignored.
    /// `bins == 0` selects [`sturges_bins`]; counts above [`MAX_HISTOGRAM_BINS`]
    /// are clamped to it. Returns `None` when no positive
    /// value is left, in which case there is nothing to draw.
    pub fn from_populations(values: &[u64], bins: usize) -> Option<Self> {
        let log_values: Vec<f64> = values
            .iter()
            .filter(|v| **v > 0)
            .map(|v| (*v as f64).log10())
            .collect();
        if log_values.is_empty() {
            return None;
        }

        let bins = if bins == 0 {
            sturges_bins(log_values.len())
        } else {
            bins
        }
        .min(MAX_HISTOGRAM_BINS);

        let mut lo = log_values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = log_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if hi - lo < f64::EPSILON {
            lo -= 0.5;
            hi += 0.5;
        }
        let bin_width = (hi - lo) / bins as f64;

        let mut counts = vec![0; bins];
        for v in &log_values {
            let idx = (((v - lo) / bin_width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Self {
            log_min: lo,
            bin_width,
            counts,
            log_values,
        })
    }

    /// Number of values placed in the histogram.
    pub fn total(&self) -> usize {
        self.log_values.len()
    }

    /// Right edge of the last bin, in decades.
    pub fn log_max(&self) -> f64 {
        self.log_min + self.bin_width * self.counts.len() as f64
    }

    /// Kernel bandwidth from Scott's rule, falling back to the bin width
    /// when the values have no spread.
    fn bandwidth(&self) -> f64 {
        let n = self.log_values.len() as f64;
        let mean = self.log_values.iter().sum::<f64>() / n;
        let var = if self.log_values.len() > 1 {
            self.log_values
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0)
        } else {
            0.0
        };
        let h = var.sqrt() * n.powf(-0.2);
        if h > 0.0 {
            h
        } else {
            self.bin_width
        }
    }

    /// Gaussian kernel density estimate, scaled to the count axis.
    ///
    /// Returns `samples` evenly spaced `(log10 value, expected count)` points
    /// spanning the histogram range.
    pub fn density_curve(&self, samples: usize) -> Vec<(f64, f64)> {
        let samples = samples.max(2);
        let n = self.log_values.len() as f64;
        let h = self.bandwidth();
        let norm = 1.0 / (n * h * (2.0 * PI).sqrt());
        let scale = n * self.bin_width;
        let (lo, hi) = (self.log_min, self.log_max());

        (0..samples)
            .map(|i| {
                let x = lo + (hi - lo) * i as f64 / (samples - 1) as f64;
                let density: f64 = self
                    .log_values
                    .iter()
                    .map(|xi| (-0.5 * ((x - xi) / h).powi(2)).exp())
                    .sum::<f64>()
                    * norm;
                (x, density * scale)
            })
            .collect()
    }
}

/// Pixel canvas with bounds-checked drawing primitives.
struct Canvas {
    img: RgbImage,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbImage::from_pixel(width, height, BACKGROUND),
        }
    }

    fn set(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.img.width() && (y as u32) < self.img.height() {
            self.img.put_pixel(x as u32, y as u32, color);
        }
    }

    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                self.set(x, y, color);
            }
        }
    }

    fn line(&mut self, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb<u8>) {
        // Bresenham
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

/// Draws the histogram and its density curve into a PNG file.
///
/// No text is rendered: the x axis carries a tick at every whole decade and
/// the y axis has no ticks or labels.
///
/// # Errors
///
/// Returns `InvalidInput` for a canvas too small to hold the plot area,
/// `IoError` if the parent directory cannot be created, and `ChartError` if
/// encoding fails.
pub fn render_png(hist: &Histogram, path: &Path, width: u32, height: u32) -> AppResult<()> {
    if width <= MARGIN_LEFT + MARGIN_RIGHT + 10 || height <= MARGIN_TOP + MARGIN_BOTTOM + 10 {
        return Err(AppError::InvalidInput(format!(
            "Chart size {width}x{height} is too small"
        )));
    }

    let plot_w = f64::from(width - MARGIN_LEFT - MARGIN_RIGHT);
    let plot_h = f64::from(height - MARGIN_TOP - MARGIN_BOTTOM);
    let left = i64::from(MARGIN_LEFT);
    let bottom = i64::from(height - MARGIN_BOTTOM);
    let right = i64::from(width - MARGIN_RIGHT);

    let curve = hist.density_curve(CURVE_SAMPLES);
    let peak = hist
        .counts
        .iter()
        .map(|c| *c as f64)
        .chain(curve.iter().map(|(_, y)| *y))
        .fold(1.0, f64::max);
    let y_max = peak * 1.1;

    let (lo, hi) = (hist.log_min, hist.log_max());
    let x_px = |lx: f64| left + ((lx - lo) / (hi - lo) * plot_w).round() as i64;
    let y_px = |v: f64| bottom - (v / y_max * plot_h).round() as i64;

    let mut canvas = Canvas::new(width, height);

    for (i, count) in hist.counts.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        let x0 = x_px(lo + i as f64 * hist.bin_width);
        let x1 = x_px(lo + (i + 1) as f64 * hist.bin_width);
        let top = y_px(*count as f64);
        canvas.fill_rect(x0, top, x1, bottom, BAR_FILL);
        canvas.line((x0, top), (x1, top), BAR_EDGE);
        canvas.line((x0, top), (x0, bottom), BAR_EDGE);
        canvas.line((x1, top), (x1, bottom), BAR_EDGE);
    }

    for pair in curve.windows(2) {
        let (a, b) = ((x_px(pair[0].0), y_px(pair[0].1)), (x_px(pair[1].0), y_px(pair[1].1)));
        canvas.line(a, b, CURVE);
        canvas.line((a.0, a.1 - 1), (b.0, b.1 - 1), CURVE);
    }

    // Axes, with a tick at every whole decade
    canvas.line((left, bottom), (right, bottom), AXIS);
    canvas.line((left, i64::from(MARGIN_TOP)), (left, bottom), AXIS);
    let mut decade = lo.ceil() as i64;
    while (decade as f64) <= hi {
        let x = x_px(decade as f64);
        canvas.line((x, bottom), (x, bottom + 6), AXIS);
        decade += 1;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    canvas.img.save_with_format(path, ImageFormat::Png)?;

    info!(
        path = %path.display(),
        values = hist.total(),
        bins = hist.counts.len(),
        "Population histogram written"
    );
    Ok(())
}
