//! Diagnostic figures.
//!
//! Figures are plain data built from the fitted run; [`render`] turns them
//! into drawing commands for any plotters backend and [`sink`] decides where
//! the result goes (files, memory, or nowhere).

pub mod render;
pub mod sink;

use plotters::style::RGBColor;

use crate::color::generate_palette;
use crate::regression::metrics::residuals;
use crate::regression::CorrelationMatrix;

pub use render::TextMode;
pub use sink::{BufferSink, NullSink, PlotSink, PngFileSink, SvgFileSink, SvgStringSink};

/// Guide drawn behind a scatter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceLine {
    /// `y = x`, for actual-vs-predicted panels.
    Identity,
    /// `y = 0`, for residual panels.
    Zero,
}

#[derive(Debug, Clone)]
pub struct ScatterPanel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub reference: ReferenceLine,
}

impl ScatterPanel {
    /// Axis ranges with a small margin. Identity panels share one range on
    /// both axes so the reference line is the diagonal; residual panels
    /// always include zero.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let xs = self.points.iter().map(|p| p.0);
        let ys = self.points.iter().map(|p| p.1);
        match self.reference {
            ReferenceLine::Identity => {
                let both = padded(min_max(xs.chain(ys)));
                (both, both)
            }
            ReferenceLine::Zero => {
                let (lo, hi) = min_max(ys);
                (padded(min_max(xs)), padded((lo.min(0.0), hi.max(0.0))))
            }
        }
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    if !(lo.is_finite() && hi.is_finite()) {
        return (-1.0, 1.0);
    }
    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    (lo - pad, hi + pad)
}

/// The 2×2 grid: actual-vs-predicted and residuals, for train and test.
#[derive(Debug, Clone)]
pub struct DiagnosticFigure {
    /// Row-major: train fit, test fit, train residuals, test residuals.
    pub panels: Vec<ScatterPanel>,
}

/// Actual and predicted values of one subset.
#[derive(Debug, Clone, Copy)]
pub struct FitSeries<'a> {
    pub actual: &'a [f64],
    pub predicted: &'a [f64],
    pub r2: f64,
}

impl DiagnosticFigure {
    pub fn new(train: FitSeries<'_>, test: FitSeries<'_>) -> Self {
        let colors = generate_palette(2);
        let subsets = [("Training", train, colors[0]), ("Testing", test, colors[1])];
        let mut panels = Vec::with_capacity(4);
        for (label, series, color) in subsets {
            panels.push(ScatterPanel {
                title: format!("{label}: Actual vs Predicted (R² = {:.4})", series.r2),
                x_label: "Actual Values".to_string(),
                y_label: "Predicted Values".to_string(),
                points: series
                    .actual
                    .iter()
                    .copied()
                    .zip(series.predicted.iter().copied())
                    .collect(),
                color,
                reference: ReferenceLine::Identity,
            });
        }
        for (label, series, color) in subsets {
            let res = residuals(series.actual, series.predicted);
            panels.push(ScatterPanel {
                title: format!("{label}: Residuals Plot"),
                x_label: "Predicted Values".to_string(),
                y_label: "Residuals".to_string(),
                points: series.predicted.iter().copied().zip(res).collect(),
                color,
                reference: ReferenceLine::Zero,
            });
        }
        DiagnosticFigure { panels }
    }
}

#[derive(Debug, Clone)]
pub struct HeatmapFigure {
    pub title: String,
    pub matrix: CorrelationMatrix,
}

impl HeatmapFigure {
    pub fn new(matrix: CorrelationMatrix) -> Self {
        HeatmapFigure {
            title: "Feature Correlation Matrix".to_string(),
            matrix,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Figure {
    Diagnostics(DiagnosticFigure),
    Correlation(HeatmapFigure),
}

impl Figure {
    /// Stable short name, used in file names.
    pub fn name(&self) -> &'static str {
        match self {
            Figure::Diagnostics(_) => "diagnostics",
            Figure::Correlation(_) => "correlation",
        }
    }

    /// Canvas size in pixels.
    pub fn size(&self) -> (u32, u32) {
        match self {
            Figure::Diagnostics(_) => (1500, 1200),
            Figure::Correlation(_) => (1000, 800),
        }
    }
}
