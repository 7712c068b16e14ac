use std::path::{Path, PathBuf};

use image::RgbImage;
use plotters::prelude::*;

use crate::error::{RegressionError, Result};

use super::render::{draw_figure, TextMode};
use super::Figure;

/// Destination for rendered figures.
pub trait PlotSink {
    fn render(&mut self, figure: &Figure) -> Result<()>;
}

fn plot_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RegressionError {
    RegressionError::Plot(e.to_string())
}

fn figure_path(dir: &Path, prefix: &str, figure: &Figure, ext: &str) -> PathBuf {
    dir.join(format!("{prefix}_{}.{ext}", figure.name()))
}

// ---------------------------------------------------------------------------
// File sinks
// ---------------------------------------------------------------------------

/// Writes `<dir>/<prefix>_<figure>.svg`.
#[derive(Debug)]
pub struct SvgFileSink {
    dir: PathBuf,
    prefix: String,
    written: Vec<PathBuf>,
}

impl SvgFileSink {
    /// Creates `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>, prefix: &str) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            prefix: prefix.to_string(),
            written: Vec::new(),
        })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PlotSink for SvgFileSink {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        let path = figure_path(&self.dir, &self.prefix, figure, "svg");
        {
            let root = SVGBackend::new(&path, figure.size()).into_drawing_area();
            draw_figure(&root, figure, TextMode::Full).map_err(plot_err)?;
        }
        log::info!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Writes `<dir>/<prefix>_<figure>.png`.
#[derive(Debug)]
pub struct PngFileSink {
    dir: PathBuf,
    prefix: String,
    written: Vec<PathBuf>,
}

impl PngFileSink {
    /// Creates `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>, prefix: &str) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            prefix: prefix.to_string(),
            written: Vec::new(),
        })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PlotSink for PngFileSink {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        let path = figure_path(&self.dir, &self.prefix, figure, "png");
        {
            let root = BitMapBackend::new(&path, figure.size()).into_drawing_area();
            draw_figure(&root, figure, TextMode::for_bitmap()).map_err(plot_err)?;
        }
        log::info!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory sinks
// ---------------------------------------------------------------------------

/// Keeps each figure as an SVG document.
#[derive(Debug, Default)]
pub struct SvgStringSink {
    pub documents: Vec<(String, String)>,
}

impl SvgStringSink {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.documents
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, doc)| doc.as_str())
    }
}

impl PlotSink for SvgStringSink {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        let mut document = String::new();
        {
            let root = SVGBackend::with_string(&mut document, figure.size()).into_drawing_area();
            draw_figure(&root, figure, TextMode::Full).map_err(plot_err)?;
        }
        self.documents.push((figure.name().to_string(), document));
        Ok(())
    }
}

/// Rasterizes each figure into an RGB image buffer. Text is only drawn when
/// the `ttf` feature is enabled.
#[derive(Debug, Default)]
pub struct BufferSink {
    pub images: Vec<(String, RgbImage)>,
}

impl PlotSink for BufferSink {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        let (w, h) = figure.size();
        let mut pixels = vec![0u8; w as usize * h as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (w, h)).into_drawing_area();
            draw_figure(&root, figure, TextMode::for_bitmap()).map_err(plot_err)?;
        }
        let image = RgbImage::from_raw(w, h, pixels)
            .ok_or_else(|| RegressionError::Plot(format!("buffer does not fit {w}x{h}")))?;
        self.images.push((figure.name().to_string(), image));
        Ok(())
    }
}

/// Discards figures, remembering only their names.
#[derive(Debug, Default)]
pub struct NullSink {
    pub rendered: Vec<String>,
}

impl PlotSink for NullSink {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        log::debug!("Discarding figure '{}'", figure.name());
        self.rendered.push(figure.name().to_string());
        Ok(())
    }
}
