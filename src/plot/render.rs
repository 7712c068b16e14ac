use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::{DivergingMap, REFERENCE};

use super::{DiagnosticFigure, Figure, HeatmapFigure, ReferenceLine, ScatterPanel};

pub type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Whether captions, tick labels and cell annotations are drawn.
///
/// Bitmap backends can only rasterize glyphs when a font backend is compiled
/// in (the `ttf` feature); SVG output always carries its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    Full,
    Omit,
}

impl TextMode {
    /// What the bitmap backend supports in this build.
    pub fn for_bitmap() -> Self {
        if cfg!(feature = "ttf") {
            TextMode::Full
        } else {
            TextMode::Omit
        }
    }

    fn enabled(self) -> bool {
        self == TextMode::Full
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Draw `figure` onto `root` and flush the backend.
pub fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    text: TextMode,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;
    match figure {
        Figure::Diagnostics(fig) => draw_diagnostics(root, fig, text)?,
        Figure::Correlation(fig) => draw_heatmap(root, fig, text)?,
    }
    root.present()
}

// ---------------------------------------------------------------------------
// Diagnostic grid
// ---------------------------------------------------------------------------

fn draw_diagnostics<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    fig: &DiagnosticFigure,
    text: TextMode,
) -> DrawResult<DB> {
    let areas = root.split_evenly((2, 2));
    for (area, panel) in areas.iter().zip(&fig.panels) {
        draw_scatter(area, panel, text)?;
    }
    Ok(())
}

fn draw_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &ScatterPanel,
    text: TextMode,
) -> DrawResult<DB> {
    let ((x0, x1), (y0, y1)) = panel.bounds();

    let mut builder = ChartBuilder::on(area);
    builder.margin(15);
    if text.enabled() {
        builder
            .caption(panel.title.as_str(), ("sans-serif", 20).into_font())
            .x_label_area_size(45)
            .y_label_area_size(80);
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    let sci = |v: &f64| format!("{v:.3e}");
    let mut mesh = chart.configure_mesh();
    mesh.light_line_style(&BLACK.mix(0.05))
        .bold_line_style(&BLACK.mix(0.15));
    if text.enabled() {
        mesh.x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_str())
            .x_label_formatter(&sci)
            .y_label_formatter(&sci);
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw()?;

    let line = match panel.reference {
        ReferenceLine::Identity => vec![(x0, x0), (x1, x1)],
        ReferenceLine::Zero => vec![(x0, 0.0), (x1, 0.0)],
    };
    chart.draw_series(LineSeries::new(line, REFERENCE.stroke_width(2)))?;

    let color = panel.color;
    chart.draw_series(
        panel
            .points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.6).filled())),
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Correlation heat map
// ---------------------------------------------------------------------------

const COLOR_BAR_WIDTH: i32 = 140;
const COLOR_BAR_STEPS: usize = 64;

fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    fig: &HeatmapFigure,
    text: TextMode,
) -> DrawResult<DB> {
    let map = DivergingMap::coolwarm();
    let labels = &fig.matrix.labels;
    let n = labels.len() as i32;

    let (width, _) = root.dim_in_pixel();
    let (grid_area, bar_area) = root.split_horizontally(width as i32 - COLOR_BAR_WIDTH);

    let mut builder = ChartBuilder::on(&grid_area);
    builder.margin(20);
    if text.enabled() {
        builder
            .caption(fig.title.as_str(), ("sans-serif", 24).into_font())
            .x_label_area_size(60)
            .y_label_area_size(100);
    }
    let mut chart = builder.build_cartesian_2d(0i32..n, n..0i32)?;

    let (plot_w, plot_h) = chart.plotting_area().dim_in_pixel();
    let cell_w = plot_w as i32 / n.max(1);
    let cell_h = plot_h as i32 / n.max(1);

    let label = |v: &i32| {
        usize::try_from(*v)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default()
    };
    // Integer axes cannot compute zero key points, so without labels the
    // (grid-less) mesh is not drawn at all.
    if text.enabled() {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(n as usize + 1)
            .y_labels(n as usize + 1)
            .x_label_offset(cell_w / 2)
            .y_label_offset(cell_h / 2)
            .x_label_formatter(&label)
            .y_label_formatter(&label)
            .label_style(("sans-serif", 14).into_font())
            .draw()?;
    }

    let cells = || (0..n).flat_map(move |row| (0..n).map(move |col| (col, row)));

    chart.draw_series(cells().map(|(col, row)| {
        let v = fig.matrix.get(row as usize, col as usize);
        Rectangle::new([(col, row), (col + 1, row + 1)], map.color_for(v).filled())
    }))?;

    if text.enabled() {
        chart.draw_series(cells().map(|(col, row)| {
            let v = fig.matrix.get(row as usize, col as usize);
            let label = if v.is_nan() { "nan".to_string() } else { format!("{v:.2}") };
            let style = ("sans-serif", 16)
                .into_font()
                .color(&map.text_color_for(v))
                .pos(Pos::new(HPos::Center, VPos::Center));
            EmptyElement::at((col, row)) + Text::new(label, (cell_w / 2, cell_h / 2), style)
        }))?;
    }

    draw_color_bar(&bar_area, &map, text)
}

fn draw_color_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    map: &DivergingMap,
    text: TextMode,
) -> DrawResult<DB> {
    let mut builder = ChartBuilder::on(area);
    builder.margin_top(80).margin_bottom(80).margin_right(20);
    if text.enabled() {
        builder.right_y_label_area_size(50);
    }
    let mut bar = builder.build_cartesian_2d(0.0..1.0, -1.0..1.0)?;

    let tick = |v: &f64| format!("{v:.1}");
    let mut mesh = bar.configure_mesh();
    mesh.disable_x_mesh().disable_y_mesh().disable_x_axis();
    if text.enabled() {
        mesh.y_labels(5).y_label_formatter(&tick);
    } else {
        mesh.y_labels(0);
    }
    mesh.draw()?;

    let step = 2.0 / COLOR_BAR_STEPS as f64;
    bar.draw_series((0..COLOR_BAR_STEPS).map(|k| {
        let lo = -1.0 + step * k as f64;
        Rectangle::new([(0.0, lo), (1.0, lo + step)], map.color_for(lo + step / 2.0).filled())
    }))?;
    Ok(())
}
