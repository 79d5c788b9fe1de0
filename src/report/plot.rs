//! Figure rendering.
//!
//! Draws the accumulated 2D grid as a polar heatmap with a colorbar in the
//! left column and the radial and angular distributions stacked in the
//! right column, then writes the figure as an SVG document.

use crate::config::RenderConfig;
use crate::models::{AccumulatedHistogram, PolarEdges, PolarGrid};
use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle, TextStyle};
use std::f64::consts::PI;
use std::path::Path;
use tracing::debug;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Sequential white-to-green color map.
const GREENS: [(u8, u8, u8); 5] = [
    (247, 252, 245),
    (199, 233, 192),
    (116, 196, 118),
    (35, 139, 69),
    (0, 68, 27),
];

const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Polygon vertices per cell arc.
const ARC_STEPS: usize = 4;
const COLORBAR_WIDTH: u32 = 110;
const COLORBAR_SLICES: usize = 64;

/// Plot styling, built once and passed to the renderer.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub caption_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    /// Multiplier applied to radii for display.
    pub radial_scale: f64,
    pub radial_unit: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderStyle {
    fn from(config: &RenderConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            font_family: config.font_family.clone(),
            caption_size: f64::from(config.caption_size),
            label_size: f64::from(config.label_size),
            tick_size: f64::from(config.label_size) * 0.75,
            radial_scale: config.radial_scale,
            radial_unit: config.radial_unit.clone(),
        }
    }
}

impl RenderStyle {
    fn font(&self, size: f64) -> TextStyle<'_> {
        FontDesc::new(
            FontFamily::from(self.font_family.as_str()),
            size,
            FontStyle::Normal,
        )
        .into()
    }

    fn caption(&self) -> TextStyle<'_> {
        self.font(self.caption_size)
    }

    fn label(&self) -> TextStyle<'_> {
        self.font(self.label_size)
    }

    fn tick(&self) -> TextStyle<'_> {
        self.font(self.tick_size)
    }
}

/// Render the figure to `output`, overwriting any existing file.
pub fn render_plot(
    histogram: &AccumulatedHistogram,
    style: &RenderStyle,
    output: &Path,
) -> Result<()> {
    let root = SVGBackend::new(output, (style.width, style.height)).into_drawing_area();
    draw_figure(&root, histogram, style)?;
    root.present()
        .with_context(|| format!("Failed to write figure to {}", output.display()))?;

    debug!("Figure written to {}", output.display());
    Ok(())
}

/// Render the figure into an in-memory SVG document.
#[allow(dead_code)] // Used by tests and for embedding
pub fn render_svg_string(histogram: &AccumulatedHistogram, style: &RenderStyle) -> Result<String> {
    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
        draw_figure(&root, histogram, style)?;
        root.present()?;
    }
    Ok(svg)
}

fn draw_figure(
    root: &Area<'_>,
    histogram: &AccumulatedHistogram,
    style: &RenderStyle,
) -> Result<()> {
    root.fill(&WHITE)?;

    let (left, right) = root.split_horizontally(style.width * 2 / 3);
    let (left_width, _) = left.dim_in_pixel();
    let (heat_area, bar_area) =
        left.split_horizontally(left_width.saturating_sub(COLORBAR_WIDTH));
    let profiles = right.split_evenly((2, 1));

    let v_max = histogram.grid.max_finite();
    draw_polar_heatmap(&heat_area, &histogram.grid, &histogram.edges, v_max, style)?;
    draw_colorbar(&bar_area, v_max, style)?;

    let extent = display_extent(&histogram.edges, style);
    let radial_points: Vec<(f64, f64)> = histogram
        .radial_axis
        .iter()
        .zip(&histogram.radial)
        .map(|(&r, &value)| (r * style.radial_scale, value))
        .collect();
    draw_profile(
        &profiles[0],
        "Radial distribution",
        &format!("r [{}]", style.radial_unit),
        &radial_points,
        0.0..extent,
        style,
    )?;

    let angular_points: Vec<(f64, f64)> = histogram
        .angular_axis
        .iter()
        .zip(&histogram.angular)
        .map(|(&theta, &value)| (theta.to_degrees(), value))
        .collect();
    draw_profile(
        &profiles[1],
        "Angular distribution",
        "θ [°]",
        &angular_points,
        -180.0..180.0,
        style,
    )?;

    Ok(())
}

/// Outer radius in display units, never zero.
fn display_extent(edges: &PolarEdges, style: &RenderStyle) -> f64 {
    let extent = edges.extent() * style.radial_scale;
    if extent.is_finite() && extent > 0.0 {
        extent
    } else {
        1.0
    }
}

fn draw_polar_heatmap(
    area: &Area<'_>,
    grid: &PolarGrid,
    edges: &PolarEdges,
    v_max: f64,
    style: &RenderStyle,
) -> Result<()> {
    let titled = area.titled("2D polar map", style.caption())?;

    // Keep the plot square so rings stay circular.
    let (w, h) = titled.dim_in_pixel();
    let side = w.min(h);
    let pad_x = (w - side) / 2;
    let pad_y = (h - side) / 2;
    let square = titled.margin(pad_y, pad_y, pad_x, pad_x);

    let extent = display_extent(edges, style);
    let mut chart = ChartBuilder::on(&square)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(format!("x [{}]", style.radial_unit))
        .y_desc(format!("y [{}]", style.radial_unit))
        .label_style(style.tick())
        .axis_desc_style(style.label())
        .draw()?;

    let cells = (0..grid.nr()).flat_map(|ir| (0..grid.nth()).map(move |ith| (ir, ith)));
    chart.draw_series(cells.map(|(ir, ith)| {
        let points = sector(
            edges.radial[ir] * style.radial_scale,
            edges.radial[ir + 1] * style.radial_scale,
            edges.angular[ith],
            edges.angular[ith + 1],
        );
        Polygon::new(points, greens(grid.get(ir, ith) / v_max).filled())
    }))?;

    for k in 1..=4 {
        let radius = extent * k as f64 / 4.0;
        chart.draw_series(std::iter::once(PathElement::new(
            sector_arc(radius, -PI, PI, 96),
            BLACK.mix(0.25),
        )))?;
    }
    for k in 0..8 {
        let theta = k as f64 * PI / 4.0;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 0.0), (extent * theta.cos(), extent * theta.sin())],
            BLACK.mix(0.15),
        )))?;
    }

    Ok(())
}

fn draw_colorbar(area: &Area<'_>, v_max: f64, style: &RenderStyle) -> Result<()> {
    let top = (style.caption_size * 2.0) as u32;
    let y_max = if v_max > 0.0 { v_max } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .margin_top(top)
        .margin_bottom(50)
        .margin_left(10)
        .margin_right(5)
        .right_y_label_area_size(70)
        .build_cartesian_2d(0.0..1.0, 0.0..y_max)?;

    let step = y_max / COLORBAR_SLICES as f64;
    chart.draw_series((0..COLORBAR_SLICES).map(|i| {
        let y0 = step * i as f64;
        let fraction = (i as f64 + 0.5) / COLORBAR_SLICES as f64;
        Rectangle::new([(0.0, y0), (1.0, y0 + step)], greens(fraction).filled())
    }))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .y_labels(6)
        .y_desc("Relative frequency")
        .label_style(style.tick())
        .axis_desc_style(style.label())
        .draw()?;

    Ok(())
}

fn draw_profile(
    area: &Area<'_>,
    title: &str,
    x_desc: &str,
    points: &[(f64, f64)],
    x_range: std::ops::Range<f64>,
    style: &RenderStyle,
) -> Result<()> {
    let finite: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    let y_max = finite
        .iter()
        .map(|(_, y)| *y)
        .fold(0.0f64, f64::max)
        .max(1e-6)
        * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(title, style.caption())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("Relative frequency")
        .label_style(style.tick())
        .axis_desc_style(style.label())
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .draw()?;

    chart.draw_series(LineSeries::new(finite.iter().copied(), &LINE_COLOR))?;
    chart.draw_series(
        finite
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, LINE_COLOR.filled())),
    )?;

    Ok(())
}

/// Points along an arc of radius `r` from `t0` to `t1`.
fn sector_arc(r: f64, t0: f64, t1: f64, steps: usize) -> Vec<(f64, f64)> {
    (0..=steps)
        .map(|i| {
            let t = t0 + (t1 - t0) * i as f64 / steps as f64;
            (r * t.cos(), r * t.sin())
        })
        .collect()
}

/// Closed outline of the annular sector `[r0, r1] × [t0, t1]`.
fn sector(r0: f64, r1: f64, t0: f64, t1: f64) -> Vec<(f64, f64)> {
    let mut points = sector_arc(r1, t0, t1, ARC_STEPS);
    let mut inner = sector_arc(r0, t0, t1, ARC_STEPS);
    inner.reverse();
    points.extend(inner);
    points
}

/// Map `t` in `[0, 1]` onto the color map. Non-finite input maps to the low end.
fn greens(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (GREENS.len() - 1) as f64;
    let index = (scaled.floor() as usize).min(GREENS.len() - 2);
    let frac = scaled - index as f64;

    let (r0, g0, b0) = GREENS[index];
    let (r1, g1, b1) = GREENS[index + 1];
    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;

    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}
