use crate::dataset::DatasetCollection;
use crate::record::BenchmarkRecord;
use anyhow::{Context, Result};
use clap::ValueEnum;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::element::{DynElement, IntoDynElement};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::path::Path;

// Font sizes, tuned for the 1800x1050 canvas.
const TITLE_FONT_SIZE: u32 = 36;
const AXIS_LABEL_FONT_SIZE: u32 = 24;
const TICK_LABEL_FONT_SIZE: u32 = 18;
const LEGEND_FONT_SIZE: u32 = 20;
const FOOTNOTE_FONT_SIZE: u32 = 18;

const CHART_SIZE: (u32, u32) = (1800, 1050);
const MARGIN_BOTTOM: u32 = 55;
const X_LABEL_AREA_SIZE: u32 = 60;
const Y_LABEL_AREA_SIZE: u32 = 90;

const MARKER_RADIUS: i32 = 5;
const ERROR_BAR_CAP: u32 = 4;

const X_AXIS_DESC: &str = "Number of elements (32-bit floats, 4 bytes each)";
const TRIAL_FOOTNOTE: &str = "10 trials per data point, same build, GCC 15.2";

/// Which metric to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Metric {
    /// Median wall time in seconds, with ±1σ bands and a milliseconds axis
    Time,
    /// GFLOP/s throughput
    Gflops,
}

/// Color palette, cycled by sorted dataset position. Datasets beyond the
/// palette size repeat colors; that is accepted, not a defect.
pub const COLORS: [RGBColor; 24] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
    RGBColor(174, 199, 232),
    RGBColor(255, 187, 120),
    RGBColor(152, 223, 138),
    RGBColor(255, 152, 150),
    RGBColor(197, 176, 213),
    RGBColor(196, 156, 148),
    RGBColor(247, 182, 210),
    RGBColor(199, 199, 199),
    RGBColor(219, 219, 141),
    RGBColor(158, 218, 229),
    RGBColor(57, 59, 121),
    RGBColor(99, 121, 57),
    RGBColor(140, 109, 49),
    RGBColor(132, 60, 57),
];

/// Marker glyph shapes, cycled by sorted dataset position alongside the
/// color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
    TriangleUp,
    Diamond,
    TriangleDown,
    Pentagon,
    Star,
    BoldCross,
    BoldPlus,
    HexagonPointy,
    TriangleLeft,
    TriangleRight,
    ThinDiamond,
    Octagon,
    HexagonFlat,
    SpokesDown,
    SpokesUp,
    SpokesLeft,
    SpokesRight,
    Plus,
    Cross,
}

pub const MARKERS: [MarkerShape; 21] = [
    MarkerShape::Circle,
    MarkerShape::Square,
    MarkerShape::TriangleUp,
    MarkerShape::Diamond,
    MarkerShape::TriangleDown,
    MarkerShape::Pentagon,
    MarkerShape::Star,
    MarkerShape::BoldCross,
    MarkerShape::BoldPlus,
    MarkerShape::HexagonPointy,
    MarkerShape::TriangleLeft,
    MarkerShape::TriangleRight,
    MarkerShape::ThinDiamond,
    MarkerShape::Octagon,
    MarkerShape::HexagonFlat,
    MarkerShape::SpokesDown,
    MarkerShape::SpokesUp,
    MarkerShape::SpokesLeft,
    MarkerShape::SpokesRight,
    MarkerShape::Plus,
    MarkerShape::Cross,
];

/// One dataset prepared for drawing: points in data coordinates plus the
/// half-height of its error envelope at each point.
struct Series {
    label: String,
    color: RGBColor,
    marker: MarkerShape,
    points: Vec<(f64, f64)>,
    err: Vec<f64>,
}

type BenchChartContext<'a, 'b> =
    ChartContext<'b, BitMapBackend<'a>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Datasets ordered by performance at the last array size: ascending median
/// time for [`Metric::Time`], descending GFLOP/s for [`Metric::Gflops`].
/// Fastest first either way. This order drives plotting, palette
/// assignment, and the auto-generated title.
pub fn sorted_by_metric<'a>(
    datasets: &'a DatasetCollection,
    metric: Metric,
) -> Vec<(&'a str, &'a BenchmarkRecord)> {
    let mut entries: Vec<(&str, &BenchmarkRecord)> = datasets.iter().collect();
    match metric {
        Metric::Time => {
            entries.sort_by(|a, b| a.1.last_median_ms().total_cmp(&b.1.last_median_ms()))
        }
        Metric::Gflops => entries.sort_by(|a, b| b.1.last_gflops().total_cmp(&a.1.last_gflops())),
    }
    entries
}

/// Title generated from the dataset labels when none was given explicitly.
pub fn auto_title(labels: &[&str]) -> String {
    match labels {
        [] => "Vector Multiply Performance Comparison".to_string(),
        [only] => format!("Vector Multiply Performance - {}", only),
        [first, second] => format!("Vector Multiply Performance - {} vs {}", first, second),
        _ => format!(
            "Vector Multiply Performance - {} CPU Comparison",
            labels.len()
        ),
    }
}

/// Format an element-count tick value with K/M suffixes: exact multiples
/// without decimals (1000000 -> "1M"), inexact with one decimal
/// (1500000 -> "1.5M"), values under 1000 as plain integers.
pub fn format_element_count(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value >= 1_000_000.0 {
        if value % 1_000_000.0 == 0.0 {
            format!("{}M", (value / 1_000_000.0) as i64)
        } else {
            format!("{:.1}M", value / 1_000_000.0)
        }
    } else if value >= 1_000.0 {
        if value % 1_000.0 == 0.0 {
            format!("{}K", (value / 1_000.0) as i64)
        } else {
            format!("{:.1}K", value / 1_000.0)
        }
    } else {
        format!("{}", value as i64)
    }
}

/// Render the comparison chart for `datasets` to `output`.
///
/// Creates missing parent directories, rasterizes at a fixed resolution,
/// and reports the saved path. Any failure to draw or write propagates
/// unrecovered.
pub fn render_chart(
    datasets: &DatasetCollection,
    output: &Path,
    title: Option<&str>,
    metric: Metric,
) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create output directory")?;
        }
    }

    let entries = sorted_by_metric(datasets, metric);
    let labels: Vec<&str> = entries.iter().map(|(label, _)| *label).collect();
    let title = match title {
        Some(explicit) => explicit.to_string(),
        None => auto_title(&labels),
    };

    let series: Vec<Series> = entries
        .iter()
        .enumerate()
        .map(|(idx, (label, record))| build_series(idx, label, record, metric))
        .collect();

    let x_max = entries
        .iter()
        .flat_map(|(_, record)| record.array_sizes.iter())
        .copied()
        .max()
        .unwrap_or(0) as f64
        * 1.05;
    let y_max = series
        .iter()
        .flat_map(|s| s.points.iter().zip(&s.err).map(|(&(_, y), &e)| y + e))
        .fold(0.0_f64, f64::max)
        * 1.1;
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };

    let root = BitMapBackend::new(output, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    match metric {
        Metric::Time => draw_time_chart(&root, &series, &title, x_max, y_max)?,
        Metric::Gflops => draw_gflops_chart(&root, &series, &title, x_max, y_max)?,
    }

    draw_footnote(&root)?;

    root.present()?;
    println!("Chart saved to: {}", output.display());
    Ok(())
}

fn build_series(idx: usize, label: &str, record: &BenchmarkRecord, metric: Metric) -> Series {
    let sizes = record.array_sizes.iter().map(|&n| n as f64);
    let (points, err): (Vec<(f64, f64)>, Vec<f64>) = match metric {
        Metric::Time => (
            sizes
                .zip(&record.median_ms)
                .map(|(x, &ms)| (x, ms / 1000.0))
                .collect(),
            record.stddev_ms.iter().map(|&ms| ms / 1000.0).collect(),
        ),
        Metric::Gflops => (
            sizes.zip(&record.gflops).map(|(x, &g)| (x, g)).collect(),
            // No measured stddev exists for derived throughput; the
            // original approximates the envelope as a quarter of the
            // max-min latency spread and we reproduce that as-is.
            record
                .max_ms
                .iter()
                .zip(&record.min_ms)
                .map(|(&max, &min)| (max - min) / 4.0)
                .collect(),
        ),
    };

    Series {
        label: label.to_string(),
        color: COLORS[idx % COLORS.len()],
        marker: MARKERS[idx % MARKERS.len()],
        points,
        err,
    }
}

/// Time chart: seconds on the left axis, a mirrored milliseconds axis with
/// finer ticks on the right, and a ±1σ legend entry.
fn draw_time_chart(
    root: &DrawingArea<BitMapBackend, Shift>,
    series: &[Series],
    title: &str,
    x_max: f64,
    y_max: f64,
) -> Result<()> {
    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", TITLE_FONT_SIZE))
        .margin(20)
        .margin_bottom(MARGIN_BOTTOM)
        .x_label_area_size(X_LABEL_AREA_SIZE)
        .y_label_area_size(Y_LABEL_AREA_SIZE)
        .right_y_label_area_size(Y_LABEL_AREA_SIZE)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)?
        .set_secondary_coord(0.0..x_max, 0.0..y_max * 1000.0);

    chart
        .configure_mesh()
        .x_labels(10)
        .x_label_formatter(&|x| format_element_count(*x))
        .x_desc(X_AXIS_DESC)
        .y_desc("Time [s] - lower is better")
        .light_line_style(RGBColor(230, 230, 230))
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_labels(25)
        .y_desc("Time [ms] - lower is better")
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    draw_series_layers(&mut chart, series)?;

    // Legend entry explaining the shaded bands, anchored on an invisible
    // zero-radius point.
    let grey = RGBColor(128, 128, 128);
    chart
        .draw_series(std::iter::once(Circle::new(
            (0.0, 0.0),
            0,
            grey.mix(0.2).filled(),
        )))?
        .label("±1σ region")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], grey.mix(0.2).filled()));

    draw_legend(&mut chart)?;
    Ok(())
}

fn draw_gflops_chart(
    root: &DrawingArea<BitMapBackend, Shift>,
    series: &[Series],
    title: &str,
    x_max: f64,
    y_max: f64,
) -> Result<()> {
    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", TITLE_FONT_SIZE))
        .margin(20)
        .margin_bottom(MARGIN_BOTTOM)
        .x_label_area_size(X_LABEL_AREA_SIZE)
        .y_label_area_size(Y_LABEL_AREA_SIZE)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_labels(10)
        .x_label_formatter(&|x| format_element_count(*x))
        .x_desc(X_AXIS_DESC)
        .y_desc("GFLOP/s - higher is better")
        .light_line_style(RGBColor(230, 230, 230))
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    draw_series_layers(&mut chart, series)?;
    draw_legend(&mut chart)?;
    Ok(())
}

/// Draw every dataset in three passes so the z-order matches across
/// datasets: all shaded bands underneath, then all whiskers, then the
/// median lines and marker glyphs on top.
fn draw_series_layers<'a, 'b>(
    chart: &mut BenchChartContext<'a, 'b>,
    series: &[Series],
) -> Result<()> {
    for s in series {
        let mut band: Vec<(f64, f64)> = s
            .points
            .iter()
            .zip(&s.err)
            .map(|(&(x, y), &e)| (x, y + e))
            .collect();
        band.extend(
            s.points
                .iter()
                .zip(&s.err)
                .rev()
                .map(|(&(x, y), &e)| (x, y - e)),
        );
        chart.draw_series(std::iter::once(Polygon::new(
            band,
            s.color.mix(0.2).filled(),
        )))?;
    }

    for s in series {
        chart.draw_series(s.points.iter().zip(&s.err).map(|(&(x, y), &e)| {
            ErrorBar::new_vertical(
                x,
                y - e,
                y,
                y + e,
                s.color.mix(0.4).stroke_width(1),
                ERROR_BAR_CAP,
            )
        }))?;
    }

    for s in series {
        let color = s.color;
        chart
            .draw_series(LineSeries::new(s.points.clone(), color.stroke_width(2)))?
            .label(s.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });

        for &coord in &s.points {
            chart
                .plotting_area()
                .draw(&marker_glyph(s.marker, coord, s.color))?;
        }
    }

    Ok(())
}

fn draw_legend<'a: 'b, 'b>(chart: &mut BenchChartContext<'a, 'b>) -> Result<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()?;
    Ok(())
}

fn draw_footnote(root: &DrawingArea<BitMapBackend, Shift>) -> Result<()> {
    let (width, height) = root.dim_in_pixel();
    let style = FontDesc::new(
        FontFamily::SansSerif,
        FOOTNOTE_FONT_SIZE as f64,
        FontStyle::Italic,
    )
    .color(&RGBColor(128, 128, 128))
    .pos(Pos::new(HPos::Center, VPos::Bottom));

    root.draw(&Text::new(
        TRIAL_FOOTNOTE,
        ((width / 2) as i32, (height - 8) as i32),
        style,
    ))?;
    Ok(())
}

/// Vertices of a regular polygon in pixel offsets. `phase_deg` 90 puts a
/// vertex straight up (pixel y grows downward, hence the sign flip).
fn ring(points: u32, radius: f64, phase_deg: f64) -> Vec<(i32, i32)> {
    (0..points)
        .map(|k| {
            let theta = (phase_deg + k as f64 * 360.0 / points as f64).to_radians();
            (
                (radius * theta.cos()).round() as i32,
                (-radius * theta.sin()).round() as i32,
            )
        })
        .collect()
}

fn star(outer: f64, inner: f64) -> Vec<(i32, i32)> {
    (0..10)
        .map(|k| {
            let radius = if k % 2 == 0 { outer } else { inner };
            let theta = (90.0 + k as f64 * 36.0).to_radians();
            (
                (radius * theta.cos()).round() as i32,
                (-radius * theta.sin()).round() as i32,
            )
        })
        .collect()
}

fn polygon_glyph<'a>(
    coord: (f64, f64),
    vertices: Vec<(i32, i32)>,
    color: RGBColor,
) -> DynElement<'a, BitMapBackend<'a>, (f64, f64)> {
    (EmptyElement::at(coord) + Polygon::new(vertices, color.filled())).into_dyn()
}

fn cross_glyph<'a>(
    coord: (f64, f64),
    diagonal: bool,
    width: u32,
    color: RGBColor,
) -> DynElement<'a, BitMapBackend<'a>, (f64, f64)> {
    let r = MARKER_RADIUS;
    let style = color.stroke_width(width);
    let (first, second) = if diagonal {
        (vec![(-r, -r), (r, r)], vec![(-r, r), (r, -r)])
    } else {
        (vec![(-r, 0), (r, 0)], vec![(0, -r), (0, r)])
    };
    (EmptyElement::at(coord) + PathElement::new(first, style) + PathElement::new(second, style))
        .into_dyn()
}

fn spokes_glyph<'a>(
    coord: (f64, f64),
    phase_deg: f64,
    color: RGBColor,
) -> DynElement<'a, BitMapBackend<'a>, (f64, f64)> {
    let ends = ring(3, MARKER_RADIUS as f64 + 2.0, phase_deg);
    let style = color.stroke_width(1);
    (EmptyElement::at(coord)
        + PathElement::new(vec![(0, 0), ends[0]], style)
        + PathElement::new(vec![(0, 0), ends[1]], style)
        + PathElement::new(vec![(0, 0), ends[2]], style))
    .into_dyn()
}

fn marker_glyph<'a>(
    shape: MarkerShape,
    coord: (f64, f64),
    color: RGBColor,
) -> DynElement<'a, BitMapBackend<'a>, (f64, f64)> {
    let r = MARKER_RADIUS;
    let rf = r as f64;
    match shape {
        MarkerShape::Circle => {
            (EmptyElement::at(coord) + Circle::new((0, 0), r, color.filled())).into_dyn()
        }
        MarkerShape::Square => {
            let s = r - 1;
            (EmptyElement::at(coord) + Rectangle::new([(-s, -s), (s, s)], color.filled()))
                .into_dyn()
        }
        MarkerShape::TriangleUp => polygon_glyph(coord, ring(3, rf, 90.0), color),
        MarkerShape::Diamond => polygon_glyph(coord, ring(4, rf, 90.0), color),
        MarkerShape::TriangleDown => polygon_glyph(coord, ring(3, rf, -90.0), color),
        MarkerShape::Pentagon => polygon_glyph(coord, ring(5, rf, 90.0), color),
        MarkerShape::Star => polygon_glyph(coord, star(rf + 1.0, (rf + 1.0) * 0.45), color),
        MarkerShape::BoldCross => cross_glyph(coord, true, 3, color),
        MarkerShape::BoldPlus => cross_glyph(coord, false, 3, color),
        MarkerShape::HexagonPointy => polygon_glyph(coord, ring(6, rf, 90.0), color),
        MarkerShape::TriangleLeft => polygon_glyph(coord, ring(3, rf, 180.0), color),
        MarkerShape::TriangleRight => polygon_glyph(coord, ring(3, rf, 0.0), color),
        MarkerShape::ThinDiamond => {
            let half = r / 2;
            polygon_glyph(coord, vec![(0, -r), (half, 0), (0, r), (-half, 0)], color)
        }
        MarkerShape::Octagon => polygon_glyph(coord, ring(8, rf, 22.5), color),
        MarkerShape::HexagonFlat => polygon_glyph(coord, ring(6, rf, 0.0), color),
        MarkerShape::SpokesDown => spokes_glyph(coord, -90.0, color),
        MarkerShape::SpokesUp => spokes_glyph(coord, 90.0, color),
        MarkerShape::SpokesLeft => spokes_glyph(coord, 180.0, color),
        MarkerShape::SpokesRight => spokes_glyph(coord, 0.0, color),
        MarkerShape::Plus => cross_glyph(coord, false, 1, color),
        MarkerShape::Cross => cross_glyph(coord, true, 1, color),
    }
}
