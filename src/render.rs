// Drawing plot specs with the plotters bitmap backend.

use std::path::{Path, PathBuf};

use log::info;
use plotters::chart::SeriesAnno;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::aesthetics::{MarkerShape, Rgb, Swatch};
use crate::error::Error;
use crate::plan::{plot_file_name, PlotOutput, PlotSpec, PlotSubset};

const PLOT_SIZE: (u32, u32) = (800, 600);
const MARKER_SIZE: i32 = 4;

fn backend_color(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn draw_error<E: std::error::Error + Send + Sync>(
    err: DrawingAreaErrorKind<E>,
) -> Error {
    Error::Render(err.to_string())
}

/// Renders one plot spec, returning the path it was written to.
///
/// `PlotOutput::File` saves exactly where the planner said. This stack has no
/// matplotlib-style interactive window, so `PlotOutput::Interactive` resolves
/// to the derived file name in the current working directory.
pub fn render(spec: &PlotSpec) -> Result<PathBuf, Error> {
    let path = match &spec.output {
        PlotOutput::File(path) => path.clone(),
        PlotOutput::Interactive => {
            let path = std::env::current_dir()?.join(plot_file_name(spec.x_axis, spec.y_axis));
            info!(
                "no output directory requested; writing {} to the working directory",
                path.display()
            );
            path
        }
    };
    draw(spec, &path)?;
    Ok(path)
}

fn draw(spec: &PlotSpec, path: &Path) -> Result<(), Error> {
    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let ((x_min, x_max), (y_min, y_max)) = data_bounds(spec);
    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()
        .map_err(draw_error)?;

    for subset in &spec.subsets {
        draw_markers(&mut chart, subset)?;
    }

    if let Some(legend) = &spec.legend {
        // Header row carries the legend title, then one swatch row per entry.
        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())
            .map_err(draw_error)?
            .label(legend.title.as_str())
            .legend(|pos| Pixel::new(pos, TRANSPARENT.filled()));
        for entry in &legend.entries {
            let anno = chart
                .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())
                .map_err(draw_error)?
                .label(format!("  {}", entry.label));
            attach_swatch(anno, entry.swatch);
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_error)?;
    }

    root.present().map_err(draw_error)?;
    Ok(())
}

/// One series of identically styled sample points. Circles, triangles, and
/// crosses anchor directly in data coordinates; squares and diamonds compose
/// a pixel-sized glyph around an anchor.
fn draw_markers(
    chart: &mut ChartContext<'_, BitMapBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    subset: &PlotSubset,
) -> Result<(), Error> {
    let fill = backend_color(subset.color).filled();
    let stroke = backend_color(subset.color).stroke_width(2);
    let s = MARKER_SIZE;
    let points = subset.points.iter().copied();
    match subset.marker {
        MarkerShape::Circle => chart
            .draw_series(points.map(|p| Circle::new(p, s, fill)))
            .map(|_| ()),
        MarkerShape::Square => chart
            .draw_series(
                points.map(|p| EmptyElement::at(p) + Rectangle::new([(-s, -s), (s, s)], fill)),
            )
            .map(|_| ()),
        MarkerShape::Triangle => chart
            .draw_series(points.map(|p| TriangleMarker::new(p, s + 1, fill)))
            .map(|_| ()),
        MarkerShape::Diamond => chart
            .draw_series(points.map(|p| {
                EmptyElement::at(p)
                    + Polygon::new(vec![(0, -s - 1), (s + 1, 0), (0, s + 1), (-s - 1, 0)], fill)
            }))
            .map(|_| ()),
        MarkerShape::Cross => chart
            .draw_series(points.map(|p| Cross::new(p, s, stroke)))
            .map(|_| ()),
    }
    .map_err(draw_error)
}

/// Gives one legend row its swatch: a filled color patch for color
/// categories, a marker glyph in the palette's neutral color for shape
/// categories. Legend glyphs live in backend pixel coordinates.
fn attach_swatch(anno: &mut SeriesAnno<'_, BitMapBackend<'_>>, swatch: Swatch) {
    let s = MARKER_SIZE;
    match swatch {
        Swatch::Color(color) => {
            let style = backend_color(color).filled();
            anno.legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], style));
        }
        Swatch::Marker(shape, color) => {
            let fill = backend_color(color).filled();
            let stroke = backend_color(color).stroke_width(2);
            match shape {
                MarkerShape::Circle => {
                    anno.legend(move |(x, y)| Circle::new((x + 5, y), s, fill));
                }
                MarkerShape::Square => {
                    anno.legend(move |(x, y)| {
                        Rectangle::new([(x + 5 - s, y - s), (x + 5 + s, y + s)], fill)
                    });
                }
                MarkerShape::Triangle => {
                    anno.legend(move |(x, y)| TriangleMarker::new((x + 5, y), s + 1, fill));
                }
                MarkerShape::Diamond => {
                    anno.legend(move |(x, y)| {
                        Polygon::new(
                            vec![
                                (x + 5, y - s - 1),
                                (x + s + 6, y),
                                (x + 5, y + s + 1),
                                (x - s + 4, y),
                            ],
                            fill,
                        )
                    });
                }
                MarkerShape::Cross => {
                    anno.legend(move |(x, y)| Cross::new((x + 5, y), s, stroke));
                }
            }
        }
    }
}

/// Axis ranges covering every point in the spec, padded so markers at the
/// extremes are not clipped. Degenerate ranges widen to a unit span.
fn data_bounds(spec: &PlotSpec) -> ((f64, f64), (f64, f64)) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for subset in &spec.subsets {
        for &(x, y) in &subset.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    if !x_min.is_finite() {
        return ((-1.0, 1.0), (-1.0, 1.0));
    }
    (pad(x_min, x_max), pad(y_min, y_max))
}

fn pad(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span <= f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min - 0.05 * span, max + 0.05 * span)
    }
}
