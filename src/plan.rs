// Enumerating pairwise component plots and partitioning samples into
// drawable subsets.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::aesthetics::{assign, Legend, MarkerShape, Palette, Rgb};
use crate::categories::{CategoryColumn, CategoryOrdering};
use crate::pca::ComponentSpace;

/// Where one plot goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotOutput {
    /// No batch directory was requested; the renderer decides how to show it.
    Interactive,
    /// Save to this path.
    File(PathBuf),
}

/// The samples sharing one (color-category, shape-category) combination on
/// one plot, with their resolved symbols and projected coordinates.
#[derive(Debug, Clone)]
pub struct PlotSubset {
    pub color_index: usize,
    pub shape_index: usize,
    pub color: Rgb,
    pub marker: MarkerShape,
    pub points: Vec<(f64, f64)>,
}

/// A render-ready description of one pairwise scatter plot.
///
/// Constructed once per axis pair and immediately handed to the rendering
/// backend; nothing here is retained or mutated afterwards.
#[derive(Debug, Clone)]
pub struct PlotSpec {
    /// 0-based component indices, `x_axis < y_axis`.
    pub x_axis: usize,
    pub y_axis: usize,
    pub x_label: String,
    pub y_label: String,
    pub title: String,
    pub subsets: Vec<PlotSubset>,
    pub legend: Option<Legend>,
    pub output: PlotOutput,
}

/// File name for the plot of one axis pair, named by 1-based component
/// numbers.
pub fn plot_file_name(x_axis: usize, y_axis: usize) -> String {
    format!("pca_pc{}_pc{}.png", x_axis + 1, y_axis + 1)
}

/// Plans one plot per unordered pair of component axes.
///
/// For `k` retained components this yields `C(k, 2)` specs, enumerated with
/// the first index ascending in the outer loop and the second in the inner,
/// both 0-based: k = 3 gives (0,1), (0,2), (1,2).
///
/// Within each plot, samples are partitioned by their resolved
/// (color-category, shape-category) pair; only non-empty combinations emit a
/// subset, in deterministic index order. A sample missing a value for an
/// ACTIVE metadata column is not joined and does not appear on the plot,
/// matching the associative-join semantics of the metadata interface.
///
/// Orderings and aesthetic assignments depend only on the static metadata,
/// not on the axis pair; they are still derived fresh per plot rather than
/// cached, keeping each spec a pure function of its inputs.
pub fn plan_pairwise(
    space: &ComponentSpace,
    labels: &[String],
    color: Option<&CategoryColumn>,
    shape: Option<&CategoryColumn>,
    palette: &Palette,
    out_dir: Option<&Path>,
) -> Vec<PlotSpec> {
    let k = space.n_components();
    let n_samples = space.n_samples().min(labels.len());
    let scores = space.scores();

    let mut specs = Vec::new();
    for x_axis in 0..k {
        for y_axis in (x_axis + 1)..k {
            let color_ordering = CategoryOrdering::from_samples(labels, color);
            let shape_ordering = CategoryOrdering::from_samples(labels, shape);
            let assignment = assign(&color_ordering, &shape_ordering, palette);

            let mut partitions: BTreeMap<(usize, usize), Vec<(f64, f64)>> = BTreeMap::new();
            for (i, sample) in labels.iter().enumerate().take(n_samples) {
                let Some(ci) = color_ordering.index_for_sample(sample, color) else {
                    continue;
                };
                let Some(si) = shape_ordering.index_for_sample(sample, shape) else {
                    continue;
                };
                partitions
                    .entry((ci, si))
                    .or_default()
                    .push((scores[[i, x_axis]], scores[[i, y_axis]]));
            }

            let mut subsets = Vec::with_capacity(partitions.len());
            for ((color_index, shape_index), points) in partitions {
                let (color, marker) = assignment.style(color_index, shape_index);
                subsets.push(PlotSubset {
                    color_index,
                    shape_index,
                    color,
                    marker,
                    points,
                });
            }

            let output = match out_dir {
                Some(dir) => PlotOutput::File(dir.join(plot_file_name(x_axis, y_axis))),
                None => PlotOutput::Interactive,
            };
            specs.push(PlotSpec {
                x_axis,
                y_axis,
                x_label: format!("Principal Component {}", x_axis + 1),
                y_label: format!("Principal Component {}", y_axis + 1),
                title: format!("PCA: PC{} vs PC{}", x_axis + 1, y_axis + 1),
                subsets,
                legend: assignment.into_legend(),
                output,
            });
        }
    }
    specs
}
