// pca_plot CLI: load, standardize, project, plan, render.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;

use pca_plot::aesthetics::Palette;
use pca_plot::categories::CategoryColumn;
use pca_plot::pca;
use pca_plot::plan;
use pca_plot::render;
use pca_plot::standardize::standardize;
use pca_plot::table::Table;

/// Number of principal components retained per run. Components are consumed
/// in pairs by the plot planner, so this also fixes the number of plots.
const RETAINED_COMPONENTS: usize = 2;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Pairwise PCA scatter plots for delimited numeric tables.",
    long_about = None
)]
struct CliArgs {
    /// Input matrix (.csv or .tsv); the first column holds sample labels
    input: PathBuf,

    /// Transpose the input matrix before analysis
    #[arg(long)]
    transpose: bool,

    /// Metadata table (.csv or .tsv) whose row labels align with the input
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Metadata column encoded as marker color
    #[arg(long)]
    group: Option<String>,

    /// Metadata column encoded as marker shape
    #[arg(long)]
    shape: Option<String>,

    /// Save plots into this directory (created if absent) instead of the
    /// working directory
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,

    #[arg(long, default_value = "Info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let log_level = args.log_level.parse::<log::LevelFilter>().unwrap_or_else(|_| {
        eprintln!(
            "Warning: invalid log level {:?} provided. Defaulting to Info.",
            args.log_level
        );
        log::LevelFilter::Info
    });
    env_logger::Builder::new().filter_level(log_level).init();

    info!("loading {}", args.input.display());
    let table = Table::load(&args.input)?;
    let mut matrix = table.to_matrix()?;
    if args.transpose {
        matrix = matrix.transposed();
        info!(
            "transposed input: {} samples x {} features",
            matrix.n_samples(),
            matrix.n_features()
        );
    }

    let metadata = match &args.metadata {
        Some(path) => Some(Table::load(path)?),
        None => None,
    };
    let group_column = metadata_column(metadata.as_ref(), args.group.as_deref(), "group")?;
    let shape_column = metadata_column(metadata.as_ref(), args.shape.as_deref(), "shape")?;

    let standardized = standardize(matrix.values.clone());
    let space = pca::project(&standardized, RETAINED_COMPONENTS)?;
    info!(
        "projected {} samples onto {} components",
        space.n_samples(),
        space.n_components()
    );

    if let Some(dir) = &args.out_dir {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output directory {}", dir.display()))?;
            info!("created output directory {}", dir.display());
        }
    }

    let palette = Palette::default();
    let specs = plan::plan_pairwise(
        &space,
        &matrix.labels,
        group_column.as_ref(),
        shape_column.as_ref(),
        &palette,
        args.out_dir.as_deref(),
    );
    info!("rendering {} pairwise plot(s)", specs.len());
    for spec in &specs {
        let path = render::render(spec)?;
        info!("wrote {}", path.display());
    }

    for (i, ratio) in space.explained_variance_ratio().iter().enumerate() {
        println!("PC{}: explained variance fraction {:.4}", i + 1, ratio);
    }
    Ok(())
}

/// Resolves an optional `--group`/`--shape` request against the metadata.
/// Asking for a column without supplying metadata, or naming a column the
/// metadata does not have, is a fatal configuration error.
fn metadata_column(
    metadata: Option<&Table>,
    name: Option<&str>,
    flag: &str,
) -> Result<Option<CategoryColumn>> {
    match (metadata, name) {
        (_, None) => Ok(None),
        (Some(table), Some(name)) => Ok(Some(table.category_column(name)?)),
        (None, Some(name)) => Err(anyhow!(
            "--{} {:?} requires --metadata to be supplied",
            flag,
            name
        )),
    }
}
