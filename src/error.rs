// Error taxonomy for the pca_plot pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the loading boundary and the numeric core.
///
/// Two conditions deliberately do NOT appear here: a zero-variance feature
/// column (handled by the standardizer's unit-divisor policy) and more
/// categories than palette entries (handled by modulo aliasing). Both are
/// defined behaviors, not failures.
#[derive(Debug, Error)]
pub enum Error {
    /// The loader only understands comma- and tab-delimited files.
    #[error("unsupported file format for {path:?}: expected a .csv or .tsv file")]
    UnsupportedFormat { path: PathBuf },

    /// A requested grouping/shaping column is absent from the metadata.
    /// This is a fatal configuration error, never a silent fallback.
    #[error("column {name:?} not found in metadata; available columns: {available:?}")]
    MissingColumn {
        name: String,
        available: Vec<String>,
    },

    /// A cell of the primary matrix failed to parse as a real number.
    #[error("cell in row {label:?}, column {column:?} is not numeric: {value:?}")]
    NonNumericCell {
        label: String,
        column: String,
        value: String,
    },

    /// The file parsed but contained no data rows.
    #[error("no data rows in {path:?}")]
    EmptyTable { path: PathBuf },

    /// Variance is undefined for fewer than two samples.
    #[error("PCA requires at least 2 samples, found {0}")]
    TooFewSamples(usize),

    /// The backend eigen-decomposition failed.
    #[error("eigen-decomposition failed: {0}")]
    Decomposition(String),

    /// The plotters backend reported a drawing failure.
    #[error("rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
