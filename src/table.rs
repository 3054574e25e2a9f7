// Loading delimited files into labeled tables and numeric matrices.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::info;
use ndarray::Array2;

use crate::categories::CategoryColumn;
use crate::error::Error;

/// A delimited file held as text: row labels, column names, and cells.
///
/// The first column of the source file is the row label, never a feature.
/// Both the primary matrix and metadata files load through this type; the
/// primary goes on to [`Table::to_matrix`], metadata to
/// [`Table::category_column`].
#[derive(Debug, Clone)]
pub struct Table {
    path: PathBuf,
    labels: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Vec<String>>,
}

/// A labeled numeric matrix: one row per sample, one column per feature.
///
/// Every row has the same length; the `csv` reader rejects ragged records
/// before this type is ever built.
#[derive(Debug, Clone)]
pub struct Matrix {
    pub labels: Vec<String>,
    pub features: Vec<String>,
    pub values: Array2<f64>,
}

impl Table {
    /// Loads a `.csv` (comma) or `.tsv` (tab) file. Any other extension is
    /// rejected up front, before any numeric work.
    pub fn load(path: impl AsRef<Path>) -> Result<Table, Error> {
        let path = path.as_ref();
        let delimiter = match path.extension().and_then(|ext| ext.to_str()) {
            Some("csv") => b',',
            Some("tsv") => b'\t',
            _ => {
                return Err(Error::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut labels = Vec::new();
        let mut cells = Vec::new();
        for record in reader.records() {
            let record = record?;
            let Some(label) = record.get(0) else {
                continue;
            };
            labels.push(label.to_string());
            cells.push(record.iter().skip(1).map(str::to_string).collect());
        }
        if labels.is_empty() {
            return Err(Error::EmptyTable {
                path: path.to_path_buf(),
            });
        }

        info!(
            "loaded {} row(s) x {} column(s) from {}",
            labels.len(),
            columns.len(),
            path.display()
        );
        Ok(Table {
            path: path.to_path_buf(),
            labels,
            columns,
            cells,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Parses every cell as `f64`, producing the labeled numeric matrix.
    pub fn to_matrix(&self) -> Result<Matrix, Error> {
        let mut values = Array2::<f64>::zeros((self.labels.len(), self.columns.len()));
        for (i, row) in self.cells.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                values[[i, j]] = cell.trim().parse::<f64>().map_err(|_| Error::NonNumericCell {
                    label: self.labels[i].clone(),
                    column: self.columns[j].clone(),
                    value: cell.clone(),
                })?;
            }
        }
        Ok(Matrix {
            labels: self.labels.clone(),
            features: self.columns.clone(),
            values,
        })
    }

    /// Extracts one metadata column as a label -> value mapping.
    ///
    /// A name that does not exist in the header is a fatal configuration
    /// error listing what IS available; there is no silent fallback to
    /// "no grouping".
    pub fn category_column(&self, name: &str) -> Result<CategoryColumn, Error> {
        let index = self
            .columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| Error::MissingColumn {
                name: name.to_string(),
                available: self.columns.clone(),
            })?;

        let mut values = HashMap::new();
        for (label, row) in self.labels.iter().zip(&self.cells) {
            if let Some(value) = row.get(index) {
                values.insert(label.clone(), value.clone());
            }
        }
        Ok(CategoryColumn::new(name, values))
    }
}

impl Matrix {
    pub fn n_samples(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    /// Swaps samples and features, so that the file's columns become the
    /// analyzed samples.
    pub fn transposed(self) -> Matrix {
        Matrix {
            labels: self.features,
            features: self.labels,
            values: self.values.reversed_axes(),
        }
    }
}
