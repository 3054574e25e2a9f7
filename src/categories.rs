// Categorical metadata columns and their deterministic orderings.

use std::collections::HashMap;

/// One categorical attribute, looked up by sample label.
///
/// This is an associative join, not an ordered merge: metadata rows are
/// matched to matrix rows purely by label, so the two files never need to
/// agree on row order. Labels present on only one side are simply not
/// joined.
#[derive(Debug, Clone)]
pub struct CategoryColumn {
    name: String,
    values: HashMap<String, String>,
}

impl CategoryColumn {
    pub fn new(name: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// The metadata column name this attribute came from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The category value for one sample, if that sample was joined.
    pub fn value_for(&self, label: &str) -> Option<&str> {
        self.values.get(label).map(String::as_str)
    }
}

/// The distinct values of a category column, in order of first appearance.
///
/// Built by scanning samples in dataset order and appending each value the
/// first time it is seen. The scan is a plain vector walk, so the result is
/// fully determined by the input ordering; it never depends on hash-set
/// iteration order. This ordering is user-visible (it fixes legend order and
/// color/marker assignment), so determinism is part of the contract.
///
/// When no column is supplied, the ordering degenerates to a single unlabeled
/// entry so that downstream partitioning logic stays uniform.
#[derive(Debug, Clone)]
pub struct CategoryOrdering {
    values: Vec<String>,
    label: Option<String>,
}

impl CategoryOrdering {
    /// Derives the ordering for `column` from the samples' dataset order.
    ///
    /// Samples with no entry in the column contribute nothing. An absent
    /// column yields the unlabeled single-entry ordering.
    pub fn from_samples(labels: &[String], column: Option<&CategoryColumn>) -> Self {
        match column {
            None => Self {
                values: vec![String::new()],
                label: None,
            },
            Some(column) => {
                let mut values: Vec<String> = Vec::new();
                for sample in labels {
                    if let Some(value) = column.value_for(sample) {
                        if !values.iter().any(|seen| seen == value) {
                            values.push(value.to_string());
                        }
                    }
                }
                Self {
                    values,
                    label: Some(column.name().to_string()),
                }
            }
        }
    }

    /// The column name behind this ordering, or `None` for the unlabeled
    /// placeholder ordering.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_labeled(&self) -> bool {
        self.label.is_some()
    }

    /// Distinct category values, first-appearance order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of a category value within this ordering.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    /// Resolves one sample to its category index.
    ///
    /// The unlabeled ordering maps every sample to index 0. A labeled
    /// ordering returns `None` for samples the column never joined; callers
    /// omit those samples rather than inventing a category for them.
    pub fn index_for_sample(&self, sample: &str, column: Option<&CategoryColumn>) -> Option<usize> {
        if self.label.is_none() {
            return Some(0);
        }
        let value = column?.value_for(sample)?;
        self.index_of(value)
    }
}
