// Pairwise principal-component scatter plots for labeled tabular data.

#![doc = include_str!("../README.md")]

pub mod aesthetics;
pub mod categories;
pub mod error;
pub mod pca;
pub mod plan;
pub mod render;
pub mod standardize;
pub mod table;

pub use crate::aesthetics::{AestheticAssignment, Legend, MarkerShape, Palette, Rgb};
pub use crate::categories::{CategoryColumn, CategoryOrdering};
pub use crate::error::Error;
pub use crate::pca::{project, ComponentSpace};
pub use crate::plan::{plan_pairwise, PlotOutput, PlotSpec, PlotSubset};
pub use crate::standardize::standardize;
pub use crate::table::{Matrix, Table};
