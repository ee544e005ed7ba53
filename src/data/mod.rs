//! Data module - CSV loading, imputation and column classification

mod column;
mod dataset;
mod imputer;
mod loader;

pub use column::{second_choices, ColumnKind, ColumnSelection, PairLayout, SelectionError};
pub use dataset::Dataset;
pub use imputer::{FilledColumn, ImputationReport, ImputerError, MedianImputer};
pub use loader::{DataLoader, LoaderError};
