//! Missing-Value Imputer
//! Fills missing numeric cells with the column median.

use super::{ColumnKind, Dataset};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ImputerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One column filled by the imputer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilledColumn {
    pub column: String,
    pub filled: usize,
    pub median: f64,
}

/// Columns touched by a single imputation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImputationReport {
    pub filled: Vec<FilledColumn>,
}

impl ImputationReport {
    pub fn total_filled(&self) -> usize {
        self.filled.iter().map(|f| f.filled).sum()
    }
}

/// Median imputation over every numeric column of a dataset.
pub struct MedianImputer;

impl MedianImputer {
    /// Replace missing cells of every numeric column with that column's
    /// median. Text columns and all-missing columns are left as they are.
    pub fn apply(dataset: &mut Dataset) -> Result<ImputationReport, ImputerError> {
        let mut report = ImputationReport::default();

        let targets: Vec<String> = dataset
            .frame()
            .get_columns()
            .iter()
            .filter(|col| ColumnKind::is_numeric_dtype(col.dtype()) && col.null_count() > 0)
            .map(|col| col.name().to_string())
            .collect();

        for name in targets {
            if let Some(filled) = Self::fill_column(dataset.frame_mut(), &name)? {
                debug!(
                    "Filled {} missing cells in '{}' with median {}",
                    filled.filled, filled.column, filled.median
                );
                report.filled.push(filled);
            }
        }

        Ok(report)
    }

    fn fill_column(df: &mut DataFrame, name: &str) -> Result<Option<FilledColumn>, ImputerError> {
        let values = df.column(name)?.cast(&DataType::Float64)?;
        let ca = values.f64()?;

        let Some(median) = ca.median() else {
            return Ok(None);
        };

        let missing = ca.null_count();
        let filled = ca.fill_null_with_values(median)?.into_series();
        df.replace(name, filled)?;

        Ok(Some(FilledColumn {
            column: name.to_string(),
            filled: missing,
            median,
        }))
    }
}
