//! Column Type Classifier
//! Categorical vs numeric classification and the two-column selection.

use polars::prelude::DataType;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Column '{0}' selected twice")]
    SameColumn(String),
    #[error("Column '{0}' not found in dataset")]
    UnknownColumn(String),
    #[error("Dataset needs at least two columns")]
    NotEnoughColumns,
}

/// Storage-type classification of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    /// Text values; drawn as a pie chart.
    Categorical,
    /// Anything else; drawn as a box plot.
    Numeric,
}

impl ColumnKind {
    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::String | DataType::Categorical(..) | DataType::Enum(..) => {
                ColumnKind::Categorical
            }
            _ => ColumnKind::Numeric,
        }
    }

    pub fn is_numeric_dtype(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }
}

/// Which of the four chart branches a selected pair falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairLayout {
    CategoricalNumeric,
    NumericCategorical,
    CategoricalCategorical,
    NumericNumeric,
}

impl PairLayout {
    pub fn classify(first: ColumnKind, second: ColumnKind) -> Self {
        match (first, second) {
            (ColumnKind::Categorical, ColumnKind::Numeric) => PairLayout::CategoricalNumeric,
            (ColumnKind::Numeric, ColumnKind::Categorical) => PairLayout::NumericCategorical,
            (ColumnKind::Categorical, ColumnKind::Categorical) => {
                PairLayout::CategoricalCategorical
            }
            (ColumnKind::Numeric, ColumnKind::Numeric) => PairLayout::NumericNumeric,
        }
    }

    /// Chart kinds for (first, second), in display order.
    pub fn kinds(self) -> [ColumnKind; 2] {
        match self {
            PairLayout::CategoricalNumeric => [ColumnKind::Categorical, ColumnKind::Numeric],
            PairLayout::NumericCategorical => [ColumnKind::Numeric, ColumnKind::Categorical],
            PairLayout::CategoricalCategorical => {
                [ColumnKind::Categorical, ColumnKind::Categorical]
            }
            PairLayout::NumericNumeric => [ColumnKind::Numeric, ColumnKind::Numeric],
        }
    }
}

/// Two distinct columns picked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSelection {
    first: String,
    second: String,
}

impl ColumnSelection {
    pub fn new(first: &str, second: &str) -> Result<Self, SelectionError> {
        if first == second {
            return Err(SelectionError::SameColumn(first.to_string()));
        }
        Ok(Self {
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    /// First column plus the first remaining column.
    pub fn default_for(columns: &[String]) -> Result<Self, SelectionError> {
        let first = columns.first().ok_or(SelectionError::NotEnoughColumns)?;
        let second = second_choices(columns, first)
            .first()
            .copied()
            .ok_or(SelectionError::NotEnoughColumns)?;
        Self::new(first, second)
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    /// Change the first column. The second is kept when it is still a valid
    /// choice, otherwise it moves to the first remaining option.
    pub fn with_first(&self, columns: &[String], first: &str) -> Result<Self, SelectionError> {
        if !columns.iter().any(|c| c == first) {
            return Err(SelectionError::UnknownColumn(first.to_string()));
        }
        let options = second_choices(columns, first);
        let second = if options.contains(&self.second.as_str()) {
            self.second.as_str()
        } else {
            options
                .first()
                .copied()
                .ok_or(SelectionError::NotEnoughColumns)?
        };
        Self::new(first, second)
    }

    pub fn with_second(&self, columns: &[String], second: &str) -> Result<Self, SelectionError> {
        if !columns.iter().any(|c| c == second) {
            return Err(SelectionError::UnknownColumn(second.to_string()));
        }
        Self::new(&self.first, second)
    }
}

/// Options for the second selector: every column except `first`.
pub fn second_choices<'a>(columns: &'a [String], first: &str) -> Vec<&'a str> {
    columns
        .iter()
        .map(String::as_str)
        .filter(|c| *c != first)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_dtypes() {
        assert_eq!(ColumnKind::from_dtype(&DataType::String), ColumnKind::Categorical);
        assert_eq!(ColumnKind::from_dtype(&DataType::Int64), ColumnKind::Numeric);
        assert_eq!(ColumnKind::from_dtype(&DataType::Float64), ColumnKind::Numeric);
        assert_eq!(ColumnKind::from_dtype(&DataType::Boolean), ColumnKind::Numeric);
    }

    #[test]
    fn test_pair_layout_branches() {
        use ColumnKind::*;
        assert_eq!(
            PairLayout::classify(Categorical, Numeric),
            PairLayout::CategoricalNumeric
        );
        assert_eq!(
            PairLayout::classify(Numeric, Categorical).kinds(),
            [Numeric, Categorical]
        );
        assert_eq!(
            PairLayout::classify(Categorical, Categorical).kinds(),
            [Categorical, Categorical]
        );
        assert_eq!(
            PairLayout::classify(Numeric, Numeric),
            PairLayout::NumericNumeric
        );
    }

    #[test]
    fn test_same_column_rejected() {
        assert_eq!(
            ColumnSelection::new("age", "age"),
            Err(SelectionError::SameColumn("age".to_string()))
        );
    }

    #[test]
    fn test_second_choices_exclude_first() {
        let columns = cols(&["city", "age", "income"]);
        for first in &columns {
            let options = second_choices(&columns, first);
            assert_eq!(options.len(), 2);
            assert!(!options.contains(&first.as_str()));
        }
    }

    #[test]
    fn test_default_selection() {
        let selection = ColumnSelection::default_for(&cols(&["city", "age", "income"])).unwrap();
        assert_eq!(selection.first(), "city");
        assert_eq!(selection.second(), "age");

        assert_eq!(
            ColumnSelection::default_for(&cols(&["only"])),
            Err(SelectionError::NotEnoughColumns)
        );
    }

    #[test]
    fn test_changing_first_resets_clashing_second() {
        let columns = cols(&["city", "age", "income"]);
        let selection = ColumnSelection::new("city", "age").unwrap();

        let kept = selection.with_first(&columns, "income").unwrap();
        assert_eq!((kept.first(), kept.second()), ("income", "age"));

        let reset = selection.with_first(&columns, "age").unwrap();
        assert_eq!((reset.first(), reset.second()), ("age", "city"));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let columns = cols(&["city", "age"]);
        let selection = ColumnSelection::default_for(&columns).unwrap();
        assert_eq!(
            selection.with_second(&columns, "zip"),
            Err(SelectionError::UnknownColumn("zip".to_string()))
        );
        assert!(selection.with_second(&columns, "city").is_err());
    }
}
