//! Loaded dataset with column accessors.

use super::ColumnKind;
use polars::prelude::*;

/// A parsed table plus the name of the file it came from.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: String,
    df: DataFrame,
}

impl Dataset {
    pub fn new(source: &str, df: DataFrame) -> Self {
        Self {
            source: source.to_string(),
            df,
        }
    }

    /// Get list of column names in file order.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Classify a column, `None` if it does not exist.
    pub fn column_kind(&self, column: &str) -> Option<ColumnKind> {
        self.df
            .column(column)
            .ok()
            .map(|col| ColumnKind::from_dtype(col.dtype()))
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.height()
    }

    pub fn get_column_count(&self) -> usize {
        self.df.width()
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn frame_mut(&mut self) -> &mut DataFrame {
        &mut self.df
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Non-missing values of a column as f64.
    ///
    /// Returns `None` when the column is missing or cannot be cast to
    /// numbers (text columns).
    pub fn numeric_values(&self, column: &str) -> Option<Vec<f64>> {
        let col = self.df.column(column).ok()?;
        if ColumnKind::from_dtype(col.dtype()) == ColumnKind::Categorical {
            return None;
        }
        let cast = col.cast(&DataType::Float64).ok()?;
        let ca = cast.f64().ok()?;
        Some(ca.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let df = df![
            "city" => [Some("Moscow"), None, Some("Kazan")],
            "age" => [Some(30i64), Some(25), None],
        ]
        .unwrap();
        Dataset::new("sample.csv", df)
    }

    #[test]
    fn test_numeric_values_drop_missing() {
        assert_eq!(sample().numeric_values("age").unwrap(), vec![30.0, 25.0]);
    }

    #[test]
    fn test_numeric_values_rejects_text() {
        assert!(sample().numeric_values("city").is_none());
        assert!(sample().numeric_values("nope").is_none());
    }
}
