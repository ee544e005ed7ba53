//! Statistics Calculator Module
//! Descriptive statistics behind the imputer and the charts.

use polars::prelude::*;
use serde::Serialize;

const VALUE_COLUMN: &str = "value";
const COUNT_COLUMN: &str = "count";

/// Five-number summary plus outliers for a box plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub mean: f64,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Points beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

/// Occurrence count of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frequency {
    pub label: String,
    pub count: usize,
}

/// Handles descriptive statistics.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Arithmetic mean, NaN when empty.
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Sample variance (n - 1 denominator), NaN below two values.
    pub fn sample_variance(values: &[f64]) -> f64 {
        let n = values.len();
        if n < 2 {
            return f64::NAN;
        }
        let mean = Self::mean(values);
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Quartiles, 1.5 IQR whiskers and outliers. NaN values are ignored.
    pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if finite.is_empty() {
            return None;
        }
        let sorted = Self::sorted(&finite);

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        // Whiskers reach the furthest points still inside the fences
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(BoxSummary {
            count: sorted.len(),
            mean: Self::mean(&sorted),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }

    /// Category counts, most frequent first. Missing cells are skipped and
    /// ties keep first-appearance order.
    pub fn value_counts(series: &Series) -> PolarsResult<Vec<Frequency>> {
        let counts = series
            .clone()
            .with_name(VALUE_COLUMN.into())
            .into_frame()
            .lazy()
            .filter(col(VALUE_COLUMN).is_not_null())
            .group_by_stable([col(VALUE_COLUMN).cast(DataType::String)])
            .agg([len().alias(COUNT_COLUMN)])
            .sort(
                [COUNT_COLUMN],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_maintain_order(true),
            )
            .collect()?;

        let labels = counts.column(VALUE_COLUMN)?.str()?;
        let totals = counts.column(COUNT_COLUMN)?.cast(&DataType::UInt64)?;
        let totals = totals.u64()?;

        Ok(labels
            .into_iter()
            .zip(totals.into_iter())
            .filter_map(|(label, count)| {
                Some(Frequency {
                    label: label?.to_string(),
                    count: count? as usize,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_variance_needs_two_values() {
        assert!(StatsCalculator::sample_variance(&[1.0]).is_nan());
        assert_eq!(StatsCalculator::sample_variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5);
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 25.0), 1.75);
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 2.5);
        assert_eq!(StatsCalculator::percentile(&sorted, 75.0), 3.25);
    }

    #[test]
    fn test_box_summary_flags_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let summary = StatsCalculator::box_summary(&values).unwrap();

        assert_eq!(summary.count, 9);
        assert_eq!(summary.q1, 3.0);
        assert_eq!(summary.median, 5.0);
        assert_eq!(summary.q3, 7.0);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 8.0);
        assert_eq!(summary.outliers, vec![100.0]);
    }

    #[test]
    fn test_box_summary_empty() {
        assert!(StatsCalculator::box_summary(&[]).is_none());
        assert!(StatsCalculator::box_summary(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_value_counts_order() {
        let series = Series::new(
            "letter".into(),
            [Some("b"), Some("a"), Some("b"), Some("c"), None, Some("a"), Some("b")],
        );

        let counts = StatsCalculator::value_counts(&series).unwrap();

        assert_eq!(
            counts,
            vec![
                Frequency { label: "b".to_string(), count: 3 },
                Frequency { label: "a".to_string(), count: 2 },
                Frequency { label: "c".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_value_counts_ties_keep_first_appearance() {
        let series = Series::new("kind".into(), ["y", "x", "z", "x", "y", "z"]);

        let labels: Vec<String> = StatsCalculator::value_counts(&series)
            .unwrap()
            .into_iter()
            .map(|f| f.label)
            .collect();

        assert_eq!(labels, vec!["y", "x", "z"]);
    }

    #[test]
    fn test_value_counts_labels_numbers_as_text() {
        let series = Series::new("flag".into(), [Some(1i64), Some(0), None, Some(1)]);

        let counts = StatsCalculator::value_counts(&series).unwrap();

        assert_eq!(
            counts,
            vec![
                Frequency { label: "1".to_string(), count: 2 },
                Frequency { label: "0".to_string(), count: 1 },
            ]
        );
    }
}
