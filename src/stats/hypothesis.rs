//! Hypothesis Test Runner
//! Chi-square independence test and two-sample t-test with an alpha verdict.

use super::StatsCalculator;
use crate::data::{ColumnSelection, Dataset};
use crate::messages;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF, StudentsT};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::{debug, info};

const ROW_KEY: &str = "row";
const COL_KEY: &str = "col";
const COUNT_KEY: &str = "count";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlphaError {
    #[error("alpha {0} is outside [0.01, 0.10]")]
    OutOfRange(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HypothesisError {
    #[error("Column '{0}' not found in dataset")]
    UnknownColumn(String),
    #[error("Column '{0}' does not hold numbers")]
    NonNumeric(String),
    #[error("Contingency table is empty: no rows with both values present")]
    EmptyTable,
    #[error("Distribution error: {0}")]
    Distribution(String),
    #[error("Polars error: {0}")]
    Polars(String),
}

/// Significance threshold, always within [0.01, 0.10].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Alpha(f64);

impl Alpha {
    pub const MIN: f64 = 0.01;
    pub const MAX: f64 = 0.10;
    pub const STEP: f64 = 0.01;
    pub const DEFAULT: f64 = 0.05;

    const TOLERANCE: f64 = 1e-9;

    pub fn new(value: f64) -> Result<Self, AlphaError> {
        if value.is_finite()
            && value >= Self::MIN - Self::TOLERANCE
            && value <= Self::MAX + Self::TOLERANCE
        {
            Ok(Self(value.clamp(Self::MIN, Self::MAX)))
        } else {
            Err(AlphaError::OutOfRange(value))
        }
    }

    /// Clamp a raw slider position into range and snap it to the 0.01 grid.
    pub fn from_slider(value: f64) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        let snapped = (value.clamp(Self::MIN, Self::MAX) * 100.0).round() / 100.0;
        Self(snapped)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_significant(self, p_value: f64) -> bool {
        p_value < self.0
    }
}

impl Default for Alpha {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Test chosen in the method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestMethod {
    #[default]
    None,
    ChiSquare,
    TTest,
}

impl TestMethod {
    pub const ALL: [TestMethod; 3] = [TestMethod::None, TestMethod::ChiSquare, TestMethod::TTest];

    pub fn label(self) -> &'static str {
        match self {
            TestMethod::None => messages::METHOD_PLACEHOLDER,
            TestMethod::ChiSquare => "Chi-Square Test",
            TestMethod::TTest => "T-Test",
        }
    }
}

/// Variance assumption of the two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TTestVariant {
    /// Pooled variance.
    #[default]
    Student,
    /// Unequal variances, Welch-Satterthwaite degrees of freedom.
    Welch,
}

impl TTestVariant {
    pub fn label(self) -> &'static str {
        match self {
            TTestVariant::Student => "Student",
            TTestVariant::Welch => "Welch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Significant,
    NotSignificant,
}

impl Verdict {
    /// Significant iff `p < alpha`; a NaN p-value is never significant.
    pub fn from_p_value(p_value: f64, alpha: Alpha) -> Self {
        if alpha.is_significant(p_value) {
            Verdict::Significant
        } else {
            Verdict::NotSignificant
        }
    }

    pub fn is_significant(self) -> bool {
        self == Verdict::Significant
    }
}

/// Cross-tabulation of two columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyTable {
    pub row_column: String,
    pub col_column: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `counts[row][col]`
    pub counts: Vec<Vec<u64>>,
}

impl ContingencyTable {
    /// Count co-occurrences of two columns' values, keyed by their text
    /// form. Rows where either value is missing are skipped; labels are
    /// sorted.
    pub fn from_frame(df: &DataFrame, row_column: &str, col_column: &str) -> PolarsResult<Self> {
        let pairs = df
            .clone()
            .lazy()
            .select([
                col(row_column).cast(DataType::String).alias(ROW_KEY),
                col(col_column).cast(DataType::String).alias(COL_KEY),
            ])
            .filter(col(ROW_KEY).is_not_null().and(col(COL_KEY).is_not_null()))
            .group_by([col(ROW_KEY), col(COL_KEY)])
            .agg([len().alias(COUNT_KEY)])
            .collect()?;

        let rows = pairs.column(ROW_KEY)?.str()?;
        let cols = pairs.column(COL_KEY)?.str()?;
        let totals = pairs.column(COUNT_KEY)?.cast(&DataType::UInt64)?;
        let totals = totals.u64()?;

        let cells: Vec<(&str, &str, u64)> = rows
            .into_iter()
            .zip(cols)
            .zip(totals)
            .filter_map(|((r, c), n)| Some((r?, c?, n?)))
            .collect();

        let row_labels: Vec<String> = cells
            .iter()
            .map(|(r, _, _)| *r)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        let col_labels: Vec<String> = cells
            .iter()
            .map(|(_, c, _)| *c)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let row_index: HashMap<&str, usize> = row_labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();
        let col_index: HashMap<&str, usize> = col_labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();

        let mut counts = vec![vec![0u64; col_labels.len()]; row_labels.len()];
        for (r, c, n) in &cells {
            if let (Some(&i), Some(&j)) = (row_index.get(r), col_index.get(c)) {
                counts[i][j] = *n;
            }
        }

        Ok(Self {
            row_column: row_column.to_string(),
            col_column: col_column.to_string(),
            row_labels,
            col_labels,
            counts,
        })
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.col_labels.is_empty()
    }

    /// Expected counts under independence.
    pub fn expected(&self) -> Vec<Vec<f64>> {
        let total = self.total() as f64;
        let row_sums: Vec<f64> = self
            .counts
            .iter()
            .map(|row| row.iter().sum::<u64>() as f64)
            .collect();
        let col_sums: Vec<f64> = (0..self.col_labels.len())
            .map(|j| self.counts.iter().map(|row| row[j]).sum::<u64>() as f64)
            .collect();

        row_sums
            .iter()
            .map(|r| col_sums.iter().map(|c| r * c / total).collect())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
    /// Yates' continuity correction applied (one degree of freedom).
    pub corrected: bool,
    pub table: ContingencyTable,
    pub expected: Vec<Vec<f64>>,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TTestResult {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
    pub variant: TTestVariant,
    pub sizes: (usize, usize),
    pub means: (f64, f64),
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum TestResult {
    ChiSquare(ChiSquareResult),
    TTest(TTestResult),
}

impl TestResult {
    pub fn p_value(&self) -> f64 {
        match self {
            TestResult::ChiSquare(r) => r.p_value,
            TestResult::TTest(r) => r.p_value,
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self {
            TestResult::ChiSquare(r) => r.verdict,
            TestResult::TTest(r) => r.verdict,
        }
    }

    /// Result text as shown in the results panel.
    pub fn summary_lines(&self) -> Vec<String> {
        match self {
            TestResult::ChiSquare(r) => vec![
                messages::CHI_SQUARE_HEADER.to_string(),
                format!("Значение Chi-Square: {}", r.statistic),
                format!("P-значение: {}", r.p_value),
                format!("Степени свободы: {}", r.degrees_of_freedom),
                if r.verdict.is_significant() {
                    messages::CHI_SQUARE_SIGNIFICANT
                } else {
                    messages::CHI_SQUARE_NOT_SIGNIFICANT
                }
                .to_string(),
            ],
            TestResult::TTest(r) => vec![
                messages::T_TEST_HEADER.to_string(),
                format!("T-статистика: {}", r.statistic),
                format!("P-значение: {}", r.p_value),
                if r.verdict.is_significant() {
                    messages::T_TEST_SIGNIFICANT
                } else {
                    messages::T_TEST_NOT_SIGNIFICANT
                }
                .to_string(),
            ],
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs the selected test against the current dataset.
pub struct HypothesisTester;

impl HypothesisTester {
    /// Execute `method` on the selected pair; `None` when no method is chosen.
    pub fn run(
        method: TestMethod,
        dataset: &Dataset,
        selection: &ColumnSelection,
        alpha: Alpha,
        variant: TTestVariant,
    ) -> Option<Result<TestResult, HypothesisError>> {
        let result = match method {
            TestMethod::None => return None,
            TestMethod::ChiSquare => {
                Self::chi_square(dataset, selection, alpha).map(TestResult::ChiSquare)
            }
            TestMethod::TTest => {
                Self::t_test(dataset, selection, alpha, variant).map(TestResult::TTest)
            }
        };
        Some(result)
    }

    /// Chi-square independence test on any two columns.
    pub fn chi_square(
        dataset: &Dataset,
        selection: &ColumnSelection,
        alpha: Alpha,
    ) -> Result<ChiSquareResult, HypothesisError> {
        for column in [selection.first(), selection.second()] {
            if dataset.column_kind(column).is_none() {
                return Err(HypothesisError::UnknownColumn(column.to_string()));
            }
        }

        let table =
            ContingencyTable::from_frame(dataset.frame(), selection.first(), selection.second())
                .map_err(|e| HypothesisError::Polars(e.to_string()))?;
        let result = Self::chi_square_table(table, alpha)?;

        info!(
            "Chi-square {} x {}: chi2={}, p={}, dof={}",
            selection.first(),
            selection.second(),
            result.statistic,
            result.p_value,
            result.degrees_of_freedom
        );
        Ok(result)
    }

    /// Chi-square statistic for a prepared contingency table.
    pub fn chi_square_table(
        table: ContingencyTable,
        alpha: Alpha,
    ) -> Result<ChiSquareResult, HypothesisError> {
        if table.is_empty() {
            return Err(HypothesisError::EmptyTable);
        }

        let expected = table.expected();
        let dof = (table.row_labels.len() - 1) * (table.col_labels.len() - 1);

        if dof == 0 {
            // Single category on either side: nothing to test
            return Ok(ChiSquareResult {
                statistic: 0.0,
                p_value: 1.0,
                degrees_of_freedom: 0,
                corrected: false,
                verdict: Verdict::from_p_value(1.0, alpha),
                table,
                expected,
            });
        }

        let corrected = dof == 1;
        let mut statistic = 0.0;
        for (observed_row, expected_row) in table.counts.iter().zip(expected.iter()) {
            for (&observed, &e) in observed_row.iter().zip(expected_row.iter()) {
                let mut o = observed as f64;
                if corrected {
                    let diff = e - o;
                    o += diff.abs().min(0.5) * diff.signum();
                }
                statistic += (o - e).powi(2) / e;
            }
        }

        let dist = ChiSquared::new(dof as f64)
            .map_err(|e| HypothesisError::Distribution(e.to_string()))?;
        let p_value = dist.sf(statistic);

        Ok(ChiSquareResult {
            statistic,
            p_value,
            degrees_of_freedom: dof,
            corrected,
            verdict: Verdict::from_p_value(p_value, alpha),
            table,
            expected,
        })
    }

    /// Two-sample t-test on the non-missing values of both columns.
    pub fn t_test(
        dataset: &Dataset,
        selection: &ColumnSelection,
        alpha: Alpha,
        variant: TTestVariant,
    ) -> Result<TTestResult, HypothesisError> {
        let first = Self::numeric_sample(dataset, selection.first())?;
        let second = Self::numeric_sample(dataset, selection.second())?;

        let result = Self::t_test_samples(&first, &second, variant, alpha);

        info!(
            "{} t-test {} vs {}: t={}, p={}",
            variant.label(),
            selection.first(),
            selection.second(),
            result.statistic,
            result.p_value
        );
        Ok(result)
    }

    fn numeric_sample(dataset: &Dataset, column: &str) -> Result<Vec<f64>, HypothesisError> {
        if dataset.column_kind(column).is_none() {
            return Err(HypothesisError::UnknownColumn(column.to_string()));
        }
        dataset
            .numeric_values(column)
            .ok_or_else(|| HypothesisError::NonNumeric(column.to_string()))
    }

    /// Independent two-sample t-test. Degenerate samples give NaN rather
    /// than an error.
    pub fn t_test_samples(
        a: &[f64],
        b: &[f64],
        variant: TTestVariant,
        alpha: Alpha,
    ) -> TTestResult {
        let n1 = a.len() as f64;
        let n2 = b.len() as f64;
        let mean1 = StatsCalculator::mean(a);
        let mean2 = StatsCalculator::mean(b);
        let var1 = StatsCalculator::sample_variance(a);
        let var2 = StatsCalculator::sample_variance(b);

        let (se, df) = match variant {
            TTestVariant::Student => {
                let df = n1 + n2 - 2.0;
                let pooled = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / df;
                ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
            }
            TTestVariant::Welch => {
                let vn1 = var1 / n1;
                let vn2 = var2 / n2;
                let df = (vn1 + vn2).powi(2)
                    / (vn1.powi(2) / (n1 - 1.0) + vn2.powi(2) / (n2 - 1.0));
                // Both variances zero: 0/0, fall back to one degree of freedom
                let df = if df.is_nan() { 1.0 } else { df };
                ((vn1 + vn2).sqrt(), df)
            }
        };

        let statistic = (mean1 - mean2) / se;
        let p_value = Self::two_sided_p(statistic, df);
        debug!("t-test: n=({}, {}), se={}, df={}", n1, n2, se, df);

        TTestResult {
            statistic,
            p_value,
            degrees_of_freedom: df,
            variant,
            sizes: (a.len(), b.len()),
            means: (mean1, mean2),
            verdict: Verdict::from_p_value(p_value, alpha),
        }
    }

    fn two_sided_p(t: f64, df: f64) -> f64 {
        if t.is_nan() || df.is_nan() || df <= 0.0 {
            return f64::NAN;
        }
        if t.is_infinite() {
            return 0.0;
        }
        match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => (2.0 * dist.sf(t.abs())).min(1.0),
            Err(_) => f64::NAN,
        }
    }
}
