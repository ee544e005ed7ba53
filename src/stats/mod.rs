//! Stats module - descriptive statistics and hypothesis tests

mod calculator;
mod hypothesis;

pub use calculator::{BoxSummary, Frequency, StatsCalculator};
pub use hypothesis::{
    Alpha, AlphaError, ChiSquareResult, ContingencyTable, HypothesisError, HypothesisTester,
    TTestResult, TTestVariant, TestMethod, TestResult, Verdict,
};
