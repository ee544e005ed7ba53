//! Chart data preparation, independent of any UI.

use crate::data::{ColumnKind, ColumnSelection, Dataset, PairLayout};
use crate::messages;
use crate::stats::{BoxSummary, Frequency, StatsCalculator};
use tracing::warn;

/// Angle of the first wedge edge, degrees counter-clockwise from +x.
pub const PIE_START_ANGLE: f64 = 140.0;

/// One wedge of a pie chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    /// Share of the non-missing cells, 0-100.
    pub percent: f64,
    pub start_deg: f64,
    pub sweep_deg: f64,
}

impl PieSlice {
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent)
    }

    /// Angle through the middle of the wedge.
    pub fn mid_deg(&self) -> f64 {
        self.start_deg + self.sweep_deg / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChartData {
    pub column: String,
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChartData {
    /// Frequencies of a categorical column laid out counter-clockwise from
    /// [`PIE_START_ANGLE`].
    pub fn from_frequencies(column: &str, frequencies: Vec<Frequency>) -> Self {
        let total: usize = frequencies.iter().map(|f| f.count).sum();

        let mut start = PIE_START_ANGLE;
        let slices = frequencies
            .into_iter()
            .map(|f| {
                let share = f.count as f64 / total as f64;
                let slice = PieSlice {
                    label: f.label,
                    count: f.count,
                    percent: share * 100.0,
                    start_deg: start,
                    sweep_deg: share * 360.0,
                };
                start += slice.sweep_deg;
                slice
            })
            .collect();

        Self {
            column: column.to_string(),
            title: messages::distribution_title(column),
            slices,
        }
    }

    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotData {
    pub column: String,
    pub title: String,
    /// `None` when the column has no usable values.
    pub summary: Option<BoxSummary>,
}

impl BoxPlotData {
    pub fn from_values(column: &str, values: &[f64]) -> Self {
        Self {
            column: column.to_string(),
            title: messages::distribution_title(column),
            summary: StatsCalculator::box_summary(values),
        }
    }
}

/// A chart ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Pie(PieChartData),
    Box(BoxPlotData),
}

impl ChartData {
    pub fn column(&self) -> &str {
        match self {
            ChartData::Pie(p) => &p.column,
            ChartData::Box(b) => &b.column,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ChartData::Pie(p) => &p.title,
            ChartData::Box(b) => &b.title,
        }
    }

    /// Pie for a categorical column, box plot for a numeric one.
    pub fn for_column(dataset: &Dataset, column: &str, kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Categorical => {
                let frequencies = dataset
                    .frame()
                    .column(column)
                    .and_then(|col| StatsCalculator::value_counts(col.as_materialized_series()))
                    .unwrap_or_else(|e| {
                        warn!("No frequencies for '{}': {}", column, e);
                        Vec::new()
                    });
                ChartData::Pie(PieChartData::from_frequencies(column, frequencies))
            }
            ColumnKind::Numeric => {
                let values = dataset.numeric_values(column).unwrap_or_default();
                ChartData::Box(BoxPlotData::from_values(column, &values))
            }
        }
    }

    /// Charts for the selected pair, following the pair's layout branch.
    /// `None` if a selected column is missing from the dataset.
    pub fn for_selection(dataset: &Dataset, selection: &ColumnSelection) -> Option<[Self; 2]> {
        let layout = PairLayout::classify(
            dataset.column_kind(selection.first())?,
            dataset.column_kind(selection.second())?,
        );
        let [first, second] = layout.kinds();
        Some([
            Self::for_column(dataset, selection.first(), first),
            Self::for_column(dataset, selection.second(), second),
        ])
    }
}
