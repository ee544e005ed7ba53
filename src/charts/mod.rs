//! Charts module - chart data preparation and rendering

mod model;
mod plotter;

pub use model::{BoxPlotData, ChartData, PieChartData, PieSlice, PIE_START_ANGLE};
pub use plotter::ChartPlotter;
