//! Chart Plotter Module
//! Draws pie charts and box plots using egui_plot.

use super::{BoxPlotData, ChartData, PieChartData, PieSlice};
use crate::messages;
use egui::{Color32, RichText};
use egui_plot::{
    BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

/// Wedge colors, cycled when there are more categories.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(31, 119, 180),  // Blue
    Color32::from_rgb(255, 127, 14),  // Orange
    Color32::from_rgb(44, 160, 44),   // Green
    Color32::from_rgb(214, 39, 40),   // Red
    Color32::from_rgb(148, 103, 189), // Purple
    Color32::from_rgb(140, 86, 75),   // Brown
    Color32::from_rgb(227, 119, 194), // Pink
    Color32::from_rgb(127, 127, 127), // Grey
    Color32::from_rgb(188, 189, 34),  // Olive
    Color32::from_rgb(23, 190, 207),  // Cyan
];

pub const BOX_COLOR: Color32 = Color32::from_rgb(52, 152, 219);
const OUTLIER_COLOR: Color32 = Color32::from_rgb(90, 90, 90);

/// Largest arc drawn as one polygon; egui only fills convex shapes.
const MAX_SEGMENT_DEG: f64 = 90.0;
/// Arc resolution.
const ARC_STEP_DEG: f64 = 2.0;

const CHART_HEIGHT: f32 = 320.0;

/// Creates distribution charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn slice_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw a titled chart of either kind.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartData) {
        ui.label(RichText::new(chart.title()).size(15.0).strong());
        ui.add_space(4.0);
        match chart {
            ChartData::Pie(pie) => Self::draw_pie_chart(ui, pie),
            ChartData::Box(data) => Self::draw_box_plot(ui, data),
        }
    }

    /// Outline of a wedge (or a piece of one): center, then arc points.
    pub fn wedge_points(start_deg: f64, sweep_deg: f64, radius: f64) -> Vec<[f64; 2]> {
        let steps = ((sweep_deg / ARC_STEP_DEG).ceil() as usize).max(1);
        let mut points = Vec::with_capacity(steps + 2);
        points.push([0.0, 0.0]);
        for i in 0..=steps {
            let angle = (start_deg + sweep_deg * i as f64 / steps as f64).to_radians();
            points.push([radius * angle.cos(), radius * angle.sin()]);
        }
        points
    }

    /// Split a wedge into convex pieces of at most [`MAX_SEGMENT_DEG`].
    pub fn wedge_segments(slice: &PieSlice) -> Vec<(f64, f64)> {
        let mut segments = Vec::new();
        let mut start = slice.start_deg;
        let end = slice.start_deg + slice.sweep_deg;
        while start < end {
            let sweep = (end - start).min(MAX_SEGMENT_DEG);
            segments.push((start, sweep));
            start += sweep;
        }
        segments
    }

    /// Pie chart with "category / percent" labels on each wedge.
    pub fn draw_pie_chart(ui: &mut egui::Ui, pie: &PieChartData) {
        if pie.slices.is_empty() {
            ui.label(RichText::new(messages::EMPTY_CHART).color(Color32::GRAY));
            return;
        }

        Plot::new(format!("pie_{}", pie.column))
            .height(CHART_HEIGHT)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(-1.4)
            .include_x(1.4)
            .include_y(-1.25)
            .include_y(1.25)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, slice) in pie.slices.iter().enumerate() {
                    let color = Self::slice_color(i);

                    for (start, sweep) in Self::wedge_segments(slice) {
                        let points = Self::wedge_points(start, sweep, 1.0);
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::new(points))
                                .fill_color(color)
                                .stroke(egui::Stroke::new(1.0, Color32::WHITE))
                                .name(&slice.label),
                        );
                    }

                    let mid = slice.mid_deg().to_radians();
                    plot_ui.text(Text::new(
                        PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                        RichText::new(slice.percent_label()).color(Color32::WHITE).strong(),
                    ));
                    plot_ui.text(Text::new(
                        PlotPoint::new(1.15 * mid.cos(), 1.15 * mid.sin()),
                        RichText::new(&slice.label).size(12.0),
                    ));
                }
            });
    }

    /// Horizontal box plot: whiskers, quartiles, median and outlier points.
    pub fn draw_box_plot(ui: &mut egui::Ui, data: &BoxPlotData) {
        let Some(summary) = &data.summary else {
            ui.label(RichText::new(messages::EMPTY_CHART).color(Color32::GRAY));
            return;
        };

        let column = data.column.clone();
        Plot::new(format!("box_{}", data.column))
            .height(CHART_HEIGHT)
            .allow_zoom(true)
            .allow_drag(true)
            .allow_scroll(false)
            .show_y(false)
            .include_y(-1.0)
            .include_y(1.0)
            .x_axis_label(column)
            .y_axis_formatter(|_mark, _range| String::new())
            .show(ui, |plot_ui| {
                let elem = BoxElem::new(
                    0.0,
                    BoxSpread::new(
                        summary.lower_whisker,
                        summary.q1,
                        summary.median,
                        summary.q3,
                        summary.upper_whisker,
                    ),
                )
                .box_width(0.6)
                .whisker_width(0.3)
                .fill(BOX_COLOR.gamma_multiply(0.4))
                .stroke(egui::Stroke::new(1.5, BOX_COLOR));

                plot_ui.box_plot(BoxPlot::new(vec![elem]).horizontal().name(&data.column));

                if !summary.outliers.is_empty() {
                    let points: PlotPoints = summary.outliers.iter().map(|&x| [x, 0.0]).collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(3.5)
                            .filled(false)
                            .color(OUTLIER_COLOR),
                    );
                }
            });

        ui.label(
            RichText::new(format!(
                "n = {}, Q1 = {:.3}, медиана = {:.3}, Q3 = {:.3}, выбросов: {}",
                summary.count,
                summary.q1,
                summary.median,
                summary.q3,
                summary.outliers.len()
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );
    }
}
