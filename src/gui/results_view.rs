//! Results View Widget
//! Central scrollable area: load status, distribution charts and test results.

use crate::charts::ChartPlotter;
use crate::messages;
use crate::session::{AnalysisView, LoadedView, SessionView};
use crate::stats::{ChiSquareResult, HypothesisError, TestResult};
use egui::{Color32, RichText, ScrollArea};
use tracing::warn;

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const SUCCESS_COLOR: Color32 = Color32::from_rgb(40, 167, 69);

/// Scrollable display of the current session view.
#[derive(Default)]
pub struct ResultsView {
    /// Set after "copy as JSON" until the next re-render.
    copied: bool,
}

impl ResultsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset per-render state
    pub fn clear(&mut self) {
        self.copied = false;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, view: &SessionView) {
        match view {
            SessionView::AwaitingUpload => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(messages::UPLOAD_PROMPT).size(20.0));
                });
            }
            SessionView::LoadFailed { message, .. } => {
                ui.add_space(10.0);
                ui.label(RichText::new(message).size(16.0).color(ERROR_COLOR));
            }
            SessionView::Loaded(loaded) => {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.show_loaded(ui, loaded));
            }
        }
    }

    fn show_loaded(&mut self, ui: &mut egui::Ui, loaded: &LoadedView) {
        ui.label(RichText::new(messages::LOAD_SUCCESS).size(15.0).color(SUCCESS_COLOR));
        for filled in &loaded.imputation.filled {
            ui.label(
                RichText::new(messages::imputed_summary(
                    &filled.column,
                    filled.filled,
                    filled.median,
                ))
                .size(11.0)
                .color(Color32::GRAY),
            );
        }

        let Some(analysis) = &loaded.analysis else {
            ui.add_space(10.0);
            ui.label(messages::NOT_ENOUGH_COLUMNS);
            return;
        };

        ui.add_space(10.0);
        ui.heading(messages::COLUMN_SECTION);
        ui.label(messages::selected_columns(
            analysis.selection.first(),
            analysis.selection.second(),
        ));

        ui.add_space(10.0);
        ui.heading(messages::CHARTS_SECTION);
        ui.columns(2, |columns| {
            for (ui, chart) in columns.iter_mut().zip(analysis.charts.iter()) {
                egui::Frame::none()
                    .rounding(8.0)
                    .stroke(egui::Stroke::new(1.0, Color32::from_gray(120)))
                    .inner_margin(10.0)
                    .show(ui, |ui| ChartPlotter::draw_chart(ui, chart));
            }
        });

        ui.add_space(10.0);
        ui.label(messages::selected_alpha(analysis.alpha.value()));

        self.show_outcome(ui, analysis);
    }

    fn show_outcome(&mut self, ui: &mut egui::Ui, analysis: &AnalysisView) {
        let Some(outcome) = &analysis.outcome else {
            return;
        };

        ui.add_space(10.0);
        ui.heading(messages::RESULTS_SECTION);

        match outcome {
            Ok(result) => self.show_result(ui, result),
            Err(err) => Self::show_error(ui, err),
        }
    }

    fn show_result(&mut self, ui: &mut egui::Ui, result: &TestResult) {
        let lines = result.summary_lines();
        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            if i == last {
                let color = if result.verdict().is_significant() {
                    ERROR_COLOR
                } else {
                    SUCCESS_COLOR
                };
                ui.label(RichText::new(line).strong().color(color));
            } else {
                ui.label(line);
            }
        }

        if let TestResult::ChiSquare(chi) = result {
            ui.add_space(8.0);
            Self::draw_contingency_table(ui, chi);
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button(messages::COPY_JSON).clicked() {
                match result.to_json() {
                    Ok(json) => {
                        ui.ctx().copy_text(json);
                        self.copied = true;
                    }
                    Err(e) => warn!("Could not serialize result: {}", e),
                }
            }
            if self.copied {
                ui.label(RichText::new("✓").color(SUCCESS_COLOR));
            }
        });
    }

    fn show_error(ui: &mut egui::Ui, err: &HypothesisError) {
        ui.label(RichText::new(format!("Ошибка: {err}")).color(ERROR_COLOR));
    }

    /// Observed counts with expected counts in parentheses.
    fn draw_contingency_table(ui: &mut egui::Ui, chi: &ChiSquareResult) {
        let table = &chi.table;
        ui.label(RichText::new(messages::CONTINGENCY_TABLE).strong());

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::horizontal().show(ui, |ui| {
                    egui::Grid::new("contingency_table")
                        .striped(true)
                        .min_col_width(50.0)
                        .spacing([8.0, 4.0])
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(format!(
                                    "{} \\ {}",
                                    table.row_column, table.col_column
                                ))
                                .strong()
                                .size(11.0),
                            );
                            for label in &table.col_labels {
                                ui.label(RichText::new(label).strong().size(11.0));
                            }
                            ui.end_row();

                            for (i, row_label) in table.row_labels.iter().enumerate() {
                                ui.label(RichText::new(row_label).strong().size(11.0));
                                for (j, count) in table.counts[i].iter().enumerate() {
                                    let expected = chi.expected[i][j];
                                    ui.label(
                                        RichText::new(format!("{count} ({expected:.1})"))
                                            .size(11.0),
                                    );
                                }
                                ui.end_row();
                            }
                        });
                });
            });
    }
}
