//! Control Panel Widget
//! Left side panel: file upload, column selectors, alpha slider and test method.

use crate::messages;
use crate::session::{Session, SessionView};
use crate::stats::{Alpha, TTestVariant, TestMethod};
use egui::{Color32, ComboBox, RichText};

/// Left side control panel. Widgets read their values from the session and
/// report changes as a [`ControlPanelAction`].
pub struct ControlPanel {
    pub status: String,
    pub status_is_error: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            status: messages::UPLOAD_PROMPT.to_string(),
            status_is_error: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sync the status line with the latest rendered view.
    pub fn update_status(&mut self, view: &SessionView) {
        match view {
            SessionView::AwaitingUpload => {
                self.status = messages::UPLOAD_PROMPT.to_string();
                self.status_is_error = false;
            }
            SessionView::LoadFailed { message, .. } => {
                self.status = message.clone();
                self.status_is_error = true;
            }
            SessionView::Loaded(loaded) => {
                self.status = messages::loaded_summary(loaded.rows, loaded.columns.len());
                self.status_is_error = false;
            }
        }
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        session: &Session,
        view: &SessionView,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new(messages::APP_TITLE)
                    .size(18.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new(messages::UPLOAD_PROMPT).size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let file_text = match view {
                        SessionView::Loaded(loaded) => loaded.source.clone(),
                        SessionView::LoadFailed { source, .. } => source.clone(),
                        SessionView::AwaitingUpload => messages::NO_FILE.to_string(),
                    };
                    ui.label(RichText::new(file_text).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(messages::BROWSE_BUTTON).clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(5.0);
        let status_color = if self.status_is_error {
            Color32::from_rgb(220, 53, 69)
        } else if session.dataset().is_some() {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        let SessionView::Loaded(loaded) = view else {
            return action;
        };
        let Some(analysis) = &loaded.analysis else {
            ui.add_space(10.0);
            ui.label(RichText::new(messages::NOT_ENOUGH_COLUMNS).color(Color32::GRAY));
            return action;
        };

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Column Selection Section =====
        ui.label(RichText::new(messages::COLUMN_SECTION).size(14.0).strong());
        ui.add_space(8.0);

        let combo_width = 220.0;

        ui.label(messages::FIRST_COLUMN);
        ComboBox::from_id_salt("first_column")
            .width(combo_width)
            .selected_text(analysis.selection.first())
            .show_ui(ui, |ui| {
                for col in &loaded.columns {
                    if ui
                        .selectable_label(*col == analysis.selection.first(), col)
                        .clicked()
                    {
                        action = ControlPanelAction::FirstColumn(col.clone());
                    }
                }
            });

        ui.add_space(5.0);

        // Second selector never offers the first column
        ui.label(messages::SECOND_COLUMN);
        ComboBox::from_id_salt("second_column")
            .width(combo_width)
            .selected_text(analysis.selection.second())
            .show_ui(ui, |ui| {
                for col in &analysis.second_options {
                    if ui
                        .selectable_label(*col == analysis.selection.second(), col)
                        .clicked()
                    {
                        action = ControlPanelAction::SecondColumn(col.clone());
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Test Settings Section =====
        ui.label(messages::ALPHA_LABEL);
        let mut alpha = session.alpha().value();
        let slider = egui::Slider::new(&mut alpha, Alpha::MIN..=Alpha::MAX)
            .step_by(Alpha::STEP)
            .fixed_decimals(2);
        if ui.add(slider).changed() {
            action = ControlPanelAction::Alpha(alpha);
        }

        ui.add_space(8.0);

        ui.label(messages::METHOD_LABEL);
        ComboBox::from_id_salt("test_method")
            .width(combo_width)
            .selected_text(session.method().label())
            .show_ui(ui, |ui| {
                for method in TestMethod::ALL {
                    if ui
                        .selectable_label(session.method() == method, method.label())
                        .clicked()
                    {
                        action = ControlPanelAction::Method(method);
                    }
                }
            });

        if session.method() == TestMethod::TTest {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label(messages::VARIANT_LABEL);
                for variant in [TTestVariant::Student, TTestVariant::Welch] {
                    if ui
                        .radio(session.variant() == variant, variant.label())
                        .clicked()
                    {
                        action = ControlPanelAction::Variant(variant);
                    }
                }
            });
        }

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    FirstColumn(String),
    SecondColumn(String),
    Alpha(f64),
    Method(TestMethod),
    Variant(TTestVariant),
}
