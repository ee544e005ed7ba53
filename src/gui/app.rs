//! Stat Explorer Main Application
//! Main window with control panel and results view.

use crate::config::AppConfig;
use crate::gui::{ControlPanel, ControlPanelAction, ResultsView};
use crate::session::{Session, SessionView};
use egui::SidePanel;
use tracing::{debug, info, warn};

/// Main application window.
///
/// All work happens on the UI thread: an interaction mutates the session,
/// and the next frame re-renders the whole view from it.
pub struct ExplorerApp {
    session: Session,
    control_panel: ControlPanel,
    results_view: ResultsView,
    view: SessionView,
    rendered_revision: Option<u64>,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: &AppConfig) -> Self {
        Self {
            session: Session::new(config),
            control_panel: ControlPanel::new(),
            results_view: ResultsView::new(),
            view: SessionView::AwaitingUpload,
            rendered_revision: None,
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            info!("Uploading {}", path.display());
            self.session.upload_path(&path);
        }
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::None => {}
            ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
            ControlPanelAction::FirstColumn(column) => {
                if let Err(e) = self.session.select_first(&column) {
                    warn!("Ignoring first column {}: {}", column, e);
                }
            }
            ControlPanelAction::SecondColumn(column) => {
                if let Err(e) = self.session.select_second(&column) {
                    warn!("Ignoring second column {}: {}", column, e);
                }
            }
            ControlPanelAction::Alpha(alpha) => self.session.set_alpha(alpha),
            ControlPanelAction::Method(method) => self.session.set_method(method),
            ControlPanelAction::Variant(variant) => self.session.set_variant(variant),
        }
    }

    /// Re-run the pipeline if any input changed since the last render.
    fn refresh(&mut self) {
        let revision = self.session.revision();
        if self.rendered_revision == Some(revision) {
            return;
        }

        debug!("Re-rendering session revision {}", revision);
        self.view = self.session.render();
        self.control_panel.update_status(&self.view);
        self.results_view.clear();
        self.rendered_revision = Some(revision);
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh();

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &self.session, &self.view);
                    self.handle_action(action);
                });
            });

        // Inputs may have changed above; render before drawing results
        self.refresh();

        // Central panel - Results
        egui::CentralPanel::default().show(ctx, |ui| {
            self.results_view.show(ui, &self.view);
        });
    }
}
