//! Stat Explorer - CSV Explorer with Distribution Charts & Hypothesis Tests
//!
//! Desktop entry point: loads the config, sets up logging and opens the window.

use anyhow::{anyhow, Result};
use eframe::egui;
use stat_explorer::gui::ExplorerApp;
use stat_explorer::{messages, AppConfig};
use tracing::info;

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.log_filter);
    info!("Starting Stat Explorer with {:?}", config);

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([900.0, 600.0])
            .with_title(messages::APP_TITLE),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Stat Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(ExplorerApp::new(cc, &config)))),
    )
    .map_err(|e| anyhow!("GUI error: {e}"))
}
