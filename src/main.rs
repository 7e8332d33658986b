#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod api;
mod config;
mod picker;
mod ui;

use anyhow::Context;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use config::Config;

fn init_logging(config: &Config) {
    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(&config);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "could not load config, using defaults");
    }

    let runtime = tokio::runtime::Runtime::new()
        .context("Failed to create tokio runtime")?;

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1200.0, 900.0])
        .with_min_inner_size([900.0, 700.0])
        .with_title("Casedesk");

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    tracing::info!(server = %config.base_url(), "starting casedesk");
    eframe::run_native(
        "Casedesk",
        options,
        Box::new(|cc| Ok(Box::new(ui::CaseDeskApp::new(cc, config, runtime)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
