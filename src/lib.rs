pub mod analytics;
pub mod cache;
pub mod class_records;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod lessons;
pub mod logging;
pub mod metrics;
pub mod state;
pub mod students;
pub mod suggestion;
pub mod units;
pub mod validators;

use anyhow::Context;
use crate::config::settings::AppConfig;
use crate::state::app::AppState;

/// Host entry point: start logging, make sure the data directory exists and
/// build the shared state.
pub fn init(config: AppConfig) -> anyhow::Result<AppState> {
    logging::init_logging(&config.log_level);
    tracing::info!("planmaker starting");

    let data_dir = config.resolved_data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
    tracing::info!(data_dir = ?data_dir, "Data directory ready");

    Ok(AppState::new(config))
}

/// `init` with the configuration from the app data directory
pub fn init_default() -> anyhow::Result<AppState> {
    init(config::settings::get_app_config().clone())
}
