//! qrcard application library: configuration, shared state, and the
//! services that generate and persist QR code cards.

pub mod app;
pub mod config;
pub mod services;

pub use app::SharedState;
pub use config::AppConfig;

/// Load configuration and prepare the data directory.
pub fn init_foundation() -> Result<SharedState, anyhow::Error> {
    let config = AppConfig::load();
    config.ensure_data_dir()?;
    tracing::info!(data_dir = %config.data_dir.display(), "Data directory ready");
    Ok(SharedState::new(config))
}
