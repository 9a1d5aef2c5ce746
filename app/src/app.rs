use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;

/// Application shared state handed to services and the CLI.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Application configuration, fixed after startup
    config: AppConfig,
}

impl SharedState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(SharedStateInner { config }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.inner.config.data_dir
    }
}
