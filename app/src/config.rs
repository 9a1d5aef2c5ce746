//! Runtime application configuration from environment variables.

use std::path::PathBuf;

/// Default caption text size in pixels.
pub const DEFAULT_CAPTION_FONT_SIZE: f32 = 32.0;

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root directory for the gallery, share staging, and custom fonts.
    pub data_dir: PathBuf,
    /// Explicit caption font file. When unset, resolution falls back to
    /// fonts dropped into the data dir and then to system fonts.
    pub font_path: Option<PathBuf>,
    /// Caption text size in pixels.
    pub caption_font_size: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            font_path: None,
            caption_font_size: DEFAULT_CAPTION_FONT_SIZE,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment. `.env` files are
    /// applied first and never override variables already set.
    pub fn load() -> Self {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = get("QRCARD_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let font_path = get("QRCARD_FONT").map(PathBuf::from);
        let caption_font_size = parse_font_size(
            get("QRCARD_FONT_SIZE").as_deref().unwrap_or(""),
            DEFAULT_CAPTION_FONT_SIZE,
        );

        Self {
            data_dir,
            font_path,
            caption_font_size,
        }
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }
}

/// Priority: QRCARD_DATA_DIR env var > ~/.qrcard
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".qrcard")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}

fn parse_font_size(s: &str, default: f32) -> f32 {
    if s.is_empty() {
        return default;
    }
    match s.parse::<f32>() {
        Ok(size) if size > 0.0 => size,
        _ => default,
    }
}
