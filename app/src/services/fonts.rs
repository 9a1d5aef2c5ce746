//! Caption font resolution.

use std::path::PathBuf;

const VALID_EXTENSIONS: &[&str] = &[".ttf", ".otf"];

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("no usable caption font found (set QRCARD_FONT or install system fonts)")]
    NoUsableFont,
    #[error("font data is not a valid TTF/OTF font")]
    InvalidFont,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolves the font file used for card captions.
///
/// Priority: the explicit override path, then any TTF/OTF dropped into
/// `<data_dir>/fonts`, then well-known system fonts.
#[derive(Clone)]
pub struct FontService {
    data_dir: PathBuf,
    override_path: Option<PathBuf>,
}

impl FontService {
    pub fn new(data_dir: PathBuf, override_path: Option<PathBuf>) -> Self {
        Self {
            data_dir,
            override_path,
        }
    }

    fn fonts_dir(&self) -> PathBuf {
        self.data_dir.join("fonts")
    }

    /// Find a font dropped into the data dir, if any.
    fn find_custom_font(&self) -> Option<PathBuf> {
        let dir = self.fonts_dir();
        let entries = std::fs::read_dir(&dir).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() {
                if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                    let ext_lower = format!(".{}", ext.to_lowercase());
                    if VALID_EXTENSIONS.contains(&ext_lower.as_str()) {
                        return Some(path);
                    }
                }
            }
        }
        None
    }

    /// Read the caption font bytes.
    ///
    /// An explicit override must be readable; its errors surface instead
    /// of being papered over by the fallback chain.
    pub fn load_font_data(&self) -> Result<Vec<u8>, FontError> {
        if let Some(path) = &self.override_path {
            return Ok(std::fs::read(path)?);
        }

        if let Some(path) = self.find_custom_font() {
            if let Ok(data) = std::fs::read(&path) {
                tracing::info!(path = %path.display(), "Using custom font for captions");
                return Ok(data);
            }
        }

        for path in system_font_candidates() {
            if let Ok(data) = std::fs::read(path) {
                tracing::info!(path = %path, "Using system font for captions");
                return Ok(data);
            }
        }
        Err(FontError::NoUsableFont)
    }
}

fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
            "/System/Library/Fonts/Supplemental/Helvetica.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
            "/System/Library/Fonts/Hiragino Sans GB.ttc",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &[
            "C:\\Windows\\Fonts\\arial.ttf",
            "C:\\Windows\\Fonts\\YuGothM.ttc",
            "C:\\Windows\\Fonts\\msgothic.ttc",
        ]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        ]
    }
}
