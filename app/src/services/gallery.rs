//! Saved-card gallery backed by the application data directory.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Gallery subdirectory under the data dir.
const GALLERY_DIR: &str = "gallery";
/// Share-staging subdirectory under the data dir.
const SHARE_DIR: &str = "share";
/// Fixed staging file name, overwritten on every share.
const SHARED_FILE_NAME: &str = "shared_qrcode.png";

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("no saved card named {0:?}")]
    NotFound(String),
    #[error("invalid card file name {0:?}")]
    InvalidFileName(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A card persisted in the gallery.
#[derive(Debug, Clone, Serialize)]
pub struct SavedCard {
    pub file_name: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
}

/// Filesystem gallery: save, enumerate, delete, and stage cards for
/// sharing.
#[derive(Clone)]
pub struct GalleryService {
    data_dir: PathBuf,
}

impl GalleryService {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn gallery_dir(&self) -> PathBuf {
        self.data_dir.join(GALLERY_DIR)
    }

    fn share_dir(&self) -> PathBuf {
        self.data_dir.join(SHARE_DIR)
    }

    /// Persist PNG bytes as a new gallery entry.
    pub fn save(&self, png: &[u8]) -> Result<SavedCard, GalleryError> {
        std::fs::create_dir_all(self.gallery_dir())?;

        let file_name = self.next_free_name(Utc::now().timestamp_millis());
        let path = self.gallery_dir().join(&file_name);
        std::fs::write(&path, png)?;
        tracing::info!(path = %path.display(), "Card saved to gallery");

        Ok(SavedCard {
            file_name,
            path,
            created_at: Utc::now(),
        })
    }

    /// First unused `qrcode_<millis>[_n].png` name for this timestamp.
    fn next_free_name(&self, millis: i64) -> String {
        let dir = self.gallery_dir();
        let base = format!("qrcode_{millis}.png");
        if !dir.join(&base).exists() {
            return base;
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("qrcode_{millis}_{n}.png");
            if !dir.join(&candidate).exists() {
                return candidate;
            }
            n += 1;
        }
    }

    /// All saved cards, newest first.
    pub fn list(&self) -> Result<Vec<SavedCard>, GalleryError> {
        let dir = self.gallery_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut cards = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_png = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"));
            if !is_png {
                continue;
            }
            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            let created_at = entry
                .metadata()?
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            cards.push(SavedCard {
                file_name,
                path,
                created_at,
            });
        }

        // Timestamped names break mtime ties from rapid saves.
        cards.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.file_name.cmp(&a.file_name))
        });
        Ok(cards)
    }

    /// Delete a gallery entry by its file name.
    pub fn delete(&self, file_name: &str) -> Result<(), GalleryError> {
        if !is_plain_file_name(file_name) {
            return Err(GalleryError::InvalidFileName(file_name.to_string()));
        }
        let path = self.gallery_dir().join(file_name);
        if !path.is_file() {
            return Err(GalleryError::NotFound(file_name.to_string()));
        }
        std::fs::remove_file(&path)?;
        tracing::info!(file_name, "Card deleted from gallery");
        Ok(())
    }

    /// Write PNG bytes to the stable staging path and return it.
    ///
    /// The previous staged file, if any, is overwritten; callers hand the
    /// returned path to whatever shares it onward.
    pub fn stage_for_share(&self, png: &[u8]) -> Result<PathBuf, GalleryError> {
        std::fs::create_dir_all(self.share_dir())?;
        let path = self.share_dir().join(SHARED_FILE_NAME);
        std::fs::write(&path, png)?;
        Ok(path)
    }
}

/// A bare file name: no separators, no current/parent dir references.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery() -> (tempfile::TempDir, GalleryService) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let service = GalleryService::new(dir.path().to_path_buf());
        (dir, service)
    }

    #[test]
    fn save_writes_a_png_named_after_the_timestamp() {
        let (_dir, gallery) = gallery();
        let saved = gallery.save(b"png bytes").expect("failed to save");
        assert!(saved.file_name.starts_with("qrcode_"));
        assert!(saved.file_name.ends_with(".png"));
        assert_eq!(
            std::fs::read(&saved.path).expect("saved file missing"),
            b"png bytes"
        );
    }

    #[test]
    fn colliding_timestamps_get_a_suffix() {
        let (_dir, gallery) = gallery();
        std::fs::create_dir_all(gallery.gallery_dir()).expect("failed to create gallery dir");
        std::fs::write(gallery.gallery_dir().join("qrcode_42.png"), b"first")
            .expect("failed to write");

        assert_eq!(gallery.next_free_name(42), "qrcode_42_1.png");
    }

    #[test]
    fn list_returns_newest_first() {
        let (_dir, gallery) = gallery();
        let first = gallery.save(b"one").expect("failed to save");
        let second = gallery.save(b"two").expect("failed to save");

        let cards = gallery.list().expect("failed to list");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].file_name, second.file_name);
        assert_eq!(cards[1].file_name, first.file_name);
    }

    #[test]
    fn list_ignores_foreign_files() {
        let (_dir, gallery) = gallery();
        gallery.save(b"card").expect("failed to save");
        std::fs::write(gallery.gallery_dir().join("notes.txt"), b"hello")
            .expect("failed to write");

        assert_eq!(gallery.list().expect("failed to list").len(), 1);
    }

    #[test]
    fn listing_a_missing_gallery_is_empty_not_an_error() {
        let (_dir, gallery) = gallery();
        assert!(gallery.list().expect("failed to list").is_empty());
    }

    #[test]
    fn delete_removes_the_card() {
        let (_dir, gallery) = gallery();
        let saved = gallery.save(b"bye").expect("failed to save");

        gallery.delete(&saved.file_name).expect("failed to delete");
        assert!(!saved.path.exists());
        assert!(matches!(
            gallery.delete(&saved.file_name),
            Err(GalleryError::NotFound(_))
        ));
    }

    #[test]
    fn delete_rejects_path_traversal() {
        let (_dir, gallery) = gallery();
        for name in ["../escape.png", "a/b.png", "..", "."] {
            assert!(matches!(
                gallery.delete(name),
                Err(GalleryError::InvalidFileName(_))
            ));
        }
    }

    #[test]
    fn share_staging_reuses_one_path() {
        let (_dir, gallery) = gallery();
        let first = gallery.stage_for_share(b"old").expect("failed to stage");
        let second = gallery.stage_for_share(b"new").expect("failed to stage");

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&second).expect("staged file missing"), b"new");
    }
}
