//! QR card image composition.
//!
//! Provides module-matrix encoding (error-correction level H),
//! rasterization onto a fixed-size square canvas, and composition of the
//! final card with word-wrapped caption text below the code.

pub mod compose;
pub mod qr;
pub mod text;

// Re-exports for convenience
pub use compose::{CaptionLayout, CompositeImage, compose, layout_caption};
pub use qr::{ModuleMatrix, encode_module_matrix, rasterize};
pub use text::{CaptionFont, TtfCaptionFont, wrap_line};

/// Side length of the rasterized QR region in pixels.
pub const QR_SIZE: u32 = 512;

/// Quiet zone width around the module matrix, in modules.
pub const QUIET_ZONE_MODULES: u32 = 1;

/// Horizontal inset of caption text from the canvas edges in pixels.
pub const CAPTION_MARGIN: u32 = 20;

/// Vertical padding above and below the caption block in pixels.
pub const CAPTION_PADDING: u32 = 16;

/// Extra pixels between consecutive caption lines.
pub const LINE_SPACING: u32 = 2;

/// Errors produced while turning a payload into a card image.
#[derive(Debug, thiserror::Error)]
pub enum QrImageError {
    #[error("QR encoding failed: {0}")]
    Encoding(#[from] qrcode::types::QrError),
    #[error("module count {count} does not fill a {width}x{width} matrix")]
    MatrixShape { width: usize, count: usize },
    #[error("PNG encoding failed: {0}")]
    PngEncoding(#[from] image::ImageError),
}
