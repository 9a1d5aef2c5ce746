//! Card composition: QR raster on top, wrapped caption below.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Rgba, RgbaImage};
use tracing::debug;

use crate::text::{CaptionFont, wrap_line};
use crate::{CAPTION_MARGIN, CAPTION_PADDING, LINE_SPACING, QrImageError};

const BLACK: Rgba<u8> = Rgba([0u8, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255u8, 255, 255, 255]);

/// Wrapped caption lines plus the metrics needed to reserve space for
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLayout {
    /// Final display lines. An empty string is a blank line that keeps
    /// its vertical slot.
    pub lines: Vec<String>,
    /// Height of one line in pixels, before inter-line spacing.
    pub line_height: u32,
}

impl CaptionLayout {
    /// Vertical space the caption occupies, padding included. Zero when
    /// there is nothing to draw.
    pub fn region_height(&self) -> u32 {
        if self.lines.is_empty() {
            return 0;
        }
        let count = self.lines.len() as u32;
        count * self.line_height + (count - 1) * LINE_SPACING + 2 * CAPTION_PADDING
    }
}

/// Lay out `caption` against `max_width` pixels.
///
/// The caption is split on explicit `\n` first and each input line is
/// word-wrapped independently. Blank input lines survive as blank output
/// lines so multi-line captions keep their spacing; a caption that is
/// entirely whitespace lays out to nothing.
pub fn layout_caption(font: &dyn CaptionFont, caption: &str, max_width: u32) -> CaptionLayout {
    let mut lines = Vec::new();
    if !caption.trim().is_empty() {
        for input_line in caption.split('\n') {
            if input_line.trim().is_empty() {
                lines.push(String::new());
            } else {
                lines.extend(wrap_line(font, input_line, max_width));
            }
        }
    }

    CaptionLayout {
        lines,
        line_height: font.line_height(),
    }
}

/// Compose the final card image.
///
/// The QR raster sits at the top-left origin and the caption is drawn
/// left-aligned beneath it, inset by the margin on both sides. Canvas
/// width always equals the QR width; height grows with the caption.
pub fn compose(qr: &GrayImage, caption: &str, font: &dyn CaptionFont) -> CompositeImage {
    let max_text_width = qr.width().saturating_sub(2 * CAPTION_MARGIN);
    let layout = layout_caption(font, caption, max_text_width);

    let width = qr.width();
    let height = qr.height() + layout.region_height();
    let lines = layout.lines.len();
    debug!(width, height, lines, "Composing card image");
    let mut canvas = RgbaImage::from_pixel(width, height, WHITE);

    for (x, y, pixel) in qr.enumerate_pixels() {
        let v = pixel.0[0];
        canvas.put_pixel(x, y, Rgba([v, v, v, 255]));
    }

    let mut y = (qr.height() + CAPTION_PADDING) as i32;
    for line in &layout.lines {
        if !line.is_empty() {
            font.draw_line(&mut canvas, BLACK, CAPTION_MARGIN as i32, y, line);
        }
        y += (layout.line_height + LINE_SPACING) as i32;
    }

    CompositeImage { image: canvas }
}

/// A finished card raster, held in memory until encoded or handed off.
#[derive(Clone)]
pub struct CompositeImage {
    image: RgbaImage,
}

impl CompositeImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode the card as lossless PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, QrImageError> {
        let mut cursor = Cursor::new(Vec::new());
        self.image.write_to(&mut cursor, ImageFormat::Png)?;
        Ok(cursor.into_inner())
    }
}
