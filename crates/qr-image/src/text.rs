//! Caption text metrics, wrapping, and drawing.

use ab_glyph::{Font, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

/// Metrics and drawing seam for caption text.
///
/// Wrapping and layout are pure functions of these three methods, so a
/// given implementation yields the same line breaks on every platform.
pub trait CaptionFont {
    /// Distance from the top of one line to the top of the next, in
    /// pixels, before inter-line spacing.
    fn line_height(&self) -> u32;

    /// Advance width of `text` in pixels.
    fn measure(&self, text: &str) -> u32;

    /// Draw a single line with its top-left corner at `(x, y)`.
    fn draw_line(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str);
}

/// `CaptionFont` backed by a TrueType/OpenType font via `ab_glyph`.
pub struct TtfCaptionFont<F: Font> {
    font: F,
    scale: PxScale,
}

impl<F: Font> TtfCaptionFont<F> {
    pub fn new(font: F, size_px: f32) -> Self {
        Self {
            font,
            scale: PxScale::from(size_px),
        }
    }
}

impl<F: Font> CaptionFont for TtfCaptionFont<F> {
    fn line_height(&self) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
    }

    fn measure(&self, text: &str) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0f32;
        let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

        for ch in text.chars() {
            let glyph_id = scaled.glyph_id(ch);
            if let Some(prev) = prev_glyph {
                width += scaled.kern(prev, glyph_id);
            }
            width += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }

        width.ceil() as u32
    }

    fn draw_line(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }
}

/// Wrap a single input line to fit within `max_width` pixels.
///
/// Greedy: words accumulate onto the current output line until the next
/// one would overflow. A word wider than the whole line is force-broken
/// character by character into the longest chunks that fit, never fewer
/// than one character per chunk, so wrapping always makes progress.
/// Output lines are trimmed of trailing whitespace and never empty;
/// whitespace-only input wraps to nothing.
pub fn wrap_line(font: &dyn CaptionFont, line: &str, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width: u32 = 0;

    for word in line.split_inclusive(|c: char| c.is_whitespace()) {
        let word_width = font.measure(word);

        if current_width + word_width > max_width && !current_line.is_empty() {
            flush(&mut lines, &mut current_line);
            current_width = 0;
        }

        // A single word wider than max_width: force-break it character
        // by character
        if word_width > max_width && current_line.is_empty() {
            let mut char_line = String::new();
            let mut char_width: u32 = 0;
            for ch in word.chars() {
                let ch_w = font.measure(&ch.to_string());
                if char_width + ch_w > max_width && !char_line.is_empty() {
                    lines.push(char_line);
                    char_line = String::new();
                    char_width = 0;
                }
                char_line.push(ch);
                char_width += ch_w;
            }
            current_line = char_line;
            current_width = char_width;
            continue;
        }

        current_line.push_str(word);
        current_width += word_width;
    }

    flush(&mut lines, &mut current_line);
    lines
}

fn flush(lines: &mut Vec<String>, current_line: &mut String) {
    let trimmed = current_line.trim_end();
    if !trimmed.is_empty() {
        lines.push(trimmed.to_string());
    }
    current_line.clear();
}

/// Fixed-metric font double for layout tests: every glyph is `advance`
/// pixels wide, kerning-free.
#[cfg(test)]
pub(crate) struct FixedAdvanceFont {
    pub(crate) advance: u32,
    pub(crate) line_height: u32,
}

#[cfg(test)]
impl CaptionFont for FixedAdvanceFont {
    fn line_height(&self) -> u32 {
        self.line_height
    }

    fn measure(&self, text: &str) -> u32 {
        self.advance * text.chars().count() as u32
    }

    fn draw_line(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
        // One marker pixel per character so composition tests can see
        // where each line landed.
        for (i, _) in text.chars().enumerate() {
            let px = x + (i as u32 * self.advance) as i32;
            if px >= 0 && (px as u32) < canvas.width() && y >= 0 && (y as u32) < canvas.height() {
                canvas.put_pixel(px as u32, y as u32, color);
            }
        }
    }
}
