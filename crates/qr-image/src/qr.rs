//! QR module-matrix encoding and rasterization.

use image::{GrayImage, Luma};
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::QrImageError;

const DARK: Luma<u8> = Luma([0u8]);
const LIGHT: Luma<u8> = Luma([255u8]);

/// A square grid of QR modules, `true` for dark cells.
///
/// Row-major, `width` modules per side. Decoupled from the encoder so the
/// rasterizer can be driven by hand-built grids as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    pub fn new(width: usize, modules: Vec<bool>) -> Result<Self, QrImageError> {
        if modules.len() != width * width {
            return Err(QrImageError::MatrixShape {
                width,
                count: modules.len(),
            });
        }
        Ok(Self { width, modules })
    }

    /// Number of modules per side.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the module at `(x, y)` is dark. Out-of-range cells read
    /// as light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }

    /// Total number of dark modules.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|m| **m).count()
    }
}

/// Encode `payload` into a module matrix at error-correction level H.
///
/// Level H keeps cards scannable when the print is smudged or partly
/// covered; it is fixed rather than configurable. Fails when the payload
/// exceeds what a version-40 code can carry.
pub fn encode_module_matrix(payload: &str) -> Result<ModuleMatrix, QrImageError> {
    let code = QrCode::with_error_correction_level(payload, EcLevel::H)?;
    let width = code.width();
    let modules = code
        .to_colors()
        .iter()
        .map(|color| *color == qrcode::Color::Dark)
        .collect();
    ModuleMatrix::new(width, modules)
}

/// Rasterize a module matrix onto a square monochrome canvas, dark on
/// white.
///
/// Modules are drawn at the largest integer scale at which the matrix
/// plus `quiet_modules` of quiet zone on each side still fits
/// `target_size`, and the result is centered; the leftover pixels widen
/// the quiet zone. When even scale 1 does not fit, the canvas grows to
/// hold the matrix instead of clipping it.
pub fn rasterize(matrix: &ModuleMatrix, target_size: u32, quiet_modules: u32) -> GrayImage {
    let total_modules = matrix.width() as u32 + 2 * quiet_modules;
    let scale = (target_size / total_modules).max(1);
    let content = total_modules * scale;
    let side = target_size.max(content);
    let origin = (side - content) / 2 + quiet_modules * scale;
    debug!(total_modules, scale, side, "Rasterizing QR matrix");

    let mut img = GrayImage::from_pixel(side, side, LIGHT);

    for y in 0..matrix.width() {
        for x in 0..matrix.width() {
            if !matrix.is_dark(x, y) {
                continue;
            }
            let px = origin + x as u32 * scale;
            let py = origin + y as u32 * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(px + dx, py + dy, DARK);
                }
            }
        }
    }

    img
}
