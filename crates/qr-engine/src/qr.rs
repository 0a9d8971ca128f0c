//! QR code generation.
//!
//! Encodes text into a module matrix with the `qrcode` crate and rasterizes it
//! onto a fixed-size square canvas with a 4-module quiet zone.

use std::str::FromStr;

use image::{Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

use crate::DEFAULT_QR_SIZE;
use crate::error::{EngineError, Result};

/// Blank modules required around the symbol on every side.
pub const QUIET_ZONE: u32 = 4;

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// QR redundancy tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    Low,
    #[default]
    Medium,
    Quartile,
    High,
}

impl ErrorCorrection {
    fn ec_level(self) -> EcLevel {
        match self {
            Self::Low => EcLevel::L,
            Self::Medium => EcLevel::M,
            Self::Quartile => EcLevel::Q,
            Self::High => EcLevel::H,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error correction level: {0:?} (expected L, M, Q or H)")]
pub struct ParseErrorCorrectionError(String);

impl FromStr for ErrorCorrection {
    type Err = ParseErrorCorrectionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::Low),
            "m" | "medium" => Ok(Self::Medium),
            "q" | "quartile" => Ok(Self::Quartile),
            "h" | "high" => Ok(Self::High),
            _ => Err(ParseErrorCorrectionError(s.to_string())),
        }
    }
}

/// What to encode and how large to draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRequest {
    pub text: String,
    pub error_correction: ErrorCorrection,
    pub size: u32,
}

impl QrRequest {
    /// Medium error correction on a [`DEFAULT_QR_SIZE`] canvas.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error_correction: ErrorCorrection::default(),
            size: DEFAULT_QR_SIZE,
        }
    }
}

/// Encode `text` into a square RGBA raster of `size` pixels.
///
/// Dark modules are opaque black on an opaque white background. The symbol
/// plus its quiet zone is scaled by the largest whole number of pixels per
/// module that fits and centered; if it cannot fit at one pixel per module
/// the canvas grows to the minimum size instead.
pub fn encode(text: &str, error_correction: ErrorCorrection, size: u32) -> Result<RgbaImage> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), error_correction.ec_level())
        .map_err(|e| EngineError::EncodingFailed(e.to_string()))?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;

    let real_size = module_count + QUIET_ZONE * 2;
    let size = size.max(real_size);
    let scale = size / real_size;
    let offset = (size - real_size * scale) / 2;

    debug!(
        module_count,
        size,
        scale,
        offset,
        ?error_correction,
        "Rasterizing QR matrix"
    );

    let mut img = RgbaImage::from_pixel(size, size, LIGHT);

    for (i, color) in modules.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let x = (i as u32) % module_count;
        let y = (i as u32) / module_count;
        let left = offset + (x + QUIET_ZONE) * scale;
        let top = offset + (y + QUIET_ZONE) * scale;

        for dx in 0..scale {
            for dy in 0..scale {
                img.put_pixel(left + dx, top + dy, DARK);
            }
        }
    }

    Ok(img)
}

#[cfg(test)]
pub(crate) fn scan(img: &RgbaImage) -> Option<String> {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        img.width() as usize,
        img.height() as usize,
        |x, y| {
            let p = img.get_pixel(x as u32, y as u32);
            ((u32::from(p[0]) + u32::from(p[1]) + u32::from(p[2])) / 3) as u8
        },
    );
    let grids = prepared.detect_grids();
    let (_, content) = grids.first()?.decode().ok()?;
    Some(content)
}
