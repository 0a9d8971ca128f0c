//! Center logo compositing.

use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::canvas::{composite_over, new_canvas};
use crate::error::{EngineError, Result};
use crate::resize::{resize_exact, scaled_height};

/// The logo is drawn at `1 / LOGO_FRACTION` of the QR width.
pub const LOGO_FRACTION: u32 = 6;

/// Size and top-left offset of the resized logo on the QR canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Compute where a `logo_w` × `logo_h` logo lands on the canvas.
///
/// Width drives height. A logo tall enough to overflow the canvas is
/// scaled down by height instead so it always fits. Returns `None` when the
/// canvas is too small to hold a logo at all.
pub fn placement(canvas_w: u32, canvas_h: u32, logo_w: u32, logo_h: u32) -> Option<LogoPlacement> {
    let mut width = canvas_w / LOGO_FRACTION;
    if width == 0 || canvas_h == 0 || logo_w == 0 || logo_h == 0 {
        return None;
    }
    let mut height = scaled_height(logo_w, logo_h, width);

    if height > canvas_h {
        height = canvas_h;
        width = scaled_height(logo_h, logo_w, height).min(canvas_w);
    }

    Some(LogoPlacement {
        width,
        height,
        x: (canvas_w - width) / 2,
        y: (canvas_h - height) / 2,
    })
}

/// Decode logo bytes of any supported container format (PNG, JPEG, GIF, ...).
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let logo = image::load_from_memory(bytes).map_err(|e| EngineError::DecodeFailed(e.to_string()))?;
    if logo.width() == 0 || logo.height() == 0 {
        return Err(EngineError::DecodeFailed("logo has no pixels".into()));
    }
    Ok(logo)
}

/// Decode `logo_bytes` and center the logo over `base`.
pub fn apply(base: &RgbaImage, logo_bytes: &[u8]) -> Result<RgbaImage> {
    let logo = decode(logo_bytes)?;
    Ok(overlay_logo(base, &logo))
}

/// Resize `logo` to a sixth of the QR width and composite it at the center
/// of a copy of `base`.
pub fn overlay_logo(base: &RgbaImage, logo: &DynamicImage) -> RgbaImage {
    let Some(place) = placement(base.width(), base.height(), logo.width(), logo.height()) else {
        debug!(
            width = base.width(),
            height = base.height(),
            "Canvas too small for a logo, leaving it untouched"
        );
        return base.clone();
    };

    debug!(
        logo_w = logo.width(),
        logo_h = logo.height(),
        width = place.width,
        height = place.height,
        x = place.x,
        y = place.y,
        "Placing logo"
    );

    let resized = resize_exact(logo, place.width, place.height).to_rgba8();

    let mut result = new_canvas(base.width(), base.height());
    composite_over(&mut result, base, 0, 0);
    composite_over(&mut result, &resized, i64::from(place.x), i64::from(place.y));
    result
}
