//! Watermark rendering.
//!
//! The watermark is laid out from a character-class estimate rather than
//! real glyph advances: Han characters count as full width, Latin letters
//! and digits as half width, everything else as nothing. The canvas grows by
//! one font size to make room for the strip.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tracing::debug;

use crate::canvas::extend_canvas;
use crate::error::{EngineError, Result};

/// Default watermark size in points.
pub const DEFAULT_FONT_SIZE_PT: f32 = 14.0;

/// Default rendering resolution. At 72 DPI one point is one pixel.
pub const DEFAULT_DPI: f32 = 72.0;

const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Width class of a character for layout estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphClass {
    /// Han ideograph, one font size wide.
    Han,
    /// Latin letter or ASCII digit, half a font size wide.
    Latin,
    /// Punctuation, whitespace and other scripts. Not counted.
    Other,
}

pub fn classify(ch: char) -> GlyphClass {
    if is_han(ch) {
        GlyphClass::Han
    } else if is_latin(ch) {
        GlyphClass::Latin
    } else {
        GlyphClass::Other
    }
}

fn is_han(ch: char) -> bool {
    matches!(
        ch as u32,
        0x2E80..=0x2E99
            | 0x2E9B..=0x2EF3
            | 0x2F00..=0x2FD5
            | 0x3005
            | 0x3007
            | 0x3021..=0x3029
            | 0x3038..=0x303B
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFA6D
            | 0xFA70..=0xFAD9
            | 0x20000..=0x2A6DF
            | 0x2A700..=0x2EBE0
            | 0x2F800..=0x2FA1D
            | 0x30000..=0x323AF
    )
}

fn is_latin(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || (ch.is_alphabetic()
            && matches!(
                ch as u32,
                0x00AA | 0x00BA | 0x00C0..=0x024F | 0x1E00..=0x1EFF | 0x2C60..=0x2C7F | 0xA720..=0xA7FF
            ))
}

/// Count `(han, latin)` characters in `text`.
pub fn count_scripts(text: &str) -> (u32, u32) {
    text.chars().fold((0, 0), |(han, latin), ch| match classify(ch) {
        GlyphClass::Han => (han + 1, latin),
        GlyphClass::Latin => (han, latin + 1),
        GlyphClass::Other => (han, latin),
    })
}

/// Estimated rendered width: `size * (han + latin / 2)` in whole pixels.
///
/// `latin / 2` is integer division, so an odd trailing Latin character adds
/// nothing.
pub fn estimate_width(text: &str, size: u32) -> u32 {
    let (han, latin) = count_scripts(text);
    size.saturating_mul(han.saturating_add(latin / 2))
}

/// Where the watermark goes on the extended canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkLayout {
    /// Estimated text width, clamped to the canvas width.
    pub text_width: u32,
    /// Left edge of the text.
    pub x: u32,
    /// Baseline of the text.
    pub baseline_y: u32,
    /// Height of the canvas after appending the strip.
    pub canvas_height: u32,
}

/// Lay out `text` under a `canvas_w` × `canvas_h` image with a strip of
/// `strip` pixels (the font size) appended below.
///
/// Returns `None` when the extended height does not fit in a `u32`.
pub fn layout(canvas_w: u32, canvas_h: u32, text: &str, strip: u32) -> Option<WatermarkLayout> {
    let text_width = estimate_width(text, strip).min(canvas_w);
    let canvas_height = canvas_h.checked_add(strip)?;
    Some(WatermarkLayout {
        text_width,
        x: (canvas_w - text_width) / 2,
        baseline_y: canvas_height - strip,
        canvas_height,
    })
}

/// Font and size used to draw a watermark.
#[derive(Clone)]
pub struct Watermark {
    pub font: FontArc,
    pub size_pt: f32,
    pub dpi: f32,
}

impl Watermark {
    /// 14pt at 72 DPI.
    pub fn new(font: FontArc) -> Self {
        Self {
            font,
            size_pt: DEFAULT_FONT_SIZE_PT,
            dpi: DEFAULT_DPI,
        }
    }

    pub fn with_size(mut self, size_pt: f32, dpi: f32) -> Self {
        self.size_pt = size_pt;
        self.dpi = dpi;
        self
    }

    /// Height of the appended strip: the point size taken as pixels.
    pub fn strip_height(&self) -> u32 {
        self.size_pt.max(0.0).round() as u32
    }

    /// Glyph scale in pixels for the configured DPI.
    pub fn pixel_scale(&self) -> PxScale {
        PxScale::from(self.size_pt * self.dpi / 72.0)
    }
}

/// Append a watermark strip below `base` and draw `text` in black.
///
/// The full string is drawn even when the estimate was clamped to the canvas
/// width; only the centering uses the estimate.
pub fn apply(base: &RgbaImage, text: &str, watermark: &Watermark) -> Result<RgbaImage> {
    ensure_glyphs(&watermark.font, text)?;

    let strip = watermark.strip_height();
    let place = layout(base.width(), base.height(), text, strip).ok_or_else(|| {
        EngineError::DrawFailed(format!(
            "watermark strip of {strip} px does not fit under a {} px image",
            base.height()
        ))
    })?;
    let mut canvas = extend_canvas(base, place.canvas_height);

    // imageproc positions text by its top edge; the layout gives a baseline.
    let scale = watermark.pixel_scale();
    let ascent = watermark.font.as_scaled(scale).ascent();
    let top = (place.baseline_y as f32 - ascent).round() as i32;

    debug!(
        text_width = place.text_width,
        x = place.x,
        baseline_y = place.baseline_y,
        top,
        canvas_height = place.canvas_height,
        "Drawing watermark"
    );

    draw_text_mut(
        &mut canvas,
        TEXT_COLOR,
        place.x as i32,
        top,
        scale,
        &watermark.font,
        text,
    );

    Ok(canvas)
}

/// Fail when a visible character has no glyph in the font.
fn ensure_glyphs(font: &FontArc, text: &str) -> Result<()> {
    let missing = text
        .chars()
        .filter(|ch| !ch.is_whitespace() && !ch.is_control())
        .find(|ch| font.glyph_id(*ch).0 == 0);

    match missing {
        Some(ch) => Err(EngineError::DrawFailed(format!(
            "font has no glyph for {ch:?} (U+{:04X})",
            ch as u32
        ))),
        None => Ok(()),
    }
}
