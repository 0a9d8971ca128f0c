//! Watermark font access.

use std::sync::OnceLock;

use ab_glyph::FontArc;
use tracing::debug;

use crate::error::{EngineError, Result};

/// Supplies the parsed font face used for watermarks.
///
/// Implementations block while reading storage. Fonts are never mutated
/// after parsing, so a returned [`FontArc`] may be shared freely.
pub trait FontProvider: Send + Sync {
    fn font(&self) -> Result<FontArc>;
}

/// Parse TTF/OTF bytes into a shareable font face.
pub fn parse_font(data: Vec<u8>) -> Result<FontArc> {
    FontArc::try_from_vec(data).map_err(|e| EngineError::FontParseFailed(e.to_string()))
}

/// Wraps another provider and keeps the first successfully parsed font for
/// the lifetime of the process.
///
/// Failures are not cached; the next call asks the inner provider again.
pub struct CachedFontProvider<P> {
    inner: P,
    cached: OnceLock<FontArc>,
}

impl<P: FontProvider> CachedFontProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cached: OnceLock::new(),
        }
    }
}

impl<P: FontProvider> FontProvider for CachedFontProvider<P> {
    fn font(&self) -> Result<FontArc> {
        if let Some(font) = self.cached.get() {
            return Ok(font.clone());
        }
        let font = self.inner.font()?;
        debug!("Caching parsed watermark font");
        Ok(self.cached.get_or_init(|| font).clone())
    }
}
