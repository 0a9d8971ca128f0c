//! Watermark font loaded from the filesystem.

use std::path::PathBuf;

use qr_engine::font::parse_font;
use qr_engine::{EngineError, FontProvider};

const VALID_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// Reads and parses the font file on every call.
///
/// Wrap in [`qr_engine::CachedFontProvider`] to parse once per process.
#[derive(Debug, Clone)]
pub struct FileFontProvider {
    path: PathBuf,
}

impl FileFontProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Whether the configured path looks like a font file we can parse.
    pub fn has_font_extension(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| VALID_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

impl FontProvider for FileFontProvider {
    fn font(&self) -> Result<ab_glyph::FontArc, EngineError> {
        let data = std::fs::read(&self.path)
            .map_err(|e| EngineError::FontLoadFailed(format!("{}: {e}", self.path.display())))?;
        tracing::debug!(path = %self.path.display(), bytes = data.len(), "Loaded watermark font");
        parse_font(data)
    }
}
