//! QR code image composition.
//!
//! Encodes text into a QR raster, then optionally layers a centered logo
//! and a text watermark strip onto it. Every stage takes a raster and
//! returns a new one; [`pipeline::Pipeline`] sequences them.

pub mod canvas;
pub mod error;
pub mod font;
pub mod logo;
pub mod pipeline;
pub mod qr;
pub mod resize;
pub mod text;

// Re-exports for convenience
pub use error::{EngineError, Result};
pub use font::{CachedFontProvider, FontProvider};
pub use pipeline::{LogoFetcher, Pipeline, PipelineOptions, RenderRequest};
pub use qr::{ErrorCorrection, QrRequest};

/// Side length of the generated QR raster in pixels.
pub const DEFAULT_QR_SIZE: u32 = 256;
