//! Error type shared by every pipeline stage.

/// Failure of one pipeline stage. The first error aborts the whole render.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("QR encode error: {0}")]
    EncodingFailed(String),

    #[error("failed to fetch logo: {0}")]
    FetchFailed(String),

    #[error("failed to decode logo: {0}")]
    DecodeFailed(String),

    #[error("failed to load font: {0}")]
    FontLoadFailed(String),

    #[error("failed to parse font: {0}")]
    FontParseFailed(String),

    #[error("failed to draw watermark: {0}")]
    DrawFailed(String),

    #[error("failed to encode output image: {0}")]
    OutputFailed(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
