//! HTTP API handlers.

pub mod qrcode;

use axum::http::StatusCode;

/// Plain-text error response, the body the QR endpoint has always returned.
pub type ApiError = (StatusCode, String);

/// Build a plain-text error response.
pub fn err_text(status: u16, message: &str) -> ApiError {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        message.to_string(),
    )
}
