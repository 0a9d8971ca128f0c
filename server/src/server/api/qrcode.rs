//! QR code image endpoint.

use axum::body::Body;
use axum::extract::{Query, RawQuery, State};
use axum::http::header;
use axum::response::Response;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use qr_engine::{EngineError, QrRequest, RenderRequest};
use serde::Deserialize;

use super::{ApiError, err_text};
use crate::app::SharedState;
use crate::config::AppConfig;

/// Query string of `GET /qrcode`.
#[derive(Debug, Default, Deserialize)]
pub struct QrQuery {
    /// Text to encode (required).
    pub t: Option<String>,
    /// Any non-empty value marks `t` as standard base64.
    pub e: Option<String>,
    /// Logo URL.
    pub l: Option<String>,
    /// Watermark text.
    pub w: Option<String>,
    /// Error correction level: L, M, Q or H.
    pub ec: Option<String>,
}

/// GET /qrcode – Render a QR code PNG
pub async fn generate_qr_code(
    State(state): State<SharedState>,
    RawQuery(raw): RawQuery,
    Query(query): Query<QrQuery>,
) -> Result<Response, ApiError> {
    tracing::info!("Handling request for /qrcode?{}", raw.unwrap_or_default());

    let req = build_request(query, state.config())?;

    let render_state = state.clone();
    let png = tokio::task::spawn_blocking(move || render_state.pipeline().render_png(&req))
        .await
        .map_err(|e| {
            tracing::error!("Render task failed: {e}");
            err_text(500, "Failed to generate QR code")
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "QR render failed");
            err_text(500, failure_message(&e))
        })?;

    Response::builder()
        .header(header::CONTENT_TYPE, "image/png")
        .body(Body::from(png))
        .map_err(|e| err_text(500, &e.to_string()))
}

/// Validate the query and turn it into a render request.
pub fn build_request(query: QrQuery, config: &AppConfig) -> Result<RenderRequest, ApiError> {
    let mut text = query.t.unwrap_or_default();
    if text.is_empty() {
        return Err(err_text(400, "Parameter 't' is required"));
    }

    if query.e.as_deref().is_some_and(|e| !e.is_empty()) {
        text = decode_base64_text(&text).ok_or_else(|| err_text(400, "Failed to decode base64 text"))?;
    }

    let error_correction = match query.ec.as_deref().filter(|s| !s.is_empty()) {
        Some(level) => level
            .parse()
            .map_err(|e: qr_engine::qr::ParseErrorCorrectionError| err_text(400, &e.to_string()))?,
        None => config.error_correction,
    };

    Ok(RenderRequest {
        qr: QrRequest {
            text,
            error_correction,
            size: config.qr_size,
        },
        logo_url: query.l,
        watermark: query.w,
    })
}

fn decode_base64_text(text: &str) -> Option<String> {
    let bytes = STANDARD.decode(text).ok()?;
    String::from_utf8(bytes).ok()
}

/// Client-facing message for a failed render, named after the failing stage.
pub fn failure_message(err: &EngineError) -> &'static str {
    match err {
        EngineError::EncodingFailed(_) => "Failed to generate QR code",
        EngineError::FetchFailed(_) | EngineError::DecodeFailed(_) => "Failed to add logo to QR code",
        EngineError::FontLoadFailed(_)
        | EngineError::FontParseFailed(_)
        | EngineError::DrawFailed(_) => "Failed to add watermark",
        EngineError::OutputFailed(_) => "Failed to encode QR code image",
    }
}
