use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use super::api;
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/qrcode", get(api::qrcode::generate_qr_code))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
