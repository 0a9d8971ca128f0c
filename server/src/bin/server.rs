//! Server binary: tracing, configuration, then the axum HTTP server until Ctrl+C.

use tracing_subscriber::EnvFilter;

use qrcode_server_lib::app::SharedState;
use qrcode_server_lib::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (config, pipeline) = qrcode_server_lib::init_foundation()?;
    let state = SharedState::new(config, pipeline);

    tracing::info!(port = state.server_port(), "Starting QR code server");
    server::start_server(state).await
}
