//! HTTP service that renders QR code images.
//!
//! Wires configuration, the logo fetcher and the font provider into a
//! [`qr_engine::Pipeline`] and exposes it through an axum router.

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod server;
pub mod services;

pub use bootstrap::init_foundation;
