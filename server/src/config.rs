//! Runtime configuration loaded from the environment (after `.env`).

use std::path::PathBuf;

use qr_engine::{DEFAULT_QR_SIZE, ErrorCorrection, PipelineOptions};
use qr_engine::text::{DEFAULT_DPI, DEFAULT_FONT_SIZE_PT};

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server_port: u16,
    pub font_path: PathBuf,
    pub font_cache: bool,
    pub qr_size: u32,
    pub error_correction: ErrorCorrection,
    pub watermark_font_size: f32,
    pub watermark_dpi: f32,
    /// Zero disables the timeout.
    pub logo_fetch_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 7688,
            font_path: PathBuf::from("SarasaFixedSC-Regular.ttf"),
            font_cache: true,
            qr_size: DEFAULT_QR_SIZE,
            error_correction: ErrorCorrection::Medium,
            watermark_font_size: DEFAULT_FONT_SIZE_PT,
            watermark_dpi: DEFAULT_DPI,
            logo_fetch_timeout_secs: 0,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Self {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Load configuration through `get`, falling back to defaults for
    /// missing or unparsable values.
    pub fn load_from(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let g = |key: &str| -> String { get(key).map(|v| v.trim().to_string()).unwrap_or_default() };

        let error_correction = {
            let v = g("QR_EC_LEVEL");
            if v.is_empty() {
                d.error_correction
            } else {
                v.parse().unwrap_or_else(|e| {
                    tracing::warn!("{e}, using default");
                    d.error_correction
                })
            }
        };

        Self {
            server_port: parse_or(&g("SERVER_PORT"), d.server_port),
            font_path: {
                let p = g("FONT_PATH");
                if p.is_empty() { d.font_path } else { PathBuf::from(p) }
            },
            font_cache: parse_bool(&g("FONT_CACHE"), d.font_cache),
            qr_size: parse_or(&g("QR_SIZE"), d.qr_size),
            error_correction,
            watermark_font_size: parse_or(&g("WATERMARK_FONT_SIZE"), d.watermark_font_size),
            watermark_dpi: parse_or(&g("WATERMARK_DPI"), d.watermark_dpi),
            logo_fetch_timeout_secs: parse_or(&g("LOGO_FETCH_TIMEOUT_SECS"), d.logo_fetch_timeout_secs),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            watermark_size_pt: self.watermark_font_size,
            dpi: self.watermark_dpi,
        }
    }
}

fn parse_or<T: std::str::FromStr>(s: &str, default: T) -> T {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => default,
    }
}
