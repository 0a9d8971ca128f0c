use qr_engine::{CachedFontProvider, Pipeline};

use crate::config::AppConfig;
use crate::services::font::FileFontProvider;
use crate::services::logo::HttpLogoFetcher;

/// Load `.env`, read configuration and build the render pipeline.
pub fn init_foundation() -> Result<(AppConfig, Pipeline), anyhow::Error> {
    load_dotenv();
    let config = AppConfig::load();
    tracing::info!(?config, "Configuration loaded");

    validate(&config)?;

    let pipeline = build_pipeline(&config);
    Ok((config, pipeline))
}

/// Reject settings that would make every render fail.
pub fn validate(config: &AppConfig) -> Result<(), anyhow::Error> {
    if config.qr_size == 0 {
        anyhow::bail!("QR_SIZE must be greater than zero");
    }
    if !(config.watermark_font_size > 0.0 && config.watermark_dpi > 0.0) {
        anyhow::bail!("WATERMARK_FONT_SIZE and WATERMARK_DPI must be positive");
    }
    if config.watermark_font_size > config.qr_size as f32 {
        anyhow::bail!(
            "WATERMARK_FONT_SIZE ({}) must not exceed QR_SIZE ({})",
            config.watermark_font_size,
            config.qr_size
        );
    }
    Ok(())
}

/// Assemble the pipeline from configuration.
pub fn build_pipeline(config: &AppConfig) -> Pipeline {
    let fonts = FileFontProvider::new(config.font_path.clone());
    if !fonts.path().is_file() {
        tracing::warn!(
            path = %fonts.path().display(),
            "Watermark font not found; watermark requests will fail"
        );
    } else if !fonts.has_font_extension() {
        tracing::warn!(path = %fonts.path().display(), "Watermark font has an unexpected extension");
    }

    let fetcher = HttpLogoFetcher::new(config.logo_fetch_timeout_secs);

    let pipeline = if config.font_cache {
        Pipeline::new(fetcher, CachedFontProvider::new(fonts))
    } else {
        Pipeline::new(fetcher, fonts)
    };
    pipeline.with_options(config.pipeline_options())
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}
