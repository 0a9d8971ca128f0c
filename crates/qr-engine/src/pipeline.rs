//! Render pipeline: encode → optional logo → optional watermark → PNG.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::font::FontProvider;
use crate::logo;
use crate::qr::{self, QrRequest};
use crate::text::{self, DEFAULT_DPI, DEFAULT_FONT_SIZE_PT, Watermark};

/// Fetches raw logo bytes for a URL.
///
/// Called synchronously from the pipeline. Transport errors and non-success
/// responses are reported as [`EngineError::FetchFailed`]; nothing retries.
pub trait LogoFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// One render job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub qr: QrRequest,
    /// Skipped when `None` or empty.
    pub logo_url: Option<String>,
    /// Skipped when `None` or empty.
    pub watermark: Option<String>,
}

impl RenderRequest {
    pub fn new(qr: QrRequest) -> Self {
        Self {
            qr,
            logo_url: None,
            watermark: None,
        }
    }

    pub fn with_logo(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    pub fn with_watermark(mut self, text: impl Into<String>) -> Self {
        self.watermark = Some(text.into());
        self
    }
}

/// Watermark sizing shared by every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    pub watermark_size_pt: f32,
    pub dpi: f32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            watermark_size_pt: DEFAULT_FONT_SIZE_PT,
            dpi: DEFAULT_DPI,
        }
    }
}

/// Sequences the composition stages with injected collaborators.
///
/// Holds no per-request state and can be shared across threads.
pub struct Pipeline {
    fetcher: Box<dyn LogoFetcher>,
    fonts: Box<dyn FontProvider>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(fetcher: impl LogoFetcher + 'static, fonts: impl FontProvider + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            fonts: Box::new(fonts),
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Run every stage the request asks for. The first failure aborts the
    /// render and no image is returned.
    pub fn render(&self, req: &RenderRequest) -> Result<RgbaImage> {
        let mut image = qr::encode(&req.qr.text, req.qr.error_correction, req.qr.size)?;

        if let Some(url) = non_empty(&req.logo_url) {
            debug!(url, "Fetching logo");
            let bytes = self.fetcher.fetch(url)?;
            image = logo::apply(&image, &bytes)?;
        }

        if let Some(watermark_text) = non_empty(&req.watermark) {
            let font = self.fonts.font()?;
            let watermark =
                Watermark::new(font).with_size(self.options.watermark_size_pt, self.options.dpi);
            image = text::apply(&image, watermark_text, &watermark)?;
        }

        info!(
            width = image.width(),
            height = image.height(),
            logo = non_empty(&req.logo_url).is_some(),
            watermark = non_empty(&req.watermark).is_some(),
            "QR image rendered"
        );

        Ok(image)
    }

    /// [`render`](Self::render) and encode the result as PNG.
    pub fn render_png(&self, req: &RenderRequest) -> Result<Vec<u8>> {
        let image = self.render(req)?;
        encode_png(&image)
    }
}

/// Encode a raster as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| EngineError::OutputFailed(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::FontArc;
    use image::Rgba;

    use crate::test_support::test_font;

    struct StaticLogo(Vec<u8>);

    impl LogoFetcher for StaticLogo {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    struct NotFound;

    impl LogoFetcher for NotFound {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            Err(EngineError::FetchFailed(format!("{url}: HTTP 404 Not Found")))
        }
    }

    struct NoFont;

    impl FontProvider for NoFont {
        fn font(&self) -> Result<FontArc> {
            Err(EngineError::FontLoadFailed("SarasaFixedSC-Regular.ttf: not found".into()))
        }
    }

    struct BundledFont;

    impl FontProvider for BundledFont {
        fn font(&self) -> Result<FontArc> {
            Ok(test_font())
        }
    }

    fn red_logo_png(width: u32, height: u32) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]))).unwrap()
    }

    #[test]
    fn plain_text_renders_scannable_png() {
        let pipeline = Pipeline::new(NotFound, NoFont);
        let png = pipeline
            .render_png(&RenderRequest::new(QrRequest::new("HELLO")))
            .unwrap();

        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (256, 256));
        assert_eq!(qr::scan(&decoded).as_deref(), Some("HELLO"));
    }

    #[test]
    fn render_is_deterministic() {
        let pipeline = Pipeline::new(StaticLogo(red_logo_png(120, 60)), NoFont);
        let req = RenderRequest::new(QrRequest::new("same input")).with_logo("https://x/logo.png");
        assert_eq!(
            pipeline.render_png(&req).unwrap(),
            pipeline.render_png(&req).unwrap()
        );
    }

    #[test]
    fn empty_optional_inputs_are_skipped() {
        let pipeline = Pipeline::new(NotFound, NoFont);
        let req = RenderRequest::new(QrRequest::new("HELLO"))
            .with_logo("")
            .with_watermark("");
        let image = pipeline.render(&req).unwrap();
        let plain = qr::encode("HELLO", Default::default(), 256).unwrap();
        assert_eq!(image, plain);
    }

    #[test]
    fn logo_is_resized_and_centered() {
        let pipeline = Pipeline::new(StaticLogo(red_logo_png(120, 60)), NoFont);
        let req = RenderRequest::new(QrRequest::new("HELLO")).with_logo("https://x/logo.png");
        let image = pipeline.render(&req).unwrap();

        assert_eq!(image.dimensions(), (256, 256));
        let red = |x, y| {
            let p = image.get_pixel(x, y);
            p[0] > 200 && p[1] < 50
        };
        assert!(red(107, 117));
        assert!(red(148, 137));
        assert!(!red(106, 117));
        assert!(!red(149, 137));
        assert!(!red(107, 138));
    }

    #[test]
    fn fetch_failure_aborts_without_output() {
        let pipeline = Pipeline::new(NotFound, NoFont);
        let req = RenderRequest::new(QrRequest::new("HELLO")).with_logo("https://x/missing.png");
        let err = pipeline.render_png(&req).unwrap_err();
        assert!(matches!(err, EngineError::FetchFailed(_)));
    }

    #[test]
    fn undecodable_logo_is_reported() {
        let pipeline = Pipeline::new(StaticLogo(b"<html>nope</html>".to_vec()), NoFont);
        let req = RenderRequest::new(QrRequest::new("HELLO")).with_logo("https://x/logo.png");
        assert!(matches!(
            pipeline.render(&req),
            Err(EngineError::DecodeFailed(_))
        ));
    }

    #[test]
    fn font_failure_aborts_watermark() {
        let pipeline = Pipeline::new(NotFound, NoFont);
        let req = RenderRequest::new(QrRequest::new("HELLO")).with_watermark("AB");
        assert!(matches!(
            pipeline.render(&req),
            Err(EngineError::FontLoadFailed(_))
        ));
    }

    #[test]
    fn encoding_failure_stops_before_logo_fetch() {
        let pipeline = Pipeline::new(NotFound, NoFont);
        let mut qr_req = QrRequest::new("x".repeat(4000));
        qr_req.error_correction = qr::ErrorCorrection::High;
        let req = RenderRequest::new(qr_req).with_logo("https://x/logo.png");
        assert!(matches!(
            pipeline.render(&req),
            Err(EngineError::EncodingFailed(_))
        ));
    }

    #[test]
    fn watermark_grows_canvas_by_font_size() {
        let pipeline = Pipeline::new(NotFound, BundledFont);
        let req = RenderRequest::new(QrRequest::new("TEST")).with_watermark("AB");
        let image = pipeline.render(&req).unwrap();
        assert_eq!(image.dimensions(), (256, 270));
    }

    #[test]
    fn logo_and_watermark_compose() {
        let pipeline = Pipeline::new(StaticLogo(red_logo_png(120, 60)), BundledFont)
            .with_options(PipelineOptions {
                watermark_size_pt: 20.0,
                dpi: 72.0,
            });
        let req = RenderRequest::new(QrRequest::new("TEST"))
            .with_logo("https://x/logo.png")
            .with_watermark("AB12");
        let image = pipeline.render(&req).unwrap();
        assert_eq!(image.dimensions(), (256, 276));
        let p = image.get_pixel(107, 117);
        assert!(p[0] > 200 && p[1] < 50);
    }
}
