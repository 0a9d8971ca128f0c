//! Image resizing for logos.
//!
//! Aspect-ratio arithmetic plus Lanczos3 resampling.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

/// Height matching `width` for an image of `orig_w` × `orig_h`, rounded to
/// the nearest pixel and never zero.
pub fn scaled_height(orig_w: u32, orig_h: u32, width: u32) -> u32 {
    if orig_w == 0 {
        return 1;
    }
    let height = (f64::from(width) * f64::from(orig_h) / f64::from(orig_w)).round() as u32;
    height.max(1)
}

/// Resize to exactly `width` × `height`.
///
/// Uses Lanczos3 filtering for high-quality downsampling.
/// Returns the original image unchanged if it already matches the target size.
pub fn resize_exact(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if orig_w == width && orig_h == height {
        debug!(width, height, "Image already at target size, skipping resize");
        return img.clone();
    }

    debug!(
        orig_w,
        orig_h,
        new_width = width,
        new_height = height,
        "Resizing image"
    );

    img.resize_exact(width, height, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Create a test DynamicImage with given dimensions.
    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let gray = GrayImage::from_pixel(width, height, Luma([128]));
        DynamicImage::ImageLuma8(gray)
    }

    #[test]
    fn test_scaled_height_rounds_to_nearest() {
        assert_eq!(scaled_height(120, 60, 42), 21);
        assert_eq!(scaled_height(3, 2, 42), 28);
        // 42 * 100 / 300 = 14
        assert_eq!(scaled_height(300, 100, 42), 14);
        // 42 * 1 / 4 = 10.5 -> 11
        assert_eq!(scaled_height(4, 1, 42), 11);
    }

    #[test]
    fn test_scaled_height_never_zero() {
        // Very wide, very short image
        assert_eq!(scaled_height(1000, 1, 10), 1);
        assert_eq!(scaled_height(0, 10, 10), 1);
    }

    #[test]
    fn test_resize_exact_downscale() {
        let img = create_test_image(800, 600);
        let result = resize_exact(&img, 400, 300);
        assert_eq!(result.width(), 400);
        assert_eq!(result.height(), 300);
    }

    #[test]
    fn test_resize_exact_upscale() {
        let img = create_test_image(20, 10);
        let result = resize_exact(&img, 42, 21);
        assert_eq!(result.width(), 42);
        assert_eq!(result.height(), 21);
    }

    #[test]
    fn test_resize_exact_same_size() {
        let img = create_test_image(42, 500);
        let result = resize_exact(&img, 42, 500);
        assert_eq!(result.width(), 42);
        assert_eq!(result.height(), 500);
    }

    #[test]
    fn test_resize_exact_keeps_uniform_color() {
        let img = create_test_image(120, 60);
        let result = resize_exact(&img, 42, 21).to_luma8();
        assert!(result.pixels().all(|p| p[0].abs_diff(128) <= 1));
    }
}
