//! Canvas utilities: blank canvases, source-over compositing, and growing a
//! canvas downward.

use image::{Rgba, RgbaImage};

/// Opaque white, the background of every new canvas.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Create a canvas of the given size filled with [`BACKGROUND`].
pub fn new_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, BACKGROUND)
}

/// Alpha-composite `src` over `dst` with its top-left corner at `(x, y)`.
///
/// Only the overlapping region is touched; source pixels that land outside
/// `dst` are clipped. Offsets may be negative.
pub fn composite_over(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (dst_w, dst_h) = (i64::from(dst.width()), i64::from(dst.height()));

    for (sx, sy, pixel) in src.enumerate_pixels() {
        let target_x = x + i64::from(sx);
        let target_y = y + i64::from(sy);
        if target_x < 0 || target_y < 0 || target_x >= dst_w || target_y >= dst_h {
            continue;
        }
        let (tx, ty) = (target_x as u32, target_y as u32);

        match pixel[3] {
            0 => {}
            255 => dst.put_pixel(tx, ty, *pixel),
            _ => {
                let blended = blend_over(dst.get_pixel(tx, ty), pixel);
                dst.put_pixel(tx, ty, blended);
            }
        }
    }
}

/// Copy `src` onto a taller white canvas, leaving a blank strip below it.
///
/// The result is never shorter than `src`.
pub fn extend_canvas(src: &RgbaImage, new_height: u32) -> RgbaImage {
    let mut canvas = new_canvas(src.width(), new_height.max(src.height()));
    composite_over(&mut canvas, src, 0, 0);
    canvas
}

/// Porter-Duff source-over for one pixel with non-premultiplied channels.
fn blend_over(bg: &Rgba<u8>, fg: &Rgba<u8>) -> Rgba<u8> {
    let src_a = f32::from(fg[3]) / 255.0;
    let dst_a = f32::from(bg[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let c = (f32::from(fg[i]) * src_a + f32::from(bg[i]) * dst_a * (1.0 - src_a)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
