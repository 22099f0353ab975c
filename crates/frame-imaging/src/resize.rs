//! Cover-fit resizing.
//!
//! Scales so the source fully covers the target (`max` of the two axis
//! ratios), then center-crops the excess. Sampling is nearest-neighbor with
//! clamped source coordinates; interpolation is deliberately skipped for
//! speed on constrained hardware.

use image::RgbImage;
use tracing::info;

use crate::ImagingError;
use crate::buffer::alloc_rgb;

/// Resize to exactly `dst_w` x `dst_h` with cover semantics.
///
/// Returns a clone when the source already matches the target, otherwise a
/// freshly allocated buffer. Every destination pixel maps back through the
/// scale and crop offset to a valid source pixel.
pub fn cover_resize(src: &RgbImage, dst_w: u32, dst_h: u32) -> Result<RgbImage, ImagingError> {
    let (src_w, src_h) = src.dimensions();
    if (src_w, src_h) == (dst_w, dst_h) {
        return Ok(src.clone());
    }

    let scale_x = dst_w as f32 / src_w as f32;
    let scale_y = dst_h as f32 / src_h as f32;
    let scale = scale_x.max(scale_y);

    let scaled_w = (src_w as f32 * scale) as i64;
    let scaled_h = (src_h as f32 * scale) as i64;

    // Crop offsets in scaled space, centering the image.
    let offset_x = (scaled_w - i64::from(dst_w)) / 2;
    let offset_y = (scaled_h - i64::from(dst_h)) / 2;

    info!(
        src_w,
        src_h, scale, dst_w, dst_h, offset_x, offset_y, "Cover-fit resize"
    );

    let mut dst = alloc_rgb(dst_w, dst_h)?;

    for y in 0..dst_h {
        for x in 0..dst_w {
            // Destination pixel -> scaled space -> source space.
            let scaled_x = (i64::from(x) + offset_x) as f32;
            let scaled_y = (i64::from(y) + offset_y) as f32;

            let src_x = ((scaled_x / scale) as i64).clamp(0, i64::from(src_w) - 1) as u32;
            let src_y = ((scaled_y / scale) as i64).clamp(0, i64::from(src_h) - 1) as u32;

            dst.put_pixel(x, y, *src.get_pixel(src_x, src_y));
        }
    }

    Ok(dst)
}
