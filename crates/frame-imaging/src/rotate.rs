//! 90-degree rotation and orientation normalization.
//!
//! The panel is landscape-native, so portrait sources are rotated a quarter
//! turn clockwise before fitting. Rotation is index-exact (no resampling).

use image::RgbImage;
use tracing::debug;

use crate::ImagingError;
use crate::buffer::alloc_rgb;

/// Rotate 90 degrees clockwise: `(x, y)` maps to `(h - 1 - y, x)` with
/// swapped output dimensions.
pub fn rotate90_cw(src: &RgbImage) -> Result<RgbImage, ImagingError> {
    let (w, h) = src.dimensions();
    let mut dst = alloc_rgb(h, w)?;

    for y in 0..h {
        for x in 0..w {
            let dst_x = h - 1 - y;
            let dst_y = x;
            dst.put_pixel(dst_x, dst_y, *src.get_pixel(x, y));
        }
    }

    Ok(dst)
}

/// Rotate portrait images to landscape; landscape and square pass through.
pub fn normalize_landscape(img: RgbImage) -> Result<RgbImage, ImagingError> {
    let (w, h) = img.dimensions();
    if h > w {
        debug!(w, h, "Portrait image detected, rotating 90 degrees clockwise");
        rotate90_cw(&img)
    } else {
        Ok(img)
    }
}
