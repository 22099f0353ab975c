//! Packed 4-bit wire format and display-readiness checks.
//!
//! The panel takes two pixels per byte, each a palette index in one nibble,
//! high nibble first. Packing is a lossless re-encoding of the palette
//! index stream, so it requires a palette-pure input buffer.

use image::RgbImage;

use crate::ImagingError;
use crate::buffer::try_vec_zeroed;
use crate::palette::{Palette, Rgb};

/// Palette index used to pad odd-width rows.
const PAD_INDEX: u8 = 1; // white

/// Pack a palette-pure RGB buffer into the display's 4-bit format.
///
/// Rows are packed independently, two pixels per byte, high nibble first;
/// an odd-width row's final low nibble is padded with white. Returns
/// [`ImagingError::NotQuantized`] for any pixel that is not exactly a
/// non-reserved palette entry.
pub fn pack_nibbles(img: &RgbImage, palette: &Palette) -> Result<Vec<u8>, ImagingError> {
    let (width, height) = img.dimensions();
    let row_bytes = (width as usize).div_ceil(2);
    let mut out = try_vec_zeroed::<u8>(row_bytes * height as usize)?;

    let index_at = |x: u32, y: u32| -> Result<u8, ImagingError> {
        let p = img.get_pixel(x, y);
        palette
            .index_of(Rgb::new(p[0], p[1], p[2]))
            .map(|i| i as u8)
            .ok_or(ImagingError::NotQuantized { x, y })
    };

    for y in 0..height {
        let row_start = y as usize * row_bytes;
        for x in (0..width).step_by(2) {
            let hi = index_at(x, y)?;
            let lo = if x + 1 < width {
                index_at(x + 1, y)?
            } else {
                PAD_INDEX
            };
            out[row_start + x as usize / 2] = (hi << 4) | lo;
        }
    }

    Ok(out)
}

/// Whether a buffer is already display-ready: exact target dimensions and
/// every pixel an exact non-reserved palette color.
pub fn is_display_ready(img: &RgbImage, width: u32, height: u32, palette: &Palette) -> bool {
    if img.dimensions() != (width, height) {
        return false;
    }
    img.pixels().all(|p| palette.contains(Rgb::new(p[0], p[1], p[2])))
}
