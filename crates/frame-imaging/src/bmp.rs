//! Minimal 24-bit BMP container writer.
//!
//! The display side consumes plain uncompressed BMPs: a 54-byte header
//! (BITMAPFILEHEADER + BITMAPINFOHEADER), BGR samples, rows stored bottom
//! to top and padded to 4-byte multiples. The file is encoded fully in
//! memory and written with a single call so a failed write never leaves a
//! partially written header behind; on error the output path is removed
//! best-effort.

use std::path::Path;

use image::RgbImage;
use tracing::info;

use crate::ImagingError;
use crate::buffer::try_vec_zeroed;

/// Total size of the two BMP headers.
pub const HEADER_LEN: usize = 54;

const INFO_HEADER_LEN: u32 = 40;

/// Bytes per row including padding to a 4-byte boundary.
fn row_stride(width: u32) -> usize {
    (width as usize * 3).div_ceil(4) * 4
}

/// Encode an RGB888 buffer as an uncompressed 24-bit BMP.
pub fn encode_bmp(img: &RgbImage) -> Result<Vec<u8>, ImagingError> {
    let (width, height) = img.dimensions();
    let stride = row_stride(width);
    let pixel_bytes = stride * height as usize;
    let file_len = HEADER_LEN + pixel_bytes;

    let mut out = try_vec_zeroed::<u8>(file_len)?;

    // BITMAPFILEHEADER
    out[0] = b'B';
    out[1] = b'M';
    out[2..6].copy_from_slice(&(file_len as u32).to_le_bytes());
    // 6..10: reserved, zero
    out[10..14].copy_from_slice(&(HEADER_LEN as u32).to_le_bytes());

    // BITMAPINFOHEADER
    out[14..18].copy_from_slice(&INFO_HEADER_LEN.to_le_bytes());
    out[18..22].copy_from_slice(&(width as i32).to_le_bytes());
    out[22..26].copy_from_slice(&(height as i32).to_le_bytes());
    out[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    out[28..30].copy_from_slice(&24u16.to_le_bytes()); // bits per pixel
    // 30..34: BI_RGB compression, zero
    out[34..38].copy_from_slice(&(pixel_bytes as u32).to_le_bytes());
    // 38..54: resolution and palette fields, zero

    // Pixel rows, bottom to top, BGR.
    for y in 0..height {
        let src_y = height - 1 - y;
        let row_start = HEADER_LEN + y as usize * stride;
        for x in 0..width {
            let p = img.get_pixel(x, src_y);
            let i = row_start + x as usize * 3;
            out[i] = p[2];
            out[i + 1] = p[1];
            out[i + 2] = p[0];
        }
    }

    Ok(out)
}

/// Encode and write a BMP to disk.
///
/// No partial file survives a failure: the bytes are staged in memory
/// first, and the path is removed if the write itself errors.
pub fn write_bmp(path: &Path, img: &RgbImage) -> Result<(), ImagingError> {
    let bytes = encode_bmp(img)?;
    if let Err(e) = std::fs::write(path, &bytes) {
        let _ = std::fs::remove_file(path);
        return Err(ImagingError::Write(e));
    }
    info!(path = %path.display(), bytes = bytes.len(), "Wrote BMP output");
    Ok(())
}
