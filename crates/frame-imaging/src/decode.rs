//! Input format detection and decoding to raw RGB888.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader, RgbImage};
use tracing::{debug, info};

use crate::{ImagingError, MAX_DIMENSION};

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Image container formats the frame knows how to identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Jpeg,
    Png,
    Bmp,
    Unknown,
}

/// Identify an image by its magic bytes.
pub fn detect_format(data: &[u8]) -> InputFormat {
    if data.len() >= 8 && data[..8] == PNG_MAGIC {
        return InputFormat::Png;
    }
    if data.len() >= 2 {
        if data[0] == 0x42 && data[1] == 0x4D {
            return InputFormat::Bmp;
        }
        if data[0] == 0xFF && data[1] == 0xD8 {
            return InputFormat::Jpeg;
        }
    }
    InputFormat::Unknown
}

/// Identify a file on disk by reading its leading bytes.
pub fn detect_format_file(path: &Path) -> Result<InputFormat, ImagingError> {
    use std::io::Read;

    let mut file = std::fs::File::open(path).map_err(ImagingError::Read)?;
    let mut magic = [0u8; 8];
    let read = file.read(&mut magic).map_err(ImagingError::Read)?;
    Ok(detect_format(&magic[..read]))
}

/// Decode JPEG or PNG bytes to an RGB888 buffer.
///
/// Geometry is checked against [`MAX_DIMENSION`] before the pixel data is
/// decoded, so oversized inputs fail without a large allocation. BMP input
/// is rejected here: BMPs are already display-ready and bypass the pipeline.
pub fn decode_rgb(data: &[u8]) -> Result<RgbImage, ImagingError> {
    let format = match detect_format(data) {
        InputFormat::Jpeg => ImageFormat::Jpeg,
        InputFormat::Png => ImageFormat::Png,
        InputFormat::Bmp | InputFormat::Unknown => return Err(ImagingError::UnsupportedFormat),
    };

    let mut reader = ImageReader::new(Cursor::new(data));
    reader.set_format(format);
    let (width, height) = reader.into_dimensions()?;
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ImagingError::UnsupportedGeometry { width, height });
    }
    debug!(width, height, ?format, "Decoding image");

    let mut reader = ImageReader::new(Cursor::new(data));
    reader.set_format(format);
    let img = reader.decode()?.to_rgb8();

    info!(
        width = img.width(),
        height = img.height(),
        "Decoded image to RGB888"
    );
    Ok(img)
}
