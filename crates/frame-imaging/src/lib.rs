//! Image processing pipeline for a multi-color e-paper photo frame.
//!
//! Turns arbitrary JPEG/PNG photos into display-ready, palette-quantized
//! buffers: decode, orientation normalization, cover-fit resize,
//! dynamic-range compression, error-diffusion dithering against the panel's
//! measured colors, and packing into BMP or the display's 4-bit wire format.

pub mod bmp;
pub mod buffer;
pub mod decode;
pub mod dither;
pub mod pack;
pub mod palette;
pub mod pipeline;
pub mod resize;
pub mod rotate;
pub mod tonemap;

// Re-exports for convenience
pub use decode::{InputFormat, decode_rgb, detect_format};
pub use dither::{DitherKernel, dither_in_place};
pub use palette::{DitherMode, Palette, PalettePair, Rgb};
pub use pipeline::{ProcessOptions, Processor};

/// Native display resolution of the panel, landscape.
pub const DISPLAY_WIDTH: u32 = 800;
pub const DISPLAY_HEIGHT: u32 = 480;

/// Upper bound on decoded image dimensions, per side.
pub const MAX_DIMENSION: u32 = 10_000;

/// Errors that can occur while converting an image for display.
#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Unrecognized input format (expected JPEG or PNG)")]
    UnsupportedFormat,

    #[error("Image dimensions {width}x{height} exceed the {MAX_DIMENSION} px per-side limit")]
    UnsupportedGeometry { width: u32, height: u32 },

    #[error("Failed to allocate {bytes} byte pixel buffer")]
    Allocation { bytes: usize },

    #[error("Pixel at ({x}, {y}) is not a theoretical palette color")]
    NotQuantized { x: u32, y: u32 },

    #[error("Failed to read input: {0}")]
    Read(std::io::Error),

    #[error("Failed to write output: {0}")]
    Write(std::io::Error),
}
