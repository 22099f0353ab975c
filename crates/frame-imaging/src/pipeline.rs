//! End-to-end conversion pipeline.
//!
//! Decode, orient, cover-fit, tone-map, dither, pack. Conversions are
//! synchronous and self-contained: every intermediate buffer is owned by
//! the call and dropped on any exit path. Callers that convert from
//! multiple tasks must serialize invocations themselves; nothing here is
//! shared between calls.

use std::path::Path;

use image::RgbImage;
use tracing::info;

use crate::palette::{DitherMode, PalettePair};
use crate::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, ImagingError, bmp, decode, dither, pack, resize, rotate,
    tonemap,
};

/// Per-conversion settings.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Display resolution to fit.
    pub target_width: u32,
    pub target_height: u32,

    /// Dither against the theoretical palette instead of the measured one
    /// (legacy/stock firmware compatibility).
    pub use_stock_mode: bool,

    /// Error-diffusion kernel.
    pub kernel: dither::DitherKernel,

    /// Remap luminance into the panel's measured range before dithering.
    /// Ignored in stock mode, which reproduces the legacy output exactly.
    pub compress_range: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            target_width: DISPLAY_WIDTH,
            target_height: DISPLAY_HEIGHT,
            use_stock_mode: false,
            kernel: dither::DitherKernel::default(),
            compress_range: true,
        }
    }
}

impl ProcessOptions {
    fn dither_mode(&self) -> DitherMode {
        if self.use_stock_mode {
            DitherMode::Stock
        } else {
            DitherMode::Measured
        }
    }
}

/// Image processor with an explicit palette pair.
///
/// Owns no other state; one instance can serve many sequential conversions,
/// and swapping in freshly calibrated measured colors is just constructing
/// a new instance.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    palettes: PalettePair,
}

impl Processor {
    pub fn new(palettes: PalettePair) -> Self {
        Self { palettes }
    }

    pub fn palettes(&self) -> &PalettePair {
        &self.palettes
    }

    /// Convert compressed image bytes into a display-ready RGB buffer.
    pub fn process_bytes(
        &self,
        data: &[u8],
        opts: &ProcessOptions,
    ) -> Result<RgbImage, ImagingError> {
        info!(
            len = data.len(),
            kernel = opts.kernel.name(),
            stock = opts.use_stock_mode,
            "Processing image"
        );

        let decoded = decode::decode_rgb(data)?;
        let oriented = rotate::normalize_landscape(decoded)?;
        let mut fitted = resize::cover_resize(&oriented, opts.target_width, opts.target_height)?;
        drop(oriented);

        if opts.compress_range && !opts.use_stock_mode {
            tonemap::compress_dynamic_range(&mut fitted, &self.palettes.measured);
        }

        dither::dither_in_place(&mut fitted, &self.palettes, opts.dither_mode(), opts.kernel)?;

        info!(
            width = fitted.width(),
            height = fitted.height(),
            "Image ready for display"
        );
        Ok(fitted)
    }

    /// Convert a file on disk and write the result as a BMP.
    ///
    /// The input is read whole; on any failure no output file remains.
    pub fn process_file(
        &self,
        input: &Path,
        output: &Path,
        opts: &ProcessOptions,
    ) -> Result<(), ImagingError> {
        info!(input = %input.display(), output = %output.display(), "Converting file");
        let data = std::fs::read(input).map_err(ImagingError::Read)?;
        let img = self.process_bytes(&data, opts)?;
        bmp::write_bmp(output, &img)
    }

    /// Convert bytes straight to the display's packed 4-bit stream.
    pub fn process_to_packed(
        &self,
        data: &[u8],
        opts: &ProcessOptions,
    ) -> Result<Vec<u8>, ImagingError> {
        let img = self.process_bytes(data, opts)?;
        pack::pack_nibbles(&img, &self.palettes.theoretical)
    }

    /// Whether a decoded buffer already satisfies the display contract for
    /// the given resolution.
    pub fn is_display_ready(&self, img: &RgbImage, width: u32, height: u32) -> bool {
        pack::is_display_ready(img, width, height, &self.palettes.theoretical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 130])
        });
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    fn small_opts() -> ProcessOptions {
        ProcessOptions {
            target_width: 40,
            target_height: 24,
            ..ProcessOptions::default()
        }
    }

    #[test]
    fn test_process_bytes_produces_display_ready_buffer() {
        let processor = Processor::default();
        let opts = small_opts();
        let out = processor.process_bytes(&png_bytes(100, 60), &opts).unwrap();

        assert_eq!(out.dimensions(), (40, 24));
        assert!(processor.is_display_ready(&out, 40, 24));
    }

    #[test]
    fn test_portrait_input_is_rotated_then_fitted() {
        let processor = Processor::default();
        let opts = small_opts();
        let out = processor.process_bytes(&png_bytes(60, 100), &opts).unwrap();
        assert_eq!(out.dimensions(), (40, 24));
    }

    #[test]
    fn test_stock_mode_output_is_display_ready() {
        let processor = Processor::default();
        let opts = ProcessOptions {
            use_stock_mode: true,
            ..small_opts()
        };
        let out = processor.process_bytes(&png_bytes(80, 48), &opts).unwrap();
        assert!(processor.is_display_ready(&out, 40, 24));
    }

    #[test]
    fn test_process_to_packed_length() {
        let processor = Processor::default();
        let opts = small_opts();
        let packed = processor.process_to_packed(&png_bytes(100, 60), &opts).unwrap();
        // 40 px wide -> 20 bytes per row, 24 rows.
        assert_eq!(packed.len(), 20 * 24);
    }

    #[test]
    fn test_process_file_round_trip() {
        let dir = std::env::temp_dir().join("frame-imaging-pipeline-test");
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("in.png");
        let output = dir.join("out.bmp");
        std::fs::write(&input, png_bytes(100, 60)).unwrap();

        let processor = Processor::default();
        processor.process_file(&input, &output, &small_opts()).unwrap();

        let read_back = image::open(&output).unwrap().to_rgb8();
        assert_eq!(read_back.dimensions(), (40, 24));
        assert!(processor.is_display_ready(&read_back, 40, 24));

        std::fs::remove_file(&input).unwrap();
        std::fs::remove_file(&output).unwrap();
    }

    #[test]
    fn test_decode_failure_propagates() {
        let processor = Processor::default();
        let err = processor
            .process_bytes(b"not an image", &small_opts())
            .unwrap_err();
        assert!(matches!(err, ImagingError::UnsupportedFormat));
    }

    #[test]
    fn test_missing_input_file_is_read_error() {
        let processor = Processor::default();
        let err = processor
            .process_file(
                Path::new("/nonexistent/input.jpg"),
                Path::new("/nonexistent/out.bmp"),
                &small_opts(),
            )
            .unwrap_err();
        assert!(matches!(err, ImagingError::Read(_)));
    }
}
