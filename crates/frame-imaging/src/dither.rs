//! Palette-constrained error-diffusion dithering.
//!
//! Quantizes RGB888 buffers to the panel palette, diffusing each pixel's
//! quantization error to not-yet-processed neighbors. Distance is measured
//! against the selected dither palette (measured or stock), but output
//! pixels are always written from the theoretical palette so the result
//! maps directly onto the packed display color codes.
//!
//! Error state is a ring of three O(width) rows (current, next, next+1);
//! the dy=2 kernels need the third row, Floyd-Steinberg touches only the
//! first two. Memory stays bounded by width regardless of image height.

use std::str::FromStr;

use image::RgbImage;
use tracing::debug;

use crate::ImagingError;
use crate::buffer::try_vec_zeroed;
use crate::palette::{DitherMode, PalettePair, Rgb};

/// One diffusion tap: `(dx, dy, numerator)` over the kernel's shared
/// denominator.
struct Kernel {
    taps: &'static [(i32, i32, i32)],
    denominator: i32,
}

const FLOYD_STEINBERG: Kernel = Kernel {
    taps: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    denominator: 16,
};

const STUCKI: Kernel = Kernel {
    taps: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
        (-2, 2, 1),
        (-1, 2, 2),
        (0, 2, 4),
        (1, 2, 2),
        (2, 2, 1),
    ],
    denominator: 42,
};

const BURKES: Kernel = Kernel {
    taps: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
    ],
    denominator: 32,
};

const SIERRA: Kernel = Kernel {
    taps: &[
        (1, 0, 5),
        (2, 0, 3),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 5),
        (1, 1, 4),
        (2, 1, 2),
        (-1, 2, 2),
        (0, 2, 3),
        (1, 2, 2),
    ],
    denominator: 32,
};

/// Supported error-diffusion kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherKernel {
    #[default]
    FloydSteinberg,
    Stucki,
    Burkes,
    Sierra,
}

impl DitherKernel {
    fn kernel(self) -> &'static Kernel {
        match self {
            DitherKernel::FloydSteinberg => &FLOYD_STEINBERG,
            DitherKernel::Stucki => &STUCKI,
            DitherKernel::Burkes => &BURKES,
            DitherKernel::Sierra => &SIERRA,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DitherKernel::FloydSteinberg => "floyd-steinberg",
            DitherKernel::Stucki => "stucki",
            DitherKernel::Burkes => "burkes",
            DitherKernel::Sierra => "sierra",
        }
    }
}

impl FromStr for DitherKernel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "floyd-steinberg" => Ok(DitherKernel::FloydSteinberg),
            "stucki" => Ok(DitherKernel::Stucki),
            "burkes" => Ok(DitherKernel::Burkes),
            "sierra" => Ok(DitherKernel::Sierra),
            other => Err(format!("unknown dither kernel: {other}")),
        }
    }
}

/// Dither an image in place against the palette pair.
///
/// After this returns, every pixel equals one of the six non-reserved
/// theoretical palette colors.
pub fn dither_in_place(
    img: &mut RgbImage,
    palettes: &PalettePair,
    mode: DitherMode,
    kernel: DitherKernel,
) -> Result<(), ImagingError> {
    let (width, height) = img.dimensions();
    let width = width as usize;
    let dither_palette = palettes.dither_target(mode);
    let output_palette = &palettes.theoretical;
    let kernel = kernel.kernel();

    debug!(width, height, ?mode, "Dithering image to panel palette");

    // Three error rows: current, next, next+1. Each holds one signed
    // accumulator per channel per column.
    let mut rows: [Vec<i32>; 3] = [
        try_vec_zeroed(width * 3)?,
        try_vec_zeroed(width * 3)?,
        try_vec_zeroed(width * 3)?,
    ];

    for y in 0..height {
        for x in 0..width as u32 {
            let err_idx = x as usize * 3;
            let raw = *img.get_pixel(x, y);

            let old_r = (i32::from(raw[0]) + rows[0][err_idx]).clamp(0, 255);
            let old_g = (i32::from(raw[1]) + rows[0][err_idx + 1]).clamp(0, 255);
            let old_b = (i32::from(raw[2]) + rows[0][err_idx + 2]).clamp(0, 255);

            let color_idx =
                dither_palette.closest_index(Rgb::new(old_r as u8, old_g as u8, old_b as u8));

            // Output from the theoretical palette regardless of what drove
            // the distance metric.
            img.put_pixel(x, y, output_palette.get(color_idx).into());

            // Error is measured against the dither palette.
            let chosen = dither_palette.get(color_idx);
            let err = [
                old_r - i32::from(chosen.r),
                old_g - i32::from(chosen.g),
                old_b - i32::from(chosen.b),
            ];

            for &(dx, dy, num) in kernel.taps {
                let nx = x as i64 + i64::from(dx);
                if nx < 0 || nx >= width as i64 {
                    continue;
                }
                let ny = i64::from(y) + i64::from(dy);
                if ny >= i64::from(height) {
                    continue;
                }
                let row = &mut rows[dy as usize];
                let idx = nx as usize * 3;
                for c in 0..3 {
                    // Truncating division; the output clamp absorbs the
                    // accumulated rounding.
                    row[idx + c] += err[c] * num / kernel.denominator;
                }
            }
        }

        rows.rotate_left(1);
        rows[2].fill(0);
    }

    Ok(())
}
