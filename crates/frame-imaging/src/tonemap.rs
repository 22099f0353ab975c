//! Dynamic-range compression toward the panel's reproducible range.
//!
//! E-paper "white" and "black" are far from sRGB white and black. Before
//! dithering, pixel luminance is remapped in linear light so the full input
//! range lands between the measured black and white levels, which keeps
//! shadow and highlight detail the dither stage can still express.

use std::sync::OnceLock;

use image::RgbImage;
use tracing::info;

use crate::palette::{Palette, Rgb};

const LINEAR_TO_SRGB_SIZE: usize = 4096;

// Rec.709 luminance weights.
const LUMA_R: f32 = 0.212_672_9;
const LUMA_G: f32 = 0.715_152_2;
const LUMA_B: f32 = 0.072_175_0;

struct GammaLuts {
    srgb_to_linear: [f32; 256],
    linear_to_srgb: [u8; LINEAR_TO_SRGB_SIZE],
}

fn luts() -> &'static GammaLuts {
    static LUTS: OnceLock<GammaLuts> = OnceLock::new();
    LUTS.get_or_init(|| {
        let mut srgb_to_linear = [0.0f32; 256];
        for (i, slot) in srgb_to_linear.iter_mut().enumerate() {
            let s = i as f32 / 255.0;
            *slot = if s > 0.04045 {
                ((s + 0.055) / 1.055).powf(2.4)
            } else {
                s / 12.92
            };
        }

        let mut linear_to_srgb = [0u8; LINEAR_TO_SRGB_SIZE];
        for (i, slot) in linear_to_srgb.iter_mut().enumerate() {
            let lin = i as f32 / (LINEAR_TO_SRGB_SIZE - 1) as f32;
            let s = if lin > 0.003_130_8 {
                1.055 * lin.powf(1.0 / 2.4) - 0.055
            } else {
                12.92 * lin
            };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        GammaLuts {
            srgb_to_linear,
            linear_to_srgb,
        }
    })
}

fn srgb_to_linear(v: u8) -> f32 {
    luts().srgb_to_linear[usize::from(v)]
}

fn linear_to_srgb(lin: f32) -> u8 {
    if lin <= 0.0 {
        return 0;
    }
    if lin >= 1.0 {
        return 255;
    }
    let idx = (lin * (LINEAR_TO_SRGB_SIZE - 1) as f32 + 0.5) as usize;
    luts().linear_to_srgb[idx]
}

fn linear_luminance(color: Rgb) -> f32 {
    LUMA_R * srgb_to_linear(color.r) + LUMA_G * srgb_to_linear(color.g)
        + LUMA_B * srgb_to_linear(color.b)
}

/// Compress each pixel's luminance into the measured panel's black-to-white
/// range, scaling RGB proportionally to preserve hue.
pub fn compress_dynamic_range(img: &mut RgbImage, measured: &Palette) {
    let black_y = linear_luminance(measured.get(0));
    let white_y = linear_luminance(measured.get(1));
    let range = white_y - black_y;

    info!(black_y, white_y, range, "Compressing dynamic range to panel levels");

    for pixel in img.pixels_mut() {
        let mut lr = srgb_to_linear(pixel[0]);
        let mut lg = srgb_to_linear(pixel[1]);
        let mut lb = srgb_to_linear(pixel[2]);

        let y = LUMA_R * lr + LUMA_G * lg + LUMA_B * lb;
        let compressed_y = black_y + y * range;

        if y > 1e-6 {
            let scale = compressed_y / y;
            lr *= scale;
            lg *= scale;
            lb *= scale;
        } else {
            // Near-black pixel: pin to the display's black level.
            lr = black_y;
            lg = black_y;
            lb = black_y;
        }

        pixel[0] = linear_to_srgb(lr);
        pixel[1] = linear_to_srgb(lg);
        pixel[2] = linear_to_srgb(lb);
    }
}
