//! Fallible allocation for large pixel buffers.
//!
//! Conversion runs close to the memory budget on small hosts, so every
//! intermediate buffer (decoded RGB, rotated, resized, error rows) is
//! allocated through `try_reserve` and surfaces `ImagingError::Allocation`
//! instead of aborting on OOM.

use image::RgbImage;

use crate::ImagingError;

/// Allocate a zero-filled vector of `len` elements, or fail cleanly.
pub fn try_vec_zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>, ImagingError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| ImagingError::Allocation {
        bytes: len * std::mem::size_of::<T>(),
    })?;
    v.resize(len, T::default());
    Ok(v)
}

/// Allocate a zeroed RGB888 image buffer of the given dimensions.
pub fn alloc_rgb(width: u32, height: u32) -> Result<RgbImage, ImagingError> {
    let bytes = width as usize * height as usize * 3;
    let data = try_vec_zeroed::<u8>(bytes)?;
    RgbImage::from_raw(width, height, data).ok_or(ImagingError::Allocation { bytes })
}
