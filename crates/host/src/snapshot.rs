//! PNG output of the hue/lightness map.
//!
//! Gated behind `png` (default on). The raster itself comes from
//! [`crate::pixel`], which is always available.

use std::path::Path;

use huepick_core::error::PickerError;
use huepick_core::sphere::MapExtent;

use crate::pixel::hsl_map_rgba;

/// Largest map raster, in pixels, that [`write_hsl_map_png`] will allocate.
pub const MAX_MAP_PIXELS: u64 = 4096 * 4096;

/// Writes an RGBA8 buffer as a PNG image.
///
/// Returns `PickerError::InvalidDimensions` if the buffer does not hold
/// `width * height` pixels, or `PickerError::Io` on write failure.
pub fn write_png(rgba: Vec<u8>, width: u32, height: u32, path: &Path) -> Result<(), PickerError> {
    let img = image::RgbaImage::from_raw(width, height, rgba).ok_or(PickerError::InvalidDimensions)?;
    img.save(path)
        .map_err(|e| PickerError::Io(format!("{}: {e}", path.display())))
}

/// Renders the map at `extent` (rounded to whole pixels) and saves it.
///
/// Returns `PickerError::InvalidDimensions` for a side under one pixel or a
/// map above [`MAX_MAP_PIXELS`].
pub fn write_hsl_map_png(extent: MapExtent, path: &Path) -> Result<(), PickerError> {
    let to_pixels = |v: f64| {
        let rounded = v.round();
        if rounded < 1.0 || rounded > f64::from(u32::MAX) {
            return Err(PickerError::InvalidDimensions);
        }
        Ok(rounded as u32)
    };
    let (width, height) = (to_pixels(extent.width)?, to_pixels(extent.height)?);
    if u64::from(width) * u64::from(height) > MAX_MAP_PIXELS {
        return Err(PickerError::InvalidDimensions);
    }
    tracing::debug!(width, height, path = %path.display(), "writing map snapshot");
    write_png(hsl_map_rgba(width, height), width, height, path)
}
