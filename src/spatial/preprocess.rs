//! Deterministic resizing applied to images before they reach a model

use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbImage;

use crate::io::error::{Result, invalid_parameter};
use crate::math::rounding::round_to_multiple;
use crate::spatial::tiles::resize_exact;

/// One-shot flag for the size adjustment warning
///
/// Owned by the caller so each run, or each test, decides when the warning
/// may fire again.
#[derive(Debug, Default)]
pub struct SizeWarning {
    fired: AtomicBool,
}

impl SizeWarning {
    /// Create a flag that has not fired
    pub const fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// Claim the flag; true only for the first caller since the last reset
    pub fn fire(&self) -> bool {
        !self.fired.swap(true, Ordering::AcqRel)
    }

    /// Whether the warning has been emitted
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Allow the warning to be emitted again
    pub fn reset(&self) {
        self.fired.store(false, Ordering::Release);
    }
}

/// Resize `image` so both sides are the nearest multiple of `base`
///
/// Images that already conform are returned unchanged. The first adjustment
/// logs a warning through `warning`; later ones are silent.
///
/// # Errors
///
/// Returns `InvalidParameter` if `base` is zero
pub fn make_multiple_of(image: &RgbImage, base: u32, warning: &SizeWarning) -> Result<RgbImage> {
    if base == 0 {
        return Err(invalid_parameter("base", &base, &"must be positive"));
    }

    let (width, height) = image.dimensions();
    let target_width = round_to_multiple(width, base).max(base);
    let target_height = round_to_multiple(height, base).max(base);

    if (target_width, target_height) == (width, height) {
        return Ok(image.clone());
    }

    if warning.fire() {
        log::warn!(
            "image size needs to be a multiple of {base}; the loaded image size was \
             ({width}, {height}), so it was adjusted to ({target_width}, {target_height}). \
             This adjustment will be done to all images whose sizes are not multiples of {base}"
        );
    }

    Ok(resize_exact(image, target_width, target_height))
}

/// Rescale `image` to `target_width`, keeping its aspect ratio
///
/// The height never drops below `min_height`. An image that already has the
/// target width and enough height is returned unchanged.
///
/// # Errors
///
/// Returns `InvalidParameter` if `target_width` is zero or the image has
/// zero width
pub fn scale_width(image: &RgbImage, target_width: u32, min_height: u32) -> Result<RgbImage> {
    if target_width == 0 {
        return Err(invalid_parameter(
            "target_width",
            &target_width,
            &"must be positive",
        ));
    }

    let (width, height) = image.dimensions();
    if width == 0 {
        return Err(invalid_parameter(
            "image",
            &format!("{width}x{height}"),
            &"cannot scale an image of zero width",
        ));
    }
    if width == target_width && height >= min_height {
        return Ok(image.clone());
    }

    let scaled = u64::from(target_width) * u64::from(height) / u64::from(width);
    let target_height = u32::try_from(scaled)
        .unwrap_or(u32::MAX)
        .max(min_height)
        .max(1);

    Ok(resize_exact(image, target_width, target_height))
}
