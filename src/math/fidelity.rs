//! Pixel-level comparison between a reconstruction and its reference

use crate::io::error::{Result, invalid_parameter};
use image::RgbImage;

/// Mean squared error over all channels of two equally sized images
///
/// Values are compared on the 0–255 scale. Used to bound the drift that
/// the resize round trips of tiling and stitching introduce.
///
/// # Errors
///
/// Returns `InvalidParameter` if the dimensions differ or the images are empty
pub fn mean_squared_error(reconstructed: &RgbImage, reference: &RgbImage) -> Result<f64> {
    if reconstructed.dimensions() != reference.dimensions() {
        let (w, h) = reconstructed.dimensions();
        let (rw, rh) = reference.dimensions();
        return Err(invalid_parameter(
            "reconstructed",
            &format!("{w}x{h}"),
            &format!("dimensions differ from reference {rw}x{rh}"),
        ));
    }

    let samples = reference.as_raw().len();
    if samples == 0 {
        return Err(invalid_parameter(
            "reference",
            &"0x0",
            &"cannot compare zero-area images",
        ));
    }

    let sum: f64 = reconstructed
        .as_raw()
        .iter()
        .zip(reference.as_raw())
        .map(|(&a, &b)| {
            let diff = f64::from(a) - f64::from(b);
            diff * diff
        })
        .sum();

    Ok(sum / samples as f64)
}

/// Peak signal-to-noise ratio in decibels, infinite for identical images
///
/// # Errors
///
/// Same conditions as [`mean_squared_error`]
pub fn peak_signal_to_noise(reconstructed: &RgbImage, reference: &RgbImage) -> Result<f64> {
    let mse = mean_squared_error(reconstructed, reference)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (255.0_f64 * 255.0 / mse).log10())
}
