//! Conversion between RGB pixel blocks and normalised CHW tensors
//!
//! Models consume `(channels, height, width)` arrays with every channel mapped
//! from `[0, 255]` to `[-1, 1]` (mean 0.5, std 0.5). The inverse mapping clamps
//! out-of-range model output before quantising back to bytes.

use crate::io::configuration::{TENSOR_MEAN, TENSOR_STD};
use crate::io::error::{Result, computation_error};
use image::{Rgb, RgbImage};
use ndarray::Array3;

const CHANNELS: usize = 3;

/// Convert a block into a normalised `(3, height, width)` tensor
pub fn block_to_tensor(block: &RgbImage) -> Array3<f32> {
    let (width, height) = block.dimensions();
    let mut tensor = Array3::zeros((CHANNELS, height as usize, width as usize));

    for (x, y, pixel) in block.enumerate_pixels() {
        for (c, &value) in pixel.0.iter().enumerate() {
            if let Some(slot) = tensor.get_mut((c, y as usize, x as usize)) {
                *slot = (f32::from(value) / 255.0 - TENSOR_MEAN) / TENSOR_STD;
            }
        }
    }

    tensor
}

/// Convert a normalised `(3, height, width)` tensor back into a block
///
/// # Errors
///
/// Returns a computation error if the tensor doesn't have three channels,
/// has a zero-sized spatial axis, or contains non-finite values
pub fn tensor_to_block(tensor: &Array3<f32>) -> Result<RgbImage> {
    let (channels, height, width) = tensor.dim();
    if channels != CHANNELS {
        return Err(computation_error(
            "tensor_to_block",
            &format!("expected {CHANNELS} channels, found {channels}"),
        ));
    }
    if height == 0 || width == 0 {
        return Err(computation_error(
            "tensor_to_block",
            &format!("tensor has empty spatial shape {height}x{width}"),
        ));
    }
    if tensor.iter().any(|v| !v.is_finite()) {
        return Err(computation_error(
            "tensor_to_block",
            &"tensor contains non-finite values",
        ));
    }

    let block = RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let mut rgb = [0_u8; CHANNELS];
        for (c, byte) in rgb.iter_mut().enumerate() {
            let value = tensor
                .get((c, y as usize, x as usize))
                .copied()
                .unwrap_or(-1.0);
            let unit = value.mul_add(TENSOR_STD, TENSOR_MEAN).clamp(0.0, 1.0);
            *byte = (unit * 255.0).round() as u8;
        }
        Rgb(rgb)
    });

    Ok(block)
}
