//! Target dimensions that are whole multiples of the tile size

use crate::io::error::{Result, ensure_tile_size};
use crate::math::rounding::round_to_multiple;

/// Compute the size an image is resized to before tiling
///
/// Each dimension is rounded to the nearest multiple of `tile_size` (ties to
/// even) and clamped to at least one tile. A 1000x700 image with 512 pixel
/// tiles becomes 1024x512.
///
/// # Errors
///
/// Returns `InvalidParameter` if `tile_size` is zero
pub fn output_size(width: u32, height: u32, tile_size: u32) -> Result<(u32, u32)> {
    ensure_tile_size(tile_size)?;

    Ok((
        round_to_multiple(width, tile_size).max(tile_size),
        round_to_multiple(height, tile_size).max(tile_size),
    ))
}
