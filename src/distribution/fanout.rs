//! Parallel per-tile processing
//!
//! Tiles are split into interleaved chunks, one per worker, and every chunk is
//! processed on the rayon pool. Blocks are replaced in place so each tile keeps
//! its `(row, col)` tag and results can be stitched in whatever order they end
//! up in.

use image::RgbImage;
use ndarray::Array3;
use rayon::prelude::*;

use crate::distribution::chunks::distribute;
use crate::io::error::Result;
use crate::math::tensor::{block_to_tensor, tensor_to_block};
use crate::spatial::tiles::Tile;

/// Per-tile processing step applied between tiling and stitching
///
/// Implementations may change the block size; the stitcher resamples blocks
/// back to the expected size.
pub trait TileTransform: Sync {
    /// Produce the replacement block for `block`
    ///
    /// # Errors
    ///
    /// Implementation-defined; a failure aborts the fan-out
    fn apply(&self, block: RgbImage) -> Result<RgbImage>;
}

impl<F> TileTransform for F
where
    F: Fn(RgbImage) -> Result<RgbImage> + Sync,
{
    fn apply(&self, block: RgbImage) -> Result<RgbImage> {
        self(block)
    }
}

/// Returns every block unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl TileTransform for Identity {
    fn apply(&self, block: RgbImage) -> Result<RgbImage> {
        Ok(block)
    }
}

/// Runs a tensor model on each block
///
/// The block is converted to a normalised `(3, height, width)` tensor, passed
/// to the model, and the output tensor converted back into pixels.
#[derive(Debug, Clone)]
pub struct TensorTransform<F> {
    model: F,
}

impl<F> TensorTransform<F> {
    /// Wrap a model closure
    pub const fn new(model: F) -> Self {
        Self { model }
    }
}

impl<F> TileTransform for TensorTransform<F>
where
    F: Fn(Array3<f32>) -> Result<Array3<f32>> + Sync,
{
    fn apply(&self, block: RgbImage) -> Result<RgbImage> {
        let output = (self.model)(block_to_tensor(&block))?;
        tensor_to_block(&output)
    }
}

/// Apply `transform` to every tile using `workers` interleaved chunks
///
/// The returned tiles are grouped by chunk; within a chunk they keep their
/// input order.
///
/// # Errors
///
/// Returns `InvalidParameter` if `workers` is zero, or the first error
/// produced by `transform`
pub fn process_parallel<T>(tiles: Vec<Tile>, workers: usize, transform: &T) -> Result<Vec<Tile>>
where
    T: TileTransform + ?Sized,
{
    process_parallel_with(tiles, workers, transform, &|_: usize| {})
}

/// Like [`process_parallel`], calling `on_tile(worker)` after each tile
///
/// # Errors
///
/// Same conditions as [`process_parallel`]
pub fn process_parallel_with<T>(
    tiles: Vec<Tile>,
    workers: usize,
    transform: &T,
    on_tile: &(dyn Fn(usize) + Sync),
) -> Result<Vec<Tile>>
where
    T: TileTransform + ?Sized,
{
    let total = tiles.len();
    let chunks = distribute(tiles, workers)?;
    log::debug!("processing {total} tiles across {workers} workers");

    let processed: Vec<Vec<Tile>> = chunks
        .into_par_iter()
        .enumerate()
        .map(|(worker, chunk)| {
            chunk
                .into_iter()
                .map(|tile| {
                    let result = tile.try_map_block(|block| transform.apply(block));
                    on_tile(worker);
                    result
                })
                .collect::<Result<Vec<Tile>>>()
        })
        .collect::<Result<_>>()?;

    Ok(processed.into_iter().flatten().collect())
}
