//! Tiles of one in-memory image, indexed column-major

use image::RgbImage;

use crate::dataset::{Dataset, index_error};
use crate::io::error::Result;
use crate::spatial::tiles::{Tile, TileGrid};

/// Dataset view over a [`TileGrid`]
///
/// Index `k` is the `k`-th tile in generation order: all rows of column 0,
/// then column 1, and so on.
#[derive(Debug, Clone)]
pub struct TileGridDataset {
    grid: TileGrid,
}

impl TileGridDataset {
    /// Prepare `image` for tiling
    ///
    /// # Errors
    ///
    /// Same conditions as [`TileGrid::new`]
    pub fn new(image: &RgbImage, tile_size: u32, overlap: u32) -> Result<Self> {
        Ok(Self {
            grid: TileGrid::new(image, tile_size, overlap)?,
        })
    }

    /// Underlying tile grid
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }
}

impl Dataset for TileGridDataset {
    type Item = Tile;

    fn len(&self) -> usize {
        self.grid.len()
    }

    fn get(&self, index: usize) -> Result<Tile> {
        self.grid
            .shape()
            .position_of(index)
            .and_then(|(row, col)| self.grid.tile(row, col))
            .ok_or_else(|| index_error(index, self.len()))
    }
}
