//! Reassembly of processed tiles into one image
//!
//! Every block is first resampled back to `tile_size + 2 * overlap` so that
//! models which change resolution are tolerated, then the halo is cropped away
//! and the remaining `tile_size` square is pasted at the tile's grid offset.
//! Placement depends only on `(row, col)`, never on arrival order.

use image::RgbImage;
use image::imageops;

use crate::io::error::{Result, empty_input, ensure_tile_size};
use crate::spatial::grid::{GridShape, TileCoverage, block_size};
use crate::spatial::tiles::{Tile, resize_exact};

/// Stitching parameters, optionally with a declared grid shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stitcher {
    tile_size: u32,
    overlap: u32,
    block_size: u32,
    shape: Option<GridShape>,
}

impl Stitcher {
    /// Create a stitcher that infers the grid from the tiles it is given
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `tile_size` is zero or
    /// `tile_size + 2 * overlap` overflows
    pub fn new(tile_size: u32, overlap: u32) -> Result<Self> {
        ensure_tile_size(tile_size)?;
        Ok(Self {
            tile_size,
            overlap,
            block_size: block_size(tile_size, overlap)?,
            shape: None,
        })
    }

    /// Use a declared grid instead of inferring one
    ///
    /// Lets trailing rows or columns that never came back still occupy
    /// canvas space.
    #[must_use]
    pub const fn with_shape(mut self, shape: GridShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Nominal tile edge in pixels
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Halo width in pixels
    pub const fn overlap(&self) -> u32 {
        self.overlap
    }

    /// Edge every block is resampled to before cropping
    pub const fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Open an empty canvas for `shape`
    pub fn canvas(&self, shape: GridShape) -> StitchCanvas {
        StitchCanvas::new(*self, shape)
    }

    /// Stitch `tiles` into one image
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` if `tiles` is empty, or `InvalidParameter` when a
    /// tile lies outside the declared shape
    pub fn stitch(&self, tiles: &[Tile]) -> Result<RgbImage> {
        if tiles.is_empty() {
            return Err(empty_input("stitch"));
        }

        let shape = match self.shape {
            Some(shape) => shape,
            None => GridShape::from_tiles(tiles)?,
        };

        let mut canvas = self.canvas(shape);
        for tile in tiles {
            canvas.place(tile)?;
        }
        Ok(canvas.finish())
    }

    /// Resample a block to the expected size and cut off its halo
    pub fn trim(&self, block: &RgbImage) -> RgbImage {
        let size = self.block_size();
        let normalized = resize_exact(block, size, size);
        imageops::crop_imm(
            &normalized,
            self.overlap,
            self.overlap,
            self.tile_size,
            self.tile_size,
        )
        .to_image()
    }
}

/// A canvas that accepts tiles one at a time, in any order
#[derive(Debug, Clone)]
pub struct StitchCanvas {
    stitcher: Stitcher,
    image: RgbImage,
    coverage: TileCoverage,
}

impl StitchCanvas {
    /// Allocate a black canvas sized for `shape`
    pub fn new(stitcher: Stitcher, shape: GridShape) -> Self {
        let (width, height) = shape.canvas_size(stitcher.tile_size);
        Self {
            stitcher,
            image: RgbImage::new(width, height),
            coverage: TileCoverage::new(shape),
        }
    }

    /// Paste the trimmed block of `tile` at its grid position
    ///
    /// A position placed twice keeps the later tile.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the tile lies outside the canvas grid
    pub fn place(&mut self, tile: &Tile) -> Result<()> {
        let replaced = self.coverage.mark(tile.row, tile.col)?;
        if replaced {
            log::debug!(
                "tile ({}, {}) placed twice, keeping the latest",
                tile.row,
                tile.col
            );
        }

        let trimmed = self.stitcher.trim(&tile.block);
        let (x, y) = tile.origin(self.stitcher.tile_size);
        imageops::replace(&mut self.image, &trimmed, i64::from(x), i64::from(y));
        Ok(())
    }

    /// Positions that have not received a tile yet
    pub fn missing(&self) -> Vec<(u32, u32)> {
        self.coverage.missing()
    }

    /// Whether every position has received a tile
    pub fn is_complete(&self) -> bool {
        self.coverage.is_complete()
    }

    /// Grid this canvas covers
    pub const fn shape(&self) -> GridShape {
        self.coverage.shape()
    }

    /// Return the stitched image, leaving gaps black
    pub fn finish(self) -> RgbImage {
        if !self.coverage.is_complete() {
            let shape = self.coverage.shape();
            log::warn!(
                "stitched {} of {} tiles; {} positions left as background",
                self.coverage.filled_count(),
                shape.len(),
                shape.len() - self.coverage.filled_count(),
            );
        }
        self.image
    }
}

/// Stitch `tiles` on a grid inferred from their indices
///
/// # Errors
///
/// Returns `InvalidParameter` if `tile_size` is zero or the block size
/// overflows, or `EmptyInput` if `tiles` is empty
pub fn stitch(tiles: &[Tile], tile_size: u32, overlap: u32) -> Result<RgbImage> {
    Stitcher::new(tile_size, overlap)?.stitch(tiles)
}

