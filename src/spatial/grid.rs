//! Grid addressing shared by the tiler and the stitcher
//!
//! The grid has no stored representation. Tiles sit at pixel offset
//! `(col * tile_size, row * tile_size)` and a grid is either declared up front
//! or inferred from the largest row and column among the tiles at hand.

use bitvec::vec::BitVec;

use crate::io::error::{Result, empty_input, invalid_parameter};
use crate::spatial::tiles::Tile;

/// Number of rows and columns of a tile grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridShape {
    /// Number of tile rows
    pub rows: u32,
    /// Number of tile columns
    pub cols: u32,
}

impl GridShape {
    /// Create a shape with the given row and column counts
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Infer the shape from the largest indices present
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` if `tiles` is empty, or `InvalidParameter` if an
    /// index is too large for the grid to hold it
    pub fn from_tiles(tiles: &[Tile]) -> Result<Self> {
        let max_row = tiles.iter().map(|t| t.row).max();
        let max_col = tiles.iter().map(|t| t.col).max();

        let (Some(row), Some(col)) = (max_row, max_col) else {
            return Err(empty_input("grid shape inference"));
        };

        let rows = row
            .checked_add(1)
            .ok_or_else(|| invalid_parameter("row", &row, &"grid row index overflows"))?;
        let cols = col
            .checked_add(1)
            .ok_or_else(|| invalid_parameter("col", &col, &"grid column index overflows"))?;
        Ok(Self::new(rows, cols))
    }

    /// Total number of positions in the grid
    pub const fn len(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Whether the grid has no positions
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Whether `(row, col)` lies inside the grid
    pub const fn contains(&self, row: u32, col: u32) -> bool {
        row < self.rows && col < self.cols
    }

    /// Pixel size `(width, height)` of the stitched canvas
    pub const fn canvas_size(&self, tile_size: u32) -> (u32, u32) {
        (
            self.cols.saturating_mul(tile_size),
            self.rows.saturating_mul(tile_size),
        )
    }

    /// Column-major index of `(row, col)`, the order tiles are generated in
    pub const fn index_of(&self, row: u32, col: u32) -> Option<usize> {
        if self.contains(row, col) {
            Some(col as usize * self.rows as usize + row as usize)
        } else {
            None
        }
    }

    /// Inverse of [`Self::index_of`]
    pub const fn position_of(&self, index: usize) -> Option<(u32, u32)> {
        if self.rows == 0 || index >= self.len() {
            return None;
        }
        let rows = self.rows as usize;
        Some(((index % rows) as u32, (index / rows) as u32))
    }
}

/// Top-left pixel of the nominal area of tile `(row, col)`
pub const fn tile_origin(row: u32, col: u32, tile_size: u32) -> (u32, u32) {
    (col.saturating_mul(tile_size), row.saturating_mul(tile_size))
}

/// Edge of a tile block, `tile_size + 2 * overlap`
///
/// # Errors
///
/// Returns `InvalidParameter` if the block edge doesn't fit in `u32`
pub fn block_size(tile_size: u32, overlap: u32) -> Result<u32> {
    overlap
        .checked_mul(2)
        .and_then(|halo| halo.checked_add(tile_size))
        .ok_or_else(|| {
            invalid_parameter(
                "overlap_size",
                &overlap,
                &format!("block of a {tile_size}px tile with this overlap overflows"),
            )
        })
}

/// Tracks which grid positions have been filled
#[derive(Debug, Clone)]
pub struct TileCoverage {
    shape: GridShape,
    filled: BitVec,
}

impl TileCoverage {
    /// Start with every position of `shape` unfilled
    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            filled: BitVec::repeat(false, shape.len()),
        }
    }

    /// Mark `(row, col)` as filled, returning whether it had been filled before
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the position is outside the grid
    pub fn mark(&mut self, row: u32, col: u32) -> Result<bool> {
        let index = self.shape.index_of(row, col).ok_or_else(|| {
            invalid_parameter(
                "tile",
                &format!("({row}, {col})"),
                &format!(
                    "outside the {}x{} grid",
                    self.shape.rows, self.shape.cols
                ),
            )
        })?;

        let previous = self.filled.get(index).is_some_and(|bit| *bit);
        self.filled.set(index, true);
        Ok(previous)
    }

    /// Whether `(row, col)` has been filled
    pub fn is_filled(&self, row: u32, col: u32) -> bool {
        self.shape
            .index_of(row, col)
            .and_then(|index| self.filled.get(index).map(|bit| *bit))
            .unwrap_or(false)
    }

    /// Number of filled positions
    pub fn filled_count(&self) -> usize {
        self.filled.count_ones()
    }

    /// Whether every position has been filled
    pub fn is_complete(&self) -> bool {
        self.filled.all()
    }

    /// Unfilled positions as `(row, col)` in column-major order
    pub fn missing(&self) -> Vec<(u32, u32)> {
        self.filled
            .iter_zeros()
            .filter_map(|index| self.shape.position_of(index))
            .collect()
    }

    /// Shape this coverage tracks
    pub const fn shape(&self) -> GridShape {
        self.shape
    }
}
