//! Overlapping tile generation from a single source image
//!
//! The source is stretched to a whole number of tiles, surrounded by a white
//! border as wide as the overlap, and sliced into square windows of
//! `tile_size + 2 * overlap` pixels whose nominal areas sit on a
//! `tile_size` grid. Row and column counts come from the bordered size, so a
//! large overlap can add a trailing row or column that mostly covers border.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::io::configuration::BORDER_FILL;
use crate::io::error::{Result, ensure_tile_size, invalid_parameter};
use crate::spatial::grid::{GridShape, block_size, tile_origin};
use crate::spatial::size::output_size;

/// Filter used for every resampling step of tiling and stitching
pub const RESAMPLE_FILTER: FilterType = FilterType::CatmullRom;

/// One unit of work: a pixel block tagged with its grid position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Grid row, counted from the top
    pub row: u32,
    /// Grid column, counted from the left
    pub col: u32,
    /// Tile pixels including the overlap halo
    pub block: RgbImage,
}

impl Tile {
    /// Create a tile at `(row, col)` owning `block`
    pub const fn new(row: u32, col: u32, block: RgbImage) -> Self {
        Self { row, col, block }
    }

    /// Grid position as `(row, col)`
    pub const fn position(&self) -> (u32, u32) {
        (self.row, self.col)
    }

    /// Top-left pixel `(x, y)` of the nominal area in the stitched image
    pub const fn origin(&self, tile_size: u32) -> (u32, u32) {
        tile_origin(self.row, self.col, tile_size)
    }

    /// Replace the block while keeping the grid position
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `f`
    pub fn try_map_block<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(RgbImage) -> Result<RgbImage>,
    {
        let Self { row, col, block } = self;
        Ok(Self::new(row, col, f(block)?))
    }
}

/// Resize `image` to `(width, height)` unless it already has that size
pub fn resize_exact(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        image.clone()
    } else {
        imageops::resize(image, width, height, RESAMPLE_FILTER)
    }
}

/// A source image prepared for slicing into overlapping tiles
///
/// Holds the resized, bordered image so tiles can be produced lazily and the
/// sequence restarted any number of times.
#[derive(Debug, Clone)]
pub struct TileGrid {
    bordered: RgbImage,
    tile_size: u32,
    overlap: u32,
    block_size: u32,
    shape: GridShape,
}

impl TileGrid {
    /// Normalize, border and index `image` for tiling
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `tile_size` is zero, the image has zero
    /// area, or the block or bordered size overflows
    pub fn new(image: &RgbImage, tile_size: u32, overlap: u32) -> Result<Self> {
        ensure_tile_size(tile_size)?;
        let block_size = block_size(tile_size, overlap)?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(invalid_parameter(
                "image",
                &format!("{width}x{height}"),
                &"source image has zero area",
            ));
        }

        let (target_width, target_height) = output_size(width, height, tile_size)?;
        let resized = resize_exact(image, target_width, target_height);
        let bordered = add_border(&resized, overlap)?;

        let shape = GridShape::new(
            bordered.height() / tile_size,
            bordered.width() / tile_size,
        );

        log::debug!(
            "tiling {width}x{height} -> {target_width}x{target_height} \
             (bordered {}x{}) into {}x{} tiles of {tile_size}px with {overlap}px overlap",
            bordered.width(),
            bordered.height(),
            shape.rows,
            shape.cols,
        );

        Ok(Self {
            bordered,
            tile_size,
            overlap,
            block_size,
            shape,
        })
    }

    /// Number of tile rows
    pub const fn rows(&self) -> u32 {
        self.shape.rows
    }

    /// Number of tile columns
    pub const fn cols(&self) -> u32 {
        self.shape.cols
    }

    /// Grid dimensions
    pub const fn shape(&self) -> GridShape {
        self.shape
    }

    /// Total number of tiles
    pub const fn len(&self) -> usize {
        self.shape.len()
    }

    /// Whether the grid produces no tiles
    pub const fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Nominal tile edge in pixels
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Halo width in pixels
    pub const fn overlap(&self) -> u32 {
        self.overlap
    }

    /// Edge length of every block, `tile_size + 2 * overlap`
    pub const fn block_size(&self) -> u32 {
        self.block_size
    }

    /// The resized and bordered image tiles are cut from
    pub const fn bordered(&self) -> &RgbImage {
        &self.bordered
    }

    /// Extract the tile at `(row, col)`, or `None` outside the grid
    ///
    /// Windows that reach past the bordered image are filled with black
    /// beyond its edge.
    pub fn tile(&self, row: u32, col: u32) -> Option<Tile> {
        if !self.shape.contains(row, col) {
            return None;
        }

        let (x, y) = tile_origin(row, col, self.tile_size);
        let size = self.block_size();
        let mut block = RgbImage::new(size, size);
        imageops::replace(&mut block, &self.bordered, -i64::from(x), -i64::from(y));

        Some(Tile::new(row, col, block))
    }

    /// Iterate over all tiles in column-major order
    pub const fn iter(&self) -> Tiles<'_> {
        Tiles {
            grid: self,
            next: 0,
        }
    }
}

impl<'a> IntoIterator for &'a TileGrid {
    type Item = Tile;
    type IntoIter = Tiles<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy, finite tile sequence: every row of column 0, then column 1, ...
#[derive(Debug, Clone)]
pub struct Tiles<'a> {
    grid: &'a TileGrid,
    next: usize,
}

impl Iterator for Tiles<'_> {
    type Item = Tile;

    fn next(&mut self) -> Option<Self::Item> {
        let (row, col) = self.grid.shape.position_of(self.next)?;
        self.next += 1;
        self.grid.tile(row, col)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tiles<'_> {}

/// Surround `image` with a white border `width` pixels wide on every side
///
/// # Errors
///
/// Returns `InvalidParameter` if the bordered size overflows `u32`
pub fn add_border(image: &RgbImage, width: u32) -> Result<RgbImage> {
    if width == 0 {
        return Ok(image.clone());
    }

    let padding = width
        .checked_mul(2)
        .ok_or_else(|| invalid_parameter("overlap_size", &width, &"border is too wide"))?;
    let (w, h) = image.dimensions();
    let (Some(bordered_w), Some(bordered_h)) = (w.checked_add(padding), h.checked_add(padding))
    else {
        return Err(invalid_parameter(
            "overlap_size",
            &width,
            &format!("bordered size of a {w}x{h} image overflows"),
        ));
    };

    let mut bordered = RgbImage::from_pixel(bordered_w, bordered_h, Rgb(BORDER_FILL));
    imageops::replace(&mut bordered, image, i64::from(width), i64::from(width));
    Ok(bordered)
}

/// Slice `image` into its full, column-major tile sequence
///
/// # Errors
///
/// Same conditions as [`TileGrid::new`]
pub fn generate_tiles(image: &RgbImage, tile_size: u32, overlap: u32) -> Result<Vec<Tile>> {
    Ok(TileGrid::new(image, tile_size, overlap)?.iter().collect())
}
