//! Indexed access to tile collections
//!
//! A dataset exposes `len` and `get(index)`. The concrete source is picked by
//! configuration through [`DatasetSource`] rather than by subtyping.

use std::path::PathBuf;

use image::RgbImage;

use crate::io::error::{Result, invalid_parameter};
use crate::spatial::tiles::Tile;

/// Tiles of a single in-memory image
pub mod grid;
/// Tile files in a directory
pub mod folder;

pub use folder::TileFolderDataset;
pub use grid::TileGridDataset;

/// Random-access collection of samples
pub trait Dataset {
    /// Sample type
    type Item;

    /// Number of samples
    fn len(&self) -> usize;

    /// Sample at `index`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an index past the end, or any error
    /// raised while producing the sample
    fn get(&self, index: usize) -> Result<Self::Item>;

    /// Whether the dataset has no samples
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which kind of dataset to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DatasetMode {
    /// Tiles generated from one source image
    Grid,
    /// Tile files previously written to a directory
    Folder,
}

/// Configuration for [`open_dataset`]
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// Tile an in-memory image
    Grid {
        /// Source image
        image: RgbImage,
        /// Nominal tile edge in pixels
        tile_size: u32,
        /// Halo width in pixels
        overlap: u32,
    },
    /// Read tiles from a directory
    Folder {
        /// Directory holding `<stem>_r<row>_c<col>.<ext>` files
        dir: PathBuf,
    },
}

impl DatasetSource {
    /// Mode this source corresponds to
    pub const fn mode(&self) -> DatasetMode {
        match self {
            Self::Grid { .. } => DatasetMode::Grid,
            Self::Folder { .. } => DatasetMode::Folder,
        }
    }
}

/// Open the dataset described by `source`
///
/// # Errors
///
/// Propagates construction errors of the selected dataset
pub fn open_dataset(source: &DatasetSource) -> Result<Box<dyn Dataset<Item = Tile>>> {
    match source {
        DatasetSource::Grid {
            image,
            tile_size,
            overlap,
        } => Ok(Box::new(TileGridDataset::new(image, *tile_size, *overlap)?)),
        DatasetSource::Folder { dir } => Ok(Box::new(TileFolderDataset::open(dir)?)),
    }
}

/// Collect every sample of `dataset` in index order
///
/// # Errors
///
/// Returns the first error raised by [`Dataset::get`]
pub fn collect_all<D>(dataset: &D) -> Result<Vec<D::Item>>
where
    D: Dataset + ?Sized,
{
    (0..dataset.len()).map(|index| dataset.get(index)).collect()
}

pub(crate) fn index_error(index: usize, len: usize) -> crate::io::error::TilingError {
    invalid_parameter(
        "index",
        &index,
        &format!("dataset holds {len} samples"),
    )
}
