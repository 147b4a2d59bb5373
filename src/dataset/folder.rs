//! Tile files previously written to a directory

use std::path::{Path, PathBuf};

use crate::dataset::{Dataset, index_error};
use crate::io::error::Result;
use crate::io::image::{list_tile_files, load_tile};
use crate::spatial::tiles::Tile;

/// Dataset over `<stem>_r<row>_c<col>.<ext>` files, sorted by name
///
/// Files are decoded lazily on [`Dataset::get`].
#[derive(Debug, Clone)]
pub struct TileFolderDataset {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl TileFolderDataset {
    /// Scan `dir` for tile files
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if the directory cannot be read
    pub fn open(dir: &Path) -> Result<Self> {
        let files = list_tile_files(dir)?;
        log::debug!("found {} tile files in {}", files.len(), dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
            files,
        })
    }

    /// Directory that was scanned
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Tile file paths in index order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl Dataset for TileFolderDataset {
    type Item = Tile;

    fn len(&self) -> usize {
        self.files.len()
    }

    fn get(&self, index: usize) -> Result<Tile> {
        let path = self
            .files
            .get(index)
            .ok_or_else(|| index_error(index, self.len()))?;
        load_tile(path)
    }
}
