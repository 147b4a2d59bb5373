//! Image file I/O and the tile file naming scheme
//!
//! Tiles are written as `<stem>_r<row>_c<col>.<ext>` so a directory of
//! processed tiles carries its own grid positions and can be stitched without
//! any side channel.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::io::configuration::{EXCLUDED_MODALITIES, IMAGE_EXTENSIONS};
use crate::io::error::{Result, TilingError, WithPath, invalid_parameter};
use crate::spatial::tiles::Tile;

/// Whether `file_name` is an image worth processing
///
/// The extension must be one of the accepted image extensions and the last
/// `_`-separated part of the stem must not name a derived modality such as
/// `Seg` or `DAPI`.
pub fn allowed_file(file_name: &str) -> bool {
    let path = Path::new(file_name);
    let extension_ok = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext));

    let image_type = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.rsplit('_').next())
        .unwrap_or_default();

    extension_ok && !EXCLUDED_MODALITIES.contains(&image_type)
}

/// File name under which `tile` is stored
pub fn tile_file_name(stem: &str, tile: &Tile, extension: &str) -> String {
    format!("{stem}_r{}_c{}.{extension}", tile.row, tile.col)
}

/// Source stem and grid position encoded in a tile file name
///
/// `split_tile_file_name("slide_r2_c5.png")` yields `("slide", 2, 5)`.
pub fn split_tile_file_name(file_name: &str) -> Option<(&str, u32, u32)> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    let mut parts = stem.rsplitn(3, '_');
    let col = parts.next()?.strip_prefix('c')?.parse().ok()?;
    let row = parts.next()?.strip_prefix('r')?.parse().ok()?;
    // A stem in front of the indices is required
    let source = parts.next().filter(|prefix| !prefix.is_empty())?;
    Some((source, row, col))
}

/// Grid position encoded in a tile file name, if it follows the scheme
pub fn parse_tile_file_name(file_name: &str) -> Option<(u32, u32)> {
    split_tile_file_name(file_name).map(|(_, row, col)| (row, col))
}

/// Grid position of the tile stored at `path`
///
/// # Errors
///
/// Returns `InvalidTileName` if the file name doesn't follow the scheme
pub fn tile_position(path: &Path) -> Result<(u32, u32)> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_tile_file_name(&name).ok_or(TilingError::InvalidTileName { name })
}

/// Load an image from disk as 8-bit RGB
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).map_err(|e| TilingError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(image.to_rgb8())
}

/// Save an image, creating missing parent directories
///
/// # Errors
///
/// Returns `FileSystem` if a directory cannot be created or `ImageExport`
/// if encoding or writing fails
pub fn save_image(image: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| TilingError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    image.save(path).map_err(|e| TilingError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write `tile` into `dir` and return the path written
///
/// # Errors
///
/// Same conditions as [`save_image`]
pub fn save_tile(tile: &Tile, dir: &Path, stem: &str, extension: &str) -> Result<PathBuf> {
    let path = dir.join(tile_file_name(stem, tile, extension));
    save_image(&tile.block, &path)?;
    Ok(path)
}

/// Load the tile stored at `path`, taking its position from the file name
///
/// # Errors
///
/// Returns `InvalidTileName` for a name outside the scheme or `ImageLoad`
/// if decoding fails
pub fn load_tile(path: &Path) -> Result<Tile> {
    let (row, col) = tile_position(path)?;
    Ok(Tile::new(row, col, load_rgb(path)?))
}

/// Tile files in `dir`, sorted by name
///
/// Files that are not accepted images or don't follow the tile naming
/// scheme are skipped. All tiles must come from the same source stem.
///
/// # Errors
///
/// Returns `FileSystem` if the directory cannot be read, or
/// `InvalidParameter` if it holds tiles of more than one source image
pub fn list_tile_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stems = BTreeSet::new();
    for entry in std::fs::read_dir(dir).with_path(dir)? {
        let path = entry.with_path(dir)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        match split_tile_file_name(name).filter(|_| allowed_file(name)) {
            Some((stem, _, _)) => {
                stems.insert(stem.to_string());
                files.push(path);
            }
            None => log::debug!("skipping non-tile file {}", path.display()),
        }
    }

    if stems.len() > 1 {
        let found = stems.into_iter().collect::<Vec<_>>().join(", ");
        return Err(invalid_parameter(
            "dir",
            &dir.display(),
            &format!("holds tiles of several images ({found})"),
        ));
    }

    files.sort();
    Ok(files)
}
