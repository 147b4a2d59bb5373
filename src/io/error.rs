//! Error types and path context for tiling and stitching operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all tiling, stitching and distribution operations
#[derive(Debug)]
pub enum TilingError {
    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Argument validation failed
    ///
    /// Covers a zero tile size, a zero-area source image, a zero chunk count,
    /// out-of-range dataset indices and tiles outside a declared grid.
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// An operation that needs at least one element received none
    EmptyInput {
        /// Operation that was given nothing to work on
        operation: &'static str,
    },

    /// A file in a tile directory does not follow the tile naming scheme
    InvalidTileName {
        /// Offending file name
        name: String,
    },

    /// Numerical conversion produced an unusable result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for TilingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::EmptyInput { operation } => {
                write!(f, "Empty input: {operation} requires at least one element")
            }
            Self::InvalidTileName { name } => {
                write!(
                    f,
                    "File '{name}' is not a tile name of the form <stem>_r<row>_c<col>.<ext>"
                )
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for TilingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for tiling results
pub type Result<T> = std::result::Result<T, TilingError>;

const UNKNOWN_PATH: &str = "<unknown>";

/// Attaches the file path an I/O failure happened on
///
/// Conversions from `image::ImageError` and `std::io::Error` don't know which
/// file was involved; this fills the placeholder path in after the fact.
pub trait WithPath<T> {
    /// Replace an unknown path in the error with `path`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path applied
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T, E> WithPath<T> for std::result::Result<T, E>
where
    E: Into<TilingError>,
{
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            match &mut error {
                TilingError::ImageLoad { path: slot, .. }
                | TilingError::ImageExport { path: slot, .. }
                | TilingError::FileSystem { path: slot, .. }
                    if slot.as_os_str() == UNKNOWN_PATH =>
                {
                    *slot = path.to_path_buf();
                }
                _ => {}
            }
            error
        })
    }
}

impl From<image::ImageError> for TilingError {
    fn from(err: image::ImageError) -> Self {
        let path = PathBuf::from(UNKNOWN_PATH);
        match err {
            image::ImageError::Encoding(_) => Self::ImageExport { path, source: err },
            _ => Self::ImageLoad { path, source: err },
        }
    }
}

impl From<std::io::Error> for TilingError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from(UNKNOWN_PATH),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> TilingError {
    TilingError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an empty input error
pub const fn empty_input(operation: &'static str) -> TilingError {
    TilingError::EmptyInput { operation }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> TilingError {
    TilingError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Reject a zero tile size
///
/// # Errors
///
/// Returns `InvalidParameter` when `tile_size` is zero
pub fn ensure_tile_size(tile_size: u32) -> Result<()> {
    if tile_size == 0 {
        return Err(invalid_parameter(
            "tile_size",
            &tile_size,
            &"must be positive",
        ));
    }
    Ok(())
}
