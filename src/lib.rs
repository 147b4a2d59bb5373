//! Overlapping tile generation and seamless stitching for patch-wise inference
//!
//! A large image is stretched to a whole number of tiles, bordered, and sliced
//! into overlapping blocks tagged with their grid position. Blocks can be
//! fanned out to independent workers, transformed by a model, and stitched
//! back into one image by dropping the overlap halo.

#![forbid(unsafe_code)]

/// Indexed access to tile collections
pub mod dataset;
/// Chunked fan-out of tiles to parallel workers
pub mod distribution;
/// Input/output operations, configuration and error handling
pub mod io;
/// Rounding, fidelity metrics and tensor conversion
pub mod math;
/// Size normalization, tiling, grid addressing and stitching
pub mod spatial;

pub use io::error::{Result, TilingError};
pub use spatial::{GridShape, Stitcher, Tile, TileGrid, generate_tiles, stitch};
