//! Spatial data structures for tiling and stitching
//!
//! This module contains:
//! - Size normalization to whole tiles
//! - Grid addressing and coverage tracking
//! - Overlapping tile generation
//! - Stitching of processed tiles
//! - Model-facing resizing helpers

/// Grid shape, tile offsets and coverage tracking
pub mod grid;
/// Resizing applied before model inference
pub mod preprocess;
/// Normalized tiling size
pub mod size;
/// Reassembly of tiles into one image
pub mod stitch;
/// Tile records and overlapping tile generation
pub mod tiles;

pub use grid::GridShape;
pub use stitch::{Stitcher, stitch};
pub use tiles::{Tile, TileGrid, generate_tiles};
