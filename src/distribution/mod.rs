//! Fan-out of tiles to independent workers

/// Interleaved partitioning of ordered sequences
pub mod chunks;
/// Parallel per-tile processing
pub mod fanout;

pub use chunks::{chunker, distribute};
pub use fanout::{Identity, TensorTransform, TileTransform, process_parallel, process_parallel_with};
