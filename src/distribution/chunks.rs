//! Interleaved partitioning of ordered sequences
//!
//! Element `k` goes to chunk `k mod size`, so chunk lengths differ by at most
//! one and each chunk keeps the relative order of its elements.

use crate::io::error::{Result, invalid_parameter};

fn ensure_chunk_count(size: usize) -> Result<()> {
    if size == 0 {
        return Err(invalid_parameter("size", &size, &"must be positive"));
    }
    Ok(())
}

/// Move the elements of `items` into `size` interleaved chunks
///
/// Always returns exactly `size` chunks; when there are fewer elements than
/// chunks the trailing chunks are empty.
///
/// # Errors
///
/// Returns `InvalidParameter` if `size` is zero
pub fn distribute<T, I>(items: I, size: usize) -> Result<Vec<Vec<T>>>
where
    I: IntoIterator<Item = T>,
{
    ensure_chunk_count(size)?;

    let mut chunks: Vec<Vec<T>> = (0..size).map(|_| Vec::new()).collect();
    for (index, item) in items.into_iter().enumerate() {
        if let Some(chunk) = chunks.get_mut(index % size) {
            chunk.push(item);
        }
    }
    Ok(chunks)
}

/// Copy the elements of `items` into `size` interleaved chunks
///
/// `chunker(&[10, 11, 12, 13, 14], 3)` yields `[[10, 13], [11, 14], [12]]`.
///
/// # Errors
///
/// Returns `InvalidParameter` if `size` is zero
pub fn chunker<T: Clone>(items: &[T], size: usize) -> Result<Vec<Vec<T>>> {
    distribute(items.iter().cloned(), size)
}
