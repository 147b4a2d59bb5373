//! Numeric helpers shared by the tiling pipeline

/// Image comparison metrics
pub mod fidelity;
/// Integer rounding with ties to even
pub mod rounding;
/// Conversion between pixel blocks and model tensors
pub mod tensor;
