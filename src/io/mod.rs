//! Input/output, configuration and error handling

/// Command-line interface
pub mod cli;
/// Defaults and fixed conventions
pub mod configuration;
/// Error types
pub mod error;
/// Image files and tile naming
pub mod image;
/// Progress display
pub mod progress;
