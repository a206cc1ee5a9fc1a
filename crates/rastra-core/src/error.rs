//! Error types for rastra-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// rastra-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Data length does not match the requested dimensions
    #[error("invalid dimensions: {width}x{height} needs {expected} elements, got {actual}")]
    InvalidDimension {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Coordinate outside the matrix
    #[error("position out of bounds: ({x}, {y}) in {width}x{height}")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    /// Two containers were expected to have the same shape
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
