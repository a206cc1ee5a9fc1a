//! Error types for rastra-region

use thiserror::Error;

/// Errors that can occur during relabeling operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] rastra_core::Error),

    /// The label type cannot represent all provisional labels.
    ///
    /// `capacity` is the number of usable label slots (the background
    /// sentinel occupies the slot past the last usable one); `needed` is
    /// the number of provisional labels the scan tried to assign.
    #[error("label space exhausted: {needed} provisional labels, capacity {capacity}")]
    LabelOverflow { needed: usize, capacity: usize },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
