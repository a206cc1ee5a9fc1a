//! rastra - Connected-component analysis toolkit
//!
//! rastra relabels masks so that every connected region gets its own
//! contiguous label, with optional area-based filtering, sorting and
//! region description:
//!
//! - Core containers (`Matrix`, `Point`, `Rect`)
//! - Relabeling with 4- or 8-neighborhood connectivity
//! - Labeled-mask and thresholded-mask interpretation
//! - Object size filtering and area-sorted labels
//! - Per-object areas, point lists, bounding boxes and centroids
//!
//! # Example
//!
//! ```
//! use rastra::{Matrix, region};
//!
//! #[rustfmt::skip]
//! let mask = Matrix::from_vec(4, 2, vec![
//!     1u8, 0, 0, 1,
//!     1,   0, 0, 1,
//! ]).unwrap();
//!
//! let opts = region::RelabelOptions::new().with_assume_labeled(false);
//! let (labels, num) = region::relabel_with_count::<u8, i32>(&mask, &opts).unwrap();
//! assert_eq!(num, 2);
//! assert_eq!(labels[(0, 0)], 1);
//! assert_eq!(labels[(3, 1)], 2);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use rastra_core::*;

// Re-export the relabeling engine as a module
pub use rastra_region as region;
