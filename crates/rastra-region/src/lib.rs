//! rastra-region - Connected-component relabeling
//!
//! This crate takes a mask (labeled or not) and reassigns labels so that
//! every connected region gets its own final label:
//!
//! - **Relabeling** - single-raster-pass labeling with union-find
//!   equivalence resolution, 4- or 8-neighborhood
//! - **Size filtering** - fold small objects into the background and/or
//!   sort labels by descending area
//! - **Partial labeling** - expose the pre-resolution state so callers
//!   can fuse their own per-pixel computation into the finishing pass
//! - **Area description** - per-object pixel count, bounding box and
//!   centroid in one fused pass
//!
//! Final labels are contiguous integers starting at 1; label 0 is always
//! the background (every pixel outside the threshold interval).
//!
//! # Examples
//!
//! ## Relabeling a thresholded mask
//!
//! ```
//! use rastra_core::Matrix;
//! use rastra_region::{Connectivity, RelabelOptions, relabel_with_sizes};
//!
//! let mut mask = Matrix::<u8>::new(5, 5);
//! mask.set(2, 2, 1).unwrap();
//!
//! let opts = RelabelOptions::new()
//!     .with_assume_labeled(false)
//!     .with_connectivity(Connectivity::EightWay);
//!
//! let (labels, sizes) = relabel_with_sizes::<u8, i32>(&mask, &opts).unwrap();
//! assert_eq!(labels[(2, 2)], 1);
//! assert_eq!(sizes, vec![24, 1]); // background, object 1
//! ```
//!
//! ## Keeping only large objects
//!
//! ```
//! use rastra_core::Matrix;
//! use rastra_region::{RelabelOptions, relabel_with_count};
//!
//! #[rustfmt::skip]
//! let mask = Matrix::from_vec(4, 2, vec![
//!     1u8, 1, 0, 1,
//!     1,   1, 0, 0,
//! ]).unwrap();
//!
//! let opts = RelabelOptions::new()
//!     .with_assume_labeled(false)
//!     .with_min_object_size(2);
//!
//! let (labels, num) = relabel_with_count::<u8, i32>(&mask, &opts).unwrap();
//! assert_eq!(num, 1);
//! assert_eq!(labels[(3, 0)], 0); // too small, now background
//! ```

pub mod areadesc;
mod equiv;
pub mod error;
mod filter;
pub mod relabel;
pub mod scan;

// Re-export core types
pub use rastra_core;

// Re-export error types
pub use error::{RegionError, RegionResult};

// Re-export scan types
pub use scan::{Connectivity, LabelValue, MaskValue, PartialLabeling};

// Re-export relabel types and functions
pub use relabel::{
    LabeledObjects, RelabelOptions, partial, relabel, relabel_with_count, relabel_with_objects,
    relabel_with_sizes,
};

// Re-export areadesc types and functions
pub use areadesc::{AreaDescOptions, AreaDescriptor, describe_regions, describe_regions_with_mask};
