//! rastra-core - Core containers for rastra
//!
//! This crate provides the data structures shared by the rastra
//! workspace:
//!
//! - **[`Matrix`]** - dense, row-major 2D container for masks and labels
//! - **[`Point`]** - integer pixel coordinate
//! - **[`Rect`]** - axis-aligned bounding rectangle
//! - **[`Error`]** - unified core error type
//!
//! # Examples
//!
//! ```
//! use rastra_core::{Matrix, Point, Rect};
//!
//! let mut mask = Matrix::<u8>::new(8, 8);
//! mask.set(3, 4, 1).unwrap();
//!
//! let bounds = Rect::from_corners(3, 4, 3, 4);
//! assert!(bounds.contains(Point::new(3, 4)));
//! ```

pub mod error;
pub mod matrix;
pub mod point;
pub mod rect;

pub use error::{Error, Result};
pub use matrix::Matrix;
pub use point::Point;
pub use rect::Rect;
