//! # sheetwire-core
//!
//! Conversion between human-readable cell labels and zero-based grid
//! coordinates.
//!
//! Columns are written as bijective base-26 numerals (`A`..`Z`, then `AA`),
//! rows as 1-based decimal numbers. Everything here is a pure function of its
//! input and safe to call from any thread.
//!
//! - [`label_to_coordinate`] / [`coordinate_to_label`] - the two codec operations
//! - [`CellAddress`] and [`CellRange`] - typed addresses and ranges
//! - [`RangeName`] - `Sheet1!A1:C5` style references
//!
//! ## Example
//!
//! ```rust
//! use sheetwire_core::{coordinate_to_label, label_to_coordinate, CellRange};
//!
//! assert_eq!(label_to_coordinate("B12").unwrap(), (11, 1));
//! assert_eq!(coordinate_to_label(0, 26).unwrap(), "AA1");
//!
//! let range = CellRange::parse("A1:C5").unwrap();
//! assert_eq!(range.cell_count(), 15);
//! ```

pub mod cell;
pub mod error;

// Re-exports for convenience
pub use cell::{
    column_to_letters, coordinate_to_label, label_to_coordinate, letters_to_column, CellAddress,
    CellRange, GridIndices, RangeName,
};
pub use error::{Error, Result};
