//! Cell addressing
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A rectangular range of cells (e.g., "A1:C5")
//! - [`RangeName`] - A range qualified by sheet name (e.g., "Sheet1!A1:C5")

mod address;
mod reference;

pub use address::{
    column_to_letters, coordinate_to_label, label_to_coordinate, letters_to_column, CellAddress,
    CellRange, CellRangeIterator, GridIndices,
};
pub use reference::RangeName;
