//! Object-style client for a remote spreadsheet REST API.
//!
//! A [`Client`] wraps any [`SheetsService`] and hands out [`Spreadsheet`] and
//! [`Sheet`] handles. Handles hold a snapshot of the remote document and
//! re-fetch it after every change they make.
//!
//! Cell labels (`"B12"`) and zero-based coordinates (`(11, 1)`) are converted
//! by [`sheetwire_core`], re-exported here as [`label_to_coordinate`] and
//! [`coordinate_to_label`].
//!
//! # Services
//!
//! - [`MemoryService`] keeps documents in memory. Useful offline and in tests.
//! - `HttpService` (feature `http`) talks to the real REST endpoint.
//!
//! # Example
//!
//! ```rust
//! use sheetwire::{CellValue, Client, Dimension, MemoryService, ValueInputOption};
//!
//! fn main() -> sheetwire::Result<()> {
//!     let service = MemoryService::new();
//!     service.create_spreadsheet("doc", "Budget");
//!
//!     let client = Client::new(service);
//!     let mut spreadsheet = client.open("doc")?;
//!     let mut sheet = spreadsheet.add_sheet("Q1", 100, 10)?;
//!     sheet.update_values(
//!         "A1",
//!         Some("B1"),
//!         vec![vec![CellValue::from("total"), CellValue::from(42)]],
//!         ValueInputOption::Raw,
//!         Dimension::Rows,
//!     )?;
//!
//!     assert_eq!(sheet.get_addr_int(0, 1)?, "B1");
//!     Ok(())
//! }
//! ```

mod client;
mod error;
#[cfg(feature = "http")]
mod http;
mod memory;
mod service;
mod sheet;
mod spreadsheet;

pub use client::Client;
pub use error::{Error, Result};
#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpService};
pub use memory::MemoryService;
pub use service::{ServiceError, SheetsService};
pub use sheet::{GridBounds, Sheet};
pub use spreadsheet::{SheetLookup, Spreadsheet, DEFAULT_COL_COUNT, DEFAULT_ROW_COUNT};

pub use sheetwire_core::Error as CellError;
pub use sheetwire_core::{
    coordinate_to_label, label_to_coordinate, CellAddress, CellRange, GridIndices, RangeName,
};
pub use sheetwire_protocol::{
    CellFormat, CellValue, Color, Dimension, NumberFormat, NumberFormatType, Request, TextFormat,
    ValueInputOption, ValueRange,
};
