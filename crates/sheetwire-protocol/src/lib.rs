//! Wire types for the spreadsheet REST API.
//!
//! Every payload is JSON with camelCase keys. Optional fields are omitted
//! from the serialized form rather than sent as `null`, because the remote
//! service treats an explicit `null` differently from an absent key in
//! field-masked updates.

use serde::{Deserialize, Serialize};

mod format;
mod request;
mod resource;
mod values;

pub use format::{CellData, CellFormat, Color, NumberFormat, TextFormat};
pub use request::{
    AddSheetReply, AddSheetRequest, AppendDimensionRequest, BatchUpdateRequest,
    BatchUpdateResponse, DeleteSheetRequest, InsertDimensionRequest, Reply, RepeatCellRequest,
    Request, UpdateSheetPropertiesRequest, UpdateSpreadsheetPropertiesRequest,
};
pub use resource::{
    DimensionRange, GridProperties, GridRange, SheetDetails, SheetProperties, SpreadsheetDetails,
    SpreadsheetProperties,
};
pub use values::{
    BatchUpdateValuesRequest, BatchUpdateValuesResponse, UpdateValuesResponse, ValueRange,
};

/// Which dimension an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    #[default]
    Rows,
    Columns,
}

/// How written values are interpreted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    /// Stored as-is, never parsed.
    Raw,
    /// Parsed as if typed into the UI (formulas, dates, numbers).
    #[default]
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

/// Number format categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumberFormatType {
    Text,
    #[default]
    Number,
    Percent,
    Currency,
    Date,
    Time,
    DateTime,
    Scientific,
}

/// A single cell value as carried in a [`ValueRange`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::String(s) => write!(f, "{s}"),
        }
    }
}

/// Error body returned by the service on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorStatus {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
