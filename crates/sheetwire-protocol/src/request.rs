//! `spreadsheets:batchUpdate` requests and replies.

use serde::{Deserialize, Serialize};

use crate::format::CellData;
use crate::resource::{DimensionRange, GridRange, SheetProperties, SpreadsheetProperties};
use crate::Dimension;

/// One structural update. Serialized as a single-key object, e.g.
/// `{"deleteSheet": {"sheetId": 3}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    AddSheet(AddSheetRequest),
    DeleteSheet(DeleteSheetRequest),
    UpdateSpreadsheetProperties(UpdateSpreadsheetPropertiesRequest),
    UpdateSheetProperties(UpdateSheetPropertiesRequest),
    AppendDimension(AppendDimensionRequest),
    InsertDimension(InsertDimensionRequest),
    RepeatCell(RepeatCellRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSheetRequest {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSheetRequest {
    pub sheet_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpreadsheetPropertiesRequest {
    pub properties: SpreadsheetProperties,
    /// Comma-separated field mask, relative to `properties`.
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSheetPropertiesRequest {
    pub properties: SheetProperties,
    /// Comma-separated field mask, relative to `properties`.
    pub fields: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendDimensionRequest {
    pub sheet_id: i64,
    pub dimension: Dimension,
    pub length: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertDimensionRequest {
    pub range: DimensionRange,
    pub inherit_from_before: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatCellRequest {
    pub range: GridRange,
    pub cell: CellData,
    /// Comma-separated field mask, relative to `cell`.
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateRequest {
    pub requests: Vec<Request>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    #[serde(default)]
    pub spreadsheet_id: String,
    /// One reply per request, in request order. Requests without a reply
    /// body produce an empty object.
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_sheet: Option<AddSheetReply>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSheetReply {
    pub properties: SheetProperties,
}
