//! `spreadsheets.values` payloads.

use serde::{Deserialize, Serialize};

use crate::{CellValue, Dimension, ValueInputOption};

/// Values for a block of cells addressed in A1 notation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    /// e.g. `Sheet1!A1:C5`
    pub range: String,
    #[serde(default)]
    pub major_dimension: Dimension,
    #[serde(default)]
    pub values: Vec<Vec<CellValue>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateValuesRequest {
    pub value_input_option: ValueInputOption,
    pub data: Vec<ValueRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default)]
    pub updated_range: String,
    #[serde(default)]
    pub updated_rows: u64,
    #[serde(default)]
    pub updated_columns: u64,
    #[serde(default)]
    pub updated_cells: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateValuesResponse {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default)]
    pub total_updated_rows: u64,
    #[serde(default)]
    pub total_updated_columns: u64,
    #[serde(default)]
    pub total_updated_cells: u64,
    #[serde(default)]
    pub total_updated_sheets: u64,
    #[serde(default)]
    pub responses: Vec<UpdateValuesResponse>,
}
