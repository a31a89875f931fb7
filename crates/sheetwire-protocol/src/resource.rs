//! Spreadsheet and sheet resources as returned by `GET /spreadsheets/{id}`.

use serde::{Deserialize, Serialize};

use crate::Dimension;

/// A spreadsheet document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetDetails {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub properties: SpreadsheetProperties,
    #[serde(default)]
    pub sheets: Vec<SheetDetails>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One tab of a spreadsheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDetails {
    #[serde(default)]
    pub properties: SheetProperties,
}

/// Sheet properties.
///
/// Also used as the payload of property updates, where only the fields
/// named in the accompanying field mask are applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_properties: Option<GridProperties>,
}

impl SheetProperties {
    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_count: Option<u32>,
}

/// A rectangle on a sheet. Indices are 0-based, ends exclusive; a missing
/// bound means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_row_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_row_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_column_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column_index: Option<u64>,
}

/// A span of rows or columns. 0-based, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionRange {
    pub sheet_id: i64,
    pub dimension: Dimension,
    pub start_index: u64,
    pub end_index: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_spreadsheet() {
        let body = r#"{
            "spreadsheetId": "abc",
            "properties": {"title": "Budget", "locale": "en_US"},
            "sheets": [
                {"properties": {"sheetId": 0, "title": "Sheet1", "index": 0,
                    "gridProperties": {"rowCount": 1000, "columnCount": 26}}},
                {"properties": {"sheetId": 7, "title": "Secret", "index": 1, "hidden": true}}
            ]
        }"#;
        let details: SpreadsheetDetails = serde_json::from_str(body).unwrap();

        assert_eq!(details.spreadsheet_id, "abc");
        assert_eq!(details.properties.title.as_deref(), Some("Budget"));
        assert_eq!(details.sheets.len(), 2);
        assert_eq!(
            details.sheets[0].properties.grid_properties,
            Some(GridProperties {
                row_count: Some(1000),
                column_count: Some(26),
            })
        );
        assert!(!details.sheets[0].properties.is_hidden());
        assert!(details.sheets[1].properties.is_hidden());
    }

    #[test]
    fn test_grid_range_omits_unbounded_sides() {
        let range = GridRange {
            sheet_id: 3,
            start_row_index: Some(0),
            end_row_index: Some(5),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(range).unwrap(),
            serde_json::json!({"sheetId": 3, "startRowIndex": 0, "endRowIndex": 5})
        );
    }
}
