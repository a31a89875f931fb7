//! Spreadsheet handle

use sheetwire_protocol::{
    AddSheetRequest, BatchUpdateResponse, DeleteSheetRequest, GridProperties, Request,
    SheetDetails, SheetProperties, SpreadsheetDetails, SpreadsheetProperties,
    UpdateSpreadsheetPropertiesRequest,
};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::service::SheetsService;
use crate::sheet::Sheet;

/// Rows in a sheet created with [`Spreadsheet::add_sheet`] unless told otherwise.
pub const DEFAULT_ROW_COUNT: u32 = 1000;
/// Columns in a sheet created with [`Spreadsheet::add_sheet`] unless told otherwise.
pub const DEFAULT_COL_COUNT: u32 = 1000;

/// How to pick a sheet out of a spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetLookup<'n> {
    /// By the stable numeric sheet id
    Id(i64),
    /// By tab title
    Name(&'n str),
    /// By position in the (optionally hidden-filtered) sheet list
    Index(usize),
}

impl std::fmt::Display for SheetLookup<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetLookup::Id(id) => write!(f, "id {id}"),
            SheetLookup::Name(name) => write!(f, "name '{name}'"),
            SheetLookup::Index(index) => write!(f, "index {index}"),
        }
    }
}

/// A snapshot of a remote spreadsheet.
///
/// Every mutating method re-fetches the snapshot after the service accepts
/// the change, so accessors always reflect the last known remote state.
pub struct Spreadsheet<'a, S> {
    client: &'a Client<S>,
    details: SpreadsheetDetails,
}

impl<'a, S: SheetsService> Spreadsheet<'a, S> {
    pub(crate) fn new(client: &'a Client<S>, details: SpreadsheetDetails) -> Self {
        Self { client, details }
    }

    pub fn file_id(&self) -> &str {
        &self.details.spreadsheet_id
    }

    pub fn title(&self) -> &str {
        self.details.properties.title.as_deref().unwrap_or_default()
    }

    /// The raw resource as last fetched.
    pub fn details(&self) -> &SpreadsheetDetails {
        &self.details
    }

    /// Re-open this spreadsheet.
    pub fn refresh(&mut self) -> Result<()> {
        self.details = self.client.fetch(&self.details.spreadsheet_id)?;
        Ok(())
    }

    fn visible_sheets(&self, include_hidden: bool) -> impl Iterator<Item = &SheetDetails> {
        self.details
            .sheets
            .iter()
            .filter(move |s| include_hidden || !s.properties.is_hidden())
    }

    /// All sheets of this spreadsheet, hidden ones only when asked for.
    pub fn all_sheets(&self, include_hidden: bool) -> Vec<Sheet<'a, S>> {
        self.visible_sheets(include_hidden)
            .map(|details| Sheet::new(self.client, self.file_id(), details.clone()))
            .collect()
    }

    pub fn find_sheet_by(&self, lookup: SheetLookup<'_>, include_hidden: bool) -> Result<Sheet<'a, S>> {
        let mut sheets = self.visible_sheets(include_hidden);
        let found = match lookup {
            SheetLookup::Id(id) => sheets.find(|s| s.properties.sheet_id.unwrap_or_default() == id),
            SheetLookup::Name(name) => sheets.find(|s| s.properties.title.as_deref() == Some(name)),
            SheetLookup::Index(index) => sheets.nth(index),
        };

        found
            .map(|details| Sheet::new(self.client, self.file_id(), details.clone()))
            .ok_or_else(|| Error::SheetNotFound(lookup.to_string()))
    }

    pub fn find_sheet_by_id(&self, sheet_id: i64, include_hidden: bool) -> Result<Sheet<'a, S>> {
        self.find_sheet_by(SheetLookup::Id(sheet_id), include_hidden)
    }

    pub fn find_sheet_by_name(&self, name: &str, include_hidden: bool) -> Result<Sheet<'a, S>> {
        self.find_sheet_by(SheetLookup::Name(name), include_hidden)
    }

    /// `index` counts positions in the filtered list, not the sheet's `index` property.
    pub fn find_sheet_by_index(&self, index: usize, include_hidden: bool) -> Result<Sheet<'a, S>> {
        self.find_sheet_by(SheetLookup::Index(index), include_hidden)
    }

    /// Send prepared requests as one batch. Does not refresh.
    pub fn batch_update(&self, requests: Vec<Request>) -> Result<BatchUpdateResponse> {
        self.client.update(self.file_id(), requests)
    }

    pub fn add_sheet_request(&self, name: &str, row_count: u32, col_count: u32) -> Request {
        Request::AddSheet(AddSheetRequest {
            properties: SheetProperties {
                title: Some(name.to_string()),
                grid_properties: Some(GridProperties {
                    row_count: Some(row_count),
                    column_count: Some(col_count),
                }),
                ..Default::default()
            },
        })
    }

    /// Add a sheet and return a handle to it.
    pub fn add_sheet(&mut self, name: &str, row_count: u32, col_count: u32) -> Result<Sheet<'a, S>> {
        let request = self.add_sheet_request(name, row_count, col_count);
        let response = self.client.update(self.file_id(), vec![request])?;

        let properties = response
            .replies
            .into_iter()
            .next()
            .and_then(|reply| reply.add_sheet)
            .map(|added| added.properties)
            .ok_or_else(|| Error::UnexpectedResponse("addSheet reply missing".into()))?;

        tracing::info!(file_id = self.file_id(), name, "added sheet");
        self.refresh()?;
        Ok(Sheet::new(self.client, self.file_id(), SheetDetails { properties }))
    }

    pub fn delete_sheet_request(&self, sheet_id: i64) -> Request {
        Request::DeleteSheet(DeleteSheetRequest { sheet_id })
    }

    pub fn delete_sheet(&mut self, sheet_id: i64) -> Result<()> {
        let request = self.delete_sheet_request(sheet_id);
        self.client.update(self.file_id(), vec![request])?;
        tracing::info!(file_id = self.file_id(), sheet_id, "deleted sheet");
        self.refresh()
    }

    pub fn change_title_request(&self, new_title: &str) -> Request {
        Request::UpdateSpreadsheetProperties(UpdateSpreadsheetPropertiesRequest {
            properties: SpreadsheetProperties {
                title: Some(new_title.to_string()),
            },
            fields: "title".to_string(),
        })
    }

    pub fn change_title(&mut self, new_title: &str) -> Result<()> {
        let request = self.change_title_request(new_title);
        self.client.update(self.file_id(), vec![request])?;
        self.refresh()
    }
}

impl<S> std::fmt::Debug for Spreadsheet<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spreadsheet")
            .field("details", &self.details)
            .finish_non_exhaustive()
    }
}
