//! In-process [`SheetsService`] that keeps documents in memory.
//!
//! Batches are applied to a working copy and committed only when every
//! request in them succeeds, matching the all-or-nothing behaviour of the
//! remote service.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use sheetwire_core::{CellAddress, CellRange, RangeName};
use sheetwire_protocol::{
    AddSheetReply, AddSheetRequest, AppendDimensionRequest, BatchUpdateRequest,
    BatchUpdateResponse, BatchUpdateValuesRequest, BatchUpdateValuesResponse, CellFormat,
    CellValue, DeleteSheetRequest, Dimension, GridProperties, InsertDimensionRequest, Reply,
    RepeatCellRequest, Request, SheetDetails, SheetProperties, SpreadsheetDetails,
    SpreadsheetProperties, UpdateSheetPropertiesRequest, UpdateSpreadsheetPropertiesRequest,
    UpdateValuesResponse, ValueInputOption, ValueRange,
};

use crate::service::{ServiceError, SheetsService};

/// Grid size of sheets created without explicit grid properties.
const NEW_SHEET_ROWS: u32 = 1000;
const NEW_SHEET_COLS: u32 = 26;
/// Upper bound on the summed grid size of all sheets in a document.
const MAX_DOCUMENT_CELLS: u64 = 10_000_000;

type Outcome<T> = Result<T, ServiceError>;

#[derive(Debug, Clone)]
struct Document {
    details: SpreadsheetDetails,
    accessible: bool,
    next_sheet_id: i64,
    values: HashMap<i64, BTreeMap<CellAddress, CellValue>>,
    formats: HashMap<i64, BTreeMap<CellAddress, CellFormat>>,
}

/// Thread-safe in-memory spreadsheet store.
#[derive(Debug, Default)]
pub struct MemoryService {
    documents: Mutex<HashMap<String, Document>>,
}

impl MemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    fn documents(&self) -> MutexGuard<'_, HashMap<String, Document>> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Create (or replace) a document holding one empty `Sheet1`.
    pub fn create_spreadsheet(&self, spreadsheet_id: &str, title: &str) -> SpreadsheetDetails {
        let details = SpreadsheetDetails {
            spreadsheet_id: spreadsheet_id.to_string(),
            properties: SpreadsheetProperties {
                title: Some(title.to_string()),
            },
            sheets: vec![SheetDetails {
                properties: SheetProperties {
                    sheet_id: Some(0),
                    title: Some("Sheet1".to_string()),
                    index: Some(0),
                    hidden: None,
                    grid_properties: Some(GridProperties {
                        row_count: Some(NEW_SHEET_ROWS),
                        column_count: Some(NEW_SHEET_COLS),
                    }),
                },
            }],
        };

        let document = Document {
            details: details.clone(),
            accessible: true,
            next_sheet_id: 1,
            values: HashMap::new(),
            formats: HashMap::new(),
        };
        self.documents()
            .insert(spreadsheet_id.to_string(), document);
        tracing::debug!(spreadsheet_id, "created in-memory spreadsheet");
        details
    }

    /// Make every call on `spreadsheet_id` fail with 403 (or succeed again).
    pub fn set_accessible(&self, spreadsheet_id: &str, accessible: bool) {
        if let Some(doc) = self.documents().get_mut(spreadsheet_id) {
            doc.accessible = accessible;
        }
    }

    /// Stored value of one cell, by sheet title and label.
    pub fn value(&self, spreadsheet_id: &str, sheet: &str, label: &str) -> Option<CellValue> {
        let addr = CellAddress::parse(label).ok()?;
        let docs = self.documents();
        let doc = docs.get(spreadsheet_id)?;
        let sheet_id = doc.sheet_id_by_title(sheet)?;
        doc.values.get(&sheet_id)?.get(&addr).cloned()
    }

    /// Stored format of one cell, by sheet title and label.
    pub fn format(&self, spreadsheet_id: &str, sheet: &str, label: &str) -> Option<CellFormat> {
        let addr = CellAddress::parse(label).ok()?;
        let docs = self.documents();
        let doc = docs.get(spreadsheet_id)?;
        let sheet_id = doc.sheet_id_by_title(sheet)?;
        doc.formats.get(&sheet_id)?.get(&addr).cloned()
    }
}

fn open<'d>(
    docs: &'d mut HashMap<String, Document>,
    spreadsheet_id: &str,
) -> Outcome<&'d mut Document> {
    let doc = docs
        .get_mut(spreadsheet_id)
        .ok_or_else(|| ServiceError::not_found("Requested entity was not found."))?;
    if !doc.accessible {
        return Err(ServiceError::forbidden(
            "The caller does not have permission",
        ));
    }
    Ok(doc)
}

fn mask(fields: &str) -> Outcome<Vec<&str>> {
    let fields: Vec<&str> = fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    if fields.is_empty() {
        return Err(ServiceError::bad_request("At least one field must be updated"));
    }
    Ok(fields)
}

fn missing(field: &str) -> ServiceError {
    ServiceError::bad_request(format!("Missing value for field: {field}"))
}

/// Shift every entry at or past `start` along `dimension` by `length`.
fn shift<V>(map: &mut BTreeMap<CellAddress, V>, dimension: Dimension, start: u32, length: u32) {
    let old = std::mem::take(map);
    *map = old
        .into_iter()
        .map(|(mut addr, v)| {
            match dimension {
                Dimension::Rows if addr.row >= start => addr.row += length,
                Dimension::Columns if addr.col >= start => addr.col += length,
                _ => {}
            }
            (addr, v)
        })
        .collect();
}

impl Document {
    fn sheet_position(&self, sheet_id: i64) -> Outcome<usize> {
        self.details
            .sheets
            .iter()
            .position(|s| s.properties.sheet_id.unwrap_or_default() == sheet_id)
            .ok_or_else(|| ServiceError::bad_request(format!("No grid with id: {sheet_id}")))
    }

    fn sheet_id_by_title(&self, title: &str) -> Option<i64> {
        self.details
            .sheets
            .iter()
            .find(|s| s.properties.title.as_deref() == Some(title))
            .map(|s| s.properties.sheet_id.unwrap_or_default())
    }

    fn grid(&self, pos: usize) -> (u32, u32) {
        let grid = self.details.sheets[pos]
            .properties
            .grid_properties
            .unwrap_or_default();
        (
            grid.row_count.unwrap_or_default(),
            grid.column_count.unwrap_or_default(),
        )
    }

    fn grid_mut(&mut self, pos: usize) -> &mut GridProperties {
        self.details.sheets[pos]
            .properties
            .grid_properties
            .get_or_insert_with(GridProperties::default)
    }

    fn reindex(&mut self) {
        for (i, sheet) in self.details.sheets.iter_mut().enumerate() {
            sheet.properties.index = Some(i as u32);
        }
    }

    /// Sheet titles are unique regardless of case.
    fn check_title_free(&self, title: &str, except: Option<i64>) -> Outcome<()> {
        let wanted = title.to_lowercase();
        let taken = self.details.sheets.iter().any(|s| {
            s.properties.sheet_id != except
                && s.properties.title.as_deref().map(str::to_lowercase) == Some(wanted.clone())
        });
        if taken {
            return Err(ServiceError::bad_request(format!(
                "A sheet with the name \"{title}\" already exists. Please enter another name."
            )));
        }
        Ok(())
    }

    fn next_default_title(&self) -> String {
        (self.details.sheets.len() + 1..)
            .map(|n| format!("Sheet{n}"))
            .find(|t| self.check_title_free(t, None).is_ok())
            .unwrap_or_default()
    }

    /// The summed grid of all sheets must stay within `MAX_DOCUMENT_CELLS`.
    fn check_cell_limit(&self) -> Outcome<()> {
        let total: u64 = (0..self.details.sheets.len())
            .map(|pos| {
                let (rows, cols) = self.grid(pos);
                u64::from(rows) * u64::from(cols)
            })
            .sum();
        if total > MAX_DOCUMENT_CELLS {
            return Err(ServiceError::bad_request(format!(
                "This action would increase the number of cells in the workbook \
                 above the limit of {MAX_DOCUMENT_CELLS} cells."
            )));
        }
        Ok(())
    }

    /// Drop stored cells that fall outside the sheet's grid.
    fn prune(&mut self, pos: usize) {
        let sheet_id = self.details.sheets[pos]
            .properties
            .sheet_id
            .unwrap_or_default();
        let (rows, cols) = self.grid(pos);
        let inside = |addr: &CellAddress| addr.row < rows && addr.col < cols;
        if let Some(values) = self.values.get_mut(&sheet_id) {
            values.retain(|addr, _| inside(addr));
        }
        if let Some(formats) = self.formats.get_mut(&sheet_id) {
            formats.retain(|addr, _| inside(addr));
        }
    }

    fn apply(&mut self, request: &Request) -> Outcome<Reply> {
        match request {
            Request::AddSheet(req) => self.add_sheet(req),
            Request::DeleteSheet(req) => self.delete_sheet(req).map(|_| Reply::default()),
            Request::UpdateSpreadsheetProperties(req) => self
                .update_spreadsheet_properties(req)
                .map(|_| Reply::default()),
            Request::UpdateSheetProperties(req) => {
                self.update_sheet_properties(req).map(|_| Reply::default())
            }
            Request::AppendDimension(req) => {
                self.append_dimension(req).map(|_| Reply::default())
            }
            Request::InsertDimension(req) => {
                self.insert_dimension(req).map(|_| Reply::default())
            }
            Request::RepeatCell(req) => self.repeat_cell(req).map(|_| Reply::default()),
        }
    }

    fn add_sheet(&mut self, req: &AddSheetRequest) -> Outcome<Reply> {
        let mut properties = req.properties.clone();

        let title = match properties.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => self.next_default_title(),
        };
        self.check_title_free(&title, None)?;

        let sheet_id = match properties.sheet_id {
            Some(id) if id < 0 => {
                return Err(ServiceError::bad_request(format!("Invalid sheet id: {id}")))
            }
            Some(id) if self.sheet_position(id).is_ok() => {
                return Err(ServiceError::bad_request(format!(
                    "A sheet with the id {id} already exists"
                )))
            }
            Some(id) => id,
            None => self.next_sheet_id,
        };
        let after = sheet_id
            .checked_add(1)
            .ok_or_else(|| ServiceError::bad_request(format!("Invalid sheet id: {sheet_id}")))?;
        self.next_sheet_id = self.next_sheet_id.max(after);

        let grid = properties.grid_properties.unwrap_or_default();
        properties.grid_properties = Some(GridProperties {
            row_count: Some(grid.row_count.unwrap_or(NEW_SHEET_ROWS)),
            column_count: Some(grid.column_count.unwrap_or(NEW_SHEET_COLS)),
        });
        properties.sheet_id = Some(sheet_id);
        properties.title = Some(title);

        let len = self.details.sheets.len();
        let index = properties
            .index
            .map_or(len, |i| (i as usize).min(len));
        self.details.sheets.insert(index, SheetDetails { properties });
        self.reindex();
        self.check_cell_limit()?;

        Ok(Reply {
            add_sheet: Some(AddSheetReply {
                properties: self.details.sheets[index].properties.clone(),
            }),
        })
    }

    fn delete_sheet(&mut self, req: &DeleteSheetRequest) -> Outcome<()> {
        let pos = self.sheet_position(req.sheet_id)?;
        if self.details.sheets.len() == 1 {
            return Err(ServiceError::bad_request(
                "You can't remove all the sheets in a document.",
            ));
        }
        self.details.sheets.remove(pos);
        self.values.remove(&req.sheet_id);
        self.formats.remove(&req.sheet_id);
        self.reindex();
        Ok(())
    }

    fn update_spreadsheet_properties(
        &mut self,
        req: &UpdateSpreadsheetPropertiesRequest,
    ) -> Outcome<()> {
        for field in mask(&req.fields)? {
            match field {
                "title" => {
                    let title = req.properties.title.clone().ok_or_else(|| missing(field))?;
                    self.details.properties.title = Some(title);
                }
                other => {
                    return Err(ServiceError::bad_request(format!("Unknown field: {other}")))
                }
            }
        }
        Ok(())
    }

    fn update_sheet_properties(&mut self, req: &UpdateSheetPropertiesRequest) -> Outcome<()> {
        let props = &req.properties;
        let sheet_id = props.sheet_id.unwrap_or_default();
        let mut pos = self.sheet_position(sheet_id)?;
        let grid = props.grid_properties.unwrap_or_default();

        for field in mask(&req.fields)? {
            match field {
                "title" => {
                    let title = props
                        .title
                        .clone()
                        .filter(|t| !t.is_empty())
                        .ok_or_else(|| missing(field))?;
                    self.check_title_free(&title, Some(sheet_id))?;
                    self.details.sheets[pos].properties.title = Some(title);
                }
                "hidden" => {
                    let hidden = props.hidden.unwrap_or(false);
                    let others_visible = self
                        .details
                        .sheets
                        .iter()
                        .enumerate()
                        .any(|(i, s)| i != pos && !s.properties.is_hidden());
                    if hidden && !others_visible {
                        return Err(ServiceError::bad_request(
                            "You can't hide all the sheets in a document.",
                        ));
                    }
                    self.details.sheets[pos].properties.hidden = Some(hidden).filter(|h| *h);
                }
                "index" => {
                    let index = props.index.ok_or_else(|| missing(field))? as usize;
                    let sheet = self.details.sheets.remove(pos);
                    pos = index.min(self.details.sheets.len());
                    self.details.sheets.insert(pos, sheet);
                    self.reindex();
                }
                "gridProperties" | "gridProperties.rowCount" | "gridProperties.columnCount" => {
                    if field != "gridProperties.columnCount" {
                        let rows = grid.row_count.ok_or_else(|| missing(field))?;
                        self.grid_mut(pos).row_count = Some(rows);
                    }
                    if field != "gridProperties.rowCount" {
                        let cols = grid.column_count.ok_or_else(|| missing(field))?;
                        self.grid_mut(pos).column_count = Some(cols);
                    }
                    self.check_cell_limit()?;
                    self.prune(pos);
                }
                other => {
                    return Err(ServiceError::bad_request(format!("Unknown field: {other}")))
                }
            }
        }
        Ok(())
    }

    fn append_dimension(&mut self, req: &AppendDimensionRequest) -> Outcome<()> {
        let pos = self.sheet_position(req.sheet_id)?;
        if req.length == 0 {
            return Err(ServiceError::bad_request("length must be greater than 0"));
        }
        self.grow(pos, req.dimension, req.length)
    }

    fn grow(&mut self, pos: usize, dimension: Dimension, length: u32) -> Outcome<()> {
        let (rows, cols) = self.grid(pos);
        let current = match dimension {
            Dimension::Rows => rows,
            Dimension::Columns => cols,
        };
        let grown = current
            .checked_add(length)
            .ok_or_else(|| ServiceError::bad_request("grid size limit exceeded"))?;
        let grid = self.grid_mut(pos);
        match dimension {
            Dimension::Rows => grid.row_count = Some(grown),
            Dimension::Columns => grid.column_count = Some(grown),
        }
        self.check_cell_limit()
    }

    fn insert_dimension(&mut self, req: &InsertDimensionRequest) -> Outcome<()> {
        let range = req.range;
        let pos = self.sheet_position(range.sheet_id)?;
        let (rows, cols) = self.grid(pos);
        let current = match range.dimension {
            Dimension::Rows => rows,
            Dimension::Columns => cols,
        };

        if range.end_index <= range.start_index {
            return Err(ServiceError::bad_request(
                "endIndex must be greater than startIndex",
            ));
        }
        if range.start_index > u64::from(current) {
            return Err(ServiceError::bad_request(format!(
                "startIndex {} is past the end of the sheet ({current})",
                range.start_index
            )));
        }
        if req.inherit_from_before && range.start_index == 0 {
            return Err(ServiceError::bad_request(
                "Cannot inherit properties from before the first row or column",
            ));
        }

        let length = u32::try_from(range.end_index - range.start_index)
            .map_err(|_| ServiceError::bad_request("grid size limit exceeded"))?;
        self.grow(pos, range.dimension, length)?;

        let start = range.start_index as u32;
        if let Some(values) = self.values.get_mut(&range.sheet_id) {
            shift(values, range.dimension, start, length);
        }
        if let Some(formats) = self.formats.get_mut(&range.sheet_id) {
            shift(formats, range.dimension, start, length);
        }
        Ok(())
    }

    fn repeat_cell(&mut self, req: &RepeatCellRequest) -> Outcome<()> {
        let range = req.range;
        let pos = self.sheet_position(range.sheet_id)?;
        let (rows, cols) = self.grid(pos);

        let start_row = range.start_row_index.unwrap_or(0);
        let end_row = range.end_row_index.unwrap_or(u64::from(rows));
        let start_col = range.start_column_index.unwrap_or(0);
        let end_col = range.end_column_index.unwrap_or(u64::from(cols));
        if start_row >= end_row || start_col >= end_col {
            return Err(ServiceError::bad_request("Range is empty"));
        }
        if end_row > u64::from(rows) || end_col > u64::from(cols) {
            return Err(ServiceError::bad_request("Range exceeds grid limits"));
        }

        let (mut number, mut text) = (false, false);
        for field in mask(&req.fields)? {
            match field {
                "userEnteredFormat" => (number, text) = (true, true),
                "userEnteredFormat.numberFormat" => number = true,
                "userEnteredFormat.textFormat" => text = true,
                other => {
                    return Err(ServiceError::bad_request(format!("Unknown field: {other}")))
                }
            }
        }

        let source = &req.cell.user_entered_format;
        let formats = self.formats.entry(range.sheet_id).or_default();
        // Bounds were checked against the u32 grid above
        let target = CellRange::from_indices(
            start_row as u32,
            start_col as u32,
            (end_row - 1) as u32,
            (end_col - 1) as u32,
        );
        for addr in target.cells() {
            let format = formats.entry(addr).or_default();
            if number {
                format.number_format = source.number_format.clone();
            }
            if text {
                format.text_format = source.text_format.clone();
            }
        }
        formats.retain(|_, f| *f != CellFormat::default());
        Ok(())
    }

    /// Write `data` at `range`, returning the response and the target sheet id.
    fn write_values(&mut self, range: &str, data: &ValueRange) -> Outcome<(UpdateValuesResponse, i64)> {
        let unparsable = || ServiceError::bad_request(format!("Unable to parse range: {range}"));
        let name = RangeName::parse(range).map_err(|_| unparsable())?;

        let pos = match &name.sheet {
            Some(title) => {
                let id = self.sheet_id_by_title(title).ok_or_else(unparsable)?;
                self.sheet_position(id)?
            }
            None => self
                .details
                .sheets
                .iter()
                .position(|s| !s.properties.is_hidden())
                .unwrap_or(0),
        };
        let properties = &self.details.sheets[pos].properties;
        let sheet_id = properties.sheet_id.unwrap_or_default();
        let title = properties.title.clone().unwrap_or_default();
        let (rows, cols) = self.grid(pos);

        let origin = name.range.start;
        let bounded = name.range.start != name.range.end;
        let mut writes = Vec::new();
        let mut span: Option<CellRange> = None;

        for (i, line) in data.values.iter().enumerate() {
            for (j, value) in line.iter().enumerate() {
                let (dr, dc) = match data.major_dimension {
                    Dimension::Rows => (i, j),
                    Dimension::Columns => (j, i),
                };
                let row = u64::from(origin.row) + dr as u64;
                let col = u64::from(origin.col) + dc as u64;
                if row >= u64::from(rows) || col >= u64::from(cols) {
                    return Err(ServiceError::bad_request(format!(
                        "Range ({range}) exceeds grid limits. Max rows: {rows}, max columns: {cols}"
                    )));
                }
                let addr = CellAddress::new(row as u32, col as u32);
                if bounded && !name.range.contains(&addr) {
                    return Err(ServiceError::bad_request(format!(
                        "Requested writing within range [{range}], but tried writing to {addr}"
                    )));
                }

                span = Some(match span {
                    Some(s) => CellRange::new(
                        CellAddress::new(s.start.row.min(addr.row), s.start.col.min(addr.col)),
                        CellAddress::new(s.end.row.max(addr.row), s.end.col.max(addr.col)),
                    ),
                    None => CellRange::single(addr),
                });
                // Null leaves the cell untouched
                if !value.is_null() {
                    writes.push((addr, value.clone()));
                }
            }
        }

        let updated_cells = writes.len() as u64;
        self.values.entry(sheet_id).or_default().extend(writes);

        let response = match span {
            Some(span) => UpdateValuesResponse {
                spreadsheet_id: self.details.spreadsheet_id.clone(),
                updated_range: RangeName::new(title, span).to_string(),
                updated_rows: span.row_count(),
                updated_columns: span.col_count(),
                updated_cells,
            },
            None => UpdateValuesResponse {
                spreadsheet_id: self.details.spreadsheet_id.clone(),
                updated_range: range.to_string(),
                ..Default::default()
            },
        };
        Ok((response, sheet_id))
    }
}

impl SheetsService for MemoryService {
    fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<SpreadsheetDetails, ServiceError> {
        let mut docs = self.documents();
        Ok(open(&mut docs, spreadsheet_id)?.details.clone())
    }

    fn batch_update(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateRequest,
    ) -> Result<BatchUpdateResponse, ServiceError> {
        let mut docs = self.documents();
        let doc = open(&mut docs, spreadsheet_id)?;

        let mut working = doc.clone();
        let replies = body
            .requests
            .iter()
            .map(|request| working.apply(request))
            .collect::<Outcome<Vec<_>>>()?;
        *doc = working;

        tracing::debug!(spreadsheet_id, applied = replies.len(), "applied batch");
        Ok(BatchUpdateResponse {
            spreadsheet_id: spreadsheet_id.to_string(),
            replies,
        })
    }

    fn values_update(
        &self,
        spreadsheet_id: &str,
        range: &str,
        _value_input_option: ValueInputOption,
        body: &ValueRange,
    ) -> Result<UpdateValuesResponse, ServiceError> {
        if !body.range.is_empty() && body.range != range {
            return Err(ServiceError::bad_request(format!(
                "Requested range [{range}] does not match body range [{}]",
                body.range
            )));
        }

        let mut docs = self.documents();
        let doc = open(&mut docs, spreadsheet_id)?;
        let mut working = doc.clone();
        let (response, _) = working.write_values(range, body)?;
        *doc = working;
        Ok(response)
    }

    fn values_batch_update(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateValuesRequest,
    ) -> Result<BatchUpdateValuesResponse, ServiceError> {
        let mut docs = self.documents();
        let doc = open(&mut docs, spreadsheet_id)?;
        let mut working = doc.clone();

        let mut totals = BatchUpdateValuesResponse {
            spreadsheet_id: spreadsheet_id.to_string(),
            ..Default::default()
        };
        let mut sheets = HashSet::new();
        for data in &body.data {
            let (response, sheet_id) = working.write_values(&data.range, data)?;
            sheets.insert(sheet_id);
            totals.total_updated_rows += response.updated_rows;
            totals.total_updated_columns += response.updated_columns;
            totals.total_updated_cells += response.updated_cells;
            totals.responses.push(response);
        }
        totals.total_updated_sheets = sheets.len() as u64;

        *doc = working;
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetwire_protocol::{CellData, DimensionRange, GridRange, NumberFormat, NumberFormatType};

    fn service() -> MemoryService {
        let service = MemoryService::new();
        service.create_spreadsheet("doc", "Doc");
        service
    }

    fn batch(service: &MemoryService, requests: Vec<Request>) -> Outcome<BatchUpdateResponse> {
        service.batch_update("doc", &BatchUpdateRequest { requests })
    }

    fn write(service: &MemoryService, range: &str, values: Vec<Vec<CellValue>>) -> Outcome<UpdateValuesResponse> {
        let body = ValueRange {
            range: range.to_string(),
            major_dimension: Dimension::Rows,
            values,
        };
        service.values_update("doc", range, ValueInputOption::Raw, &body)
    }

    #[test]
    fn test_unknown_and_denied_documents() {
        let service = service();
        assert_eq!(service.get_spreadsheet("nope").unwrap_err().status, 404);

        service.set_accessible("doc", false);
        assert_eq!(service.get_spreadsheet("doc").unwrap_err().status, 403);
        service.set_accessible("doc", true);
        assert!(service.get_spreadsheet("doc").is_ok());
    }

    #[test]
    fn test_add_sheet_allocates_ids_and_defaults() {
        let service = service();
        let response = batch(
            &service,
            vec![Request::AddSheet(AddSheetRequest {
                properties: SheetProperties::default(),
            })],
        )
        .unwrap();

        let added = response.replies[0].add_sheet.as_ref().unwrap();
        assert_eq!(added.properties.sheet_id, Some(1));
        assert_eq!(added.properties.title.as_deref(), Some("Sheet2"));
        assert_eq!(added.properties.index, Some(1));
        assert_eq!(
            added.properties.grid_properties,
            Some(GridProperties {
                row_count: Some(1000),
                column_count: Some(26),
            })
        );
    }

    #[test]
    fn test_duplicate_title_rejected_case_insensitively() {
        let service = service();
        let err = batch(
            &service,
            vec![Request::AddSheet(AddSheetRequest {
                properties: SheetProperties {
                    title: Some("sheet1".into()),
                    ..Default::default()
                },
            })],
        )
        .unwrap_err();
        assert_eq!(err.status, 400);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let service = service();
        let err = batch(
            &service,
            vec![
                Request::UpdateSpreadsheetProperties(UpdateSpreadsheetPropertiesRequest {
                    properties: SpreadsheetProperties {
                        title: Some("Renamed".into()),
                    },
                    fields: "title".into(),
                }),
                Request::DeleteSheet(DeleteSheetRequest { sheet_id: 42 }),
            ],
        )
        .unwrap_err();
        assert_eq!(err.message, "No grid with id: 42");

        let details = service.get_spreadsheet("doc").unwrap();
        assert_eq!(details.properties.title.as_deref(), Some("Doc"));
    }

    #[test]
    fn test_add_sheet_with_largest_id_rejected() {
        let service = service();
        let err = batch(
            &service,
            vec![Request::AddSheet(AddSheetRequest {
                properties: SheetProperties {
                    sheet_id: Some(i64::MAX),
                    title: Some("X".into()),
                    ..Default::default()
                },
            })],
        )
        .unwrap_err();
        assert_eq!(err.status, 400);

        let details = service.get_spreadsheet("doc").unwrap();
        assert_eq!(details.sheets.len(), 1);
    }

    #[test]
    fn test_grid_growth_capped_per_document() {
        let service = service();
        let grow_rows = |rows: u32| {
            Request::UpdateSheetProperties(UpdateSheetPropertiesRequest {
                properties: SheetProperties {
                    sheet_id: Some(0),
                    grid_properties: Some(GridProperties {
                        row_count: Some(rows),
                        column_count: None,
                    }),
                    ..Default::default()
                },
                fields: "gridProperties.rowCount".into(),
            })
        };

        let err = batch(&service, vec![grow_rows(1_000_000)]).unwrap_err();
        assert_eq!(err.status, 400);
        let err = batch(
            &service,
            vec![Request::AppendDimension(AppendDimensionRequest {
                sheet_id: 0,
                dimension: Dimension::Columns,
                length: u32::MAX - 26,
            })],
        )
        .unwrap_err();
        assert_eq!(err.status, 400);
        let err = batch(
            &service,
            vec![Request::AddSheet(AddSheetRequest {
                properties: SheetProperties {
                    grid_properties: Some(GridProperties {
                        row_count: Some(100_000),
                        column_count: Some(100_000),
                    }),
                    ..Default::default()
                },
            })],
        )
        .unwrap_err();
        assert_eq!(err.status, 400);

        let details = service.get_spreadsheet("doc").unwrap();
        assert_eq!(details.sheets.len(), 1);
        assert_eq!(
            details.sheets[0].properties.grid_properties,
            Some(GridProperties {
                row_count: Some(1000),
                column_count: Some(26),
            })
        );

        batch(&service, vec![grow_rows(384_000)]).unwrap();
    }

    #[test]
    fn test_last_sheet_cannot_be_deleted() {
        let service = service();
        let err = batch(
            &service,
            vec![Request::DeleteSheet(DeleteSheetRequest { sheet_id: 0 })],
        )
        .unwrap_err();
        assert_eq!(err.status, 400);
    }

    #[test]
    fn test_resize_prunes_values_outside_grid() {
        let service = service();
        write(&service, "Sheet1!A1:B2", vec![vec![1.into(), 2.into()], vec![3.into(), 4.into()]]).unwrap();

        batch(
            &service,
            vec![Request::UpdateSheetProperties(UpdateSheetPropertiesRequest {
                properties: SheetProperties {
                    sheet_id: Some(0),
                    grid_properties: Some(GridProperties {
                        row_count: Some(1),
                        column_count: None,
                    }),
                    ..Default::default()
                },
                fields: "gridProperties.rowCount,".into(),
            })],
        )
        .unwrap();

        assert_eq!(service.value("doc", "Sheet1", "B1"), Some(CellValue::Number(2.0)));
        assert_eq!(service.value("doc", "Sheet1", "A2"), None);
        let details = service.get_spreadsheet("doc").unwrap();
        assert_eq!(
            details.sheets[0].properties.grid_properties,
            Some(GridProperties {
                row_count: Some(1),
                column_count: Some(26),
            })
        );
    }

    #[test]
    fn test_insert_shifts_existing_cells() {
        let service = service();
        write(&service, "Sheet1!B2", vec![vec!["x".into()]]).unwrap();

        batch(
            &service,
            vec![Request::InsertDimension(InsertDimensionRequest {
                range: DimensionRange {
                    sheet_id: 0,
                    dimension: Dimension::Columns,
                    start_index: 1,
                    end_index: 3,
                },
                inherit_from_before: true,
            })],
        )
        .unwrap();

        assert_eq!(service.value("doc", "Sheet1", "B2"), None);
        assert_eq!(service.value("doc", "Sheet1", "D2"), Some("x".into()));
        let details = service.get_spreadsheet("doc").unwrap();
        let grid = details.sheets[0].properties.grid_properties.unwrap();
        assert_eq!(grid.column_count, Some(28));
    }

    #[test]
    fn test_insert_cannot_inherit_at_start() {
        let service = service();
        let err = batch(
            &service,
            vec![Request::InsertDimension(InsertDimensionRequest {
                range: DimensionRange {
                    sheet_id: 0,
                    dimension: Dimension::Rows,
                    start_index: 0,
                    end_index: 1,
                },
                inherit_from_before: true,
            })],
        )
        .unwrap_err();
        assert_eq!(err.status, 400);
    }

    #[test]
    fn test_repeat_cell_honours_mask() {
        let service = service();
        let number = NumberFormat {
            format_type: NumberFormatType::Currency,
            pattern: None,
        };
        batch(
            &service,
            vec![Request::RepeatCell(RepeatCellRequest {
                range: GridRange {
                    sheet_id: 0,
                    start_row_index: Some(0),
                    end_row_index: Some(2),
                    start_column_index: Some(0),
                    end_column_index: Some(1),
                },
                cell: CellData {
                    user_entered_format: CellFormat {
                        number_format: Some(number.clone()),
                        text_format: Some(Default::default()),
                    },
                },
                fields: "userEnteredFormat.numberFormat".into(),
            })],
        )
        .unwrap();

        assert_eq!(
            service.format("doc", "Sheet1", "A2"),
            Some(CellFormat::number(number))
        );
        assert_eq!(service.format("doc", "Sheet1", "A3"), None);
        assert_eq!(service.format("doc", "Sheet1", "B1"), None);
    }

    #[test]
    fn test_values_update_reports_span() {
        let service = service();
        let response = write(
            &service,
            "Sheet1!B2:C3",
            vec![vec!["a".into(), CellValue::Null], vec![true.into(), 1.5.into()]],
        )
        .unwrap();

        assert_eq!(response.updated_range, "Sheet1!B2:C3");
        assert_eq!(response.updated_rows, 2);
        assert_eq!(response.updated_columns, 2);
        assert_eq!(response.updated_cells, 3);
        assert_eq!(service.value("doc", "Sheet1", "C3"), Some(CellValue::Number(1.5)));
        assert_eq!(service.value("doc", "Sheet1", "C2"), None);
    }

    #[test]
    fn test_values_outside_declared_range_rejected() {
        let service = service();
        let err = write(&service, "Sheet1!A1:A2", vec![vec![1.into(), 2.into()]]).unwrap_err();
        assert_eq!(err.status, 400);
        assert_eq!(service.value("doc", "Sheet1", "A1"), None);
    }

    #[test]
    fn test_values_past_grid_rejected() {
        let service = service();
        let err = write(&service, "Sheet1!Z1", vec![vec![1.into(), 2.into()]]).unwrap_err();
        assert!(err.message.contains("exceeds grid limits"), "{}", err.message);
    }

    #[test]
    fn test_values_unknown_sheet_or_bad_label() {
        let service = service();
        assert_eq!(write(&service, "Nope!A1", vec![vec![1.into()]]).unwrap_err().status, 400);
        assert_eq!(write(&service, "Sheet1!1A", vec![vec![1.into()]]).unwrap_err().status, 400);
    }

    #[test]
    fn test_values_columns_major() {
        let service = service();
        let body = ValueRange {
            range: "A1".into(),
            major_dimension: Dimension::Columns,
            values: vec![vec![1.into(), 2.into()], vec![3.into()]],
        };
        service
            .values_update("doc", "A1", ValueInputOption::UserEntered, &body)
            .unwrap();

        assert_eq!(service.value("doc", "Sheet1", "A2"), Some(CellValue::Number(2.0)));
        assert_eq!(service.value("doc", "Sheet1", "B1"), Some(CellValue::Number(3.0)));
    }
}
