//! Sheet (tab) handle

use sheetwire_core::{CellAddress, CellRange, GridIndices, RangeName};
use sheetwire_protocol::{
    AppendDimensionRequest, BatchUpdateValuesResponse, CellData, CellFormat, CellValue,
    DeleteSheetRequest, Dimension, DimensionRange, GridProperties, GridRange,
    InsertDimensionRequest, NumberFormat, NumberFormatType, RepeatCellRequest, Request,
    SheetDetails, SheetProperties, TextFormat, UpdateSheetPropertiesRequest,
    UpdateValuesResponse, ValueInputOption, ValueRange,
};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::service::SheetsService;

/// Optional 0-based bounds of a formatting target. Ends are exclusive; a
/// missing bound leaves that side of the sheet unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridBounds {
    pub start_row: Option<u64>,
    pub end_row: Option<u64>,
    pub start_col: Option<u64>,
    pub end_col: Option<u64>,
}

impl GridBounds {
    pub fn new(start_row: u64, end_row: u64, start_col: u64, end_col: u64) -> Self {
        Self {
            start_row: Some(start_row),
            end_row: Some(end_row),
            start_col: Some(start_col),
            end_col: Some(end_col),
        }
    }
}

impl From<GridIndices> for GridBounds {
    fn from(indices: GridIndices) -> Self {
        Self::new(
            indices.start_row,
            indices.end_row,
            indices.start_col,
            indices.end_col,
        )
    }
}

/// A single tab of a spreadsheet.
pub struct Sheet<'a, S> {
    client: &'a Client<S>,
    spreadsheet_id: String,
    details: SheetDetails,
}

impl<'a, S: SheetsService> Sheet<'a, S> {
    pub(crate) fn new(client: &'a Client<S>, spreadsheet_id: &str, details: SheetDetails) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.to_string(),
            details,
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn details(&self) -> &SheetDetails {
        &self.details
    }

    pub fn sheet_id(&self) -> i64 {
        self.details.properties.sheet_id.unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.details.properties.title.as_deref().unwrap_or_default()
    }

    pub fn is_hidden(&self) -> bool {
        self.details.properties.is_hidden()
    }

    fn grid(&self) -> GridProperties {
        self.details.properties.grid_properties.unwrap_or_default()
    }

    pub fn row_count(&self) -> u32 {
        self.grid().row_count.unwrap_or_default()
    }

    pub fn col_count(&self) -> u32 {
        self.grid().column_count.unwrap_or_default()
    }

    /// Translate a label such as `"B1"` into 0-based `(row, col)`.
    ///
    /// ```
    /// # use sheetwire::{Client, MemoryService};
    /// let service = MemoryService::new();
    /// service.create_spreadsheet("doc", "Doc");
    /// let client = Client::new(service);
    /// let sheet = client.open("doc").unwrap().find_sheet_by_index(0, false).unwrap();
    /// assert_eq!(sheet.get_int_addr("B1").unwrap(), (0, 1));
    /// ```
    pub fn get_int_addr(&self, label: &str) -> Result<(u32, u32)> {
        Ok(sheetwire_core::label_to_coordinate(label)?)
    }

    /// Translate 0-based `(row, col)` into a label such as `"A1"`.
    pub fn get_addr_int(&self, row: i64, col: i64) -> Result<String> {
        Ok(sheetwire_core::coordinate_to_label(row, col)?)
    }

    /// Re-fetch the parent spreadsheet and pick this sheet out of it.
    pub fn refresh(&mut self) -> Result<()> {
        let details = self.client.fetch(&self.spreadsheet_id)?;
        let id = self.sheet_id();
        self.details = details
            .sheets
            .into_iter()
            .find(|s| s.properties.sheet_id.unwrap_or_default() == id)
            .ok_or_else(|| Error::SheetNotFound(format!("id {id}")))?;
        Ok(())
    }

    fn send(&mut self, requests: Vec<Request>) -> Result<()> {
        if requests.is_empty() {
            return Ok(());
        }
        self.client.update(&self.spreadsheet_id, requests)?;
        self.refresh()
    }

    /// Delete this sheet.
    pub fn delete(self) -> Result<()> {
        let sheet_id = self.sheet_id();
        self.client.update(
            &self.spreadsheet_id,
            vec![Request::DeleteSheet(DeleteSheetRequest { sheet_id })],
        )?;
        tracing::info!(file_id = %self.spreadsheet_id, sheet_id, "deleted sheet");
        Ok(())
    }

    pub fn update_properties_request(&self, properties: SheetProperties, fields: &str) -> Request {
        Request::UpdateSheetProperties(UpdateSheetPropertiesRequest {
            properties,
            fields: fields.to_string(),
        })
    }

    pub fn change_name_request(&self, new_name: &str) -> Request {
        self.update_properties_request(
            SheetProperties {
                sheet_id: Some(self.sheet_id()),
                title: Some(new_name.to_string()),
                ..Default::default()
            },
            "title",
        )
    }

    pub fn change_name(&mut self, new_name: &str) -> Result<()> {
        let request = self.change_name_request(new_name);
        self.send(vec![request])
    }

    /// Request setting the row and/or column count. Only the given
    /// dimensions appear in the field mask.
    pub fn resize_request(&self, rows: Option<u32>, cols: Option<u32>) -> Request {
        let mut fields = Vec::new();
        if rows.is_some() {
            fields.push("gridProperties.rowCount");
        }
        if cols.is_some() {
            fields.push("gridProperties.columnCount");
        }

        self.update_properties_request(
            SheetProperties {
                sheet_id: Some(self.sheet_id()),
                grid_properties: Some(GridProperties {
                    row_count: rows,
                    column_count: cols,
                }),
                ..Default::default()
            },
            &fields.join(","),
        )
    }

    /// Set the row and/or column count. Does nothing when both are `None`.
    pub fn resize(&mut self, rows: Option<u32>, cols: Option<u32>) -> Result<()> {
        if rows.is_none() && cols.is_none() {
            return Ok(());
        }
        let request = self.resize_request(rows, cols);
        self.send(vec![request])
    }

    pub fn append_request(&self, dimension: Dimension, length: u32) -> Request {
        Request::AppendDimension(AppendDimensionRequest {
            sheet_id: self.sheet_id(),
            dimension,
            length,
        })
    }

    /// Append empty rows and/or columns at the end of the sheet.
    pub fn append(&mut self, rows: Option<u32>, cols: Option<u32>) -> Result<()> {
        let mut requests = Vec::new();
        if let Some(rows) = rows {
            requests.push(self.append_request(Dimension::Rows, rows));
        }
        if let Some(cols) = cols {
            requests.push(self.append_request(Dimension::Columns, cols));
        }
        self.send(requests)
    }

    /// Request inserting `length` empty rows or columns at `start_index`.
    ///
    /// Nothing precedes index 0, so `inherit_before` is dropped there.
    pub fn insert_request(
        &self,
        dimension: Dimension,
        start_index: u32,
        length: u32,
        inherit_before: bool,
    ) -> Request {
        Request::InsertDimension(InsertDimensionRequest {
            range: DimensionRange {
                sheet_id: self.sheet_id(),
                dimension,
                start_index: u64::from(start_index),
                end_index: u64::from(start_index) + u64::from(length),
            },
            inherit_from_before: inherit_before && start_index != 0,
        })
    }

    /// Insert empty rows at `row_start` and/or columns at `col_start`.
    pub fn insert(
        &mut self,
        rows: Option<u32>,
        row_start: u32,
        cols: Option<u32>,
        col_start: u32,
        inherit_before: bool,
    ) -> Result<()> {
        let mut requests = Vec::new();
        if let Some(rows) = rows {
            requests.push(self.insert_request(Dimension::Rows, row_start, rows, inherit_before));
        }
        if let Some(cols) = cols {
            requests.push(self.insert_request(Dimension::Columns, col_start, cols, inherit_before));
        }
        self.send(requests)
    }

    /// A format that sets only the number format.
    pub fn number_format(&self, format_type: NumberFormatType, pattern: Option<&str>) -> CellFormat {
        CellFormat::number(NumberFormat {
            format_type,
            pattern: pattern.map(str::to_string),
        })
    }

    /// A format that sets only the text format. Unset text fields stay untouched.
    pub fn text_format(&self, text: TextFormat) -> CellFormat {
        CellFormat::text(text)
    }

    /// Request applying `format` to every cell within `bounds`.
    ///
    /// Without explicit `fields`, the mask covers exactly the parts of
    /// `format` that are set.
    pub fn format_range_request(
        &self,
        format: CellFormat,
        bounds: GridBounds,
        fields: Option<&str>,
    ) -> Request {
        let fields = fields
            .map(str::to_string)
            .unwrap_or_else(|| format.field_mask());

        Request::RepeatCell(RepeatCellRequest {
            range: GridRange {
                sheet_id: self.sheet_id(),
                start_row_index: bounds.start_row,
                end_row_index: bounds.end_row,
                start_column_index: bounds.start_col,
                end_column_index: bounds.end_col,
            },
            cell: CellData {
                user_entered_format: format,
            },
            fields,
        })
    }

    /// Apply a number format to the cells within `bounds`.
    pub fn format_number(
        &mut self,
        bounds: GridBounds,
        format_type: NumberFormatType,
        pattern: Option<&str>,
    ) -> Result<()> {
        let format = self.number_format(format_type, pattern);
        let request = self.format_range_request(format, bounds, None);
        self.send(vec![request])
    }

    /// Apply `format` to an A1 range such as `"B2:D10"`.
    pub fn format_range(&mut self, range: &str, format: CellFormat) -> Result<()> {
        let bounds = GridBounds::from(CellRange::parse(range)?.to_grid_indices());
        let request = self.format_range_request(format, bounds, None);
        self.send(vec![request])
    }

    /// Build the payload for writing `values` at `range_start[:range_end]`
    /// on this sheet, for use with [`Sheet::batch_update_values`].
    ///
    /// Returns `None` when there is nothing to write.
    pub fn update_values_data(
        &self,
        range_start: &str,
        range_end: Option<&str>,
        values: Vec<Vec<CellValue>>,
        major_dimension: Dimension,
    ) -> Result<Option<ValueRange>> {
        let start = CellAddress::parse(range_start)?;
        let range = match range_end {
            Some(end) => start.to(CellAddress::parse(end)?),
            None => CellRange::single(start),
        };

        if values.is_empty() {
            return Ok(None);
        }

        Ok(Some(ValueRange {
            range: RangeName::new(self.name(), range).to_string(),
            major_dimension,
            values,
        }))
    }

    /// Write one block of values.
    ///
    /// Returns `None`, without calling the service, when `values` is empty.
    pub fn update_values(
        &mut self,
        range_start: &str,
        range_end: Option<&str>,
        values: Vec<Vec<CellValue>>,
        value_input_option: ValueInputOption,
        major_dimension: Dimension,
    ) -> Result<Option<UpdateValuesResponse>> {
        let Some(data) = self.update_values_data(range_start, range_end, values, major_dimension)?
        else {
            return Ok(None);
        };

        let response = self.client.values_update(
            &self.spreadsheet_id,
            &data.range,
            data.values,
            value_input_option,
            data.major_dimension,
        )?;
        self.refresh()?;
        Ok(Some(response))
    }

    /// Write several blocks built with [`Sheet::update_values_data`].
    pub fn batch_update_values(
        &mut self,
        data: Vec<ValueRange>,
        value_input_option: ValueInputOption,
    ) -> Result<BatchUpdateValuesResponse> {
        let response = self
            .client
            .values_batch_update(&self.spreadsheet_id, data, value_input_option)?;
        self.refresh()?;
        Ok(response)
    }
}

impl<S> std::fmt::Debug for Sheet<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sheet")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("details", &self.details)
            .finish_non_exhaustive()
    }
}
