//! Entry point: opens spreadsheets and forwards raw calls to the service.

use sheetwire_protocol::{
    BatchUpdateRequest, BatchUpdateResponse, BatchUpdateValuesRequest, BatchUpdateValuesResponse,
    CellValue, Dimension, Request, SpreadsheetDetails, UpdateValuesResponse, ValueInputOption,
    ValueRange,
};

use crate::error::Result;
use crate::service::SheetsService;
use crate::spreadsheet::Spreadsheet;

/// Talks to the spreadsheet service through a [`SheetsService`].
pub struct Client<S> {
    service: S,
}

impl<S: SheetsService> Client<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Open a spreadsheet by the id that appears in its URL.
    pub fn open(&self, file_id: &str) -> Result<Spreadsheet<'_, S>> {
        let details = self.fetch(file_id)?;
        Ok(Spreadsheet::new(self, details))
    }

    pub(crate) fn fetch(&self, file_id: &str) -> Result<SpreadsheetDetails> {
        tracing::debug!(file_id, "fetching spreadsheet");
        Ok(self.service.get_spreadsheet(file_id)?)
    }

    /// Send a list of structural update requests in one batch.
    pub fn update(&self, file_id: &str, requests: Vec<Request>) -> Result<BatchUpdateResponse> {
        tracing::debug!(file_id, count = requests.len(), "batch update");
        let body = BatchUpdateRequest { requests };
        Ok(self.service.batch_update(file_id, &body)?)
    }

    /// Write a block of values to a single A1 range.
    pub fn values_update(
        &self,
        file_id: &str,
        range: &str,
        values: Vec<Vec<CellValue>>,
        value_input_option: ValueInputOption,
        major_dimension: Dimension,
    ) -> Result<UpdateValuesResponse> {
        tracing::debug!(file_id, range, "values update");
        let body = ValueRange {
            range: range.to_string(),
            major_dimension,
            values,
        };
        Ok(self
            .service
            .values_update(file_id, range, value_input_option, &body)?)
    }

    /// Write several value blocks in one call.
    pub fn values_batch_update(
        &self,
        file_id: &str,
        data: Vec<ValueRange>,
        value_input_option: ValueInputOption,
    ) -> Result<BatchUpdateValuesResponse> {
        tracing::debug!(file_id, ranges = data.len(), "values batch update");
        let body = BatchUpdateValuesRequest {
            value_input_option,
            data,
        };
        Ok(self.service.values_batch_update(file_id, &body)?)
    }
}
