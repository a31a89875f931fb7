//! The seam between the object API and whatever talks to the remote service.

use std::sync::Arc;

use sheetwire_protocol::{
    BatchUpdateRequest, BatchUpdateResponse, BatchUpdateValuesRequest, BatchUpdateValuesResponse,
    SpreadsheetDetails, UpdateValuesResponse, ValueInputOption, ValueRange,
};

/// A failed service call.
///
/// `status` is the HTTP status of the response, or 0 when no response was
/// received at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ServiceError {
    pub status: u16,
    pub message: String,
}

impl ServiceError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(403, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(0, message)
    }
}

/// The four remote calls the client is built on.
pub trait SheetsService {
    /// `GET spreadsheets/{id}`
    fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<SpreadsheetDetails, ServiceError>;

    /// `POST spreadsheets/{id}:batchUpdate`
    fn batch_update(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateRequest,
    ) -> Result<BatchUpdateResponse, ServiceError>;

    /// `PUT spreadsheets/{id}/values/{range}`
    fn values_update(
        &self,
        spreadsheet_id: &str,
        range: &str,
        value_input_option: ValueInputOption,
        body: &ValueRange,
    ) -> Result<UpdateValuesResponse, ServiceError>;

    /// `POST spreadsheets/{id}/values:batchUpdate`
    fn values_batch_update(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateValuesRequest,
    ) -> Result<BatchUpdateValuesResponse, ServiceError>;
}

macro_rules! forward_service {
    ($ty:ty) => {
        impl<T: SheetsService + ?Sized> SheetsService for $ty {
            fn get_spreadsheet(
                &self,
                spreadsheet_id: &str,
            ) -> Result<SpreadsheetDetails, ServiceError> {
                (**self).get_spreadsheet(spreadsheet_id)
            }

            fn batch_update(
                &self,
                spreadsheet_id: &str,
                body: &BatchUpdateRequest,
            ) -> Result<BatchUpdateResponse, ServiceError> {
                (**self).batch_update(spreadsheet_id, body)
            }

            fn values_update(
                &self,
                spreadsheet_id: &str,
                range: &str,
                value_input_option: ValueInputOption,
                body: &ValueRange,
            ) -> Result<UpdateValuesResponse, ServiceError> {
                (**self).values_update(spreadsheet_id, range, value_input_option, body)
            }

            fn values_batch_update(
                &self,
                spreadsheet_id: &str,
                body: &BatchUpdateValuesRequest,
            ) -> Result<BatchUpdateValuesResponse, ServiceError> {
                (**self).values_batch_update(spreadsheet_id, body)
            }
        }
    };
}

forward_service!(&T);
forward_service!(Box<T>);
forward_service!(Arc<T>);
