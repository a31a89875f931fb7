//! Error types for the sheetwire client

use thiserror::Error;

use crate::service::ServiceError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`Client`](crate::Client), [`Spreadsheet`](crate::Spreadsheet)
/// and [`Sheet`](crate::Sheet).
#[derive(Debug, Error)]
pub enum Error {
    /// The spreadsheet does not exist.
    #[error("404: {0}")]
    NotFound(String),

    /// The spreadsheet exists but the caller may not access it.
    #[error("403: {0}")]
    PermissionDenied(String),

    /// The service rejected the request payload.
    #[error("400: {0}")]
    BadRequest(String),

    /// Any other non-success status from the service.
    #[error("{status}: {message}")]
    Api { status: u16, message: String },

    /// A cell label or range could not be converted.
    #[error(transparent)]
    Cell(#[from] sheetwire_core::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request never produced an HTTP status (connection, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// HTTP-style status for this error, where one applies.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::NotFound(_) | Error::SheetNotFound(_) => Some(404),
            Error::PermissionDenied(_) => Some(403),
            Error::BadRequest(_) | Error::Cell(_) => Some(400),
            Error::Api { status, .. } => Some(*status),
            Error::Json(_) | Error::Transport(_) | Error::UnexpectedResponse(_) => None,
        }
    }
}

impl From<ServiceError> for Error {
    fn from(err: ServiceError) -> Self {
        match err.status {
            0 => Error::Transport(err.message),
            400 => Error::BadRequest(err.message),
            403 => Error::PermissionDenied(err.message),
            404 => Error::NotFound(err.message),
            status => Error::Api {
                status,
                message: err.message,
            },
        }
    }
}
