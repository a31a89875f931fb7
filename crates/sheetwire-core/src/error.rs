//! Error types for sheetwire-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetwire-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A cell label or coordinate pair that cannot be converted.
    ///
    /// Carries the offending input: the label text, or `"(row, col)"`.
    #[error("Incorrect cell label: {0}")]
    IncorrectCellLabel(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Coordinate does not fit the supported index space
    #[error("Coordinate {0} out of bounds (max: {max})", max = u32::MAX)]
    CoordinateOutOfBounds(u64),
}

impl Error {
    pub(crate) fn label<S: Into<String>>(input: S) -> Self {
        Error::IncorrectCellLabel(input.into())
    }
}
