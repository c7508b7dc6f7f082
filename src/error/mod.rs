//! Error handling for the affiliation network pipeline.

use arrow::error::ArrowError;
use chrono::NaiveDate;

/// Errors that can occur while building edge lists or computing metrics
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The query window starts after it ends
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Window start
        start: NaiveDate,
        /// Window end
        end: NaiveDate,
    },

    /// The requested time step unit is not one of days, months or years
    #[error("Invalid timestep unit '{0}', expected one of: days, months, years")]
    InvalidTimestepUnit(String),

    /// The requested persistence mode is not recognised
    #[error("Invalid persistence mode '{0}', expected one of: none, events-only, all")]
    InvalidPersistenceMode(String),

    /// A date string could not be parsed
    #[error("Date parsing error: {0}")]
    DateParse(String),

    /// A column required by the operation is missing from the table
    #[error("Column '{column}' not found")]
    ColumnNotFound {
        /// Name of the missing column
        column: String,
    },

    /// A column exists but holds an unsupported data type
    #[error("Column '{column}' is not a {expected} array")]
    ColumnType {
        /// Name of the column
        column: String,
        /// Description of the expected type
        expected: String,
    },

    /// The affiliation table failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Conversion between records and record batches failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a column-not-found error
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Create a column type error
    pub fn column_type(column: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::ColumnType {
            column: column.into(),
            expected: expected.into(),
        }
    }
}

impl From<serde_arrow::Error> for Error {
    fn from(error: serde_arrow::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type for affiliation network operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::InvalidDateRange`] when `start` is after `end`
pub fn ensure_date_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(Error::InvalidDateRange { start, end });
    }
    Ok(())
}
