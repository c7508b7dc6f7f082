//! Date parsing and conversion helpers
//!
//! Dates cross the public interface either as `chrono::NaiveDate` values or
//! as ISO 8601 strings; inside record batches they are stored as Arrow
//! `Date32` (days since the Unix epoch).

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};

/// The accepted date string format (ISO 8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days between 0001-01-01 (CE day 1) and 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Parse an ISO 8601 date string (`YYYY-MM-DD`)
///
/// Surrounding whitespace is ignored.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|e| Error::DateParse(format!("'{trimmed}' is not a YYYY-MM-DD date: {e}")))
}

/// Convert a date to its `Date32` representation
#[must_use]
pub fn to_date32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Convert a `Date32` value back to a date
///
/// Returns `None` when the value is outside chrono's representable range.
#[must_use]
pub fn from_date32(days: i32) -> Option<NaiveDate> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}
