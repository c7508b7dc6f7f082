//! Logging utilities
//!
//! This module provides standardized logging functions for operations.

use std::time::Duration;

use chrono::NaiveDate;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `start` - Start of the date range being processed
/// * `end` - End of the date range being processed
pub fn log_operation_start(operation: &str, start: NaiveDate, end: NaiveDate) {
    log::info!("{operation} for {start} to {end}");
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `items` - Number of items produced
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(operation: &str, items: usize, elapsed: Option<Duration>) {
    if let Some(duration) = elapsed {
        log::info!("Successfully {operation}: {items} rows in {duration:?}");
    } else {
        log::info!("Successfully {operation}: {items} rows");
    }
}

/// Log an operation warning with consistent format
///
/// # Arguments
/// * `message` - Warning message
/// * `column` - Optional column related to the warning
pub fn log_warning(message: &str, column: Option<&str>) {
    if let Some(column) = column {
        log::warn!("{message}: column '{column}'");
    } else {
        log::warn!("{message}");
    }
}
