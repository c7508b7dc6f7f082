//! Utility functions shared across the pipeline
//!
//! Column access helpers for Arrow record batches, date parsing and
//! arithmetic, and logging/progress helpers.

pub mod arrow;
pub mod dates;
pub mod logging;

pub use self::arrow::{date_values, float_values, string_values};
pub use dates::{DATE_FORMAT, parse_date};
