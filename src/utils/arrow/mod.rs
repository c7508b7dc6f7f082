//! Arrow data handling utilities
//!
//! Helpers for locating columns in affiliation tables and pulling their
//! values out as plain Rust vectors with consistent null handling.

pub mod array_utils;
pub mod extractors;

pub use array_utils::{downcast_array, get_column, get_column_index};
pub use extractors::{date_values, float_values, string_values};
