//! Utilities for working with Arrow arrays.
//!
//! Column lookup and typed downcasting with errors that name the offending
//! column.

use arrow::array::{Array, ArrayRef};
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::{Error, Result};

/// Get the column index by name from a record batch
///
/// # Errors
/// Returns [`Error::ColumnNotFound`] if the column does not exist
pub fn get_column_index(batch: &RecordBatch, column_name: &str) -> Result<usize> {
    batch
        .schema()
        .index_of(column_name)
        .map_err(|_| Error::column_not_found(column_name))
}

/// Get a column from a record batch, cast to the expected data type
///
/// Columns that already have the expected type are returned as-is. Otherwise
/// Arrow's cast kernel is tried; a failed cast is reported as a column type
/// error rather than silently producing nulls.
///
/// # Arguments
///
/// * `batch` - The record batch containing the column
/// * `column_name` - The name of the column to extract
/// * `expected_type` - The data type the caller wants to read
pub fn get_column(
    batch: &RecordBatch,
    column_name: &str,
    expected_type: &DataType,
) -> Result<ArrayRef> {
    let idx = get_column_index(batch, column_name)?;
    let column = batch.column(idx);
    let actual_type = column.data_type();

    if actual_type == expected_type {
        return Ok(column.clone());
    }

    if !cast::can_cast_types(actual_type, expected_type) {
        return Err(Error::column_type(column_name, expected_type.to_string()));
    }

    debug!("Casting column '{column_name}' from {actual_type} to {expected_type}");
    cast::cast(column, expected_type)
        .map_err(|_| Error::column_type(column_name, expected_type.to_string()))
}

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `A` - The target array type to downcast to
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| Error::column_type(column_name, expected_type_name))
}
