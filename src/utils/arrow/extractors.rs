//! Field extraction utilities for Arrow record batches
//!
//! Each extractor reads a whole column into a `Vec<Option<T>>`, one entry per
//! row, with nulls mapped to `None`.

use arrow::array::{Array, Date32Array, Float64Array, LargeStringArray, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::utils::arrow::array_utils::{downcast_array, get_column, get_column_index};
use crate::utils::dates::{from_date32, parse_date};

/// Extract a column as strings
///
/// Non-string columns are cast to `Utf8`, so integer or date keys can be used
/// as grouping columns. Empty strings are kept as values.
pub fn string_values(batch: &RecordBatch, column_name: &str) -> Result<Vec<Option<String>>> {
    let array = get_column(batch, column_name, &DataType::Utf8)?;
    let strings = downcast_array::<StringArray>(&array, column_name, "String")?;

    Ok((0..strings.len())
        .map(|row| (!strings.is_null(row)).then(|| strings.value(row).to_string()))
        .collect())
}

/// Extract a column as floating point values
///
/// Any numeric column is accepted and cast to `Float64`.
pub fn float_values(batch: &RecordBatch, column_name: &str) -> Result<Vec<Option<f64>>> {
    let idx = get_column_index(batch, column_name)?;
    if !batch.column(idx).data_type().is_numeric() {
        return Err(Error::column_type(column_name, "numeric"));
    }

    let array = get_column(batch, column_name, &DataType::Float64)?;
    let floats = downcast_array::<Float64Array>(&array, column_name, "Float64")?;

    Ok(floats.iter().collect())
}

/// Extract a column as dates
///
/// `Date32` columns are read directly, `Utf8`/`LargeUtf8` columns are parsed as
/// ISO 8601 dates, and other temporal types are cast to `Date32` first.
///
/// # Errors
///
/// Returns an error if the column is missing, holds a non-temporal type, or
/// contains a string that is not a valid date or a day outside chrono's range.
pub fn date_values(batch: &RecordBatch, column_name: &str) -> Result<Vec<Option<NaiveDate>>> {
    let idx = get_column_index(batch, column_name)?;
    let column = batch.column(idx);

    match column.data_type() {
        DataType::Utf8 => {
            let strings = downcast_array::<StringArray>(column, column_name, "String")?;
            strings
                .iter()
                .map(|value| value.map(parse_date).transpose())
                .collect()
        }
        DataType::LargeUtf8 => {
            let strings = downcast_array::<LargeStringArray>(column, column_name, "LargeString")?;
            strings
                .iter()
                .map(|value| value.map(parse_date).transpose())
                .collect()
        }
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            let array = get_column(batch, column_name, &DataType::Date32)?;
            let dates = downcast_array::<Date32Array>(&array, column_name, "Date32")?;
            dates
                .iter()
                .map(|days| {
                    days.map(|d| {
                        from_date32(d).ok_or_else(|| {
                            Error::DateParse(format!(
                                "column '{column_name}': day {d} is outside the supported range"
                            ))
                        })
                    })
                    .transpose()
                })
                .collect()
        }
        _ => Err(Error::column_type(column_name, "Date32 or ISO date string")),
    }
}
