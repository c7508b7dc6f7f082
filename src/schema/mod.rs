//! Affiliation table schema and validation.
//!
//! The pipeline reads affiliation records from an Arrow `RecordBatch` whose
//! canonical columns are named by the constants below. Grouping keys, weights
//! and other domain columns are looked up by name at call time.

pub mod affiliation;

use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};

pub use affiliation::{AffiliationRecord, affiliation_schema, records_to_batch, with_string_column};

/// Member identifier column
pub const MEMBER_ID: &str = "Member.ID";
/// Organization identifier column, the default grouping key
pub const ORG_ID: &str = "Org.ID";
/// Affiliation start date column
pub const START_DATE: &str = "Start.Date";
/// Affiliation end date column (nullable, null means open-ended)
pub const END_DATE: &str = "End.Date";
/// Affiliation type column used to recognise event-type records
pub const ORG_TYPE: &str = "Org.Type";
/// Default weight column name used by [`AffiliationRecord`]
pub const WEIGHT: &str = "Weight";

/// Result of checking a table against the affiliation schema
#[derive(Debug, Default)]
pub struct SchemaCompatibilityReport {
    /// Whether the table can be processed
    pub compatible: bool,
    /// List of problems found, if any
    pub issues: Vec<SchemaIssue>,
}

/// A single schema problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// The column the problem concerns
    pub column: String,
    /// Description of the problem
    pub description: String,
}

fn is_string_type(data_type: &DataType) -> bool {
    matches!(data_type, DataType::Utf8 | DataType::LargeUtf8)
}

fn is_date_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _)
    ) || is_string_type(data_type)
}

/// Check a table against the affiliation schema
///
/// `Member.ID` must be a string column; `Start.Date` and `End.Date` must be
/// dates or ISO date strings. Grouping and weight columns are checked by the
/// operations that use them.
#[must_use]
pub fn check_affiliation_schema(batch: &RecordBatch) -> SchemaCompatibilityReport {
    let schema = batch.schema();
    let mut issues = Vec::new();

    let required: [(&str, fn(&DataType) -> bool, &str); 3] = [
        (MEMBER_ID, is_string_type, "a string column"),
        (START_DATE, is_date_type, "a date column"),
        (END_DATE, is_date_type, "a date column"),
    ];

    for (column, accepts, expected) in required {
        match schema.field_with_name(column) {
            Ok(field) if accepts(field.data_type()) => {}
            Ok(field) => issues.push(SchemaIssue {
                column: column.to_string(),
                description: format!("expected {expected}, found {}", field.data_type()),
            }),
            Err(_) => issues.push(SchemaIssue {
                column: column.to_string(),
                description: "column is missing".to_string(),
            }),
        }
    }

    SchemaCompatibilityReport {
        compatible: issues.is_empty(),
        issues,
    }
}

/// Validate a table against the affiliation schema, failing on the first issue
pub fn validate_affiliations(batch: &RecordBatch) -> Result<()> {
    let report = check_affiliation_schema(batch);
    match report.issues.into_iter().next() {
        None => Ok(()),
        Some(issue) => Err(Error::Validation(format!(
            "column '{}': {}",
            issue.column, issue.description
        ))),
    }
}
