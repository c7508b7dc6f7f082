//! Affiliation records and their Arrow representation

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{END_DATE, MEMBER_ID, ORG_ID, ORG_TYPE, START_DATE, WEIGHT};

/// One member's affiliation with one organization or event over an interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliationRecord {
    /// Member identifier
    #[serde(rename = "Member.ID")]
    pub member_id: String,
    /// Organization identifier
    #[serde(rename = "Org.ID")]
    pub org_id: String,
    /// First day of the affiliation
    #[serde(rename = "Start.Date")]
    pub start_date: NaiveDate,
    /// Last day of the affiliation, `None` if still active
    #[serde(rename = "End.Date")]
    pub end_date: Option<NaiveDate>,
    /// Affiliation type, e.g. `"event"`
    #[serde(rename = "Org.Type")]
    pub org_type: Option<String>,
    /// Optional tie strength
    #[serde(rename = "Weight")]
    pub weight: Option<f64>,
}

impl AffiliationRecord {
    /// Create a record with no type and no weight
    pub fn new(
        member_id: impl Into<String>,
        org_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            org_id: org_id.into(),
            start_date,
            end_date,
            org_type: None,
            weight: None,
        }
    }

    /// Set the affiliation type
    #[must_use]
    pub fn with_type(mut self, org_type: impl Into<String>) -> Self {
        self.org_type = Some(org_type.into());
        self
    }

    /// Set the weight
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// The Arrow schema produced by [`records_to_batch`]
#[must_use]
pub fn affiliation_schema() -> Schema {
    Schema::new(vec![
        Field::new(MEMBER_ID, DataType::Utf8, false),
        Field::new(ORG_ID, DataType::Utf8, false),
        Field::new(START_DATE, DataType::Date32, false),
        Field::new(END_DATE, DataType::Date32, true),
        Field::new(ORG_TYPE, DataType::Utf8, true),
        Field::new(WEIGHT, DataType::Float64, true),
    ])
}

/// Convert affiliation records into a record batch
pub fn records_to_batch(records: &[AffiliationRecord]) -> Result<RecordBatch> {
    // Use the predefined schema so dates land in Date32 columns
    let fields: Vec<FieldRef> = affiliation_schema()
        .fields()
        .iter()
        .map(Arc::clone)
        .collect();

    Ok(serde_arrow::to_record_batch(&fields, &records)?)
}

/// Append a string column to a record batch
///
/// Used to attach domain columns such as umbrella/subgroup keys to a table
/// built from [`AffiliationRecord`]s.
pub fn with_string_column<S: AsRef<str>>(
    batch: &RecordBatch,
    name: &str,
    values: &[Option<S>],
) -> Result<RecordBatch> {
    if values.len() != batch.num_rows() {
        return Err(Error::Validation(format!(
            "column '{name}' has {} values but the table has {} rows",
            values.len(),
            batch.num_rows()
        )));
    }

    let array = StringArray::from(
        values
            .iter()
            .map(|value| value.as_ref().map(AsRef::as_ref))
            .collect::<Vec<Option<&str>>>(),
    );

    let schema = batch.schema();
    let mut fields = schema.fields().to_vec();
    fields.push(Arc::new(Field::new(name, DataType::Utf8, true)));

    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    columns.push(Arc::new(array));

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
