//! Conversion of edge lists and metrics rows to Arrow record batches

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::RecordBatch;

use crate::algorithm::network::edges::EdgeList;
use crate::algorithm::network::metrics::MetricsRow;
use crate::error::Result;

/// Schema of the longitudinal metrics table
#[must_use]
pub fn metrics_schema() -> Schema {
    Schema::new(vec![
        Field::new("Member.ID", DataType::Utf8, false),
        Field::new("Centrality", DataType::Float64, true),
        Field::new("Degree", DataType::Float64, true),
        Field::new("Centrality.Normalized", DataType::Float64, true),
        Field::new("Degree.Normalized", DataType::Float64, true),
        Field::new("Centrality.Rank", DataType::UInt32, true),
        Field::new("Degree.Rank", DataType::UInt32, true),
        Field::new("Cross.Degree", DataType::Float64, true),
        Field::new("Start.Date", DataType::Date32, false),
        Field::new("End.Date", DataType::Date32, false),
    ])
}

/// Schema of an exported edge list
#[must_use]
pub fn edges_schema() -> Schema {
    Schema::new(vec![
        Field::new("from", DataType::Utf8, false),
        Field::new("to", DataType::Utf8, false),
        Field::new("weight", DataType::Float64, false),
        Field::new(
            "labels",
            DataType::List(Arc::new(Field::new("element", DataType::Utf8, false))),
            false,
        ),
        Field::new("key_set", DataType::UInt64, false),
    ])
}

fn fields(schema: &Schema) -> Vec<FieldRef> {
    schema.fields().iter().map(Arc::clone).collect()
}

/// Convert metrics rows into a record batch
pub fn metrics_to_record_batch(rows: &[MetricsRow]) -> Result<RecordBatch> {
    Ok(serde_arrow::to_record_batch(&fields(&metrics_schema()), &rows)?)
}

/// Convert an edge list into a record batch
///
/// The empty-graph marker becomes a batch with no rows.
pub fn edges_to_record_batch(edges: &EdgeList) -> Result<RecordBatch> {
    Ok(serde_arrow::to_record_batch(
        &fields(&edges_schema()),
        &edges.edges(),
    )?)
}
