//! Temporal affiliation networks over Arrow tables.
//!
//! Members connect when they share an affiliation (an organization, an
//! event, or any combination of grouping columns) during a time window.
//! The crate builds those windowed edge lists and summarises each member's
//! position with degree, betweenness centrality, z-scores and ranks.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod filter;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::NetworkConfig;
pub use error::{Error, Result};
pub use filter::PersistenceMode;
pub use schema::{AffiliationRecord, SchemaCompatibilityReport, SchemaIssue, records_to_batch};

// Arrow types
pub use arrow::record_batch::RecordBatch;

// Network construction and metrics
pub use algorithm::network::{
    Edge, EdgeList, GroupingKey, MemberGrouping, MetricsRow, build_edgelist, key_set,
};

// Windowed aggregation
pub use algorithm::temporal::{
    StepCountPolicy, TemporalAggregator, TimeStep, compute_all_metrics, compute_window_metrics,
};
