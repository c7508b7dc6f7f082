//! Filtering capabilities for affiliation tables
//!
//! Filters select rows from an affiliation `RecordBatch` and return a new
//! batch with the same schema. The interval overlap filter decides which
//! affiliations are active within a query window.

pub mod core;
pub mod overlap;

pub use self::core::{BatchFilter, filter_record_batch};
pub use overlap::{IntervalOverlapFilter, PersistenceMode, filter_active_affiliations};
