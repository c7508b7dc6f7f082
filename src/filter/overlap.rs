//! Interval overlap filtering for affiliation records
//!
//! A record is active in the query window `[start, end)` when
//! `record.start <= window.end` and `record.end >= window.start`, where the
//! record's end date is first adjusted by the [`PersistenceMode`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use arrow::array::BooleanArray;
use arrow::record_batch::RecordBatch;
use chrono::{Months, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::NetworkConfig;
use crate::error::{Error, Result, ensure_date_range};
use crate::filter::core::{BatchFilter, filter_record_batch};
use crate::schema::{END_DATE, ORG_TYPE, START_DATE};
use crate::utils::{date_values, string_values};

/// How long an affiliation keeps two members connected after it ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersistenceMode {
    /// Use the recorded end date
    #[default]
    None,
    /// Event-type affiliations linger for a configured number of months
    EventsOnly,
    /// Every affiliation is lifelong once started
    All,
}

impl PersistenceMode {
    /// Canonical string form
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::EventsOnly => "events-only",
            Self::All => "all",
        }
    }
}

impl fmt::Display for PersistenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersistenceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "events-only" | "events_only" | "events" => Ok(Self::EventsOnly),
            "all" => Ok(Self::All),
            other => Err(Error::InvalidPersistenceMode(other.to_string())),
        }
    }
}

/// Selects the affiliation records active in a query window
#[derive(Debug, Clone)]
pub struct IntervalOverlapFilter {
    window_start: NaiveDate,
    window_end: NaiveDate,
    persistence: PersistenceMode,
    linger_months: u32,
    event_type_column: String,
    event_type_value: String,
}

impl IntervalOverlapFilter {
    /// Create a filter for the window `[start, end)` with no persistence
    ///
    /// # Errors
    /// Returns [`Error::InvalidDateRange`] if `start` is after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        ensure_date_range(start, end)?;
        Ok(Self {
            window_start: start,
            window_end: end,
            persistence: PersistenceMode::None,
            linger_months: 0,
            event_type_column: ORG_TYPE.to_string(),
            event_type_value: "event".to_string(),
        })
    }

    /// Create a filter taking persistence settings from a configuration
    pub fn from_config(start: NaiveDate, end: NaiveDate, config: &NetworkConfig) -> Result<Self> {
        Ok(Self::new(start, end)?
            .with_persistence(config.persistence)
            .with_linger_months(config.event_linger_months)
            .with_event_type(&config.event_type_column, &config.event_type_value))
    }

    /// Set the persistence mode
    #[must_use]
    pub fn with_persistence(mut self, persistence: PersistenceMode) -> Self {
        self.persistence = persistence;
        self
    }

    /// Set how many months event-type affiliations linger past their end
    #[must_use]
    pub fn with_linger_months(mut self, months: u32) -> Self {
        self.linger_months = months;
        self
    }

    /// Set the column and value that identify event-type affiliations
    #[must_use]
    pub fn with_event_type(mut self, column: &str, value: &str) -> Self {
        self.event_type_column = column.to_string();
        self.event_type_value = value.to_string();
        self
    }

    /// The end date used for the overlap test
    ///
    /// Null ends are open-ended in every mode.
    fn effective_end(&self, end: Option<NaiveDate>, is_event: bool) -> NaiveDate {
        let Some(end) = end else {
            return NaiveDate::MAX;
        };

        match self.persistence {
            PersistenceMode::None => end,
            PersistenceMode::All => NaiveDate::MAX,
            PersistenceMode::EventsOnly if is_event => end
                .checked_add_months(Months::new(self.linger_months))
                .unwrap_or(NaiveDate::MAX),
            PersistenceMode::EventsOnly => end,
        }
    }

    fn event_flags(&self, batch: &RecordBatch) -> Result<Vec<bool>> {
        if self.persistence != PersistenceMode::EventsOnly {
            return Ok(vec![false; batch.num_rows()]);
        }

        Ok(string_values(batch, &self.event_type_column)?
            .into_iter()
            .map(|value| {
                value.is_some_and(|v| v.trim().eq_ignore_ascii_case(&self.event_type_value))
            })
            .collect())
    }

    /// Compute the overlap mask for a batch without applying it
    pub fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        let starts = date_values(batch, START_DATE)?;
        let ends = date_values(batch, END_DATE)?;
        let events = self.event_flags(batch)?;

        let mask = starts
            .iter()
            .zip(&ends)
            .zip(&events)
            .map(|((start, end), &is_event)| {
                // Null start dates are open at the beginning of time
                let starts_before_end = start.is_none_or(|s| s <= self.window_end);
                starts_before_end && self.effective_end(*end, is_event) >= self.window_start
            })
            .collect::<Vec<bool>>();

        Ok(BooleanArray::from(mask))
    }
}

impl BatchFilter for IntervalOverlapFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = self.mask(batch)?;
        let filtered = filter_record_batch(batch, &mask)?;
        debug!(
            "{} of {} affiliations active in [{}, {}) with persistence {}",
            filtered.num_rows(),
            batch.num_rows(),
            self.window_start,
            self.window_end,
            self.persistence
        );
        Ok(filtered)
    }

    fn required_columns(&self) -> HashSet<String> {
        let mut cols = HashSet::new();
        cols.insert(START_DATE.to_string());
        cols.insert(END_DATE.to_string());
        if self.persistence == PersistenceMode::EventsOnly {
            cols.insert(self.event_type_column.clone());
        }
        cols
    }
}

/// Restrict an affiliation table to records active in `[start, end)`
///
/// # Errors
/// Returns [`Error::InvalidDateRange`] if `start` is after `end`, or a column
/// error if the date (or, for events-only persistence, type) columns are
/// unusable.
pub fn filter_active_affiliations(
    affiliations: &RecordBatch,
    start: NaiveDate,
    end: NaiveDate,
    config: &NetworkConfig,
) -> Result<RecordBatch> {
    IntervalOverlapFilter::from_config(start, end, config)?.filter(affiliations)
}
