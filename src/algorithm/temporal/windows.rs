//! Time steps and window generation
//!
//! Windows are contiguous and half-open: `[start + k units, start + (k+1) units)`.
//! Each window boundary is computed from the overall start, so month-end
//! clamping never drifts across steps.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, ensure_date_range};

/// Unit of one aggregation step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStep {
    /// One calendar day
    Days,
    /// One calendar month
    #[default]
    Months,
    /// One calendar year
    Years,
}

impl TimeStep {
    /// Move `date` forward by `n` units
    ///
    /// Returns `None` past the representable date range.
    #[must_use]
    pub fn advance(self, date: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self {
            Self::Days => date.checked_add_days(Days::new(u64::from(n))),
            Self::Months => date.checked_add_months(Months::new(n)),
            Self::Years => date.checked_add_months(Months::new(n.checked_mul(12)?)),
        }
    }

    /// Number of whole units that fit between `start` and `end`
    #[must_use]
    pub fn units_between(self, start: NaiveDate, end: NaiveDate) -> u32 {
        if end <= start {
            return 0;
        }
        match self {
            Self::Days => u32::try_from((end - start).num_days()).unwrap_or(u32::MAX),
            Self::Months => whole_months(start, end),
            Self::Years => whole_months(start, end) / 12,
        }
    }
}

fn whole_months(start: NaiveDate, end: NaiveDate) -> u32 {
    use chrono::Datelike;

    let span = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    let mut months = u32::try_from(span.max(0)).unwrap_or(0);
    // A partial last month does not count
    while months > 0 && TimeStep::Months.advance(start, months).is_none_or(|d| d > end) {
        months -= 1;
    }
    months
}

impl fmt::Display for TimeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days => f.write_str("days"),
            Self::Months => f.write_str("months"),
            Self::Years => f.write_str("years"),
        }
    }
}

impl FromStr for TimeStep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "days" | "day" => Ok(Self::Days),
            "months" | "month" => Ok(Self::Months),
            "years" | "year" => Ok(Self::Years),
            _ => Err(Error::InvalidTimestepUnit(s.to_string())),
        }
    }
}

/// How many windows a range is split into
///
/// `HistoricalShortByOne` reproduces established results, which stop one step
/// before tiling the whole range: a range of exactly three months yields two
/// monthly windows. `FullTiling` yields every whole step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepCountPolicy {
    /// `floor(interval / unit) - 1` windows
    #[default]
    HistoricalShortByOne,
    /// `floor(interval / unit)` windows
    FullTiling,
}

impl StepCountPolicy {
    /// Number of windows for a range holding `units` whole steps
    #[must_use]
    pub fn step_count(self, units: u32) -> u32 {
        match self {
            Self::HistoricalShortByOne => units.saturating_sub(1),
            Self::FullTiling => units,
        }
    }
}

/// A half-open time window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// First day in the window
    pub start: NaiveDate,
    /// First day after the window
    pub end: NaiveDate,
}

/// Split `[start, end]` into sequential windows of one `step` each
///
/// # Errors
/// Returns [`Error::InvalidDateRange`] if `start` is after `end`
pub fn time_windows(
    start: NaiveDate,
    end: NaiveDate,
    step: TimeStep,
    policy: StepCountPolicy,
) -> Result<Vec<TimeWindow>> {
    ensure_date_range(start, end)?;
    let count = policy.step_count(step.units_between(start, end));

    (0..count)
        .map(|k| {
            let bounds = step.advance(start, k).zip(step.advance(start, k + 1));
            bounds
                .map(|(start, end)| TimeWindow { start, end })
                .ok_or_else(|| {
                    Error::Validation(format!("window {k} after {start} is out of range"))
                })
        })
        .collect()
}
