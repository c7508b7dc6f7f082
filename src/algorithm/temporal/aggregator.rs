//! Longitudinal metrics over sequential time windows
//!
//! For every window the affiliation table is filtered, an edge list is
//! built and member metrics are computed; the rows of all windows are then
//! concatenated in window order.

use std::time::Instant;

use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;

use crate::algorithm::network::edges::{EdgeBuilder, KeySet};
use crate::algorithm::network::grouping::MemberGrouping;
use crate::algorithm::network::metrics::{MetricsEngine, MetricsRow};
use crate::algorithm::temporal::windows::{TimeStep, TimeWindow, time_windows};
use crate::config::NetworkConfig;
use crate::error::{Result, ensure_date_range};
use crate::filter::filter_active_affiliations;
use crate::schema::{END_DATE, MEMBER_ID, START_DATE, validate_affiliations};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};
use crate::utils::{date_values, string_values};

/// Callback receiving each window's start date once the window is computed
pub type ProgressCallback<'a> = Box<dyn Fn(NaiveDate) + Send + Sync + 'a>;

/// Computes metrics for a fixed member set over one or many windows
pub struct TemporalAggregator<'a> {
    affiliations: &'a RecordBatch,
    builder: EdgeBuilder,
    engine: MetricsEngine,
    config: NetworkConfig,
    progress: Option<ProgressCallback<'a>>,
}

impl<'a> TemporalAggregator<'a> {
    /// Create an aggregator over an affiliation table
    ///
    /// # Errors
    /// Returns an error if the table does not match the affiliation schema
    /// or no usable grouping key set is given.
    pub fn new(
        affiliations: &'a RecordBatch,
        on_cols: &[KeySet],
        weight_col: Option<&str>,
    ) -> Result<Self> {
        validate_affiliations(affiliations)?;
        let config = NetworkConfig::default();
        let builder = EdgeBuilder::new(on_cols)?
            .with_weight_column(weight_col)
            .with_edge_names(config.get_edge_names);
        let engine = MetricsEngine::new(builder.is_weighted());

        Ok(Self {
            affiliations,
            builder,
            engine,
            config,
            progress: None,
        })
    }

    /// Use persistence, naming, step and parallelism settings from `config`
    #[must_use]
    pub fn with_config(mut self, config: NetworkConfig) -> Self {
        self.builder = self.builder.with_edge_names(config.get_edge_names);
        self.config = config;
        self
    }

    /// Also compute cross-group degree for this member grouping
    #[must_use]
    pub fn with_grouping(mut self, grouping: MemberGrouping) -> Self {
        self.engine = self.engine.with_grouping(Some(grouping));
        self
    }

    /// Report each computed window's start date
    ///
    /// With parallel computation the callback may be invoked from several
    /// threads and out of window order.
    #[must_use]
    pub fn with_progress(mut self, progress: impl Fn(NaiveDate) + Send + Sync + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Metrics for `members` in the single window `[start, end)`
    pub fn window_metrics(
        &self,
        members: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MetricsRow>> {
        let active = filter_active_affiliations(self.affiliations, start, end, &self.config)?;
        let edges = self.builder.build(&active)?;
        debug!(
            "Window [{start}, {end}): {} active affiliations, {} edges{}",
            active.num_rows(),
            edges.len(),
            if edges.is_empty_graph() { " (empty graph)" } else { "" }
        );
        Ok(self.engine.compute(&edges, members, start, end))
    }

    fn window_with_progress(
        &self,
        members: &[String],
        window: &TimeWindow,
    ) -> Result<Vec<MetricsRow>> {
        let rows = self.window_metrics(members, window.start, window.end)?;
        if let Some(progress) = &self.progress {
            progress(window.start);
        }
        Ok(rows)
    }

    /// Every distinct member in the table, sorted
    pub fn all_members(&self) -> Result<Vec<String>> {
        Ok(string_values(self.affiliations, MEMBER_ID)?
            .into_iter()
            .flatten()
            .sorted()
            .dedup()
            .collect())
    }

    /// The table's overall date range
    ///
    /// Start is the earliest start date. End is the latest end date, or the
    /// latest start date when every end date is null. `None` for a table with
    /// no dated records.
    pub fn date_range(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let starts = date_values(self.affiliations, START_DATE)?;
        let ends = date_values(self.affiliations, END_DATE)?;

        let first = starts.iter().flatten().min().copied();
        let last = ends
            .iter()
            .flatten()
            .max()
            .or_else(|| starts.iter().flatten().max())
            .copied();

        Ok(first.zip(last))
    }

    /// Longitudinal metrics over every window of `[start, end]`
    ///
    /// Members default to every member in the table and the range defaults
    /// to [`Self::date_range`]. Every window has one row per member, in the
    /// order the members were given, and windows appear in time order.
    pub fn run(
        &self,
        members: Option<&[String]>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<MetricsRow>> {
        let members: Vec<String> = match members {
            Some(members) => members.iter().unique().cloned().collect(),
            None => self.all_members()?,
        };

        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            (start, end) => {
                let Some((first, last)) = self.date_range()? else {
                    log_warning("No dated affiliations to aggregate", Some(START_DATE));
                    return Ok(Vec::new());
                };
                (start.unwrap_or(first), end.unwrap_or(last))
            }
        };
        ensure_date_range(start, end)?;

        let windows = time_windows(start, end, self.config.timestep, self.config.step_policy)?;
        if windows.is_empty() {
            let step = self.config.timestep;
            log_warning(
                &format!("Range {start} to {end} holds no complete {step} window"),
                None,
            );
            return Ok(Vec::new());
        }

        log_operation_start("Computing windowed metrics", start, end);
        info!(
            "{} windows of one {} step for {} members",
            windows.len(),
            self.config.timestep,
            members.len()
        );
        let timer = Instant::now();

        let per_window: Vec<Vec<MetricsRow>> = if self.config.parallel {
            windows
                .par_iter()
                .map(|window| self.window_with_progress(&members, window))
                .collect::<Result<_>>()?
        } else {
            windows
                .iter()
                .map(|window| self.window_with_progress(&members, window))
                .collect::<Result<_>>()?
        };

        let rows: Vec<MetricsRow> = per_window.into_iter().flatten().collect();
        log_operation_complete("computed windowed metrics", rows.len(), Some(timer.elapsed()));
        Ok(rows)
    }
}

/// Metrics for `members` in the single window `[start, end)`
///
/// # Arguments
/// * `affiliations` - The full affiliation table
/// * `on_cols` - Grouping key sets
/// * `weight_col` - Optional numeric weight column; enables weighted metrics
/// * `members` - Members to report, in output order
/// * `start` - Window start (inclusive)
/// * `end` - Window end (exclusive)
pub fn compute_window_metrics(
    affiliations: &RecordBatch,
    on_cols: &[KeySet],
    weight_col: Option<&str>,
    members: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<MetricsRow>> {
    compute_window_metrics_with_config(
        affiliations,
        on_cols,
        weight_col,
        members,
        start,
        end,
        &NetworkConfig::default(),
    )
}

/// [`compute_window_metrics`] with explicit configuration
pub fn compute_window_metrics_with_config(
    affiliations: &RecordBatch,
    on_cols: &[KeySet],
    weight_col: Option<&str>,
    members: &[String],
    start: NaiveDate,
    end: NaiveDate,
    config: &NetworkConfig,
) -> Result<Vec<MetricsRow>> {
    let members: Vec<String> = members.iter().unique().cloned().collect();
    TemporalAggregator::new(affiliations, on_cols, weight_col)?
        .with_config(config.clone())
        .window_metrics(&members, start, end)
}

/// Longitudinal metrics over sequential windows
///
/// `timesteps` is one of `"days"`, `"months"` or `"years"` and is checked
/// before any window is computed.
///
/// # Errors
/// Returns [`crate::Error::InvalidTimestepUnit`] for an unknown step unit and
/// [`crate::Error::InvalidDateRange`] if `start` is after `end`.
pub fn compute_all_metrics(
    affiliations: &RecordBatch,
    on_cols: &[KeySet],
    weight_col: Option<&str>,
    members: Option<&[String]>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    timesteps: &str,
) -> Result<Vec<MetricsRow>> {
    let timestep: TimeStep = timesteps.parse()?;
    let config = NetworkConfig::default().with_timestep(timestep);
    TemporalAggregator::new(affiliations, on_cols, weight_col)?
        .with_config(config)
        .run(members, start, end)
}

/// [`compute_all_metrics`] with explicit configuration and optional progress reporting
#[allow(clippy::too_many_arguments)]
pub fn compute_all_metrics_with_config<'a>(
    affiliations: &'a RecordBatch,
    on_cols: &[KeySet],
    weight_col: Option<&str>,
    members: Option<&[String]>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    config: &NetworkConfig,
    progress: Option<ProgressCallback<'a>>,
) -> Result<Vec<MetricsRow>> {
    let mut aggregator =
        TemporalAggregator::new(affiliations, on_cols, weight_col)?.with_config(config.clone());
    aggregator.progress = progress;
    aggregator.run(members, start, end)
}
