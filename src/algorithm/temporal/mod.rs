//! Windowed aggregation of network metrics over time

pub mod aggregator;
pub mod windows;

pub use aggregator::{
    ProgressCallback, TemporalAggregator, compute_all_metrics, compute_all_metrics_with_config,
    compute_window_metrics, compute_window_metrics_with_config,
};
pub use windows::{StepCountPolicy, TimeStep, TimeWindow, time_windows};
