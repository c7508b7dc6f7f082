//! Progress reporting utilities for long-running operations
//!
//! The aggregator reports progress through a plain callback receiving each
//! window's start date. This module adapts that callback onto an indicatif
//! progress bar for command-line callers.

use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};

/// Default style for the window progress bar
pub const DEFAULT_WINDOW_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} windows {msg}";

/// Progress bar advanced once per computed time window
#[derive(Clone)]
pub struct WindowProgressBar {
    pb: ProgressBar,
}

impl WindowProgressBar {
    /// Record that the window starting at `window_start` was processed
    pub fn tick(&self, window_start: NaiveDate) {
        self.pb.set_message(window_start.to_string());
        self.pb.inc(1);
    }

    /// Access the underlying progress bar
    #[must_use]
    pub fn bar(&self) -> &ProgressBar {
        &self.pb
    }
}

/// Create a progress bar for `windows` time windows with a standardized style
///
/// # Arguments
/// * `windows` - Number of windows that will be computed
/// * `description` - Optional description to display as the initial message
#[must_use]
pub fn create_window_progress_bar(windows: u64, description: Option<&str>) -> WindowProgressBar {
    let pb = ProgressBar::new(windows);
    let style = ProgressStyle::default_bar()
        .template(DEFAULT_WINDOW_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);

    if let Some(desc) = description {
        pb.set_message(desc.to_string());
    }

    WindowProgressBar { pb }
}

/// Finish a progress bar with a completion message
///
/// # Arguments
/// * `progress` - The progress bar to finish
/// * `message` - Optional completion message
pub fn finish_progress_bar(progress: &WindowProgressBar, message: Option<&str>) {
    if let Some(msg) = message {
        progress.pb.finish_with_message(msg.to_string());
    } else {
        progress.pb.finish();
    }
}
