use chrono::{DateTime, Utc};

use crate::config::Thresholds;
use crate::models::BuildRecord;
use crate::timestamp::parse_timestamp;

#[allow(clippy::cast_precision_loss)]
pub fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}

/// Elapsed seconds between trigger and finish. `None` when a timestamp is
/// missing or unparseable, or when the build would have finished before it
/// started.
pub fn elapsed_seconds(build: &BuildRecord) -> Option<f64> {
    let start = parse_timestamp(build.triggered_at.as_deref()?)?;
    let end = parse_timestamp(build.finished_at.as_deref()?)?;

    let duration = seconds_between(start, end);
    (duration >= 0.0).then_some(duration)
}

/// Plausibility window applied on top of [`elapsed_seconds`].
#[derive(Debug, Clone, Copy)]
pub struct DurationBounds {
    min_seconds: f64,
    max_seconds: f64,
}

impl DurationBounds {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            min_seconds: f64::from(thresholds.min_duration_seconds),
            max_seconds: thresholds.max_duration_seconds(),
        }
    }

    pub fn extract(&self, build: &BuildRecord) -> Option<f64> {
        elapsed_seconds(build).filter(|d| (self.min_seconds..=self.max_seconds).contains(d))
    }
}

/// Mean of the available durations, 0 when none are available.
pub fn average_elapsed(builds: &[&BuildRecord]) -> f64 {
    let durations: Vec<f64> = builds.iter().filter_map(|b| elapsed_seconds(b)).collect();
    super::stats::mean(&durations)
}
