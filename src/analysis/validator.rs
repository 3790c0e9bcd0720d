use log::{debug, warn};

use super::duration::seconds_between;
use crate::config::Thresholds;
use crate::error::{BuildLensError, Result};
use crate::models::{BuildRecord, BuildStatus};
use crate::timestamp::parse_timestamp;

pub trait Validator {
    /// Returns the records that pass validation. Fails when more than half
    /// of the batch is invalid.
    fn validate<'a>(&self, builds: &'a [BuildRecord]) -> Result<Vec<&'a BuildRecord>>;
}

pub struct BuildValidator {
    max_duration_seconds: f64,
}

impl BuildValidator {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            max_duration_seconds: thresholds.max_duration_seconds(),
        }
    }

    fn check(&self, build: &BuildRecord) -> std::result::Result<(), String> {
        let (Some(triggered_at), Some(status_text)) = (&build.triggered_at, &build.status_text)
        else {
            return Err("missing required field (triggered_at or status_text)".to_string());
        };

        let start = parse_timestamp(triggered_at)
            .ok_or_else(|| format!("invalid triggered_at: {triggered_at}"))?;

        if let Some(finished_at) = &build.finished_at {
            let end = parse_timestamp(finished_at)
                .ok_or_else(|| format!("invalid finished_at: {finished_at}"))?;

            let duration = seconds_between(start, end);
            if duration < 0.0 {
                return Err("finished_at is before triggered_at".to_string());
            }
            if duration > self.max_duration_seconds {
                return Err(format!("implausible duration: {duration}s"));
            }
        }

        if BuildStatus::from_text(status_text).is_none() {
            return Err(format!("unknown status: {status_text}"));
        }

        Ok(())
    }
}

impl Validator for BuildValidator {
    fn validate<'a>(&self, builds: &'a [BuildRecord]) -> Result<Vec<&'a BuildRecord>> {
        let (valid, errors) = builds.iter().enumerate().fold(
            (Vec::with_capacity(builds.len()), Vec::new()),
            |(mut valid, mut errors), (index, build)| {
                match self.check(build) {
                    Ok(()) => valid.push(build),
                    Err(reason) => errors.push(format!("build {index}: {reason}")),
                }
                (valid, errors)
            },
        );

        if errors.len() > builds.len() / 2 {
            return Err(BuildLensError::InvalidData(format!(
                "{} of {} builds are invalid: {}",
                errors.len(),
                builds.len(),
                errors.join("; ")
            )));
        }

        if !errors.is_empty() {
            warn!(
                "Dropped {} invalid builds out of {}",
                errors.len(),
                builds.len()
            );
            for error in &errors {
                debug!("{error}");
            }
        }

        Ok(valid)
    }
}
