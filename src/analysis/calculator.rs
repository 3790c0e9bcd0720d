use super::duration::DurationBounds;
use super::stats;
use crate::config::Thresholds;
use crate::error::{BuildLensError, Result};
use crate::insights::BuildStatistics;
use crate::models::{BuildRecord, BuildStatus};

pub trait StatisticsCalculator {
    fn calculate(&self, builds: &[&BuildRecord], period: &str) -> Result<BuildStatistics>;
}

pub struct DefaultStatisticsCalculator {
    bounds: DurationBounds,
}

impl DefaultStatisticsCalculator {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            bounds: DurationBounds::new(thresholds),
        }
    }
}

impl StatisticsCalculator for DefaultStatisticsCalculator {
    fn calculate(&self, builds: &[&BuildRecord], period: &str) -> Result<BuildStatistics> {
        if builds.is_empty() {
            return Err(BuildLensError::Calculation(format!(
                "no builds to analyze for period '{period}'"
            )));
        }

        let total_builds = builds.len();
        let count = |status: BuildStatus| {
            builds
                .iter()
                .filter(|b| b.status() == Some(status))
                .count()
        };
        let success_count = count(BuildStatus::Success);

        let durations = stats::sorted(
            &builds
                .iter()
                .filter_map(|b| self.bounds.extract(b))
                .collect::<Vec<_>>(),
        );
        let average_duration = stats::mean(&durations);

        let credit_costs: Vec<i64> = builds.iter().filter_map(|b| b.credit_cost).collect();
        let total_credit_cost: i64 = credit_costs.iter().sum();
        #[allow(clippy::cast_precision_loss)]
        let average_credit_cost = if credit_costs.is_empty() {
            0.0
        } else {
            total_credit_cost as f64 / credit_costs.len() as f64
        };

        Ok(BuildStatistics {
            period: period.to_string(),
            total_builds,
            success_count,
            error_count: count(BuildStatus::Error),
            aborted_count: count(BuildStatus::Aborted),
            success_rate: stats::rate(success_count, total_builds),
            average_duration,
            median_duration: stats::median(&durations),
            min_duration: durations.first().copied().unwrap_or(0.0),
            max_duration: durations.last().copied().unwrap_or(0.0),
            p50_duration: stats::percentile(&durations, 50),
            p75_duration: stats::percentile(&durations, 75),
            p90_duration: stats::percentile(&durations, 90),
            p95_duration: stats::percentile(&durations, 95),
            p99_duration: stats::percentile(&durations, 99),
            standard_deviation: stats::standard_deviation(&durations, average_duration),
            total_credit_cost,
            average_credit_cost,
        })
    }
}
