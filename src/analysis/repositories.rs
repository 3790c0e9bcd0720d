use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::debug;

use super::calculator::StatisticsCalculator;
use super::period::filter_by_period;
use super::workflows::{group_by_workflow, high_failure, top_by_count};
use crate::config::{Period, Thresholds};
use crate::error::Result;
use crate::insights::RepositoryAnalysis;
use crate::models::BuildRecord;

pub trait RepositoryAnalyzer {
    fn analyze(
        &self,
        builds: &[&BuildRecord],
        periods: &[Period],
        now: DateTime<Utc>,
    ) -> Result<RepositoryAnalysis>;
}

pub struct DefaultRepositoryAnalyzer {
    thresholds: Thresholds,
    calculator: Box<dyn StatisticsCalculator>,
}

impl DefaultRepositoryAnalyzer {
    pub fn new(thresholds: &Thresholds, calculator: Box<dyn StatisticsCalculator>) -> Self {
        Self {
            thresholds: thresholds.clone(),
            calculator,
        }
    }

    fn workflow_highlights(&self, builds: &[&BuildRecord]) -> (Vec<String>, Vec<String>) {
        let groups = group_by_workflow(builds);

        let workflows = top_by_count(&groups, self.thresholds.top_workflow_count)
            .into_iter()
            .map(|w| format!("{}({})", w.name, w.count))
            .collect();

        let failures = high_failure(&groups, &self.thresholds)
            .into_iter()
            .map(|w| format!("{}({:.1}%)", w.name, w.failure_rate))
            .collect();

        (workflows, failures)
    }
}

impl RepositoryAnalyzer for DefaultRepositoryAnalyzer {
    fn analyze(
        &self,
        builds: &[&BuildRecord],
        periods: &[Period],
        now: DateTime<Utc>,
    ) -> Result<RepositoryAnalysis> {
        let groups = group_by_repository(builds);
        let mut analysis = RepositoryAnalysis::default();

        for (repository, repo_builds) in groups {
            let mut period_stats = IndexMap::new();

            for period in periods {
                let filtered = filter_by_period(&repo_builds, period, now)?;
                if filtered.is_empty() {
                    continue;
                }
                let stats = self.calculator.calculate(&filtered, &period.name)?;
                period_stats.insert(period.name.clone(), stats);
            }

            if period_stats.is_empty() {
                debug!("Repository {repository} has no builds in any period, skipping");
                continue;
            }

            let (workflows, failures) = self.workflow_highlights(&repo_builds);

            analysis
                .repository_stats
                .insert(repository.to_string(), period_stats);
            analysis
                .repository_workflows
                .insert(repository.to_string(), workflows);
            analysis
                .repository_failures
                .insert(repository.to_string(), failures);
        }

        Ok(analysis)
    }
}

fn group_by_repository<'a>(builds: &[&'a BuildRecord]) -> BTreeMap<&'a str, Vec<&'a BuildRecord>> {
    builds.iter().fold(BTreeMap::new(), |mut grouped, &build| {
        grouped
            .entry(build.repository_title())
            .or_insert_with(Vec::new)
            .push(build);
        grouped
    })
}
