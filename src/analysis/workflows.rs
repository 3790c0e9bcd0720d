use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::duration::average_elapsed;
use super::stats;
use crate::config::Thresholds;
use crate::insights::{
    WorkflowAnalysis, WorkflowCount, WorkflowDuration, WorkflowFailureRate, WorkflowSummary,
};
use crate::models::{BuildRecord, BuildStatus};

pub trait WorkflowAnalyzer {
    fn analyze(&self, builds: &[&BuildRecord]) -> WorkflowAnalysis;
}

pub struct DefaultWorkflowAnalyzer {
    thresholds: Thresholds,
}

impl DefaultWorkflowAnalyzer {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            thresholds: thresholds.clone(),
        }
    }
}

impl WorkflowAnalyzer for DefaultWorkflowAnalyzer {
    fn analyze(&self, builds: &[&BuildRecord]) -> WorkflowAnalysis {
        let groups = group_by_workflow(builds);
        let top_n = self.thresholds.top_workflow_count;

        let top_workflows = top_by_count(&groups, top_n);

        let top_workflow_details = top_workflows
            .iter()
            .filter_map(|top| {
                let group = groups.get(top.name.as_str())?;
                Some(WorkflowSummary {
                    name: top.name.clone(),
                    executions: top.count,
                    average_duration_seconds: average_elapsed(group),
                    failure_rate: failure_rate(group),
                })
            })
            .collect();

        WorkflowAnalysis {
            long_running_workflows: longest_running(&groups, top_n),
            high_failure_workflows: high_failure(&groups, &self.thresholds),
            top_workflows,
            top_workflow_details,
        }
    }
}

/// Groups records by workflow name; absent names share the `Unknown` group.
pub fn group_by_workflow<'a>(
    builds: &[&'a BuildRecord],
) -> BTreeMap<&'a str, Vec<&'a BuildRecord>> {
    builds.iter().fold(BTreeMap::new(), |mut grouped, &build| {
        grouped
            .entry(build.workflow_name())
            .or_insert_with(Vec::new)
            .push(build);
        grouped
    })
}

pub fn failure_rate(builds: &[&BuildRecord]) -> f64 {
    let failures = builds
        .iter()
        .filter(|b| b.status() == Some(BuildStatus::Error))
        .count();
    stats::rate(failures, builds.len())
}

/// Descending by metric, ascending by name on ties.
fn by_metric_desc(a: (&str, f64), b: (&str, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

pub fn top_by_count(
    groups: &BTreeMap<&str, Vec<&BuildRecord>>,
    top_n: usize,
) -> Vec<WorkflowCount> {
    let mut counts: Vec<_> = groups
        .iter()
        .map(|(&name, builds)| (name, builds.len()))
        .collect();

    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    counts
        .into_iter()
        .take(top_n)
        .map(|(name, count)| WorkflowCount {
            name: name.to_string(),
            count,
        })
        .collect()
}

fn longest_running(
    groups: &BTreeMap<&str, Vec<&BuildRecord>>,
    top_n: usize,
) -> Vec<WorkflowDuration> {
    let mut averages: Vec<_> = groups
        .iter()
        .map(|(&name, builds)| (name, average_elapsed(builds)))
        .filter(|(_, average)| *average > 0.0)
        .collect();

    averages.sort_by(|a, b| by_metric_desc(*a, *b));

    averages
        .into_iter()
        .take(top_n)
        .map(|(name, average)| WorkflowDuration {
            name: name.to_string(),
            average_duration_seconds: average,
        })
        .collect()
}

/// Workflows with enough executions whose error rate reaches the threshold.
pub fn high_failure(
    groups: &BTreeMap<&str, Vec<&BuildRecord>>,
    thresholds: &Thresholds,
) -> Vec<WorkflowFailureRate> {
    let mut rates: Vec<_> = groups
        .iter()
        .filter(|(_, builds)| builds.len() >= thresholds.min_workflow_executions)
        .map(|(&name, builds)| (name, failure_rate(builds)))
        .filter(|(_, rate)| *rate >= thresholds.min_failure_rate)
        .collect();

    rates.sort_by(|a, b| by_metric_desc(*a, *b));

    rates
        .into_iter()
        .take(thresholds.top_workflow_count)
        .map(|(name, failure_rate)| WorkflowFailureRate {
            name: name.to_string(),
            failure_rate,
        })
        .collect()
}
