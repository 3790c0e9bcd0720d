use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::BuildRecord;

/// Aggregate statistics for one record set. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildStatistics {
    pub period: String,
    pub total_builds: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub aborted_count: usize,
    pub success_rate: f64,
    pub average_duration: f64,
    pub median_duration: f64,
    pub min_duration: f64,
    pub max_duration: f64,
    pub p50_duration: f64,
    pub p75_duration: f64,
    pub p90_duration: f64,
    pub p95_duration: f64,
    pub p99_duration: f64,
    pub standard_deviation: f64,
    pub total_credit_cost: i64,
    pub average_credit_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDuration {
    pub name: String,
    pub average_duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowFailureRate {
    pub name: String,
    pub failure_rate: f64,
}

/// Ungated metrics for one of the most executed workflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub name: String,
    pub executions: usize,
    pub average_duration_seconds: f64,
    pub failure_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowAnalysis {
    pub top_workflows: Vec<WorkflowCount>,
    pub long_running_workflows: Vec<WorkflowDuration>,
    pub high_failure_workflows: Vec<WorkflowFailureRate>,
    pub top_workflow_details: Vec<WorkflowSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryAnalysis {
    /// repository -> period label -> statistics
    pub repository_stats: IndexMap<String, IndexMap<String, BuildStatistics>>,
    /// repository -> `name(count)` entries
    pub repository_workflows: IndexMap<String, Vec<String>>,
    /// repository -> `name(rate%)` entries
    pub repository_failures: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct ProcessedData {
    pub builds: Vec<BuildRecord>,
    pub statistics: IndexMap<String, BuildStatistics>,
    pub workflow_analysis: WorkflowAnalysis,
    pub repository_analysis: RepositoryAnalysis,
}

/// The document written as `analysis.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub total_builds: usize,
    pub statistics: IndexMap<String, BuildStatistics>,
    pub workflow_analysis: WorkflowAnalysis,
    pub repository_analysis: RepositoryAnalysis,
}

impl AnalysisReport {
    pub fn from_processed(data: &ProcessedData, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            total_builds: data.builds.len(),
            statistics: data.statistics.clone(),
            workflow_analysis: data.workflow_analysis.clone(),
            repository_analysis: data.repository_analysis.clone(),
        }
    }
}
