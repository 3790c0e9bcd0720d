use indexmap::IndexMap;

use crate::insights::{BuildStatistics, RepositoryAnalysis, WorkflowAnalysis};

/// The aggregate views that render to a table.
#[derive(Debug, Clone, Copy)]
pub enum ReportInput<'a> {
    PeriodStatistics(&'a IndexMap<String, BuildStatistics>),
    RepositoryAnalysis(&'a RepositoryAnalysis),
    WorkflowAnalysis(&'a WorkflowAnalysis),
}

const STATISTICS_HEADER: &str = "Total Builds,Success,Errors,Aborted,Success Rate (%),\
Average (min),Median (min),Min (min),Max (min),P50 (min),P75 (min),P90 (min),P95 (min),\
P99 (min),Std Dev (min),Total Cost,Average Cost";

/// Quotes a field when it contains a separator, quote or line break.
pub fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quote(value)
    } else {
        value.to_string()
    }
}

/// Always quotes a field, doubling inner quotes.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn minutes(seconds: f64) -> String {
    format!("{:.2}", seconds / 60.0)
}

pub fn percent(rate: f64) -> String {
    format!("{rate:.1}")
}

pub fn render(input: ReportInput<'_>) -> String {
    match input {
        ReportInput::PeriodStatistics(statistics) => summary_table(statistics),
        ReportInput::RepositoryAnalysis(analysis) => repository_table(analysis),
        ReportInput::WorkflowAnalysis(analysis) => workflow_table(analysis),
    }
}

fn statistics_columns(stats: &BuildStatistics) -> Vec<String> {
    vec![
        stats.total_builds.to_string(),
        stats.success_count.to_string(),
        stats.error_count.to_string(),
        stats.aborted_count.to_string(),
        percent(stats.success_rate),
        minutes(stats.average_duration),
        minutes(stats.median_duration),
        minutes(stats.min_duration),
        minutes(stats.max_duration),
        minutes(stats.p50_duration),
        minutes(stats.p75_duration),
        minutes(stats.p90_duration),
        minutes(stats.p95_duration),
        minutes(stats.p99_duration),
        minutes(stats.standard_deviation),
        stats.total_credit_cost.to_string(),
        format!("{:.2}", stats.average_credit_cost),
    ]
}

fn summary_table(statistics: &IndexMap<String, BuildStatistics>) -> String {
    let mut csv = format!("Period,{STATISTICS_HEADER}\n");

    for (period, stats) in statistics {
        let mut row = vec![escape(period)];
        row.extend(statistics_columns(stats));
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}

fn repository_table(analysis: &RepositoryAnalysis) -> String {
    let mut csv =
        format!("Repository,Period,{STATISTICS_HEADER},Top Workflows,High Failure Workflows\n");

    for (repository, period_stats) in &analysis.repository_stats {
        let workflows = analysis
            .repository_workflows
            .get(repository)
            .map(|w| w.join("; "))
            .unwrap_or_default();
        let failures = analysis
            .repository_failures
            .get(repository)
            .map(|f| f.join("; "))
            .unwrap_or_default();

        for (period, stats) in period_stats {
            let mut row = vec![escape(repository), escape(period)];
            row.extend(statistics_columns(stats));
            row.push(quote(&workflows));
            row.push(quote(&failures));
            csv.push_str(&row.join(","));
            csv.push('\n');
        }
    }

    csv
}

fn workflow_table(analysis: &WorkflowAnalysis) -> String {
    let mut csv = String::from("Workflow,Executions,Average Duration (min),Failure Rate (%)\n");

    for summary in &analysis.top_workflow_details {
        let row = [
            escape(&summary.name),
            summary.executions.to_string(),
            minutes(summary.average_duration_seconds),
            percent(summary.failure_rate),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::WorkflowSummary;

    fn stats(period: &str) -> BuildStatistics {
        BuildStatistics {
            period: period.to_string(),
            total_builds: 4,
            success_count: 2,
            error_count: 1,
            aborted_count: 1,
            success_rate: 50.0,
            average_duration: 90.0,
            median_duration: 60.0,
            min_duration: 30.0,
            max_duration: 240.0,
            p50_duration: 60.0,
            p75_duration: 120.0,
            p90_duration: 240.0,
            p95_duration: 240.0,
            p99_duration: 240.0,
            standard_deviation: 12.0,
            total_credit_cost: 10,
            average_credit_cost: 2.5,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("primary"), "primary");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(escape("carriage\rreturn"), "\"carriage\rreturn\"");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_quote_always_wraps() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote(""), "\"\"");
        assert_eq!(quote("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_summary_table() {
        let mut statistics = IndexMap::new();
        statistics.insert("7 days".to_string(), stats("7 days"));
        statistics.insert("all, time".to_string(), stats("all, time"));

        let csv = render(ReportInput::PeriodStatistics(&statistics));
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        let header = lines[0];
        assert!(header.starts_with("Period,Total Builds,Success,Errors,Aborted,Success Rate (%)"));
        assert_eq!(lines[0].split(',').count(), 18);
        assert_eq!(
            lines[1],
            "7 days,4,2,1,1,50.0,1.50,1.00,0.50,4.00,1.00,2.00,4.00,4.00,4.00,0.20,10,2.50"
        );
        assert!(lines[2].starts_with("\"all, time\",4,"));
    }

    #[test]
    fn test_repository_table_quotes_highlight_columns() {
        let mut analysis = RepositoryAnalysis::default();
        let mut periods = IndexMap::new();
        periods.insert("7 days".to_string(), stats("7 days"));
        periods.insert("all time".to_string(), stats("all time"));
        analysis.repository_stats.insert("ios".to_string(), periods);
        analysis
            .repository_workflows
            .insert("ios".to_string(), vec!["primary(3)".into(), "nightly(1)".into()]);
        analysis.repository_failures.insert("ios".to_string(), vec![]);

        let csv = render(ReportInput::RepositoryAnalysis(&analysis));
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Top Workflows,High Failure Workflows"));
        assert!(lines[1].starts_with("ios,7 days,4,"));
        assert!(lines[1].ends_with(",\"primary(3); nightly(1)\",\"\""));
        assert!(lines[2].starts_with("ios,all time,"));
    }

    #[test]
    fn test_workflow_table() {
        let analysis = WorkflowAnalysis {
            top_workflow_details: vec![WorkflowSummary {
                name: "primary".to_string(),
                executions: 12,
                average_duration_seconds: 615.0,
                failure_rate: 8.333,
            }],
            ..WorkflowAnalysis::default()
        };

        let csv = render(ReportInput::WorkflowAnalysis(&analysis));

        assert_eq!(
            csv,
            "Workflow,Executions,Average Duration (min),Failure Rate (%)\nprimary,12,10.25,8.3\n"
        );
    }
}
