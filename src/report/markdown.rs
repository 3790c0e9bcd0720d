use super::csv::{percent, ReportInput};
use crate::error::{BuildLensError, Result};
use crate::insights::BuildStatistics;
use crate::timestamp::format_duration;

/// A rendered markdown document and the file name it is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownDocument {
    pub file_name: String,
    pub content: String,
}

/// Renders one document per period. Only period statistics have a
/// markdown rendering.
pub fn render(input: ReportInput<'_>) -> Result<Vec<MarkdownDocument>> {
    match input {
        ReportInput::PeriodStatistics(statistics) => Ok(statistics
            .iter()
            .map(|(period, stats)| MarkdownDocument {
                file_name: file_name(period),
                content: period_report(period, stats),
            })
            .collect()),
        ReportInput::RepositoryAnalysis(_) => Err(BuildLensError::Calculation(
            "Repository analysis has no markdown rendering".to_string(),
        )),
        ReportInput::WorkflowAnalysis(_) => Err(BuildLensError::Calculation(
            "Workflow analysis has no markdown rendering".to_string(),
        )),
    }
}

/// `report_<period>.md`, with whitespace and path separators replaced.
pub fn file_name(period: &str) -> String {
    let safe: String = period
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\' | ':') {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("report_{safe}.md")
}

fn table(doc: &mut String, title: &str, rows: &[(&str, String)]) {
    doc.push_str(&format!("## {title}\n\n"));
    doc.push_str("| Metric | Value |\n|--------|-------|\n");
    for (metric, value) in rows {
        doc.push_str(&format!("| {metric} | {value} |\n"));
    }
    doc.push('\n');
}

fn period_report(period: &str, stats: &BuildStatistics) -> String {
    let mut doc = format!("# Bitrise Build Report - {period}\n\n");

    table(
        &mut doc,
        "Basic Statistics",
        &[
            ("Total builds", stats.total_builds.to_string()),
            (
                "Success",
                format!("{} ({}%)", stats.success_count, percent(stats.success_rate)),
            ),
            ("Errors", stats.error_count.to_string()),
            ("Aborted", stats.aborted_count.to_string()),
        ],
    );

    table(
        &mut doc,
        "Duration Statistics",
        &[
            ("Average", format_duration(stats.average_duration)),
            ("Median", format_duration(stats.median_duration)),
            ("Min", format_duration(stats.min_duration)),
            ("Max", format_duration(stats.max_duration)),
            ("P50", format_duration(stats.p50_duration)),
            ("P75", format_duration(stats.p75_duration)),
            ("P90", format_duration(stats.p90_duration)),
            ("P95", format_duration(stats.p95_duration)),
            ("P99", format_duration(stats.p99_duration)),
            ("Std Dev", format_duration(stats.standard_deviation)),
        ],
    );

    table(
        &mut doc,
        "Cost Statistics",
        &[
            ("Total cost", format!("{} credits", stats.total_credit_cost)),
            (
                "Average cost",
                format!("{:.2} credits", stats.average_credit_cost),
            ),
        ],
    );

    doc
}
