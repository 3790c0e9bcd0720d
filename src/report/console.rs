use indexmap::IndexMap;

use super::csv::percent;
use crate::insights::{BuildStatistics, WorkflowAnalysis};
use crate::timestamp::format_duration;

const RULE_WIDTH: usize = 60;

/// Human readable overview of a run, one block per period.
pub fn summary(
    statistics: &IndexMap<String, BuildStatistics>,
    workflows: &WorkflowAnalysis,
) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = format!("\n{rule}\nBitrise Build Summary\n{rule}\n");

    if statistics.is_empty() {
        out.push_str("\nNo builds in any period\n");
    }

    for (period, stats) in statistics {
        out.push_str(&format!("\n{period}:\n"));
        out.push_str(&format!("  Total builds:     {}\n", stats.total_builds));
        out.push_str(&format!(
            "  Success:          {} ({}%)\n",
            stats.success_count,
            percent(stats.success_rate)
        ));
        out.push_str(&format!("  Errors:           {}\n", stats.error_count));
        out.push_str(&format!("  Aborted:          {}\n", stats.aborted_count));
        out.push_str(&format!(
            "  Average duration: {}\n",
            format_duration(stats.average_duration)
        ));
        out.push_str(&format!(
            "  Median duration:  {}\n",
            format_duration(stats.median_duration)
        ));
        out.push_str(&format!(
            "  Total cost:       {} credits\n",
            stats.total_credit_cost
        ));
    }

    if !workflows.top_workflows.is_empty() {
        let top: Vec<_> = workflows
            .top_workflows
            .iter()
            .map(|w| format!("{} ({})", w.name, w.count))
            .collect();
        out.push_str(&format!("\nTop workflows: {}\n", top.join(", ")));
    }

    out.push_str(&format!("\n{rule}\n"));
    out
}
