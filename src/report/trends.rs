use std::collections::BTreeMap;

use super::csv::{escape, minutes, percent};
use crate::analysis::{average_elapsed, elapsed_seconds, rate};
use crate::models::{BuildRecord, BuildStatus, UNKNOWN_LABEL};
use crate::timestamp::{format_day, hour_of_day, parse_timestamp};

fn count_status(builds: &[&BuildRecord], status: BuildStatus) -> usize {
    builds.iter().filter(|b| b.status() == Some(status)).count()
}

fn group_by<'a, F>(builds: &'a [BuildRecord], key: F) -> BTreeMap<String, Vec<&'a BuildRecord>>
where
    F: Fn(&BuildRecord) -> String,
{
    builds.iter().fold(BTreeMap::new(), |mut grouped, build| {
        grouped.entry(key(build)).or_insert_with(Vec::new).push(build);
        grouped
    })
}

/// One row per UTC calendar day, oldest first.
pub fn daily_trends(builds: &[BuildRecord]) -> String {
    let mut csv = String::from("Date,Builds,Success,Failures,Average Duration (min)\n");

    let days = group_by(builds, |build| {
        build
            .triggered_at
            .as_deref()
            .and_then(parse_timestamp)
            .map_or_else(|| UNKNOWN_LABEL.to_string(), |ts| format_day(&ts))
    });

    for (day, day_builds) in &days {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            escape(day),
            day_builds.len(),
            count_status(day_builds, BuildStatus::Success),
            count_status(day_builds, BuildStatus::Error),
            minutes(average_elapsed(day_builds)),
        ));
    }

    csv
}

/// Exactly 24 rows, `00:00` to `23:00` UTC, empty hours zero filled.
pub fn hourly_distribution(builds: &[BuildRecord]) -> String {
    let mut csv = String::from("Hour,Builds,Success Rate (%)\n");

    let mut totals = [0usize; 24];
    let mut successes = [0usize; 24];
    for build in builds {
        let Some(triggered) = build.triggered_at.as_deref().and_then(parse_timestamp) else {
            continue;
        };
        let hour = hour_of_day(&triggered) as usize;
        totals[hour] += 1;
        if build.status() == Some(BuildStatus::Success) {
            successes[hour] += 1;
        }
    }

    for (hour, (&total, &success)) in totals.iter().zip(successes.iter()).enumerate() {
        csv.push_str(&format!(
            "{hour:02}:00,{total},{}\n",
            percent(rate(success, total))
        ));
    }

    csv
}

/// Usage and cost per machine type, most used first.
pub fn machine_type_stats(builds: &[BuildRecord]) -> String {
    let mut csv = String::from(
        "Machine Type,Builds,Usage Rate (%),Average Duration (min),Total Duration (min),Total Cost\n",
    );

    let machines = group_by(builds, |build| build.machine_type().to_string());

    let mut rows: Vec<_> = machines.iter().collect();
    rows.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));

    for (machine, machine_builds) in rows {
        // an empty f64 sum() is -0.0
        let total_duration = machine_builds
            .iter()
            .filter_map(|b| elapsed_seconds(b))
            .fold(0.0, |total, duration| total + duration);
        let total_cost: i64 = machine_builds.iter().filter_map(|b| b.credit_cost).sum();

        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            escape(machine),
            machine_builds.len(),
            percent(rate(machine_builds.len(), builds.len())),
            minutes(average_elapsed(machine_builds)),
            minutes(total_duration),
            total_cost,
        ));
    }

    csv
}
