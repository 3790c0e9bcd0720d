use chrono::{DateTime, TimeDelta, Utc};

use crate::config::Period;
use crate::error::{BuildLensError, Result};
use crate::models::BuildRecord;
use crate::timestamp::parse_timestamp;

/// Start of the window `days` before `now`.
pub fn window_start(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    TimeDelta::try_days(days)
        .and_then(|delta| now.checked_sub_signed(delta))
        .ok_or(BuildLensError::DateCalculation { days })
}

/// Records triggered within `period` relative to `now`. Records whose
/// trigger time is missing or unparseable never match a bounded period.
pub fn filter_by_period<'a>(
    builds: &[&'a BuildRecord],
    period: &Period,
    now: DateTime<Utc>,
) -> Result<Vec<&'a BuildRecord>> {
    let Some(days) = period.days else {
        return Ok(builds.to_vec());
    };

    let start = window_start(now, days)?;

    Ok(builds
        .iter()
        .copied()
        .filter(|build| {
            build
                .triggered_at
                .as_deref()
                .and_then(parse_timestamp)
                .is_some_and(|triggered| triggered >= start)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::record;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_all_time_returns_everything() {
        let builds = [
            record("2020-01-01T00:00:00Z", None, "success", None),
            record("garbage", None, "success", None),
        ];
        let refs: Vec<_> = builds.iter().collect();

        let filtered = filter_by_period(&refs, &Period::new("all time", None), now()).unwrap();

        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_bounded_period_is_inclusive_of_start() {
        let builds = [
            record("2024-05-25T12:00:00Z", None, "success", Some("at-boundary")),
            record("2024-05-25T11:59:59Z", None, "success", Some("just-before")),
            record("2024-05-31T08:00:00Z", None, "success", Some("recent")),
        ];
        let refs: Vec<_> = builds.iter().collect();

        let filtered = filter_by_period(&refs, &Period::new("7 days", Some(7)), now()).unwrap();

        let names: Vec<_> = filtered.iter().map(|b| b.workflow_name()).collect();
        assert_eq!(names, ["at-boundary", "recent"]);
    }

    #[test]
    fn test_unparseable_or_missing_trigger_never_matches() {
        let builds = [
            record("not a date", None, "success", None),
            BuildRecord::default(),
        ];
        let refs: Vec<_> = builds.iter().collect();

        let filtered = filter_by_period(&refs, &Period::new("30 days", Some(30)), now()).unwrap();

        assert!(filtered.is_empty());
    }

    #[test]
    fn test_overflowing_window_is_a_date_error() {
        let forever = Period::new("forever", Some(i64::MAX));
        let err = filter_by_period(&[], &forever, now()).unwrap_err();
        assert!(matches!(err, BuildLensError::DateCalculation { days: i64::MAX }));

        let err = window_start(now(), 400_000_000).unwrap_err();
        assert!(matches!(err, BuildLensError::DateCalculation { .. }));
    }
}
