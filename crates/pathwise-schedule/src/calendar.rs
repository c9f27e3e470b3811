//! Study-day calendar generation.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

/// Date format accepted for start dates and schedule keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Resolve the calendar start, falling back to `today` when the date is
/// missing or unparsable.
#[must_use]
pub fn resolve_start_date(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    match raw {
        None => today,
        Some(text) => parse_date(text).unwrap_or_else(|| {
            warn!(start_date = text, %today, "unparsable start date, using today");
            today
        }),
    }
}

/// `true` for Monday through Friday.
#[must_use]
pub fn is_weekday(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() < 5
}

/// Walk forward from `start` collecting up to `target_days` study days.
///
/// With `exclude_weekends`, Saturdays and Sundays are skipped. The walk
/// stops after `2 × target_days` calendar days, so fewer than `target_days`
/// dates can come back for pathological inputs.
#[must_use]
pub fn available_study_days(
    start: NaiveDate,
    target_days: u32,
    exclude_weekends: bool,
) -> Vec<NaiveDate> {
    let target = target_days as usize;
    let scan_limit = target.saturating_mul(2);
    let mut days = Vec::with_capacity(target);

    for date in start.iter_days().take(scan_limit) {
        if days.len() >= target {
            break;
        }
        if !exclude_weekends || is_weekday(date) {
            days.push(date);
        }
    }

    debug!(
        %start,
        target_days,
        exclude_weekends,
        found = days.len(),
        "study days generated"
    );
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn consecutive_days_without_weekend_exclusion() {
        let days = available_study_days(date("2024-01-01"), 5, false);
        let expected: Vec<NaiveDate> = ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"]
            .into_iter()
            .map(date)
            .collect();
        assert_eq!(days, expected);
    }

    #[test]
    fn weekends_skipped_when_excluded() {
        let days = available_study_days(date("2024-01-01"), 5, true);
        assert_eq!(days.len(), 5);
        assert!(days.iter().all(|d| is_weekday(*d)));
        assert!(!days.contains(&date("2024-01-06")));
        assert!(!days.contains(&date("2024-01-07")));

        let seven = available_study_days(date("2024-01-01"), 7, true);
        assert_eq!(seven.last(), Some(&date("2024-01-09")));
    }

    #[test]
    fn scan_cap_limits_weekend_start() {
        // Saturday start, one day wanted: two calendar days scanned, both weekend.
        let days = available_study_days(date("2024-01-06"), 1, true);
        assert!(days.is_empty());
    }

    #[test]
    fn zero_target_yields_nothing() {
        assert!(available_study_days(date("2024-01-01"), 0, false).is_empty());
    }

    #[test]
    fn malformed_start_falls_back_to_today() {
        let today = date("2030-06-15");
        assert_eq!(resolve_start_date(Some("15/06/2030"), today), today);
        assert_eq!(resolve_start_date(None, today), today);
        assert_eq!(
            resolve_start_date(Some("2024-02-29"), today),
            date("2024-02-29")
        );
    }
}
