//! Week-level totals for a dated schedule.

use crate::calendar::{parse_date, resolve_start_date};
use crate::distribute::DailyAllocation;
use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use tracing::warn;

/// Hours per week, keyed by week number (week 1 starts on the start date).
///
/// Serializes as a map `{"week_1": h, "week_2": h, ...}` in numeric order.
/// Dates before the start land in week 0 or below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyBreakdown(BTreeMap<i64, f64>);

impl WeeklyBreakdown {
    #[must_use]
    pub fn get(&self, week: i64) -> Option<f64> {
        self.0.get(&week).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.0.iter().map(|(w, h)| (*w, *h))
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn add(&mut self, start: NaiveDate, date: NaiveDate, hours: f64) {
        let week = (date - start).num_days().div_euclid(7) + 1;
        *self.0.entry(week).or_insert(0.0) += hours;
    }
}

impl Serialize for WeeklyBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (week, hours) in &self.0 {
            map.serialize_entry(&format!("week_{week}"), hours)?;
        }
        map.end()
    }
}

/// Sum a `{date: {node: hours}}` schedule into weeks counted from
/// `start_date` (or `today` when missing or unparsable). Entries whose
/// date does not parse are skipped.
#[must_use]
pub fn weekly_breakdown(
    schedule: &BTreeMap<String, BTreeMap<String, f64>>,
    start_date: Option<&str>,
    today: NaiveDate,
) -> WeeklyBreakdown {
    let start = resolve_start_date(start_date, today);
    let mut weeks = WeeklyBreakdown::default();
    for (raw_date, nodes) in schedule {
        let Some(date) = parse_date(raw_date) else {
            warn!(date = raw_date.as_str(), "skipping unparsable schedule date");
            continue;
        };
        weeks.add(start, date, nodes.values().sum());
    }
    weeks
}

/// Weekly totals for already-dated allocations.
#[must_use]
pub fn weekly_from_allocations(days: &[DailyAllocation], start: NaiveDate) -> WeeklyBreakdown {
    let mut weeks = WeeklyBreakdown::default();
    for day in days {
        weeks.add(start, day.date, day.total_hours());
    }
    weeks
}
