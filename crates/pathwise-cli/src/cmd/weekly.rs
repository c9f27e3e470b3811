//! `pw weekly`: week totals for a `{date: {node: hours}}` schedule.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use pathwise_schedule::{WeeklyBreakdown, weekly_breakdown};

use super::RunContext;
use crate::input::load_document;
use crate::output::{OutputMode, hours, pretty_kv, pretty_section, render};

/// Arguments for `pw weekly`.
#[derive(Args, Debug)]
pub struct WeeklyArgs {
    /// Schedule file mapping `YYYY-MM-DD` to `{node: hours}`.
    pub schedule: PathBuf,

    /// First day of week 1 (`YYYY-MM-DD`). Defaults to today.
    #[arg(long)]
    pub start_date: Option<String>,
}

/// Execute `pw weekly`.
pub fn run_weekly(args: &WeeklyArgs, ctx: &RunContext) -> anyhow::Result<ExitCode> {
    let schedule: BTreeMap<String, BTreeMap<String, f64>> = load_document(&args.schedule)?;
    let weeks = weekly_breakdown(&schedule, args.start_date.as_deref(), ctx.today);
    render(ctx.output, &weeks, render_weeks_human)?;
    Ok(ExitCode::SUCCESS)
}

fn render_weeks_human(weeks: &WeeklyBreakdown, mode: OutputMode, w: &mut dyn Write) -> io::Result<()> {
    if mode.is_pretty() {
        pretty_section(w, "Weekly hours")?;
        for (week, h) in weeks.iter() {
            pretty_kv(w, &format!("week {week}"), hours(h))?;
        }
        return pretty_kv(w, "total", hours(weeks.total()));
    }
    for (week, h) in weeks.iter() {
        writeln!(w, "week_{week}\t{h:.2}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn weeks() -> WeeklyBreakdown {
        let mut schedule = BTreeMap::new();
        schedule.insert(
            "2024-01-01".to_string(),
            BTreeMap::from([("a".to_string(), 1.5), ("b".to_string(), 0.5)]),
        );
        schedule.insert(
            "2024-01-10".to_string(),
            BTreeMap::from([("a".to_string(), 1.0)]),
        );
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        weekly_breakdown(&schedule, Some("2024-01-01"), today)
    }

    #[test]
    fn text_mode_is_one_line_per_week() {
        let mut buf = Vec::new();
        render_weeks_human(&weeks(), OutputMode::Text, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "week_1\t2.00\nweek_2\t1.00\n");
    }

    #[test]
    fn pretty_mode_ends_with_total() {
        let mut buf = Vec::new();
        render_weeks_human(&weeks(), OutputMode::Pretty, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Weekly hours"));
        let last = text.lines().last().unwrap();
        assert!(last.contains("total") && last.contains("3.00h"), "{text}");
    }
}
