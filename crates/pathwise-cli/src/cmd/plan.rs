//! `pw plan`: build a dated study plan.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use pathwise_schedule::{PlanRequest, StudyPlan, sequence_and_schedule};
use tracing::debug;

use super::{RunContext, fail};
use crate::input::load_document;
use crate::output::{CliError, OutputMode, hours, pretty_kv, pretty_section, render};

/// Arguments for `pw plan`.
#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    /// Request file with `nodes`, `edges`, `progress` and `constraints`.
    pub request: PathBuf,

    /// Override `constraints.start_date` (`YYYY-MM-DD`).
    #[arg(long)]
    pub start_date: Option<String>,

    /// Override `constraints.target_days`.
    #[arg(long)]
    pub days: Option<u32>,

    /// Override `constraints.daily_hours`.
    #[arg(long)]
    pub hours: Option<f64>,

    /// Study Monday to Friday only.
    #[arg(long)]
    pub exclude_weekends: bool,
}

impl PlanArgs {
    fn apply_overrides(&self, request: &mut PlanRequest) {
        let c = &mut request.constraints;
        if let Some(ref date) = self.start_date {
            c.start_date = Some(date.clone());
        }
        if let Some(days) = self.days {
            c.target_days = days;
        }
        if let Some(hours) = self.hours {
            c.daily_hours = hours;
        }
        if self.exclude_weekends {
            c.exclude_weekends = true;
        }
    }
}

/// Execute `pw plan`.
pub fn run_plan(args: &PlanArgs, ctx: &RunContext) -> anyhow::Result<ExitCode> {
    let mut request: PlanRequest = load_document(&args.request)?;
    args.apply_overrides(&mut request);
    debug!(constraints = ?request.constraints, "planning");

    match sequence_and_schedule(&request, &ctx.config, ctx.today) {
        Ok(plan) => {
            render(ctx.output, &plan, render_plan_human)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(ctx.output, &CliError::from(&err)),
    }
}

fn render_plan_human(plan: &StudyPlan, mode: OutputMode, w: &mut dyn Write) -> io::Result<()> {
    if !mode.is_pretty() {
        for day in &plan.days {
            let allocs: Vec<String> = day
                .allocations
                .iter()
                .map(|a| format!("{}={:.2}", a.node_id, a.hours))
                .collect();
            writeln!(w, "{}\t{}", day.date, allocs.join(","))?;
        }
        return Ok(());
    }

    let realism = &plan.realism;
    pretty_section(w, "Study plan")?;
    pretty_kv(w, "start", plan.start_date.to_string())?;
    pretty_kv(w, "study days", plan.study_days.len().to_string())?;
    pretty_kv(w, "sequence", plan.sequence.order.join(", "))?;
    pretty_kv(w, "remaining", hours(plan.remaining.total_remaining_hours))?;
    pretty_kv(w, "scheduled", hours(plan.total_scheduled_hours()))?;
    pretty_kv(
        w,
        "realistic",
        if realism.is_target_realistic {
            "yes".to_string()
        } else {
            format!("no (needs {} days)", realism.minimum_days_needed)
        },
    )?;
    pretty_kv(w, "intensity", plan.intensity.level.to_string())?;
    if realism.intensity_warning {
        writeln!(w, "warning: more than 4 hours a day is hard to sustain")?;
    }

    if plan.is_empty() {
        writeln!(w, "\nRoadmap has no nodes.")?;
        return Ok(());
    }

    for day in plan.days.iter().filter(|d| !d.allocations.is_empty()) {
        writeln!(w)?;
        pretty_section(w, &format!("Day {} ({})  {}", day.day, day.date, hours(day.total_hours)))?;
        for s in &day.sessions {
            writeln!(
                w,
                "  +{:>3}m  {:>3}m  {:<16} {}",
                s.start_minute,
                s.duration_minutes,
                s.activity_type.to_string(),
                s.node_id
            )?;
        }
    }

    writeln!(w)?;
    pretty_section(w, "Weekly hours")?;
    for (week, h) in plan.weekly.iter() {
        pretty_kv(w, &format!("week {week}"), hours(h))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwise_core::{Roadmap, TimeConstraints};

    #[test]
    fn overrides_replace_constraints() {
        let mut request = PlanRequest::new(Roadmap::default(), TimeConstraints::new(10, 1.0));
        let args = PlanArgs {
            start_date: Some("2024-05-01".into()),
            days: Some(20),
            hours: Some(2.5),
            exclude_weekends: true,
            ..PlanArgs::default()
        };
        args.apply_overrides(&mut request);
        let c = &request.constraints;
        assert_eq!(c.start_date.as_deref(), Some("2024-05-01"));
        assert_eq!(c.target_days, 20);
        assert!((c.daily_hours - 2.5).abs() < 1e-10);
        assert!(c.exclude_weekends);
    }

    #[test]
    fn missing_overrides_keep_request_values() {
        let mut request = PlanRequest::new(Roadmap::default(), TimeConstraints::new(10, 1.0));
        PlanArgs::default().apply_overrides(&mut request);
        assert_eq!(request.constraints, TimeConstraints::new(10, 1.0));
    }
}
