//! `pw validate`: run structural rules over a roadmap.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use pathwise_core::{DifficultyDistribution, Roadmap, ValidationRule};
use pathwise_graph::{Severity, ValidationReport, validate_graph};
use serde::Serialize;

use super::{RunContext, fail};
use crate::input::load_document;
use crate::output::{CliError, OutputMode, hours, pretty_kv, pretty_section, render};

/// Arguments for `pw validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Roadmap file (`nodes` + `edges`), JSON, YAML or TOML.
    pub roadmap: PathBuf,

    /// Rule to run (repeatable). Defaults to the configured rule set.
    #[arg(long = "rule", value_name = "RULE")]
    pub rules: Vec<ValidationRule>,
}

/// Validation report plus roadmap totals.
#[derive(Debug, Serialize)]
struct RoadmapCheck {
    #[serde(flatten)]
    report: ValidationReport,
    estimated_hours: f64,
    difficulty: DifficultyDistribution,
}

/// Execute `pw validate`. Exits non-zero when any error-severity issue is found.
pub fn run_validate(args: &ValidateArgs, ctx: &RunContext) -> anyhow::Result<ExitCode> {
    let roadmap: Roadmap = load_document(&args.roadmap)?;
    if let Err(err) = roadmap.validate_shape(&[]) {
        return fail(ctx.output, &CliError::from(&err));
    }

    let rules = if args.rules.is_empty() {
        ctx.config.validation.rules.as_slice()
    } else {
        args.rules.as_slice()
    };
    let check = RoadmapCheck {
        report: validate_graph(&roadmap.nodes, &roadmap.edges, rules, &ctx.config.validation),
        estimated_hours: roadmap.total_estimated_hours(),
        difficulty: roadmap.difficulty_distribution(),
    };

    render(ctx.output, &check, render_check_human)?;
    Ok(if check.report.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn render_check_human(check: &RoadmapCheck, mode: OutputMode, w: &mut dyn Write) -> io::Result<()> {
    let report = &check.report;
    let verdict = if report.is_valid { "valid" } else { "invalid" };

    if !mode.is_pretty() {
        writeln!(
            w,
            "{verdict} errors={} warnings={} info={}",
            report.count(Severity::Error),
            report.count(Severity::Warning),
            report.count(Severity::Info)
        )?;
        for issue in &report.issues {
            writeln!(w, "{}\t{}\t{}", issue.severity, issue.rule, issue.message)?;
        }
        return Ok(());
    }

    pretty_section(w, &format!("Roadmap is {verdict}"))?;
    if let Some(m) = report.metrics.metrics() {
        pretty_kv(w, "nodes", m.node_count.to_string())?;
        pretty_kv(w, "edges", m.edge_count.to_string())?;
        pretty_kv(w, "components", m.component_count.to_string())?;
        pretty_kv(w, "complexity", format!("{:.2}", m.complexity_score))?;
    } else {
        pretty_kv(w, "nodes", "0")?;
    }
    let d = check.difficulty;
    pretty_kv(w, "total hours", hours(check.estimated_hours))?;
    pretty_kv(
        w,
        "difficulty",
        format!("easy {} / medium {} / hard {}", d.easy, d.medium, d.hard),
    )?;

    if !report.issues.is_empty() {
        writeln!(w)?;
        pretty_section(w, &format!("Issues ({})", report.issues.len()))?;
        for issue in &report.issues {
            writeln!(w, "[{}] {}: {}", issue.severity, issue.rule, issue.message)?;
            if let Some(ref hint) = issue.suggestion {
                writeln!(w, "    hint: {hint}")?;
            }
        }
    }

    if !report.suggestions.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Suggestions")?;
        for s in &report.suggestions {
            writeln!(w, "- {s}")?;
        }
    }
    Ok(())
}
