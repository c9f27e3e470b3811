//! `pw cycles`: list prerequisite cycles.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use pathwise_core::Roadmap;
use pathwise_graph::{RoadmapGraph, detect_cycles};
use serde::Serialize;

use super::{RunContext, fail};
use crate::input::load_document;
use crate::output::{CliError, OutputMode, render};

/// Arguments for `pw cycles`.
#[derive(Args, Debug)]
pub struct CyclesArgs {
    /// Roadmap file (`nodes` + `edges`), JSON, YAML or TOML.
    pub roadmap: PathBuf,
}

#[derive(Debug, Serialize)]
struct CyclesOutput {
    cycles: Vec<Vec<String>>,
}

/// Execute `pw cycles`. Finding cycles is not a failure.
pub fn run_cycles(args: &CyclesArgs, ctx: &RunContext) -> anyhow::Result<ExitCode> {
    let roadmap: Roadmap = load_document(&args.roadmap)?;
    if let Err(err) = roadmap.validate_shape(&[]) {
        return fail(ctx.output, &CliError::from(&err));
    }
    let graph = RoadmapGraph::from_parts(&roadmap.nodes, &roadmap.edges);
    let payload = CyclesOutput {
        cycles: detect_cycles(&graph),
    };

    let titles: HashMap<&str, &str> = roadmap
        .nodes
        .iter()
        .filter(|n| !n.title.is_empty())
        .map(|n| (n.id.as_str(), n.title.as_str()))
        .collect();

    render(ctx.output, &payload, |p, mode, w| {
        render_cycles_human(p, &titles, mode, w)
    })?;
    Ok(ExitCode::SUCCESS)
}

fn render_cycles_human(
    payload: &CyclesOutput,
    titles: &HashMap<&str, &str>,
    mode: OutputMode,
    w: &mut dyn Write,
) -> io::Result<()> {
    if payload.cycles.is_empty() {
        writeln!(w, "No prerequisite cycles found.")?;
        return Ok(());
    }

    if !mode.is_pretty() {
        for cycle in &payload.cycles {
            writeln!(w, "{}", cycle.join(" -> "))?;
        }
        return Ok(());
    }

    writeln!(w, "Prerequisite cycles ({})", payload.cycles.len())?;
    for (idx, cycle) in payload.cycles.iter().enumerate() {
        writeln!(w, "\nCycle {}:", idx + 1)?;
        // The closing repeat of the first node is implied.
        for node_id in &cycle[..cycle.len().saturating_sub(1)] {
            match titles.get(node_id.as_str()) {
                Some(title) => writeln!(w, "  - {node_id} ({title})")?,
                None => writeln!(w, "  - {node_id}")?,
            }
        }
    }
    Ok(())
}
