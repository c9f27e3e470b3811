//! `pw critical-path`: longest hour-weighted prerequisite chain.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use pathwise_core::Roadmap;
use pathwise_graph::{CriticalPath, RoadmapGraph, compute_critical_path};

use super::{RunContext, fail};
use crate::input::load_document;
use crate::output::{CliError, OutputMode, hours, pretty_kv, pretty_section, render};

/// Arguments for `pw critical-path`.
#[derive(Args, Debug)]
pub struct CriticalPathArgs {
    /// Roadmap file (`nodes` + `edges`), JSON, YAML or TOML.
    pub roadmap: PathBuf,
}

/// Execute `pw critical-path`. Refuses cyclic roadmaps.
pub fn run_critical_path(args: &CriticalPathArgs, ctx: &RunContext) -> anyhow::Result<ExitCode> {
    let roadmap: Roadmap = load_document(&args.roadmap)?;
    if let Err(err) = roadmap.validate_shape(&[]) {
        return fail(ctx.output, &CliError::from(&err));
    }
    let graph = RoadmapGraph::from_parts(&roadmap.nodes, &roadmap.edges);
    match compute_critical_path(&graph) {
        Ok(path) => {
            render(ctx.output, &path, render_path_human)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(ctx.output, &CliError::from(&err)),
    }
}

fn render_path_human(path: &CriticalPath, mode: OutputMode, w: &mut dyn Write) -> io::Result<()> {
    if path.is_empty() {
        return writeln!(w, "Roadmap has no nodes.");
    }
    if !mode.is_pretty() {
        return writeln!(w, "{}\t{}", path.path.join(" -> "), hours(path.total_hours));
    }

    pretty_section(w, "Critical path")?;
    pretty_kv(w, "length", path.len().to_string())?;
    pretty_kv(w, "total hours", hours(path.total_hours))?;
    writeln!(w)?;
    for (i, id) in path.path.iter().enumerate() {
        writeln!(w, "{:>3}. {id}", i + 1)?;
    }
    Ok(())
}
