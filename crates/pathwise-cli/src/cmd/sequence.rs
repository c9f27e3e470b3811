//! `pw sequence`: what to study next, given progress.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use pathwise_core::{ProgressIndex, ProgressRecord, Roadmap};
use pathwise_graph::{LearningSequence, RoadmapGraph, suggest_sequence};
use serde::Deserialize;

use super::{RunContext, fail};
use crate::input::load_document;
use crate::output::{CliError, OutputMode, pretty_section, render};

/// Arguments for `pw sequence`.
#[derive(Args, Debug)]
pub struct SequenceArgs {
    /// Request file with `nodes`, `edges` and optional `progress`.
    pub request: PathBuf,
}

/// The subset of a plan request that sequencing reads. Other keys are ignored.
#[derive(Debug, Deserialize)]
struct SequenceRequest {
    #[serde(flatten)]
    roadmap: Roadmap,
    #[serde(default)]
    progress: Vec<ProgressRecord>,
}

/// Execute `pw sequence`.
pub fn run_sequence(args: &SequenceArgs, ctx: &RunContext) -> anyhow::Result<ExitCode> {
    let request: SequenceRequest = load_document(&args.request)?;
    let progress = match request
        .roadmap
        .validate_shape(&request.progress)
        .and_then(|()| ProgressIndex::from_records(&request.progress))
    {
        Ok(index) => index,
        Err(err) => return fail(ctx.output, &CliError::from(&err)),
    };

    let graph = RoadmapGraph::from_parts(&request.roadmap.nodes, &request.roadmap.edges);
    match suggest_sequence(&graph, &progress) {
        Ok(sequence) => {
            render(ctx.output, &sequence, render_sequence_human)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(ctx.output, &CliError::from(&err)),
    }
}

fn render_sequence_human(
    sequence: &LearningSequence,
    mode: OutputMode,
    w: &mut dyn Write,
) -> io::Result<()> {
    if !mode.is_pretty() {
        for id in &sequence.order {
            writeln!(w, "{id}")?;
        }
        return Ok(());
    }

    pretty_section(w, &format!("Study next ({})", sequence.len()))?;
    if sequence.is_empty() {
        writeln!(w, "Nothing is ready to study.")?;
    }
    for (i, id) in sequence.order.iter().enumerate() {
        let tag = if i < sequence.review_count { " (review)" } else { "" };
        writeln!(w, "{:>3}. {id}{tag}", i + 1)?;
    }
    if !sequence.blocked.is_empty() {
        writeln!(w, "\nBlocked: {}", sequence.blocked.join(", "))?;
    }
    if !sequence.completed.is_empty() {
        writeln!(w, "Completed: {}", sequence.completed.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LearningSequence {
        LearningSequence {
            order: vec!["r".into(), "n".into()],
            review_count: 1,
            blocked: vec!["b".into()],
            completed: vec!["c".into()],
        }
    }

    #[test]
    fn text_is_bare_ids() {
        let mut out = Vec::new();
        render_sequence_human(&sample(), OutputMode::Text, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "r\nn\n");
    }

    #[test]
    fn pretty_marks_reviews() {
        let mut out = Vec::new();
        render_sequence_human(&sample(), OutputMode::Pretty, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  1. r (review)"));
        assert!(text.contains("  2. n\n"));
        assert!(text.contains("Blocked: b"));
    }

    #[test]
    fn request_ignores_constraints() {
        let request: SequenceRequest = serde_json::from_str(
            r#"{"nodes": [{"id": "a", "estimated_hours": 1}], "constraints": {"target_days": 3}}"#,
        )
        .unwrap();
        assert_eq!(request.roadmap.nodes.len(), 1);
        assert!(request.progress.is_empty());
    }
}
