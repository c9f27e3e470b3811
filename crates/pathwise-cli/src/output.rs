//! Shared output layer for pretty/text/JSON parity across all commands.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format`
//! 2. `--json`
//! 3. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use pathwise_core::config::config_error_code;
use pathwise_core::{ErrorCode, ModelError};
use pathwise_graph::GraphError;
use pathwise_schedule::PlanError;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

use crate::input::InputError;

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<18} {}", format!("{key}:"), value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, aligned columns).
    Pretty,
    /// Token-efficient plain text for agents and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    pub const fn is_pretty(self) -> bool {
        matches!(self, Self::Pretty)
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    if let Some(val) = format_env {
        match val.to_lowercase().as_str() {
            "json" => return OutputMode::Json,
            "text" => return OutputMode::Text,
            "pretty" => return OutputMode::Pretty,
            _ => {} // unknown value, fall through to TTY detection
        }
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, and TTY defaults.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(format_flag, json_flag, env_val.as_deref(), is_tty)
}

/// Render a serializable value to stdout in the requested format.
///
/// In JSON mode the value is serialized with `serde_json`. Otherwise
/// `human_fn` writes the text, receiving the mode so it can choose between
/// pretty framing and terse rows.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, OutputMode, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_value(mode, value, human_fn, &mut out)
}

fn write_value<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, OutputMode, &mut dyn Write) -> io::Result<()>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => human_fn(value, mode, out)?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (`E####`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    pub fn with_details(
        message: impl Into<String>,
        suggestion: impl Into<String>,
        error_code: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            suggestion: Some(suggestion.into()),
            error_code: Some(error_code.into()),
        }
    }

    fn from_code(message: String, code: ErrorCode) -> Self {
        Self {
            message,
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }

    /// A config file that could not be loaded.
    pub fn config(err: &anyhow::Error) -> Self {
        Self::from_code(format!("{err:#}"), config_error_code(err))
    }

    /// Anything a command handler propagated with `?`.
    pub fn unexpected(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<InputError>() {
            Some(input) => Self::from(input),
            None => Self::from_code(format!("{err:#}"), ErrorCode::InternalUnexpected),
        }
    }
}

impl From<&InputError> for CliError {
    fn from(err: &InputError) -> Self {
        Self::from_code(err.to_string(), err.error_code())
    }
}

impl From<&ModelError> for CliError {
    fn from(err: &ModelError) -> Self {
        Self::with_details(err.to_string(), err.suggestion(), err.error_code().code())
    }
}

impl From<&GraphError> for CliError {
    fn from(err: &GraphError) -> Self {
        Self::from_code(err.to_string(), err.error_code())
    }
}

impl From<&PlanError> for CliError {
    fn from(err: &PlanError) -> Self {
        Self::from_code(err.to_string(), err.error_code())
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(mode, error, &mut out)
}

fn write_error(mode: OutputMode, error: &CliError, out: &mut dyn Write) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match &error.error_code {
                Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Format hours for human output.
pub fn hours(value: f64) -> String {
    format!("{value:.2}h")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── resolve_output_mode_inner ───────────────────────────────────────────

    #[test]
    fn format_flag_wins_over_json_and_env() {
        let mode = resolve_output_mode_inner(Some(OutputMode::Text), true, Some("pretty"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("text"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn format_env_is_case_insensitive() {
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("JSON"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("Text"), true),
            OutputMode::Text
        );
    }

    #[test]
    fn unknown_env_falls_through_to_tty() {
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("yaml"), true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("yaml"), false),
            OutputMode::Text
        );
    }

    // ── rendering ───────────────────────────────────────────────────────────

    #[test]
    fn json_mode_serializes_value() {
        let mut buf = Vec::new();
        write_value(OutputMode::Json, &vec!["a", "b"], |_, _, _| Ok(()), &mut buf).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, serde_json::json!(["a", "b"]));
    }

    #[test]
    fn text_mode_uses_human_fn() {
        let mut buf = Vec::new();
        write_value(
            OutputMode::Text,
            &3,
            |v, mode, w| writeln!(w, "{v} {}", mode.is_pretty()),
            &mut buf,
        )
        .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "3 false\n");
    }

    #[test]
    fn model_error_carries_code_and_hint() {
        let err = CliError::from(&ModelError::DuplicateNodeId("x".to_string()));
        assert_eq!(err.error_code.as_deref(), Some("E2002"));
        assert!(err.suggestion.is_some());

        let mut buf = Vec::new();
        write_error(OutputMode::Text, &err, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("error[E2002]: duplicate node id 'x'"), "{text}");
        assert!(text.contains("suggestion:"));
    }

    #[test]
    fn json_error_is_wrapped() {
        let err = CliError::from(&GraphError::Cyclic {
            cycles: vec![vec!["a".into(), "a".into()]],
        });
        let mut buf = Vec::new();
        write_error(OutputMode::Json, &err, &mut buf).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["error"]["error_code"], "E2003");
    }

    #[test]
    fn propagated_input_error_keeps_its_code() {
        let err = anyhow::Error::from(InputError::Read {
            path: "missing.json".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        });
        let cli = CliError::unexpected(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E5001"));
        assert!(cli.message.starts_with("Failed to read missing.json"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn other_propagated_errors_are_internal() {
        let err = anyhow::anyhow!("stdout closed");
        let cli = CliError::unexpected(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E9001"));
        assert_eq!(cli.message, "stdout closed");
    }

    #[test]
    fn config_parse_failure_maps_to_config_code() {
        let source = toml::from_str::<toml::Value>("[schedule").unwrap_err();
        let err = anyhow::Error::from(source).context("Failed to parse planner.toml");
        let cli = CliError::config(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E1001"));
        assert!(cli.message.starts_with("Failed to parse planner.toml: "));
    }

    #[test]
    fn hours_are_two_decimals() {
        assert_eq!(hours(1.0 / 3.0), "0.33h");
    }
}
