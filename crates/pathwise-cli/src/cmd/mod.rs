pub mod completions;
pub mod critical_path;
pub mod cycles;
pub mod plan;
pub mod sequence;
pub mod validate;
pub mod weekly;

use chrono::NaiveDate;
use pathwise_core::PlannerConfig;
use std::process::ExitCode;

use crate::output::{CliError, OutputMode, render_error};

/// State shared by every command handler.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub output: OutputMode,
    pub config: PlannerConfig,
    /// Calendar anchor for missing or unparsable start dates.
    pub today: NaiveDate,
}

/// Print a domain failure and return the failing exit code.
pub fn fail(output: OutputMode, error: &CliError) -> anyhow::Result<ExitCode> {
    render_error(output, error)?;
    Ok(ExitCode::FAILURE)
}
