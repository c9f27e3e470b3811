#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode};
use pathwise_core::PlannerConfig;
use pathwise_core::config::{load_config_file, load_project_config};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "pathwise: prerequisite-aware study planning",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides `--json` and the `FORMAT` env var).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Planner config file. Defaults to `.pathwise/config.toml` when present.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }

    fn planner_config(&self) -> anyhow::Result<PlannerConfig> {
        match self.config {
            Some(ref path) => load_config_file(path),
            None => {
                let cwd = env::current_dir().context("Failed to resolve working directory")?;
                load_project_config(&cwd)
            }
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analyze",
        about = "Validate a roadmap",
        long_about = "Run structural rules (cycles, connectivity, hours, prerequisite consistency) over a roadmap.",
        after_help = "EXAMPLES:\n    # Run every configured rule\n    pw validate roadmap.yaml\n\n    # Run selected rules only\n    pw validate roadmap.json --rule no-cycles --rule reasonable-hours\n\n    # Emit machine-readable output\n    pw validate roadmap.json --json"
    )]
    Validate(cmd::validate::ValidateArgs),

    #[command(
        next_help_heading = "Analyze",
        about = "List prerequisite cycles",
        after_help = "EXAMPLES:\n    # Show every cycle\n    pw cycles roadmap.yaml"
    )]
    Cycles(cmd::cycles::CyclesArgs),

    #[command(
        name = "critical-path",
        next_help_heading = "Analyze",
        about = "Longest hour-weighted prerequisite chain",
        after_help = "EXAMPLES:\n    # Show the critical path\n    pw critical-path roadmap.yaml\n\n    # Emit machine-readable output\n    pw critical-path roadmap.yaml --json"
    )]
    CriticalPath(cmd::critical_path::CriticalPathArgs),

    #[command(
        next_help_heading = "Plan",
        about = "Suggest what to study next",
        long_about = "Order reviewable and unlocked nodes given learner progress.",
        after_help = "EXAMPLES:\n    # Sequence a request file\n    pw sequence request.json"
    )]
    Sequence(cmd::sequence::SequenceArgs),

    #[command(
        next_help_heading = "Plan",
        about = "Build a dated study plan",
        long_about = "Sequence the roadmap, then spread the remaining hours over study days and sessions.",
        after_help = "EXAMPLES:\n    # Plan from a request file\n    pw plan request.yaml\n\n    # Override the time budget\n    pw plan request.yaml --days 30 --hours 1.5 --exclude-weekends\n\n    # Pin the start date\n    pw plan request.yaml --start-date 2025-01-06 --json"
    )]
    Plan(cmd::plan::PlanArgs),

    #[command(
        next_help_heading = "Plan",
        about = "Sum a dated schedule into weeks",
        after_help = "EXAMPLES:\n    # Weeks counted from a start date\n    pw weekly schedule.json --start-date 2025-01-06"
    )]
    Weekly(cmd::weekly::WeeklyArgs),

    #[command(
        next_help_heading = "Shell",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    pw completions bash\n\n    # Generate zsh completions\n    pw completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PATHWISE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "pathwise=debug,info"
        } else {
            "pathwise=info,warn"
        })
    });

    let format = env::var("PATHWISE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(ref args) = cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let output = cli.output_mode();
    let config = match cli.planner_config() {
        Ok(config) => config,
        Err(err) => return cmd::fail(output, &CliError::config(&err)),
    };
    let ctx = cmd::RunContext {
        output,
        config,
        today: chrono::Local::now().date_naive(),
    };

    let result = match cli.command {
        Commands::Validate(ref args) => cmd::validate::run_validate(args, &ctx),
        Commands::Cycles(ref args) => cmd::cycles::run_cycles(args, &ctx),
        Commands::CriticalPath(ref args) => cmd::critical_path::run_critical_path(args, &ctx),
        Commands::Sequence(ref args) => cmd::sequence::run_sequence(args, &ctx),
        Commands::Plan(ref args) => cmd::plan::run_plan(args, &ctx),
        Commands::Weekly(ref args) => cmd::weekly::run_weekly(args, &ctx),
        Commands::Completions(_) => Ok(ExitCode::SUCCESS),
    };
    result.or_else(|err| cmd::fail(output, &CliError::unexpected(&err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_parses_before_and_after_subcommand() {
        let cli = Cli::parse_from(["pw", "--json", "cycles", "r.json"]);
        assert!(cli.json);
        let cli = Cli::parse_from(["pw", "cycles", "r.json", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["pw", "validate", "r.json", "--format", "text"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn rules_are_repeatable_and_parsed() {
        let cli = Cli::parse_from([
            "pw",
            "validate",
            "r.json",
            "--rule",
            "no-cycles",
            "--rule",
            "reasonable_hours",
        ]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(
            args.rules,
            [
                pathwise_core::ValidationRule::NoCycles,
                pathwise_core::ValidationRule::ReasonableHours
            ]
        );
    }

    #[test]
    fn unknown_rule_is_rejected() {
        assert!(Cli::try_parse_from(["pw", "validate", "r.json", "--rule", "fast"]).is_err());
    }

    #[test]
    fn plan_overrides_parse() {
        let cli = Cli::parse_from([
            "pw",
            "plan",
            "req.yaml",
            "--days",
            "30",
            "--hours",
            "1.5",
            "--exclude-weekends",
            "--start-date",
            "2025-01-06",
        ]);
        let Commands::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.days, Some(30));
        assert_eq!(args.hours, Some(1.5));
        assert!(args.exclude_weekends);
        assert_eq!(args.start_date.as_deref(), Some("2025-01-06"));
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["pw", "validate", "r.json"],
            vec!["pw", "cycles", "r.json"],
            vec!["pw", "critical-path", "r.json"],
            vec!["pw", "sequence", "q.json"],
            vec!["pw", "plan", "q.json"],
            vec!["pw", "weekly", "s.json", "--start-date", "2025-01-06"],
            vec!["pw", "completions", "bash"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(result.is_ok(), "Failed to parse: {args:?}: {:?}", result.err());
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
