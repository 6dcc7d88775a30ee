#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::error::{HarnessError, Result};
use crate::replay::{Report, replay};
use crate::scenario::{Scenario, SectionSpec};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "REGROUP_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "regroup-replay",
    about = "Replay scripted drag scenarios against a headless regroup list",
    version
)]
pub struct Cli {
    /// Log at debug level, ignoring REGROUP_LOG.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a scenario and print what it committed.
    Run(RunArgs),

    /// Parse and validate scenario files without replaying them.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Scenario file (.toml or .json).
    pub scenario: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Write the report here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(required = true)]
    pub scenarios: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per commit plus the final order.
    Summary,
    /// The full report, including frames.
    Json,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli, &mut std::io::stdout().lock())
}

/// Install a stderr `fmt` subscriber filtered by [`LOG_ENV`] (default
/// `warn`), or at `debug` when `verbose`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run_scenario(&args, out),
        Commands::Validate(args) => {
            for path in &args.scenarios {
                Scenario::load(path)?.validated()?;
                writeln!(out, "ok {}", path.display()).map_err(HarnessError::Output)?;
            }
            Ok(())
        }
    }
}

fn run_scenario(args: &RunArgs, out: &mut dyn Write) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let report = replay(&scenario)?;
    let rendered = match args.format {
        OutputFormat::Summary => summary(&report),
        OutputFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
    };
    match &args.output {
        Some(path) => std::fs::write(path, rendered).map_err(HarnessError::Output),
        None => out
            .write_all(rendered.as_bytes())
            .map_err(HarnessError::Output),
    }
}

fn order(sections: &[SectionSpec]) -> String {
    sections
        .iter()
        .map(|s| format!("{}[{}]", s.id, s.items.join(" ")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain-text digest of a report.
pub fn summary(report: &Report) -> String {
    let mut text = String::new();
    let name = if report.name.is_empty() {
        "(unnamed)"
    } else {
        report.name.as_str()
    };
    text.push_str(&format!("scenario: {name}\n"));
    text.push_str(&format!(
        "steps: {}  frames: {}  commits: {}\n",
        report.steps,
        report.frames_ticked,
        report.commits.len()
    ));
    for commit in &report.commits {
        text.push_str(&format!(
            "commit @ step {}: {}\n",
            commit.step,
            order(&commit.sections)
        ));
    }
    text.push_str(&format!("final: {}\n", order(&report.final_sections)));
    text.push_str(&format!(
        "scroll_y: {}  content_height: {}\n",
        report.final_frame.scroll_y, report.final_frame.content_height
    ));
    text
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tempfile::tempdir;

    use super::*;

    const SCENARIO: &str = r#"
name = "cli"

[[sections]]
id = "A"
items = ["a1", "a2", "a3"]

[[steps]]
op = "item_pan"
section = "A"
item = "a3"
event = { kind = "begin", y = 165.0 }

[[steps]]
op = "item_pan"
section = "A"
item = "a3"
event = { kind = "update", y = 100.0 }

[[steps]]
op = "item_pan"
section = "A"
item = "a3"
event = { kind = "update", y = 60.0 }

[[steps]]
op = "item_pan"
section = "A"
item = "a3"
event = { kind = "end" }

[[steps]]
op = "settle"
"#;

    #[test]
    fn parses_run_with_flags() {
        let cli = Cli::parse_from(["regroup-replay", "-v", "run", "s.toml", "--format", "json"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.scenario, PathBuf::from("s.toml"));
                assert_eq!(args.format, OutputFormat::Json);
                assert!(args.output.is_none());
            }
            Commands::Validate(_) => panic!("expected run"),
        }
    }

    #[test]
    fn validate_requires_a_path() {
        assert!(Cli::try_parse_from(["regroup-replay", "validate"]).is_err());
    }

    #[test]
    fn run_prints_summary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.toml");
        std::fs::write(&path, SCENARIO).unwrap();

        let mut out = Vec::new();
        let cli = Cli::parse_from(["regroup-replay", "run", path.to_str().unwrap()]);
        run(cli, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("scenario: cli"));
        assert!(text.contains("commits: 1"));
        assert!(text.contains("commit @ step 3: A[a3 a1 a2]"));
        assert!(text.contains("final: A[a3 a1 a2]"));
    }

    #[test]
    fn run_writes_json_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.toml");
        let output = dir.path().join("report.json");
        std::fs::write(&path, SCENARIO).unwrap();

        let cli = Cli::parse_from([
            "regroup-replay",
            "run",
            path.to_str().unwrap(),
            "--format",
            "json",
            "-o",
            output.to_str().unwrap(),
        ]);
        let mut out = Vec::new();
        run(cli, &mut out).unwrap();
        assert!(out.is_empty());

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["name"], "cli");
        assert_eq!(json["commits"][0]["sections"][0]["items"][0], "a3");
        assert_eq!(json["final_frame"]["sections"][0]["id"], "A");
    }

    #[test]
    fn validate_reports_missing_file() {
        let cli = Cli::parse_from(["regroup-replay", "validate", "/nonexistent/s.toml"]);
        let err = run(cli, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, HarnessError::Io { .. }));
        assert_eq!(err.exit_code(), 74);
    }
}
