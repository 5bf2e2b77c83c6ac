//! CLI argument parsing for marksrank
//!
//! Global flags: --db, --config, --format, --quiet, --verbose, --log-level,
//! --log-json, --seed

pub mod args;
pub mod format;
pub mod output;
pub mod parse;
pub mod paths;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{CalculateArgs, DifficultyArgs, LoadArgs, LookupArgs};
pub use output::OutputFormat;
use parse::parse_format;

/// marksrank - estimate exam percentiles from raw marks
#[derive(Parser, Debug)]
#[command(name = "marksrank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Reference database path
    #[arg(long, global = true, env = "MARKSRANK_DB")]
    pub db: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_parser = parse_format, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter level (error, warn, info, debug, trace) or directive
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Seed for reproducible jitter
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the reference database and its tables
    Init,

    /// Import a JSON reference pack
    Load(LoadArgs),

    /// Estimate overall and per-subject percentiles
    Calculate(CalculateArgs),

    /// Show the difficulty label of an exam shift
    Difficulty(DifficultyArgs),

    /// Interpolate one score in one reference table
    Lookup(LookupArgs),

    /// Show row counts and schema version
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_calculate_with_global_flags() {
        let cli = Cli::try_parse_from([
            "marksrank",
            "calculate",
            "--math",
            "80",
            "--physics",
            "70",
            "--chemistry",
            "60.5",
            "--date",
            "2024-05-04",
            "--shift",
            "2",
            "--seed",
            "7",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Some(Commands::Calculate(args)) => {
                assert_eq!(args.chemistry, 60.5);
                assert_eq!(args.shift, 2);
                assert_eq!(args.date.to_string(), "2024-05-04");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_format_defaults_to_human_and_rejects_unknown() {
        let cli = Cli::try_parse_from(["marksrank", "status"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Human);

        let err = Cli::try_parse_from(["marksrank", "--format", "yaml", "status"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let err = Cli::try_parse_from([
            "marksrank",
            "difficulty",
            "--date",
            "04-05-2024",
            "--shift",
            "1",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
