//! marksrank - exam percentile estimator
//!
//! Estimates overall and per-subject percentiles from raw marks, the exam
//! date and the shift, using marks-to-percentile reference tables.

mod cli;
mod commands;

use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use marksrank_core::error::{ExitCode as RankExitCode, RankError};
use marksrank_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return argument_error(err),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => exit_with(RankExitCode::Success),
        Err(e) => {
            match cli.format {
                OutputFormat::Json => eprintln!("{}", e.to_json()),
                OutputFormat::Human if !cli.quiet => eprintln!("error: {}", e),
                OutputFormat::Human => {}
            }
            exit_with(e.exit_code())
        }
    }
}

fn exit_with(code: RankExitCode) -> ExitCode {
    ExitCode::from(code as u8)
}

/// Report a clap failure. Scripts asking for JSON get the error envelope
/// even though `Cli.format` was never parsed.
fn argument_error(err: clap::Error) -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !requests_json(&args) {
        err.exit();
    }

    let error = match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::ArgumentConflict
        | ErrorKind::MissingRequiredArgument => RankError::UsageError(err.to_string()),
        _ => RankError::Other(err.to_string()),
    };
    eprintln!("{}", error.to_json());
    exit_with(error.exit_code())
}

fn requests_json(args: &[String]) -> bool {
    args.iter().any(|a| a == "--format=json")
        || args.windows(2).any(|w| w[0] == "--format" && w[1] == "json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_requests_json() {
        assert!(requests_json(&args(&["--format", "json", "calculate"])));
        assert!(requests_json(&args(&["status", "--format=json"])));
        assert!(!requests_json(&args(&["--format", "human", "json"])));
        assert!(!requests_json(&args(&["--format"])));
    }
}
