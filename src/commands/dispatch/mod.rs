//! Command dispatch logic for marksrank

use std::time::Instant;

use crate::cli::paths::current_dir;
use crate::cli::Cli;
use marksrank_core::config::EstimatorConfig;
use marksrank_core::error::Result;
use tracing::debug;

mod command;
mod commands;
mod macros;

pub(crate) use macros::trace_command;

pub use command::CommandContext;
use command::{Command, NoCommand};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let root = current_dir();
    let config = EstimatorConfig::discover(cli.config.as_deref())?;

    debug!(elapsed = ?start.elapsed(), "load_config");

    let ctx = CommandContext::new(cli, &root, config, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
