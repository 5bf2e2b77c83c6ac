//! Command trait and context for dispatching commands

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::paths::resolve_db_path;
use crate::cli::Cli;
use marksrank_core::config::EstimatorConfig;
use marksrank_core::db::Database;
use marksrank_core::error::{RankError, Result};
use marksrank_core::interpolate::{InterpolationMode, JitterSource, RandomJitter};

use super::trace_command;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: &'a PathBuf,
    pub config: EstimatorConfig,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: &'a PathBuf, config: EstimatorConfig, start: Instant) -> Self {
        Self {
            cli,
            root,
            config,
            start,
        }
    }

    /// Database path from the flag, the config, or the default file name
    pub fn db_path(&self) -> PathBuf {
        resolve_db_path(
            self.cli.db.as_deref(),
            self.config.database.as_deref(),
            self.root,
        )
    }

    /// Open or create the database
    pub fn create_database(&self) -> Result<(Database, PathBuf)> {
        let path = self.db_path();
        let db = Database::open(&path, &self.config.tables)?;
        trace_command!(self.cli, self.start, "open_database");
        Ok((db, path))
    }

    /// Open an existing database read-only; a missing file is a usage error
    pub fn open_database(&self) -> Result<Database> {
        let path = self.db_path();
        if !path.exists() {
            return Err(no_database(&path));
        }
        let db = Database::open_existing(&path, &self.config.tables)?;
        trace_command!(self.cli, self.start, "open_database");
        Ok(db)
    }

    /// Jitter source: `--seed`, then the configured seed, then entropy
    pub fn jitter(&self) -> Box<dyn JitterSource> {
        match self.cli.seed.or(self.config.jitter_seed) {
            Some(seed) => Box::new(RandomJitter::seeded(seed)),
            None => Box::new(RandomJitter::from_entropy()),
        }
    }

    pub fn interpolation(&self) -> InterpolationMode {
        self.config.interpolation
    }
}

fn no_database(path: &Path) -> RankError {
    RankError::UsageError(format!(
        "no reference database at {} (run `marksrank init` and `marksrank load` first)",
        path.display()
    ))
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("marksrank {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Estimate exam percentiles from raw marks, exam date and shift.");
        println!();
        println!("Run `marksrank --help` for usage information.");
        Ok(())
    }
}
