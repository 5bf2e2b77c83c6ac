//! Command implementations for all marksrank commands

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use marksrank_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Init => crate::commands::init::execute(ctx),
            Commands::Load(args) => crate::commands::load::execute(ctx, args),
            Commands::Calculate(args) => crate::commands::calculate::execute(ctx, args),
            Commands::Difficulty(args) => crate::commands::difficulty::execute(ctx, args),
            Commands::Lookup(args) => crate::commands::lookup::execute(ctx, args),
            Commands::Status => crate::commands::status::execute(ctx),
        }
    }
}
