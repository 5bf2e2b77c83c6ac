//! `marksrank init` command - create the reference database
//!
//! Idempotent: existing tables and rows are left alone.

use serde_json::json;

use crate::commands::dispatch::CommandContext;
use crate::commands::format::{output_by_format_result, print_json_status};
use marksrank_core::error::Result;

/// Execute the init command
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let (db, path) = ctx.create_database()?;
    let version = db.get_schema_version()?;

    output_by_format_result!(ctx.cli.format,
        json => print_json_status(
            "ok",
            Some("Reference database initialized"),
            &[
                ("database", json!(path.display().to_string())),
                ("schema_version", json!(version)),
            ],
        ),
        human => {
            if !ctx.cli.quiet {
                println!("Initialized reference database at {}", path.display());
                println!();
                println!("Run `marksrank load <pack.json>` to import reference tables.");
            }
        }
    )
}
