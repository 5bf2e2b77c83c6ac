//! `marksrank status` command - row counts and schema version

use serde_json::json;

use crate::commands::dispatch::CommandContext;
use crate::commands::format::{output_by_format_result, print_json};
use marksrank_core::error::Result;

/// Execute the status command
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let path = ctx.db_path();
    let db = ctx.open_database()?;
    let version = db.get_schema_version()?;
    let counts = db.table_counts()?;
    let shifts = db.shift_columns()?;

    output_by_format_result!(ctx.cli.format,
        json => print_json(&json!({
            "database": path.display().to_string(),
            "schema_version": version,
            "interpolation": ctx.interpolation(),
            "tables": counts,
            "shift_columns": shifts,
        })),
        human => {
            println!("Database: {}", path.display());
            println!("Schema version: {}", version);
            println!("Interpolation: {}", ctx.interpolation());
            for count in &counts {
                println!("  {:<28} {:>6} rows", count.table, count.rows);
            }
            println!("Shift columns: {}", shifts.len());
        }
    )
}
