//! `marksrank difficulty` command - show a shift's difficulty label

use serde_json::json;

use crate::cli::DifficultyArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{output_by_format_result, print_json};
use marksrank_core::difficulty::{format_date_key, resolve_difficulty};
use marksrank_core::error::Result;

/// Execute the difficulty command
pub fn execute(ctx: &CommandContext, args: &DifficultyArgs) -> Result<()> {
    let db = ctx.open_database()?;
    let difficulty = resolve_difficulty(&db, &db.tables().difficulty, args.date, args.shift)?;

    output_by_format_result!(ctx.cli.format,
        json => print_json(&json!({
            "date": args.date.to_string(),
            "date_key": format_date_key(args.date),
            "shift": args.shift,
            "difficulty": difficulty,
        })),
        human => {
            println!("{}", difficulty);
        }
    )
}
