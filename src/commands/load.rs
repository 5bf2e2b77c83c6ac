//! `marksrank load` command - import a JSON reference pack

use serde_json::json;

use crate::cli::LoadArgs;
use crate::commands::dispatch::{trace_command, CommandContext};
use crate::commands::format::{output_by_format_result, print_json_status};
use marksrank_core::error::Result;
use marksrank_core::pack::ReferencePack;

/// Execute the load command
pub fn execute(ctx: &CommandContext, args: &LoadArgs) -> Result<()> {
    let pack = ReferencePack::from_path(&args.pack)?;
    trace_command!(ctx.cli, ctx.start, "read_pack");

    let (db, path) = ctx.create_database()?;
    let stats = db.load_pack(&pack, args.replace)?;
    trace_command!(ctx.cli, ctx.start, "load_pack");

    output_by_format_result!(ctx.cli.format,
        json => print_json_status(
            "ok",
            Some("Reference pack loaded"),
            &[
                ("database", json!(path.display().to_string())),
                ("replace", json!(args.replace)),
                ("stats", json!(stats)),
            ],
        ),
        human => {
            if !ctx.cli.quiet {
                println!(
                    "Loaded {} score rows and {} exam dates into {}",
                    stats.score_rows,
                    stats.difficulty_dates,
                    path.display()
                );
                if stats.shift_columns_added > 0 {
                    println!("Added {} shift columns", stats.shift_columns_added);
                }
            }
            if !stats.appended_to.is_empty() {
                eprintln!(
                    "warning: appended to tables that already had rows: {} (use --replace to re-import)",
                    stats.appended_to.join(", ")
                );
            }
        }
    )
}
