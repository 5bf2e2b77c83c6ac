//! `marksrank lookup` command - interpolate a single score

use serde_json::json;

use crate::cli::LookupArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{format_percentile, output_by_format_result, print_json};
use marksrank_core::error::Result;
use marksrank_core::evaluate::percentile_for_label;

/// Execute the lookup command
pub fn execute(ctx: &CommandContext, args: &LookupArgs) -> Result<()> {
    let db = ctx.open_database()?;
    let table = db.tables().name_for(args.table).to_string();
    let mut jitter = ctx.jitter();

    let percentile = percentile_for_label(
        &db,
        &table,
        &args.difficulty,
        args.score,
        ctx.interpolation(),
        jitter.as_mut(),
    )?;

    output_by_format_result!(ctx.cli.format,
        json => print_json(&json!({
            "table": args.table,
            "difficulty": args.difficulty,
            "score": args.score,
            "percentile": percentile,
        })),
        human => {
            println!("{}", format_percentile(percentile));
        }
    )
}
