//! `marksrank calculate` command - full percentile estimate
//!
//! Failures are reported as `evaluation failed`; the underlying error is
//! logged at debug level and still decides the exit code.

use tracing::debug;

use crate::cli::CalculateArgs;
use crate::commands::dispatch::{trace_command, CommandContext};
use crate::commands::format::{format_percentile, output_by_format_result, print_json};
use marksrank_core::error::Result;
use marksrank_core::evaluate::{Evaluator, PercentileResult, ScoreInput};

/// Execute the calculate command
pub fn execute(ctx: &CommandContext, args: &CalculateArgs) -> Result<()> {
    let result = evaluate(ctx, args).map_err(|e| {
        debug!(error = %e, error_type = e.error_type(), "calculate");
        e.evaluation_failed()
    })?;
    trace_command!(ctx.cli, ctx.start, "evaluate");

    output_by_format_result!(ctx.cli.format,
        json => print_json(&result),
        human => {
            println!("Overall percentile:   {}", format_percentile(result.overall));
            println!("Math percentile:      {}", format_percentile(result.math));
            println!("Physics percentile:   {}", format_percentile(result.physics));
            println!("Chemistry percentile: {}", format_percentile(result.chemistry));
        }
    )
}

fn evaluate(ctx: &CommandContext, args: &CalculateArgs) -> Result<PercentileResult> {
    let db = ctx.open_database()?;
    let tables = db.tables().clone();
    let mut jitter = ctx.jitter();

    let input = ScoreInput::new(args.math, args.physics, args.chemistry);
    Evaluator::new(&db, tables, jitter.as_mut())
        .with_mode(ctx.interpolation())
        .evaluate(input, args.date, args.shift)
}
