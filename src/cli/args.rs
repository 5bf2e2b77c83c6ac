//! Argument structs for marksrank subcommands

use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

use super::parse::{parse_exam_date, parse_reference_table, parse_score};
use marksrank_core::reference::ReferenceTable;

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Reference pack (JSON)
    pub pack: PathBuf,

    /// Remove existing rows before importing. Without it, score rows are
    /// appended to what is stored, so re-importing a corrected pack needs it.
    #[arg(long)]
    pub replace: bool,
}

#[derive(Args, Debug)]
pub struct CalculateArgs {
    /// Mathematics marks
    #[arg(long, value_parser = parse_score)]
    pub math: f64,

    /// Physics marks
    #[arg(long, value_parser = parse_score)]
    pub physics: f64,

    /// Chemistry marks
    #[arg(long, value_parser = parse_score)]
    pub chemistry: f64,

    /// Exam date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_exam_date)]
    pub date: NaiveDate,

    /// Shift number
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub shift: u32,
}

#[derive(Args, Debug)]
pub struct DifficultyArgs {
    /// Exam date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_exam_date)]
    pub date: NaiveDate,

    /// Shift number
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub shift: u32,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Reference table (aggregate, math, physics-chemistry)
    #[arg(long, value_parser = parse_reference_table)]
    pub table: ReferenceTable,

    /// Difficulty label; anything other than Easy, Medium or Hard yields 0
    #[arg(long)]
    pub difficulty: String,

    /// Score to place in the table
    #[arg(long, value_parser = parse_score, allow_negative_numbers = true)]
    pub score: f64,
}
