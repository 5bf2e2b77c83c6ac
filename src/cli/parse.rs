use chrono::NaiveDate;

use marksrank_core::difficulty;
use marksrank_core::format::OutputFormat;
use marksrank_core::reference::ReferenceTable;

/// Parse an ISO exam date
pub fn parse_exam_date(s: &str) -> std::result::Result<NaiveDate, String> {
    difficulty::parse_exam_date(s).map_err(|e| e.to_string())
}

/// Parse an output format (human, json)
pub fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

/// Parse a logical reference table name
pub fn parse_reference_table(s: &str) -> std::result::Result<ReferenceTable, String> {
    s.parse::<ReferenceTable>().map_err(|e| e.to_string())
}

/// Parse a finite score
pub fn parse_score(s: &str) -> std::result::Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("invalid score: {s}")),
    }
}
