//! Error types and exit codes for marksrank
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (data access, IO)
//! - 2: Usage error (bad flags/args, invalid values)
//! - 3: Data error (no difficulty for the date, missing column, unusable table)

mod macros;

use thiserror::Error;

/// Exit codes for the marksrank CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - reference data cannot answer the request (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<rusqlite::Error> for RankError {
    fn from(err: rusqlite::Error) -> Self {
        RankError::DataAccess {
            operation: "query reference data".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Errors that can occur while estimating percentiles
#[derive(Error, Debug)]
pub enum RankError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("invalid difficulty label: {label:?} (expected: Easy, Medium, or Hard)")]
    InvalidDifficulty { label: String },

    #[error("no difficulty recorded for {date} shift {shift}")]
    DifficultyNotFound { date: String, shift: u32 },

    #[error("column {column} does not exist in table {table}")]
    MissingColumn { table: String, column: String },

    #[error("reference table {table} has no rows")]
    EmptyTable { table: String },

    #[error("degenerate reference range around score {score}")]
    DegenerateRange { score: f64 },

    // Generic failures (exit code 1)
    #[error("failed to {operation}: {reason}")]
    DataAccess { operation: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),

    /// Boundary wrapper that hides query details from the caller
    #[error("evaluation failed")]
    EvaluationFailed {
        #[source]
        source: Box<RankError>,
    },
}

impl RankError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        RankError::DataAccess {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        RankError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a reference table with no usable rows
    pub fn empty_table(table: impl Into<String>) -> Self {
        RankError::EmptyTable {
            table: table.into(),
        }
    }

    /// Wrap an error so only a generic message reaches the caller
    pub fn evaluation_failed(self) -> Self {
        match self {
            already @ RankError::EvaluationFailed { .. } => already,
            other => RankError::EvaluationFailed {
                source: Box::new(other),
            },
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            // Usage errors
            RankError::UnknownFormat(_)
            | RankError::UsageError(_)
            | RankError::InvalidValue { .. } => ExitCode::Usage,

            // Data errors
            RankError::InvalidDifficulty { .. }
            | RankError::DifficultyNotFound { .. }
            | RankError::MissingColumn { .. }
            | RankError::EmptyTable { .. }
            | RankError::DegenerateRange { .. } => ExitCode::Data,

            // Generic failures
            RankError::DataAccess { .. }
            | RankError::Io(_)
            | RankError::Json(_)
            | RankError::Toml(_)
            | RankError::Other(_) => ExitCode::Failure,

            RankError::EvaluationFailed { source } => source.exit_code(),
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            RankError::UnknownFormat(_) => "unknown_format",
            RankError::UsageError(_) => "usage_error",
            RankError::InvalidValue { .. } => "invalid_value",
            RankError::InvalidDifficulty { .. } => "invalid_difficulty",
            RankError::DifficultyNotFound { .. } => "difficulty_not_found",
            RankError::MissingColumn { .. } => "missing_column",
            RankError::EmptyTable { .. } => "empty_table",
            RankError::DegenerateRange { .. } => "degenerate_range",
            RankError::DataAccess { .. } => "data_access",
            RankError::Io(_) => "io_error",
            RankError::Json(_) => "json_error",
            RankError::Toml(_) => "toml_error",
            RankError::Other(_) => "other",
            RankError::EvaluationFailed { .. } => "evaluation_failed",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for marksrank operations
pub type Result<T> = std::result::Result<T, RankError>;
