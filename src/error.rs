use std::path::PathBuf;

use thiserror::Error;

/// Custom Result type for this crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The Error type for pipeline operations.
///
/// Row-scoped variants (`TooManyFields`, `NumericField`) abort a single input row.
/// Everything else aborts the run. A row with missing fields is not an error at all:
/// the record builder returns `Ok(None)` for it.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration validation error: {0}")]
    ConfigValidationError(String),

    #[error("Input source '{}' could not be opened: {source}", .path.display())]
    SourceNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Line {line_number} has more than the {expected} fields declared by the header")]
    TooManyFields { expected: usize, line_number: u64 },

    #[error("Field '{column}' is not a valid integer: '{value}'")]
    NumericField { column: &'static str, value: String },

    #[error("Serialization/Deserialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl PipelineError {
    /// True for errors that only invalidate the current row.
    pub fn is_row_scoped(&self) -> bool {
        matches!(
            self,
            PipelineError::TooManyFields { .. } | PipelineError::NumericField { .. }
        )
    }
}
