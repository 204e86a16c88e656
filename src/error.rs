use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool reads, reshapes, or writes the registration export.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the delimited text reader or writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the source ends before the header row is reached.
    #[error("expected a header at row {header_row} but the file has only {found} rows")]
    MissingHeader { header_row: usize, found: usize },

    /// Raised when a data row carries more cells than the header declares.
    #[error("line {line} has {found} fields but the header declares {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Raised when a column required by a reshape step is absent.
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// Raised when a postcode cell holds text that is not a number.
    #[error("invalid count '{value}' for postcode {postcode} on line {line}")]
    InvalidCount {
        postcode: String,
        line: usize,
        value: String,
    },

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
