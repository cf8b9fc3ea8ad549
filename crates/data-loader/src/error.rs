//! Error types for the data-loader crate.
//!
//! Malformed lines (wrong field count) are not errors: the parser reports them as
//! skipped. Only data-integrity problems, such as a user id that is not a number,
//! surface as `DataLoadError`.

use thiserror::Error;

/// Errors that can occur while loading adjacency data
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A user id (owner or friend) is not a valid integer
    #[error("Invalid user id {value:?} at line {line} in {file}: {reason}")]
    InvalidUserId {
        file: String,
        line: usize,
        value: String,
        reason: String,
    },
}

impl DataLoadError {
    /// Line number the error refers to, if it is tied to one
    pub fn line(&self) -> Option<usize> {
        match self {
            DataLoadError::InvalidUserId { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
