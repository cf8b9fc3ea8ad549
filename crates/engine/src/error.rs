//! Error types for the job runner.

use data_loader::DataLoadError;
use thiserror::Error;

/// Errors that stop a job
#[derive(Error, Debug)]
pub enum EngineError {
    /// Input could not be resolved or read
    #[error("Input error: {0}")]
    Input(#[from] DataLoadError),

    /// The output directory already exists; jobs never overwrite output
    #[error("Output directory already exists: {path}")]
    OutputExists { path: String },

    /// I/O error while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record was rejected while running in strict mode
    #[error("Rejected record in strict mode: {0}")]
    StrictRejected(DataLoadError),

    /// A line in an existing output file does not parse
    #[error("Malformed output line {line} in {file}: {reason}")]
    MalformedOutput {
        file: String,
        line: usize,
        reason: String,
    },

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The job was cancelled before it finished
    #[error("Job cancelled during {phase}")]
    Cancelled { phase: &'static str },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, EngineError>;
