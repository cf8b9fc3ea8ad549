//! Engine crate for the friend recommendation job.
//!
//! A local stand-in for the distributed batch engine the job is written
//! for: it splits input, runs the map stage in parallel, shuffles signals
//! into reduce partitions, runs the reduce stage and writes part files.

pub mod config;
pub mod error;
pub mod output;
pub mod partition;
pub mod report;
pub mod runner;

pub use config::JobConfig;
pub use error::{EngineError, Result};
pub use partition::PartitionedGrouper;
pub use report::JobReport;
pub use runner::LocalJobRunner;
