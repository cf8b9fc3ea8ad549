//! Core traits for the recommendation pipeline.
//!
//! The grouping step between the two stages belongs to whatever engine runs
//! the job. `SignalGrouper` is that boundary, so the stages can run on an
//! in-memory grouper in tests and on a partitioned one in the job runner.

use data_loader::UserId;
use signals::Signal;

/// All signals keyed on one target user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalBatch {
    pub target: UserId,
    pub signals: Vec<Signal>,
}

/// Groups a signal stream by target.
///
/// ## Contract
/// - every signal for a given target lands in the same batch
/// - a batch is produced only for targets that occur in the stream
/// - signal order within a batch is unspecified
///
/// `Send + Sync` lets one grouper serve parallel callers.
pub trait SignalGrouper: Send + Sync {
    /// Returns the name of this grouper (for logging/debugging)
    fn name(&self) -> &str;

    /// Group signals into per-target batches
    fn group(&self, signals: Vec<Signal>) -> Vec<SignalBatch>;
}
