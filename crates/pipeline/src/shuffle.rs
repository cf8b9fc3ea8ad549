//! In-memory grouping step.

use crate::traits::{SignalBatch, SignalGrouper};
use data_loader::UserId;
use signals::Signal;
use std::collections::BTreeMap;

/// Groups signals by target in a single `BTreeMap`.
///
/// Batches come out in ascending target order, like reducer keys in a
/// sorted shuffle.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryGrouper;

impl SignalGrouper for InMemoryGrouper {
    fn name(&self) -> &str {
        "InMemoryGrouper"
    }

    fn group(&self, signals: Vec<Signal>) -> Vec<SignalBatch> {
        let mut groups: BTreeMap<UserId, Vec<Signal>> = BTreeMap::new();
        for signal in signals {
            groups.entry(signal.target).or_default().push(signal);
        }
        groups
            .into_iter()
            .map(|(target, signals)| SignalBatch { target, signals })
            .collect()
    }
}
