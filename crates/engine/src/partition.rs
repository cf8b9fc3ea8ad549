//! Partitioned shuffle: the grouping step of the job runner.
//!
//! Signals are routed to a reduce partition by `target mod partitions`
//! (never negative, since ids may be), so
//! every signal for one target lands in the same partition. Each partition
//! is then grouped by target in key order.

use data_loader::UserId;
use pipeline::{InMemoryGrouper, SignalBatch, SignalGrouper};
use rayon::prelude::*;
use signals::Signal;

/// Reduce partition a target is routed to
pub fn partition_for(target: UserId, partitions: usize) -> usize {
    target.rem_euclid(partitions as UserId) as usize
}

/// Hash-partitioned grouper with `partitions` reduce partitions
#[derive(Debug, Clone, Copy)]
pub struct PartitionedGrouper {
    partitions: usize,
}

impl PartitionedGrouper {
    /// `partitions` is clamped to at least one
    pub fn new(partitions: usize) -> Self {
        Self {
            partitions: partitions.max(1),
        }
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// Route signals to partitions, then group each partition in parallel.
    ///
    /// The result always has `partitions` entries, some possibly empty.
    pub fn partition(&self, signals: Vec<Signal>) -> Vec<Vec<SignalBatch>> {
        let mut routed: Vec<Vec<Signal>> = vec![Vec::new(); self.partitions];
        for signal in signals {
            routed[partition_for(signal.target, self.partitions)].push(signal);
        }
        routed
            .into_par_iter()
            .map(|part| InMemoryGrouper.group(part))
            .collect()
    }
}

impl SignalGrouper for PartitionedGrouper {
    fn name(&self) -> &str {
        "PartitionedGrouper"
    }

    fn group(&self, signals: Vec<Signal>) -> Vec<SignalBatch> {
        self.partition(signals).into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_stay_together() {
        let signals = vec![
            Signal::already_friend(1, 2),
            Signal::already_friend(2, 1),
            Signal::mutual_via(3, 5, 4),
            Signal::mutual_via(1, 3, 2),
        ];
        let parts = PartitionedGrouper::new(2).partition(signals);

        assert_eq!(parts.len(), 2);
        let odd: Vec<UserId> = parts[1].iter().map(|b| b.target).collect();
        assert_eq!(odd, vec![1, 3]);
        assert_eq!(parts[1][0].signals.len(), 2);
        assert_eq!(parts[0][0].target, 2);
    }

    #[test]
    fn test_empty_partitions_are_kept() {
        let parts = PartitionedGrouper::new(4).partition(vec![Signal::already_friend(8, 1)]);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0].len(), 1);
        assert!(parts[1..].iter().all(|p| p.is_empty()));
    }

    #[test]
    fn test_negative_targets_route_in_range() {
        assert_eq!(partition_for(-1, 3), 2);
        assert_eq!(partition_for(-3, 3), 0);
        assert_eq!(partition_for(4, 3), 1);

        let parts = PartitionedGrouper::new(3).partition(vec![Signal::already_friend(-7, 1)]);
        assert_eq!(parts[2][0].target, -7);
    }

    #[test]
    fn test_zero_partitions_clamped() {
        assert_eq!(PartitionedGrouper::new(0).partitions(), 1);
    }
}
