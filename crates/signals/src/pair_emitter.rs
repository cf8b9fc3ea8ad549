//! Pair Emitter - stage one of the recommendation job
//!
//! Turns one adjacency record into keyed signals:
//!
//! ## Algorithm
//! 1. For each friend `f` of the owner, emit `(owner, f, AlreadyFriend)` and
//!    `(f, owner, AlreadyFriend)`. A friendship listed by only one side still
//!    keeps both users off each other's lists.
//! 2. For every pair `(fi, fj)` with `i < j` from the owner's friend list,
//!    the owner is a common friend of both. Emit `(fi, fj, MutualVia(owner))`
//!    and `(fj, fi, MutualVia(owner))`.
//!
//! Step 2 is quadratic in the friend-list length. Every mutual-friend signal
//! comes from it, so it cannot be skipped.
//!
//! The emitter holds only configuration and is stateless across records.

use crate::types::Signal;
use data_loader::{AdjacencyRecord, UserId};
use tracing::{instrument, trace};

/// Number of signals a friend list of length `n` produces: two exclusions
/// per friend plus two per unordered pair.
pub fn signal_count(n: usize) -> usize {
    2 * n + n * n.saturating_sub(1)
}

/// Emits exclusion and candidacy signals for adjacency records
#[derive(Debug, Clone, Copy)]
pub struct PairEmitter {
    /// Drop repeated friend ids before emitting
    dedup_friends: bool,
}

impl PairEmitter {
    /// Create a new emitter that deduplicates friend lists
    pub fn new() -> Self {
        Self {
            dedup_friends: true,
        }
    }

    /// Configure friend-list deduplication (default: true)
    pub fn with_dedup_friends(mut self, dedup: bool) -> Self {
        self.dedup_friends = dedup;
        self
    }

    /// Emit all signals for one record
    pub fn emit(&self, record: &AdjacencyRecord) -> Vec<Signal> {
        let mut out = Vec::new();
        self.emit_into(record, &mut out);
        out
    }

    /// Emit all signals for one record, appending to `out`
    #[instrument(level = "trace", skip(self, record, out), fields(owner = record.owner))]
    pub fn emit_into(&self, record: &AdjacencyRecord, out: &mut Vec<Signal>) {
        let friends = self.friend_list(record);
        let owner = record.owner;

        out.reserve(signal_count(friends.len()));

        for &friend in &friends {
            out.push(Signal::already_friend(owner, friend));
            out.push(Signal::already_friend(friend, owner));
        }

        for (i, &fi) in friends.iter().enumerate() {
            for &fj in &friends[i + 1..] {
                out.push(Signal::mutual_via(fi, fj, owner));
                out.push(Signal::mutual_via(fj, fi, owner));
            }
        }

        trace!("Emitted {} signals for {} friends", signal_count(friends.len()), friends.len());
    }

    /// The owner's friend list as it should be paired: never containing the
    /// owner, and free of repeats when dedup is on.
    fn friend_list(&self, record: &AdjacencyRecord) -> Vec<UserId> {
        let record = record.clone().without_self();
        if self.dedup_friends {
            record.dedup_friends().friends
        } else {
            record.friends
        }
    }
}

impl Default for PairEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignalKind;

    #[test]
    fn test_exclusions_come_first() {
        let emitter = PairEmitter::new();
        let signals = emitter.emit(&AdjacencyRecord::new(1, vec![2, 3]));

        assert_eq!(
            signals,
            vec![
                Signal::already_friend(1, 2),
                Signal::already_friend(2, 1),
                Signal::already_friend(1, 3),
                Signal::already_friend(3, 1),
                Signal::mutual_via(2, 3, 1),
                Signal::mutual_via(3, 2, 1),
            ]
        );
    }

    #[test]
    fn test_empty_and_single_friend_lists() {
        let emitter = PairEmitter::new();
        assert!(emitter.emit(&AdjacencyRecord::new(5, vec![])).is_empty());

        let signals = emitter.emit(&AdjacencyRecord::new(5, vec![6]));
        assert_eq!(
            signals,
            vec![Signal::already_friend(5, 6), Signal::already_friend(6, 5)]
        );
    }

    #[test]
    fn test_quadratic_pair_count() {
        let emitter = PairEmitter::new();
        let friends: Vec<UserId> = (10..20).collect();
        let signals = emitter.emit(&AdjacencyRecord::new(1, friends));

        assert_eq!(signals.len(), signal_count(10));
        let mutual = signals
            .iter()
            .filter(|s| matches!(s.kind, SignalKind::MutualVia(1)))
            .count();
        assert_eq!(mutual, 10 * 9);
    }

    #[test]
    fn test_duplicates_removed_by_default() {
        let record = AdjacencyRecord::new(1, vec![2, 3, 2]);

        let deduped = PairEmitter::new().emit(&record);
        assert_eq!(deduped.len(), signal_count(2));

        let raw = PairEmitter::new().with_dedup_friends(false).emit(&record);
        assert_eq!(raw.len(), signal_count(3));
    }

    #[test]
    fn test_owner_never_paired_with_itself() {
        let signals = PairEmitter::new()
            .with_dedup_friends(false)
            .emit(&AdjacencyRecord::new(1, vec![1, 2]));

        assert_eq!(
            signals,
            vec![Signal::already_friend(1, 2), Signal::already_friend(2, 1)]
        );
    }

    #[test]
    fn test_listed_friend_excludes_owner_too() {
        let signals = PairEmitter::new().emit(&AdjacencyRecord::new(3, vec![1, 2]));

        for friend in [1, 2] {
            assert!(signals.contains(&Signal::already_friend(3, friend)));
            assert!(signals.contains(&Signal::already_friend(friend, 3)));
        }
    }

    #[test]
    fn test_emit_into_appends() {
        let emitter = PairEmitter::new();
        let mut out = vec![Signal::already_friend(9, 9)];
        emitter.emit_into(&AdjacencyRecord::new(1, vec![2]), &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], Signal::already_friend(9, 9));
    }
}
