//! Per-candidate state kept while aggregating one target's signals.

use data_loader::UserId;
use signals::SignalKind;
use std::collections::HashSet;

/// What is known about one candidate for the target being aggregated.
///
/// Transitions:
/// - absent -> `MutualFriends({c})` on `MutualVia(c)`
/// - `MutualFriends(s)` -> `MutualFriends(s + c)` on `MutualVia(c)`
/// - anything -> `Excluded` on `AlreadyFriend`
///
/// `Excluded` is absorbing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateState {
    /// The candidate is already a friend of the target
    Excluded,
    /// Distinct common friends seen so far. Never empty.
    MutualFriends(HashSet<UserId>),
}

impl CandidateState {
    /// State for a candidate seen for the first time
    pub fn from_kind(kind: SignalKind) -> Self {
        match kind {
            SignalKind::AlreadyFriend => CandidateState::Excluded,
            SignalKind::MutualVia(common) => CandidateState::MutualFriends(HashSet::from([common])),
        }
    }

    /// Fold one more signal into this state
    pub fn apply(&mut self, kind: SignalKind) {
        match (self, kind) {
            (state, SignalKind::AlreadyFriend) => *state = CandidateState::Excluded,
            (CandidateState::MutualFriends(common), SignalKind::MutualVia(c)) => {
                common.insert(c);
            }
            (CandidateState::Excluded, SignalKind::MutualVia(_)) => {}
        }
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self, CandidateState::Excluded)
    }

    /// Common friends seen so far, `None` when excluded
    pub fn common_friends(&self) -> Option<&HashSet<UserId>> {
        match self {
            CandidateState::Excluded => None,
            CandidateState::MutualFriends(common) => Some(common),
        }
    }

    /// Number of distinct common friends, `None` when excluded
    pub fn mutual_count(&self) -> Option<usize> {
        match self {
            CandidateState::Excluded => None,
            CandidateState::MutualFriends(common) => Some(common.len()),
        }
    }
}
