//! Signal types exchanged between the emit and aggregate stages.

use data_loader::UserId;
use std::fmt;

/// What a signal says about a (target, candidate) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalKind {
    /// The candidate is already a direct friend of the target
    AlreadyFriend,
    /// Target and candidate share this common friend
    MutualVia(UserId),
}

/// One unit of evidence for a target user, keyed by `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signal {
    pub target: UserId,
    pub candidate: UserId,
    pub kind: SignalKind,
}

impl Signal {
    pub fn already_friend(target: UserId, candidate: UserId) -> Self {
        Self {
            target,
            candidate,
            kind: SignalKind::AlreadyFriend,
        }
    }

    pub fn mutual_via(target: UserId, candidate: UserId, common_friend: UserId) -> Self {
        Self {
            target,
            candidate,
            kind: SignalKind::MutualVia(common_friend),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SignalKind::AlreadyFriend => {
                write!(f, "{} -> {} already friends", self.target, self.candidate)
            }
            SignalKind::MutualVia(common) => {
                write!(f, "{} -> {} via {}", self.target, self.candidate, common)
            }
        }
    }
}
