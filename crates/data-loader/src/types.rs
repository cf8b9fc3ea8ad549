//! Core domain types for friendship adjacency data.
//!
//! Input is one adjacency record per line: a user id, a tab, and a
//! comma-separated list of that user's friends.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user. Opaque, signed and totally ordered.
pub type UserId = i64;

// =============================================================================
// Adjacency Records
// =============================================================================

/// One parsed input line: a user and the friends it lists.
///
/// The friend list keeps input order; it may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyRecord {
    pub owner: UserId,
    pub friends: Vec<UserId>,
}

impl AdjacencyRecord {
    pub fn new(owner: UserId, friends: Vec<UserId>) -> Self {
        Self { owner, friends }
    }

    /// Drop repeated friend ids, keeping the first occurrence of each.
    pub fn dedup_friends(mut self) -> Self {
        let mut seen = HashSet::with_capacity(self.friends.len());
        self.friends.retain(|friend| seen.insert(*friend));
        self
    }

    /// Drop the owner from its own friend list.
    pub fn without_self(mut self) -> Self {
        let owner = self.owner;
        self.friends.retain(|&friend| friend != owner);
        self
    }
}

/// Outcome of parsing a whole input source.
///
/// Malformed lines are only counted; lines with bad ids are kept as errors
/// so the caller can report them.
#[derive(Debug, Default)]
pub struct ParsedInput {
    pub records: Vec<AdjacencyRecord>,
    /// Non-blank lines that did not split into exactly two fields
    pub skipped: usize,
    /// Lines rejected because an id did not parse
    pub rejected: Vec<crate::error::DataLoadError>,
    /// Total lines read, blank ones included
    pub lines: usize,
}

impl ParsedInput {
    /// Fold another parsed source into this one.
    pub fn merge(&mut self, other: ParsedInput) {
        self.records.extend(other.records);
        self.skipped += other.skipped;
        self.rejected.extend(other.rejected);
        self.lines += other.lines;
    }
}

// =============================================================================
// FriendGraph - symmetric in-memory friendship index
// =============================================================================

/// Undirected friendship index built from adjacency records.
///
/// An edge exists if either side lists the other. `listed` remembers the
/// directed edges as they appeared in the input so one-sided listings can be
/// reported.
#[derive(Debug, Clone)]
pub struct FriendGraph {
    pub(crate) adjacency: BTreeMap<UserId, BTreeSet<UserId>>,
    pub(crate) listed: HashSet<(UserId, UserId)>,
}

impl FriendGraph {
    /// Creates a new, empty FriendGraph
    pub fn new() -> Self {
        Self {
            adjacency: BTreeMap::new(),
            listed: HashSet::new(),
        }
    }

    /// Friends of a user, in ascending order. `None` for unknown users.
    pub fn friends_of(&self, user: UserId) -> Option<&BTreeSet<UserId>> {
        self.adjacency.get(&user)
    }

    pub fn contains_user(&self, user: UserId) -> bool {
        self.adjacency.contains_key(&user)
    }

    /// True if either user listed the other.
    pub fn are_friends(&self, a: UserId, b: UserId) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|friends| friends.contains(&b))
    }

    /// All known users in ascending order
    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Record that `owner` lists `friend`. Self-listings are ignored.
    pub fn insert_edge(&mut self, owner: UserId, friend: UserId) {
        self.adjacency.entry(owner).or_default();
        if owner == friend {
            return;
        }
        self.listed.insert((owner, friend));
        self.adjacency.entry(owner).or_default().insert(friend);
        self.adjacency.entry(friend).or_default().insert(owner);
    }

    /// Insert every edge of one adjacency record
    pub fn insert_record(&mut self, record: &AdjacencyRecord) {
        self.adjacency.entry(record.owner).or_default();
        for &friend in &record.friends {
            self.insert_edge(record.owner, friend);
        }
    }

    /// Get counts for debugging/validation: (users, undirected edges)
    pub fn counts(&self) -> (usize, usize) {
        let degree_sum: usize = self.adjacency.values().map(|f| f.len()).sum();
        (self.adjacency.len(), degree_sum / 2)
    }
}

impl Default for FriendGraph {
    fn default() -> Self {
        Self::new()
    }
}
