//! FriendGraph building and query logic.
//!
//! The graph is the symmetric view of the input: the recommendation job
//! itself never needs it, but the CLI uses it for stats and explanations,
//! and tests use it as a brute-force reference.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

impl FriendGraph {
    /// Build a graph from parsed records
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AdjacencyRecord>) -> Self {
        let mut graph = FriendGraph::new();
        for record in records {
            graph.insert_record(record);
        }
        graph
    }

    /// Load a graph from a file or a directory of files.
    ///
    /// Returns the graph together with the parse outcome so callers can
    /// report skipped and rejected lines.
    pub fn load_from_path(input: &Path) -> Result<(Self, ParsedInput)> {
        let files = parser::resolve_input_files(input)?;
        let parsed = parser::parse_adjacency_files(&files)?;
        let graph = FriendGraph::from_records(&parsed.records);

        let (users, edges) = graph.counts();
        info!(
            "Loaded {} users and {} friendships from {} file(s)",
            users,
            edges,
            files.len()
        );
        Ok((graph, parsed))
    }

    /// Users who are friends of both `a` and `b`, in ascending order.
    pub fn mutual_friends(&self, a: UserId, b: UserId) -> BTreeSet<UserId> {
        match (self.friends_of(a), self.friends_of(b)) {
            (Some(fa), Some(fb)) => fa.intersection(fb).copied().collect(),
            _ => BTreeSet::new(),
        }
    }

    /// Directed edges `(owner, friend)` where `friend` did not list `owner` back.
    pub fn asymmetric_edges(&self) -> Vec<(UserId, UserId)> {
        let mut edges: Vec<(UserId, UserId)> = self
            .listed
            .iter()
            .filter(|(owner, friend)| !self.listed.contains(&(*friend, *owner)))
            .copied()
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Users with no friends at all
    pub fn isolated_users(&self) -> Vec<UserId> {
        self.adjacency
            .iter()
            .filter(|(_, friends)| friends.is_empty())
            .map(|(&user, _)| user)
            .collect()
    }
}
