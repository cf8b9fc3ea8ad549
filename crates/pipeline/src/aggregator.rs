//! Recommendation Aggregator - stage two of the recommendation job
//!
//! Receives every signal keyed on one target user and reduces them to a
//! ranked recommendation list.
//!
//! ## Algorithm
//! 1. Fold signals into a `candidate -> CandidateState` map. An
//!    `AlreadyFriend` signal excludes the candidate for good; a `MutualVia(c)`
//!    adds `c` to the candidate's set of common friends.
//! 2. Keep candidates that are not excluded, with `count = |common friends|`.
//! 3. Sort by count descending, then candidate id ascending.
//! 4. Keep the first `top_n`.
//!
//! The result does not depend on the order the signals arrive in.

use crate::candidate_state::CandidateState;
use crate::recommendation::{RecommendationEntry, RecommendationList};
use data_loader::UserId;
use signals::Signal;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::collections::hash_map::Entry;
use tracing::{instrument, trace, warn};

/// Default number of recommendations kept per user
pub const DEFAULT_TOP_N: usize = 10;

/// Reduces one target's signal batch into a `RecommendationList`
#[derive(Debug, Clone, Copy)]
pub struct RecommendationAggregator {
    top_n: usize,
}

impl RecommendationAggregator {
    pub fn new() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Configure how many recommendations to keep (default: 10)
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Aggregate all signals for `target` into its recommendation list
    #[instrument(level = "debug", skip(self, signals))]
    pub fn aggregate<I>(&self, target: UserId, signals: I) -> RecommendationList
    where
        I: IntoIterator<Item = Signal>,
    {
        let states = self.fold_states(target, signals);
        let entries = self.rank(states);
        trace!("Target {} has {} recommendations", target, entries.len());
        RecommendationList::new(target, entries)
    }

    /// Aggregate like `aggregate`, also returning the common friends behind
    /// each ranked entry. Counts and friend sets come from the same fold.
    pub fn aggregate_explained<I>(
        &self,
        target: UserId,
        signals: I,
    ) -> (RecommendationList, BTreeMap<UserId, BTreeSet<UserId>>)
    where
        I: IntoIterator<Item = Signal>,
    {
        let states = self.fold_states(target, signals);
        let mut common: BTreeMap<UserId, BTreeSet<UserId>> = states
            .iter()
            .filter_map(|(&candidate, state)| {
                state
                    .common_friends()
                    .map(|friends| (candidate, friends.iter().copied().collect()))
            })
            .collect();

        let entries = self.rank(states);
        common.retain(|candidate, _| entries.iter().any(|e| e.candidate == *candidate));
        (RecommendationList::new(target, entries), common)
    }

    /// Build the per-candidate state map for one target
    pub fn fold_states<I>(&self, target: UserId, signals: I) -> HashMap<UserId, CandidateState>
    where
        I: IntoIterator<Item = Signal>,
    {
        let mut states: HashMap<UserId, CandidateState> = HashMap::new();

        for signal in signals {
            if signal.target != target {
                warn!(
                    "Dropping signal for target {} delivered to target {}",
                    signal.target, target
                );
                continue;
            }
            if signal.candidate == target {
                continue;
            }
            match states.entry(signal.candidate) {
                Entry::Occupied(mut state) => state.get_mut().apply(signal.kind),
                Entry::Vacant(slot) => {
                    slot.insert(CandidateState::from_kind(signal.kind));
                }
            }
        }

        states
    }

    /// Materialize, sort and truncate the surviving candidates.
    fn rank(&self, states: HashMap<UserId, CandidateState>) -> Vec<RecommendationEntry> {
        let mut entries: Vec<RecommendationEntry> = states
            .into_iter()
            .filter_map(|(candidate, state)| {
                state
                    .mutual_count()
                    .map(|count| RecommendationEntry::new(candidate, count))
            })
            .collect();

        entries.sort_unstable_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.candidate.cmp(&b.candidate))
        });
        entries.truncate(self.top_n);
        entries
    }
}

impl Default for RecommendationAggregator {
    fn default() -> Self {
        Self::new()
    }
}
