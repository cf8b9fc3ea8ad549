//! Integration tests for the pipeline.
//!
//! These run both stages end to end over in-memory records and check the
//! output against a brute-force answer computed from a `FriendGraph`.

use data_loader::parser::parse_adjacency_str;
use data_loader::{AdjacencyRecord, FriendGraph, UserId};
use pipeline::{
    InMemoryGrouper, RecommendationAggregator, RecommendationEntry, RecommendationList,
    RecommendationPipeline, SignalBatch, SignalGrouper,
};
use proptest::prelude::*;
use signals::{PairEmitter, Signal, SignalKind};
use std::collections::{BTreeMap, BTreeSet};

fn render(lists: &[RecommendationList]) -> Vec<String> {
    lists.iter().map(|l| l.to_string()).collect()
}

/// Groups like `InMemoryGrouper` but hands each batch over in reverse.
struct ReversingGrouper;

impl SignalGrouper for ReversingGrouper {
    fn name(&self) -> &str {
        "ReversingGrouper"
    }

    fn group(&self, signals: Vec<Signal>) -> Vec<SignalBatch> {
        InMemoryGrouper
            .group(signals)
            .into_iter()
            .map(|mut batch| {
                batch.signals.reverse();
                batch
            })
            .collect()
    }
}

/// Build symmetric adjacency records from an edge list
fn records_from_edges(edges: &[(UserId, UserId)]) -> Vec<AdjacencyRecord> {
    let mut adjacency: BTreeMap<UserId, BTreeSet<UserId>> = BTreeMap::new();
    for &(a, b) in edges {
        if a == b {
            continue;
        }
        adjacency.entry(a).or_default().insert(b);
        adjacency.entry(b).or_default().insert(a);
    }
    adjacency
        .into_iter()
        .map(|(owner, friends)| AdjacencyRecord::new(owner, friends.into_iter().collect()))
        .collect()
}

/// Build adjacency records exactly as listed: `(a, b)` means only `a` lists `b`
fn records_as_listed(edges: &[(UserId, UserId)]) -> Vec<AdjacencyRecord> {
    let mut adjacency: BTreeMap<UserId, Vec<UserId>> = BTreeMap::new();
    for &(a, b) in edges {
        adjacency.entry(a).or_default().push(b);
    }
    adjacency
        .into_iter()
        .map(|(owner, friends)| AdjacencyRecord::new(owner, friends))
        .collect()
}

/// Brute-force answer: every non-friend with at least one mutual friend,
/// ranked by count then id, for every user that has friends.
fn reference(records: &[AdjacencyRecord], top_n: usize) -> Vec<RecommendationList> {
    let graph = FriendGraph::from_records(records);
    graph
        .users()
        .filter(|&user| graph.friends_of(user).is_some_and(|f| !f.is_empty()))
        .map(|target| {
            let mut entries: Vec<RecommendationEntry> = graph
                .users()
                .filter(|&c| c != target && !graph.are_friends(target, c))
                .filter_map(|c| {
                    let count = graph.mutual_friends(target, c).len();
                    (count > 0).then(|| RecommendationEntry::new(c, count))
                })
                .collect();
            entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.candidate.cmp(&b.candidate)));
            entries.truncate(top_n);
            RecommendationList::new(target, entries)
        })
        .collect()
}

#[test]
fn test_square_scenario() {
    let parsed = parse_adjacency_str("input", "1\t2,3\n2\t1,4\n3\t1,4\n4\t2,3\n");
    let lists = RecommendationPipeline::new().run(&parsed.records);

    assert_eq!(
        render(&lists),
        vec!["1\t4 (2)", "2\t3 (2)", "3\t2 (2)", "4\t1 (2)"]
    );
}

#[test]
fn test_friendless_owner_produces_no_record() {
    let parsed = parse_adjacency_str("input", "1\t2,3\n2\t1,4\n3\t1,4\n4\t2,3\n5\t\n");
    let lists = RecommendationPipeline::new().run(&parsed.records);

    assert_eq!(lists.len(), 4);
    assert!(lists.iter().all(|l| l.target != 5));
}

#[test]
fn test_one_sided_listing_excludes_both_ways() {
    let parsed = parse_adjacency_str("input", "1\t2\n3\t1,2\n");
    let lists = RecommendationPipeline::new().run(&parsed.records);

    // 1 lists 2 and 3 lists both, so every pair is a friendship
    assert_eq!(render(&lists), vec!["1\t", "2\t", "3\t"]);
}

#[test]
fn test_explanation_follows_listed_friends() {
    let parsed = parse_adjacency_str("input", "1\t2\n2\t4\n3\t1,4\n");
    let pipeline = RecommendationPipeline::new();
    let signals: Vec<Signal> = pipeline
        .emit_all(&parsed.records)
        .into_iter()
        .filter(|s| s.target == 1)
        .collect();

    let (list, common) = RecommendationAggregator::new().aggregate_explained(1, signals);
    assert_eq!(list.to_string(), "1\t4 (1)");
    assert_eq!(common[&4], BTreeSet::from([3]));
}

#[test]
fn test_negative_ids_take_part() {
    let parsed = parse_adjacency_str("input", "-1\t2,3\n2\t-1,4\n3\t-1,4\n4\t2,3\n");
    assert!(parsed.rejected.is_empty());

    let lists = RecommendationPipeline::new().run(&parsed.records);
    assert_eq!(
        render(&lists),
        vec!["-1\t4 (2)", "2\t3 (2)", "3\t2 (2)", "4\t-1 (2)"]
    );
}

#[test]
fn test_star_is_truncated_to_ten() {
    let records = records_from_edges(&(1..=15).map(|f| (0, f)).collect::<Vec<_>>());
    let lists = RecommendationPipeline::new().run(&records);

    let hub = lists.iter().find(|l| l.target == 0).unwrap();
    assert!(hub.is_empty());

    let leaf = lists.iter().find(|l| l.target == 1).unwrap();
    assert_eq!(leaf.len(), 10);
    assert_eq!(leaf.candidates().collect::<Vec<_>>(), (2..=11).collect::<Vec<UserId>>());
    assert!(leaf.entries.iter().all(|e| e.count == 1));
}

#[test]
fn test_duplicate_friends_do_not_inflate_counts() {
    let clean = parse_adjacency_str("input", "1\t2,3\n2\t1,4\n3\t1,4\n4\t2,3\n");
    let dirty = parse_adjacency_str("input", "1\t2,3,3\n2\t1,4,1\n3\t1,4\n4\t2,3,2,3\n");

    let expected = render(&RecommendationPipeline::new().run(&clean.records));
    for dedup in [true, false] {
        let pipeline =
            RecommendationPipeline::new().with_emitter(PairEmitter::new().with_dedup_friends(dedup));
        assert_eq!(render(&pipeline.run(&dirty.records)), expected);
    }
}

#[test]
fn test_reversed_batches_give_same_output() {
    let records = records_from_edges(&[(1, 2), (1, 3), (2, 3), (3, 4), (4, 5), (2, 5), (6, 1)]);

    let forward = RecommendationPipeline::new().run(&records);
    let reversed = RecommendationPipeline::new()
        .with_grouper(ReversingGrouper)
        .run(&records);
    assert_eq!(forward, reversed);
}

#[test]
fn test_top_n_is_configurable() {
    let records = records_from_edges(&(1..=6).map(|f| (0, f)).collect::<Vec<_>>());
    let pipeline = RecommendationPipeline::new()
        .with_aggregator(RecommendationAggregator::new().with_top_n(2));

    for list in pipeline.run(&records) {
        assert!(list.len() <= 2);
    }
}

fn edge_lists() -> impl Strategy<Value = Vec<(UserId, UserId)>> {
    prop::collection::vec((-8i64..8, -8i64..8), 0..48)
}

fn signal_kinds() -> impl Strategy<Value = SignalKind> {
    prop_oneof![
        1 => Just(SignalKind::AlreadyFriend),
        4 => (0i64..6).prop_map(SignalKind::MutualVia),
    ]
}

proptest! {
    #[test]
    fn prop_matches_reference(edges in edge_lists()) {
        let records = records_from_edges(&edges);
        let lists = RecommendationPipeline::new().run(&records);
        prop_assert_eq!(lists, reference(&records, 10));
    }

    #[test]
    fn prop_no_friend_or_self_is_recommended(edges in edge_lists()) {
        let records = records_from_edges(&edges);
        let graph = FriendGraph::from_records(&records);

        for list in RecommendationPipeline::new().run(&records) {
            prop_assert!(list.len() <= 10);
            for candidate in list.candidates() {
                prop_assert_ne!(candidate, list.target);
                prop_assert!(!graph.are_friends(list.target, candidate));
            }
            for pair in list.entries.windows(2) {
                prop_assert!(
                    pair[0].count > pair[1].count
                        || (pair[0].count == pair[1].count && pair[0].candidate < pair[1].candidate)
                );
            }
        }
    }

    #[test]
    fn prop_one_sided_listings_still_exclude(edges in edge_lists()) {
        let records = records_as_listed(&edges);
        let graph = FriendGraph::from_records(&records);

        for list in RecommendationPipeline::new().run(&records) {
            for candidate in list.candidates() {
                prop_assert_ne!(candidate, list.target);
                prop_assert!(!graph.are_friends(list.target, candidate));
            }
        }
    }

    #[test]
    fn prop_explanations_match_counts(edges in edge_lists()) {
        let records = records_as_listed(&edges);
        let pipeline = RecommendationPipeline::new();
        let signals = pipeline.emit_all(&records);

        for list in pipeline.run(&records) {
            let batch: Vec<Signal> = signals
                .iter()
                .copied()
                .filter(|s| s.target == list.target)
                .collect();
            let (explained, common) =
                RecommendationAggregator::new().aggregate_explained(list.target, batch);

            prop_assert_eq!(&explained, &list);
            for entry in &list.entries {
                prop_assert_eq!(common[&entry.candidate].len(), entry.count);
            }
        }
    }

    #[test]
    fn prop_line_order_does_not_matter(
        (records, shuffled) in edge_lists()
            .prop_map(|edges| records_from_edges(&edges))
            .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
    ) {
        let pipeline = RecommendationPipeline::new();
        prop_assert_eq!(pipeline.run(&records), pipeline.run(&shuffled));
    }

    #[test]
    fn prop_signal_order_does_not_matter(
        (signals, shuffled) in prop::collection::vec((0i64..8, signal_kinds()), 0..40)
            .prop_map(|raw| {
                raw.into_iter()
                    .map(|(candidate, kind)| Signal { target: 1, candidate, kind })
                    .collect::<Vec<_>>()
            })
            .prop_flat_map(|signals| (Just(signals.clone()), Just(signals).prop_shuffle()))
    ) {
        let aggregator = RecommendationAggregator::new();
        prop_assert_eq!(aggregator.aggregate(1, signals), aggregator.aggregate(1, shuffled));
    }
}
