//! Aggregation and ranking for mutual-friend recommendations.
//!
//! This crate provides:
//! - CandidateState, the per-candidate state of one aggregation
//! - RecommendationAggregator, which turns one target's signals into a ranked list
//! - RecommendationList, the output record and its text layout
//! - SignalGrouper, the boundary to whatever groups signals by target
//! - RecommendationPipeline for running both stages in memory
//!
//! ## Architecture
//! The job processes adjacency records in stages:
//! 1. PairEmitter (signals crate) emits exclusion and candidacy signals per record
//! 2. A SignalGrouper collects all signals for each target into one batch
//! 3. RecommendationAggregator ranks each batch into at most `top_n` entries
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{RecommendationAggregator, RecommendationPipeline};
//!
//! let pipeline = RecommendationPipeline::new()
//!     .with_aggregator(RecommendationAggregator::new().with_top_n(10));
//!
//! for list in pipeline.run(&records) {
//!     println!("{}", list);
//! }
//! ```

pub mod traits;
pub mod candidate_state;
pub mod aggregator;
pub mod recommendation;
pub mod shuffle;
pub mod recommendation_pipeline;

// Re-export main types
pub use traits::{SignalBatch, SignalGrouper};
pub use candidate_state::CandidateState;
pub use aggregator::{DEFAULT_TOP_N, RecommendationAggregator};
pub use recommendation::{RecommendationEntry, RecommendationList};
pub use shuffle::InMemoryGrouper;
pub use recommendation_pipeline::RecommendationPipeline;
