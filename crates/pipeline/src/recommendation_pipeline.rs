//! The RecommendationPipeline wires both stages around a grouper.
//!
//! ```ignore
//! let pipeline = RecommendationPipeline::new()
//!     .with_emitter(PairEmitter::new().with_dedup_friends(false))
//!     .with_aggregator(RecommendationAggregator::new().with_top_n(5));
//!
//! let lists = pipeline.run(&records);
//! ```

use crate::aggregator::RecommendationAggregator;
use crate::recommendation::RecommendationList;
use crate::shuffle::InMemoryGrouper;
use crate::traits::{SignalBatch, SignalGrouper};
use data_loader::AdjacencyRecord;
use rayon::prelude::*;
use signals::{PairEmitter, Signal};
use tracing::{debug, instrument};

/// Runs emit -> group -> aggregate over records held in memory.
pub struct RecommendationPipeline {
    emitter: PairEmitter,
    grouper: Box<dyn SignalGrouper>,
    aggregator: RecommendationAggregator,
}

impl RecommendationPipeline {
    /// Default stages with an `InMemoryGrouper`
    pub fn new() -> Self {
        Self {
            emitter: PairEmitter::new(),
            grouper: Box::new(InMemoryGrouper),
            aggregator: RecommendationAggregator::new(),
        }
    }

    pub fn with_emitter(mut self, emitter: PairEmitter) -> Self {
        self.emitter = emitter;
        self
    }

    /// Swap the grouping step (builder pattern)
    pub fn with_grouper(mut self, grouper: impl SignalGrouper + 'static) -> Self {
        self.grouper = Box::new(grouper);
        self
    }

    pub fn with_aggregator(mut self, aggregator: RecommendationAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Stage one over all records, in parallel
    pub fn emit_all(&self, records: &[AdjacencyRecord]) -> Vec<Signal> {
        records
            .par_iter()
            .fold(Vec::new, |mut local, record| {
                self.emitter.emit_into(record, &mut local);
                local
            })
            .reduce(Vec::new, |mut acc, local| {
                acc.extend(local);
                acc
            })
    }

    /// Stage two over all batches, in parallel. Output keeps batch order.
    pub fn aggregate_all(&self, batches: Vec<SignalBatch>) -> Vec<RecommendationList> {
        batches
            .into_par_iter()
            .map(|batch| self.aggregator.aggregate(batch.target, batch.signals))
            .collect()
    }

    /// Run the whole job and return one list per target that received signals
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn run(&self, records: &[AdjacencyRecord]) -> Vec<RecommendationList> {
        let signals = self.emit_all(records);
        debug!("Emitted {} signals", signals.len());

        let batches = self.grouper.group(signals);
        debug!(
            "Grouper {} produced {} batches",
            self.grouper.name(),
            batches.len()
        );

        let lists = self.aggregate_all(batches);
        debug!("Aggregated {} recommendation lists", lists.len());
        lists
    }
}

impl Default for RecommendationPipeline {
    fn default() -> Self {
        Self::new()
    }
}
