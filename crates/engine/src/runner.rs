//! # Local Job Runner
//!
//! Runs the two-stage recommendation job on one machine, standing in for a
//! distributed batch engine:
//! 1. Resolve input files and cut them into line splits
//! 2. Map: parse and emit signals for every split in parallel
//! 3. Shuffle: route signals to reduce partitions by target
//! 4. Reduce: aggregate each target's batch, write one part file per partition
//! 5. Write the `_SUCCESS` marker
//!
//! Lines with a non-numeric id are skipped and counted, unless the job runs
//! in strict mode, where the first one fails the job.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::config::JobConfig;
use crate::error::{EngineError, Result};
use crate::output;
use crate::partition::PartitionedGrouper;
use crate::report::JobReport;
use data_loader::{DataLoadError, parser};
use pipeline::{RecommendationAggregator, RecommendationList, SignalBatch};
use signals::{PairEmitter, Signal};

/// Rejected lines logged individually before switching to a summary
const MAX_LOGGED_REJECTIONS: usize = 20;

/// A contiguous run of lines from one input file
struct InputSplit<'a> {
    file: &'a str,
    first_line: usize,
    lines: &'a [&'a str],
}

/// What the map phase produced for one or more splits
#[derive(Default)]
struct MapOutput {
    signals: Vec<Signal>,
    lines: usize,
    records: usize,
    skipped: usize,
    rejected: Vec<DataLoadError>,
}

impl MapOutput {
    fn merge(mut self, other: MapOutput) -> Self {
        self.signals.extend(other.signals);
        self.lines += other.lines;
        self.records += other.records;
        self.skipped += other.skipped;
        self.rejected.extend(other.rejected);
        self
    }
}

/// Runs recommendation jobs against the local file system
#[derive(Debug, Clone)]
pub struct LocalJobRunner {
    config: JobConfig,
    emitter: PairEmitter,
    aggregator: RecommendationAggregator,
    cancelled: Arc<AtomicBool>,
}

impl LocalJobRunner {
    pub fn new(config: JobConfig) -> Self {
        let emitter = PairEmitter::new().with_dedup_friends(config.dedup_friends);
        let aggregator = RecommendationAggregator::new().with_top_n(config.top_n);
        Self {
            config,
            emitter,
            aggregator,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a cancellation flag; setting it stops the job at the next phase boundary
    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Run the job from `input` (file or directory) into the `output` directory
    #[instrument(skip(self, input, output), fields(input = %input.display(), output = %output.display()))]
    pub fn run(&self, input: &Path, output: &Path) -> Result<JobReport> {
        let start_time = Instant::now();
        self.config.validate()?;

        if output.exists() {
            return Err(EngineError::OutputExists {
                path: output.display().to_string(),
            });
        }

        let input_files = parser::resolve_input_files(input)?;
        info!("Resolved {} input file(s)", input_files.len());

        let inputs = self.read_inputs(&input_files)?;
        self.check_cancelled("read")?;

        // Map
        let phase = Instant::now();
        let line_index: Vec<(&str, Vec<&str>)> = inputs
            .iter()
            .map(|(name, text)| (name.as_str(), text.lines().collect()))
            .collect();
        let splits = self.build_splits(&line_index);
        let mapped = self.map_phase(&splits);
        info!(
            "Map phase: {} splits, {} records, {} signals in {:.2?}",
            splits.len(),
            mapped.records,
            mapped.signals.len(),
            phase.elapsed()
        );
        let rejected = self.handle_rejections(mapped.rejected)?;
        self.check_cancelled("map")?;

        let mut report = JobReport {
            input_files,
            lines_read: mapped.lines,
            records: mapped.records,
            malformed_skipped: mapped.skipped,
            rejected,
            signals_emitted: mapped.signals.len(),
            ..Default::default()
        };

        // Shuffle
        let phase = Instant::now();
        let partitions = PartitionedGrouper::new(self.config.reducers).partition(mapped.signals);
        report.targets = partitions.iter().map(|p| p.len()).sum();
        info!(
            "Shuffle phase: {} targets across {} partition(s) in {:.2?}",
            report.targets,
            partitions.len(),
            phase.elapsed()
        );
        self.check_cancelled("shuffle")?;

        // Reduce
        let phase = Instant::now();
        fs::create_dir_all(output)?;
        let written = self.reduce_phase(partitions, output)?;
        report.users_written = written.iter().map(|(_, users)| users).sum();
        report.part_files = written.into_iter().map(|(path, _)| path).collect();
        info!(
            "Reduce phase: {} users written in {:.2?}",
            report.users_written,
            phase.elapsed()
        );
        self.check_cancelled("reduce")?;

        output::write_success_marker(output)?;

        report.elapsed = start_time.elapsed();
        report.log_summary();
        Ok(report)
    }

    /// Read every input file in parallel, keeping file order
    fn read_inputs(&self, files: &[PathBuf]) -> Result<Vec<(String, String)>> {
        let inputs = files
            .par_iter()
            .map(|path| {
                let name = path.display().to_string();
                parser::read_text_lossy(path).map(|text| (name, text))
            })
            .collect::<std::result::Result<Vec<_>, DataLoadError>>()?;
        Ok(inputs)
    }

    fn build_splits<'a>(&self, line_index: &'a [(&'a str, Vec<&'a str>)]) -> Vec<InputSplit<'a>> {
        let mut splits = Vec::new();
        for (file, lines) in line_index {
            for (chunk_idx, chunk) in lines.chunks(self.config.split_lines).enumerate() {
                splits.push(InputSplit {
                    file: *file,
                    first_line: chunk_idx * self.config.split_lines + 1,
                    lines: chunk,
                });
            }
        }
        splits
    }

    /// Parse and emit every split in parallel. Output keeps split order.
    fn map_phase(&self, splits: &[InputSplit<'_>]) -> MapOutput {
        splits
            .par_iter()
            .fold(MapOutput::default, |acc, split| acc.merge(self.map_split(split)))
            .reduce(MapOutput::default, MapOutput::merge)
    }

    fn map_split(&self, split: &InputSplit<'_>) -> MapOutput {
        let mut out = MapOutput::default();
        for (offset, line) in split.lines.iter().enumerate() {
            out.lines += 1;
            match parser::parse_adjacency_line(split.file, split.first_line + offset, line) {
                Ok(Some(record)) => {
                    out.records += 1;
                    self.emitter.emit_into(&record, &mut out.signals);
                }
                Ok(None) => {
                    if parser::is_malformed(line) {
                        out.skipped += 1;
                    }
                }
                Err(e) => out.rejected.push(e),
            }
        }
        debug!(
            "Mapped split {}:{} ({} lines, {} signals)",
            split.file,
            split.first_line,
            out.lines,
            out.signals.len()
        );
        out
    }

    /// Log rejected lines and return how many there were; in strict mode
    /// the first one fails the job
    fn handle_rejections(&self, rejected: Vec<DataLoadError>) -> Result<usize> {
        let count = rejected.len();
        if self.config.strict {
            if let Some(first) = rejected.into_iter().next() {
                return Err(EngineError::StrictRejected(first));
            }
            return Ok(0);
        }
        for e in rejected.iter().take(MAX_LOGGED_REJECTIONS) {
            warn!("Skipping record: {}", e);
        }
        if count > MAX_LOGGED_REJECTIONS {
            warn!(
                "... and {} more rejected records",
                count - MAX_LOGGED_REJECTIONS
            );
        }
        Ok(count)
    }

    /// Aggregate and write every partition, returning (part file, users written)
    fn reduce_phase(
        &self,
        partitions: Vec<Vec<SignalBatch>>,
        output: &Path,
    ) -> Result<Vec<(PathBuf, usize)>> {
        partitions
            .into_par_iter()
            .enumerate()
            .map(|(partition, batches)| {
                let lists: Vec<RecommendationList> = batches
                    .into_par_iter()
                    .map(|batch| self.aggregator.aggregate(batch.target, batch.signals))
                    .collect();
                let path = output::write_part(output, partition, &lists)?;
                Ok::<_, EngineError>((path, lists.len()))
            })
            .collect()
    }

    fn check_cancelled(&self, phase: &'static str) -> Result<()> {
        if self.cancelled.load(Ordering::Relaxed) {
            warn!("Job cancelled during {}", phase);
            return Err(EngineError::Cancelled { phase });
        }
        Ok(())
    }
}
