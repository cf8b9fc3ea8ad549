//! Counters collected while a job runs.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Summary of a finished job
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobReport {
    pub input_files: Vec<PathBuf>,
    pub lines_read: usize,
    pub records: usize,
    /// Lines without the two-field shape
    pub malformed_skipped: usize,
    /// Lines with an id that is not a number
    pub rejected: usize,
    pub signals_emitted: usize,
    pub targets: usize,
    pub users_written: usize,
    pub part_files: Vec<PathBuf>,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl JobReport {
    /// Lines that produced no signals because they were dropped
    pub fn dropped_lines(&self) -> usize {
        self.malformed_skipped + self.rejected
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the summary to the log
    pub fn log_summary(&self) {
        info!(
            "Job finished in {:.2?}: {} lines, {} records, {} signals, {} users written",
            self.elapsed, self.lines_read, self.records, self.signals_emitted, self.users_written
        );
        if self.dropped_lines() > 0 {
            info!(
                "Dropped {} lines ({} malformed, {} rejected)",
                self.dropped_lines(),
                self.malformed_skipped,
                self.rejected
            );
        }
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(elapsed.as_millis() as u64)
    }
}
