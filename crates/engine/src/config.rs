//! Job configuration.

use crate::error::{EngineError, Result};
use pipeline::DEFAULT_TOP_N;
use serde::{Deserialize, Serialize};

/// Settings for one recommendation job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Recommendations kept per user
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Number of reduce partitions, and so of `part-r-NNNNN` files
    #[serde(default = "default_reducers")]
    pub reducers: usize,

    /// Input lines per map split
    #[serde(default = "default_split_lines")]
    pub split_lines: usize,

    /// Drop repeated friend ids before pairing
    #[serde(default = "default_dedup_friends")]
    pub dedup_friends: bool,

    /// Abort on the first record with a non-numeric id instead of skipping it
    #[serde(default)]
    pub strict: bool,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_reducers() -> usize {
    1
}

fn default_split_lines() -> usize {
    10_000
}

fn default_dedup_friends() -> bool {
    true
}

impl JobConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_reducers(mut self, reducers: usize) -> Self {
        self.reducers = reducers;
        self
    }

    pub fn with_split_lines(mut self, split_lines: usize) -> Self {
        self.split_lines = split_lines;
        self
    }

    pub fn with_dedup_friends(mut self, dedup: bool) -> Self {
        self.dedup_friends = dedup;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Check that partition and split sizes are usable
    pub fn validate(&self) -> Result<()> {
        if self.reducers == 0 {
            return Err(EngineError::InvalidConfig(
                "reducers must be at least 1".to_string(),
            ));
        }
        if self.split_lines == 0 {
            return Err(EngineError::InvalidConfig(
                "split_lines must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            reducers: default_reducers(),
            split_lines: default_split_lines(),
            dedup_friends: default_dedup_friends(),
            strict: false,
        }
    }
}
