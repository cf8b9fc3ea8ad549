//! The output record of the aggregation stage.
//!
//! Text layout, one record per line:
//! ```text
//! 1<TAB>4 (2),7 (1)
//! ```
//! A target with no qualifying candidates has an empty second field.

use anyhow::{Context, Result, anyhow};
use data_loader::UserId;
use std::fmt;
use std::str::FromStr;

/// One recommended candidate and its mutual-friend count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationEntry {
    pub candidate: UserId,
    pub count: usize,
}

impl RecommendationEntry {
    pub fn new(candidate: UserId, count: usize) -> Self {
        Self { candidate, count }
    }
}

impl fmt::Display for RecommendationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.candidate, self.count)
    }
}

/// Ranked, truncated recommendations for one target user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationList {
    pub target: UserId,
    pub entries: Vec<RecommendationEntry>,
}

impl RecommendationList {
    pub fn new(target: UserId, entries: Vec<RecommendationEntry>) -> Self {
        Self { target, entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Candidate ids in ranked order
    pub fn candidates(&self) -> impl Iterator<Item = UserId> + '_ {
        self.entries.iter().map(|e| e.candidate)
    }
}

impl fmt::Display for RecommendationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t", self.target)?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

impl FromStr for RecommendationEntry {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (candidate, rest) = s
            .split_once(" (")
            .ok_or_else(|| anyhow!("Missing count in entry {:?}", s))?;
        let count = rest
            .strip_suffix(')')
            .ok_or_else(|| anyhow!("Unterminated count in entry {:?}", s))?;

        Ok(Self {
            candidate: candidate
                .parse()
                .with_context(|| format!("Invalid candidate id {:?}", candidate))?,
            count: count
                .parse()
                .with_context(|| format!("Invalid count {:?}", count))?,
        })
    }
}

impl FromStr for RecommendationList {
    type Err = anyhow::Error;

    /// Parse one output line back into a list
    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (target, entries) = line
            .split_once('\t')
            .ok_or_else(|| anyhow!("Missing tab separator in {:?}", line))?;

        let target = target
            .parse()
            .with_context(|| format!("Invalid target id {:?}", target))?;
        let entries = entries
            .split(',')
            .filter(|e| !e.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<RecommendationEntry>>>()?;

        Ok(Self { target, entries })
    }
}
