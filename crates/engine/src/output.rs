//! Output directory layout.
//!
//! ```text
//! <output>/part-r-00000
//! <output>/part-r-00001
//! <output>/_SUCCESS
//! ```
//! One part file per reduce partition, lines sorted by target. `_SUCCESS`
//! is written last, only when every partition was written.

use crate::error::{EngineError, Result};
use pipeline::RecommendationList;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SUCCESS_MARKER: &str = "_SUCCESS";

pub fn part_file_name(partition: usize) -> String {
    format!("part-r-{:05}", partition)
}

/// Write one partition's lists, one line each
pub fn write_part(dir: &Path, partition: usize, lists: &[RecommendationList]) -> Result<PathBuf> {
    let path = dir.join(part_file_name(partition));
    let mut writer = BufWriter::new(File::create(&path)?);
    for list in lists {
        writeln!(writer, "{}", list)?;
    }
    writer.flush()?;
    Ok(path)
}

pub fn write_success_marker(dir: &Path) -> Result<()> {
    File::create(dir.join(SUCCESS_MARKER))?;
    Ok(())
}

pub fn is_complete(dir: &Path) -> bool {
    dir.join(SUCCESS_MARKER).is_file()
}

/// Read every part file of a finished job, in partition order
pub fn read_output(dir: &Path) -> Result<Vec<RecommendationList>> {
    let mut parts: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("part-"))
        })
        .collect();
    parts.sort();

    let mut lists = Vec::new();
    for path in parts {
        let text = fs::read_to_string(&path)?;
        for (idx, line) in text.lines().enumerate() {
            let list = line
                .parse::<RecommendationList>()
                .map_err(|e| EngineError::MalformedOutput {
                    file: path.display().to_string(),
                    line: idx + 1,
                    reason: e.to_string(),
                })?;
            lists.push(list);
        }
    }
    Ok(lists)
}
