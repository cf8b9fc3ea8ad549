//! Parser for friendship adjacency files.
//!
//! Format, one record per line:
//! ```text
//! userId<TAB>friendId,friendId,...
//! ```
//!
//! A line that does not split into exactly two tab-separated fields is
//! skipped. An empty friend field is allowed and means "no friends". Ids that
//! are not integers reject the line with `DataLoadError::InvalidUserId`.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read a file as text. Invalid UTF-8 is replaced rather than failing the
/// whole file, so the affected ids get rejected one line at a time.
pub fn read_text_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn parse_user_id(file: &str, line_no: usize, value: &str) -> Result<UserId> {
    value
        .trim()
        .parse()
        .map_err(|e| DataLoadError::InvalidUserId {
            file: file.to_string(),
            line: line_no,
            value: value.to_string(),
            reason: format!("{}", e),
        })
}

/// Parse a single adjacency line.
///
/// Returns:
/// - `Ok(Some(record))` for a well-formed line
/// - `Ok(None)` for a blank or malformed line (wrong field count)
/// - `Err(InvalidUserId)` when the owner or a friend id is not a number
pub fn parse_adjacency_line(
    file: &str,
    line_no: usize,
    line: &str,
) -> Result<Option<AdjacencyRecord>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut fields = line.split('\t');
    let (Some(owner), Some(friends), None) = (fields.next(), fields.next(), fields.next())
    else {
        return Ok(None);
    };

    let owner = parse_user_id(file, line_no, owner)?;
    let friends = friends
        .split(',')
        .filter(|token| !token.trim().is_empty())
        .map(|token| parse_user_id(file, line_no, token))
        .collect::<Result<Vec<UserId>>>()?;

    Ok(Some(AdjacencyRecord::new(owner, friends)))
}

/// True for a non-blank line that does not have the two-field shape.
pub fn is_malformed(line: &str) -> bool {
    let line = line.trim_end_matches(['\r', '\n']);
    !line.trim().is_empty() && line.split('\t').count() != 2
}

/// Parse adjacency text held in memory. `file` only labels errors.
pub fn parse_adjacency_str(file: &str, text: &str) -> ParsedInput {
    let mut parsed = ParsedInput::default();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        parsed.lines += 1;
        match parse_adjacency_line(file, line_no, line) {
            Ok(Some(record)) => parsed.records.push(record),
            Ok(None) => {
                if is_malformed(line) {
                    parsed.skipped += 1;
                }
            }
            Err(e) => parsed.rejected.push(e),
        }
    }

    parsed
}

/// Parse one adjacency file
pub fn parse_adjacency_file(path: &Path) -> Result<ParsedInput> {
    let text = read_text_lossy(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(parse_adjacency_str(&name, &text))
}

/// Parse several files in parallel and merge the results in input order.
pub fn parse_adjacency_files(paths: &[PathBuf]) -> Result<ParsedInput> {
    let parts = paths
        .par_iter()
        .map(|path| parse_adjacency_file(path))
        .collect::<Result<Vec<ParsedInput>>>()?;

    let mut merged = ParsedInput::default();
    for part in parts {
        merged.merge(part);
    }
    Ok(merged)
}

/// Resolve an input location to the list of files it names.
///
/// A file stands for itself. A directory stands for every regular file in it
/// whose name does not start with `_` or `.`, sorted by name.
pub fn resolve_input_files(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(DataLoadError::FileNotFound {
            path: input.display().to_string(),
        });
    }
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(input)? {
        let entry = entry?;
        let path = entry.path();
        let hidden = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('_') || name.starts_with('.'));
        if path.is_file() && !hidden {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_line() {
        let record = parse_adjacency_line("in", 1, "1\t2,3").unwrap().unwrap();
        assert_eq!(record.owner, 1);
        assert_eq!(record.friends, vec![2, 3]);
    }

    #[test]
    fn test_parse_empty_friend_field() {
        let record = parse_adjacency_line("in", 1, "5\t").unwrap().unwrap();
        assert_eq!(record.owner, 5);
        assert!(record.friends.is_empty());
    }

    #[test]
    fn test_wrong_field_count_is_skipped() {
        assert!(parse_adjacency_line("in", 1, "5").unwrap().is_none());
        assert!(parse_adjacency_line("in", 1, "1\t2\t3").unwrap().is_none());
        assert!(parse_adjacency_line("in", 1, "").unwrap().is_none());
    }

    #[test]
    fn test_empty_tokens_and_whitespace() {
        let record = parse_adjacency_line("in", 1, "7\t 8,,9 ,\r\n").unwrap().unwrap();
        assert_eq!(record.friends, vec![8, 9]);
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let err = parse_adjacency_line("in", 4, "1\t2,x").unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidUserId { line: 4, .. }));

        let err = parse_adjacency_line("in", 9, "abc\t2").unwrap_err();
        assert_eq!(err.line(), Some(9));
    }

    #[test]
    fn test_negative_ids_are_accepted() {
        let record = parse_adjacency_line("in", 1, "-1\t-2,3").unwrap().unwrap();
        assert_eq!(record.owner, -1);
        assert_eq!(record.friends, vec![-2, 3]);

        let parsed = parse_adjacency_str("in", "1\t-2,3\n-2\t1\n");
        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn test_parse_str_counts_outcomes() {
        let parsed = parse_adjacency_str("in", "1\t2,3\n\nbroken\n2\tq\n3\t1\n");
        assert_eq!(parsed.lines, 5);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.rejected.len(), 1);
    }
}
