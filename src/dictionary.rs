//! Dictionary loading.
//!
//! A dictionary is plain text, one entry per line:
//!
//! ```text
//! the	23135851162
//! of	13151942776
//! new york	417287345
//! ```
//!
//! The word and its frequency are separated by the *last* tab on the line, so
//! words may contain spaces. Blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::DictionaryError;
use crate::Trie;

/// Outcome of a dictionary load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Entries that were new to the trie.
    pub inserted: usize,
    /// Entries whose word was already stored; the earlier frequency was kept.
    pub duplicates: usize,
}

/// Splits one line into `(word, frequency)`. `None` for a blank line.
fn parse_line(line: &str) -> Option<Result<(&str, u64), &'static str>> {
    if line.trim().is_empty() {
        return None;
    }
    let Some((word, frequency)) = line.rsplit_once('\t') else {
        return Some(Err("expected word<TAB>frequency"));
    };
    if word.is_empty() {
        return Some(Err("empty word"));
    }
    let parsed = match frequency.trim().parse::<u64>() {
        Ok(0) => Err("frequency must be positive"),
        Ok(frequency) => Ok((word, frequency)),
        Err(_) => Err("frequency is not an unsigned integer"),
    };
    Some(parsed)
}

/// Inserts every entry read from `reader` into `trie`.
pub fn load_dictionary<R: BufRead>(trie: &mut Trie, reader: R) -> Result<LoadStats, DictionaryError> {
    let mut stats = LoadStats::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| DictionaryError::Read { line: line_no, source })?;
        let Some(parsed) = parse_line(&line) else {
            continue;
        };
        let (word, frequency) =
            parsed.map_err(|reason| DictionaryError::Malformed { line: line_no, reason })?;

        if trie.try_insert(word, frequency)? {
            stats.inserted += 1;
        } else {
            debug!(line = line_no, word, "duplicate dictionary entry");
            stats.duplicates += 1;
        }
    }

    info!(
        inserted = stats.inserted,
        duplicates = stats.duplicates,
        words = trie.len(),
        "loaded dictionary"
    );
    Ok(stats)
}

/// [`load_dictionary`] over the file at `path`.
pub fn load_dictionary_file<P: AsRef<Path>>(trie: &mut Trie, path: P) -> Result<LoadStats, DictionaryError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_dictionary(trie, BufReader::new(file))
}
