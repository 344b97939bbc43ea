//! The line-oriented prompt loop behind the `autocomplete` binary.
//!
//! Each round asks for a prefix or pattern, then for a completion count, prints
//! one completion per line and asks whether to continue. Only `y` continues;
//! end of input ends the session quietly.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::config::CompletionConfig;
use crate::Trie;

/// Answers `query` with the pattern search when it contains the configured
/// wildcard, otherwise with the prefix search.
pub fn complete(trie: &Trie, config: &CompletionConfig, query: &str, k: usize) -> Vec<String> {
    if query.contains(config.wildcard) {
        trie.top_k_by_pattern_with(query, config.wildcard, k)
    } else {
        trie.top_k_by_prefix(query, k)
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

pub fn run_session<R: BufRead, W: Write>(
    trie: &Trie,
    config: &CompletionConfig,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    loop {
        writeln!(output, "Enter a prefix/pattern to search for:")?;
        output.flush()?;
        let Some(query) = read_line(input)? else {
            return Ok(());
        };

        writeln!(output, "Enter a number of completions:")?;
        output.flush()?;
        let Some(count) = read_line(input)? else {
            return Ok(());
        };
        let k = count.trim().parse::<usize>().unwrap_or_else(|_| {
            warn!(count = count.trim(), fallback = config.default_completions, "invalid completion count");
            config.default_completions
        });

        for completion in complete(trie, config, &query, k) {
            writeln!(output, "{completion}")?;
        }

        writeln!(output, "Continue? (y/n)")?;
        output.flush()?;
        match read_line(input)? {
            Some(answer) if answer.trim() == "y" => continue,
            _ => return Ok(()),
        }
    }
}
