//! Error types for the fallible edges of the crate.
//!
//! Queries never fail: a missing word or an empty completion list is a normal
//! answer. Errors only come from allocation, dictionary files, config files and
//! logging setup.

use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while growing a [`Trie`](crate::Trie).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// The node arena could not grow by the nodes a word may need.
    #[error("failed to reserve {nodes} trie nodes")]
    Allocation {
        nodes: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Errors raised while loading a `word<TAB>frequency` dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from a non-file source failed.
    #[error("failed to read dictionary line {line}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A non-blank line is not `word<TAB>frequency` with a non-empty word and a
    /// positive integer frequency.
    #[error("malformed dictionary line {line}: {reason}")]
    Malformed { line: usize, reason: &'static str },

    #[error(transparent)]
    Trie(#[from] TrieError),
}

/// Errors raised while loading the TOML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML from {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid log filter {filter:?}")]
    LogFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber was already installed.
    #[error("failed to install log subscriber: {0}")]
    Subscriber(String),
}
