//! TOML configuration shared by the binaries.
//!
//! ```toml
//! [completion]
//! wildcard = "_"
//! default_completions = 10
//!
//! [filter]
//! bytes_per_item = 1.5
//!
//! [log]
//! filter = "warn"
//! ```
//!
//! Every section and key is optional.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;
use crate::Trie;

/// Environment variable naming a config file when none is passed explicitly.
pub const CONFIG_ENV: &str = "RANKED_TST_CONFIG";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Loads `explicit` if given, else the file named by [`CONFIG_ENV`], else
    /// the defaults. A named file that cannot be read is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match resolve_config_path(explicit) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    /// Marker that turns an autocomplete query into a pattern query.
    #[serde(default = "default_wildcard")]
    pub wildcard: char,
    /// Used when the requested completion count cannot be parsed.
    #[serde(default = "default_completions")]
    pub default_completions: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            wildcard: default_wildcard(),
            default_completions: default_completions(),
        }
    }
}

fn default_wildcard() -> char {
    Trie::WILDCARD
}

fn default_completions() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Filter table bytes per training item.
    #[serde(default = "default_bytes_per_item")]
    pub bytes_per_item: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            bytes_per_item: default_bytes_per_item(),
        }
    }
}

fn default_bytes_per_item() -> f64 {
    1.5
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl LogConfig {
    /// `RUST_LOG` when it is set and parses, otherwise the configured directive.
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        EnvFilter::try_from_default_env().or_else(|_| self.configured_filter())
    }

    fn configured_filter(&self) -> Result<EnvFilter, ConfigError> {
        EnvFilter::try_new(&self.filter).map_err(|source| ConfigError::LogFilter {
            filter: self.filter.clone(),
            source,
        })
    }

    /// Installs the global `fmt` subscriber, writing to stderr so stdout stays
    /// free for program output.
    pub fn init_tracing(&self) -> Result<(), ConfigError> {
        tracing_subscriber::fmt()
            .with_env_filter(self.env_filter()?)
            .with_writer(io::stderr)
            .try_init()
            .map_err(|err| ConfigError::Subscriber(err.to_string()))
    }
}
