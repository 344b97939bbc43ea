//! autocomplete - suggest the most frequent completions of a prefix or pattern
//!
//! Loads a `word<TAB>frequency` dictionary, then prompts on stdin.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ranked_tst::session::run_session;
use ranked_tst::{load_dictionary_file, Config, Trie};

#[derive(Parser)]
#[command(name = "autocomplete")]
#[command(about = "Suggest the most frequent completions of a prefix or pattern")]
#[command(version)]
struct Cli {
    /// Dictionary file, one `word<TAB>frequency` entry per line
    dictionary: PathBuf,

    /// Configuration file (falls back to $RANKED_TST_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    config.log.init_tracing()?;

    println!("Reading file: {}", cli.dictionary.display());
    let mut trie = Trie::new();
    let stats = load_dictionary_file(&mut trie, &cli.dictionary)
        .with_context(|| format!("failed to load {}", cli.dictionary.display()))?;
    trie.shrink_to_fit();
    info!(
        words = trie.len(),
        duplicates = stats.duplicates,
        node_bytes = trie.memory_usage(),
        wildcard = %config.completion.wildcard,
        "dictionary ready"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&trie, &config.completion, &mut stdin.lock(), &mut stdout.lock())
        .context("prompt loop failed")
}
