//! firewall - drop known-bad URLs from a list with a bloom filter
//!
//! Trains a filter on the bad list, copies every mixed URL the filter does not
//! flag to the output file, then reports the observed false positive rate and
//! how much smaller the filter is than the bad list.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ranked_tst::{BloomFilter, Config};

#[derive(Parser)]
#[command(name = "firewall")]
#[command(about = "Filter known-bad URLs out of a list")]
#[command(version)]
struct Cli {
    /// Malicious URLs, one per line
    bad_urls: PathBuf,

    /// Mixed good and bad URLs, one per line
    mixed_urls: PathBuf,

    /// Where to write the URLs that pass the filter
    output: PathBuf,

    /// Configuration file (falls back to $RANKED_TST_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    config.log.init_tracing()?;

    let bad = fs::read_to_string(&cli.bad_urls)
        .with_context(|| format!("failed to read {}", cli.bad_urls.display()))?;
    let bad: Vec<&str> = bad.lines().filter(|line| !line.is_empty()).collect();

    let mut filter = BloomFilter::for_items(bad.len(), config.filter.bytes_per_item);
    filter.train(&bad);
    info!(bad = bad.len(), bytes = filter.byte_len(), "filter trained");

    let mixed = File::open(&cli.mixed_urls)
        .with_context(|| format!("failed to open {}", cli.mixed_urls.display()))?;
    let output = File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    let mut output = BufWriter::new(output);
    let stats = filter
        .screen(BufReader::new(mixed), &mut output)
        .with_context(|| format!("failed to screen {}", cli.mixed_urls.display()))?;
    output.flush()?;

    let false_positive_rate = stats.false_positive_rate(bad.len());
    let bad_file_bytes = fs::metadata(&cli.bad_urls)
        .with_context(|| format!("failed to stat {}", cli.bad_urls.display()))?
        .len();
    let memory_ratio = bad_file_bytes as f64 / filter.byte_len() as f64;

    println!("False positive rate: {false_positive_rate}");
    println!("Saved memory ratio: {memory_ratio}");
    Ok(())
}
