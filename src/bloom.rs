//! Approximate membership filter.
//!
//! A bit array with three hashed positions set per item. An item that was inserted
//! always reports `may_contain == true`; an item that was not may still report
//! `true` with a probability that falls as the table grows relative to the
//! number of items.

use std::hash::{Hash, Hasher};
use std::io::{self, BufRead, Write};

use rustc_hash::FxHasher;
use tracing::debug;

/// Hash seeds; one bit position per seed.
const SEEDS: [u64; 3] = [3, 5, 7];

/// MurmurHash3 finalizer, applied before a hash is reduced modulo the table size.
#[inline]
fn fmix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

#[derive(Clone, Debug)]
pub struct BloomFilter {
    bits: Vec<u8>,
    bit_len: u64,
}

impl BloomFilter {
    /// A filter backed by `bytes` bytes of table (at least one).
    pub fn with_bytes(bytes: usize) -> Self {
        let bytes = bytes.max(1);
        Self {
            bits: vec![0u8; bytes],
            bit_len: bytes as u64 * 8,
        }
    }

    /// A filter sized for `items` entries at `bytes_per_item` bytes each,
    /// rounded up.
    pub fn for_items(items: usize, bytes_per_item: f64) -> Self {
        let bytes = (items as f64 * bytes_per_item).ceil();
        let bytes = if bytes.is_finite() && bytes > 0.0 { bytes as usize } else { 1 };
        debug!(items, bytes_per_item, bytes, "sizing bloom filter");
        Self::with_bytes(bytes)
    }

    #[inline]
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    fn bit_position(&self, item: &[u8], seed: u64) -> (usize, u8) {
        let mut hasher = FxHasher::default();
        seed.hash(&mut hasher);
        item.hash(&mut hasher);
        let bit = fmix64(hasher.finish()) % self.bit_len;
        ((bit / 8) as usize, 1u8 << (bit % 8))
    }

    pub fn insert(&mut self, item: &str) {
        for seed in SEEDS {
            let (byte, mask) = self.bit_position(item.as_bytes(), seed);
            self.bits[byte] |= mask;
        }
    }

    /// `false` means `item` was definitely never inserted.
    pub fn may_contain(&self, item: &str) -> bool {
        SEEDS.iter().all(|&seed| {
            let (byte, mask) = self.bit_position(item.as_bytes(), seed);
            self.bits[byte] & mask != 0
        })
    }

    /// Inserts every item.
    pub fn train<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut count = 0usize;
        for item in items {
            self.insert(item.as_ref());
            count += 1;
        }
        debug!(count, bytes = self.bits.len(), "trained bloom filter");
    }
}

/// Counts from [`BloomFilter::screen`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenStats {
    /// Non-blank lines read.
    pub total: usize,
    /// Lines the filter did not flag, and which were written out.
    pub passed: usize,
}

impl ScreenStats {
    /// Share of safe lines the filter flagged, assuming the screened input held
    /// all `bad` trained items plus the safe ones. `0` when nothing was safe.
    pub fn false_positive_rate(&self, bad: usize) -> f64 {
        let safe = self.total.saturating_sub(bad);
        if safe == 0 {
            return 0.0;
        }
        safe.saturating_sub(self.passed) as f64 / safe as f64
    }
}

impl BloomFilter {
    /// Copies every line of `input` that the filter does not flag to `output`.
    /// Blank lines are skipped, matching how training lists are read.
    pub fn screen<R: BufRead, W: Write>(&self, input: R, output: &mut W) -> io::Result<ScreenStats> {
        let mut stats = ScreenStats::default();
        for line in input.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            stats.total += 1;
            if !self.may_contain(&line) {
                writeln!(output, "{line}")?;
                stats.passed += 1;
            }
        }
        debug!(total = stats.total, passed = stats.passed, "screened input");
        Ok(stats)
    }
}
