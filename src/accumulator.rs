//! Bounded top-K selection for completion queries.
//!
//! The accumulator keeps the `k` best `(frequency, word)` pairs seen so far in a
//! binary heap whose top is the worst kept pair. Its frequency is the pruning
//! threshold for the rest of a traversal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A kept result. Ordered so that a *better* candidate compares *less*: higher
/// frequency first, then ascending word.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Candidate {
    frequency: u64,
    word: String,
}

impl Candidate {
    #[inline]
    fn outranked_by(&self, frequency: u64, word: &str) -> bool {
        match frequency.cmp(&self.frequency) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => word < self.word.as_str(),
        }
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| self.word.cmp(&other.word))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Holds up to `k` best-ranked words for a single query.
#[derive(Clone, Debug)]
pub struct RankedAccumulator {
    k: usize,
    heap: BinaryHeap<Candidate>,
}

impl RankedAccumulator {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.saturating_add(1).min(1024)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.k
    }

    /// Lowest kept frequency once `k` results are held, otherwise `0` (nothing
    /// can be pruned yet).
    #[inline]
    pub fn current_threshold(&self) -> u64 {
        if self.is_full() {
            self.heap.peek().map_or(0, |worst| worst.frequency)
        } else {
            0
        }
    }

    /// Whether a word of `frequency` could still enter the result. Equal
    /// frequencies pass since they may win the lexicographic tie-break.
    #[inline]
    pub fn would_accept(&self, frequency: u64) -> bool {
        self.k > 0 && (!self.is_full() || frequency >= self.current_threshold())
    }

    /// Offers a word. Returns whether it was kept; when full, a kept word evicts
    /// the current worst.
    pub fn offer(&mut self, frequency: u64, word: &str) -> bool {
        if self.k == 0 {
            return false;
        }
        if !self.is_full() {
            self.heap.push(Candidate {
                frequency,
                word: word.to_owned(),
            });
            return true;
        }

        match self.heap.peek_mut() {
            Some(mut worst) if worst.outranked_by(frequency, word) => {
                *worst = Candidate {
                    frequency,
                    word: word.to_owned(),
                };
                true
            }
            _ => false,
        }
    }

    /// Kept pairs, best first.
    pub fn drain_ranked(self) -> Vec<(String, u64)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| (c.word, c.frequency))
            .collect()
    }

    /// Kept words, best first.
    pub fn drain(self) -> Vec<String> {
        self.heap.into_sorted_vec().into_iter().map(|c| c.word).collect()
    }
}
