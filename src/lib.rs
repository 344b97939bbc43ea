//! # ranked-tst
//!
//! Predictive text completion over a ternary search trie.
//!
//! Every stored word carries a frequency. Each node caches, per child link, the
//! highest frequency reachable through that link, so a top-K query can skip
//! any subtree that cannot beat the K-th best result found so far.
//!
//! ## Example
//!
//! ```rust
//! use ranked_tst::Trie;
//!
//! let mut trie = Trie::new();
//! trie.insert("cat", 5);
//! trie.insert("car", 10);
//! trie.insert("cart", 3);
//!
//! assert_eq!(trie.top_k_by_prefix("ca", 2), vec!["car", "cat"]);
//! assert_eq!(trie.top_k_by_pattern("c_t", 5), vec!["cat"]);
//! ```
//!
//! Queries take `&self` and build their own [`RankedAccumulator`], so any number
//! of them may run at once on a shared trie. `insert` takes `&mut self` and can
//! therefore never overlap a query.

pub mod accumulator;
pub mod bloom;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod session;

pub use accumulator::RankedAccumulator;
pub use bloom::{BloomFilter, ScreenStats};
pub use config::Config;
pub use dictionary::{load_dictionary, load_dictionary_file, LoadStats};
pub use error::{ConfigError, DictionaryError, TrieError};

use std::cmp::Ordering;
use std::collections::TryReserveError;
use std::ops::{Index, IndexMut};

use tracing::{debug, trace};

// =============================================================================
// Node handle
// =============================================================================

/// Slot index into [`NodeArena`]. `NULL` marks an absent link.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct NodeId(usize);

impl NodeId {
    const NULL: NodeId = NodeId(usize::MAX);

    #[inline]
    fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }
}

/// Which child link a descent takes out of a node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Link {
    Left,
    Middle,
    Right,
}

impl Link {
    #[inline]
    fn towards(ch: char, key: char) -> Self {
        match ch.cmp(&key) {
            Ordering::Less => Link::Left,
            Ordering::Equal => Link::Middle,
            Ordering::Greater => Link::Right,
        }
    }
}

// =============================================================================
// Node
// =============================================================================

/// One trie cell.
///
/// `left`/`right` form a binary search tree over the siblings that share this
/// node's depth and parent path; `middle` continues the word. The `best_*`
/// fields hold the exact maximum terminal frequency below each link.
#[derive(Clone, Debug)]
struct Node {
    key: char,
    /// Non-zero iff a stored word ends here.
    frequency: u64,
    left: NodeId,
    middle: NodeId,
    right: NodeId,
    best_left: u64,
    best_mid: u64,
    best_right: u64,
}

impl Node {
    fn new(key: char) -> Self {
        Self {
            key,
            frequency: 0,
            left: NodeId::NULL,
            middle: NodeId::NULL,
            right: NodeId::NULL,
            best_left: 0,
            best_mid: 0,
            best_right: 0,
        }
    }

    #[inline]
    fn link(&self, link: Link) -> NodeId {
        match link {
            Link::Left => self.left,
            Link::Middle => self.middle,
            Link::Right => self.right,
        }
    }

    #[inline]
    fn set_link(&mut self, link: Link, id: NodeId) {
        match link {
            Link::Left => self.left = id,
            Link::Middle => self.middle = id,
            Link::Right => self.right = id,
        }
    }

    #[inline]
    fn raise_hint(&mut self, link: Link, frequency: u64) {
        let hint = match link {
            Link::Left => &mut self.best_left,
            Link::Middle => &mut self.best_mid,
            Link::Right => &mut self.best_right,
        };
        *hint = (*hint).max(frequency);
    }
}

// =============================================================================
// Node arena
// =============================================================================

/// Slot table owning every node of a trie. Nodes are never freed individually;
/// dropping the arena drops them all.
#[derive(Clone, Default)]
struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, key: char) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(key));
        id
    }

    fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.nodes.try_reserve(additional)
    }

    fn capacity(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node>()
    }

    fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        debug_assert!(!id.is_null());
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for NodeArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        debug_assert!(!id.is_null());
        &mut self.nodes[id.0]
    }
}

// =============================================================================
// Trie
// =============================================================================

/// A frequency-ranked ternary search trie.
pub struct Trie {
    nodes: NodeArena,
    root: NodeId,
    /// Highest stored frequency; the hint for the root's sibling tree.
    root_best: u64,
    count: usize,
}

impl Trie {
    /// Marker used by [`Trie::top_k_by_pattern`].
    pub const WILDCARD: char = '_';

    pub fn new() -> Self {
        Self {
            nodes: NodeArena::new(),
            root: NodeId::NULL,
            root_best: 0,
            count: 0,
        }
    }

    /// Number of stored words.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Bytes reserved for nodes.
    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity()
    }

    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Follows `chars` starting at the sibling tree rooted at `start` and returns
    /// the node holding the last character. `None` if a link is missing or
    /// `chars` is empty.
    fn descend(&self, start: NodeId, mut chars: impl Iterator<Item = char>) -> Option<NodeId> {
        let mut ch = chars.next()?;
        let mut current = start;
        while !current.is_null() {
            let node = &self.nodes[current];
            match Link::towards(ch, node.key) {
                Link::Left => current = node.left,
                Link::Right => current = node.right,
                Link::Middle => match chars.next() {
                    None => return Some(current),
                    Some(next) => {
                        ch = next;
                        current = node.middle;
                    }
                },
            }
        }
        None
    }

    /// Stored frequency of `word`, if it is a complete entry.
    pub fn frequency(&self, word: &str) -> Option<u64> {
        let id = self.descend(self.root, word.chars())?;
        let frequency = self.nodes[id].frequency;
        (frequency > 0).then_some(frequency)
    }

    /// Whether `word` was inserted. Prefixes of stored words do not count.
    pub fn contains_exact(&self, word: &str) -> bool {
        self.frequency(word).is_some()
    }

    /// Inserts `word` with `frequency`.
    ///
    /// Returns `false` without touching the trie if `word` is empty, if
    /// `frequency` is zero, or if `word` is already stored; the first frequency
    /// written for a word is kept.
    pub fn insert(&mut self, word: &str, frequency: u64) -> bool {
        if word.is_empty() || frequency == 0 {
            trace!(word, frequency, "rejected empty word or zero frequency");
            return false;
        }
        if self.contains_exact(word) {
            trace!(word, "rejected duplicate");
            return false;
        }

        let mut chars = word.chars();
        let Some(mut ch) = chars.next() else {
            return false;
        };
        if self.root.is_null() {
            self.root = self.nodes.alloc(ch);
        }
        self.root_best = self.root_best.max(frequency);

        let mut current = self.root;
        loop {
            let link = Link::towards(ch, self.nodes[current].key);
            if link == Link::Middle {
                match chars.next() {
                    Some(next) => ch = next,
                    None => {
                        self.nodes[current].frequency = frequency;
                        break;
                    }
                }
            }

            let node = &mut self.nodes[current];
            node.raise_hint(link, frequency);
            let mut next = node.link(link);
            if next.is_null() {
                next = self.nodes.alloc(ch);
                self.nodes[current].set_link(link, next);
            }
            current = next;
        }

        self.count += 1;
        true
    }

    /// Like [`Trie::insert`], but reserves the nodes the insertion may need
    /// first and reports allocation failure instead of aborting.
    pub fn try_insert(&mut self, word: &str, frequency: u64) -> Result<bool, TrieError> {
        let needed = word.chars().count();
        self.nodes
            .try_reserve(needed)
            .map_err(|source| TrieError::Allocation { nodes: needed, source })?;
        Ok(self.insert(word, frequency))
    }

    /// Up to `k` stored words starting with `prefix`, by descending frequency and
    /// then ascending lexicographic order. `prefix` itself competes if stored.
    /// An empty prefix ranks the whole trie.
    pub fn top_k_by_prefix(&self, prefix: &str, k: usize) -> Vec<String> {
        self.ranked_by_prefix(prefix, k).0
    }

    /// [`Trie::top_k_by_prefix`] plus the number of nodes the walk visited.
    pub(crate) fn ranked_by_prefix(&self, prefix: &str, k: usize) -> (Vec<String>, usize) {
        if k == 0 || self.root.is_null() {
            return (Vec::new(), 0);
        }

        let mut acc = RankedAccumulator::new(k);
        let mut word = String::with_capacity(prefix.len() + 16);
        let visited = if prefix.is_empty() {
            self.collect_ranked(self.root, self.root_best, &mut word, &mut acc)
        } else {
            let Some(anchor) = self.descend(self.root, prefix.chars()) else {
                debug!(prefix, "prefix not present");
                return (Vec::new(), 0);
            };
            let anchor = &self.nodes[anchor];
            if anchor.frequency > 0 {
                acc.offer(anchor.frequency, prefix);
            }
            word.push_str(prefix);
            self.collect_ranked(anchor.middle, anchor.best_mid, &mut word, &mut acc)
        };

        let results = acc.drain();
        debug!(prefix, k, visited, found = results.len(), "prefix query");
        (results, visited)
    }

    /// In-order walk of the sibling tree at `id`, whose best-hint is `hint`,
    /// skipping every branch the accumulator would reject.
    /// `word` holds the characters above `id`. Returns the number of nodes visited.
    ///
    /// Each frame carries the length `word` must be cut back to before it runs,
    /// so siblings can reuse the buffer.
    fn collect_ranked(&self, id: NodeId, hint: u64, word: &mut String, acc: &mut RankedAccumulator) -> usize {
        enum Step {
            Walk(NodeId, u64, usize),
            Visit(NodeId, usize),
        }

        let base = word.len();
        let mut stack = vec![Step::Walk(id, hint, base)];
        let mut visited = 0usize;

        while let Some(step) = stack.pop() {
            match step {
                Step::Walk(id, hint, len) => {
                    if id.is_null() || !acc.would_accept(hint) {
                        continue;
                    }
                    let node = &self.nodes[id];
                    // Popped in reverse: left siblings, this node, its extensions, right siblings.
                    stack.push(Step::Walk(node.right, node.best_right, len));
                    stack.push(Step::Walk(node.middle, node.best_mid, len + node.key.len_utf8()));
                    stack.push(Step::Visit(id, len));
                    stack.push(Step::Walk(node.left, node.best_left, len));
                }
                Step::Visit(id, len) => {
                    visited += 1;
                    let node = &self.nodes[id];
                    word.truncate(len);
                    word.push(node.key);
                    if node.frequency > 0 {
                        acc.offer(node.frequency, word.as_str());
                    }
                }
            }
        }

        word.truncate(base);
        visited
    }

    /// [`Trie::top_k_by_pattern_with`] using [`Trie::WILDCARD`].
    pub fn top_k_by_pattern(&self, pattern: &str, k: usize) -> Vec<String> {
        self.top_k_by_pattern_with(pattern, Self::WILDCARD, k)
    }

    /// Up to `k` stored words of the same length as `pattern` that match it
    /// literally everywhere except at the single `wildcard` position, ranked as
    /// in [`Trie::top_k_by_prefix`].
    ///
    /// A pattern with no marker, or with more than one, matches nothing.
    pub fn top_k_by_pattern_with(&self, pattern: &str, wildcard: char, k: usize) -> Vec<String> {
        if k == 0 || self.root.is_null() {
            return Vec::new();
        }

        let mut markers = pattern.match_indices(wildcard);
        let Some((at, _)) = markers.next() else {
            debug!(pattern, "pattern has no wildcard");
            return Vec::new();
        };
        if markers.next().is_some() {
            debug!(pattern, "pattern has more than one wildcard");
            return Vec::new();
        }
        let head = &pattern[..at];
        let tail = &pattern[at + wildcard.len_utf8()..];

        let siblings = if head.is_empty() {
            self.root
        } else {
            match self.descend(self.root, head.chars()) {
                Some(anchor) => self.nodes[anchor].middle,
                None => {
                    debug!(pattern, "pattern head not present");
                    return Vec::new();
                }
            }
        };

        let mut acc = RankedAccumulator::new(k);
        let mut word = String::with_capacity(pattern.len());
        let mut candidates = 0usize;
        for id in self.siblings(siblings) {
            candidates += 1;
            let node = &self.nodes[id];
            let frequency = if tail.is_empty() {
                node.frequency
            } else if acc.would_accept(node.best_mid) {
                self.descend(node.middle, tail.chars())
                    .map_or(0, |end| self.nodes[end].frequency)
            } else {
                0
            };
            if frequency == 0 {
                continue;
            }

            word.clear();
            word.push_str(head);
            word.push(node.key);
            word.push_str(tail);
            acc.offer(frequency, &word);
        }

        let results = acc.drain();
        debug!(pattern, k, candidates, found = results.len(), "pattern query");
        results
    }

    /// In-order walk over the sibling tree rooted at `id`.
    fn siblings(&self, id: NodeId) -> Siblings<'_> {
        Siblings {
            nodes: &self.nodes,
            stack: Vec::new(),
            current: id,
        }
    }

    /// All stored `(word, frequency)` pairs in ascending lexicographic order.
    pub fn iter(&self) -> Iter<'_> {
        let mut stack = Vec::new();
        if !self.root.is_null() {
            stack.push(Frame::Expand(self.root, String::new()));
        }
        Iter { trie: self, stack }
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Trie {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            root_best: self.root_best,
            count: self.count,
        }
    }
}

impl std::fmt::Debug for Trie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

struct Siblings<'a> {
    nodes: &'a NodeArena,
    stack: Vec<NodeId>,
    current: NodeId,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while !self.current.is_null() {
            self.stack.push(self.current);
            self.current = self.nodes[self.current].left;
        }
        let id = self.stack.pop()?;
        self.current = self.nodes[id].right;
        Some(id)
    }
}

enum Frame {
    /// Sibling tree to expand, with the characters above it.
    Expand(NodeId, String),
    Emit(String, u64),
}

pub struct Iter<'a> {
    trie: &'a Trie,
    stack: Vec<Frame>,
}

impl Iterator for Iter<'_> {
    type Item = (String, u64);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            let (id, prefix) = match frame {
                Frame::Emit(word, frequency) => return Some((word, frequency)),
                Frame::Expand(id, prefix) => (id, prefix),
            };
            if id.is_null() {
                continue;
            }

            let node = &self.trie.nodes[id];
            let mut word = prefix.clone();
            word.push(node.key);

            // Popped in reverse: left siblings, this word, its extensions, right siblings.
            if !node.right.is_null() {
                self.stack.push(Frame::Expand(node.right, prefix.clone()));
            }
            if !node.middle.is_null() {
                self.stack.push(Frame::Expand(node.middle, word.clone()));
            }
            if node.frequency > 0 {
                self.stack.push(Frame::Emit(word, node.frequency));
            }
            if !node.left.is_null() {
                self.stack.push(Frame::Expand(node.left, prefix));
            }
        }
        None
    }
}


#[cfg(test)]
mod proptests;
