use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Recomputes every best-hint from scratch and checks it against the stored one,
/// along with sibling ordering and the word count.
fn validate_trie(t: &Trie) {
    fn max_below(t: &Trie, id: NodeId, words: &mut usize) -> u64 {
        if id.is_null() {
            return 0;
        }
        let node = &t.nodes[id];
        if !node.left.is_null() {
            assert!(t.nodes[node.left].key < node.key, "left sibling out of order");
        }
        if !node.right.is_null() {
            assert!(t.nodes[node.right].key > node.key, "right sibling out of order");
        }
        if node.frequency > 0 {
            *words += 1;
        }

        let left = max_below(t, node.left, words);
        let middle = max_below(t, node.middle, words);
        let right = max_below(t, node.right, words);
        assert_eq!(node.best_left, left, "best_left must be the exact maximum");
        assert_eq!(node.best_mid, middle, "best_mid must be the exact maximum");
        assert_eq!(node.best_right, right, "best_right must be the exact maximum");
        node.frequency.max(left).max(middle).max(right)
    }

    let mut words = 0usize;
    let best = max_below(t, t.root, &mut words);
    assert_eq!(best, t.root_best, "root hint must be the exact maximum");
    assert_eq!(words, t.count, "terminal node count must match Trie::len");
}

/// Brute-force ranking: frequency descending, then word ascending.
fn rank<'a>(candidates: impl Iterator<Item = (&'a String, &'a u64)>, k: usize) -> Vec<String> {
    let mut ranked: Vec<(&String, &u64)> = candidates.collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    ranked.into_iter().take(k).map(|(w, _)| w.clone()).collect()
}

fn matches_pattern(word: &str, pattern: &str) -> bool {
    word.chars().count() == pattern.chars().count()
        && word
            .chars()
            .zip(pattern.chars())
            .all(|(w, p)| p == Trie::WILDCARD || w == p)
}

// A small alphabet keeps prefixes, shared paths and frequency ties common.
fn word_strategy() -> impl Strategy<Value = String> {
    "[a-d]{0,6}"
}

fn prefix_strategy() -> impl Strategy<Value = String> {
    "[a-d]{0,3}"
}

fn pattern_strategy() -> impl Strategy<Value = String> {
    ("[a-d]{0,3}", "[a-d]{0,3}").prop_map(|(head, tail)| format!("{head}_{tail}"))
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Insert(
        #[proptest(strategy = "word_strategy()")] String,
        #[proptest(strategy = "0u64..8")] u64,
    ),
    Contains(#[proptest(strategy = "word_strategy()")] String),
    Prefix(
        #[proptest(strategy = "prefix_strategy()")] String,
        #[proptest(strategy = "0usize..6")] usize,
    ),
    Pattern(
        #[proptest(strategy = "pattern_strategy()")] String,
        #[proptest(strategy = "0usize..6")] usize,
    ),
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=400)) {
        let mut t = Trie::new();
        let mut m: BTreeMap<String, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(word, frequency) => {
                    let expected = !word.is_empty() && frequency > 0 && !m.contains_key(&word);
                    if expected {
                        m.insert(word.clone(), frequency);
                    }
                    prop_assert_eq!(t.insert(&word, frequency), expected);
                }
                Op::Contains(word) => {
                    prop_assert_eq!(t.contains_exact(&word), m.contains_key(&word));
                    prop_assert_eq!(t.frequency(&word), m.get(&word).copied());
                }
                Op::Prefix(prefix, k) => {
                    let expected = rank(m.iter().filter(|(w, _)| w.starts_with(prefix.as_str())), k);
                    prop_assert_eq!(t.top_k_by_prefix(&prefix, k), expected);
                }
                Op::Pattern(pattern, k) => {
                    let expected = rank(m.iter().filter(|(w, _)| matches_pattern(w, &pattern)), k);
                    prop_assert_eq!(t.top_k_by_pattern(&pattern, k), expected);
                }
            }
            prop_assert_eq!(t.len(), m.len());
        }

        validate_trie(&t);
        let got: Vec<(String, u64)> = t.iter().collect();
        let expected: Vec<(String, u64)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_results_bounded_and_ordered(
        entries in prop::collection::vec((word_strategy(), 1u64..4), 0..200),
        prefix in prefix_strategy(),
        k in 0usize..20,
    ) {
        let mut t = Trie::new();
        for (word, frequency) in &entries {
            t.insert(word, *frequency);
        }

        let results = t.top_k_by_prefix(&prefix, k);
        prop_assert!(results.len() <= k);
        let ranked: Vec<(u64, &String)> = results
            .iter()
            .map(|w| (t.frequency(w).unwrap_or(0), w))
            .collect();
        for pair in ranked.windows(2) {
            let ((fa, wa), (fb, wb)) = (pair[0], pair[1]);
            prop_assert!(fa > fb || (fa == fb && wa < wb), "{:?} before {:?}", pair[0], pair[1]);
        }
        for word in &results {
            prop_assert!(word.starts_with(prefix.as_str()));
            prop_assert!(t.contains_exact(word));
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let entries: Vec<(&str, u64)> = vec![("a", 3), ("b", 3), ("c", 1), ("aa", 5), ("ab", 3), ("ba", 2)];

    for_each_permutation(&entries, |perm| {
        let mut t = Trie::new();
        for (word, frequency) in perm {
            assert!(t.insert(word, frequency));
        }

        validate_trie(&t);
        assert_eq!(t.top_k_by_prefix("", 3), vec!["aa", "a", "ab"]);
        assert_eq!(t.top_k_by_prefix("a", 2), vec!["aa", "a"]);
        assert_eq!(t.top_k_by_prefix("b", 5), vec!["b", "ba"]);
        assert_eq!(t.top_k_by_pattern("_", 5), vec!["a", "b", "c"]);
        assert_eq!(t.top_k_by_pattern("_a", 5), vec!["aa", "ba"]);
        assert_eq!(t.top_k_by_pattern("a_", 1), vec!["aa"]);
    });
}
