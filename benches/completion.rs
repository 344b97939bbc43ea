//! Completion benchmarks over a synthetic Zipf-like vocabulary.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ranked_tst::Trie;

fn generate_words(n: usize) -> Vec<(String, u64)> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|rank| {
            let len = rng.gen_range(3..12);
            let word: String = (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect();
            (word, (1_000_000 / (rank as u64 + 1)).max(1))
        })
        .collect()
}

fn build(words: &[(String, u64)]) -> Trie {
    let mut trie = Trie::new();
    for (word, frequency) in words {
        trie.insert(word, *frequency);
    }
    trie
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000].iter() {
        let words = generate_words(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(build(&words)));
        });
    }

    group.finish();
}

fn bench_prefix(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k_by_prefix");
    let trie = build(&generate_words(100_000));

    for prefix in ["", "a", "qu", "str"] {
        for k in [1usize, 10, 100] {
            group.bench_with_input(BenchmarkId::new(format!("{prefix:?}"), k), &k, |b, &k| {
                b.iter(|| black_box(trie.top_k_by_prefix(black_box(prefix), k)));
            });
        }
    }

    group.finish();
}

fn bench_pattern(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k_by_pattern");
    let trie = build(&generate_words(100_000));

    for pattern in ["_at", "st_r", "abc_", "_"] {
        group.bench_function(pattern, |b| {
            b.iter(|| black_box(trie.top_k_by_pattern(black_box(pattern), 10)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_prefix, bench_pattern);
criterion_main!(benches);
