/// Overall performance bench for insert/search/remove in a few scenarios.
/// Here to quickly test for regressions.
use std::time::Instant;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::SliceRandom;
use rand::{thread_rng, Rng};

use art_index::AdaptiveRadixTree;

// Variations on the number of keys to insert into the tree for benchmarks
// that measure retrievals.
const TREE_SIZES: [u64; 3] = [1 << 15, 1 << 18, 1 << 20];

pub fn rand_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("rand_insert");
    group.throughput(Throughput::Elements(1));

    let keys = gen_keys(3, 2, 3);

    group.bench_function("str_keys", |b| {
        let mut tree = AdaptiveRadixTree::new();
        let mut rng = thread_rng();
        b.iter(|| {
            let key = &keys[rng.gen_range(0..keys.len())];
            tree.insert(key.as_str(), key.as_str());
        })
    });

    group.bench_function("int_keys", |b| {
        let mut tree = AdaptiveRadixTree::new();
        let mut rng = thread_rng();
        b.iter(|| {
            let key: u64 = rng.gen_range(0..1 << 20);
            tree.insert(key.to_be_bytes().as_slice(), key.to_be_bytes().to_vec());
        })
    });

    group.finish();
}

pub fn rand_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("rand_remove");
    group.throughput(Throughput::Elements(1));

    let keys = gen_keys(3, 2, 3);

    group.bench_function("str_keys", |b| {
        let mut tree = AdaptiveRadixTree::new();
        let mut rng = thread_rng();
        for key in &keys {
            tree.insert(key.as_str(), key.as_str());
        }
        b.iter(|| {
            let key = &keys[rng.gen_range(0..keys.len())];
            tree.remove(key.as_str());
        })
    });

    group.finish();
}

pub fn rand_get(c: &mut Criterion) {
    for size in TREE_SIZES {
        c.bench_with_input(BenchmarkId::new("rand_get", size), &size, |b, size| {
            let mut tree = AdaptiveRadixTree::new();
            for i in 0..*size {
                tree.insert(i.to_be_bytes().as_slice(), i.to_be_bytes().to_vec());
            }
            let mut rng = thread_rng();
            b.iter(|| {
                let key: u64 = rng.gen_range(0..*size);
                criterion::black_box(tree.search(key.to_be_bytes().as_slice()));
            })
        });
    }
}

pub fn rand_get_str(c: &mut Criterion) {
    let mut group = c.benchmark_group("rand_get_str");
    group.throughput(Throughput::Elements(1));

    let keys = gen_keys(3, 2, 3);
    group.bench_function("str_keys", |b| {
        let mut tree = AdaptiveRadixTree::new();
        for key in &keys {
            tree.insert(key.as_str(), key.as_str());
        }
        let mut rng = thread_rng();
        b.iter(|| {
            let key = &keys[rng.gen_range(0..keys.len())];
            criterion::black_box(tree.search(key.as_str()));
        })
    });

    group.finish();
}

pub fn seq_get(c: &mut Criterion) {
    for size in TREE_SIZES {
        c.bench_with_input(BenchmarkId::new("seq_get", size), &size, |b, size| {
            let mut tree = AdaptiveRadixTree::new();
            for i in 0..*size {
                tree.insert(i.to_be_bytes().as_slice(), i.to_be_bytes().to_vec());
            }
            b.iter_custom(|iters| {
                let mut key = 0u64;
                let start = Instant::now();
                for _ in 0..iters {
                    if key == *size {
                        key = 0;
                    }
                    tree.search(key.to_be_bytes().as_slice()).unwrap();
                    key += 1;
                }
                start.elapsed()
            })
        });
    }
}

pub fn seq_insert(c: &mut Criterion) {
    c.bench_function("seq_insert", |b| {
        let mut tree = AdaptiveRadixTree::new();
        let mut key = 0u64;
        b.iter(|| {
            tree.insert(key.to_be_bytes().as_slice(), key.to_be_bytes().to_vec());
            key += 1;
        })
    });
}

fn gen_keys(l1_prefix: usize, l2_prefix: usize, suffix: usize) -> Vec<String> {
    let mut keys = Vec::new();
    let chars: Vec<char> = ('a'..='z').collect();
    for i in 0..chars.len() {
        let level1_prefix = chars[i].to_string().repeat(l1_prefix);
        for i in 0..chars.len() {
            let level2_prefix = chars[i].to_string().repeat(l2_prefix);
            let key_prefix = level1_prefix.clone() + &level2_prefix;
            for _ in 0..=u8::MAX {
                let suffix: String = (0..suffix)
                    .map(|_| chars[thread_rng().gen_range(0..chars.len())])
                    .collect();
                let k = key_prefix.clone() + &suffix;
                keys.push(k);
            }
        }
    }

    keys.shuffle(&mut thread_rng());
    keys
}

criterion_group!(rand_benches, rand_get, rand_get_str, rand_insert, rand_remove);
criterion_group!(seq_benches, seq_get, seq_insert);
criterion_main!(seq_benches, rand_benches);
