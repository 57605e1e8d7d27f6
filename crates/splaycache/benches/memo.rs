use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use splaycache::{LruCache, Memo, MemoCache, SplayTree};

fn fib<C: MemoCache<Key = u64, Value = u128>>(n: u64, memo: &mut Memo<C>) -> u128 {
    if let Some(value) = memo.get(&n) {
        return value;
    }
    if n <= 1 {
        return n as u128;
    }
    let value = fib(n - 1, memo).wrapping_add(fib(n - 2, memo));
    memo.put(n, value);
    value
}

fn bench_fib_cold(c: &mut Criterion) {
    let mut group = c.benchmark_group("fib_cold");
    group.sample_size(50);

    for n in [100u64, 500, 900] {
        group.throughput(Throughput::Elements(n));

        group.bench_with_input(BenchmarkId::new("splay", n), &n, |b, &n| {
            b.iter(|| {
                let mut memo = Memo::new(SplayTree::new());
                black_box(fib(n, &mut memo))
            });
        });

        group.bench_with_input(BenchmarkId::new("lru", n), &n, |b, &n| {
            b.iter(|| {
                let mut memo = Memo::new(LruCache::unbounded());
                black_box(fib(n, &mut memo))
            });
        });
    }

    group.finish();
}

fn bench_hot_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("hot_key");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("splay_find_root", |b| {
        let mut tree: SplayTree<u64, u64> = (0..10_000).map(|k| (k, k)).collect();
        tree.find(&5_000);

        b.iter(|| {
            black_box(tree.find(black_box(&5_000)).copied());
        });
    });

    group.bench_function("lru_get", |b| {
        let mut cache = LruCache::new(10_000);
        for k in 0..10_000u64 {
            cache.put(k, k);
        }

        b.iter(|| {
            black_box(cache.get(black_box(&5_000)).copied());
        });
    });

    group.finish();
}

fn bench_scattered(c: &mut Criterion) {
    let mut group = c.benchmark_group("scattered");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("splay_find", |b| {
        let mut tree: SplayTree<u64, u64> = (0..10_000).map(|k| (k, k)).collect();
        let mut counter = 0u64;

        b.iter(|| {
            // Stride coprime with the key count visits every key
            black_box(tree.find(&(counter * 7_919 % 10_000)).copied());
            counter += 1;
        });
    });

    group.bench_function("lru_get", |b| {
        let mut cache = LruCache::new(10_000);
        for k in 0..10_000u64 {
            cache.put(k, k);
        }
        let mut counter = 0u64;

        b.iter(|| {
            black_box(cache.get(&(counter * 7_919 % 10_000)).copied());
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_fib_cold, bench_hot_key, bench_scattered);
criterion_main!(benches);
