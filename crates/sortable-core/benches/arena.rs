//! Benchmarks for the generational arena

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sortable_core::alloc::Arena;

fn bench_arena_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_insert");

    for size in [10, 100, 1000, 10000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut arena = Arena::with_capacity(size);
                for i in 0..size {
                    arena.insert(black_box(i));
                }
                arena
            });
        });
    }

    group.finish();
}

fn bench_arena_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_churn");

    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut arena = Arena::new();
                let handles: Vec<_> = (0..size).map(|i| arena.insert(i)).collect();
                for handle in handles.iter().step_by(2) {
                    arena.remove(*handle);
                }
                for i in 0..size / 2 {
                    arena.insert(black_box(i));
                }
                black_box(arena.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_arena_insert, bench_arena_churn);
criterion_main!(benches);
