//! Vectorised reductions against a plain iterator fold

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tastate_core::{simd, Float};

fn bench_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum");

    for size in [16, 256, 4_096, 65_536] {
        let data: Vec<Float> = (0..size).map(|i| i as Float * 0.5).collect();

        group.bench_with_input(BenchmarkId::new("dispatch", size), &data, |b, data| {
            b.iter(|| black_box(simd::sum(black_box(data))))
        });
        group.bench_with_input(BenchmarkId::new("scalar", size), &data, |b, data| {
            b.iter(|| black_box(simd::scalar::sum(black_box(data))))
        });
    }

    group.finish();
}

fn bench_dot_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot_product");

    for size in [16, 256, 4_096] {
        let data: Vec<Float> = (0..size).map(|i| i as Float).collect();
        let weights: Vec<Float> = (1..=size).map(|w| w as Float).collect();

        group.bench_with_input(BenchmarkId::new("dispatch", size), &size, |b, _| {
            b.iter(|| black_box(simd::dot_product(black_box(&data), black_box(&weights))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sum, bench_dot_product);
criterion_main!(benches);
