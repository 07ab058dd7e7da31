//! Benchmarks for trace generation.
//!
//! Run with: cargo bench -p sortviz-core --bench trace_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use sortviz_core::{Algorithm, Pattern, StepSorter, TraceMetrics, generate, generate_trace};

fn bench_generate_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace/generate");
    for size in [50usize, 200] {
        let data = generate(Pattern::Random, size, 42);
        for algorithm in Algorithm::ALL {
            group.bench_with_input(BenchmarkId::new(algorithm.id(), size), &data, |b, data| {
                b.iter(|| generate_trace(algorithm, black_box(data)));
            });
        }
    }
    group.finish();
}

fn bench_silent_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace/silent_sort");
    let data = generate(Pattern::Random, 200, 42);
    for algorithm in Algorithm::ALL {
        group.bench_function(algorithm.id(), |b| {
            b.iter(|| {
                let mut values = data.clone();
                algorithm.sort(black_box(&mut values));
                values
            });
        });
    }
    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let data = generate(Pattern::Random, 200, 42);
    let trace = generate_trace(Algorithm::Bubble, &data);
    c.bench_function("trace/metrics_bubble_200", |b| {
        b.iter(|| TraceMetrics::of(black_box(&trace)));
    });
}

criterion_group!(benches, bench_generate_trace, bench_silent_sort, bench_metrics);
criterion_main!(benches);
