//! Benchmarks for bounded buffers and aggregation.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tallyring_core::aggregate::{Aggregator, Mean, Quantile};
use tallyring_core::buffer::BoundedBuffer;

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_append");

    for capacity in [16usize, 1024, 65_536] {
        group.throughput(Throughput::Elements(100_000));
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let mut buffer = BoundedBuffer::new(capacity).unwrap();
                    for i in 0..100_000u64 {
                        buffer.append(black_box(i));
                    }
                    buffer.len()
                });
            },
        );
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut buffer = BoundedBuffer::new(4096).unwrap();
    buffer.extend(0..10_000u64);

    c.bench_function("buffer_snapshot_4096", |b| {
        b.iter(|| black_box(buffer.snapshot()));
    });
}

fn bench_aggregate_snapshot(c: &mut Criterion) {
    let mut buffer = BoundedBuffer::new(4096).unwrap();
    buffer.extend((0..10_000i32).map(|i| f64::from(i) * 0.5));

    c.bench_function("mean_over_buffer", |b| {
        b.iter(|| {
            let mut mean = Mean::<f64>::new();
            mean.aggregate_all(buffer.iter());
            black_box(mean.result())
        });
    });

    c.bench_function("p99_over_buffer", |b| {
        b.iter(|| {
            let mut p99 = Quantile::<f64>::new(0.99).unwrap();
            p99.aggregate_all(&buffer);
            black_box(p99.result())
        });
    });
}

criterion_group!(benches, bench_append, bench_snapshot, bench_aggregate_snapshot);
criterion_main!(benches);
