//! Criterion benchmarks for the per-sample pieces of a trial run.
//!
//! Measures random draws per source, histogram placement across bin counts,
//! and pixel mapping, which together bound the sampling loop's throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trials_core::canvas::PixelMapper;
use trials_core::histogram::Histogram;
use trials_core::rng::{RandomSource, RandomnessSource, SourceKind};
use trials_core::stats::{scale, RunningStats};

/// Benchmark one draw from each source.
fn bench_sources(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_sources");

    let kinds = [
        SourceKind::System { seed: Some(42) },
        SourceKind::Cryptographic,
        SourceKind::LinearCongruential { seed: 0 },
        SourceKind::Constant { value: 10 },
    ];

    for kind in kinds {
        let mut source = RandomnessSource::from_kind(&kind);
        group.bench_function(kind.name(), |b| {
            b.iter(|| source.next(black_box(-40), black_box(60)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark histogram placement, which scans bins linearly.
fn bench_histogram_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("histogram_add");

    for bins in [10, 50, 500] {
        let mut histogram = Histogram::new(bins, 0.0, 1.0).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(bins), &bins, |b, _| {
            b.iter(|| histogram.add(black_box(0.73)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the full per-sample update without orchestration overhead.
fn bench_sample_update(c: &mut Criterion) {
    c.bench_function("sample_update_10k", |b| {
        b.iter(|| {
            let mut source = RandomnessSource::from_kind(&SourceKind::LinearCongruential { seed: 0 });
            let mut histogram = Histogram::new(50, 0.0, 1.0).unwrap();
            let mut stats = RunningStats::new();
            let mut mapper = PixelMapper::new(100, 100, 10_000, 10).unwrap();

            for k in 0..10_000u64 {
                let raw = source.next(-40, 60).unwrap();
                let scaled = scale(raw, -40, 60, 0.0, 1.0).unwrap();
                histogram.add(scaled).unwrap();
                mapper.observe(k, raw).unwrap();
                stats.push(scaled).unwrap();
            }
            black_box(stats.mean())
        });
    });
}

criterion_group!(benches, bench_sources, bench_histogram_add, bench_sample_update);
criterion_main!(benches);
