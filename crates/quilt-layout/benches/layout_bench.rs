//! Benchmarks for the placement algorithms.
//!
//! Run with: cargo bench -p quilt-layout

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use quilt_core::geometry::CellSize;
use quilt_layout::{Algorithm, PlacementSpec};
use std::hint::black_box;

fn widget_set(count: u16) -> Vec<PlacementSpec> {
    (0..count)
        .map(|i| {
            PlacementSpec::new(format!("w{i}"), CellSize::new(1 + i % 4, 1 + i % 3))
                .with_priority(i32::from(i % 10))
        })
        .collect()
}

fn bench_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/algorithms");
    let container = CellSize::new(12, 40);

    for count in [8u16, 32, 96] {
        let specs = widget_set(count);
        for algo in [
            Algorithm::BinPacking,
            Algorithm::ForceDirected,
            Algorithm::GoldenRatio,
            Algorithm::masonry(),
            Algorithm::PriorityFlow,
        ] {
            group.bench_with_input(
                BenchmarkId::new(algo.name(), count),
                &specs,
                |b, specs| {
                    b.iter(|| black_box(algo.apply(specs, container, 1)));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_algorithms);
criterion_main!(benches);
