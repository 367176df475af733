//! Benchmarks for cluster styling and heatmap derivation
//!
//! Run with: cargo bench -p maps --bench cluster

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use maps::cluster::{calculate, select_style_index};
use maps::geo::LatLng;
use maps::heatmap::{derive_candidates, HeatmapSpec};
use maps::marker::Marker;
use maps_source::{ListValue, ObjectItem};
use rand::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn random_markers(rng: &mut StdRng, n: usize) -> Vec<Marker> {
    (0..n)
        .map(|i| {
            let position = LatLng::new(rng.gen_range(-80.0..80.0), rng.gen_range(-170.0..170.0));
            Marker::new(format!("m{i}").as_str(), position)
        })
        .collect()
}

fn random_items(rng: &mut StdRng, n: usize) -> Vec<ObjectItem> {
    (0..n)
        .map(|i| {
            ObjectItem::new(format!("h{i}"))
                .with("lat", rng.gen_range(-80.0f64..80.0))
                .with("lng", rng.gen_range(-170.0f64..170.0))
                .with("weight", rng.gen_range(0.0f64..10.0))
        })
        .collect()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_select_style_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_style_index");

    for count in [1usize, 100, 10_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| select_style_index(black_box(count), black_box(5)))
        });
    }

    group.finish();
}

fn bench_calculate_many_clusters(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let clusters: Vec<Vec<Marker>> = (0..1_000)
        .map(|_| {
            let size = rng.gen_range(1..200);
            random_markers(&mut rng, size)
        })
        .collect();

    let mut group = c.benchmark_group("calculate");
    group.throughput(Throughput::Elements(clusters.len() as u64));
    group.bench_function("1000_clusters", |b| {
        b.iter(|| {
            for cluster in &clusters {
                black_box(calculate(cluster, 5).ok());
            }
        })
    });
    group.finish();
}

fn bench_derive_candidates(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let mut group = c.benchmark_group("derive_candidates");

    for n in [100usize, 10_000] {
        let specs = vec![HeatmapSpec::new(
            ListValue::available(random_items(&mut rng, n)),
            "lat,lng,weight",
        )];
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &specs, |b, specs| {
            b.iter(|| derive_candidates(black_box(specs)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_select_style_index,
    bench_calculate_many_clusters,
    bench_derive_candidates
);
criterion_main!(benches);
