//! Benchmarks for fibre network operations.

use criterion::{criterion_group, criterion_main, Criterion};
use carpmesh::dataset::{self, ScalarType};
use carpmesh::io::pkje;
use carpmesh::prelude::*;

/// A trunk of `n` cables along x. Every inner trunk point also starts three
/// short branches, so each junction has four sons.
fn create_comb_store(n: usize) -> DatasetStore {
    let mut points = Dataset::new(dataset::POINTS, ScalarType::F64);
    let mut cables = Dataset::new(dataset::ELEMENTS, ScalarType::U32);

    for i in 0..=n {
        points.append(&[i as f64, 0.0, 0.0]);
    }
    for i in 0..n {
        cables.append(&[i as f64, (i + 1) as f64]);
    }
    for i in 1..n {
        for (dy, dz) in [(0.5, 0.0), (-0.5, 0.0), (0.0, 0.5)] {
            let tip = points.append(&[i as f64 + 0.25, dy, dz]);
            cables.append(&[i as f64, tip as f64]);
        }
    }

    let mut store = DatasetStore::new();
    store.insert(points);
    store.insert(cables);
    store
}

fn bench_reconstruct(c: &mut Criterion) {
    let store = create_comb_store(1000);
    let options = ReconstructOptions::default();

    c.bench_function("build_relations_comb_1000", |b| {
        b.iter(|| PurkinjeNetwork::from_store(&store, KeyMode::Exact).unwrap())
    });

    c.bench_function("reconstruct_comb_1000", |b| {
        b.iter(|| reconstruct(&store, &options).unwrap())
    });

    let quantized = options
        .clone()
        .with_key_mode(KeyMode::quantized(1e-6).unwrap());
    c.bench_function("reconstruct_comb_1000_quantized", |b| {
        b.iter(|| reconstruct(&store, &quantized).unwrap())
    });
}

fn bench_serialize(c: &mut Criterion) {
    let store = create_comb_store(1000);
    let (network, _) = reconstruct(&store, &ReconstructOptions::default()).unwrap();
    let config = PurkinjeConfig::default();

    c.bench_function("write_pkje_comb_1000", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            pkje::write(&network, &config, &mut buf).unwrap();
            buf.len()
        })
    });
}

criterion_group!(benches, bench_reconstruct, bench_serialize);
criterion_main!(benches);
