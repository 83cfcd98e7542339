use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use halfedge_topo::algs::{ComponentScope, LoopKind, collect_loops, connected_components};
use halfedge_topo::io::flat;
use halfedge_topo::topology::{HalfEdgeGraph, HalfEdgeId, Mask};

/// `count` disjoint polygons of `k` edges, each with a chord from its first
/// corner to every other corner.
fn build_fans(count: usize, k: usize) -> HalfEdgeGraph {
    let mut g = HalfEdgeGraph::new();
    for _ in 0..count {
        let mut a: Vec<HalfEdgeId> = Vec::with_capacity(k);
        let mut b: Vec<HalfEdgeId> = Vec::with_capacity(k);
        for _ in 0..k {
            let (x, y) = g.create_edge().expect("create_edge");
            a.push(x);
            b.push(y);
        }
        for i in 0..k {
            g.vertex_twist(b[i], a[(i + 1) % k]).expect("vertex_twist");
        }
        for i in 2..k - 1 {
            g.join(a[0], a[i], Mask::NONE, Mask::NONE).expect("join");
        }
    }
    g
}

fn bench_loops(c: &mut Criterion) {
    let mut group = c.benchmark_group("loops");

    for &count in &[64usize, 512] {
        let mut g = build_fans(count, 8);

        group.bench_with_input(BenchmarkId::new("face_loops", count), &count, |b, _| {
            b.iter(|| {
                let seeds = collect_loops(&mut g, LoopKind::Face).expect("loops");
                black_box(seeds);
            });
        });

        group.bench_with_input(BenchmarkId::new("vertex_loops", count), &count, |b, _| {
            b.iter(|| {
                let seeds = collect_loops(&mut g, LoopKind::Vertex).expect("loops");
                black_box(seeds);
            });
        });

        group.bench_with_input(BenchmarkId::new("components_face", count), &count, |b, _| {
            b.iter(|| {
                let comps = connected_components(&mut g, ComponentScope::Face).expect("components");
                black_box(comps);
            });
        });

        group.bench_with_input(BenchmarkId::new("flat_store_load", count), &count, |b, _| {
            b.iter(|| {
                let bytes = flat::store(&g);
                let back = flat::load(&bytes).expect("load");
                black_box(back);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_loops);
criterion_main!(benches);
