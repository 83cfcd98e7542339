#![allow(dead_code)]
use halfedge_topo::prelude::*;

/// Closed polygon with `k` edges. Returns the inner half-edges `a` (one face,
/// `f_succ(a[i]) == a[i + 1]`) and the outer half-edges `b`.
pub fn polygon(g: &mut HalfEdgeGraph, k: usize) -> (Vec<HalfEdgeId>, Vec<HalfEdgeId>) {
    let mut a = Vec::with_capacity(k);
    let mut b = Vec::with_capacity(k);
    for _ in 0..k {
        let (x, y) = g.create_edge().unwrap();
        a.push(x);
        b.push(y);
    }
    for i in 0..k {
        g.vertex_twist(b[i], a[(i + 1) % k]).unwrap();
    }
    (a, b)
}

pub fn triangle(g: &mut HalfEdgeGraph) -> (Vec<HalfEdgeId>, Vec<HalfEdgeId>) {
    polygon(g, 3)
}

/// Open path of `k` edges; `a[i]` points along the path.
pub fn path(g: &mut HalfEdgeGraph, k: usize) -> (Vec<HalfEdgeId>, Vec<HalfEdgeId>) {
    let mut a = Vec::with_capacity(k);
    let mut b = Vec::with_capacity(k);
    for _ in 0..k {
        let (x, y) = g.create_edge().unwrap();
        a.push(x);
        b.push(y);
    }
    for i in 1..k {
        g.vertex_twist(b[i - 1], a[i]).unwrap();
    }
    (a, b)
}

/// `(f_succ, v_succ)` of every live half-edge.
pub fn links(g: &HalfEdgeGraph) -> Vec<(HalfEdgeId, HalfEdgeId, HalfEdgeId)> {
    g.active_ids()
        .map(|id| (id, g.f_succ(id).unwrap(), g.v_succ(id).unwrap()))
        .collect()
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}
