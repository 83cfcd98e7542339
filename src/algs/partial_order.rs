//! Topological order of vertices under a direction mask.
//!
//! A half-edge `j` carrying the direction mask is an arc from the vertex of
//! `j` (its tail) to the vertex of `f_succ(j)` (its head). Vertices are
//! ordered with Kahn's algorithm over those arcs.

use std::collections::VecDeque;

use crate::algs::loops::{LoopKind, number_loops_raw};
use crate::mesh_error::MeshGraphError;
use crate::topology::graph::HalfEdgeGraph;
use crate::topology::mask::Mask;
use crate::topology::node::HalfEdgeId;

/// One seed half-edge per vertex, tails before heads.
///
/// # Errors
/// [`MeshGraphError::CycleDetected`] when the masked arcs contain a directed
/// cycle (including a masked self-loop).
pub fn partial_order(
    graph: &mut HalfEdgeGraph,
    direction: Mask,
) -> Result<Vec<HalfEdgeId>, MeshGraphError> {
    let vertices = number_loops_raw(graph, LoopKind::Vertex, true)?;
    let n = vertices.seeds.len();
    let vertex_of = |i: u32| vertices.loop_of[i as usize] as usize;

    let mut out_arcs: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    for j in graph.store.live_indices() {
        if !graph.has_mask_at(j, direction) {
            continue;
        }
        let (tail, head) = (vertex_of(j), vertex_of(graph.fs(j)));
        out_arcs[tail].push(head);
        in_degree[head] += 1;
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(v) = queue.pop_front() {
        order.push(graph.id_at(vertices.seeds[v]));
        for &w in &out_arcs[v] {
            in_degree[w] -= 1;
            if in_degree[w] == 0 {
                queue.push_back(w);
            }
        }
    }

    if order.len() != n {
        log::warn!(
            "partial_order: {} of {n} vertices lie on or behind a directed cycle",
            n - order.len()
        );
        return Err(MeshGraphError::CycleDetected);
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_orders_tail_first() {
        let mut g = HalfEdgeGraph::new();
        let (a0, b0) = g.create_edge().unwrap();
        let (a1, b1) = g.create_edge().unwrap();
        g.vertex_twist(b0, a1).unwrap();
        // arcs: b1's vertex -> middle -> a0's vertex
        g.set_mask(b1, Mask::DIRECTED_EDGE).unwrap();
        g.set_mask(b0, Mask::DIRECTED_EDGE).unwrap();
        let order = partial_order(&mut g, Mask::DIRECTED_EDGE).unwrap();
        assert_eq!(order.len(), 3);
        assert_eq!(order[0], b1);
        assert!(g.same_vertex(order[1], a1).unwrap());
        assert_eq!(order[2], a0);
    }

    #[test]
    fn masked_self_loop_is_a_cycle() {
        let mut g = HalfEdgeGraph::new();
        let (a, _) = g.create_self_loop().unwrap();
        g.set_mask(a, Mask::DIRECTED_EDGE).unwrap();
        assert_eq!(
            partial_order(&mut g, Mask::DIRECTED_EDGE),
            Err(MeshGraphError::CycleDetected)
        );
        assert_eq!(g.free_mask_count(), 16);
    }
}
