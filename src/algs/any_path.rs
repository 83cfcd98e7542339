//! Mark every vertex and half-edge on some path between two vertices.
//!
//! Pass 1 runs a depth-first search from `a` and marks, on the way back, each
//! vertex from which the target vertex of `b` was reached, plus each arc
//! leading into such a vertex. Arcs into a vertex that had already been
//! entered are not revisited, so pass 1 can leave gaps and keep arcs whose
//! only purpose was reaching `b` through a vertex that later proved useful.
//! Pass 2 repeats the search from `a` over pass-1 arcs only, which drops the
//! branches that do not end at `b`, and then copies its result onto the
//! caller's masks.
//!
//! Both passes work on scratch masks and use explicit frame stacks.

use crate::mesh_error::MeshGraphError;
use crate::topology::graph::{HalfEdgeGraph, LoopStep};
use crate::topology::mask::Mask;
use crate::topology::node::HalfEdgeId;

struct Frame {
    ring: Vec<u32>,
    pos: usize,
    entry: Option<u32>,
    found: bool,
}

impl Frame {
    fn enter(graph: &HalfEdgeGraph, v: u32, entry: Option<u32>) -> Self {
        Self {
            ring: graph.raw_loop(v, LoopStep::Vertex).collect(),
            pos: 0,
            entry,
            found: false,
        }
    }
}

/// Mark a path from the vertex of `a` to the vertex of `b`.
///
/// Arcs run from a half-edge's vertex to the vertex of its `f_succ`; with
/// `edge_mask` set only half-edges carrying it may be followed. On success
/// every vertex on the marked paths carries `path_vertex` around its whole
/// loop and every followed half-edge carries `path_edge`. Bits of
/// `path_vertex` and `path_edge` already set on the graph are left in place
/// and do not steer the search. Returns `false` and marks nothing when `b`
/// is unreachable.
pub fn mark_any_path_between(
    graph: &mut HalfEdgeGraph,
    a: HalfEdgeId,
    b: HalfEdgeId,
    edge_mask: Option<Mask>,
    path_edge: Mask,
    path_vertex: Mask,
) -> Result<bool, MeshGraphError> {
    let ai = graph.resolve(a)?;
    let bi = graph.resolve(b)?;

    let mut vm = graph.scoped_mask()?;
    let seen = vm.mask();
    let mut tm = vm.scoped_mask()?;
    let target = tm.mask();
    let mut ce = tm.scoped_mask()?;
    let candidate = ce.mask();

    ce.sweep_mask(bi, LoopStep::Vertex, target, true);
    let reached = search(
        &mut ce,
        ai,
        |g, j| edge_mask.is_none_or(|m| g.has_mask_at(j, m)),
        seen,
        target,
        candidate,
    );
    if !reached {
        return Ok(false);
    }

    ce.clear_mask_all(seen | target);
    ce.sweep_mask(bi, LoopStep::Vertex, target, true);
    let mut pe = ce.scoped_mask()?;
    let on_path = pe.mask();
    let marked = search(
        &mut pe,
        ai,
        |g, j| g.has_mask_at(j, candidate),
        seen,
        target,
        on_path,
    );
    if marked {
        for node in pe.store.live_nodes_mut() {
            if node.mask.intersects(target) {
                node.mask |= path_vertex;
            }
            if node.mask.intersects(on_path) {
                node.mask |= path_edge;
            }
        }
    }
    log::debug!("mark_any_path_between {a} -> {b}: {marked}");
    Ok(marked)
}

/// Depth-first search from `start`. A vertex is accepted when it carries
/// `accept`; accepted vertices get `accept` around their loop and the arcs
/// into them get `edge_mark`.
fn search<F>(
    graph: &mut HalfEdgeGraph,
    start: u32,
    crossable: F,
    seen: Mask,
    accept: Mask,
    edge_mark: Mask,
) -> bool
where
    F: Fn(&HalfEdgeGraph, u32) -> bool,
{
    if graph.has_mask_at(start, accept) {
        return true;
    }
    graph.sweep_mask(start, LoopStep::Vertex, seen, true);
    let mut frames = vec![Frame::enter(graph, start, None)];
    let mut result = false;

    while let Some(top) = frames.last_mut() {
        if top.pos < top.ring.len() {
            let j = top.ring[top.pos];
            top.pos += 1;
            if !crossable(&*graph, j) {
                continue;
            }
            let w = graph.fs(j);
            if graph.has_mask_at(w, accept) {
                graph.set_mask_at(j, edge_mark);
                top.found = true;
            } else if !graph.has_mask_at(w, seen) {
                graph.sweep_mask(w, LoopStep::Vertex, seen, true);
                frames.push(Frame::enter(graph, w, Some(j)));
            }
            continue;
        }

        let Some(done) = frames.pop() else { break };
        if !done.found {
            continue;
        }
        graph.sweep_mask(done.ring[0], LoopStep::Vertex, accept, true);
        match (done.entry, frames.last_mut()) {
            (Some(j), Some(parent)) => {
                graph.set_mask_at(j, edge_mark);
                parent.found = true;
            }
            _ => result = true,
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Path a0 -> (b0|a1) -> b1 plus a dead-end spur at the middle vertex.
    #[test]
    fn marks_path_and_skips_spur() {
        let mut g = HalfEdgeGraph::new();
        let (a0, b0) = g.create_edge().unwrap();
        let (a1, b1) = g.create_edge().unwrap();
        g.vertex_twist(b0, a1).unwrap();
        let (s, _) = g.create_edge().unwrap();
        g.vertex_twist(s, a1).unwrap();

        let far = g.f_succ(a1).unwrap();
        assert_eq!(far, b1);
        let spur_end = g.f_succ(s).unwrap();

        let found =
            mark_any_path_between(&mut g, a0, far, None, Mask::BOUNDARY, Mask::VISITED).unwrap();
        assert!(found);
        assert!(g.has_mask(a0, Mask::BOUNDARY));
        assert!(g.has_mask(a1, Mask::BOUNDARY));
        assert!(!g.has_mask(s, Mask::BOUNDARY));
        assert!(g.has_mask(a0, Mask::VISITED));
        assert!(g.has_mask(b0, Mask::VISITED));
        assert!(g.has_mask(b1, Mask::VISITED));
        assert!(!g.has_mask(spur_end, Mask::VISITED));
        assert_eq!(g.free_mask_count(), 16);
    }

    #[test]
    fn stale_path_bits_do_not_cut_the_search() {
        let mut g = HalfEdgeGraph::new();
        let (a0, b0) = g.create_edge().unwrap();
        let (a1, b1) = g.create_edge().unwrap();
        g.vertex_twist(b0, a1).unwrap();
        let (s, _) = g.create_edge().unwrap();
        g.vertex_twist(s, a1).unwrap();
        let spur_end = g.f_succ(s).unwrap();

        // left over from an earlier call
        g.set_mask_around_vertex(a0, Mask::VISITED).unwrap();
        g.set_mask_around_vertex(spur_end, Mask::VISITED).unwrap();

        let found =
            mark_any_path_between(&mut g, a0, b1, None, Mask::BOUNDARY, Mask::VISITED).unwrap();
        assert!(found);
        assert!(g.has_mask(a0, Mask::BOUNDARY));
        assert!(g.has_mask(a1, Mask::BOUNDARY));
        assert!(!g.has_mask(s, Mask::BOUNDARY));
        assert!(g.has_mask(b0, Mask::VISITED));
        assert!(g.has_mask(b1, Mask::VISITED));
        assert!(g.has_mask(spur_end, Mask::VISITED));
        assert_eq!(g.count_masked_in_graph(Mask::BOUNDARY), 2);
        assert_eq!(g.free_mask_count(), 16);
    }

    #[test]
    fn unreachable_target_marks_nothing() {
        let mut g = HalfEdgeGraph::new();
        let (a, _) = g.create_edge().unwrap();
        let (c, _) = g.create_edge().unwrap();
        let found =
            mark_any_path_between(&mut g, a, c, None, Mask::BOUNDARY, Mask::VISITED).unwrap();
        assert!(!found);
        assert_eq!(g.count_masked_in_graph(Mask::BOUNDARY | Mask::VISITED), 0);
    }
}
