//! Spanning forest with preferred edges taken first.
//!
//! The frontier is kept in two stacks. Half-edges for which `is_preferred`
//! holds go on the first stack, which is always drained before the second,
//! so the forest uses as many preferred edges as the exploration order
//! allows.

use crate::mesh_error::MeshGraphError;
use crate::topology::graph::{HalfEdgeGraph, LoopStep};
use crate::topology::node::HalfEdgeId;

/// Result of [`prioritized_spanning_tree`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpanningTree {
    /// Tree half-edges in discovery order; each points away from the root.
    pub tree_edges: Vec<HalfEdgeId>,
    /// One half-edge per vertex: the root seed for the first vertex of each
    /// tree, otherwise the half-edge the vertex was discovered through
    /// (`f_succ` of its tree edge).
    pub vertex_seeds: Vec<HalfEdgeId>,
}

pub fn prioritized_spanning_tree<F>(
    graph: &mut HalfEdgeGraph,
    mut is_preferred: F,
) -> Result<SpanningTree, MeshGraphError>
where
    F: FnMut(&HalfEdgeGraph, HalfEdgeId) -> bool,
{
    let mut visit = graph.scoped_mask()?;
    let seen = visit.mask();
    let mut out = SpanningTree::default();
    let mut preferred: Vec<u32> = Vec::new();
    let mut other: Vec<u32> = Vec::new();

    let live: Vec<u32> = visit.store.live_indices().collect();
    for root in live {
        if visit.has_mask_at(root, seen) {
            continue;
        }
        out.vertex_seeds.push(visit.id_at(root));
        visit.sweep_mask(root, LoopStep::Vertex, seen, true);
        push_frontier(&visit, root, &mut is_preferred, &mut preferred, &mut other);

        while let Some(j) = preferred.pop().or_else(|| other.pop()) {
            let w = visit.fs(j);
            if visit.has_mask_at(w, seen) {
                continue;
            }
            visit.sweep_mask(w, LoopStep::Vertex, seen, true);
            out.tree_edges.push(visit.id_at(j));
            out.vertex_seeds.push(visit.id_at(w));
            push_frontier(&visit, w, &mut is_preferred, &mut preferred, &mut other);
        }
    }
    Ok(out)
}

fn push_frontier<F>(
    graph: &HalfEdgeGraph,
    v: u32,
    is_preferred: &mut F,
    preferred: &mut Vec<u32>,
    other: &mut Vec<u32>,
) where
    F: FnMut(&HalfEdgeGraph, HalfEdgeId) -> bool,
{
    for j in graph.raw_loop(v, LoopStep::Vertex) {
        if is_preferred(graph, graph.id_at(j)) {
            preferred.push(j);
        } else {
            other.push(j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::mask::Mask;

    #[test]
    fn triangle_tree_prefers_marked_edges() {
        let mut g = HalfEdgeGraph::new();
        let (a0, b0) = g.create_edge().unwrap();
        let (a1, b1) = g.create_edge().unwrap();
        g.vertex_twist(b0, a1).unwrap();
        let (a2, _) = g.join(b1, a0, Mask::NONE, Mask::NONE).unwrap();
        g.set_mask_around_edge(a1, Mask::BOUNDARY).unwrap();
        g.set_mask_around_edge(a2, Mask::BOUNDARY).unwrap();

        let tree =
            prioritized_spanning_tree(&mut g, |g, id| g.has_mask(id, Mask::BOUNDARY)).unwrap();
        assert_eq!(tree.vertex_seeds.len(), 3);
        assert_eq!(tree.tree_edges.len(), 2);
        for e in &tree.tree_edges {
            assert!(g.has_mask(*e, Mask::BOUNDARY));
        }
        assert!(!tree.tree_edges.contains(&a0) && !tree.tree_edges.contains(&b0));
        assert_eq!(g.free_mask_count(), 16);
    }

    #[test]
    fn forest_has_one_root_per_component() {
        let mut g = HalfEdgeGraph::new();
        g.create_edge().unwrap();
        g.create_self_loop().unwrap();
        let tree = prioritized_spanning_tree(&mut g, |_, _| false).unwrap();
        assert_eq!(tree.vertex_seeds.len(), 3);
        assert_eq!(tree.tree_edges.len(), 1);
    }
}
