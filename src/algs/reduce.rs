//! Bulk edge removal.

use crate::debug_invariants::debug_invariants;
use crate::mesh_error::MeshGraphError;
use crate::topology::graph::HalfEdgeGraph;
use crate::topology::mask::Mask;

/// Repeatedly drop edges with an end of vertex degree one until none is
/// left. Returns the number of edges dropped.
///
/// Isolated edges vanish entirely; cycles and everything between them stay.
pub fn drop_trees(graph: &mut HalfEdgeGraph) -> Result<usize, MeshGraphError> {
    let mut work: Vec<u32> = graph
        .store
        .live_indices()
        .filter(|&i| graph.vs(i) == i)
        .collect();
    let mut dropped = 0;

    while let Some(i) = work.pop() {
        // Entries can go stale: dropped, or no longer a leaf.
        if !graph.store.is_live(i) || graph.vs(i) != i {
            continue;
        }
        let m = graph.mate(i);
        let neighbour = (graph.vs(m) != m).then(|| graph.vp(m));
        graph.remove_edge(i);
        dropped += 1;
        if let Some(p) = neighbour {
            if graph.vs(p) == p {
                work.push(p);
            }
        }
    }

    log::debug!("drop_trees: dropped {dropped} edges");
    debug_invariants!(&*graph);
    Ok(dropped)
}

/// Drop every edge where either half carries `mask` (`present = true`), or
/// where neither half does (`present = false`). Returns the number of edges
/// dropped.
pub fn drop_edges_by_mask(
    graph: &mut HalfEdgeGraph,
    mask: Mask,
    present: bool,
) -> Result<usize, MeshGraphError> {
    let mut doomed = Vec::new();
    for i in graph.store.live_indices() {
        let m = graph.mate(i);
        if m < i {
            continue;
        }
        let carries = graph.has_mask_at(i, mask) || graph.has_mask_at(m, mask);
        if carries == present {
            doomed.push(i);
        }
    }
    for &i in &doomed {
        graph.remove_edge(i);
    }

    log::debug!(
        "drop_edges_by_mask {mask:?} (present = {present}): dropped {} edges",
        doomed.len()
    );
    debug_invariants!(&*graph);
    Ok(doomed.len())
}
