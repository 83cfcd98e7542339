//! Structural validation of a [`HalfEdgeGraph`].

use itertools::Itertools;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshGraphError;
use crate::topology::graph::HalfEdgeGraph;
use crate::topology::labels::LabelIndex;
use crate::topology::node::NULL_INDEX;

/// Optional validation toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Walk the free list and reconcile it with the slot counts.
    pub check_free_list: bool,
    /// Ensure every label array covers every slot.
    pub check_labels: bool,
    /// How to treat two-sided faces bounded by two distinct edges.
    pub sliver_faces: SliverHandling,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_free_list: true,
            check_labels: true,
            sliver_faces: SliverHandling::Ignore,
        }
    }
}

impl ValidationOptions {
    /// Enable every check and reject sliver faces.
    pub fn all() -> Self {
        Self {
            check_free_list: true,
            check_labels: true,
            sliver_faces: SliverHandling::Error,
        }
    }
}

/// Behavior for sliver face detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliverHandling {
    /// Skip sliver detection.
    Ignore,
    /// Log a warning per sliver face.
    Warn,
    /// Return an error on the first sliver face.
    Error,
}

fn violation(msg: String) -> MeshGraphError {
    MeshGraphError::InvariantViolation(msg)
}

/// Check links, the mate involution, the free list and label storage.
pub fn validate_graph(
    graph: &HalfEdgeGraph,
    options: ValidationOptions,
) -> Result<(), MeshGraphError> {
    let store = &graph.store;
    let slots = store.len();
    let mut f_hits = vec![0u8; slots];
    let mut v_hits = vec![0u8; slots];

    for i in store.live_indices() {
        let (f, v) = (graph.fs(i), graph.vs(i));
        if !store.is_live(f) {
            return Err(violation(format!("half-edge {i}: f_succ {f} is not live")));
        }
        if !store.is_live(v) {
            return Err(violation(format!("half-edge {i}: v_succ {v} is not live")));
        }
        f_hits[f as usize] += 1;
        v_hits[v as usize] += 1;
        if f_hits[f as usize] > 1 {
            return Err(violation(format!("f_succ is not a permutation at {f}")));
        }
        if v_hits[v as usize] > 1 {
            return Err(violation(format!("v_succ is not a permutation at {v}")));
        }
    }

    for i in store.live_indices() {
        let m = graph.mate(i);
        if m == i {
            return Err(violation(format!("half-edge {i} is its own mate")));
        }
        if graph.mate(m) != i {
            return Err(violation(format!(
                "mate is not an involution: {i} -> {m} -> {}",
                graph.mate(m)
            )));
        }
    }

    let live = store.live_indices().count();
    if live != store.active() {
        return Err(violation(format!(
            "active count {} disagrees with {live} live slots",
            store.active()
        )));
    }

    if options.check_free_list {
        validate_free_list(graph)?;
    }

    if options.check_labels {
        for (k, def) in graph.labels.defs().iter().enumerate() {
            let len = graph.labels.values(LabelIndex::new(k as u32)).len();
            if len != slots {
                return Err(violation(format!(
                    "label {k} (tag {}) has {len} values for {slots} slots",
                    def.tag
                )));
            }
        }
    }

    validate_slivers(graph, options.sliver_faces)
}

fn validate_free_list(graph: &HalfEdgeGraph) -> Result<(), MeshGraphError> {
    let store = &graph.store;
    let mut head = store.free_head();
    let mut seen = 0usize;
    while head != NULL_INDEX {
        if seen + 2 > store.free() {
            return Err(violation(format!(
                "free list is longer than the {} free slots",
                store.free()
            )));
        }
        if (head as usize) >= store.len() || !store.node(head).is_deleted() {
            return Err(violation(format!("free list head {head} is not a free slot")));
        }
        let partner = store.node(head).f_succ;
        if (partner as usize) >= store.len() || !store.node(partner).is_deleted() {
            return Err(violation(format!(
                "free list partner {partner} of {head} is not a free slot"
            )));
        }
        seen += 2;
        head = store.node(partner).f_succ;
    }
    if seen != store.free() {
        return Err(violation(format!(
            "free list holds {seen} slots, expected {}",
            store.free()
        )));
    }
    if store.active() + store.free() != store.len() {
        return Err(violation(format!(
            "{} active + {} free != {} slots",
            store.active(),
            store.free(),
            store.len()
        )));
    }
    Ok(())
}

fn validate_slivers(
    graph: &HalfEdgeGraph,
    handling: SliverHandling,
) -> Result<(), MeshGraphError> {
    if handling == SliverHandling::Ignore {
        return Ok(());
    }
    // Each sliver is listed once, from its lower slot.
    let slivers: Vec<(u32, u32)> = graph
        .store
        .live_indices()
        .map(|i| (i, graph.fs(i)))
        .filter(|&(i, q)| q > i && graph.fs(q) == i && q != graph.mate(i))
        .collect();
    let Some(&(i, q)) = slivers.first() else {
        return Ok(());
    };
    if handling == SliverHandling::Error {
        return Err(violation(format!("sliver face at half-edges {i} and {q}")));
    }
    log::warn!(
        "{} sliver faces detected: {}",
        slivers.len(),
        slivers.iter().map(|(i, q)| format!("{i}/{q}")).join(", ")
    );
    Ok(())
}

impl DebugInvariants for HalfEdgeGraph {
    fn validate_invariants(&self) -> Result<(), MeshGraphError> {
        validate_graph(self, ValidationOptions::default())
    }
}
