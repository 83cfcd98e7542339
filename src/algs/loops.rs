//! Loop enumeration: one seed per face, vertex, or edge.
//!
//! A single pass over the live slots with a scoped visit mask. The first
//! unmarked half-edge of each loop becomes its seed, then the whole loop is
//! marked. Runs in O(n).

use std::collections::HashMap;

use crate::mesh_error::MeshGraphError;
use crate::topology::graph::{HalfEdgeGraph, LoopStep};
use crate::topology::node::{HalfEdgeId, NULL_INDEX};

/// Which loops to enumerate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LoopKind {
    /// Orbits of `f_succ`.
    Face,
    /// Orbits of `v_succ`.
    Vertex,
    /// Mated pairs.
    Edge,
}

/// Loop seeds plus the loop number of every live half-edge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopNumbering {
    pub seeds: Vec<HalfEdgeId>,
    pub loop_index: HashMap<HalfEdgeId, usize>,
}

impl LoopNumbering {
    pub fn loop_count(&self) -> usize {
        self.seeds.len()
    }

    pub fn loop_of(&self, id: HalfEdgeId) -> Option<usize> {
        self.loop_index.get(&id).copied()
    }
}

/// Slot-level numbering used by the graph searches.
///
/// `loop_of[slot]` is the loop number of a live slot and `NULL_INDEX` for
/// free slots.
pub(crate) struct RawNumbering {
    pub seeds: Vec<u32>,
    pub loop_of: Vec<u32>,
}

/// One seed per loop of `kind`, in slot order.
pub fn collect_loops(
    graph: &mut HalfEdgeGraph,
    kind: LoopKind,
) -> Result<Vec<HalfEdgeId>, MeshGraphError> {
    let raw = number_loops_raw(graph, kind, false)?;
    Ok(raw.seeds.iter().map(|&s| graph.id_at(s)).collect())
}

/// Seeds plus a per-half-edge loop number.
pub fn number_loops(
    graph: &mut HalfEdgeGraph,
    kind: LoopKind,
) -> Result<LoopNumbering, MeshGraphError> {
    let raw = number_loops_raw(graph, kind, true)?;
    let seeds = raw.seeds.iter().map(|&s| graph.id_at(s)).collect();
    let loop_index = raw
        .loop_of
        .iter()
        .enumerate()
        .filter(|&(_, &l)| l != NULL_INDEX)
        .map(|(i, &l)| (graph.id_at(i as u32), l as usize))
        .collect();
    Ok(LoopNumbering { seeds, loop_index })
}

pub(crate) fn number_loops_raw(
    graph: &mut HalfEdgeGraph,
    kind: LoopKind,
    with_back_map: bool,
) -> Result<RawNumbering, MeshGraphError> {
    let slots = graph.slot_count();
    let mut visit = graph.scoped_mask()?;
    let seen = visit.mask();
    let mut seeds = Vec::new();
    let mut loop_of = if with_back_map {
        vec![NULL_INDEX; slots]
    } else {
        Vec::new()
    };

    let live: Vec<u32> = visit.store.live_indices().collect();
    for i in live {
        if visit.has_mask_at(i, seen) {
            continue;
        }
        let number = seeds.len() as u32;
        seeds.push(i);
        let members: Vec<u32> = match kind {
            LoopKind::Face => visit.raw_loop(i, LoopStep::Face).collect(),
            LoopKind::Vertex => visit.raw_loop(i, LoopStep::Vertex).collect(),
            LoopKind::Edge => vec![i, visit.mate(i)],
        };
        for j in members {
            visit.set_mask_at(j, seen);
            if with_back_map {
                loop_of[j as usize] = number;
            }
        }
    }
    Ok(RawNumbering { seeds, loop_of })
}
