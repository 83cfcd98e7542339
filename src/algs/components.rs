//! Connected components by explicit-stack flood fill.
//!
//! Traversal works one vertex loop at a time: reaching any half-edge of a
//! vertex marks the whole loop with the *visit* mask, then every half-edge
//! `j` of the loop may cross to the next vertex through `f_succ(j)`. What a
//! component reports is controlled separately by [`ComponentScope`] through
//! an independent *collect* mask, so a face is reported once even though the
//! fill reaches every half-edge on it.

use crate::mesh_error::MeshGraphError;
use crate::topology::graph::{HalfEdgeGraph, LoopStep};
use crate::topology::mask::Mask;
use crate::topology::node::HalfEdgeId;

/// What each component lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentScope {
    /// Every half-edge.
    Node,
    /// One half-edge per edge.
    Edge,
    /// One half-edge per face loop.
    Face,
    /// One half-edge per vertex loop.
    Vertex,
    /// Only the half-edge the fill started from.
    Component,
}

/// Builder for a component search.
///
/// ```
/// # use halfedge_topo::prelude::*;
/// # fn demo(graph: &mut HalfEdgeGraph) -> Result<(), MeshGraphError> {
/// let faces = ComponentSearch::new(graph)
///     .scope(ComponentScope::Face)
///     .edge_mask(Some(Mask::BOUNDARY))
///     .directed(false)
///     .run()?;
/// # Ok(()) }
/// ```
pub struct ComponentSearch<'a> {
    graph: &'a mut HalfEdgeGraph,
    scope: ComponentScope,
    edge_mask: Option<Mask>,
    directed: bool,
    seeds: Vec<HalfEdgeId>,
}

impl<'a> ComponentSearch<'a> {
    pub fn new(graph: &'a mut HalfEdgeGraph) -> Self {
        Self {
            graph,
            scope: ComponentScope::Node,
            edge_mask: None,
            directed: false,
            seeds: Vec::new(),
        }
    }

    pub fn scope(mut self, scope: ComponentScope) -> Self {
        self.scope = scope;
        self
    }

    /// Only cross edges carrying this mask.
    pub fn edge_mask(mut self, mask: Option<Mask>) -> Self {
        self.edge_mask = mask;
        self
    }

    /// With an edge mask, require it on the half-edge being followed rather
    /// than on either half of the edge.
    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Start fills only from these half-edges. Without seeds every live
    /// half-edge is a candidate start, in slot order.
    pub fn seeds<I: IntoIterator<Item = HalfEdgeId>>(mut self, it: I) -> Self {
        self.seeds = it.into_iter().collect();
        self
    }

    pub fn run(self) -> Result<Vec<Vec<HalfEdgeId>>, MeshGraphError> {
        let ComponentSearch {
            graph,
            scope,
            edge_mask,
            directed,
            seeds,
        } = self;

        let starts: Vec<u32> = if seeds.is_empty() {
            graph.store.live_indices().collect()
        } else {
            seeds
                .iter()
                .map(|&s| graph.resolve(s))
                .collect::<Result<_, _>>()?
        };

        let mut visit = graph.scoped_mask()?;
        let visited = visit.mask();
        let mut collect = visit.scoped_mask()?;
        let collected = collect.mask();

        let crossable = |g: &HalfEdgeGraph, j: u32| match edge_mask {
            None => true,
            Some(m) if directed => g.has_mask_at(j, m),
            Some(m) => g.has_mask_at(j, m) || g.has_mask_at(g.mate(j), m),
        };

        let mut components = Vec::new();
        let mut stack = Vec::new();
        for s in starts {
            if collect.has_mask_at(s, visited) {
                continue;
            }
            let mut members = Vec::new();
            if scope == ComponentScope::Component {
                members.push(collect.id_at(s));
            }
            collect.sweep_mask(s, LoopStep::Vertex, visited, true);
            stack.push(s);

            while let Some(v) = stack.pop() {
                if scope == ComponentScope::Vertex {
                    members.push(collect.id_at(v));
                }
                let ring: Vec<u32> = collect.raw_loop(v, LoopStep::Vertex).collect();
                for j in ring {
                    match scope {
                        ComponentScope::Node => members.push(collect.id_at(j)),
                        ComponentScope::Edge if !collect.has_mask_at(j, collected) => {
                            let m = collect.mate(j);
                            collect.set_mask_at(j, collected);
                            collect.set_mask_at(m, collected);
                            members.push(collect.id_at(j));
                        }
                        ComponentScope::Face if !collect.has_mask_at(j, collected) => {
                            collect.sweep_mask(j, LoopStep::Face, collected, true);
                            members.push(collect.id_at(j));
                        }
                        _ => {}
                    }
                    if !crossable(&collect, j) {
                        continue;
                    }
                    let w = collect.fs(j);
                    if !collect.has_mask_at(w, visited) {
                        collect.sweep_mask(w, LoopStep::Vertex, visited, true);
                        stack.push(w);
                    }
                }
            }
            components.push(members);
        }
        Ok(components)
    }
}

/// All components of the graph at the given scope.
pub fn connected_components(
    graph: &mut HalfEdgeGraph,
    scope: ComponentScope,
) -> Result<Vec<Vec<HalfEdgeId>>, MeshGraphError> {
    ComponentSearch::new(graph).scope(scope).run()
}
