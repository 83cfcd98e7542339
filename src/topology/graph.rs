//! `HalfEdgeGraph`: the rotation-system graph and its navigation operators.
//!
//! Each half-edge stores two links:
//! - `f_succ`: the next half-edge counter-clockwise around the same face,
//! - `v_succ`: the next half-edge around the same vertex.
//!
//! Every other relation is derived from these two:
//!
//! | relation | formula |
//! |---|---|
//! | `edge_mate(n)` | `v_succ(f_succ(n))` |
//! | `v_pred(n)` | `f_succ(v_succ(f_succ(n)))` |
//! | `f_pred(n)` | `v_succ(f_succ(v_succ(n)))` |
//!
//! Both links are permutations of the live ids and `edge_mate` is a
//! fixed-point-free involution. [`HalfEdgeGraph::vertex_twist`] is the only
//! operation that rewires existing half-edges; it preserves `edge_mate`.
//! The composite edits (`split_edge`, `join`, `drop_edge`, ...) live in
//! [`crate::topology::edit`].

use crate::debug_invariants::debug_invariants;
use crate::mesh_error::MeshGraphError;
use crate::topology::labels::LabelTable;
use crate::topology::mask::MaskPool;
use crate::topology::node::HalfEdgeId;
use crate::topology::store::NodeStore;

/// Construction options for [`HalfEdgeGraph`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Node slots reserved up front.
    pub initial_capacity: usize,
    /// Upper bound on `define_label` calls.
    pub max_labels: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_labels: 32,
        }
    }
}

/// Which successor link a loop walk follows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LoopStep {
    Face,
    Vertex,
}

/// Half-edge graph with node masks and labels.
#[derive(Clone, Debug)]
pub struct HalfEdgeGraph {
    pub(crate) store: NodeStore,
    pub(crate) labels: LabelTable,
    pub(crate) pool: MaskPool,
    config: GraphConfig,
}

impl Default for HalfEdgeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl HalfEdgeGraph {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            store: NodeStore::with_capacity(config.initial_capacity),
            labels: LabelTable::new(config.max_labels),
            pool: MaskPool::default(),
            config,
        }
    }

    pub(crate) fn from_raw_parts(
        store: NodeStore,
        labels: LabelTable,
        pool: MaskPool,
        config: GraphConfig,
    ) -> Self {
        Self {
            store,
            labels,
            pool,
            config,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Number of live half-edges (always even).
    pub fn active_count(&self) -> usize {
        self.store.active()
    }

    /// Number of released slots waiting on the free list.
    pub fn free_count(&self) -> usize {
        self.store.free()
    }

    /// Number of slots ever allocated.
    pub fn slot_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.active() == 0
    }

    /// False for out-of-range, released, and stale ids.
    pub fn is_valid(&self, id: HalfEdgeId) -> bool {
        self.resolve(id).is_ok()
    }

    // ----- navigation ------------------------------------------------------

    pub fn f_succ(&self, id: HalfEdgeId) -> Result<HalfEdgeId, MeshGraphError> {
        let i = self.resolve(id)?;
        Ok(self.id_at(self.fs(i)))
    }

    pub fn v_succ(&self, id: HalfEdgeId) -> Result<HalfEdgeId, MeshGraphError> {
        let i = self.resolve(id)?;
        Ok(self.id_at(self.vs(i)))
    }

    /// The other half of the edge at `id`.
    pub fn edge_mate(&self, id: HalfEdgeId) -> Result<HalfEdgeId, MeshGraphError> {
        let i = self.resolve(id)?;
        Ok(self.id_at(self.mate(i)))
    }

    /// Predecessor of `id` around its face.
    pub fn f_pred(&self, id: HalfEdgeId) -> Result<HalfEdgeId, MeshGraphError> {
        let i = self.resolve(id)?;
        Ok(self.id_at(self.fp(i)))
    }

    /// Predecessor of `id` around its vertex.
    pub fn v_pred(&self, id: HalfEdgeId) -> Result<HalfEdgeId, MeshGraphError> {
        let i = self.resolve(id)?;
        Ok(self.id_at(self.vp(i)))
    }

    pub fn count_around_face(&self, id: HalfEdgeId) -> Result<usize, MeshGraphError> {
        let i = self.resolve(id)?;
        Ok(self.raw_loop(i, LoopStep::Face).count())
    }

    pub fn count_around_vertex(&self, id: HalfEdgeId) -> Result<usize, MeshGraphError> {
        let i = self.resolve(id)?;
        Ok(self.raw_loop(i, LoopStep::Vertex).count())
    }

    /// True when `a` and `b` are in the same face loop.
    pub fn same_face(&self, a: HalfEdgeId, b: HalfEdgeId) -> Result<bool, MeshGraphError> {
        let (a, b) = (self.resolve(a)?, self.resolve(b)?);
        Ok(self.raw_loop(a, LoopStep::Face).any(|i| i == b))
    }

    /// True when `a` and `b` are in the same vertex loop.
    pub fn same_vertex(&self, a: HalfEdgeId, b: HalfEdgeId) -> Result<bool, MeshGraphError> {
        let (a, b) = (self.resolve(a)?, self.resolve(b)?);
        Ok(self.raw_loop(a, LoopStep::Vertex).any(|i| i == b))
    }

    // ----- iteration -------------------------------------------------------

    /// All live half-edges in slot order.
    pub fn active_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.store.live_indices().map(|i| self.id_at(i))
    }

    /// The face loop of `id`, starting at `id`.
    pub fn face_loop(&self, id: HalfEdgeId) -> Result<LoopIter<'_>, MeshGraphError> {
        let i = self.resolve(id)?;
        Ok(LoopIter {
            inner: self.raw_loop(i, LoopStep::Face),
        })
    }

    /// The vertex loop of `id`, starting at `id`.
    pub fn vertex_loop(&self, id: HalfEdgeId) -> Result<LoopIter<'_>, MeshGraphError> {
        let i = self.resolve(id)?;
        Ok(LoopIter {
            inner: self.raw_loop(i, LoopStep::Vertex),
        })
    }

    // ----- primitive edits -------------------------------------------------

    /// New dangling edge `(a, b)`: each half alone at its own vertex, both on
    /// one two-sided face.
    pub fn create_edge(&mut self) -> Result<(HalfEdgeId, HalfEdgeId), MeshGraphError> {
        let (a, b) = self.allocate_pair()?;
        self.store.node_mut(a).f_succ = b;
        self.store.node_mut(b).f_succ = a;
        debug_invariants!(&*self);
        Ok((self.id_at(a), self.id_at(b)))
    }

    /// New self-loop `(a, b)`: both halves at one vertex, each bounding its
    /// own one-sided face.
    pub fn create_self_loop(&mut self) -> Result<(HalfEdgeId, HalfEdgeId), MeshGraphError> {
        let (a, b) = self.allocate_pair()?;
        self.store.node_mut(a).v_succ = b;
        self.store.node_mut(b).v_succ = a;
        debug_invariants!(&*self);
        Ok((self.id_at(a), self.id_at(b)))
    }

    /// Exchange the vertex successors of `a` and `b` together with the face
    /// successors of their face predecessors.
    ///
    /// Merges the vertex loops of `a` and `b` when they differ, splits the
    /// shared loop otherwise. Applying the same twist twice is the identity.
    pub fn vertex_twist(&mut self, a: HalfEdgeId, b: HalfEdgeId) -> Result<(), MeshGraphError> {
        let (Ok(ai), Ok(bi)) = (self.resolve(a), self.resolve(b)) else {
            return Err(MeshGraphError::MalformedTwist { a, b });
        };
        if ai == bi {
            return Err(MeshGraphError::MalformedTwist { a, b });
        }
        self.twist(ai, bi);
        debug_invariants!(&*self);
        Ok(())
    }

    // ----- crate helpers ---------------------------------------------------

    /// Map a handle to its slot, checking range, liveness and generation.
    #[inline]
    pub(crate) fn resolve(&self, id: HalfEdgeId) -> Result<u32, MeshGraphError> {
        let i = id.raw();
        match self.store.nodes().get(i as usize) {
            Some(n) if !n.is_deleted() && n.generation == id.generation() => Ok(i),
            _ => Err(MeshGraphError::InvalidId(id)),
        }
    }

    #[inline]
    pub(crate) fn id_at(&self, i: u32) -> HalfEdgeId {
        HalfEdgeId::from_parts(i, self.store.node(i).generation)
    }

    #[inline]
    pub(crate) fn fs(&self, i: u32) -> u32 {
        self.store.node(i).f_succ
    }

    #[inline]
    pub(crate) fn vs(&self, i: u32) -> u32 {
        self.store.node(i).v_succ
    }

    #[inline]
    pub(crate) fn mate(&self, i: u32) -> u32 {
        self.vs(self.fs(i))
    }

    #[inline]
    pub(crate) fn fp(&self, i: u32) -> u32 {
        self.vs(self.fs(self.vs(i)))
    }

    #[inline]
    pub(crate) fn vp(&self, i: u32) -> u32 {
        self.fs(self.vs(self.fs(i)))
    }

    pub(crate) fn raw_loop(&self, start: u32, step: LoopStep) -> RawLoop<'_> {
        RawLoop {
            graph: self,
            start,
            next: Some(start),
            step,
            budget: self.store.len(),
        }
    }

    /// Unchecked twist on live, distinct slots.
    pub(crate) fn twist(&mut self, a: u32, b: u32) {
        let ap = self.fp(a);
        let bp = self.fp(b);
        let (va, vb) = (self.vs(a), self.vs(b));
        self.store.node_mut(a).v_succ = vb;
        self.store.node_mut(b).v_succ = va;
        let (fa, fb) = (self.fs(ap), self.fs(bp));
        self.store.node_mut(ap).f_succ = fb;
        self.store.node_mut(bp).f_succ = fa;
    }

    /// Allocate a pair and bring its label values back to their defaults.
    pub(crate) fn allocate_pair(&mut self) -> Result<(u32, u32), MeshGraphError> {
        let (a, b, grew) = self.store.allocate_pair()?;
        if grew {
            self.labels.grow(self.store.len());
        } else {
            self.labels.reset_slot(a);
            self.labels.reset_slot(b);
        }
        Ok((a, b))
    }

    pub(crate) fn release_pair(&mut self, a: u32, b: u32) {
        self.labels.reset_slot(a);
        self.labels.reset_slot(b);
        self.store.release_pair(a, b);
    }
}

/// Slot walk around one face or vertex loop.
///
/// The walk stops after at most `slot_count` steps so a corrupted link table
/// cannot make it spin forever.
pub(crate) struct RawLoop<'a> {
    graph: &'a HalfEdgeGraph,
    start: u32,
    next: Option<u32>,
    step: LoopStep,
    budget: usize,
}

impl Iterator for RawLoop<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let cur = self.next?;
        if self.budget == 0 {
            self.next = None;
            return None;
        }
        self.budget -= 1;
        let succ = match self.step {
            LoopStep::Face => self.graph.fs(cur),
            LoopStep::Vertex => self.graph.vs(cur),
        };
        self.next = (succ != self.start).then_some(succ);
        Some(cur)
    }
}

/// Iterator over the half-edges of one face or vertex loop.
pub struct LoopIter<'a> {
    inner: RawLoop<'a>,
}

impl Iterator for LoopIter<'_> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<HalfEdgeId> {
        let i = self.inner.next()?;
        Some(self.inner.graph.id_at(i))
    }
}
