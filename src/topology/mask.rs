//! Node masks and the reservable mask pool.
//!
//! Every half-edge carries a 32-bit mask word. The low half holds predefined
//! flags with fixed meaning ([`Mask::EXTERIOR`], [`Mask::BOUNDARY`], ...).
//! The high half is a pool of scratch bits that algorithms borrow with
//! [`HalfEdgeGraph::grab_mask`] and give back with
//! [`HalfEdgeGraph::drop_mask`], or borrow for a lexical scope with
//! [`HalfEdgeGraph::scoped_mask`].
//!
//! The pool also keeps three accumulator words recording which grabbed bits
//! carry vertex, edge, or face semantics. Edits consult them: `split_edge`
//! copies edge/face bits onto the new half-edges.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Deref, DerefMut, Not};

use bytemuck::{Pod, Zeroable};

use crate::mesh_error::MeshGraphError;
use crate::topology::graph::{HalfEdgeGraph, LoopStep};
use crate::topology::node::HalfEdgeId;

/// A set of bits in a half-edge mask word.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Default, Pod, Zeroable, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct Mask(u32);

impl Mask {
    pub const NONE: Mask = Mask(0);
    /// Half-edge lies on the unbounded (outer) face.
    pub const EXTERIOR: Mask = Mask(1 << 0);
    /// Edge lies on a domain boundary.
    pub const BOUNDARY: Mask = Mask(1 << 1);
    /// Edge was present in the input, not introduced by an edit.
    pub const PRIMARY_EDGE: Mask = Mask(1 << 2);
    /// Half-edge points along its edge's preferred direction.
    pub const DIRECTED_EDGE: Mask = Mask(1 << 3);
    /// General purpose persistent visit flag.
    pub const VISITED: Mask = Mask(1 << 4);
    /// Vertex was present in the input.
    pub const PRIMARY_VERTEX: Mask = Mask(1 << 5);
    /// Bits handed out by the mask pool.
    pub const RESERVABLE: Mask = Mask(0xFFFF_0000);
    pub const ALL: Mask = Mask(u32::MAX);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Mask(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: Mask) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when `self` and `other` share at least one bit.
    #[inline]
    pub const fn intersects(self, other: Mask) -> bool {
        self.0 & other.0 != 0
    }

    /// Number of set bits.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask({:#010x})", self.0)
    }
}

impl BitOr for Mask {
    type Output = Mask;
    fn bitor(self, rhs: Mask) -> Mask {
        Mask(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mask {
    fn bitor_assign(&mut self, rhs: Mask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Mask {
    type Output = Mask;
    fn bitand(self, rhs: Mask) -> Mask {
        Mask(self.0 & rhs.0)
    }
}

impl BitAndAssign for Mask {
    fn bitand_assign(&mut self, rhs: Mask) {
        self.0 &= rhs.0;
    }
}

impl BitXor for Mask {
    type Output = Mask;
    fn bitxor(self, rhs: Mask) -> Mask {
        Mask(self.0 ^ rhs.0)
    }
}

impl Not for Mask {
    type Output = Mask;
    fn not(self) -> Mask {
        Mask(!self.0)
    }
}

/// Which topological entity a mask bit or a label value belongs to.
///
/// A vertex property is expected to be constant around each vertex loop, an
/// edge property on both halves of an edge, a face property around each face
/// loop. A sector property belongs to one corner, the wedge between a
/// half-edge and its vertex predecessor, so it may differ on every half-edge.
/// Classes combine with `|`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[repr(transparent)]
pub struct PropertyClass(u32);

impl PropertyClass {
    pub const NONE: PropertyClass = PropertyClass(0);
    pub const VERTEX: PropertyClass = PropertyClass(1);
    pub const EDGE: PropertyClass = PropertyClass(2);
    pub const FACE: PropertyClass = PropertyClass(4);
    pub const SECTOR: PropertyClass = PropertyClass(8);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        PropertyClass(bits & 15)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: PropertyClass) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn intersects(self, other: PropertyClass) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for PropertyClass {
    type Output = PropertyClass;
    fn bitor(self, rhs: PropertyClass) -> PropertyClass {
        PropertyClass(self.0 | rhs.0)
    }
}

impl fmt::Debug for PropertyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.contains(Self::VERTEX) {
            parts.push("VERTEX");
        }
        if self.contains(Self::EDGE) {
            parts.push("EDGE");
        }
        if self.contains(Self::FACE) {
            parts.push("FACE");
        }
        if self.contains(Self::SECTOR) {
            parts.push("SECTOR");
        }
        if parts.is_empty() {
            parts.push("NONE");
        }
        write!(f, "PropertyClass({})", parts.join(" | "))
    }
}

/// A mask bit reserved from the pool.
///
/// Not `Copy`: the capability is consumed by [`HalfEdgeGraph::drop_mask`].
/// Use [`GrabbedMask::mask`] to get the plain bit for node operations.
#[must_use = "a grabbed mask must be returned with `drop_mask`"]
#[derive(Debug, PartialEq, Eq)]
pub struct GrabbedMask {
    mask: Mask,
}

impl GrabbedMask {
    #[inline]
    pub fn mask(&self) -> Mask {
        self.mask
    }
}

/// Free bitmap plus property accumulators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MaskPool {
    free: Mask,
    edge: Mask,
    vertex: Mask,
    face: Mask,
}

impl Default for MaskPool {
    fn default() -> Self {
        Self {
            free: Mask::RESERVABLE,
            edge: Mask::NONE,
            vertex: Mask::NONE,
            face: Mask::NONE,
        }
    }
}

impl MaskPool {
    pub(crate) fn from_words(free: Mask, edge: Mask, vertex: Mask, face: Mask) -> Self {
        Self {
            free: free & Mask::RESERVABLE,
            edge,
            vertex,
            face,
        }
    }

    /// Reserve the lowest free bit.
    pub(crate) fn grab(&mut self, property: PropertyClass) -> Option<Mask> {
        if self.free.is_empty() {
            return None;
        }
        let bit = Mask(1 << self.free.0.trailing_zeros());
        self.free &= !bit;
        if property.contains(PropertyClass::VERTEX) {
            self.vertex |= bit;
        }
        if property.contains(PropertyClass::EDGE) {
            self.edge |= bit;
        }
        if property.contains(PropertyClass::FACE) {
            self.face |= bit;
        }
        Some(bit)
    }

    pub(crate) fn release(&mut self, mask: Mask) {
        self.free |= mask & Mask::RESERVABLE;
        self.vertex &= !mask;
        self.edge &= !mask;
        self.face &= !mask;
    }

    pub(crate) fn free(&self) -> Mask {
        self.free
    }
    pub(crate) fn edge(&self) -> Mask {
        self.edge
    }
    pub(crate) fn vertex(&self) -> Mask {
        self.vertex
    }
    pub(crate) fn face(&self) -> Mask {
        self.face
    }
}

/// A pool bit held for the lifetime of this guard.
///
/// Dereferences to the graph, so the guarded graph stays fully usable. On
/// drop, on every exit path, the bit is cleared from all nodes and handed
/// back to the pool. Guards nest: grab the second one from the first.
///
/// ```
/// # use halfedge_topo::prelude::*;
/// # fn demo(graph: &mut HalfEdgeGraph) -> Result<(), MeshGraphError> {
/// let mut visit = graph.scoped_mask()?;
/// let visit_bit = visit.mask();
/// let mut collect = visit.scoped_mask()?;
/// assert_ne!(visit_bit, collect.mask());
/// # Ok(()) }
/// ```
pub struct ScopedMask<'a> {
    graph: &'a mut HalfEdgeGraph,
    mask: Mask,
}

impl<'a> ScopedMask<'a> {
    #[inline]
    pub fn mask(&self) -> Mask {
        self.mask
    }
}

impl Deref for ScopedMask<'_> {
    type Target = HalfEdgeGraph;
    fn deref(&self) -> &HalfEdgeGraph {
        self.graph
    }
}

impl DerefMut for ScopedMask<'_> {
    fn deref_mut(&mut self) -> &mut HalfEdgeGraph {
        self.graph
    }
}

impl Drop for ScopedMask<'_> {
    fn drop(&mut self) {
        self.graph.clear_mask_all(self.mask);
        self.graph.pool.release(self.mask);
        log::trace!("scoped mask {:?} returned to pool", self.mask);
    }
}

impl HalfEdgeGraph {
    // ----- pool ------------------------------------------------------------

    /// Reserve the lowest free pool bit with no property semantics.
    pub fn grab_mask(&mut self) -> Result<GrabbedMask, MeshGraphError> {
        self.grab_mask_with(PropertyClass::NONE)
    }

    /// Reserve the lowest free pool bit and record its property semantics.
    pub fn grab_mask_with(
        &mut self,
        property: PropertyClass,
    ) -> Result<GrabbedMask, MeshGraphError> {
        match self.pool.grab(property) {
            Some(mask) => {
                log::trace!("grabbed mask {mask:?} as {property:?}");
                Ok(GrabbedMask { mask })
            }
            None => {
                log::warn!("mask pool exhausted");
                Err(MeshGraphError::MaskPoolExhausted)
            }
        }
    }

    /// Return a grabbed bit to the pool.
    ///
    /// The bit is removed from the property accumulators but left untouched
    /// on the nodes; clear it first if later borrowers need it zeroed.
    pub fn drop_mask(&mut self, grabbed: GrabbedMask) {
        log::trace!("dropped mask {:?}", grabbed.mask);
        self.pool.release(grabbed.mask);
    }

    /// Grab a bit for the current scope. See [`ScopedMask`].
    pub fn scoped_mask(&mut self) -> Result<ScopedMask<'_>, MeshGraphError> {
        self.scoped_mask_with(PropertyClass::NONE)
    }

    pub fn scoped_mask_with(
        &mut self,
        property: PropertyClass,
    ) -> Result<ScopedMask<'_>, MeshGraphError> {
        let mask = self.grab_mask_with(property)?.mask;
        Ok(ScopedMask { graph: self, mask })
    }

    /// Number of pool bits currently available.
    pub fn free_mask_count(&self) -> u32 {
        self.pool.free().count()
    }

    /// Grabbed bits carrying edge semantics.
    pub fn edge_property_masks(&self) -> Mask {
        self.pool.edge()
    }

    /// Grabbed bits carrying vertex semantics.
    pub fn vertex_property_masks(&self) -> Mask {
        self.pool.vertex()
    }

    /// Grabbed bits carrying face semantics.
    pub fn face_property_masks(&self) -> Mask {
        self.pool.face()
    }

    // ----- single node -----------------------------------------------------

    /// Bits of `mask` that are set at `id`.
    pub fn get_mask(&self, id: HalfEdgeId, mask: Mask) -> Result<Mask, MeshGraphError> {
        let i = self.resolve(id)?;
        Ok(self.mask_at(i) & mask)
    }

    /// True when any bit of `mask` is set at `id`; false for invalid ids.
    pub fn has_mask(&self, id: HalfEdgeId, mask: Mask) -> bool {
        self.resolve(id)
            .map(|i| self.mask_at(i).intersects(mask))
            .unwrap_or(false)
    }

    pub fn set_mask(&mut self, id: HalfEdgeId, mask: Mask) -> Result<(), MeshGraphError> {
        let i = self.resolve(id)?;
        self.store.node_mut(i).mask |= mask;
        Ok(())
    }

    pub fn clear_mask(&mut self, id: HalfEdgeId, mask: Mask) -> Result<(), MeshGraphError> {
        let i = self.resolve(id)?;
        self.store.node_mut(i).mask &= !mask;
        Ok(())
    }

    /// Set or clear `mask` at `id` according to `on`.
    pub fn write_mask(
        &mut self,
        id: HalfEdgeId,
        mask: Mask,
        on: bool,
    ) -> Result<(), MeshGraphError> {
        if on {
            self.set_mask(id, mask)
        } else {
            self.clear_mask(id, mask)
        }
    }

    // ----- loop sweeps -----------------------------------------------------

    pub fn set_mask_around_face(
        &mut self,
        id: HalfEdgeId,
        mask: Mask,
    ) -> Result<(), MeshGraphError> {
        let i = self.resolve(id)?;
        self.sweep_mask(i, LoopStep::Face, mask, true);
        Ok(())
    }

    pub fn clear_mask_around_face(
        &mut self,
        id: HalfEdgeId,
        mask: Mask,
    ) -> Result<(), MeshGraphError> {
        let i = self.resolve(id)?;
        self.sweep_mask(i, LoopStep::Face, mask, false);
        Ok(())
    }

    pub fn set_mask_around_vertex(
        &mut self,
        id: HalfEdgeId,
        mask: Mask,
    ) -> Result<(), MeshGraphError> {
        let i = self.resolve(id)?;
        self.sweep_mask(i, LoopStep::Vertex, mask, true);
        Ok(())
    }

    pub fn clear_mask_around_vertex(
        &mut self,
        id: HalfEdgeId,
        mask: Mask,
    ) -> Result<(), MeshGraphError> {
        let i = self.resolve(id)?;
        self.sweep_mask(i, LoopStep::Vertex, mask, false);
        Ok(())
    }

    /// Set `mask` on `id` and its edge mate.
    pub fn set_mask_around_edge(
        &mut self,
        id: HalfEdgeId,
        mask: Mask,
    ) -> Result<(), MeshGraphError> {
        let i = self.resolve(id)?;
        let m = self.mate(i);
        self.store.node_mut(i).mask |= mask;
        self.store.node_mut(m).mask |= mask;
        Ok(())
    }

    pub fn clear_mask_around_edge(
        &mut self,
        id: HalfEdgeId,
        mask: Mask,
    ) -> Result<(), MeshGraphError> {
        let i = self.resolve(id)?;
        let m = self.mate(i);
        self.store.node_mut(i).mask &= !mask;
        self.store.node_mut(m).mask &= !mask;
        Ok(())
    }

    // ----- whole graph -----------------------------------------------------

    pub fn set_mask_all(&mut self, mask: Mask) {
        for node in self.store.live_nodes_mut() {
            node.mask |= mask;
        }
    }

    pub fn clear_mask_all(&mut self, mask: Mask) {
        for node in self.store.live_nodes_mut() {
            node.mask &= !mask;
        }
    }

    pub fn toggle_mask_all(&mut self, mask: Mask) {
        for node in self.store.live_nodes_mut() {
            node.mask = node.mask ^ mask;
        }
    }

    // ----- search and count ------------------------------------------------

    /// First half-edge around the face of `id` (starting at `id`) with any
    /// bit of `mask` set.
    pub fn find_masked_around_face(&self, id: HalfEdgeId, mask: Mask) -> Option<HalfEdgeId> {
        self.find_in_loop(id, LoopStep::Face, |m| m.intersects(mask))
    }

    pub fn find_masked_around_vertex(&self, id: HalfEdgeId, mask: Mask) -> Option<HalfEdgeId> {
        self.find_in_loop(id, LoopStep::Vertex, |m| m.intersects(mask))
    }

    /// First half-edge around the face of `id` with no bit of `mask` set.
    pub fn find_unmasked_around_face(&self, id: HalfEdgeId, mask: Mask) -> Option<HalfEdgeId> {
        self.find_in_loop(id, LoopStep::Face, |m| !m.intersects(mask))
    }

    pub fn find_unmasked_around_vertex(
        &self,
        id: HalfEdgeId,
        mask: Mask,
    ) -> Option<HalfEdgeId> {
        self.find_in_loop(id, LoopStep::Vertex, |m| !m.intersects(mask))
    }

    pub fn count_masked_around_face(&self, id: HalfEdgeId, mask: Mask) -> usize {
        self.count_in_loop(id, LoopStep::Face, mask)
    }

    pub fn count_masked_around_vertex(&self, id: HalfEdgeId, mask: Mask) -> usize {
        self.count_in_loop(id, LoopStep::Vertex, mask)
    }

    /// Number of live half-edges with any bit of `mask` set.
    pub fn count_masked_in_graph(&self, mask: Mask) -> usize {
        self.store
            .live_indices()
            .filter(|&i| self.mask_at(i).intersects(mask))
            .count()
    }

    // ----- crate helpers ---------------------------------------------------

    #[inline]
    pub(crate) fn mask_at(&self, i: u32) -> Mask {
        self.store.node(i).mask
    }

    #[inline]
    pub(crate) fn has_mask_at(&self, i: u32, mask: Mask) -> bool {
        self.store.node(i).mask.intersects(mask)
    }

    #[inline]
    pub(crate) fn set_mask_at(&mut self, i: u32, mask: Mask) {
        self.store.node_mut(i).mask |= mask;
    }

    pub(crate) fn sweep_mask(&mut self, start: u32, step: LoopStep, mask: Mask, on: bool) {
        let ring: Vec<u32> = self.raw_loop(start, step).collect();
        for i in ring {
            let node = self.store.node_mut(i);
            if on {
                node.mask |= mask;
            } else {
                node.mask &= !mask;
            }
        }
    }

    fn find_in_loop(
        &self,
        id: HalfEdgeId,
        step: LoopStep,
        pred: impl Fn(Mask) -> bool,
    ) -> Option<HalfEdgeId> {
        let start = self.resolve(id).ok()?;
        self.raw_loop(start, step)
            .find(|&i| pred(self.mask_at(i)))
            .map(|i| self.id_at(i))
    }

    fn count_in_loop(&self, id: HalfEdgeId, step: LoopStep, mask: Mask) -> usize {
        match self.resolve(id) {
            Ok(start) => self
                .raw_loop(start, step)
                .filter(|&i| self.mask_at(i).intersects(mask))
                .count(),
            Err(_) => 0,
        }
    }
}
