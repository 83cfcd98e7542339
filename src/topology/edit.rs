//! Composite edits built from allocation plus `vertex_twist`.
//!
//! Every edit validates its input before touching the graph. `heal_edge` is
//! the one edit that can only decide after twisting; when its post-check
//! fails it applies the same twists again (twists are involutions) before
//! reporting `MalformedHeal`, so a failed edit leaves the graph unchanged.

use crate::debug_invariants::debug_invariants;
use crate::mesh_error::MeshGraphError;
use crate::topology::graph::HalfEdgeGraph;
use crate::topology::mask::{Mask, PropertyClass};
use crate::topology::node::HalfEdgeId;

/// Predefined flags that describe an edge or one of its faces.
const EDGE_FACE_FLAGS: Mask = Mask::from_bits(
    Mask::EXTERIOR.bits()
        | Mask::BOUNDARY.bits()
        | Mask::PRIMARY_EDGE.bits()
        | Mask::DIRECTED_EDGE.bits(),
);

impl HalfEdgeGraph {
    /// Insert a vertex in the middle of the edge at `e`.
    ///
    /// Returns `(after_e, after_mate)`: the new half-edge that follows `e`
    /// around `e`'s face, and its mate, which precedes `edge_mate(e)` around
    /// the mate's face. Each inherits the edge- and face-class labels and
    /// masks of the original half-edge on its side. Sector-class labels of
    /// the two new corners start at their defaults. The new vertex holds
    /// `after_e` and `edge_mate(e)`.
    pub fn split_edge(
        &mut self,
        e: HalfEdgeId,
    ) -> Result<(HalfEdgeId, HalfEdgeId), MeshGraphError> {
        let ei = self.resolve(e)?;
        let mi = self.mate(ei);
        let (a, b) = self.allocate_pair()?;
        self.store.node_mut(a).v_succ = b;
        self.store.node_mut(b).v_succ = a;

        self.twist(mi, a);
        let e_next = self.fs(ei);
        self.twist(e_next, b);

        let inherited = self.pool.edge() | self.pool.face() | EDGE_FACE_FLAGS;
        let class = PropertyClass::EDGE | PropertyClass::FACE;
        for (from, to) in [(ei, b), (mi, a)] {
            self.labels.copy_where(from, to, class);
            let bits = self.mask_at(from) & inherited;
            self.set_mask_at(to, bits);
        }

        log::debug!("split_edge {e}: inserted {} / {}", self.id_at(b), self.id_at(a));
        debug_invariants!(&*self);
        Ok((self.id_at(b), self.id_at(a)))
    }

    /// Remove the two-edge vertex at `n` together with the edge leaving it
    /// through `n`; the other edge at that vertex is stretched over the gap.
    ///
    /// Undoes [`split_edge`](Self::split_edge) when called on either
    /// returned half-edge's side of the new vertex: `heal_edge(after_e)`
    /// restores the original links.
    pub fn heal_edge(&mut self, n: HalfEdgeId) -> Result<(), MeshGraphError> {
        let ni = self.resolve(n)?;
        let p = self.vs(ni);
        if p == ni || self.vs(p) != ni {
            return Err(MeshGraphError::MalformedHeal(n));
        }
        let a = self.mate(ni);
        let n_next = self.fs(ni);
        if a == p || n_next == ni {
            return Err(MeshGraphError::MalformedHeal(n));
        }

        self.twist(n_next, ni);
        self.twist(p, a);

        let isolated = self.vs(ni) == a
            && self.vs(a) == ni
            && self.fs(ni) == ni
            && self.fs(a) == a;
        if !isolated {
            self.twist(p, a);
            self.twist(n_next, ni);
            return Err(MeshGraphError::MalformedHeal(n));
        }

        self.release_pair(ni, a);
        log::debug!("heal_edge {n}");
        debug_invariants!(&*self);
        Ok(())
    }

    /// Create an edge from the vertex of `a` to the vertex of `b`.
    ///
    /// Returns `(at_a, at_b)`. `at_a` leaves `a`'s vertex and gets
    /// `mask_a` plus `a`'s vertex- and sector-class labels; likewise for
    /// `at_b`. The new edge cuts the corner at `a` in two and both halves
    /// keep its sector values.
    /// `f_succ(at_a) == b` and `f_succ(at_b) == a`.
    pub fn join(
        &mut self,
        a: HalfEdgeId,
        b: HalfEdgeId,
        mask_a: Mask,
        mask_b: Mask,
    ) -> Result<(HalfEdgeId, HalfEdgeId), MeshGraphError> {
        let ai = self.resolve(a)?;
        let bi = self.resolve(b)?;
        let (na, nb) = self.allocate_pair()?;
        self.store.node_mut(na).f_succ = nb;
        self.store.node_mut(nb).f_succ = na;

        self.twist(na, ai);
        self.twist(nb, bi);

        self.set_mask_at(na, mask_a);
        self.set_mask_at(nb, mask_b);
        let class = PropertyClass::VERTEX | PropertyClass::SECTOR;
        self.labels.copy_where(ai, na, class);
        self.labels.copy_where(bi, nb, class);

        log::debug!("join {a} -> {b}: new edge {} / {}", self.id_at(na), self.id_at(nb));
        debug_invariants!(&*self);
        Ok((self.id_at(na), self.id_at(nb)))
    }

    /// Detach both ends of the edge at `n` and release it.
    pub fn drop_edge(&mut self, n: HalfEdgeId) -> Result<(), MeshGraphError> {
        let ni = self.resolve(n)?;
        self.remove_edge(ni);
        log::debug!("drop_edge {n}");
        debug_invariants!(&*self);
        Ok(())
    }

    /// Pull `n` out of its vertex loop so it sits alone at a fresh vertex.
    ///
    /// Returns the vertex predecessor `n` was twisted against, which remains
    /// at the old vertex, or `None` when `n` was already alone.
    pub fn yank_edge_from_vertex(
        &mut self,
        n: HalfEdgeId,
    ) -> Result<Option<HalfEdgeId>, MeshGraphError> {
        let ni = self.resolve(n)?;
        let p = self.detach(ni);
        debug_invariants!(&*self);
        Ok(p.map(|p| self.id_at(p)))
    }

    /// Remove the two-sided face at `n`.
    ///
    /// The face must consist of exactly `n` and `q = f_succ(n)` and the two
    /// must belong to different edges. Both are released; their mates become
    /// mates of each other.
    pub fn excise_sliver_face(&mut self, n: HalfEdgeId) -> Result<(), MeshGraphError> {
        let ni = self.resolve(n)?;
        let q = self.fs(ni);
        if q == ni || self.fs(q) != ni || q == self.mate(ni) {
            return Err(MeshGraphError::MalformedExcise(n));
        }
        let n_prev = self.vp(ni);
        let q_prev = self.vp(q);
        let (n_next, q_next) = (self.vs(ni), self.vs(q));
        self.store.node_mut(n_prev).v_succ = n_next;
        self.store.node_mut(q_prev).v_succ = q_next;
        self.release_pair(ni, q);

        log::debug!("excise_sliver_face {n}");
        debug_invariants!(&*self);
        Ok(())
    }

    /// Unchecked `drop_edge` on a live slot.
    pub(crate) fn remove_edge(&mut self, i: u32) {
        let m = self.mate(i);
        self.detach(i);
        self.detach(m);
        self.release_pair(i, m);
    }

    /// Twist `i` against its vertex predecessor unless it is already alone.
    fn detach(&mut self, i: u32) -> Option<u32> {
        if self.vs(i) == i {
            return None;
        }
        let p = self.vp(i);
        self.twist(i, p);
        Some(p)
    }
}
