//! `HalfEdgeId`: a generation-checked handle for half-edge slots
//!
//! Every half-edge lives in a slot of the node arena. Slots never move, but a
//! slot is recycled once its edge is dropped. `HalfEdgeId` pairs the slot
//! index with the slot's generation at the time the id was handed out, so a
//! handle kept across a `drop_edge` is detected as stale instead of silently
//! aliasing whatever edge reuses the slot.
//!
//! This module provides:
//! - The public `HalfEdgeId` handle (opaque, comparison-only).
//! - The crate-private `Node` record stored in the arena.
//! - Sentinels used by the raw link fields.

use std::fmt;

use crate::topology::mask::Mask;

/// `v_succ` value of a slot that sits on the free list.
pub(crate) const DELETED: u32 = u32::MAX;

/// Raw "no node" link (end of free list).
pub(crate) const NULL_INDEX: u32 = u32::MAX;

/// Opaque handle to one directed side of an edge.
///
/// Ids compare and hash by `(index, generation)`. They carry no arithmetic
/// meaning; use the graph's navigation operators to move between half-edges.
///
/// # Memory layout
/// Two `u32` fields, the same size as a `u64`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct HalfEdgeId {
    index: u32,
    generation: u32,
}

impl HalfEdgeId {
    /// Rebuilds a handle from its raw parts.
    ///
    /// Intended for callers that persisted ids next to a flat graph buffer.
    /// The graph rejects the handle if the slot is out of range, free, or has
    /// moved to another generation.
    #[inline]
    pub const fn from_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index of this half-edge.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Generation of the slot when this handle was issued.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    #[inline]
    pub(crate) const fn raw(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for HalfEdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HalfEdgeId")
            .field(&self.index)
            .field(&self.generation)
            .finish()
    }
}

/// Prints `index@generation`.
impl fmt::Display for HalfEdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.index, self.generation)
    }
}

/// One arena slot: two stored links plus the mask word.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Node {
    pub f_succ: u32,
    pub v_succ: u32,
    pub mask: Mask,
    pub generation: u32,
}

impl Node {
    pub(crate) const fn fresh(index: u32) -> Self {
        Self {
            f_succ: index,
            v_succ: index,
            mask: Mask::NONE,
            generation: 0,
        }
    }

    #[inline]
    pub(crate) const fn is_deleted(&self) -> bool {
        self.v_succ == DELETED
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(HalfEdgeId, u64);
    assert_eq_size!(Node, [u32; 4]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_roundtrip() {
        let id = HalfEdgeId::from_parts(42, 3);
        assert_eq!(id.index(), 42);
        assert_eq!(id.generation(), 3);
    }

    #[test]
    fn debug_and_display() {
        let id = HalfEdgeId::from_parts(7, 1);
        assert_eq!(format!("{:?}", id), "HalfEdgeId(7, 1)");
        assert_eq!(format!("{}", id), "7@1");
    }

    #[test]
    fn generation_distinguishes_ids() {
        let a = HalfEdgeId::from_parts(5, 0);
        let b = HalfEdgeId::from_parts(5, 1);
        assert_ne!(a, b);
        use std::collections::HashSet;
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn fresh_node_is_live_and_unmasked() {
        let n = Node::fresh(9);
        assert!(!n.is_deleted());
        assert_eq!(n.f_succ, 9);
        assert!(n.mask.is_empty());
    }
}

#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let id = HalfEdgeId::from_parts(123, 4);
        let s = serde_json::to_string(&id).unwrap();
        let back: HalfEdgeId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn bincode_roundtrip() {
        let id = HalfEdgeId::from_parts(456, 0);
        let bytes = bincode::serialize(&id).unwrap();
        let back: HalfEdgeId = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, id);
    }
}
