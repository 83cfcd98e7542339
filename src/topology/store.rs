//! Node arena with free-list recycling.
//!
//! Slots are allocated and released two at a time. Released pairs are
//! threaded through `f_succ` (`head.f_succ` is the partner slot, the
//! partner's `f_succ` is the next pair head) with `v_succ = DELETED`, and
//! allocation pops that list before growing the arena.

use crate::mesh_error::MeshGraphError;
use crate::topology::mask::Mask;
use crate::topology::node::{DELETED, NULL_INDEX, Node};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NodeStore {
    nodes: Vec<Node>,
    free_head: u32,
    active: usize,
    free: usize,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl NodeStore {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free_head: NULL_INDEX,
            active: 0,
            free: 0,
        }
    }

    /// Rebuild a store from decoded parts. Consistency is checked by the
    /// caller through graph validation.
    pub(crate) fn from_parts(nodes: Vec<Node>, free_head: u32, active: usize, free: usize) -> Self {
        Self {
            nodes,
            free_head,
            active,
            free,
        }
    }

    /// Number of slots, live or free.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn active(&self) -> usize {
        self.active
    }

    #[inline]
    pub(crate) fn free(&self) -> usize {
        self.free
    }

    #[inline]
    pub(crate) fn free_head(&self) -> u32 {
        self.free_head
    }

    #[inline]
    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub(crate) fn node(&self, i: u32) -> &Node {
        &self.nodes[i as usize]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, i: u32) -> &mut Node {
        &mut self.nodes[i as usize]
    }

    #[inline]
    pub(crate) fn is_live(&self, i: u32) -> bool {
        self.nodes
            .get(i as usize)
            .is_some_and(|n| !n.is_deleted())
    }

    pub(crate) fn live_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_deleted())
            .map(|(i, _)| i as u32)
    }

    pub(crate) fn live_nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        self.nodes.iter_mut().filter(|n| !n.is_deleted())
    }

    /// Hand out two slots, recycled first. Links of the returned slots point
    /// at themselves and their masks are clear; the caller wires them.
    ///
    /// Returns `(a, b, grew)`, where `grew` tells whether the arena got new
    /// slots that parallel arrays must follow.
    pub(crate) fn allocate_pair(&mut self) -> Result<(u32, u32, bool), MeshGraphError> {
        if self.free_head != NULL_INDEX {
            let a = self.free_head;
            let b = self.node(a).f_succ;
            self.free_head = self.node(b).f_succ;
            for i in [a, b] {
                let node = self.node_mut(i);
                node.f_succ = i;
                node.v_succ = i;
                node.mask = Mask::NONE;
            }
            self.free -= 2;
            self.active += 2;
            return Ok((a, b, false));
        }

        let a = self.nodes.len();
        // u32::MAX is reserved for the DELETED / NULL sentinels.
        if a + 2 > NULL_INDEX as usize {
            return Err(MeshGraphError::NodeCapacityExceeded);
        }
        let (a, b) = (a as u32, a as u32 + 1);
        self.nodes.push(Node::fresh(a));
        self.nodes.push(Node::fresh(b));
        self.active += 2;
        Ok((a, b, true))
    }

    /// Put a live pair back on the free list and retire its generation.
    pub(crate) fn release_pair(&mut self, a: u32, b: u32) {
        let head = self.free_head;
        {
            let node = self.node_mut(a);
            node.f_succ = b;
            node.v_succ = DELETED;
            node.mask = Mask::NONE;
            node.generation = node.generation.wrapping_add(1);
        }
        {
            let node = self.node_mut(b);
            node.f_succ = head;
            node.v_succ = DELETED;
            node.mask = Mask::NONE;
            node.generation = node.generation.wrapping_add(1);
        }
        self.free_head = a;
        self.active -= 2;
        self.free += 2;
    }
}
