//! Flat little-endian byte image of a [`HalfEdgeGraph`].
//!
//! Layout, in order:
//! 1. `u32` node count, then one [`WireNode`] per slot (live and free);
//! 2. `u32` label count, then one [`WireLabelDef`] per label;
//! 3. per label: `u32` value count, then that many `i32` values;
//! 4. [`WireTail`]: free-list head (`u32::MAX` when empty), active count,
//!    free count;
//! 5. [`WireMasks`]: pool free bitmap, then the edge, vertex and face
//!    accumulators.
//!
//! Ids and generations survive a round trip unchanged, so `HalfEdgeId`s
//! persisted next to a buffer stay valid after [`load`].

use std::mem::size_of;

use bytemuck::{Pod, Zeroable};

use crate::mesh_error::MeshGraphError;
use crate::topology::graph::{GraphConfig, HalfEdgeGraph};
use crate::topology::labels::{LabelDef, LabelIndex, LabelTable};
use crate::topology::mask::{Mask, MaskPool, PropertyClass};
use crate::topology::node::Node;
use crate::topology::store::NodeStore;
use crate::topology::validation::{ValidationOptions, validate_graph};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireCount {
    pub n_le: u32,
}
impl WireCount {
    pub fn new(n: usize) -> Self {
        Self {
            n_le: (n as u32).to_le(),
        }
    }
    pub fn get(&self) -> usize {
        u32::from_le(self.n_le) as usize
    }
}

/// One arena slot.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireNode {
    pub f_succ_le: u32,
    pub v_succ_le: u32,
    pub mask_le: u32,
    pub generation_le: u32,
}
impl WireNode {
    fn of(node: &Node) -> Self {
        Self {
            f_succ_le: node.f_succ.to_le(),
            v_succ_le: node.v_succ.to_le(),
            mask_le: node.mask.bits().to_le(),
            generation_le: node.generation.to_le(),
        }
    }
    fn decode(&self) -> Node {
        Node {
            f_succ: u32::from_le(self.f_succ_le),
            v_succ: u32::from_le(self.v_succ_le),
            mask: Mask::from_bits(u32::from_le(self.mask_le)),
            generation: u32::from_le(self.generation_le),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireLabelDef {
    pub default_le: i32,
    pub tag_le: i32,
    pub property_le: u32,
}
impl WireLabelDef {
    fn of(def: &LabelDef) -> Self {
        Self {
            default_le: def.default.to_le(),
            tag_le: def.tag.to_le(),
            property_le: def.property.bits().to_le(),
        }
    }
    fn decode(&self) -> LabelDef {
        LabelDef {
            tag: i32::from_le(self.tag_le),
            default: i32::from_le(self.default_le),
            property: PropertyClass::from_bits(u32::from_le(self.property_le)),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireTail {
    pub free_head_le: u32,
    pub active_le: u32,
    pub free_le: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireMasks {
    pub free_le: u32,
    pub edge_le: u32,
    pub vertex_le: u32,
    pub face_le: u32,
}

const _: () = {
    assert!(size_of::<WireCount>() == 4);
    assert!(size_of::<WireNode>() == 16);
    assert!(size_of::<WireLabelDef>() == 12);
    assert!(size_of::<WireTail>() == 12);
    assert!(size_of::<WireMasks>() == 16);
};

fn put<T: Pod>(out: &mut Vec<u8>, rec: &T) {
    out.extend_from_slice(bytemuck::bytes_of(rec));
}

/// Serialize the whole graph: nodes, labels, free list and mask pool.
pub fn store(graph: &HalfEdgeGraph) -> Vec<u8> {
    let nodes = graph.store.nodes();
    let defs = graph.labels.defs();
    let mut out = Vec::with_capacity(
        4 + nodes.len() * size_of::<WireNode>()
            + 4
            + defs.len() * (size_of::<WireLabelDef>() + 4 + 4 * nodes.len())
            + size_of::<WireTail>()
            + size_of::<WireMasks>(),
    );

    put(&mut out, &WireCount::new(nodes.len()));
    for node in nodes {
        put(&mut out, &WireNode::of(node));
    }

    put(&mut out, &WireCount::new(defs.len()));
    for def in defs {
        put(&mut out, &WireLabelDef::of(def));
    }
    for k in 0..defs.len() {
        let values = graph.labels.values(LabelIndex::new(k as u32));
        put(&mut out, &WireCount::new(values.len()));
        for &v in values {
            put(&mut out, &v.to_le());
        }
    }

    put(
        &mut out,
        &WireTail {
            free_head_le: graph.store.free_head().to_le(),
            active_le: (graph.store.active() as u32).to_le(),
            free_le: (graph.store.free() as u32).to_le(),
        },
    );
    put(
        &mut out,
        &WireMasks {
            free_le: graph.pool.free().bits().to_le(),
            edge_le: graph.pool.edge().bits().to_le(),
            vertex_le: graph.pool.vertex().bits().to_le(),
            face_le: graph.pool.face().bits().to_le(),
        },
    );
    out
}

/// Rebuild a graph from [`store`] output with the default configuration.
pub fn load(bytes: &[u8]) -> Result<HalfEdgeGraph, MeshGraphError> {
    load_with_config(bytes, GraphConfig::default())
}

/// Rebuild a graph from [`store`] output.
///
/// The decoded graph is validated before it is returned; any truncation,
/// trailing data, or structural inconsistency is reported as
/// [`MeshGraphError::MalformedBuffer`].
pub fn load_with_config(
    bytes: &[u8],
    config: GraphConfig,
) -> Result<HalfEdgeGraph, MeshGraphError> {
    let mut r = Reader { buf: bytes, pos: 0 };

    let n = r.count::<WireNode>("node")?;
    let mut nodes = Vec::with_capacity(n);
    for _ in 0..n {
        nodes.push(r.take::<WireNode>()?.decode());
    }

    let n_labels = r.count::<WireLabelDef>("label")?;
    let mut defs = Vec::with_capacity(n_labels);
    for _ in 0..n_labels {
        defs.push(r.take::<WireLabelDef>()?.decode());
    }
    let mut values = Vec::with_capacity(n_labels);
    for _ in 0..n_labels {
        let len = r.count::<i32>("label value")?;
        let mut column = Vec::with_capacity(len);
        for _ in 0..len {
            column.push(i32::from_le(r.take::<i32>()?));
        }
        values.push(column);
    }

    let tail: WireTail = r.take()?;
    let masks: WireMasks = r.take()?;
    if r.pos != bytes.len() {
        return Err(MeshGraphError::MalformedBuffer(format!(
            "{} trailing bytes",
            bytes.len() - r.pos
        )));
    }

    let store = NodeStore::from_parts(
        nodes,
        u32::from_le(tail.free_head_le),
        u32::from_le(tail.active_le) as usize,
        u32::from_le(tail.free_le) as usize,
    );
    let labels = LabelTable::from_parts(defs, values, config.max_labels);
    let pool = MaskPool::from_words(
        Mask::from_bits(u32::from_le(masks.free_le)),
        Mask::from_bits(u32::from_le(masks.edge_le)),
        Mask::from_bits(u32::from_le(masks.vertex_le)),
        Mask::from_bits(u32::from_le(masks.face_le)),
    );
    let graph = HalfEdgeGraph::from_raw_parts(store, labels, pool, config);
    validate_graph(&graph, ValidationOptions::default())
        .map_err(|e| MeshGraphError::MalformedBuffer(e.to_string()))?;
    Ok(graph)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<T: Pod>(&mut self) -> Result<T, MeshGraphError> {
        let need = size_of::<T>();
        let end = self.pos + need;
        if end > self.buf.len() {
            return Err(MeshGraphError::MalformedBuffer(format!(
                "truncated at byte {}: need {need} more",
                self.pos
            )));
        }
        let value = bytemuck::pod_read_unaligned(&self.buf[self.pos..end]);
        self.pos = end;
        Ok(value)
    }

    /// Read a count prefix and check that `count` records of `T` fit in the
    /// rest of the buffer.
    fn count<T>(&mut self, what: &str) -> Result<usize, MeshGraphError> {
        let n = self.take::<WireCount>()?.get();
        let remaining = self.buf.len() - self.pos;
        if n.saturating_mul(size_of::<T>()) > remaining {
            return Err(MeshGraphError::MalformedBuffer(format!(
                "{what} count {n} exceeds the {remaining} bytes left"
            )));
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_roundtrip() {
        let g = HalfEdgeGraph::new();
        let bytes = store(&g);
        assert_eq!(bytes.len(), 4 + 4 + 12 + 16);
        let back = load(&bytes).unwrap();
        assert!(back.is_empty());
        assert_eq!(back.free_mask_count(), 16);
    }

    #[test]
    fn wire_node_is_little_endian() {
        let node = Node {
            f_succ: 1,
            v_succ: 0x0102_0304,
            mask: Mask::BOUNDARY,
            generation: 7,
        };
        let bytes = bytemuck::bytes_of(&WireNode::of(&node)).to_vec();
        assert_eq!(&bytes[0..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &[4, 3, 2, 1]);
        let back: WireNode = bytemuck::pod_read_unaligned(&bytes);
        assert_eq!(back.decode(), node);
    }

    #[test]
    fn truncated_and_padded_buffers_are_rejected() {
        let mut g = HalfEdgeGraph::new();
        g.create_edge().unwrap();
        let bytes = store(&g);
        assert!(matches!(
            load(&bytes[..bytes.len() - 1]),
            Err(MeshGraphError::MalformedBuffer(_))
        ));
        let mut padded = bytes.clone();
        padded.push(0);
        assert!(matches!(
            load(&padded),
            Err(MeshGraphError::MalformedBuffer(_))
        ));
    }

    #[test]
    fn oversized_count_is_rejected_before_allocating() {
        let bytes = WireCount::new(u32::MAX as usize);
        assert!(matches!(
            load(bytemuck::bytes_of(&bytes)),
            Err(MeshGraphError::MalformedBuffer(_))
        ));
    }

    #[test]
    fn broken_links_are_rejected() {
        let mut g = HalfEdgeGraph::new();
        g.create_edge().unwrap();
        let mut bytes = store(&g);
        // first node's f_succ -> slot 9, which does not exist
        bytes[4..8].copy_from_slice(&9u32.to_le_bytes());
        assert!(matches!(
            load(&bytes),
            Err(MeshGraphError::MalformedBuffer(_))
        ));
    }
}
