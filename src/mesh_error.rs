//! MeshGraphError: Unified error type for halfedge-topo public APIs
//!
//! Every fallible operation on the graph (accessors, edits, mask and label
//! bookkeeping, searches, flat I/O) reports failure through this enum instead
//! of panicking.

use crate::topology::node::HalfEdgeId;
use thiserror::Error;

/// Unified error type for half-edge graph operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshGraphError {
    /// Accessor called with an out-of-range, released, or stale id.
    #[error("invalid half-edge id {0}")]
    InvalidId(HalfEdgeId),
    /// `grab_mask` found no free reservable bit.
    #[error("mask pool exhausted: every reservable bit is in use")]
    MaskPoolExhausted,
    /// Label index does not name a declared label.
    #[error("invalid label index {0}")]
    InvalidLabelIndex(usize),
    /// `define_label` would exceed the configured label limit.
    #[error("label capacity exceeded (at most {max} labels)")]
    LabelCapacityExceeded { max: usize },
    /// The node arena cannot grow any further.
    #[error("node capacity exceeded: half-edge ids are exhausted")]
    NodeCapacityExceeded,
    /// The predecessor chase required by a vertex twist could not resolve.
    #[error("vertex twist between {a} and {b} cannot be resolved")]
    MalformedTwist { a: HalfEdgeId, b: HalfEdgeId },
    /// The direction-masked subgraph is not acyclic.
    #[error("Topology error: cycle detected under direction mask (expected DAG)")]
    CycleDetected,
    /// The neighbourhood of the half-edge does not match a split pattern.
    #[error("heal at {0}: vertex is not a simple two-edge split point")]
    MalformedHeal(HalfEdgeId),
    /// The face at the half-edge is not a two-sided sliver between distinct edges.
    #[error("excise at {0}: face is not a two-sided sliver")]
    MalformedExcise(HalfEdgeId),
    /// A flat byte buffer could not be decoded.
    #[error("malformed graph buffer: {0}")]
    MalformedBuffer(String),
    /// A structural invariant does not hold.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
