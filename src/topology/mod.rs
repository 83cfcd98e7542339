//! Half-edge topology: node storage, navigation, edits, masks and labels.
//!
//! - [`node`]: the `HalfEdgeId` handle and the arena record.
//! - [`graph`]: `HalfEdgeGraph`, navigation operators and `vertex_twist`.
//! - [`edit`]: composite edits (`split_edge`, `join`, `drop_edge`, ...).
//! - [`mask`]: mask words and the reservable mask pool.
//! - [`labels`]: declared per-half-edge integer labels.
//! - [`validation`]: structural checks.

pub mod edit;
pub mod graph;
pub mod labels;
pub mod mask;
pub mod node;
pub(crate) mod store;
pub mod validation;

pub use graph::{GraphConfig, HalfEdgeGraph, LoopIter};
pub use labels::{LabelClassification, LabelConstancy, LabelDef, LabelIndex};
pub use mask::{GrabbedMask, Mask, PropertyClass, ScopedMask};
pub use node::HalfEdgeId;
pub use validation::{SliverHandling, ValidationOptions, validate_graph};
