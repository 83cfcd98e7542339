#![cfg_attr(docsrs, feature(doc_cfg))]
//! # halfedge-topo
//!
//! A half-edge topology engine. Each undirected edge is a pair of
//! *half-edges* stored side by side in an arena; every half-edge keeps two
//! successor links, `f_succ` (next half-edge around its face) and `v_succ`
//! (next half-edge around its vertex). The mate of a half-edge, its face
//! predecessor and its vertex predecessor all follow from those two links:
//!
//! - `edge_mate(i) = v_succ(f_succ(i))`
//! - `f_pred(i) = v_succ(f_succ(v_succ(i)))`
//! - `v_pred(i) = f_succ(v_succ(f_succ(i)))`
//!
//! The single primitive edit is [`HalfEdgeGraph::vertex_twist`], which
//! splits or merges vertex loops; every composite edit (`split_edge`,
//! `heal_edge`, `join`, `drop_edge`, `yank_edge_from_vertex`,
//! `excise_sliver_face`) is built from allocation plus twists.
//!
//! ## Features
//! - Stable, generation-checked [`HalfEdgeId`] handles and free-slot reuse
//! - A 32-bit mask word per half-edge with a pool of reservable bits and
//!   RAII [`ScopedMask`](topology::ScopedMask) guards
//! - Per-half-edge integer labels copied through edits by property class
//! - Loop numbering, connected components, spanning trees, partial order,
//!   strongly connected components and path marking in [`algs`]
//! - Structural validation and a flat little-endian byte image in [`io`]
//!
//! ## Invariant checking
//! Composite edits check the whole graph after they finish in debug builds,
//! and in release builds with the `strict-invariants` or `check-invariants`
//! feature enabled. See [`debug_invariants`].
//!
//! ## Usage
//!
//! ```
//! use halfedge_topo::prelude::*;
//!
//! # fn main() -> Result<(), MeshGraphError> {
//! let mut g = HalfEdgeGraph::new();
//! let (a0, b0) = g.create_edge()?;
//! let (a1, b1) = g.create_edge()?;
//! g.vertex_twist(b0, a1)?;
//! g.join(b1, a0, Mask::NONE, Mask::NONE)?;
//!
//! assert_eq!(g.count_around_face(a0)?, 3);
//! assert_eq!(collect_loops(&mut g, LoopKind::Face)?.len(), 2);
//! assert_eq!(collect_loops(&mut g, LoopKind::Vertex)?.len(), 3);
//! # Ok(()) }
//! ```

pub mod algs;
pub mod debug_invariants;
pub mod io;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::{
        ComponentScope, ComponentSearch, LoopKind, LoopNumbering, SpanningTree, collect_loops,
        connected_components, drop_edges_by_mask, drop_trees, mark_any_path_between,
        mark_strong_components, number_loops, partial_order, prioritized_spanning_tree,
    };
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh_error::MeshGraphError;
    pub use crate::topology::{
        GraphConfig, GrabbedMask, HalfEdgeGraph, HalfEdgeId, LabelClassification, LabelIndex,
        Mask, PropertyClass, ScopedMask, SliverHandling, ValidationOptions, validate_graph,
    };
}
