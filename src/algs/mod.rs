//! Graph searches over a [`HalfEdgeGraph`](crate::topology::HalfEdgeGraph).
//!
//! Every search borrows its scratch marks from the mask pool through scoped
//! masks and hands them back before returning.

pub mod any_path;
pub mod components;
pub mod loops;
pub mod partial_order;
pub mod reduce;
pub mod spanning_tree;
pub mod strong_components;

pub use any_path::mark_any_path_between;
pub use components::{ComponentScope, ComponentSearch, connected_components};
pub use loops::{LoopKind, LoopNumbering, collect_loops, number_loops};
pub use partial_order::partial_order;
pub use reduce::{drop_edges_by_mask, drop_trees};
pub use spanning_tree::{SpanningTree, prioritized_spanning_tree};
pub use strong_components::mark_strong_components;
