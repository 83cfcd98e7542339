//! Graph persistence.
//!
//! [`flat`] writes and reads a compact little-endian image of the whole
//! graph, including free slots, labels and mask pool state.

pub mod flat;

pub use flat::{load, load_with_config, store};
