//! Structural self-checks for graph-like containers.
//!
//! Mutating operations call [`debug_invariants!`] after they finish. The
//! check compiles away unless debug assertions or one of the
//! `strict-invariants` / `check-invariants` features is on.

use crate::mesh_error::MeshGraphError;

/// Validation hook for containers with structural invariants.
pub trait DebugInvariants {
    /// Return the first invariant violation found, if any.
    fn validate_invariants(&self) -> Result<(), MeshGraphError>;

    /// Panic on the first invariant violation.
    fn debug_assert_invariants(&self) {
        if let Err(e) = self.validate_invariants() {
            panic!("[invariants] {e}");
        }
    }
}

#[cfg(any(
    debug_assertions,
    feature = "strict-invariants",
    feature = "check-invariants"
))]
macro_rules! debug_invariants {
    ($s:expr) => {
        $crate::debug_invariants::DebugInvariants::debug_assert_invariants($s)
    };
}

#[cfg(not(any(
    debug_assertions,
    feature = "strict-invariants",
    feature = "check-invariants"
)))]
macro_rules! debug_invariants {
    ($s:expr) => {{
        let _ = &$s;
    }};
}

pub(crate) use debug_invariants;
