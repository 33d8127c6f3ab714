//! Developer tooling: mesh and plane inspection.
//!
//! # Invariants
//! - Inspection never mutates planes or scenes.

mod inspector;

pub use inspector::{MeshInspector, MeshSummary, PlaneSummary, SceneSummary};

pub fn crate_info() -> &'static str {
    "gridplane-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
