//! Persistence: content-hashed scene snapshots.
//!
//! # Invariants
//! - Snapshots hold plane shapes only; LOD is view state and is never written.
//! - Loading verifies schema version and content hash before returning.

mod snapshot;

pub use snapshot::{PersistError, SNAPSHOT_SCHEMA_VERSION, SceneSnapshot};

pub fn crate_info() -> &'static str {
    "gridplane-persist v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("persist"));
    }
}
