//! Plane kernel: validated plane parameters, change notifications and
//! deferred, coalesced mesh rebuilds.
//!
//! # Invariants
//! - Setters never fail; out-of-range input is corrected and reported as a warning.
//! - Setting a property to its stored value emits nothing and schedules nothing.
//! - At most one rebuild is queued per plane between ticks.
//! - Meshes are replaced whole, never patched.

pub mod config;
pub mod params;
pub mod plane;
pub mod scene;

pub use config::{ConfigError, PlaneConfig, PlaneParams, PlaneSnapshot};
pub use params::{ParameterError, ParameterUpdate, ParameterWarning, Property, PropertyChange};
pub use plane::PlaneGeometry;
pub use scene::{Scene, SceneError, TickStats};

pub fn crate_info() -> &'static str {
    "gridplane-kernel v0.1.0"
}
