//! Shared types for the gridplane crates.

mod types;

pub use types::{Bounds, PlaneId};
