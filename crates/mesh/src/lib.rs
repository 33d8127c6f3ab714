//! Grid plane tessellation.
//!
//! Turns a set of [`GridParameters`] into flat position/normal/UV arrays and a
//! triangle index buffer. The level-of-detail factor scales the base segment
//! counts before tessellation.
//!
//! # Invariants
//! - Effective segment counts are derived from the parameters, never stored.
//! - At least one column and four rows are always tessellated.
//! - Indices are 16-bit unless the vertex count exceeds `u16::MAX`.
//! - `build` is pure; buffers are produced whole, never patched.

mod buffers;
mod builder;
mod grid;

pub use buffers::{GridVertex, IndexBuffer, IndexFormat, MeshBuffers};
pub use builder::{FACING, build};
pub use grid::{EffectiveGrid, GridParameters, MAX_U16_VERTICES, MIN_COLUMNS, MIN_ROWS};

pub fn crate_info() -> &'static str {
    "gridplane-mesh v0.1.0"
}
