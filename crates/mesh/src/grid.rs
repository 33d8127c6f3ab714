use serde::{Deserialize, Serialize};

use crate::buffers::IndexFormat;

/// Lower bound on effective columns.
pub const MIN_COLUMNS: u32 = 1;

/// Lower bound on effective rows. Applies regardless of LOD or base segment
/// count, so a plane never drops below this vertical density.
pub const MIN_ROWS: u32 = 4;

/// Vertex count above which indices no longer fit in 16 bits.
pub const MAX_U16_VERTICES: usize = u16::MAX as usize;

/// Inputs to the tessellator.
///
/// Values are expected to be sanitized already: positive sizes, segment counts
/// of at least one, `lod` in `[0, 1]`. Tessellation itself does no validation.
///
/// Segment counts have no upper bound. [`build`](crate::build) allocates every
/// vertex up front and computes indices in `u32`, so a grid whose vertex count
/// exceeds `u32::MAX` is unsupported and will exhaust memory first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParameters {
    pub width: f32,
    pub height: f32,
    pub x_segments: u32,
    pub y_segments: u32,
    pub lod: f64,
}

impl Default for GridParameters {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 0.25,
            x_segments: 4,
            y_segments: 4,
            lod: 1.0,
        }
    }
}

impl GridParameters {
    /// Segment counts after LOD scaling and the density floors.
    pub fn effective(&self) -> EffectiveGrid {
        EffectiveGrid {
            grid_x: scale_segments(self.lod, self.x_segments).max(MIN_COLUMNS),
            grid_y: scale_segments(self.lod, self.y_segments).max(MIN_ROWS),
        }
    }
}

fn scale_segments(lod: f64, base: u32) -> u32 {
    (lod * f64::from(base)).floor() as u32
}

/// Cell counts actually tessellated for a set of [`GridParameters`].
///
/// Always derived, never stored alongside the parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveGrid {
    pub grid_x: u32,
    pub grid_y: u32,
}

impl EffectiveGrid {
    /// Vertex columns.
    pub fn grid_x1(&self) -> u32 {
        self.grid_x + 1
    }

    /// Vertex rows.
    pub fn grid_y1(&self) -> u32 {
        self.grid_y + 1
    }

    pub fn vertex_count(&self) -> usize {
        self.grid_x1() as usize * self.grid_y1() as usize
    }

    pub fn cell_count(&self) -> usize {
        self.grid_x as usize * self.grid_y as usize
    }

    /// Two triangles per cell.
    pub fn index_count(&self) -> usize {
        self.cell_count() * 6
    }

    /// Whether this grid needs 32-bit indices.
    pub fn needs_wide_indices(&self) -> bool {
        self.vertex_count() > MAX_U16_VERTICES
    }

    /// Index storage width for this grid.
    pub fn index_format(&self) -> IndexFormat {
        if self.needs_wide_indices() {
            IndexFormat::U32
        } else {
            IndexFormat::U16
        }
    }
}
