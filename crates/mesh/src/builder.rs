use crate::buffers::{IndexBuffer, MeshBuffers};
use crate::grid::GridParameters;

/// Normal shared by every vertex: the plane faces -Z.
pub const FACING: [f32; 3] = [0.0, 0.0, -1.0];

/// Tessellate a grid plane centered on the origin in the XY plane.
///
/// Vertices are emitted row-major with rows outermost. Y is negated on output,
/// so row 0 sits at the top edge. U runs from 1 at the left column to 0 at the
/// right; V from 0 at the top row to 1 at the bottom. Each cell contributes two
/// triangles wound so their geometric normal matches [`FACING`].
///
/// Pure: equal parameters always give bit-identical buffers.
pub fn build(params: &GridParameters) -> MeshBuffers {
    let grid = params.effective();
    let _span = tracing::debug_span!("tessellate", grid_x = grid.grid_x, grid_y = grid.grid_y)
        .entered();

    let (grid_x, grid_y) = (grid.grid_x, grid.grid_y);
    let (grid_x1, grid_y1) = (grid.grid_x1(), grid.grid_y1());
    let vertex_count = grid.vertex_count();

    let half_width = params.width / 2.0;
    let half_height = params.height / 2.0;
    let segment_width = params.width / grid_x as f32;
    let segment_height = params.height / grid_y as f32;

    let mut positions = Vec::with_capacity(vertex_count * 3);
    let mut normals = Vec::with_capacity(vertex_count * 3);
    let mut uvs = Vec::with_capacity(vertex_count * 2);

    for iy in 0..grid_y1 {
        let y = iy as f32 * segment_height - half_height;
        let v = 1.0 - (grid_y - iy) as f32 / grid_y as f32;
        for ix in 0..grid_x1 {
            let x = ix as f32 * segment_width - half_width;
            positions.extend_from_slice(&[x, -y, 0.0]);
            normals.extend_from_slice(&FACING);
            uvs.extend_from_slice(&[(grid_x - ix) as f32 / grid_x as f32, v]);
        }
    }

    let mut indices = Vec::with_capacity(grid.index_count());
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = ix + grid_x1 * iy;
            let b = ix + grid_x1 * (iy + 1);
            let c = (ix + 1) + grid_x1 * (iy + 1);
            let d = (ix + 1) + grid_x1 * iy;
            indices.extend_from_slice(&[d, b, a, d, c, b]);
        }
    }

    let indices = IndexBuffer::with_format(indices, grid.index_format());
    tracing::trace!(
        vertices = vertex_count,
        indices = indices.len(),
        format = %indices.format(),
        "grid tessellated"
    );

    MeshBuffers {
        positions,
        normals,
        uvs,
        indices,
    }
}
