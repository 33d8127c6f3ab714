use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use gridplane_common::Bounds;
use serde::{Deserialize, Serialize};

/// Element width of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexFormat {
    U16,
    U32,
}

impl IndexFormat {
    /// Size in bytes of one index.
    pub fn size(&self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

impl std::fmt::Display for IndexFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::U16 => write!(f, "u16"),
            Self::U32 => write!(f, "u32"),
        }
    }
}

/// Triangle indices, stored narrow when every index fits in 16 bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Store `indices` at the given width. Narrowing assumes every index
    /// fits, which [`EffectiveGrid::index_format`](crate::EffectiveGrid::index_format)
    /// guarantees for grid meshes.
    pub fn with_format(indices: Vec<u32>, format: IndexFormat) -> Self {
        match format {
            IndexFormat::U32 => Self::U32(indices),
            IndexFormat::U16 => Self::U16(indices.into_iter().map(|i| i as u16).collect()),
        }
    }

    pub fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::U16,
            Self::U32(_) => IndexFormat::U32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index at `i`, widened to `u32`.
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Self::U16(v) => v.get(i).map(|&x| u32::from(x)),
            Self::U32(v) => v.get(i).copied(),
        }
    }

    /// All indices widened to `u32`.
    pub fn to_u32_vec(&self) -> Vec<u32> {
        match self {
            Self::U16(v) => v.iter().map(|&x| u32::from(x)).collect(),
            Self::U32(v) => v.clone(),
        }
    }

    /// Raw bytes in native endianness, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(v) => bytemuck::cast_slice(v),
            Self::U32(v) => bytemuck::cast_slice(v),
        }
    }
}

/// Interleaved vertex layout for upload.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GridVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Flat vertex attribute arrays plus triangle indices for one grid plane.
///
/// `positions` and `normals` hold three floats per vertex, `uvs` two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: IndexBuffer,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn index_format(&self) -> IndexFormat {
        self.indices.format()
    }

    /// Position of vertex `i`.
    pub fn position(&self, i: usize) -> Option<Vec3> {
        self.positions
            .get(i * 3..i * 3 + 3)
            .map(Vec3::from_slice)
    }

    /// Normal of vertex `i`.
    pub fn normal(&self, i: usize) -> Option<Vec3> {
        self.normals.get(i * 3..i * 3 + 3).map(Vec3::from_slice)
    }

    /// Texture coordinate of vertex `i`.
    pub fn uv(&self, i: usize) -> Option<[f32; 2]> {
        self.uvs.get(i * 2..i * 2 + 2).map(|s| [s[0], s[1]])
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.positions.chunks_exact(3).map(Vec3::from_slice))
    }

    /// Attribute arrays zipped into one vertex per element.
    pub fn interleaved(&self) -> Vec<GridVertex> {
        self.positions
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .zip(self.uvs.chunks_exact(2))
            .map(|((p, n), uv)| GridVertex {
                position: [p[0], p[1], p[2]],
                normal: [n[0], n[1], n[2]],
                uv: [uv[0], uv[1]],
            })
            .collect()
    }

    /// Size of the vertex attribute data in bytes.
    pub fn vertex_bytes(&self) -> usize {
        self.vertex_count() * std::mem::size_of::<GridVertex>()
    }

    /// Size of the index data in bytes.
    pub fn index_bytes(&self) -> usize {
        self.indices.len() * self.index_format().size()
    }
}
