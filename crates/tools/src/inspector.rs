use gridplane_common::{Bounds, PlaneId};
use gridplane_kernel::{PlaneGeometry, PlaneParams, Scene};
use gridplane_mesh::{EffectiveGrid, IndexFormat, MeshBuffers};
use serde::Serialize;

/// Read-only queries over meshes, planes and scenes for debugging and CLI output.
pub struct MeshInspector;

impl MeshInspector {
    /// Summarize a set of mesh buffers.
    pub fn summary(mesh: &MeshBuffers) -> MeshSummary {
        MeshSummary {
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            index_count: mesh.indices.len(),
            index_format: mesh.index_format(),
            bounds: mesh.bounds(),
            vertex_bytes: mesh.vertex_bytes(),
            index_bytes: mesh.index_bytes(),
        }
    }

    /// Summarize one plane: stored parameters, effective grid and current mesh.
    pub fn plane(plane: &PlaneGeometry) -> PlaneSummary {
        PlaneSummary {
            params: *plane.params(),
            grid: plane.effective_grid(),
            dirty: plane.is_dirty(),
            rebuilds: plane.rebuild_count(),
            mesh: Self::summary(plane.mesh()),
        }
    }

    /// Summarize one plane of a scene by id.
    pub fn inspect_plane(scene: &Scene, id: PlaneId) -> Option<PlaneSummary> {
        scene.get(id).map(Self::plane)
    }

    /// List all plane ids in the scene.
    pub fn list_planes(scene: &Scene) -> Vec<PlaneId> {
        scene.planes().keys().copied().collect()
    }

    /// Totals across every plane in the scene.
    pub fn scene(scene: &Scene) -> SceneSummary {
        let planes = scene.planes().values();
        SceneSummary {
            tick: scene.tick_count(),
            plane_count: scene.len(),
            pending_rebuilds: scene.pending_rebuilds(),
            total_vertices: planes.clone().map(|p| p.mesh().vertex_count()).sum(),
            total_triangles: planes.map(|p| p.mesh().triangle_count()).sum(),
        }
    }
}

/// Counts and sizes for one mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSummary {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub index_count: usize,
    pub index_format: IndexFormat,
    pub bounds: Option<Bounds>,
    pub vertex_bytes: usize,
    pub index_bytes: usize,
}

impl std::fmt::Display for MeshSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mesh: vertices={} triangles={} indices={} ({}, {} B) vertex_data={} B",
            self.vertex_count,
            self.triangle_count,
            self.index_count,
            self.index_format,
            self.index_bytes,
            self.vertex_bytes,
        )?;
        if let Some(b) = self.bounds {
            let (center, size) = (b.center(), b.size());
            write!(
                f,
                " center=({:.2}, {:.2}, {:.2}) size=({:.2}, {:.2}, {:.2})",
                center.x, center.y, center.z, size.x, size.y, size.z
            )?;
        }
        Ok(())
    }
}

/// Detailed info about a single plane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaneSummary {
    pub params: PlaneParams,
    pub grid: EffectiveGrid,
    pub dirty: bool,
    pub rebuilds: u64,
    pub mesh: MeshSummary,
}

impl std::fmt::Display for PlaneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = &self.params;
        writeln!(
            f,
            "Plane: size=({:.3}, {:.3}) segments=({}, {}) lod={:.3} auto_normals={}",
            p.x_size, p.y_size, p.x_segments, p.y_segments, p.lod, p.auto_normals
        )?;
        writeln!(
            f,
            "Grid: {}x{} cells ({}x{} vertices) dirty={} rebuilds={}",
            self.grid.grid_x,
            self.grid.grid_y,
            self.grid.grid_x1(),
            self.grid.grid_y1(),
            self.dirty,
            self.rebuilds
        )?;
        write!(f, "{}", self.mesh)
    }
}

/// Totals for a scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub tick: u64,
    pub plane_count: usize,
    pub pending_rebuilds: usize,
    pub total_vertices: usize,
    pub total_triangles: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: tick={} planes={} pending_rebuilds={} vertices={} triangles={}",
            self.tick,
            self.plane_count,
            self.pending_rebuilds,
            self.total_vertices,
            self.total_triangles
        )
    }
}
