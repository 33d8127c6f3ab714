use gridplane_mesh::{EffectiveGrid, GridParameters, MeshBuffers, build};

use crate::config::{PlaneConfig, PlaneParams, PlaneSnapshot};
use crate::params::{
    DEFAULT_X_SIZE, DEFAULT_Y_SIZE, ParameterUpdate, ParameterWarning, Property, PropertyChange,
    Sanitized, sanitize_lod, sanitize_segments, sanitize_size,
};

/// A grid plane: stored parameters plus the mesh built from them.
///
/// Setters validate and store immediately but never tessellate. A setter that
/// changes a stored value marks the plane dirty and logs a [`PropertyChange`];
/// the host calls [`PlaneGeometry::rebuild_if_dirty`] once per tick to replace
/// the mesh wholesale.
#[derive(Debug, Clone)]
pub struct PlaneGeometry {
    params: PlaneParams,
    mesh: MeshBuffers,
    dirty: bool,
    rebuilds: u64,
    changes: Vec<PropertyChange>,
    warnings: Vec<ParameterWarning>,
}

impl PlaneGeometry {
    /// Create a plane from a config and build its mesh right away.
    ///
    /// Corrections made to the config are recorded as warnings. No change
    /// notifications are emitted for initial values.
    pub fn new(config: &PlaneConfig) -> Self {
        let (params, warnings) = config.sanitize();
        for w in &warnings {
            tracing::warn!(%w, "plane config corrected");
        }
        Self {
            mesh: build(&params.grid()),
            params,
            dirty: false,
            rebuilds: 0,
            changes: Vec::new(),
            warnings,
        }
    }

    /// Recreate a plane from its persisted shape, at full detail.
    pub fn from_snapshot(snapshot: &PlaneSnapshot) -> Self {
        Self::new(&snapshot.to_config())
    }

    /// Persisted shape of this plane.
    pub fn snapshot(&self) -> PlaneSnapshot {
        PlaneSnapshot::from(&self.params)
    }

    pub fn params(&self) -> &PlaneParams {
        &self.params
    }

    pub fn grid_parameters(&self) -> GridParameters {
        self.params.grid()
    }

    /// Segment counts the next rebuild will tessellate.
    pub fn effective_grid(&self) -> EffectiveGrid {
        self.params.grid().effective()
    }

    /// Mesh from the last build. Stale while the plane is dirty.
    pub fn mesh(&self) -> &MeshBuffers {
        &self.mesh
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of rebuilds since construction (the initial build is not counted).
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    pub fn set_x_size(&mut self, value: f32) -> Option<PropertyChange> {
        self.apply(ParameterUpdate::XSize(Some(value)))
    }

    pub fn set_y_size(&mut self, value: f32) -> Option<PropertyChange> {
        self.apply(ParameterUpdate::YSize(Some(value)))
    }

    pub fn set_x_segments(&mut self, value: i32) -> Option<PropertyChange> {
        self.apply(ParameterUpdate::XSegments(Some(value)))
    }

    pub fn set_y_segments(&mut self, value: i32) -> Option<PropertyChange> {
        self.apply(ParameterUpdate::YSegments(Some(value)))
    }

    pub fn set_lod(&mut self, value: f64) -> Option<PropertyChange> {
        self.apply(ParameterUpdate::Lod(Some(value)))
    }

    /// Sanitize and store one property. `None` values reset to the default.
    ///
    /// Returns the change notification, or `None` when the stored value is
    /// already equal to the sanitized one.
    pub fn apply(&mut self, update: ParameterUpdate) -> Option<PropertyChange> {
        match update {
            ParameterUpdate::XSize(v) => {
                let s = sanitize_size(Property::XSize, v, DEFAULT_X_SIZE);
                self.commit(s, |p| &mut p.x_size, PropertyChange::XSize)
            }
            ParameterUpdate::YSize(v) => {
                let s = sanitize_size(Property::YSize, v, DEFAULT_Y_SIZE);
                self.commit(s, |p| &mut p.y_size, PropertyChange::YSize)
            }
            ParameterUpdate::XSegments(v) => {
                let s = sanitize_segments(Property::XSegments, v);
                self.commit(s, |p| &mut p.x_segments, PropertyChange::XSegments)
            }
            ParameterUpdate::YSegments(v) => {
                let s = sanitize_segments(Property::YSegments, v);
                self.commit(s, |p| &mut p.y_segments, PropertyChange::YSegments)
            }
            ParameterUpdate::Lod(v) => {
                let s = sanitize_lod(v);
                self.commit(s, |p| &mut p.lod, PropertyChange::Lod)
            }
        }
    }

    /// Flag the mesh as stale. Returns `true` only on the clean-to-dirty
    /// transition, which is when a host should schedule a rebuild.
    pub fn mark_dirty(&mut self) -> bool {
        !std::mem::replace(&mut self.dirty, true)
    }

    /// Rebuild the mesh if any parameter changed since the last build.
    pub fn rebuild_if_dirty(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;

        let _span = tracing::info_span!("plane_rebuild").entered();
        self.mesh = build(&self.params.grid());
        self.rebuilds += 1;
        tracing::debug!(
            vertices = self.mesh.vertex_count(),
            triangles = self.mesh.triangle_count(),
            "plane rebuilt"
        );
        true
    }

    /// Drain and return pending change notifications.
    pub fn drain_changes(&mut self) -> Vec<PropertyChange> {
        std::mem::take(&mut self.changes)
    }

    /// Read-only access to pending change notifications.
    pub fn changes(&self) -> &[PropertyChange] {
        &self.changes
    }

    /// Drain and return recorded corrections.
    pub fn drain_warnings(&mut self) -> Vec<ParameterWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn warnings(&self) -> &[ParameterWarning] {
        &self.warnings
    }

    fn commit<T: Copy + PartialEq>(
        &mut self,
        sanitized: Sanitized<T>,
        slot: impl FnOnce(&mut PlaneParams) -> &mut T,
        notify: impl FnOnce(T) -> PropertyChange,
    ) -> Option<PropertyChange> {
        if let Some(w) = sanitized.warning {
            tracing::warn!(%w, "plane parameter corrected");
            self.warnings.push(w);
        }

        let stored = slot(&mut self.params);
        if *stored == sanitized.value {
            return None;
        }
        *stored = sanitized.value;

        let change = notify(sanitized.value);
        tracing::debug!(%change, "plane parameter changed");
        self.mark_dirty();
        self.changes.push(change);
        Some(change)
    }
}

impl Default for PlaneGeometry {
    fn default() -> Self {
        Self::new(&PlaneConfig::default())
    }
}
