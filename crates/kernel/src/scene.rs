use gridplane_common::PlaneId;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::config::PlaneConfig;
use crate::params::{ParameterUpdate, ParameterWarning, PropertyChange};
use crate::plane::PlaneGeometry;

/// Errors from scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("plane {0:?} not found")]
    PlaneNotFound(PlaneId),
}

/// Per-tick rebuild statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickStats {
    pub tick: u64,
    /// Rebuilds that were queued when the tick started.
    pub scheduled: usize,
    pub rebuilt: usize,
    pub elapsed: Duration,
}

/// Host for a set of planes and their deferred rebuilds.
///
/// Mutations apply immediately. The first mutation that dirties a clean plane
/// queues exactly one rebuild; further mutations before the next [`Scene::tick`]
/// are absorbed by the same queued rebuild.
///
/// Uses BTreeMap so iteration follows plane id order on every platform.
#[derive(Debug, Default)]
pub struct Scene {
    planes: BTreeMap<PlaneId, PlaneGeometry>,
    pending: Vec<PlaneId>,
    tick: u64,
    changes: Vec<(PlaneId, PropertyChange)>,
    warnings: Vec<(PlaneId, ParameterWarning)>,
    stats: TickStats,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Read-only access to all planes (BTreeMap for deterministic iteration).
    pub fn planes(&self) -> &BTreeMap<PlaneId, PlaneGeometry> {
        &self.planes
    }

    pub fn get(&self, id: PlaneId) -> Option<&PlaneGeometry> {
        self.planes.get(&id)
    }

    /// Create a plane from a config. Returns its id.
    pub fn spawn(&mut self, config: &PlaneConfig) -> PlaneId {
        let id = PlaneId::new();
        self.insert(id, PlaneGeometry::new(config));
        id
    }

    /// Insert a plane under a specific id (used for snapshot restore).
    pub fn insert(&mut self, id: PlaneId, mut plane: PlaneGeometry) {
        self.collect(id, &mut plane);
        if plane.is_dirty() {
            self.schedule(id);
        }
        tracing::debug!(plane = %id.short(), "plane inserted");
        self.planes.insert(id, plane);
    }

    /// Remove a plane. A rebuild already queued for it is dropped.
    pub fn despawn(&mut self, id: PlaneId) -> Option<PlaneGeometry> {
        let plane = self.planes.remove(&id)?;
        self.pending.retain(|p| *p != id);
        tracing::debug!(plane = %id.short(), "plane despawned");
        Some(plane)
    }

    /// Apply one parameter update to a plane.
    ///
    /// Returns the change notification, or `None` when the update left the
    /// stored value as it was.
    pub fn update(
        &mut self,
        id: PlaneId,
        update: ParameterUpdate,
    ) -> Result<Option<PropertyChange>, SceneError> {
        let plane = self
            .planes
            .get_mut(&id)
            .ok_or(SceneError::PlaneNotFound(id))?;

        let was_dirty = plane.is_dirty();
        let change = plane.apply(update);
        let newly_dirty = !was_dirty && plane.is_dirty();

        self.changes
            .extend(plane.drain_changes().into_iter().map(|c| (id, c)));
        self.warnings
            .extend(plane.drain_warnings().into_iter().map(|w| (id, w)));

        if newly_dirty {
            self.schedule(id);
        }
        Ok(change)
    }

    /// Apply several updates to one plane, stopping at the first error.
    pub fn update_all(
        &mut self,
        id: PlaneId,
        updates: impl IntoIterator<Item = ParameterUpdate>,
    ) -> Result<Vec<PropertyChange>, SceneError> {
        let mut changes = Vec::new();
        for update in updates {
            changes.extend(self.update(id, update)?);
        }
        Ok(changes)
    }

    /// Number of rebuilds waiting for the next tick.
    pub fn pending_rebuilds(&self) -> usize {
        self.pending.len()
    }

    /// Run every queued rebuild once.
    pub fn tick(&mut self) -> TickStats {
        self.tick += 1;
        let _span = tracing::info_span!("scene_tick", tick = self.tick).entered();
        let start = Instant::now();

        let pending = std::mem::take(&mut self.pending);
        let mut rebuilt = 0;
        for id in &pending {
            if let Some(plane) = self.planes.get_mut(id) {
                if plane.rebuild_if_dirty() {
                    rebuilt += 1;
                }
            }
        }

        self.stats = TickStats {
            tick: self.tick,
            scheduled: pending.len(),
            rebuilt,
            elapsed: start.elapsed(),
        };
        tracing::trace!(
            scheduled = self.stats.scheduled,
            rebuilt,
            "scene tick complete"
        );
        self.stats.clone()
    }

    /// Statistics from the last tick.
    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Drain change notifications in the order they were emitted.
    pub fn drain_changes(&mut self) -> Vec<(PlaneId, PropertyChange)> {
        std::mem::take(&mut self.changes)
    }

    pub fn changes(&self) -> &[(PlaneId, PropertyChange)] {
        &self.changes
    }

    /// Drain corrections made to out-of-range input.
    pub fn drain_warnings(&mut self) -> Vec<(PlaneId, ParameterWarning)> {
        std::mem::take(&mut self.warnings)
    }

    pub fn warnings(&self) -> &[(PlaneId, ParameterWarning)] {
        &self.warnings
    }

    fn schedule(&mut self, id: PlaneId) {
        tracing::trace!(plane = %id.short(), "rebuild scheduled");
        self.pending.push(id);
    }

    fn collect(&mut self, id: PlaneId, plane: &mut PlaneGeometry) {
        self.changes
            .extend(plane.drain_changes().into_iter().map(|c| (id, c)));
        self.warnings
            .extend(plane.drain_warnings().into_iter().map(|w| (id, w)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Property;

    #[test]
    fn scene_starts_empty() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.tick_count(), 0);
        assert_eq!(scene.pending_rebuilds(), 0);
    }

    #[test]
    fn spawn_builds_without_scheduling() {
        let mut scene = Scene::new();
        let id = scene.spawn(&PlaneConfig::default());
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.pending_rebuilds(), 0);
        assert_eq!(scene.get(id).unwrap().mesh().vertex_count(), 25);
    }

    #[test]
    fn two_mutations_coalesce_into_one_rebuild() {
        let mut scene = Scene::new();
        let id = scene.spawn(&PlaneConfig::default());

        scene.update(id, ParameterUpdate::XSegments(Some(8))).unwrap();
        scene.update(id, ParameterUpdate::YSegments(Some(8))).unwrap();
        assert_eq!(scene.pending_rebuilds(), 1);

        let stats = scene.tick();
        assert_eq!(stats.scheduled, 1);
        assert_eq!(stats.rebuilt, 1);
        let plane = scene.get(id).unwrap();
        assert_eq!(plane.rebuild_count(), 1);
        assert_eq!(plane.mesh().vertex_count(), 81);

        let idle = scene.tick();
        assert_eq!(idle.rebuilt, 0);
        assert_eq!(scene.get(id).unwrap().rebuild_count(), 1);
    }

    #[test]
    fn no_op_update_schedules_nothing() {
        let mut scene = Scene::new();
        let id = scene.spawn(&PlaneConfig::default());
        let change = scene.update(id, ParameterUpdate::Lod(Some(1.0))).unwrap();
        assert_eq!(change, None);
        assert_eq!(scene.pending_rebuilds(), 0);
        assert!(scene.changes().is_empty());
        assert_eq!(scene.tick().rebuilt, 0);
    }

    #[test]
    fn notifications_are_synchronous_and_ordered() {
        let mut scene = Scene::new();
        let id = scene.spawn(&PlaneConfig::default());
        scene
            .update_all(
                id,
                [
                    ParameterUpdate::Lod(Some(0.5)),
                    ParameterUpdate::XSize(Some(3.0)),
                ],
            )
            .unwrap();
        let changes = scene.drain_changes();
        assert_eq!(
            changes,
            vec![(id, PropertyChange::Lod(0.5)), (id, PropertyChange::XSize(3.0))]
        );
        assert!(scene.changes().is_empty());
    }

    #[test]
    fn warnings_are_forwarded() {
        let mut scene = Scene::new();
        let id = scene.spawn(&PlaneConfig::default());
        scene.update(id, ParameterUpdate::Lod(Some(-0.5))).unwrap();
        let warnings = scene.drain_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].1.property(), Property::Lod);
        assert_eq!(scene.get(id).unwrap().params().lod, 0.0);
    }

    #[test]
    fn config_warnings_surface_on_spawn() {
        let mut scene = Scene::new();
        let id = scene.spawn(&PlaneConfig {
            x_size: Some(-2.0),
            ..PlaneConfig::default()
        });
        assert_eq!(scene.warnings().len(), 1);
        assert_eq!(scene.warnings()[0].0, id);
    }

    #[test]
    fn despawn_drops_queued_rebuild() {
        let mut scene = Scene::new();
        let id = scene.spawn(&PlaneConfig::default());
        scene.update(id, ParameterUpdate::XSize(Some(5.0))).unwrap();
        assert_eq!(scene.pending_rebuilds(), 1);

        assert!(scene.despawn(id).is_some());
        assert_eq!(scene.pending_rebuilds(), 0);
        let stats = scene.tick();
        assert_eq!(stats.rebuilt, 0);
    }

    #[test]
    fn unknown_plane_is_an_error() {
        let mut scene = Scene::new();
        let result = scene.update(PlaneId::new(), ParameterUpdate::Lod(None));
        assert!(matches!(result, Err(SceneError::PlaneNotFound(_))));
    }

    #[test]
    fn each_dirty_plane_rebuilds_once() {
        let mut scene = Scene::new();
        let a = scene.spawn(&PlaneConfig::default());
        let b = scene.spawn(&PlaneConfig::default());
        let c = scene.spawn(&PlaneConfig::default());
        for _ in 0..3 {
            scene.update(a, ParameterUpdate::XSize(Some(2.0))).unwrap();
            scene.update(a, ParameterUpdate::XSize(Some(3.0))).unwrap();
            scene.update(b, ParameterUpdate::Lod(Some(0.5))).unwrap();
        }
        let stats = scene.tick();
        assert_eq!(stats.tick, 1);
        assert_eq!(stats.scheduled, 2);
        assert_eq!(stats.rebuilt, 2);
        assert_eq!(scene.get(a).unwrap().rebuild_count(), 1);
        assert_eq!(scene.get(b).unwrap().rebuild_count(), 1);
        assert_eq!(scene.get(c).unwrap().rebuild_count(), 0);
        assert_eq!(scene.stats(), &stats);
    }

    #[test]
    fn mutation_after_tick_schedules_again() {
        let mut scene = Scene::new();
        let id = scene.spawn(&PlaneConfig::default());
        scene.update(id, ParameterUpdate::XSize(Some(2.0))).unwrap();
        scene.tick();
        scene.update(id, ParameterUpdate::XSize(Some(4.0))).unwrap();
        assert_eq!(scene.pending_rebuilds(), 1);
        scene.tick();
        assert_eq!(scene.get(id).unwrap().rebuild_count(), 2);
    }
}
