use gridplane_common::PlaneId;
use gridplane_kernel::{PlaneGeometry, PlaneSnapshot, Scene};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Current snapshot schema version.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Errors from snapshot persistence.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
}

/// Content-addressed snapshot of every plane shape in a scene.
///
/// Only persisted shape is captured; LOD and pending rebuilds are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub schema_version: u32,
    pub planes: BTreeMap<PlaneId, PlaneSnapshot>,
    /// Hex SHA-256 over the plane shapes in id order.
    pub sha256: String,
}

impl SceneSnapshot {
    /// Capture the shapes of all planes in the scene.
    pub fn capture(scene: &Scene) -> Self {
        let planes: BTreeMap<PlaneId, PlaneSnapshot> = scene
            .planes()
            .iter()
            .map(|(id, plane)| (*id, plane.snapshot()))
            .collect();
        let sha256 = content_hash(&planes);
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            planes,
            sha256,
        }
    }

    /// Verify integrity by recomputing the hash.
    pub fn verify(&self) -> bool {
        self.sha256 == content_hash(&self.planes)
    }

    /// Rebuild a scene with the same plane ids, every plane at full detail.
    pub fn restore(&self) -> Scene {
        let mut scene = Scene::new();
        for (id, snap) in &self.planes {
            scene.insert(*id, PlaneGeometry::from_snapshot(snap));
        }
        scene
    }

    /// Write the snapshot as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer_pretty(file, self)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            planes = self.planes.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// Read a snapshot, rejecting unknown schema versions and corrupted content.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let file = std::fs::File::open(path.as_ref())?;
        let snap: Self = serde_json::from_reader(file)?;
        if snap.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(PersistError::SchemaMismatch {
                file_version: snap.schema_version,
                expected_version: SNAPSHOT_SCHEMA_VERSION,
            });
        }
        let actual = content_hash(&snap.planes);
        if snap.sha256 != actual {
            return Err(PersistError::IntegrityMismatch {
                expected: snap.sha256,
                actual,
            });
        }
        Ok(snap)
    }
}

fn content_hash(planes: &BTreeMap<PlaneId, PlaneSnapshot>) -> String {
    let mut hasher = Sha256::new();
    for (id, p) in planes {
        hasher.update(id.0.as_bytes());
        hasher.update(p.x_size.to_le_bytes());
        hasher.update(p.y_size.to_le_bytes());
        hasher.update(p.x_segments.to_le_bytes());
        hasher.update(p.y_segments.to_le_bytes());
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
