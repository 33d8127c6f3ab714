use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a plane owned by a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaneId(pub Uuid);

impl PlaneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and summaries.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for PlaneId {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Bounds enclosing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_id_uniqueness() {
        let a = PlaneId::new();
        let b = PlaneId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn plane_id_short_is_eight_chars() {
        assert_eq!(PlaneId::new().short().len(), 8);
    }

    #[test]
    fn bounds_from_points() {
        let b = Bounds::from_points([
            Vec3::new(-1.0, 2.0, 0.0),
            Vec3::new(3.0, -4.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ])
        .unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(b.max, Vec3::new(3.0, 2.0, 1.0));
        assert_eq!(b.size(), Vec3::new(4.0, 6.0, 1.0));
        assert_eq!(b.center(), Vec3::new(1.0, -1.0, 0.5));
    }

    #[test]
    fn bounds_of_nothing() {
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }
}
