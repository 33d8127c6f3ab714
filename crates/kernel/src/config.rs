use gridplane_mesh::GridParameters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::params::{
    DEFAULT_X_SIZE, DEFAULT_Y_SIZE, ParameterWarning, Property, sanitize_lod, sanitize_segments,
    sanitize_size,
};

/// Errors from loading a plane configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Construction-time configuration for a plane.
///
/// Every field is optional. Values go through the same sanitizing as the
/// individual setters, so a config can never produce an invalid plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaneConfig {
    pub x_size: Option<f32>,
    pub y_size: Option<f32>,
    pub x_segments: Option<i32>,
    pub y_segments: Option<i32>,
    pub lod: Option<f64>,
    /// Carried for consumers that derive shading normals; tessellation ignores it.
    pub auto_normals: bool,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            x_size: None,
            y_size: None,
            x_segments: None,
            y_segments: None,
            lod: None,
            auto_normals: true,
        }
    }
}

impl PlaneConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, ConfigError> = match ext.as_deref() {
            Some("json") => Self::from_json_str,
            Some("yaml" | "yml") => Self::from_yaml_str,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        let data = std::fs::read_to_string(path)?;
        parse(&data)
    }

    /// Resolve to stored parameters, collecting any corrections made on the way.
    pub fn sanitize(&self) -> (PlaneParams, Vec<ParameterWarning>) {
        let x_size = sanitize_size(Property::XSize, self.x_size, DEFAULT_X_SIZE);
        let y_size = sanitize_size(Property::YSize, self.y_size, DEFAULT_Y_SIZE);
        let x_segments = sanitize_segments(Property::XSegments, self.x_segments);
        let y_segments = sanitize_segments(Property::YSegments, self.y_segments);
        let lod = sanitize_lod(self.lod);

        let warnings = [
            x_size.warning,
            y_size.warning,
            x_segments.warning,
            y_segments.warning,
            lod.warning,
        ]
        .into_iter()
        .flatten()
        .collect();

        let params = PlaneParams {
            x_size: x_size.value,
            y_size: y_size.value,
            x_segments: x_segments.value,
            y_segments: y_segments.value,
            lod: lod.value,
            auto_normals: self.auto_normals,
        };
        (params, warnings)
    }
}

/// Stored, already-sanitized plane parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneParams {
    pub x_size: f32,
    pub y_size: f32,
    pub x_segments: u32,
    pub y_segments: u32,
    pub lod: f64,
    pub auto_normals: bool,
}

impl Default for PlaneParams {
    fn default() -> Self {
        PlaneConfig::default().sanitize().0
    }
}

impl PlaneParams {
    /// Tessellator inputs for these parameters.
    pub fn grid(&self) -> GridParameters {
        GridParameters {
            width: self.x_size,
            height: self.y_size,
            x_segments: self.x_segments,
            y_segments: self.y_segments,
            lod: self.lod,
        }
    }
}

/// Persisted shape of a plane.
///
/// LOD is left out on purpose: it is a view-dependent quality setting, not part
/// of the shape. Restoring a snapshot yields full detail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneSnapshot {
    pub x_size: f32,
    pub y_size: f32,
    pub x_segments: u32,
    pub y_segments: u32,
}

impl From<&PlaneParams> for PlaneSnapshot {
    fn from(p: &PlaneParams) -> Self {
        Self {
            x_size: p.x_size,
            y_size: p.y_size,
            x_segments: p.x_segments,
            y_segments: p.y_segments,
        }
    }
}

impl PlaneSnapshot {
    /// Config that rebuilds this shape. Segment counts beyond `i32::MAX` saturate.
    pub fn to_config(&self) -> PlaneConfig {
        PlaneConfig {
            x_size: Some(self.x_size),
            y_size: Some(self.y_size),
            x_segments: Some(i32::try_from(self.x_segments).unwrap_or(i32::MAX)),
            y_segments: Some(i32::try_from(self.y_segments).unwrap_or(i32::MAX)),
            ..PlaneConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let (params, warnings) = PlaneConfig::default().sanitize();
        assert!(warnings.is_empty());
        assert_eq!(params.x_size, 1.0);
        assert_eq!(params.y_size, 0.25);
        assert_eq!(params.x_segments, 4);
        assert_eq!(params.y_segments, 4);
        assert_eq!(params.lod, 1.0);
        assert!(params.auto_normals);
        assert_eq!(params, PlaneParams::default());
    }

    #[test]
    fn json_partial_config() {
        let config = PlaneConfig::from_json_str(r#"{"xSize": 2.5, "ySegments": 8, "lod": 0.5}"#)
            .unwrap();
        assert_eq!(config.x_size, Some(2.5));
        assert_eq!(config.y_size, None);
        assert_eq!(config.y_segments, Some(8));
        assert!(config.auto_normals);
    }

    #[test]
    fn yaml_config() {
        let config = PlaneConfig::from_yaml_str("xSize: 3\nxSegments: -2\nautoNormals: false\n")
            .unwrap();
        let (params, warnings) = config.sanitize();
        assert_eq!(params.x_size, 3.0);
        assert_eq!(params.x_segments, 2);
        assert!(!params.auto_normals);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].property(), Property::XSegments);
    }

    #[test]
    fn sanitize_collects_every_correction() {
        let config = PlaneConfig {
            x_size: Some(-1.0),
            y_size: Some(-2.0),
            lod: Some(7.0),
            ..PlaneConfig::default()
        };
        let (params, warnings) = config.sanitize();
        assert_eq!(params.x_size, 1.0);
        assert_eq!(params.y_size, 2.0);
        assert_eq!(params.lod, 1.0);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn load_by_extension() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"xSize": 4}}"#).unwrap();
        assert_eq!(PlaneConfig::load(json.path()).unwrap().x_size, Some(4.0));

        let mut yaml = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(yaml, "ySize: 0.5").unwrap();
        assert_eq!(PlaneConfig::load(yaml.path()).unwrap().y_size, Some(0.5));

        let toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            PlaneConfig::load(toml.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn snapshot_omits_lod() {
        let (params, _) = PlaneConfig {
            x_size: Some(2.0),
            lod: Some(0.25),
            ..PlaneConfig::default()
        }
        .sanitize();
        let snap = PlaneSnapshot::from(&params);
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"{"xSize":2.0,"ySize":0.25,"xSegments":4,"ySegments":4}"#);
        assert!(snap.to_config().lod.is_none());
    }
}
