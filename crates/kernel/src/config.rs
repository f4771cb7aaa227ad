//! Scene description loaded from YAML.
//!
//! Every field has a default, so an empty document yields the reference
//! scene: four unit blocks and a camera at (0, 1.5, 5).

use crate::camera::{DEFAULT_SENSITIVITY, PITCH_LIMIT};
use crate::motion::{DEFAULT_DRAG, DEFAULT_SPEED};
use blockview_common::MoveIntent;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Errors from loading or validating a scene config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: String, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Degrees.
    pub pitch: f32,
    /// Degrees.
    pub yaw: f32,
    pub speed: f32,
    pub drag: f32,
    /// Degrees per pointer unit.
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.5, 5.0),
            pitch: 0.0,
            yaw: 0.0,
            speed: DEFAULT_SPEED,
            drag: DEFAULT_DRAG,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl ProjectionConfig {
    /// Right-handed perspective with a [0, 1] depth range.
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockConfig {
    pub position: Vec3,
    /// Edge length of the shared mesh.
    pub size: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub scale: f32,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            size: 1.0,
            pitch: 0.0,
            yaw: 0.0,
            scale: 1.0,
        }
    }
}

impl BlockConfig {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub blocks: Vec<BlockConfig>,
    /// Key name to intent overrides, on top of the default WASD/arrow bindings.
    pub bindings: BTreeMap<String, MoveIntent>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            blocks: vec![
                BlockConfig::at(0.0, 0.0, 0.0),
                BlockConfig::at(-2.0, 0.0, 0.0),
                BlockConfig::at(2.0, 0.0, -2.0),
                BlockConfig::at(0.0, 3.0, 0.0),
            ],
            bindings: BTreeMap::new(),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), blocks = config.blocks.len(), "loaded scene config");
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        finite_vec("camera.position", cam.position)?;
        finite("camera.yaw", cam.yaw)?;
        finite("camera.pitch", cam.pitch)?;
        if cam.pitch.abs() > PITCH_LIMIT {
            return Err(invalid("camera.pitch", "must be within [-90, 90]"));
        }
        positive("camera.speed", cam.speed)?;
        positive("camera.drag", cam.drag)?;
        positive("camera.sensitivity", cam.sensitivity)?;

        let proj = &self.projection;
        positive("projection.fov_degrees", proj.fov_degrees)?;
        if proj.fov_degrees >= 180.0 {
            return Err(invalid("projection.fov_degrees", "must be below 180"));
        }
        positive("projection.near", proj.near)?;
        finite("projection.far", proj.far)?;
        if proj.far <= proj.near {
            return Err(invalid("projection.far", "must be greater than near"));
        }

        for (i, block) in self.blocks.iter().enumerate() {
            finite_vec(&format!("blocks[{i}].position"), block.position)?;
            non_negative(&format!("blocks[{i}].size"), block.size)?;
            finite(&format!("blocks[{i}].pitch"), block.pitch)?;
            finite(&format!("blocks[{i}].yaw"), block.yaw)?;
            positive(&format!("blocks[{i}].scale"), block.scale)?;
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason,
    }
}

fn finite(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

fn finite_vec(field: &str, value: Vec3) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be positive"))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must not be negative"))
    }
}
