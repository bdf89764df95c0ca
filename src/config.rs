//! Editor configuration.
//!
//! Every tunable of the viewer lives here with the defaults the viewer ships
//! with. A JSON file named by `MESHVIEW_CONFIG` may override any subset of
//! fields; `MESHVIEW_CONTENT` overrides the content root alone.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "MESHVIEW_CONFIG";
pub const CONTENT_ENV: &str = "MESHVIEW_CONTENT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Directory every resource name is resolved against.
    pub content_root: PathBuf,
    /// Fixed timer cadence driving both simulation and render.
    pub tick_interval_ms: u64,
    /// World units travelled per tick per held movement key.
    pub move_step: f32,
    /// Screen pixels per radian of drag rotation.
    pub drag_sensitivity: f32,
    /// Radians per second of the foreground spin animation.
    pub spin_rate: f32,
    pub camera: CameraConfig,
    pub scene: SceneManifest,
    pub window: WindowConfig,
    pub log: LogConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("GameContent"),
            tick_interval_ms: 15,
            move_step: 0.2,
            drag_sensitivity: 200.0,
            spin_rate: 0.2,
            camera: CameraConfig::default(),
            scene: SceneManifest::default(),
            window: WindowConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Defaults, then `MESHVIEW_CONFIG`, then `MESHVIEW_CONTENT`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(root) = env::var_os(CONTENT_ENV) {
            config.content_root = PathBuf::from(root);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if self.drag_sensitivity == 0.0 || !self.drag_sensitivity.is_finite() {
            return Err(ConfigError::Invalid("drag_sensitivity must be finite and non-zero".into()));
        }
        if !self.move_step.is_finite() {
            return Err(ConfigError::Invalid("move_step must be finite".into()));
        }
        if !self.spin_rate.is_finite() {
            return Err(ConfigError::Invalid("spin_rate must be finite".into()));
        }
        if !(self.camera.fov_y_degrees > 0.0 && self.camera.fov_y_degrees < 180.0) {
            return Err(ConfigError::Invalid("camera.fov_y_degrees must be in (0, 180)".into()));
        }
        if !(self.camera.z_near > 0.0 && self.camera.z_near < self.camera.z_far) {
            return Err(ConfigError::Invalid("camera planes must satisfy 0 < z_near < z_far".into()));
        }
        if self.scene.instance_materials.is_empty() {
            return Err(ConfigError::Invalid("scene needs at least one foreground material set".into()));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub start_position: Vec3,
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            // forward axis * 10
            start_position: Vec3::new(0.0, 0.0, 10.0),
            fov_y_degrees: 45.0,
            z_near: 0.1,
            z_far: 1000.0,
        }
    }
}

/// File names of the four PBR maps of one material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialPaths {
    pub diffuse: String,
    pub normal: String,
    pub metallic: String,
    pub roughness: String,
}

impl MaterialPaths {
    pub fn new(diffuse: &str, normal: &str, metallic: &str, roughness: &str) -> Self {
        Self {
            diffuse: diffuse.to_string(),
            normal: normal.to_string(),
            metallic: metallic.to_string(),
            roughness: roughness.to_string(),
        }
    }

    /// `<prefix>_c`, `_n`, `_m`, `_r` with the given extension.
    pub fn with_prefix(prefix: &str, ext: &str) -> Self {
        Self {
            diffuse: format!("{prefix}_c.{ext}"),
            normal: format!("{prefix}_n.{ext}"),
            metallic: format!("{prefix}_m.{ext}"),
            roughness: format!("{prefix}_r.{ext}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneManifest {
    pub model: String,
    /// One foreground instance is drawn per entry.
    pub instance_materials: Vec<MaterialPaths>,
    pub first_instance_x: f32,
    pub instance_spacing: f32,
    pub ground_model: String,
    pub ground_material: MaterialPaths,
    pub ground_scale: f32,
    pub ground_offset: Vec3,
    pub environment_map: String,
}

impl Default for SceneManifest {
    fn default() -> Self {
        Self {
            model: "material_sample.fbx".into(),
            instance_materials: vec![
                MaterialPaths::new(
                    "DefaultMaterial_Base_Color.png",
                    "DefaultMaterial_Normal_DirectX.png",
                    "DefaultMaterial_Metallic.png",
                    "DefaultMaterial_Roughness.png",
                ),
                MaterialPaths::with_prefix("t1", "png"),
                MaterialPaths::with_prefix("t2", "png"),
            ],
            first_instance_x: -3.0,
            instance_spacing: 3.0,
            ground_model: "floor.fbx".into(),
            ground_material: MaterialPaths::with_prefix("floor", "png"),
            ground_scale: 10.0,
            ground_offset: Vec3::new(0.0, -1.7, 0.0),
            environment_map: "yoko.dds".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Borderless and maximised once the window is up.
    pub borderless_maximized: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "meshview".into(),
            width: 1280,
            height: 720,
            borderless_maximized: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            file: PathBuf::from("logs/meshview.log"),
        }
    }
}
