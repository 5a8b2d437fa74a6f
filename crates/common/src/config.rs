use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or saving engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Top-level engine configuration. Every field falls back to its default
/// when absent from the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub terrain: TerrainConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Blockfield".into(),
            width: 1024,
            height: 768,
            vsync: true,
        }
    }
}

/// Fly camera parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance moved per tick while a movement key is held.
    pub move_step: f32,
    /// Mouse pixels per radian of rotation.
    pub mouse_divisor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [5.0, 10.0, -5.0],
            fov_degrees: 60.0,
            near: 0.0625,
            far: 256.0,
            move_step: 0.1,
            mouse_divisor: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub chunk_size: u32,
    pub seed: u32,
    /// Grid cells per unit of noise input.
    pub noise_scale: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            seed: 0,
            noise_scale: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 4],
    pub depth_test: bool,
    pub textures: [PathBuf; 2],
    /// Shader program file. The backend's built-in program is used when unset.
    pub shader: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 0.0],
            depth_test: true,
            textures: [
                PathBuf::from("resources/hello1.png"),
                PathBuf::from("resources/hello2.png"),
            ],
            shader: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Load from `path` if given, otherwise return defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_yaml()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
