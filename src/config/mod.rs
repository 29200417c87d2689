pub mod rendering;
pub mod window;

pub use rendering::{AnimationConfig, ShaderConfig};
pub use window::{ContextConfig, WindowConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything the sandbox reads at startup. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub window: WindowConfig,
    pub context: ContextConfig,
    pub shader: ShaderConfig,
    pub animation: AnimationConfig,
}

impl SandboxConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        log::info!("Loading config from {}", path.display());
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self.context.version() < ContextConfig::MIN_VERSION {
            let (major, minor) = ContextConfig::MIN_VERSION;
            return Err(ConfigError::Invalid(format!(
                "OpenGL {}.{} is below the minimum {}.{}",
                self.context.major, self.context.minor, major, minor
            )));
        }

        let step = self.animation.step;
        if !(step > 0.0 && step <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "animation step must be in (0, 1], got {}",
                step
            )));
        }

        if self
            .animation
            .base_color
            .iter()
            .any(|c| !(0.0..=1.0).contains(c))
        {
            return Err(ConfigError::Invalid(
                "base_color channels must be in [0, 1]".to_string(),
            ));
        }

        if self.shader.color_uniform.is_empty() {
            return Err(ConfigError::Invalid(
                "color_uniform must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
