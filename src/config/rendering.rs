use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub path: PathBuf,
    pub color_uniform: String,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("res/shaders/Basic.shader"),
            color_uniform: "u_Color".to_string(),
        }
    }
}

/// Drives the animated color. Only the red channel of `base_color` moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub step: f32,
    pub base_color: [f32; 4],
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            step: 0.05,
            base_color: [0.2, 0.3, 0.8, 1.0],
        }
    }
}
