use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Test".to_string(),
            width: 500,
            height: 500,
            resizable: false,
            vsync: true,
        }
    }
}

/// Requested OpenGL core profile version. No fallback is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub major: u8,
    pub minor: u8,
}

impl ContextConfig {
    pub const MIN_VERSION: (u8, u8) = (3, 3);

    pub fn version(&self) -> (u8, u8) {
        (self.major, self.minor)
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { major: 4, minor: 3 }
    }
}
