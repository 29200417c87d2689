pub mod config;
pub mod engine;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use config::SandboxConfig;
pub use engine::{Sandbox, SessionState};
pub use render::pipeline::RenderPipeline;
pub use render::shaders::{ShaderProgram, ShaderSource};
pub use utils::error::SandboxError;
pub use utils::math::Oscillator;
