use crate::config::ConfigError;
use crate::render::shaders::ShaderError;
use thiserror::Error;

/// Setup failures. Any of these ends the session.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("Window creation failed: {0}")]
    Window(String),

    #[error("No usable GL display: {0}")]
    Display(String),

    #[error("GL context error: {0}")]
    Context(#[from] glutin::error::Error),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to load OpenGL functions")]
    GlLoad,

    #[error("Invalid session transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: crate::engine::SessionState,
        to: crate::engine::SessionState,
    },

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
