pub mod buffer;
pub mod pipeline;
pub mod shaders;

pub use buffer::{IndexBuffer, VertexArray, VertexBuffer};
pub use pipeline::RenderPipeline;
pub use shaders::{ShaderError, ShaderKind, ShaderProgram, ShaderSource};
