use crate::config::{AnimationConfig, ShaderConfig};
use crate::render::buffer::{IndexBuffer, VertexArray, VertexBuffer};
use crate::render::shaders::{ShaderError, ShaderProgram, ShaderSource};
use crate::utils::math::Oscillator;
use gl::types::*;
use std::ptr;

/// Corners of the quad in clip space, two floats each.
pub const QUAD_POSITIONS: [f32; 8] = [
    -0.5, 0.5, // top left
    0.5, 0.5, // top right
    0.5, -0.5, // bottom right
    -0.5, -0.5, // bottom left
];

/// Two triangles covering the quad.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

const POSITION_COMPONENTS: GLint = 2;

/// Everything needed to draw the animated quad each frame.
pub struct RenderPipeline {
    program: ShaderProgram,
    index_buffer: IndexBuffer,
    vertex_buffer: VertexBuffer,
    vertex_array: VertexArray,
    color_uniform: String,
    base_color: [f32; 4],
    pulse: Oscillator,
}

impl RenderPipeline {
    /// Uploads the quad and links the program. Needs a current GL context.
    pub fn new(
        source: &ShaderSource,
        shader: &ShaderConfig,
        animation: &AnimationConfig,
    ) -> Result<Self, ShaderError> {
        let vertex_array = VertexArray::new();
        let vertex_buffer = VertexBuffer::new(&QUAD_POSITIONS);
        vertex_array.float_attribute(0, POSITION_COMPONENTS);
        let index_buffer = IndexBuffer::new(&QUAD_INDICES);

        let mut program = ShaderProgram::from_source(source)?;
        program.set_uniform_4f(&shader.color_uniform, animation.base_color)?;

        Ok(Self {
            program,
            index_buffer,
            vertex_buffer,
            vertex_array,
            color_uniform: shader.color_uniform.clone(),
            base_color: animation.base_color,
            pulse: Oscillator::new(0.0, animation.step),
        })
    }

    /// The color the next frame will be drawn with.
    pub fn current_color(&self) -> [f32; 4] {
        pulse_color(self.base_color, self.pulse.value())
    }

    pub fn draw_frame(&mut self) -> Result<(), ShaderError> {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        let color = self.current_color();
        self.program.set_uniform_4f(&self.color_uniform, color)?;

        self.vertex_array.bind();
        self.index_buffer.bind();
        unsafe {
            gl::DrawElements(
                gl::TRIANGLES,
                self.index_buffer.count() as GLsizei,
                gl::UNSIGNED_INT,
                ptr::null(),
            );
        }

        self.pulse.advance();
        Ok(())
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &IndexBuffer {
        &self.index_buffer
    }
}

fn pulse_color(base: [f32; 4], red: f32) -> [f32; 4] {
    [red, base[1], base[2], base[3]]
}
