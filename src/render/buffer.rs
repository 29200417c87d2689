use bytemuck::Pod;
use gl::types::*;
use std::mem;
use std::ptr;

/// GPU vertex data bound to `GL_ARRAY_BUFFER`.
///
/// `close` consumes the buffer, so it cannot be bound afterwards:
///
/// ```compile_fail
/// # use glsandbox::render::buffer::VertexBuffer;
/// # fn demo(buffer: VertexBuffer) {
/// buffer.close();
/// buffer.bind();
/// # }
/// ```
#[derive(Debug)]
pub struct VertexBuffer {
    id: GLuint,
}

impl VertexBuffer {
    /// Allocates a buffer and uploads `data` with a static usage hint.
    /// The buffer is left bound.
    pub fn new<T: Pod>(data: &[T]) -> Self {
        let id = upload(gl::ARRAY_BUFFER, bytemuck::cast_slice(data));
        Self { id }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn bind(&self) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, self.id) };
    }

    pub fn unbind(&self) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, 0) };
    }

    /// Deletes the GPU allocation.
    pub fn close(mut self) {
        delete_buffer(&mut self.id);
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        delete_buffer(&mut self.id);
    }
}

/// GPU index data bound to `GL_ELEMENT_ARRAY_BUFFER`.
///
/// ```compile_fail
/// # use glsandbox::render::buffer::IndexBuffer;
/// # fn demo(buffer: IndexBuffer) {
/// buffer.close();
/// let _ = buffer.count();
/// # }
/// ```
#[derive(Debug)]
pub struct IndexBuffer {
    id: GLuint,
    count: usize,
}

impl IndexBuffer {
    /// Allocates a buffer and uploads `indices`. The buffer is left bound.
    pub fn new(indices: &[u32]) -> Self {
        let id = upload(gl::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(indices));
        Self {
            id,
            count: indices.len(),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Number of indices, as passed to the draw call.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn bind(&self) {
        unsafe { gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, self.id) };
    }

    pub fn unbind(&self) {
        unsafe { gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0) };
    }

    pub fn close(mut self) {
        delete_buffer(&mut self.id);
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        delete_buffer(&mut self.id);
    }
}

/// Vertex attribute layout for the bound buffers.
#[derive(Debug)]
pub struct VertexArray {
    id: GLuint,
}

impl VertexArray {
    /// Generates a vertex array and leaves it bound.
    pub fn new() -> Self {
        let mut id = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut id);
            gl::BindVertexArray(id);
        }
        Self { id }
    }

    pub fn bind(&self) {
        unsafe { gl::BindVertexArray(self.id) };
    }

    pub fn unbind(&self) {
        unsafe { gl::BindVertexArray(0) };
    }

    /// Enables a tightly packed float attribute sourced from the currently
    /// bound array buffer.
    pub fn float_attribute(&self, index: GLuint, components: GLint) {
        self.bind();
        unsafe {
            gl::EnableVertexAttribArray(index);
            gl::VertexAttribPointer(
                index,
                components,
                gl::FLOAT,
                gl::FALSE,
                components * mem::size_of::<f32>() as GLint,
                ptr::null(),
            );
        }
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        unsafe { gl::DeleteVertexArrays(1, &self.id) };
    }
}

fn upload(target: GLenum, bytes: &[u8]) -> GLuint {
    let mut id = 0;
    unsafe {
        gl::GenBuffers(1, &mut id);
        gl::BindBuffer(target, id);
        gl::BufferData(
            target,
            bytes.len() as GLsizeiptr,
            bytes.as_ptr() as *const _,
            gl::STATIC_DRAW,
        );
    }
    id
}

fn delete_buffer(id: &mut GLuint) {
    if *id != 0 {
        unsafe { gl::DeleteBuffers(1, id) };
        *id = 0;
    }
}
