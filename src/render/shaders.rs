// shaders.rs - Tagged shader file loading and program compilation

use gl::types::*;
use std::collections::HashMap;
use std::ffi::{CStr, CString, NulError};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::ptr;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on the number of info log bytes fetched from the driver.
pub const MAX_INFO_LOG_LEN: usize = 4096;

const SHADER_MARKER: &str = "#shader";

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{kind} shader compilation failed: {log}")]
    Compilation { kind: ShaderKind, log: String },
    #[error("Program linking failed: {0}")]
    Linking(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
}

/// The two shader stages a source file can hold, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex = 0,
    Fragment = 1,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 2] = [ShaderKind::Vertex, ShaderKind::Fragment];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderKind::Vertex => gl::VERTEX_SHADER,
            ShaderKind::Fragment => gl::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "Vertex",
            ShaderKind::Fragment => "Fragment",
        }
    }

    /// Picks the stage named on a `#shader` marker line, if any.
    fn from_marker(line: &str) -> Option<Self> {
        if line.contains("vertex") {
            Some(ShaderKind::Vertex)
        } else if line.contains("fragment") {
            Some(ShaderKind::Fragment)
        } else {
            None
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Vertex and fragment sources split out of a single tagged shader file.
///
/// A file looks like:
///
/// ```text
/// #shader vertex
/// #version 330 core
/// ...
/// #shader fragment
/// #version 330 core
/// ...
/// ```
///
/// Lines before the first marker belong to the vertex section. A section with
/// no marker is left empty and will fail to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    sources: [CString; 2],
}

impl ShaderSource {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ShaderError> {
        let file = File::open(path.as_ref())?;
        Self::parse(BufReader::new(file))
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self, ShaderError> {
        let mut sections = [String::new(), String::new()];
        let mut current = ShaderKind::Vertex;

        for line in reader.lines() {
            let line = line?;
            if line.contains(SHADER_MARKER) {
                if let Some(kind) = ShaderKind::from_marker(&line) {
                    current = kind;
                }
            } else {
                let section = &mut sections[current.index()];
                section.push_str(&line);
                section.push('\n');
            }
        }

        let [vertex, fragment] = sections;
        Ok(Self {
            sources: [CString::new(vertex)?, CString::new(fragment)?],
        })
    }

    pub fn get(&self, kind: ShaderKind) -> &CStr {
        &self.sources[kind.index()]
    }

    pub fn vertex(&self) -> &CStr {
        self.get(ShaderKind::Vertex)
    }

    pub fn fragment(&self) -> &CStr {
        self.get(ShaderKind::Fragment)
    }
}

impl FromStr for ShaderSource {
    type Err = ShaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.as_bytes())
    }
}

/// A linked vertex + fragment program.
pub struct ShaderProgram {
    id: GLuint,
    uniforms: HashMap<String, GLint>,
}

impl ShaderProgram {
    pub fn from_source(source: &ShaderSource) -> Result<Self, ShaderError> {
        let vertex_shader = Self::compile_shader(ShaderKind::Vertex, source.vertex())?;
        let fragment_shader = match Self::compile_shader(ShaderKind::Fragment, source.fragment()) {
            Ok(shader) => shader,
            Err(e) => {
                unsafe { gl::DeleteShader(vertex_shader) };
                return Err(e);
            }
        };

        let program = unsafe { gl::CreateProgram() };
        let linked = unsafe {
            gl::AttachShader(program, vertex_shader);
            gl::AttachShader(program, fragment_shader);
            gl::LinkProgram(program);
            let linked = Self::check_link_status(program);
            gl::DeleteShader(vertex_shader);
            gl::DeleteShader(fragment_shader);
            linked
        };

        if let Err(e) = linked {
            unsafe { gl::DeleteProgram(program) };
            return Err(e);
        }

        Self::validate(program);
        log::debug!("Linked shader program {}", program);

        Ok(ShaderProgram {
            id: program,
            uniforms: HashMap::new(),
        })
    }

    /// Compiles one stage. On failure the driver log is reported and the
    /// shader object is deleted before returning.
    pub fn compile_shader(kind: ShaderKind, source: &CStr) -> Result<GLuint, ShaderError> {
        let shader = unsafe { gl::CreateShader(kind.gl_enum()) };

        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
            gl::CompileShader(shader);
        }

        let mut success = GLint::from(gl::FALSE);
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }

        if success == GLint::from(gl::FALSE) {
            let mut len = 0;
            unsafe {
                gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            }

            let mut buffer = info_log_buffer(len);
            let mut written = 0;
            unsafe {
                gl::GetShaderInfoLog(
                    shader,
                    buffer.len() as GLsizei,
                    &mut written,
                    buffer.as_mut_ptr() as *mut GLchar,
                );
                gl::DeleteShader(shader);
            }

            let log = info_log_to_string(&buffer, written);
            log::error!("Failed to compile {} shader!", kind);
            log::error!("{}", log);
            return Err(ShaderError::Compilation { kind, log });
        }

        Ok(shader)
    }

    unsafe fn check_link_status(program: GLuint) -> Result<(), ShaderError> {
        let mut success = GLint::from(gl::FALSE);
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);

        if success == GLint::from(gl::FALSE) {
            let log = Self::program_info_log(program);
            log::error!("Failed to link shader program: {}", log);
            return Err(ShaderError::Linking(log));
        }

        Ok(())
    }

    fn validate(program: GLuint) {
        let mut valid = GLint::from(gl::FALSE);
        unsafe {
            gl::ValidateProgram(program);
            gl::GetProgramiv(program, gl::VALIDATE_STATUS, &mut valid);
        }

        if valid == GLint::from(gl::FALSE) {
            let log = unsafe { Self::program_info_log(program) };
            log::warn!("Shader program {} failed validation: {}", program, log);
        }
    }

    unsafe fn program_info_log(program: GLuint) -> String {
        let mut len = 0;
        gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);

        let mut buffer = info_log_buffer(len);
        let mut written = 0;
        gl::GetProgramInfoLog(
            program,
            buffer.len() as GLsizei,
            &mut written,
            buffer.as_mut_ptr() as *mut GLchar,
        );

        info_log_to_string(&buffer, written)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_used(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    pub fn uniform_location(&mut self, name: &str) -> Result<GLint, ShaderError> {
        if let Some(location) = self.uniforms.get(name) {
            return Ok(*location);
        }

        let cname = CString::new(name)?;
        let location = unsafe { gl::GetUniformLocation(self.id, cname.as_ptr()) };

        if location == -1 {
            log::warn!("Uniform '{}' not found in shader", name);
        }

        self.uniforms.insert(name.to_string(), location);
        Ok(location)
    }

    pub fn set_uniform_4f(&mut self, name: &str, value: [f32; 4]) -> Result<(), ShaderError> {
        self.set_used();
        let location = self.uniform_location(name)?;
        unsafe {
            gl::Uniform4f(location, value[0], value[1], value[2], value[3]);
        }
        Ok(())
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) };
    }
}

fn info_log_buffer(reported_len: GLint) -> Vec<u8> {
    let len = usize::try_from(reported_len).unwrap_or(0).clamp(1, MAX_INFO_LOG_LEN);
    vec![0; len]
}

/// Turns a driver-filled log buffer into text, dropping the trailing null
/// and any trailing whitespace.
fn info_log_to_string(buffer: &[u8], written: GLsizei) -> String {
    let written = usize::try_from(written).unwrap_or(0).min(buffer.len());
    let bytes = &buffer[..written];
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_splits_tagged_sections() {
        let source: ShaderSource = "#shader vertex\nA\n#shader fragment\nB\n".parse().unwrap();

        assert_eq!(source.vertex().to_bytes_with_nul(), b"A\n\0");
        assert_eq!(source.fragment().to_bytes_with_nul(), b"B\n\0");
    }

    #[test]
    fn test_multiline_sections_keep_line_order() {
        let text = "#shader vertex\n#version 330 core\nvoid main() {}\n\
                    #shader fragment\n#version 330 core\nout vec4 color;\nvoid main() {}\n";
        let source: ShaderSource = text.parse().unwrap();

        assert_eq!(
            source.vertex().to_str().unwrap(),
            "#version 330 core\nvoid main() {}\n"
        );
        assert_eq!(
            source.fragment().to_str().unwrap(),
            "#version 330 core\nout vec4 color;\nvoid main() {}\n"
        );
    }

    #[test]
    fn test_missing_section_is_only_terminator() {
        let source: ShaderSource = "#shader vertex\nA\n".parse().unwrap();

        assert_eq!(source.vertex().to_bytes_with_nul(), b"A\n\0");
        assert_eq!(source.fragment().to_bytes_with_nul(), b"\0");

        let source: ShaderSource = "#shader fragment\nB\n".parse().unwrap();
        assert_eq!(source.vertex().to_bytes_with_nul(), b"\0");
        assert_eq!(source.get(ShaderKind::Fragment).to_bytes_with_nul(), b"B\n\0");
    }

    #[test]
    fn test_lines_before_marker_go_to_vertex() {
        let source: ShaderSource = "pre\n#shader fragment\nB\n".parse().unwrap();
        assert_eq!(source.vertex().to_bytes(), b"pre\n");
        assert_eq!(source.fragment().to_bytes(), b"B\n");
    }

    #[test]
    fn test_unknown_marker_keeps_current_section() {
        let source: ShaderSource = "#shader fragment\nB\n#shader geometry\nC\n".parse().unwrap();
        assert_eq!(source.fragment().to_bytes(), b"B\nC\n");
        assert!(source.vertex().to_bytes().is_empty());
    }

    #[test]
    fn test_crlf_line_endings_are_normalized() {
        let source: ShaderSource = "#shader vertex\r\nA\r\n#shader fragment\r\nB\r\n".parse().unwrap();
        assert_eq!(source.vertex().to_bytes(), b"A\n");
        assert_eq!(source.fragment().to_bytes(), b"B\n");
    }

    #[test]
    fn test_interior_nul_is_rejected() {
        let result = "#shader vertex\nA\0B\n".parse::<ShaderSource>();
        assert!(matches!(result, Err(ShaderError::Nul(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "#shader vertex\nA\n#shader fragment\nB\n").unwrap();

        let source = ShaderSource::from_file(file.path()).unwrap();
        assert_eq!(source.vertex().to_bytes_with_nul(), b"A\n\0");
        assert_eq!(source.fragment().to_bytes_with_nul(), b"B\n\0");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ShaderSource::from_file(dir.path().join("missing.shader"));
        assert!(matches!(result, Err(ShaderError::Io(_))));
    }

    #[test]
    fn test_kind_slots_and_names() {
        assert_eq!(ShaderKind::Vertex.index(), 0);
        assert_eq!(ShaderKind::Fragment.index(), 1);
        assert_eq!(ShaderKind::Vertex.gl_enum(), gl::VERTEX_SHADER);
        assert_eq!(ShaderKind::Fragment.gl_enum(), gl::FRAGMENT_SHADER);
        assert_eq!(ShaderKind::Fragment.to_string(), "Fragment");
    }

    #[test]
    fn test_compilation_error_names_stage() {
        let err = ShaderError::Compilation {
            kind: ShaderKind::Vertex,
            log: "0:1(1): error: syntax error".into(),
        };
        assert_eq!(
            err.to_string(),
            "Vertex shader compilation failed: 0:1(1): error: syntax error"
        );
    }

    #[test]
    fn test_info_log_trimming() {
        let buffer = b"0:3(1): error: unexpected token\n\0\0\0";
        assert_eq!(
            info_log_to_string(buffer, 33),
            "0:3(1): error: unexpected token"
        );
        assert_eq!(info_log_to_string(buffer, -1), "");
        assert_eq!(info_log_to_string(b"abc", 99), "abc");
    }

    #[test]
    fn test_info_log_buffer_is_bounded() {
        assert_eq!(info_log_buffer(0).len(), 1);
        assert_eq!(info_log_buffer(-5).len(), 1);
        assert_eq!(info_log_buffer(128).len(), 128);
        assert_eq!(info_log_buffer(1 << 20).len(), MAX_INFO_LOG_LEN);
    }
}
