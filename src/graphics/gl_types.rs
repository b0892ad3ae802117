//! Plain-data types shared by every driver: object handles, shader stages, primitive kinds and
//! uniform values.
//!
//! Handles are thin wrappers around the `GLuint` names OpenGL hands back. They carry no lifetime
//! information of their own; whoever holds a [`CompiledShader`](super::shader::CompiledShader),
//! [`ShaderProgram`](super::program::ShaderProgram), [`Mesh`](super::renderer::Mesh) or
//! [`Texture`](super::texture::Texture) owns the underlying object and is responsible for
//! releasing it through the driver.

use std::fmt;

use gl;
use gl::types::*;

/// Name of a shader object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub GLuint);

/// Name of a program object (the linked graphics pipeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub GLuint);

/// Name of a [vertex buffer object (VBO)](vbo).
///
/// [vbo]: https://en.wikipedia.org/wiki/Vertex_buffer_object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub GLuint);

/// Name of a vertex array object, which remembers the attribute pointers set up while it was
/// bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayId(pub GLuint);

/// Name of a texture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub GLuint);

/// Location of a uniform inside a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub GLint);

/// The pipeline stage a shader runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex = gl::VERTEX_SHADER as isize,
    Fragment = gl::FRAGMENT_SHADER as isize,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        self as GLenum
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// How consecutive vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Points = gl::POINTS as isize,
    Lines = gl::LINES as isize,
    Triangles = gl::TRIANGLES as isize,
}

impl PrimitiveKind {
    pub fn gl_enum(self) -> GLenum {
        self as GLenum
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveKind::Points => write!(f, "points"),
            PrimitiveKind::Lines => write!(f, "lines"),
            PrimitiveKind::Triangles => write!(f, "triangles"),
        }
    }
}

/// A value that stays constant across every vertex and fragment of one draw call.
///
/// Matrices are column-major, which is what both OpenGL and `nalgebra` use, so a
/// `Matrix4::as_slice()` can be copied straight in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<nalgebra::Vector3<f32>> for UniformValue {
    fn from(v: nalgebra::Vector3<f32>) -> Self {
        UniformValue::Vec3([v.x, v.y, v.z])
    }
}

impl From<nalgebra::Matrix4<f32>> for UniformValue {
    fn from(m: nalgebra::Matrix4<f32>) -> Self {
        let mut columns = [0.0; 16];
        columns.copy_from_slice(m.as_slice());
        UniformValue::Mat4(columns)
    }
}

/// RGBA clear color in the 0..1 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor(pub [f32; 4]);

impl ClearColor {
    pub const BLACK: ClearColor = ClearColor([0.0, 0.0, 0.0, 1.0]);
}

impl Default for ClearColor {
    fn default() -> Self {
        ClearColor::BLACK
    }
}
