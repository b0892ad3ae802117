use thiserror::Error;

use super::gl_types::ShaderStage;

/// A shader failed to compile. `log` is whatever the driver reported, which may be empty.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{stage} shader failed to compile: {log}")]
pub struct ShaderError {
    pub stage: ShaderStage,
    pub log: String,
}

/// A program could not be assembled or linked.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LinkError {
    #[error("expected a {expected} shader, got a {found} shader")]
    StageMismatch {
        expected: ShaderStage,
        found: ShaderStage,
    },

    #[error("a {0} shader is already attached")]
    DuplicateStage(ShaderStage),

    #[error("program has no {0} shader attached")]
    MissingStage(ShaderStage),

    #[error("program is no longer accepting shaders")]
    NotEmpty,

    #[error("program failed to link: {log}")]
    Failed { log: String },
}

impl LinkError {
    /// The driver's link log, or a description of the precondition that was violated.
    pub fn log(&self) -> String {
        match self {
            LinkError::Failed { log } => log.clone(),
            other => other.to_string(),
        }
    }
}

/// A vertex layout or buffer that would silently corrupt rendering if it reached the driver.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("stride must be a positive multiple of 4 bytes, got {0}")]
    BadStride(usize),

    #[error("attribute in slot {slot} has {components} components; expected 1 to 4")]
    BadComponentCount { slot: u32, components: u32 },

    #[error("slot {0} is beyond the {} attribute slots every driver guarantees", super::layout::MAX_VERTEX_ATTRIBS)]
    SlotOutOfRange(u32),

    #[error("slot {0} is declared more than once")]
    DuplicateSlot(u32),

    #[error("attribute in slot {slot} starts at byte {offset}, which is not 4-byte aligned")]
    Misaligned { slot: u32, offset: usize },

    #[error("attribute in slot {slot} covers bytes [{start}, {end}) but the stride is {stride}")]
    OutOfBounds {
        slot: u32,
        start: usize,
        end: usize,
        stride: usize,
    },

    #[error("attributes in slots {first} and {second} overlap")]
    Overlap { first: u32, second: u32 },

    #[error("layout has no attributes")]
    Empty,

    #[error("vertex type cannot be read as a sequence of f32")]
    NotFloats,

    #[error("buffer holds {len} floats, which is not a multiple of {per_vertex} floats per vertex")]
    BufferLength { len: usize, per_vertex: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroSized { width: u32, height: u32 },

    #[error("{width}x{height} RGBA image needs {expected} bytes, got {actual}")]
    PixelCount {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("refusing to draw with a program that is not linked")]
    ProgramNotLinked,

    #[error("asked to draw {requested} vertices but the mesh holds {available}")]
    VertexCount { requested: u32, available: u32 },
}

/// Everything that can go wrong while assembling or using a render context.
#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// The driver refused to hand out an object, or no usable context exists.
    #[error("could not acquire graphics resource: {0}")]
    ResourceAcquisition(String),

    #[error("could not read shader source {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl GraphicsError {
    pub(crate) fn no_object(what: &str) -> Self {
        GraphicsError::ResourceAcquisition(format!("driver returned no {} object", what))
    }
}
