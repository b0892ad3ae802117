//! A small set of wrappers around the OpenGL API.
//!
//! Every tutorial step in this crate boils down to the same handful of moves: compile a vertex and
//! a fragment shader, link them into a program, describe how a packed array of floats maps onto
//! the program's inputs, and issue a draw call. This module does each of those once, behind a safe
//! interface, so the lessons only have to say *what* to draw.
//!
//! None of this replaces an OpenGL reference. The lessons follow the order of
//! [Learn OpenGL][learnopengl], whose examples have been ported to Rust in
//! [learn-opengl-rs][learnopengl-rs]. The safe wrappers are modelled on
//! [Rust and OpenGL from scratch][rs-opengl-from-scratch].
//!
//! [learnopengl]: https://learnopengl.com/
//! [learnopengl-rs]: https://github.com/bwasty/learn-opengl-rs
//! [rs-opengl-from-scratch]: http://nercury.github.io/rust/opengl/tutorial/2018/02/09/opengl-in-rust-from-scratch-02-opengl-context.html

pub mod driver;
pub mod error;
pub mod gl_types;
pub mod layout;
pub mod opengl;
pub mod program;
pub mod renderer;
pub mod shader;
pub mod texture;
mod utils;

#[cfg(test)]
pub(crate) mod recording;

pub use driver::GlDriver;
pub use error::{GraphicsError, LayoutError, LinkError, RenderError, ShaderError, TextureError};
pub use gl_types::*;
pub use layout::{DrawableBuffer, VertexAttribute, VertexLayout};
pub use opengl::NativeGl;
pub use program::{link, ProgramBuilder, ProgramState, ShaderProgram};
pub use renderer::{render_frame, render_frame_with, DrawParams, Mesh};
pub use shader::{compile, CompiledShader, ShaderSource};
pub use texture::{ImageData, Texture};
