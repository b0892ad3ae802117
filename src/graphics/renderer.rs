use log::{debug, trace};

use super::driver::GlDriver;
use super::error::{GraphicsError, RenderError};
use super::gl_types::{BufferId, PrimitiveKind, UniformValue, VertexArrayId};
use super::layout::{DrawableBuffer, VertexLayout};
use super::program::ShaderProgram;
use super::texture::Texture;

/// Vertex data that lives on the driver: a buffer holding the floats and a vertex array that
/// remembers how they map onto attribute slots.
#[derive(Debug)]
pub struct Mesh {
    vao: VertexArrayId,
    vbo: BufferId,
    layout: VertexLayout,
    vertex_count: u32,
}

impl Mesh {
    pub fn upload<D: GlDriver + ?Sized>(driver: &D, buffer: &DrawableBuffer) -> Result<Self, GraphicsError> {
        let vao = driver
            .create_vertex_array()
            .ok_or_else(|| GraphicsError::no_object("vertex array"))?;
        let vbo = match driver.create_buffer() {
            Some(vbo) => vbo,
            None => {
                driver.delete_vertex_array(vao);
                return Err(GraphicsError::no_object("buffer"));
            }
        };

        driver.bind_vertex_array(Some(vao));
        driver.bind_array_buffer(Some(vbo));
        driver.array_buffer_data(buffer.data());
        buffer.layout().bind(driver);
        driver.bind_vertex_array(None);
        driver.bind_array_buffer(None);

        debug!(
            "uploaded {} vertices ({} bytes each) into {:?}",
            buffer.vertex_count(),
            buffer.layout().stride(),
            vbo
        );

        Ok(Mesh {
            vao,
            vbo,
            layout: buffer.layout().clone(),
            vertex_count: buffer.vertex_count(),
        })
    }

    pub fn vertex_array(&self) -> VertexArrayId {
        self.vao
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn delete<D: GlDriver + ?Sized>(self, driver: &D) {
        driver.delete_buffer(self.vbo);
        driver.delete_vertex_array(self.vao);
    }
}

/// Everything one draw call needs.
pub struct DrawParams<'a> {
    pub program: &'a ShaderProgram,
    pub mesh: &'a Mesh,
    pub vertex_count: u32,
    pub primitive: PrimitiveKind,
    pub texture: Option<&'a Texture>,
    pub uniforms: &'a [(&'a str, UniformValue)],
}

/// Draws `vertex_count` vertices of `mesh` as `primitive` with `program`.
///
/// Refuses to touch the driver at all if the program isn't linked. Presenting the frame is up to
/// the caller.
pub fn render_frame<D: GlDriver + ?Sized>(
    driver: &D,
    program: &ShaderProgram,
    mesh: &Mesh,
    vertex_count: u32,
    primitive: PrimitiveKind,
) -> Result<(), RenderError> {
    render_frame_with(
        driver,
        &DrawParams {
            program,
            mesh,
            vertex_count,
            primitive,
            texture: None,
            uniforms: &[],
        },
    )
}

pub fn render_frame_with<D: GlDriver + ?Sized>(driver: &D, params: &DrawParams<'_>) -> Result<(), RenderError> {
    if !params.program.linked() {
        return Err(RenderError::ProgramNotLinked);
    }

    if params.vertex_count > params.mesh.vertex_count {
        return Err(RenderError::VertexCount {
            requested: params.vertex_count,
            available: params.mesh.vertex_count,
        });
    }

    driver.use_program(Some(params.program.id()));
    for (name, value) in params.uniforms {
        params.program.set_uniform(driver, name, value);
    }
    if let Some(texture) = params.texture {
        driver.bind_texture(Some(texture.id()));
    }

    driver.bind_vertex_array(Some(params.mesh.vao));
    driver.draw_arrays(params.primitive, 0, params.vertex_count);
    trace!("drew {} {}", params.vertex_count, params.primitive);

    // Leave nothing bound so the next draw starts clean
    driver.bind_vertex_array(None);
    if params.texture.is_some() {
        driver.bind_texture(None);
    }
    driver.use_program(None);

    Ok(())
}
