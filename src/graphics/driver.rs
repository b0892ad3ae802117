//! The capability set every piece of this crate talks to.
//!
//! OpenGL is a big global state machine, and almost every call in it is `unsafe`. Rather than
//! sprinkling those calls through the shader, layout and renderer code, everything goes through
//! [`GlDriver`]. [`NativeGl`](super::opengl::NativeGl) forwards to the real driver for whatever
//! context is current on this thread; the test double in `recording.rs` just writes the calls
//! down so their order and balance can be asserted.
//!
//! Methods take `&self` because the state lives in the driver, not in the Rust value.

use super::gl_types::*;

pub trait GlDriver {
    // shaders
    fn create_shader(&self, stage: ShaderStage) -> Option<ShaderId>;
    fn shader_source(&self, shader: ShaderId, text: &str);
    fn compile_shader(&self, shader: ShaderId);
    fn shader_compile_status(&self, shader: ShaderId) -> bool;
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&self, shader: ShaderId);

    // programs
    fn create_program(&self) -> Option<ProgramId>;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn detach_shader(&self, program: ProgramId, shader: ShaderId);
    fn link_program(&self, program: ProgramId);
    fn program_link_status(&self, program: ProgramId) -> bool;
    fn program_info_log(&self, program: ProgramId) -> String;
    fn use_program(&self, program: Option<ProgramId>);
    fn delete_program(&self, program: ProgramId);

    // uniforms
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    fn set_uniform(&self, location: UniformLocation, value: &UniformValue);

    // buffers and vertex arrays
    fn create_vertex_array(&self) -> Option<VertexArrayId>;
    fn bind_vertex_array(&self, vao: Option<VertexArrayId>);
    fn delete_vertex_array(&self, vao: VertexArrayId);
    fn create_buffer(&self) -> Option<BufferId>;
    fn bind_array_buffer(&self, buffer: Option<BufferId>);
    /// Uploads into whatever buffer is bound to `GL_ARRAY_BUFFER`.
    fn array_buffer_data(&self, data: &[f32]);
    fn delete_buffer(&self, buffer: BufferId);
    fn vertex_attrib_pointer(&self, slot: u32, components: u32, stride: usize, offset: usize);
    fn enable_vertex_attrib(&self, slot: u32);

    // textures
    fn create_texture(&self) -> Option<TextureId>;
    fn bind_texture(&self, texture: Option<TextureId>);
    /// Uploads RGBA8 pixels into whatever texture is bound to `GL_TEXTURE_2D`.
    fn texture_image_rgba(&self, width: u32, height: u32, pixels: &[u8]);
    fn delete_texture(&self, texture: TextureId);

    // frame
    fn viewport(&self, width: u32, height: u32);
    fn clear(&self, color: ClearColor);
    fn set_depth_test(&self, enabled: bool);
    fn draw_arrays(&self, primitive: PrimitiveKind, first: u32, count: u32);
}

/// Lets a borrowed driver stand in for an owned one, so a context can be built on a driver the
/// caller keeps looking at.
impl<'a, T: GlDriver + ?Sized> GlDriver for &'a T {
    fn create_shader(&self, stage: ShaderStage) -> Option<ShaderId> {
        (**self).create_shader(stage)
    }

    fn shader_source(&self, shader: ShaderId, text: &str) {
        (**self).shader_source(shader, text)
    }

    fn compile_shader(&self, shader: ShaderId) {
        (**self).compile_shader(shader)
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        (**self).shader_compile_status(shader)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        (**self).shader_info_log(shader)
    }

    fn delete_shader(&self, shader: ShaderId) {
        (**self).delete_shader(shader)
    }

    fn create_program(&self) -> Option<ProgramId> {
        (**self).create_program()
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        (**self).attach_shader(program, shader)
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        (**self).detach_shader(program, shader)
    }

    fn link_program(&self, program: ProgramId) {
        (**self).link_program(program)
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        (**self).program_link_status(program)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        (**self).program_info_log(program)
    }

    fn use_program(&self, program: Option<ProgramId>) {
        (**self).use_program(program)
    }

    fn delete_program(&self, program: ProgramId) {
        (**self).delete_program(program)
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        (**self).uniform_location(program, name)
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        (**self).set_uniform(location, value)
    }

    fn create_vertex_array(&self) -> Option<VertexArrayId> {
        (**self).create_vertex_array()
    }

    fn bind_vertex_array(&self, vao: Option<VertexArrayId>) {
        (**self).bind_vertex_array(vao)
    }

    fn delete_vertex_array(&self, vao: VertexArrayId) {
        (**self).delete_vertex_array(vao)
    }

    fn create_buffer(&self) -> Option<BufferId> {
        (**self).create_buffer()
    }

    fn bind_array_buffer(&self, buffer: Option<BufferId>) {
        (**self).bind_array_buffer(buffer)
    }

    fn array_buffer_data(&self, data: &[f32]) {
        (**self).array_buffer_data(data)
    }

    fn delete_buffer(&self, buffer: BufferId) {
        (**self).delete_buffer(buffer)
    }

    fn vertex_attrib_pointer(&self, slot: u32, components: u32, stride: usize, offset: usize) {
        (**self).vertex_attrib_pointer(slot, components, stride, offset)
    }

    fn enable_vertex_attrib(&self, slot: u32) {
        (**self).enable_vertex_attrib(slot)
    }

    fn create_texture(&self) -> Option<TextureId> {
        (**self).create_texture()
    }

    fn bind_texture(&self, texture: Option<TextureId>) {
        (**self).bind_texture(texture)
    }

    fn texture_image_rgba(&self, width: u32, height: u32, pixels: &[u8]) {
        (**self).texture_image_rgba(width, height, pixels)
    }

    fn delete_texture(&self, texture: TextureId) {
        (**self).delete_texture(texture)
    }

    fn viewport(&self, width: u32, height: u32) {
        (**self).viewport(width, height)
    }

    fn clear(&self, color: ClearColor) {
        (**self).clear(color)
    }

    fn set_depth_test(&self, enabled: bool) {
        (**self).set_depth_test(enabled)
    }

    fn draw_arrays(&self, primitive: PrimitiveKind, first: u32, count: u32) {
        (**self).draw_arrays(primitive, first, count)
    }
}
