//! [`GlDriver`] on top of the raw `gl` bindings.
//!
//! NB: I don't bother with the GL types beyond the handle wrappers because they're all type
//! aliases for Rust primitives.

use std::ffi::c_void;

use gl;
use gl::types::*;
use log::info;

use super::driver::GlDriver;
use super::error::GraphicsError;
use super::gl_types::*;
use super::utils::*;

/// The real OpenGL driver for whatever context is current on the calling thread.
///
/// The `gl` crate keeps its function pointers in globals, so this is a zero-sized token proving
/// they have been loaded. It is deliberately `!Send`: a GL context belongs to one thread.
pub struct NativeGl {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl NativeGl {
    /// Loads every OpenGL entry point through `loader` (usually the windowing library's
    /// `get_proc_address`). The context the pointers come from must be current.
    pub fn load_with<F>(loader: F) -> Result<Self, GraphicsError>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);

        if !gl::CreateShader::is_loaded() || !gl::GenVertexArrays::is_loaded() {
            return Err(GraphicsError::ResourceAcquisition(String::from(
                "OpenGL entry points could not be loaded from the current context",
            )));
        }

        unsafe {
            // Lets vertex shaders set gl_PointSize, which the point lesson relies on.
            gl::Enable(gl::PROGRAM_POINT_SIZE);
        }

        let driver = Self {
            _not_send: std::marker::PhantomData,
        };
        driver.log_driver_info();

        Ok(driver)
    }

    fn log_driver_info(&self) {
        let vendor = get_string(gl::VENDOR);
        let renderer = get_string(gl::RENDERER);
        let version = get_string(gl::VERSION);
        let glsl = get_string(gl::SHADING_LANGUAGE_VERSION);
        info!("OpenGL {} ({} / {}), GLSL {}", version, vendor, renderer, glsl);
    }
}

fn get_string(name: GLenum) -> String {
    unsafe {
        let ptr = gl::GetString(name);
        if ptr.is_null() {
            return String::from("unknown");
        }

        std::ffi::CStr::from_ptr(ptr as *const _)
            .to_string_lossy()
            .into_owned()
    }
}

fn non_zero(id: GLuint) -> Option<GLuint> {
    if id == 0 { None } else { Some(id) }
}

impl GlDriver for NativeGl {
    fn create_shader(&self, stage: ShaderStage) -> Option<ShaderId> {
        non_zero(unsafe { gl::CreateShader(stage.gl_enum()) }).map(ShaderId)
    }

    fn shader_source(&self, shader: ShaderId, text: &str) {
        // Passing an explicit length means the text doesn't need to be NUL-terminated.
        let ptr = text.as_ptr() as *const GLchar;
        let len = text.len() as GLint;
        unsafe {
            gl::ShaderSource(shader.0, 1, &ptr, &len);
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        unsafe {
            gl::CompileShader(shader.0);
        }
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetShaderiv(shader.0, gl::COMPILE_STATUS, &mut success);
        }

        success != 0
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(shader.0, gl::INFO_LOG_LENGTH, &mut len);
        }

        if len <= 0 {
            return String::new();
        }

        let mut buf = info_log_buffer(len as usize);
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetShaderInfoLog(shader.0, len, &mut written, buf.as_mut_ptr() as *mut GLchar);
        }

        info_log_to_string(buf, written.max(0) as usize)
    }

    fn delete_shader(&self, shader: ShaderId) {
        unsafe {
            gl::DeleteShader(shader.0);
        }
    }

    fn create_program(&self) -> Option<ProgramId> {
        non_zero(unsafe { gl::CreateProgram() }).map(ProgramId)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe {
            gl::AttachShader(program.0, shader.0);
        }
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe {
            gl::DetachShader(program.0, shader.0);
        }
    }

    fn link_program(&self, program: ProgramId) {
        unsafe {
            gl::LinkProgram(program.0);
        }
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetProgramiv(program.0, gl::LINK_STATUS, &mut success);
        }

        success != 0
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        let mut len = 0;
        unsafe {
            gl::GetProgramiv(program.0, gl::INFO_LOG_LENGTH, &mut len);
        }

        if len <= 0 {
            return String::new();
        }

        let mut buf = info_log_buffer(len as usize);
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetProgramInfoLog(program.0, len, &mut written, buf.as_mut_ptr() as *mut GLchar);
        }

        info_log_to_string(buf, written.max(0) as usize)
    }

    fn use_program(&self, program: Option<ProgramId>) {
        unsafe {
            gl::UseProgram(program.map_or(0, |p| p.0));
        }
    }

    fn delete_program(&self, program: ProgramId) {
        unsafe {
            gl::DeleteProgram(program.0);
        }
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let name = uniform_name(name)?;
        let location = unsafe { gl::GetUniformLocation(program.0, name.as_ptr()) };

        if location < 0 { None } else { Some(UniformLocation(location)) }
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        let loc = location.0;
        unsafe {
            match value {
                UniformValue::Float(v) => gl::Uniform1f(loc, *v),
                UniformValue::Int(v) => gl::Uniform1i(loc, *v),
                UniformValue::Vec2(v) => gl::Uniform2fv(loc, 1, v.as_ptr()),
                UniformValue::Vec3(v) => gl::Uniform3fv(loc, 1, v.as_ptr()),
                UniformValue::Vec4(v) => gl::Uniform4fv(loc, 1, v.as_ptr()),
                UniformValue::Mat4(m) => gl::UniformMatrix4fv(loc, 1, gl::FALSE, m.as_ptr()),
            }
        }
    }

    fn create_vertex_array(&self) -> Option<VertexArrayId> {
        let mut vao = 0u32;
        unsafe { gl::GenVertexArrays(1, &mut vao) };
        non_zero(vao).map(VertexArrayId)
    }

    fn bind_vertex_array(&self, vao: Option<VertexArrayId>) {
        unsafe {
            gl::BindVertexArray(vao.map_or(0, |v| v.0));
        }
    }

    fn delete_vertex_array(&self, vao: VertexArrayId) {
        unsafe {
            gl::DeleteVertexArrays(1, &vao.0);
        }
    }

    fn create_buffer(&self) -> Option<BufferId> {
        let mut vbo = 0u32;
        unsafe { gl::GenBuffers(1, &mut vbo) };
        non_zero(vbo).map(BufferId)
    }

    fn bind_array_buffer(&self, buffer: Option<BufferId>) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, buffer.map_or(0, |b| b.0));
        }
    }

    fn array_buffer_data(&self, data: &[f32]) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                bytes.len() as GLsizeiptr,
                bytes.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&self, buffer: BufferId) {
        unsafe {
            gl::DeleteBuffers(1, &buffer.0);
        }
    }

    fn vertex_attrib_pointer(&self, slot: u32, components: u32, stride: usize, offset: usize) {
        unsafe {
            gl::VertexAttribPointer(
                slot,
                components as GLint,
                gl::FLOAT,
                gl::FALSE,
                stride as GLsizei,
                offset as *const c_void,
            );
        }
    }

    fn enable_vertex_attrib(&self, slot: u32) {
        unsafe {
            gl::EnableVertexAttribArray(slot);
        }
    }

    fn create_texture(&self) -> Option<TextureId> {
        let mut id = 0u32;
        unsafe { gl::GenTextures(1, &mut id) };
        non_zero(id).map(TextureId)
    }

    fn bind_texture(&self, texture: Option<TextureId>) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0);
            gl::BindTexture(gl::TEXTURE_2D, texture.map_or(0, |t| t.0));
        }
    }

    fn texture_image_rgba(&self, width: u32, height: u32, pixels: &[u8]) {
        unsafe {
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::NEAREST as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as i32);
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                pixels.as_ptr() as *const c_void,
            );
        }
    }

    fn delete_texture(&self, texture: TextureId) {
        unsafe {
            gl::DeleteTextures(1, &texture.0);
        }
    }

    fn viewport(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as GLsizei, height as GLsizei);
        }
    }

    fn clear(&self, color: ClearColor) {
        let [r, g, b, a] = color.0;
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }

    fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                gl::Enable(gl::DEPTH_TEST);
            } else {
                gl::Disable(gl::DEPTH_TEST);
            }
        }
    }

    fn draw_arrays(&self, primitive: PrimitiveKind, first: u32, count: u32) {
        unsafe {
            gl::DrawArrays(primitive.gl_enum(), first as GLint, count as GLsizei);
        }
    }
}
