//! A [`GlDriver`] that needs no GPU. It hands out increasing object names, writes every call into
//! a log, and keeps track of which objects are still alive so tests can check that nothing leaks
//! and nothing is released twice.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use super::driver::GlDriver;
use super::gl_types::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, ShaderId),
    ShaderSource(ShaderId),
    CompileShader(ShaderId),
    DeleteShader(ShaderId),
    CreateProgram(ProgramId),
    AttachShader(ProgramId, ShaderId),
    DetachShader(ProgramId, ShaderId),
    LinkProgram(ProgramId),
    UseProgram(Option<ProgramId>),
    DeleteProgram(ProgramId),
    SetUniform(String, UniformValue),
    CreateVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    DeleteVertexArray(VertexArrayId),
    CreateBuffer(BufferId),
    BindArrayBuffer(Option<BufferId>),
    ArrayBufferData(usize),
    DeleteBuffer(BufferId),
    VertexAttribPointer {
        slot: u32,
        components: u32,
        stride: usize,
        offset: usize,
    },
    EnableVertexAttrib(u32),
    CreateTexture(TextureId),
    BindTexture(Option<TextureId>),
    TextureImage(u32, u32),
    DeleteTexture(TextureId),
    Viewport(u32, u32),
    Clear(ClearColor),
    DepthTest(bool),
    DrawArrays(PrimitiveKind, u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Object {
    Shader(ShaderId),
    Program(ProgramId),
    VertexArray(VertexArrayId),
    Buffer(BufferId),
    Texture(TextureId),
}

#[derive(Default)]
pub struct RecordingDriver {
    next_name: Cell<u32>,
    calls: RefCell<Vec<Call>>,
    live: RefCell<HashSet<Object>>,
    released: RefCell<Vec<Object>>,
    double_releases: RefCell<Vec<Object>>,
    shader_stages: RefCell<HashMap<ShaderId, ShaderStage>>,
    uniform_names: RefCell<Vec<String>>,
    compile_failures: RefCell<HashMap<ShaderStage, String>>,
    link_failure: RefCell<Option<String>>,
    exhausted: Cell<bool>,
    known_uniforms: RefCell<Option<HashSet<String>>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every shader of `stage` compiled from now on fails with `log`.
    pub fn fail_compile(&self, stage: ShaderStage, log: &str) {
        self.compile_failures.borrow_mut().insert(stage, log.to_owned());
    }

    /// Every link from now on fails with `log`.
    pub fn fail_link(&self, log: &str) {
        *self.link_failure.borrow_mut() = Some(log.to_owned());
    }

    /// Every `create_*` call from now on returns `None`.
    pub fn exhaust(&self) {
        self.exhausted.set(true);
    }

    /// Restricts which uniform names resolve to a location. By default every name does.
    pub fn only_uniforms(&self, names: &[&str]) {
        *self.known_uniforms.borrow_mut() = Some(names.iter().map(|n| n.to_string()).collect());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.borrow().iter().position(|c| pred(c))
    }

    pub fn live_objects(&self) -> usize {
        self.live.borrow().len()
    }

    /// Objects in the order they were released.
    pub fn released(&self) -> Vec<Object> {
        self.released.borrow().clone()
    }

    /// Panics unless every object created has been released exactly once.
    pub fn assert_balanced(&self) {
        let live = self.live.borrow();
        assert!(live.is_empty(), "leaked objects: {:?}", *live);
        let doubles = self.double_releases.borrow();
        assert!(doubles.is_empty(), "released more than once: {:?}", *doubles);
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn name(&self) -> Option<u32> {
        if self.exhausted.get() {
            return None;
        }

        let name = self.next_name.get() + 1;
        self.next_name.set(name);
        Some(name)
    }

    fn create(&self, object: Object) {
        self.live.borrow_mut().insert(object);
    }

    fn release(&self, object: Object) {
        if self.live.borrow_mut().remove(&object) {
            self.released.borrow_mut().push(object);
        } else {
            self.double_releases.borrow_mut().push(object);
        }
    }
}

impl GlDriver for RecordingDriver {
    fn create_shader(&self, stage: ShaderStage) -> Option<ShaderId> {
        let id = ShaderId(self.name()?);
        self.create(Object::Shader(id));
        self.shader_stages.borrow_mut().insert(id, stage);
        self.record(Call::CreateShader(stage, id));
        Some(id)
    }

    fn shader_source(&self, shader: ShaderId, _text: &str) {
        self.record(Call::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: ShaderId) {
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        let stage = self.shader_stages.borrow().get(&shader).copied();
        match stage {
            Some(stage) => !self.compile_failures.borrow().contains_key(&stage),
            None => false,
        }
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        let stage = self.shader_stages.borrow().get(&shader).copied();
        stage
            .and_then(|s| self.compile_failures.borrow().get(&s).cloned())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderId) {
        self.release(Object::Shader(shader));
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Option<ProgramId> {
        let id = ProgramId(self.name()?);
        self.create(Object::Program(id));
        self.record(Call::CreateProgram(id));
        Some(id)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        self.record(Call::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        self.record(Call::DetachShader(program, shader));
    }

    fn link_program(&self, program: ProgramId) {
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, _program: ProgramId) -> bool {
        self.link_failure.borrow().is_none()
    }

    fn program_info_log(&self, _program: ProgramId) -> String {
        self.link_failure.borrow().clone().unwrap_or_default()
    }

    fn use_program(&self, program: Option<ProgramId>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: ProgramId) {
        self.release(Object::Program(program));
        self.record(Call::DeleteProgram(program));
    }

    fn uniform_location(&self, _program: ProgramId, name: &str) -> Option<UniformLocation> {
        if let Some(known) = &*self.known_uniforms.borrow() {
            if !known.contains(name) {
                return None;
            }
        }

        let mut names = self.uniform_names.borrow_mut();
        let index = match names.iter().position(|n| n == name) {
            Some(index) => index,
            None => {
                names.push(name.to_owned());
                names.len() - 1
            }
        };

        Some(UniformLocation(index as i32))
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        let name = self.uniform_names.borrow()[location.0 as usize].clone();
        self.record(Call::SetUniform(name, *value));
    }

    fn create_vertex_array(&self) -> Option<VertexArrayId> {
        let id = VertexArrayId(self.name()?);
        self.create(Object::VertexArray(id));
        self.record(Call::CreateVertexArray(id));
        Some(id)
    }

    fn bind_vertex_array(&self, vao: Option<VertexArrayId>) {
        self.record(Call::BindVertexArray(vao));
    }

    fn delete_vertex_array(&self, vao: VertexArrayId) {
        self.release(Object::VertexArray(vao));
        self.record(Call::DeleteVertexArray(vao));
    }

    fn create_buffer(&self) -> Option<BufferId> {
        let id = BufferId(self.name()?);
        self.create(Object::Buffer(id));
        self.record(Call::CreateBuffer(id));
        Some(id)
    }

    fn bind_array_buffer(&self, buffer: Option<BufferId>) {
        self.record(Call::BindArrayBuffer(buffer));
    }

    fn array_buffer_data(&self, data: &[f32]) {
        self.record(Call::ArrayBufferData(data.len()));
    }

    fn delete_buffer(&self, buffer: BufferId) {
        self.release(Object::Buffer(buffer));
        self.record(Call::DeleteBuffer(buffer));
    }

    fn vertex_attrib_pointer(&self, slot: u32, components: u32, stride: usize, offset: usize) {
        self.record(Call::VertexAttribPointer {
            slot,
            components,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib(&self, slot: u32) {
        self.record(Call::EnableVertexAttrib(slot));
    }

    fn create_texture(&self) -> Option<TextureId> {
        let id = TextureId(self.name()?);
        self.create(Object::Texture(id));
        self.record(Call::CreateTexture(id));
        Some(id)
    }

    fn bind_texture(&self, texture: Option<TextureId>) {
        self.record(Call::BindTexture(texture));
    }

    fn texture_image_rgba(&self, width: u32, height: u32, _pixels: &[u8]) {
        self.record(Call::TextureImage(width, height));
    }

    fn delete_texture(&self, texture: TextureId) {
        self.release(Object::Texture(texture));
        self.record(Call::DeleteTexture(texture));
    }

    fn viewport(&self, width: u32, height: u32) {
        self.record(Call::Viewport(width, height));
    }

    fn clear(&self, color: ClearColor) {
        self.record(Call::Clear(color));
    }

    fn set_depth_test(&self, enabled: bool) {
        self.record(Call::DepthTest(enabled));
    }

    fn draw_arrays(&self, primitive: PrimitiveKind, first: u32, count: u32) {
        self.record(Call::DrawArrays(primitive, first, count));
    }
}
