use log::{debug, info, warn};

use super::driver::GlDriver;
use super::error::{GraphicsError, LinkError};
use super::gl_types::{ProgramId, ShaderStage, UniformValue};
use super::shader::{compile, CompiledShader, ShaderSource};

/// Where a program is in its life.
///
/// `Empty -> Linking -> {Linked, Failed}`. Nothing ever goes back to `Empty`; a failed program is
/// thrown away and rebuilt from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    Empty,
    Linking,
    Linked,
    Failed,
}

/// Represents the graphics pipeline: one vertex and one fragment shader linked together.
///
/// The program object is not released on drop because that needs the driver. Whoever owns the
/// program calls [`ShaderProgram::delete`]; `RenderContext` does this on teardown.
#[derive(Debug)]
pub struct ShaderProgram {
    id: ProgramId,
    state: ProgramState,
    vertex: Option<CompiledShader>,
    fragment: Option<CompiledShader>,
}

impl ShaderProgram {
    /// Creates an empty program object with nothing attached.
    pub fn create<D: GlDriver + ?Sized>(driver: &D) -> Result<Self, GraphicsError> {
        let id = driver
            .create_program()
            .ok_or_else(|| GraphicsError::no_object("program"))?;

        Ok(Self {
            id,
            state: ProgramState::Empty,
            vertex: None,
            fragment: None,
        })
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn state(&self) -> ProgramState {
        self.state
    }

    /// Only a linked program may be used for drawing.
    pub fn linked(&self) -> bool {
        self.state == ProgramState::Linked
    }

    /// Attaches a compiled shader. Each stage may be attached once, and only before linking.
    ///
    /// A rejected shader is released rather than handed back.
    pub fn attach<D: GlDriver + ?Sized>(&mut self, driver: &D, shader: CompiledShader) -> Result<(), LinkError> {
        if self.state != ProgramState::Empty {
            shader.release(driver);
            return Err(LinkError::NotEmpty);
        }

        let slot = match shader.stage() {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
        };

        if slot.is_some() {
            let stage = shader.stage();
            shader.release(driver);
            return Err(LinkError::DuplicateStage(stage));
        }

        driver.attach_shader(self.id, shader.id());
        *slot = Some(shader);

        Ok(())
    }

    /// Links the attached shaders.
    ///
    /// Whatever the outcome, every attached shader is detached and deleted afterwards. On failure
    /// the program is left in [`ProgramState::Failed`] and still has to be deleted by the caller.
    pub fn link<D: GlDriver + ?Sized>(&mut self, driver: &D) -> Result<(), LinkError> {
        if self.state != ProgramState::Empty {
            return Err(LinkError::NotEmpty);
        }

        let missing = if self.vertex.is_none() {
            Some(ShaderStage::Vertex)
        } else if self.fragment.is_none() {
            Some(ShaderStage::Fragment)
        } else {
            None
        };

        if let Some(stage) = missing {
            self.release_shaders(driver);
            self.state = ProgramState::Failed;
            return Err(LinkError::MissingStage(stage));
        }

        self.state = ProgramState::Linking;
        driver.link_program(self.id);
        let success = driver.program_link_status(self.id);
        let log = if success { String::new() } else { driver.program_info_log(self.id) };

        self.release_shaders(driver);

        if !success {
            self.state = ProgramState::Failed;
            warn!("program {:?} failed to link:\n{}", self.id, log);
            return Err(LinkError::Failed { log });
        }

        self.state = ProgramState::Linked;
        info!("linked program {:?}", self.id);

        Ok(())
    }

    fn release_shaders<D: GlDriver + ?Sized>(&mut self, driver: &D) {
        for shader in self.vertex.take().into_iter().chain(self.fragment.take()) {
            driver.detach_shader(self.id, shader.id());
            shader.release(driver);
        }
    }

    /// Sets a uniform on this program, which must be the one currently in use.
    ///
    /// Drivers strip uniforms a shader never reads, so a name without a location is skipped rather
    /// than treated as an error.
    pub fn set_uniform<D: GlDriver + ?Sized>(&self, driver: &D, name: &str, value: &UniformValue) {
        match driver.uniform_location(self.id, name) {
            Some(location) => driver.set_uniform(location, value),
            None => debug!("program {:?} has no active uniform `{}`", self.id, name),
        }
    }

    /// Releases the program object, along with any shaders still attached to it.
    pub fn delete<D: GlDriver + ?Sized>(mut self, driver: &D) {
        self.release_shaders(driver);
        driver.delete_program(self.id);
    }
}

/// Creates a program from one compiled vertex shader and one compiled fragment shader.
///
/// Both shaders are released exactly once no matter what happens. A program that fails to link is
/// deleted here, so the caller only ever gets back a linked program.
pub fn link<D: GlDriver + ?Sized>(
    driver: &D,
    vertex: CompiledShader,
    fragment: CompiledShader,
) -> Result<ShaderProgram, LinkError> {
    if vertex.stage() != ShaderStage::Vertex || fragment.stage() != ShaderStage::Fragment {
        let err = if vertex.stage() != ShaderStage::Vertex {
            LinkError::StageMismatch {
                expected: ShaderStage::Vertex,
                found: vertex.stage(),
            }
        } else {
            LinkError::StageMismatch {
                expected: ShaderStage::Fragment,
                found: fragment.stage(),
            }
        };

        vertex.release(driver);
        fragment.release(driver);
        return Err(err);
    }

    let mut program = match ShaderProgram::create(driver) {
        Ok(program) => program,
        Err(e) => {
            vertex.release(driver);
            fragment.release(driver);
            return Err(LinkError::Failed { log: e.to_string() });
        }
    };

    if let Err(e) = program.attach(driver, vertex) {
        fragment.release(driver);
        program.delete(driver);
        return Err(e);
    }

    let linked = match program.attach(driver, fragment) {
        Ok(()) => program.link(driver),
        Err(e) => Err(e),
    };

    match linked {
        Ok(()) => Ok(program),
        Err(e) => {
            program.delete(driver);
            Err(e)
        }
    }
}

/// Compiles and links a program from a vertex and a fragment source in one go.
#[derive(Debug, Clone)]
pub struct ProgramBuilder {
    vertex: ShaderSource,
    fragment: ShaderSource,
}

impl ProgramBuilder {
    pub fn new(vertex: ShaderSource, fragment: ShaderSource) -> Self {
        Self { vertex, fragment }
    }

    pub fn build<D: GlDriver + ?Sized>(&self, driver: &D) -> Result<ShaderProgram, GraphicsError> {
        let vertex = compile(driver, &self.vertex)?;
        let fragment = match compile(driver, &self.fragment) {
            Ok(fragment) => fragment,
            Err(e) => {
                vertex.release(driver);
                return Err(e.into());
            }
        };

        Ok(link(driver, vertex, fragment)?)
    }
}
