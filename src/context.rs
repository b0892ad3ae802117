//! Owns every graphics object belonging to one context and releases them in the right order.

use log::{debug, info};

use crate::graphics::*;
use crate::lessons::LessonConfig;
use crate::scene::{DrawTarget, SceneFrame};

/// All the objects a lesson needs, living on one driver.
///
/// Objects are created compile → link → mesh upload → texture upload, and released in reverse:
/// buffers and vertex arrays, then the program, then textures. Anything periodic that draws into
/// the context (see [`FrameTicker`](crate::ticker::FrameTicker)) has to be stopped before this is
/// dropped.
pub struct RenderContext<D: GlDriver> {
    driver: D,
    program: Option<ShaderProgram>,
    mesh: Option<Mesh>,
    texture: Option<Texture>,
    primitive: PrimitiveKind,
    viewport: (u32, u32),
}

impl<D: GlDriver> RenderContext<D> {
    /// Builds everything `config` describes. If any step fails, whatever was already created is
    /// released before the error is returned.
    pub fn build(driver: D, config: &LessonConfig) -> Result<Self, GraphicsError> {
        let mut context = RenderContext {
            driver,
            program: None,
            mesh: None,
            texture: None,
            primitive: config.primitive,
            viewport: (1, 1),
        };

        // An early return drops `context`, and Drop tears down what exists so far
        context.program = Some(ProgramBuilder::new(config.vertex.clone(), config.fragment.clone()).build(&context.driver)?);
        context.mesh = Some(Mesh::upload(&context.driver, &config.buffer)?);
        if let Some(image) = &config.texture {
            context.texture = Some(Texture::upload(&context.driver, image)?);
        }

        context.driver.set_depth_test(config.depth_test);
        info!(
            "render context ready: {} {} vertices{}",
            config.buffer.vertex_count(),
            config.primitive,
            if config.texture.is_some() { ", textured" } else { "" }
        );

        Ok(context)
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
        self.driver.viewport(self.viewport.0, self.viewport.1);
    }

    /// Width over height of the current viewport.
    pub fn aspect(&self) -> f32 {
        self.viewport.0 as f32 / self.viewport.1 as f32
    }

    /// Releases every object. Safe to call more than once; `Drop` calls it too.
    pub fn teardown(&mut self) {
        if let Some(mesh) = self.mesh.take() {
            mesh.delete(&self.driver);
        }
        if let Some(program) = self.program.take() {
            program.delete(&self.driver);
        }
        if let Some(texture) = self.texture.take() {
            texture.delete(&self.driver);
        }
        debug!("render context torn down");
    }
}

impl<D: GlDriver> DrawTarget for RenderContext<D> {
    type Error = RenderError;

    /// Clears and draws the whole mesh. A context without a linked program clears to the frame's
    /// color and draws nothing.
    fn draw(&mut self, frame: &SceneFrame) -> Result<(), RenderError> {
        self.driver.clear(frame.clear_color);

        let (program, mesh) = match (&self.program, &self.mesh) {
            (Some(program), Some(mesh)) => (program, mesh),
            _ => return Err(RenderError::ProgramNotLinked),
        };

        render_frame_with(
            &self.driver,
            &DrawParams {
                program,
                mesh,
                vertex_count: mesh.vertex_count(),
                primitive: self.primitive,
                texture: self.texture.as_ref(),
                uniforms: &frame.uniforms,
            },
        )
    }
}

impl<D: GlDriver> Drop for RenderContext<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}
