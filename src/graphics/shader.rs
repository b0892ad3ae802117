use std::fs;
use std::path::Path;

use log::{debug, warn};

use super::driver::GlDriver;
use super::error::{GraphicsError, ShaderError};
use super::gl_types::{ShaderId, ShaderStage};

/// Shader source text for one stage. The first line is expected to declare the GLSL version; that
/// is the driver's business, not ours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    stage: ShaderStage,
    text: String,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, text: impl Into<String>) -> Self {
        Self {
            stage,
            text: text.into(),
        }
    }

    pub fn vertex(text: impl Into<String>) -> Self {
        Self::new(ShaderStage::Vertex, text)
    }

    pub fn fragment(text: impl Into<String>) -> Self {
        Self::new(ShaderStage::Fragment, text)
    }

    pub fn from_file<P: AsRef<Path>>(stage: ShaderStage, path: P) -> Result<Self, GraphicsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GraphicsError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self::new(stage, text))
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A shader object that compiled successfully.
///
/// This is intentionally neither `Clone` nor `Copy`: handing it to the linker is the only way to
/// get rid of it, and the linker releases it exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct CompiledShader {
    id: ShaderId,
    stage: ShaderStage,
}

impl CompiledShader {
    pub fn id(&self) -> ShaderId {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Releases the shader object without linking it.
    pub fn release<D: GlDriver + ?Sized>(self, driver: &D) {
        driver.delete_shader(self.id);
    }
}

/// Compiles `source` on the driver.
///
/// On failure the shader object is deleted before returning, so the only thing left over is the
/// driver's log.
pub fn compile<D: GlDriver + ?Sized>(driver: &D, source: &ShaderSource) -> Result<CompiledShader, ShaderError> {
    let id = driver.create_shader(source.stage).ok_or_else(|| ShaderError {
        stage: source.stage,
        log: String::from("driver could not create a shader object"),
    })?;

    driver.shader_source(id, &source.text);
    driver.compile_shader(id);

    if !driver.shader_compile_status(id) {
        let log = driver.shader_info_log(id);
        driver.delete_shader(id);
        warn!("{} shader failed to compile:\n{}", source.stage, log);

        return Err(ShaderError {
            stage: source.stage,
            log,
        });
    }

    debug!("compiled {} shader {:?}", source.stage, id);

    Ok(CompiledShader {
        id,
        stage: source.stage,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graphics::recording::{Call, RecordingDriver};

    const VERT: &str = "#version 330 core\nlayout (location = 0) in vec2 position;\nvoid main() { gl_Position = vec4(position, 0.0, 1.0); }\n";

    #[test]
    fn compiling_keeps_the_stage() {
        let driver = RecordingDriver::new();
        let shader = compile(&driver, &ShaderSource::vertex(VERT)).unwrap();

        assert_eq!(shader.stage(), ShaderStage::Vertex);
        assert_eq!(driver.count(|c| matches!(c, Call::CompileShader(_))), 1);

        shader.release(&driver);
        driver.assert_balanced();
    }

    #[test]
    fn compile_failure_reports_the_driver_log() {
        let driver = RecordingDriver::new();
        driver.fail_compile(ShaderStage::Fragment, "0:3: syntax error, unexpected '}'");

        let err = compile(&driver, &ShaderSource::fragment("void main() {")).unwrap_err();

        assert_eq!(err.stage, ShaderStage::Fragment);
        assert!(!err.log.is_empty());
        assert!(err.to_string().contains("fragment shader failed to compile"));
    }

    #[test]
    fn compile_failure_releases_the_shader_object() {
        let driver = RecordingDriver::new();
        driver.fail_compile(ShaderStage::Vertex, "nope");

        assert!(compile(&driver, &ShaderSource::vertex("garbage")).is_err());
        driver.assert_balanced();
    }

    #[test]
    fn driver_without_shader_objects_is_an_error() {
        let driver = RecordingDriver::new();
        driver.exhaust();

        let err = compile(&driver, &ShaderSource::vertex(VERT)).unwrap_err();
        assert_eq!(err.stage, ShaderStage::Vertex);
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn missing_source_file_is_reported_with_its_path() {
        let err = ShaderSource::from_file(ShaderStage::Vertex, "does/not/exist.vert").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.vert"));
    }
}
