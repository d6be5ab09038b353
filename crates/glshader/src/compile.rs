use std::path::Path;

use crate::context::GraphicsContext;
use crate::error::BuildError;
use crate::stage::ShaderStage;

/// A compiled stage object, deleted when dropped.
///
/// Every early return between compiling a stage and finishing the link
/// releases the GL object through this guard.
pub(crate) struct StageObject<'gl, C: GraphicsContext> {
    gl: &'gl C,
    shader: C::Shader,
    stage: ShaderStage,
}

impl<C: GraphicsContext> StageObject<'_, C> {
    pub fn shader(&self) -> C::Shader {
        self.shader
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<C: GraphicsContext> Drop for StageObject<'_, C> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.shader);
    }
}

/// A program object that has not linked yet, deleted when dropped unless
/// [`PendingProgram::into_linked`] hands it over.
pub(crate) struct PendingProgram<'gl, C: GraphicsContext> {
    gl: &'gl C,
    program: C::Program,
    armed: bool,
}

impl<'gl, C: GraphicsContext> PendingProgram<'gl, C> {
    pub fn create(gl: &'gl C) -> Result<Self, BuildError> {
        let program = gl.create_program().map_err(|message| BuildError::Allocation {
            object: "shader program",
            message,
        })?;
        Ok(Self {
            gl,
            program,
            armed: true,
        })
    }

    pub fn handle(&self) -> C::Program {
        self.program
    }

    pub fn into_linked(mut self) -> C::Program {
        self.armed = false;
        self.program
    }
}

impl<C: GraphicsContext> Drop for PendingProgram<'_, C> {
    fn drop(&mut self) {
        if self.armed {
            self.gl.delete_program(self.program);
        }
    }
}

/// Reads the complete source text of one stage.
pub(crate) fn load_source(stage: ShaderStage, path: &Path) -> Result<String, BuildError> {
    std::fs::read_to_string(path).map_err(|source| BuildError::SourceLoad {
        stage,
        path: path.to_path_buf(),
        source,
    })
}

/// Creates a stage object for `stage`, submits `source` and compiles it.
///
/// On failure the compiler log and the submitted source travel in the error
/// so the shader can be reproduced outside the program.
pub(crate) fn compile_stage<'gl, C: GraphicsContext>(
    gl: &'gl C,
    stage: ShaderStage,
    source: &str,
) -> Result<StageObject<'gl, C>, BuildError> {
    let shader = gl
        .create_shader(stage)
        .map_err(|message| BuildError::Allocation {
            object: "shader stage",
            message,
        })?;
    let object = StageObject { gl, shader, stage };

    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.shader_compile_status(shader) {
        let log = gl.shader_info_log(shader);
        return Err(BuildError::StageCompile {
            stage,
            log: log.trim_end().to_string(),
            source_text: source.to_string(),
        });
    }

    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::RecordingContext;
    use std::io;
    use tempfile::TempDir;

    #[test]
    fn load_source_wraps_io_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.vert");
        let err = load_source(ShaderStage::Vertex, &path).unwrap_err();
        match err {
            BuildError::SourceLoad {
                stage,
                path: reported,
                source,
            } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert_eq!(reported, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn failed_compile_releases_stage_object() {
        let gl = RecordingContext::new();
        let source = "void main() {\n";
        let err = match compile_stage(&gl, ShaderStage::Fragment, source) {
            Err(err) => err,
            Ok(_) => panic!("compile should fail"),
        };

        assert_eq!(gl.shaders_created(), 1);
        assert_eq!(gl.live_shaders(), 0);
        let text = err.to_string();
        assert!(text.contains("fragment"));
        assert!(text.contains("syntax error"));
        assert!(text.contains(source));
    }

    #[test]
    fn dropping_stage_object_deletes_shader() {
        let gl = RecordingContext::new();
        let object = compile_stage(&gl, ShaderStage::Vertex, "void main() {}").unwrap();
        assert_eq!(object.stage(), ShaderStage::Vertex);
        assert_eq!(gl.live_shaders(), 1);
        drop(object);
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn pending_program_is_deleted_unless_handed_over() {
        let gl = RecordingContext::new();
        let pending = PendingProgram::create(&gl).unwrap();
        drop(pending);
        assert_eq!(gl.live_programs(), 0);

        let kept = PendingProgram::create(&gl).unwrap().into_linked();
        assert!(gl.is_program_live(kept));
    }
}
