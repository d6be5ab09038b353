//! The GL entry points a shader program needs, expressed as a capability.
//!
//! Programs never reach for a global context. Callers hand them something
//! implementing [`GraphicsContext`] that is already current on the calling
//! thread: a `glow::Context` in the application, or the recording context in
//! tests.

mod glow_backend;
#[cfg(test)]
pub(crate) mod testing;

use std::fmt;

use crate::stage::ShaderStage;
use crate::uniforms::UniformValue;

/// Shader, program and uniform operations on a current GL context.
///
/// Every method assumes the context is current on the calling thread.
/// Creation methods return the driver's message on failure; the status and
/// log queries mirror `glGetShaderiv`/`glGetProgramiv` and their info logs.
pub trait GraphicsContext {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + PartialEq + fmt::Debug;
    type UniformLocation: fmt::Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);

    /// `None` when the name is not an active uniform of `program`.
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn upload_uniform(&self, location: &Self::UniformLocation, value: &UniformValue);
}
