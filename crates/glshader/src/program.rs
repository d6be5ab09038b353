//! Linked GL programs built from a [`ShaderConfiguration`].
//!
//! Building walks the configured stages in pipeline order (vertex, fragment,
//! geometry, tessellation control, tessellation evaluation, compute), loads
//! and compiles each one, attaches every compiled stage exactly once and
//! links. Stage objects are scoped: they are released on every exit path, and
//! after a successful link only the program handle survives.

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::compile::{compile_stage, load_source, PendingProgram, StageObject};
use crate::config::ShaderConfiguration;
use crate::context::GraphicsContext;
use crate::error::{BuildError, ShaderError};
use crate::stage::{ShaderStage, STAGE_COUNT};
use crate::uniforms::UniformValue;

/// A successfully linked shader program.
///
/// The program handle is deleted when this value is dropped. The context is
/// shared through `Rc`, which keeps programs on the thread that owns it.
pub struct ShaderProgram<C: GraphicsContext> {
    gl: Rc<C>,
    handle: C::Program,
    config: ShaderConfiguration,
}

impl<C: GraphicsContext> ShaderProgram<C> {
    /// Validates `config` and builds a linked program from it.
    ///
    /// Returns [`ShaderError::InvalidConfiguration`] without touching the
    /// context when a mandatory stage is missing or a declared stage does not
    /// resolve. Any later failure is wrapped in [`ShaderError::Build`].
    pub fn new(gl: Rc<C>, config: ShaderConfiguration) -> Result<Self, ShaderError> {
        let handle = build(gl.as_ref(), &config)?;
        Ok(Self { gl, handle, config })
    }

    /// Builds a program from just a vertex and a fragment shader.
    pub fn from_paths(
        gl: Rc<C>,
        vertex: impl Into<PathBuf>,
        fragment: impl Into<PathBuf>,
    ) -> Result<Self, ShaderError> {
        Self::new(gl, ShaderConfiguration::new(vertex, fragment))
    }

    /// The configuration this program was last built from.
    pub fn config(&self) -> &ShaderConfiguration {
        &self.config
    }

    pub fn handle(&self) -> C::Program {
        self.handle
    }

    /// Makes this program the context's current program.
    pub fn use_program(&self) {
        self.gl.use_program(Some(self.handle));
    }

    /// Uploads `value` to the uniform called `name`.
    ///
    /// The program must be current. A name that is not an active uniform
    /// (misspelled, or optimised out by the driver) is ignored.
    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) {
        let value = value.into();
        match self.gl.uniform_location(self.handle, name) {
            Some(location) => self.gl.upload_uniform(&location, &value),
            None => tracing::trace!(
                uniform = name,
                kind = value.glsl_type(),
                "uniform not active in program; upload skipped"
            ),
        }
    }

    /// Binds the program and uploads each `(name, value)` pair.
    pub fn apply_uniforms<'a, I>(&self, uniforms: I)
    where
        I: IntoIterator<Item = (&'a str, UniformValue)>,
    {
        self.use_program();
        for (name, value) in uniforms {
            self.set_uniform(name, value);
        }
    }

    /// Replaces this program with one built from `config`.
    ///
    /// The current program is released only once the replacement has linked.
    /// On failure the previous program and configuration stay in place and
    /// remain usable. The replacement is not bound; call
    /// [`use_program`](Self::use_program) again before drawing.
    pub fn rebuild(&mut self, config: ShaderConfiguration) -> Result<(), ShaderError> {
        match build(self.gl.as_ref(), &config) {
            Ok(handle) => {
                let previous = std::mem::replace(&mut self.handle, handle);
                self.gl.delete_program(previous);
                self.config = config;
                Ok(())
            }
            Err(err) => {
                let report = err.report();
                tracing::warn!(
                    error = %report.trim_end(),
                    "shader rebuild failed; keeping previous program"
                );
                Err(err)
            }
        }
    }

    /// Rebuilds from the same configuration, picking up edited sources.
    pub fn reload(&mut self) -> Result<(), ShaderError> {
        self.rebuild(self.config.clone())
    }
}

impl<C: GraphicsContext> Drop for ShaderProgram<C> {
    fn drop(&mut self) {
        self.gl.delete_program(self.handle);
    }
}

impl<C: GraphicsContext> fmt::Debug for ShaderProgram<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("handle", &self.handle)
            .field("config", &self.config)
            .finish()
    }
}

fn build<C: GraphicsContext>(
    gl: &C,
    config: &ShaderConfiguration,
) -> Result<C::Program, ShaderError> {
    let issues = config.validate();
    if !issues.is_empty() {
        return Err(ShaderError::InvalidConfiguration { issues });
    }
    Ok(link(gl, config)?)
}

fn link<C: GraphicsContext>(
    gl: &C,
    config: &ShaderConfiguration,
) -> Result<C::Program, BuildError> {
    let mut stages: Vec<StageObject<'_, C>> = Vec::with_capacity(STAGE_COUNT);
    for (stage, path) in config.stages() {
        // An optional stage whose file vanished after validation is simply
        // absent; a mandatory one surfaces as a load failure.
        if !stage.is_mandatory() && !config.has_stage(stage) {
            continue;
        }
        let source = load_source(stage, path)?;
        let object = compile_stage(gl, stage, &source)?;
        tracing::debug!(%stage, path = %path.display(), "compiled shader stage");
        stages.push(object);
    }

    let program = PendingProgram::create(gl)?;
    for object in &stages {
        gl.attach_shader(program.handle(), object.shader());
    }

    gl.link_program(program.handle());
    if !gl.program_link_status(program.handle()) {
        let log = gl.program_info_log(program.handle());
        return Err(BuildError::ProgramLink {
            log: log.trim_end().to_string(),
        });
    }

    for object in &stages {
        gl.detach_shader(program.handle(), object.shader());
    }
    let linked: Vec<ShaderStage> = stages.iter().map(StageObject::stage).collect();
    tracing::info!(stages = ?linked, "linked shader program");

    Ok(program.into_linked())
}
