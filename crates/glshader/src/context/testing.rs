//! A fake GL context that records object lifetimes and uniform uploads.
//!
//! Compilation is simulated: a source compiles when its braces balance and it
//! declares `main(`. Linking succeeds when every attached shader compiled,
//! unless a failure was injected with [`RecordingContext::fail_next_link`].
//! Object creation can be made to fail the same way.
//! Active uniforms are the names declared with `uniform` in attached sources.

use std::cell::RefCell;
use std::collections::HashMap;

use super::GraphicsContext;
use crate::stage::ShaderStage;
use crate::uniforms::UniformValue;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Upload {
    pub program: u32,
    pub name: String,
    pub value: UniformValue,
}

#[derive(Debug)]
struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct FakeProgram {
    attached: Vec<u32>,
    linked_stages: Vec<ShaderStage>,
    uniforms: Vec<String>,
    linked: bool,
    log: String,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, FakeShader>,
    programs: HashMap<u32, FakeProgram>,
    shaders_created: usize,
    programs_created: usize,
    current: Option<u32>,
    uploads: Vec<Upload>,
    link_failure: Option<String>,
    shader_create_failure: Option<(ShaderStage, String)>,
    program_create_failure: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingContext {
    state: RefCell<State>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_link(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    /// Makes the next `create_shader` for `stage` report `message`.
    pub fn fail_next_shader_create(&self, stage: ShaderStage, message: &str) {
        self.state.borrow_mut().shader_create_failure = Some((stage, message.to_string()));
    }

    pub fn fail_next_program_create(&self, message: &str) {
        self.state.borrow_mut().program_create_failure = Some(message.to_string());
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn shaders_created(&self) -> usize {
        self.state.borrow().shaders_created
    }

    pub fn programs_created(&self) -> usize {
        self.state.borrow().programs_created
    }

    pub fn current_program(&self) -> Option<u32> {
        self.state.borrow().current
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.borrow().uploads.clone()
    }

    pub fn is_program_live(&self, program: u32) -> bool {
        self.state.borrow().programs.contains_key(&program)
    }

    /// Stages that were attached when `program` was linked, in attach order.
    pub fn linked_stages(&self, program: u32) -> Vec<ShaderStage> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.linked_stages.clone())
            .unwrap_or_default()
    }
}

fn fake_compile(source: &str) -> Result<(), String> {
    let mut depth = 0i32;
    let mut line = 1;
    for ch in source.chars() {
        match ch {
            '\n' => line += 1,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(format!("0:{line}(1): error: syntax error, unexpected '}}'"));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(format!(
            "0:{line}(1): error: syntax error, unexpected end of file"
        ));
    }
    if !source.contains("main(") {
        return Err("0:0(0): error: missing entry point 'main'".to_string());
    }
    Ok(())
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let (_, rest) = line.split_once("uniform ")?;
        let declaration = rest.split(';').next()?;
        let name = declaration.split_whitespace().last()?;
        let name = name.split('[').next().unwrap_or(name);
        Some(name.to_string())
    })
}

impl GraphicsContext for RecordingContext {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = (u32, String);

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let injected = state
            .shader_create_failure
            .as_ref()
            .is_some_and(|(failing, _)| *failing == stage);
        if injected {
            if let Some((_, message)) = state.shader_create_failure.take() {
                return Err(message);
            }
        }
        state.next_id += 1;
        let id = state.next_id;
        state.shaders_created += 1;
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let mut state = self.state.borrow_mut();
        let entry = state.shaders.get_mut(&shader).expect("unknown shader");
        entry.source = source.to_string();
    }

    fn compile_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        let entry = state.shaders.get_mut(&shader).expect("unknown shader");
        match fake_compile(&entry.source) {
            Ok(()) => entry.compiled = true,
            Err(log) => {
                entry.compiled = false;
                entry.log = log;
            }
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state.borrow().shaders[&shader].compiled
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.state.borrow().shaders[&shader].log.clone()
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.shaders.remove(&shader).is_some(),
            "shader {shader} deleted twice"
        );
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = state.program_create_failure.take() {
            return Err(message);
        }
        state.next_id += 1;
        let id = state.next_id;
        state.programs_created += 1;
        state.programs.insert(id, FakeProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        assert!(state.shaders.contains_key(&shader), "attaching dead shader");
        let entry = state.programs.get_mut(&program).expect("unknown program");
        assert!(
            !entry.attached.contains(&shader),
            "shader {shader} attached twice"
        );
        entry.attached.push(shader);
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        let entry = state.programs.get_mut(&program).expect("unknown program");
        entry.attached.retain(|attached| *attached != shader);
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let injected = state.link_failure.take();
        let attached = state.programs[&program].attached.clone();
        let stages: Vec<_> = attached.iter().map(|id| state.shaders[id].stage).collect();
        let all_compiled = attached.iter().all(|id| state.shaders[id].compiled);
        let uniforms: Vec<_> = attached
            .iter()
            .flat_map(|id| declared_uniforms(&state.shaders[id].source).collect::<Vec<_>>())
            .collect();

        let entry = state.programs.get_mut(&program).expect("unknown program");
        entry.linked_stages = stages;
        match injected {
            Some(log) => {
                entry.linked = false;
                entry.log = log;
            }
            None if !all_compiled => {
                entry.linked = false;
                entry.log = "error: attached shader was not compiled".to_string();
            }
            None => {
                entry.linked = true;
                entry.uniforms = uniforms;
            }
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state.borrow().programs[&program].linked
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state.borrow().programs[&program].log.clone()
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.programs.remove(&program).is_some(),
            "program {program} deleted twice"
        );
        if state.current == Some(program) {
            state.current = None;
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.state.borrow_mut().current = program;
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<(u32, String)> {
        let state = self.state.borrow();
        let entry = state.programs.get(&program)?;
        entry
            .uniforms
            .iter()
            .any(|declared| declared == name)
            .then(|| (program, name.to_string()))
    }

    fn upload_uniform(&self, location: &(u32, String), value: &UniformValue) {
        let mut state = self.state.borrow_mut();
        let (program, name) = location.clone();
        state.uploads.push(Upload {
            program,
            name,
            value: *value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_compiler_reports_unbalanced_braces() {
        let log = fake_compile("void main() {\n  gl_Position = vec4(0.0);\n").unwrap_err();
        assert!(log.contains("syntax error"));
        assert!(fake_compile("void main() { }").is_ok());
        assert!(fake_compile("void helper() { }").is_err());
    }

    #[test]
    fn uniform_declarations_are_discovered() {
        let source = "uniform vec4 color;\nlayout(location = 2) uniform mat4 transform;\nuniform sampler2D tex[2];\n";
        let names: Vec<_> = declared_uniforms(source).collect();
        assert_eq!(names, vec!["color", "transform", "tex"]);
    }
}
