//! Recording mock context for unit tests.
//!
//! Models just enough of the driver to exercise the engine: compile and link
//! status from marker tokens in the source text, uniform and attribute
//! presence by scanning attached sources, injectable creation and upload
//! failures, and a call log for ordering assertions.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::context::{GlContext, ShaderStage};
use crate::error::EngineError;

/// Sources containing this token fail compilation in the mock. `#error`
/// happens to fail real GLSL compilers too.
pub const BAD_COMPILE: &str = "#error";

/// Sources containing this token compile but fail linking in the mock.
pub const BAD_LINK: &str = "__link_mismatch__";

pub const VERTEX_SOURCE: &str =
    "in vec2 a_pos; out vec2 fragCoord; void main() { fragCoord = a_pos * 0.5 + 0.5; }";

pub const FULL_FRAGMENT: &str = "uniform float u_time; uniform vec2 u_mouse; \
     uniform vec2 u_resolution; uniform sampler2D u_texture; \
     out vec4 fragColor; void main() {}";

/// Declares `u_time` only; pointer, resolution, and sampler are absent.
pub const PLAIN_FRAGMENT: &str = "uniform float u_time; out vec4 fragColor; void main() {}";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UseProgram(Option<u32>),
    DeleteShader(u32),
    DeleteProgram(u32),
    DeleteTexture(u32),
    EnableAttrib(u32),
    AttribPointer(u32),
    Uniform1F { name: String, value: f32 },
    Uniform2F { name: String, x: f32, y: f32 },
    Uniform1I { name: String, value: i32 },
    ActiveTextureUnit(u32),
    BindTexture(Option<u32>),
    Viewport(u32, u32),
    ClearColor([f32; 4]),
    Clear,
    Draw { index_count: i32 },
}

/// Uniform locations carry the name they resolved from so call-log
/// assertions can match on it.
#[derive(Debug, Clone, PartialEq)]
pub struct MockUniform {
    pub name: String,
}

struct MockShader {
    source: String,
    compiled_ok: bool,
}

struct MockProgram {
    sources: Vec<String>,
    linked_ok: bool,
}

#[derive(Default)]
struct MockState {
    next_id: u32,
    shaders: HashMap<u32, MockShader>,
    programs: HashMap<u32, MockProgram>,
    live_textures: HashSet<u32>,
    calls: Vec<Call>,
    deny_kinds: HashSet<&'static str>,
    fail_texture_upload: bool,
}

impl MockState {
    fn alloc_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct MockGl {
    state: RefCell<MockState>,
}

impl MockGl {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(MockState::default()),
        }
    }

    /// Makes `create_*` fail for the given object kind
    /// (`"shader"`, `"program"`, `"buffer"`, `"texture"`).
    pub fn deny_creation(&self, kind: &'static str) {
        self.state.borrow_mut().deny_kinds.insert(kind);
    }

    /// Makes every subsequent texture upload report a driver error.
    pub fn fail_texture_uploads(&self) {
        self.state.borrow_mut().fail_texture_upload = true;
    }

    /// Drains the call log.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    pub fn live_texture_count(&self) -> usize {
        self.state.borrow().live_textures.len()
    }

    pub fn program_exists(&self, program: u32) -> bool {
        self.state.borrow().programs.contains_key(&program)
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn check_denied(&self, kind: &'static str) -> Result<(), EngineError> {
        if self.state.borrow().deny_kinds.contains(kind) {
            Err(EngineError::ResourceCreation {
                kind,
                detail: "denied by test".into(),
            })
        } else {
            Ok(())
        }
    }
}

impl Default for MockGl {
    fn default() -> Self {
        Self::new()
    }
}

impl GlContext for MockGl {
    type ShaderId = u32;
    type ProgramId = u32;
    type BufferId = u32;
    type TextureId = u32;
    type UniformLocation = MockUniform;

    fn create_shader(&self, _stage: ShaderStage) -> Result<u32, EngineError> {
        self.check_denied("shader")?;
        let mut state = self.state.borrow_mut();
        let id = state.alloc_id();
        state.shaders.insert(
            id,
            MockShader {
                source: String::new(),
                compiled_ok: false,
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let mut state = self.state.borrow_mut();
        let record = state.shaders.get_mut(&shader).expect("unknown shader id");
        record.source = source.to_owned();
    }

    fn compile_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        let record = state.shaders.get_mut(&shader).expect("unknown shader id");
        record.compiled_ok = !record.source.contains(BAD_COMPILE);
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state.borrow().shaders[&shader].compiled_ok
    }

    fn shader_info_log(&self, shader: u32) -> String {
        if self.state.borrow().shaders[&shader].compiled_ok {
            String::new()
        } else {
            "ERROR: 0:1: mock compile failure".to_owned()
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.state.borrow_mut().shaders.remove(&shader);
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, EngineError> {
        self.check_denied("program")?;
        let mut state = self.state.borrow_mut();
        let id = state.alloc_id();
        state.programs.insert(
            id,
            MockProgram {
                sources: Vec::new(),
                linked_ok: false,
            },
        );
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        let source = state.shaders[&shader].source.clone();
        let record = state.programs.get_mut(&program).expect("unknown program id");
        record.sources.push(source);
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let record = state.programs.get_mut(&program).expect("unknown program id");
        record.linked_ok = record.sources.len() == 2
            && record
                .sources
                .iter()
                .all(|source| !source.contains(BAD_COMPILE) && !source.contains(BAD_LINK));
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state.borrow().programs[&program].linked_ok
    }

    fn program_info_log(&self, program: u32) -> String {
        if self.state.borrow().programs[&program].linked_ok {
            String::new()
        } else {
            "ERROR: mock link failure".to_owned()
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.state.borrow_mut().programs.remove(&program);
        self.record(Call::DeleteProgram(program));
    }

    fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        state.programs[&program]
            .sources
            .iter()
            .any(|source| source.contains(name))
            .then_some(0)
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableAttrib(index));
    }

    fn vertex_attrib_pointer_vec2(&self, index: u32) {
        self.record(Call::AttribPointer(index));
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<MockUniform> {
        let state = self.state.borrow();
        state.programs[&program]
            .sources
            .iter()
            .any(|source| source.contains(name))
            .then(|| MockUniform {
                name: name.to_owned(),
            })
    }

    fn uniform_1_f32(&self, location: &MockUniform, value: f32) {
        self.record(Call::Uniform1F {
            name: location.name.clone(),
            value,
        });
    }

    fn uniform_2_f32(&self, location: &MockUniform, x: f32, y: f32) {
        self.record(Call::Uniform2F {
            name: location.name.clone(),
            x,
            y,
        });
    }

    fn uniform_1_i32(&self, location: &MockUniform, value: i32) {
        self.record(Call::Uniform1I {
            name: location.name.clone(),
            value,
        });
    }

    fn create_vertex_buffer(&self, _vertices: &[f32]) -> Result<u32, EngineError> {
        self.check_denied("buffer")?;
        Ok(self.state.borrow_mut().alloc_id())
    }

    fn create_index_buffer(&self, _indices: &[u16]) -> Result<u32, EngineError> {
        self.check_denied("buffer")?;
        Ok(self.state.borrow_mut().alloc_id())
    }

    fn create_texture(&self) -> Result<u32, EngineError> {
        self.check_denied("texture")?;
        let mut state = self.state.borrow_mut();
        let id = state.alloc_id();
        state.live_textures.insert(id);
        Ok(id)
    }

    fn upload_texture_rgba(
        &self,
        _texture: u32,
        _width: u32,
        _height: u32,
        _pixels: &[u8],
    ) -> Result<(), EngineError> {
        if self.state.borrow().fail_texture_upload {
            // GL_OUT_OF_MEMORY
            Err(EngineError::TextureUpload { code: 0x0505 })
        } else {
            Ok(())
        }
    }

    fn active_texture_unit(&self, unit: u32) {
        self.record(Call::ActiveTextureUnit(unit));
    }

    fn bind_texture(&self, texture: Option<u32>) {
        self.record(Call::BindTexture(texture));
    }

    fn delete_texture(&self, texture: u32) {
        self.state.borrow_mut().live_textures.remove(&texture);
        self.record(Call::DeleteTexture(texture));
    }

    fn viewport(&self, width: u32, height: u32) {
        self.record(Call::Viewport(width, height));
    }

    fn set_clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(Call::ClearColor([red, green, blue, alpha]));
    }

    fn clear_color_buffer(&self) {
        self.record(Call::Clear);
    }

    fn draw_triangle_elements(&self, index_count: i32) {
        self.record(Call::Draw { index_count });
    }
}
