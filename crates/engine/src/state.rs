//! The engine state machine.
//!
//! One [`Engine`] per graphics context owns every piece of mutable rendering
//! state: the active program with its bindings, the quad geometry, pointer
//! state, the texture channel, and the viewport size. There is no ambient or
//! global state anywhere in the crate.

use crate::bindings::BindingSet;
use crate::compile::{compile, link, CompiledShader, LinkOutcome, Program};
use crate::context::{GlContext, ShaderStage};
use crate::error::EngineError;
use crate::geometry::{GeometryBuffers, QUAD_INDEX_COUNT};
use crate::input::PointerState;
use crate::scheduler::TimeSample;
use crate::texture::{upload_texture, ImageData, TextureHandle};

/// Resolution uniform convention: each component divided by the larger
/// extent, so the longer edge is 1.0.
pub fn resolution_uniform(width: u32, height: u32) -> [f32; 2] {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    let longest = w.max(h);
    [w / longest, h / longest]
}

/// A program and the bindings resolved against it. The two always travel
/// together; swapping one without the other would write uniforms into the
/// wrong program.
struct ActiveProgram<C: GlContext> {
    program: Program<C>,
    bindings: BindingSet<C>,
}

pub struct Engine<C: GlContext> {
    gl: C,
    geometry: GeometryBuffers<C>,
    active: ActiveProgram<C>,
    vertex_source: String,
    pointer: PointerState,
    texture: Option<TextureHandle<C>>,
    width: u32,
    height: u32,
    last_compile_failed: bool,
}

impl<C: GlContext> Engine<C> {
    /// Builds the geometry, compiles and links the initial program, and
    /// resolves its bindings. Initialisation failures are hard; with no
    /// previous program there is nothing to stay alive on.
    pub fn new(
        gl: C,
        width: u32,
        height: u32,
        vertex_source: impl Into<String>,
        fragment_source: &str,
    ) -> Result<Self, EngineError> {
        let vertex_source = vertex_source.into();
        let geometry = GeometryBuffers::create(&gl)?;
        let active = build_program(&gl, &vertex_source, fragment_source)?;
        gl.set_clear_color(0.0, 0.0, 0.0, 1.0);
        gl.viewport(width, height);
        Ok(Self {
            gl,
            geometry,
            active,
            vertex_source,
            pointer: PointerState::centered(width, height),
            texture: None,
            width,
            height,
            last_compile_failed: false,
        })
    }

    /// One frame: write the live uniforms, then clear and draw the quad.
    /// Writes to unresolved locations are skipped. A tick never fails and
    /// draws with whatever program is currently active.
    pub fn render_tick(&mut self, sample: TimeSample) {
        let bindings = &self.active.bindings;
        if let Some(location) = &bindings.time {
            self.gl
                .uniform_1_f32(location, (sample.millis / 1000.0) as f32);
        }
        if let Some(location) = &bindings.pointer {
            let [x, y] = self.pointer.to_uniform(self.width, self.height);
            self.gl.uniform_2_f32(location, x, y);
        }
        if let Some(location) = &bindings.resolution {
            let [w, h] = resolution_uniform(self.width, self.height);
            self.gl.uniform_2_f32(location, w, h);
        }
        if let Some(texture) = &self.texture {
            self.gl.active_texture_unit(0);
            self.gl.bind_texture(Some(texture.raw()));
            if let Some(location) = &bindings.sampler {
                self.gl.uniform_1_i32(location, 0);
            }
        }
        self.gl.clear_color_buffer();
        self.gl.draw_triangle_elements(QUAD_INDEX_COUNT);
    }

    /// Rebuilds the program from the stored vertex source and a new fragment
    /// source. On success the replaced program is deleted and the fresh pair
    /// of program and bindings becomes active as one unit. On any failure
    /// the current pair stays active untouched and the engine keeps drawing
    /// the last good program.
    pub fn recompile(&mut self, fragment_source: &str) -> Result<(), EngineError> {
        match build_program(&self.gl, &self.vertex_source, fragment_source) {
            Ok(next) => {
                let previous = std::mem::replace(&mut self.active, next);
                self.gl.delete_program(previous.program.raw());
                self.last_compile_failed = false;
                Ok(())
            }
            Err(error) => {
                self.last_compile_failed = true;
                Err(error)
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        self.gl.viewport(width, height);
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.update(x, y);
    }

    /// Uploads `image` and makes it the active `u_texture` channel. On
    /// failure the active texture is cleared; drawing without a texture
    /// beats drawing a wrong one.
    pub fn load_texture(&mut self, image: &ImageData<'_>) -> Result<(), EngineError> {
        match upload_texture(&self.gl, image) {
            Ok(handle) => {
                self.set_texture(Some(handle));
                Ok(())
            }
            Err(error) => {
                self.set_texture(None);
                Err(error)
            }
        }
    }

    /// Swaps the active texture, deleting the object it replaces.
    pub fn set_texture(&mut self, texture: Option<TextureHandle<C>>) {
        if let Some(previous) = self.texture.take() {
            self.gl.delete_texture(previous.raw());
        }
        self.texture = texture;
    }

    pub fn last_compile_failed(&self) -> bool {
        self.last_compile_failed
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn geometry(&self) -> &GeometryBuffers<C> {
        &self.geometry
    }

    pub fn context(&self) -> &C {
        &self.gl
    }

    #[cfg(test)]
    pub(crate) fn bindings(&self) -> &BindingSet<C> {
        &self.active.bindings
    }

    #[cfg(test)]
    pub(crate) fn program_id(&self) -> C::ProgramId {
        self.active.program.raw()
    }
}

fn build_program<C: GlContext>(
    gl: &C,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<ActiveProgram<C>, EngineError> {
    let vertex = compile(gl, ShaderStage::Vertex, vertex_source)?;
    let fragment = match compile(gl, ShaderStage::Fragment, fragment_source) {
        Ok(shader) => shader,
        Err(error) => {
            gl.delete_shader(vertex.raw());
            return Err(error);
        }
    };
    let result = link_checked(gl, &vertex, &fragment);
    // The program keeps what it needs after linking; the stage objects are
    // transient either way.
    gl.delete_shader(vertex.raw());
    gl.delete_shader(fragment.raw());
    result
}

fn link_checked<C: GlContext>(
    gl: &C,
    vertex: &CompiledShader<C>,
    fragment: &CompiledShader<C>,
) -> Result<ActiveProgram<C>, EngineError> {
    for shader in [vertex, fragment] {
        if let Some(log) = shader.failure_log() {
            return Err(EngineError::Compile {
                stage: shader.stage(),
                log: log.to_owned(),
            });
        }
    }
    match link(gl, vertex, fragment)? {
        LinkOutcome::Drawable(program) => {
            let bindings = BindingSet::resolve(gl, &program);
            Ok(ActiveProgram { program, bindings })
        }
        LinkOutcome::Rejected { log } => Err(EngineError::Link { log }),
    }
}
