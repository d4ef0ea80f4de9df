//! Rendering engine for an interactive fragment-shader playground.
//!
//! The engine owns the full lifecycle of a live-edited fragment shader: it
//! compiles and links programs, resolves the well-known attribute and
//! uniforms against each program, keeps the full-screen quad on the GPU, and
//! redraws it every tick with fresh time, pointer, resolution, and texture
//! inputs. The overall flow is:
//!
//! ```text
//!   host (window / headless)
//!          │ GlContext
//!          ▼
//!   Engine::new ──▶ compile + link ──▶ BindingSet::resolve
//!          │
//!   FrameScheduler ──▶ render_tick() ─▶ uniform writes ─▶ clear ─▶ draw
//!          │
//!   recompile(src) ──▶ fresh program + bindings, old pair deleted
//! ```
//!
//! Everything is generic over [`GlContext`], a trait covering exactly the GL
//! subset the engine uses. [`GlowContext`] is the production implementation;
//! tests drive the same code over a recording mock, so the uniform protocol,
//! failure containment, and cancellation semantics are all checked without a
//! GPU.
//!
//! Edit-time failures are deliberately soft: a fragment shader that no
//! longer compiles or links leaves the previous program on screen and sets
//! an observable flag, so a half-typed edit never blanks the output.

pub mod bindings;
pub mod compile;
pub mod context;
pub mod error;
pub mod geometry;
pub mod input;
pub mod scheduler;
pub mod state;
pub mod texture;

#[cfg(test)]
pub(crate) mod testing;

pub use bindings::{
    BindingSet, POINTER_UNIFORM, POSITION_ATTRIBUTE, RESOLUTION_UNIFORM, SAMPLER_UNIFORM,
    TIME_UNIFORM,
};
pub use compile::{compile, link, CompileStatus, CompiledShader, LinkOutcome, Program};
pub use context::{GlContext, GlowContext, ShaderStage};
pub use error::EngineError;
pub use geometry::{GeometryBuffers, QUAD_INDEX_COUNT, QUAD_INDICES, QUAD_VERTICES};
pub use input::PointerState;
pub use scheduler::{
    CancellationToken, FixedStepTimeSource, FrameScheduler, SystemTimeSource, TimeSample,
    TimeSource,
};
pub use state::{resolution_uniform, Engine};
pub use texture::{upload_texture, ImageData, TextureHandle};
