//! Shader compile and link lifecycle.
//!
//! Compilation failure is soft: [`compile`] always hands back a shader
//! handle, and the caller inspects its status before linking. Linking yields
//! an explicit [`LinkOutcome`]; a rejected program is deleted immediately and
//! never activated, so a bad edit can never replace a working program on
//! screen.

use crate::context::{GlContext, ShaderStage};
use crate::error::EngineError;

/// A shader object together with its compile status and diagnostic.
pub struct CompiledShader<C: GlContext> {
    raw: C::ShaderId,
    stage: ShaderStage,
    status: CompileStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompileStatus {
    Compiled,
    Failed { log: String },
}

impl<C: GlContext> CompiledShader<C> {
    pub fn raw(&self) -> C::ShaderId {
        self.raw
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.status, CompileStatus::Compiled)
    }

    pub fn failure_log(&self) -> Option<&str> {
        match &self.status {
            CompileStatus::Compiled => None,
            CompileStatus::Failed { log } => Some(log),
        }
    }
}

/// Compiles one shader stage. Only a driver refusing to hand out a shader
/// object is an error; a failed compile is reported through the handle.
pub fn compile<C: GlContext>(
    gl: &C,
    stage: ShaderStage,
    source: &str,
) -> Result<CompiledShader<C>, EngineError> {
    let raw = gl.create_shader(stage)?;
    gl.shader_source(raw, source);
    gl.compile_shader(raw);
    let status = if gl.shader_compile_status(raw) {
        CompileStatus::Compiled
    } else {
        let log = gl.shader_info_log(raw);
        tracing::warn!(stage = %stage, log = %log, "shader failed to compile");
        CompileStatus::Failed { log }
    };
    Ok(CompiledShader { raw, stage, status })
}

/// A linked, drawable shader program.
pub struct Program<C: GlContext> {
    raw: C::ProgramId,
}

impl<C: GlContext> Program<C> {
    pub fn raw(&self) -> C::ProgramId {
        self.raw
    }
}

pub enum LinkOutcome<C: GlContext> {
    Drawable(Program<C>),
    Rejected { log: String },
}

/// Links the two stages into a fresh program. On success the program is
/// activated before returning; on rejection it is deleted on the spot and
/// whatever program was active stays active.
pub fn link<C: GlContext>(
    gl: &C,
    vertex: &CompiledShader<C>,
    fragment: &CompiledShader<C>,
) -> Result<LinkOutcome<C>, EngineError> {
    let raw = gl.create_program()?;
    gl.attach_shader(raw, vertex.raw());
    gl.attach_shader(raw, fragment.raw());
    gl.link_program(raw);
    if gl.program_link_status(raw) {
        gl.use_program(Some(raw));
        Ok(LinkOutcome::Drawable(Program { raw }))
    } else {
        let log = gl.program_info_log(raw);
        tracing::warn!(log = %log, "shader program failed to link");
        gl.delete_program(raw);
        Ok(LinkOutcome::Rejected { log })
    }
}
