use thiserror::Error;

use crate::context::ShaderStage;

/// Failures surfaced by the engine.
///
/// Compile and link failures are soft for the caller that matters: the engine
/// keeps the previous program active and keeps drawing it. Resource creation
/// and texture upload failures are hard; there is nothing to fall back to.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("driver refused to create a {kind} object: {detail}")]
    ResourceCreation { kind: &'static str, detail: String },

    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("shader program failed to link:\n{log}")]
    Link { log: String },

    #[error("texture upload rejected by the driver (gl error 0x{code:04x})")]
    TextureUpload { code: u32 },

    #[error("pixel buffer is {actual} bytes but a {width}x{height} RGBA image needs {expected}")]
    ImageSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}
