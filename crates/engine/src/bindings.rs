//! Attribute and uniform resolution.
//!
//! A [`BindingSet`] is only meaningful for the program it was resolved
//! against and must be discarded together with it. Missing names resolve to
//! `None` and downgrade the matching per-tick write to a no-op.

use crate::compile::Program;
use crate::context::GlContext;

pub const POSITION_ATTRIBUTE: &str = "a_pos";
pub const TIME_UNIFORM: &str = "u_time";
pub const POINTER_UNIFORM: &str = "u_mouse";
pub const RESOLUTION_UNIFORM: &str = "u_resolution";
pub const SAMPLER_UNIFORM: &str = "u_texture";

pub struct BindingSet<C: GlContext> {
    pub position: Option<u32>,
    pub time: Option<C::UniformLocation>,
    pub pointer: Option<C::UniformLocation>,
    pub resolution: Option<C::UniformLocation>,
    pub sampler: Option<C::UniformLocation>,
}

impl<C: GlContext> BindingSet<C> {
    /// Resolves the position attribute and the well-known uniforms against
    /// `program`. The position attribute, when present, is enabled and
    /// pointed at the bound vertex buffer as part of resolution.
    pub fn resolve(gl: &C, program: &Program<C>) -> Self {
        Self {
            position: resolve_position(gl, program),
            time: resolve_uniform(gl, program, TIME_UNIFORM),
            pointer: resolve_uniform(gl, program, POINTER_UNIFORM),
            resolution: resolve_uniform(gl, program, RESOLUTION_UNIFORM),
            sampler: resolve_uniform(gl, program, SAMPLER_UNIFORM),
        }
    }
}

fn resolve_position<C: GlContext>(gl: &C, program: &Program<C>) -> Option<u32> {
    let index = gl.attrib_location(program.raw(), POSITION_ATTRIBUTE);
    match index {
        Some(index) => {
            gl.enable_vertex_attrib_array(index);
            gl.vertex_attrib_pointer_vec2(index);
        }
        None => {
            tracing::debug!(name = POSITION_ATTRIBUTE, "attribute not present in program");
        }
    }
    index
}

fn resolve_uniform<C: GlContext>(
    gl: &C,
    program: &Program<C>,
    name: &'static str,
) -> Option<C::UniformLocation> {
    let location = gl.uniform_location(program.raw(), name);
    if location.is_none() {
        tracing::debug!(name, "uniform not present in program; writes will be skipped");
    }
    location
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{compile, link, LinkOutcome};
    use crate::context::ShaderStage;
    use crate::testing::{Call, MockGl, FULL_FRAGMENT, VERTEX_SOURCE};

    fn drawable(gl: &MockGl, fragment: &str) -> Program<MockGl> {
        let vertex = compile(gl, ShaderStage::Vertex, VERTEX_SOURCE).unwrap();
        let fragment = compile(gl, ShaderStage::Fragment, fragment).unwrap();
        match link(gl, &vertex, &fragment).unwrap() {
            LinkOutcome::Drawable(program) => program,
            LinkOutcome::Rejected { log } => panic!("unexpected rejection: {log}"),
        }
    }

    #[test]
    fn resolves_everything_the_program_declares() {
        let gl = MockGl::new();
        let program = drawable(&gl, FULL_FRAGMENT);
        let bindings = BindingSet::resolve(&gl, &program);
        assert!(bindings.position.is_some());
        assert!(bindings.time.is_some());
        assert!(bindings.pointer.is_some());
        assert!(bindings.resolution.is_some());
        assert!(bindings.sampler.is_some());
    }

    #[test]
    fn position_attribute_is_enabled_and_pointed() {
        let gl = MockGl::new();
        let program = drawable(&gl, FULL_FRAGMENT);
        gl.take_calls();
        let bindings = BindingSet::resolve(&gl, &program);
        let index = bindings.position.unwrap();
        let calls = gl.take_calls();
        assert!(calls.contains(&Call::EnableAttrib(index)));
        assert!(calls.contains(&Call::AttribPointer(index)));
    }

    #[test]
    fn missing_names_resolve_to_none() {
        let gl = MockGl::new();
        let program = drawable(&gl, "out vec4 fragColor; void main() {}");
        // Vertex source still declares a_pos and nothing else.
        let bindings = BindingSet::resolve(&gl, &program);
        assert!(bindings.position.is_some());
        assert!(bindings.time.is_none());
        assert!(bindings.pointer.is_none());
        assert!(bindings.resolution.is_none());
        assert!(bindings.sampler.is_none());
    }
}
