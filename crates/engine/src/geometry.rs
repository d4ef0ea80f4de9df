//! Full-screen quad geometry.

use crate::context::GlContext;
use crate::error::EngineError;

/// Quad corners in clip space, top-left first, clockwise.
pub const QUAD_VERTICES: [f32; 8] = [-1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0];

/// Two triangles covering the quad.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 3, 1, 2, 3];

pub const QUAD_INDEX_COUNT: i32 = QUAD_INDICES.len() as i32;

/// The two static buffers backing every draw. Created once per context and
/// left bound for its whole life.
pub struct GeometryBuffers<C: GlContext> {
    vertex: C::BufferId,
    index: C::BufferId,
}

impl<C: GlContext> GeometryBuffers<C> {
    pub fn create(gl: &C) -> Result<Self, EngineError> {
        let vertex = gl.create_vertex_buffer(&QUAD_VERTICES)?;
        let index = gl.create_index_buffer(&QUAD_INDICES)?;
        Ok(Self { vertex, index })
    }

    pub fn vertex(&self) -> C::BufferId {
        self.vertex
    }

    pub fn index(&self) -> C::BufferId {
        self.index
    }
}
