//! Graphics-context seam.
//!
//! The engine only touches a WebGL-sized slice of OpenGL: shader and program
//! lifecycle, attribute and uniform lookup by name, two static buffers, one
//! RGBA texture, and a single indexed draw. [`GlContext`] captures exactly
//! that slice so the rest of the crate can be driven by a real context in
//! production and by a recording mock in tests.

use std::fmt;

use glow::HasContext;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// The GL surface area the engine depends on.
///
/// Lookup methods return `Option`; a missing attribute or uniform is a valid
/// outcome that downstream code must tolerate, never an error.
pub trait GlContext {
    type ShaderId: Copy + fmt::Debug;
    type ProgramId: Copy + PartialEq + fmt::Debug;
    type BufferId: Copy + fmt::Debug;
    type TextureId: Copy + PartialEq + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::ShaderId, EngineError>;
    fn shader_source(&self, shader: Self::ShaderId, source: &str);
    fn compile_shader(&self, shader: Self::ShaderId);
    fn shader_compile_status(&self, shader: Self::ShaderId) -> bool;
    fn shader_info_log(&self, shader: Self::ShaderId) -> String;
    fn delete_shader(&self, shader: Self::ShaderId);

    fn create_program(&self) -> Result<Self::ProgramId, EngineError>;
    fn attach_shader(&self, program: Self::ProgramId, shader: Self::ShaderId);
    fn link_program(&self, program: Self::ProgramId);
    fn program_link_status(&self, program: Self::ProgramId) -> bool;
    fn program_info_log(&self, program: Self::ProgramId) -> String;
    fn use_program(&self, program: Option<Self::ProgramId>);
    fn delete_program(&self, program: Self::ProgramId);

    fn attrib_location(&self, program: Self::ProgramId, name: &str) -> Option<u32>;
    fn enable_vertex_attrib_array(&self, index: u32);
    /// Points `index` at the bound vertex buffer as tightly packed,
    /// non-normalized vec2 floats.
    fn vertex_attrib_pointer_vec2(&self, index: u32);

    fn uniform_location(
        &self,
        program: Self::ProgramId,
        name: &str,
    ) -> Option<Self::UniformLocation>;
    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32);
    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32);
    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32);

    /// Creates, binds, and fills a STATIC_DRAW array buffer. The buffer
    /// stays bound afterwards.
    fn create_vertex_buffer(&self, vertices: &[f32]) -> Result<Self::BufferId, EngineError>;
    /// Creates, binds, and fills a STATIC_DRAW element buffer. The buffer
    /// stays bound afterwards.
    fn create_index_buffer(&self, indices: &[u16]) -> Result<Self::BufferId, EngineError>;

    fn create_texture(&self) -> Result<Self::TextureId, EngineError>;
    /// Binds `texture` and uploads RGBA8 pixels with linear filtering and
    /// clamp-to-edge wrapping, then checks the driver error state.
    fn upload_texture_rgba(
        &self,
        texture: Self::TextureId,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), EngineError>;
    fn active_texture_unit(&self, unit: u32);
    fn bind_texture(&self, texture: Option<Self::TextureId>);
    fn delete_texture(&self, texture: Self::TextureId);

    fn viewport(&self, width: u32, height: u32);
    fn set_clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear_color_buffer(&self);
    /// One indexed draw in triangles mode, u16 indices, from the bound
    /// element buffer.
    fn draw_triangle_elements(&self, index_count: i32);
}

/// Production context backed by [`glow`].
pub struct GlowContext {
    gl: glow::Context,
}

impl GlowContext {
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }
}

fn stage_kind(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

impl GlContext for GlowContext {
    type ShaderId = glow::NativeShader;
    type ProgramId = glow::NativeProgram;
    type BufferId = glow::NativeBuffer;
    type TextureId = glow::NativeTexture;
    type UniformLocation = glow::NativeUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::ShaderId, EngineError> {
        unsafe { self.gl.create_shader(stage_kind(stage)) }.map_err(|detail| {
            EngineError::ResourceCreation {
                kind: "shader",
                detail,
            }
        })
    }

    fn shader_source(&self, shader: Self::ShaderId, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::ShaderId) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: Self::ShaderId) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::ShaderId) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::ShaderId) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::ProgramId, EngineError> {
        unsafe { self.gl.create_program() }.map_err(|detail| EngineError::ResourceCreation {
            kind: "program",
            detail,
        })
    }

    fn attach_shader(&self, program: Self::ProgramId, shader: Self::ShaderId) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::ProgramId) {
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: Self::ProgramId) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::ProgramId) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::ProgramId>) {
        unsafe { self.gl.use_program(program) }
    }

    fn delete_program(&self, program: Self::ProgramId) {
        unsafe { self.gl.delete_program(program) }
    }

    fn attrib_location(&self, program: Self::ProgramId, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_vec2(&self, index: u32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, 2, glow::FLOAT, false, 0, 0)
        }
    }

    fn uniform_location(
        &self,
        program: Self::ProgramId,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32) {
        unsafe { self.gl.uniform_1_f32(Some(location), value) }
    }

    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32) {
        unsafe { self.gl.uniform_2_f32(Some(location), x, y) }
    }

    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32) {
        unsafe { self.gl.uniform_1_i32(Some(location), value) }
    }

    fn create_vertex_buffer(&self, vertices: &[f32]) -> Result<Self::BufferId, EngineError> {
        unsafe {
            let buffer =
                self.gl
                    .create_buffer()
                    .map_err(|detail| EngineError::ResourceCreation {
                        kind: "buffer",
                        detail,
                    })?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );
            Ok(buffer)
        }
    }

    fn create_index_buffer(&self, indices: &[u16]) -> Result<Self::BufferId, EngineError> {
        unsafe {
            let buffer =
                self.gl
                    .create_buffer()
                    .map_err(|detail| EngineError::ResourceCreation {
                        kind: "buffer",
                        detail,
                    })?;
            self.gl
                .bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(indices),
                glow::STATIC_DRAW,
            );
            Ok(buffer)
        }
    }

    fn create_texture(&self) -> Result<Self::TextureId, EngineError> {
        unsafe { self.gl.create_texture() }.map_err(|detail| EngineError::ResourceCreation {
            kind: "texture",
            detail,
        })
    }

    fn upload_texture_rgba(
        &self,
        texture: Self::TextureId,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), EngineError> {
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
            let code = self.gl.get_error();
            if code != glow::NO_ERROR {
                return Err(EngineError::TextureUpload { code });
            }
            Ok(())
        }
    }

    fn active_texture_unit(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, texture: Option<Self::TextureId>) {
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) }
    }

    fn delete_texture(&self, texture: Self::TextureId) {
        unsafe { self.gl.delete_texture(texture) }
    }

    fn viewport(&self, width: u32, height: u32) {
        unsafe { self.gl.viewport(0, 0, width as i32, height as i32) }
    }

    fn set_clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.gl.clear_color(red, green, blue, alpha) }
    }

    fn clear_color_buffer(&self) {
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT) }
    }

    fn draw_triangle_elements(&self, index_count: i32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count, glow::UNSIGNED_SHORT, 0)
        }
    }
}
