//! Texture channel management.
//!
//! The engine consumes raw RGBA8 pixels; decoding and the vertical flip are
//! the image loader's job, so row 0 of the payload is the bottom of the
//! image by the time it gets here.

use crate::context::GlContext;
use crate::error::EngineError;

/// Validated RGBA8 pixel payload.
pub struct ImageData<'a> {
    width: u32,
    height: u32,
    pixels: &'a [u8],
}

impl<'a> ImageData<'a> {
    pub fn new(width: u32, height: u32, pixels: &'a [u8]) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::EmptyImage { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(EngineError::ImageSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        self.pixels
    }
}

pub struct TextureHandle<C: GlContext> {
    raw: C::TextureId,
}

impl<C: GlContext> TextureHandle<C> {
    pub fn raw(&self) -> C::TextureId {
        self.raw
    }
}

/// Creates and fills a fresh texture object. On upload failure the fresh
/// object is deleted; whatever texture was previously in use is untouched by
/// this function.
pub fn upload_texture<C: GlContext>(
    gl: &C,
    image: &ImageData<'_>,
) -> Result<TextureHandle<C>, EngineError> {
    let raw = gl.create_texture()?;
    if let Err(error) = gl.upload_texture_rgba(raw, image.width, image.height, image.pixels) {
        tracing::warn!(
            width = image.width,
            height = image.height,
            error = %error,
            "texture upload failed"
        );
        gl.delete_texture(raw);
        return Err(error);
    }
    Ok(TextureHandle { raw })
}
