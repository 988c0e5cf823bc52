use gl::types::GLenum;
use thiserror::Error;

/// Largest side accepted for render targets
pub const MAX_SIZE: u32 = u16::MAX as u32;

pub struct Texture2D {
    pub(crate) id: u32,
    width: u32,
    height: u32,
}

impl Texture2D {
    /// Allocates storage without uploading anything, for use as a render target.
    pub fn empty(
        width: u32,
        height: u32,
        format: TextureFormats,
        filter: TextureFilter,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 || width > MAX_SIZE || height > MAX_SIZE {
            return Err(TextureError::InvalidDimensions(width, height));
        }

        let mut id = 0;

        unsafe {
            gl::GenTextures(1, (&mut id) as *mut u32);
            gl::BindTexture(gl::TEXTURE_2D, id);

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format.internal_format() as i32,
                width as i32,
                height as i32,
                0,
                gl::RGBA,
                format.data_type(),
                std::ptr::null(),
            );

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, filter.gl_enum() as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, filter.gl_enum() as i32);

            gl::BindTexture(gl::TEXTURE_2D, 0);
        }

        Ok(Self { id, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, (&self.id) as *const u32);
        }
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Invalid texture dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),
}

#[derive(Debug, Copy, Clone)]
pub enum TextureFormats {
    Rgba8,
}

impl TextureFormats {
    fn internal_format(&self) -> GLenum {
        match self {
            TextureFormats::Rgba8 => gl::RGBA8,
        }
    }

    fn data_type(&self) -> GLenum {
        match self {
            TextureFormats::Rgba8 => gl::UNSIGNED_BYTE,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

impl TextureFilter {
    fn gl_enum(&self) -> GLenum {
        match self {
            TextureFilter::Nearest => gl::NEAREST,
            TextureFilter::Linear => gl::LINEAR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_target() {
        let res = Texture2D::empty(0, 600, TextureFormats::Rgba8, TextureFilter::Linear);

        assert!(matches!(res, Err(TextureError::InvalidDimensions(0, 600))));
    }

    #[test]
    fn rejects_oversize_target() {
        let res = Texture2D::empty(800, 70000, TextureFormats::Rgba8, TextureFilter::Nearest);

        assert!(matches!(res, Err(TextureError::InvalidDimensions(800, 70000))));
    }
}
