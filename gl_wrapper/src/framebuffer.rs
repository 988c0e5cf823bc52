use std::ffi::c_void;

use gl::types::GLenum;
use thiserror::Error;

use crate::texture::Texture2D;

/// Offscreen render target with a single color attachment.
pub struct FrameBuffer {
    id: u32,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    pub fn from_texture(texture: &Texture2D) -> Result<Self, FBError> {
        let mut id = 0;
        let status;

        unsafe {
            gl::GenFramebuffers(1, (&mut id) as *mut u32);
            gl::BindFramebuffer(gl::FRAMEBUFFER, id);

            gl::FramebufferTexture2D(
                gl::FRAMEBUFFER,
                gl::COLOR_ATTACHMENT0,
                gl::TEXTURE_2D,
                texture.id,
                0,
            );

            status = gl::CheckFramebufferStatus(gl::FRAMEBUFFER);

            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
        }

        // dropping releases the id on the error path too
        let fb = Self {
            id,
            width: texture.width(),
            height: texture.height(),
        };

        if status != gl::FRAMEBUFFER_COMPLETE {
            return Err(FBError::Incomplete(status));
        }

        Ok(fb)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bind_draw(&self) {
        unsafe {
            gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, self.id);
        }
    }

    pub fn bind_read(&self) {
        unsafe {
            gl::BindFramebuffer(gl::READ_FRAMEBUFFER, self.id);
        }
    }

    pub fn bind_default() {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
        }
    }

    /// Copies the whole attachment into `dst` as tightly packed RGBA8,
    /// first row being the bottom one.
    pub fn read_pixels(&self, dst: &mut [u8]) -> Result<(), FBError> {
        let expected = self.width as usize * self.height as usize * 4;

        if dst.len() != expected {
            return Err(FBError::InvalidDstLength {
                expected,
                actual: dst.len(),
            });
        }

        self.bind_read();

        unsafe {
            gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
            gl::ReadPixels(
                0,
                0,
                self.width as i32,
                self.height as i32,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                dst.as_mut_ptr() as *mut c_void,
            );
        }

        Ok(())
    }
}

impl Drop for FrameBuffer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteFramebuffers(1, (&self.id) as *const u32);
        }
    }
}

#[derive(Debug, Error)]
pub enum FBError {
    #[error("Framebuffer incomplete, status 0x{0:X}")]
    Incomplete(GLenum),
    #[error("Invalid destination length, expected {expected} bytes, got {actual}")]
    InvalidDstLength { expected: usize, actual: usize },
}
