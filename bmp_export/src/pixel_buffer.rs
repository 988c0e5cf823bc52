use std::path::Path;

use crate::{export_bmp_with, BmpError, RowPadding, SRC_CHANNELS};

/// RGBA8 pixels in readback order: row-major, first row at the bottom.
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Opaque white buffer, so unread pixels are easy to spot
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0xff; width as usize * height as usize * SRC_CHANNELS],
        }
    }

    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BmpError> {
        let expected = width as usize * height as usize * SRC_CHANNELS;

        if data.len() != expected {
            return Err(BmpError::InvalidSrcLength {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let index = (y as usize * self.width as usize + x as usize) * SRC_CHANNELS;
        let mut px = [0; 4];
        px.copy_from_slice(&self.data[index..index + SRC_CHANNELS]);

        Some(px)
    }

    pub fn export(&self, path: impl AsRef<Path>, padding: RowPadding) -> Result<(), BmpError> {
        export_bmp_with(path, &self.data, self.width, self.height, padding)
    }
}
