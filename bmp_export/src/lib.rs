//! Minimal Windows bitmap writer for RGBA framebuffer readbacks.
//!
//! Output is always a 54 byte header followed by 24-bit BGR pixel data.
//! Rows are written in the order they appear in the source buffer, so
//! a bottom-left origin readback ends up as a regular bottom-up bitmap.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use thiserror::Error;

pub mod header;
pub mod pixel_buffer;

pub use header::BmpHeader;
pub use pixel_buffer::PixelBuffer;

/// Channels per source pixel (RGBA)
pub const SRC_CHANNELS: usize = 4;
/// Bytes per written pixel (BGR)
pub const DST_CHANNELS: usize = 3;

#[derive(Debug, Error)]
pub enum BmpError {
    #[error("Could not write bitmap: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid source data length, expected {expected} bytes, got {actual}")]
    InvalidSrcLength { expected: usize, actual: usize },
    #[error("Bitmap dimensions {width}x{height} are too large")]
    DimensionsTooLarge { width: u32, height: u32 },
    #[error("Invalid bitmap header: {0}")]
    InvalidHeader(&'static str),
}

/// Scanline layout of the pixel data.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum RowPadding {
    /// Rows are packed back to back. Only readable by strict decoders when
    /// `width * 3` is a multiple of 4.
    #[default]
    None,
    /// Rows are zero padded to a multiple of 4 bytes, as the format requires.
    Aligned,
}

impl RowPadding {
    /// Length of one written row in bytes
    pub fn stride(&self, width: u32) -> usize {
        let packed = width as usize * DST_CHANNELS;

        match self {
            RowPadding::None => packed,
            RowPadding::Aligned => (packed + 3) & !3,
        }
    }
}

/// Writes `pixels` to `path` as a bitmap without row padding.
pub fn export_bmp(
    path: impl AsRef<Path>,
    pixels: &[u8],
    width: u32,
    height: u32,
) -> Result<(), BmpError> {
    export_bmp_with(path, pixels, width, height, RowPadding::None)
}

pub fn export_bmp_with(
    path: impl AsRef<Path>,
    pixels: &[u8],
    width: u32,
    height: u32,
    padding: RowPadding,
) -> Result<(), BmpError> {
    let path = path.as_ref();

    // validate before touching the destination
    BmpHeader::new(width, height, padding)?;
    check_src_len(pixels, width, height)?;

    debug!("Writing {width}x{height} bitmap to {path:?} ({padding:?} padding)");

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write_bmp(&mut writer, pixels, width, height, padding)?;

    // BufWriter swallows errors on drop
    writer.flush()?;

    Ok(())
}

/// Encodes RGBA `pixels` as a bitmap into `writer`.
///
/// Pixel `(x, y)` is read from offset `(y * width + x) * 4`, alpha is dropped.
pub fn write_bmp<W: Write>(
    writer: &mut W,
    pixels: &[u8],
    width: u32,
    height: u32,
    padding: RowPadding,
) -> Result<(), BmpError> {
    let header = BmpHeader::new(width, height, padding)?;
    check_src_len(pixels, width, height)?;

    header.write_to(writer)?;

    if width == 0 {
        return Ok(());
    }

    let mut row = vec![0_u8; padding.stride(width)];

    for src_row in pixels.chunks_exact(width as usize * SRC_CHANNELS) {
        for (dst, src) in row
            .chunks_exact_mut(DST_CHANNELS)
            .zip(src_row.chunks_exact(SRC_CHANNELS))
        {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
        }

        writer.write_all(&row)?;
    }

    Ok(())
}

pub fn encode_bmp(
    pixels: &[u8],
    width: u32,
    height: u32,
    padding: RowPadding,
) -> Result<Vec<u8>, BmpError> {
    let header = BmpHeader::new(width, height, padding)?;

    let mut out = Vec::with_capacity(header.file_size() as usize);
    write_bmp(&mut out, pixels, width, height, padding)?;

    Ok(out)
}

fn check_src_len(pixels: &[u8], width: u32, height: u32) -> Result<(), BmpError> {
    let expected = width as usize * height as usize * SRC_CHANNELS;

    if pixels.len() != expected {
        return Err(BmpError::InvalidSrcLength {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}
