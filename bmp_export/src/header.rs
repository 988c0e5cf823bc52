use std::io::Write;

use crate::{BmpError, RowPadding};

pub const FILE_HEADER_SIZE: u32 = 14;
pub const INFO_HEADER_SIZE: u32 = 40;
/// Offset of the pixel data, both headers together
pub const HEADER_SIZE: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

pub const MAX_DIMENSION: u32 = u16::MAX as u32;

const MAGIC: [u8; 2] = *b"BM";
const BITS_PER_PIXEL: u16 = 24;

/// File header and minimal `BITMAPINFOHEADER` of a 24-bit uncompressed bitmap.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BmpHeader {
    pub width: u32,
    pub height: u32,
    pub image_size: u32,
}

impl BmpHeader {
    pub fn new(width: u32, height: u32, padding: RowPadding) -> Result<Self, BmpError> {
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(BmpError::DimensionsTooLarge { width, height });
        }

        let image_size = padding.stride(width) as u64 * height as u64;

        // size fields are 32 bit
        let image_size = u32::try_from(image_size)
            .ok()
            .filter(|size| size.checked_add(HEADER_SIZE).is_some())
            .ok_or(BmpError::DimensionsTooLarge { width, height })?;

        Ok(Self {
            width,
            height,
            image_size,
        })
    }

    pub fn file_size(&self) -> u32 {
        HEADER_SIZE + self.image_size
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE as usize] {
        let mut out = [0_u8; HEADER_SIZE as usize];

        // file header
        out[0..2].copy_from_slice(&MAGIC);
        out[2..6].copy_from_slice(&self.file_size().to_le_bytes());
        // 6..10 reserved
        out[10..14].copy_from_slice(&HEADER_SIZE.to_le_bytes());

        // info header
        out[14..18].copy_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
        out[18..22].copy_from_slice(&self.width.to_le_bytes());
        out[22..26].copy_from_slice(&self.height.to_le_bytes());
        out[26..28].copy_from_slice(&1_u16.to_le_bytes());
        out[28..30].copy_from_slice(&BITS_PER_PIXEL.to_le_bytes());
        // 30..34 compression = RGB
        out[34..38].copy_from_slice(&self.image_size.to_le_bytes());
        // 38..54 resolution and palette info, unused

        out
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), BmpError> {
        writer.write_all(&self.to_bytes())?;

        Ok(())
    }

    /// Reads back a header written by [`BmpHeader::to_bytes`].
    ///
    /// Only the minimal variant this crate produces is accepted.
    pub fn parse(data: &[u8]) -> Result<Self, BmpError> {
        if data.len() < HEADER_SIZE as usize {
            return Err(BmpError::InvalidHeader("header too short"));
        }

        if data[0..2] != MAGIC {
            return Err(BmpError::InvalidHeader("missing BM magic"));
        }

        if read_u32(data, 10) != HEADER_SIZE {
            return Err(BmpError::InvalidHeader("unexpected pixel data offset"));
        }

        if read_u32(data, 14) != INFO_HEADER_SIZE {
            return Err(BmpError::InvalidHeader("unsupported info header size"));
        }

        if read_u16(data, 26) != 1 {
            return Err(BmpError::InvalidHeader("plane count must be 1"));
        }

        if read_u16(data, 28) != BITS_PER_PIXEL {
            return Err(BmpError::InvalidHeader("only 24 bits per pixel supported"));
        }

        if read_u32(data, 30) != 0 {
            return Err(BmpError::InvalidHeader("compressed bitmaps not supported"));
        }

        let header = Self {
            width: read_u32(data, 18),
            height: read_u32(data, 22),
            image_size: read_u32(data, 34),
        };

        if header.image_size.checked_add(HEADER_SIZE) != Some(read_u32(data, 2)) {
            return Err(BmpError::InvalidHeader("file size does not match image size"));
        }

        Ok(header)
    }
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    let mut bytes = [0; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout() {
        let header = BmpHeader::new(800, 600, RowPadding::None).unwrap();
        let bytes = header.to_bytes();

        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(&bytes[2..6], &(54_u32 + 800 * 600 * 3).to_le_bytes());
        assert_eq!(&bytes[6..10], &[0, 0, 0, 0]);
        assert_eq!(&bytes[10..14], &[0x36, 0, 0, 0]);
        assert_eq!(&bytes[14..18], &[0x28, 0, 0, 0]);
        assert_eq!(&bytes[18..22], &[0x20, 0x03, 0, 0]);
        assert_eq!(&bytes[22..26], &[0x58, 0x02, 0, 0]);
        assert_eq!(&bytes[26..28], &[1, 0]);
        assert_eq!(&bytes[28..30], &[24, 0]);
        assert_eq!(&bytes[30..34], &[0, 0, 0, 0]);
        assert_eq!(&bytes[34..38], &(800_u32 * 600 * 3).to_le_bytes());
        assert!(bytes[38..54].iter().all(|b| *b == 0));
    }

    #[test]
    fn dimensions_have_zero_high_bytes() {
        let bytes = BmpHeader::new(65535, 1, RowPadding::None)
            .unwrap()
            .to_bytes();

        assert_eq!(&bytes[18..22], &[0xff, 0xff, 0, 0]);
        assert_eq!(&bytes[22..26], &[1, 0, 0, 0]);
    }

    #[test]
    fn aligned_image_size() {
        let header = BmpHeader::new(2, 3, RowPadding::Aligned).unwrap();

        assert_eq!(header.image_size, 8 * 3);
        assert_eq!(header.file_size(), 54 + 24);
    }

    #[test]
    fn too_large() {
        assert!(matches!(
            BmpHeader::new(65536, 1, RowPadding::None),
            Err(BmpError::DimensionsTooLarge { width: 65536, .. })
        ));
        assert!(matches!(
            BmpHeader::new(65535, 65535, RowPadding::None),
            Err(BmpError::DimensionsTooLarge { .. })
        ));
    }

    #[test]
    fn parse_back() {
        let header = BmpHeader::new(17, 5, RowPadding::Aligned).unwrap();

        assert_eq!(BmpHeader::parse(&header.to_bytes()).unwrap(), header);
    }

    #[test]
    fn parse_rejects_foreign_data() {
        let mut bytes = BmpHeader::new(4, 4, RowPadding::None).unwrap().to_bytes();

        assert!(BmpHeader::parse(&bytes[..20]).is_err());

        bytes[28] = 32;
        assert!(matches!(
            BmpHeader::parse(&bytes),
            Err(BmpError::InvalidHeader(_))
        ));

        bytes[0] = b'X';
        assert!(matches!(
            BmpHeader::parse(&bytes),
            Err(BmpError::InvalidHeader("missing BM magic"))
        ));
    }
}
