use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use bmp_export::RowPadding;

#[derive(Debug, Parser)]
pub struct Args {
    /// Path to save the bitmap to
    #[arg(short, long, default_value_os_t = PathBuf::from("texture.bmp"))]
    pub output: PathBuf,
    /// Width of the framebuffer
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..=65535))]
    pub width: u32,
    /// Height of the framebuffer
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..=65535))]
    pub height: u32,
    /// Graphics API to request the context for
    #[arg(long, value_enum, default_value_t = Api::Gl)]
    pub api: Api,
    /// Scanline padding of the written bitmap
    #[arg(long, value_enum, default_value_t = PaddingArg::None)]
    pub padding: PaddingArg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Api {
    /// Desktop OpenGL 4.0
    Gl,
    /// OpenGL ES 3.0
    Gles,
}

impl Api {
    pub fn glsl_header(&self) -> &'static str {
        match self {
            Api::Gl => "#version 400\n",
            Api::Gles => "#version 300 es\n",
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum PaddingArg {
    /// Rows packed back to back
    None,
    /// Rows padded to 4 bytes
    Aligned,
}

impl From<PaddingArg> for RowPadding {
    fn from(p: PaddingArg) -> Self {
        match p {
            PaddingArg::None => Self::None,
            PaddingArg::Aligned => Self::Aligned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["offscreen"]).unwrap();

        assert_eq!(args.output, PathBuf::from("texture.bmp"));
        assert_eq!((args.width, args.height), (800, 600));
        assert_eq!(args.api, Api::Gl);
        assert_eq!(RowPadding::from(args.padding), RowPadding::None);
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "offscreen",
            "-o",
            "frame.bmp",
            "--width",
            "4",
            "--height",
            "4",
            "--api",
            "gles",
            "--padding",
            "aligned",
        ])
        .unwrap();

        assert_eq!(args.output, PathBuf::from("frame.bmp"));
        assert_eq!((args.width, args.height), (4, 4));
        assert_eq!(args.api.glsl_header(), "#version 300 es\n");
        assert_eq!(RowPadding::from(args.padding), RowPadding::Aligned);
    }

    #[test]
    fn dimension_range() {
        assert!(Args::try_parse_from(["offscreen", "--width", "0"]).is_err());
        assert!(Args::try_parse_from(["offscreen", "--height", "65536"]).is_err());
        assert!(Args::try_parse_from(["offscreen", "--width", "65535"]).is_ok());
    }
}
