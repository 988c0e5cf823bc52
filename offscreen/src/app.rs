use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;

use log::{debug, info};

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use bmp_export::{BmpError, BmpHeader, PixelBuffer};

use gl_wrapper::framebuffer::{FBError, FrameBuffer};
use gl_wrapper::geometry::{GBError, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{PBError, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::texture::{Texture2D, TextureError, TextureFilter, TextureFormats};
use gl_wrapper::TRIANGLE;

use crate::args::{Api, Args};

/// The window is never shown, rendering goes to a framebuffer object
const SURFACE_SIZE: u32 = 64;

const CLEAR_COLOR: (f32, f32, f32) = (0.5, 0.5, 0.5);

pub struct App {
    // XXX the context and surface must be dropped before the window.
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    _event_loop: EventLoop<()>,
}

impl App {
    pub fn new(api: Api) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(SURFACE_SIZE, SURFACE_SIZE)))
            .with_visible(false)
            .with_title("offscreen");
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                // readback goes through the FBO, multisampling only costs memory
                configs
                    .min_by_key(|config| config.num_samples())
                    .expect("glutin only calls the picker with at least one config")
            })
            .map_err(|e| AppError::Display(e.to_string()))?;

        let window = window.ok_or_else(|| AppError::Context("no window was created".into()))?;

        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_api = match api {
            Api::Gl => ContextApi::OpenGl(Some(Version::new(4, 0))),
            Api::Gles => ContextApi::Gles(Some(Version::new(3, 0))),
        };

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(context_api)
            .build(Some(handle));

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attr) }
            .map_err(|e| AppError::Context(e.to_string()))?;

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = not_current
            .make_current(&gl_window.surface)
            .map_err(|e| AppError::Context(e.to_string()))?;

        gl::load_with(|s| match CString::new(s) {
            Ok(s) => gl_display.get_proc_address(s.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        if !(gl::GenFramebuffers::is_loaded()
            && gl::CheckFramebufferStatus::is_loaded()
            && gl::ReadPixels::is_loaded())
        {
            return Err(AppError::Loader);
        }

        debug!(
            "GL_VERSION {:?}, GL_RENDERER {:?}",
            gl_wrapper::gl_string(gl::VERSION),
            gl_wrapper::gl_string(gl::RENDERER)
        );

        Ok(Self {
            gl_context,
            gl_window,
            _event_loop: event_loop,
        })
    }

    /// Draws the triangle into an offscreen target and writes it to `args.output`.
    pub fn run(self, args: &Args) -> Result<(), AppError> {
        if !self.gl_context.is_current() {
            return Err(AppError::Context("context is not current".into()));
        }

        check_output_size(args)?;

        let (width, height) = (args.width, args.height);

        let triangle = GeometryBuilder::new(&TRIANGLE)
            .with_attribute(VertexAttribute::Vec2)
            .build()?;

        let color_buffer = Texture2D::empty(
            width,
            height,
            TextureFormats::Rgba8,
            TextureFilter::Linear,
        )?;

        let gl_fb = FrameBuffer::from_texture(&color_buffer)?;

        let header = args.api.glsl_header();
        let vert_src = [header, include_str!("gl_shaders/triangle_vert.glsl")].concat();
        let frag_src = [header, include_str!("gl_shaders/triangle_frag.glsl")].concat();
        let program = ProgramBuilder::new(&vert_src, &frag_src).build()?;

        let mut gl_renderer = GlRenderer::new();

        gl_fb.bind_draw();
        gl_renderer.resize(width, height);
        let (r, g, b) = CLEAR_COLOR;
        gl_renderer.clear_color(r, g, b);
        gl_renderer.draw(&triangle, &program);

        let mut pixels = PixelBuffer::new(width, height);
        gl_fb.read_pixels(pixels.as_mut_bytes())?;

        FrameBuffer::bind_default();
        gl_renderer.finish();

        pixels.export(&args.output, args.padding.into())?;

        info!("Saved {}x{} render to {:?}", width, height, args.output);

        Ok(())
    }
}

/// Fails early for sizes the bitmap header cannot describe, before
/// anything is rendered or allocated.
fn check_output_size(args: &Args) -> Result<(), AppError> {
    BmpHeader::new(args.width, args.height, args.padding.into())?;

    Ok(())
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();

        // some platforms report 0x0 for hidden windows
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN),
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs) }
            .map_err(|e| AppError::Context(e.to_string()))?;

        Ok(Self { surface, window })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not initialize display: {0}")]
    Display(String),
    #[error("Could not create GL context: {0}")]
    Context(String),
    #[error("Could not load OpenGL functions")]
    Loader,
    #[error("Failed to create framebuffer: {0}")]
    Framebuffer(#[from] FBError),
    #[error("Could not build shader program: {0}")]
    Program(#[from] PBError),
    #[error("Could not upload geometry: {0}")]
    Geometry(#[from] GBError),
    #[error("Could not allocate color buffer: {0}")]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Export(#[from] BmpError),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Display(_) => 1,
            AppError::Context(_) => 2,
            AppError::Loader => 3,
            AppError::Framebuffer(_) => 4,
            AppError::Program(_) => 5,
            AppError::Geometry(_) | AppError::Texture(_) => 6,
            AppError::Export(_) => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    #[test]
    fn exit_codes() {
        let errors = [
            AppError::Display("no display".into()),
            AppError::Context("no config".into()),
            AppError::Loader,
            AppError::Framebuffer(FBError::Incomplete(gl::FRAMEBUFFER_UNSUPPORTED)),
            AppError::Program(PBError::Compilation("0:1: syntax error".into())),
            AppError::Geometry(GBError::InvalidDataLength),
            AppError::Texture(TextureError::InvalidDimensions(0, 0)),
            AppError::Export(BmpError::InvalidHeader("missing BM magic")),
        ];

        let codes: Vec<_> = errors.iter().map(AppError::exit_code).collect();

        assert_eq!(codes, [1, 2, 3, 4, 5, 6, 6, 7]);
    }

    #[test]
    fn framebuffer_message() {
        let e: AppError = FBError::Incomplete(gl::FRAMEBUFFER_UNSUPPORTED).into();

        assert_eq!(
            e.to_string(),
            "Failed to create framebuffer: Framebuffer incomplete, status 0x8CDD"
        );
    }

    #[test]
    fn oversize_output_rejected_before_render() {
        let args = Args::try_parse_from([
            "offscreen",
            "--width",
            "65535",
            "--height",
            "65535",
        ])
        .unwrap();

        let e = check_output_size(&args).unwrap_err();

        assert!(matches!(
            e,
            AppError::Export(BmpError::DimensionsTooLarge {
                width: 65535,
                height: 65535
            })
        ));
        assert_eq!(e.exit_code(), 7);
    }

    #[test]
    fn default_output_size_accepted() {
        let args = Args::try_parse_from(["offscreen", "--padding", "aligned"]).unwrap();

        assert!(check_output_size(&args).is_ok());
    }
}
