#[rustfmt::skip]
pub const TRIANGLE: [f32; 6] = [
    0.0, 1.0,
    1.0, -1.0,
    -1.0, -1.0,
];

pub mod framebuffer;
pub mod geometry;
pub mod program;
pub mod renderer;
pub mod texture;

/// Reads a `glGetString` value, `None` if the driver returns nothing.
pub fn gl_string(name: gl::types::GLenum) -> Option<String> {
    unsafe {
        let ptr = gl::GetString(name);

        if ptr.is_null() {
            return None;
        }

        let s = std::ffi::CStr::from_ptr(ptr as *const std::ffi::c_char);
        Some(s.to_string_lossy().into_owned())
    }
}
