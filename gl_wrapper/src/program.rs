use gl::types::{GLenum, GLuint};
use std::ffi::{c_char, CString};
use thiserror::Error;

const LOG_LEN: usize = 1024;

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    pub fn build(self) -> Result<Program, PBError> {
        let vert_src = CString::new(self.vert).map_err(|_| PBError::InvalidSource)?;
        let frag_src = CString::new(self.frag).map_err(|_| PBError::InvalidSource)?;

        let mut success: i32 = 0;

        unsafe {
            let vert = compile_stage(gl::VERTEX_SHADER, &vert_src)?;
            let frag = match compile_stage(gl::FRAGMENT_SHADER, &frag_src) {
                Ok(f) => f,
                Err(e) => {
                    gl::DeleteShader(vert);
                    return Err(e);
                }
            };

            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            // flagged shaders go away together with the program
            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut i32);
            if success != 1 {
                let mut buf = [0_u8; LOG_LEN];

                gl::GetProgramInfoLog(
                    program,
                    LOG_LEN as i32,
                    std::ptr::null_mut(),
                    buf.as_mut_ptr() as *mut c_char,
                );
                gl::DeleteProgram(program);

                return Err(PBError::Linking(info_log(&buf)));
            }

            Ok(Program { id: program })
        }
    }
}

unsafe fn compile_stage(kind: GLenum, src: &CString) -> Result<GLuint, PBError> {
    let mut success: i32 = 0;

    let shader = gl::CreateShader(kind);

    gl::ShaderSource(
        shader,
        1,
        (&src.as_ptr()) as *const *const c_char,
        std::ptr::null(),
    );

    gl::CompileShader(shader);
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut i32);
    if success != 1 {
        let mut buf = [0_u8; LOG_LEN];

        gl::GetShaderInfoLog(
            shader,
            LOG_LEN as i32,
            std::ptr::null_mut(),
            buf.as_mut_ptr() as *mut c_char,
        );
        gl::DeleteShader(shader);

        return Err(PBError::Compilation(info_log(&buf)));
    }

    Ok(shader)
}

fn info_log(buf: &[u8]) -> String {
    let data = buf.split(|a| *a == 0).next().unwrap_or(buf);

    String::from_utf8_lossy(data).trim_end().to_string()
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("Shader source contains a NUL byte")]
    InvalidSource,
    #[error("{0}")]
    Compilation(String),
    #[error("{0}")]
    Linking(String),
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nul_in_source() {
        let res = ProgramBuilder::new("void main() {}\0", "void main() {}").build();

        assert!(matches!(res, Err(PBError::InvalidSource)));
    }

    #[test]
    fn log_stops_at_nul() {
        let mut buf = [0_u8; 16];
        buf[..6].copy_from_slice(b"error\n");

        assert_eq!(info_log(&buf), "error");
        assert_eq!(info_log(b"no terminator"), "no terminator");
    }
}
