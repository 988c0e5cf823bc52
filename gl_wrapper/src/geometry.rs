use std::ffi::c_void;
use thiserror::Error;

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Uploads the interleaved vertex data into a new VAO/VBO pair.
    pub fn build(self) -> Result<Geometry, GBError> {
        let floats_per_vertex: usize = self.attributes.iter().map(|a| a.size()).sum();

        if floats_per_vertex == 0 || self.data.len() % floats_per_vertex != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let float_size = std::mem::size_of::<f32>();
        let stride = (floats_per_vertex * float_size) as i32;

        let mut vao = 0;
        let mut vbo = 0;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                (self.data.len() * float_size) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            // byte offset into the vertex
            let mut offset = 0;

            for (location, attr) in self.attributes.iter().enumerate() {
                gl::VertexAttribPointer(
                    location as u32,
                    attr.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    stride,
                    offset as *const c_void,
                );
                gl::EnableVertexAttribArray(location as u32);
                offset += attr.size() * float_size;
            }

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        let vertices = self.data.len() / floats_per_vertex;

        Ok(Geometry { vao, vbo, vertices })
    }
}

#[derive(Debug, Error)]
pub enum GBError {
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
}

#[derive(Debug, Copy, Clone)]
pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
            VertexAttribute::Vec4 => 4,
        }
    }
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    vertices: usize,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }
    pub fn vertices(&self) -> usize {
        self.vertices
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TRIANGLE;

    #[test]
    fn rejects_partial_vertex() {
        let res = GeometryBuilder::new(&TRIANGLE[..5])
            .with_attribute(VertexAttribute::Vec2)
            .build();

        assert!(matches!(res, Err(GBError::InvalidDataLength)));
    }

    #[test]
    fn rejects_missing_attributes() {
        let res = GeometryBuilder::new(&TRIANGLE).build();

        assert!(matches!(res, Err(GBError::InvalidDataLength)));
    }

    #[test]
    fn attribute_sizes() {
        let sizes: Vec<_> = [
            VertexAttribute::Float,
            VertexAttribute::Vec2,
            VertexAttribute::Vec3,
            VertexAttribute::Vec4,
        ]
        .iter()
        .map(VertexAttribute::size)
        .collect();

        assert_eq!(sizes, [1, 2, 3, 4]);
    }
}
