use anyhow::{ensure, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::RenderCtx;

/// Interleaved vertex: position, normal (or color), uv. Stride is 8 floats.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Number of `f32`s per vertex in interleaved data.
    pub const FLOATS: usize = 8;

    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Indexed triangle mesh uploaded to the GPU.
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl Mesh {
    /// Uploads interleaved vertex data (`Vertex::FLOATS` per vertex) and `u32` indices.
    pub fn from_interleaved(ctx: &RenderCtx<'_>, vertices: &[f32], indices: &[u32]) -> Result<Self> {
        validate_interleaved(vertices, indices)?;

        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("rutile mesh vbo"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("rutile mesh ibo"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: u32::try_from(indices.len())?,
        })
    }

    /// Binds the buffers and issues one indexed draw.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Checks interleaved data shape and index range. Returns the vertex count.
fn validate_interleaved(vertices: &[f32], indices: &[u32]) -> Result<usize> {
    ensure!(!vertices.is_empty(), "mesh has no vertices");
    ensure!(
        vertices.len() % Vertex::FLOATS == 0,
        "interleaved vertex data length {} is not a multiple of {}",
        vertices.len(),
        Vertex::FLOATS
    );
    ensure!(
        !indices.is_empty() && indices.len() % 3 == 0,
        "index count {} is not a positive multiple of 3",
        indices.len()
    );

    let vertex_count = vertices.len() / Vertex::FLOATS;
    if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        anyhow::bail!("index {bad} out of range for {vertex_count} vertices");
    }

    Ok(vertex_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: [f32; 24] = [
        -0.5, -0.5, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 0.5, 0.0, 0.0, 1.0, 0.0, 0.5, 1.0, //
        0.5, -0.5, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0,
    ];

    #[test]
    fn vertex_stride_is_eight_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 8 * 4);
        assert_eq!(Vertex::layout().array_stride, 32);
        assert_eq!(Vertex::ATTRS[1].offset, 12);
        assert_eq!(Vertex::ATTRS[2].offset, 24);
    }

    #[test]
    fn interleaved_floats_cast_to_vertices() {
        let verts: &[Vertex] = bytemuck::cast_slice(&TRIANGLE);
        assert_eq!(verts.len(), 3);
        assert_eq!(verts[1].position, [0.0, 0.5, 0.0]);
        assert_eq!(verts[2].uv, [1.0, 0.0]);
    }

    #[test]
    fn accepts_triangle() {
        assert_eq!(validate_interleaved(&TRIANGLE, &[0, 1, 2]).unwrap(), 3);
    }

    #[test]
    fn rejects_ragged_vertex_data() {
        assert!(validate_interleaved(&TRIANGLE[..23], &[0, 1, 2]).is_err());
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = validate_interleaved(&TRIANGLE, &[0, 1, 3]).unwrap_err();
        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn rejects_partial_triangle() {
        assert!(validate_interleaved(&TRIANGLE, &[0, 1]).is_err());
    }
}
