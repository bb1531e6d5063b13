//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Color helpers
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    /// Unpack 0xRRGGBB into an opaque RGBA color
    pub fn from_rgb(rgb: u32) -> [f32; 4] {
        let channel = |shift: u32| ((rgb >> shift) & 0xFF) as f32 / 255.0;
        [channel(16), channel(8), channel(0), 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb() {
        assert_eq!(colors::from_rgb(0xFF0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(colors::from_rgb(0x00FF00), [0.0, 1.0, 0.0, 1.0]);
        let c = colors::from_rgb(0x336699);
        assert!((c[2] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_vertex_layout_stride() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::desc().array_stride, 24);
    }
}
