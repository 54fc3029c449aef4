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

/// 8-bit RGB plus opacity to a vertex color
pub fn rgba(rgb: [u8; 3], alpha: f32) -> [f32; 4] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        alpha.clamp(0.0, 1.0),
    ]
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const OUTLINE: [u8; 3] = [0, 0, 0];
    pub const HIT_FLASH: [u8; 3] = [255, 0, 0];
    pub const PLAYER_BODY: [u8; 3] = [235, 170, 60];
    pub const PLAYER_SKIN: [u8; 3] = [250, 215, 170];
    pub const BEAN: [u8; 3] = [80, 200, 90];
    pub const EYE_WHITE: [u8; 3] = [255, 255, 255];
    pub const PUPIL: [u8; 3] = [20, 20, 20];
    pub const BLADE: [u8; 3] = [210, 220, 235];
    pub const HILT: [u8; 3] = [120, 80, 40];
    pub const ARROW_FILL: [u8; 3] = [255, 0, 0];
    pub const ARROW_OUTLINE: [u8; 3] = [255, 255, 255];
    pub const RANGE: [u8; 3] = [255, 255, 255];
    pub const EXPLOSION: [u8; 3] = [255, 0, 0];
    pub const KABOOM_CORE: [u8; 3] = [255, 230, 120];
    pub const KABOOM_RING: [u8; 3] = [255, 120, 30];
    pub const HEALTH_BG: [u8; 3] = [100, 100, 100];
    pub const HEALTH: [u8; 3] = [255, 0, 0];
}
