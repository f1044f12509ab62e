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

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

/// Opaque color from 8-bit channels
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    rgba(r, g, b, 255)
}

/// Color from 8-bit channels
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ]
}

/// Colors for game elements
pub mod colors {
    use super::{Color, rgb, rgba};

    pub const RED: Color = rgb(255, 80, 80);
    pub const GREEN: Color = rgb(80, 255, 80);
    pub const GRAY: Color = rgb(150, 150, 150);
    pub const BLACK: Color = rgb(0, 0, 0);
    pub const YELLOW: Color = rgb(255, 255, 0);
    pub const WHITE: Color = rgb(255, 255, 255);
    pub const BUTTON: Color = rgb(50, 150, 255);
    pub const BUTTON_HOVER: Color = rgb(100, 200, 255);
    pub const CRAFT_HULL: Color = rgb(0, 200, 200);
    pub const CRAFT_DOME: Color = rgb(180, 250, 250);
    pub const OVERLAY: Color = rgba(0, 0, 0, 220);
    pub const INTRO_DIM: Color = rgba(0, 0, 0, 180);
}
