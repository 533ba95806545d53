//! Core types for the rasterizer

use super::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

// =============================================================================
// Color
// =============================================================================

/// Linear RGB color with float channels in 0.0-1.0 (what the panel edits)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0);
    pub const MAGENTA: Color = Color::new(1.0, 0.0, 1.0);
    /// Diffuse color of sub-meshes without a material
    pub const DEFAULT_GRAY: Color = Color::new(0.7, 0.7, 0.7);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Multiply every channel by `intensity` (no clamping, quantization clamps)
    pub fn shade(self, intensity: f32) -> Self {
        Self::new(self.r * intensity, self.g * intensity, self.b * intensity)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Quantize to RGBA8 the way a UNORM8 render target does (round to nearest)
    pub fn to_bytes(self) -> [u8; 4] {
        [quantize(self.r), quantize(self.g), quantize(self.b), 255]
    }
}

impl From<[f32; 3]> for Color {
    fn from(c: [f32; 3]) -> Self {
        Color::new(c[0], c[1], c[2])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::DEFAULT_GRAY
    }
}

fn quantize(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

// =============================================================================
// Vertex
// =============================================================================

/// A vertex of the flattened mesh: position, normal and texture coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(pos: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self { pos, normal, uv }
    }
}

// =============================================================================
// Raster settings (the render half of the parameter panel)
// =============================================================================

/// Per-mode toggles, colors and sizes read by the draw pass every frame.
///
/// Persisted with the viewer config, so every field has a serde default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    pub background: Color,
    /// Filled, lit triangles
    pub show_fill: bool,
    pub show_wireframe: bool,
    pub wireframe_color: Color,
    pub show_points: bool,
    pub point_color: Color,
    /// Point side length in pixels (1-20)
    pub point_size: f32,
    pub show_normals: bool,
    pub normal_color: Color,
    /// Normal segment length as a fraction of the bounding-box diagonal (0.01-0.5)
    pub normal_length_percent: f32,
    /// Bounding box of the selected sub-mesh
    pub show_bounding_box: bool,
    pub bounding_box_color: Color,
    pub depth_test: bool,
    pub backface_cull: bool,
}

impl RasterSettings {
    pub const POINT_SIZE_RANGE: (f32, f32) = (1.0, 20.0);
    pub const NORMAL_LENGTH_RANGE: (f32, f32) = (0.01, 0.5);
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            background: Color::new(0.1, 0.1, 0.1),
            show_fill: true,
            show_wireframe: false,
            wireframe_color: Color::GREEN,
            show_points: false,
            point_color: Color::WHITE,
            point_size: 3.0,
            show_normals: false,
            normal_color: Color::YELLOW,
            normal_length_percent: 0.05,
            show_bounding_box: false,
            bounding_box_color: Color::MAGENTA,
            depth_test: true,
            backface_cull: true,
        }
    }
}
