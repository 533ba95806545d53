//! Shading program
//!
//! The vertex and fragment stages of the pipeline as plain functions over a
//! set of uniforms. A `Program` is validated once at setup; after that every
//! draw call just swaps uniforms.

use super::math::{
    mat3_normal_matrix, mat3_transform, mat4_mul, mat4_transform_vec4, Mat3, Mat4, Vec3,
};
use super::render::ClipVertex;
use super::types::Color;
use crate::error::SetupError;

/// Lower bound of the lighting term, so unlit sides stay readable
pub const AMBIENT_FLOOR: f32 = 0.3;

/// What the fragment stage outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentMode {
    /// `color * max(dot(n, light), AMBIENT_FLOOR)`
    Lit,
    /// `color` unchanged (wireframe, points, normals, bbox)
    Flat,
    /// `color` unchanged, used with an id-encoded color by the pick pass
    Picking,
}

/// Per-draw inputs
#[derive(Debug, Clone, Copy)]
pub struct Uniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub color: Color,
    pub mode: FragmentMode,
}

impl Default for Uniforms {
    fn default() -> Self {
        use super::math::mat4_identity;
        Self {
            model: mat4_identity(),
            view: mat4_identity(),
            projection: mat4_identity(),
            color: Color::WHITE,
            mode: FragmentMode::Flat,
        }
    }
}

/// Compiled program: fixed light plus the current uniforms and the matrices
/// derived from them.
#[derive(Debug, Clone)]
pub struct Program {
    light_dir: Vec3,
    uniforms: Uniforms,
    mvp: Mat4,
    normal_matrix: Mat3,
}

impl Program {
    /// Default key light, pointing up and towards the viewer
    pub const LIGHT_DIR: Vec3 = Vec3::new(0.2, 0.5, 0.8);

    pub fn new() -> Result<Self, SetupError> {
        Self::with_light(Self::LIGHT_DIR)
    }

    /// Build a program with a custom light direction. Fails if the direction
    /// can't be normalized.
    pub fn with_light(light: Vec3) -> Result<Self, SetupError> {
        let finite = light.x.is_finite() && light.y.is_finite() && light.z.is_finite();
        if !finite || light.len() < 1e-6 {
            return Err(SetupError::Shader {
                stage: "fragment",
                log: format!("light direction {:?} cannot be normalized", light),
            });
        }
        let mut program = Self {
            light_dir: light.normalize(),
            uniforms: Uniforms::default(),
            mvp: [[0.0; 4]; 4],
            normal_matrix: [[0.0; 3]; 3],
        };
        program.set_uniforms(Uniforms::default());
        Ok(program)
    }

    pub fn light_dir(&self) -> Vec3 {
        self.light_dir
    }

    pub fn set_uniforms(&mut self, uniforms: Uniforms) {
        self.mvp = mat4_mul(&uniforms.projection, &mat4_mul(&uniforms.view, &uniforms.model));
        self.normal_matrix = mat3_normal_matrix(&uniforms.model);
        self.uniforms = uniforms;
    }

    /// Change only the color and mode, keeping the matrices
    pub fn set_material(&mut self, color: Color, mode: FragmentMode) {
        self.uniforms.color = color;
        self.uniforms.mode = mode;
    }

    /// Vertex stage: clip-space position, world-space normal as the varying
    pub fn vertex(&self, pos: Vec3, normal: Vec3) -> ClipVertex {
        let clip = mat4_transform_vec4(&self.mvp, [pos.x, pos.y, pos.z, 1.0]);
        ClipVertex::new(clip, mat3_transform(&self.normal_matrix, normal))
    }

    /// Position-only vertex stage for lines and points
    pub fn project(&self, pos: Vec3) -> [f32; 4] {
        mat4_transform_vec4(&self.mvp, [pos.x, pos.y, pos.z, 1.0])
    }

    /// Fragment stage
    pub fn fragment(&self, normal: Vec3) -> Color {
        match self.uniforms.mode {
            FragmentMode::Lit => {
                let diff = normal.normalize().dot(self.light_dir).max(AMBIENT_FLOOR);
                self.uniforms.color.shade(diff)
            }
            FragmentMode::Flat | FragmentMode::Picking => self.uniforms.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_light_is_shader_error() {
        let err = Program::with_light(Vec3::ZERO).unwrap_err();
        assert!(matches!(err, SetupError::Shader { stage: "fragment", .. }));
    }

    #[test]
    fn test_lit_fragment_floors_at_ambient() {
        let mut p = Program::new().unwrap();
        p.set_material(Color::WHITE, FragmentMode::Lit);
        let away = -p.light_dir();
        assert!((p.fragment(away).r - AMBIENT_FLOOR).abs() < 1e-6);
        assert!((p.fragment(p.light_dir()).r - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_picking_fragment_is_unshaded() {
        let mut p = Program::new().unwrap();
        let id = Color::new(7.0 / 255.0, 0.0, 0.0);
        p.set_material(id, FragmentMode::Picking);
        assert_eq!(p.fragment(Vec3::new(0.0, -1.0, 0.0)), id);
    }
}
