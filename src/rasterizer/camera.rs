//! Fly camera driven by yaw and pitch
//!
//! The front vector is never edited directly: every change goes through yaw
//! and pitch and `update_front` rebuilds it.

use super::math::{mat4_look_at, Mat4, Vec3};

/// Pitch limit in degrees, keeps the view from flipping over the pole
pub const PITCH_LIMIT: f32 = 89.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Degrees, -90 looks down -Z
    pub yaw: f32,
    /// Degrees, clamped to +-PITCH_LIMIT
    pub pitch: f32,
    front: Vec3,
    up: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            yaw: -90.0,
            pitch: 0.0,
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::UP,
        };
        cam.update_front();
        cam
    }

    /// Spherical to Cartesian, normalized
    pub fn update_front(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Move along the view direction (negative distance moves back)
    pub fn advance(&mut self, distance: f32) {
        self.position += self.front * distance;
    }

    pub fn turn(&mut self, degrees: f32) {
        self.yaw += degrees;
        self.update_front();
    }

    /// Free-look: add to yaw and pitch, clamping pitch
    pub fn look(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_front();
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4_look_at(self.position, self.position + self.front, self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_looks_down_minus_z() {
        let cam = Camera::new();
        assert!((cam.front() - Vec3::new(0.0, 0.0, -1.0)).len() < 1e-6);
    }

    #[test]
    fn test_pitch_clamps_exactly() {
        let mut cam = Camera::new();
        cam.look(0.0, 80.0);
        cam.look(0.0, 25.0);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        cam.look(0.0, -500.0);
        assert_eq!(cam.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_front_stays_unit_length() {
        let mut cam = Camera::new();
        for i in 0..50 {
            cam.turn(7.3);
            cam.look(3.1, if i % 2 == 0 { 40.0 } else { -33.0 });
            assert!((cam.front().len() - 1.0).abs() < 1e-5);
        }
    }
}
