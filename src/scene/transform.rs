//! Camera and object transforms

use crate::rasterizer::camera::Camera;
use crate::rasterizer::math::{
    mat4_from_quat, mat4_mul, mat4_perspective, mat4_scale, mat4_translation, Mat4, Quat, Vec3,
};

pub const FOV_Y_DEGREES: f32 = 45.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 100.0;

/// Where the object sits after a reset, in front of the default camera
pub const DEFAULT_OBJECT_POSITION: Vec3 = Vec3::new(0.0, 0.0, -3.0);

/// User-controlled placement of the whole model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pub position: Vec3,
    pub rotation: Quat,
    /// Per-axis scale on top of the normalization factor
    pub scale: Vec3,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            position: DEFAULT_OBJECT_POSITION,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Held movement keys for one camera tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Motion {
    pub forward: bool,
    pub back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformModel {
    pub camera: Camera,
    pub object: ObjectTransform,
    model_center: Vec3,
    normalization_scale: f32,
}

impl TransformModel {
    pub fn new() -> Self {
        Self {
            camera: Camera::new(),
            object: ObjectTransform::default(),
            model_center: Vec3::ZERO,
            normalization_scale: 1.0,
        }
    }

    /// Center and scale computed by the geometry store at load time
    pub fn set_model_frame(&mut self, center: Vec3, normalization_scale: f32) {
        self.model_center = center;
        self.normalization_scale = normalization_scale;
    }

    /// Camera back to the origin looking down -Z, object back in front of it
    pub fn reset_view(&mut self) {
        self.camera = Camera::new();
        self.center_object();
    }

    /// Reset only the object placement
    pub fn center_object(&mut self) {
        self.object = ObjectTransform::default();
    }

    /// One fixed-timestep camera update from held keys
    pub fn update_camera(&mut self, motion: Motion, move_speed: f32, turn_speed: f32, dt: f32) {
        if motion.forward {
            self.camera.advance(move_speed * dt);
        }
        if motion.back {
            self.camera.advance(-move_speed * dt);
        }
        if motion.turn_left {
            self.camera.yaw -= turn_speed * dt;
        }
        if motion.turn_right {
            self.camera.yaw += turn_speed * dt;
        }
        self.camera.update_front();
    }

    /// Free-look from a cursor delta in window pixels (y grows downwards)
    pub fn look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.camera.look(dx * sensitivity, -dy * sensitivity);
    }

    /// Trackball-style drag: the increment is applied in world space,
    /// before the current rotation.
    pub fn rotate_object(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        let rot_y = Quat::from_axis_angle(Vec3::UP, dx * sensitivity);
        let rot_x = Quat::from_axis_angle(Vec3::X, dy * sensitivity);
        self.object.rotation = (rot_y * rot_x * self.object.rotation).normalize();
    }

    /// translate(position) * rotate * scale(scale * normalization) * translate(-center)
    pub fn global_matrix(&self) -> Mat4 {
        let t = mat4_translation(self.object.position);
        let r = mat4_from_quat(self.object.rotation);
        let s = mat4_scale(self.object.scale * self.normalization_scale);
        let c = mat4_translation(-self.model_center);
        mat4_mul(&t, &mat4_mul(&r, &mat4_mul(&s, &c)))
    }

    /// Global matrix followed by a sub-mesh's local offset
    pub fn submesh_matrix(&self, local_position: Vec3) -> Mat4 {
        mat4_mul(&self.global_matrix(), &mat4_translation(local_position))
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        mat4_perspective(FOV_Y_DEGREES.to_radians(), aspect, NEAR, FAR)
    }
}

impl Default for TransformModel {
    fn default() -> Self {
        Self::new()
    }
}
