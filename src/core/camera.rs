//! Perspective camera

use crate::core::types::{Vec2, Vec3, Mat4, Quat};

/// Clip planes sized for a scene that fits in the 30-unit snow column
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// Perspective camera. The orbit controller writes `position` and `rotation`;
/// the window writes `aspect`.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    /// Camera-to-world rotation; the camera looks down its local -Z
    pub rotation: Quat,
    /// Vertical field of view, radians
    pub fov_y: f32,
    /// Width over height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near: NEAR,
            far: FAR,
        }
    }

    /// Camera at `position` aimed at `target`
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3, fov_y_degrees: f32) -> Self {
        let mut camera = Self::new(position, fov_y_degrees, 16.0 / 9.0);
        camera.point_at(target, up);
        camera
    }

    /// Turn toward `target` without moving. Degenerate directions leave the
    /// rotation unchanged.
    pub fn point_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        let right = forward.cross(up).normalize_or_zero();
        if right == Vec3::ZERO {
            return;
        }
        let true_up = right.cross(forward);
        self.rotation = Quat::from_mat3(&glam::Mat3::from_cols(right, true_up, -forward));
    }

    /// World to camera space
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Viewing direction in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Screen right in world space
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Screen up in world space
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Keep the projection matched to the surface; zero heights are ignored
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// World-space size of the visible plane `distance` units in front of the camera.
    ///
    /// Pointer coordinates are scaled by this so the interaction radius is the
    /// same in world units at any window resolution.
    pub fn viewport_at(&self, distance: f32) -> Vec2 {
        let height = 2.0 * (self.fov_y * 0.5).tan() * distance.abs();
        Vec2::new(height * self.aspect, height)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at(Vec3::new(0.0, 2.0, 18.0), Vec3::ZERO, Vec3::Y, 45.0)
    }
}
