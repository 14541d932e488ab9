//! Orbit camera controller

use crate::core::camera::Camera;
use crate::core::input::InputState;
use crate::core::types::Vec3;
use winit::event::MouseButton;

/// Orbit controller: right-drag rotates around a fixed target, the wheel
/// zooms, panning is disabled. Optionally spins on its own.
pub struct OrbitCameraController {
    /// Point the camera orbits around
    pub target: Vec3,
    /// Mouse sensitivity in radians per pixel
    pub sensitivity: f32,
    /// Zoom factor per wheel line
    pub zoom_step: f32,
    /// Closest allowed distance to the target
    pub min_distance: f32,
    /// Farthest allowed distance to the target
    pub max_distance: f32,
    /// Auto-rotate speed; 1.0 is one revolution per minute
    pub auto_rotate_speed: f32,
    /// Whether auto-rotation is active
    pub auto_rotate: bool,
    /// Azimuth around the Y axis in radians
    yaw: f32,
    /// Elevation above the XZ plane in radians
    pitch: f32,
    distance: f32,
}

const PITCH_LIMIT: f32 = 1.45;

impl OrbitCameraController {
    /// Create a controller that starts where `camera` currently is
    pub fn from_camera(camera: &Camera, target: Vec3, min_distance: f32, max_distance: f32) -> Self {
        let offset = camera.position - target;
        let distance = offset.length().clamp(min_distance, max_distance);
        let yaw = offset.x.atan2(offset.z);
        let pitch = if distance > 0.0 {
            (offset.y / offset.length().max(f32::EPSILON)).clamp(-1.0, 1.0).asin()
        } else {
            0.0
        };
        Self {
            target,
            sensitivity: 0.005,
            zoom_step: 0.9,
            min_distance,
            max_distance,
            auto_rotate_speed: 0.5,
            auto_rotate: false,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            distance,
        }
    }

    /// Update camera based on input
    pub fn update(&mut self, camera: &mut Camera, input: &InputState, dt: f32) {
        if input.is_mouse_button_pressed(MouseButton::Right) {
            let (dx, dy) = input.mouse_delta();
            self.yaw -= dx * self.sensitivity;
            self.pitch += dy * self.sensitivity;
        }

        let scroll = input.scroll();
        if scroll != 0.0 {
            self.distance *= self.zoom_step.powf(scroll);
        }

        if self.auto_rotate {
            // One full turn per minute at speed 1.0
            self.yaw += std::f32::consts::TAU / 60.0 * self.auto_rotate_speed * dt;
        }

        self.apply(camera);
    }

    /// Clamp the orbit state and write it into the camera
    pub fn apply(&mut self, camera: &mut Camera) {
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);

        let offset = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        ) * self.distance;
        camera.position = self.target + offset;
        camera.point_at(self.target, Vec3::Y);
    }

    /// Current distance to the target
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Get current yaw
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Get current pitch
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_camera() -> Camera {
        Camera::look_at(Vec3::new(0.0, 2.0, 18.0), Vec3::ZERO, Vec3::Y, 45.0)
    }

    #[test]
    fn test_from_camera_preserves_position() {
        let mut camera = start_camera();
        let mut controller = OrbitCameraController::from_camera(&camera, Vec3::ZERO, 5.0, 25.0);
        let before = camera.position;
        controller.apply(&mut camera);
        assert!((camera.position - before).length() < 1e-3);
    }

    #[test]
    fn test_distance_is_clamped() {
        let mut camera = start_camera();
        let mut controller = OrbitCameraController::from_camera(&camera, Vec3::ZERO, 5.0, 25.0);
        controller.distance = 100.0;
        controller.apply(&mut camera);
        assert!((camera.position.length() - 25.0).abs() < 1e-3);

        controller.distance = 0.5;
        controller.apply(&mut camera);
        assert!((camera.position.length() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_auto_rotate_turns_per_minute() {
        let mut camera = start_camera();
        let mut controller = OrbitCameraController::from_camera(&camera, Vec3::ZERO, 5.0, 25.0);
        controller.auto_rotate = true;
        controller.auto_rotate_speed = 1.0;
        let input = InputState::new();

        let yaw0 = controller.yaw();
        controller.update(&mut camera, &input, 15.0);
        let turned = controller.yaw() - yaw0;
        assert!((turned - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
    }
}
