//! Pointer force field
//!
//! The pointer is projected onto the screen-facing plane through the orbit
//! target, spanned by the camera's right and up axes and scaled by the viewport
//! size at the camera distance. Foliage within `radius` of it is pushed away at
//! rest and pulled in while the button is held.

use glam::{Vec2, Vec3};

use crate::morph::{approach, approach_vec3, Smoothing, SmoothingMode};

/// Pointer field tuning
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// World-space radius of influence
    pub radius: f32,
    /// Peak displacement at full strength
    pub force: f32,
    /// Strength while the pointer is up
    pub idle_strength: f32,
    /// Strength while the pointer is down
    pub active_strength: f32,
    /// Per-frame smoothing factor for position, strength and pulling
    pub follow: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            force: 2.0,
            idle_strength: 0.4,
            active_strength: 1.0,
            follow: 0.1,
        }
    }
}

/// Smoothed field state for one frame, read by the foliage evaluator and shader
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionSample {
    pub position: Vec3,
    pub strength: f32,
    /// 0 pushes away, 1 pulls in
    pub pulling: f32,
    pub radius: f32,
    pub force: f32,
}

impl InteractionSample {
    /// Displacement applied to a particle at `pos`, and its influence in [0, 1]
    pub fn displacement(&self, pos: Vec3) -> (Vec3, f32) {
        let offset = pos - self.position;
        let dist = offset.length();
        if dist >= self.radius || self.radius <= 0.0 {
            return (Vec3::ZERO, 0.0);
        }
        let influence = (1.0 - dist / self.radius).powi(2);
        let dir = offset.normalize_or_zero();
        let push = dir.lerp(-dir, self.pulling);
        (push * influence * self.force * self.strength, influence)
    }
}

/// Pointer state owned by the foliage population
#[derive(Clone, Debug)]
pub struct PointerField {
    config: InteractionConfig,
    smoothing: Smoothing,
    right: Vec3,
    up: Vec3,
    target: Vec3,
    position: Vec3,
    strength: f32,
    pulling: f32,
    down: bool,
}

impl PointerField {
    pub fn new(config: InteractionConfig, mode: SmoothingMode) -> Self {
        Self {
            smoothing: Smoothing::from_mode(mode, config.follow),
            config,
            right: Vec3::X,
            up: Vec3::Y,
            target: Vec3::ZERO,
            position: Vec3::ZERO,
            strength: 0.0,
            pulling: 0.0,
            down: false,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Align the pointer plane with the camera. Defaults to world X and Y;
    /// degenerate axes are ignored.
    pub fn orient(&mut self, right: Vec3, up: Vec3) {
        let (right, up) = (right.normalize_or_zero(), up.normalize_or_zero());
        if right != Vec3::ZERO && up != Vec3::ZERO {
            self.right = right;
            self.up = up;
        }
    }

    /// Set the pointer from normalized coordinates and the viewport size at the target plane
    pub fn set_pointer(&mut self, ndc: Vec2, viewport: Vec2) {
        self.target = self.right * (ndc.x * viewport.x / 2.0) + self.up * (ndc.y * viewport.y / 2.0);
    }

    pub fn press(&mut self) {
        self.down = true;
    }

    pub fn release(&mut self) {
        self.down = false;
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Advance the smoothed values by one frame
    pub fn update(&mut self, dt: f32) {
        let factor = self.smoothing.factor(dt);
        let (strength, pulling) = if self.down {
            (self.config.active_strength, 1.0)
        } else {
            (self.config.idle_strength, 0.0)
        };
        self.position = approach_vec3(self.position, self.target, factor);
        self.strength = approach(self.strength, strength, factor);
        self.pulling = approach(self.pulling, pulling, factor);
    }

    /// Unsmoothed world-space pointer target
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn sample(&self) -> InteractionSample {
        InteractionSample {
            position: self.position,
            strength: self.strength,
            pulling: self.pulling,
            radius: self.config.radius,
            force: self.config.force,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn resting(pulling: f32) -> InteractionSample {
        InteractionSample {
            position: Vec3::ZERO,
            strength: 1.0,
            pulling,
            radius: 4.0,
            force: 2.0,
        }
    }

    #[test]
    fn test_displacement_follows_squared_falloff() {
        let field = resting(0.0);
        for dist in [0.5f32, 1.0, 2.0, 3.0, 3.9] {
            let (d, influence) = field.displacement(Vec3::new(dist, 0.0, 0.0));
            let expected = (1.0 - dist / 4.0).powi(2);
            assert!((influence - expected).abs() < 1e-6);
            assert!((d.length() - expected * 2.0).abs() < 1e-5, "dist={dist}");
        }
    }

    #[test]
    fn test_pulling_inverts_direction() {
        let pos = Vec3::new(1.0, 1.0, 0.0);
        let (push, _) = resting(0.0).displacement(pos);
        let (pull, _) = resting(1.0).displacement(pos);
        assert!(push.dot(pos) > 0.0);
        assert!((pull + push).length() < 1e-6);
    }

    #[test]
    fn test_no_force_outside_radius() {
        let (d, influence) = resting(0.0).displacement(Vec3::new(0.0, 4.5, 0.0));
        assert_eq!(d, Vec3::ZERO);
        assert_eq!(influence, 0.0);
    }

    #[test]
    fn test_particle_on_pointer_is_not_nan() {
        let (d, _) = resting(0.0).displacement(Vec3::ZERO);
        assert!(d.is_finite());
    }

    #[test]
    fn test_pointer_maps_to_viewport_plane() {
        let mut field = PointerField::new(InteractionConfig::default(), SmoothingMode::PerFrame);
        field.set_pointer(Vec2::new(1.0, -0.5), Vec2::new(16.0, 9.0));
        assert_eq!(field.target(), Vec3::new(8.0, -2.25, 0.0));
    }

    #[test]
    fn test_pointer_follows_yawed_camera() {
        let mut field = PointerField::new(InteractionConfig::default(), SmoothingMode::PerFrame);
        // Camera on +X looking at the origin: screen right is world -Z
        let camera = crate::core::camera::Camera::look_at(Vec3::new(18.0, 0.0, 0.0), Vec3::ZERO, Vec3::Y, 45.0);
        field.orient(camera.right(), camera.up());

        field.set_pointer(Vec2::new(1.0, 0.0), Vec2::new(16.0, 9.0));
        let target = field.target();
        assert!((target - Vec3::new(0.0, 0.0, -8.0)).length() < 1e-4, "{target:?}");

        field.set_pointer(Vec2::new(0.0, 1.0), Vec2::new(16.0, 9.0));
        assert!((field.target() - Vec3::new(0.0, 4.5, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_degenerate_orientation_is_ignored() {
        let mut field = PointerField::new(InteractionConfig::default(), SmoothingMode::PerFrame);
        field.orient(Vec3::ZERO, Vec3::Y);
        field.set_pointer(Vec2::new(1.0, 0.0), Vec2::new(2.0, 2.0));
        assert_eq!(field.target(), Vec3::X);
    }

    #[test]
    fn test_strength_settles_to_idle_then_active() {
        let mut field = PointerField::new(InteractionConfig::default(), SmoothingMode::PerFrame);
        assert_eq!(field.sample().strength, 0.0);
        for _ in 0..200 {
            field.update(FRAME);
        }
        assert!((field.sample().strength - 0.4).abs() < 1e-3);
        assert!(field.sample().pulling < 1e-3);

        field.press();
        for _ in 0..200 {
            field.update(FRAME);
        }
        assert!((field.sample().strength - 1.0).abs() < 1e-3);
        assert!((field.sample().pulling - 1.0).abs() < 1e-3);

        field.release();
        field.update(FRAME);
        assert!(field.sample().pulling < 1.0);
        assert!(!field.is_down());
    }

    #[test]
    fn test_position_lags_target() {
        let mut field = PointerField::new(InteractionConfig::default(), SmoothingMode::PerFrame);
        field.set_pointer(Vec2::new(1.0, 0.0), Vec2::new(10.0, 10.0));
        field.update(FRAME);
        assert!((field.sample().position.x - 0.5).abs() < 1e-6);
    }
}
