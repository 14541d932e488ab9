//! Frame timing utilities

use std::time::{Duration, Instant};

/// Tracks the scene clock, per-frame delta and FPS.
///
/// `elapsed` plays the role of the render loop's clock: every animated term in
/// the evaluator is a function of it, so it starts at zero when the timer is
/// created and never goes backwards.
pub struct FrameTimer {
    start: Instant,
    last_frame: Instant,
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
    fps_timer: Instant,
    fps: f32,
    fps_frame_count: u32,
    /// Longest delta fed into animation; guards against huge jumps after a stall
    max_delta: Duration,
}

impl FrameTimer {
    /// Create a new frame timer
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fps_timer: now,
            fps: 0.0,
            fps_frame_count: 0,
            max_delta: Duration::from_millis(250),
        }
    }

    /// Call once per frame to update timing
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame).min(self.max_delta);
        self.last_frame = now;
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.fps_frame_count += 1;

        // Update FPS every second
        let fps_elapsed = now.saturating_duration_since(self.fps_timer);
        if fps_elapsed >= Duration::from_secs(1) {
            self.fps = self.fps_frame_count as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_timer = now;
        }
    }

    /// Get delta time in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Scene clock in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Wall time since the timer was created
    pub fn wall_time(&self) -> Duration {
        self.last_frame.saturating_duration_since(self.start)
    }

    /// Get current FPS (updated every second)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_accumulates_deltas() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::starting_at(t0);

        timer.tick_at(t0 + Duration::from_millis(16));
        timer.tick_at(t0 + Duration::from_millis(32));

        assert_eq!(timer.frame_count(), 2);
        assert!((timer.delta_secs() - 0.016).abs() < 1e-4);
        assert!((timer.elapsed_secs() - 0.032).abs() < 1e-4);
    }

    #[test]
    fn test_stall_is_clamped() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::starting_at(t0);

        timer.tick_at(t0 + Duration::from_secs(5));

        assert!((timer.delta_secs() - 0.25).abs() < 1e-4);
        assert!((timer.elapsed_secs() - 0.25).abs() < 1e-4);
        assert_eq!(timer.wall_time(), Duration::from_secs(5));
    }

    #[test]
    fn test_fps_updates_after_one_second() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::starting_at(t0);
        for i in 1..=60 {
            timer.tick_at(t0 + Duration::from_millis(i * 1000 / 60 + 1));
        }
        assert!(timer.fps() > 55.0 && timer.fps() < 65.0, "fps = {}", timer.fps());
    }
}
