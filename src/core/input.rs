//! Input state tracking

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::core::types::Vec2;

/// Tracks keyboard and pointer input state between frames
pub struct InputState {
    /// Currently pressed keys
    keys_pressed: HashSet<KeyCode>,
    /// Keys pressed this frame
    keys_just_pressed: HashSet<KeyCode>,
    /// Pointer movement delta since last frame, in pixels
    mouse_delta: (f32, f32),
    /// Current pointer position in pixels
    mouse_position: (f32, f32),
    /// Currently pressed mouse buttons
    mouse_buttons: HashSet<MouseButton>,
    /// Buttons pressed this frame
    buttons_just_pressed: HashSet<MouseButton>,
    /// Buttons released this frame
    buttons_just_released: HashSet<MouseButton>,
    /// Scroll accumulated this frame, in lines
    scroll: f32,
    /// Window size in pixels
    window_size: (f32, f32),
}

impl InputState {
    /// Create new input state
    pub fn new() -> Self {
        Self {
            keys_pressed: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            mouse_delta: (0.0, 0.0),
            mouse_position: (0.0, 0.0),
            mouse_buttons: HashSet::new(),
            buttons_just_pressed: HashSet::new(),
            buttons_just_released: HashSet::new(),
            scroll: 0.0,
            window_size: (1.0, 1.0),
        }
    }

    /// Process a window event
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(key_code),
                    state,
                    ..
                },
                ..
            } => {
                match state {
                    ElementState::Pressed => {
                        if !self.keys_pressed.contains(key_code) {
                            self.keys_just_pressed.insert(*key_code);
                        }
                        self.keys_pressed.insert(*key_code);
                    }
                    ElementState::Released => {
                        self.keys_pressed.remove(key_code);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_pointer(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.set_button(*button, state.is_pressed());
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
            }
            WindowEvent::Resized(size) => {
                self.set_window_size(size.width as f32, size.height as f32);
            }
            _ => {}
        }
    }

    fn move_pointer(&mut self, x: f32, y: f32) {
        self.mouse_delta.0 += x - self.mouse_position.0;
        self.mouse_delta.1 += y - self.mouse_position.1;
        self.mouse_position = (x, y);
    }

    fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            if self.mouse_buttons.insert(button) {
                self.buttons_just_pressed.insert(button);
            }
        } else if self.mouse_buttons.remove(&button) {
            self.buttons_just_released.insert(button);
        }
    }

    /// Set the window size used for pointer normalization
    pub fn set_window_size(&mut self, width: f32, height: f32) {
        self.window_size = (width.max(1.0), height.max(1.0));
    }

    /// Call at end of frame to reset per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.buttons_just_pressed.clear();
        self.buttons_just_released.clear();
        self.mouse_delta = (0.0, 0.0);
        self.scroll = 0.0;
    }

    /// Check if key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if key was just pressed this frame
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Get pointer delta since last frame
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    /// Get current pointer position in pixels
    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    /// Pointer position in normalized device coordinates: x right, y up, both in [-1, 1]
    pub fn pointer_ndc(&self) -> Vec2 {
        let (w, h) = self.window_size;
        let (x, y) = self.mouse_position;
        Vec2::new(
            (x / w) * 2.0 - 1.0,
            -((y / h) * 2.0 - 1.0),
        )
        .clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
    }

    /// Check if mouse button is pressed
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Check if mouse button went down this frame
    pub fn is_mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.buttons_just_pressed.contains(&button)
    }

    /// Check if mouse button went up this frame
    pub fn is_mouse_button_just_released(&self, button: MouseButton) -> bool {
        self.buttons_just_released.contains(&button)
    }

    /// Scroll accumulated this frame
    pub fn scroll(&self) -> f32 {
        self.scroll
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
