//! Tinsel - interactive holiday tree

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowId},
};

use tinsel::core::{
    camera::Camera,
    camera_controller::OrbitCameraController,
    input::InputState,
    logging,
    time::FrameTimer,
    types::Vec3,
};
use tinsel::morph::{MorphState, SmoothingMode};
use tinsel::render::{GpuContext, SceneRenderer};
use tinsel::scene::{Scene, SceneConfig};

/// Command line options
#[derive(Debug, Default, PartialEq)]
struct Options {
    seed: Option<u64>,
    assembled: bool,
    time_based: bool,
    dump_config: bool,
}

impl Options {
    fn parse(args: &[String]) -> Self {
        let mut options = Self::default();
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" | "-s" => {
                    options.seed = args.get(i + 1).and_then(|s| s.parse().ok());
                    if options.seed.is_none() {
                        log::warn!("--seed needs an unsigned integer, ignored");
                    }
                    i += 1;
                }
                "--assembled" => options.assembled = true,
                "--time-based" => options.time_based = true,
                "--dump-config" => options.dump_config = true,
                other => log::warn!("Unknown argument: {}", other),
            }
            i += 1;
        }
        options
    }

    fn apply(&self, config: &mut SceneConfig) {
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.assembled {
            config.start_assembled = true;
        }
        if self.time_based {
            config.smoothing_mode = SmoothingMode::TimeBased;
        }
    }
}

/// GPU-side state, created once the window exists
struct Graphics {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: SceneRenderer,
}

struct App {
    graphics: Option<Graphics>,
    scene: Scene,
    camera: Camera,
    controller: OrbitCameraController,
    input: InputState,
    timer: FrameTimer,
}

impl App {
    fn new(scene: Scene) -> Self {
        let camera_config = scene.config().camera;
        let camera = Camera::look_at(
            Vec3::from(camera_config.position),
            Vec3::ZERO,
            Vec3::Y,
            camera_config.fov_degrees,
        );
        let mut controller = OrbitCameraController::from_camera(
            &camera,
            Vec3::ZERO,
            camera_config.min_distance,
            camera_config.max_distance,
        );
        controller.auto_rotate_speed = camera_config.auto_rotate_speed;

        Self {
            graphics: None,
            scene,
            camera,
            controller,
            input: InputState::new(),
            timer: FrameTimer::new(),
        }
    }

    fn create_graphics(&mut self, event_loop: &ActiveEventLoop) -> tinsel::core::Result<Graphics> {
        let window_attrs = Window::default_attributes()
            .with_title(format!("Tinsel | {}", self.scene.state().action_label()))
            .with_inner_size(PhysicalSize::new(1280, 720));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| tinsel::core::Error::Window(e.to_string()))?,
        );
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;

        let size = window.inner_size();
        self.camera.set_aspect(size.width as f32, size.height as f32);
        self.input.set_window_size(size.width as f32, size.height as f32);

        log::info!("Window created: {}x{}", size.width, size.height);
        log::info!("GPU: {}", gpu.adapter.get_info().name);

        let renderer = SceneRenderer::new(&gpu, &self.scene);
        Ok(Graphics { window, gpu, renderer })
    }

    fn handle_input(&mut self) {
        if self.input.is_key_just_pressed(KeyCode::Space) || self.input.is_key_just_pressed(KeyCode::Enter) {
            self.scene.toggle();
        }
        if self.input.is_mouse_button_just_pressed(MouseButton::Left) {
            self.scene.pointer_mut().press();
        }
        if self.input.is_mouse_button_just_released(MouseButton::Left) {
            self.scene.pointer_mut().release();
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.timer.tick();
        let dt = self.timer.delta_secs();

        self.handle_input();

        // Spin only while the tree is scattered
        self.controller.auto_rotate = self.scene.state() == MorphState::Scattered;
        self.controller.update(&mut self.camera, &self.input, dt);

        let viewport = self.camera.viewport_at(self.controller.distance());
        self.scene.pointer_mut().orient(self.camera.right(), self.camera.up());
        self.scene.set_pointer(self.input.pointer_ndc(), viewport);
        self.scene.tick(dt, self.timer.elapsed_secs());

        if let Some(graphics) = &mut self.graphics {
            if let Err(e) = graphics.renderer.render(&mut graphics.gpu, &self.scene, &self.camera) {
                log::error!("Render failed: {}", e);
                event_loop.exit();
                return;
            }
            graphics.window.set_title(&format!(
                "Tinsel | {} | {:.1} FPS",
                self.scene.state().action_label(),
                self.timer.fps()
            ));
        }

        self.input.end_frame();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        match self.create_graphics(event_loop) {
            Ok(graphics) => self.graphics = Some(graphics),
            Err(e) => {
                log::error!("Failed to initialise graphics: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(graphics) = &mut self.graphics {
                        graphics.gpu.resize(size.width, size.height);
                    }
                    self.camera.set_aspect(size.width as f32, size.height as f32);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let winit::keyboard::PhysicalKey::Code(KeyCode::Escape) = event.physical_key {
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                if let Some(graphics) = &self.graphics {
                    graphics.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }
}

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let options = Options::parse(&args);
    let mut config = SceneConfig::default();
    options.apply(&mut config);

    if options.dump_config {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialise config: {}", e),
        }
        return;
    }

    log::info!("Tinsel starting...");

    let scene = match Scene::new(config) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(scene);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("tinsel").chain(list.iter().copied()).map(String::from).collect()
    }

    #[test]
    fn test_parse_flags() {
        let options = Options::parse(&args(&["--seed", "42", "--assembled", "--time-based"]));
        assert_eq!(options.seed, Some(42));
        assert!(options.assembled);
        assert!(options.time_based);
        assert!(!options.dump_config);
    }

    #[test]
    fn test_bad_seed_is_ignored() {
        let options = Options::parse(&args(&["--seed", "tree", "--dump-config"]));
        assert_eq!(options.seed, None);
        assert!(options.dump_config);
    }

    #[test]
    fn test_apply_to_config() {
        let mut config = SceneConfig::default();
        Options::parse(&args(&["--seed", "7", "--time-based"])).apply(&mut config);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.smoothing_mode, SmoothingMode::TimeBased);
        assert!(!config.start_assembled);
    }
}
