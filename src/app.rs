//! Window plumbing, the frame driver, and the input surface.
//!
//! [`App`] implements the winit application handler. Each redraw is one
//! frame: tick the clock, push time into the compositor, apply any queued
//! scene-select or resize input, advance the orbit controls, then hand the
//! frame to the compositor for rendering. The loop reschedules itself by
//! requesting the next redraw and runs until the window closes.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowId};

use crate::camera::Camera;
use crate::compositor::{Compositor, SceneId};
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::mesh_pass::MeshPass;
use crate::orbit_camera::OrbitCamera;
use crate::scene::{MeshLibrary, Scene};
use crate::time::FrameClock;
use crate::wipe::WipeDirection;
use crate::wipe_pass::{GpuSceneRenderer, WipePass};

/// Tracks the active scene index and guards scene-select triggers.
pub struct SceneSwitcher {
    active: SceneId,
}

impl Default for SceneSwitcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneSwitcher {
    /// Scene 0 is active at startup.
    pub fn new() -> Self {
        Self {
            active: SceneId(0),
        }
    }

    pub fn active(&self) -> SceneId {
        self.active
    }

    /// Activates `target`: starts the wipe at `now`, points the target pair
    /// at (previously active, target), and updates the active index.
    ///
    /// Selecting the already-active scene is a no-op and returns `false`,
    /// so an identical transition is never restarted.
    pub fn select(
        &mut self,
        target: SceneId,
        direction: WipeDirection,
        now: f32,
        compositor: &mut Compositor,
    ) -> bool {
        if target == self.active {
            return false;
        }
        compositor.begin_transition(now, direction);
        compositor.set_scene_pair(self.active, target);
        self.active = target;
        true
    }
}

struct DemoState {
    gpu: GpuContext,
    meshes: MeshLibrary,
    scenes: [Scene; 2],
    camera: Camera,
    orbit: OrbitCamera,
    input: Input,
    mesh_pass: MeshPass,
    wipe_pass: WipePass,
    compositor: Compositor,
    switcher: SceneSwitcher,
    clock: FrameClock,
    start: Instant,
    pending_resize: Option<(u32, u32)>,
}

impl DemoState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let gpu = GpuContext::new(window)?;

        let meshes = MeshLibrary::new(&gpu);
        let mut rng = rand::thread_rng();
        let scenes = [Scene::random(&mut rng), Scene::random(&mut rng)];

        let mut camera = Camera::new();
        camera.set_aspect(gpu.width(), gpu.height());
        let orbit = OrbitCamera::new().distance(10.0);

        let mesh_pass = MeshPass::new(&gpu);
        let wipe_pass = WipePass::new(&gpu);
        let compositor = Compositor::new(gpu.width(), gpu.height());

        log::info!(
            "demo ready: {}x{}, two scenes of {} placements",
            gpu.width(),
            gpu.height(),
            scenes[0].placements.len()
        );

        Ok(Self {
            gpu,
            meshes,
            scenes,
            camera,
            orbit,
            input: Input::new(),
            mesh_pass,
            wipe_pass,
            compositor,
            switcher: SceneSwitcher::new(),
            clock: FrameClock::new(),
            start: Instant::now(),
            pending_resize: None,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        log::debug!("viewport resized to {width}x{height}");
        self.gpu.resize(width, height);
        self.camera.set_aspect(width, height);
        // Off-screen targets are reallocated at the top of the next frame.
        self.pending_resize = Some((width, height));
    }

    fn handle_scene_keys(&mut self, now: f32) {
        let triggers = [
            (KeyCode::Digit1, SceneId(0), WipeDirection::Forward),
            (KeyCode::Digit2, SceneId(1), WipeDirection::Reverse),
        ];
        for (key, target, direction) in triggers {
            if self.input.key_pressed(key)
                && self
                    .switcher
                    .select(target, direction, now, &mut self.compositor)
            {
                log::info!("wiping to scene {} at t = {now:.2}s", target.0);
            }
        }
    }

    fn redraw(&mut self) {
        let dt = self.clock.tick(self.start.elapsed());
        let t = self.clock.elapsed();
        self.compositor.advance_time(t);

        self.handle_scene_keys(t);

        self.orbit.update(&self.input, dt);
        self.orbit.update_camera(&mut self.camera);

        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = (self.gpu.width(), self.gpu.height());
                self.gpu.resize(width, height);
                return;
            }
            Err(e) => {
                log::warn!("dropping frame: {e}");
                return;
            }
        };
        let screen = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut renderer = GpuSceneRenderer {
                gpu: &self.gpu,
                encoder: &mut encoder,
                screen: &screen,
                wipe: &mut self.wipe_pass,
                mesh_pass: &mut self.mesh_pass,
                meshes: &self.meshes,
                scenes: &self.scenes,
                camera: &self.camera,
            };

            if let Some((width, height)) = self.pending_resize.take() {
                self.compositor.resize(&mut renderer, width, height);
            }
            self.compositor.render_frame(&mut renderer);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.input.begin_frame();
    }
}

/// The winit application: window lifecycle plus the render loop.
#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    state: Option<DemoState>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("diptych")
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match DemoState::new(window.clone()) {
            Ok(state) => {
                self.state = Some(state);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("startup failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                state.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                state.redraw();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }
}

/// Creates the event loop and runs the demo until the window closes.
pub fn run() -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::default();
    event_loop
        .run_app(&mut app)
        .context("event loop terminated with error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wipe::TIME_START_IDLE;

    #[test]
    fn selecting_a_new_scene_triggers_the_wipe() {
        let mut compositor = Compositor::new(800, 600);
        let mut switcher = SceneSwitcher::new();
        compositor.advance_time(10.0);

        assert!(switcher.select(SceneId(1), WipeDirection::Reverse, 10.0, &mut compositor));

        assert_eq!(switcher.active(), SceneId(1));
        assert_eq!(compositor.scene_pair(), (SceneId(0), SceneId(1)));
        let u = compositor.uniforms();
        assert_eq!(u.time_start(), 10.0);
        assert_eq!(u.action(), 1.0);
    }

    #[test]
    fn reselecting_the_active_scene_is_a_no_op() {
        let mut compositor = Compositor::new(800, 600);
        let mut switcher = SceneSwitcher::new();

        assert!(!switcher.select(SceneId(0), WipeDirection::Forward, 5.0, &mut compositor));

        assert_eq!(switcher.active(), SceneId(0));
        assert_eq!(compositor.scene_pair(), (SceneId(1), SceneId(0)));
        assert_eq!(compositor.uniforms().time_start(), TIME_START_IDLE);
    }

    #[test]
    fn switching_back_swaps_the_pair() {
        let mut compositor = Compositor::new(800, 600);
        let mut switcher = SceneSwitcher::new();

        switcher.select(SceneId(1), WipeDirection::Reverse, 10.0, &mut compositor);
        switcher.select(SceneId(0), WipeDirection::Forward, 20.0, &mut compositor);

        assert_eq!(switcher.active(), SceneId(0));
        assert_eq!(compositor.scene_pair(), (SceneId(1), SceneId(0)));
        let u = compositor.uniforms();
        assert_eq!(u.time_start(), 20.0);
        assert_eq!(u.action(), 0.0);
    }
}
