//! # Diptych
//!
//! **Two 3D scenes, one screen, a wipe between them.**
//!
//! Diptych renders two randomly populated scenes of primitive meshes into
//! off-screen targets every frame and composites them to the window through
//! a screen-space wipe transition. Press `1` or `2` to switch scenes: a
//! smoothstep-softened band sweeps across the frame over three seconds,
//! revealing the other scene. Drag with the left mouse button to orbit the
//! camera (with inertia), scroll to zoom.
//!
//! ## Architecture
//!
//! The transition core is deliberately GPU-free:
//!
//! - [`WipeUniforms`] — the five-float record (`aspect`, `action`,
//!   `time_start`, `duration`, `time`) shared by the frame driver and the
//!   wipe shader, with the shader math mirrored on the CPU.
//! - [`Compositor`] — scene-pair bookkeeping and the strict per-frame
//!   ordering (render source, render destination, composite), driven
//!   through the [`SceneRenderer`] capability trait.
//! - [`FrameClock`] — monotonic time accumulated from injected timestamps.
//!
//! The GPU side ([`WipePass`], [`MeshPass`], [`GpuSceneRenderer`])
//! implements the trait against wgpu; [`run`] wires everything to a winit
//! window.

mod app;
mod camera;
mod color;
mod compositor;
mod gpu;
mod input;
mod mesh;
mod mesh_pass;
mod orbit_camera;
mod render_target;
mod scene;
mod time;
mod wipe;
mod wipe_pass;

pub use app::{SceneSwitcher, run};
pub use camera::Camera;
pub use color::Color;
pub use compositor::{Compositor, SceneId, SceneRenderer, TargetSlot};
pub use gpu::GpuContext;
pub use input::Input;
pub use mesh::{Mesh, Transform, Vertex3d};
pub use mesh_pass::MeshPass;
pub use orbit_camera::OrbitCamera;
pub use render_target::RenderTarget;
pub use scene::{MeshLibrary, Placement, Primitive, Scene};
pub use time::FrameClock;
pub use wipe::{DURATION, TIME_START_IDLE, WAVE_WIDTH, WipeDirection, WipeUniforms, smooth_hermite};
pub use wipe_pass::{GpuSceneRenderer, WipePass};

// Re-export the math types used in the public API.
pub use glam::{Mat4, Quat, Vec2, Vec3};

// Re-export the winit types the input surface exposes.
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
