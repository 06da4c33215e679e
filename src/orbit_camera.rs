//! Mouse-driven orbit controls with damped inertia.

use glam::Vec3;
use winit::event::MouseButton;

use crate::camera::Camera;
use crate::input::Input;

/// Orbits the camera around a target point.
///
/// Dragging with the left mouse button applies angular velocity; the
/// velocity decays exponentially after release, so the orbit coasts to a
/// stop instead of halting dead. Scroll zooms, clamped to the distance
/// limits.
///
/// # Example
/// ```ignore
/// let mut orbit = OrbitCamera::new().distance(10.0);
///
/// // In the frame loop:
/// orbit.update(&input, dt);
/// orbit.update_camera(&mut camera);
/// ```
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Distance from target.
    pub distance: f32,
    /// Horizontal angle in radians.
    pub azimuth: f32,
    /// Vertical angle in radians, clamped short of the poles.
    pub elevation: f32,
    /// Radians of rotation per pixel of drag.
    pub sensitivity: f32,
    /// Distance change per scroll line.
    pub zoom_sensitivity: f32,
    /// Inertia decay rate; higher stops the coast sooner.
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    azimuth_velocity: f32,
    elevation_velocity: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 10.0,
            azimuth: 0.0,
            elevation: 0.0,
            sensitivity: 0.005,
            zoom_sensitivity: 0.5,
            damping: 6.0,
            min_distance: 1.0,
            max_distance: 100.0,
            azimuth_velocity: 0.0,
            elevation_velocity: 0.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the point to orbit around.
    pub fn target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Set the orbit distance, clamped to the limits.
    pub fn distance(mut self, distance: f32) -> Self {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        self
    }

    /// Set the inertia decay rate.
    pub fn damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Advance the orbit one frame from the current input state.
    pub fn update(&mut self, input: &Input, dt: f32) {
        if input.mouse_down(MouseButton::Left) {
            let delta = input.mouse_delta();
            self.azimuth_velocity = -delta.x * self.sensitivity;
            self.elevation_velocity = delta.y * self.sensitivity;
        }

        self.azimuth += self.azimuth_velocity;
        self.elevation = (self.elevation + self.elevation_velocity).clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );

        // Exponential decay, framerate independent.
        let decay = (-self.damping * dt).exp();
        self.azimuth_velocity *= decay;
        self.elevation_velocity *= decay;

        let scroll = input.scroll_delta();
        if scroll.y != 0.0 {
            self.distance = (self.distance - scroll.y * self.zoom_sensitivity)
                .clamp(self.min_distance, self.max_distance);
        }
    }

    /// The current eye position in world space.
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.distance * self.elevation.cos() * self.azimuth.sin(),
            self.distance * self.elevation.sin(),
            self.distance * self.elevation.cos() * self.azimuth.cos(),
        );
        self.target + offset
    }

    /// Writes position and look target into a camera, leaving its
    /// projection parameters alone.
    pub fn update_camera(&self, camera: &mut Camera) {
        camera.position = self.eye();
        camera.target = self.target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_pose_looks_down_negative_z() {
        let orbit = OrbitCamera::new().distance(10.0);
        assert!((orbit.eye() - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5);
    }

    #[test]
    fn inertia_decays_without_input() {
        let mut orbit = OrbitCamera::new();
        orbit.azimuth_velocity = 1.0;
        let input = Input::new();

        let start = orbit.azimuth;
        for _ in 0..120 {
            orbit.update(&input, 1.0 / 60.0);
        }

        // The orbit coasted, then the velocity died out.
        assert!(orbit.azimuth > start);
        assert!(orbit.azimuth_velocity.abs() < 1e-3);
    }

    #[test]
    fn elevation_stays_clear_of_poles() {
        let mut orbit = OrbitCamera::new();
        orbit.elevation_velocity = 10.0;
        orbit.update(&Input::new(), 1.0 / 60.0);
        assert!(orbit.elevation < std::f32::consts::FRAC_PI_2);
    }
}
