use glam::{Mat4, Vec3};

/// A perspective camera looking at a target point.
///
/// Holds the projection parameters the input surface mutates on resize
/// (`aspect`) alongside position and orientation. View and projection
/// matrices are derived on demand.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// World-space eye position.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Viewport width / height.
    pub aspect: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 75.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the projection aspect ratio from a viewport size.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// World-to-camera transformation.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Camera-to-clip transformation.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined world-to-clip transformation.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_aspect_feeds_projection() {
        let mut camera = Camera::new();
        camera.set_aspect(1600, 900);
        assert_eq!(camera.aspect, 1600.0 / 900.0);

        // Zero-sized viewports (window minimize) are ignored.
        camera.set_aspect(0, 900);
        assert_eq!(camera.aspect, 1600.0 / 900.0);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera::new();
        let clip = camera.view_projection() * camera.target.extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-6);
        assert!(ndc.y.abs() < 1e-6);
    }
}
