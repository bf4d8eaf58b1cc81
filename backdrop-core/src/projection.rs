/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::CameraConfig;
use crate::viewport::Viewport;

/// Perspective camera looking down -Z from a fixed position
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, viewport: Viewport) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, config.distance),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: config.fov_degrees.to_radians(),
            aspect: viewport.aspect(),
            near: config.near,
            far: config.far,
        }
    }

    /// Track a new viewport shape; only the aspect ratio changes
    pub fn resize(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a model-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with depth in normalized device units, or
    /// `None` when the point is behind the camera or outside the frustum.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.view_projection() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Prevent division by near-zero depth values
        if clip.w < 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default(), Viewport::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(&CameraConfig::default(), Viewport::new(1024.0, 768.0));
        assert!((camera.aspect - 1024.0 / 768.0).abs() < 1e-6);
        assert!((camera.fov - 75.0_f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 20.0));
        assert_eq!((camera.near, camera.far), (0.1, 1000.0));
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut once = Camera::default();
        once.resize(Viewport::new(1280.0, 720.0));
        let mut twice = once.clone();
        twice.resize(Viewport::new(1280.0, 720.0));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::default();
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_behind_camera_is_clipped() {
        let camera = Camera::default();
        let behind = Point3::new(0.0, 0.0, 30.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 800, 600)
            .is_none());
    }
}
