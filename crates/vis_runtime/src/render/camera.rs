//! Orthographic cameras
//!
//! The world camera works in world units (the viewport divided by the scene's
//! pixels per unit); the UI camera works in pixels with the origin in the
//! bottom left corner. Layers in screen coordinates are drawn with the UI
//! camera.

use crate::foundation::math::{Mat4, Vec2};

/// 2D orthographic camera centered on `position`
#[derive(Debug, Clone, PartialEq)]
pub struct OrthographicCamera {
    /// Center of the view
    pub position: Vec2,
    /// Visible width at zoom 1
    pub viewport_width: f32,
    /// Visible height at zoom 1
    pub viewport_height: f32,
    /// Zoom factor; values above 1 show more of the scene
    pub zoom: f32,
    combined: Mat4,
}

impl OrthographicCamera {
    /// Create a camera centered on the middle of its viewport
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        let mut camera = Self {
            position: Vec2::new(viewport_width / 2.0, viewport_height / 2.0),
            viewport_width,
            viewport_height,
            zoom: 1.0,
            combined: Mat4::identity(),
        };
        camera.update();
        camera
    }

    /// Recompute the combined matrix
    pub fn update(&mut self) {
        let half_width = self.viewport_width * self.zoom / 2.0;
        let half_height = self.viewport_height * self.zoom / 2.0;
        self.combined = Mat4::new_orthographic(
            self.position.x - half_width,
            self.position.x + half_width,
            self.position.y - half_height,
            self.position.y + half_height,
            -1.0,
            1.0,
        );
    }

    /// Projection-view matrix as of the last [`Self::update`]
    pub fn combined(&self) -> &Mat4 {
        &self.combined
    }
}

/// World and UI camera pair of a scene
#[derive(Debug, Clone)]
pub struct CameraManager {
    pixels_per_unit: f32,
    camera: OrthographicCamera,
    ui_camera: OrthographicCamera,
}

impl CameraManager {
    /// Create cameras for a viewport in pixels
    pub fn new(width: f32, height: f32, pixels_per_unit: f32) -> Self {
        Self {
            pixels_per_unit,
            camera: OrthographicCamera::new(width / pixels_per_unit, height / pixels_per_unit),
            ui_camera: OrthographicCamera::new(width, height),
        }
    }

    /// Recompute both matrices
    pub fn update(&mut self) {
        self.camera.update();
        self.ui_camera.update();
    }

    /// Resize the viewport, keeping the world camera position
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.viewport_width = width / self.pixels_per_unit;
        self.camera.viewport_height = height / self.pixels_per_unit;
        self.ui_camera = OrthographicCamera::new(width, height);
        self.update();
    }

    /// World camera
    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    /// World camera, mutable for panning and zooming
    pub fn camera_mut(&mut self) -> &mut OrthographicCamera {
        &mut self.camera
    }

    /// World projection-view matrix
    pub fn combined(&self) -> &Mat4 {
        self.camera.combined()
    }

    /// Screen projection matrix
    pub fn ui_combined(&self) -> &Mat4 {
        self.ui_camera.combined()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector4;

    #[test]
    fn test_world_camera_maps_viewport_to_clip_space() {
        let cameras = CameraManager::new(800.0, 600.0, 100.0);

        // the world camera sees 8 x 6 units starting at the origin
        let corner = cameras.combined() * Vector4::new(8.0, 6.0, 0.0, 1.0);
        assert_relative_eq!(corner.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(corner.y, 1.0, epsilon = 1e-5);

        let origin = cameras.ui_combined() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(origin.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(origin.y, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_zoom_and_resize() {
        let mut cameras = CameraManager::new(800.0, 600.0, 100.0);
        cameras.camera_mut().zoom = 2.0;
        cameras.update();

        let corner = cameras.combined() * Vector4::new(8.0, 6.0, 0.0, 1.0);
        assert_relative_eq!(corner.x, 0.5, epsilon = 1e-5);

        cameras.resize(400.0, 300.0);
        assert_relative_eq!(cameras.camera().viewport_width, 4.0);
        assert_ne!(cameras.combined(), cameras.ui_combined());
    }
}
