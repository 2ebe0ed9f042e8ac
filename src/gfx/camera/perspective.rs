use cgmath::{perspective, Deg, EuclideanSpace, Matrix4, Point3, Vector3};

use super::camera_utils::{Camera, OPENGL_TO_WGPU_MATRIX};
use crate::config::CameraConfig;

/// Perspective camera looking from `position` at `target`
///
/// The projection matrix is cached. Changing the aspect ratio or field of
/// view only marks it stale, and [`update_projection`](Self::update_projection)
/// rebuilds it once before the next draw.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    projection: Matrix4<f32>,
    projection_dirty: bool,
    projection_updates: u64,
}

impl PerspectiveCamera {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y,
            aspect,
            near,
            far,
            position: Point3::new(0.0, 0.0, 0.0),
            target: Point3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            projection: build_projection(fov_y, aspect, near, far),
            projection_dirty: false,
            projection_updates: 0,
        }
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self::new(config.fov_degrees, aspect, config.near, config.far);
        camera.position = Point3::from(config.position);
        camera.target = Point3::from(config.target);
        camera
    }

    /// Builder pattern: Place the camera
    pub fn looking_at(mut self, position: [f32; 3], target: [f32; 3]) -> Self {
        self.position = Point3::from(position);
        self.target = Point3::from(target);
        self
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_fov_y(&mut self, fov_y: f32) {
        if fov_y != self.fov_y {
            self.fov_y = fov_y;
            self.projection_dirty = true;
        }
    }

    /// Adopts the aspect ratio of a `width` x `height` viewport.
    ///
    /// Returns whether the aspect changed. Zero-sized viewports are ignored.
    pub fn on_resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::debug!("Ignoring zero-sized viewport {}x{}", width, height);
            return false;
        }

        let aspect = width as f32 / height as f32;
        if aspect == self.aspect {
            return false;
        }

        log::debug!("Camera aspect {:.4} -> {:.4}", self.aspect, aspect);
        self.aspect = aspect;
        self.projection_dirty = true;
        true
    }

    /// Rebuilds the projection matrix if it is stale; returns whether it did
    pub fn update_projection(&mut self) -> bool {
        if !self.projection_dirty {
            return false;
        }
        self.projection = build_projection(self.fov_y, self.aspect, self.near, self.far);
        self.projection_dirty = false;
        self.projection_updates += 1;
        true
    }

    pub fn is_projection_dirty(&self) -> bool {
        self.projection_dirty
    }

    /// Number of times the projection has been rebuilt since construction
    pub fn projection_updates(&self) -> u64 {
        self.projection_updates
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    /// Eye position in homogeneous coordinates
    pub fn view_position(&self) -> [f32; 4] {
        let p = self.position.to_vec();
        [p.x, p.y, p.z, 1.0]
    }
}

impl Camera for PerspectiveCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }
}

fn build_projection(fov_y: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    OPENGL_TO_WGPU_MATRIX * perspective(Deg(fov_y), aspect, near, far)
}
