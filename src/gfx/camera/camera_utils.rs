use cgmath::{ortho, InnerSpace, Matrix4, Point3, Vector3};

use crate::gfx::scene::Light;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub trait Camera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

/// Orthographic camera looking along a directional light, used to render
/// the shadow map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCamera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    /// Half-width of the square region covered by the shadow map
    pub extent: f32,
    pub near: f32,
    pub far: f32,
}

impl ShadowCamera {
    /// Fits a camera to a directional light
    ///
    /// `None` for other lights and for an extent that is not positive and finite.
    pub fn for_light(light: &Light, extent: f32) -> Option<Self> {
        if !(extent.is_finite() && extent > 0.0) {
            return None;
        }
        let Light::Directional {
            position, target, ..
        } = *light
        else {
            return None;
        };
        let distance = (target - position).magnitude();
        if distance <= 0.0 {
            return None;
        }

        Some(Self {
            position,
            target,
            extent,
            near: 0.1,
            far: distance + extent * 2.0,
        })
    }

    fn up(&self) -> Vector3<f32> {
        let dir = (self.target - self.position).normalize();
        if dir.y.abs() > 0.99 {
            Vector3::unit_z()
        } else {
            Vector3::unit_y()
        }
    }
}

impl Camera for ShadowCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(self.position, self.target, self.up());
        let e = self.extent;
        OPENGL_TO_WGPU_MATRIX * ortho(-e, e, -e, e, self.near, self.far) * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Transform;

    #[test]
    fn test_only_directional_lights_get_a_shadow_camera() {
        let point = Light::point(0xffffff, 1.0, [0.0, 5.0, 0.0]);
        assert!(ShadowCamera::for_light(&point, 10.0).is_none());
        assert!(ShadowCamera::for_light(&Light::ambient(0xffffff, 1.0), 10.0).is_none());
        assert!(
            ShadowCamera::for_light(&Light::directional(0xffffff, 1.0, [0.0, 10.0, 0.0]), 10.0)
                .is_some()
        );
    }

    #[test]
    fn test_degenerate_extent_gives_no_shadow_camera() {
        let light = Light::directional(0xffffff, 1.0, [0.0, 10.0, 0.0]);
        for extent in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(ShadowCamera::for_light(&light, extent).is_none(), "extent {}", extent);
        }
    }

    #[test]
    fn test_shadow_matrix_is_finite() {
        let light = Light::directional(0xffffff, 1.0, [3.0, 8.0, -2.0]);
        let matrix = ShadowCamera::for_light(&light, 10.0)
            .unwrap()
            .build_view_projection_matrix();
        let columns: [[f32; 4]; 4] = matrix.into();
        assert!(columns.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_shadow_camera_covers_origin() {
        let light = Light::directional(0xffffff, 1.0, [5.0, 10.0, 2.0]);
        let camera = ShadowCamera::for_light(&light, 10.0).unwrap();
        let clip = camera
            .build_view_projection_matrix()
            .transform_point(Point3::new(0.0, 0.0, 0.0));
        assert!(clip.x.abs() < 1e-4 && clip.y.abs() < 1e-4);
        assert!(clip.z > 0.0 && clip.z < 1.0, "depth {}", clip.z);
    }
}
