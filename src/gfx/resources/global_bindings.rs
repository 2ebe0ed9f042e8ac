//! Global uniform bindings for camera and scene data
//!
//! Per-frame data shared by every object: camera matrices, the light used
//! for the shadow map, ambient light and up to [`MAX_LIGHTS`] direct lights.

use cgmath::{Matrix4, SquareMatrix};

use crate::{
    gfx::{
        camera::{Camera, PerspectiveCamera},
        scene::{Light, SceneGraph, MAX_LIGHTS},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// One direct light as seen by the shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// Point lights: position with w = 1. Directional lights: unit vector
    /// towards the light with w = 0.
    pub position_or_direction: [f32; 4],
    /// rgb radiance, w unused
    pub color: [f32; 4],
    /// distance cutoff, decay exponent, unused, unused
    pub params: [f32; 4],
}

impl LightUniform {
    fn from_light(light: &Light) -> Option<Self> {
        let [r, g, b] = light.radiance();
        match *light {
            Light::Ambient { .. } => None,
            Light::Directional { .. } => {
                let towards = -light.direction()?;
                Some(Self {
                    position_or_direction: [towards.x, towards.y, towards.z, 0.0],
                    color: [r, g, b, 0.0],
                    params: [0.0; 4],
                })
            }
            Light::Point {
                position,
                distance,
                decay,
                ..
            } => Some(Self {
                position_or_direction: [position.x, position.y, position.z, 1.0],
                color: [r, g, b, 0.0],
                params: [distance, decay, 0.0, 0.0],
            }),
        }
    }
}

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    /// Camera position (homogeneous coordinates)
    pub view_position: [f32; 4],
    /// Summed ambient radiance, w unused
    pub ambient: [f32; 4],
    /// light count, shadow map enabled, slot of the shadowed light, unused
    pub counts: [u32; 4],
    pub lights: [LightUniform; MAX_LIGHTS],
}

impl GlobalUniform {
    /// Collects the frame's global data.
    ///
    /// `light_view_proj` is the shadow camera matrix, `None` when no shadow
    /// map is rendered this frame.
    pub fn new(
        scene: &SceneGraph,
        camera: &PerspectiveCamera,
        light_view_proj: Option<Matrix4<f32>>,
    ) -> Self {
        let mut lights = [LightUniform::default(); MAX_LIGHTS];
        let mut count = 0;
        let mut shadow_slot = None;
        for (light, uniform) in scene
            .direct_lights()
            .filter_map(|light| LightUniform::from_light(light).map(|u| (light, u)))
            .take(MAX_LIGHTS)
        {
            if shadow_slot.is_none() && light.casts_shadow() {
                shadow_slot = Some(count as u32);
            }
            lights[count] = uniform;
            count += 1;
        }
        let shadowed = light_view_proj.is_some() && shadow_slot.is_some();

        let [ar, ag, ab] = scene.ambient();

        Self {
            view_proj: camera.build_view_projection_matrix().into(),
            light_view_proj: light_view_proj.unwrap_or_else(Matrix4::identity).into(),
            view_position: camera.view_position(),
            ambient: [ar, ag, ab, 0.0],
            counts: [
                count as u32,
                shadowed as u32,
                shadow_slot.unwrap_or(0),
                0,
            ],
            lights,
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// The global uniform buffer and its bind group (group 0 of every pipeline)
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
    ubo: GlobalUBO,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");
        let ubo = GlobalUBO::new(device);
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
            ubo,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: GlobalUniform) {
        self.ubo.update_content(queue, content);
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
