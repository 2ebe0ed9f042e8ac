use std::fmt;

use cgmath::{Matrix, Matrix4, SquareMatrix};

use crate::{
    error::{Result, SceneError},
    gfx::{
        geometry::{Aabb, GeometryData, ShapeDescriptor},
        resources::material::MaterialDescriptor,
    },
    wgpu_utils::uniform_buffer::UniformBuffer,
};

use super::transform::Transform;

/// Stable identifier of an object within one factory's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-object shader data
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    /// rgb emissive radiance, w unused
    pub emissive: [f32; 4],
    /// roughness, metalness, shading model, receives shadow
    pub params: [f32; 4],
}

impl ObjectUniform {
    pub fn new(object: &SceneObject) -> Self {
        let model = object.model_matrix();
        let normal_matrix = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(model);
        let material = &object.material;
        let [r, g, b] = material.color;
        let [er, eg, eb] = material.emissive_radiance();

        Self {
            model: model.into(),
            normal_matrix: normal_matrix.into(),
            base_color: [r, g, b, 1.0],
            emissive: [er, eg, eb, 0.0],
            params: [
                material.roughness,
                material.metalness,
                material.shading.shader_index() as f32,
                if object.receives_shadow { 1.0 } else { 0.0 },
            ],
        }
    }
}

/// GPU buffers owned by an uploaded object
pub struct ObjectGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub uniform: UniformBuffer<ObjectUniform>,
    pub bind_group: wgpu::BindGroup,
}

/// A mesh placed in the scene with a material
pub struct SceneObject {
    id: ObjectId,
    pub name: String,
    shape: ShapeDescriptor,
    geometry: GeometryData,
    pub material: MaterialDescriptor,
    pub transform: Transform,
    pub casts_shadow: bool,
    pub receives_shadow: bool,
    /// None until the renderer uploads the object
    pub gpu: Option<ObjectGpuResources>,
}

impl SceneObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn shape(&self) -> &ShapeDescriptor {
        &self.shape
    }

    pub fn geometry(&self) -> &GeometryData {
        &self.geometry
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.transform.model_matrix()
    }

    /// Bounds of the mesh after the object's transform
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.geometry.transformed_bounds(&self.model_matrix())
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Pushes the current transform and material to the GPU copy, if any
    pub fn sync_uniform(&mut self, queue: &wgpu::Queue) {
        let data = ObjectUniform::new(self);
        if let Some(gpu) = &mut self.gpu {
            gpu.uniform.update_content(queue, data);
        }
    }
}

impl fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("shape", &self.shape.kind_name())
            .field("vertices", &self.geometry.vertex_count())
            .field("transform", &self.transform)
            .field("casts_shadow", &self.casts_shadow)
            .field("receives_shadow", &self.receives_shadow)
            .field("uploaded", &self.is_uploaded())
            .finish()
    }
}

/// Creates scene objects from descriptors
///
/// Construction is pure: nothing is added to a scene and nothing touches
/// the GPU. Ids are handed out sequentially starting at 1.
#[derive(Debug, Default)]
pub struct ObjectFactory {
    next_id: u64,
}

impl ObjectFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the descriptors, generates the mesh and assigns an id
    pub fn build(
        &mut self,
        shape: ShapeDescriptor,
        material: MaterialDescriptor,
        transform: Transform,
    ) -> Result<SceneObject> {
        material.validate()?;
        if !transform.is_finite() {
            return Err(SceneError::invalid(
                shape.kind_name(),
                format!("transform is not finite: {:?}", transform),
            ));
        }
        let geometry = shape.generate()?;

        self.next_id += 1;
        let id = ObjectId(self.next_id);
        let name = format!("{} {}", shape.kind_name(), id);

        log::debug!(
            "Built {} ({} vertices, {} triangles)",
            name,
            geometry.vertex_count(),
            geometry.triangle_count()
        );

        Ok(SceneObject {
            id,
            name,
            shape,
            geometry,
            material,
            transform,
            casts_shadow: false,
            receives_shadow: false,
            gpu: None,
        })
    }

    /// Like [`build`](Self::build) but with an explicit name
    pub fn build_named(
        &mut self,
        name: impl Into<String>,
        shape: ShapeDescriptor,
        material: MaterialDescriptor,
        transform: Transform,
    ) -> Result<SceneObject> {
        let mut object = self.build(shape, material, transform)?;
        object.name = name.into();
        Ok(object)
    }
}

pub trait DrawObject<'a> {
    fn draw_object(&mut self, object: &'a SceneObject, bind_group_index: u32);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_object(&mut self, object: &'b SceneObject, bind_group_index: u32) {
        let Some(gpu) = &object.gpu else {
            // Skip drawing if not uploaded
            return;
        };

        self.set_bind_group(bind_group_index, &gpu.bind_group, &[]);
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..gpu.index_count, 0, 0..1);
    }
}
