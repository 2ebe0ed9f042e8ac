use super::{
    light::{Light, MAX_LIGHTS},
    object::{ObjectId, SceneObject},
};

/// Insertion-ordered collection of objects and lights
///
/// The graph only grows. Objects are never removed, so iteration order is
/// the order in which they were attached.
#[derive(Debug, Default)]
pub struct SceneGraph {
    objects: Vec<SceneObject>,
    lights: Vec<Light>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an object and returns its id
    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id();
        if self.contains(id) {
            log::warn!("Object {} added to the scene more than once", id);
        }
        log::debug!("Attached '{}' to scene", object.name);
        self.objects.push(object);
        id
    }

    pub fn add_light(&mut self, light: Light) {
        if !light.is_ambient() && self.direct_lights().count() >= MAX_LIGHTS {
            log::warn!(
                "Scene already has {} direct lights, extra {:?} will not be rendered",
                MAX_LIGHTS,
                light
            );
        }
        self.lights.push(light);
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.iter().any(|object| object.id() == id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id() == id)
    }

    /// Mutable access for repositioning an object between frames
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|object| object.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Sum of all ambient light radiance
    pub fn ambient(&self) -> [f32; 3] {
        self.lights
            .iter()
            .filter(|light| light.is_ambient())
            .map(Light::radiance)
            .fold([0.0; 3], |acc, r| [acc[0] + r[0], acc[1] + r[1], acc[2] + r[2]])
    }

    /// Non-ambient lights, in insertion order
    pub fn direct_lights(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter().filter(|light| !light.is_ambient())
    }

    /// The light used for the shadow map, if any
    pub fn shadow_light(&self) -> Option<&Light> {
        self.direct_lights()
            .take(MAX_LIGHTS)
            .find(|light| light.casts_shadow())
    }

    /// Gets statistics about the scene
    pub fn statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            light_count: self.lights.len(),
            shadow_casters: self.objects.iter().filter(|o| o.casts_shadow).count(),
            total_triangles: self
                .objects
                .iter()
                .map(|o| o.geometry().triangle_count())
                .sum(),
            total_vertices: self
                .objects
                .iter()
                .map(|o| o.geometry().vertex_count())
                .sum(),
        }
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub light_count: usize,
    pub shadow_casters: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}
