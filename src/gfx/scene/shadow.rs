//! Shadow participation of scene objects

use super::{
    object::{ObjectId, SceneObject},
    scene::SceneGraph,
};

/// Sets the shadow flags of `object` and appends it to `graph`
pub fn attach(
    mut object: SceneObject,
    casts_shadow: bool,
    receives_shadow: bool,
    graph: &mut SceneGraph,
) -> ObjectId {
    object.casts_shadow = casts_shadow;
    object.receives_shadow = receives_shadow;
    log::trace!(
        "'{}' casts_shadow={} receives_shadow={}",
        object.name,
        casts_shadow,
        receives_shadow
    );
    graph.add(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::ShapeDescriptor,
        resources::material::MaterialDescriptor,
        scene::{object::ObjectFactory, transform::Transform},
    };

    fn sphere(factory: &mut ObjectFactory) -> SceneObject {
        factory
            .build(
                ShapeDescriptor::sphere(1.0),
                MaterialDescriptor::standard(0x8844aa),
                Transform::default(),
            )
            .unwrap()
    }

    #[test]
    fn test_attach_sets_flags_and_adds() {
        let mut factory = ObjectFactory::new();
        let mut graph = SceneGraph::new();

        let id = attach(sphere(&mut factory), true, true, &mut graph);

        let object = graph.get(id).unwrap();
        assert!(object.casts_shadow);
        assert!(object.receives_shadow);
        assert!(graph.contains(id));
    }

    #[test]
    fn test_attach_mixed_flags() {
        let mut factory = ObjectFactory::new();
        let mut graph = SceneGraph::new();

        let caster = attach(sphere(&mut factory), true, false, &mut graph);
        let floor = attach(sphere(&mut factory), false, true, &mut graph);

        assert!(!graph.get(caster).unwrap().receives_shadow);
        assert!(!graph.get(floor).unwrap().casts_shadow);
        assert_eq!(graph.statistics().shadow_casters, 1);
        assert_eq!(graph.object_count(), 2);
    }
}
