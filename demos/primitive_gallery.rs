//! Every primitive on a double-sided floor, lit by ambient, directional and
//! point lights, with shadows and orbit controls.
//!
//! Drag with the left button to orbit, right button to pan, scroll to zoom
//! and press R to reset the view.

use std::f32::consts::FRAC_PI_2;

use vignette::prelude::*;

fn main() -> anyhow::Result<()> {
    let mut config = AppConfig::load_or_default("vignette.toml")?;
    config.window.title = "Primitive Gallery".to_string();
    config.camera.position = [0.0, 4.0, 9.0];
    config.camera.far = 200.0;
    vignette::init_logging(&config.log_filter);

    let mut factory = ObjectFactory::new();
    let mut scene = SceneGraph::new();

    let floor = factory.build_named(
        "floor",
        ShapeDescriptor::plane(14.0, 8.0),
        MaterialDescriptor::lambert(0x808080).with_side(FaceCulling::Double),
        Transform::default().with_rotation(-FRAC_PI_2, 0.0, 0.0),
    )?;
    shadow::attach(floor, false, true, &mut scene);

    let shapes = [
        (
            ShapeDescriptor::cuboid(1.0, 1.0, 1.0),
            MaterialDescriptor::lambert(0xff4444),
        ),
        (
            ShapeDescriptor::sphere(0.6),
            MaterialDescriptor::standard(0x44aaff).with_roughness(0.3),
        ),
        (
            ShapeDescriptor::capsule(0.4, 0.8),
            MaterialDescriptor::lambert(0x44ff88),
        ),
        (
            ShapeDescriptor::cylinder(0.5, 0.5, 1.2),
            MaterialDescriptor::standard(0xffcc33)
                .with_metalness(0.8)
                .with_roughness(0.4),
        ),
        (
            ShapeDescriptor::cone(0.6, 1.2),
            MaterialDescriptor::lambert(0xcc66ff),
        ),
        (
            ShapeDescriptor::torus(0.5, 0.18),
            MaterialDescriptor::standard(0xff8844).with_roughness(0.5),
        ),
        (
            ShapeDescriptor::torus_knot(0.45, 0.14),
            MaterialDescriptor::standard(0x66ffff).with_emissive(0x113333, 1.0),
        ),
    ];

    let spacing = 1.8;
    let offset = (shapes.len() - 1) as f32 * spacing / 2.0;
    for (i, (shape, material)) in shapes.into_iter().enumerate() {
        let x = i as f32 * spacing - offset;
        let object = factory.build(shape, material, Transform::from_position(x, 0.9, 0.0))?;
        shadow::attach(object, true, true, &mut scene);
    }

    scene.add_light(Light::ambient(0xffffff, 0.25));
    scene.add_light(Light::directional(0xffffff, 1.0, [4.0, 8.0, 5.0]).with_shadow());
    scene.add_light(Light::point(0xffaa66, 6.0, [-3.0, 2.5, 2.0]).with_range(12.0, 2.0));

    App::new(config, scene).run()?;
    Ok(())
}
