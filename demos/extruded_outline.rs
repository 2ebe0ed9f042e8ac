//! A heart outline drawn flat and as a bevelled extrusion.

use vignette::prelude::*;

/// Heart outline, counter-clockwise, roughly 2 units across
fn heart() -> Vec<[f32; 2]> {
    vec![
        [0.0, -1.0],
        [0.9, -0.1],
        [1.0, 0.4],
        [0.75, 0.8],
        [0.4, 0.85],
        [0.0, 0.5],
        [-0.4, 0.85],
        [-0.75, 0.8],
        [-1.0, 0.4],
        [-0.9, -0.1],
    ]
}

fn main() -> anyhow::Result<()> {
    let mut config = AppConfig::load_or_default("vignette.toml")?;
    config.window.title = "Extruded Outline".to_string();
    config.camera.position = [0.0, 1.5, 6.0];
    vignette::init_logging(&config.log_filter);

    let mut factory = ObjectFactory::new();
    let mut scene = SceneGraph::new();

    let flat = factory.build_named(
        "flat heart",
        ShapeDescriptor::polygon(heart()),
        MaterialDescriptor::lambert(0xff3366).with_side(FaceCulling::Double),
        Transform::from_position(-1.5, 0.0, 0.0),
    )?;
    shadow::attach(flat, false, false, &mut scene);

    let options = ExtrudeOptions::with_depth(0.4);
    let solid = factory.build_named(
        "extruded heart",
        ShapeDescriptor::extrusion(heart(), options),
        MaterialDescriptor::standard(0xff3366).with_roughness(0.35),
        Transform::from_position(1.5, 0.0, 0.0),
    )?;
    shadow::attach(solid, false, false, &mut scene);

    scene.add_light(Light::ambient(0xffffff, 0.3));
    scene.add_light(Light::directional(0xffffff, 1.2, [3.0, 5.0, 6.0]));

    App::new(config, scene).run()?;
    Ok(())
}
