//! A red unlit unit box seen from (0, 1, 5).
//!
//! Run with `cargo run --example basic_box`.

use vignette::prelude::*;

fn main() -> anyhow::Result<()> {
    let mut config = AppConfig::load_or_default("vignette.toml")?;
    config.window.title = "Basic Box".to_string();
    config.controls.enabled = false;
    vignette::init_logging(&config.log_filter);

    let mut factory = ObjectFactory::new();
    let mut scene = SceneGraph::new();

    let mesh = factory.build(
        ShapeDescriptor::cuboid(1.0, 1.0, 1.0),
        MaterialDescriptor::unlit(0xff0000),
        Transform::default(),
    )?;
    shadow::attach(mesh, false, false, &mut scene);

    App::new(config, scene).run()?;
    Ok(())
}
