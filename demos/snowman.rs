//! # Snowman Demo
//!
//! A snowman made of cubes, a lit sphere orbiting it and a spinning textured
//! cube.
//!
//! ## Usage:
//! ```bash
//! RUST_LOG=info cargo run --example snowman
//! ```
//!
//! ## Controls:
//! - Drag to orbit the camera, scroll to zoom
//! - `c` switches to placing shapes (press, drag to size, release)
//! - `o` switches back to orbiting
//! - `Esc` quits

use orrery::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::default()
        .with_title("Orrery - Snowman")
        .with_delta_time(1.0 / 60.0)
        .with_camera_position([0.0, 0.2, 1.6]);
    let mut app = OrreryApp::new(config);
    let scene = app.scene_mut();

    scene.add_light(PointLight::new(1.5, 2.0, 2.0));
    for part in shapes::snowman()? {
        scene.add_object(part);
    }

    // Lit moon circling the snowman once every ten seconds.
    let mut moon = shapes::sphere(25)?;
    moon.name = "Moon".to_string();
    moon.set_uniform_scale(0.08);
    moon.material
        .set_property("color", MaterialValue::Vec4([0.9, 0.9, 1.0, 1.0]))?;
    moon.set_update_hook(|time, moon| {
        let angle = time * std::f32::consts::TAU / 10.0;
        moon.set_translation(0.6 * angle.cos(), 0.45, 0.6 * angle.sin());
    });
    scene.add_object(moon);

    let board = shapes::checkerboard(8, 4, [240, 240, 240, 255], [40, 40, 160, 255])?;
    let mut crate_box = shapes::textured_cube(board)?;
    crate_box.set_uniform_scale(0.08);
    crate_box.set_translation(-0.45, -0.4, 0.1);
    crate_box.set_update_hook(|_, crate_box| crate_box.rotate(0.0, 0.5, 0.0));
    scene.add_object(crate_box);

    scene
        .camera_mut()
        .look_at(Vector3::new(0.0, 0.0, 0.0));

    app.set_shape_template(shapes::sphere(12)?);
    app.run()?;
    Ok(())
}
