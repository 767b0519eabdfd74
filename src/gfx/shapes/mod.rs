//! # Ready-made scene objects
//!
//! Factory functions returning fresh objects on every call. Callers that need
//! many copies clone the result; clones get their own GPU resources.

use crate::errors::Result;
use crate::gfx::geometry::{BoxGeometry, ParameterizedGeometry, SphereGeometry};
use crate::gfx::resources::material::{Material, MaterialValue};
use crate::gfx::resources::shader::{ShaderProgram, UniformKind, UniformLayout};
use crate::gfx::resources::texture::Texture;
use crate::gfx::scene::SceneObject;

pub const FLAT_SHADER: &str = include_str!("flat.wgsl");
pub const LIGHTING_SHADER: &str = include_str!("lighting.wgsl");
pub const TEXTURED_SHADER: &str = include_str!("textured.wgsl");

pub const DEFAULT_COLOR: [f32; 4] = [0.86, 0.34, 0.56, 1.0];

fn camera_uniforms() -> UniformLayout {
    UniformLayout::new()
        .with("perspective", UniformKind::Mat4)
        .with("view", UniformKind::Mat4)
        .with("transform", UniformKind::Mat4)
}

/// Unlit program reading a `color` vec4.
pub fn flat_program() -> ShaderProgram {
    ShaderProgram::from_wgsl(FLAT_SHADER, camera_uniforms().with("color", UniformKind::Vec4))
}

/// Diffuse + ambient program reading `color`, `ambient_light` and
/// `light_position`.
pub fn lighting_program() -> ShaderProgram {
    ShaderProgram::from_wgsl(
        LIGHTING_SHADER,
        camera_uniforms()
            .with("color", UniformKind::Vec4)
            .with("ambient_light", UniformKind::Vec4)
            .with("light_position", UniformKind::Vec4),
    )
}

/// Unlit program sampling a `texture` property.
pub fn textured_program() -> ShaderProgram {
    ShaderProgram::from_wgsl(
        TEXTURED_SHADER,
        camera_uniforms().with("texture", UniformKind::Texture),
    )
}

/// 2x2x2 flat-shaded cube.
pub fn cube() -> Result<SceneObject> {
    let mesh = BoxGeometry::new(2.0, 2.0, 2.0).calculate_mesh(0)?;
    let material = Material::new("Cube Material", flat_program())
        .with_property("color", MaterialValue::Vec4(DEFAULT_COLOR))?;
    Ok(SceneObject::new("Cube", mesh, material))
}

/// Unit sphere lit by the scene lights.
pub fn sphere(detail_level: u32) -> Result<SceneObject> {
    let mesh = SphereGeometry::new(1.0).calculate_mesh(detail_level)?;
    let material = Material::new("Sphere Material", lighting_program())
        .with_property("color", MaterialValue::Vec4(DEFAULT_COLOR))?;
    Ok(SceneObject::new("Sphere", mesh, material))
}

/// 2x2x2 cube with `texture` on every face.
pub fn textured_cube(texture: Texture) -> Result<SceneObject> {
    let mesh = BoxGeometry::new(2.0, 2.0, 2.0).calculate_mesh(0)?;
    let material = Material::new("Textured Material", textured_program())
        .with_property("texture", MaterialValue::Texture(texture))?;
    Ok(SceneObject::new("Textured Cube", mesh, material))
}

/// Two-color checkerboard, `cells` squares of `cell_size` pixels per side.
pub fn checkerboard(cells: u32, cell_size: u32, a: [u8; 4], b: [u8; 4]) -> Result<Texture> {
    let size = cells * cell_size;
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let even = (x / cell_size + y / cell_size) % 2 == 0;
            pixels.extend_from_slice(if even { &a } else { &b });
        }
    }
    Texture::from_rgba("checkerboard", size, size, pixels)
}

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const COAL: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const SCARF: [f32; 4] = [0.7, 0.1, 0.1, 1.0];
const CARROT: [f32; 4] = [1.0, 0.5, 0.0, 1.0];

// (name, translation, scale, color)
const SNOWMAN_PARTS: [(&str, [f32; 3], [f32; 3], [f32; 4]); 16] = [
    ("Bottom", [0.0, -0.3, 0.0], [0.2, 0.2, 0.2], WHITE),
    ("Middle", [0.0, 0.05, 0.0], [0.15, 0.15, 0.15], WHITE),
    ("Head", [0.0, 0.28, 0.0], [0.1, 0.2, 0.1], WHITE),
    ("Scarf", [0.0, 0.25, 0.0], [0.12, 0.05, 0.12], SCARF),
    ("Scarf Tail", [-0.071, 0.11, 0.13], [0.035, 0.1, 0.025], SCARF),
    ("Top Button", [0.0, 0.13, 0.145], [0.015, 0.015, 0.015], COAL),
    ("Middle Button", [0.0, 0.06, 0.145], [0.015, 0.015, 0.015], COAL),
    ("Bottom Button", [0.0, -0.01, 0.145], [0.015, 0.015, 0.015], COAL),
    ("Right Eye", [0.04, 0.42, 0.1], [0.015, 0.015, 0.015], COAL),
    ("Left Eye", [-0.04, 0.42, 0.1], [0.015, 0.015, 0.015], COAL),
    ("Nose", [0.0, 0.38, 0.1], [0.015, 0.015, 0.055], CARROT),
    ("Smile 1", [0.07, 0.35, 0.1], [0.012, 0.012, 0.012], COAL),
    ("Smile 2", [0.035, 0.335, 0.1], [0.012, 0.012, 0.012], COAL),
    ("Smile 3", [0.0, 0.33, 0.1], [0.012, 0.012, 0.012], COAL),
    ("Smile 4", [-0.035, 0.335, 0.1], [0.012, 0.012, 0.012], COAL),
    ("Smile 5", [-0.07, 0.35, 0.1], [0.012, 0.012, 0.012], COAL),
];

/// Snowman built from colored cube copies, standing on the y axis.
pub fn snowman() -> Result<Vec<SceneObject>> {
    let template = cube()?;
    SNOWMAN_PARTS
        .iter()
        .map(|&(name, [tx, ty, tz], [sx, sy, sz], color)| -> Result<SceneObject> {
            let mut part = template.clone();
            part.name = name.to_string();
            part.set_translation(tx, ty, tz);
            part.set_scale(sx, sy, sz);
            part.material
                .set_property("color", MaterialValue::Vec4(color))?;
            Ok(part)
        })
        .collect()
}
