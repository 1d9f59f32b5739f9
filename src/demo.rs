use std::f64::consts::PI;

use crate::tuple::Tuple4D;
use crate::matrix::Matrix4D;
use crate::color::Color;
use crate::shape::Shape;
use crate::material::Material;
use crate::entity::Entity;
use crate::light::PointLight;
use crate::scene::Scene;
use crate::camera::Camera;
use crate::shading::RenderOptions;
use crate::scene_file::SceneFile;
use crate::error::Result;

/// The built-in scene: three short cylinders in a row, seen from above.
///
/// On the left a red cup (closed only at the bottom), in the middle a green
/// solid cylinder, on the right a blue one tipped toward the camera.
pub fn demo_scene(width: usize, height: usize) -> Result<SceneFile> {
    let mut scene = Scene::empty();
    scene.add_light(PointLight::new(
        Color::white(),
        Tuple4D::point(-5.0, 5.0, 2.0)
    ));

    scene.add_entity(Entity::new(Shape::truncated_cylinder(0.0, 1.0))
        .with_material(Material::red())
        .with_transform(Matrix4D::identity()
            .translate(-3.0, 0.0, 0.0)
            .scale(0.5, 0.5, 0.5))?);

    scene.add_entity(Entity::new(Shape::capped_cylinder(0.0, 1.0))
        .with_material(Material::green())
        .with_transform(Matrix4D::scaling(0.5, 0.5, 0.5))?);

    scene.add_entity(Entity::new(Shape::capped_cylinder(0.0, 1.0))
        .with_material(Material::blue())
        .with_transform(Matrix4D::identity()
            .translate(3.0, 0.0, 0.0)
            .rotate_x(-PI / 6.0))?);

    let camera = Camera::new(width, height, 70.0f64.to_radians(),
        Matrix4D::view_transform(
            Tuple4D::point(0.0, 5.0, -5.0),
            Tuple4D::point(0.0, 0.0, 0.0),
            Tuple4D::vector(0.0, 1.0, 0.0)
        ))?;

    Ok(SceneFile { scene, camera, options: RenderOptions::default() })
}

#[test]
fn demo_scene_layout() {
    let demo = demo_scene(100, 50).unwrap();

    assert_eq!(demo.scene.lights.len(), 1);
    assert_eq!(demo.scene.entities.len(), 3);
    assert_eq!(demo.scene.entities[0].material, Material::red());
    assert_eq!(demo.camera.hsize(), 100);
    assert_eq!(demo.camera.vsize(), 50);
}

#[test]
fn demo_scene_center_pixel_sees_green() {
    let demo = demo_scene(21, 11).unwrap();
    let image = demo.camera.render(&demo.scene, &demo.options);

    let center = image.read_pixel(10, 5).unwrap();
    assert!(center.g > center.r && center.g > center.b);
}

#[test]
fn demo_scene_rejects_empty_canvas() {
    assert!(demo_scene(0, 0).is_err());
}
