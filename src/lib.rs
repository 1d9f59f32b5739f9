//! A Whitted-style ray tracer.
//!
//! A `Scene` holds entities (a `Shape` with a `Material` and a transform)
//! and point lights. A `Camera` turns pixels into rays; the `Shader` follows
//! each ray through the scene, adding up Phong lighting, hard shadows,
//! mirror reflection and refraction, and the colors land on a `Canvas`.
//!
//! ```
//! use phong_ray_tracer::prelude::*;
//!
//! let mut scene = Scene::empty();
//! scene.add_light(PointLight::new(Color::white(), Tuple4D::point(-10.0, 10.0, -10.0)));
//! scene.add_entity(Entity::new(Shape::sphere()).with_material(Material::red()));
//!
//! let camera = Camera::new(16, 8, std::f64::consts::FRAC_PI_3,
//!     Matrix4D::view_transform(
//!         Tuple4D::point(0.0, 0.0, -5.0),
//!         Tuple4D::point(0.0, 0.0, 0.0),
//!         Tuple4D::vector(0.0, 1.0, 0.0))).unwrap();
//!
//! let canvas = render_parallel(&camera, &scene, &RenderOptions::default());
//! assert_eq!(canvas.width, 16);
//! ```

pub mod consts;
pub mod error;

pub mod tuple;
pub mod matrix;
pub mod ray;

pub mod color;
pub mod pattern;
pub mod material;
pub mod shape;
pub mod entity;
pub mod intersect;
pub mod light;
pub mod scene;

pub mod shading;
pub mod camera;
pub mod parallel;
pub mod canvas;

pub mod scene_file;
pub mod demo;

pub mod prelude {
    pub use crate::tuple::Tuple4D;
    pub use crate::matrix::Matrix4D;
    pub use crate::ray::Ray4D;
    pub use crate::color::Color;
    pub use crate::pattern::{ Pattern, PatternKind };
    pub use crate::material::Material;
    pub use crate::shape::{ Shape, Caps };
    pub use crate::entity::Entity;
    pub use crate::light::PointLight;
    pub use crate::scene::Scene;
    pub use crate::shading::{ Shader, RenderOptions };
    pub use crate::camera::Camera;
    pub use crate::canvas::Canvas;
    pub use crate::parallel::render_parallel;
    pub use crate::error::{ RenderError, Result };
}

use consts::EPSILON;

/// Compares two floats for equality within `EPSILON`.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < EPSILON
}
