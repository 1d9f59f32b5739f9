use crate::color::Color;
use crate::tuple::Tuple4D;
use crate::entity::Entity;
use crate::material::Material;

/// A point light: a position which emits light of one color in every
/// direction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointLight {
    pub intensity: Color,
    pub position: Tuple4D,
}

impl PointLight {
    /// Creates a point light.
    ///
    /// If `position` isn't a point, it is converted to a point automatically.
    pub fn new(intensity: Color, mut position: Tuple4D) -> PointLight {
        position.w = 1.0;
        PointLight { intensity, position }
    }
}

/// Calculates how one light makes a surface point look from the eye, using
/// the Phong reflection model.
///
/// The surface color comes from the material's pattern when it has one
/// (evaluated in the entity's object space), otherwise from its flat color.
/// A point in shadow receives ambient light only. When the light lies behind
/// the surface (`light · normal < 0`) the diffuse and specular terms are
/// zero.
pub fn lighting(m: &Material, entity: &Entity, light: &PointLight,
    point: Tuple4D, eyev: Tuple4D, normalv: Tuple4D, in_shadow: bool) -> Color {
    let color = match m.pattern {
        Some(pattern) => pattern.pattern_at_object(entity.world_to_object(point)),
        None => m.color,
    };

    let effective_color = color * light.intensity;
    let lightv = (light.position - point).normalize();
    let ambient = effective_color * m.ambient;

    if in_shadow {
        return ambient;
    }

    let light_dot_normal = lightv.dot(&normalv);
    if light_dot_normal < 0.0 {
        return ambient;
    }

    let diffuse = effective_color * m.diffuse * light_dot_normal;

    let reflectv = (-lightv).reflect(&normalv);
    let reflect_dot_eye = reflectv.dot(&eyev);

    let specular = if reflect_dot_eye <= 0.0 {
        Color::black()
    } else {
        light.intensity * m.specular * reflect_dot_eye.powf(m.shininess)
    };

    ambient + diffuse + specular
}

#[cfg(test)]
use crate::{ shape::Shape, pattern::Pattern, matrix::Matrix4D };

#[cfg(test)]
fn light_at(x: f64, y: f64, z: f64) -> PointLight {
    PointLight::new(Color::white(), Tuple4D::point(x, y, z))
}

#[test]
fn point_light_position_is_a_point() {
    let light = PointLight::new(Color::white(), Tuple4D::vector(1.0, 2.0, 3.0));
    assert_eq!(light.position, Tuple4D::point(1.0, 2.0, 3.0));
}

#[test]
fn eye_between_light_and_surface() {
    let m = Material::default();
    let s = Entity::new(Shape::sphere());

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = light_at(0.0, 0.0, -10.0);

    let res = lighting(&m, &s, &light, Tuple4D::point(0.0, 0.0, 0.0),
        eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.9, 1.9, 1.9));
}

#[test]
fn eye_between_light_and_surface_offset_45() {
    let m = Material::default();
    let s = Entity::new(Shape::sphere());

    let k = 2.0f64.sqrt() / 2.0;
    let eyev = Tuple4D::vector(0.0, k, -k);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = light_at(0.0, 0.0, -10.0);

    let res = lighting(&m, &s, &light, Tuple4D::point(0.0, 0.0, 0.0),
        eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.0, 1.0, 1.0));
}

#[test]
fn eye_opposite_surface_light_offset_45() {
    let m = Material::default();
    let s = Entity::new(Shape::sphere());

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = light_at(0.0, 10.0, -10.0);

    let res = lighting(&m, &s, &light, Tuple4D::point(0.0, 0.0, 0.0),
        eyev, normalv, false);
    assert_eq!(res, Color::rgb(0.7364, 0.7364, 0.7364));
}

#[test]
fn eye_in_path_of_reflection() {
    let m = Material::default();
    let s = Entity::new(Shape::sphere());

    let k = 2.0f64.sqrt() / 2.0;
    let eyev = Tuple4D::vector(0.0, -k, -k);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = light_at(0.0, 10.0, -10.0);

    let res = lighting(&m, &s, &light, Tuple4D::point(0.0, 0.0, 0.0),
        eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.6364, 1.6364, 1.6364));
}

#[test]
fn light_behind_surface() {
    let m = Material::default();
    let s = Entity::new(Shape::sphere());

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = light_at(0.0, 0.0, 10.0);

    let res = lighting(&m, &s, &light, Tuple4D::point(0.0, 0.0, 0.0),
        eyev, normalv, false);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn surface_in_shadow() {
    let m = Material::default();
    let s = Entity::new(Shape::sphere());

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = light_at(0.0, 0.0, -10.0);

    let res = lighting(&m, &s, &light, Tuple4D::point(0.0, 0.0, 0.0),
        eyev, normalv, true);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn lighting_with_stripe_pattern() {
    let m = Material {
        pattern: Some(Pattern::stripe(Color::white(), Color::black())),
        ambient: 1.0,
        diffuse: 0.0,
        specular: 0.0,
        ..Default::default()
    };
    let s = Entity::new(Shape::sphere());

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = light_at(0.0, 0.0, -10.0);

    assert_eq!(lighting(&m, &s, &light, Tuple4D::point(0.9, 0.0, 0.0),
        eyev, normalv, false), Color::white());
    assert_eq!(lighting(&m, &s, &light, Tuple4D::point(1.1, 0.0, 0.0),
        eyev, normalv, false), Color::black());
}

#[test]
fn pattern_follows_entity_transform() {
    let m = Material {
        pattern: Some(Pattern::stripe(Color::white(), Color::black())),
        ambient: 1.0,
        diffuse: 0.0,
        specular: 0.0,
        ..Default::default()
    };
    let s = Entity::new(Shape::sphere())
        .with_transform(Matrix4D::scaling(2.0, 2.0, 2.0))
        .unwrap();

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = light_at(0.0, 0.0, -10.0);

    assert_eq!(lighting(&m, &s, &light, Tuple4D::point(1.5, 0.0, 0.0),
        eyev, normalv, false), Color::white());
}
