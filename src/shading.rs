use log::warn;
use serde::Deserialize;

use crate::consts::{ EPSILON, DEFAULT_RECURSION_DEPTH };
use crate::ray::Ray4D;
use crate::color::Color;
use crate::scene::Scene;
use crate::light::lighting;
use crate::intersect::IntersectionComputation;

/// Knobs which change how a scene is shaded, but not what is in it.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// How many reflection/refraction bounces a primary ray may spawn.
    pub max_depth: usize,

    /// How far shadow, reflection and refraction rays start from a surface.
    pub acne_epsilon: f64,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            max_depth: DEFAULT_RECURSION_DEPTH,
            acne_epsilon: EPSILON,
        }
    }
}

/// Computes the color seen along a ray in a scene.
///
/// Surface color is the sum of the Phong contribution of every light, plus
/// whatever is seen in the reflection and through the surface. Each bounce
/// costs one unit of `remaining`; at zero, reflection and refraction are
/// black.
#[derive(Copy, Clone, Debug)]
pub struct Shader<'s> {
    scene: &'s Scene,
    options: RenderOptions,
}

impl<'s> Shader<'s> {
    pub fn new(scene: &'s Scene, options: RenderOptions) -> Shader<'s> {
        if scene.lights.is_empty() {
            warn!("Scene has no lights; everything will render black.");
        }

        Shader { scene, options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The color seen along `r`, with the configured bounce budget.
    pub fn trace(&self, r: &Ray4D) -> Color {
        self.color_at(r, self.options.max_depth)
    }

    /// The color seen along `r`; black if it hits nothing.
    pub fn color_at(&self, r: &Ray4D, remaining: usize) -> Color {
        let xs = self.scene.intersect(r);

        match xs.hit() {
            None => Color::black(),
            Some(hit) => {
                let comps = IntersectionComputation::new(r, &hit, &xs,
                    self.options.acne_epsilon);
                self.shade_hit(&comps, remaining)
            },
        }
    }

    /// The color at a prepared hit.
    pub fn shade_hit(&self, comps: &IntersectionComputation, remaining: usize)
        -> Color {
        let material = &comps.entity.material;

        let surface: Color = self.scene.lights.iter()
            .map(|light| lighting(material, comps.entity, light,
                comps.point, comps.eyev, comps.normalv,
                self.scene.is_shadowed(comps.over_point, light)))
            .sum();

        let reflected = self.reflected_color(comps, remaining);
        let refracted = self.refracted_color(comps, remaining);

        if material.reflective > 0.0 && material.transparency > 0.0 {
            let reflectance = comps.schlick();
            surface + reflected * reflectance + refracted * (1.0 - reflectance)
        } else {
            surface + reflected + refracted
        }
    }

    /// What is seen in the mirror direction, scaled by how reflective the
    /// surface is.
    pub fn reflected_color(&self, comps: &IntersectionComputation,
        remaining: usize) -> Color {
        let reflective = comps.entity.material.reflective;
        if remaining == 0 || reflective <= 0.0 {
            return Color::black();
        }

        let reflect_ray = Ray4D::new(comps.over_point, comps.reflectv);
        self.color_at(&reflect_ray, remaining - 1) * reflective
    }

    /// What is seen through the surface, bent by Snell's law and scaled by
    /// how transparent the surface is.
    pub fn refracted_color(&self, comps: &IntersectionComputation,
        remaining: usize) -> Color {
        let transparency = comps.entity.material.transparency;
        if remaining == 0 || transparency <= 0.0 {
            return Color::black();
        }

        let n_ratio = comps.n1 / comps.n2;
        let cos_i = comps.eyev.dot(&comps.normalv);
        let sin2_t = n_ratio.powi(2) * (1.0 - cos_i.powi(2));

        // Total internal reflection.
        if sin2_t > 1.0 {
            return Color::black();
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let direction = comps.normalv * (n_ratio * cos_i - cos_t)
            - comps.eyev * n_ratio;
        let refract_ray = Ray4D::new(comps.under_point, direction);

        self.color_at(&refract_ray, remaining - 1) * transparency
    }
}

#[cfg(test)]
use crate::{
    tuple::Tuple4D, matrix::Matrix4D, shape::Shape, entity::Entity,
    material::Material, light::PointLight,
    intersect::{ Intersection, Intersections },
};

#[cfg(test)]
fn comps_for<'a>(r: &Ray4D, i: usize, xs: &Intersections<'a>)
    -> IntersectionComputation<'a> {
    IntersectionComputation::new(r, &xs[i], xs, EPSILON)
}

#[test]
fn default_render_options() {
    let o = RenderOptions::default();

    assert_eq!(o.max_depth, 5);
    assert_eq!(o.acne_epsilon, EPSILON);
}

#[test]
fn render_options_deserialize_with_defaults() {
    let o: RenderOptions = serde_json::from_str(r#"{ "max_depth": 2 }"#).unwrap();

    assert_eq!(o.max_depth, 2);
    assert_eq!(o.acne_epsilon, EPSILON);
}

#[test]
fn shade_hit_from_outside() {
    let s = Scene::default();
    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let xs = Intersections::new(vec![Intersection::new(4.0, &s.entities[0])]);

    let c = shader.shade_hit(&comps_for(&r, 0, &xs), 5);
    assert_eq!(c, Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn shade_hit_from_inside() {
    let mut s = Scene::default();
    s.lights = vec![PointLight::new(Color::white(), Tuple4D::point(0.0, 0.25, 0.0))];
    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let xs = Intersections::new(vec![Intersection::new(0.5, &s.entities[1])]);

    let c = shader.shade_hit(&comps_for(&r, 0, &xs), 5);
    assert_eq!(c, Color::rgb(0.90498, 0.90498, 0.90498));
}

#[test]
fn shade_hit_in_shadow() {
    let mut s = Scene::empty();
    s.add_light(PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0)));
    s.add_entity(Entity::new(Shape::sphere()));
    s.add_entity(Entity::new(Shape::sphere())
        .with_transform(Matrix4D::translation(0.0, 0.0, 10.0))
        .unwrap());

    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let xs = Intersections::new(vec![Intersection::new(4.0, &s.entities[1])]);

    let c = shader.shade_hit(&comps_for(&r, 0, &xs), 5);
    assert_eq!(c, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn shade_hit_sums_every_light() {
    let mut s = Scene::default();
    let light = s.lights[0];
    s.add_light(light);
    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );

    assert_eq!(shader.color_at(&r, 5), Color::rgb(0.38066, 0.47583, 0.2855) * 2.0);
}

#[test]
fn no_lights_renders_black() {
    let mut s = Scene::default();
    s.lights.clear();
    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );

    assert_eq!(shader.color_at(&r, 5), Color::black());
}

#[test]
fn color_when_ray_misses() {
    let s = Scene::default();
    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 1.0, 0.0)
    );

    assert_eq!(shader.color_at(&r, 5), Color::black());
}

#[test]
fn color_when_ray_hits() {
    let s = Scene::default();
    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );

    assert_eq!(shader.trace(&r), Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn color_with_intersection_behind_ray() {
    let mut s = Scene::default();
    s.entities[0].material.ambient = 1.0;
    s.entities[1].material.ambient = 1.0;
    let inner_color = s.entities[1].material.color;

    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 0.75),
        Tuple4D::vector(0.0, 0.0, -1.0)
    );

    assert_eq!(shader.color_at(&r, 5), inner_color);
}

#[test]
fn reflected_color_of_nonreflective_material() {
    let mut s = Scene::default();
    s.entities[1].material.ambient = 1.0;
    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let xs = Intersections::new(vec![Intersection::new(1.0, &s.entities[1])]);

    assert_eq!(shader.reflected_color(&comps_for(&r, 0, &xs), 5), Color::black());
}

#[cfg(test)]
fn scene_with_reflective_floor() -> Scene {
    let mut s = Scene::default();
    s.add_entity(Entity::new(Shape::plane())
        .with_material(Material { reflective: 0.5, ..Material::default() })
        .with_transform(Matrix4D::translation(0.0, -1.0, 0.0))
        .unwrap());
    s
}

#[test]
fn reflected_color_of_reflective_material() {
    let s = scene_with_reflective_floor();
    let shader = Shader::new(&s, RenderOptions::default());
    let k = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -3.0),
        Tuple4D::vector(0.0, -k, k)
    );
    let xs = Intersections::new(vec![Intersection::new(2.0f64.sqrt(), &s.entities[2])]);

    assert_eq!(shader.reflected_color(&comps_for(&r, 0, &xs), 5),
        Color::rgb(0.19032, 0.2379, 0.14274));
}

#[test]
fn shade_hit_with_reflective_material() {
    let s = scene_with_reflective_floor();
    let shader = Shader::new(&s, RenderOptions::default());
    let k = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -3.0),
        Tuple4D::vector(0.0, -k, k)
    );
    let xs = Intersections::new(vec![Intersection::new(2.0f64.sqrt(), &s.entities[2])]);

    assert_eq!(shader.shade_hit(&comps_for(&r, 0, &xs), 5),
        Color::rgb(0.87677, 0.92436, 0.82918));
}

#[test]
fn reflected_color_at_max_depth_is_black() {
    let s = scene_with_reflective_floor();
    let shader = Shader::new(&s, RenderOptions::default());
    let k = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -3.0),
        Tuple4D::vector(0.0, -k, k)
    );
    let xs = Intersections::new(vec![Intersection::new(2.0f64.sqrt(), &s.entities[2])]);
    let comps = comps_for(&r, 0, &xs);

    assert_eq!(shader.reflected_color(&comps, 0), Color::black());

    // Without bounces left only the surface itself is seen.
    let surface = shader.shade_hit(&comps, 0);
    let mut matte = s.clone();
    matte.entities[2].material.reflective = 0.0;
    let matte_shader = Shader::new(&matte, RenderOptions::default());
    let xs = Intersections::new(vec![Intersection::new(2.0f64.sqrt(), &matte.entities[2])]);
    assert_eq!(surface, matte_shader.shade_hit(&comps_for(&r, 0, &xs), 5));
}

#[test]
fn mutually_reflective_surfaces_terminate() {
    let mut s = Scene::empty();
    s.add_light(PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, 0.0)));
    s.add_entity(Entity::new(Shape::plane())
        .with_material(Material { reflective: 1.0, ..Material::default() })
        .with_transform(Matrix4D::translation(0.0, -1.0, 0.0))
        .unwrap());
    s.add_entity(Entity::new(Shape::plane())
        .with_material(Material { reflective: 1.0, ..Material::default() })
        .with_transform(Matrix4D::translation(0.0, 1.0, 0.0))
        .unwrap());

    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0)
    );

    let c = shader.trace(&r);
    assert!(c.r.is_finite() && c.r > 0.0);
}

#[test]
fn refracted_color_of_opaque_surface() {
    let s = Scene::default();
    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let xs = Intersections::new(vec![
        Intersection::new(4.0, &s.entities[0]),
        Intersection::new(6.0, &s.entities[0]),
    ]);

    assert_eq!(shader.refracted_color(&comps_for(&r, 0, &xs), 5), Color::black());
}

#[test]
fn refracted_color_at_max_depth_is_black() {
    let mut s = Scene::default();
    s.entities[0].material.transparency = 1.0;
    s.entities[0].material.refractive_index = 1.5;
    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let xs = Intersections::new(vec![
        Intersection::new(4.0, &s.entities[0]),
        Intersection::new(6.0, &s.entities[0]),
    ]);

    assert_eq!(shader.refracted_color(&comps_for(&r, 0, &xs), 0), Color::black());
}

#[test]
fn refracted_color_under_total_internal_reflection() {
    let mut s = Scene::default();
    s.entities[0].material.transparency = 1.0;
    s.entities[0].material.refractive_index = 1.5;
    let shader = Shader::new(&s, RenderOptions::default());
    let k = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, k),
        Tuple4D::vector(0.0, 1.0, 0.0)
    );
    let xs = Intersections::new(vec![
        Intersection::new(-k, &s.entities[0]),
        Intersection::new(k, &s.entities[0]),
    ]);

    assert_eq!(shader.refracted_color(&comps_for(&r, 1, &xs), 5), Color::black());
}

#[test]
fn refracted_color_sees_through_surface() {
    let mut s = Scene::empty();
    s.add_light(PointLight::new(Color::white(), Tuple4D::point(-10.0, 10.0, -10.0)));
    s.add_entity(Entity::new(Shape::sphere())
        .with_material(Material {
            color: Color::black(),
            ambient: 0.0,
            diffuse: 0.0,
            specular: 0.0,
            transparency: 1.0,
            refractive_index: 1.0,
            ..Material::default()
        }));
    s.add_entity(Entity::new(Shape::sphere())
        .with_material(Material {
            color: Color::rgb(1.0, 0.0, 0.0),
            ambient: 1.0,
            diffuse: 0.0,
            specular: 0.0,
            ..Material::default()
        })
        .with_transform(Matrix4D::translation(0.0, 0.0, 5.0))
        .unwrap());

    let shader = Shader::new(&s, RenderOptions::default());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let xs = Intersections::new(vec![
        Intersection::new(4.0, &s.entities[0]),
        Intersection::new(6.0, &s.entities[0]),
    ]);

    assert_eq!(shader.refracted_color(&comps_for(&r, 0, &xs), 5),
        Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(shader.trace(&r), Color::rgb(1.0, 0.0, 0.0));
}

#[cfg(test)]
fn scene_with_glass_floor(reflective: f64) -> Scene {
    let mut s = Scene::default();
    s.add_entity(Entity::new(Shape::plane())
        .with_material(Material {
            transparency: 0.5,
            reflective,
            refractive_index: 1.5,
            ..Material::default()
        })
        .with_transform(Matrix4D::translation(0.0, -1.0, 0.0))
        .unwrap());
    s.add_entity(Entity::new(Shape::sphere())
        .with_material(Material {
            color: Color::rgb(1.0, 0.0, 0.0),
            ambient: 0.5,
            ..Material::default()
        })
        .with_transform(Matrix4D::translation(0.0, -3.5, -0.5))
        .unwrap());
    s
}

#[test]
fn shade_hit_with_transparent_material() {
    let s = scene_with_glass_floor(0.0);
    let shader = Shader::new(&s, RenderOptions::default());
    let k = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -3.0),
        Tuple4D::vector(0.0, -k, k)
    );
    let xs = Intersections::new(vec![Intersection::new(2.0f64.sqrt(), &s.entities[2])]);

    assert_eq!(shader.shade_hit(&comps_for(&r, 0, &xs), 5),
        Color::rgb(0.93642, 0.68642, 0.68642));
}

#[test]
fn shade_hit_with_reflective_transparent_material() {
    let s = scene_with_glass_floor(0.5);
    let shader = Shader::new(&s, RenderOptions::default());
    let k = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -3.0),
        Tuple4D::vector(0.0, -k, k)
    );
    let xs = Intersections::new(vec![Intersection::new(2.0f64.sqrt(), &s.entities[2])]);

    assert_eq!(shader.shade_hit(&comps_for(&r, 0, &xs), 5),
        Color::rgb(0.93391, 0.69643, 0.69243));
}
