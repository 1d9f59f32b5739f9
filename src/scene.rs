use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::matrix::Matrix4D;
use crate::shape::Shape;
use crate::entity::Entity;
use crate::material::Material;
use crate::light::PointLight;
use crate::intersect::Intersections;

/// Everything which can be seen: the entities and the lights shining on them.
///
/// A scene is built up front and then only read while rendering.
#[derive(Clone, Debug)]
pub struct Scene {
    pub entities: Vec<Entity>,
    pub lights: Vec<PointLight>,
}

/// The default scene: two concentric spheres lit from the upper left. Handy
/// for tests.
impl Default for Scene {
    fn default() -> Scene {
        let light = PointLight::new(
            Color::white(),
            Tuple4D::point(-10.0, 10.0, -10.0)
        );

        let outer = Entity::new(Shape::sphere())
            .with_material(Material {
                color: Color::rgb(0.8, 1.0, 0.6),
                diffuse: 0.7,
                specular: 0.2,
                ..Material::default()
            });

        let inner = Entity::new(Shape::sphere())
            .with_transform(Matrix4D::scaling(0.5, 0.5, 0.5))
            .expect("uniform scaling should be invertible");

        Scene {
            entities: vec![outer, inner],
            lights: vec![light],
        }
    }
}

impl Scene {
    /// Creates a scene with no entities and no lights.
    pub fn empty() -> Scene {
        Scene { entities: Vec::new(), lights: Vec::new() }
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Intersects a ray with every entity, sorted by ascending `t`.
    pub fn intersect(&self, r: &Ray4D) -> Intersections<'_> {
        Intersections::new(self.entities.iter()
            .flat_map(|entity| entity.intersect(r))
            .collect())
    }

    /// Checks whether something stands between a point and a light.
    ///
    /// Entities which do not cast shadows are ignored. Callers should pass a
    /// point lifted slightly off the surface, or the surface may shadow
    /// itself.
    pub fn is_shadowed(&self, p: Tuple4D, light: &PointLight) -> bool {
        let v = light.position - p;
        let distance = v.magnitude();
        let r = Ray4D::new(p, v.normalize());

        self.entities.iter()
            .filter(|e| e.casts_shadow)
            .filter_map(|e| e.intersect(&r).hit())
            .any(|hit| hit.t < distance)
    }
}

#[test]
fn empty_scene() {
    let s = Scene::empty();

    assert!(s.entities.is_empty());
    assert!(s.lights.is_empty());
}

#[test]
fn default_scene_contents() {
    let s = Scene::default();

    assert_eq!(s.lights, vec![PointLight::new(Color::white(),
        Tuple4D::point(-10.0, 10.0, -10.0))]);
    assert_eq!(s.entities.len(), 2);
    assert_eq!(s.entities[0].material.color, Color::rgb(0.8, 1.0, 0.6));
    assert_eq!(*s.entities[1].transform(), Matrix4D::scaling(0.5, 0.5, 0.5));
}

#[test]
fn intersect_default_scene_with_ray() {
    let s = Scene::default();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    let ts: Vec<f64> = s.intersect(&r).iter().map(|i| i.t).collect();
    assert_eq!(ts, vec![4.0, 4.5, 5.5, 6.0]);
}

#[test]
fn intersections_from_many_entities_are_merged_in_order() {
    let mut s = Scene::empty();
    for z in [4.0, -2.0, 1.0].iter() {
        s.add_entity(Entity::new(Shape::sphere())
            .with_transform(Matrix4D::translation(0.0, 0.0, *z))
            .unwrap());
    }
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    let xs = s.intersect(&r);
    let ts: Vec<f64> = xs.iter().map(|i| i.t).collect();
    assert_eq!(ts, vec![2.0, 4.0, 5.0, 7.0, 8.0, 10.0]);
    assert!(std::ptr::eq(xs[0].entity, &s.entities[1]));
    assert!(std::ptr::eq(xs[5].entity, &s.entities[0]));
}

#[test]
fn no_shadow_when_nothing_is_collinear() {
    let s = Scene::default();
    assert!(!s.is_shadowed(Tuple4D::point(0.0, 10.0, 0.0), &s.lights[0]));
}

#[test]
fn shadow_when_entity_between_point_and_light() {
    let s = Scene::default();
    assert!(s.is_shadowed(Tuple4D::point(10.0, -10.0, 10.0), &s.lights[0]));
}

#[test]
fn no_shadow_when_entity_behind_light() {
    let s = Scene::default();
    assert!(!s.is_shadowed(Tuple4D::point(-20.0, 20.0, -20.0), &s.lights[0]));
}

#[test]
fn no_shadow_when_entity_behind_point() {
    let s = Scene::default();
    assert!(!s.is_shadowed(Tuple4D::point(-2.0, 2.0, -2.0), &s.lights[0]));
}

#[test]
fn entities_can_opt_out_of_shadows() {
    let mut s = Scene::default();
    for e in s.entities.iter_mut() {
        e.casts_shadow = false;
    }

    assert!(!s.is_shadowed(Tuple4D::point(10.0, -10.0, 10.0), &s.lights[0]));
}
