use crate::tuple::Tuple4D;
use crate::ray::Ray4D;
use crate::matrix::Matrix4D;
use crate::shape::Shape;
use crate::material::Material;
use crate::intersect::{ Intersection, Intersections };
use crate::error::{ RenderError, Result };

/// A shape placed in a scene: geometry, a surface, and a transform.
///
/// The inverse of the transform is computed once, whenever the transform is
/// set, and reused for every ray; a transform which cannot be inverted is
/// rejected on the spot.
///
/// ```
/// # use phong_ray_tracer::entity::Entity;
/// # use phong_ray_tracer::shape::Shape;
/// # use phong_ray_tracer::material::Material;
/// # use phong_ray_tracer::matrix::Matrix4D;
/// let ball = Entity::new(Shape::sphere())
///     .with_material(Material::glass())
///     .with_transform(Matrix4D::identity().scale(0.5, 0.5, 0.5).translate(0.0, 1.0, 0.0))
///     .unwrap();
///
/// assert!(Entity::new(Shape::cube())
///     .with_transform(Matrix4D::scaling(1.0, 0.0, 1.0))
///     .is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub shape: Shape,
    pub material: Material,

    /// Whether this entity blocks light from reaching other surfaces.
    pub casts_shadow: bool,

    transform: Matrix4D,
    inverse: Matrix4D,
}

impl Entity {
    /// Creates an untransformed entity with the default material.
    pub fn new(shape: Shape) -> Entity {
        Entity {
            shape,
            material: Material::default(),
            casts_shadow: true,
            transform: Matrix4D::identity(),
            inverse: Matrix4D::identity(),
        }
    }

    pub fn with_material(mut self, material: Material) -> Entity {
        self.material = material;
        self
    }

    pub fn with_transform(mut self, transform: Matrix4D) -> Result<Entity> {
        self.set_transform(transform)?;
        Ok(self)
    }

    pub fn with_shadow(mut self, casts_shadow: bool) -> Entity {
        self.casts_shadow = casts_shadow;
        self
    }

    /// Replaces the transform, recomputing the cached inverse. On error the
    /// entity is left unchanged.
    pub fn set_transform(&mut self, transform: Matrix4D) -> Result<()> {
        self.inverse = transform.inverse()
            .ok_or(RenderError::SingularTransform)?;
        self.transform = transform;

        Ok(())
    }

    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    pub fn inverse_transform(&self) -> &Matrix4D {
        &self.inverse
    }

    /// Converts a point from world to object space.
    pub fn world_to_object(&self, point: Tuple4D) -> Tuple4D {
        self.inverse * point
    }

    /// Converts an object-space normal to a normalized world-space normal.
    pub fn normal_to_world(&self, normal: Tuple4D) -> Tuple4D {
        let mut world = self.inverse.transposition() * normal;
        world.w = 0.0;
        world.normalize()
    }

    /// The world-space surface normal at a world-space point.
    pub fn normal_at(&self, world_point: Tuple4D) -> Tuple4D {
        let local_point = self.world_to_object(world_point);
        let local_normal = self.shape.local_normal_at(&local_point);

        self.normal_to_world(local_normal)
    }

    /// Intersects a world-space ray with this entity.
    ///
    /// The returned intersections are in ray order.
    pub fn intersect(&self, ray: &Ray4D) -> Intersections<'_> {
        let local_ray = ray.transform(&self.inverse);
        let intersections = self.shape.local_intersect(&local_ray)
            .into_iter()
            .map(|t| Intersection::new(t, self))
            .collect();

        Intersections::new(intersections)
    }
}

#[cfg(test)]
use std::f64::consts::PI;

#[test]
fn default_entity() {
    let e = Entity::new(Shape::sphere());

    assert_eq!(*e.transform(), Matrix4D::identity());
    assert_eq!(*e.inverse_transform(), Matrix4D::identity());
    assert_eq!(e.material, Material::default());
    assert!(e.casts_shadow);
}

#[test]
fn set_transform_recomputes_inverse() {
    let mut e = Entity::new(Shape::sphere());
    e.set_transform(Matrix4D::translation(2.0, 3.0, 4.0)).unwrap();

    assert_eq!(*e.inverse_transform(), Matrix4D::translation(-2.0, -3.0, -4.0));
}

#[test]
fn singular_transform_leaves_entity_unchanged() {
    let mut e = Entity::new(Shape::sphere())
        .with_transform(Matrix4D::scaling(2.0, 2.0, 2.0))
        .unwrap();

    let result = e.set_transform(Matrix4D::zero());

    assert!(matches!(result, Err(RenderError::SingularTransform)));
    assert_eq!(*e.transform(), Matrix4D::scaling(2.0, 2.0, 2.0));
}

#[test]
fn intersecting_scaled_sphere() {
    let e = Entity::new(Shape::sphere())
        .with_transform(Matrix4D::scaling(2.0, 2.0, 2.0))
        .unwrap();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );

    let xs = e.intersect(&r);
    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0].t, 3.0);
    assert_eq!(xs[1].t, 7.0);
    assert!(std::ptr::eq(xs[0].entity, &e));
}

#[test]
fn intersecting_translated_sphere() {
    let e = Entity::new(Shape::sphere())
        .with_transform(Matrix4D::translation(5.0, 0.0, 0.0))
        .unwrap();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );

    assert!(e.intersect(&r).is_empty());
}

#[test]
fn normal_on_translated_sphere() {
    let e = Entity::new(Shape::sphere())
        .with_transform(Matrix4D::translation(0.0, 1.0, 0.0))
        .unwrap();

    let n = e.normal_at(Tuple4D::point(0.0, 1.70711, -0.70711));
    assert_eq!(n, Tuple4D::vector(0.0, 0.70711, -0.70711));
}

#[test]
fn normal_on_transformed_sphere() {
    let e = Entity::new(Shape::sphere())
        .with_transform(Matrix4D::identity().rotate_z(PI / 5.0).scale(1.0, 0.5, 1.0))
        .unwrap();

    let k = 2.0f64.sqrt() / 2.0;
    let n = e.normal_at(Tuple4D::point(0.0, k, -k));
    assert_eq!(n, Tuple4D::vector(0.0, 0.97014, -0.24254));
}

#[test]
fn normal_on_transformed_cylinder_cap() {
    let e = Entity::new(Shape::capped_cylinder(0.0, 1.0))
        .with_transform(Matrix4D::translation(0.0, 2.0, 0.0))
        .unwrap();

    assert_eq!(e.normal_at(Tuple4D::point(0.5, 3.0, 0.0)),
        Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(e.normal_at(Tuple4D::point(0.0, 2.0, 0.5)),
        Tuple4D::vector(0.0, -1.0, 0.0));
}
