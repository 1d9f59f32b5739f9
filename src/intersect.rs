use std::ops::Deref;

use crate::tuple::Tuple4D;
use crate::ray::Ray4D;
use crate::entity::Entity;

/// An intersection.
///
/// Some ray crossed the surface of `entity` at offset `t` along the ray.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub t: f64,
    pub entity: &'a Entity,
}

/// Two intersections are equal if their offsets are equal and they refer to
/// the *same* entity (pointer equality).
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.t == other.t && std::ptr::eq(self.entity, other.entity)
    }
}

impl<'a> Intersection<'a> {
    pub fn new(t: f64, entity: &'a Entity) -> Intersection<'a> {
        Intersection { t, entity }
    }
}

/// A collection of intersections, always sorted by ascending `t`.
#[derive(Clone, Debug, Default)]
pub struct Intersections<'a> {
    intersections: Vec<Intersection<'a>>,
}

impl<'a> Intersections<'a> {
    pub fn new(mut intersections: Vec<Intersection<'a>>) -> Intersections<'a> {
        intersections.sort_by(|a, b| a.t.total_cmp(&b.t));

        Intersections { intersections }
    }

    /// The visible intersection: the one with the smallest non-negative `t`.
    ///
    /// Non-finite offsets are never hits.
    pub fn hit(&self) -> Option<Intersection<'a>> {
        self.intersections.iter()
            .find(|i| i.t.is_finite() && i.t >= 0.0)
            .copied()
    }
}

impl<'a> IntoIterator for Intersections<'a> {
    type Item = Intersection<'a>;
    type IntoIter = std::vec::IntoIter<Intersection<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.intersections.into_iter()
    }
}

impl<'a> Deref for Intersections<'a> {
    type Target = [Intersection<'a>];

    fn deref(&self) -> &Self::Target {
        &self.intersections
    }
}

/// A record of values derived from a hit, shared by every shading step.
#[derive(Clone, Debug)]
pub struct IntersectionComputation<'a> {
    /// The offset of the hit along the ray.
    pub t: f64,

    /// The entity which was hit.
    pub entity: &'a Entity,

    /// The point where the hit occurs.
    pub point: Tuple4D,

    /// A point slightly above the surface. Shadow and reflection rays start
    /// here so a surface does not shadow itself ("acne").
    pub over_point: Tuple4D,

    /// A point slightly below the surface, where refracted rays start.
    pub under_point: Tuple4D,

    pub eyev: Tuple4D,

    /// The surface normal, flipped to face the eye.
    pub normalv: Tuple4D,

    /// The incoming ray direction reflected across the normal.
    pub reflectv: Tuple4D,

    /// Whether the hit occurs on the inside of the entity.
    pub inside: bool,

    /// The refractive index of the medium being exited.
    pub n1: f64,

    /// The refractive index of the medium being entered.
    pub n2: f64,
}

impl<'a> IntersectionComputation<'a> {
    /// Prepares the shading state for `hit`, which must be one of `xs`.
    ///
    /// `epsilon` is how far the over and under points sit from the surface.
    pub fn new(r: &Ray4D, hit: &Intersection<'a>, xs: &Intersections<'a>,
        epsilon: f64) -> IntersectionComputation<'a> {
        let t = hit.t;
        let entity = hit.entity;
        let point = r.position(t);
        let eyev = -r.direction;
        let mut normalv = entity.normal_at(point);

        let inside = if normalv.dot(&eyev) < 0.0 {
            normalv = -normalv;
            true
        } else {
            false
        };

        let over_point = point + normalv * epsilon;
        let under_point = point - normalv * epsilon;
        let reflectv = r.direction.reflect(&normalv);
        let (n1, n2) = refraction_indices(hit, xs);

        IntersectionComputation {
            t, entity,
            point, over_point, under_point,
            eyev, normalv, reflectv,
            inside,
            n1, n2,
        }
    }

    /// The Schlick approximation of the Fresnel reflectance at this hit.
    ///
    /// The result is the fraction of light which is reflected rather than
    /// refracted: between 0 and 1, and exactly 1 under total internal
    /// reflection.
    pub fn schlick(&self) -> f64 {
        let mut cos = self.eyev.dot(&self.normalv);

        // Total internal reflection can only occur if n1 > n2.
        if self.n1 > self.n2 {
            let n = self.n1 / self.n2;
            let sin2_t = n.powi(2) * (1.0 - cos.powi(2));
            if sin2_t > 1.0 {
                return 1.0
            }

            cos = (1.0 - sin2_t).sqrt();
        }

        let r0 = ((self.n1 - self.n2) / (self.n1 + self.n2)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cos).powi(5)
    }
}

/// Finds the refractive indices on either side of `hit`.
///
/// Walks the intersections in order, tracking which entities the ray is
/// currently inside of. The innermost one at the hit is the medium being
/// exited; the innermost one just after it is the medium being entered.
/// Outside every entity the index is 1.0.
fn refraction_indices<'a>(hit: &Intersection<'a>, xs: &Intersections<'a>)
    -> (f64, f64) {
    let index_of = |containers: &[&Entity]| containers.last()
        .map_or(1.0, |e| e.material.refractive_index);

    let mut containers: Vec<&'a Entity> = Vec::new();
    let mut n1 = 1.0;

    for i in xs.iter() {
        if i == hit {
            n1 = index_of(&containers);
        }

        match containers.iter().position(|&e| std::ptr::eq(e, i.entity)) {
            Some(j) => { containers.remove(j); },
            None => containers.push(i.entity),
        }

        if i == hit {
            return (n1, index_of(&containers));
        }
    }

    (n1, 1.0)
}

#[cfg(test)]
use crate::{ shape::Shape, matrix::Matrix4D, material::Material, consts::EPSILON };

#[cfg(test)]
fn glass_sphere(scale: f64, z: f64, refractive_index: f64) -> Entity {
    Entity::new(Shape::sphere())
        .with_material(Material {
            transparency: 1.0,
            refractive_index,
            ..Material::default()
        })
        .with_transform(Matrix4D::identity()
            .scale(scale, scale, scale)
            .translate(0.0, 0.0, z))
        .unwrap()
}

#[test]
fn intersections_are_sorted() {
    let s = Entity::new(Shape::sphere());
    let xs = Intersections::new(vec![
        Intersection::new(5.0, &s),
        Intersection::new(-3.0, &s),
        Intersection::new(2.0, &s),
    ]);

    let ts: Vec<f64> = xs.iter().map(|i| i.t).collect();
    assert_eq!(ts, vec![-3.0, 2.0, 5.0]);
}

#[test]
fn hit_with_all_positive() {
    let s = Entity::new(Shape::sphere());
    let i1 = Intersection::new(1.0, &s);
    let i2 = Intersection::new(2.0, &s);

    assert_eq!(Intersections::new(vec![i2, i1]).hit(), Some(i1));
}

#[test]
fn hit_with_some_negative() {
    let s = Entity::new(Shape::sphere());
    let i1 = Intersection::new(-1.0, &s);
    let i2 = Intersection::new(1.0, &s);

    assert_eq!(Intersections::new(vec![i2, i1]).hit(), Some(i2));
}

#[test]
fn hit_with_all_negative() {
    let s = Entity::new(Shape::sphere());
    let xs = Intersections::new(vec![
        Intersection::new(-2.0, &s),
        Intersection::new(-1.0, &s),
    ]);

    assert_eq!(xs.hit(), None);
}

#[test]
fn hit_is_lowest_nonnegative() {
    let s = Entity::new(Shape::sphere());
    let i4 = Intersection::new(2.0, &s);
    let xs = Intersections::new(vec![
        Intersection::new(5.0, &s),
        Intersection::new(7.0, &s),
        Intersection::new(-3.0, &s),
        i4,
    ]);

    assert_eq!(xs.hit(), Some(i4));
}

#[test]
fn hit_ignores_non_finite() {
    let s = Entity::new(Shape::sphere());
    let i = Intersection::new(3.0, &s);
    let xs = Intersections::new(vec![
        Intersection::new(f64::NAN, &s),
        Intersection::new(f64::NEG_INFINITY, &s),
        i,
        Intersection::new(f64::INFINITY, &s),
    ]);

    assert_eq!(xs.hit(), Some(i));
}

#[test]
fn precompute_outside_hit() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Entity::new(Shape::sphere());
    let i = Intersection::new(4.0, &s);
    let comps = IntersectionComputation::new(&r, &i,
        &Intersections::new(vec![i]), EPSILON);

    assert_eq!(comps.t, 4.0);
    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, -1.0));
    assert_eq!(comps.eyev, Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(comps.normalv, Tuple4D::vector(0.0, 0.0, -1.0));
    assert!(!comps.inside);
}

#[test]
fn precompute_inside_hit() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Entity::new(Shape::sphere());
    let i = Intersection::new(1.0, &s);
    let comps = IntersectionComputation::new(&r, &i,
        &Intersections::new(vec![i]), EPSILON);

    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, 1.0));
    assert_eq!(comps.eyev, Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(comps.normalv, Tuple4D::vector(0.0, 0.0, -1.0));
    assert!(comps.inside);
}

#[test]
fn hit_offsets_over_and_under_points() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = glass_sphere(1.0, 1.0, 1.5);
    let i = Intersection::new(5.0, &s);
    let comps = IntersectionComputation::new(&r, &i,
        &Intersections::new(vec![i]), EPSILON);

    assert!(comps.over_point.z < -EPSILON / 2.0);
    assert!(comps.point.z > comps.over_point.z);
    assert!(comps.under_point.z > EPSILON / 2.0);
    assert!(comps.point.z < comps.under_point.z);
}

#[test]
fn precompute_reflection_vector() {
    let k = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(
        Tuple4D::point(0.0, 1.0, -1.0),
        Tuple4D::vector(0.0, -k, k)
    );
    let s = Entity::new(Shape::plane());
    let i = Intersection::new(2.0f64.sqrt(), &s);
    let comps = IntersectionComputation::new(&r, &i,
        &Intersections::new(vec![i]), EPSILON);

    assert_eq!(comps.reflectv, Tuple4D::vector(0.0, k, k));
}

#[test]
fn refraction_indices_for_nested_spheres() {
    let a = glass_sphere(2.0, 0.0, 1.5);
    let b = glass_sphere(1.0, -0.25, 2.0);
    let c = glass_sphere(1.0, 0.25, 2.5);

    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -4.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let xs = Intersections::new(vec![
        Intersection::new(2.0, &a),
        Intersection::new(2.75, &b),
        Intersection::new(3.25, &c),
        Intersection::new(4.75, &b),
        Intersection::new(5.25, &c),
        Intersection::new(6.0, &a),
    ]);

    let expected = [
        (1.0, 1.5), (1.5, 2.0), (2.0, 2.5),
        (2.5, 2.5), (2.5, 1.5), (1.5, 1.0),
    ];

    for (i, (n1, n2)) in expected.iter().enumerate() {
        let comps = IntersectionComputation::new(&r, &xs[i], &xs, EPSILON);
        assert_eq!((comps.n1, comps.n2), (*n1, *n2));
    }
}

#[test]
fn schlick_under_total_internal_reflection() {
    let k = 2.0f64.sqrt() / 2.0;
    let s = glass_sphere(1.0, 0.0, 1.5);
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, k),
        Tuple4D::vector(0.0, 1.0, 0.0)
    );
    let xs = Intersections::new(vec![
        Intersection::new(-k, &s),
        Intersection::new(k, &s),
    ]);
    let comps = IntersectionComputation::new(&r, &xs[1], &xs, EPSILON);

    assert_eq!(comps.schlick(), 1.0);
}

#[test]
fn schlick_with_perpendicular_view() {
    let s = glass_sphere(1.0, 0.0, 1.5);
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0)
    );
    let xs = Intersections::new(vec![
        Intersection::new(-1.0, &s),
        Intersection::new(1.0, &s),
    ]);
    let comps = IntersectionComputation::new(&r, &xs[1], &xs, EPSILON);

    assert!((comps.schlick() - 0.04).abs() < EPSILON);
}

#[test]
fn schlick_with_small_angle_and_n2_greater() {
    let s = glass_sphere(1.0, 0.0, 1.5);
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.99, -2.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let xs = Intersections::new(vec![Intersection::new(1.8589, &s)]);
    let comps = IntersectionComputation::new(&r, &xs[0], &xs, EPSILON);

    assert!((comps.schlick() - 0.48873).abs() < EPSILON);
}
