use serde::Deserialize;

use crate::consts::EPSILON;
use crate::tuple::Tuple4D;
use crate::ray::Ray4D;

/// Which end caps a cylinder or cone is closed with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Caps {
    None,
    Lower,
    Upper,
    Both,
}

impl Caps {
    pub fn has_lower(&self) -> bool {
        matches!(self, Caps::Lower | Caps::Both)
    }

    pub fn has_upper(&self) -> bool {
        matches!(self, Caps::Upper | Caps::Both)
    }
}

/// The geometric primitives, in object space.
///
/// Every shape is defined around the object-space origin; placing, sizing
/// and orienting it is the job of the owning `Entity`'s transform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    /// The XZ plane (`y == 0`), extending indefinitely, normal +Y.
    Plane,

    /// A unit sphere centered at the origin.
    Sphere,

    /// An axis-aligned cube spanning `[-1, 1]` on every axis.
    Cube,

    /// A unit-radius cylinder around the Y axis, cut at `minimum` and
    /// `maximum` (exclusive) and closed by the given caps.
    Cylinder { minimum: f64, maximum: f64, caps: Caps },

    /// A double-napped cone `x² + z² = y²`, cut and capped like a cylinder.
    Cone { minimum: f64, maximum: f64, caps: Caps },
}

impl Shape {
    pub fn sphere() -> Shape {
        Shape::Sphere
    }

    pub fn plane() -> Shape {
        Shape::Plane
    }

    pub fn cube() -> Shape {
        Shape::Cube
    }

    /// An infinitely long, open cylinder.
    pub fn cylinder() -> Shape {
        Shape::bounded_cylinder(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// An open cylinder (a tube) between `minimum` and `maximum`.
    pub fn bounded_cylinder(minimum: f64, maximum: f64) -> Shape {
        Shape::Cylinder { minimum, maximum, caps: Caps::None }
    }

    /// A solid cylinder closed at both ends.
    pub fn capped_cylinder(minimum: f64, maximum: f64) -> Shape {
        Shape::Cylinder { minimum, maximum, caps: Caps::Both }
    }

    /// A cylinder closed only at its lower end, like a cup.
    pub fn truncated_cylinder(minimum: f64, maximum: f64) -> Shape {
        Shape::Cylinder { minimum, maximum, caps: Caps::Lower }
    }

    pub fn cone() -> Shape {
        Shape::bounded_cone(f64::NEG_INFINITY, f64::INFINITY)
    }

    pub fn bounded_cone(minimum: f64, maximum: f64) -> Shape {
        Shape::Cone { minimum, maximum, caps: Caps::None }
    }

    pub fn capped_cone(minimum: f64, maximum: f64) -> Shape {
        Shape::Cone { minimum, maximum, caps: Caps::Both }
    }

    /// Intersects an object-space ray with this shape.
    ///
    /// Returns the `t` value of every crossing, in no particular order;
    /// tangent rays may report the same `t` twice.
    pub fn local_intersect(&self, ray: &Ray4D) -> Vec<f64> {
        match *self {
            Shape::Plane => intersect_plane(ray),
            Shape::Sphere => intersect_sphere(ray),
            Shape::Cube => intersect_cube(ray),
            Shape::Cylinder { minimum, maximum, caps }
                => intersect_cylinder(ray, minimum, maximum, caps),
            Shape::Cone { minimum, maximum, caps }
                => intersect_cone(ray, minimum, maximum, caps),
        }
    }

    /// The (unnormalized) object-space normal at a point on this shape.
    pub fn local_normal_at(&self, at: &Tuple4D) -> Tuple4D {
        match *self {
            Shape::Plane => Tuple4D::vector(0.0, 1.0, 0.0),
            Shape::Sphere => Tuple4D { w: 0.0, ..*at },
            Shape::Cube => normal_at_cube(at),
            Shape::Cylinder { minimum, maximum, caps } => {
                let dist = at.x.powi(2) + at.z.powi(2);

                if let Some(n) = cap_normal(at, dist, 1.0, 1.0,
                    minimum, maximum, caps) {
                    n
                } else {
                    Tuple4D::vector(at.x, 0.0, at.z)
                }
            },
            Shape::Cone { minimum, maximum, caps } => {
                let dist = at.x.powi(2) + at.z.powi(2);

                if let Some(n) = cap_normal(at, dist, minimum.powi(2),
                    maximum.powi(2), minimum, maximum, caps) {
                    n
                } else {
                    let mut y = dist.sqrt();
                    if at.y > 0.0 {
                        y = -y;
                    }

                    Tuple4D::vector(at.x, y, at.z)
                }
            },
        }
    }
}

fn intersect_plane(ray: &Ray4D) -> Vec<f64> {
    // A ray parallel to the plane never crosses it.
    if ray.direction.y.abs() < EPSILON {
        return vec![];
    }

    vec![-ray.origin.y / ray.direction.y]
}

fn intersect_sphere(ray: &Ray4D) -> Vec<f64> {
    let sphere_to_ray = ray.origin - Tuple4D::point(0.0, 0.0, 0.0);

    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * ray.direction.dot(&sphere_to_ray);
    let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

    let discriminant = b.powi(2) - (4.0 * a * c);
    if discriminant < 0.0 {
        return vec![];
    }

    let t1 = (-b - discriminant.sqrt()) / (2.0 * a);
    let t2 = (-b + discriminant.sqrt()) / (2.0 * a);

    vec![t1, t2]
}

fn intersect_cube(ray: &Ray4D) -> Vec<f64> {
    let (xtmin, xtmax) = check_cube_axis(ray.origin.x, ray.direction.x);
    let (ytmin, ytmax) = check_cube_axis(ray.origin.y, ray.direction.y);
    let (ztmin, ztmax) = check_cube_axis(ray.origin.z, ray.direction.z);

    let tmin = xtmin.max(ytmin).max(ztmin);
    let tmax = xtmax.min(ytmax).min(ztmax);

    if tmin > tmax {
        return vec![];
    }

    vec![tmin, tmax]
}

/// Where a ray crosses the two slab planes of a unit cube along one axis,
/// smaller `t` first.
fn check_cube_axis(origin: f64, direction: f64) -> (f64, f64) {
    let tmin_numerator = -1.0 - origin;
    let tmax_numerator =  1.0 - origin;

    let (tmin, tmax) = if direction.abs() >= EPSILON {
        (tmin_numerator / direction, tmax_numerator / direction)
    } else {
        (tmin_numerator * f64::INFINITY, tmax_numerator * f64::INFINITY)
    };

    if tmin > tmax {
        (tmax, tmin)
    } else {
        (tmin, tmax)
    }
}

fn normal_at_cube(p: &Tuple4D) -> Tuple4D {
    let xa = p.x.abs();
    let ya = p.y.abs();
    let za = p.z.abs();

    let max_component = xa.max(ya).max(za);
    if max_component == xa {
        Tuple4D::vector(p.x, 0.0, 0.0)
    } else if max_component == ya {
        Tuple4D::vector(0.0, p.y, 0.0)
    } else {
        Tuple4D::vector(0.0, 0.0, p.z)
    }
}

fn intersect_cylinder(ray: &Ray4D, minimum: f64, maximum: f64, caps: Caps)
    -> Vec<f64> {
    let mut ts = Vec::new();
    let a = ray.direction.x.powi(2) + ray.direction.z.powi(2);

    // Parallel to the Y axis: only the caps can be hit.
    if a < EPSILON {
        intersect_caps(ray, minimum, maximum, caps, |_| 1.0, &mut ts);
        return ts;
    }

    let b = 2.0 * ray.origin.x * ray.direction.x
          + 2.0 * ray.origin.z * ray.direction.z;
    let c = ray.origin.x.powi(2) + ray.origin.z.powi(2) - 1.0;

    let disc = b.powi(2) - 4.0 * a * c;
    if disc < 0.0 {
        return ts;
    }

    let t0 = (-b - disc.sqrt()) / (2.0 * a);
    let t1 = (-b + disc.sqrt()) / (2.0 * a);
    push_within(ray, minimum, maximum, &[t0, t1], &mut ts);

    intersect_caps(ray, minimum, maximum, caps, |_| 1.0, &mut ts);
    ts
}

fn intersect_cone(ray: &Ray4D, minimum: f64, maximum: f64, caps: Caps)
    -> Vec<f64> {
    let mut ts = Vec::new();

    let a = ray.direction.x.powi(2)
          - ray.direction.y.powi(2)
          + ray.direction.z.powi(2);

    let b = 2.0 * ray.origin.x * ray.direction.x
          - 2.0 * ray.origin.y * ray.direction.y
          + 2.0 * ray.origin.z * ray.direction.z;

    let c = ray.origin.x.powi(2)
          - ray.origin.y.powi(2)
          + ray.origin.z.powi(2);

    if a.abs() < EPSILON {
        // Parallel to one of the halves: a single crossing, if any.
        if b.abs() >= EPSILON {
            push_within(ray, minimum, maximum, &[-c / (2.0 * b)], &mut ts);
        }
    } else {
        let disc = b.powi(2) - 4.0 * a * c;
        if disc < 0.0 {
            return ts;
        }

        let t0 = (-b - disc.sqrt()) / (2.0 * a);
        let t1 = (-b + disc.sqrt()) / (2.0 * a);
        push_within(ray, minimum, maximum, &[t0, t1], &mut ts);
    }

    intersect_caps(ray, minimum, maximum, caps, |y| y.powi(2), &mut ts);
    ts
}

/// Keeps the lateral crossings strictly between `minimum` and `maximum`.
fn push_within(ray: &Ray4D, minimum: f64, maximum: f64, candidates: &[f64],
    ts: &mut Vec<f64>) {
    for &t in candidates {
        let y = ray.origin.y + t * ray.direction.y;
        if minimum < y && y < maximum {
            ts.push(t);
        }
    }
}

/// Adds crossings with the present cap discs. `radius_sq` gives the squared
/// disc radius at a cap's height.
fn intersect_caps<F>(ray: &Ray4D, minimum: f64, maximum: f64, caps: Caps,
    radius_sq: F, ts: &mut Vec<f64>)
    where F: Fn(f64) -> f64 {
    if caps == Caps::None || ray.direction.y.abs() < EPSILON {
        return;
    }

    let within = |t: f64, y: f64| {
        let x = ray.origin.x + t * ray.direction.x;
        let z = ray.origin.z + t * ray.direction.z;

        x.powi(2) + z.powi(2) <= radius_sq(y)
    };

    if caps.has_lower() {
        let t = (minimum - ray.origin.y) / ray.direction.y;
        if within(t, minimum) {
            ts.push(t);
        }
    }

    if caps.has_upper() {
        let t = (maximum - ray.origin.y) / ray.direction.y;
        if within(t, maximum) {
            ts.push(t);
        }
    }
}

/// The normal of a present cap, if `at` lies on one.
fn cap_normal(at: &Tuple4D, dist: f64, lower_radius_sq: f64,
    upper_radius_sq: f64, minimum: f64, maximum: f64, caps: Caps)
    -> Option<Tuple4D> {
    if caps.has_upper() && dist < upper_radius_sq && at.y >= maximum - EPSILON {
        Some(Tuple4D::vector(0.0, 1.0, 0.0))
    } else if caps.has_lower() && dist < lower_radius_sq
        && at.y <= minimum + EPSILON {
        Some(Tuple4D::vector(0.0, -1.0, 0.0))
    } else {
        None
    }
}

#[cfg(test)]
fn ray(origin: (f64, f64, f64), direction: (f64, f64, f64)) -> Ray4D {
    Ray4D::new(
        Tuple4D::point(origin.0, origin.1, origin.2),
        Tuple4D::vector(direction.0, direction.1, direction.2)
    )
}

#[test]
fn ray_intersects_sphere_at_two_points() {
    let ts = Shape::sphere().local_intersect(&ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0)));
    assert_eq!(ts, vec![4.0, 6.0]);
}

#[test]
fn ray_is_tangent_to_sphere() {
    let ts = Shape::sphere().local_intersect(&ray((0.0, 1.0, -5.0), (0.0, 0.0, 1.0)));
    assert_eq!(ts, vec![5.0, 5.0]);
}

#[test]
fn ray_misses_sphere() {
    let ts = Shape::sphere().local_intersect(&ray((0.0, 2.0, -5.0), (0.0, 0.0, 1.0)));
    assert!(ts.is_empty());
}

#[test]
fn ray_is_inside_sphere() {
    let ts = Shape::sphere().local_intersect(&ray((0.0, 0.0, 0.0), (0.0, 0.0, 1.0)));
    assert_eq!(ts, vec![-1.0, 1.0]);
}

#[test]
fn normal_on_sphere_nonaxial() {
    let k = 3.0f64.sqrt() / 3.0;
    let n = Shape::sphere().local_normal_at(&Tuple4D::point(k, k, k));

    assert_eq!(n, Tuple4D::vector(k, k, k));
    assert_eq!(n, n.normalize());
}

#[test]
fn plane_normal_is_constant() {
    let p = Shape::plane();

    assert_eq!(p.local_normal_at(&Tuple4D::point(0.0, 0.0, 0.0)),
        Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(p.local_normal_at(&Tuple4D::point(10.0, 0.0, -10.0)),
        Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn ray_parallel_to_plane() {
    let p = Shape::plane();

    assert!(p.local_intersect(&ray((0.0, 10.0, 0.0), (0.0, 0.0, 1.0))).is_empty());
    assert!(p.local_intersect(&ray((0.0, 0.0, 0.0), (0.0, 0.0, 1.0))).is_empty());
}

#[test]
fn ray_intersecting_plane_from_above_and_below() {
    let p = Shape::plane();

    assert_eq!(p.local_intersect(&ray((0.0, 1.0, 0.0), (0.0, -1.0, 0.0))),
        vec![1.0]);
    assert_eq!(p.local_intersect(&ray((0.0, -1.0, 0.0), (0.0, 1.0, 0.0))),
        vec![1.0]);
}

#[test]
fn ray_intersects_cube() {
    let c = Shape::cube();
    let cases = [
        ((5.0, 0.5, 0.0), (-1.0, 0.0, 0.0), 4.0, 6.0),
        ((-5.0, 0.5, 0.0), (1.0, 0.0, 0.0), 4.0, 6.0),
        ((0.5, 5.0, 0.0), (0.0, -1.0, 0.0), 4.0, 6.0),
        ((0.5, -5.0, 0.0), (0.0, 1.0, 0.0), 4.0, 6.0),
        ((0.5, 0.0, 5.0), (0.0, 0.0, -1.0), 4.0, 6.0),
        ((0.5, 0.0, -5.0), (0.0, 0.0, 1.0), 4.0, 6.0),
        ((0.0, 0.5, 0.0), (0.0, 0.0, 1.0), -1.0, 1.0),
    ];

    for (origin, direction, t1, t2) in cases.iter() {
        let ts = c.local_intersect(&ray(*origin, *direction));
        assert_eq!(ts, vec![*t1, *t2]);
    }
}

#[test]
fn ray_misses_cube() {
    let c = Shape::cube();

    assert!(c.local_intersect(
        &ray((-2.0, 0.0, 0.0), (0.2673, 0.5345, 0.8018))).is_empty());
    assert!(c.local_intersect(
        &ray((2.0, 0.0, 2.0), (0.0, 0.0, -1.0))).is_empty());
    assert!(c.local_intersect(
        &ray((2.0, 2.0, 0.0), (-1.0, 0.0, 0.0))).is_empty());
}

#[test]
fn normal_on_cube_surface() {
    let c = Shape::cube();

    assert_eq!(c.local_normal_at(&Tuple4D::point(1.0, 0.5, -0.8)),
        Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(c.local_normal_at(&Tuple4D::point(-0.4, 0.3, -1.0)),
        Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(c.local_normal_at(&Tuple4D::point(-1.0, -1.0, -1.0)),
        Tuple4D::vector(-1.0, 0.0, 0.0));
}

#[test]
fn ray_misses_cylinder() {
    let c = Shape::cylinder();

    assert!(c.local_intersect(&ray((1.0, 0.0, 0.0), (0.0, 1.0, 0.0))).is_empty());
    assert!(c.local_intersect(&ray((0.0, 0.0, 0.0), (0.0, 1.0, 0.0))).is_empty());
    assert!(c.local_intersect(&ray((0.0, 0.0, -5.0), (1.0, 1.0, 1.0))).is_empty());
}

#[test]
fn ray_strikes_cylinder() {
    let c = Shape::cylinder();

    let ts = c.local_intersect(&ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0)));
    assert_eq!(ts, vec![4.0, 6.0]);

    let r = Ray4D::new(
        Tuple4D::point(0.5, 0.0, -5.0),
        Tuple4D::vector(0.1, 1.0, 1.0).normalize()
    );
    let ts = c.local_intersect(&r);
    assert_eq!(ts.len(), 2);
    assert!((ts[0] - 6.80798).abs() < 1e-4);
    assert!((ts[1] - 7.08872).abs() < 1e-4);
}

#[test]
fn bounded_cylinder_excludes_ends() {
    let c = Shape::bounded_cylinder(1.0, 2.0);
    let cases = [
        ((0.0, 1.5, 0.0), (0.1, 1.0, 0.0), 0),
        ((0.0, 3.0, -5.0), (0.0, 0.0, 1.0), 0),
        ((0.0, 0.0, -5.0), (0.0, 0.0, 1.0), 0),
        ((0.0, 2.0, -5.0), (0.0, 0.0, 1.0), 0),
        ((0.0, 1.0, -5.0), (0.0, 0.0, 1.0), 0),
        ((0.0, 1.5, -2.0), (0.0, 0.0, 1.0), 2),
    ];

    for (origin, direction, count) in cases.iter() {
        let r = Ray4D::new(
            Tuple4D::point(origin.0, origin.1, origin.2),
            Tuple4D::vector(direction.0, direction.1, direction.2).normalize()
        );
        assert_eq!(c.local_intersect(&r).len(), *count);
    }
}

#[test]
fn capped_cylinder_hits_caps() {
    let c = Shape::capped_cylinder(1.0, 2.0);
    let cases = [
        ((0.0, 3.0, 0.0), (0.0, -1.0, 0.0), 2),
        ((0.0, 3.0, -2.0), (0.0, -1.0, 2.0), 2),
        ((0.0, 4.0, -2.0), (0.0, -1.0, 1.0), 2),
        ((0.0, 0.0, -2.0), (0.0, 1.0, 2.0), 2),
        ((0.0, -1.0, -2.0), (0.0, 1.0, 1.0), 2),
    ];

    for (origin, direction, count) in cases.iter() {
        let r = Ray4D::new(
            Tuple4D::point(origin.0, origin.1, origin.2),
            Tuple4D::vector(direction.0, direction.1, direction.2).normalize()
        );
        assert_eq!(c.local_intersect(&r).len(), *count);
    }
}

#[test]
fn truncated_cylinder_has_only_a_lower_cap() {
    let c = Shape::truncated_cylinder(1.0, 2.0);

    // Straight down the axis: through the open top, out the bottom cap.
    let ts = c.local_intersect(&ray((0.0, 3.0, 0.0), (0.0, -1.0, 0.0)));
    assert_eq!(ts, vec![2.0]);

    let upper = Shape::Cylinder { minimum: 1.0, maximum: 2.0, caps: Caps::Upper };
    let ts = upper.local_intersect(&ray((0.0, 3.0, 0.0), (0.0, -1.0, 0.0)));
    assert_eq!(ts, vec![1.0]);
}

#[test]
fn normal_on_cylinder() {
    let c = Shape::cylinder();

    assert_eq!(c.local_normal_at(&Tuple4D::point(1.0, 0.0, 0.0)),
        Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(c.local_normal_at(&Tuple4D::point(0.0, 5.0, -1.0)),
        Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(c.local_normal_at(&Tuple4D::point(-1.0, 1.0, 0.0)),
        Tuple4D::vector(-1.0, 0.0, 0.0));
}

#[test]
fn normal_on_cylinder_caps() {
    let c = Shape::capped_cylinder(1.0, 2.0);

    assert_eq!(c.local_normal_at(&Tuple4D::point(0.0, 1.0, 0.0)),
        Tuple4D::vector(0.0, -1.0, 0.0));
    assert_eq!(c.local_normal_at(&Tuple4D::point(0.5, 1.0, 0.0)),
        Tuple4D::vector(0.0, -1.0, 0.0));
    assert_eq!(c.local_normal_at(&Tuple4D::point(0.0, 2.0, 0.0)),
        Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(c.local_normal_at(&Tuple4D::point(0.0, 2.0, 0.5)),
        Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(c.local_normal_at(&Tuple4D::point(1.0, 1.5, 0.0)),
        Tuple4D::vector(1.0, 0.0, 0.0));
}

#[test]
fn normal_on_cylinder_wall_next_to_cap() {
    let c = Shape::capped_cylinder(1.0, 2.0);

    assert_eq!(c.local_normal_at(&Tuple4D::point(1.0, 2.0 - EPSILON / 2.0, 0.0)),
        Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(c.local_normal_at(&Tuple4D::point(0.0, 1.0 + EPSILON / 2.0, -1.0)),
        Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn missing_cap_has_no_cap_normal() {
    let c = Shape::truncated_cylinder(1.0, 2.0);

    assert_eq!(c.local_normal_at(&Tuple4D::point(0.0, 1.0, 0.0)),
        Tuple4D::vector(0.0, -1.0, 0.0));
    assert_eq!(c.local_normal_at(&Tuple4D::point(0.5, 2.0, 0.0)),
        Tuple4D::vector(0.5, 0.0, 0.0));
}

#[test]
fn ray_strikes_cone() {
    let c = Shape::cone();

    let ts = c.local_intersect(&ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0)));
    assert_eq!(ts, vec![5.0, 5.0]);

    let r = Ray4D::new(
        Tuple4D::point(1.0, 1.0, -5.0),
        Tuple4D::vector(-0.5, -1.0, 1.0).normalize()
    );
    let ts = c.local_intersect(&r);
    assert_eq!(ts.len(), 2);
    assert!((ts[0] - 4.55006).abs() < 1e-4);
    assert!((ts[1] - 49.44994).abs() < 1e-4);
}

#[test]
fn ray_parallel_to_cone_half() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -1.0),
        Tuple4D::vector(0.0, 1.0, 1.0).normalize()
    );
    let ts = Shape::cone().local_intersect(&r);

    assert_eq!(ts.len(), 1);
    assert!((ts[0] - 0.35355).abs() < 1e-4);
}

#[test]
fn capped_cone_hits_caps() {
    let c = Shape::capped_cone(-0.5, 0.5);

    assert_eq!(c.local_intersect(&ray((0.0, 0.0, -5.0), (0.0, 1.0, 0.0))).len(), 0);

    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -0.25),
        Tuple4D::vector(0.0, 1.0, 1.0).normalize()
    );
    assert_eq!(c.local_intersect(&r).len(), 2);
    assert_eq!(c.local_intersect(&ray((0.0, 0.0, -0.25), (0.0, 1.0, 0.0))).len(), 4);
}

#[test]
fn normal_on_cone() {
    let c = Shape::cone();

    assert_eq!(c.local_normal_at(&Tuple4D::point(1.0, 1.0, 1.0)),
        Tuple4D::vector(1.0, -(2.0f64.sqrt()), 1.0));
    assert_eq!(c.local_normal_at(&Tuple4D::point(-1.0, -1.0, 0.0)),
        Tuple4D::vector(-1.0, 1.0, 0.0));
}
