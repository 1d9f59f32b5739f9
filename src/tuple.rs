use std::ops::{ Add, Sub, Neg, Mul, Div };

use crate::feq;

/// A homogeneous 4D tuple.
///
/// Points carry `w == 1.0` and vectors carry `w == 0.0`. Points are moved by
/// translations while vectors are not, which falls out of the matrix product
/// with the `w` component.
///
/// Equality is approximate; see `feq`.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Tuple4D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64
}

impl PartialEq for Tuple4D {
    fn eq(&self, other: &Tuple4D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z) &&
            feq(self.w, other.w)
    }
}

impl Tuple4D {
    pub fn tuple(x: f64, y: f64, z: f64, w: f64) -> Tuple4D {
        Tuple4D { x, y, z, w }
    }

    pub fn point(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D { x, y, z, w: 1.0 }
    }

    pub fn vector(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D { x, y, z, w: 0.0 }
    }

    /// Builds a point from the first three elements of a slice.
    ///
    /// Used by scene descriptions, where coordinates arrive as JSON arrays.
    /// Returns `None` if fewer than three elements are given.
    pub fn point_from_slice(v: &[f64]) -> Option<Tuple4D> {
        match v {
            [x, y, z, ..] => Some(Tuple4D::point(*x, *y, *z)),
            _ => None,
        }
    }

    /// Builds a vector from the first three elements of a slice.
    pub fn vector_from_slice(v: &[f64]) -> Option<Tuple4D> {
        match v {
            [x, y, z, ..] => Some(Tuple4D::vector(*x, *y, *z)),
            _ => None,
        }
    }

    pub fn is_point(&self) -> bool {
        feq(self.w, 1.0)
    }

    pub fn is_vector(&self) -> bool {
        feq(self.w, 0.0)
    }

    pub fn magnitude(&self) -> f64 {
        f64::sqrt(
            self.x.powi(2)
            + self.y.powi(2)
            + self.z.powi(2)
            + self.w.powi(2)
        )
    }

    /// Scales a vector to unit length.
    ///
    /// The zero vector has no direction; normalizing it is a caller bug.
    pub fn normalize(&self) -> Tuple4D {
        let mag = self.magnitude();
        debug_assert!(mag > 0.0, "cannot normalize a zero-length tuple");

        *self / mag
    }

    pub fn dot(&self, other: &Tuple4D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
            + self.w * other.w
    }

    /// The cross product of two vectors. Always yields a vector.
    pub fn cross(&self, other: &Tuple4D) -> Tuple4D {
        debug_assert!(self.is_vector() && other.is_vector(),
            "cross product is only defined for vectors");

        Tuple4D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
            w: 0.0
        }
    }

    /// Reflects a vector across a normal.
    ///
    /// # Examples
    ///
    /// ```
    /// # use phong_ray_tracer::tuple::Tuple4D;
    /// let v = Tuple4D::vector(0.0, -1.0, 0.0);
    /// let n = Tuple4D::vector(2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0, 0.0);
    /// assert_eq!(v.reflect(&n), Tuple4D::vector(1.0, 0.0, 0.0));
    /// ```
    pub fn reflect(&self, normal: &Tuple4D) -> Tuple4D {
        *self - (*normal * 2.0 * self.dot(normal))
    }
}

/// Adds two tuples.
///
/// A point plus a vector is a point, a vector plus a vector is a vector. Two
/// points cannot be added; debug builds catch this through the `w` component.
impl Add for Tuple4D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        debug_assert!(self.w + other.w < 1.5, "cannot add two points");

        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
            w: self.w + other.w
        }
    }
}

impl Sub for Tuple4D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
            w: self.w - other.w
        }
    }
}

impl Neg for Tuple4D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w
        }
    }
}

/// Implements scalar right-multiplication for a 4D tuple.
///
/// ```
/// use phong_ray_tracer::tuple::Tuple4D;
///
/// let t = Tuple4D::tuple(1.0, 2.0, 3.0, 4.0);
/// assert_eq!(t * 5.0, Tuple4D::tuple(5.0, 10.0, 15.0, 20.0));
/// ```
impl Mul<f64> for Tuple4D {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
            w: self.w * other
        }
    }
}

/// Implements scalar left-multiplication for a 4D tuple.
impl Mul<Tuple4D> for f64 {
    type Output = Tuple4D;

    fn mul(self, other: Tuple4D) -> Tuple4D {
        other * self
    }
}

impl Div<f64> for Tuple4D {
    type Output = Self;

    fn div(self, other: f64) -> Self {
        Self {
            x: self.x / other,
            y: self.y / other,
            z: self.z / other,
            w: self.w / other
        }
    }
}

/* Tests */

#[test]
fn point_and_vector_tags() {
    let p = Tuple4D::point(4.3, -4.2, 3.1);
    let v = Tuple4D::vector(4.3, -4.2, 3.1);

    assert!(p.is_point() && !p.is_vector());
    assert!(v.is_vector() && !v.is_point());
}

#[test]
fn add_point_and_vector() {
    let a1 = Tuple4D::tuple(3.0, -2.0, 5.0, 1.0);
    let a2 = Tuple4D::tuple(-2.0, 3.0, 1.0, 0.0);

    assert_eq!(a1 + a2, Tuple4D::tuple(1.0, 1.0, 6.0, 1.0));
}

#[test]
fn sub_points() {
    let p1 = Tuple4D::point(3.0, 2.0, 1.0);
    let p2 = Tuple4D::point(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Tuple4D::vector(-2.0, -4.0, -6.0));
}

#[test]
fn sub_vector_from_point() {
    let p = Tuple4D::point(3.0, 2.0, 1.0);
    let v = Tuple4D::vector(5.0, 6.0, 7.0);

    assert_eq!(p - v, Tuple4D::point(-2.0, -4.0, -6.0));
}

#[test]
fn neg_tuple() {
    let a = Tuple4D::tuple(1.0, -2.0, 3.0, -4.0);

    assert_eq!(-a, Tuple4D::tuple(-1.0, 2.0, -3.0, 4.0));
}

#[test]
fn mul_and_div_scalar() {
    let a = Tuple4D::tuple(1.0, -2.0, 3.0, -4.0);

    assert_eq!(a * 3.5, Tuple4D::tuple(3.5, -7.0, 10.5, -14.0));
    assert_eq!(0.5 * a, Tuple4D::tuple(0.5, -1.0, 1.5, -2.0));
    assert_eq!(a / 2.0, Tuple4D::tuple(0.5, -1.0, 1.5, -2.0));
}

#[test]
fn magnitude_of_vectors() {
    assert_eq!(Tuple4D::vector(1.0, 2.0, 3.0).magnitude(), f64::sqrt(14.0));
    assert_eq!(Tuple4D::vector(-1.0, -2.0, -3.0).magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize_vectors() {
    let v = Tuple4D::vector(1.0, 2.0, 3.0);
    let e = Tuple4D::vector(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(Tuple4D::vector(4.0, 0.0, 0.0).normalize(),
        Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(v.normalize(), e);
    assert!(crate::feq(v.normalize().magnitude(), 1.0));
}

#[test]
fn dot_and_cross_vectors() {
    let a = Tuple4D::vector(1.0, 2.0, 3.0);
    let b = Tuple4D::vector(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
    assert_eq!(a.cross(&b), Tuple4D::vector(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Tuple4D::vector(1.0, -2.0, 1.0));
}

#[test]
fn reflect_approaching_at_45() {
    let v = Tuple4D::vector(1.0, -1.0, 0.0);
    let n = Tuple4D::vector(0.0, 1.0, 0.0);

    assert_eq!(v.reflect(&n), Tuple4D::vector(1.0, 1.0, 0.0));
}

#[test]
fn reflect_off_slanted_surface() {
    let v = Tuple4D::vector(0.0, -1.0, 0.0);
    let n = Tuple4D::vector(1.0, 1.0, 0.0).normalize();

    assert_eq!(v.reflect(&n), Tuple4D::vector(1.0, 0.0, 0.0));
}

#[test]
fn tuples_from_slices() {
    assert_eq!(Tuple4D::point_from_slice(&[1.0, 2.0, 3.0]),
        Some(Tuple4D::point(1.0, 2.0, 3.0)));
    assert_eq!(Tuple4D::vector_from_slice(&[0.0, 1.0, 0.0]),
        Some(Tuple4D::vector(0.0, 1.0, 0.0)));
    assert_eq!(Tuple4D::point_from_slice(&[1.0]), None);
}
