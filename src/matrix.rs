use std::ops::{ Index, IndexMut, Mul };
use std::convert::From;

use crate::feq;
use crate::tuple::Tuple4D;

/// A 4x4 matrix, stored row-major.
///
/// Every transformation in the renderer is one of these: entity transforms,
/// pattern transforms and the camera's view transform. Points and vectors are
/// transformed by multiplying them on the right, so in a product such as
/// `A * B * p` the matrix `B` is applied to `p` first.
///
/// Besides the plain constructors (`translation`, `scaling`, ...) there is a
/// set of fluent builders (`translate`, `scale`, ...) which consume a matrix
/// and return a new one with the extra operation applied *after* the existing
/// ones. This reads in the order operations happen:
///
/// ```
/// # use phong_ray_tracer::tuple::Tuple4D;
/// # use phong_ray_tracer::matrix::Matrix4D;
/// let m = Matrix4D::identity()
///     .rotate_x(std::f64::consts::PI / 2.0)
///     .scale(5.0, 5.0, 5.0)
///     .translate(10.0, 5.0, 7.0);
///
/// let p = Tuple4D::point(1.0, 0.0, 1.0);
/// assert_eq!(m * p, Tuple4D::point(15.0, 0.0, 7.0));
/// ```
#[derive(Copy, Clone, Debug, PartialOrd)]
pub struct Matrix4D {
    rows: [[f64; 4]; 4],
}

/// Matrices are compared element-wise with `feq`.
impl PartialEq for Matrix4D {
    fn eq(&self, other: &Matrix4D) -> bool {
        self.rows.iter().flatten()
            .zip(other.rows.iter().flatten())
            .all(|(x, y)| feq(*x, *y))
    }
}

impl Default for Matrix4D {
    fn default() -> Matrix4D {
        Matrix4D::identity()
    }
}

/// Determinant of the 3x3 matrix left after removing `row` and `col` from a
/// 4x4 matrix.
fn minor3(m: &[[f64; 4]; 4], row: usize, col: usize) -> f64 {
    let mut sub = [[0.0; 3]; 3];
    let mut r = 0;

    for (i, source) in m.iter().enumerate() {
        if i == row {
            continue;
        }

        let mut c = 0;
        for (j, value) in source.iter().enumerate() {
            if j == col {
                continue;
            }

            sub[r][c] = *value;
            c += 1;
        }

        r += 1;
    }

    sub[0][0] * (sub[1][1] * sub[2][2] - sub[1][2] * sub[2][1])
        - sub[0][1] * (sub[1][0] * sub[2][2] - sub[1][2] * sub[2][0])
        + sub[0][2] * (sub[1][0] * sub[2][1] - sub[1][1] * sub[2][0])
}

impl Matrix4D {
    /// Creates a matrix with all elements set to `0.0`.
    pub fn zero() -> Matrix4D {
        Matrix4D { rows: [[0.0; 4]; 4] }
    }

    pub fn identity() -> Matrix4D {
        let mut m = Self::zero();
        for i in 0..4 {
            m.rows[i][i] = 1.0;
        }

        m
    }

    /// A translation by `x`, `y` and `z`. Vectors are unaffected.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut m = Self::identity();
        m[(0, 3)] = x;
        m[(1, 3)] = y;
        m[(2, 3)] = z;

        m
    }

    /// A scaling by `x`, `y` and `z` along the respective axes.
    ///
    /// A zero factor produces a singular matrix, which entities and cameras
    /// refuse to accept.
    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut m = Self::identity();
        m[(0, 0)] = x;
        m[(1, 1)] = y;
        m[(2, 2)] = z;

        m
    }

    /// A rotation of `r` radians about the X axis.
    ///
    /// ```
    /// # use phong_ray_tracer::tuple::Tuple4D;
    /// # use phong_ray_tracer::matrix::Matrix4D;
    /// let m = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
    /// assert_eq!(m * Tuple4D::point(0.0, 1.0, 0.0),
    ///     Tuple4D::point(0.0, 0.0, 1.0));
    /// ```
    pub fn rotation_x(r: f64) -> Matrix4D {
        let (sin, cos) = r.sin_cos();
        let mut m = Self::identity();
        m[(1, 1)] =  cos;
        m[(1, 2)] = -sin;
        m[(2, 1)] =  sin;
        m[(2, 2)] =  cos;

        m
    }

    /// A rotation of `r` radians about the Y axis.
    pub fn rotation_y(r: f64) -> Matrix4D {
        let (sin, cos) = r.sin_cos();
        let mut m = Self::identity();
        m[(0, 0)] =  cos;
        m[(0, 2)] =  sin;
        m[(2, 0)] = -sin;
        m[(2, 2)] =  cos;

        m
    }

    /// A rotation of `r` radians about the Z axis.
    pub fn rotation_z(r: f64) -> Matrix4D {
        let (sin, cos) = r.sin_cos();
        let mut m = Self::identity();
        m[(0, 0)] =  cos;
        m[(0, 1)] = -sin;
        m[(1, 0)] =  sin;
        m[(1, 1)] =  cos;

        m
    }

    /// A shearing transformation.
    ///
    /// Each parameter moves one component in proportion to another; `xy`
    /// moves `x` in proportion to `y`, `zx` moves `z` in proportion to `x`,
    /// and so on.
    ///
    /// ```
    /// # use phong_ray_tracer::tuple::Tuple4D;
    /// # use phong_ray_tracer::matrix::Matrix4D;
    /// let m = Matrix4D::shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    /// assert_eq!(m * Tuple4D::point(2.0, 3.0, 4.0),
    ///     Tuple4D::point(5.0, 3.0, 4.0));
    /// ```
    pub fn shearing(xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64)
        -> Matrix4D {
        let mut m = Self::identity();
        m[(0, 1)] = xy;
        m[(0, 2)] = xz;
        m[(1, 0)] = yx;
        m[(1, 2)] = yz;
        m[(2, 0)] = zx;
        m[(2, 1)] = zy;

        m
    }

    /// Generates a view transformation.
    ///
    /// The eye sits at `from` and looks toward `to`, with `up` roughly
    /// indicating which way is up. The result moves the *world* so that the
    /// eye ends up at the origin looking down negative Z.
    pub fn view_transform(from: Tuple4D, to: Tuple4D, up: Tuple4D) -> Matrix4D {
        let forward = (to - from).normalize();
        let left = forward.cross(&up.normalize());
        let true_up = left.cross(&forward);

        let orientation: Matrix4D = [
             left.x,     left.y,     left.z,    0.0,
             true_up.x,  true_up.y,  true_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
             0.0,        0.0,        0.0,       1.0,
        ].into();

        orientation * Matrix4D::translation(-from.x, -from.y, -from.z)
    }

    /// Applies a translation after this transform.
    pub fn translate(self, x: f64, y: f64, z: f64) -> Matrix4D {
        Matrix4D::translation(x, y, z) * self
    }

    /// Applies a scaling after this transform.
    pub fn scale(self, x: f64, y: f64, z: f64) -> Matrix4D {
        Matrix4D::scaling(x, y, z) * self
    }

    /// Applies a rotation about X after this transform.
    pub fn rotate_x(self, r: f64) -> Matrix4D {
        Matrix4D::rotation_x(r) * self
    }

    /// Applies a rotation about Y after this transform.
    pub fn rotate_y(self, r: f64) -> Matrix4D {
        Matrix4D::rotation_y(r) * self
    }

    /// Applies a rotation about Z after this transform.
    pub fn rotate_z(self, r: f64) -> Matrix4D {
        Matrix4D::rotation_z(r) * self
    }

    /// Applies a shear after this transform.
    pub fn shear(self, xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64)
        -> Matrix4D {
        Matrix4D::shearing(xy, xz, yx, yz, zx, zy) * self
    }

    /// Returns the transpose of this matrix.
    pub fn transposition(&self) -> Matrix4D {
        let mut t = Self::zero();
        for r in 0..4 {
            for c in 0..4 {
                t.rows[c][r] = self.rows[r][c];
            }
        }

        t
    }

    /// The cofactor at `row` and `col`: the signed minor.
    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let minor = minor3(&self.rows, row, col);
        if (row + col) % 2 == 0 { minor } else { -minor }
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        (0..4).map(|c| self.rows[0][c] * self.cofactor(0, c)).sum()
    }

    /// Whether this matrix can be inverted (and so used as a transform).
    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() > f64::EPSILON
    }

    /// Calculates the inverse of this matrix through its adjugate.
    ///
    /// Returns `None` for singular matrices. Nothing in the renderer
    /// substitutes a fallback; callers turn `None` into an error.
    pub fn inverse(&self) -> Option<Matrix4D> {
        if !self.is_invertible() {
            return None;
        }

        let det = self.determinant();
        let mut inv = Self::zero();
        for r in 0..4 {
            for c in 0..4 {
                // Transposed on write: the adjugate is the cofactor transpose.
                inv.rows[c][r] = self.cofactor(r, c) / det;
            }
        }

        Some(inv)
    }
}

impl From<[f64; 16]> for Matrix4D {
    fn from(data: [f64; 16]) -> Matrix4D {
        let mut m = Matrix4D::zero();
        for (i, value) in data.iter().enumerate() {
            m.rows[i / 4][i % 4] = *value;
        }

        m
    }
}

impl Index<(usize, usize)> for Matrix4D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.rows[index.0][index.1]
    }
}

impl IndexMut<(usize, usize)> for Matrix4D {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.rows[index.0][index.1]
    }
}

/// Matrix product. Not commutative.
impl Mul<Matrix4D> for Matrix4D {
    type Output = Matrix4D;

    fn mul(self, other: Matrix4D) -> Matrix4D {
        let mut res = Matrix4D::zero();

        for r in 0..4 {
            for c in 0..4 {
                res.rows[r][c] = (0..4)
                    .map(|k| self.rows[r][k] * other.rows[k][c])
                    .sum();
            }
        }

        res
    }
}

/// Transforms a tuple, treated as a column vector.
impl Mul<Tuple4D> for Matrix4D {
    type Output = Tuple4D;

    fn mul(self, t: Tuple4D) -> Tuple4D {
        let row = |r: usize| {
            self.rows[r][0] * t.x
                + self.rows[r][1] * t.y
                + self.rows[r][2] * t.z
                + self.rows[r][3] * t.w
        };

        Tuple4D { x: row(0), y: row(1), z: row(2), w: row(3) }
    }
}

#[test]
fn identity_is_neutral() {
    let i = Matrix4D::identity();
    let a: Matrix4D = [ 0.0, 1.0,  2.0,  4.0,
                        1.0, 2.0,  4.0,  8.0,
                        2.0, 4.0,  8.0, 16.0,
                        4.0, 8.0, 16.0, 32.0, ].into();

    assert_eq!(i * a, a);
    assert_eq!(a * i, a);
    assert_eq!(i * Tuple4D::tuple(1.0, 2.0, 3.0, 4.0),
        Tuple4D::tuple(1.0, 2.0, 3.0, 4.0));
}

#[test]
fn multiply_matrices() {
    let a: Matrix4D = [ 1.0, 2.0, 3.0, 4.0,
                        5.0, 6.0, 7.0, 8.0,
                        9.0, 8.0, 7.0, 6.0,
                        5.0, 4.0, 3.0, 2.0, ].into();

    let b: Matrix4D = [ -2.0, 1.0, 2.0,  3.0,
                         3.0, 2.0, 1.0, -1.0,
                         4.0, 3.0, 6.0,  5.0,
                         1.0, 2.0, 7.0,  8.0, ].into();

    let c: Matrix4D = [ 20.0, 22.0,  50.0,  48.0,
                        44.0, 54.0, 114.0, 108.0,
                        40.0, 58.0, 110.0, 102.0,
                        16.0, 26.0,  46.0,  42.0, ].into();

    assert_eq!(a * b, c);
}

#[test]
fn transpose() {
     let a: Matrix4D = [ 0.0, 9.0, 3.0, 0.0,
                         9.0, 8.0, 0.0, 8.0,
                         1.0, 8.0, 5.0, 3.0,
                         0.0, 0.0, 5.0, 8.0, ].into();

     let t: Matrix4D = [ 0.0, 9.0, 1.0, 0.0,
                         9.0, 8.0, 8.0, 0.0,
                         3.0, 0.0, 5.0, 5.0,
                         0.0, 8.0, 3.0, 8.0, ].into();

     assert_eq!(t, a.transposition());
     assert_eq!(t.transposition(), a);
     assert_eq!(Matrix4D::identity().transposition(), Matrix4D::identity());
}

#[test]
fn cofactors_and_determinant() {
     let a: Matrix4D = [ -2.0, -8.0,  3.0,  5.0,
                         -3.0,  1.0,  7.0,  3.0,
                          1.0,  2.0, -9.0,  6.0,
                         -6.0,  7.0,  7.0, -9.0, ].into();

     assert_eq!(a.cofactor(0, 0), 690.0);
     assert_eq!(a.cofactor(0, 1), 447.0);
     assert_eq!(a.cofactor(0, 2), 210.0);
     assert_eq!(a.cofactor(0, 3), 51.0);
     assert_eq!(a.determinant(), -4071.0);
}

#[test]
fn singular_matrix_has_no_inverse() {
     let a: Matrix4D = [ -4.0,  2.0, -2.0, -3.0,
                          9.0,  6.0,  2.0,  6.0,
                          0.0, -5.0,  1.0, -5.0,
                          0.0,  0.0,  0.0,  0.0, ].into();

     assert!(!a.is_invertible());
     assert!(a.inverse().is_none());
     assert!(Matrix4D::scaling(1.0, 0.0, 1.0).inverse().is_none());
}

#[test]
fn inverse_values() {
     let a: Matrix4D = [  8.0, -5.0,  9.0,  2.0,
                          7.0,  5.0,  6.0,  1.0,
                         -6.0,  0.0,  9.0,  6.0,
                         -3.0,  0.0, -9.0, -4.0, ].into();

     let i: Matrix4D = [ -0.15385, -0.15385, -0.28205, -0.53846,
                         -0.07692,  0.12308,  0.02564,  0.03077,
                          0.35897,  0.35897,  0.43590,  0.92308,
                         -0.69231, -0.69231, -0.76923, -1.92308, ].into();

     assert_eq!(a.inverse().unwrap(), i);
}

#[test]
fn product_times_inverse_recovers_matrix() {
     let a: Matrix4D = [  3.0, -9.0,  7.0,  3.0,
                          3.0,  8.0,  2.0, -9.0,
                         -4.0,  4.0,  4.0,  1.0,
                         -6.0,  5.0, -1.0,  1.0, ].into();

     let b: Matrix4D = [ 8.0,  2.0, 2.0, 2.0,
                         3.0, -1.0, 7.0, 0.0,
                         7.0,  0.0, 5.0, 4.0,
                         6.0, -2.0, 0.0, 5.0  ].into();

     let c = a * b;

     assert_eq!(a, c * b.inverse().unwrap());
}

#[test]
fn inverse_round_trips_tuples() {
    let m = Matrix4D::identity()
        .scale(2.0, 0.5, 3.0)
        .shear(0.3, 0.0, 0.1, 0.0, 0.0, 0.7)
        .rotate_y(1.1)
        .rotate_z(-0.4)
        .translate(4.0, -2.0, 9.0);
    let inv = m.inverse().unwrap();

    let samples = [
        Tuple4D::point(1.0, 2.0, 3.0),
        Tuple4D::point(-7.5, 0.0, 12.25),
        Tuple4D::vector(0.0, 1.0, -1.0),
        Tuple4D::vector(3.0, -4.0, 5.0),
    ];

    for t in samples.iter() {
        assert_eq!(inv * (m * *t), *t);
        assert_eq!(m * (inv * *t), *t);
    }

    assert_eq!(inv * m, Matrix4D::identity());
}

#[test]
fn translation_moves_points_not_vectors() {
    let transform = Matrix4D::translation(5.0, -3.0, 2.0);
    let inverse = transform.inverse().unwrap();
    let point = Tuple4D::point(-3.0, 4.0, 5.0);
    let vector = Tuple4D::vector(-3.0, 4.0, 5.0);

    assert_eq!(transform * point, Tuple4D::point(2.0, 1.0, 7.0));
    assert_eq!(inverse * point, Tuple4D::point(-8.0, 7.0, 3.0));
    assert_eq!(transform * vector, vector);
}

#[test]
fn scaling_and_its_inverse() {
    let transform = Matrix4D::scaling(2.0, 3.0, 4.0);
    let vector = Tuple4D::vector(-4.0, 6.0, 8.0);

    assert_eq!(transform * vector, Tuple4D::vector(-8.0, 18.0, 32.0));
    assert_eq!(transform.inverse().unwrap() * vector,
        Tuple4D::vector(-2.0, 2.0, 2.0));
    assert_eq!(Matrix4D::scaling(-1.0, 1.0, 1.0) * Tuple4D::point(2.0, 3.0, 4.0),
        Tuple4D::point(-2.0, 3.0, 4.0));
}

#[test]
fn rotations() {
    use std::f64::consts::PI;
    let h = 2.0f64.sqrt() / 2.0;

    assert_eq!(Matrix4D::rotation_x(PI / 4.0) * Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(0.0, h, h));
    assert_eq!(Matrix4D::rotation_y(PI / 4.0) * Tuple4D::point(0.0, 0.0, 1.0),
        Tuple4D::point(h, 0.0, h));
    assert_eq!(Matrix4D::rotation_y(PI / 2.0) * Tuple4D::point(0.0, 0.0, 1.0),
        Tuple4D::point(1.0, 0.0, 0.0));
    assert_eq!(Matrix4D::rotation_z(PI / 4.0) * Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(-h, h, 0.0));
    assert_eq!(Matrix4D::rotation_z(PI / 2.0) * Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(-1.0, 0.0, 0.0));
}

#[test]
fn shearing_each_pair() {
    let p = Tuple4D::point(2.0, 3.0, 4.0);

    assert_eq!(Matrix4D::shearing(0.0, 1.0, 0.0, 0.0, 0.0, 0.0) * p,
        Tuple4D::point(6.0, 3.0, 4.0));
    assert_eq!(Matrix4D::shearing(0.0, 0.0, 1.0, 0.0, 0.0, 0.0) * p,
        Tuple4D::point(2.0, 5.0, 4.0));
    assert_eq!(Matrix4D::shearing(0.0, 0.0, 0.0, 1.0, 0.0, 0.0) * p,
        Tuple4D::point(2.0, 7.0, 4.0));
    assert_eq!(Matrix4D::shearing(0.0, 0.0, 0.0, 0.0, 1.0, 0.0) * p,
        Tuple4D::point(2.0, 3.0, 6.0));
    assert_eq!(Matrix4D::shearing(0.0, 0.0, 0.0, 0.0, 0.0, 1.0) * p,
        Tuple4D::point(2.0, 3.0, 7.0));
}

#[test]
fn chained_transforms_apply_right_to_left() {
    let a = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
    let b = Matrix4D::scaling(5.0, 5.0, 5.0);
    let c = Matrix4D::translation(10.0, 5.0, 7.0);
    let p = Tuple4D::point(1.0, 0.0, 1.0);

    assert_eq!(c * b * a * p, Tuple4D::point(15.0, 0.0, 7.0));
    assert_eq!(c * b * a,
        Matrix4D::identity().rotate_x(std::f64::consts::PI / 2.0)
            .scale(5.0, 5.0, 5.0)
            .translate(10.0, 5.0, 7.0));
}

#[test]
fn default_view_is_identity() {
    let from = Tuple4D::point(0.0, 0.0, 0.0);
    let to = Tuple4D::point(0.0, 0.0, -1.0);
    let up = Tuple4D::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix4D::identity(), Matrix4D::view_transform(from, to, up));
}

#[test]
fn view_looking_toward_positive_z() {
    let from = Tuple4D::point(0.0, 0.0, 0.0);
    let to = Tuple4D::point(0.0, 0.0, 1.0);
    let up = Tuple4D::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix4D::view_transform(from, to, up),
        Matrix4D::scaling(-1.0, 1.0, -1.0));
}

#[test]
fn view_moves_world() {
    let from = Tuple4D::point(0.0, 0.0, 8.0);
    let to = Tuple4D::point(0.0, 0.0, 0.0);
    let up = Tuple4D::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix4D::view_transform(from, to, up),
        Matrix4D::translation(0.0, 0.0, -8.0));
}

#[test]
fn arbitrary_view() {
    let from = Tuple4D::point(1.0, 3.0, 2.0);
    let to = Tuple4D::point(4.0, -2.0, 8.0);
    let up = Tuple4D::vector(1.0, 1.0, 0.0);

    let a: Matrix4D = [  -0.50709, 0.50709,  0.67612, -2.36643,
                          0.76772, 0.60609,  0.12122, -2.82843,
                         -0.35857, 0.59761, -0.71714,  0.00000,
                          0.00000, 0.00000,  0.00000,  1.00000, ].into();

    assert_eq!(Matrix4D::view_transform(from, to, up), a);
}
