use serde::Deserialize;

use crate::feq;
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::matrix::Matrix4D;
use crate::error::{ RenderError, Result };

/// The procedural patterns a material can carry.
///
/// Each pattern alternates or blends between two colors, `a` and `b`.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Alternating stripes along X: `a` where `floor(x)` is even.
    Stripe,

    /// A linear blend from `a` at `x == 0` to `b` at `x == 1`, repeating.
    Gradient,

    /// Concentric rings around the Y axis in the XZ plane.
    Ring,

    /// A 3D checkerboard of unit cubes.
    Checker,
}

/// A surface pattern with its own transform.
///
/// Patterns are evaluated in pattern space. A world point is first brought
/// into the entity's object space, then through the inverse of the pattern
/// transform; so a pattern follows its entity around and can additionally be
/// scaled or rotated on the surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub a: Color,
    pub b: Color,

    transform: Matrix4D,
    inverse: Matrix4D,
}

impl Pattern {
    pub fn new(kind: PatternKind, a: Color, b: Color) -> Pattern {
        Pattern {
            kind, a, b,
            transform: Matrix4D::identity(),
            inverse: Matrix4D::identity(),
        }
    }

    pub fn stripe(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Stripe, a, b)
    }

    pub fn gradient(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Gradient, a, b)
    }

    pub fn ring(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Ring, a, b)
    }

    pub fn checker(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Checker, a, b)
    }

    /// Returns this pattern with a new transform. Singular transforms are
    /// rejected.
    pub fn with_transform(mut self, transform: Matrix4D) -> Result<Pattern> {
        self.inverse = transform.inverse()
            .ok_or(RenderError::SingularTransform)?;
        self.transform = transform;

        Ok(self)
    }

    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    /// The pattern color at a point given in pattern space.
    pub fn pattern_at(&self, p: Tuple4D) -> Color {
        match self.kind {
            PatternKind::Stripe => {
                if feq(p.x.floor().rem_euclid(2.0), 0.0) { self.a } else { self.b }
            },
            PatternKind::Gradient => {
                let fraction = p.x - p.x.floor();
                self.a + (self.b - self.a) * fraction
            },
            PatternKind::Ring => {
                let distance = (p.x.powi(2) + p.z.powi(2)).sqrt();
                if feq(distance.floor().rem_euclid(2.0), 0.0) { self.a } else { self.b }
            },
            PatternKind::Checker => {
                let sum = p.x.floor() + p.y.floor() + p.z.floor();
                if feq(sum.rem_euclid(2.0), 0.0) { self.a } else { self.b }
            },
        }
    }

    /// The pattern color at a point given in the owning entity's object
    /// space.
    pub fn pattern_at_object(&self, object_point: Tuple4D) -> Color {
        self.pattern_at(self.inverse * object_point)
    }
}

#[test]
fn stripe_is_constant_along_y_and_z() {
    let pattern = Pattern::stripe(Color::white(), Color::black());

    for i in 0..3 {
        let i = i as f64;
        assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, i, 0.0)),
            Color::white());
        assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, i)),
            Color::white());
    }
}

#[test]
fn stripe_alternates_along_x() {
    let pattern = Pattern::stripe(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point( 0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point( 0.9, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point( 1.0, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(-0.1, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(-1.0, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(-1.1, 0.0, 0.0)),
        Color::white());
}

#[test]
fn gradient_interpolates() {
    let pattern = Pattern::gradient(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point(0.25, 0.0, 0.0)),
        Color::rgb(0.75, 0.75, 0.75));
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.75, 0.0, 0.0)),
        Color::rgb(0.25, 0.25, 0.25));
}

#[test]
fn ring_extends_in_x_and_z() {
    let pattern = Pattern::ring(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(1.0, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 1.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.708, 0.0, 0.708)),
        Color::black());
}

#[test]
fn checker_repeats_in_each_dimension() {
    let pattern = Pattern::checker(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point(0.99, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(1.01, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 1.01, 0.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 1.01)),
        Color::black());
}

#[test]
fn pattern_transform_is_applied() {
    let pattern = Pattern::stripe(Color::white(), Color::black())
        .with_transform(Matrix4D::scaling(2.0, 2.0, 2.0))
        .unwrap();

    assert_eq!(pattern.pattern_at_object(Tuple4D::point(1.5, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at_object(Tuple4D::point(2.5, 0.0, 0.0)),
        Color::black());
}

#[test]
fn singular_pattern_transform_is_rejected() {
    let pattern = Pattern::stripe(Color::white(), Color::black())
        .with_transform(Matrix4D::scaling(0.0, 1.0, 1.0));

    assert!(matches!(pattern, Err(RenderError::SingularTransform)));
}
