use std::ops::{ Add, Sub, Mul };

use crate::feq;

/// An RGB color.
///
/// Components are nominally in `[0, 1]`, but intermediate shading results
/// routinely exceed that (several lights, strong highlights). Clamping only
/// happens when a color is encoded for output; see `to_rgb8`.
///
/// ```
/// # use phong_ray_tracer::color::Color;
/// let yellow = Color::rgb(1.0, 1.0, 0.0);
/// let purple = Color::rgb(1.0, 0.0, 1.0);
/// assert_eq!(yellow * purple, Color::rgb(1.0, 0.0, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Colors are compared component-wise with `feq`.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// Builds a color from the first three elements of a slice, as found in
    /// scene descriptions. Returns `None` if fewer than three are given.
    pub fn from_slice(v: &[f64]) -> Option<Color> {
        match v {
            [r, g, b, ..] => Some(Color::rgb(*r, *g, *b)),
            _ => None,
        }
    }

    pub fn black() -> Color {
        Color::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Color {
        Color::rgb(1.0, 1.0, 1.0)
    }

    /// Clamps each component into `[0, 1]`.
    pub fn clamped(&self) -> Color {
        Color {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Encodes this color as 8-bit channels, clamping first.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = self.clamped();
        let channel = |v: f64| (v * 255.0).round() as u8;

        [channel(c.r), channel(c.g), channel(c.b)]
    }
}

impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl Sub<Color> for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Self::Output {
        Color {
            r: self.r - other.r,
            g: self.g - other.g,
            b: self.b - other.b,
        }
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

/// The Hadamard (component-wise) product; how a surface color filters the
/// color of the light falling on it.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
        }
    }
}

impl std::iter::Sum for Color {
    fn sum<I: Iterator<Item = Color>>(iter: I) -> Color {
        iter.fold(Color::black(), |acc, c| acc + c)
    }
}

#[test]
fn add_and_subtract_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 + c2, Color::rgb(1.6, 0.7, 1.0));
    assert_eq!(c1 - c2, Color::rgb(0.2, 0.5, 0.5));
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);
    let c2 = Color::rgb(1.0, 0.2, 0.4);

    assert_eq!(c1 * 2.0, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(Color::rgb(1.0, 0.2, 0.4) * Color::rgb(0.9, 1.0, 0.1),
        Color::rgb(0.9, 0.2, 0.04));
    assert_eq!(c2 * Color::white(), c2);
}

#[test]
fn sum_of_colors() {
    let total: Color = vec![Color::rgb(0.1, 0.2, 0.3); 3].into_iter().sum();
    assert_eq!(total, Color::rgb(0.3, 0.6, 0.9));

    let none: Color = Vec::<Color>::new().into_iter().sum();
    assert_eq!(none, Color::black());
}

#[test]
fn encode_clamps_channels() {
    assert_eq!(Color::rgb(1.5, 0.0, -0.5).to_rgb8(), [255, 0, 0]);
    assert_eq!(Color::rgb(0.5, 1.0, 0.0).to_rgb8(), [128, 255, 0]);
}
