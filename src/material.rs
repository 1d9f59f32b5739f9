use crate::color::Color;
use crate::pattern::Pattern;
use crate::consts::GLASS_RI;

/// A material record.
///
/// Materials use attributes from the Phong reflection model (ambient,
/// diffuse, specular and shininess), plus how much light the surface
/// reflects, how much it lets through, and how strongly it bends light that
/// passes through it.
///
/// The preset constructors (`glass`, `red`, ...) are plain factories; every
/// call returns a fresh value which can be tweaked freely:
///
/// ```
/// # use phong_ray_tracer::material::Material;
/// let mut frosted = Material::glass();
/// frosted.reflective = 0.2;
/// assert_eq!(Material::glass().reflective, 0.9);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub pattern: Option<Pattern>,

    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,

    pub reflective: f64,
    pub transparency: f64,
    pub refractive_index: f64,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            color: Color::white(),
            pattern: None,

            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,

            reflective: 0.0,
            transparency: 0.0,
            refractive_index: 1.0,
        }
    }
}

impl Material {
    /// A dark, highly reflective and transparent glass.
    pub fn glass() -> Material {
        Material {
            color: Color::rgb(0.1, 0.1, 0.1),
            diffuse: 0.0,
            specular: 1.0,
            shininess: 300.0,
            transparency: 0.9,
            reflective: 0.9,
            refractive_index: GLASS_RI,
            ..Default::default()
        }
    }

    /// A brightly lit, non-shiny surface of the given color.
    pub fn matte(color: Color) -> Material {
        Material {
            color,
            specular: 0.0,
            ambient: 0.7,
            ..Default::default()
        }
    }

    pub fn red() -> Material {
        Material::matte(Color::rgb(1.0, 0.2, 0.2))
    }

    pub fn green() -> Material {
        Material::matte(Color::rgb(0.2, 1.0, 0.2))
    }

    pub fn blue() -> Material {
        Material::matte(Color::rgb(0.2, 0.2, 1.0))
    }

    /// Looks up a preset by name, as used in scene descriptions.
    pub fn preset(name: &str) -> Option<Material> {
        match name {
            "default" => Some(Material::default()),
            "glass" => Some(Material::glass()),
            "matte" => Some(Material::matte(Color::rgb(1.0, 0.9, 0.9))),
            "red" => Some(Material::red()),
            "green" => Some(Material::green()),
            "blue" => Some(Material::blue()),
            _ => None,
        }
    }
}

#[test]
fn default_material() {
    let m = Material::default();

    assert_eq!(m.color, Color::white());
    assert_eq!(m.ambient, 0.1);
    assert_eq!(m.diffuse, 0.9);
    assert_eq!(m.specular, 0.9);
    assert_eq!(m.shininess, 200.0);
    assert_eq!(m.reflective, 0.0);
    assert_eq!(m.transparency, 0.0);
    assert_eq!(m.refractive_index, 1.0);
    assert!(m.pattern.is_none());
}

#[test]
fn presets_are_independent_values() {
    let mut red = Material::red();
    red.ambient = 0.2;

    assert_eq!(Material::red().ambient, 0.7);
    assert_eq!(Material::preset("red"), Some(Material::red()));
    assert_eq!(Material::preset("glass").unwrap().refractive_index, 1.5);
    assert!(Material::preset("chrome").is_none());
}
