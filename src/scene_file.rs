use std::fs;
use std::convert::TryFrom;
use std::path::Path;

use log::{ debug, info, trace };
use serde::Deserialize;

use crate::tuple::Tuple4D;
use crate::matrix::Matrix4D;
use crate::color::Color;
use crate::shape::{ Shape, Caps };
use crate::pattern::{ Pattern, PatternKind };
use crate::material::Material;
use crate::entity::Entity;
use crate::light::PointLight;
use crate::scene::Scene;
use crate::camera::Camera;
use crate::shading::RenderOptions;
use crate::error::{ RenderError, Result };
use crate::consts::EPSILON;

/// Everything a scene description file produces.
#[derive(Clone, Debug)]
pub struct SceneFile {
    pub scene: Scene,
    pub camera: Camera,
    pub options: RenderOptions,
}

/// Reads and parses a JSON scene description.
pub fn load_scene(path: &Path) -> Result<SceneFile> {
    info!("Loading scene from {}", path.display());
    let json = fs::read_to_string(path)?;

    parse_scene(&json)
}

/// Parses a JSON scene description.
///
/// ```
/// # use phong_ray_tracer::scene_file::parse_scene;
/// let file = parse_scene(r#"{
///     "camera": { "width": 8, "height": 4, "field_of_view": 1.0,
///                 "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0] },
///     "lights": [ { "position": [-10, 10, -10], "intensity": [1, 1, 1] } ],
///     "entities": [ { "shape": { "type": "sphere" }, "material": "glass" } ]
/// }"#).unwrap();
///
/// assert_eq!(file.camera.hsize(), 8);
/// assert_eq!(file.scene.entities.len(), 1);
/// ```
pub fn parse_scene(json: &str) -> Result<SceneFile> {
    let scene_json: SceneJson = serde_json::from_str(json)?;
    let file = SceneFile::try_from(scene_json)?;

    debug!("Parsed scene: {} entities, {} lights, {}x{} camera",
        file.scene.entities.len(), file.scene.lights.len(),
        file.camera.hsize(), file.camera.vsize());
    Ok(file)
}

#[derive(Deserialize)]
struct SceneJson {
    camera: CameraJson,
    #[serde(default)]
    options: RenderOptions,
    #[serde(default)]
    lights: Vec<LightJson>,
    #[serde(default)]
    entities: Vec<EntityJson>,
}

#[derive(Deserialize)]
struct CameraJson {
    width: usize,
    height: usize,
    field_of_view: f64,

    from: Vec<f64>,
    to: Vec<f64>,
    up: Vec<f64>,
}

#[derive(Deserialize)]
struct LightJson {
    position: Vec<f64>,
    intensity: Vec<f64>,
}

#[derive(Deserialize)]
struct EntityJson {
    shape: ShapeJson,
    #[serde(default)]
    transform: Vec<TransformJson>,
    material: Option<MaterialJson>,
    #[serde(default = "casts_shadow_default")]
    casts_shadow: bool,
}

fn casts_shadow_default() -> bool {
    true
}

fn neg_infinity() -> f64 {
    f64::NEG_INFINITY
}

fn infinity() -> f64 {
    f64::INFINITY
}

fn no_caps() -> Caps {
    Caps::None
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ShapeJson {
    Sphere,
    Plane,
    Cube,
    Cylinder {
        #[serde(default = "neg_infinity")]
        minimum: f64,
        #[serde(default = "infinity")]
        maximum: f64,
        #[serde(default = "no_caps")]
        caps: Caps,
    },
    Cone {
        #[serde(default = "neg_infinity")]
        minimum: f64,
        #[serde(default = "infinity")]
        maximum: f64,
        #[serde(default = "no_caps")]
        caps: Caps,
    },
}

/// One step of a transform, e.g. `{"translate": [1, 0, 0]}`.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum TransformJson {
    Translate([f64; 3]),
    Scale([f64; 3]),
    RotateX(f64),
    RotateY(f64),
    RotateZ(f64),
    Shear([f64; 6]),
}

/// Either the name of a preset, or a preset (or the default material) with
/// individual fields overridden.
#[derive(Deserialize)]
#[serde(untagged)]
enum MaterialJson {
    Preset(String),
    Custom(CustomMaterialJson),
}

#[derive(Deserialize)]
struct CustomMaterialJson {
    preset: Option<String>,
    color: Option<Vec<f64>>,
    pattern: Option<PatternJson>,

    ambient: Option<f64>,
    diffuse: Option<f64>,
    specular: Option<f64>,
    shininess: Option<f64>,

    reflective: Option<f64>,
    transparency: Option<f64>,
    refractive_index: Option<f64>,
}

#[derive(Deserialize)]
struct PatternJson {
    #[serde(rename = "type")]
    kind: PatternKind,
    a: Vec<f64>,
    b: Vec<f64>,
    #[serde(default)]
    transform: Vec<TransformJson>,
}

fn point(v: &[f64], what: &str) -> Result<Tuple4D> {
    Tuple4D::point_from_slice(v).ok_or_else(|| RenderError::InvalidScene(
        format!("{} needs three coordinates, got {}", what, v.len())
    ))
}

fn vector(v: &[f64], what: &str) -> Result<Tuple4D> {
    Tuple4D::vector_from_slice(v).ok_or_else(|| RenderError::InvalidScene(
        format!("{} needs three components, got {}", what, v.len())
    ))
}

fn color(v: &[f64], what: &str) -> Result<Color> {
    Color::from_slice(v).ok_or_else(|| RenderError::InvalidScene(
        format!("{} needs three components, got {}", what, v.len())
    ))
}

/// Builds the camera's view transform, rejecting degenerate orientations.
fn view(cam: &CameraJson) -> Result<Matrix4D> {
    let from = point(&cam.from, "camera.from")?;
    let to = point(&cam.to, "camera.to")?;
    let up = vector(&cam.up, "camera.up")?;

    let forward = to - from;
    if forward.magnitude() < EPSILON {
        return Err(RenderError::InvalidScene(
            "camera.from and camera.to are the same point".to_string()));
    }
    if up.magnitude() < EPSILON {
        return Err(RenderError::InvalidScene(
            "camera.up is a zero vector".to_string()));
    }
    if forward.normalize().cross(&up.normalize()).magnitude() < EPSILON {
        return Err(RenderError::InvalidScene(
            "camera.up is parallel to the view direction".to_string()));
    }

    Ok(Matrix4D::view_transform(from, to, up))
}

/// Checks that material parameters are in range after overrides are merged.
fn check_material(m: &Material) -> Result<()> {
    let unit = [
        ("ambient", m.ambient),
        ("diffuse", m.diffuse),
        ("specular", m.specular),
        ("reflective", m.reflective),
        ("transparency", m.transparency),
    ];
    for &(name, value) in unit.iter() {
        if !(0.0..=1.0).contains(&value) {
            return Err(RenderError::InvalidScene(
                format!("material.{} must be within [0, 1], got {}", name, value)));
        }
    }

    let positive = [
        ("shininess", m.shininess),
        ("refractive_index", m.refractive_index),
    ];
    for &(name, value) in positive.iter() {
        if !(value > 0.0 && value.is_finite()) {
            return Err(RenderError::InvalidScene(
                format!("material.{} must be positive, got {}", name, value)));
        }
    }

    Ok(())
}

/// Folds transform steps into one matrix, applying them in listed order.
fn transform(steps: &[TransformJson]) -> Matrix4D {
    steps.iter().fold(Matrix4D::identity(), |m, step| match *step {
        TransformJson::Translate([x, y, z]) => m.translate(x, y, z),
        TransformJson::Scale([x, y, z]) => m.scale(x, y, z),
        TransformJson::RotateX(r) => m.rotate_x(r),
        TransformJson::RotateY(r) => m.rotate_y(r),
        TransformJson::RotateZ(r) => m.rotate_z(r),
        TransformJson::Shear([xy, xz, yx, yz, zx, zy])
            => m.shear(xy, xz, yx, yz, zx, zy),
    })
}

fn preset(name: &str) -> Result<Material> {
    Material::preset(name).ok_or_else(|| RenderError::InvalidScene(
        format!("unknown material preset \"{}\"", name)
    ))
}

impl From<ShapeJson> for Shape {
    fn from(shape_json: ShapeJson) -> Shape {
        match shape_json {
            ShapeJson::Sphere => Shape::sphere(),
            ShapeJson::Plane => Shape::plane(),
            ShapeJson::Cube => Shape::cube(),
            ShapeJson::Cylinder { minimum, maximum, caps }
                => Shape::Cylinder { minimum, maximum, caps },
            ShapeJson::Cone { minimum, maximum, caps }
                => Shape::Cone { minimum, maximum, caps },
        }
    }
}

impl TryFrom<PatternJson> for Pattern {
    type Error = RenderError;

    fn try_from(pattern_json: PatternJson) -> Result<Pattern> {
        Pattern::new(
            pattern_json.kind,
            color(&pattern_json.a, "pattern.a")?,
            color(&pattern_json.b, "pattern.b")?
        ).with_transform(transform(&pattern_json.transform))
    }
}

impl TryFrom<MaterialJson> for Material {
    type Error = RenderError;

    fn try_from(material_json: MaterialJson) -> Result<Material> {
        let custom = match material_json {
            MaterialJson::Preset(name) => return preset(&name),
            MaterialJson::Custom(custom) => custom,
        };

        let mut m = match custom.preset {
            Some(ref name) => preset(name)?,
            None => Material::default(),
        };

        if let Some(c) = custom.color {
            m.color = color(&c, "material.color")?;
        }
        if let Some(pattern) = custom.pattern {
            m.pattern = Some(Pattern::try_from(pattern)?);
        }

        m.ambient = custom.ambient.unwrap_or(m.ambient);
        m.diffuse = custom.diffuse.unwrap_or(m.diffuse);
        m.specular = custom.specular.unwrap_or(m.specular);
        m.shininess = custom.shininess.unwrap_or(m.shininess);
        m.reflective = custom.reflective.unwrap_or(m.reflective);
        m.transparency = custom.transparency.unwrap_or(m.transparency);
        m.refractive_index = custom.refractive_index.unwrap_or(m.refractive_index);

        check_material(&m)?;
        Ok(m)
    }
}

impl TryFrom<EntityJson> for Entity {
    type Error = RenderError;

    fn try_from(entity_json: EntityJson) -> Result<Entity> {
        let material = match entity_json.material {
            Some(m) => Material::try_from(m)?,
            None => Material::default(),
        };

        Ok(Entity::new(entity_json.shape.into())
            .with_material(material)
            .with_shadow(entity_json.casts_shadow)
            .with_transform(transform(&entity_json.transform))?)
    }
}

impl TryFrom<SceneJson> for SceneFile {
    type Error = RenderError;

    fn try_from(scene_json: SceneJson) -> Result<SceneFile> {
        let cam = scene_json.camera;
        let camera = Camera::new(
            cam.width,
            cam.height,
            cam.field_of_view,
            view(&cam)?
        )?;

        let mut scene = Scene::empty();
        for light in scene_json.lights {
            scene.add_light(PointLight::new(
                color(&light.intensity, "light intensity")?,
                point(&light.position, "light position")?
            ));
        }

        for (i, entity_json) in scene_json.entities.into_iter().enumerate() {
            let entity = Entity::try_from(entity_json)?;
            trace!("Entity {}: {:?}", i, entity.shape);
            scene.add_entity(entity);
        }

        Ok(SceneFile { scene, camera, options: scene_json.options })
    }
}

#[cfg(test)]
const CAMERA: &str = r#""camera": { "width": 20, "height": 10,
    "field_of_view": 1.0471975511965976,
    "from": [0, 1.5, -5], "to": [0, 1, 0], "up": [0, 1, 0] }"#;

#[test]
fn parse_full_scene() {
    let json = format!(r#"{{ {},
        "options": {{ "max_depth": 3 }},
        "lights": [ {{ "position": [-10, 10, -10], "intensity": [1, 1, 1] }} ],
        "entities": [
            {{ "shape": {{ "type": "plane" }},
               "material": {{ "pattern": {{ "type": "checker",
                   "a": [1, 1, 1], "b": [0, 0, 0],
                   "transform": [ {{ "scale": [0.5, 0.5, 0.5] }} ] }},
                   "reflective": 0.3 }} }},
            {{ "shape": {{ "type": "cylinder", "minimum": 0, "maximum": 1,
                          "caps": "both" }},
               "transform": [ {{ "scale": [0.5, 0.5, 0.5] }},
                              {{ "translate": [1, 0, 0] }} ],
               "material": "green",
               "casts_shadow": false }},
            {{ "shape": {{ "type": "sphere" }},
               "material": {{ "preset": "glass", "reflective": 0.1 }} }}
        ] }}"#, CAMERA);

    let file = parse_scene(&json).unwrap();

    assert_eq!(file.options.max_depth, 3);
    assert_eq!(file.scene.lights.len(), 1);
    assert_eq!(file.scene.entities.len(), 3);

    let floor = &file.scene.entities[0];
    assert_eq!(floor.shape, Shape::plane());
    assert_eq!(floor.material.reflective, 0.3);
    assert_eq!(floor.material.pattern.map(|p| p.kind), Some(PatternKind::Checker));

    let cylinder = &file.scene.entities[1];
    assert_eq!(cylinder.shape, Shape::capped_cylinder(0.0, 1.0));
    assert_eq!(cylinder.material, Material::green());
    assert!(!cylinder.casts_shadow);
    assert_eq!(*cylinder.transform(),
        Matrix4D::translation(1.0, 0.0, 0.0) * Matrix4D::scaling(0.5, 0.5, 0.5));

    let ball = &file.scene.entities[2];
    assert_eq!(ball.material.refractive_index, 1.5);
    assert_eq!(ball.material.reflective, 0.1);
}

#[test]
fn missing_sections_use_defaults() {
    let file = parse_scene(&format!("{{ {} }}", CAMERA)).unwrap();

    assert!(file.scene.entities.is_empty());
    assert!(file.scene.lights.is_empty());
    assert_eq!(file.options, RenderOptions::default());
}

#[test]
fn unbounded_cylinder_by_default() {
    let json = format!(r#"{{ {},
        "entities": [ {{ "shape": {{ "type": "cylinder" }} }} ] }}"#, CAMERA);
    let file = parse_scene(&json).unwrap();

    assert_eq!(file.scene.entities[0].shape, Shape::cylinder());
}

#[test]
fn singular_entity_transform_is_an_error() {
    let json = format!(r#"{{ {},
        "entities": [ {{ "shape": {{ "type": "cube" }},
                         "transform": [ {{ "scale": [1, 0, 1] }} ] }} ] }}"#, CAMERA);

    assert!(matches!(parse_scene(&json), Err(RenderError::SingularTransform)));
}

#[test]
fn unknown_preset_is_an_error() {
    let json = format!(r#"{{ {},
        "entities": [ {{ "shape": {{ "type": "cube" }}, "material": "chrome" }} ] }}"#,
        CAMERA);

    assert!(matches!(parse_scene(&json), Err(RenderError::InvalidScene(_))));
}

#[test]
fn short_coordinates_are_an_error() {
    let json = r#"{ "camera": { "width": 20, "height": 10, "field_of_view": 1.0,
        "from": [0, 1.5], "to": [0, 1, 0], "up": [0, 1, 0] } }"#;

    assert!(matches!(parse_scene(json), Err(RenderError::InvalidScene(_))));
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(parse_scene("{ \"camera\": "), Err(RenderError::Json(_))));
    assert!(matches!(parse_scene(&format!(r#"{{ {},
        "entities": [ {{ "shape": {{ "type": "torus" }} }} ] }}"#, CAMERA)),
        Err(RenderError::Json(_))));
}

#[test]
fn empty_camera_is_an_error() {
    let json = r#"{ "camera": { "width": 0, "height": 10, "field_of_view": 1.0,
        "from": [0, 1.5, -5], "to": [0, 1, 0], "up": [0, 1, 0] } }"#;

    assert!(matches!(parse_scene(json), Err(RenderError::EmptyCanvas(0, 10))));
}

#[test]
fn degenerate_camera_orientation_is_an_error() {
    let camera = |from: &str, to: &str, up: &str| format!(r#"{{ "camera": {{
        "width": 20, "height": 10, "field_of_view": 1.0,
        "from": {}, "to": {}, "up": {} }} }}"#, from, to, up);

    for json in [
        camera("[0, 0, 0]", "[0, 0, 0]", "[0, 1, 0]"),
        camera("[0, 0, -5]", "[0, 0, 0]", "[0, 0, 0]"),
        camera("[0, 5, 0]", "[0, 0, 0]", "[0, 1, 0]"),
    ].iter() {
        assert!(matches!(parse_scene(json), Err(RenderError::InvalidScene(_))));
    }
}

#[test]
fn out_of_range_material_is_an_error() {
    let entity = |material: &str| format!(r#"{{ {},
        "entities": [ {{ "shape": {{ "type": "sphere" }},
                         "material": {} }} ] }}"#, CAMERA, material);

    for material in [
        r#"{ "ambient": 7.0 }"#,
        r#"{ "shininess": -3.0 }"#,
        r#"{ "refractive_index": 0.0 }"#,
        r#"{ "preset": "glass", "transparency": 1.5 }"#,
    ].iter() {
        let err = parse_scene(&entity(material)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidScene(ref msg)
            if msg.starts_with("material.")), "{}", material);
    }

    assert!(parse_scene(&entity(r#"{ "ambient": 1.0, "shininess": 10 }"#)).is_ok());
}

#[test]
fn short_colors_are_an_error() {
    let json = format!(r#"{{ {},
        "lights": [ {{ "position": [-10, 10, -10], "intensity": [1] }} ] }}"#,
        CAMERA);
    assert!(matches!(parse_scene(&json), Err(RenderError::InvalidScene(_))));

    let json = format!(r#"{{ {},
        "entities": [ {{ "shape": {{ "type": "plane" }},
            "material": {{ "pattern": {{ "type": "stripe",
                "a": [1, 1, 1], "b": [0, 0] }} }} }} ] }}"#, CAMERA);
    assert!(matches!(parse_scene(&json), Err(RenderError::InvalidScene(_))));
}
