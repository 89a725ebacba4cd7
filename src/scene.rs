use std::fs;
use std::path::Path;

use log::debug;
use serde::{ Serialize, Deserialize };

use crate::error::{ Error, Result };
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::matrix::Matrix4D;
use crate::pattern::{ Pattern, PatternKind };
use crate::light::{ PointLight, Material };
use crate::shape::Shape;
use crate::world::World;
use crate::camera::Camera;
use crate::parallel::RenderConfig;

/// The scene bundled with the binary.
const DEMO_SCENE: &str = include_str!("../scenes/demo.json");

/// Everything needed for a render: what to draw, from where, and how.
#[derive(Clone, Debug)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
    pub render: RenderConfig,
}

impl Scene {
    /// Reads and builds a scene from a JSON file.
    pub fn load(path: &Path) -> Result<Scene> {
        debug!("loading scene from {}", path.display());
        Scene::from_json(&fs::read_to_string(path)?)
    }

    pub fn from_json(json: &str) -> Result<Scene> {
        let scene_json: SceneJson = serde_json::from_str(json)?;
        Scene::try_from(scene_json)
    }

    /// The built-in demo scene.
    pub fn demo() -> Result<Scene> {
        Scene::from_json(DEMO_SCENE)
    }
}

impl TryFrom<SceneJson> for Scene {
    type Error = Error;

    fn try_from(scene_json: SceneJson) -> Result<Scene> {
        let fov = scene_json.field_of_view;
        if !(fov > 0.0 && fov < std::f64::consts::PI) {
            return Err(Error::Scene(
                format!("field of view must be in (0, pi), got {}", fov)
            ));
        }

        // Create the camera transform from the view parameters.
        let camera_transform = Matrix4D::view_transform(
            point(scene_json.camera_from),
            point(scene_json.camera_to),
            vector(scene_json.camera_up),
        );

        let camera = Camera::new(
            scene_json.canvas_width,
            scene_json.canvas_height,
            fov,
            camera_transform
        )?;

        let light = PointLight::new(
            scene_json.light.intensity.into(),
            point(scene_json.light.position),
        );

        let objects = scene_json.shapes
            .into_iter()
            .map(Shape::try_from)
            .collect::<Result<Vec<Shape>>>()?;

        let render = scene_json.render.unwrap_or_default();
        render.validate()?;

        debug!("scene has {} shapes", objects.len());
        Ok(Scene { world: World::new(light, objects), camera, render })
    }
}

fn point(v: [f64; 3]) -> Tuple4D {
    Tuple4D::point(v[0], v[1], v[2])
}

fn vector(v: [f64; 3]) -> Tuple4D {
    Tuple4D::vector(v[0], v[1], v[2])
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneJson {
    canvas_width: usize,
    canvas_height: usize,
    field_of_view: f64,

    camera_from: [f64; 3],
    camera_to: [f64; 3],
    camera_up: [f64; 3],

    light: LightJson,

    #[serde(default)]
    render: Option<RenderConfig>,

    shapes: Vec<ShapeJson>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct LightJson {
    intensity: [f64; 3],
    position: [f64; 3],
}

/// One step of a transform chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformJson {
    Translate([f64; 3]),
    Scale([f64; 3]),
    RotateX(f64),
    RotateY(f64),
    RotateZ(f64),
    Shear([f64; 6]),
    /// 16 values, row-major.
    Matrix(Vec<f64>),
}

impl TransformJson {
    fn to_matrix(&self) -> Result<Matrix4D> {
        Ok(match self {
            TransformJson::Translate(v) => Matrix4D::translation(v[0], v[1], v[2]),
            TransformJson::Scale(v) => Matrix4D::scaling(v[0], v[1], v[2]),
            TransformJson::RotateX(r) => Matrix4D::rotation_x(*r),
            TransformJson::RotateY(r) => Matrix4D::rotation_y(*r),
            TransformJson::RotateZ(r) => Matrix4D::rotation_z(*r),
            TransformJson::Shear(s) =>
                Matrix4D::shearing(s[0], s[1], s[2], s[3], s[4], s[5]),
            TransformJson::Matrix(values) => Matrix4D::from_slice(values)?,
        })
    }
}

/// Composes a chain so that the first step listed is applied first.
fn compose(steps: &[TransformJson]) -> Result<Matrix4D> {
    steps.iter().try_fold(Matrix4D::identity(), |m, step| {
        Ok(step.to_matrix()? * m)
    })
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    Sphere,
    Plane,
    Cube,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShapeJson {
    ty: ShapeType,

    #[serde(default)]
    transform: Vec<TransformJson>,

    #[serde(default)]
    material: MaterialJson,
}

impl TryFrom<ShapeJson> for Shape {
    type Error = Error;

    fn try_from(shape_json: ShapeJson) -> Result<Shape> {
        let shape = match shape_json.ty {
            ShapeType::Sphere => Shape::sphere(),
            ShapeType::Plane => Shape::plane(),
            ShapeType::Cube => Shape::cube(),
        };

        Ok(shape
            .with_transform(compose(&shape_json.transform)?)?
            .with_material(Material::try_from(shape_json.material)?))
    }
}

/// Material fields left out keep their `Material::default()` values.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialJson {
    color: Option<[f64; 3]>,
    ambient: Option<f64>,
    diffuse: Option<f64>,
    specular: Option<f64>,
    shininess: Option<f64>,
    pattern: Option<PatternJson>,
}

impl TryFrom<MaterialJson> for Material {
    type Error = Error;

    fn try_from(m: MaterialJson) -> Result<Material> {
        let defaults = Material::default();

        Ok(Material {
            color: m.color.map(Color::from).unwrap_or(defaults.color),
            pattern: m.pattern.map(Pattern::try_from).transpose()?,
            ambient: m.ambient.unwrap_or(defaults.ambient),
            diffuse: m.diffuse.unwrap_or(defaults.diffuse),
            specular: m.specular.unwrap_or(defaults.specular),
            shininess: m.shininess.unwrap_or(defaults.shininess),
        })
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Stripe,
    Gradient,
    Ring,
    Checker,
    RadialGradient,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatternJson {
    ty: PatternType,
    colors: [[f64; 3]; 2],

    #[serde(default)]
    transform: Vec<TransformJson>,
}

impl TryFrom<PatternJson> for Pattern {
    type Error = Error;

    fn try_from(p: PatternJson) -> Result<Pattern> {
        let a = Color::from(p.colors[0]);
        let b = Color::from(p.colors[1]);

        let kind = match p.ty {
            PatternType::Stripe => PatternKind::Stripe(a, b),
            PatternType::Gradient => PatternKind::Gradient(a, b),
            PatternType::Ring => PatternKind::Ring(a, b),
            PatternType::Checker => PatternKind::Checker(a, b),
            PatternType::RadialGradient => PatternKind::RadialGradient(a, b),
        };

        Pattern::new(kind).with_transform(compose(&p.transform)?)
    }
}

#[test]
fn demo_scene_loads() {
    let scene = Scene::demo().unwrap();

    assert_eq!(scene.camera.hsize(), 384);
    assert_eq!(scene.camera.vsize(), 216);
    assert_eq!(scene.world.objects.len(), 5);
    assert_eq!(scene.render.chunk_size, 32);
    assert_eq!(scene.world.light.position, Tuple4D::point(-10.0, 10.0, -10.0));
}

#[test]
fn transforms_apply_in_listed_order() {
    let steps: Vec<TransformJson> = serde_json::from_str(r#"[
        { "rotate_x": 1.5707963267948966 },
        { "scale": [5.0, 5.0, 5.0] },
        { "translate": [10.0, 5.0, 7.0] }
    ]"#).unwrap();

    let m = compose(&steps).unwrap();
    assert_eq!(m * Tuple4D::point(1.0, 0.0, 1.0), Tuple4D::point(15.0, 0.0, 7.0));
}

#[test]
fn raw_matrix_transform() {
    let steps: Vec<TransformJson> = serde_json::from_str(r#"[
        { "matrix": [1, 0, 0, 2,  0, 1, 0, 3,  0, 0, 1, 4,  0, 0, 0, 1] }
    ]"#).unwrap();

    assert_eq!(compose(&steps).unwrap(), Matrix4D::translation(2.0, 3.0, 4.0));

    let short: Vec<TransformJson> =
        serde_json::from_str(r#"[{ "matrix": [1, 0, 0] }]"#).unwrap();
    assert!(matches!(compose(&short), Err(Error::MatrixSize { actual: 3, .. })));
}

#[test]
fn material_defaults_fill_gaps() {
    let m: MaterialJson = serde_json::from_str(r#"{ "diffuse": 0.5 }"#).unwrap();
    let m = Material::try_from(m).unwrap();

    assert_eq!(m, Material { diffuse: 0.5, ..Default::default() });
}

#[test]
fn degenerate_shape_transform_is_an_error() {
    let json = r#"{ "ty": "sphere", "transform": [{ "scale": [1.0, 0.0, 1.0] }] }"#;
    let s: ShapeJson = serde_json::from_str(json).unwrap();

    assert!(matches!(Shape::try_from(s), Err(Error::NonInvertible { .. })));
}

#[test]
fn unknown_shape_type_is_an_error() {
    let json = r#"{
        "canvas_width": 10, "canvas_height": 10, "field_of_view": 1.0,
        "camera_from": [0, 0, -5], "camera_to": [0, 0, 0], "camera_up": [0, 1, 0],
        "light": { "intensity": [1, 1, 1], "position": [0, 0, -10] },
        "shapes": [{ "ty": "teapot" }]
    }"#;

    assert!(matches!(Scene::from_json(json), Err(Error::Json(_))));
}

#[test]
fn bad_field_of_view_is_an_error() {
    let json = r#"{
        "canvas_width": 10, "canvas_height": 10, "field_of_view": 0.0,
        "camera_from": [0, 0, -5], "camera_to": [0, 0, 0], "camera_up": [0, 1, 0],
        "light": { "intensity": [1, 1, 1], "position": [0, 0, -10] },
        "shapes": []
    }"#;

    assert!(matches!(Scene::from_json(json), Err(Error::Scene(_))));
}
