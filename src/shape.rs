use std::fmt::Debug;
use std::sync::Arc;

use crate::consts::EPSILON;
use crate::error::Result;
use crate::tuple::Tuple4D;
use crate::matrix::Matrix4D;
use crate::ray::Ray4D;
use crate::light::Material;
use crate::intersect::{ Intersection, Intersections };

/// The geometry of a shape in its own object space.
///
/// Implementors only answer questions about a canonical primitive (the unit
/// sphere, the XZ plane, ...); `Shape` converts rays and points into object
/// space before asking and converts normals back out afterwards.
///
/// Primitives are shared between render threads, hence `Send + Sync`.
pub trait Primitive: Debug + Send + Sync {
    /// The `t` values where an object-space ray meets the primitive.
    ///
    /// An empty result means a miss. Values need not be sorted.
    fn local_intersect(&self, ray: &Ray4D) -> Vec<f64>;

    /// The surface normal at an object-space point on the primitive.
    fn local_normal_at(&self, point: Tuple4D) -> Tuple4D;

    /// A name for the primitive type, used for equality and logging.
    fn kind(&self) -> &'static str;
}

/// A unit sphere centered at the object-space origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Sphere;

impl Primitive for Sphere {
    /// Solves `a*t^2 + b*t + c = 0` for the unit sphere.
    ///
    /// Either no roots, or two in ascending order. A tangent ray yields the
    /// same `t` twice.
    fn local_intersect(&self, ray: &Ray4D) -> Vec<f64> {
        // Subtracting a point removes the 'w' part of the ray origin
        let sphere_to_ray = ray.origin - Tuple4D::origin();

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&sphere_to_ray);
        let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

        let discriminant = b.powi(2) - (4.0 * a * c);
        if discriminant < 0.0 {
            return Vec::new();
        }

        let t1 = (-b - discriminant.sqrt()) / (2.0 * a);
        let t2 = (-b + discriminant.sqrt()) / (2.0 * a);

        vec![t1, t2]
    }

    fn local_normal_at(&self, point: Tuple4D) -> Tuple4D {
        point - Tuple4D::origin()
    }

    fn kind(&self) -> &'static str {
        "sphere"
    }
}

/// The XZ plane through the object-space origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Plane;

impl Primitive for Plane {
    fn local_intersect(&self, ray: &Ray4D) -> Vec<f64> {
        // Parallel to the plane (or coplanar): no intersection
        if ray.direction.y.abs() < EPSILON {
            return Vec::new();
        }

        vec![-ray.origin.y / ray.direction.y]
    }

    fn local_normal_at(&self, _point: Tuple4D) -> Tuple4D {
        Tuple4D::vector(0.0, 1.0, 0.0)
    }

    fn kind(&self) -> &'static str {
        "plane"
    }
}

/// An axis-aligned cube spanning `[-1, 1]` on each axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Cube;

impl Cube {
    /// Where a ray crosses the two faces of one axis, smaller `t` first.
    fn check_axis(origin: f64, direction: f64) -> (f64, f64) {
        let tmin_numerator = -1.0 - origin;
        let tmax_numerator =  1.0 - origin;

        let (tmin, tmax) = if direction.abs() >= EPSILON {
            (tmin_numerator / direction, tmax_numerator / direction)
        } else {
            (tmin_numerator * f64::INFINITY, tmax_numerator * f64::INFINITY)
        };

        if tmin > tmax { (tmax, tmin) } else { (tmin, tmax) }
    }
}

impl Primitive for Cube {
    fn local_intersect(&self, ray: &Ray4D) -> Vec<f64> {
        let (xtmin, xtmax) = Cube::check_axis(ray.origin.x, ray.direction.x);
        let (ytmin, ytmax) = Cube::check_axis(ray.origin.y, ray.direction.y);
        let (ztmin, ztmax) = Cube::check_axis(ray.origin.z, ray.direction.z);

        let tmin = xtmin.max(ytmin).max(ztmin);
        let tmax = xtmax.min(ytmax).min(ztmax);

        if tmin > tmax {
            return Vec::new();
        }

        vec![tmin, tmax]
    }

    /// The normal points along whichever axis the point is furthest out on.
    fn local_normal_at(&self, p: Tuple4D) -> Tuple4D {
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

    fn kind(&self) -> &'static str {
        "cube"
    }
}

/// A primitive placed in the world.
///
/// The transform maps object space to world space. Its inverse and the
/// transpose of its inverse are computed once when the transform is set;
/// every intersection and normal query reuses them.
///
/// Shapes compare by value: primitive kind, transform and material.
#[derive(Clone, Debug)]
pub struct Shape {
    primitive: Arc<dyn Primitive>,
    transform: Matrix4D,
    inverse: Matrix4D,
    inverse_transpose: Matrix4D,

    pub material: Material,
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.primitive.kind() == other.primitive.kind()
            && self.transform == other.transform
            && self.material == other.material
    }
}

impl Shape {
    /// Wraps any primitive with an identity transform and default material.
    pub fn new(primitive: impl Primitive + 'static) -> Shape {
        Shape {
            primitive: Arc::new(primitive),
            transform: Matrix4D::identity(),
            inverse: Matrix4D::identity(),
            inverse_transpose: Matrix4D::identity(),
            material: Material::default(),
        }
    }

    pub fn sphere() -> Shape {
        Shape::new(Sphere)
    }

    pub fn plane() -> Shape {
        Shape::new(Plane)
    }

    pub fn cube() -> Shape {
        Shape::new(Cube)
    }

    pub fn kind(&self) -> &'static str {
        self.primitive.kind()
    }

    /// Returns a reference to the Shape transform.
    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    /// Sets the object-to-world transform.
    ///
    /// Fails with `Error::NonInvertible` if the transform cannot be inverted,
    /// in which case the shape keeps its previous transform.
    pub fn set_transform(&mut self, transform: Matrix4D) -> Result<()> {
        let inverse = transform.inverse()?;
        self.set_transform_with_inverse(transform, inverse);
        Ok(())
    }

    /// Sets a transform whose inverse is already known.
    pub(crate) fn set_transform_with_inverse(&mut self, transform: Matrix4D,
        inverse: Matrix4D) {
        self.transform = transform;
        self.inverse = inverse;
        self.inverse_transpose = inverse.transpose();
    }

    /// Builder form of `set_transform`.
    pub fn with_transform(mut self, transform: Matrix4D) -> Result<Shape> {
        self.set_transform(transform)?;
        Ok(self)
    }

    pub fn with_material(mut self, material: Material) -> Shape {
        self.material = material;
        self
    }

    /// Converts a point from world to object space.
    pub fn world_to_object(&self, point: Tuple4D) -> Tuple4D {
        self.inverse * point
    }

    /// Converts an object-space normal to a unit world-space normal.
    ///
    /// Uses the inverse transpose so non-uniform scaling keeps normals
    /// perpendicular to the surface. `w` is reset because the translation
    /// part of the matrix leaks into it.
    pub fn normal_to_world(&self, normal: Tuple4D) -> Tuple4D {
        let mut world_normal = self.inverse_transpose * normal;
        world_normal.w = 0.0;
        world_normal.normalize()
    }

    /// The world-space surface normal at a world-space point.
    pub fn normal_at(&self, world_point: Tuple4D) -> Tuple4D {
        let local_point = self.world_to_object(world_point);
        let local_normal = self.primitive.local_normal_at(local_point);
        self.normal_to_world(local_normal)
    }

    /// Intersects a world-space ray with this shape.
    ///
    /// The ray is moved into object space and handed to the primitive.
    /// Every resulting intersection refers back to this shape, with `t`
    /// measured along the ray's unit direction.
    pub fn intersect(&self, ray: &Ray4D) -> Intersections<'_> {
        let local_ray = ray.transform(self.inverse);

        let intersections = self.primitive
            .local_intersect(&local_ray)
            .into_iter()
            .map(|t| Intersection::new(t, self))
            .collect();

        Intersections { intersections }
    }
}

#[cfg(test)]
mod test_primitive {
    use std::sync::Mutex;
    use super::*;

    /// Remembers the last object-space ray it was asked about.
    #[derive(Debug, Default)]
    pub struct Probe {
        pub saved_ray: Mutex<Option<Ray4D>>,
    }

    impl Primitive for Probe {
        fn local_intersect(&self, ray: &Ray4D) -> Vec<f64> {
            if let Ok(mut saved) = self.saved_ray.lock() {
                *saved = Some(*ray);
            }
            Vec::new()
        }

        fn local_normal_at(&self, point: Tuple4D) -> Tuple4D {
            Tuple4D::vector(point.x, point.y, point.z)
        }

        fn kind(&self) -> &'static str {
            "probe"
        }
    }
}

#[test]
fn intersect_moves_ray_to_object_space() {
    use test_primitive::Probe;

    let probe = Arc::new(Probe::default());
    let mut s = Shape::new(Sphere);
    s.primitive = probe.clone() as Arc<dyn Primitive>;
    s.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap();

    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    assert!(s.intersect(&r).intersections.is_empty());

    let saved = (*probe.saved_ray.lock().unwrap()).unwrap();
    assert_eq!(saved.origin, Tuple4D::point(0.0, 0.0, -2.5));
    assert_eq!(saved.direction, Tuple4D::vector(0.0, 0.0, 0.5));

    s.set_transform(Matrix4D::translation(5.0, 0.0, 0.0)).unwrap();
    s.intersect(&r);

    let saved = (*probe.saved_ray.lock().unwrap()).unwrap();
    assert_eq!(saved.origin, Tuple4D::point(-5.0, 0.0, -5.0));
    assert_eq!(saved.direction, Tuple4D::vector(0.0, 0.0, 1.0));
}

#[test]
fn default_shape_state() {
    let s = Shape::sphere();

    assert_eq!(*s.transform(), Matrix4D::identity());
    assert_eq!(s.material, Material::default());
    assert_eq!(s.kind(), "sphere");
}

#[test]
fn singular_transform_is_rejected() {
    let mut s = Shape::sphere();
    let translated = Matrix4D::translation(1.0, 2.0, 3.0);
    s.set_transform(translated).unwrap();

    assert!(s.set_transform(Matrix4D::scaling(1.0, 1.0, 0.0)).is_err());
    assert_eq!(*s.transform(), translated);
}

#[test]
fn shapes_compare_by_value() {
    let a = Shape::sphere();
    let b = Shape::sphere();
    let c = Shape::plane();
    let d = Shape::sphere()
        .with_transform(Matrix4D::translation(0.0, 1.0, 0.0))
        .unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(a, d);
}

#[test]
fn ray_through_sphere() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    let xs = s.intersect(&r);

    assert_eq!(xs.intersections.len(), 2);
    assert_eq!(xs.intersections[0].t, 4.0);
    assert_eq!(xs.intersections[1].t, 6.0);
}

#[test]
fn long_direction_gives_distance_along_ray() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 2.0)
    );
    let s = Shape::sphere();
    let xs = s.intersect(&r);

    assert_eq!(xs.intersections.len(), 2);
    assert_eq!(xs.intersections[0].t, 4.0);
    assert_eq!(xs.intersections[1].t, 6.0);
    assert_eq!(r.position(4.0), Tuple4D::point(0.0, 0.0, -1.0));

    let s = Shape::sphere().with_transform(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap();
    let xs = s.intersect(&r);

    assert_eq!(xs.intersections[0].t, 3.0);
    assert_eq!(xs.intersections[1].t, 7.0);
}

#[test]
fn ray_is_tangent_to_sphere() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 1.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    let xs = s.intersect(&r);

    assert_eq!(xs.intersections.len(), 2);
    assert_eq!(xs.intersections[0].t, 5.0);
    assert_eq!(xs.intersections[1].t, 5.0);
}

#[test]
fn ray_misses_sphere() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 2.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );

    assert!(Shape::sphere().intersect(&r).intersections.is_empty());
}

#[test]
fn ray_is_inside_sphere() {
    let r = Ray4D::new(
        Tuple4D::origin(),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    let xs = s.intersect(&r);

    assert_eq!(xs.intersections.len(), 2);
    assert_eq!(xs.intersections[0].t, -1.0);
    assert_eq!(xs.intersections[1].t, 1.0);
}

#[test]
fn sphere_is_behind_ray() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    let xs = s.intersect(&r);

    assert_eq!(xs.intersections.len(), 2);
    assert_eq!(xs.intersections[0].t, -6.0);
    assert_eq!(xs.intersections[1].t, -4.0);
}

#[test]
fn intersections_refer_to_shape() {
    let s = Shape::sphere();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let xs = s.intersect(&r);

    assert!(std::ptr::eq(xs.intersections[0].object, &s));
    assert!(std::ptr::eq(xs.intersections[1].object, &s));
}

#[test]
fn intersect_scaled_sphere() {
    let s = Shape::sphere()
        .with_transform(Matrix4D::scaling(2.0, 2.0, 2.0))
        .unwrap();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let xs = s.intersect(&r);

    assert_eq!(xs.intersections.len(), 2);
    assert_eq!(xs.intersections[0].t, 3.0);
    assert_eq!(xs.intersections[1].t, 7.0);
}

#[test]
fn intersect_translated_sphere() {
    let s = Shape::sphere()
        .with_transform(Matrix4D::translation(5.0, 0.0, 0.0))
        .unwrap();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );

    assert!(s.intersect(&r).intersections.is_empty());
}

#[test]
fn normal_on_sphere_axes() {
    let s = Shape::sphere();

    assert_eq!(s.normal_at(Tuple4D::point(1.0, 0.0, 0.0)),
        Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(s.normal_at(Tuple4D::point(0.0, 1.0, 0.0)),
        Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(s.normal_at(Tuple4D::point(0.0, 0.0, 1.0)),
        Tuple4D::vector(0.0, 0.0, 1.0));
}

#[test]
fn normal_on_sphere_is_normalized() {
    let s = Shape::sphere();
    let k = 3.0f64.sqrt() / 3.0;
    let n = s.normal_at(Tuple4D::point(k, k, k));

    assert_eq!(n, Tuple4D::vector(k, k, k));
    assert_eq!(n, n.normalize());
}

#[test]
fn compute_normal_on_translated_sphere() {
    let s = Shape::sphere()
        .with_transform(Matrix4D::translation(0.0, 1.0, 0.0))
        .unwrap();
    let n = s.normal_at(Tuple4D::point(0.0, 1.70711, -0.70711));

    assert_eq!(n, Tuple4D::vector(0.0, 0.70711, -0.70711));
}

#[test]
fn compute_normal_on_transformed_sphere() {
    let s = Shape::sphere()
        .with_transform(Matrix4D::scaling(1.0, 0.5, 1.0)
            * Matrix4D::rotation_z(std::f64::consts::PI / 5.0))
        .unwrap();
    let p = Tuple4D::point(0.0, 2.0f64.sqrt() / 2.0, -(2.0f64.sqrt()) / 2.0);

    assert_eq!(s.normal_at(p), Tuple4D::vector(0.0, 0.97014, -0.24254));
}

#[test]
fn normal_on_plane_is_constant() {
    let p = Plane;

    for at in [
        Tuple4D::origin(),
        Tuple4D::point(10.0, 0.0, -10.0),
        Tuple4D::point(-5.0, 0.0, 150.0),
    ].iter() {
        assert_eq!(p.local_normal_at(*at), Tuple4D::vector(0.0, 1.0, 0.0));
    }
}

#[test]
fn ray_parallel_to_plane() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 10.0, 0.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    assert!(Plane.local_intersect(&r).is_empty());

    let coplanar = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));
    assert!(Plane.local_intersect(&coplanar).is_empty());
}

#[test]
fn ray_intersecting_plane_from_above_and_below() {
    let above = Ray4D::new(
        Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::vector(0.0, -1.0, 0.0)
    );
    let below = Ray4D::new(
        Tuple4D::point(0.0, -1.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0)
    );

    assert_eq!(Plane.local_intersect(&above), vec![1.0]);
    assert_eq!(Plane.local_intersect(&below), vec![1.0]);
}

#[test]
fn ray_intersects_cube_faces() {
    let cases = [
        (Tuple4D::point( 5.0,  0.5,  0.0), Tuple4D::vector(-1.0,  0.0,  0.0), 4.0, 6.0),
        (Tuple4D::point(-5.0,  0.5,  0.0), Tuple4D::vector( 1.0,  0.0,  0.0), 4.0, 6.0),
        (Tuple4D::point( 0.5,  5.0,  0.0), Tuple4D::vector( 0.0, -1.0,  0.0), 4.0, 6.0),
        (Tuple4D::point( 0.5,  0.0, -5.0), Tuple4D::vector( 0.0,  0.0,  1.0), 4.0, 6.0),
        (Tuple4D::point( 0.0,  0.5,  0.0), Tuple4D::vector( 0.0,  0.0,  1.0), -1.0, 1.0),
    ];

    for (origin, direction, t1, t2) in cases.iter() {
        let xs = Cube.local_intersect(&Ray4D::new(*origin, *direction));
        assert_eq!(xs, vec![*t1, *t2]);
    }
}

#[test]
fn ray_misses_cube() {
    let r = Ray4D::new(
        Tuple4D::point(-2.0, 0.0, 0.0),
        Tuple4D::vector(0.2673, 0.5345, 0.8018)
    );

    assert!(Cube.local_intersect(&r).is_empty());
}

#[test]
fn normal_on_cube() {
    assert_eq!(Cube.local_normal_at(Tuple4D::point(1.0, 0.5, -0.8)),
        Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(Cube.local_normal_at(Tuple4D::point(-0.4, 0.3, -1.0)),
        Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(Cube.local_normal_at(Tuple4D::point(1.0, 1.0, 1.0)),
        Tuple4D::vector(1.0, 0.0, 0.0));
}
