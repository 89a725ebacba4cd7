use crate::consts::EPSILON;
use crate::tuple::Tuple4D;
use crate::ray::Ray4D;
use crate::shape::Shape;

/// An intersection.
///
/// Parameter `t` is the offset along the ray, and `object` is the shape that
/// was hit. The shape is borrowed, never copied, so material lookups during
/// shading see the shape as it sits in the world.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub t: f64,
    pub object: &'a Shape,
}

/// Two Intersection structures are equal if their offsets `t` are equal and
/// they point at the *same* shape.
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.t == other.t && std::ptr::eq(self.object, other.object)
    }
}

impl<'a> Intersection<'a> {
    pub fn new(t: f64, object: &'a Shape) -> Intersection<'a> {
        Intersection { t, object }
    }
}

/// A collection of intersections along one ray.
///
/// Mostly a wrapper for a vector of `Intersection` objects. An empty
/// collection is a miss, not an error.
#[derive(Clone, Debug, Default)]
pub struct Intersections<'a> {
    pub intersections: Vec<Intersection<'a>>,
}

impl<'a> Intersections<'a> {
    pub fn new() -> Intersections<'a> {
        Intersections { intersections: Vec::new() }
    }

    /// Concatenates several collections and sorts the result by `t`.
    pub fn aggregate(all: Vec<Intersections<'a>>) -> Intersections<'a> {
        let mut res = Intersections {
            intersections: all.into_iter().flat_map(|i| i.intersections).collect(),
        };

        res.sort();
        res
    }

    /// Sorts the intersections by ascending `t`.
    ///
    /// NaN offsets are treated as equal to everything.
    pub fn sort(&mut self) {
        self.intersections.sort_by(|a, b|
            a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal)
        );
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    /// The visible intersection, if any.
    ///
    /// This is the intersection with the lowest `t` where `t >= EPSILON`;
    /// anything at or behind the ray origin is ignored. The collection does
    /// not need to be sorted.
    pub fn hit(&self) -> Option<Intersection<'a>> {
        self.intersections
            .iter()
            .filter(|i| i.t.is_finite() && i.t >= EPSILON)
            .min_by(|a, b|
                a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal)
            )
            .copied()
    }
}

/// A record for computations associated with an `Intersection`.
///
/// Mostly a superset of an `Intersection`, built once per hit and read by
/// the shading code.
#[derive(Clone, Debug)]
pub struct IntersectionComputation<'a> {
    /// The "time" of the ray intersection.
    pub t: f64,

    /// The object being intersected.
    pub object: &'a Shape,

    /// The point where the intersection occurs.
    pub point: Tuple4D,

    /// A point slightly above the intersected surface. Shadow rays start
    /// here so an object does not shadow itself ("acne").
    pub over_point: Tuple4D,

    /// The eye vector for the intersection.
    pub eyev: Tuple4D,

    /// The surface normal, flipped to face the eye when `inside` is set.
    pub normalv: Tuple4D,

    /// Whether the ray started inside the object.
    pub inside: bool,
}

impl<'a> IntersectionComputation<'a> {
    pub fn new(r: &Ray4D, hit: &Intersection<'a>) -> IntersectionComputation<'a> {
        let t = hit.t;
        let object = hit.object;
        let point = r.position(t);
        let eyev = -r.unit_direction();
        let mut normalv = object.normal_at(point);

        let inside = if normalv.dot(&eyev) < 0.0 {
            normalv = -normalv;
            true
        } else {
            false
        };

        let over_point = point + normalv * EPSILON;

        IntersectionComputation {
            t, object,
            point, over_point,
            eyev, normalv,
            inside,
        }
    }
}

#[cfg(test)]
fn forward_ray(z: f64) -> Ray4D {
    Ray4D::new(Tuple4D::point(0.0, 0.0, z), Tuple4D::vector(0.0, 0.0, 1.0))
}

#[test]
fn hit_with_all_positive() {
    let s  = Shape::sphere();
    let i1 = Intersection::new(1.0, &s);
    let i2 = Intersection::new(2.0, &s);
    let is = Intersections { intersections: vec![i2, i1] };

    assert_eq!(is.hit().unwrap(), i1);
}

#[test]
fn hit_with_some_negative() {
    let s  = Shape::sphere();
    let i1 = Intersection::new(-1.0, &s);
    let i2 = Intersection::new( 1.0, &s);
    let is = Intersections { intersections: vec![i1, i2] };

    assert_eq!(is.hit().unwrap(), i2);
}

#[test]
fn hit_with_all_negative() {
    let s  = Shape::sphere();
    let i1 = Intersection::new(-2.0, &s);
    let i2 = Intersection::new(-1.0, &s);
    let is = Intersections { intersections: vec![i1, i2] };

    assert_eq!(is.hit(), None);
}

#[test]
fn hit_multiple() {
    let s  = Shape::sphere();
    let i1 = Intersection::new(5.0,  &s);
    let i2 = Intersection::new(7.0,  &s);
    let i3 = Intersection::new(-3.0, &s);
    let i4 = Intersection::new(2.0,  &s);
    let is = Intersections { intersections: vec![i1, i2, i3, i4] };

    assert_eq!(is.hit().unwrap(), i4);
}

#[test]
fn hit_ignores_origin_and_nan() {
    let s  = Shape::sphere();
    let i1 = Intersection::new(0.0, &s);
    let i2 = Intersection::new(f64::NAN, &s);
    let i3 = Intersection::new(3.0, &s);
    let is = Intersections { intersections: vec![i1, i2, i3] };

    assert_eq!(is.hit().unwrap(), i3);
}

#[test]
fn hit_compares_shape_identity() {
    let a = Shape::sphere();
    let b = Shape::sphere();

    assert_ne!(Intersection::new(1.0, &a), Intersection::new(1.0, &b));
}

#[test]
fn aggregate_sorts_by_t() {
    let s1 = Shape::sphere();
    let s2 = Shape::sphere()
        .with_transform(crate::matrix::Matrix4D::scaling(0.5, 0.5, 0.5))
        .unwrap();
    let r = forward_ray(-5.0);

    let xs = Intersections::aggregate(vec![s1.intersect(&r), s2.intersect(&r)]);
    let ts: Vec<f64> = xs.intersections.iter().map(|i| i.t).collect();

    assert_eq!(ts, vec![4.0, 4.5, 5.5, 6.0]);
}

#[test]
fn precompute_outside_hit() {
    let s = Shape::sphere();
    let r = forward_ray(-5.0);
    let i = Intersection::new(4.0, &s);

    let comps = IntersectionComputation::new(&r, &i);

    assert_eq!(comps.t, i.t);
    assert!(std::ptr::eq(comps.object, &s));
    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, -1.0));
    assert_eq!(comps.eyev, Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(comps.normalv, Tuple4D::vector(0.0, 0.0, -1.0));
    assert!(!comps.inside);
}

#[test]
fn precompute_inside_hit() {
    let s = Shape::sphere();
    let r = forward_ray(0.0);
    let i = Intersection::new(1.0, &s);

    let comps = IntersectionComputation::new(&r, &i);

    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, 1.0));
    assert_eq!(comps.eyev, Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(comps.normalv, Tuple4D::vector(0.0, 0.0, -1.0));
    assert!(comps.inside);
}

#[test]
fn hit_offsets_over_point() {
    let s = Shape::sphere()
        .with_transform(crate::matrix::Matrix4D::translation(0.0, 0.0, 1.0))
        .unwrap();
    let r = forward_ray(-5.0);
    let i = Intersection::new(5.0, &s);

    let comps = IntersectionComputation::new(&r, &i);

    assert!(comps.over_point.z < -EPSILON / 2.0);
    assert!(comps.point.z > comps.over_point.z);
}
