use crate::tuple::Tuple4D;
use crate::matrix::Matrix4D;

/// A ray, cast from `origin` along `direction`.
///
/// `t` values along a ray always measure distance along the *unit*
/// direction, whatever length `direction` was given with. Two rays that
/// differ only in the length of their direction therefore place every `t`
/// at the same point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray4D {
    pub origin: Tuple4D,
    pub direction: Tuple4D,
}

impl Ray4D {
    /// Creates a ray.
    ///
    /// The origin is forced to be a point and the direction a vector.
    pub fn new(mut origin: Tuple4D, mut direction: Tuple4D) -> Ray4D {
        if !origin.is_point() {
            origin.w = 1.0;
        }

        if !direction.is_vector() {
            direction.w = 0.0;
        }

        Ray4D { origin, direction }
    }

    /// The direction scaled to length one.
    pub fn unit_direction(&self) -> Tuple4D {
        self.direction.normalize()
    }

    /// The point `t` units along the ray.
    pub fn position(&self, t: f64) -> Tuple4D {
        self.origin + (t * self.unit_direction())
    }

    /// Maps the ray through `m`.
    ///
    /// The unit direction is transformed but not renormalized, so a `t`
    /// found against the transformed ray is still a distance along this one.
    pub fn transform(&self, m: Matrix4D) -> Ray4D {
        Ray4D {
            origin: m * self.origin,
            direction: m * self.unit_direction(),
        }
    }
}

#[test]
fn position_along_ray() {
    let r = Ray4D::new(
        Tuple4D::point(2.0, 3.0, 4.0),
        Tuple4D::vector(1.0, 0.0, 0.0)
    );

    assert_eq!(r.position(0.0), Tuple4D::point(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Tuple4D::point(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Tuple4D::point(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Tuple4D::point(4.5, 3.0, 4.0));
}

#[test]
fn position_ignores_direction_length() {
    let long = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 4.0));
    let unit = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(long.unit_direction(), Tuple4D::vector(0.0, 0.0, 1.0));
    assert_eq!(long.position(3.0), Tuple4D::point(0.0, 0.0, 3.0));
    assert_eq!(long.position(3.0), unit.position(3.0));
}

#[test]
fn new_forces_point_and_vector() {
    let r = Ray4D::new(
        Tuple4D::tuple(1.0, 2.0, 3.0, 0.0),
        Tuple4D::tuple(0.0, 0.0, 1.0, 1.0)
    );

    assert!(r.origin.is_point());
    assert!(r.direction.is_vector());
}

#[test]
fn translating_moves_origin_only() {
    let r = Ray4D::new(
        Tuple4D::point(1.0, 2.0, 3.0),
        Tuple4D::vector(0.0, 1.0, 0.0)
    );
    let t = r.transform(Matrix4D::translation(3.0, 4.0, 5.0));

    assert_eq!(t.origin, Tuple4D::point(4.0, 6.0, 8.0));
    assert_eq!(t.direction, Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn scaling_stretches_unit_direction() {
    let r = Ray4D::new(
        Tuple4D::point(1.0, 2.0, 3.0),
        Tuple4D::vector(0.0, 5.0, 0.0)
    );
    let t = r.transform(Matrix4D::scaling(2.0, 3.0, 4.0));

    assert_eq!(t.origin, Tuple4D::point(2.0, 6.0, 12.0));
    assert_eq!(t.direction, Tuple4D::vector(0.0, 3.0, 0.0));
}
