use crate::feq;
use crate::error::Result;
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::matrix::Matrix4D;
use crate::shape::Shape;

/// The function a pattern evaluates in pattern space.
///
/// Every kind alternates or blends between two colors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// Alternates across X: `floor(x)` even picks the first color.
    Stripe(Color, Color),

    /// Blends linearly from the first color to the second across each unit
    /// of X.
    Gradient(Color, Color),

    /// Concentric rings in the XZ plane.
    Ring(Color, Color),

    /// Alternating 3D cubes.
    Checker(Color, Color),

    /// Blends across each unit of distance from the pattern origin.
    RadialGradient(Color, Color),
}

/// A color pattern with its own transform.
///
/// The transform maps object space to pattern space and is applied on top
/// of the transform of the shape the pattern is painted on. Like shapes, the
/// inverse is computed once, when the transform is set.
#[derive(Copy, Clone, Debug)]
pub struct Pattern {
    kind: PatternKind,
    transform: Matrix4D,
    inverse: Matrix4D,
}

/// Patterns compare by kind and transform.
impl PartialEq for Pattern {
    fn eq(&self, other: &Pattern) -> bool {
        self.kind == other.kind && self.transform == other.transform
    }
}

/// Returns `true` for even integers, tolerating negative input.
fn is_even(v: f64) -> bool {
    feq(v.rem_euclid(2.0), 0.0)
}

impl Pattern {
    pub fn new(kind: PatternKind) -> Pattern {
        Pattern {
            kind,
            transform: Matrix4D::identity(),
            inverse: Matrix4D::identity(),
        }
    }

    pub fn stripe(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Stripe(a, b))
    }

    pub fn gradient(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Gradient(a, b))
    }

    pub fn ring(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Ring(a, b))
    }

    pub fn checker(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Checker(a, b))
    }

    pub fn radial_gradient(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::RadialGradient(a, b))
    }

    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    /// Sets the object-to-pattern transform.
    ///
    /// Fails if `transform` is not invertible, leaving the pattern unchanged.
    pub fn set_transform(&mut self, transform: Matrix4D) -> Result<()> {
        self.inverse = transform.inverse()?;
        self.transform = transform;
        Ok(())
    }

    /// Builder form of `set_transform`.
    pub fn with_transform(mut self, transform: Matrix4D) -> Result<Pattern> {
        self.set_transform(transform)?;
        Ok(self)
    }

    /// Evaluates the pattern at a point already in pattern space.
    pub fn pattern_at(&self, p: Tuple4D) -> Color {
        match self.kind {
            PatternKind::Stripe(a, b) => {
                if is_even(p.x.floor()) { a } else { b }
            },

            PatternKind::Gradient(a, b) => {
                a + (b - a) * (p.x - p.x.floor())
            },

            PatternKind::Ring(a, b) => {
                let distance = (p.x.powi(2) + p.z.powi(2)).sqrt();
                if is_even(distance.floor()) { a } else { b }
            },

            PatternKind::Checker(a, b) => {
                let sum = p.x.floor() + p.y.floor() + p.z.floor();
                if is_even(sum) { a } else { b }
            },

            PatternKind::RadialGradient(a, b) => {
                let distance = Tuple4D::vector(p.x, p.y, p.z).magnitude();
                a + (b - a) * (distance - distance.floor())
            },
        }
    }

    /// Evaluates the pattern at a world-space point on `shape`.
    ///
    /// The point goes through the shape's inverse transform into object
    /// space, then through the pattern's inverse transform.
    pub fn pattern_at_shape(&self, shape: &Shape, world_point: Tuple4D)
        -> Color {
        let object_point = shape.world_to_object(world_point);
        let pattern_point = self.inverse * object_point;

        self.pattern_at(pattern_point)
    }
}

#[test]
fn stripe_pattern_is_constant_along_y_and_z() {
    let pattern = Pattern::stripe(Color::white(), Color::black());

    for p in [
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(0.0, 2.0, 0.0),
        Tuple4D::point(0.0, 0.0, 1.0),
        Tuple4D::point(0.0, 0.0, 2.0),
    ].iter() {
        assert_eq!(pattern.pattern_at(*p), Color::white());
    }
}

#[test]
fn stripe_pattern_alternates_along_x() {
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
fn stripes_with_object_transform() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap();
    let pattern = Pattern::stripe(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at_shape(&s, Tuple4D::point(1.5, 0.0, 0.0)),
        Color::white());
}

#[test]
fn stripes_with_pattern_transform() {
    let s = Shape::sphere();
    let pattern = Pattern::stripe(Color::white(), Color::black())
        .with_transform(Matrix4D::scaling(2.0, 2.0, 2.0))
        .unwrap();

    assert_eq!(pattern.pattern_at_shape(&s, Tuple4D::point(1.5, 0.0, 0.0)),
        Color::white());
}

#[test]
fn stripes_with_object_and_pattern_transform() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap();
    let pattern = Pattern::stripe(Color::white(), Color::black())
        .with_transform(Matrix4D::translation(0.5, 0.0, 0.0))
        .unwrap();

    assert_eq!(pattern.pattern_at_shape(&s, Tuple4D::point(2.5, 0.0, 0.0)),
        Color::white());
}

#[test]
fn gradient_interpolates() {
    let pattern = Pattern::gradient(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.25, 0.0, 0.0)),
        Color::rgb(0.75, 0.75, 0.75));
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.5, 0.0, 0.0)),
        Color::rgb(0.5, 0.5, 0.5));
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
fn checkers_repeat_in_each_dimension() {
    let pattern = Pattern::checker(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.99, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(1.01, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 1.01, 0.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 1.01)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(-0.5, -0.5, 0.5)),
        Color::white());
}

#[test]
fn radial_gradient_blends_by_distance() {
    let pattern = Pattern::radial_gradient(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.5, 0.0)),
        Color::rgb(0.5, 0.5, 0.5));
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 1.25)),
        Color::rgb(0.75, 0.75, 0.75));
}

#[test]
fn singular_pattern_transform_is_rejected() {
    let mut pattern = Pattern::stripe(Color::white(), Color::black());

    assert!(pattern.set_transform(Matrix4D::scaling(0.0, 1.0, 1.0)).is_err());
    assert_eq!(*pattern.transform(), Matrix4D::identity());
}
