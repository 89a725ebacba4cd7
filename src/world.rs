use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::matrix::Matrix4D;
use crate::light::{ PointLight, Material, lighting };
use crate::shape::Shape;
use crate::intersect::{ Intersections, IntersectionComputation };

/// A world with objects and light.
///
/// Worlds collect all objects as well as the single light for rendering.
/// While a render runs the world is only ever borrowed immutably, so it can
/// be shared across render threads as-is.
#[derive(Clone, Debug)]
pub struct World {
    pub objects: Vec<Shape>,
    pub light: PointLight,
}

/// The standard test world: two concentric spheres lit from the upper left.
impl Default for World {
    fn default() -> World {
        let light = PointLight::new(
            Color::white(),
            Tuple4D::point(-10.0, 10.0, -10.0)
        );

        let s1 = Shape::sphere().with_material(Material {
            color: Color::rgb(0.8, 1.0, 0.6),
            diffuse: 0.7,
            specular: 0.2,
            ..Default::default()
        });

        let mut s2 = Shape::sphere();
        s2.set_transform_with_inverse(
            Matrix4D::scaling(0.5, 0.5, 0.5),
            Matrix4D::scaling(2.0, 2.0, 2.0),
        );

        World { objects: vec![s1, s2], light }
    }
}

impl World {
    pub fn new(light: PointLight, objects: Vec<Shape>) -> World {
        World { objects, light }
    }

    /// Creates an empty world with no objects and the default light source.
    pub fn empty() -> World {
        World { objects: Vec::new(), light: Default::default() }
    }

    /// Checks whether an equal shape is in this world.
    ///
    /// Equality is by value (kind, transform and material), so a clone of a
    /// world object is found too.
    pub fn contains(&self, shape: &Shape) -> bool {
        self.objects.iter().any(|o| o == shape)
    }

    /// Intersects a ray against all objects in a world, sorted by `t`.
    pub fn intersect(&self, r: &Ray4D) -> Intersections<'_> {
        Intersections::aggregate(
            self.objects.iter().map(|o| o.intersect(r)).collect()
        )
    }

    /// Determines whether a point is shadowed.
    ///
    /// A point is in shadow if something lies between it and the light,
    /// strictly closer than the light itself.
    pub fn is_shadowed(&self, p: Tuple4D) -> bool {
        let v = self.light.position - p;
        let distance = v.magnitude();
        let direction = v.normalize();

        let r = Ray4D::new(p, direction);
        match self.intersect(&r).hit() {
            Some(i) => i.t < distance,
            None => false,
        }
    }

    /// Calculates the color for a hit, based on shadows and light.
    ///
    /// The shadow test starts from the over point.
    pub fn shade_hit(&self, comps: &IntersectionComputation) -> Color {
        lighting(&comps.object.material, comps.object, &self.light,
            comps.point, comps.eyev, comps.normalv,
            self.is_shadowed(comps.over_point))
    }

    /// The color seen along a ray; black when nothing is hit.
    pub fn color_at(&self, r: &Ray4D) -> Color {
        let is = self.intersect(r);

        match is.hit() {
            None => Color::black(),
            Some(i) => {
                let comps = IntersectionComputation::new(r, &i);
                self.shade_hit(&comps)
            },
        }
    }
}

#[cfg(test)]
use crate::intersect::Intersection;

#[test]
fn default_world_contents() {
    let w = World::default();

    let mut s1 = Shape::sphere();
    s1.material.color = Color::rgb(0.8, 1.0, 0.6);
    s1.material.diffuse = 0.7;
    s1.material.specular = 0.2;

    let s2 = Shape::sphere()
        .with_transform(Matrix4D::scaling(0.5, 0.5, 0.5))
        .unwrap();

    assert_eq!(w.light.position, Tuple4D::point(-10.0, 10.0, -10.0));
    assert_eq!(w.light.intensity, Color::white());
    assert!(w.contains(&s1));
    assert!(w.contains(&s2));
    assert!(!w.contains(&Shape::plane()));
}

#[test]
fn intersect_default_world_with_ray() {
    let w = World::default();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    let is = w.intersect(&r);

    assert_eq!(is.len(), 4);
    assert_eq!(is.intersections[0].t, 4.0);
    assert_eq!(is.intersections[1].t, 4.5);
    assert_eq!(is.intersections[2].t, 5.5);
    assert_eq!(is.intersections[3].t, 6.0);
}

#[test]
fn shade_intersection_from_outside() {
    let w = World::default();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );

    let i = Intersection::new(4.0, &w.objects[0]);
    let comps = IntersectionComputation::new(&r, &i);

    assert_eq!(w.shade_hit(&comps), Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn shade_intersection_from_inside() {
    let mut w = World::default();
    w.light = PointLight::new(Color::white(), Tuple4D::point(0.0, 0.25, 0.0));

    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(0.5, &w.objects[1]);
    let comps = IntersectionComputation::new(&r, &i);

    assert_eq!(w.shade_hit(&comps), Color::rgb(0.90498, 0.90498, 0.90498));
}

#[test]
fn shade_intersection_in_shadow() {
    let s1 = Shape::sphere();
    let s2 = Shape::sphere()
        .with_transform(Matrix4D::translation(0.0, 0.0, 10.0))
        .unwrap();
    let w = World::new(
        PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0)),
        vec![s1, s2],
    );

    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    let i = Intersection::new(4.0, &w.objects[1]);
    let comps = IntersectionComputation::new(&r, &i);

    assert_eq!(w.shade_hit(&comps), Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn color_ray_miss() {
    let w = World::default();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
    );

    assert_eq!(w.color_at(&r), Color::black());
}

#[test]
fn color_ray_hit() {
    let w = World::default();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    assert_eq!(w.color_at(&r), Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn color_behind_ray() {
    let mut w = World::default();
    w.objects[0].material.ambient = 1.0;
    w.objects[1].material.ambient = 1.0;

    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 0.75),
        Tuple4D::vector(0.0, 0.0, -1.0)
    );

    assert_eq!(w.color_at(&r), w.objects[1].material.color);
}

#[test]
fn empty_world_is_black() {
    let w = World::empty();
    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(w.color_at(&r), Color::black());
}

#[test]
fn shadow_collinear_point_and_light() {
    let w = World::default();

    assert!(!w.is_shadowed(Tuple4D::point(0.0, 10.0, 0.0)));
}

#[test]
fn shadow_object_between_point_and_light() {
    let w = World::default();

    assert!(w.is_shadowed(Tuple4D::point(10.0, -10.0, 10.0)));
}

#[test]
fn shadow_object_behind_light() {
    let w = World::default();

    assert!(!w.is_shadowed(Tuple4D::point(-20.0, 20.0, -20.0)));
}

#[test]
fn shadow_object_behind_point() {
    let w = World::default();

    assert!(!w.is_shadowed(Tuple4D::point(-2.0, 2.0, -2.0)));
}
