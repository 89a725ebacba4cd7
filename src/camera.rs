use log::warn;

use crate::error::{ Error, Result };
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::matrix::Matrix4D;
use crate::world::World;
use crate::canvas::Canvas;
use crate::parallel::FailurePolicy;

/// A camera record for generating a canvas.
///
/// This record gives a "frame" of the world. Based on camera parameters,
/// different perspectives can be produced.
///
/// The derived view sizes and the inverse transform are computed when the
/// camera is built (or its transform replaced) and never change afterwards,
/// so a camera can be shared freely between render threads.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// The horizontal size of the resultant canvas.
    hsize: usize,

    /// The vertical size of the resultant canvas.
    vsize: usize,

    /// The angle describing "how much" the camera can see, in radians.
    field_of_view: f64,

    /// A matrix describing how the world should be oriented relative to the
    /// camera (typically a view transformation).
    transform: Matrix4D,
    inverse: Matrix4D,

    half_width: f64,
    half_height: f64,
    pixel_size: f64,
}

impl Camera {
    /// Creates a camera.
    ///
    /// Fails with `Error::EmptyCanvas` if either dimension is zero, or with
    /// `Error::NonInvertible` if the transform cannot be inverted.
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64,
        transform: Matrix4D) -> Result<Camera> {
        if hsize == 0 || vsize == 0 {
            return Err(Error::EmptyCanvas { hsize, vsize });
        }

        let half_view = (field_of_view / 2.0).tan();
        let aspect = (hsize as f64) / (vsize as f64);

        let (half_width, half_height) = if aspect >= 1.0 {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };

        let pixel_size = half_width * 2.0 / (hsize as f64);
        Ok(Camera {
            hsize,
            vsize,
            field_of_view,
            transform,
            inverse: transform.inverse()?,
            half_width,
            half_height,
            pixel_size,
        })
    }

    pub fn hsize(&self) -> usize {
        self.hsize
    }

    pub fn vsize(&self) -> usize {
        self.vsize
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    /// Replaces the world-to-camera transform.
    pub fn set_transform(&mut self, transform: Matrix4D) -> Result<()> {
        self.inverse = transform.inverse()?;
        self.transform = transform;
        Ok(())
    }

    /// The ray from the eye through the center of pixel `(px, py)`.
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray4D {
        // Offsets from the edge of the canvas to the pixel's center
        let xoffset = (px as f64 + 0.5) * self.pixel_size;
        let yoffset = (py as f64 + 0.5) * self.pixel_size;

        // The camera looks toward -z, so +x is to the *left*
        let world_x = self.half_width - xoffset;
        let world_y = self.half_height - yoffset;

        let pixel = self.inverse * Tuple4D::point(world_x, world_y, -1.0);
        let origin = self.inverse * Tuple4D::origin();
        let direction = (pixel - origin).normalize();

        Ray4D::new(origin, direction)
    }

    /// Shades a single pixel.
    ///
    /// Fails with `Error::NonFiniteColor` if shading produced NaN or an
    /// infinite channel.
    pub fn pixel_color(&self, world: &World, x: usize, y: usize)
        -> Result<Color> {
        let color = world.color_at(&self.ray_for_pixel(x, y));

        if !color.is_finite() {
            return Err(Error::NonFiniteColor { x, y });
        }

        Ok(color)
    }

    /// Renders the world one pixel at a time, in row-major order.
    ///
    /// The first failing pixel aborts the render.
    pub fn render(&self, world: &World) -> Result<Canvas> {
        self.render_with_policy(world, &FailurePolicy::Abort)
    }

    /// Sequential render, with `policy` deciding what a failing pixel does.
    ///
    /// `FailurePolicy::Substitute` fills only the failing pixel, whereas
    /// the tiled renderer fills the failing pixel's whole tile.
    pub fn render_with_policy(&self, world: &World, policy: &FailurePolicy)
        -> Result<Canvas> {
        let mut image = Canvas::new(self.hsize, self.vsize);

        for y in 0..self.vsize {
            for x in 0..self.hsize {
                let color = match self.pixel_color(world, x, y) {
                    Ok(color) => color,
                    Err(e) => match policy {
                        FailurePolicy::Abort => return Err(e),
                        FailurePolicy::Substitute(sentinel) => {
                            warn!("{}; substituting {:?}", e, sentinel);
                            *sentinel
                        },
                    },
                };

                image.write_pixel(x, y, &color);
            }
        }

        Ok(image)
    }
}

#[test]
fn pixel_size_horizontal_canvas() {
    let c = Camera::new(200, 125, std::f64::consts::PI / 2.0,
        Matrix4D::identity()).unwrap();

    assert!(crate::feq(c.pixel_size(), 0.01));
}

#[test]
fn pixel_size_vertical_canvas() {
    let c = Camera::new(125, 200, std::f64::consts::PI / 2.0,
        Matrix4D::identity()).unwrap();

    assert!(crate::feq(c.pixel_size(), 0.01));
}

#[test]
fn empty_canvas_is_rejected() {
    let c = Camera::new(0, 10, 1.0, Matrix4D::identity());

    assert!(matches!(c, Err(Error::EmptyCanvas { hsize: 0, vsize: 10 })));
}

#[test]
fn singular_camera_transform_is_rejected() {
    let c = Camera::new(10, 10, 1.0, Matrix4D::scaling(0.0, 1.0, 1.0));

    assert!(matches!(c, Err(Error::NonInvertible { .. })));
}

#[test]
fn ray_through_center() {
    let c = Camera::new(201, 101, std::f64::consts::PI / 2.0,
        Matrix4D::identity()).unwrap();
    let r = c.ray_for_pixel(100, 50);

    assert_eq!(r.origin, Tuple4D::point(0.0, 0.0, 0.0));
    assert_eq!(r.direction, Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn ray_through_corner() {
    let c = Camera::new(201, 101, std::f64::consts::PI / 2.0,
        Matrix4D::identity()).unwrap();
    let r = c.ray_for_pixel(0, 0);

    assert_eq!(r.origin, Tuple4D::point(0.0, 0.0, 0.0));
    assert_eq!(r.direction, Tuple4D::vector(0.66519, 0.33259, -0.66851));
}

#[test]
fn ray_when_camera_transformed() {
    let mut c = Camera::new(201, 101, std::f64::consts::PI / 2.0,
        Matrix4D::identity()).unwrap();
    c.set_transform(Matrix4D::rotation_y(std::f64::consts::PI / 4.0)
        * Matrix4D::translation(0.0, -2.0, 5.0)).unwrap();
    let r = c.ray_for_pixel(100, 50);

    assert_eq!(r.origin, Tuple4D::point(0.0, 2.0, -5.0));
    assert_eq!(r.direction,
        Tuple4D::vector(2.0f64.sqrt() / 2.0, 0.0, -(2.0f64.sqrt() / 2.0)));
}

#[test]
fn render_world_with_camera() {
    let w = World::default();
    let from = Tuple4D::point(0.0, 0.0, -5.0);
    let to = Tuple4D::point(0.0, 0.0, 0.0);
    let up = Tuple4D::vector(0.0, 1.0, 0.0);

    let c = Camera::new(11, 11, std::f64::consts::PI / 2.0,
        Matrix4D::view_transform(from, to, up)).unwrap();

    let image = c.render(&w).unwrap();
    let expected = w.color_at(&c.ray_for_pixel(5, 5));

    assert_eq!(image.read_pixel(5, 5).unwrap(), expected);
    assert_eq!(image.read_pixel(5, 5).unwrap(),
        Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn non_finite_pixel_fails_render() {
    let mut w = World::default();
    w.light.intensity = Color::rgb(f64::NAN, 1.0, 1.0);

    let c = Camera::new(11, 11, std::f64::consts::PI / 2.0,
        Matrix4D::translation(0.0, 0.0, -5.0)).unwrap();

    assert!(matches!(c.render(&w), Err(Error::NonFiniteColor { .. })));

    let magenta = Color::rgb(1.0, 0.0, 1.0);
    let image = c.render_with_policy(&w, &FailurePolicy::Substitute(magenta))
        .unwrap();
    assert_eq!(image.read_pixel(5, 5), Some(magenta));
    assert_eq!(image.read_pixel(0, 0), Some(Color::black()));
}
