use std::fmt;
use std::ops::{ Index, IndexMut, Mul };

use crate::feq;
use crate::consts::EPSILON;
use crate::error::{ Error, Result };
use crate::tuple::Tuple4D;

/// A 2x2 matrix. Only used as a step of the 3x3 cofactor expansion.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Matrix2D {
    data: [f64; 4],
}

impl From<[f64; 4]> for Matrix2D {
    fn from(data: [f64; 4]) -> Matrix2D {
        Matrix2D { data }
    }
}

impl Index<(usize, usize)> for Matrix2D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 2) + index.1]
    }
}

impl Matrix2D {
    fn determinant(&self) -> f64 {
        self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)]
    }
}

/// A 3x3 matrix. Only used as a step of the 4x4 cofactor expansion.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Matrix3D {
    data: [f64; 9],
}

impl From<[f64; 9]> for Matrix3D {
    fn from(data: [f64; 9]) -> Matrix3D {
        Matrix3D { data }
    }
}

impl Index<(usize, usize)> for Matrix3D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 3) + index.1]
    }
}

impl Matrix3D {
    /// Drops `row` and `col`, yielding the remaining 2x2 matrix.
    fn submatrix(&self, row: usize, col: usize) -> Matrix2D {
        let mut buf = [0.0; 4];
        let mut count = 0;

        for r in (0..3).filter(|&r| r != row) {
            for c in (0..3).filter(|&c| c != col) {
                buf[count] = self[(r, c)];
                count += 1;
            }
        }

        Matrix2D { data: buf }
    }

    fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    fn cofactor(&self, row: usize, col: usize) -> f64 {
        let m = self.minor(row, col);
        if (row + col) % 2 == 0 { m } else { -m }
    }

    fn determinant(&self) -> f64 {
        (0..3).map(|c| self[(0, c)] * self.cofactor(0, c)).sum()
    }
}

/// A 4x4 matrix.
///
/// Every transformation in the tracer is one of these: they move points
/// (`w == 1.0`) and vectors (`w == 0.0`) between world, object, pattern and
/// camera space. Matrices are plain values; every operation returns a new
/// matrix.
///
/// Transforms compose right-to-left. In `c * b * a`, `a` is applied first.
///
/// # Examples
///
/// ```
/// # use parallel_ray_tracer::tuple::Tuple4D;
/// # use parallel_ray_tracer::matrix::Matrix4D;
/// let a = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
/// let b = Matrix4D::scaling(5.0, 5.0, 5.0);
/// let c = Matrix4D::translation(10.0, 5.0, 7.0);
///
/// let p = Tuple4D::point(1.0, 0.0, 1.0);
/// assert_eq!(c * b * a * p, Tuple4D::point(15.0, 0.0, 7.0));
/// ```
#[derive(Copy, Clone, Debug, PartialOrd)]
pub struct Matrix4D {
    data: [f64; 16],
}

/// Matrices are compared element-wise, within `EPSILON`.
impl PartialEq for Matrix4D {
    fn eq(&self, other: &Matrix4D) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(x, y)| feq(*x, *y))
    }
}

impl Default for Matrix4D {
    fn default() -> Matrix4D {
        Matrix4D::identity()
    }
}

impl Matrix4D {
    /// Creates a matrix of zeros.
    pub fn zero() -> Matrix4D {
        Matrix4D { data: [0.0; 16] }
    }

    pub fn identity() -> Matrix4D {
        let mut buf = [0.0; 16];
        buf[0] = 1.0; buf[5] = 1.0; buf[10] = 1.0; buf[15] = 1.0;

        Matrix4D { data: buf }
    }

    /// Builds a matrix from 16 row-major values.
    ///
    /// Fails with `Error::MatrixSize` on any other element count.
    pub fn from_slice(values: &[f64]) -> Result<Matrix4D> {
        if values.len() != 16 {
            return Err(Error::MatrixSize { expected: 16, actual: values.len() });
        }

        let mut data = [0.0; 16];
        data.copy_from_slice(values);
        Ok(Matrix4D { data })
    }

    /// Offsets points by `x`, `y` and `z`. Vectors are unaffected.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut trans = Self::identity();
        trans[(0, 3)] = x;
        trans[(1, 3)] = y;
        trans[(2, 3)] = z;

        trans
    }

    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut scale = Self::identity();
        scale[(0, 0)] = x;
        scale[(1, 1)] = y;
        scale[(2, 2)] = z;

        scale
    }

    /// Rotates `r` radians about the X axis.
    ///
    /// ```
    /// # use parallel_ray_tracer::tuple::Tuple4D;
    /// # use parallel_ray_tracer::matrix::Matrix4D;
    /// let m = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
    /// assert_eq!(m * Tuple4D::point(0.0, 1.0, 0.0), Tuple4D::point(0.0, 0.0, 1.0));
    /// ```
    pub fn rotation_x(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(1, 1)] =  r.cos();
        rotate[(1, 2)] = -r.sin();
        rotate[(2, 1)] =  r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Rotates `r` radians about the Y axis.
    pub fn rotation_y(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 2)] =  r.sin();
        rotate[(2, 0)] = -r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Rotates `r` radians about the Z axis.
    pub fn rotation_z(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 1)] = -r.sin();
        rotate[(1, 0)] =  r.sin();
        rotate[(1, 1)] =  r.cos();

        rotate
    }

    /// Shears each axis in proportion to the other two.
    ///
    /// Parameter `xy` moves `x` in proportion to `y`, `xz` moves `x` in
    /// proportion to `z`, and so on.
    ///
    /// ```
    /// # use parallel_ray_tracer::tuple::Tuple4D;
    /// # use parallel_ray_tracer::matrix::Matrix4D;
    /// let m = Matrix4D::shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    /// assert_eq!(m * Tuple4D::point(2.0, 3.0, 4.0), Tuple4D::point(5.0, 3.0, 4.0));
    /// ```
    pub fn shearing(xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64)
        -> Matrix4D {
        let mut shear = Self::identity();
        shear[(0, 1)] = xy;
        shear[(0, 2)] = xz;
        shear[(1, 0)] = yx;
        shear[(1, 2)] = yz;
        shear[(2, 0)] = zx;
        shear[(2, 1)] = zy;

        shear
    }

    /// Orients the world relative to an eye at `from`, looking at `to`.
    ///
    /// The default orientation (identity) has the eye at the origin looking
    /// down negative Z with positive Y up. Note that the view transformation
    /// moves the *world*, not the eye.
    pub fn view_transform(from: Tuple4D, to: Tuple4D, up: Tuple4D) -> Matrix4D {
        let forward = (to - from).normalize();
        let left = forward.cross(&up.normalize());
        let true_up = left.cross(&forward);

        let orientation: Matrix4D = [
                 left.x,     left.y,     left.z, 0.0,
              true_up.x,  true_up.y,  true_up.z, 0.0,
             -forward.x, -forward.y, -forward.z, 0.0,
                    0.0,        0.0,        0.0, 1.0,
        ].into();

        orientation * Matrix4D::translation(-from.x, -from.y, -from.z)
    }

    /// Returns the transpose of this matrix.
    pub fn transpose(&self) -> Matrix4D {
        let mut res = Matrix4D::zero();

        for r in 0..4 {
            for c in 0..4 {
                res[(c, r)] = self[(r, c)];
            }
        }

        res
    }

    /// Drops `row` and `col`, yielding the remaining 3x3 matrix.
    fn submatrix(&self, row: usize, col: usize) -> Matrix3D {
        let mut buf = [0.0; 9];
        let mut count = 0;

        for r in (0..4).filter(|&r| r != row) {
            for c in (0..4).filter(|&c| c != col) {
                buf[count] = self[(r, c)];
                count += 1;
            }
        }

        Matrix3D { data: buf }
    }

    /// The determinant of the submatrix at `row` and `col`.
    pub fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    /// The minor at `row` and `col`, negated when `row + col` is odd.
    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let m = self.minor(row, col);
        if (row + col) % 2 == 0 { m } else { -m }
    }

    /// Cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        (0..4).map(|c| self[(0, c)] * self.cofactor(0, c)).sum()
    }

    /// True when `|determinant| > EPSILON`. A NaN determinant is never
    /// invertible.
    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() > EPSILON
    }

    /// Calculates the inverse of this matrix.
    ///
    /// Each cell of the inverse is the cofactor at the transposed index,
    /// divided by the determinant. Fails with `Error::NonInvertible` when
    /// `|determinant| <= EPSILON`.
    pub fn inverse(&self) -> Result<Matrix4D> {
        let determinant = self.determinant();
        if !(determinant.abs() > EPSILON) {
            return Err(Error::NonInvertible { determinant });
        }

        let mut inv = Matrix4D::zero();
        for r in 0..4 {
            for c in 0..4 {
                inv[(r, c)] = self.cofactor(c, r) / determinant;
            }
        }

        Ok(inv)
    }
}

impl From<[f64; 16]> for Matrix4D {
    fn from(data: [f64; 16]) -> Matrix4D {
        Matrix4D { data }
    }
}

impl Index<(usize, usize)> for Matrix4D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 4) + index.1]
    }
}

impl IndexMut<(usize, usize)> for Matrix4D {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[(index.0 * 4) + index.1]
    }
}

/// Matrix product. Not commutative in general.
impl Mul<Matrix4D> for Matrix4D {
    type Output = Matrix4D;

    fn mul(self, other: Matrix4D) -> Matrix4D {
        let mut res = Matrix4D::zero();

        for r in 0..4 {
            for c in 0..4 {
                res[(r, c)] = (0..4).map(|k| self[(r, k)] * other[(k, c)]).sum();
            }
        }

        res
    }
}

/// Transforms a tuple, treated as a column on the right.
impl Mul<Tuple4D> for Matrix4D {
    type Output = Tuple4D;

    fn mul(self, other: Tuple4D) -> Tuple4D {
        let row = |r: usize| {
            self[(r, 0)] * other.x
                + self[(r, 1)] * other.y
                + self[(r, 2)] * other.z
                + self[(r, 3)] * other.w
        };

        Tuple4D::tuple(row(0), row(1), row(2), row(3))
    }
}

impl fmt::Display for Matrix4D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            write!(f, "|")?;
            for c in 0..4 {
                write!(f, " {} |", self[(r, c)])?;
            }

            // No newline after the last row
            if r != 3 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[test]
fn from_slice_checks_length() {
    let values: Vec<f64> = (0..16).map(|v| v as f64).collect();
    let m = Matrix4D::from_slice(&values).unwrap();
    assert_eq!(m[(3, 2)], 14.0);

    match Matrix4D::from_slice(&values[..12]) {
        Err(Error::MatrixSize { expected: 16, actual: 12 }) => (),
        other => panic!("expected a size error, got {:?}", other),
    }
}

#[test]
fn multiply_matrices() {
    let a: Matrix4D = [ 1.0, 2.0, 3.0, 4.0,
                        5.0, 6.0, 7.0, 8.0,
                        9.0, 8.0, 7.0, 6.0,
                        5.0, 4.0, 3.0, 2.0, ].into();

    let b: Matrix4D = [ -2.0, 1.0, 2.0,  3.0,
                         3.0, 2.0, 1.0, -1.0,
                         4.0, 3.0, 6.0,  5.0,
                         1.0, 2.0, 7.0,  8.0, ].into();

    let p: Matrix4D = [ 20.0, 22.0,  50.0,  48.0,
                        44.0, 54.0, 114.0, 108.0,
                        40.0, 58.0, 110.0, 102.0,
                        16.0, 26.0,  46.0,  42.0, ].into();

    assert_eq!(a * b, p);
}

#[test]
fn multiply_matrix_by_tuple() {
    let a: Matrix4D = [ 1.0, 2.0, 3.0, 4.0,
                        2.0, 4.0, 4.0, 2.0,
                        8.0, 6.0, 4.0, 1.0,
                        0.0, 0.0, 0.0, 1.0, ].into();

    let b = Tuple4D::tuple(1.0, 2.0, 3.0, 1.0);

    assert_eq!(a * b, Tuple4D::tuple(18.0, 24.0, 33.0, 1.0));
}

#[test]
fn identity() {
    let i = Matrix4D::identity();
    let a: Matrix4D = [ 0.0, 1.0,  2.0,  4.0,
                        1.0, 2.0,  4.0,  8.0,
                        2.0, 4.0,  8.0, 16.0,
                        4.0, 8.0, 16.0, 32.0, ].into();
    let t = Tuple4D::tuple(1.0, 2.0, 3.0, 4.0);

    assert_eq!(i * a, a);
    assert_eq!(a * i, a);
    assert_eq!(i * t, t);
    assert_eq!(i.inverse().unwrap(), i);
}

#[test]
fn transpose() {
    let a: Matrix4D = [ 0.0, 9.0, 3.0, 0.0,
                        9.0, 8.0, 0.0, 8.0,
                        1.0, 8.0, 5.0, 3.0,
                        0.0, 0.0, 5.0, 8.0, ].into();

    let t: Matrix4D = [ 0.0, 9.0, 1.0, 0.0,
                        9.0, 8.0, 8.0, 0.0,
                        3.0, 0.0, 5.0, 5.0,
                        0.0, 8.0, 3.0, 8.0, ].into();

    assert_eq!(a.transpose(), t);
    assert_eq!(t.transpose(), a);
    assert_eq!(Matrix4D::identity().transpose(), Matrix4D::identity());
}

#[test]
fn mat2_determinant() {
    let a: Matrix2D = [ 1.0, 5.0,
                       -3.0, 2.0 ].into();

    assert_eq!(a.determinant(), 17.0);
}

#[test]
fn mat3_submatrix() {
    let a: Matrix3D = [  1.0, 5.0,  0.0,
                        -3.0, 2.0,  7.0,
                         0.0, 6.0, -3.0, ].into();

    let s: Matrix2D = [ -3.0, 2.0,
                         0.0, 6.0  ].into();

    assert_eq!(a.submatrix(0, 2), s);
}

#[test]
fn mat4_submatrix() {
    let a: Matrix4D = [ -6.0, 1.0,  1.0, 6.0,
                        -8.0, 5.0,  8.0, 6.0,
                        -1.0, 0.0,  8.0, 2.0,
                        -7.0, 1.0, -1.0, 1.0, ].into();

    let s: Matrix3D = [ -6.0,  1.0, 6.0,
                        -8.0,  8.0, 6.0,
                        -7.0, -1.0, 1.0, ].into();

    assert_eq!(a.submatrix(2, 1), s);
}

#[test]
fn mat3_minor_and_cofactor() {
    let a: Matrix3D = [ 3.0,  5.0,  0.0,
                        2.0, -1.0, -7.0,
                        6.0, -1.0,  5.0, ].into();

    assert_eq!(a.minor(0, 0), -12.0);
    assert_eq!(a.cofactor(0, 0), -12.0);
    assert_eq!(a.minor(1, 0), 25.0);
    assert_eq!(a.cofactor(1, 0), -25.0);
}

#[test]
fn mat3_determinant() {
    let a: Matrix3D = [  1.0, 2.0,  6.0,
                        -5.0, 8.0, -4.0,
                         2.0, 6.0,  4.0, ].into();

    assert_eq!(a.cofactor(0, 0), 56.0);
    assert_eq!(a.cofactor(0, 1), 12.0);
    assert_eq!(a.cofactor(0, 2), -46.0);
    assert_eq!(a.determinant(), -196.0);
}

#[test]
fn mat4_determinant() {
    let a: Matrix4D = [ -2.0, -8.0,  3.0,  5.0,
                        -3.0,  1.0,  7.0,  3.0,
                         1.0,  2.0, -9.0,  6.0,
                        -6.0,  7.0,  7.0, -9.0, ].into();

    assert_eq!(a.cofactor(0, 0), 690.0);
    assert_eq!(a.cofactor(0, 1), 447.0);
    assert_eq!(a.cofactor(0, 2), 210.0);
    assert_eq!(a.cofactor(0, 3), 51.0);
    assert_eq!(a.determinant(), -4071.0);
}

#[test]
fn invertibility() {
    let invertible: Matrix4D = [ 6.0,  4.0, 4.0,  4.0,
                                 5.0,  5.0, 7.0,  6.0,
                                 4.0, -9.0, 3.0, -7.0,
                                 9.0,  1.0, 7.0, -6.0, ].into();

    let singular: Matrix4D = [ -4.0,  2.0, -2.0, -3.0,
                                9.0,  6.0,  2.0,  6.0,
                                0.0, -5.0,  1.0, -5.0,
                                0.0,  0.0,  0.0,  0.0, ].into();

    assert_eq!(invertible.determinant(), -2120.0);
    assert!(invertible.is_invertible());

    assert_eq!(singular.determinant(), 0.0);
    assert!(!singular.is_invertible());
    assert!(matches!(singular.inverse(), Err(Error::NonInvertible { .. })));
}

#[test]
fn degenerate_scale_is_not_invertible() {
    let m = Matrix4D::scaling(1.0, 0.0, 1.0);

    assert!(matches!(m.inverse(), Err(Error::NonInvertible { .. })));
}

#[test]
fn nan_matrix_is_not_invertible() {
    let m = Matrix4D::scaling(f64::NAN, 1.0, 1.0);

    assert!(!m.is_invertible());
    assert!(m.inverse().is_err());
}

#[test]
fn mat4_inverse() {
    let a: Matrix4D = [ -5.0,  2.0,  6.0, -8.0,
                         1.0, -5.0,  1.0,  8.0,
                         7.0,  7.0, -6.0, -7.0,
                         1.0, -3.0,  7.0,  4.0, ].into();

    let i: Matrix4D = [  0.21805,  0.45113,  0.24060, -0.04511,
                        -0.80827, -1.45677, -0.44361,  0.52068,
                        -0.07895, -0.22368, -0.05263,  0.19737,
                        -0.52256, -0.81391, -0.30075,  0.30639, ].into();

    let b = a.inverse().unwrap();
    assert_eq!(a.determinant(), 532.0);
    assert_eq!(a.cofactor(2, 3), -160.0);
    assert_eq!(b[(3, 2)], -160.0 / 532.0);
    assert_eq!(a.cofactor(3, 2), 105.0);
    assert_eq!(b[(2, 3)], 105.0 / 532.0);
    assert_eq!(b, i);
}

#[test]
fn mat4_inverse_other() {
    let a: Matrix4D = [  8.0, -5.0,  9.0,  2.0,
                         7.0,  5.0,  6.0,  1.0,
                        -6.0,  0.0,  9.0,  6.0,
                        -3.0,  0.0, -9.0, -4.0, ].into();

    let i: Matrix4D = [ -0.15385, -0.15385, -0.28205, -0.53846,
                        -0.07692,  0.12308,  0.02564,  0.03077,
                         0.35897,  0.35897,  0.43590,  0.92308,
                        -0.69231, -0.69231, -0.76923, -1.92308, ].into();

    assert_eq!(a.inverse().unwrap(), i);
}

#[test]
fn mat4_inverse_mult() {
    let a: Matrix4D = [  3.0, -9.0,  7.0,  3.0,
                         3.0,  8.0,  2.0, -9.0,
                        -4.0,  4.0,  4.0,  1.0,
                        -6.0,  5.0, -1.0,  1.0, ].into();

    let b: Matrix4D = [ 8.0,  2.0, 2.0, 2.0,
                        3.0, -1.0, 7.0, 0.0,
                        7.0,  0.0, 5.0, 4.0,
                        6.0, -2.0, 0.0, 5.0  ].into();

    let c = a * b;

    assert_eq!(c * b.inverse().unwrap(), a);
}

#[test]
fn inverse_undoes_transform() {
    let transforms = [
        Matrix4D::translation(5.0, -3.0, 2.0),
        Matrix4D::scaling(2.0, 3.0, 4.0),
        Matrix4D::rotation_x(0.3) * Matrix4D::rotation_z(1.2),
        Matrix4D::shearing(1.0, 0.0, 0.5, 0.0, 0.0, 0.25),
        Matrix4D::translation(1.0, 2.0, 3.0)
            * Matrix4D::rotation_y(-0.7)
            * Matrix4D::scaling(0.5, 2.0, 1.5),
    ];
    let p = Tuple4D::point(-3.0, 4.0, 5.0);

    for t in transforms.iter() {
        assert_eq!(t.inverse().unwrap() * (*t * p), p);
    }
}

#[test]
fn mat4_translation() {
    let transform = Matrix4D::translation(5.0, -3.0, 2.0);
    let point = Tuple4D::point(-3.0, 4.0, 5.0);
    let vector = Tuple4D::vector(-3.0, 4.0, 5.0);

    assert_eq!(transform * point, Tuple4D::point(2.0, 1.0, 7.0));
    assert_eq!(transform.inverse().unwrap() * point,
        Tuple4D::point(-8.0, 7.0, 3.0));
    assert_eq!(transform * vector, vector);
}

#[test]
fn mat4_scaling() {
    let transform = Matrix4D::scaling(2.0, 3.0, 4.0);
    let vector = Tuple4D::vector(-4.0, 6.0, 8.0);

    assert_eq!(transform * vector, Tuple4D::vector(-8.0, 18.0, 32.0));
    assert_eq!(transform.inverse().unwrap() * vector,
        Tuple4D::vector(-2.0, 2.0, 2.0));
    assert_eq!(Matrix4D::scaling(-1.0, 1.0, 1.0) * Tuple4D::point(2.0, 3.0, 4.0),
        Tuple4D::point(-2.0, 3.0, 4.0));
}

#[test]
fn mat4_rotations() {
    let half = std::f64::consts::PI / 4.0;
    let full = std::f64::consts::PI / 2.0;
    let s = 2.0f64.sqrt() / 2.0;

    let p = Tuple4D::point(0.0, 1.0, 0.0);
    assert_eq!(Matrix4D::rotation_x(half) * p, Tuple4D::point(0.0, s, s));
    assert_eq!(Matrix4D::rotation_x(full) * p, Tuple4D::point(0.0, 0.0, 1.0));
    assert_eq!(Matrix4D::rotation_x(half).inverse().unwrap() * p,
        Tuple4D::point(0.0, s, -s));

    let p = Tuple4D::point(0.0, 0.0, 1.0);
    assert_eq!(Matrix4D::rotation_y(half) * p, Tuple4D::point(s, 0.0, s));
    assert_eq!(Matrix4D::rotation_y(full) * p, Tuple4D::point(1.0, 0.0, 0.0));

    let p = Tuple4D::point(0.0, 1.0, 0.0);
    assert_eq!(Matrix4D::rotation_z(half) * p, Tuple4D::point(-s, s, 0.0));
    assert_eq!(Matrix4D::rotation_z(full) * p, Tuple4D::point(-1.0, 0.0, 0.0));
}

#[test]
fn mat4_shearing() {
    let p = Tuple4D::point(2.0, 3.0, 4.0);

    assert_eq!(Matrix4D::shearing(0.0, 1.0, 0.0, 0.0, 0.0, 0.0) * p,
        Tuple4D::point(6.0, 3.0, 4.0));
    assert_eq!(Matrix4D::shearing(0.0, 0.0, 1.0, 0.0, 0.0, 0.0) * p,
        Tuple4D::point(2.0, 5.0, 4.0));
    assert_eq!(Matrix4D::shearing(0.0, 0.0, 0.0, 1.0, 0.0, 0.0) * p,
        Tuple4D::point(2.0, 7.0, 4.0));
    assert_eq!(Matrix4D::shearing(0.0, 0.0, 0.0, 0.0, 1.0, 0.0) * p,
        Tuple4D::point(2.0, 3.0, 6.0));
    assert_eq!(Matrix4D::shearing(0.0, 0.0, 0.0, 0.0, 0.0, 1.0) * p,
        Tuple4D::point(2.0, 3.0, 7.0));
}

#[test]
fn chained_transforms_apply_in_sequence() {
    let a = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
    let b = Matrix4D::scaling(5.0, 5.0, 5.0);
    let c = Matrix4D::translation(10.0, 5.0, 7.0);
    let p = Tuple4D::point(1.0, 0.0, 1.0);

    let p2 = a * p;
    assert_eq!(p2, Tuple4D::point(1.0, -1.0, 0.0));
    let p3 = b * p2;
    assert_eq!(p3, Tuple4D::point(5.0, -5.0, 0.0));
    let p4 = c * p3;
    assert_eq!(p4, Tuple4D::point(15.0, 0.0, 7.0));
}

#[test]
fn default_view() {
    let from = Tuple4D::point(0.0, 0.0, 0.0);
    let to = Tuple4D::point(0.0, 0.0, -1.0);
    let up = Tuple4D::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix4D::view_transform(from, to, up), Matrix4D::identity());
}

#[test]
fn positive_z_view() {
    let from = Tuple4D::point(0.0, 0.0, 0.0);
    let to = Tuple4D::point(0.0, 0.0, 1.0);
    let up = Tuple4D::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix4D::view_transform(from, to, up),
        Matrix4D::scaling(-1.0, 1.0, -1.0));
}

#[test]
fn view_moves_world() {
    let from = Tuple4D::point(0.0, 0.0, 8.0);
    let to = Tuple4D::point(0.0, 0.0, 0.0);
    let up = Tuple4D::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix4D::view_transform(from, to, up),
        Matrix4D::translation(0.0, 0.0, -8.0));
}

#[test]
fn arbitrary_view() {
    let from = Tuple4D::point(1.0, 3.0, 2.0);
    let to = Tuple4D::point(4.0, -2.0, 8.0);
    let up = Tuple4D::vector(1.0, 1.0, 0.0);

    let a: Matrix4D = [ -0.50709, 0.50709,  0.67612, -2.36643,
                         0.76772, 0.60609,  0.12122, -2.82843,
                        -0.35857, 0.59761, -0.71714,  0.00000,
                         0.00000, 0.00000,  0.00000,  1.00000, ].into();

    assert_eq!(Matrix4D::view_transform(from, to, up), a);
}

#[test]
fn display_rows() {
    let s = format!("{}", Matrix4D::identity());

    assert_eq!(s.lines().count(), 4);
    assert!(s.starts_with("| 1 | 0 | 0 | 0 |"));
}
