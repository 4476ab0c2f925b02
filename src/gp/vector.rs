//! 3D vector (point or direction).
//!
//! A single type stands in for both points and free vectors; which one a
//! value means depends on the operation it is passed to.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub, SubAssign};

use nalgebra::{Point3, Rotation3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use super::{Axis, Matrix, Plane};
use crate::precision;
use crate::{CadError, Result};

/// A 3D vector with public, mutable components.
///
/// Equality is tolerance based: see [`precision::TOLERANCE`].
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0.0, 0.0, 0.0);
    pub const X: Vector = Vector::new(1.0, 0.0, 0.0);
    pub const Y: Vector = Vector::new(0.0, 1.0, 0.0);
    pub const Z: Vector = Vector::new(0.0, 0.0, 1.0);

    /// Creates a vector from components.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector in the XY plane.
    #[inline]
    pub const fn from_xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Creates a vector from 1 to 3 components; missing ones are zero.
    pub fn from_slice(components: &[f64]) -> Result<Self> {
        match *components {
            [x] => Ok(Self::new(x, 0.0, 0.0)),
            [x, y] => Ok(Self::new(x, y, 0.0)),
            [x, y, z] => Ok(Self::new(x, y, z)),
            _ => Err(CadError::MalformedInput(format!(
                "a vector takes 1 to 3 components, got {}",
                components.len()
            ))),
        }
    }

    #[inline]
    pub const fn to_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }

    #[inline]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Iterates over x, y, z in order.
    #[inline]
    pub fn iter(&self) -> std::array::IntoIter<f64, 3> {
        self.to_array().into_iter()
    }

    /// Returns the magnitude.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline]
    pub fn dot(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: &Vector) -> Vector {
        Vector::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Returns the unit vector in the same direction.
    ///
    /// Fails with `DegenerateGeometry` on a zero-length vector.
    pub fn normalized(&self) -> Result<Vector> {
        let len = self.length();
        if len <= precision::RESOLUTION {
            return Err(CadError::DegenerateGeometry(
                "cannot normalize a zero-length vector".into(),
            ));
        }
        Ok(*self / len)
    }

    /// Reverses direction in place.
    #[inline]
    pub fn reverse(&mut self) {
        *self = -*self;
    }

    /// Returns the reversed vector.
    #[inline]
    pub fn reversed(&self) -> Vector {
        -*self
    }

    /// Returns the distance between two points.
    #[inline]
    pub fn distance(&self, other: &Vector) -> f64 {
        (*self - *other).length()
    }

    /// Returns the unsigned angle to `other` in degrees, in `[0, 180]`.
    ///
    /// A zero-length operand gives 0.
    pub fn get_angle(&self, other: &Vector) -> f64 {
        self.cross(other).length().atan2(self.dot(other)).to_degrees()
    }

    /// Returns the angle to `other` in degrees, in `[-180, 180]`.
    ///
    /// The sign is positive when `self × other` points along `normal`.
    /// Without a normal, [`precision::DEFAULT_ANGLE_NORMAL`] is used.
    pub fn get_signed_angle(&self, other: &Vector, normal: Option<Vector>) -> f64 {
        let normal = normal.unwrap_or(precision::DEFAULT_ANGLE_NORMAL);
        let angle = self.get_angle(other);
        if self.cross(other).dot(&normal) < 0.0 {
            -angle
        } else {
            angle
        }
    }

    /// Rotates this point about `axis` by `angle` degrees.
    ///
    /// The axis need not pass through the origin.
    pub fn rotate(&self, axis: &Axis, angle: f64) -> Vector {
        let dir = Unit::new_unchecked(axis.direction().to_na());
        let rot = Rotation3::from_axis_angle(&dir, angle.to_radians());
        let local = (*self - axis.position()).to_na();
        Vector::from(rot * local) + axis.position()
    }

    /// Projects onto the line through the origin with direction `line`.
    pub fn project_to_line(&self, line: &Vector) -> Result<Vector> {
        let dir = line.normalized().map_err(|_| {
            CadError::DegenerateGeometry("cannot project onto a zero-length line".into())
        })?;
        Ok(dir * self.dot(&dir))
    }

    /// Projects this point onto `plane`.
    pub fn project_to_plane(&self, plane: &Plane) -> Vector {
        *self - plane.z_dir() * self.signed_distance_from_plane(plane)
    }

    /// Distance above (positive) or below (negative) `plane`.
    #[inline]
    pub fn signed_distance_from_plane(&self, plane: &Plane) -> f64 {
        (*self - plane.origin()).dot(&plane.z_dir())
    }

    #[inline]
    pub fn distance_to_plane(&self, plane: &Plane) -> f64 {
        self.signed_distance_from_plane(plane).abs()
    }

    /// Applies the affine map `m` to this point.
    pub fn transform(&self, m: &Matrix) -> Vector {
        m.multiply_vector(self)
    }

    /// Returns true if equal to `other` within `tol` (scaled by magnitude).
    pub fn is_equal_within(&self, other: &Vector, tol: f64) -> bool {
        let scale = 1.0 + self.length().max(other.length());
        (*self - *other).length() <= tol * scale
    }

    /// Returns true if parallel or anti-parallel within `angular_tol` degrees.
    pub fn is_parallel_within(&self, other: &Vector, angular_tol: f64) -> bool {
        let angle = self.get_angle(other);
        angle <= angular_tol || 180.0 - angle <= angular_tol
    }

    #[inline]
    pub(crate) fn to_na(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub(crate) fn to_point(self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal_within(other, precision::TOLERANCE)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector: ({:?}, {:?}, {:?})", self.x, self.y, self.z)
    }
}

impl From<(f64, f64, f64)> for Vector {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Vector::new(x, y, z)
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Vector::from_xy(x, y)
    }
}

impl From<[f64; 3]> for Vector {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Vector::new(x, y, z)
    }
}

impl From<Vector3<f64>> for Vector {
    fn from(v: Vector3<f64>) -> Self {
        Vector::new(v.x, v.y, v.z)
    }
}

impl From<Point3<f64>> for Vector {
    fn from(p: Point3<f64>) -> Self {
        Vector::new(p.x, p.y, p.z)
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector index {index} out of range"),
        }
    }
}

impl IntoIterator for Vector {
    type Item = f64;
    type IntoIter = std::array::IntoIter<f64, 3>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Add for Vector {
    type Output = Vector;

    #[inline]
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector {
    type Output = Vector;

    #[inline]
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl AddAssign for Vector {
    #[inline]
    fn add_assign(&mut self, rhs: Vector) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector {
    #[inline]
    fn sub_assign(&mut self, rhs: Vector) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    #[inline]
    fn mul(self, s: f64) -> Vector {
        Vector::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;

    #[inline]
    fn mul(self, v: Vector) -> Vector {
        v * self
    }
}

impl Div<f64> for Vector {
    type Output = Vector;

    #[inline]
    fn div(self, s: f64) -> Vector {
        Vector::new(self.x / s, self.y / s, self.z / s)
    }
}

impl Neg for Vector {
    type Output = Vector;

    #[inline]
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z)
    }
}

impl Sum for Vector {
    fn sum<I: Iterator<Item = Vector>>(iter: I) -> Vector {
        iter.fold(Vector::ZERO, |acc, v| acc + v)
    }
}
