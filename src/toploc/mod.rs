//! Topological location (rigid placement).
//!
//! A Location is a rotation followed by a translation. It places shapes,
//! planes and axes in space. Orientation is reported as XYZ Euler angles
//! in degrees: `(a, b, c)` is the rotation `Rx(a) * Ry(b) * Rz(c)`.

use std::fmt;
use std::ops::{Mul, Neg};

use nalgebra::{Isometry3, Matrix3, Rotation3, Translation3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::gp::{Axis, Matrix, Plane, Vector};
use crate::precision;
use crate::{CadError, Result};

/// A rigid transform (rotation + translation).
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Location {
    iso: Isometry3<f64>,
}

impl Default for Location {
    fn default() -> Self {
        Self::new()
    }
}

impl Location {
    /// Creates an identity location.
    pub fn new() -> Self {
        Self {
            iso: Isometry3::identity(),
        }
    }

    /// Creates a pure translation.
    pub fn from_position(position: impl Into<Vector>) -> Self {
        let p = position.into();
        Self {
            iso: Isometry3::from_parts(Translation3::new(p.x, p.y, p.z), UnitQuaternion::identity()),
        }
    }

    /// Rotates `angle` degrees about `direction`, then translates to `position`.
    ///
    /// Fails with `DegenerateGeometry` if `direction` has zero length.
    pub fn from_axis_angle(
        position: impl Into<Vector>,
        direction: impl Into<Vector>,
        angle: f64,
    ) -> Result<Self> {
        let dir = direction.into().normalized().map_err(|_| {
            CadError::DegenerateGeometry("rotation direction has zero length".into())
        })?;
        let rotation = UnitQuaternion::from_axis_angle(&Unit::new_unchecked(dir.to_na()), angle.to_radians());
        Ok(Self::from_parts(position.into(), rotation))
    }

    /// Rotates `angle` degrees about Z, then translates to `position`.
    pub fn from_angle_z(position: impl Into<Vector>, angle: f64) -> Self {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle.to_radians());
        Self::from_parts(position.into(), rotation)
    }

    /// Creates a location from a position and XYZ Euler angles in degrees.
    pub fn from_euler(position: impl Into<Vector>, angles: [f64; 3]) -> Self {
        Self::from_parts(position.into(), euler_to_quaternion(angles))
    }

    /// Creates a location from an affine matrix.
    ///
    /// Fails with `InvalidValue` unless the matrix is rigid (orthonormal,
    /// right-handed, unscaled).
    pub fn from_matrix(m: &Matrix) -> Result<Self> {
        let h = m.as_na();
        let linear: Matrix3<f64> = h.fixed_view::<3, 3>(0, 0).into_owned();
        let gram = linear.transpose() * linear;
        let orthonormal = (gram - Matrix3::identity()).abs().max() <= precision::TOLERANCE;
        if !orthonormal || linear.determinant() <= 0.0 {
            return Err(CadError::InvalidValue(
                "location requires a rigid transform matrix".into(),
            ));
        }
        let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(linear));
        let position = Vector::new(h[(0, 3)], h[(1, 3)], h[(2, 3)]);
        Ok(Self::from_parts(position, rotation))
    }

    /// Creates the location of a plane's frame.
    #[inline]
    pub fn from_plane(plane: &Plane) -> Self {
        plane.location()
    }

    /// Creates the plane's frame moved to `offset`, given in plane coordinates.
    pub fn from_plane_offset(plane: &Plane, offset: impl Into<Vector>) -> Self {
        let mut loc = plane.location();
        loc.set_position(plane.from_local_coords(&offset.into()));
        loc
    }

    /// Creates the location whose local axes are the given unit vectors.
    pub(crate) fn from_frame(origin: Vector, x_dir: Vector, y_dir: Vector, z_dir: Vector) -> Self {
        let basis = Matrix3::from_columns(&[x_dir.to_na(), y_dir.to_na(), z_dir.to_na()]);
        let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis));
        Self::from_parts(origin, rotation)
    }

    fn from_parts(position: Vector, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            iso: Isometry3::from_parts(Translation3::new(position.x, position.y, position.z), rotation),
        }
    }

    /// Returns the translation part.
    #[inline]
    pub fn position(&self) -> Vector {
        Vector::from(self.iso.translation.vector)
    }

    /// Replaces the translation, keeping the rotation.
    pub fn set_position(&mut self, position: impl Into<Vector>) {
        let p = position.into();
        self.iso.translation = Translation3::new(p.x, p.y, p.z);
    }

    /// Returns the rotation as XYZ Euler angles in degrees.
    ///
    /// At gimbal lock (`b = ±90`) the first angle is reported as 0.
    pub fn orientation(&self) -> Vector {
        let r = self.iso.rotation.to_rotation_matrix();
        let m = r.matrix();
        // cleaned so that rounding noise never flips an atan2 across the branch cut
        let at = |row: usize, col: usize| precision::clean(m[(row, col)]);
        let neg = |row: usize, col: usize| precision::clean(-m[(row, col)]);
        let cos_b = (at(0, 0).powi(2) + at(0, 1).powi(2)).sqrt();
        let b = at(0, 2).atan2(cos_b);
        let (a, c) = if cos_b > 1e-9 {
            (neg(1, 2).atan2(at(2, 2)), neg(0, 1).atan2(at(0, 0)))
        } else {
            (0.0, at(1, 0).atan2(at(1, 1)))
        };
        Vector::new(
            precision::clean(a.to_degrees()),
            precision::clean(b.to_degrees()),
            precision::clean(c.to_degrees()),
        )
    }

    /// Replaces the rotation with XYZ Euler `angles`, keeping the translation.
    pub fn set_orientation(&mut self, angles: [f64; 3]) {
        self.iso.rotation = euler_to_quaternion(angles);
    }

    /// Returns the inverse placement.
    #[inline]
    pub fn inverse(&self) -> Location {
        Location {
            iso: self.iso.inverse(),
        }
    }

    /// Returns this location composed with itself `n` times.
    ///
    /// Negative powers compose the inverse; `pow(0)` is the identity.
    pub fn pow(&self, n: i32) -> Location {
        let base = if n < 0 { self.inverse() } else { *self };
        (0..n.unsigned_abs()).fold(Location::new(), |acc, _| acc * base)
    }

    /// Returns true if this is the identity within tolerance.
    pub fn is_identity(&self) -> bool {
        *self == Location::new()
    }

    /// Returns the axis through the position along the local Z.
    pub fn to_axis(&self) -> Axis {
        Axis::from_unit(self.position(), self.transform_vector(&Vector::Z))
    }

    /// Returns `(position, orientation)` as tuples.
    pub fn to_tuple(&self) -> ((f64, f64, f64), (f64, f64, f64)) {
        (self.position().to_tuple(), self.orientation().to_tuple())
    }

    /// Returns the equivalent affine matrix.
    pub fn to_matrix(&self) -> Matrix {
        Matrix::from_affine(self.iso.to_homogeneous())
    }

    /// Applies rotation and translation to a point.
    #[inline]
    pub fn transform_point(&self, p: &Vector) -> Vector {
        Vector::from(self.iso.transform_point(&p.to_point()))
    }

    /// Applies the rotation only.
    #[inline]
    pub fn transform_vector(&self, v: &Vector) -> Vector {
        Vector::from(self.iso.transform_vector(&v.to_na()))
    }
}

fn euler_to_quaternion(angles: [f64; 3]) -> UnitQuaternion<f64> {
    let [a, b, c] = angles;
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), a.to_radians())
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), b.to_radians())
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), c.to_radians())
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position()
            && self.iso.rotation.angle_to(&other.iso.rotation) <= precision::TOLERANCE
    }
}

impl From<&Location> for Matrix {
    fn from(loc: &Location) -> Matrix {
        loc.to_matrix()
    }
}

impl From<&Plane> for Location {
    fn from(plane: &Plane) -> Location {
        plane.location()
    }
}

impl Mul for Location {
    type Output = Location;

    /// `a * b` applies `b` first, then `a`.
    fn mul(self, other: Location) -> Location {
        Location {
            iso: self.iso * other.iso,
        }
    }
}

impl Mul<&Location> for &Location {
    type Output = Location;

    fn mul(self, other: &Location) -> Location {
        *self * *other
    }
}

impl Neg for Location {
    type Output = Location;

    /// Flips the local Z, keeping position and local X.
    fn neg(self) -> Location {
        (-Plane::from_location(&self)).location()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position();
        let o = self.orientation();
        write!(
            f,
            "Location: (position=({:.2}, {:.2}, {:.2}), orientation=({:.2}, {:.2}, {:.2}))",
            precision::clean(p.x),
            precision::clean(p.y),
            precision::clean(p.z),
            o.x,
            o.y,
            o.z
        )
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position();
        let o = self.orientation();
        write!(
            f,
            "(p=({:.2}, {:.2}, {:.2}), o=({:.2}, {:.2}, {:.2}))",
            precision::clean(p.x),
            precision::clean(p.y),
            precision::clean(p.z),
            o.x,
            o.y,
            o.z
        )
    }
}
