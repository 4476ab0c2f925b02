//! Plane (origin + right-handed orthonormal basis).
//!
//! A plane doubles as a local coordinate frame: `x_dir` and `y_dir` span
//! the plane and `z_dir` is its normal, with `y_dir = z_dir × x_dir`.

use std::fmt;
use std::ops::{Mul, Neg};

use serde::{Deserialize, Serialize};

use super::{Axis, Transform, Vector};
use crate::brep::{Shape, ShapeKind};
use crate::precision;
use crate::toploc::Location;
use crate::{CadError, Result};

/// A coordinate frame whose XY plane is the geometric plane.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(try_from = "PlaneRepr")]
pub struct Plane {
    origin: Vector,
    x_dir: Vector,
    y_dir: Vector,
    z_dir: Vector,
}

/// Wire form of [`Plane`].
///
/// The stored basis must already be right-handed and orthonormal; it is
/// rejected rather than silently repaired.
#[derive(Deserialize)]
struct PlaneRepr {
    origin: Vector,
    x_dir: Vector,
    y_dir: Vector,
    z_dir: Vector,
}

impl TryFrom<PlaneRepr> for Plane {
    type Error = CadError;

    fn try_from(repr: PlaneRepr) -> Result<Self> {
        let unit = |v: &Vector| (v.length() - 1.0).abs() <= precision::TOLERANCE;
        let orthonormal = unit(&repr.x_dir)
            && unit(&repr.y_dir)
            && unit(&repr.z_dir)
            && repr.x_dir.dot(&repr.z_dir).abs() <= precision::TOLERANCE
            && repr.z_dir.cross(&repr.x_dir) == repr.y_dir;
        if !orthonormal {
            return Err(CadError::InvalidValue(
                "plane basis is not right-handed orthonormal".into(),
            ));
        }
        Plane::new(repr.origin, Some(repr.x_dir), Some(repr.z_dir))
    }
}

const fn basis(x: (f64, f64, f64), y: (f64, f64, f64), z: (f64, f64, f64)) -> Plane {
    Plane {
        origin: Vector::ZERO,
        x_dir: Vector::new(x.0, x.1, x.2),
        y_dir: Vector::new(y.0, y.1, y.2),
        z_dir: Vector::new(z.0, z.1, z.2),
    }
}

impl Plane {
    pub const XY: Plane = basis((1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 0.0, 1.0));
    pub const YZ: Plane = basis((0.0, 1.0, 0.0), (0.0, 0.0, 1.0), (1.0, 0.0, 0.0));
    pub const ZX: Plane = basis((0.0, 0.0, 1.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0));
    pub const XZ: Plane = basis((1.0, 0.0, 0.0), (0.0, 0.0, 1.0), (0.0, -1.0, 0.0));
    pub const YX: Plane = basis((0.0, 1.0, 0.0), (1.0, 0.0, 0.0), (0.0, 0.0, -1.0));
    pub const ZY: Plane = basis((0.0, 0.0, 1.0), (0.0, 1.0, 0.0), (-1.0, 0.0, 0.0));
    pub const FRONT: Plane = Plane::XZ;
    pub const BACK: Plane = basis((-1.0, 0.0, 0.0), (0.0, 0.0, 1.0), (0.0, 1.0, 0.0));
    pub const LEFT: Plane = basis((0.0, -1.0, 0.0), (0.0, 0.0, 1.0), (-1.0, 0.0, 0.0));
    pub const RIGHT: Plane = basis((0.0, 1.0, 0.0), (0.0, 0.0, 1.0), (1.0, 0.0, 0.0));
    pub const TOP: Plane = Plane::XY;
    pub const BOTTOM: Plane = basis((1.0, 0.0, 0.0), (0.0, -1.0, 0.0), (0.0, 0.0, -1.0));

    /// Creates a plane.
    ///
    /// `z_dir` defaults to `+Z`. Without `x_dir` one is derived from `z_dir`;
    /// with it, `x_dir` is made orthogonal to `z_dir` (Gram-Schmidt, keeping
    /// `z_dir`). Fails with `DegenerateGeometry` if either direction has zero
    /// length or `x_dir` is parallel to `z_dir`.
    pub fn new(
        origin: impl Into<Vector>,
        x_dir: Option<Vector>,
        z_dir: Option<Vector>,
    ) -> Result<Self> {
        let origin = origin.into();
        let z_dir = z_dir
            .unwrap_or(Vector::Z)
            .normalized()
            .map_err(|_| CadError::DegenerateGeometry("plane z_dir has zero length".into()))?;
        match x_dir {
            None => Ok(Self::with_normal(origin, z_dir)),
            Some(x_dir) => {
                let x_dir = x_dir.normalized().map_err(|_| {
                    CadError::DegenerateGeometry("plane x_dir has zero length".into())
                })?;
                let x_dir = x_dir - z_dir * x_dir.dot(&z_dir);
                if x_dir.length() <= precision::CONFUSION {
                    return Err(CadError::DegenerateGeometry(
                        "plane x_dir is parallel to z_dir".into(),
                    ));
                }
                Ok(Self::from_unit_basis(origin, x_dir.normalized()?, z_dir))
            }
        }
    }

    /// Builds a plane from a unit normal, deriving `x_dir`.
    ///
    /// The derived direction zeroes the smallest component of `z_dir` and
    /// swaps the other two, so `+Z` gets `x_dir = +X` and `+X` gets `+Z`.
    pub(crate) fn with_normal(origin: Vector, z_dir: Vector) -> Self {
        let (a, b, c) = z_dir.to_tuple();
        let (aa, ba, ca) = (a.abs(), b.abs(), c.abs());
        let x_dir = if ba <= aa && ba <= ca {
            if aa > ca {
                Vector::new(-c, 0.0, a)
            } else {
                Vector::new(c, 0.0, -a)
            }
        } else if aa <= ba && aa <= ca {
            if ba > ca {
                Vector::new(0.0, -c, b)
            } else {
                Vector::new(0.0, c, -b)
            }
        } else if aa > ba {
            Vector::new(-b, a, 0.0)
        } else {
            Vector::new(b, -a, 0.0)
        };
        let x_dir = x_dir / x_dir.length();
        Self::from_unit_basis(origin, x_dir, z_dir)
    }

    #[inline]
    fn from_unit_basis(origin: Vector, x_dir: Vector, z_dir: Vector) -> Self {
        Self {
            origin,
            x_dir,
            y_dir: z_dir.cross(&x_dir),
            z_dir,
        }
    }

    /// Creates the frame described by a location.
    pub fn from_location(loc: &Location) -> Self {
        let x_dir = loc.transform_vector(&Vector::X);
        let z_dir = loc.transform_vector(&Vector::Z);
        Self::from_unit_basis(loc.position(), x_dir, z_dir)
    }

    /// Creates the plane of a planar face: its center, normal and surface x direction.
    pub fn from_face(face: &Shape) -> Result<Self> {
        let frame = Self::face_frame(face)?;
        Ok(Self::from_unit_basis(face.center(), frame.x_dir, frame.z_dir))
    }

    /// Like [`Plane::from_face`] with a caller-given in-plane x direction.
    pub fn from_face_with_x_dir(face: &Shape, x_dir: Vector) -> Result<Self> {
        let frame = Self::face_frame(face)?;
        Self::new(face.center(), Some(x_dir), Some(frame.z_dir))
    }

    fn face_frame(face: &Shape) -> Result<Plane> {
        if face.kind() != ShapeKind::Face {
            return Err(CadError::MalformedInput(format!(
                "a plane needs a face, got a {}",
                face.kind()
            )));
        }
        face.plane().ok_or_else(|| {
            CadError::InvalidValue("cannot derive a plane from a non-planar face".into())
        })
    }

    #[inline]
    pub const fn origin(&self) -> Vector {
        self.origin
    }

    #[inline]
    pub const fn x_dir(&self) -> Vector {
        self.x_dir
    }

    #[inline]
    pub const fn y_dir(&self) -> Vector {
        self.y_dir
    }

    #[inline]
    pub const fn z_dir(&self) -> Vector {
        self.z_dir
    }

    #[inline]
    pub fn set_origin(&mut self, origin: Vector) {
        self.origin = origin;
    }

    /// Returns the placement mapping local coordinates onto this frame.
    pub fn location(&self) -> Location {
        Location::from_frame(self.origin, self.x_dir, self.y_dir, self.z_dir)
    }

    /// Expresses `obj` (given in world coordinates) in this frame.
    pub fn to_local_coords<T: Transform>(&self, obj: &T) -> T {
        obj.transformed_by(&self.location().inverse())
    }

    /// Maps `obj` (given in this frame) back to world coordinates.
    pub fn from_local_coords<T: Transform>(&self, obj: &T) -> T {
        obj.transformed_by(&self.location())
    }

    /// Returns a copy with the origin moved, keeping the basis.
    ///
    /// A point or vertex must lie on the plane. An axis contributes the
    /// point where it pierces the plane.
    pub fn shift_origin(&self, new_origin: impl Into<OriginRef>) -> Result<Plane> {
        let point = match new_origin.into() {
            OriginRef::Point(p) => p,
            OriginRef::Shape(s) if s.kind() == ShapeKind::Vertex => s.center(),
            OriginRef::Shape(s) => {
                return Err(CadError::MalformedInput(format!(
                    "a {} does not define a unique origin",
                    s.kind()
                )))
            }
            OriginRef::Axis(axis) => self.find_intersection(&axis).ok_or_else(|| {
                CadError::InvalidValue("axis does not intersect the plane".into())
            })?,
        };
        if point.distance_to_plane(self) > precision::LINEAR {
            return Err(CadError::InvalidValue(format!(
                "new origin {point} is not on the plane"
            )));
        }
        let mut shifted = *self;
        shifted.origin = point;
        Ok(shifted)
    }

    /// Returns a copy moved `amount` along `z_dir`.
    pub fn offset(&self, amount: f64) -> Plane {
        let mut moved = *self;
        moved.origin = self.origin + self.z_dir * amount;
        moved
    }

    /// Returns a copy with the basis rotated by XYZ Euler `angles` (degrees).
    ///
    /// The origin does not move.
    pub fn rotated(&self, angles: [f64; 3]) -> Plane {
        let rot = Location::from_euler(Vector::ZERO, angles);
        Self::from_unit_basis(
            self.origin,
            rot.transform_vector(&self.x_dir),
            rot.transform_vector(&self.z_dir),
        )
    }

    /// Returns this frame placed by `loc` (`loc * self.location()`).
    pub fn moved(&self, loc: &Location) -> Plane {
        Plane::from_location(&(loc * &self.location()))
    }

    /// Returns where `axis` pierces this plane, if it does.
    #[inline]
    pub fn find_intersection(&self, axis: &Axis) -> Option<Vector> {
        axis.intersect_plane(self)
    }
}

impl PartialEq for Plane {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin && self.x_dir == other.x_dir && self.z_dir == other.z_dir
    }
}

impl Neg for Plane {
    type Output = Plane;

    /// Flips `z_dir`, keeping origin and `x_dir`.
    fn neg(self) -> Plane {
        Plane::from_unit_basis(self.origin, self.x_dir, -self.z_dir)
    }
}

impl Mul<&Location> for &Plane {
    type Output = Plane;

    fn mul(self, loc: &Location) -> Plane {
        Plane::from_location(&(&self.location() * loc))
    }
}

impl Mul<Location> for Plane {
    type Output = Plane;

    fn mul(self, loc: Location) -> Plane {
        &self * &loc
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = precision::clean;
        let (o, x, z) = (self.origin, self.x_dir, self.z_dir);
        write!(
            f,
            "Plane(o=({:.2}, {:.2}, {:.2}), x=({:.2}, {:.2}, {:.2}), z=({:.2}, {:.2}, {:.2}))",
            c(o.x), c(o.y), c(o.z), c(x.x), c(x.y), c(x.z), c(z.x), c(z.y), c(z.z)
        )
    }
}

/// Something that resolves to a new plane origin.
#[derive(Clone, Debug)]
pub enum OriginRef {
    Point(Vector),
    Axis(Axis),
    Shape(Shape),
}

impl From<Vector> for OriginRef {
    fn from(p: Vector) -> Self {
        OriginRef::Point(p)
    }
}

impl From<(f64, f64, f64)> for OriginRef {
    fn from(p: (f64, f64, f64)) -> Self {
        OriginRef::Point(p.into())
    }
}

impl From<Axis> for OriginRef {
    fn from(a: Axis) -> Self {
        OriginRef::Axis(a)
    }
}

impl From<Shape> for OriginRef {
    fn from(s: Shape) -> Self {
        OriginRef::Shape(s)
    }
}

impl From<&Shape> for OriginRef {
    fn from(s: &Shape) -> Self {
        OriginRef::Shape(s.clone())
    }
}
