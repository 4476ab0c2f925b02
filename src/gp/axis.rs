//! Axis (point + direction).
//!
//! An infinite line in space. The direction is always unit length.

use std::fmt;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

use super::{Plane, Vector};
use crate::brep::{GeomType, Shape, ShapeKind};
use crate::precision;
use crate::toploc::Location;
use crate::{CadError, Result};

/// An infinite line: a position on the line and a unit direction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AxisRepr")]
pub struct Axis {
    position: Vector,
    direction: Vector,
}

/// Wire form of [`Axis`]; deserialized values are re-checked by [`Axis::new`].
#[derive(Deserialize)]
struct AxisRepr {
    position: Vector,
    direction: Vector,
}

impl TryFrom<AxisRepr> for Axis {
    type Error = CadError;

    fn try_from(repr: AxisRepr) -> Result<Self> {
        Axis::new(repr.position, repr.direction)
    }
}

impl Axis {
    /// The global X axis.
    pub const X: Axis = Axis {
        position: Vector::ZERO,
        direction: Vector::X,
    };
    /// The global Y axis.
    pub const Y: Axis = Axis {
        position: Vector::ZERO,
        direction: Vector::Y,
    };
    /// The global Z axis.
    pub const Z: Axis = Axis {
        position: Vector::ZERO,
        direction: Vector::Z,
    };

    /// Creates an axis, normalizing `direction`.
    ///
    /// Fails with `DegenerateGeometry` if `direction` is zero length.
    pub fn new(position: impl Into<Vector>, direction: impl Into<Vector>) -> Result<Self> {
        let direction = direction.into().normalized().map_err(|_| {
            CadError::DegenerateGeometry("axis direction has zero length".into())
        })?;
        Ok(Self {
            position: position.into(),
            direction,
        })
    }

    /// Creates the axis through `start` pointing at `end`.
    pub fn from_points(start: impl Into<Vector>, end: impl Into<Vector>) -> Result<Self> {
        let start = start.into();
        let end = end.into();
        if start.distance(&end) <= precision::CONFUSION {
            return Err(CadError::DegenerateGeometry(
                "axis points are coincident".into(),
            ));
        }
        Self::new(start, end - start)
    }

    /// Creates the axis along a linear edge, starting at its first point.
    pub fn from_edge(edge: &Shape) -> Result<Self> {
        if edge.kind() != ShapeKind::Edge {
            return Err(CadError::MalformedInput(format!(
                "an axis needs an edge, got a {}",
                edge.kind()
            )));
        }
        if edge.geom_type() != Some(GeomType::Line) {
            return Err(CadError::InvalidValue(
                "an axis can only be built from a linear edge".into(),
            ));
        }
        Self::new(edge.position_at(0.0)?, edge.tangent_at(0.0)?)
    }

    /// Unchecked constructor for directions already known to be unit length.
    #[inline]
    pub(crate) const fn from_unit(position: Vector, direction: Vector) -> Self {
        Self {
            position,
            direction,
        }
    }

    #[inline]
    pub const fn position(&self) -> Vector {
        self.position
    }

    #[inline]
    pub const fn direction(&self) -> Vector {
        self.direction
    }

    #[inline]
    pub fn set_position(&mut self, position: Vector) {
        self.position = position;
    }

    /// Sets the direction; fails on a zero-length vector.
    pub fn set_direction(&mut self, direction: Vector) -> Result<()> {
        self.direction = direction.normalized()?;
        Ok(())
    }

    /// Returns the frame at `position` whose local Z is this axis.
    pub fn location(&self) -> Location {
        self.to_plane().location()
    }

    /// Returns this axis moved by `loc`.
    pub fn located(&self, loc: &Location) -> Axis {
        let direction = loc.transform_vector(&self.direction);
        // rigid transforms keep unit length; renormalize to shed rounding
        let direction = direction.normalized().unwrap_or(self.direction);
        Axis {
            position: loc.transform_point(&self.position),
            direction,
        }
    }

    /// Returns the plane through `position` with normal `direction`.
    pub fn to_plane(&self) -> Plane {
        Plane::with_normal(self.position, self.direction)
    }

    /// Returns true if both lines coincide and point the same way.
    ///
    /// Anti-parallel lines are not coaxial; see [`Axis::is_opposite`].
    pub fn is_coaxial(&self, other: &Axis) -> bool {
        self.is_coaxial_within(other, precision::ANGULAR_DEG, precision::LINEAR)
    }

    pub fn is_coaxial_within(&self, other: &Axis, angular_tol: f64, linear_tol: f64) -> bool {
        if self.angle_between(other) > angular_tol {
            return false;
        }
        self.distance_to_point(&other.position) <= linear_tol
            && other.distance_to_point(&self.position) <= linear_tol
    }

    /// Returns true if parallel or anti-parallel.
    #[inline]
    pub fn is_parallel(&self, other: &Axis) -> bool {
        self.is_parallel_within(other, precision::ANGULAR_DEG)
    }

    #[inline]
    pub fn is_parallel_within(&self, other: &Axis, angular_tol: f64) -> bool {
        self.direction.is_parallel_within(&other.direction, angular_tol)
    }

    /// Returns true if perpendicular.
    #[inline]
    pub fn is_normal(&self, other: &Axis) -> bool {
        self.is_normal_within(other, precision::ANGULAR_DEG)
    }

    pub fn is_normal_within(&self, other: &Axis, angular_tol: f64) -> bool {
        (self.angle_between(other) - 90.0).abs() <= angular_tol
    }

    /// Returns true if anti-parallel.
    #[inline]
    pub fn is_opposite(&self, other: &Axis) -> bool {
        self.is_opposite_within(other, precision::ANGULAR_DEG)
    }

    pub fn is_opposite_within(&self, other: &Axis, angular_tol: f64) -> bool {
        180.0 - self.angle_between(other) <= angular_tol
    }

    /// Returns the angle between directions in degrees, in `[0, 180]`.
    #[inline]
    pub fn angle_between(&self, other: &Axis) -> f64 {
        self.direction.get_angle(&other.direction)
    }

    /// Perpendicular distance from `point` to this line.
    pub fn distance_to_point(&self, point: &Vector) -> f64 {
        (*point - self.position).cross(&self.direction).length()
    }

    /// Reverses direction in place.
    #[inline]
    pub fn reverse(&mut self) {
        self.direction.reverse();
    }

    /// Returns the axis with reversed direction.
    #[inline]
    pub fn reversed(&self) -> Axis {
        Axis {
            position: self.position,
            direction: -self.direction,
        }
    }

    /// Returns the single point shared with `other`.
    ///
    /// Parallel (including coincident) and skew lines give `None`.
    pub fn intersect_axis(&self, other: &Axis) -> Option<Vector> {
        let n = self.direction.cross(&other.direction);
        let n_len2 = n.length_squared();
        if n_len2.sqrt() <= precision::RESOLUTION.sqrt() {
            return None;
        }
        let w = other.position - self.position;
        if w.dot(&n).abs() / n_len2.sqrt() > precision::LINEAR {
            return None;
        }
        let t = w.cross(&other.direction).dot(&n) / n_len2;
        Some(self.position + self.direction * t)
    }

    /// Returns the point where this line pierces `plane`, if not parallel.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vector> {
        let denom = self.direction.dot(&plane.z_dir());
        if denom.abs() <= precision::ANGULAR_DEG.to_radians() {
            return None;
        }
        let t = (plane.origin() - self.position).dot(&plane.z_dir()) / denom;
        Some(self.position + self.direction * t)
    }
}

impl Neg for Axis {
    type Output = Axis;

    fn neg(self) -> Axis {
        self.reversed()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position;
        let d = self.direction;
        write!(
            f,
            "Axis: (({:?}, {:?}, {:?}),({:?}, {:?}, {:?}))",
            p.x, p.y, p.z, d.x, d.y, d.z
        )
    }
}
