//! Axis-aligned 3D bounding box.
//!
//! A box may be flat (zero span on one axis) or collapse to a single
//! point; both are valid boxes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gp::{Transform, Vector};
use crate::toploc::Location;

/// An axis-aligned box given by its minimum and maximum corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundBox {
    min: Vector,
    max: Vector,
}

impl BoundBox {
    /// Creates the box spanned by two opposite corners, in any order.
    pub fn new(a: impl Into<Vector>, b: impl Into<Vector>) -> Self {
        let (a, b) = (a.into(), b.into());
        Self {
            min: Vector::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vector::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Creates a zero-size box at `p`.
    pub fn from_point(p: Vector) -> Self {
        Self { min: p, max: p }
    }

    /// Returns the smallest box containing all `points`, or `None` if empty.
    pub fn from_points<I: IntoIterator<Item = Vector>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = Self::from_point(iter.next()?);
        Some(iter.fold(first, |acc, p| acc.add(p)))
    }

    #[inline]
    pub const fn min(&self) -> Vector {
        self.min
    }

    #[inline]
    pub const fn max(&self) -> Vector {
        self.max
    }

    /// Returns `max - min`.
    #[inline]
    pub fn size(&self) -> Vector {
        self.max - self.min
    }

    /// Returns the midpoint of the corners.
    #[inline]
    pub fn center(&self) -> Vector {
        (self.min + self.max) * 0.5
    }

    /// Returns the length of the diagonal.
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.size().length()
    }

    /// Returns the smallest box enclosing `self` and `other` (a box or a point).
    pub fn add<T: Into<BoundBox>>(&self, other: T) -> BoundBox {
        let other = other.into();
        BoundBox {
            min: Vector::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vector::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Returns the 8 corners.
    pub fn corners(&self) -> [Vector; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vector::new(a.x, a.y, a.z),
            Vector::new(b.x, a.y, a.z),
            Vector::new(a.x, b.y, a.z),
            Vector::new(a.x, a.y, b.z),
            Vector::new(b.x, b.y, a.z),
            Vector::new(b.x, a.y, b.z),
            Vector::new(a.x, b.y, b.z),
            Vector::new(b.x, b.y, b.z),
        ]
    }

    /// Returns true if `self` lies strictly within `other` on every axis.
    pub fn is_inside(&self, other: &BoundBox) -> bool {
        other.min.x < self.min.x
            && other.min.y < self.min.y
            && other.min.z < self.min.z
            && self.max.x < other.max.x
            && self.max.y < other.max.y
            && self.max.z < other.max.z
    }

    /// Returns true if `p` is inside or on the boundary.
    pub fn contains_point(&self, p: &Vector) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }

    /// Distance from `p` to the box; 0 inside.
    pub fn distance_to_point(&self, p: &Vector) -> f64 {
        let d = |v: f64, lo: f64, hi: f64| (lo - v).max(0.0).max(v - hi);
        Vector::new(
            d(p.x, self.min.x, self.max.x),
            d(p.y, self.min.y, self.max.y),
            d(p.z, self.min.z, self.max.z),
        )
        .length()
    }

    /// Returns the box of the 8 transformed corners.
    pub fn transformed(&self, loc: &Location) -> BoundBox {
        let [first, rest @ ..] = self.corners().map(|c| loc.transform_point(&c));
        rest.into_iter().fold(Self::from_point(first), |acc, p| acc.add(p))
    }

    /// Returns whichever box strictly contains the other in the XY projection.
    ///
    /// `None` means neither contains the other; that is not an error.
    pub fn find_outside_box_2d(a: &BoundBox, b: &BoundBox) -> Option<BoundBox> {
        let contains_xy = |outer: &BoundBox, inner: &BoundBox| {
            outer.min.x < inner.min.x
                && outer.max.x > inner.max.x
                && outer.min.y < inner.min.y
                && outer.max.y > inner.max.y
        };
        if contains_xy(a, b) {
            Some(*a)
        } else if contains_xy(b, a) {
            Some(*b)
        } else {
            None
        }
    }
}

impl From<Vector> for BoundBox {
    fn from(p: Vector) -> Self {
        BoundBox::from_point(p)
    }
}

impl From<(f64, f64, f64)> for BoundBox {
    fn from(p: (f64, f64, f64)) -> Self {
        BoundBox::from_point(p.into())
    }
}

impl From<&BoundBox> for BoundBox {
    fn from(b: &BoundBox) -> Self {
        *b
    }
}

impl Transform for BoundBox {
    fn transformed_by(&self, loc: &Location) -> Self {
        self.transformed(loc)
    }
}

impl fmt::Display for BoundBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bbox: {:?} <= x <= {:?}, {:?} <= y <= {:?}, {:?} <= z <= {:?}",
            self.min.x, self.max.x, self.min.y, self.max.y, self.min.z, self.max.z
        )
    }
}
