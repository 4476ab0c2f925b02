//! Geometric primitives package.
//!
//! Vectors, affine matrices, axes and planes. Everything here is a plain
//! value type with tolerance-based equality.

mod vector;
mod matrix;
mod axis;
mod plane;

pub use vector::Vector;
pub use matrix::Matrix;
pub use axis::Axis;
pub use plane::{OriginRef, Plane};

use crate::toploc::Location;

/// Objects that can be placed by a rigid transform.
///
/// Implemented for every type that [`Plane::to_local_coords`] and
/// [`Plane::from_local_coords`] accept.
pub trait Transform: Sized {
    /// Returns a copy of `self` with `loc` applied.
    fn transformed_by(&self, loc: &Location) -> Self;
}

impl Transform for Vector {
    fn transformed_by(&self, loc: &Location) -> Self {
        loc.transform_point(self)
    }
}

impl Transform for Axis {
    fn transformed_by(&self, loc: &Location) -> Self {
        self.located(loc)
    }
}

impl Transform for Plane {
    fn transformed_by(&self, loc: &Location) -> Self {
        self.moved(loc)
    }
}
