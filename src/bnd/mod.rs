//! Bounding boxes.
//!
//! Shapes report their extent as an axis-aligned [`BoundBox`] in world
//! coordinates.

pub mod box_3d;

pub use self::box_3d::BoundBox;
