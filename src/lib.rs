//! cadframe: coordinate-frame algebra and shape queries for BREP modeling.
//!
//! The geometry kernel itself lives behind the [`brep::KernelShape`] trait.
//! Everything here is the layer on top of it: vectors, frames, placements,
//! bounding boxes, and the [`query::ShapeList`] engine.

pub mod precision;
pub mod gp;
pub mod toploc;
pub mod bnd;
pub mod brep;
pub mod query;

// Re-exports for convenience
pub use gp::{Axis, Matrix, OriginRef, Plane, Transform, Vector};
pub use toploc::Location;
pub use bnd::BoundBox;
pub use brep::{Assembly, GeomType, KernelShape, NodeId, Shape, ShapeKind};
pub use query::{Filter, GroupBy, ShapeList, SortKey};

/// Tolerance for geometric comparisons
pub const TOLERANCE: f64 = precision::TOLERANCE;

/// Result type for cadframe operations
pub type Result<T> = std::result::Result<T, CadError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CadError {
    /// Arguments of the wrong shape, e.g. a five-row matrix.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A direction, radius or basis that the operation needs is missing.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Index out of range: {0}")]
    OutOfRange(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Failure reported by the geometry kernel, passed through unchanged.
    #[error("Kernel operation failed: {0}")]
    Kernel(String),
}
