//! BREP (Boundary Representation) shape handles.
//!
//! Curve and surface geometry is owned by an external kernel that
//! implements [`KernelShape`]. A [`Shape`] wraps one kernel object with a
//! placement and a label; the [`Assembly`] arena links shapes into a tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bnd::BoundBox;
use crate::gp::{Plane, Vector};
use crate::{CadError, Result};

mod shape;
mod native;
pub mod topology;
pub mod assembly;

pub use shape::Shape;
pub use native::{CompoundOf, Point};
pub use assembly::{Assembly, NodeId};

/// Topological entity kinds, ordered from lowest to highest dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeKind {
    Vertex,
    Edge,
    Wire,
    Face,
    Shell,
    Solid,
    Compound,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Vertex,
        ShapeKind::Edge,
        ShapeKind::Wire,
        ShapeKind::Face,
        ShapeKind::Shell,
        ShapeKind::Solid,
        ShapeKind::Compound,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ShapeKind::Vertex => "Vertex",
            ShapeKind::Edge => "Edge",
            ShapeKind::Wire => "Wire",
            ShapeKind::Face => "Face",
            ShapeKind::Shell => "Shell",
            ShapeKind::Solid => "Solid",
            ShapeKind::Compound => "Compound",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = CadError;

    fn from_str(s: &str) -> Result<Self> {
        ShapeKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CadError::InvalidValue(format!("unknown shape kind '{s}'")))
    }
}

/// Classification of the curve under an edge or the surface under a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeomType {
    // curves
    Line,
    Circle,
    Ellipse,
    Hyperbola,
    Parabola,
    Bezier,
    BSpline,
    Offset,
    Other,
    // surfaces
    Plane,
    Cylinder,
    Cone,
    Sphere,
    Torus,
    Extrusion,
    Revolution,
}

impl GeomType {
    pub const ALL: [GeomType; 16] = [
        GeomType::Line,
        GeomType::Circle,
        GeomType::Ellipse,
        GeomType::Hyperbola,
        GeomType::Parabola,
        GeomType::Bezier,
        GeomType::BSpline,
        GeomType::Offset,
        GeomType::Other,
        GeomType::Plane,
        GeomType::Cylinder,
        GeomType::Cone,
        GeomType::Sphere,
        GeomType::Torus,
        GeomType::Extrusion,
        GeomType::Revolution,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            GeomType::Line => "LINE",
            GeomType::Circle => "CIRCLE",
            GeomType::Ellipse => "ELLIPSE",
            GeomType::Hyperbola => "HYPERBOLA",
            GeomType::Parabola => "PARABOLA",
            GeomType::Bezier => "BEZIER",
            GeomType::BSpline => "BSPLINE",
            GeomType::Offset => "OFFSET",
            GeomType::Other => "OTHER",
            GeomType::Plane => "PLANE",
            GeomType::Cylinder => "CYLINDER",
            GeomType::Cone => "CONE",
            GeomType::Sphere => "SPHERE",
            GeomType::Torus => "TORUS",
            GeomType::Extrusion => "EXTRUSION",
            GeomType::Revolution => "REVOLUTION",
        }
    }

    /// Returns true for surface classifications.
    pub const fn is_surface(self) -> bool {
        matches!(
            self,
            GeomType::Plane
                | GeomType::Cylinder
                | GeomType::Cone
                | GeomType::Sphere
                | GeomType::Torus
                | GeomType::Extrusion
                | GeomType::Revolution
        )
    }
}

impl fmt::Display for GeomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for GeomType {
    type Err = CadError;

    fn from_str(s: &str) -> Result<Self> {
        GeomType::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CadError::InvalidValue(format!("unknown geometry type '{s}'")))
    }
}

/// The interface an external geometry kernel provides for one topology object.
///
/// All answers are in the object's own frame; [`Shape`] applies its
/// location on top. Curve parameters run over `[0, 1]` by arc length.
pub trait KernelShape: fmt::Debug {
    fn kind(&self) -> ShapeKind;

    /// Underlying curve or surface type, for edges and faces.
    fn geom_type(&self) -> Option<GeomType> {
        None
    }

    fn center(&self) -> Vector;

    fn bounding_box(&self) -> BoundBox;

    fn length(&self) -> Option<f64> {
        None
    }

    fn area(&self) -> Option<f64> {
        None
    }

    fn volume(&self) -> Option<f64> {
        None
    }

    /// Radius of a circular edge or a circle-based surface.
    fn radius(&self) -> Option<f64> {
        None
    }

    /// Minimum distance from `point` to the object.
    fn distance_to(&self, point: &Vector) -> f64;

    /// Sub-entities of `kind` below this object, without duplicates.
    ///
    /// Returned handles carry locations relative to this object.
    fn sub_shapes(&self, kind: ShapeKind) -> Vec<Shape>;

    fn is_closed(&self) -> bool {
        false
    }

    fn position_at(&self, _u: f64) -> Result<Vector> {
        Err(CadError::Kernel(format!(
            "a {} has no curve parameterization",
            self.kind()
        )))
    }

    fn tangent_at(&self, _u: f64) -> Result<Vector> {
        Err(CadError::Kernel(format!(
            "a {} has no curve parameterization",
            self.kind()
        )))
    }

    /// Frame of a planar face: normal as `z_dir`, surface x direction as `x_dir`.
    fn plane(&self) -> Option<Plane> {
        None
    }
}
