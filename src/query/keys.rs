//! Filter predicates and sort keys for shape lists.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::brep::{GeomType, Shape, ShapeKind};
use crate::gp::Axis;
use crate::{CadError, Result};

/// Selects shapes in [`ShapeList::filter_by`](super::ShapeList::filter_by).
pub enum Filter {
    /// Keep shapes for which the closure returns true.
    Predicate(Box<dyn Fn(&Shape) -> bool>),
    /// Keep edges and faces whose curve or surface has this type.
    GeomType(GeomType),
    /// Keep linear edges parallel to the axis and planar faces normal to it.
    Axis(Axis),
}

impl Filter {
    pub fn predicate<F: Fn(&Shape) -> bool + 'static>(f: F) -> Self {
        Filter::Predicate(Box::new(f))
    }

    /// Returns true if `shape` passes.
    pub fn matches(&self, shape: &Shape) -> bool {
        match self {
            Filter::Predicate(f) => f(shape),
            Filter::GeomType(g) => shape.geom_type() == Some(*g),
            Filter::Axis(axis) => line_or_normal(shape).is_some_and(|a| axis.is_parallel(&a)),
        }
    }
}

/// The line of a linear edge (or wire starting with one), or the normal of a planar face.
pub(crate) fn line_or_normal(shape: &Shape) -> Option<Axis> {
    match shape.kind() {
        ShapeKind::Face => {
            let plane = shape.plane()?;
            Some(Axis::from_unit(shape.center(), plane.z_dir()))
        }
        ShapeKind::Edge => shape.axis().ok(),
        ShapeKind::Wire => shape.edges().first()?.axis().ok(),
        _ => None,
    }
}

impl From<GeomType> for Filter {
    fn from(g: GeomType) -> Self {
        Filter::GeomType(g)
    }
}

impl From<Axis> for Filter {
    fn from(a: Axis) -> Self {
        Filter::Axis(a)
    }
}

impl FromStr for Filter {
    type Err = CadError;

    /// Parses a geometry type name (`"PLANE"`) or a global axis (`"X"`, `"Y"`, `"Z"`).
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "X" => Ok(Filter::Axis(Axis::X)),
            "Y" => Ok(Filter::Axis(Axis::Y)),
            "Z" => Ok(Filter::Axis(Axis::Z)),
            _ => s.parse::<GeomType>().map(Filter::GeomType).map_err(|_| {
                CadError::InvalidValue(format!("unrecognized filter '{s}'"))
            }),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Predicate(_) => f.write_str("Predicate(..)"),
            Filter::GeomType(g) => write!(f, "GeomType({g})"),
            Filter::Axis(a) => write!(f, "Axis({a})"),
        }
    }
}

/// A scalar computed per shape for sorting and grouping.
#[derive(Clone)]
pub enum SortKey {
    /// Center projected onto the axis.
    Axis(Axis),
    Length,
    Radius,
    Area,
    Volume,
    /// Distance of the center from the origin.
    Distance,
    Custom(Rc<dyn Fn(&Shape) -> f64>),
}

impl SortKey {
    pub fn custom<F: Fn(&Shape) -> f64 + 'static>(f: F) -> Self {
        SortKey::Custom(Rc::new(f))
    }

    /// Evaluates the key; fails if the shape lacks the measure.
    pub fn evaluate(&self, shape: &Shape) -> Result<f64> {
        match self {
            SortKey::Axis(axis) => Ok((shape.center() - axis.position()).dot(&axis.direction())),
            SortKey::Length => shape.length(),
            SortKey::Radius => shape.radius(),
            SortKey::Area => shape.area(),
            SortKey::Volume => shape.volume(),
            SortKey::Distance => Ok(shape.center().length()),
            SortKey::Custom(f) => Ok(f(shape)),
        }
    }
}

impl From<Axis> for SortKey {
    fn from(a: Axis) -> Self {
        SortKey::Axis(a)
    }
}

impl FromStr for SortKey {
    type Err = CadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LENGTH" => Ok(SortKey::Length),
            "RADIUS" => Ok(SortKey::Radius),
            "AREA" => Ok(SortKey::Area),
            "VOLUME" => Ok(SortKey::Volume),
            "DISTANCE" => Ok(SortKey::Distance),
            "X" => Ok(SortKey::Axis(Axis::X)),
            "Y" => Ok(SortKey::Axis(Axis::Y)),
            "Z" => Ok(SortKey::Axis(Axis::Z)),
            _ => Err(CadError::InvalidValue(format!("unrecognized sort key '{s}'"))),
        }
    }
}

impl fmt::Debug for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Axis(a) => write!(f, "Axis({a})"),
            SortKey::Length => f.write_str("Length"),
            SortKey::Radius => f.write_str("Radius"),
            SortKey::Area => f.write_str("Area"),
            SortKey::Volume => f.write_str("Volume"),
            SortKey::Distance => f.write_str("Distance"),
            SortKey::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
