//! Shape handle: a kernel object plus placement and label.

use std::fmt;
use std::rc::Rc;

use log::trace;

use super::native::{CompoundOf, Point};
use super::{topology, GeomType, KernelShape, ShapeKind};
use crate::bnd::BoundBox;
use crate::gp::{Axis, Plane, Transform, Vector};
use crate::precision;
use crate::query::ShapeList;
use crate::toploc::Location;
use crate::{CadError, Result};

/// A reference-counted handle to one kernel topology object.
///
/// Cloning shares the kernel object; the object is released when the last
/// handle goes out of scope. Every geometric query is answered in world
/// coordinates: the handle's [`Location`] is applied to whatever the kernel
/// reports in its own frame.
#[derive(Clone)]
pub struct Shape {
    native: Rc<dyn KernelShape>,
    location: Location,
    label: String,
}

impl Shape {
    /// Wraps a kernel object at the identity location.
    pub fn new(native: Rc<dyn KernelShape>) -> Self {
        Self {
            native,
            location: Location::new(),
            label: String::new(),
        }
    }

    /// Wraps an owned kernel object.
    pub fn from_native<K: KernelShape + 'static>(native: K) -> Self {
        Self::new(Rc::new(native))
    }

    /// Creates a vertex at `point`.
    pub fn vertex(point: impl Into<Vector>) -> Self {
        Self::from_native(Point::new(point.into()))
    }

    /// Creates a compound holding `children`.
    pub fn compound(children: Vec<Shape>) -> Self {
        Self::from_native(CompoundOf::new(children))
    }

    /// Returns a copy with `label` set.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[inline]
    pub fn native(&self) -> &Rc<dyn KernelShape> {
        &self.native
    }

    #[inline]
    pub(crate) fn native_id(&self) -> usize {
        Rc::as_ptr(&self.native) as *const () as usize
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.native.kind()
    }

    #[inline]
    pub fn geom_type(&self) -> Option<GeomType> {
        self.native.geom_type()
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    #[inline]
    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    #[inline]
    pub fn position(&self) -> Vector {
        self.location.position()
    }

    /// Moves the shape to `position`, keeping its orientation.
    pub fn set_position(&mut self, position: impl Into<Vector>) {
        self.location.set_position(position);
    }

    /// Returns the orientation as XYZ Euler angles in degrees.
    #[inline]
    pub fn orientation(&self) -> Vector {
        self.location.orientation()
    }

    /// Rotates the shape in place, keeping its position.
    pub fn set_orientation(&mut self, angles: [f64; 3]) {
        self.location.set_orientation(angles);
    }

    /// Returns a copy placed at `loc`, replacing the current location.
    pub fn located(&self, loc: &Location) -> Shape {
        let mut s = self.clone();
        s.location = *loc;
        s
    }

    /// Returns a copy moved by `loc` on top of the current location.
    pub fn moved(&self, loc: &Location) -> Shape {
        let mut s = self.clone();
        s.location = loc * &self.location;
        s
    }

    /// Returns true if both handles denote the same kernel object at the same place.
    pub fn is_same(&self, other: &Shape) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.native), Rc::as_ptr(&other.native))
            && self.location == other.location
    }

    pub fn center(&self) -> Vector {
        self.location.transform_point(&self.native.center())
    }

    pub fn bounding_box(&self) -> BoundBox {
        self.native.bounding_box().transformed(&self.location)
    }

    /// Fails with `InvalidValue` if the kind has no length.
    pub fn length(&self) -> Result<f64> {
        self.native
            .length()
            .ok_or_else(|| self.missing("length"))
    }

    pub fn area(&self) -> Result<f64> {
        self.native.area().ok_or_else(|| self.missing("area"))
    }

    pub fn volume(&self) -> Result<f64> {
        self.native.volume().ok_or_else(|| self.missing("volume"))
    }

    /// Fails with `DegenerateGeometry` unless the underlying geometry is circular.
    pub fn radius(&self) -> Result<f64> {
        self.native.radius().ok_or_else(|| {
            let geom = self.geom_type().map_or("untyped", GeomType::name);
            CadError::DegenerateGeometry(format!("a {geom} {} has no radius", self.kind()))
        })
    }

    fn missing(&self, measure: &str) -> CadError {
        CadError::InvalidValue(format!("a {} has no {measure}", self.kind()))
    }

    /// Minimum distance from `point` to this shape.
    pub fn distance_to(&self, point: &Vector) -> f64 {
        let local = self.location.inverse().transform_point(point);
        self.native.distance_to(&local)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.native.is_closed()
    }

    /// Sub-entities of `kind`; a shape of that kind yields itself.
    pub fn sub_shapes(&self, kind: ShapeKind) -> ShapeList {
        if kind == self.kind() {
            return ShapeList::from(vec![self.clone()]);
        }
        self.native
            .sub_shapes(kind)
            .into_iter()
            .map(|s| s.moved(&self.location))
            .collect()
    }

    pub fn vertices(&self) -> ShapeList {
        self.sub_shapes(ShapeKind::Vertex)
    }

    pub fn edges(&self) -> ShapeList {
        self.sub_shapes(ShapeKind::Edge)
    }

    pub fn wires(&self) -> ShapeList {
        self.sub_shapes(ShapeKind::Wire)
    }

    pub fn faces(&self) -> ShapeList {
        self.sub_shapes(ShapeKind::Face)
    }

    pub fn shells(&self) -> ShapeList {
        self.sub_shapes(ShapeKind::Shell)
    }

    pub fn solids(&self) -> ShapeList {
        self.sub_shapes(ShapeKind::Solid)
    }

    pub fn compounds(&self) -> ShapeList {
        self.sub_shapes(ShapeKind::Compound)
    }

    /// Wraps this shape in a one-element list.
    pub fn to_list(&self) -> ShapeList {
        ShapeList::from(vec![self.clone()])
    }

    /// Returns e.g. `"Solid: 1, Shell: 1, Face: 6, Wire: 6, Edge: 12, Vertex: 8"`.
    pub fn topology_summary(&self) -> String {
        let counts = topology::kind_counts(self);
        counts
            .iter()
            .rev()
            .map(|(kind, n)| format!("{kind}: {n}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Frame of a planar face in world coordinates.
    pub fn plane(&self) -> Option<Plane> {
        self.native.plane().map(|p| p.moved(&self.location))
    }

    /// Line of a linear edge.
    pub fn axis(&self) -> Result<Axis> {
        Axis::from_edge(self)
    }

    fn check_parameter(&self, u: f64) -> Result<()> {
        if !(-precision::CONFUSION..=1.0 + precision::CONFUSION).contains(&u) {
            return Err(CadError::OutOfRange(format!(
                "curve parameter {u} outside [0, 1]"
            )));
        }
        Ok(())
    }

    /// Point at normalized arc length `u` in `[0, 1]`.
    pub fn position_at(&self, u: f64) -> Result<Vector> {
        self.check_parameter(u)?;
        let p = self.native.position_at(u.clamp(0.0, 1.0))?;
        Ok(self.location.transform_point(&p))
    }

    /// Unit tangent at normalized arc length `u` in `[0, 1]`.
    pub fn tangent_at(&self, u: f64) -> Result<Vector> {
        self.check_parameter(u)?;
        let t = self.native.tangent_at(u.clamp(0.0, 1.0))?;
        self.location.transform_vector(&t).normalized()
    }

    /// Frame at `u` whose local Z follows the tangent.
    pub fn location_at(&self, u: f64) -> Result<Location> {
        let position = self.position_at(u)?;
        let tangent = self.tangent_at(u)?;
        Ok(Plane::new(position, None, Some(tangent))?.location())
    }

    /// Returns `count` locations evenly spaced by arc length between `start` and `stop`.
    ///
    /// Parameter `i` sits at `start + (stop - start) * i / (count - 1)`, so on a
    /// closed curve the ends coincide. A single location is only defined on an
    /// open curve, where it is the midpoint of the range. With
    /// `positions_only` every orientation is the identity.
    pub fn distribute_locations(
        &self,
        count: usize,
        start: f64,
        stop: f64,
        positions_only: bool,
    ) -> Result<Vec<Location>> {
        if !matches!(self.kind(), ShapeKind::Edge | ShapeKind::Wire) {
            return Err(CadError::MalformedInput(format!(
                "locations can only be distributed along an edge or wire, not a {}",
                self.kind()
            )));
        }
        let params: Vec<f64> = match count {
            0 => {
                return Err(CadError::InvalidValue(
                    "cannot distribute zero locations".into(),
                ))
            }
            1 if self.is_closed() => {
                return Err(CadError::InvalidValue(
                    "a single location cannot be evenly distributed on a closed curve".into(),
                ))
            }
            1 => vec![(start + stop) / 2.0],
            n => (0..n)
                .map(|i| start + (stop - start) * i as f64 / (n - 1) as f64)
                .collect(),
        };
        trace!("distributing {count} locations over [{start}, {stop}]");
        params
            .into_iter()
            .map(|u| {
                if positions_only {
                    Ok(Location::from_position(self.position_at(u)?))
                } else {
                    self.location_at(u)
                }
            })
            .collect()
    }
}

impl Transform for Shape {
    fn transformed_by(&self, loc: &Location) -> Self {
        self.moved(loc)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("kind", &self.kind())
            .field("label", &self.label)
            .field("location", &self.location)
            .finish()
    }
}
