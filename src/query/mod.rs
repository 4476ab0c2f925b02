//! Shape list queries
//!
//! A [`ShapeList`] is an ordered, possibly repetitive collection of shape
//! handles. Queries return new lists, so they chain:
//!
//! ```ignore
//! let top = solid.faces().sort_by(Axis::Z, false)?.last().cloned();
//! let seams = solid.edges().filter_by(Axis::Z, false).group_by(SortKey::Length, false, 6)?;
//! ```

mod keys;
mod group;

pub use keys::{Filter, SortKey};
pub use group::GroupBy;

use std::cmp::Ordering;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use log::{debug, warn};

use crate::brep::{topology, GeomType, Shape, ShapeKind};
use crate::gp::{Axis, Vector};
use crate::precision;
use crate::{CadError, Result};

/// An ordered sequence of shape handles.
#[derive(Clone, Debug, Default)]
pub struct ShapeList {
    shapes: Vec<Shape>,
}

impl ShapeList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn into_vec(self) -> Vec<Shape> {
        self.shapes
    }

    /// Drops repeated entities (same kernel object and placement).
    pub fn unique(self) -> ShapeList {
        ShapeList::from(topology::unique(self.shapes))
    }

    /// Keeps the shapes that pass `filter`, or those that fail it when `reverse` is set.
    pub fn filter_by(&self, filter: impl Into<Filter>, reverse: bool) -> ShapeList {
        let filter = filter.into();
        self.iter()
            .filter(|s| filter.matches(s) != reverse)
            .cloned()
            .collect()
    }

    /// Keeps the edges and faces whose geometry is `geom_type`.
    pub fn filter_by_geom_type(&self, geom_type: GeomType) -> ShapeList {
        self.filter_by(geom_type, false)
    }

    /// Keeps shapes whose center, projected onto `axis`, lies between `min` and `max`.
    ///
    /// `inclusive` says whether each bound is itself accepted.
    pub fn filter_by_position(
        &self,
        axis: &Axis,
        min: f64,
        max: f64,
        inclusive: (bool, bool),
    ) -> ShapeList {
        let key = SortKey::Axis(*axis);
        self.iter()
            .filter(|s| {
                let Ok(v) = key.evaluate(s) else {
                    return false;
                };
                let above = if inclusive.0 {
                    v >= min - precision::TOLERANCE
                } else {
                    v > min + precision::TOLERANCE
                };
                let below = if inclusive.1 {
                    v <= max + precision::TOLERANCE
                } else {
                    v < max - precision::TOLERANCE
                };
                above && below
            })
            .cloned()
            .collect()
    }

    /// Stable sort by `key`, ascending unless `reverse`.
    ///
    /// Fails if any shape lacks the measure the key needs.
    pub fn sort_by(&self, key: impl Into<SortKey>, reverse: bool) -> Result<ShapeList> {
        let key = key.into();
        let values = self
            .iter()
            .map(|s| key.evaluate(s))
            .collect::<Result<Vec<f64>>>()?;
        Ok(self.sorted_by_values(&values, reverse))
    }

    /// Stable sort by minimum distance to `point`, nearest first unless `reverse`.
    pub fn sort_by_distance(&self, point: impl Into<Vector>, reverse: bool) -> ShapeList {
        let point = point.into();
        let values: Vec<f64> = self.iter().map(|s| s.distance_to(&point)).collect();
        self.sorted_by_values(&values, reverse)
    }

    fn sorted_by_values(&self, values: &[f64], reverse: bool) -> ShapeList {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|a, b| {
            let ord = values[*a].total_cmp(&values[*b]);
            if reverse {
                ord.reverse()
            } else {
                ord
            }
        });
        order.into_iter().map(|i| self.shapes[i].clone()).collect()
    }

    /// Groups by `key` rounded to `tol_digits` decimals.
    ///
    /// Groups are ordered by key, ascending unless `reverse`.
    pub fn group_by(
        &self,
        key: impl Into<SortKey>,
        reverse: bool,
        tol_digits: i32,
    ) -> Result<GroupBy<f64>> {
        let key = key.into();
        let key_fn = Rc::new(move |s: &Shape| {
            key.evaluate(s).map(|v| precision::round_to(v, tol_digits))
        });
        let groups = GroupBy::build(&self.shapes, key_fn)?.sort_groups_by(|a, b| {
            let ord = a.total_cmp(b);
            if reverse {
                ord.reverse()
            } else {
                ord
            }
        });
        debug!("grouped {} shapes into {} groups", self.len(), groups.len());
        Ok(groups)
    }

    /// Groups by an arbitrary key; groups appear in first-seen order.
    pub fn group_by_key<K, F>(&self, key: F) -> Result<GroupBy<K>>
    where
        K: PartialEq + std::fmt::Debug + 'static,
        F: Fn(&Shape) -> K + 'static,
    {
        let key_fn = Rc::new(move |s: &Shape| Ok::<K, CadError>(key(s)));
        GroupBy::build(&self.shapes, key_fn)
    }

    /// The group with the smallest key.
    pub fn take_sorted(&self, key: impl Into<SortKey>) -> Result<ShapeList> {
        let groups = self.group_by(key, false, precision::GROUP_DIGITS)?;
        Ok(groups.first().cloned().unwrap_or_default())
    }

    /// The group with the largest key.
    pub fn take_sorted_last(&self, key: impl Into<SortKey>) -> Result<ShapeList> {
        let groups = self.group_by(key, false, precision::GROUP_DIGITS)?;
        Ok(groups.last().cloned().unwrap_or_default())
    }

    /// Distinct sub-entities of `kind` across all members.
    pub fn sub_shapes(&self, kind: ShapeKind) -> ShapeList {
        ShapeList::from(topology::collect_sub_shapes(&self.shapes, kind))
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

    /// The first sub-entity of `kind`; warns when there are several.
    ///
    /// Fails with `InvalidValue` only when there are none.
    pub fn single(&self, kind: ShapeKind) -> Result<Shape> {
        let found = self.sub_shapes(kind);
        if found.len() > 1 {
            warn!("Found {} {kind}s, returning first", found.len());
        }
        found
            .into_vec()
            .into_iter()
            .next()
            .ok_or_else(|| CadError::InvalidValue(format!("no {kind} in shape list")))
    }

    pub fn vertex(&self) -> Result<Shape> {
        self.single(ShapeKind::Vertex)
    }

    pub fn edge(&self) -> Result<Shape> {
        self.single(ShapeKind::Edge)
    }

    pub fn wire(&self) -> Result<Shape> {
        self.single(ShapeKind::Wire)
    }

    pub fn face(&self) -> Result<Shape> {
        self.single(ShapeKind::Face)
    }

    pub fn shell(&self) -> Result<Shape> {
        self.single(ShapeKind::Shell)
    }

    pub fn solid(&self) -> Result<Shape> {
        self.single(ShapeKind::Solid)
    }

    pub fn compound(&self) -> Result<Shape> {
        self.single(ShapeKind::Compound)
    }

    /// Center of the members' bounding box.
    pub fn center(&self) -> Option<Vector> {
        self.iter()
            .map(Shape::bounding_box)
            .reduce(|acc, b| acc.add(b))
            .map(|b| b.center())
    }

    /// Compares by `key` without allocating a sorted copy.
    pub fn max_by(&self, key: impl Into<SortKey>) -> Result<Option<Shape>> {
        let key = key.into();
        let mut best: Option<(f64, &Shape)> = None;
        for s in self.iter() {
            let v = key.evaluate(s)?;
            if best.map_or(true, |(b, _)| v.total_cmp(&b) == Ordering::Greater) {
                best = Some((v, s));
            }
        }
        Ok(best.map(|(_, s)| s.clone()))
    }
}

impl Deref for ShapeList {
    type Target = [Shape];

    fn deref(&self) -> &[Shape] {
        &self.shapes
    }
}

impl DerefMut for ShapeList {
    fn deref_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }
}

impl From<Vec<Shape>> for ShapeList {
    fn from(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }
}

impl FromIterator<Shape> for ShapeList {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        Self {
            shapes: iter.into_iter().collect(),
        }
    }
}

impl Extend<Shape> for ShapeList {
    fn extend<I: IntoIterator<Item = Shape>>(&mut self, iter: I) {
        self.shapes.extend(iter);
    }
}

impl IntoIterator for ShapeList {
    type Item = Shape;
    type IntoIter = std::vec::IntoIter<Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ShapeList {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}
