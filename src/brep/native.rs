//! Kernel objects that need no curve or surface geometry.
//!
//! A point and an aggregate of other handles can be built without the
//! external kernel, so they live here.

use super::{topology, KernelShape, Shape, ShapeKind};
use crate::bnd::BoundBox;
use crate::gp::Vector;
use crate::precision;

/// A single point (Vertex).
#[derive(Clone, Copy, Debug)]
pub struct Point {
    point: Vector,
}

impl Point {
    pub fn new(point: Vector) -> Self {
        Self { point }
    }
}

impl KernelShape for Point {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Vertex
    }

    fn center(&self) -> Vector {
        self.point
    }

    fn bounding_box(&self) -> BoundBox {
        BoundBox::from_point(self.point)
    }

    fn distance_to(&self, point: &Vector) -> f64 {
        self.point.distance(point)
    }

    fn sub_shapes(&self, _kind: ShapeKind) -> Vec<Shape> {
        Vec::new()
    }
}

/// A compound aggregating other handles.
#[derive(Clone, Debug)]
pub struct CompoundOf {
    children: Vec<Shape>,
}

impl CompoundOf {
    pub fn new(children: Vec<Shape>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    fn total(&self, measure: fn(&Shape) -> crate::Result<f64>) -> Option<f64> {
        let values: Vec<f64> = self
            .children
            .iter()
            .filter_map(|c| measure(c).ok())
            .collect();
        (!values.is_empty()).then(|| values.iter().sum())
    }
}

impl KernelShape for CompoundOf {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Compound
    }

    /// Center weighted by volume, else area, else length, else a plain average.
    fn center(&self) -> Vector {
        if self.children.is_empty() {
            return Vector::ZERO;
        }
        let measures: [fn(&Shape) -> crate::Result<f64>; 3] =
            [Shape::volume, Shape::area, Shape::length];
        for measure in measures {
            let weights: Vec<f64> = self
                .children
                .iter()
                .map(|c| measure(c).unwrap_or(0.0))
                .collect();
            let total: f64 = weights.iter().sum();
            if total > precision::RESOLUTION {
                return self
                    .children
                    .iter()
                    .zip(&weights)
                    .map(|(c, w)| c.center() * *w)
                    .sum::<Vector>()
                    / total;
            }
        }
        self.children.iter().map(Shape::center).sum::<Vector>() / self.children.len() as f64
    }

    fn bounding_box(&self) -> BoundBox {
        self.children
            .iter()
            .map(Shape::bounding_box)
            .reduce(|acc, b| acc.add(b))
            .unwrap_or_else(|| BoundBox::from_point(Vector::ZERO))
    }

    fn length(&self) -> Option<f64> {
        self.total(Shape::length)
    }

    fn area(&self) -> Option<f64> {
        self.total(Shape::area)
    }

    fn volume(&self) -> Option<f64> {
        self.total(Shape::volume)
    }

    fn distance_to(&self, point: &Vector) -> f64 {
        self.children
            .iter()
            .map(|c| c.distance_to(point))
            .fold(f64::INFINITY, f64::min)
    }

    fn sub_shapes(&self, kind: ShapeKind) -> Vec<Shape> {
        topology::collect_sub_shapes(&self.children, kind)
    }
}
