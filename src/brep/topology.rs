//! Topological identity queries.
//!
//! Two handles denote the same entity when they share a kernel object and
//! an equal placement. Kernels and compounds use these helpers to gather
//! sub-entities without duplicates.

use std::collections::HashMap;

use super::{Shape, ShapeKind};
use crate::toploc::Location;

/// Drops handles that denote an entity already seen, keeping first occurrences.
pub fn unique<I: IntoIterator<Item = Shape>>(shapes: I) -> Vec<Shape> {
    let mut seen: HashMap<usize, Vec<Location>> = HashMap::new();
    let mut kept = Vec::new();
    for shape in shapes {
        let placements = seen.entry(shape.native_id()).or_default();
        if placements.iter().any(|loc| loc == shape.location()) {
            continue;
        }
        placements.push(*shape.location());
        kept.push(shape);
    }
    kept
}

/// Gathers the sub-entities of `kind` below each of `children`.
///
/// A child that is itself of `kind` contributes itself.
pub fn collect_sub_shapes(children: &[Shape], kind: ShapeKind) -> Vec<Shape> {
    unique(children.iter().flat_map(|child| child.sub_shapes(kind)))
}

/// Counts distinct sub-entities of every kind below (and including) `shape`.
pub fn kind_counts(shape: &Shape) -> Vec<(ShapeKind, usize)> {
    ShapeKind::ALL
        .into_iter()
        .map(|kind| (kind, shape.sub_shapes(kind).len()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::Vector;

    #[test]
    fn test_unique_by_identity_and_location() {
        let v = Shape::vertex(Vector::new(1.0, 0.0, 0.0));
        let same = v.clone();
        let moved = v.moved(&Location::from_position((0.0, 0.0, 1.0)));
        let twin = Shape::vertex(Vector::new(1.0, 0.0, 0.0));
        let kept = unique([v, same, moved, twin]);
        // the twin has its own kernel object, so it is distinct
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_collect_from_compound_children() {
        let a = Shape::vertex(Vector::ZERO);
        let b = Shape::vertex(Vector::X);
        let found = collect_sub_shapes(&[a.clone(), b, a], ShapeKind::Vertex);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_kind_counts() {
        let c = Shape::compound(vec![Shape::vertex(Vector::ZERO), Shape::vertex(Vector::X)]);
        assert_eq!(
            kind_counts(&c),
            vec![(ShapeKind::Vertex, 2), (ShapeKind::Compound, 1)]
        );
    }
}
