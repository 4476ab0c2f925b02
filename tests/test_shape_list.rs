//! Selector queries over mock-kernel boxes and cylinders

mod support;

use cadframe::{Axis, CadError, Filter, GeomType, Location, ShapeKind, ShapeList, SortKey, Vector};
use support::{make_box, make_cylinder};

#[test]
fn test_box_topology_counts() {
    let b = make_box(1.0, 2.0, 3.0);
    assert_eq!(b.kind(), ShapeKind::Solid);
    assert_eq!(b.vertices().len(), 8);
    assert_eq!(b.edges().len(), 12);
    assert_eq!(b.wires().len(), 6);
    assert_eq!(b.faces().len(), 6);
    assert_eq!(b.shells().len(), 1);
    assert_eq!(b.solids().len(), 1);
    assert_eq!(
        b.topology_summary(),
        "Solid: 1, Shell: 1, Face: 6, Wire: 6, Edge: 12, Vertex: 8"
    );
}

#[test]
fn test_filter_by_axis() {
    let b = make_box(1.0, 1.0, 1.0);
    assert_eq!(b.faces().filter_by(Axis::X, false).len(), 2);
    assert_eq!(b.faces().filter_by(Axis::X, true).len(), 4);
    assert_eq!(b.edges().filter_by(Axis::X, false).len(), 4);
    assert_eq!(b.vertices().filter_by(Axis::X, false).len(), 0);
}

#[test]
fn test_filter_by_geom_type() {
    let c = make_cylinder(1.0, 2.0);
    assert_eq!(c.faces().filter_by_geom_type(GeomType::Plane).len(), 2);
    assert_eq!(c.faces().filter_by_geom_type(GeomType::Cylinder).len(), 1);
    assert_eq!(c.edges().filter_by(GeomType::Circle, false).len(), 2);
    assert_eq!(c.edges().filter_by(GeomType::Line, false).len(), 1);

    let planar: Filter = "plane".parse().unwrap();
    assert_eq!(c.faces().filter_by(planar, false).len(), 2);
    // the lateral face has no normal, so only the caps pass
    assert_eq!(c.faces().filter_by(Axis::Z, false).len(), 2);
}

#[test]
fn test_filter_by_predicate() {
    let b = make_box(1.0, 2.0, 3.0);
    let big = b.faces().filter_by(Filter::predicate(|f| f.area().unwrap_or(0.0) > 2.5), false);
    assert_eq!(big.len(), 4);
}

#[test]
fn test_mixed_list_sub_shapes() {
    let list = ShapeList::from(vec![make_box(1.0, 1.0, 1.0), make_cylinder(1.0, 1.0)]);
    assert_eq!(list.faces().len(), 9);
    assert_eq!(list.solids().len(), 2);
    assert_eq!(list.edges().len(), 15);
}

#[test]
fn test_sort_faces_along_axis() {
    let b = make_box(1.0, 2.0, 3.0);
    let faces = b.faces().sort_by(Axis::Z, false).unwrap();
    assert!((faces[0].center().z - 0.0).abs() < 1e-10);
    assert!((faces[5].center().z - 3.0).abs() < 1e-10);

    let down = b.faces().sort_by(Axis::Z, true).unwrap();
    assert!((down[0].center().z - 3.0).abs() < 1e-10);
}

#[test]
fn test_sort_respects_location() {
    let b = make_box(1.0, 1.0, 1.0).moved(&Location::from_position((10.0, 0.0, 0.0)));
    let faces = b.faces().sort_by(Axis::X, false).unwrap();
    assert!((faces[0].center().x - 10.0).abs() < 1e-10);
    assert!((faces[5].center().x - 11.0).abs() < 1e-10);
}

#[test]
fn test_sort_by_distance() {
    let b = make_box(1.0, 2.0, 3.0);
    let nearest = b.faces().sort_by_distance(Vector::new(0.5, 1.0, 10.0), false);
    assert!((nearest[0].center().z - 3.0).abs() < 1e-10);
    let farthest = b.faces().sort_by_distance(Vector::new(0.5, 1.0, 10.0), true);
    assert!((farthest[0].center().z - 0.0).abs() < 1e-10);
}

#[test]
fn test_sort_by_radius_needs_circles() {
    let c = make_cylinder(2.0, 1.0);
    assert!(matches!(
        c.edges().sort_by(SortKey::Radius, false),
        Err(CadError::DegenerateGeometry(_))
    ));
    let circles = c
        .edges()
        .filter_by(GeomType::Circle, false)
        .sort_by(SortKey::Radius, false)
        .unwrap();
    assert_eq!(circles.len(), 2);
    assert!((circles[0].radius().unwrap() - 2.0).abs() < 1e-10);
}

#[test]
fn test_group_by_area() {
    let b = make_box(1.0, 2.0, 3.0);
    let groups = b.faces().group_by(SortKey::Area, false, 6).unwrap();
    assert_eq!(groups.keys(), &[2.0, 3.0, 6.0]);
    assert!(groups.iter().all(|g| g.len() == 2));

    let reversed = b.faces().group_by(SortKey::Area, true, 6).unwrap();
    assert_eq!(reversed.keys(), &[6.0, 3.0, 2.0]);
}

#[test]
fn test_group_lookup_by_member() {
    let b = make_box(1.0, 2.0, 3.0);
    let edges = b.edges();
    let groups = edges.group_by(SortKey::Length, false, 6).unwrap();
    assert_eq!(groups.len(), 3);

    let vertical = edges.filter_by(Axis::Z, false);
    let group = groups.group_for(&vertical[0]).unwrap();
    assert_eq!(group.len(), 4);
    assert!(group.iter().all(|e| (e.length().unwrap() - 3.0).abs() < 1e-10));

    assert_eq!(groups.group(&1.0).unwrap().len(), 4);
    assert!(matches!(groups.group(&5.0), Err(CadError::KeyNotFound(_))));

    for edge in edges.iter() {
        let own = groups.group_for(edge).unwrap();
        assert!(own.iter().any(|e| e.is_same(edge)));
    }
    let short = groups.group_for(&edges.filter_by(Axis::X, false)[0]).unwrap();
    assert!(!std::ptr::eq(group, short));
    assert!(std::ptr::eq(group, groups.group(&3.0).unwrap()));
    assert!(std::ptr::eq(short, groups.group(&1.0).unwrap()));
}

#[test]
fn test_take_sorted() {
    let b = make_box(1.0, 1.0, 1.0);
    let bottom = b.faces().take_sorted(Axis::Z).unwrap();
    assert_eq!(bottom.len(), 1);
    let top = b.faces().take_sorted_last(Axis::Z).unwrap();
    assert!((top[0].center().z - 1.0).abs() < 1e-10);

    let layers = b.faces().group_by(Axis::Z, false, 6).unwrap();
    let sizes: Vec<usize> = layers.iter().map(|g| g.len()).collect();
    assert_eq!(sizes, vec![1, 4, 1]);
}

#[test]
fn test_group_by_key_first_seen() {
    let c = make_cylinder(1.0, 1.0);
    let groups = c.faces().group_by_key(|f| f.geom_type()).unwrap();
    assert_eq!(groups.keys(), &[Some(GeomType::Plane), Some(GeomType::Cylinder)]);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_filter_by_position() {
    let b = make_box(1.0, 1.0, 2.0);
    let faces = b.faces();
    assert_eq!(faces.filter_by_position(&Axis::Z, 0.0, 1.0, (true, true)).len(), 5);
    assert_eq!(faces.filter_by_position(&Axis::Z, 0.0, 1.0, (false, true)).len(), 4);
    assert_eq!(faces.filter_by_position(&Axis::Z, 0.5, 1.5, (true, true)).len(), 4);
}

#[test]
fn test_singular_accessors() {
    let b = make_box(1.0, 1.0, 1.0);
    assert_eq!(b.to_list().solid().unwrap().kind(), ShapeKind::Solid);
    // several faces: the first one is returned
    assert_eq!(b.faces().face().unwrap().kind(), ShapeKind::Face);
    assert!(matches!(b.edges().face(), Err(CadError::InvalidValue(_))));
    assert!(matches!(ShapeList::new().vertex(), Err(CadError::InvalidValue(_))));
}

#[test]
fn test_unique_and_center() {
    let b = make_box(2.0, 2.0, 2.0);
    let twice = ShapeList::from(vec![b.clone(), b.clone()]);
    assert_eq!(twice.len(), 2);
    assert_eq!(twice.clone().unique().len(), 1);
    assert_eq!(twice.faces().len(), 6);
    assert_eq!(b.faces().center().unwrap(), Vector::new(1.0, 1.0, 1.0));
}

#[test]
fn test_chained_selection() {
    let b = make_box(1.0, 2.0, 3.0);
    let top_edges = b
        .faces()
        .sort_by(Axis::Z, false)
        .unwrap()
        .last()
        .unwrap()
        .edges()
        .sort_by(SortKey::Length, false)
        .unwrap();
    assert_eq!(top_edges.len(), 4);
    assert!((top_edges[0].length().unwrap() - 1.0).abs() < 1e-10);
    assert!(top_edges.iter().all(|e| (e.center().z - 3.0).abs() < 1e-10));
}
