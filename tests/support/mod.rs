//! Deterministic stand-in for the geometry kernel.
//!
//! Builds small topologies (segments, circles, boxes, cylinders) with known
//! measures so the query layer can be tested without a real BREP library.
#![allow(dead_code)]

use std::f64::consts::PI;

use cadframe::brep::topology;
use cadframe::{BoundBox, GeomType, KernelShape, Plane, Shape, ShapeKind, Vector};

/// Curve geometry carried by edges and wires.
#[derive(Debug, Clone)]
pub enum Curve {
    Segment(Vector, Vector),
    Circle { frame: Plane, radius: f64 },
    Polyline(Vec<Vector>),
}

impl Curve {
    fn length(&self) -> f64 {
        match self {
            Curve::Segment(a, b) => a.distance(b),
            Curve::Circle { radius, .. } => 2.0 * PI * radius,
            Curve::Polyline(pts) => pts.windows(2).map(|w| w[0].distance(&w[1])).sum(),
        }
    }

    fn position_at(&self, u: f64) -> Vector {
        match self {
            Curve::Segment(a, b) => *a + (*b - *a) * u,
            Curve::Circle { frame, radius } => {
                let t = 2.0 * PI * u;
                frame.origin() + (frame.x_dir() * t.cos() + frame.y_dir() * t.sin()) * *radius
            }
            Curve::Polyline(pts) => {
                let (i, local) = self.polyline_span(pts, u);
                pts[i] + (pts[i + 1] - pts[i]) * local
            }
        }
    }

    fn tangent_at(&self, u: f64) -> Vector {
        match self {
            Curve::Segment(a, b) => *b - *a,
            Curve::Circle { frame, .. } => {
                let t = 2.0 * PI * u;
                frame.y_dir() * t.cos() - frame.x_dir() * t.sin()
            }
            Curve::Polyline(pts) => {
                let (i, _) = self.polyline_span(pts, u);
                pts[i + 1] - pts[i]
            }
        }
    }

    /// Segment index and local parameter for arc-length fraction `u`.
    fn polyline_span(&self, pts: &[Vector], u: f64) -> (usize, f64) {
        let target = self.length() * u;
        let mut walked = 0.0;
        for i in 0..pts.len() - 1 {
            let seg = pts[i].distance(&pts[i + 1]);
            if walked + seg >= target - 1e-12 || i == pts.len() - 2 {
                let local = if seg > 0.0 { (target - walked) / seg } else { 0.0 };
                return (i, local.clamp(0.0, 1.0));
            }
            walked += seg;
        }
        (0, 0.0)
    }

    fn samples(&self, n: usize) -> Vec<Vector> {
        (0..=n).map(|i| self.position_at(i as f64 / n as f64)).collect()
    }
}

/// One synthetic topology object.
#[derive(Debug)]
pub struct MockShape {
    pub kind: ShapeKind,
    pub geom: Option<GeomType>,
    pub center: Vector,
    pub bbox: BoundBox,
    pub length: Option<f64>,
    pub area: Option<f64>,
    pub volume: Option<f64>,
    pub radius: Option<f64>,
    pub closed: bool,
    pub curve: Option<Curve>,
    pub frame: Option<Plane>,
    pub children: Vec<Shape>,
}

impl MockShape {
    fn new(kind: ShapeKind, center: Vector, bbox: BoundBox, children: Vec<Shape>) -> Self {
        Self {
            kind,
            geom: None,
            center,
            bbox,
            length: None,
            area: None,
            volume: None,
            radius: None,
            closed: false,
            curve: None,
            frame: None,
            children,
        }
    }
}

impl KernelShape for MockShape {
    fn kind(&self) -> ShapeKind {
        self.kind
    }

    fn geom_type(&self) -> Option<GeomType> {
        self.geom
    }

    fn center(&self) -> Vector {
        self.center
    }

    fn bounding_box(&self) -> BoundBox {
        self.bbox
    }

    fn length(&self) -> Option<f64> {
        self.length
    }

    fn area(&self) -> Option<f64> {
        self.area
    }

    fn volume(&self) -> Option<f64> {
        self.volume
    }

    fn radius(&self) -> Option<f64> {
        self.radius
    }

    fn distance_to(&self, point: &Vector) -> f64 {
        match &self.curve {
            Some(curve) => curve
                .samples(256)
                .iter()
                .map(|p| p.distance(point))
                .fold(f64::INFINITY, f64::min),
            None => self.bbox.distance_to_point(point),
        }
    }

    fn sub_shapes(&self, kind: ShapeKind) -> Vec<Shape> {
        topology::collect_sub_shapes(&self.children, kind)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn position_at(&self, u: f64) -> cadframe::Result<Vector> {
        match &self.curve {
            Some(c) => Ok(c.position_at(u)),
            None => Err(cadframe::CadError::Kernel(format!("{:?} has no curve", self.kind))),
        }
    }

    fn tangent_at(&self, u: f64) -> cadframe::Result<Vector> {
        match &self.curve {
            Some(c) => Ok(c.tangent_at(u)),
            None => Err(cadframe::CadError::Kernel(format!("{:?} has no curve", self.kind))),
        }
    }

    fn plane(&self) -> Option<Plane> {
        self.frame
    }
}

fn edge(curve: Curve, geom: GeomType, vertices: Vec<Shape>) -> Shape {
    let pts = curve.samples(64);
    let bbox = BoundBox::from_points(pts.iter().copied()).unwrap();
    let center = match &curve {
        Curve::Circle { frame, .. } => frame.origin(),
        _ => pts.iter().copied().sum::<Vector>() / pts.len() as f64,
    };
    let mut m = MockShape::new(ShapeKind::Edge, center, bbox, vertices);
    m.geom = Some(geom);
    m.length = Some(curve.length());
    m.closed = matches!(curve, Curve::Circle { .. });
    if let Curve::Circle { radius, .. } = &curve {
        m.radius = Some(*radius);
    }
    m.curve = Some(curve);
    Shape::from_native(m)
}

/// A straight edge between two existing vertices, so neighbours share them.
pub fn line_between(a: &Shape, b: &Shape) -> Shape {
    edge(
        Curve::Segment(a.center(), b.center()),
        GeomType::Line,
        vec![a.clone(), b.clone()],
    )
}

/// A straight edge with fresh end vertices.
pub fn line(a: impl Into<Vector>, b: impl Into<Vector>) -> Shape {
    line_between(&Shape::vertex(a), &Shape::vertex(b))
}

fn circle_frame(center: Vector, normal: Vector) -> Plane {
    Plane::new(center, None, Some(normal)).unwrap()
}

/// A full circle edge with its single seam vertex.
pub fn circle(center: impl Into<Vector>, radius: f64, normal: impl Into<Vector>) -> Shape {
    let frame = circle_frame(center.into(), normal.into());
    let seam = Shape::vertex(frame.origin() + frame.x_dir() * radius);
    circle_with_seam(frame, radius, seam)
}

fn circle_with_seam(frame: Plane, radius: f64, seam: Shape) -> Shape {
    edge(Curve::Circle { frame, radius }, GeomType::Circle, vec![seam])
}

/// An open or closed chain of straight edges through `points`, as one wire.
pub fn polyline(points: &[Vector]) -> Shape {
    let vertices: Vec<Shape> = points.iter().map(|p| Shape::vertex(*p)).collect();
    let edges: Vec<Shape> = vertices
        .windows(2)
        .map(|w| line_between(&w[0], &w[1]))
        .collect();
    let curve = Curve::Polyline(points.to_vec());
    let mut m = MockShape::new(
        ShapeKind::Wire,
        points.iter().copied().sum::<Vector>() / points.len() as f64,
        BoundBox::from_points(points.iter().copied()).unwrap(),
        edges,
    );
    m.length = Some(curve.length());
    m.closed = points.first().unwrap().distance(points.last().unwrap()) < 1e-9;
    m.curve = Some(curve);
    Shape::from_native(m)
}

fn wire(edges: Vec<Shape>) -> Shape {
    let bbox = edges
        .iter()
        .map(Shape::bounding_box)
        .reduce(|a, b| a.add(b))
        .unwrap();
    let mut m = MockShape::new(ShapeKind::Wire, bbox.center(), bbox, edges);
    m.length = Some(m.children.iter().map(|e| e.length().unwrap()).sum());
    m.closed = true;
    Shape::from_native(m)
}

fn planar_face(edges: Vec<Shape>, normal: Vector, area: f64) -> Shape {
    let w = wire(edges);
    let bbox = w.bounding_box();
    let center = bbox.center();
    let mut m = MockShape::new(ShapeKind::Face, center, bbox, vec![w]);
    m.geom = Some(GeomType::Plane);
    m.area = Some(area);
    m.frame = Some(Plane::new(center, None, Some(normal)).unwrap());
    Shape::from_native(m)
}

fn closed_solid(faces: Vec<Shape>, volume: f64) -> Shape {
    let bbox = faces
        .iter()
        .map(Shape::bounding_box)
        .reduce(|a, b| a.add(b))
        .unwrap();
    let mut shell = MockShape::new(ShapeKind::Shell, bbox.center(), bbox, faces);
    shell.area = Some(shell.children.iter().map(|f| f.area().unwrap()).sum());
    shell.closed = true;
    let shell = Shape::from_native(shell);
    let area = shell.area().ok();
    let mut solid = MockShape::new(ShapeKind::Solid, bbox.center(), bbox, vec![shell]);
    solid.volume = Some(volume);
    solid.area = area;
    solid.closed = true;
    Shape::from_native(solid)
}

/// An axis-aligned box from the origin to `(l, w, h)`.
///
/// 8 shared vertices, 12 shared edges, 6 faces, 1 shell, 1 solid.
pub fn make_box(l: f64, w: f64, h: f64) -> Shape {
    let dims = [l, w, h];
    let vertices: Vec<Shape> = (0..8)
        .map(|i| {
            Shape::vertex(Vector::new(
                if i & 1 != 0 { l } else { 0.0 },
                if i & 2 != 0 { w } else { 0.0 },
                if i & 4 != 0 { h } else { 0.0 },
            ))
        })
        .collect();

    // edges join vertex indices differing in exactly one bit
    let mut edges: Vec<(usize, usize, Shape)> = Vec::new();
    for bit in [1, 2, 4] {
        for i in (0..8).filter(|i| i & bit == 0) {
            edges.push((i, i | bit, line_between(&vertices[i], &vertices[i | bit])));
        }
    }

    let mut faces = Vec::new();
    for (axis, bit) in [1usize, 2, 4].into_iter().enumerate() {
        for side in [0, bit] {
            let on_face = |v: usize| v & bit == side;
            let face_edges: Vec<Shape> = edges
                .iter()
                .filter(|(a, b, _)| on_face(*a) && on_face(*b))
                .map(|(_, _, e)| e.clone())
                .collect();
            let mut normal = [0.0; 3];
            normal[axis] = if side == 0 { -1.0 } else { 1.0 };
            let area = dims[(axis + 1) % 3] * dims[(axis + 2) % 3];
            faces.push(planar_face(face_edges, Vector::from(normal), area));
        }
    }
    closed_solid(faces, l * w * h)
}

/// A cylinder of radius `r` standing on the XY plane up to `h`.
///
/// Two circles and a seam line; two planar caps and one cylindrical face.
pub fn make_cylinder(r: f64, h: f64) -> Shape {
    let bottom_frame = circle_frame(Vector::ZERO, Vector::Z);
    let top_frame = circle_frame(Vector::new(0.0, 0.0, h), Vector::Z);
    let v0 = Shape::vertex(Vector::new(r, 0.0, 0.0));
    let v1 = Shape::vertex(Vector::new(r, 0.0, h));
    let bottom = circle_with_seam(bottom_frame, r, v0.clone());
    let top = circle_with_seam(top_frame, r, v1.clone());
    let seam = line_between(&v0, &v1);

    let cap_area = PI * r * r;
    let bottom_face = planar_face(vec![bottom.clone()], -Vector::Z, cap_area);
    let top_face = planar_face(vec![top.clone()], Vector::Z, cap_area);

    let side_wire = wire(vec![bottom, seam.clone(), top, seam]);
    let bbox = side_wire.bounding_box();
    let mut side = MockShape::new(
        ShapeKind::Face,
        Vector::new(0.0, 0.0, h / 2.0),
        bbox,
        vec![side_wire],
    );
    side.geom = Some(GeomType::Cylinder);
    side.area = Some(2.0 * PI * r * h);
    side.radius = Some(r);
    let side = Shape::from_native(side);

    closed_solid(vec![bottom_face, side, top_face], cap_area * h)
}
