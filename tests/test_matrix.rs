//! 4x4 affine matrices

use approx::assert_relative_eq;
use cadframe::{Axis, CadError, Location, Matrix, Vector};

fn assert_rows(m: &Matrix, expected: [[f64; 4]; 4]) {
    let rows = m.rows();
    for r in 0..4 {
        for c in 0..4 {
            assert_relative_eq!(rows[r][c], expected[r][c], epsilon = 1e-9);
        }
    }
}

#[test]
fn test_rotate_about_x() {
    let (s, c) = 30f64.to_radians().sin_cos();
    let m = Matrix::new().rotated(&Axis::X, 30f64.to_radians());
    assert_rows(
        &m,
        [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    );
}

#[test]
fn test_rotate_about_offset_axis() {
    let axis = Axis::new((1.0, 0.0, 0.0), (0.0, 0.0, 1.0)).unwrap();
    let mut m = Matrix::new();
    m.rotate(&axis, std::f64::consts::FRAC_PI_2);
    let p = m.multiply_vector(&Vector::new(2.0, 0.0, 0.0));
    assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
    assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
}

#[test]
fn test_multiply_order() {
    let mx = Matrix::new().rotated(&Axis::X, std::f64::consts::FRAC_PI_2);
    let my = Matrix::new().rotated(&Axis::Y, std::f64::consts::FRAC_PI_2);
    // my is applied first: Z -> X, then X stays X
    let v = mx.multiply(&my) * Vector::Z;
    assert_relative_eq!(v.x, 1.0, epsilon = 1e-12);
    assert_relative_eq!(v.y, 0.0, epsilon = 1e-12);
    assert_relative_eq!(v.z, 0.0, epsilon = 1e-12);
    // mx first: Z -> -Y, then Y rotation leaves it
    let w = (my * mx) * Vector::Z;
    assert_relative_eq!(w.y, -1.0, epsilon = 1e-12);
}

#[test]
fn test_translation_applies_to_points() {
    let m = Matrix::from_rows3([
        [1.0, 0.0, 0.0, 1.0],
        [0.0, 1.0, 0.0, 2.0],
        [0.0, 0.0, 1.0, 3.0],
    ]);
    assert_eq!(m * Vector::new(1.0, 1.0, 1.0), Vector::new(2.0, 3.0, 4.0));
    assert_eq!(Vector::new(1.0, 1.0, 1.0).transform(&m), Vector::new(2.0, 3.0, 4.0));
}

#[test]
fn test_inverse() {
    let m = Matrix::from_rows3([
        [2.0, 0.0, 0.0, 4.0],
        [0.0, 3.0, 0.0, 6.0],
        [0.0, 0.0, 4.0, 8.0],
    ]);
    let inv = m.inverse().unwrap();
    assert_rows(
        &inv,
        [
            [0.5, 0.0, 0.0, -2.0],
            [0.0, 1.0 / 3.0, 0.0, -2.0],
            [0.0, 0.0, 0.25, -2.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    );
    assert_rows(&m.multiply(&inv), Matrix::new().rows());

    let flat = Matrix::from_rows3([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
    ]);
    assert!(matches!(flat.inverse(), Err(CadError::DegenerateGeometry(_))));
}

#[test]
fn test_transposed() {
    let m = Matrix::from_rows3([
        [1.0, 2.0, 3.0, 4.0],
        [5.0, 6.0, 7.0, 8.0],
        [9.0, 10.0, 11.0, 12.0],
    ]);
    let t = m.transposed();
    assert_eq!(t[0], [1.0, 5.0, 9.0, 0.0]);
    assert_eq!(t[3], [4.0, 8.0, 12.0, 1.0]);
}

#[test]
fn test_location_matrix_bridge() {
    let loc = Location::from_euler((1.0, 2.0, 3.0), [30.0, -20.0, 75.0]);
    let m = Matrix::from(&loc);
    assert_eq!(Location::from_matrix(&m).unwrap(), loc);

    let scaled = Matrix::from_rows3([
        [2.0, 0.0, 0.0, 0.0],
        [0.0, 2.0, 0.0, 0.0],
        [0.0, 0.0, 2.0, 0.0],
    ]);
    assert!(matches!(Location::from_matrix(&scaled), Err(CadError::InvalidValue(_))));
}
