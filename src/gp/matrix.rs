//! 4x4 homogeneous affine transform.
//!
//! Rows 0..3 hold the linear part and translation; row 3 is always
//! `(0, 0, 0, 1)`. Constructors reject anything else.

use std::fmt;
use std::ops::Mul;

use nalgebra::{Matrix4, Rotation3, Translation3, Unit};
use serde::{Deserialize, Serialize};

use super::{Axis, Vector};
use crate::precision;
use crate::{CadError, Result};

/// An affine transform stored as a homogeneous 4x4 matrix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    m: Matrix4<f64>,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new()
    }
}

impl Matrix {
    /// Creates the identity transform.
    pub fn new() -> Self {
        Self {
            m: Matrix4::identity(),
        }
    }

    /// Creates a matrix from 3 or 4 rows of 4 values.
    ///
    /// With 3 rows the last row is implied. A fourth row must be
    /// `(0, 0, 0, 1)`.
    pub fn from_rows(rows: &[&[f64]]) -> Result<Self> {
        if rows.len() != 3 && rows.len() != 4 {
            return Err(CadError::MalformedInput(format!(
                "matrix needs 3 or 4 rows, got {}",
                rows.len()
            )));
        }
        let mut m = Matrix4::identity();
        for (r, row) in rows.iter().enumerate() {
            if row.len() != 4 {
                return Err(CadError::MalformedInput(format!(
                    "matrix row {r} has {} values, expected 4",
                    row.len()
                )));
            }
            for (c, value) in row.iter().enumerate() {
                m[(r, c)] = *value;
            }
        }
        Self::from_na(m)
    }

    /// Creates a matrix from 3 rows; the last row is implied.
    pub fn from_rows3(rows: [[f64; 4]; 3]) -> Self {
        let mut m = Matrix4::identity();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                m[(r, c)] = *value;
            }
        }
        Self { m }
    }

    /// Creates a matrix from 4 rows; fails if the last row is not `(0, 0, 0, 1)`.
    pub fn from_rows4(rows: [[f64; 4]; 4]) -> Result<Self> {
        let slices: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        Self::from_rows(&slices)
    }

    pub(crate) fn from_na(m: Matrix4<f64>) -> Result<Self> {
        let last = [m[(3, 0)], m[(3, 1)], m[(3, 2)], m[(3, 3)]];
        let expected = [0.0, 0.0, 0.0, 1.0];
        if last
            .iter()
            .zip(expected.iter())
            .any(|(a, b)| (a - b).abs() > precision::RESOLUTION)
        {
            return Err(CadError::InvalidValue(format!(
                "last matrix row must be (0, 0, 0, 1), got {last:?}"
            )));
        }
        Ok(Self { m })
    }

    /// Wraps a matrix whose bottom row is known to be `(0, 0, 0, 1)`.
    #[inline]
    pub(crate) fn from_affine(m: Matrix4<f64>) -> Self {
        Self { m }
    }

    #[inline]
    pub(crate) fn as_na(&self) -> &Matrix4<f64> {
        &self.m
    }

    /// Returns the value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        if row > 3 || col > 3 {
            return Err(CadError::OutOfRange(format!(
                "matrix index ({row}, {col}) outside [0, 3] x [0, 3]"
            )));
        }
        Ok(self.m[(row, col)])
    }

    /// Returns all rows.
    pub fn rows(&self) -> [[f64; 4]; 4] {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.m[(r, c)];
            }
        }
        rows
    }

    /// Composes a rotation of `angle` radians about `axis` into this transform.
    ///
    /// The rotation is applied before the existing transform.
    pub fn rotate(&mut self, axis: &Axis, angle: f64) {
        *self = self.rotated(axis, angle);
    }

    /// Returns this transform with a rotation about `axis` composed in.
    pub fn rotated(&self, axis: &Axis, angle: f64) -> Matrix {
        let dir = Unit::new_unchecked(axis.direction().to_na());
        let p = axis.position().to_na();
        let rot = Translation3::from(p).to_homogeneous()
            * Rotation3::from_axis_angle(&dir, angle).to_homogeneous()
            * Translation3::from(-p).to_homogeneous();
        Matrix { m: self.m * rot }
    }

    /// Returns `self * other`: `other` is applied first.
    #[inline]
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix { m: self.m * other.m }
    }

    /// Applies this transform to a point.
    pub fn multiply_vector(&self, v: &Vector) -> Vector {
        Vector::from(self.m.transform_point(&v.to_point()))
    }

    /// Returns the inverse transform.
    ///
    /// Fails with `DegenerateGeometry` when the linear part is singular.
    pub fn inverse(&self) -> Result<Matrix> {
        if self.m.determinant().abs() <= precision::RESOLUTION {
            return Err(CadError::DegenerateGeometry("matrix is singular".into()));
        }
        self.m
            .try_inverse()
            .map(|m| Matrix { m })
            .ok_or_else(|| CadError::DegenerateGeometry("matrix is singular".into()))
    }

    /// Returns the transposed matrix (bottom row included).
    pub fn transposed(&self) -> [[f64; 4]; 4] {
        let mut rows = self.rows();
        for r in 0..4 {
            for c in 0..4 {
                rows[r][c] = self.m[(c, r)];
            }
        }
        rows
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, other: Matrix) -> Matrix {
        self.multiply(&other)
    }
}

impl Mul<Vector> for Matrix {
    type Output = Vector;

    fn mul(self, v: Vector) -> Vector {
        self.multiply_vector(&v)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matrix([")?;
        for r in 0..4 {
            if r > 0 {
                write!(f, ",\n        ")?;
            }
            write!(
                f,
                "[{:?}, {:?}, {:?}, {:?}]",
                self.m[(r, 0)],
                self.m[(r, 1)],
                self.m[(r, 2)],
                self.m[(r, 3)]
            )?;
        }
        write!(f, "])")
    }
}
