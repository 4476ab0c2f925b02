//! Precision constants for geometric comparisons.
//!
//! Every predicate that takes a tolerance has a `_within` variant; the
//! plain variant uses the values below.

use crate::gp::Vector;

/// Tolerance for point and vector equality.
/// Two vectors are equal if `|a - b| <= TOLERANCE * (1 + max(|a|, |b|))`.
/// Value: 1.0e-6
pub const TOLERANCE: f64 = 1.0e-6;

/// Linear tolerance for axis predicates (point-to-line distance).
/// Value: 1.0e-5
pub const LINEAR: f64 = 1.0e-5;

/// Angular tolerance for axis predicates, in degrees.
/// Value: 1.0e-5
pub const ANGULAR_DEG: f64 = 1.0e-5;

/// Confusion tolerance for checking coincidence of two points.
/// Value: 1.0e-7
pub const CONFUSION: f64 = 1.0e-7;

/// Numerical zero for normalization and determinant checks.
/// Value: 1.0e-12
pub const RESOLUTION: f64 = 1.0e-12;

/// Decimal digits that numeric group keys are rounded to.
pub const GROUP_DIGITS: i32 = 6;

/// Reference normal used by `Vector::get_signed_angle` when none is given.
///
/// With `-Z`, a clockwise turn seen from `+Z` is positive.
pub const DEFAULT_ANGLE_NORMAL: Vector = Vector::new(0.0, 0.0, -1.0);

/// Rounds `value` to `digits` decimal places.
#[inline]
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    let rounded = (value * scale).round() / scale;
    // collapse -0.0 so keys hash and print consistently
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Snaps values within `RESOLUTION` of zero to `+0.0`.
#[inline]
pub(crate) fn clean(value: f64) -> f64 {
    if value.abs() < RESOLUTION {
        0.0
    } else {
        value
    }
}
