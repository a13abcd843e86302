use glam::{DMat3, DVec3, DVec4};
use std::f64::consts::{PI, TAU};

/// Slack added before flooring in [`snap_angle`], so an angle sitting on a
/// midpoint up to radian rounding error still rounds up.
const SNAP_TOLERANCE: f64 = 1e-9;
/// Largest difference in radians that [`same_angle`] still treats as equal
const ANGLE_TOLERANCE: f64 = 1e-9;

/// Reduces an angle in radians into `(-PI, PI]`.
///
/// Angles already in range are returned untouched, which keeps the function
/// idempotent down to the bit.
pub fn wrap_angle(angle: f64) -> f64 {
    if !angle.is_finite() || (angle > -PI && angle <= PI) {
        return angle;
    }
    let reduced = angle.rem_euclid(TAU);
    if reduced > PI {
        reduced - TAU
    } else {
        reduced
    }
}

/// Quantizes an angle to the nearest multiple of `step`, rounding half up,
/// and wraps the result into `(-PI, PI]`.
///
/// A non-positive `step` disables snapping and only wraps.
pub fn snap_angle(angle: f64, step: f64) -> f64 {
    if step <= 0.0 || !step.is_finite() {
        return wrap_angle(angle);
    }
    let turns = angle.rem_euclid(TAU) / step;
    let snapped = (turns + 0.5 + SNAP_TOLERANCE).floor() * step;
    wrap_angle(snapped)
}

/// Whether two angles name the same direction, ignoring full turns and the
/// last-bit noise that snapping introduces.
pub fn same_angle(a: f64, b: f64) -> bool {
    wrap_angle(a - b).abs() <= ANGLE_TOLERANCE
}

/// Right-handed rotation about the X axis
pub fn rotation_x(angle: f64) -> DMat3 {
    DMat3::from_rotation_x(angle)
}

/// Right-handed rotation about the Y axis
pub fn rotation_y(angle: f64) -> DMat3 {
    DMat3::from_rotation_y(angle)
}

/// Lifts a Euclidean point to homogeneous coordinates with `w = 1`
pub fn to_homogeneous(point: DVec3) -> DVec4 {
    point.extend(1.0)
}
