//! Rotation conversions

use cgmath::{Matrix3, Vector3};
use std::f32::consts::FRAC_PI_2;

const GIMBAL_EPSILON: f32 = 0.0001;

/// Extracts ZYX Euler angles (radians) from a rotation matrix.
///
/// Returns `(x, y, z)` such that `m = Rz(z) * Ry(y) * Rx(x)`. When the matrix
/// is in gimbal lock (`|m[0][2]| >= 1 - ε`) the Y angle is pinned to `±π/2`,
/// the X angle absorbs the remaining roll and the Z angle is set to zero.
pub fn rotation_matrix_to_euler_angles(m: &Matrix3<f32>) -> Vector3<f32> {
    // cgmath is column-major: m.x is the first column, m.x.z its third row.
    let sin_y = -m.x.z;

    let (x, y, z) = if sin_y >= 1.0 - GIMBAL_EPSILON {
        (m.y.x.atan2(m.y.y), FRAC_PI_2, 0.0)
    } else if sin_y <= -1.0 + GIMBAL_EPSILON {
        ((-m.y.x).atan2(m.y.y), -FRAC_PI_2, 0.0)
    } else {
        let y = sin_y.asin();
        let c = y.cos();
        let x = (m.y.z / c).atan2(m.z.z / c);
        let z = (m.x.y / c).atan2(m.x.x / c);
        (x, y, z)
    };

    Vector3::new(x, y, z)
}
