//! Spherical coordinates
//!
//! `theta` is the polar angle measured from the +Z axis and `phi` is the
//! azimuth in the XY plane, measured from +X towards +Y.

use cgmath::{InnerSpace, Vector3};

/// A point in spherical coordinates.
///
/// Valid values satisfy `radius >= 0`, `theta ∈ [0, π]` and `phi ∈ (-π, π]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCoord {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl SphericalCoord {
    pub fn new(radius: f32, theta: f32, phi: f32) -> Self {
        Self { radius, theta, phi }
    }
}

/// Converts a Cartesian point to spherical coordinates.
///
/// The input must not be the zero vector; the polar angle is undefined there
/// and the result will contain NaN.
pub fn to_spherical(v: Vector3<f32>) -> SphericalCoord {
    let radius = v.magnitude();
    let phi = v.y.atan2(v.x);
    let theta = (v.z / radius).acos();

    SphericalCoord { radius, theta, phi }
}

/// Converts spherical coordinates back to a Cartesian point.
pub fn to_cartesian(s: SphericalCoord) -> Vector3<f32> {
    let (sin_theta, cos_theta) = s.theta.sin_cos();
    let (sin_phi, cos_phi) = s.phi.sin_cos();

    Vector3::new(
        s.radius * sin_theta * cos_phi,
        s.radius * sin_theta * sin_phi,
        s.radius * cos_theta,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::f32::consts::PI;

    const EPS: f32 = 1e-4;

    fn assert_spherical_eq(actual: SphericalCoord, expected: SphericalCoord) {
        assert!(
            (actual.radius - expected.radius).abs() < EPS
                && (actual.theta - expected.theta).abs() < EPS
                && (actual.phi - expected.phi).abs() < EPS,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    fn assert_vec_eq(actual: Vector3<f32>, expected: Vector3<f32>) {
        assert!(
            (actual - expected).magnitude() < EPS,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn test_axis_points_to_spherical() {
        assert_spherical_eq(
            to_spherical(Vector3::new(1.0, 0.0, 0.0)),
            SphericalCoord::new(1.0, PI / 2.0, 0.0),
        );
        assert_spherical_eq(
            to_spherical(Vector3::new(-1.0, 0.0, 0.0)),
            SphericalCoord::new(1.0, PI / 2.0, PI),
        );
        assert_spherical_eq(
            to_spherical(Vector3::new(0.0, 1.0, 0.0)),
            SphericalCoord::new(1.0, PI / 2.0, PI / 2.0),
        );
        assert_spherical_eq(
            to_spherical(Vector3::new(0.0, -1.0, 0.0)),
            SphericalCoord::new(1.0, PI / 2.0, -PI / 2.0),
        );
        assert_spherical_eq(
            to_spherical(Vector3::new(0.0, 0.0, 1.0)),
            SphericalCoord::new(1.0, 0.0, 0.0),
        );
        assert_spherical_eq(
            to_spherical(Vector3::new(0.0, 0.0, -1.0)),
            SphericalCoord::new(1.0, PI, 0.0),
        );
    }

    #[test]
    fn test_octant_points_to_spherical() {
        let z = std::f32::consts::FRAC_1_SQRT_2;
        assert_spherical_eq(
            to_spherical(Vector3::new(0.5, 0.5, z)),
            SphericalCoord::new(1.0, PI / 4.0, PI / 4.0),
        );
        assert_spherical_eq(
            to_spherical(Vector3::new(-0.5, -0.5, z)),
            SphericalCoord::new(1.0, PI / 4.0, -3.0 * PI / 4.0),
        );
        assert_spherical_eq(
            to_spherical(Vector3::new(-0.5, 0.5, -z)),
            SphericalCoord::new(1.0, 3.0 * PI / 4.0, 3.0 * PI / 4.0),
        );
    }

    #[test]
    fn test_spherical_to_cartesian() {
        assert_vec_eq(
            to_cartesian(SphericalCoord::new(1.0, PI / 2.0, PI / 2.0)),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert_vec_eq(
            to_cartesian(SphericalCoord::new(1.0, PI, 0.0)),
            Vector3::new(0.0, 0.0, -1.0),
        );
        assert_vec_eq(
            to_cartesian(SphericalCoord::new(1.0, 3.0 * PI / 4.0, -PI / 4.0)),
            Vector3::new(0.5, -0.5, -std::f32::consts::FRAC_1_SQRT_2),
        );
    }

    #[test]
    fn test_cartesian_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let v = Vector3::new(
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
            );
            if v.magnitude() < 1e-3 {
                continue;
            }
            let back = to_cartesian(to_spherical(v));
            assert!((back - v).magnitude() < 1e-3 * v.magnitude().max(1.0));
        }
    }

    #[test]
    fn test_spherical_round_trip() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let s = SphericalCoord::new(
                rng.random_range(0.1..10.0),
                // Stay off the poles where phi is not recoverable.
                rng.random_range(0.01..(PI - 0.01)),
                rng.random_range((-PI + 0.01)..PI),
            );
            let back = to_spherical(to_cartesian(s));
            assert!((back.radius - s.radius).abs() < 1e-3);
            assert!((back.theta - s.theta).abs() < 1e-3);

            let mut dphi = (back.phi - s.phi).abs();
            if dphi > PI {
                dphi = 2.0 * PI - dphi;
            }
            assert!(dphi < 1e-2, "phi {} vs {}", back.phi, s.phi);
        }
    }

    #[test]
    fn test_zero_vector_is_not_corrected() {
        let s = to_spherical(Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(s.radius, 0.0);
        assert!(s.theta.is_nan());
    }
}
