//! # Math Utilities
//!
//! Coordinate conversions layered on top of `cgmath`.
//!
//! - [`spherical`] - Cartesian ↔ spherical coordinates used by the orbit controls
//! - [`conversion`] - Euler-angle extraction from rotation matrices

pub mod conversion;
pub mod spherical;

pub use conversion::rotation_matrix_to_euler_angles;
pub use spherical::{to_cartesian, to_spherical, SphericalCoord};
