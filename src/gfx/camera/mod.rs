pub mod camera_utils;
pub mod perspective_camera;

// Re-export main types
pub use camera_utils::{compose_transform, convert_matrix4_to_array, quaternion_from_euler_deg};
pub use perspective_camera::{Camera, CameraHook, LookAtBasis, WORLD_UP};
