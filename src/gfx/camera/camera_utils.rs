use cgmath::{Deg, Matrix4, Quaternion, Rotation3, Vector3};

/// Rotation from Euler angles in degrees, applied Z then Y then X
/// (`q = qz * qy * qx`).
pub fn quaternion_from_euler_deg(rotation: Vector3<f32>) -> Quaternion<f32> {
    Quaternion::from_angle_z(Deg(rotation.z))
        * Quaternion::from_angle_y(Deg(rotation.y))
        * Quaternion::from_angle_x(Deg(rotation.x))
}

/// `T(translation) * R(rotation) * S(scale)`, rotation in Euler degrees.
pub fn compose_transform(
    translation: Vector3<f32>,
    rotation: Vector3<f32>,
    scale: Vector3<f32>,
) -> Matrix4<f32> {
    Matrix4::from_translation(translation)
        * Matrix4::from(quaternion_from_euler_deg(rotation))
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
