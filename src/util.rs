pub mod math {
    use glam::Vec3;

    pub fn degree_to_radian(degree: f32) -> f32 {
        degree * std::f32::consts::PI / 180.0
    }

    /// Mirror `direction` about `normal`. `normal` must be unit length.
    #[inline]
    pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
        direction - 2.0 * direction.dot(normal) * normal
    }

    pub fn is_finite(value: Vec3) -> bool {
        value.x.is_finite() && value.y.is_finite() && value.z.is_finite()
    }

    pub fn is_non_negative(value: Vec3) -> bool {
        value.x >= 0.0 && value.y >= 0.0 && value.z >= 0.0
    }

    pub fn vec3_from(value: [f32; 3]) -> Vec3 {
        Vec3::new(value[0], value[1], value[2])
    }

}
