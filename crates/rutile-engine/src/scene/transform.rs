use glam::{Mat4, Vec3};

/// Position / rotation / scale of the drawable.
///
/// `rotation` is Euler angles in degrees, applied X then Y then Z. The world
/// matrix is cached and only changes on [`calculate_matrix`](Self::calculate_matrix).
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    matrix: Mat4,
}

impl Transform {
    /// Recomputes and returns the cached `T * R * S` matrix.
    pub fn calculate_matrix(&mut self) -> Mat4 {
        let translation = Mat4::from_translation(self.position);
        let rotation = Mat4::from_rotation_z(self.rotation.z.to_radians())
            * Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_x(self.rotation.x.to_radians());
        let scale = Mat4::from_scale(self.scale);

        self.matrix = translation * rotation * scale;
        self.matrix
    }

    /// Matrix as of the last `calculate_matrix` call.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            matrix: Mat4::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_is_stale_until_recalculated() {
        let mut t = Transform::default();
        t.position = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(t.matrix(), Mat4::IDENTITY);

        let m = t.calculate_matrix();
        assert_eq!(m, t.matrix());
        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn scale_applies_before_translation() {
        let mut t = Transform {
            position: Vec3::new(10.0, 0.0, 0.0),
            scale: Vec3::splat(2.0),
            ..Default::default()
        };
        let p = t.calculate_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(12.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn rotation_is_in_degrees() {
        let mut t = Transform {
            rotation: Vec3::new(0.0, 0.0, 90.0),
            ..Default::default()
        };
        let p = t.calculate_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::Y).length() < 1e-5);
    }
}
