use glam::{Mat4, Vec3};

use crate::coords::Resolution;

/// Perspective camera with a yaw/pitch pose.
///
/// `yaw` and `pitch` are in radians; yaw `-π/2` looks down `-Z`. The projection
/// is never cached: callers pass the target size every frame so the aspect ratio
/// always matches the attachments being drawn into.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Camera {
    /// Pitch stays just short of straight up/down so `forward` never aligns with `UP`.
    pub const PITCH_LIMIT: f32 = 89.0_f32 * (std::f32::consts::PI / 180.0);

    const UP: Vec3 = Vec3::Y;

    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cy * cp, sp, sy * cp).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Self::UP).normalize()
    }

    pub fn up(&self) -> Vec3 {
        Self::UP
    }

    /// View matrix from the current pose.
    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Self::UP)
    }

    /// Perspective projection for the given aspect ratio.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    /// `projection * view` for a target of `size`.
    pub fn view_projection(&self, size: Resolution) -> Mat4 {
        self.projection(size.aspect_ratio()) * self.view()
    }

    /// Applies yaw/pitch deltas (radians), clamping pitch.
    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 2.0),
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_looks_down_negative_z() {
        let cam = Camera::default();
        assert!(approx(cam.forward(), Vec3::NEG_Z));
        assert!(approx(cam.right(), Vec3::X));
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = Camera::default();
        let size = Resolution::new(800, 600).unwrap();
        let clip = cam.view_projection(size) * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn projection_uses_width_over_height() {
        let cam = Camera::default();
        let wide = cam.projection(Resolution::new(800, 600).unwrap().aspect_ratio());
        let expected = Mat4::perspective_rh(45f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);
        assert_eq!(wide, expected);

        // Different targets produce different projections; nothing is cached.
        let tall = cam.view_projection(Resolution::new(480, 640).unwrap());
        assert_ne!(tall, cam.view_projection(Resolution::new(640, 480).unwrap()));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.rotate(0.0, 10.0);
        assert_eq!(cam.pitch, Camera::PITCH_LIMIT);
        cam.rotate(0.0, -20.0);
        assert_eq!(cam.pitch, -Camera::PITCH_LIMIT);
    }
}
