use crate::ray::Ray;
use crate::util::math::degree_to_radian;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: glam::Vec3,
    pub target: glam::Vec3,
    pub up: glam::Vec3,
    pub aspect: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

impl Camera {
    pub fn look_at(eye: glam::Vec3, target: glam::Vec3, up: glam::Vec3) -> Self {
        Self {
            eye,
            target,
            up,
            ..Self::default()
        }
    }

    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov_y = degree_to_radian(degrees);
        self
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Orthonormal `(right, up, forward)` basis of the view.
    pub fn basis(&self) -> (glam::Vec3, glam::Vec3, glam::Vec3) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// Ray through normalized device coordinates, `(-1, -1)` bottom left and
    /// `(1, 1)` top right. The direction is unit length.
    pub fn primary_ray(&self, coord: glam::Vec2) -> Ray {
        let (right, up, forward) = self.basis();
        let half_height = (self.fov_y * 0.5).tan();
        let half_width = self.aspect * half_height;

        let direction =
            (forward + right * (coord.x * half_width) + up * (coord.y * half_height)).normalize();
        Ray::new(self.eye, direction)
    }

    /// Ray through the center of pixel `(x, y)`, row 0 at the top.
    pub fn pixel_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let u = (x as f32 + 0.5) / width as f32;
        let v = (y as f32 + 0.5) / height as f32;
        let coord = glam::Vec2::new(u * 2.0 - 1.0, 1.0 - v * 2.0);
        self.primary_ray(coord)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: glam::Vec3::new(0.0, 0.0, 5.0),
            target: glam::Vec3::ZERO,
            up: glam::Vec3::Y,
            aspect: 1.0,
            fov_y: degree_to_radian(45.0),
        }
    }
}
