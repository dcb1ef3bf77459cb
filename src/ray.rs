use glam::Vec3;

use crate::scene::{Material, Scene, Sphere};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    pub t: f32,
    pub position: Vec3,
    /// Unit length, pointing away from the sphere center.
    pub normal: Vec3,
    pub material: Material,
}

impl Sphere {
    /// Parametric distance of the nearest forward intersection, if any.
    ///
    /// The near root is preferred; the far root is used only when the near one
    /// lies behind the ray origin. Grazing (tangent) rays count as a miss.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        // (d.d)t^2 + 2(oc.d)t + (oc.oc - r^2) = 0
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant <= 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let t1 = (-b - sqrt_d) / (2.0 * a);
        let t2 = (-b + sqrt_d) / (2.0 * a);

        let t = if t1 >= 0.0 { t1 } else { t2 };
        if t > 0.0 {
            Some(t)
        } else {
            None
        }
    }

    fn hit_info(&self, ray: &Ray, t: f32) -> HitInfo {
        let position = ray.at(t);
        HitInfo {
            t,
            position,
            normal: (position - self.center).normalize(),
            material: self.material,
        }
    }
}

impl Scene {
    /// Closest sphere hit along `ray`. Equal distances resolve to the sphere
    /// that comes first in the scene.
    pub fn intersect(&self, ray: &Ray) -> Option<HitInfo> {
        let mut closest: Option<(f32, &Sphere)> = None;

        for sphere in self.spheres() {
            if let Some(t) = sphere.intersect(ray) {
                if closest.map_or(true, |(best, _)| t < best) {
                    closest = Some((t, sphere));
                }
            }
        }

        closest.map(|(t, sphere)| sphere.hit_info(ray, t))
    }

    pub fn is_occluded(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }
}
