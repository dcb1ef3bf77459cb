//! Whitted-style tracing: local shading plus a bounded chain of mirror bounces.

use glam::{Vec3, Vec4};

use crate::ray::{HitInfo, Ray};
use crate::scene::Scene;
use crate::shade::shade;
use crate::util::math::reflect;

/// Trace `ray` through `scene` with the default ray offset.
pub fn trace(scene: &Scene, ray: &Ray, bounce_limit: u32) -> Vec4 {
    Tracer::new(bounce_limit).trace(scene, ray)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracer {
    pub bounce_limit: u32,
    /// Distance secondary rays are pushed off a surface along its normal.
    pub epsilon: f32,
}

/// Loop-carried state of the reflection chain.
#[derive(Debug, Clone, Copy)]
struct Bounce {
    ray: Ray,
    hit: HitInfo,
    attenuation: Vec3,
}

enum Reflection {
    Hit { radiance: Vec3, next: Bounce },
    Escaped { radiance: Vec3 },
}

impl Tracer {
    pub const DEFAULT_EPSILON: f32 = 0.001;

    pub fn new(bounce_limit: u32) -> Self {
        Self {
            bounce_limit,
            epsilon: Self::DEFAULT_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Resolve the color seen along `ray`. Always opaque.
    pub fn trace(&self, scene: &Scene, ray: &Ray) -> Vec4 {
        let Some(hit) = scene.intersect(ray) else {
            return scene.sample_environment(ray.direction).extend(1.0);
        };

        let view = (-ray.direction).normalize();
        let color = self.shade_hit(scene, &hit, view);

        let mut reflection = Vec3::ZERO;
        let mut state = Bounce {
            ray: *ray,
            hit,
            attenuation: hit.material.k_s,
        };

        for _ in 0..self.bounce_limit {
            let k_s = state.attenuation;
            if k_s.x + k_s.y + k_s.z <= 0.0 {
                break;
            }

            match self.reflect(scene, &state) {
                Reflection::Hit { radiance, next } => {
                    reflection += radiance;
                    state = next;
                }
                Reflection::Escaped { radiance } => {
                    reflection += radiance;
                    break;
                }
            }
        }

        (color + reflection).extend(1.0)
    }

    fn reflect(&self, scene: &Scene, state: &Bounce) -> Reflection {
        let Bounce {
            ray,
            hit,
            attenuation,
        } = state;

        let reflected = Ray::new(
            hit.position + self.epsilon * hit.normal,
            reflect(ray.direction, hit.normal),
        );

        match scene.intersect(&reflected) {
            Some(next_hit) => {
                let view = (-reflected.direction).normalize();
                Reflection::Hit {
                    radiance: *attenuation * self.shade_hit(scene, &next_hit, view),
                    next: Bounce {
                        ray: reflected,
                        hit: next_hit,
                        attenuation: *attenuation * next_hit.material.k_s,
                    },
                }
            }
            None => Reflection::Escaped {
                radiance: *attenuation * scene.sample_environment(reflected.direction),
            },
        }
    }

    fn shade_hit(&self, scene: &Scene, hit: &HitInfo, view: Vec3) -> Vec3 {
        shade(
            scene,
            &hit.material,
            hit.position,
            hit.normal,
            view,
            self.epsilon,
        )
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(4)
    }
}
