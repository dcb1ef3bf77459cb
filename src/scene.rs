use glam::Vec3;
use thiserror::Error;

use crate::environment::Environment;
use crate::util::math::{is_finite, is_non_negative};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse coefficient.
    pub k_d: Vec3,
    /// Specular coefficient, also used to attenuate reflections.
    pub k_s: Vec3,
    /// Specular exponent.
    pub n: f32,
}

impl Material {
    pub fn diffuse(k_d: Vec3) -> Self {
        Self {
            k_d,
            k_s: Vec3::ZERO,
            n: 0.0,
        }
    }

    pub fn mirror() -> Self {
        Self {
            k_d: Vec3::ZERO,
            k_s: Vec3::ONE,
            n: 0.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            k_d: Vec3::splat(0.5),
            k_s: Vec3::ZERO,
            n: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,

    pub material: Material,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 0.5,
            material: Material::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub intensity: Vec3,
}

impl Light {
    pub fn new(position: Vec3, intensity: Vec3) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("sphere {index}: radius must be positive and finite, got {radius}")]
    InvalidRadius { index: usize, radius: f32 },
    #[error("sphere {index}: center must be finite")]
    NonFiniteCenter { index: usize },
    #[error("sphere {index}: material {field} must be finite and non-negative")]
    InvalidMaterial { index: usize, field: &'static str },
    #[error("light {index}: position must be finite")]
    NonFiniteLightPosition { index: usize },
    #[error("light {index}: intensity must be finite and non-negative")]
    InvalidIntensity { index: usize },
}

/// Immutable per-frame description of what to trace.
///
/// Every value is validated on construction so tracing never has to deal with
/// degenerate geometry.
#[derive(Debug)]
pub struct Scene {
    spheres: Vec<Sphere>,
    lights: Vec<Light>,
    environment: Box<dyn Environment>,
}

impl Scene {
    pub fn new(
        spheres: Vec<Sphere>,
        lights: Vec<Light>,
        environment: impl Environment + 'static,
    ) -> Result<Self, SceneError> {
        Self::with_boxed_environment(spheres, lights, Box::new(environment))
    }

    pub fn with_boxed_environment(
        spheres: Vec<Sphere>,
        lights: Vec<Light>,
        environment: Box<dyn Environment>,
    ) -> Result<Self, SceneError> {
        for (index, sphere) in spheres.iter().enumerate() {
            validate_sphere(index, sphere)?;
        }
        for (index, light) in lights.iter().enumerate() {
            validate_light(index, light)?;
        }

        if lights.is_empty() {
            tracing::warn!("scene has no lights, surfaces will only show reflections");
        }

        Ok(Self {
            spheres,
            lights,
            environment,
        })
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    pub fn sample_environment(&self, direction: Vec3) -> Vec3 {
        self.environment.sample(direction)
    }
}

fn validate_sphere(index: usize, sphere: &Sphere) -> Result<(), SceneError> {
    if !is_finite(sphere.center) {
        return Err(SceneError::NonFiniteCenter { index });
    }
    if !sphere.radius.is_finite() || sphere.radius <= 0.0 {
        return Err(SceneError::InvalidRadius {
            index,
            radius: sphere.radius,
        });
    }

    let material = &sphere.material;
    if !is_finite(material.k_d) || !is_non_negative(material.k_d) {
        return Err(SceneError::InvalidMaterial { index, field: "k_d" });
    }
    if !is_finite(material.k_s) || !is_non_negative(material.k_s) {
        return Err(SceneError::InvalidMaterial { index, field: "k_s" });
    }
    if !material.n.is_finite() || material.n < 0.0 {
        return Err(SceneError::InvalidMaterial { index, field: "n" });
    }

    Ok(())
}

fn validate_light(index: usize, light: &Light) -> Result<(), SceneError> {
    if !is_finite(light.position) {
        return Err(SceneError::NonFiniteLightPosition { index });
    }
    if !is_finite(light.intensity) || !is_non_negative(light.intensity) {
        return Err(SceneError::InvalidIntensity { index });
    }
    Ok(())
}
