//! JSON description of a frame: output settings, camera, scene contents.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::camera::Camera;
use crate::environment::{Constant, CubeMap, Environment, EnvironmentError, Gradient};
use crate::scene::{Light, Material, Scene, SceneError, Sphere};
use crate::tracer::Tracer;
use crate::util::math::{is_finite, is_non_negative, vec3_from};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),
    #[error("invalid environment: {0}")]
    Environment(#[from] EnvironmentError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub output_path: String,
    #[serde(default = "default_bounce_limit")]
    pub bounce_limit: u32,
    #[serde(default = "default_ray_epsilon")]
    pub ray_epsilon: f32,
    pub camera: CameraConfig,
    #[serde(default)]
    pub spheres: Vec<SphereConfig>,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraConfig {
    pub origin: [f32; 3],
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    /// Degrees.
    #[serde(default = "default_fov_y")]
    pub fov_y: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SphereConfig {
    pub center: [f32; 3],
    pub radius: f32,
    #[serde(default)]
    pub material: MaterialConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialConfig {
    pub diffuse: [f32; 3],
    #[serde(default)]
    pub specular: [f32; 3],
    #[serde(default)]
    pub exponent: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            diffuse: [0.5; 3],
            specular: [0.0; 3],
            exponent: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightConfig {
    pub position: [f32; 3],
    pub intensity: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EnvironmentConfig {
    Constant {
        color: [f32; 3],
    },
    Gradient {
        horizon: [f32; 3],
        zenith: [f32; 3],
    },
    #[serde(rename_all = "camelCase")]
    CubeMap {
        faces: CubeFacesConfig,
        #[serde(default)]
        z_up: bool,
    },
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::Constant { color: [0.0; 3] }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeFacesConfig {
    pub pos_x: PathBuf,
    pub neg_x: PathBuf,
    pub pos_y: PathBuf,
    pub neg_y: PathBuf,
    pub pos_z: PathBuf,
    pub neg_z: PathBuf,
}

const fn default_bounce_limit() -> u32 {
    4
}

const fn default_ray_epsilon() -> f32 {
    Tracer::DEFAULT_EPSILON
}

const fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

const fn default_fov_y() -> f32 {
    45.0
}

impl RenderConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid("width and height must be positive"));
        }

        if self.output_path.trim().is_empty() {
            return Err(invalid("outputPath must not be empty"));
        }

        if !self.ray_epsilon.is_finite() || self.ray_epsilon <= 0.0 {
            return Err(invalid("rayEpsilon must be positive and finite"));
        }

        let camera = &self.camera;
        let finite = [camera.origin, camera.target, camera.up]
            .into_iter()
            .all(|value| is_finite(vec3_from(value)));
        if !finite {
            return Err(invalid("camera vectors must contain finite values"));
        }

        let view = vec3_from(camera.target) - vec3_from(camera.origin);
        if view.length() < 0.0001 {
            return Err(invalid("camera origin must differ from target"));
        }
        if view.normalize().cross(vec3_from(camera.up)).length() < 0.0001 {
            return Err(invalid("camera up must not be parallel to the view direction"));
        }

        if !(camera.fov_y > 0.0 && camera.fov_y < 180.0) {
            return Err(invalid("camera fovY must be between 0 and 180 degrees"));
        }

        Ok(())
    }

    pub fn camera(&self) -> Camera {
        Camera::look_at(
            vec3_from(self.camera.origin),
            vec3_from(self.camera.target),
            vec3_from(self.camera.up),
        )
        .with_fov_degrees(self.camera.fov_y)
        .with_aspect(self.width as f32 / self.height as f32)
    }

    pub fn tracer(&self) -> Tracer {
        Tracer::new(self.bounce_limit).with_epsilon(self.ray_epsilon)
    }

    /// Build the scene. Relative cube map paths resolve against `base_dir`.
    pub fn build_scene(&self, base_dir: &Path) -> Result<Scene, ConfigError> {
        let spheres = self
            .spheres
            .iter()
            .map(|sphere| {
                Sphere::new(
                    vec3_from(sphere.center),
                    sphere.radius,
                    Material {
                        k_d: vec3_from(sphere.material.diffuse),
                        k_s: vec3_from(sphere.material.specular),
                        n: sphere.material.exponent,
                    },
                )
            })
            .collect();

        let lights = self
            .lights
            .iter()
            .map(|light| Light::new(vec3_from(light.position), vec3_from(light.intensity)))
            .collect();

        let environment = self.environment.build(base_dir)?;
        let scene = Scene::with_boxed_environment(spheres, lights, environment)?;

        tracing::debug!(
            spheres = scene.spheres().len(),
            lights = scene.lights().len(),
            environment = ?scene.environment(),
            "scene built"
        );
        Ok(scene)
    }
}

impl EnvironmentConfig {
    pub fn build(&self, base_dir: &Path) -> Result<Box<dyn Environment>, ConfigError> {
        let environment: Box<dyn Environment> = match self {
            Self::Constant { color } => {
                check_color("environment color", *color)?;
                Box::new(Constant::new(vec3_from(*color)))
            }
            Self::Gradient { horizon, zenith } => {
                check_color("environment horizon", *horizon)?;
                check_color("environment zenith", *zenith)?;
                Box::new(Gradient::new(vec3_from(*horizon), vec3_from(*zenith)))
            }
            Self::CubeMap { faces, z_up } => {
                let paths = [
                    &faces.pos_x,
                    &faces.neg_x,
                    &faces.pos_y,
                    &faces.neg_y,
                    &faces.pos_z,
                    &faces.neg_z,
                ]
                .map(|path| base_dir.join(path));
                Box::new(CubeMap::load(paths)?.with_z_up(*z_up))
            }
        };
        Ok(environment)
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_owned())
}

fn check_color(what: &str, color: [f32; 3]) -> Result<(), ConfigError> {
    let color = vec3_from(color);
    if is_finite(color) && is_non_negative(color) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{what} must be finite and non-negative"
        )))
    }
}
