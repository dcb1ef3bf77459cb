use glam::Vec3;

use crate::ray::Ray;
use crate::scene::{Material, Scene};

/// Direct Blinn-Phong lighting at a surface point with hard shadows.
///
/// `view` points from the surface toward the viewer and must be unit length.
/// Shadow rays start `epsilon` along the normal to avoid self-intersection.
/// The result is never negative and is not clamped.
pub fn shade(
    scene: &Scene,
    material: &Material,
    position: Vec3,
    normal: Vec3,
    view: Vec3,
    epsilon: f32,
) -> Vec3 {
    let mut color = Vec3::ZERO;

    for light in scene.lights() {
        let light_dir = (light.position - position).normalize();

        let shadow_ray = Ray::new(position + epsilon * normal, light_dir);
        if scene.is_occluded(&shadow_ray) {
            continue;
        }

        let diffuse = light.intensity * normal.dot(light_dir).max(0.0);

        let half_vector = (light_dir + view).normalize_or_zero();
        let specular = light.intensity * normal.dot(half_vector).max(0.0).powf(material.n);

        color += material.k_d * diffuse + material.k_s * specular;
    }

    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Constant;
    use crate::scene::{Light, Sphere};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 0.001;

    fn red_diffuse() -> Material {
        Material::diffuse(Vec3::new(0.8, 0.2, 0.2))
    }

    fn lit_scene(spheres: Vec<Sphere>, lights: Vec<Light>) -> Scene {
        Scene::new(spheres, lights, Constant::new(Vec3::ZERO)).unwrap()
    }

    #[test]
    fn test_diffuse_term_matches_lambert() {
        let light = Light::new(Vec3::new(0.0, 5.0, 5.0), Vec3::ONE);
        let scene = lit_scene(vec![Sphere::new(Vec3::ZERO, 1.0, red_diffuse())], vec![light]);

        let position = Vec3::Z;
        let normal = Vec3::Z;
        let color = shade(&scene, &red_diffuse(), position, normal, Vec3::Z, EPSILON);

        let l = (light.position - position).normalize();
        let expected = red_diffuse().k_d * light.intensity * normal.dot(l);
        assert!(color.abs_diff_eq(expected, 1e-6));
        assert!(color.x > 0.0);
    }

    #[test]
    fn test_occluder_removes_light_contribution() {
        let light = Light::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ONE);
        let surface = Sphere::new(Vec3::ZERO, 1.0, red_diffuse());
        let open = lit_scene(vec![surface], vec![light]);
        let blocked = lit_scene(
            vec![surface, Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, red_diffuse())],
            vec![light],
        );

        let lit = shade(&open, &red_diffuse(), Vec3::Z, Vec3::Z, Vec3::Z, EPSILON);
        let shadowed = shade(&blocked, &red_diffuse(), Vec3::Z, Vec3::Z, Vec3::Z, EPSILON);

        assert!(lit.x > shadowed.x);
        assert_eq!(shadowed, Vec3::ZERO);
    }

    #[test]
    fn test_occluder_beyond_light_still_shadows() {
        // No distance cutoff on shadow rays.
        let light = Light::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ONE);
        let scene = lit_scene(
            vec![Sphere::new(Vec3::new(0.0, 0.0, 20.0), 1.0, red_diffuse())],
            vec![light],
        );

        let color = shade(&scene, &red_diffuse(), Vec3::ZERO, Vec3::Z, Vec3::Z, EPSILON);

        assert_eq!(color, Vec3::ZERO);
    }

    #[test]
    fn test_light_behind_surface_contributes_nothing() {
        let light = Light::new(Vec3::new(0.0, 0.0, -10.0), Vec3::ONE);
        let scene = lit_scene(Vec::new(), vec![light]);

        let material = Material {
            k_d: Vec3::ONE,
            k_s: Vec3::ONE,
            n: 16.0,
        };
        let view = Vec3::new(0.0, 1.0, 1.0).normalize();
        let color = shade(&scene, &material, Vec3::ZERO, Vec3::Z, view, EPSILON);

        assert_eq!(color, Vec3::ZERO);
    }

    #[test]
    fn test_specular_highlight_along_half_vector() {
        let light = Light::new(Vec3::new(0.0, 0.0, 10.0), Vec3::splat(2.0));
        let scene = lit_scene(Vec::new(), vec![light]);
        let material = Material {
            k_d: Vec3::ZERO,
            k_s: Vec3::new(0.5, 0.25, 1.0),
            n: 32.0,
        };

        let color = shade(&scene, &material, Vec3::ZERO, Vec3::Z, Vec3::Z, EPSILON);

        assert!(color.abs_diff_eq(Vec3::new(1.0, 0.5, 2.0), 1e-5));
    }

    #[test]
    fn test_contributions_sum_over_lights() {
        let lights = vec![
            Light::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(1.0, 0.0, 0.0)),
            Light::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 1.0, 0.0)),
        ];
        let scene = lit_scene(Vec::new(), lights);

        let color = shade(
            &scene,
            &Material::diffuse(Vec3::ONE),
            Vec3::ZERO,
            Vec3::Z,
            Vec3::Z,
            EPSILON,
        );

        assert_relative_eq!(color.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(color.y, 1.0, epsilon = 1e-6);
        assert_eq!(color.z, 0.0);
    }

    #[test]
    fn test_no_lights_is_black() {
        let scene = lit_scene(vec![Sphere::default()], Vec::new());
        let color = shade(&scene, &red_diffuse(), Vec3::Z, Vec3::Z, Vec3::Z, EPSILON);
        assert_eq!(color, Vec3::ZERO);
    }
}
