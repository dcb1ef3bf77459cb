use std::time::Instant;

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::scene::Scene;
use crate::tracer::Tracer;

/// Renders whole frames, one primary ray per pixel.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub camera: Camera,
    pub tracer: Tracer,
}

impl Renderer {
    pub fn new(camera: Camera, tracer: Tracer) -> Self {
        Self { camera, tracer }
    }

    /// Linear RGBA radiance per pixel, row-major with row 0 at the top.
    pub fn render_linear(&self, scene: &Scene, width: u32, height: u32) -> Vec<glam::Vec4> {
        let mut pixels = vec![glam::Vec4::ZERO; width as usize * height as usize];
        if pixels.is_empty() {
            return pixels;
        }

        pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    let ray = self.camera.pixel_ray(x as u32, y as u32, width, height);
                    *pixel = self.tracer.trace(scene, &ray);
                }
            });

        pixels
    }

    pub fn render(&self, scene: &Scene, width: u32, height: u32) -> RgbaImage {
        tracing::info!(
            width,
            height,
            spheres = scene.spheres().len(),
            lights = scene.lights().len(),
            bounce_limit = self.tracer.bounce_limit,
            "rendering frame"
        );
        let started = Instant::now();

        let pixels = self.render_linear(scene, width, height);
        let mut img = RgbaImage::new(width, height);
        for (pixel, color) in img.pixels_mut().zip(pixels) {
            *pixel = Rgba(convert_rgba(color));
        }

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "frame rendered"
        );
        img
    }
}

/// Clamp linear color to [0, 1] and quantize to 8 bits per channel.
pub fn convert_rgba(color: glam::Vec4) -> [u8; 4] {
    let color = color.clamp(glam::Vec4::ZERO, glam::Vec4::ONE) * 255.0;
    let r = color.x.round() as u8;
    let g = color.y.round() as u8;
    let b = color.z.round() as u8;
    let a = color.w.round() as u8;
    [r, g, b, a]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Constant, Gradient};
    use crate::scene::{Light, Material, Sphere};
    use glam::{Vec3, Vec4};

    #[test]
    fn test_convert_rgba_clamps() {
        assert_eq!(convert_rgba(Vec4::new(2.0, -1.0, 0.5, 1.0)), [255, 0, 128, 255]);
        assert_eq!(convert_rgba(Vec4::ZERO), [0, 0, 0, 0]);
    }

    #[test]
    fn test_empty_scene_renders_environment() {
        let scene = Scene::new(Vec::new(), Vec::new(), Constant::new(Vec3::new(0.0, 0.0, 1.0)))
            .unwrap();
        let renderer = Renderer::new(Camera::default(), Tracer::default());

        let img = renderer.render(&scene, 4, 3);

        assert_eq!(img.dimensions(), (4, 3));
        assert!(img.pixels().all(|p| p.0 == [0, 0, 255, 255]));
    }

    #[test]
    fn test_sphere_covers_center_pixel() {
        let scene = Scene::new(
            vec![Sphere::new(Vec3::ZERO, 1.0, Material::diffuse(Vec3::new(1.0, 0.0, 0.0)))],
            vec![Light::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ONE)],
            Gradient::new(Vec3::ZERO, Vec3::ZERO),
        )
        .unwrap();
        let renderer = Renderer::new(Camera::default(), Tracer::new(2));

        let img = renderer.render(&scene, 9, 9);

        assert_eq!(img.get_pixel(4, 4).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_linear_buffer_matches_tracer() {
        let scene = Scene::new(
            vec![Sphere::new(Vec3::new(0.3, -0.2, 0.0), 1.0, Material::mirror())],
            vec![Light::new(Vec3::new(2.0, 3.0, 4.0), Vec3::ONE)],
            Gradient::new(Vec3::splat(0.2), Vec3::new(0.3, 0.5, 0.9)),
        )
        .unwrap();
        let camera = Camera::default().with_aspect(1.5);
        let tracer = Tracer::new(3);
        let renderer = Renderer::new(camera, tracer);

        let pixels = renderer.render_linear(&scene, 6, 4);

        for y in 0..4 {
            for x in 0..6 {
                let expected = tracer.trace(&scene, &camera.pixel_ray(x, y, 6, 4));
                assert_eq!(pixels[(y * 6 + x) as usize], expected);
            }
        }
    }
}
