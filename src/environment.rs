//! Colors seen by rays that leave the scene.

use std::fmt;
use std::path::{Path, PathBuf};

use glam::Vec3;
use image::Rgb32FImage;
use thiserror::Error;

/// Maps an escaping ray direction to a color.
///
/// Directions are not required to be normalized.
pub trait Environment: fmt::Debug + Send + Sync {
    fn sample(&self, direction: Vec3) -> Vec3;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    pub color: Vec3,
}

impl Constant {
    pub fn new(color: Vec3) -> Self {
        Self { color }
    }
}

impl Environment for Constant {
    fn sample(&self, _direction: Vec3) -> Vec3 {
        self.color
    }
}

/// Sky that blends from `horizon` at elevation 0 to `zenith` straight up.
/// Directions below the horizon get the horizon color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub horizon: Vec3,
    pub zenith: Vec3,
}

impl Gradient {
    pub fn new(horizon: Vec3, zenith: Vec3) -> Self {
        Self { horizon, zenith }
    }
}

impl Environment for Gradient {
    fn sample(&self, direction: Vec3) -> Vec3 {
        let elevation = direction.normalize_or_zero().y.clamp(0.0, 1.0);
        self.horizon.lerp(self.zenith, elevation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// Face hit by `direction` and the face-local `(s, t)` coordinates in [0, 1],
    /// following the OpenGL cube map convention.
    pub fn project(direction: Vec3) -> Option<(CubeFace, f32, f32)> {
        let abs = direction.abs();
        let major = abs.max_element();
        if major <= 0.0 || !major.is_finite() {
            return None;
        }

        let Vec3 { x, y, z } = direction;
        let (face, sc, tc) = if abs.x >= abs.y && abs.x >= abs.z {
            if x > 0.0 {
                (CubeFace::PosX, -z, -y)
            } else {
                (CubeFace::NegX, z, -y)
            }
        } else if abs.y >= abs.z {
            if y > 0.0 {
                (CubeFace::PosY, x, z)
            } else {
                (CubeFace::NegY, x, -z)
            }
        } else if z > 0.0 {
            (CubeFace::PosZ, x, -y)
        } else {
            (CubeFace::NegZ, -x, -y)
        };

        Some((face, (sc / major + 1.0) * 0.5, (tc / major + 1.0) * 0.5))
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("failed to load cube map face {face:?} from {path}")]
    Image {
        face: CubeFace,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cube map face {face:?} is empty")]
    EmptyFace { face: CubeFace },
    #[error("cube map face {face:?} is {actual:?}, expected {expected:?}")]
    FaceSizeMismatch {
        face: CubeFace,
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Six-image skybox sampled with nearest-texel lookup.
pub struct CubeMap {
    faces: [Rgb32FImage; 6],
    z_up: bool,
}

impl CubeMap {
    /// Build from faces ordered as [`CubeFace::ALL`].
    pub fn from_faces(faces: [Rgb32FImage; 6]) -> Result<Self, EnvironmentError> {
        let expected = faces[0].dimensions();
        for (face, image) in CubeFace::ALL.into_iter().zip(faces.iter()) {
            let actual = image.dimensions();
            if actual.0 == 0 || actual.1 == 0 {
                return Err(EnvironmentError::EmptyFace { face });
            }
            if actual != expected {
                return Err(EnvironmentError::FaceSizeMismatch {
                    face,
                    expected,
                    actual,
                });
            }
        }

        Ok(Self { faces, z_up: false })
    }

    /// Load faces ordered as [`CubeFace::ALL`] from image files.
    pub fn load<P: AsRef<Path>>(paths: [P; 6]) -> Result<Self, EnvironmentError> {
        let [pos_x, neg_x, pos_y, neg_y, pos_z, neg_z] = paths;
        Self::from_faces([
            load_face(CubeFace::PosX, pos_x.as_ref())?,
            load_face(CubeFace::NegX, neg_x.as_ref())?,
            load_face(CubeFace::PosY, pos_y.as_ref())?,
            load_face(CubeFace::NegY, neg_y.as_ref())?,
            load_face(CubeFace::PosZ, pos_z.as_ref())?,
            load_face(CubeFace::NegZ, neg_z.as_ref())?,
        ])
    }

    /// Treat +Z as up by swapping the y and z components before lookup.
    pub fn with_z_up(mut self, z_up: bool) -> Self {
        self.z_up = z_up;
        self
    }

    pub fn face_size(&self) -> (u32, u32) {
        self.faces[0].dimensions()
    }
}

fn load_face(face: CubeFace, path: &Path) -> Result<Rgb32FImage, EnvironmentError> {
    let image = image::open(path).map_err(|source| EnvironmentError::Image {
        face,
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(?face, path = %path.display(), "loaded cube map face");
    Ok(image.into_rgb32f())
}

impl fmt::Debug for CubeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CubeMap")
            .field("face_size", &self.face_size())
            .field("z_up", &self.z_up)
            .finish()
    }
}

impl Environment for CubeMap {
    fn sample(&self, direction: Vec3) -> Vec3 {
        let direction = if self.z_up {
            Vec3::new(direction.x, direction.z, direction.y)
        } else {
            direction
        };

        let Some((face, s, t)) = CubeFace::project(direction) else {
            return Vec3::ZERO;
        };

        let image = &self.faces[face.index()];
        let (width, height) = image.dimensions();
        let x = ((s * width as f32) as u32).min(width - 1);
        let y = ((t * height as f32) as u32).min(height - 1);
        Vec3::from_array(image.get_pixel(x, y).0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid_face(size: u32, color: [f32; 3]) -> Rgb32FImage {
        Rgb32FImage::from_pixel(size, size, Rgb(color))
    }

    fn colored_cube() -> CubeMap {
        CubeMap::from_faces([
            solid_face(2, [1.0, 0.0, 0.0]),
            solid_face(2, [0.5, 0.0, 0.0]),
            solid_face(2, [0.0, 1.0, 0.0]),
            solid_face(2, [0.0, 0.5, 0.0]),
            solid_face(2, [0.0, 0.0, 1.0]),
            solid_face(2, [0.0, 0.0, 0.5]),
        ])
        .unwrap()
    }

    #[test]
    fn test_constant_ignores_direction() {
        let env = Constant::new(Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(env.sample(Vec3::X), env.sample(Vec3::NEG_Y));
    }

    #[test]
    fn test_gradient_blends_by_elevation() {
        let env = Gradient::new(Vec3::ONE, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(env.sample(Vec3::Y * 10.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(env.sample(Vec3::X), Vec3::ONE);
        assert_eq!(env.sample(Vec3::NEG_Y), Vec3::ONE);
        assert!(env
            .sample(Vec3::new(1.0, 1.0, 0.0))
            .abs_diff_eq(Vec3::new(0.29289323, 0.29289323, 1.0), 1e-5));
    }

    #[test]
    fn test_cube_face_selection() {
        assert_eq!(CubeFace::project(Vec3::X).map(|p| p.0), Some(CubeFace::PosX));
        assert_eq!(CubeFace::project(Vec3::NEG_X).map(|p| p.0), Some(CubeFace::NegX));
        assert_eq!(CubeFace::project(Vec3::Y).map(|p| p.0), Some(CubeFace::PosY));
        assert_eq!(CubeFace::project(Vec3::NEG_Y).map(|p| p.0), Some(CubeFace::NegY));
        assert_eq!(CubeFace::project(Vec3::Z).map(|p| p.0), Some(CubeFace::PosZ));
        assert_eq!(CubeFace::project(Vec3::NEG_Z).map(|p| p.0), Some(CubeFace::NegZ));
        assert_eq!(CubeFace::project(Vec3::ZERO), None);
    }

    #[test]
    fn test_cube_face_center_maps_to_middle() {
        let (_, s, t) = CubeFace::project(Vec3::new(0.0, 0.0, -4.0)).unwrap();
        assert_eq!((s, t), (0.5, 0.5));
    }

    #[test]
    fn test_cube_map_samples_faces() {
        let cube = colored_cube();
        assert_eq!(cube.sample(Vec3::X), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(cube.sample(Vec3::Y), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(cube.sample(Vec3::NEG_Z), Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(cube.sample(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_cube_map_z_up_swaps_axes() {
        let cube = colored_cube().with_z_up(true);
        assert_eq!(cube.sample(Vec3::Z), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(cube.sample(Vec3::Y), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_cube_map_rejects_mismatched_faces() {
        let result = CubeMap::from_faces([
            solid_face(2, [0.0; 3]),
            solid_face(2, [0.0; 3]),
            solid_face(4, [0.0; 3]),
            solid_face(2, [0.0; 3]),
            solid_face(2, [0.0; 3]),
            solid_face(2, [0.0; 3]),
        ]);
        assert!(matches!(
            result,
            Err(EnvironmentError::FaceSizeMismatch {
                face: CubeFace::PosY,
                ..
            })
        ));
    }

    #[test]
    fn test_cube_map_load_reports_missing_file() {
        let missing = "does/not/exist.png";
        let result = CubeMap::load([missing; 6]);
        assert!(matches!(
            result,
            Err(EnvironmentError::Image {
                face: CubeFace::PosX,
                ..
            })
        ));
    }
}
