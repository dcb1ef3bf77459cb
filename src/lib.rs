pub mod camera;
pub mod config;
pub mod environment;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod shade;
pub mod tracer;
pub mod util;

pub use environment::Environment;
pub use ray::{HitInfo, Ray};
pub use scene::{Light, Material, Scene, SceneError, Sphere};
pub use tracer::{trace, Tracer};
