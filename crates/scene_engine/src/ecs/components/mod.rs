//! Built-in components
//!
//! Scene-level behaviours the engine ships with: the current camera, the
//! current light, and mesh draw-call submission.

pub mod camera;
pub mod light;
pub mod mesh_renderer;

pub use camera::{Camera, Projection};
pub use light::PointLight;
pub use mesh_renderer::MeshRenderer;
