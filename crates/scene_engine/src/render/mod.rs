//! # Render Submission
//!
//! The scene never talks to a GPU. Renderable components describe what they
//! want drawn as [`DrawCall`]s and push them through a [`DrawSubmitter`]; the
//! engine drains the [`RenderQueue`] once per frame and hands the calls to
//! whatever backend is attached.

pub mod material;
pub mod render_queue;

pub use material::{Material, MaterialParameter};
pub use render_queue::{DrawSubmitter, RenderQueue, RenderQueueStats};

use std::sync::Arc;

use crate::ecs::EntityId;
use crate::foundation::math::{Mat4, Vec3};

/// Opaque handle to mesh data owned by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// One object to draw this frame
///
/// Matrix fields are `None` when the material does not declare the matching
/// parameter.
#[derive(Debug, Clone)]
pub struct DrawCall {
    /// Entity that submitted the call
    pub entity: EntityId,
    /// Mesh to draw
    pub mesh: MeshId,
    /// Material to draw with
    pub material: Arc<Material>,
    /// World transform of the entity
    pub model_matrix: Option<Mat4>,
    /// View matrix of the current camera
    pub view_matrix: Option<Mat4>,
    /// World position of the current light
    pub light_position: Option<Vec3>,
}
