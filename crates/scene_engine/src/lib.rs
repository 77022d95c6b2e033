//! # Scene Engine
//!
//! The scene-graph core of a modular game engine: hierarchical entities that
//! own components, with deferred creation and destruction, hierarchical
//! activity, composed world transforms and ordered per-frame ticking.
//!
//! ## Features
//!
//! - **Generational handles**: entity and component references never dangle
//! - **Deferred lifecycle**: nothing is torn down while it is being iterated
//! - **Activity propagation**: disabling a node disables its subtree
//! - **Tick groups**: explicit pre-update / update / post-update / render order
//! - **Render submission**: thread-safe draw-call queue for a rendering backend
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let root = engine.entities.create_entity("Root", TickGroup::Standard);
//!         let child = engine.entities.create_entity("Child", TickGroup::Standard);
//!         engine.entities.set_parent(child, Some(root), EntityRelationship::FULL);
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
//!         // Update game logic
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, engine: &mut Engine) {
//!         // Cleanup resources
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod ecs;
pub mod render;

mod application;
mod engine;

pub use application::{Application, AppError};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError,
        Engine, EngineError,
        config::Config,
        core::{EngineConfig, LoggingConfig, SceneConfig, SceneError},
        foundation::{
            math::{Vec3, Mat4, Quat, Transform},
            time::{FrameStep, Timer},
        },
        ecs::{
            Component, ComponentContext, ComponentHandle, Entity, EntityId, EntityManager,
            EntityRelationship, SlotKind, TickGroup, TickPolicy,
        },
        ecs::components::{Camera, MeshRenderer, PointLight},
        render::{DrawCall, DrawSubmitter, Material, MaterialParameter, MeshId, RenderQueue},
    };
}
