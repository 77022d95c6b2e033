//! Entity-Component scene graph
//!
//! Hierarchical entities own components; the [`EntityManager`] owns both and
//! drives their lifecycle and per-frame ticking.

pub mod component;
pub mod components;
pub mod entity;
mod hierarchy;
pub mod manager;
pub mod scheduler;
pub mod slots;

#[cfg(test)]
mod tests;

pub use component::{AsAny, Component, ComponentContext, ComponentHandle, ComponentId};
pub use entity::{Entity, EntityId, EntityRelationship, LifecycleState};
pub use manager::EntityManager;
pub use scheduler::{TickGroup, TickPolicy, TickStats};
pub use slots::{SceneSlots, SlotKind};
