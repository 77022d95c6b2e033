//! Point light component
//!
//! Holds the scene's light slot while its owner is active. The light's
//! position is its owner's world position.

use crate::ecs::scheduler::TickGroup;
use crate::ecs::slots::SlotKind;
use crate::ecs::{Component, ComponentContext, EntityManager};
use crate::foundation::math::Vec3;

/// Omnidirectional light
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    /// RGB colour, 0.0 to 1.0 per channel
    pub color: Vec3,
    /// Intensity multiplier
    pub intensity: f32,
}

impl PointLight {
    /// Light with the given colour and intensity
    pub fn new(color: Vec3, intensity: f32) -> Self {
        Self { color, intensity }
    }

    /// White light of intensity 1
    pub fn white() -> Self {
        Self::new(Vec3::new(1.0, 1.0, 1.0), 1.0)
    }

    /// World position of the scene's current light, or the origin if there is none
    pub fn current_position(entities: &EntityManager) -> Vec3 {
        entities
            .current_light()
            .and_then(|id| entities.world_position(id))
            .unwrap_or_else(Vec3::zeros)
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::white()
    }
}

impl Component for PointLight {
    fn tick_group(&self) -> TickGroup {
        TickGroup::None
    }

    fn post_create(&mut self, ctx: &mut ComponentContext<'_>) {
        if ctx.entities().entity(ctx.owner()).is_some_and(|e| e.active_in_hierarchy()) {
            ctx.claim_slot(SlotKind::Light);
        }
    }

    fn pre_destroy(&mut self, ctx: &mut ComponentContext<'_>) {
        ctx.release_slot(SlotKind::Light);
    }

    fn post_enable(&mut self, ctx: &mut ComponentContext<'_>) {
        ctx.claim_slot(SlotKind::Light);
    }

    fn post_disable(&mut self, ctx: &mut ComponentContext<'_>) {
        ctx.release_slot(SlotKind::Light);
    }
}
