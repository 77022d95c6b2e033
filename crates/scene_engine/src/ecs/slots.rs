//! Scene slots
//!
//! Process-wide "current camera" / "current light" state, held by the entity
//! manager instead of in globals. Holders claim and release their slot from
//! lifecycle hooks; a holder that is torn down without releasing simply stops
//! resolving.

use super::entity::EntityId;

/// Which slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Camera used for view matrices
    Camera,
    /// Light used for lit materials
    Light,
}

/// Current holders, unvalidated
#[derive(Debug, Default, Clone)]
pub struct SceneSlots {
    camera: Option<EntityId>,
    light: Option<EntityId>,
}

impl SceneSlots {
    fn slot_mut(&mut self, kind: SlotKind) -> &mut Option<EntityId> {
        match kind {
            SlotKind::Camera => &mut self.camera,
            SlotKind::Light => &mut self.light,
        }
    }

    /// Raw holder; may be stale
    pub fn holder(&self, kind: SlotKind) -> Option<EntityId> {
        match kind {
            SlotKind::Camera => self.camera,
            SlotKind::Light => self.light,
        }
    }

    /// Replace the holder
    pub fn claim(&mut self, kind: SlotKind, entity: EntityId) {
        *self.slot_mut(kind) = Some(entity);
    }

    /// Clear the slot only if `entity` still holds it
    pub fn release(&mut self, kind: SlotKind, entity: EntityId) -> bool {
        let slot = self.slot_mut(kind);
        if *slot == Some(entity) {
            *slot = None;
            true
        } else {
            false
        }
    }
}
