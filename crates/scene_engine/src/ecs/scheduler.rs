//! Tick scheduling
//!
//! Entities and components declare a [`TickGroup`]; the entity manager runs
//! the groups in a fixed order once per pass. Within a group, entities are
//! visited in creation order and each entity's components in attachment order.

use serde::{Deserialize, Serialize};

/// Scheduling bucket with explicit ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TickGroup {
    /// Never ticked
    None,
    /// Input processing, controllers
    PreUpdate,
    /// Game logic
    Standard,
    /// Late adjustments (cameras following targets)
    PostUpdate,
    /// Draw-call submission
    Render,
}

impl TickGroup {
    /// Groups that tick, in execution order
    pub const ORDERED: [Self; 4] = [Self::PreUpdate, Self::Standard, Self::PostUpdate, Self::Render];

    /// Whether members of this group are ever ticked
    pub fn ticks(self) -> bool {
        self != Self::None
    }
}

/// Which components get ticked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickPolicy {
    /// Only components whose owner is active in the hierarchy
    #[default]
    ActiveOnly,
    /// Every finalised component
    Always,
}

impl TickPolicy {
    pub(crate) fn allows(self, owner_active: bool) -> bool {
        match self {
            Self::ActiveOnly => owner_active,
            Self::Always => true,
        }
    }
}

/// Counters for one tick pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Entities finalised at the start of the pass
    pub created: usize,
    /// Entities torn down at the end of the pass
    pub destroyed: usize,
    /// Component `tick` calls executed
    pub component_ticks: usize,
    /// Live entities after the pass
    pub live_entities: usize,
}
