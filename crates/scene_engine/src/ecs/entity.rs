//! Entity implementation
//!
//! An [`Entity`] is a node in the scene hierarchy. The record itself is plain
//! data owned by the [`EntityManager`](super::EntityManager); everything that
//! has to touch more than one node (parenting, activity propagation, component
//! finalisation) lives on the manager.

use bitflags::bitflags;

use super::component::ComponentId;
use super::scheduler::TickGroup;
use crate::foundation::math::Transform;

slotmap::new_key_type! {
    /// Generational handle to an entity
    ///
    /// This is the weak reference of the scene: it never keeps an entity
    /// alive and resolves to nothing once the entity has been torn down.
    pub struct EntityId;
}

bitflags! {
    /// What a child inherits from its parent
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EntityRelationship: u8 {
        /// World transform is composed with the parent's
        const SPATIAL = 0b01;
        /// Hierarchy activity is gated by the parent's
        const ACTIVITY = 0b10;
        /// Inherit both transform and activity
        const FULL = Self::SPATIAL.bits() | Self::ACTIVITY.bits();
    }
}

impl EntityRelationship {
    /// Organisational link only: nothing is inherited
    pub const NONE: Self = Self::empty();
}

impl Default for EntityRelationship {
    fn default() -> Self {
        Self::FULL
    }
}

/// Observable lifecycle state of a live entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Registered but `post_create` has not run yet
    Uncreated,
    /// Finalised; components attach and finalise immediately
    Created,
    /// Destruction requested; torn down at the end of the current pass
    PendingDestroy,
}

/// Scene node data
#[derive(Debug)]
pub struct Entity {
    name: String,
    tick_group: TickGroup,
    pub(crate) local_transform: Transform,

    pub(crate) created: bool,
    pub(crate) destroy_requested: bool,
    pub(crate) active_self: bool,
    pub(crate) active_hierarchy: bool,

    pub(crate) parent: Option<EntityId>,
    pub(crate) relationship: EntityRelationship,

    // May hold ids of torn-down children until the next prune.
    pub(crate) children: Vec<EntityId>,
    pub(crate) components: Vec<ComponentId>,
    pub(crate) deferred_components: Vec<ComponentId>,
}

impl Entity {
    pub(crate) fn new(name: String, tick_group: TickGroup, local_transform: Transform) -> Self {
        Self {
            name,
            tick_group,
            local_transform,
            created: false,
            destroy_requested: false,
            active_self: true,
            active_hierarchy: true,
            parent: None,
            relationship: EntityRelationship::FULL,
            children: Vec::new(),
            components: Vec::new(),
            deferred_components: Vec::new(),
        }
    }

    /// Diagnostic name (not unique)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tick group fixed at construction
    pub fn tick_group(&self) -> TickGroup {
        self.tick_group
    }

    /// Whether `post_create` has completed
    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Current lifecycle state
    pub fn lifecycle_state(&self) -> LifecycleState {
        if self.destroy_requested {
            LifecycleState::PendingDestroy
        } else if self.created {
            LifecycleState::Created
        } else {
            LifecycleState::Uncreated
        }
    }

    /// The explicitly set activity flag
    pub fn active_self(&self) -> bool {
        self.active_self
    }

    /// Own flag AND every activity-coupled ancestor's flag
    pub fn active_in_hierarchy(&self) -> bool {
        self.active_hierarchy
    }

    /// Parent handle, if any
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// How this entity is coupled to its parent
    pub fn relationship(&self) -> EntityRelationship {
        self.relationship
    }

    /// Whether the entity has a parent
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Whether the world transform is composed with a parent
    pub fn has_spatial_parent(&self) -> bool {
        self.parent.is_some() && self.relationship.contains(EntityRelationship::SPATIAL)
    }

    /// Whether hierarchy activity is gated by a parent
    pub fn has_activity_parent(&self) -> bool {
        self.parent.is_some() && self.relationship.contains(EntityRelationship::ACTIVITY)
    }

    pub(crate) fn spatial_parent(&self) -> Option<EntityId> {
        self.parent.filter(|_| self.relationship.contains(EntityRelationship::SPATIAL))
    }

    pub(crate) fn activity_parent(&self) -> Option<EntityId> {
        self.parent.filter(|_| self.relationship.contains(EntityRelationship::ACTIVITY))
    }

    /// Local transform relative to the spatial parent
    pub fn local_transform(&self) -> &Transform {
        &self.local_transform
    }

    /// Mutable local transform
    pub fn local_transform_mut(&mut self) -> &mut Transform {
        &mut self.local_transform
    }

    /// Attached components in attachment order, finalised or not
    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }

    /// Components still waiting for this entity's `post_create`
    pub fn deferred_components(&self) -> &[ComponentId] {
        &self.deferred_components
    }
}
