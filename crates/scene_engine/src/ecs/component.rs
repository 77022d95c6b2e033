//! Component trait and handles
//!
//! A component is a behavioural unit attached to exactly one entity. The
//! entity manager owns every component; callers only ever hold a
//! [`ComponentHandle`], which stops resolving once the owner is torn down.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use super::entity::{EntityId, EntityRelationship};
use super::manager::EntityManager;
use super::scheduler::TickGroup;
use super::slots::SlotKind;
use crate::foundation::math::{Mat4, Transform};

slotmap::new_key_type! {
    /// Untyped generational handle to a component
    pub struct ComponentId;
}

/// Upcast helper so boxed components can be downcast to their concrete type
pub trait AsAny: Any {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;
    /// Mutably borrow as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Lifecycle and tick capability shared by every component
///
/// Hooks run to completion on the logic thread. A component's `post_create`
/// never runs before its owner's, and its `pre_destroy` always runs before the
/// owner is released.
pub trait Component: AsAny {
    /// Scheduling bucket; read once when the component is attached
    fn tick_group(&self) -> TickGroup {
        TickGroup::Standard
    }

    /// Owner is bound; siblings and the owner's transform are queryable
    fn post_create(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Owner is still valid; release anything tied to it
    fn pre_destroy(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Per-frame update
    fn tick(&mut self, _ctx: &mut ComponentContext<'_>, _delta_time: f32) {}

    /// Owner became active in the hierarchy
    fn post_enable(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Owner became inactive in the hierarchy
    fn post_disable(&mut self, _ctx: &mut ComponentContext<'_>) {}
}

pub(crate) fn downcast_ref<T: Component>(component: &dyn Component) -> Option<&T> {
    component.as_any().downcast_ref::<T>()
}

pub(crate) fn downcast_mut<T: Component>(component: &mut dyn Component) -> Option<&mut T> {
    component.as_any_mut().downcast_mut::<T>()
}

/// Arena slot holding one component
pub(crate) struct ComponentSlot {
    attached_to: EntityId,
    owner: Option<EntityId>,
    tick_group: TickGroup,
    // `None` while one of the component's own hooks is running.
    pub(crate) component: Option<Box<dyn Component>>,
    // Net activity flip that arrived while checked out.
    pending_activity: Option<bool>,
}

impl ComponentSlot {
    pub(crate) fn new(attached_to: EntityId, component: Box<dyn Component>) -> Self {
        Self {
            attached_to,
            owner: None,
            tick_group: component.tick_group(),
            component: Some(component),
            pending_activity: None,
        }
    }

    /// Bind the owning entity; happens exactly once
    pub(crate) fn set_owner(&mut self, owner: EntityId) {
        debug_assert!(self.owner.is_none(), "component owner bound twice");
        debug_assert_eq!(self.attached_to, owner, "component bound to a foreign entity");
        self.owner = Some(owner);
    }

    pub(crate) fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    pub(crate) fn tick_group(&self) -> TickGroup {
        self.tick_group
    }

    pub(crate) fn is_checked_out(&self) -> bool {
        self.component.is_none()
    }

    /// Remember an activity flip for delivery once the component is back.
    /// Two opposite flips cancel out.
    pub(crate) fn queue_activity(&mut self, enabled: bool) {
        self.pending_activity = match self.pending_activity {
            Some(queued) if queued != enabled => None,
            _ => Some(enabled),
        };
    }

    pub(crate) fn take_pending_activity(&mut self) -> Option<bool> {
        self.pending_activity.take()
    }
}

impl fmt::Debug for ComponentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentSlot")
            .field("attached_to", &self.attached_to)
            .field("owner", &self.owner)
            .field("tick_group", &self.tick_group)
            .field("checked_out", &self.component.is_none())
            .field("pending_activity", &self.pending_activity)
            .finish()
    }
}

/// Typed weak handle to a component
pub struct ComponentHandle<T> {
    id: ComponentId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ComponentHandle<T> {
    pub(crate) fn new(id: ComponentId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// A handle that never resolves
    pub fn null() -> Self {
        Self::new(ComponentId::default())
    }

    /// Untyped id
    pub fn id(&self) -> ComponentId {
        self.id
    }
}

impl<T: Component> ComponentHandle<T> {
    /// Whether the component still exists
    pub fn is_valid(&self, manager: &EntityManager) -> bool {
        manager.contains_component(self.id)
    }

    /// Resolve to the component, if it still exists and is not mid-hook
    pub fn get<'a>(&self, manager: &'a EntityManager) -> Option<&'a T> {
        manager.component(*self)
    }
}

impl<T> Clone for ComponentHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentHandle<T> {}

impl<T> PartialEq for ComponentHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for ComponentHandle<T> {}

impl<T> fmt::Debug for ComponentHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentHandle").field(&self.id).finish()
    }
}

/// What a component can see and do while one of its hooks runs
///
/// Only exists for components whose owner is bound, so hook code can rely on
/// [`ComponentContext::owner`].
pub struct ComponentContext<'a> {
    manager: &'a mut EntityManager,
    owner: EntityId,
    id: ComponentId,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(manager: &'a mut EntityManager, owner: EntityId, id: ComponentId) -> Self {
        Self { manager, owner, id }
    }

    /// The owning entity
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// This component's id
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Read access to the whole scene
    pub fn entities(&self) -> &EntityManager {
        &*self.manager
    }

    /// Owner's world transform
    pub fn transform_matrix(&self) -> Mat4 {
        self.manager.transform_matrix(self.owner).unwrap_or_else(Mat4::identity)
    }

    /// Owner's inverse world transform
    pub fn transform_matrix_inv(&self) -> Mat4 {
        self.manager.transform_matrix_inv(self.owner).unwrap_or_else(Mat4::identity)
    }

    /// Owner's local transform, for controllers that move their entity
    pub fn local_transform_mut(&mut self) -> Option<&mut Transform> {
        self.manager.local_transform_mut(self.owner)
    }

    /// First sibling component of type `T`
    pub fn sibling<T: Component>(&self) -> Option<&T> {
        self.manager.find_component::<T>(self.owner)
    }

    /// Mutable access to the first sibling component of type `T`
    pub fn sibling_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.manager.find_component_mut::<T>(self.owner)
    }

    /// Attach another component to the owner
    pub fn add_component<T: Component>(&mut self, component: T) -> ComponentHandle<T> {
        self.manager.add_component(self.owner, component)
    }

    /// Attach a component to any entity
    pub fn add_component_to<T: Component>(&mut self, entity: EntityId, component: T) -> ComponentHandle<T> {
        self.manager.add_component(entity, component)
    }

    /// Register a new entity; it is finalised at the next creation flush
    pub fn create_entity(&mut self, name: impl Into<String>, tick_group: TickGroup) -> EntityId {
        self.manager.create_entity(name, tick_group)
    }

    /// Change an entity's own activity flag
    pub fn set_active(&mut self, entity: EntityId, active: bool) {
        self.manager.set_active(entity, active);
    }

    /// Reparent an entity
    pub fn set_parent(&mut self, entity: EntityId, parent: Option<EntityId>, relationship: EntityRelationship) {
        self.manager.set_parent(entity, parent, relationship);
    }

    /// Request destruction of any entity
    pub fn destroy(&mut self, entity: EntityId) {
        self.manager.destroy(entity);
    }

    /// Request destruction of the owner
    pub fn destroy_owner(&mut self) {
        self.manager.destroy(self.owner);
    }

    /// Make the owner the current holder of a scene slot
    pub fn claim_slot(&mut self, kind: SlotKind) {
        self.manager.claim_slot(kind, self.owner);
    }

    /// Clear a scene slot if the owner still holds it
    pub fn release_slot(&mut self, kind: SlotKind) -> bool {
        self.manager.release_slot(kind, self.owner)
    }
}
