//! # Entity Manager
//!
//! The registry that owns every entity and component. It is the only strong
//! owner in the scene: entities refer to each other, and callers refer to
//! entities and components, through generational handles that stop resolving
//! once the referent is torn down.
//!
//! Creation and destruction are both deferred:
//!
//! ```text
//! create_entity ──► uncreated ──flush_created──► created ──destroy──► pending
//!                                                                       │
//!                                      removed ◄──flush_destroyed───────┘
//! ```
//!
//! [`EntityManager::tick`] flushes creations at the start of a pass and
//! destructions at the end, so nothing iterated during the pass disappears
//! under the iterator.

use slotmap::SlotMap;

use super::component::{downcast_mut, downcast_ref, Component, ComponentContext, ComponentHandle, ComponentId, ComponentSlot};
use super::entity::{Entity, EntityId, EntityRelationship};
use super::scheduler::{TickGroup, TickStats};
use super::slots::{SceneSlots, SlotKind};
use crate::core::config::SceneConfig;
use crate::core::error::SceneError;
use crate::foundation::math::{translation_of, Mat4, Transform, Vec3};

/// Registry owning every entity and component
pub struct EntityManager {
    pub(crate) entities: SlotMap<EntityId, Entity>,
    pub(crate) components: SlotMap<ComponentId, ComponentSlot>,
    // Creation order; pruned whenever a destruction flush removes entities.
    order: Vec<EntityId>,
    pending_create: Vec<EntityId>,
    pending_destroy: Vec<EntityId>,
    slots: SceneSlots,
    config: SceneConfig,
    last_stats: TickStats,
    ticking: bool,
}

impl EntityManager {
    /// Create a manager with default configuration
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create a manager with custom configuration
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            entities: SlotMap::with_capacity_and_key(config.initial_capacity),
            components: SlotMap::with_capacity_and_key(config.initial_capacity),
            order: Vec::with_capacity(config.initial_capacity),
            pending_create: Vec::new(),
            pending_destroy: Vec::new(),
            slots: SceneSlots::default(),
            config,
            last_stats: TickStats::default(),
            ticking: false,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Statistics of the most recent tick pass
    pub fn last_stats(&self) -> TickStats {
        self.last_stats
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Register a new entity
    ///
    /// The entity starts uncreated; components attached before the next
    /// [`flush_created`](Self::flush_created) are deferred until then.
    pub fn create_entity(&mut self, name: impl Into<String>, tick_group: TickGroup) -> EntityId {
        self.create_entity_with_transform(name, tick_group, Transform::identity())
    }

    /// Register a new entity with an initial local transform
    pub fn create_entity_with_transform(
        &mut self,
        name: impl Into<String>,
        tick_group: TickGroup,
        transform: Transform,
    ) -> EntityId {
        let id = self.entities.insert(Entity::new(name.into(), tick_group, transform));
        self.order.push(id);
        self.pending_create.push(id);
        log::debug!("Registered entity {:?} '{}'", id, self.entities[id].name());
        id
    }

    /// Finalise every registered-but-uncreated entity
    ///
    /// Entities registered by `post_create` hooks during the flush are
    /// finalised by the same call. Returns how many entities were finalised.
    pub fn flush_created(&mut self) -> usize {
        let mut finalized = 0;
        while !self.pending_create.is_empty() {
            let pending = std::mem::take(&mut self.pending_create);
            for id in pending {
                if self.finalize_entity(id) {
                    finalized += 1;
                }
            }
        }
        finalized
    }

    /// Entity `post_create`: flip `created`, then bind and finalise deferred
    /// components in insertion order
    fn finalize_entity(&mut self, id: EntityId) -> bool {
        let deferred = match self.entities.get_mut(id) {
            Some(entity) if !entity.created => {
                entity.created = true;
                std::mem::take(&mut entity.deferred_components)
            }
            _ => return false,
        };

        log::debug!("Created entity {:?} with {} deferred component(s)", id, deferred.len());
        for component in deferred {
            self.finalize_component(id, component);
        }
        true
    }

    fn finalize_component(&mut self, owner: EntityId, id: ComponentId) {
        let Some(slot) = self.components.get_mut(id) else {
            return;
        };
        slot.set_owner(owner);
        self.run_hook(id, |component, ctx| component.post_create(ctx));
    }

    /// Attach a component
    ///
    /// On a created entity the component is bound and its `post_create` has
    /// run before this returns. On an uncreated entity it is deferred. A stale
    /// entity yields a handle that never resolves.
    pub fn add_component<T: Component>(&mut self, entity: EntityId, component: T) -> ComponentHandle<T> {
        let Some(created) = self.entities.get(entity).map(|e| e.created) else {
            log::warn!("add_component on stale entity {:?} ignored", entity);
            return ComponentHandle::null();
        };

        let id = self.components.insert(ComponentSlot::new(entity, Box::new(component)));
        let record = &mut self.entities[entity];
        record.components.push(id);

        if created {
            self.finalize_component(entity, id);
        } else {
            record.deferred_components.push(id);
        }

        ComponentHandle::new(id)
    }

    // ------------------------------------------------------------------
    // Destruction
    // ------------------------------------------------------------------

    /// Request destruction
    ///
    /// Never tears down synchronously: the entity stays fully usable until the
    /// end of the current pass. Repeated requests and stale ids are ignored.
    pub fn destroy(&mut self, id: EntityId) {
        match self.entities.get_mut(id) {
            Some(entity) if !entity.destroy_requested => {
                entity.destroy_requested = true;
                self.pending_destroy.push(id);
                log::debug!("Destruction of {:?} '{}' requested", id, entity.name());
            }
            Some(_) => {}
            None => log::trace!("destroy on stale entity {:?} ignored", id),
        }
    }

    /// Alias of [`destroy`](Self::destroy) matching the registry vocabulary
    pub fn destroy_entity(&mut self, id: EntityId) {
        self.destroy(id);
    }

    /// Tear down every entity whose destruction was requested
    ///
    /// Destruction requested by `pre_destroy` hooks during the flush is
    /// handled by the same call. Returns how many entities were removed.
    pub fn flush_destroyed(&mut self) -> usize {
        let mut removed = 0;
        while !self.pending_destroy.is_empty() {
            let pending = std::mem::take(&mut self.pending_destroy);
            for id in pending {
                if self.teardown(id) {
                    removed += 1;
                }
            }
        }
        if removed > 0 {
            self.order.retain(|id| self.entities.contains_key(*id));
        }
        removed
    }

    fn teardown(&mut self, id: EntityId) -> bool {
        let Some(created) = self.entities.get(id).map(|e| e.created) else {
            return false;
        };
        if !created {
            // Keep the path uncreated -> created -> destroyed.
            self.finalize_entity(id);
        }

        // Indexed so components attached by a pre_destroy hook are covered too.
        let mut index = 0;
        while let Some(component) = self.entities.get(id).and_then(|e| e.components.get(index).copied()) {
            self.run_hook(component, |component, ctx| component.pre_destroy(ctx));
            index += 1;
        }

        // Surviving children become roots. Children already queued for
        // destruction are only unlinked and keep their activity. The parent's
        // own child list is left alone and purged lazily.
        let children = self.entities.get(id).map(|e| e.children.clone()).unwrap_or_default();
        for child in children {
            let survives = match self.entities.get_mut(child) {
                Some(record) if record.parent == Some(id) => {
                    record.parent = None;
                    record.relationship = EntityRelationship::FULL;
                    !record.destroy_requested
                }
                _ => false,
            };
            if survives {
                self.propagate_active_change(child, true);
            }
        }

        let Some(entity) = self.entities.remove(id) else {
            return false;
        };
        for component in &entity.components {
            self.components.remove(*component);
        }

        log::debug!(
            "Destroyed entity {:?} '{}' ({} component(s))",
            id,
            entity.name(),
            entity.components.len()
        );
        true
    }

    // ------------------------------------------------------------------
    // Ticking
    // ------------------------------------------------------------------

    /// Run one pass: flush creations, tick every group in order, flush
    /// destructions
    pub fn tick(&mut self, delta_time: f32) -> TickStats {
        debug_assert!(!self.ticking, "EntityManager::tick re-entered");
        self.ticking = true;

        let mut stats = TickStats {
            created: self.flush_created(),
            ..TickStats::default()
        };

        let snapshot = self.order.clone();

        for group in TickGroup::ORDERED {
            for &id in &snapshot {
                stats.component_ticks += self.tick_entity_group(id, group, delta_time);
            }
        }

        stats.destroyed = self.flush_destroyed();
        stats.live_entities = self.entities.len();
        self.ticking = false;

        if self.config.log_frame_stats {
            log::debug!(
                "Tick pass: {} created, {} destroyed, {} component ticks, {} live",
                stats.created,
                stats.destroyed,
                stats.component_ticks,
                stats.live_entities
            );
        }
        self.last_stats = stats;
        stats
    }

    fn tick_entity_group(&mut self, id: EntityId, group: TickGroup, delta_time: f32) -> usize {
        let Some(entity) = self.entities.get(id) else {
            return 0;
        };
        if !entity.created {
            return 0;
        }
        if entity.tick_group() == group {
            self.tick_entity(id);
        }

        let components = match self.entities.get(id) {
            Some(entity) => entity.components.clone(),
            None => return 0,
        };

        let mut ticked = 0;
        for component in components {
            let in_group = self
                .components
                .get(component)
                .is_some_and(|slot| slot.tick_group() == group);
            // Activity can change between components, so check each time.
            let owner_active = self.entities.get(id).is_some_and(|e| e.active_hierarchy);
            if !in_group || !self.config.tick_policy.allows(owner_active) {
                continue;
            }
            if self.run_hook(component, |component, ctx| component.tick(ctx, delta_time)).is_some() {
                ticked += 1;
            }
        }
        ticked
    }

    /// Entity-level tick: housekeeping on the entity's own node
    fn tick_entity(&mut self, id: EntityId) {
        debug_assert!(
            self.entities.get(id).is_some_and(|e| e.tick_group().ticks()),
            "entity in TickGroup::None ticked"
        );
        self.prune_children(id);
    }

    // ------------------------------------------------------------------
    // Hooks
    // ------------------------------------------------------------------

    /// Check a bound component out of its slot, run `f`, and put it back
    ///
    /// Returns `None` without running `f` if the component is unbound,
    /// released, or already checked out by one of its own hooks.
    pub(crate) fn run_hook<R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut dyn Component, &mut ComponentContext<'_>) -> R,
    ) -> Option<R> {
        let slot = self.components.get_mut(id)?;
        let owner = slot.owner()?;
        let mut component = slot.component.take()?;

        let result = {
            let mut ctx = ComponentContext::new(self, owner, id);
            f(component.as_mut(), &mut ctx)
        };

        let pending = match self.components.get_mut(id) {
            Some(slot) => {
                slot.component = Some(component);
                slot.take_pending_activity()
            }
            None => None,
        };
        if let Some(enabled) = pending {
            log::trace!("Delivering deferred activity hook to {:?}", id);
            self.run_activity_hook(id, enabled);
        }
        Some(result)
    }

    fn run_activity_hook(&mut self, id: ComponentId, enabled: bool) {
        self.run_hook(id, |component, ctx| {
            if enabled {
                component.post_enable(ctx);
            } else {
                component.post_disable(ctx);
            }
        });
    }

    /// Forward an entity's `post_enable` / `post_disable` to its components
    pub(crate) fn fire_activity_hook(&mut self, id: EntityId, enabled: bool) {
        let Some(entity) = self.entities.get(id) else {
            return;
        };
        log::trace!(
            "Entity {:?} '{}' {}",
            id,
            entity.name(),
            if enabled { "enabled" } else { "disabled" }
        );

        let components = entity.components.clone();
        for component in components {
            // A component running one of its own hooks gets the flip when it
            // is put back.
            if let Some(slot) = self
                .components
                .get_mut(component)
                .filter(|slot| slot.owner().is_some() && slot.is_checked_out())
            {
                slot.queue_activity(enabled);
                continue;
            }
            self.run_activity_hook(component, enabled);
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Whether the handle still resolves
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Whether the component still exists
    pub fn contains_component(&self, id: ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// Resolve an entity handle
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Resolve an entity handle, reporting stale handles as an error
    pub fn try_entity(&self, id: EntityId) -> Result<&Entity, SceneError> {
        self.entities.get(id).ok_or(SceneError::StaleEntity(id))
    }

    /// Local transform of an entity
    pub fn local_transform(&self, id: EntityId) -> Option<&Transform> {
        self.entities.get(id).map(Entity::local_transform)
    }

    /// Mutable local transform of an entity
    pub fn local_transform_mut(&mut self, id: EntityId) -> Option<&mut Transform> {
        self.entities.get_mut(id).map(Entity::local_transform_mut)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether there are no live entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live entities in creation order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.entities.get(*id).map(|entity| (*id, entity)))
    }

    /// Find an entity by name
    ///
    /// Roots are searched first, in creation order. With `recursive`, the
    /// descendants of each root are then searched depth-first.
    pub fn find_entity(&self, name: &str, recursive: bool) -> Option<EntityId> {
        let roots: Vec<EntityId> = self
            .iter()
            .filter(|(_, entity)| !entity.has_parent())
            .map(|(id, _)| id)
            .collect();

        if let Some(found) = roots.iter().copied().find(|id| self.name_matches(*id, name)) {
            return Some(found);
        }
        if recursive {
            return roots.into_iter().find_map(|root| self.find_child(root, name, true));
        }
        None
    }

    /// Find a descendant of `parent` by name
    ///
    /// Direct children first; with `recursive`, each child's subtree is then
    /// searched depth-first.
    pub fn find_child(&self, parent: EntityId, name: &str, recursive: bool) -> Option<EntityId> {
        if let Some(found) = self.children(parent).find(|child| self.name_matches(*child, name)) {
            return Some(found);
        }
        if recursive {
            return self
                .children(parent)
                .find_map(|child| self.find_child(child, name, true));
        }
        None
    }

    fn name_matches(&self, id: EntityId, name: &str) -> bool {
        self.entities.get(id).is_some_and(|entity| entity.name() == name)
    }

    /// Owner of a component; `None` until the component has been bound
    pub fn owner_of(&self, id: ComponentId) -> Option<EntityId> {
        self.components.get(id).and_then(ComponentSlot::owner)
    }

    /// Resolve a typed component handle
    pub fn component<T: Component>(&self, handle: ComponentHandle<T>) -> Option<&T> {
        let component = self.components.get(handle.id())?.component.as_deref()?;
        downcast_ref::<T>(component)
    }

    /// Resolve a typed component handle mutably
    pub fn component_mut<T: Component>(&mut self, handle: ComponentHandle<T>) -> Option<&mut T> {
        let component = self.components.get_mut(handle.id())?.component.as_deref_mut()?;
        downcast_mut::<T>(component)
    }

    /// Resolve a typed component handle, reporting failure as an error
    pub fn try_component<T: Component>(&self, handle: ComponentHandle<T>) -> Result<&T, SceneError> {
        self.component(handle).ok_or(SceneError::StaleComponent(handle.id()))
    }

    /// Handle to the first component of type `T` on an entity
    pub fn component_handle<T: Component>(&self, entity: EntityId) -> Option<ComponentHandle<T>> {
        self.entities
            .get(entity)?
            .components
            .iter()
            .copied()
            .map(ComponentHandle::<T>::new)
            .find(|handle| self.component(*handle).is_some())
    }

    /// First component of type `T` on an entity
    pub fn find_component<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.component_handle::<T>(entity)
            .and_then(|handle| self.component(handle))
    }

    /// First component of type `T` on an entity, mutably
    pub fn find_component_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        let handle = self.component_handle::<T>(entity)?;
        self.component_mut(handle)
    }

    // ------------------------------------------------------------------
    // Scene slots
    // ------------------------------------------------------------------

    /// Current holder of a slot, if it is still alive
    pub fn current(&self, kind: SlotKind) -> Option<EntityId> {
        self.slots.holder(kind).filter(|id| self.entities.contains_key(*id))
    }

    /// Current camera entity
    pub fn current_camera(&self) -> Option<EntityId> {
        self.current(SlotKind::Camera)
    }

    /// Current light entity
    pub fn current_light(&self) -> Option<EntityId> {
        self.current(SlotKind::Light)
    }

    /// Make `entity` the holder of a slot
    pub fn claim_slot(&mut self, kind: SlotKind, entity: EntityId) {
        if self.entities.contains_key(entity) {
            log::debug!("{:?} slot claimed by {:?}", kind, entity);
            self.slots.claim(kind, entity);
        }
    }

    /// Clear a slot if `entity` still holds it
    pub fn release_slot(&mut self, kind: SlotKind, entity: EntityId) -> bool {
        let released = self.slots.release(kind, entity);
        if released {
            log::debug!("{:?} slot released by {:?}", kind, entity);
        }
        released
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    /// World transform: local transforms composed up the spatial parent chain
    ///
    /// Recomputed on every call.
    pub fn transform_matrix(&self, id: EntityId) -> Option<Mat4> {
        let entity = self.entities.get(id)?;
        let local = entity.local_transform.to_matrix();

        Some(match entity.spatial_parent().and_then(|parent| self.transform_matrix(parent)) {
            Some(parent) => parent * local,
            None => local,
        })
    }

    /// Inverse world transform, composed as `local⁻¹ * parent⁻¹`
    pub fn transform_matrix_inv(&self, id: EntityId) -> Option<Mat4> {
        let entity = self.entities.get(id)?;
        let local_inv = entity.local_transform.to_inverse_matrix();

        Some(match entity.spatial_parent().and_then(|parent| self.transform_matrix_inv(parent)) {
            Some(parent_inv) => local_inv * parent_inv,
            None => local_inv,
        })
    }

    /// Translation of the world transform
    pub fn world_position(&self, id: EntityId) -> Option<Vec3> {
        self.transform_matrix(id).map(|matrix| translation_of(&matrix))
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}
