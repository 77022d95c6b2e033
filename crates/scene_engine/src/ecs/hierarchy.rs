//! # Entity Hierarchies
//!
//! Parent/child links and hierarchy activity.
//!
//! Both directions of a link are plain [`EntityId`]s; neither keeps the other
//! alive. The invariant maintained after every call is
//!
//! ```text
//! active_hierarchy == active_self && (no activity parent || parent.active_hierarchy)
//! ```
//!
//! A torn-down child is not removed from its parent's list at teardown time,
//! since the parent may be iterating that list. Stale entries are dropped the
//! next time the list is touched here.

use super::entity::{EntityId, EntityRelationship};
use super::manager::EntityManager;

impl EntityManager {
    /// Live children of an entity, in attachment order
    pub fn children(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .get(id)
            .map(|entity| entity.children.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(move |child| self.entities.contains_key(*child))
    }

    /// Parent of an entity, if both are alive
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entities
            .get(id)?
            .parent
            .filter(|parent| self.entities.contains_key(*parent))
    }

    /// Drop child entries whose entity has been torn down
    pub(crate) fn prune_children(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        let mut children = std::mem::take(&mut entity.children);
        let before = children.len();
        children.retain(|child| self.entities.contains_key(*child));

        if children.len() != before {
            log::trace!("Pruned {} stale child entr(ies) from {:?}", before - children.len(), id);
        }
        if let Some(entity) = self.entities.get_mut(id) {
            entity.children = children;
        }
    }

    /// Set an entity's own activity flag and propagate through its subtree
    pub fn set_active(&mut self, id: EntityId, active: bool) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        entity.active_self = active;

        let seed = self.activity_seed(id);
        self.propagate_active_change(id, seed);
    }

    /// Reparent an entity
    ///
    /// `None` detaches it. A stale `parent` is treated as `None`. Setting the
    /// current parent with the current relationship does nothing. The entity
    /// and its whole subtree re-derive hierarchy activity; each fires at most
    /// one enable/disable hook for its net change.
    ///
    /// Cycles are the caller's responsibility.
    pub fn set_parent(&mut self, id: EntityId, parent: Option<EntityId>, relationship: EntityRelationship) {
        let parent = parent.filter(|parent| self.entities.contains_key(*parent));
        let Some(entity) = self.entities.get(id) else {
            return;
        };
        let current = entity.parent;
        if current == parent && entity.relationship == relationship {
            return;
        }
        debug_assert_ne!(parent, Some(id), "an entity cannot be its own parent");

        if current != parent {
            if let Some(old) = current {
                if let Some(old_parent) = self.entities.get_mut(old) {
                    old_parent.children.retain(|child| *child != id);
                }
                self.prune_children(old);
            }
            if let Some(new) = parent {
                self.prune_children(new);
                if let Some(new_parent) = self.entities.get_mut(new) {
                    new_parent.children.push(id);
                }
            }
        }

        if let Some(entity) = self.entities.get_mut(id) {
            entity.parent = parent;
            entity.relationship = relationship;
        }
        log::trace!("Entity {:?} reparented {:?} -> {:?} ({:?})", id, current, parent, relationship);

        let seed = self.activity_seed(id);
        self.propagate_active_change(id, seed);
    }

    /// Hierarchy activity an entity inherits from its activity parent
    fn activity_seed(&self, id: EntityId) -> bool {
        self.entities
            .get(id)
            .and_then(|entity| entity.activity_parent())
            .and_then(|parent| self.entities.get(parent))
            .map_or(true, |parent| parent.active_hierarchy)
    }

    /// Recompute hierarchy activity for an entity and its subtree
    ///
    /// Children are visited first, seeded with this entity's new value; only
    /// then does this entity commit its own flag and fire its hook.
    pub(crate) fn propagate_active_change(&mut self, id: EntityId, parent_active: bool) {
        let Some(entity) = self.entities.get(id) else {
            return;
        };
        let new_active = parent_active && entity.active_self;
        let was_active = entity.active_hierarchy;

        self.prune_children(id);
        let children: Vec<EntityId> = self
            .children(id)
            .filter(|child| {
                self.entities
                    .get(*child)
                    .is_some_and(|record| record.parent == Some(id) && record.has_activity_parent())
            })
            .collect();

        for child in children {
            self.propagate_active_change(child, new_active);
        }

        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        entity.active_hierarchy = new_active;

        if new_active != was_active {
            self.fire_activity_hook(id, new_active);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::scheduler::TickGroup;

    fn chain(manager: &mut EntityManager) -> (EntityId, EntityId, EntityId) {
        let a = manager.create_entity("A", TickGroup::Standard);
        let b = manager.create_entity("B", TickGroup::Standard);
        let c = manager.create_entity("C", TickGroup::Standard);
        manager.set_parent(b, Some(a), EntityRelationship::FULL);
        manager.set_parent(c, Some(b), EntityRelationship::FULL);
        manager.flush_created();
        (a, b, c)
    }

    fn active(manager: &EntityManager, id: EntityId) -> bool {
        manager.entity(id).is_some_and(|e| e.active_in_hierarchy())
    }

    #[test]
    fn test_links_are_symmetric() {
        let mut manager = EntityManager::new();
        let (a, b, c) = chain(&mut manager);

        assert_eq!(manager.parent(b), Some(a));
        assert_eq!(manager.children(a).collect::<Vec<_>>(), vec![b]);
        assert_eq!(manager.children(b).collect::<Vec<_>>(), vec![c]);

        manager.set_parent(c, Some(a), EntityRelationship::FULL);
        assert_eq!(manager.children(a).collect::<Vec<_>>(), vec![b, c]);
        assert_eq!(manager.children(b).count(), 0);

        manager.set_parent(c, None, EntityRelationship::FULL);
        assert_eq!(manager.parent(c), None);
        assert_eq!(manager.children(a).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_set_active_uses_parent_state_as_seed() {
        let mut manager = EntityManager::new();
        let (a, b, c) = chain(&mut manager);

        manager.set_active(a, false);
        manager.set_active(c, true);

        assert!(!active(&manager, c));
        assert!(manager.entity(c).is_some_and(|e| e.active_self()));
        assert!(!active(&manager, b));
    }

    #[test]
    fn test_reparent_under_inactive_parent_disables_subtree() {
        let mut manager = EntityManager::new();
        let (_a, b, c) = chain(&mut manager);
        let dark = manager.create_entity("Dark", TickGroup::None);
        manager.set_active(dark, false);

        manager.set_parent(b, Some(dark), EntityRelationship::FULL);
        assert!(!active(&manager, b));
        assert!(!active(&manager, c));

        manager.set_parent(b, None, EntityRelationship::FULL);
        assert!(active(&manager, b));
        assert!(active(&manager, c));
    }

    #[test]
    fn test_spatial_only_child_ignores_parent_activity() {
        let mut manager = EntityManager::new();
        let parent = manager.create_entity("Parent", TickGroup::None);
        let overlay = manager.create_entity("Overlay", TickGroup::None);
        manager.set_parent(overlay, Some(parent), EntityRelationship::SPATIAL);

        manager.set_active(parent, false);
        assert!(active(&manager, overlay));
        assert!(!manager.entity(overlay).is_some_and(|e| e.has_activity_parent()));

        manager.set_parent(overlay, Some(parent), EntityRelationship::FULL);
        assert!(!active(&manager, overlay));
        assert_eq!(manager.children(parent).count(), 1);
    }

    #[test]
    fn test_set_parent_to_stale_parent_detaches() {
        let mut manager = EntityManager::new();
        let (a, b, _c) = chain(&mut manager);
        let gone = manager.create_entity("Gone", TickGroup::None);
        manager.destroy(gone);
        manager.flush_destroyed();

        manager.set_parent(b, Some(gone), EntityRelationship::FULL);
        assert_eq!(manager.parent(b), None);
        assert_eq!(manager.children(a).count(), 0);
    }
}
