use std::rc::Rc;

use approx::assert_relative_eq;

use super::{drain, EventLog, Witness};
use crate::ecs::{Component, ComponentContext, EntityId, EntityManager, EntityRelationship, TickGroup};
use crate::foundation::math::{Mat4, Transform, Vec3};

fn spawn(manager: &mut EntityManager, name: &'static str, log: &EventLog) -> EntityId {
    let id = manager.create_entity(name, TickGroup::Standard);
    manager.add_component(id, Witness::new(name, log));
    id
}

/// Switches its own owner off (and optionally back on) from `tick`
struct SelfSwitch {
    log: EventLog,
    toggle_back: bool,
}

impl Component for SelfSwitch {
    fn tick(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) {
        let owner = ctx.owner();
        ctx.set_active(owner, false);
        if self.toggle_back {
            ctx.set_active(owner, true);
        }
    }

    fn post_enable(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.log.borrow_mut().push("switch:enable".to_string());
    }

    fn post_disable(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.log.borrow_mut().push("switch:disable".to_string());
    }
}

fn active(manager: &EntityManager, id: EntityId) -> bool {
    manager.entity(id).is_some_and(|e| e.active_in_hierarchy())
}

/// Every live entity satisfies the activity rule against its parent
fn assert_activity_invariant(manager: &EntityManager) {
    for (id, entity) in manager.iter() {
        let parent_active = entity
            .activity_parent()
            .and_then(|parent| manager.entity(parent))
            .map_or(true, |parent| parent.active_in_hierarchy());
        assert_eq!(
            entity.active_in_hierarchy(),
            entity.active_self() && parent_active,
            "activity invariant broken at {:?} '{}'",
            id,
            entity.name()
        );
    }
}

#[test]
fn test_activity_invariant_holds_through_toggles_and_reparenting() {
    let log = EventLog::default();
    let mut manager = EntityManager::new();
    let root = spawn(&mut manager, "root", &log);
    let left = spawn(&mut manager, "left", &log);
    let right = spawn(&mut manager, "right", &log);
    let leaf = spawn(&mut manager, "leaf", &log);
    let loose = spawn(&mut manager, "loose", &log);
    manager.set_parent(left, Some(root), EntityRelationship::FULL);
    manager.set_parent(right, Some(root), EntityRelationship::FULL);
    manager.set_parent(leaf, Some(left), EntityRelationship::FULL);
    manager.set_parent(loose, Some(right), EntityRelationship::SPATIAL);
    manager.flush_created();
    assert_activity_invariant(&manager);

    let steps: [(EntityId, bool); 6] = [
        (left, false),
        (root, false),
        (leaf, false),
        (root, true),
        (left, true),
        (leaf, true),
    ];
    for (id, flag) in steps {
        manager.set_active(id, flag);
        assert_activity_invariant(&manager);
    }

    manager.set_active(right, false);
    manager.set_parent(leaf, Some(right), EntityRelationship::FULL);
    assert_activity_invariant(&manager);
    manager.set_parent(loose, Some(right), EntityRelationship::ACTIVITY);
    assert_activity_invariant(&manager);
    assert!(!active(&manager, loose));
}

#[test]
fn test_chain_deactivation_fires_once_children_first() {
    let log = EventLog::default();
    let mut manager = EntityManager::new();
    let a = spawn(&mut manager, "A", &log);
    let b = spawn(&mut manager, "B", &log);
    let c = spawn(&mut manager, "C", &log);
    manager.set_parent(b, Some(a), EntityRelationship::FULL);
    manager.set_parent(c, Some(b), EntityRelationship::FULL);
    manager.flush_created();
    drain(&log);

    manager.set_active(a, false);
    assert_eq!(drain(&log), vec!["C:disable", "B:disable", "A:disable"]);
    assert!(!active(&manager, c));
    assert!(manager.entity(c).is_some_and(|e| e.active_self()));

    // Already inactive in the hierarchy: no hooks.
    manager.set_active(b, false);
    manager.set_active(a, false);
    assert!(drain(&log).is_empty());

    manager.set_active(a, true);
    assert_eq!(drain(&log), vec!["A:enable"]);
    assert!(!active(&manager, b));
    assert!(!active(&manager, c));

    manager.set_active(b, true);
    assert_eq!(drain(&log), vec!["C:enable", "B:enable"]);
}

#[test]
fn test_reparent_round_trip() {
    let log = EventLog::default();
    let mut manager = EntityManager::new();
    let home = spawn(&mut manager, "home", &log);
    let away = spawn(&mut manager, "away", &log);
    let child = spawn(&mut manager, "child", &log);
    manager.set_parent(child, Some(home), EntityRelationship::FULL);
    manager.set_active(away, false);
    manager.flush_created();
    drain(&log);

    manager.set_parent(child, Some(away), EntityRelationship::FULL);
    assert_eq!(drain(&log), vec!["child:disable"]);
    assert_eq!(manager.children(home).count(), 0);
    assert_eq!(manager.children(away).collect::<Vec<_>>(), vec![child]);

    manager.set_parent(child, Some(home), EntityRelationship::FULL);
    assert_eq!(drain(&log), vec!["child:enable"]);
    assert_eq!(manager.parent(child), Some(home));
    assert_eq!(manager.children(away).count(), 0);

    // Same parent, same relationship: nothing happens.
    manager.set_parent(child, Some(home), EntityRelationship::FULL);
    assert!(drain(&log).is_empty());
    assert_eq!(manager.children(home).count(), 1);
}

#[test]
fn test_world_transform_composes_spatial_chain() {
    let mut manager = EntityManager::new();
    let a = manager.create_entity_with_transform(
        "A",
        TickGroup::None,
        Transform::from_position(Vec3::new(1.0, 0.0, 0.0)),
    );
    let b = manager.create_entity_with_transform(
        "B",
        TickGroup::None,
        Transform::from_position(Vec3::new(0.0, 2.0, 0.0)).with_scale(Vec3::new(2.0, 2.0, 2.0)),
    );
    manager.set_parent(b, Some(a), EntityRelationship::FULL);

    let world = manager.world_position(b).unwrap_or_else(Vec3::zeros);
    assert_relative_eq!(world, Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-5);

    let forward = manager.transform_matrix(b).unwrap_or_else(Mat4::zeros);
    let inverse = manager.transform_matrix_inv(b).unwrap_or_else(Mat4::zeros);
    assert_relative_eq!(inverse * forward, Mat4::identity(), epsilon = 1e-5);

    // Activity-only coupling leaves the transform local.
    manager.set_parent(b, Some(a), EntityRelationship::ACTIVITY);
    let world = manager.world_position(b).unwrap_or_else(Vec3::zeros);
    assert_relative_eq!(world, Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-5);
}

#[test]
fn test_children_of_destroyed_parent_become_active_roots() {
    let log = EventLog::default();
    let mut manager = EntityManager::new();
    let parent = spawn(&mut manager, "parent", &log);
    let child = spawn(&mut manager, "child", &log);
    manager.set_parent(child, Some(parent), EntityRelationship::FULL);
    manager.flush_created();
    manager.set_active(parent, false);
    drain(&log);

    manager.destroy(parent);
    manager.flush_destroyed();

    assert_eq!(drain(&log), vec!["parent:destroy", "child:enable"]);
    assert!(manager.contains(child));
    assert_eq!(manager.parent(child), None);
    assert!(active(&manager, child));
    assert_eq!(manager.find_entity("child", false), Some(child));
}

#[test]
fn test_component_disabling_its_own_owner_gets_post_disable() {
    let log = EventLog::default();
    let mut manager = EntityManager::new();
    let lamp = manager.create_entity("lamp", TickGroup::Standard);
    manager.add_component(
        lamp,
        SelfSwitch {
            log: Rc::clone(&log),
            toggle_back: false,
        },
    );
    manager.add_component(lamp, Witness::in_group("sibling", TickGroup::None, &log));

    manager.tick(0.016);

    assert!(!active(&manager, lamp));
    assert_eq!(drain(&log), vec!["sibling:create", "sibling:disable", "switch:disable"]);

    manager.set_active(lamp, true);
    assert_eq!(drain(&log), vec!["switch:enable", "sibling:enable"]);
}

#[test]
fn test_owner_toggled_off_and_on_within_own_hook_fires_nothing() {
    let log = EventLog::default();
    let mut manager = EntityManager::new();
    let lamp = manager.create_entity("lamp", TickGroup::Standard);
    manager.add_component(
        lamp,
        SelfSwitch {
            log: Rc::clone(&log),
            toggle_back: true,
        },
    );

    manager.tick(0.016);

    assert!(active(&manager, lamp));
    assert!(drain(&log).is_empty());
}
