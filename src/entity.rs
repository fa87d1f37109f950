//! Entities and the registry
//!
//! An entity is a stable numeric id, a caller-supplied tag, and a bag of
//! components: no inheritance, pure composition. The [`Registry`] owns
//! every entity in a growable slot vector and recycles ids through a
//! sorted free-list, oldest first, so ids stay dense under churn.
//!
//! Iteration uses explicit cursor structs rather than captured closures:
//! each cursor is an index into the slot vector plus a registry borrow,
//! advancing in ascending id order and skipping holes. Independent
//! cursors never interfere with each other.

use std::collections::HashMap;
use crate::component::{
    CameraComponent, CollisionComponent, Component, ComponentKind, PhysicsComponent,
    PositionComponent,
};

/// An id plus a bag of named components. Carries no behavior itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: u32,
    tag: String,
    components: HashMap<ComponentKind, Component>,
}

impl Entity {
    fn new(id: u32, tag: &str) -> Self {
        Self {
            id,
            tag: tag.to_string(),
            components: HashMap::new(),
        }
    }

    /// The registry-assigned id. Unique among live entities.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The caller-supplied type tag (e.g. "ball", "paddle").
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attach a component, replacing any existing value of the same kind.
    pub fn add(&mut self, component: Component) {
        self.components.insert(component.kind(), component);
    }

    /// Detach and return the component of the given kind, if present.
    pub fn remove(&mut self, kind: ComponentKind) -> Option<Component> {
        self.components.remove(&kind)
    }

    pub fn get(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.get(&kind)
    }

    pub fn get_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.components.get_mut(&kind)
    }

    /// Capability check: does this entity carry the given kind?
    pub fn has(&self, kind: ComponentKind) -> bool {
        self.components.contains_key(&kind)
    }

    /// Capability check over a kind list; order of the list is irrelevant.
    pub fn has_all(&self, kinds: &[ComponentKind]) -> bool {
        kinds.iter().all(|kind| self.has(*kind))
    }

    // Typed shortcuts for the components the core systems touch every tick.

    pub fn position(&self) -> Option<&PositionComponent> {
        self.get(ComponentKind::Position)?.as_position()
    }

    pub fn position_mut(&mut self) -> Option<&mut PositionComponent> {
        self.get_mut(ComponentKind::Position)?.as_position_mut()
    }

    pub fn physics(&self) -> Option<&PhysicsComponent> {
        self.get(ComponentKind::Physics)?.as_physics()
    }

    pub fn physics_mut(&mut self) -> Option<&mut PhysicsComponent> {
        self.get_mut(ComponentKind::Physics)?.as_physics_mut()
    }

    pub fn collision(&self) -> Option<&CollisionComponent> {
        self.get(ComponentKind::Collision)?.as_collision()
    }

    pub fn camera(&self) -> Option<&CameraComponent> {
        self.get(ComponentKind::Camera)?.as_camera()
    }
}

/// Owns every entity in the simulation.
///
/// Slots are indexed by entity id. Deleting clears the slot and pushes the
/// id into `free_slots`, kept sorted ascending so the oldest reclaimed id
/// is always reused first.
#[derive(Debug, Default)]
pub struct Registry {
    /// Ids handed out so far; only grows.
    counter: u32,
    entities: Vec<Option<Entity>>,
    /// Reclaimed ids, sorted ascending.
    free_slots: Vec<u32>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity and return it. Reuses the lowest reclaimed id
    /// if one exists, otherwise issues a fresh id. Never fails.
    pub fn create(&mut self, tag: &str) -> &mut Entity {
        let id = if self.free_slots.is_empty() {
            let id = self.counter;
            self.counter += 1;
            self.entities.push(None);
            id
        } else {
            self.free_slots.remove(0)
        };
        self.entities[id as usize].insert(Entity::new(id, tag))
    }

    /// Delete the entity with the given id. Returns false when the slot is
    /// already empty or the id was never issued.
    pub fn delete(&mut self, id: u32) -> bool {
        let Some(slot) = self.entities.get_mut(id as usize) else {
            return false;
        };
        if slot.is_none() {
            return false;
        }
        *slot = None;
        // Binary-search insertion keeps the free-list sorted so create()
        // can pop the oldest id from the front.
        if let Err(at) = self.free_slots.binary_search(&id) {
            self.free_slots.insert(at, id);
        }
        true
    }

    /// The entity with the given id, or None if out of range or deleted.
    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.get(id as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.get_mut(id as usize)?.as_mut()
    }

    /// Number of currently live entities.
    pub fn live_count(&self) -> usize {
        self.entities.iter().filter(|slot| slot.is_some()).count()
    }

    /// Cursor over live entities in ascending id order.
    pub fn iter_available(&self) -> EntityIter<'_> {
        self.iter_available_from(0)
    }

    /// Cursor over live entities starting at a slot index.
    pub fn iter_available_from(&self, start: usize) -> EntityIter<'_> {
        EntityIter {
            registry: self,
            index: start,
        }
    }

    /// Cursor over live entities holding every kind in `kinds`.
    pub fn iter_with(&self, kinds: &[ComponentKind]) -> FilteredIter<'_> {
        self.iter_with_from(kinds, 0)
    }

    pub fn iter_with_from(&self, kinds: &[ComponentKind], start: usize) -> FilteredIter<'_> {
        FilteredIter {
            inner: self.iter_available_from(start),
            kinds: kinds.to_vec(),
        }
    }
}

/// Explicit iteration cursor: a slot index plus a registry borrow.
///
/// Non-restartable; once exhausted it stays exhausted even if entities
/// are created later through another path.
pub struct EntityIter<'a> {
    registry: &'a Registry,
    index: usize,
}

impl<'a> Iterator for EntityIter<'a> {
    type Item = (&'a Entity, u32);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.registry.entities.len() {
            let i = self.index;
            self.index += 1;
            if let Some(entity) = self.registry.entities[i].as_ref() {
                return Some((entity, i as u32));
            }
        }
        None
    }
}

/// Cursor restricted to entities holding a full set of component kinds.
/// An entity missing any requested kind is silently skipped.
pub struct FilteredIter<'a> {
    inner: EntityIter<'a>,
    kinds: Vec<ComponentKind>,
}

impl<'a> Iterator for FilteredIter<'a> {
    type Item = (&'a Entity, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let kinds = &self.kinds;
        self.inner.find(|(entity, _)| entity.has_all(kinds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, PhysicsComponent, PositionComponent};
    use crate::math::{Point, Vec2f};

    fn position() -> Component {
        Component::Position(PositionComponent { pos: Point::ZERO })
    }

    fn physics() -> Component {
        Component::Physics(PhysicsComponent::new(Point::ZERO, Vec2f::ZERO, Vec2f::ZERO))
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let mut registry = Registry::new();
        let first = registry.create("a").id();
        let second = registry.create("b").id();
        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(registry.get(1).map(|e| e.tag()), Some("b"));
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let mut registry = Registry::new();
        registry.create("a");
        assert!(registry.get(0).is_some());
        assert!(registry.get(1).is_none());
    }

    #[test]
    fn test_delete_clears_slot_and_reports() {
        let mut registry = Registry::new();
        registry.create("a");
        registry.create("b");

        assert!(registry.delete(1));
        assert!(registry.get(1).is_none());
        // deleting an already-empty slot is a no-op failure
        assert!(!registry.delete(1));
        assert!(!registry.delete(99));
    }

    #[test]
    fn test_reuse_oldest_reclaimed_id_first() {
        let mut registry = Registry::new();
        for tag in ["a", "b", "c"] {
            registry.create(tag);
        }
        // delete out of order; the free-list must stay sorted
        registry.delete(2);
        registry.delete(0);

        assert_eq!(registry.create("d").id(), 0);
        assert_eq!(registry.create("e").id(), 2);
        assert_eq!(registry.create("f").id(), 3);
    }

    #[test]
    fn test_live_ids_stay_distinct_under_churn() {
        let mut registry = Registry::new();
        for i in 0..8 {
            registry.create(&format!("e{}", i));
        }
        registry.delete(3);
        registry.delete(5);
        registry.create("r1");
        registry.delete(1);
        registry.create("r2");
        registry.create("r3");

        let mut ids: Vec<u32> = registry.iter_available().map(|(e, _)| e.id()).collect();
        let live = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), live);
        assert_eq!(live, registry.live_count());
    }

    #[test]
    fn test_iteration_skips_holes_ascending() {
        let mut registry = Registry::new();
        for tag in ["a", "b", "c", "d"] {
            registry.create(tag);
        }
        registry.delete(1);

        let ids: Vec<u32> = registry.iter_available().map(|(_, id)| id).collect();
        assert_eq!(ids, vec![0, 2, 3]);
    }

    #[test]
    fn test_iterating_empty_registry() {
        let registry = Registry::new();
        assert_eq!(registry.iter_available().count(), 0);
    }

    #[test]
    fn test_independent_cursors_advance_in_lockstep() {
        let mut registry = Registry::new();
        for tag in ["a", "b", "c"] {
            registry.create(tag);
        }

        let mut first = registry.iter_available();
        let mut second = registry.iter_available();
        assert_eq!(first.next().map(|(_, id)| id), Some(0));
        assert_eq!(first.next().map(|(_, id)| id), Some(1));
        // the second cursor is unaffected by the first
        assert_eq!(second.next().map(|(_, id)| id), Some(0));
        assert_eq!(first.next().map(|(_, id)| id), Some(2));
        assert_eq!(first.next(), None);
        assert_eq!(second.next().map(|(_, id)| id), Some(1));
    }

    #[test]
    fn test_filtered_iteration_requires_every_kind() {
        let mut registry = Registry::new();
        registry.create("bare");
        let with_pos = registry.create("pos");
        with_pos.add(position());
        let with_pos_id = with_pos.id();
        let with_both = registry.create("both");
        with_both.add(position());
        with_both.add(physics());
        let with_both_id = with_both.id();

        let pos_only: Vec<u32> = registry
            .iter_with(&[ComponentKind::Position])
            .map(|(e, _)| e.id())
            .collect();
        assert_eq!(pos_only, vec![with_pos_id, with_both_id]);

        let both: Vec<u32> = registry
            .iter_with(&[ComponentKind::Position, ComponentKind::Physics])
            .map(|(e, _)| e.id())
            .collect();
        assert_eq!(both, vec![with_both_id]);

        // kind list order does not matter
        let both_swapped: Vec<u32> = registry
            .iter_with(&[ComponentKind::Physics, ComponentKind::Position])
            .map(|(e, _)| e.id())
            .collect();
        assert_eq!(both_swapped, both);
    }

    #[test]
    fn test_component_replacement_and_removal() {
        let mut registry = Registry::new();
        let entity = registry.create("a");
        entity.add(position());
        entity.add(Component::Position(PositionComponent {
            pos: Point::new(5, 6),
        }));
        assert_eq!(entity.position().map(|p| p.pos), Some(Point::new(5, 6)));

        assert!(entity.remove(ComponentKind::Position).is_some());
        assert!(entity.position().is_none());
        assert!(entity.remove(ComponentKind::Position).is_none());
    }
}
