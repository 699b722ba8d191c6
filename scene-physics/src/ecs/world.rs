//! World management
//!
//! The World owns entity lifecycles, each entity's transform in the scene
//! graph, its active flag, and the collision listeners attached to it.
//! Colliders and rigidbodies are registered separately with a
//! [`PhysicsWorld`](crate::physics::PhysicsWorld).

use crate::ecs::listener::{CollisionListener, CollisionPhase, ListenerId, ListenerSlot};
use crate::ecs::Entity;
use crate::error::{PhysicsError, Result};
use crate::scene::{SceneGraph, Transform, TransformId};
use std::collections::HashMap;

struct EntityRecord {
    transform: TransformId,
    active: bool,
    listeners: Vec<ListenerSlot>,
}

/// The main entity container
///
/// Every entity owns exactly one transform. Destroying an entity destroys
/// its transform and orphans the transforms of its children.
pub struct World {
    next_entity_id: u64,
    free_ids: Vec<u64>,
    entity_generations: Vec<u32>,
    records: HashMap<Entity, EntityRecord>,
    scene: SceneGraph,
    next_listener_id: u64,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        World {
            next_entity_id: 0,
            free_ids: Vec::new(),
            entity_generations: Vec::new(),
            records: HashMap::new(),
            scene: SceneGraph::new(),
            next_listener_id: 0,
        }
    }

    /// Create a new active entity at the origin
    pub fn create_entity(&mut self) -> Entity {
        self.create_entity_with(Transform::IDENTITY)
    }

    /// Create a new active entity with the given local transform
    pub fn create_entity_with(&mut self, local: Transform) -> Entity {
        let id = match self.free_ids.pop() {
            Some(id) => id,
            None => {
                let id = self.next_entity_id;
                self.next_entity_id += 1;
                self.entity_generations.push(0);
                id
            }
        };

        let generation = self.entity_generations[id as usize];
        let entity = Entity::new(id, generation);
        let transform = self.scene.create(local);
        self.records.insert(
            entity,
            EntityRecord {
                transform,
                active: true,
                listeners: Vec::new(),
            },
        );
        entity
    }

    /// Destroy an entity
    ///
    /// Increments the generation of the id so old handles stop resolving.
    /// Returns false if the entity was not alive.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        let Some(record) = self.records.remove(&entity) else {
            return false;
        };

        if let Err(err) = self.scene.destroy(record.transform) {
            log::warn!("{} had a dangling transform: {}", entity, err);
        }

        let id = entity.id().raw() as usize;
        self.entity_generations[id] = self.entity_generations[id].wrapping_add(1);
        self.free_ids.push(entity.id().raw());
        true
    }

    /// Check if an entity is alive
    pub fn is_entity_alive(&self, entity: Entity) -> bool {
        self.records.contains_key(&entity)
    }

    /// Get the number of alive entities
    pub fn entity_count(&self) -> usize {
        self.records.len()
    }

    /// Iterate over all alive entities
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.records.keys()
    }

    /// Whether the entity is alive and active
    pub fn is_active(&self, entity: Entity) -> bool {
        self.records.get(&entity).map(|r| r.active).unwrap_or(false)
    }

    /// Enable or disable an entity
    ///
    /// Inactive entities are skipped by integration and detection.
    pub fn set_active(&mut self, entity: Entity, active: bool) -> Result<()> {
        self.record_mut(entity)?.active = active;
        Ok(())
    }

    /// Transform owned by an entity
    pub fn transform(&self, entity: Entity) -> Result<TransformId> {
        self.records
            .get(&entity)
            .map(|r| r.transform)
            .ok_or(PhysicsError::UnknownEntity(entity))
    }

    /// Read access to the scene graph
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Write access to the scene graph
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// Reparent one entity's transform under another's, preserving its world pose
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> Result<()> {
        let child_transform = self.transform(child)?;
        let parent_transform = parent.map(|p| self.transform(p)).transpose()?;
        self.scene.set_parent(child_transform, parent_transform)
    }

    /// Attach a collision listener to an entity
    pub fn add_listener(
        &mut self,
        entity: Entity,
        listener: Box<dyn CollisionListener>,
    ) -> Result<ListenerId> {
        let id = ListenerId(self.next_listener_id);
        let record = self.record_mut(entity)?;
        log::debug!("attached listener {} to {}", listener.name(), entity);
        record.listeners.push(ListenerSlot {
            id,
            enabled: true,
            listener,
        });
        self.next_listener_id += 1;
        Ok(id)
    }

    /// Detach a listener, returning it if it was attached
    pub fn remove_listener(
        &mut self,
        entity: Entity,
        id: ListenerId,
    ) -> Option<Box<dyn CollisionListener>> {
        let record = self.records.get_mut(&entity)?;
        let index = record.listeners.iter().position(|slot| slot.id == id)?;
        Some(record.listeners.remove(index).listener)
    }

    /// Enable or disable a single listener without detaching it
    pub fn set_listener_enabled(&mut self, entity: Entity, id: ListenerId, enabled: bool) -> Result<()> {
        let record = self.record_mut(entity)?;
        if let Some(slot) = record.listeners.iter_mut().find(|slot| slot.id == id) {
            slot.enabled = enabled;
        }
        Ok(())
    }

    /// Number of listeners attached to an entity
    pub fn listener_count(&self, entity: Entity) -> usize {
        self.records.get(&entity).map(|r| r.listeners.len()).unwrap_or(0)
    }

    /// Invoke the hook for `phase` on every enabled listener of `entity`
    ///
    /// Dead entities are skipped. Returns the number of listeners invoked.
    pub fn notify(&mut self, entity: Entity, phase: CollisionPhase, other: Entity) -> usize {
        let Some(record) = self.records.get_mut(&entity) else {
            return 0;
        };
        let mut invoked = 0;
        for slot in record.listeners.iter_mut().filter(|slot| slot.enabled) {
            slot.invoke(phase, other);
            invoked += 1;
        }
        invoked
    }

    /// Remove every entity and transform
    ///
    /// Generations are kept, so handles from before the clear stay dead.
    pub fn clear(&mut self) {
        for (entity, _) in self.records.drain() {
            let id = entity.id().raw();
            let generation = &mut self.entity_generations[id as usize];
            *generation = generation.wrapping_add(1);
            self.free_ids.push(id);
        }
        self.scene = SceneGraph::new();
    }

    fn record_mut(&mut self, entity: Entity) -> Result<&mut EntityRecord> {
        self.records
            .get_mut(&entity)
            .ok_or(PhysicsError::UnknownEntity(entity))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        log: Arc<Mutex<Vec<(CollisionPhase, Entity)>>>,
    }

    impl CollisionListener for Recorder {
        fn on_collision_enter(&mut self, other: Entity) {
            self.log.lock().unwrap().push((CollisionPhase::Enter, other));
        }
        fn on_collision_exit(&mut self, other: Entity) {
            self.log.lock().unwrap().push((CollisionPhase::Exit, other));
        }
    }

    #[test]
    fn test_world_entity_lifecycle() {
        let mut world = World::new();

        let e1 = world.create_entity();
        let e2 = world.create_entity();

        assert_eq!(world.entity_count(), 2);
        assert!(world.is_entity_alive(e1));
        assert!(world.is_entity_alive(e2));

        assert!(world.destroy_entity(e1));
        assert!(!world.destroy_entity(e1));
        assert_eq!(world.entity_count(), 1);
        assert!(!world.is_entity_alive(e1));
        assert!(world.transform(e1).is_err());
        assert_eq!(world.scene().len(), 1);
    }

    #[test]
    fn test_entity_generation_on_reuse() {
        let mut world = World::new();
        let e1 = world.create_entity();
        world.destroy_entity(e1);
        let e2 = world.create_entity();

        assert_eq!(e2.id(), e1.id());
        assert_ne!(e2.generation(), e1.generation());
        assert!(!world.is_entity_alive(e1));
    }

    #[test]
    fn test_active_flag() {
        let mut world = World::new();
        let e = world.create_entity();
        assert!(world.is_active(e));
        world.set_active(e, false).unwrap();
        assert!(!world.is_active(e));

        world.destroy_entity(e);
        assert!(!world.is_active(e));
        assert_eq!(world.set_active(e, true), Err(PhysicsError::UnknownEntity(e)));
    }

    #[test]
    fn test_destroy_orphans_child_transforms() {
        let mut world = World::new();
        let parent = world.create_entity_with(Transform::from_position(Vec2::new(10.0, 0.0)));
        let child = world.create_entity();
        world.set_parent(child, Some(parent)).unwrap();

        world.destroy_entity(parent);
        let t = world.transform(child).unwrap();
        assert_eq!(world.scene().parent(t).unwrap(), None);
    }

    #[test]
    fn test_listener_enable_and_remove() {
        let mut world = World::new();
        let e = world.create_entity();
        let other = world.create_entity();
        let log = Arc::new(Mutex::new(Vec::new()));

        let id = world
            .add_listener(e, Box::new(Recorder { log: Arc::clone(&log) }))
            .unwrap();
        assert_eq!(world.notify(e, CollisionPhase::Enter, other), 1);

        world.set_listener_enabled(e, id, false).unwrap();
        assert_eq!(world.notify(e, CollisionPhase::Exit, other), 0);

        world.set_listener_enabled(e, id, true).unwrap();
        assert_eq!(world.notify(e, CollisionPhase::Exit, other), 1);
        // Stay has no override on Recorder; it is invoked but records nothing
        assert_eq!(world.notify(e, CollisionPhase::Stay, other), 1);

        assert!(world.remove_listener(e, id).is_some());
        assert_eq!(world.listener_count(e), 0);
        assert_eq!(
            *log.lock().unwrap(),
            vec![(CollisionPhase::Enter, other), (CollisionPhase::Exit, other)]
        );
    }

    #[test]
    fn test_world_clear() {
        let mut world = World::new();
        world.create_entity();
        world.create_entity();

        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert!(world.scene().is_empty());

        let fresh = world.create_entity();
        assert_eq!(fresh.generation(), 1);
    }
}
