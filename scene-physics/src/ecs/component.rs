// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Component storage
//!
//! Colliders and rigidbodies are stored one per entity. The physics step
//! iterates them in registration order, so storage here is dense and
//! insertion-ordered: removing an entry shifts later entries down instead
//! of swapping the last one into the hole.

use crate::ecs::Entity;
use std::collections::HashMap;

/// Marker trait for data attached to entities
///
/// Components are plain data. Behaviour lives in the physics world.
pub trait Component: 'static + Send + Sync {}

/// Storage interface for components
pub trait ComponentStorage {
    /// The component type this storage manages
    type Component: Component;

    /// Insert a component for the given entity
    ///
    /// Returns `false` and leaves the storage untouched if the entity
    /// already has one.
    fn insert(&mut self, entity: Entity, component: Self::Component) -> bool;

    /// Remove a component for the given entity
    fn remove(&mut self, entity: Entity) -> Option<Self::Component>;

    /// Get a reference to a component for the given entity
    fn get(&self, entity: Entity) -> Option<&Self::Component>;

    /// Get a mutable reference to a component for the given entity
    fn get_mut(&mut self, entity: Entity) -> Option<&mut Self::Component>;

    /// Check if an entity has this component
    fn contains(&self, entity: Entity) -> bool;

    /// Number of stored components
    fn len(&self) -> usize;

    /// Check whether nothing is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all components
    fn clear(&mut self);
}

/// Dense storage that iterates in insertion order
///
/// # Example
///
/// ```
/// use scene_physics::ecs::{ComponentStorage, Entity, OrderedStorage};
/// use scene_physics::physics::Rigidbody;
///
/// let mut storage = OrderedStorage::<Rigidbody>::new();
/// let a = Entity::new(7, 0);
/// let b = Entity::new(3, 0);
/// storage.insert(a, Rigidbody::default());
/// storage.insert(b, Rigidbody::default());
///
/// let order: Vec<_> = storage.entities().collect();
/// assert_eq!(order, vec![a, b]);
/// ```
pub struct OrderedStorage<T: Component> {
    index_of: HashMap<Entity, usize>,
    entities: Vec<Entity>,
    components: Vec<T>,
}

impl<T: Component> OrderedStorage<T> {
    /// Create a new empty storage
    pub fn new() -> Self {
        OrderedStorage {
            index_of: HashMap::new(),
            entities: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    /// Entity/component pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.entities.iter().copied().zip(self.components.iter())
    }

    /// Mutable entity/component pairs in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.entities.iter().copied().zip(self.components.iter_mut())
    }

    /// Dense position of an entity's component
    pub fn get_index(&self, entity: Entity) -> Option<usize> {
        self.index_of.get(&entity).copied()
    }

    /// Get two distinct components mutably at once
    ///
    /// Returns `None` if either entity is missing or both are the same.
    pub fn get_pair_mut(&mut self, a: Entity, b: Entity) -> Option<(&mut T, &mut T)> {
        let ia = self.get_index(a)?;
        let ib = self.get_index(b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (head, tail) = self.components.split_at_mut(ib);
            Some((&mut head[ia], &mut tail[0]))
        } else {
            let (head, tail) = self.components.split_at_mut(ia);
            Some((&mut tail[0], &mut head[ib]))
        }
    }
}

impl<T: Component> Default for OrderedStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage for OrderedStorage<T> {
    type Component = T;

    fn insert(&mut self, entity: Entity, component: T) -> bool {
        if self.index_of.contains_key(&entity) {
            return false;
        }
        self.index_of.insert(entity, self.components.len());
        self.entities.push(entity);
        self.components.push(component);

        debug_assert_eq!(self.index_of.len(), self.entities.len());
        debug_assert_eq!(self.entities.len(), self.components.len());
        true
    }

    fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.index_of.remove(&entity)?;
        self.entities.remove(index);
        let component = self.components.remove(index);
        // Everything after the hole moved down by one
        for shifted in &self.entities[index..] {
            if let Some(slot) = self.index_of.get_mut(shifted) {
                *slot -= 1;
            }
        }

        debug_assert_eq!(self.index_of.len(), self.entities.len());
        debug_assert_eq!(self.entities.len(), self.components.len());
        Some(component)
    }

    fn get(&self, entity: Entity) -> Option<&T> {
        let index = self.index_of.get(&entity)?;
        Some(&self.components[*index])
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = self.index_of.get(&entity)?;
        Some(&mut self.components[*index])
    }

    fn contains(&self, entity: Entity) -> bool {
        self.index_of.contains_key(&entity)
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn clear(&mut self) {
        self.index_of.clear();
        self.entities.clear();
        self.components.clear();
    }
}
