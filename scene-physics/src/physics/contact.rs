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
//! Contact records

use crate::ecs::Entity;
use crate::math::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry of a single contact
///
/// `normal` is a unit vector pointing from the first shape toward the
/// second. Moving the second shape by `normal * depth` (or the first by the
/// opposite) separates them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionInfo {
    /// Unit normal from A to B
    pub normal: Vec2,
    /// Penetration distance, never negative
    pub depth: f64,
    /// World-space contact point
    pub point: Vec2,
}

impl CollisionInfo {
    /// The same contact seen from the other shape
    pub fn flipped(&self) -> CollisionInfo {
        CollisionInfo {
            normal: -self.normal,
            ..*self
        }
    }
}

/// Unordered identity of a collider pair
///
/// Stores the two entities sorted so `(a, b)` and `(b, a)` hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(Entity, Entity);

impl PairKey {
    /// Build the key for two entities in either order
    pub fn new(a: Entity, b: Entity) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }

    /// The smaller entity
    pub fn first(&self) -> Entity {
        self.0
    }

    /// The larger entity
    pub fn second(&self) -> Entity {
        self.1
    }
}

/// A contact detected during one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPair {
    /// Owner of the first collider
    pub a: Entity,
    /// Owner of the second collider
    pub b: Entity,
    /// Contact geometry, normal from `a` to `b`
    pub info: CollisionInfo,
}

impl CollisionPair {
    /// Unordered identity of this pair
    pub fn key(&self) -> PairKey {
        PairKey::new(self.a, self.b)
    }

    /// The entity on the other side of the pair from `entity`
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if entity == self.a {
            Some(self.b)
        } else if entity == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    /// Check whether `entity` is part of this pair
    pub fn involves(&self, entity: Entity) -> bool {
        self.a == entity || self.b == entity
    }
}
