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
//! Collision listeners
//!
//! Behaviour components that want to react to contacts implement
//! [`CollisionListener`] and are attached to an entity through
//! [`World::add_listener`](crate::ecs::World::add_listener). Every hook has
//! an empty default, so a listener only overrides the phases it cares
//! about.

use crate::ecs::Entity;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Phase of a contact between two colliders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CollisionPhase {
    /// First step the pair is touching
    Enter,
    /// The pair was touching last step and still is
    Stay,
    /// The pair was touching last step and no longer is
    Exit,
}

impl fmt::Display for CollisionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CollisionPhase::Enter => "enter",
            CollisionPhase::Stay => "stay",
            CollisionPhase::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// Hooks invoked by the physics world for an entity's contacts
///
/// `other` is the entity owning the other collider of the pair.
///
/// Listeners run while the physics world is mid-step and are handed only
/// the other entity's handle, so they cannot step the world again from
/// inside a callback.
pub trait CollisionListener: Send {
    /// Called on the first step two colliders touch
    fn on_collision_enter(&mut self, _other: Entity) {}

    /// Called on every following step the colliders keep touching
    fn on_collision_stay(&mut self, _other: Entity) {}

    /// Called on the first step the colliders stop touching
    fn on_collision_exit(&mut self, _other: Entity) {}

    /// Get the name of this listener for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Handle to a listener attached to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

pub(crate) struct ListenerSlot {
    pub(crate) id: ListenerId,
    pub(crate) enabled: bool,
    pub(crate) listener: Box<dyn CollisionListener>,
}

impl ListenerSlot {
    pub(crate) fn invoke(&mut self, phase: CollisionPhase, other: Entity) {
        match phase {
            CollisionPhase::Enter => self.listener.on_collision_enter(other),
            CollisionPhase::Stay => self.listener.on_collision_stay(other),
            CollisionPhase::Exit => self.listener.on_collision_exit(other),
        }
    }
}
