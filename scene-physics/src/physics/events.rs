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
//! Collision events
//!
//! The [`ContactTracker`] remembers which pairs touched on the previous
//! step. Diffing the current step's pairs against that set classifies each
//! pair as entered, staying, or exited. Pair identity is unordered, so a
//! pair reported as `(a, b)` one step and `(b, a)` the next is the same
//! contact.
//!
//! Events are ordered deterministically: enter and stay events follow the
//! order of the current step's pairs, then exit events follow the order of
//! the previous step's pairs.

use crate::ecs::{CollisionPhase, Entity, World};
use crate::physics::contact::{CollisionInfo, CollisionPair, PairKey};
use std::collections::HashSet;

/// One contact transition for a pair of entities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Which transition this is
    pub phase: CollisionPhase,
    /// First entity of the pair
    pub a: Entity,
    /// Second entity of the pair
    pub b: Entity,
    /// Contact geometry; for exits this is the last contact seen
    pub info: CollisionInfo,
}

/// Frame-over-frame pair diffing
#[derive(Debug, Default)]
pub struct ContactTracker {
    previous: Vec<CollisionPair>,
    previous_keys: HashSet<PairKey>,
}

impl ContactTracker {
    /// Create a tracker with no remembered contacts
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `current` against the previous step and remember it
    pub fn diff(&mut self, current: &[CollisionPair]) -> Vec<CollisionEvent> {
        let current_keys: HashSet<PairKey> = current.iter().map(CollisionPair::key).collect();
        let mut events = Vec::with_capacity(current.len() + self.previous.len());

        for pair in current {
            let phase = if self.previous_keys.contains(&pair.key()) {
                CollisionPhase::Stay
            } else {
                CollisionPhase::Enter
            };
            events.push(CollisionEvent {
                phase,
                a: pair.a,
                b: pair.b,
                info: pair.info,
            });
        }

        for pair in &self.previous {
            if !current_keys.contains(&pair.key()) {
                events.push(CollisionEvent {
                    phase: CollisionPhase::Exit,
                    a: pair.a,
                    b: pair.b,
                    info: pair.info,
                });
            }
        }

        self.previous = current.to_vec();
        self.previous_keys = current_keys;
        events
    }

    /// Whether the pair was touching on the last diffed step
    pub fn is_touching(&self, a: Entity, b: Entity) -> bool {
        self.previous_keys.contains(&PairKey::new(a, b))
    }

    /// Pairs touching on the last diffed step
    pub fn contacts(&self) -> &[CollisionPair] {
        &self.previous
    }

    /// Forget every remembered contact without emitting exits
    pub fn clear(&mut self) {
        self.previous.clear();
        self.previous_keys.clear();
    }
}

/// Deliver events to the listeners of both entities in each pair
///
/// Each entity's listeners receive the other entity. Returns the total
/// number of listener invocations.
pub fn dispatch(world: &mut World, events: &[CollisionEvent]) -> usize {
    let mut invoked = 0;
    for event in events {
        invoked += world.notify(event.a, event.phase, event.b);
        invoked += world.notify(event.b, event.phase, event.a);
    }
    invoked
}
