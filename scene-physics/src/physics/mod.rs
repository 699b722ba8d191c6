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
//! 2D collision detection and response
//!
//! Colliders and rigidbodies are registered with a [`PhysicsWorld`] against
//! entities of an ECS [`World`](crate::ecs::World). Each call to
//! [`PhysicsWorld::update`] integrates, detects, resolves and then reports
//! contact transitions to the entities' collision listeners.
//!
//! Coordinates are y-down canvas pixels, so the default gravity is `+y`.

pub mod collider;
pub mod config;
pub mod contact;
pub mod events;
pub mod filter;
pub mod narrowphase;
pub mod resolve;
pub mod rigidbody;
pub mod world;

pub use crate::ecs::CollisionPhase;
pub use collider::{Collider, Shape, WorldShape};
pub use config::{PhysicsConfig, DEFAULT_GRAVITY};
pub use contact::{CollisionInfo, CollisionPair, PairKey};
pub use events::{dispatch, CollisionEvent, ContactTracker};
pub use filter::{AllLayers, LayerFilter, LayerMatrix};
pub use narrowphase::{box_box, box_circle, check_collision, circle_box, circle_circle};
pub use resolve::{resolve_one_way, resolve_pair, resolve_two_way, ContactBody, Resolution};
pub use rigidbody::Rigidbody;
pub use world::{PhysicsWorld, StepStats};
