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
//! # Scene Physics
//!
//! Scene graph transforms and arcade-style 2D physics for small canvas
//! games.
//!
//! ## Features
//!
//! - **Transform Hierarchy**: Parent/child transforms with world-pose
//!   preserving reparenting
//! - **Colliders**: Circles and axis-aligned boxes with layer filtering
//!   and triggers
//! - **Rigidbodies**: Gravity, drag, speed caps, bounciness and kinematic
//!   bodies
//! - **Collision Events**: Enter, stay and exit notifications delivered to
//!   per-entity listeners
//! - **Parallelization**: Optional Rayon-backed narrow phase
//!
//! ## Example
//!
//! ```rust
//! use scene_physics::ecs::World;
//! use scene_physics::math::Vec2;
//! use scene_physics::physics::{Collider, PhysicsWorld, Rigidbody};
//! use scene_physics::scene::Transform;
//!
//! let mut world = World::new();
//! let mut physics = PhysicsWorld::new();
//!
//! let ground = world.create_entity_with(Transform::from_position(Vec2::new(0.0, 100.0)));
//! physics.add_collider(ground, Collider::rect(200.0, 20.0))?;
//! physics.add_rigidbody(ground, Rigidbody::kinematic())?;
//!
//! let ball = world.create_entity_with(Transform::from_position(Vec2::new(0.0, 50.0)));
//! physics.add_collider(ball, Collider::circle(5.0))?;
//! physics.add_rigidbody(ball, Rigidbody::dynamic(1.0).with_bounciness(0.5))?;
//!
//! for _ in 0..300 {
//!     physics.update(&mut world, 1.0 / 60.0);
//! }
//!
//! let y = world.scene().world_position(world.transform(ball)?)?.y;
//! assert!(y <= 85.0 + 1e-6);
//! # Ok::<(), scene_physics::PhysicsError>(())
//! ```

#![warn(missing_docs)]

/// Entities, component storage, listeners and systems
pub mod ecs;

/// Error types
pub mod error;

/// Motion integration and fixed timestep driving
pub mod integration;

/// 2D vector math
pub mod math;

/// Collision detection, response and events
pub mod physics;

/// Transform hierarchy
pub mod scene;

pub use ecs::{Entity, World};
pub use error::{PhysicsError, Result};
pub use math::Vec2;
pub use physics::PhysicsWorld;
