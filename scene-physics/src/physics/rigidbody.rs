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
//! Rigidbody dynamics state
//!
//! Rigidbodies are plain data. The physics world validates them when they
//! are registered and again after every in-place modification, so the
//! simulation never sees a zero mass or a negative drag.

use crate::ecs::Component;
use crate::error::{PhysicsError, Result};
use crate::math::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dynamics state of one entity
///
/// A kinematic body behaves as if it had infinite mass: collision response
/// never moves it or changes its velocity, but it still collides and pushes
/// dynamic bodies out of the way.
///
/// # Examples
///
/// ```
/// use scene_physics::math::Vec2;
/// use scene_physics::physics::Rigidbody;
///
/// let ball = Rigidbody::dynamic(2.0).with_bounciness(0.5);
/// assert!(ball.validate().is_ok());
/// assert_eq!(ball.inverse_mass(), 0.5);
///
/// let platform = Rigidbody::kinematic().with_velocity(Vec2::new(30.0, 0.0));
/// assert_eq!(platform.inverse_mass(), 0.0);
/// assert!(!platform.use_gravity);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rigidbody {
    /// Linear velocity, units per second
    pub velocity: Vec2,
    /// Mass, must be positive and finite
    pub mass: f64,
    /// Velocity damping per second, in `[0, 1)`
    pub drag: f64,
    /// Whether world gravity accelerates this body
    pub use_gravity: bool,
    /// Whether collision response leaves this body alone
    pub is_kinematic: bool,
    /// Restitution in `[0, 1]`
    pub bounciness: f64,
    /// Speed cap, 0 disables the cap
    pub max_speed: f64,
}

impl Rigidbody {
    /// A dynamic body of the given mass affected by gravity
    pub fn dynamic(mass: f64) -> Self {
        Rigidbody { mass, ..Self::default() }
    }

    /// A kinematic body that ignores gravity
    pub fn kinematic() -> Self {
        Rigidbody {
            is_kinematic: true,
            use_gravity: false,
            ..Self::default()
        }
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the drag coefficient
    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag;
        self
    }

    /// Set the restitution
    pub fn with_bounciness(mut self, bounciness: f64) -> Self {
        self.bounciness = bounciness;
        self
    }

    /// Set the speed cap
    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Enable or disable gravity
    pub fn with_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<()> {
        if !(self.mass > 0.0 && self.mass.is_finite()) {
            return Err(PhysicsError::InvalidMass(self.mass));
        }
        if !(0.0..1.0).contains(&self.drag) {
            return Err(PhysicsError::InvalidCoefficient { what: "drag", value: self.drag });
        }
        if !(0.0..=1.0).contains(&self.bounciness) {
            return Err(PhysicsError::InvalidCoefficient {
                what: "bounciness",
                value: self.bounciness,
            });
        }
        if !(self.max_speed >= 0.0 && self.max_speed.is_finite()) {
            return Err(PhysicsError::InvalidCoefficient {
                what: "max_speed",
                value: self.max_speed,
            });
        }
        if !self.velocity.is_valid() {
            return Err(PhysicsError::InvalidCoefficient {
                what: "velocity",
                value: if self.velocity.x.is_finite() { self.velocity.y } else { self.velocity.x },
            });
        }
        Ok(())
    }

    /// Check if the body is valid
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get the inverse mass (1/m), 0 for kinematic bodies
    pub fn inverse_mass(&self) -> f64 {
        if self.is_kinematic {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Change velocity by `impulse / mass`; kinematic bodies ignore impulses
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * self.inverse_mass();
    }

    /// Apply a force for `dt` seconds; kinematic bodies ignore forces
    pub fn add_force(&mut self, force: Vec2, dt: f64) {
        self.velocity += force * (self.inverse_mass() * dt);
    }

    /// Current speed
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }
}

impl Component for Rigidbody {}

impl Default for Rigidbody {
    fn default() -> Self {
        Rigidbody {
            velocity: Vec2::ZERO,
            mass: 1.0,
            drag: 0.0,
            use_gravity: true,
            is_kinematic: false,
            bounciness: 0.0,
            max_speed: 0.0,
        }
    }
}
