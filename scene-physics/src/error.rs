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
//! Error types
//!
//! Configuration mistakes (bad mass, negative radius) and degenerate
//! transforms are reported here instead of leaking NaN into the simulation.

use crate::ecs::Entity;
use crate::scene::TransformId;
use thiserror::Error;

/// Errors produced by the scene graph and physics registries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Rigidbody mass was zero, negative, or not finite
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f64),

    /// A shape dimension (radius, width, height) was negative or not finite
    #[error("{what} must be non-negative and finite, got {value}")]
    InvalidDimension {
        /// Which dimension was rejected
        what: &'static str,
        /// The rejected value
        value: f64,
    },

    /// A rigidbody coefficient (drag, bounciness, max speed) was out of range
    #[error("{what} out of range, got {value}")]
    InvalidCoefficient {
        /// Which coefficient was rejected
        what: &'static str,
        /// The rejected value
        value: f64,
    },

    /// An inverse transform hit a zero scale component
    #[error("cannot invert transform with degenerate scale ({x}, {y})")]
    DegenerateScale {
        /// X component of the offending world scale
        x: f64,
        /// Y component of the offending world scale
        y: f64,
    },

    /// The entity is not alive in the world
    #[error("unknown or destroyed entity {0}")]
    UnknownEntity(Entity),

    /// The transform handle is stale or was never allocated
    #[error("unknown or destroyed transform {0}")]
    UnknownTransform(TransformId),

    /// Reparenting would make a node its own ancestor
    #[error("reparenting {child} under {parent} would create a cycle")]
    HierarchyCycle {
        /// The node being moved
        child: TransformId,
        /// The requested parent
        parent: TransformId,
    },
}

/// Result alias for fallible scene and physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PhysicsError::InvalidMass(-1.0);
        assert_eq!(err.to_string(), "mass must be positive and finite, got -1");

        let err = PhysicsError::InvalidDimension { what: "radius", value: -2.5 };
        assert!(err.to_string().contains("radius"));

        let err = PhysicsError::DegenerateScale { x: 0.0, y: 1.0 };
        assert!(err.to_string().contains("degenerate scale"));
    }
}
