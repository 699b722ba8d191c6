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
//! Collider shapes
//!
//! A collider describes the shape an entity occupies. Its world extent is
//! derived every step from the owning entity's world position and world
//! scale.
//!
//! # Known limitation
//!
//! Box colliders are always axis-aligned. World rotation is ignored when a
//! box is placed in the world, so a rotated platform still collides as its
//! unrotated bounds.

use crate::ecs::Component;
use crate::error::{PhysicsError, Result};
use crate::math::Vec2;
use crate::scene::Pose;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Local shape of a collider, before scaling
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shape {
    /// Circle centered on the transform origin
    Circle {
        /// Radius in local units
        radius: f64,
    },
    /// Axis-aligned box centered on the transform origin
    Box {
        /// Full width in local units
        width: f64,
        /// Full height in local units
        height: f64,
    },
}

impl Shape {
    /// Check that every dimension is finite and non-negative
    pub fn validate(&self) -> Result<()> {
        let check = |what: &'static str, value: f64| {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(PhysicsError::InvalidDimension { what, value })
            }
        };
        match *self {
            Shape::Circle { radius } => check("radius", radius),
            Shape::Box { width, height } => {
                check("width", width)?;
                check("height", height)
            }
        }
    }

    /// Check if the shape is valid
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Place the shape in the world under `pose`
    ///
    /// Circles scale their radius by the larger world scale component.
    /// Boxes scale each half extent by the matching component. Rotation is
    /// not applied to either.
    pub fn to_world(&self, pose: &Pose) -> WorldShape {
        let scale = pose.scale.abs();
        match *self {
            Shape::Circle { radius } => WorldShape::Circle {
                center: pose.position,
                radius: radius * scale.max_element(),
            },
            Shape::Box { width, height } => WorldShape::Aabb {
                center: pose.position,
                half_extents: Vec2::new(width, height).mul_elem(scale) / 2.0,
            },
        }
    }
}

/// A shape resolved into world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldShape {
    /// World-space circle
    Circle {
        /// World center
        center: Vec2,
        /// Scaled radius
        radius: f64,
    },
    /// World-space axis-aligned box
    Aabb {
        /// World center
        center: Vec2,
        /// Scaled half width and half height
        half_extents: Vec2,
    },
}

impl WorldShape {
    /// World center of the shape
    pub fn center(&self) -> Vec2 {
        match *self {
            WorldShape::Circle { center, .. } | WorldShape::Aabb { center, .. } => center,
        }
    }

    /// Whether a world point lies inside (or on the boundary of) the shape
    pub fn contains_point(&self, point: Vec2) -> bool {
        match *self {
            WorldShape::Circle { center, radius } => (point - center).length_squared() <= radius * radius,
            WorldShape::Aabb { center, half_extents } => {
                let d = (point - center).abs();
                d.x <= half_extents.x && d.y <= half_extents.y
            }
        }
    }
}

/// Collision shape attached to an entity
///
/// # Examples
///
/// ```
/// use scene_physics::physics::Collider;
///
/// let platform = Collider::rect(100.0, 10.0).with_layer(2);
/// assert_eq!(platform.layer, 2);
/// assert!(platform.validate().is_ok());
///
/// assert!(Collider::circle(-1.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Collider {
    /// Local shape
    pub shape: Shape,
    /// Layer tag consulted by the world's layer filter
    pub layer: u32,
    /// Inactive colliders are skipped by detection
    pub active: bool,
    /// Triggers report contacts but are never pushed apart
    pub is_trigger: bool,
}

impl Collider {
    /// Create an active, solid collider on layer 0
    pub fn new(shape: Shape) -> Self {
        Collider {
            shape,
            layer: 0,
            active: true,
            is_trigger: false,
        }
    }

    /// Circle collider
    pub fn circle(radius: f64) -> Self {
        Self::new(Shape::Circle { radius })
    }

    /// Axis-aligned box collider
    pub fn rect(width: f64, height: f64) -> Self {
        Self::new(Shape::Box { width, height })
    }

    /// Set the layer tag
    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layer = layer;
        self
    }

    /// Mark the collider as a trigger
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Check the shape's dimensions
    pub fn validate(&self) -> Result<()> {
        self.shape.validate()
    }
}

impl Component for Collider {}
