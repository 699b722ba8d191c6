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
//! Transform values and handles
//!
//! A [`Transform`] is a local pose relative to its parent. A [`Pose`] is the
//! same triple resolved against the root frame. Both apply
//! scale → rotate → translate, in that order.

use crate::error::{PhysicsError, Result};
use crate::math::Vec2;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Generational handle to a node in a [`SceneGraph`](crate::scene::SceneGraph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransformId {
    index: u32,
    generation: u32,
}

impl TransformId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        TransformId { index, generation }
    }

    /// Slot index inside the arena
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for TransformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transform({}, gen: {})", self.index, self.generation)
    }
}

/// Local pose of a node relative to its parent
///
/// Rotation is in radians and is never normalized; callers that need a
/// wrapped angle must wrap it themselves.
///
/// # Examples
///
/// ```
/// use scene_physics::math::Vec2;
/// use scene_physics::scene::Transform;
///
/// let t = Transform::from_position(Vec2::new(10.0, 5.0)).with_scale(Vec2::new(2.0, 2.0));
/// assert_eq!(t.position, Vec2::new(10.0, 5.0));
/// assert!(t.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform {
    /// Position relative to the parent
    pub position: Vec2,
    /// Rotation relative to the parent, radians
    pub rotation: f64,
    /// Scale relative to the parent
    pub scale: Vec2,
}

impl Transform {
    /// Identity transform: origin, no rotation, unit scale
    pub const IDENTITY: Transform = Transform {
        position: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
    };

    /// Create a transform from its parts
    pub fn new(position: Vec2, rotation: f64, scale: Vec2) -> Self {
        Transform { position, rotation, scale }
    }

    /// Create a transform at `position` with no rotation and unit scale
    pub fn from_position(position: Vec2) -> Self {
        Transform { position, ..Self::IDENTITY }
    }

    /// Replace the rotation
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Check that every field is finite
    pub fn is_valid(&self) -> bool {
        self.position.is_valid() && self.rotation.is_finite() && self.scale.is_valid()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A pose resolved against the root frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World position
    pub position: Vec2,
    /// World rotation, radians
    pub rotation: f64,
    /// World scale
    pub scale: Vec2,
}

impl Pose {
    /// The root frame
    pub const IDENTITY: Pose = Pose {
        position: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
    };

    /// Compose a child's local transform onto this pose
    ///
    /// Rotations add and scales multiply component-wise, so no shear is
    /// ever introduced.
    pub fn compose(&self, local: &Transform) -> Pose {
        Pose {
            position: self.transform_point(local.position),
            rotation: self.rotation + local.rotation,
            scale: self.scale.mul_elem(local.scale),
        }
    }

    /// Map a point from this pose's local space into the root frame
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.position + point.mul_elem(self.scale).rotate(self.rotation)
    }

    /// Map a point from the root frame into this pose's local space
    ///
    /// Fails with [`PhysicsError::DegenerateScale`] if either scale component
    /// is (near) zero.
    pub fn inverse_transform_point(&self, point: Vec2) -> Result<Vec2> {
        (point - self.position)
            .rotate(-self.rotation)
            .checked_div_elem(self.scale)
            .ok_or(PhysicsError::DegenerateScale {
                x: self.scale.x,
                y: self.scale.y,
            })
    }

    /// Solve for the local transform that reproduces `world` under this pose
    pub fn solve_local(&self, world: &Pose) -> Result<Transform> {
        let position = self.inverse_transform_point(world.position)?;
        let scale = world
            .scale
            .checked_div_elem(self.scale)
            .ok_or(PhysicsError::DegenerateScale {
                x: self.scale.x,
                y: self.scale.y,
            })?;
        Ok(Transform {
            position,
            rotation: world.rotation - self.rotation,
            scale,
        })
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Transform> for Pose {
    fn from(t: Transform) -> Self {
        Pose {
            position: t.position,
            rotation: t.rotation,
            scale: t.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_default() {
        assert_eq!(Transform::default(), Transform::IDENTITY);
        assert_eq!(Transform::IDENTITY.scale, Vec2::ONE);
    }

    #[test]
    fn test_compose_scale_rotate_translate() {
        let parent = Pose {
            position: Vec2::new(10.0, 0.0),
            rotation: FRAC_PI_2,
            scale: Vec2::new(2.0, 2.0),
        };
        let child = parent.compose(&Transform::from_position(Vec2::new(1.0, 0.0)));
        // (1,0) scaled to (2,0), rotated to (0,2), translated to (10,2)
        assert!(child.position.approx_eq(Vec2::new(10.0, 2.0), 1e-12));
        assert_eq!(child.rotation, FRAC_PI_2);
        assert_eq!(child.scale, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_inverse_rejects_zero_scale() {
        let pose = Pose {
            scale: Vec2::new(0.0, 1.0),
            ..Pose::IDENTITY
        };
        assert_eq!(
            pose.inverse_transform_point(Vec2::ONE),
            Err(PhysicsError::DegenerateScale { x: 0.0, y: 1.0 })
        );
    }

    #[test]
    fn test_solve_local_reproduces_world() {
        let parent = Pose {
            position: Vec2::new(3.0, -4.0),
            rotation: 0.7,
            scale: Vec2::new(1.5, 0.5),
        };
        let world = Pose {
            position: Vec2::new(-2.0, 8.0),
            rotation: -1.1,
            scale: Vec2::new(3.0, 2.0),
        };
        let local = parent.solve_local(&world).unwrap();
        let back = parent.compose(&local);
        assert!(back.position.approx_eq(world.position, 1e-9));
        assert!((back.rotation - world.rotation).abs() < 1e-12);
        assert!(back.scale.approx_eq(world.scale, 1e-12));
    }
}
