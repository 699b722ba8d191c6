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
//! Collision response
//!
//! Resolution corrects world positions and velocities for one contact.
//! Positions are passed in and out as world-space values; the physics world
//! writes them back through the scene graph afterwards.
//!
//! Kinematic bodies and bodies without a rigidbody are obstacles: they push
//! but are never pushed, so their position and velocity are never written.

use crate::math::Vec2;
use crate::physics::contact::CollisionInfo;
use crate::physics::rigidbody::Rigidbody;

/// What a call to [`resolve_pair`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing could move (no dynamic body in the pair)
    Skipped,
    /// Only the first body moved
    MovedA,
    /// Only the second body moved
    MovedB,
    /// Both bodies moved
    MovedBoth,
}

/// One side of a contact
pub struct ContactBody<'a> {
    /// The side's rigidbody, `None` for static colliders
    pub body: Option<&'a mut Rigidbody>,
    /// The side's world position, updated in place
    pub position: &'a mut Vec2,
}

impl ContactBody<'_> {
    fn is_dynamic(&self) -> bool {
        self.body.as_ref().map(|b| !b.is_kinematic).unwrap_or(false)
    }
}

/// Resolve one contact between `a` and `b`
///
/// `info.normal` must point from `a` to `b`.
pub fn resolve_pair(a: ContactBody<'_>, b: ContactBody<'_>, info: &CollisionInfo) -> Resolution {
    match (a.is_dynamic(), b.is_dynamic()) {
        (false, false) => Resolution::Skipped,
        (true, false) => {
            if let Some(body) = a.body {
                resolve_one_way(body, a.position, -info.normal, info.depth);
            }
            Resolution::MovedA
        }
        (false, true) => {
            if let Some(body) = b.body {
                resolve_one_way(body, b.position, info.normal, info.depth);
            }
            Resolution::MovedB
        }
        (true, true) => match (a.body, b.body) {
            (Some(body_a), Some(body_b)) => {
                resolve_two_way(body_a, a.position, body_b, b.position, info);
                Resolution::MovedBoth
            }
            _ => Resolution::Skipped,
        },
    }
}

/// Push a dynamic body away from an immovable obstacle
///
/// `normal` points from the obstacle toward the body. The body moves the
/// full `depth` along it, and if it is moving into the obstacle its
/// velocity is reflected with the body's bounciness.
pub fn resolve_one_way(body: &mut Rigidbody, position: &mut Vec2, normal: Vec2, depth: f64) {
    *position += normal * depth;

    let approach = body.velocity.dot(normal);
    if approach < 0.0 {
        body.velocity -= normal * ((1.0 + body.bounciness) * approach);
    }
}

/// Separate two dynamic bodies and exchange an impulse
///
/// The position correction is split so the lighter body moves further.
/// If the bodies are already separating along the normal, velocities are
/// left alone.
pub fn resolve_two_way(
    a: &mut Rigidbody,
    position_a: &mut Vec2,
    b: &mut Rigidbody,
    position_b: &mut Vec2,
    info: &CollisionInfo,
) {
    let total_mass = a.mass + b.mass;
    let ratio_a = b.mass / total_mass;
    let ratio_b = a.mass / total_mass;
    let normal = info.normal;

    *position_a -= normal * (info.depth * ratio_a);
    *position_b += normal * (info.depth * ratio_b);

    let relative = b.velocity - a.velocity;
    let approach = relative.dot(normal);
    if approach > 0.0 {
        return;
    }

    let bounciness = (a.bounciness + b.bounciness) / 2.0;
    let impulse = -(1.0 + bounciness) * approach;
    a.velocity -= normal * (impulse * ratio_a);
    b.velocity += normal * (impulse * ratio_b);
}
