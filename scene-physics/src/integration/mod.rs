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
//! Motion integration
//!
//! Rigidbodies advance with semi-implicit Euler: velocity is updated first
//! (gravity, then drag, then the speed cap) and the new velocity moves the
//! position.
//!
//! # Drag
//!
//! Drag scales velocity by `1 - drag * dt` each step. This is a cheap
//! approximation of exponential decay, not exact damping, and results
//! depend on the timestep. The factor is floored at zero so a large `dt`
//! stops the body instead of reversing it. This only departs from the plain
//! `1 - drag * dt` when `drag * dt > 1`, which with `drag < 1` needs a
//! step longer than one second.
//!
//! # Timestep Guidelines
//!
//! - Variable `dt` works but makes bounces frame-rate dependent
//! - For reproducible replays, drive the world with [`FixedTimestep`]
//! - Fast, small bodies can pass through thin colliders (no continuous
//!   collision detection); keep `speed * dt` below the thinnest collider

use crate::math::Vec2;
use crate::physics::Rigidbody;

mod fixed_step;

pub use fixed_step::FixedTimestep;

/// Advance one body by `dt` seconds
///
/// `position` is the body's local position. Bodies parented to a moving
/// transform inherit that motion through the hierarchy on top of this.
///
/// # Examples
///
/// ```
/// use scene_physics::integration::integrate_body;
/// use scene_physics::math::Vec2;
/// use scene_physics::physics::Rigidbody;
///
/// let mut body = Rigidbody::dynamic(1.0);
/// let mut position = Vec2::ZERO;
/// integrate_body(&mut body, &mut position, Vec2::new(0.0, 10.0), 0.5);
/// assert_eq!(body.velocity, Vec2::new(0.0, 5.0));
/// assert_eq!(position, Vec2::new(0.0, 2.5));
/// ```
pub fn integrate_body(body: &mut Rigidbody, position: &mut Vec2, gravity: Vec2, dt: f64) {
    if body.use_gravity {
        body.velocity += gravity * dt;
    }

    body.velocity *= (1.0 - body.drag * dt).max(0.0);

    if body.max_speed > 0.0 {
        let speed = body.velocity.length();
        if speed > body.max_speed {
            body.velocity *= body.max_speed / speed;
        }
    }

    *position += body.velocity * dt;
}

/// Calculate kinetic energy for a single body
///
/// KE = 0.5 * m * v². Kinematic bodies have no meaningful mass and report 0.
pub fn kinetic_energy(body: &Rigidbody) -> f64 {
    if body.is_kinematic {
        return 0.0;
    }
    0.5 * body.mass * body.velocity.length_squared()
}

/// Calculate total kinetic energy for multiple bodies
pub fn total_kinetic_energy<'a, I>(bodies: I) -> f64
where
    I: IntoIterator<Item = &'a Rigidbody>,
{
    bodies.into_iter().map(kinetic_energy).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_gravity_only_when_enabled() {
        let mut body = Rigidbody::dynamic(1.0).with_gravity(false);
        let mut position = Vec2::ZERO;
        integrate_body(&mut body, &mut position, Vec2::new(0.0, 9.8), 1.0);
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(position, Vec2::ZERO);
    }

    #[test]
    fn test_drag_formula() {
        let mut body = Rigidbody::dynamic(1.0)
            .with_gravity(false)
            .with_drag(0.5)
            .with_velocity(Vec2::new(10.0, 0.0));
        let mut position = Vec2::ZERO;
        integrate_body(&mut body, &mut position, Vec2::ZERO, 0.1);
        // 10 * (1 - 0.5 * 0.1) = 9.5
        assert!((body.velocity.x - 9.5).abs() < EPS);
        assert!((position.x - 0.95).abs() < EPS);
    }

    #[test]
    fn test_drag_floor_with_huge_timestep() {
        let mut body = Rigidbody::dynamic(1.0)
            .with_gravity(false)
            .with_drag(0.9)
            .with_velocity(Vec2::new(10.0, 0.0));
        let mut position = Vec2::ZERO;
        integrate_body(&mut body, &mut position, Vec2::ZERO, 5.0);
        assert_eq!(body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_max_speed_clamp_keeps_direction() {
        let mut body = Rigidbody::dynamic(1.0)
            .with_gravity(false)
            .with_max_speed(5.0)
            .with_velocity(Vec2::new(30.0, 40.0));
        let mut position = Vec2::ZERO;
        integrate_body(&mut body, &mut position, Vec2::ZERO, 1.0);
        assert!(body.velocity.approx_eq(Vec2::new(3.0, 4.0), EPS));
        assert!(position.approx_eq(Vec2::new(3.0, 4.0), EPS));
    }

    #[test]
    fn test_kinetic_energy() {
        let body = Rigidbody::dynamic(2.0).with_velocity(Vec2::new(3.0, 4.0));
        assert_eq!(kinetic_energy(&body), 25.0);
        let kinematic = Rigidbody::kinematic().with_velocity(Vec2::new(3.0, 4.0));
        assert_eq!(kinetic_energy(&kinematic), 0.0);
        assert_eq!(total_kinetic_energy([&body, &kinematic, &body]), 50.0);
    }
}
