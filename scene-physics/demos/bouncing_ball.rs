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
//! Bouncing Ball Example
//!
//! A ball falls onto a platform, bounces, and rolls through a coin trigger
//! carried by a moving parent. It showcases:
//!
//! - Kinematic platforms and dynamic bodies
//! - Trigger colliders and collision listeners
//! - Parent/child transforms
//! - Driving the world from variable frame times with `FixedTimestep`
//!
//! # Running
//!
//! ```bash
//! cargo run --example bouncing_ball
//! ```

use scene_physics::ecs::{CollisionListener, Entity, World};
use scene_physics::integration::FixedTimestep;
use scene_physics::math::Vec2;
use scene_physics::physics::{Collider, PhysicsWorld, Rigidbody};
use scene_physics::scene::Transform;

struct Announcer {
    name: &'static str,
}

impl CollisionListener for Announcer {
    fn on_collision_enter(&mut self, other: Entity) {
        println!("  {} touched {}", self.name, other);
    }

    fn on_collision_exit(&mut self, other: Entity) {
        println!("  {} left {}", self.name, other);
    }

    fn name(&self) -> &str {
        self.name
    }
}

fn main() -> scene_physics::Result<()> {
    let mut world = World::new();
    let mut physics = PhysicsWorld::new();

    let platform = world.create_entity_with(Transform::from_position(Vec2::new(0.0, 100.0)));
    physics.add_collider(platform, Collider::rect(400.0, 20.0))?;
    physics.add_rigidbody(platform, Rigidbody::kinematic())?;

    let ball = world.create_entity_with(Transform::from_position(Vec2::new(-40.0, 0.0)));
    physics.add_collider(ball, Collider::circle(5.0))?;
    physics.add_rigidbody(
        ball,
        Rigidbody::dynamic(1.0)
            .with_bounciness(0.6)
            .with_velocity(Vec2::new(12.0, 0.0)),
    )?;
    world.add_listener(ball, Box::new(Announcer { name: "ball" }))?;

    // The coin rides on a carrier that drifts left
    let carrier = world.create_entity_with(Transform::from_position(Vec2::new(40.0, 80.0)));
    physics.add_rigidbody(
        carrier,
        Rigidbody::kinematic().with_velocity(Vec2::new(-4.0, 0.0)),
    )?;
    let coin = world.create_entity();
    world.set_parent(coin, Some(carrier))?;
    let coin_id = world.transform(coin)?;
    world
        .scene_mut()
        .set_local(coin_id, Transform::from_position(Vec2::new(0.0, 0.0)))?;
    physics.add_collider(coin, Collider::circle(4.0).as_trigger())?;
    world.add_listener(coin, Box::new(Announcer { name: "coin" }))?;

    println!("=== Bouncing Ball ===");
    println!("Gravity: {:?}", physics.gravity());

    let mut clock = FixedTimestep::new(1.0 / 120.0);
    let frame_times = [1.0 / 60.0, 1.0 / 30.0, 1.0 / 90.0];
    let mut elapsed = 0.0;
    let mut frame = 0;

    while elapsed < 8.0 {
        let frame_dt = frame_times[frame % frame_times.len()];
        for _ in 0..clock.advance(frame_dt) {
            physics.update(&mut world, clock.step());
        }
        elapsed += frame_dt;
        frame += 1;

        if frame % 60 == 0 {
            let ball_position = world.scene().world_position(world.transform(ball)?)?;
            println!(
                "t = {:>5.2}s  ball = ({:>7.2}, {:>6.2})  contacts = {}",
                elapsed,
                ball_position.x,
                ball_position.y,
                physics.contacts().len()
            );
        }
    }

    Ok(())
}
