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
//! Narrow-phase tests
//!
//! Symmetry of circle contacts, box axis selection, and world-scaled
//! shapes detected through a physics world.

use proptest::prelude::*;
use scene_physics::ecs::World;
use scene_physics::math::Vec2;
use scene_physics::physics::{
    box_box, check_collision, circle_box, Collider, PhysicsConfig, PhysicsWorld, WorldShape,
};
use scene_physics::scene::Transform;

proptest! {
    #[test]
    fn circle_contacts_are_symmetric(
        ax in -20.0..20.0f64,
        ay in -20.0..20.0f64,
        bx in -20.0..20.0f64,
        by in -20.0..20.0f64,
        ra in 0.5..15.0f64,
        rb in 0.5..15.0f64,
    ) {
        let a = WorldShape::Circle { center: Vec2::new(ax, ay), radius: ra };
        let b = WorldShape::Circle { center: Vec2::new(bx, by), radius: rb };
        prop_assume!((Vec2::new(bx, by) - Vec2::new(ax, ay)).length() > 1e-9);

        match (check_collision(&a, &b), check_collision(&b, &a)) {
            (Some(ab), Some(ba)) => {
                prop_assert!((ab.depth - ba.depth).abs() < 1e-9);
                prop_assert!(ab.normal.approx_eq(-ba.normal, 1e-9));
                prop_assert!((ab.normal.length() - 1.0).abs() < 1e-9);
                prop_assert!(ab.depth > 0.0);
            }
            (None, None) => {}
            (ab, ba) => prop_assert!(false, "asymmetric result {:?} vs {:?}", ab, ba),
        }
    }

    #[test]
    fn box_circle_normal_points_from_box(
        cx in -30.0..30.0f64,
        cy in -30.0..30.0f64,
        radius in 0.5..10.0f64,
    ) {
        let circle = WorldShape::Circle { center: Vec2::new(cx, cy), radius };
        let aabb = WorldShape::Aabb { center: Vec2::ZERO, half_extents: Vec2::new(10.0, 5.0) };

        if let Some(info) = check_collision(&aabb, &circle) {
            let reverse = check_collision(&circle, &aabb).unwrap();
            prop_assert!(info.normal.approx_eq(-reverse.normal, 1e-12));
            prop_assert_eq!(info.depth, reverse.depth);
            // Pushing the circle along the normal by the depth separates it
            let moved = WorldShape::Circle { center: Vec2::new(cx, cy) + info.normal * (info.depth + 1e-6), radius };
            prop_assert!(check_collision(&aabb, &moved).is_none());
        }
    }
}

#[test]
fn test_coincident_circles_use_fallback_normal() {
    let shape = WorldShape::Circle { center: Vec2::new(3.0, 3.0), radius: 2.0 };
    let info = check_collision(&shape, &shape).unwrap();
    assert_eq!(info.normal, Vec2::new(1.0, 0.0));
    assert_eq!(info.depth, 4.0);
}

#[test]
fn test_touching_is_not_colliding() {
    let a = WorldShape::Circle { center: Vec2::ZERO, radius: 1.0 };
    let b = WorldShape::Circle { center: Vec2::new(2.0, 0.0), radius: 1.0 };
    assert!(check_collision(&a, &b).is_none());

    assert!(box_box(Vec2::ZERO, Vec2::ONE, Vec2::new(2.0, 0.0), Vec2::ONE).is_none());
}

#[test]
fn test_box_box_picks_smaller_overlap() {
    // Overlap x = 1, overlap y = 3
    let info = box_box(Vec2::ZERO, Vec2::new(2.0, 2.0), Vec2::new(3.0, 1.0), Vec2::new(2.0, 2.0)).unwrap();
    assert_eq!(info.normal, Vec2::new(1.0, 0.0));
    assert_eq!(info.depth, 1.0);
    assert_eq!(info.point, Vec2::new(1.0, 1.0));

    // B above A on a y-down canvas: normal points toward -y
    let info = box_box(Vec2::ZERO, Vec2::new(2.0, 2.0), Vec2::new(0.5, -3.5), Vec2::new(2.0, 2.0)).unwrap();
    assert_eq!(info.normal, Vec2::new(0.0, -1.0));
    assert_eq!(info.depth, 0.5);
}

#[test]
fn test_circle_box_outside_and_inside() {
    let info = circle_box(Vec2::new(0.0, -8.0), 5.0, Vec2::ZERO, Vec2::new(10.0, 5.0)).unwrap();
    assert_eq!(info.normal, Vec2::new(0.0, 1.0));
    assert_eq!(info.depth, 2.0);
    assert_eq!(info.point, Vec2::new(0.0, -5.0));

    // Center inside, nearest face is the top (y = -5)
    let info = circle_box(Vec2::new(0.0, -4.0), 2.0, Vec2::ZERO, Vec2::new(10.0, 5.0)).unwrap();
    assert_eq!(info.normal, Vec2::new(0.0, 1.0));
    assert_eq!(info.depth, 2.0);

    // Deeper inside, the depth still does not grow with the face distance
    let info = circle_box(Vec2::new(3.0, 1.0), 2.0, Vec2::ZERO, Vec2::new(10.0, 5.0)).unwrap();
    assert_eq!(info.normal, Vec2::new(0.0, -1.0));
    assert_eq!(info.depth, 2.0);
    assert_eq!(info.point, Vec2::new(3.0, 5.0));
}

#[test]
fn test_world_scale_grows_shapes() {
    let mut world = World::new();
    let mut physics = PhysicsWorld::with_config(PhysicsConfig::default().with_gravity(Vec2::ZERO));

    let big = world.create_entity_with(
        Transform::from_position(Vec2::ZERO).with_scale(Vec2::new(3.0, 1.0)),
    );
    let small = world.create_entity_with(Transform::from_position(Vec2::new(5.0, 0.0)));
    physics.add_collider(big, Collider::circle(2.0)).unwrap();
    physics.add_collider(small, Collider::circle(1.0)).unwrap();

    // Radius scales by the larger axis: 6 + 1 > 5
    let stats = physics.update(&mut world, 0.0);
    assert_eq!(stats.contacts, 1);
    let pair = physics.contacts()[0];
    assert_eq!((pair.a, pair.b), (big, small));
    assert!((pair.info.depth - 2.0).abs() < 1e-12);
}

#[test]
fn test_child_collider_follows_parent() {
    let mut world = World::new();
    let mut physics = PhysicsWorld::with_config(PhysicsConfig::default().with_gravity(Vec2::ZERO));

    let wall = world.create_entity_with(Transform::from_position(Vec2::new(50.0, 0.0)));
    physics.add_collider(wall, Collider::rect(10.0, 100.0)).unwrap();

    let ship = world.create_entity();
    let shield = world.create_entity();
    world.set_parent(shield, Some(ship)).unwrap();
    let shield_id = world.transform(shield).unwrap();
    world
        .scene_mut()
        .set_local(shield_id, Transform::from_position(Vec2::new(10.0, 0.0)))
        .unwrap();
    physics.add_collider(shield, Collider::circle(5.0)).unwrap();

    assert_eq!(physics.update(&mut world, 0.0).contacts, 0);

    let ship_id = world.transform(ship).unwrap();
    world.scene_mut().set_position(ship_id, Vec2::new(32.0, 0.0)).unwrap();
    assert_eq!(physics.update(&mut world, 0.0).contacts, 1);
}
