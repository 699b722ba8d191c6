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
//! Transform hierarchy tests
//!
//! Round-trips through nested chains and world-pose preservation when
//! reparenting.

use proptest::prelude::*;
use scene_physics::ecs::World;
use scene_physics::math::Vec2;
use scene_physics::scene::{SceneGraph, Transform, TransformId};
use scene_physics::PhysicsError;
use std::f64::consts::PI;

const TOLERANCE: f64 = 1e-6;

fn transform_strategy() -> impl Strategy<Value = Transform> {
    (
        -100.0..100.0f64,
        -100.0..100.0f64,
        -PI..PI,
        0.25..4.0f64,
        0.25..4.0f64,
        any::<bool>(),
    )
        .prop_map(|(x, y, rotation, sx, sy, mirror)| {
            let sx = if mirror { -sx } else { sx };
            Transform::new(Vec2::new(x, y), rotation, Vec2::new(sx, sy))
        })
}

fn build_chain(graph: &mut SceneGraph, locals: &[Transform]) -> Vec<TransformId> {
    let mut ids: Vec<TransformId> = Vec::new();
    for local in locals {
        let id = graph.create(*local);
        if let Some(parent) = ids.last() {
            // Attach without moving the parent-relative pose
            graph.set_parent(id, Some(*parent)).unwrap();
            graph.set_local(id, *local).unwrap();
        }
        ids.push(id);
    }
    ids
}

proptest! {
    #[test]
    fn local_world_round_trip(
        locals in prop::collection::vec(transform_strategy(), 1..5),
        px in -50.0..50.0f64,
        py in -50.0..50.0f64,
    ) {
        let mut graph = SceneGraph::new();
        let ids = build_chain(&mut graph, &locals);
        let leaf = *ids.last().unwrap();
        let point = Vec2::new(px, py);

        let world = graph.local_to_world(leaf, point).unwrap();
        let back = graph.world_to_local(leaf, world).unwrap();
        let scale = 1.0 + point.length().max(world.length());
        prop_assert!(back.approx_eq(point, TOLERANCE * scale), "{:?} != {:?}", back, point);
    }

    #[test]
    fn reparent_preserves_world_pose(
        locals in prop::collection::vec(transform_strategy(), 2..5),
        new_parent_local in transform_strategy(),
    ) {
        let mut graph = SceneGraph::new();
        let ids = build_chain(&mut graph, &locals);
        let leaf = *ids.last().unwrap();
        let new_parent = graph.create(new_parent_local);

        let before = graph.world_pose(leaf).unwrap();
        graph.set_parent(leaf, Some(new_parent)).unwrap();
        let after = graph.world_pose(leaf).unwrap();

        let scale = 1.0 + before.position.length();
        prop_assert!(after.position.approx_eq(before.position, TOLERANCE * scale));
        prop_assert!((after.rotation - before.rotation).abs() < TOLERANCE);
        prop_assert!(after.scale.approx_eq(before.scale, TOLERANCE));
        prop_assert_eq!(graph.parent(leaf).unwrap(), Some(new_parent));
    }

    #[test]
    fn world_setters_round_trip(
        locals in prop::collection::vec(transform_strategy(), 2..4),
        x in -200.0..200.0f64,
        y in -200.0..200.0f64,
        rotation in -10.0..10.0f64,
    ) {
        let mut graph = SceneGraph::new();
        let ids = build_chain(&mut graph, &locals);
        let leaf = *ids.last().unwrap();

        graph.set_world_position(leaf, Vec2::new(x, y)).unwrap();
        graph.set_world_rotation(leaf, rotation).unwrap();

        let scale = 1.0 + x.abs() + y.abs();
        prop_assert!(graph.world_position(leaf).unwrap().approx_eq(Vec2::new(x, y), TOLERANCE * scale));
        prop_assert!((graph.world_rotation(leaf).unwrap() - rotation).abs() < TOLERANCE);
    }
}

#[test]
fn test_three_level_chain() {
    let mut graph = SceneGraph::new();
    let root = graph.create(Transform::new(Vec2::new(100.0, 50.0), 0.0, Vec2::new(2.0, 2.0)));
    let arm = graph.create(Transform::IDENTITY);
    let hand = graph.create(Transform::IDENTITY);
    graph.set_parent(arm, Some(root)).unwrap();
    graph.set_parent(hand, Some(arm)).unwrap();

    graph.set_local(arm, Transform::new(Vec2::new(10.0, 0.0), PI / 2.0, Vec2::ONE)).unwrap();
    graph.set_local(hand, Transform::from_position(Vec2::new(5.0, 0.0))).unwrap();

    // arm: 100 + 2*10 = 120; hand: arm + rotate((5,0)*2, 90deg) = (120, 60)
    assert!(graph.world_position(arm).unwrap().approx_eq(Vec2::new(120.0, 50.0), 1e-9));
    assert!(graph.world_position(hand).unwrap().approx_eq(Vec2::new(120.0, 60.0), 1e-9));
    assert!((graph.world_rotation(hand).unwrap() - PI / 2.0).abs() < 1e-12);
    assert_eq!(graph.world_scale(hand).unwrap(), Vec2::new(2.0, 2.0));
}

#[test]
fn test_rotation_is_not_normalized() {
    let mut graph = SceneGraph::new();
    let id = graph.create(Transform::IDENTITY.with_rotation(7.0 * PI));
    assert_eq!(graph.rotation(id).unwrap(), 7.0 * PI);
}

#[test]
fn test_zero_scale_inverse_is_an_error() {
    let mut graph = SceneGraph::new();
    let parent = graph.create(Transform::IDENTITY.with_scale(Vec2::new(0.0, 1.0)));
    let child = graph.create(Transform::IDENTITY);

    assert!(matches!(
        graph.world_to_local(parent, Vec2::new(1.0, 1.0)),
        Err(PhysicsError::DegenerateScale { .. })
    ));
    assert!(matches!(
        graph.set_parent(child, Some(parent)),
        Err(PhysicsError::DegenerateScale { .. })
    ));
    // Failed reparent leaves the child a root
    assert_eq!(graph.parent(child).unwrap(), None);
}

#[test]
fn test_cycles_are_rejected() {
    let mut graph = SceneGraph::new();
    let a = graph.create(Transform::IDENTITY);
    let b = graph.create(Transform::IDENTITY);
    let c = graph.create(Transform::IDENTITY);
    graph.set_parent(b, Some(a)).unwrap();
    graph.set_parent(c, Some(b)).unwrap();

    assert!(matches!(
        graph.set_parent(a, Some(c)),
        Err(PhysicsError::HierarchyCycle { .. })
    ));
    assert!(graph.set_parent(a, Some(a)).is_err());
    assert_eq!(graph.children(a).unwrap(), &[b]);
}

#[test]
fn test_destroying_entity_orphans_children() {
    let mut world = World::new();
    let parent = world.create_entity_with(Transform::from_position(Vec2::new(10.0, 10.0)));
    let child = world.create_entity_with(Transform::from_position(Vec2::new(15.0, 10.0)));
    world.set_parent(child, Some(parent)).unwrap();

    assert!(world.destroy_entity(parent));
    let id = world.transform(child).unwrap();
    assert_eq!(world.scene().parent(id).unwrap(), None);
    assert!(world.transform(parent).is_err());
}
