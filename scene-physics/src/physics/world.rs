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
//! The physics world
//!
//! [`PhysicsWorld`] owns the collider and rigidbody registries and advances
//! them against an ECS [`World`] one step at a time:
//!
//! 1. Integrate every rigidbody on an active entity
//! 2. Detect all overlapping collider pairs
//! 3. Resolve pairs that have at least one dynamic body
//! 4. Diff pairs against the previous step and dispatch enter/stay/exit
//!
//! Detection runs over a snapshot taken after integration, and every pair
//! is found before any pair is resolved.
//!
//! # Reentrancy
//!
//! `update` borrows both the physics world and the ECS world mutably for
//! the whole step. Listeners only receive the other entity, so they cannot
//! step, register, or unregister during dispatch.

use crate::ecs::{ComponentStorage, Entity, OrderedStorage, System, World};
use crate::error::{PhysicsError, Result};
use crate::integration::integrate_body;
use crate::math::Vec2;
use crate::physics::collider::{Collider, WorldShape};
use crate::physics::config::PhysicsConfig;
use crate::physics::contact::CollisionPair;
use crate::physics::events::{dispatch, CollisionEvent, ContactTracker};
use crate::physics::filter::{AllLayers, LayerFilter};
use crate::physics::narrowphase::check_collision;
use crate::physics::resolve::{resolve_pair, ContactBody, Resolution};
use crate::physics::rigidbody::Rigidbody;
use crate::scene::TransformId;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Counters for one call to [`PhysicsWorld::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Rigidbodies whose position was advanced
    pub bodies_integrated: usize,
    /// Collider pairs that passed the layer filter and were tested
    pub pairs_tested: usize,
    /// Pairs found overlapping
    pub contacts: usize,
    /// Pairs whose positions or velocities were corrected
    pub resolved: usize,
    /// Enter, stay and exit events produced
    pub events: usize,
}

/// Snapshot of one collider taken for detection
#[derive(Debug, Clone, Copy)]
struct Proxy {
    entity: Entity,
    shape: WorldShape,
    layer: u32,
}

/// Colliders, rigidbodies and contact state for one simulation
///
/// # Examples
///
/// ```
/// use scene_physics::ecs::World;
/// use scene_physics::math::Vec2;
/// use scene_physics::physics::{Collider, PhysicsWorld, Rigidbody};
/// use scene_physics::scene::Transform;
///
/// let mut world = World::new();
/// let mut physics = PhysicsWorld::new();
///
/// let ball = world.create_entity_with(Transform::from_position(Vec2::new(0.0, 0.0)));
/// physics.add_collider(ball, Collider::circle(5.0)).unwrap();
/// physics.add_rigidbody(ball, Rigidbody::dynamic(1.0)).unwrap();
///
/// let stats = physics.update(&mut world, 0.1);
/// assert_eq!(stats.bodies_integrated, 1);
///
/// let id = world.transform(ball).unwrap();
/// assert!(world.scene().world_position(id).unwrap().y > 0.0);
/// ```
pub struct PhysicsWorld {
    config: PhysicsConfig,
    colliders: OrderedStorage<Collider>,
    rigidbodies: OrderedStorage<Rigidbody>,
    filter: Box<dyn LayerFilter>,
    tracker: ContactTracker,
    events: Vec<CollisionEvent>,
}

impl PhysicsWorld {
    /// Create an empty world with default settings
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create an empty world with the given settings
    pub fn with_config(config: PhysicsConfig) -> Self {
        PhysicsWorld {
            config,
            colliders: OrderedStorage::new(),
            rigidbodies: OrderedStorage::new(),
            filter: Box::new(AllLayers),
            tracker: ContactTracker::new(),
            events: Vec::new(),
        }
    }

    /// Current settings
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Gravity applied to bodies with `use_gravity`
    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    /// Replace the gravity vector
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }

    /// Replace the layer filter consulted before each pair test
    pub fn set_layer_filter<F: LayerFilter + 'static>(&mut self, filter: F) {
        self.filter = Box::new(filter);
    }

    // Registries

    /// Register a collider for `entity`
    ///
    /// Returns `Ok(false)` and keeps the existing collider if the entity
    /// already has one.
    pub fn add_collider(&mut self, entity: Entity, collider: Collider) -> Result<bool> {
        collider.validate()?;
        let inserted = self.colliders.insert(entity, collider);
        if inserted {
            log::debug!("registered {:?} collider for {}", collider.shape, entity);
        }
        Ok(inserted)
    }

    /// Unregister the collider of `entity`
    ///
    /// Contacts involving it produce exit events on the next step.
    pub fn remove_collider(&mut self, entity: Entity) -> Option<Collider> {
        let removed = self.colliders.remove(entity);
        if removed.is_some() {
            log::debug!("removed collider for {}", entity);
        }
        removed
    }

    /// Register a rigidbody for `entity`
    ///
    /// Returns `Ok(false)` and keeps the existing body if the entity
    /// already has one.
    pub fn add_rigidbody(&mut self, entity: Entity, body: Rigidbody) -> Result<bool> {
        body.validate()?;
        let inserted = self.rigidbodies.insert(entity, body);
        if inserted {
            log::debug!("registered rigidbody for {} (mass {})", entity, body.mass);
        }
        Ok(inserted)
    }

    /// Unregister the rigidbody of `entity`
    pub fn remove_rigidbody(&mut self, entity: Entity) -> Option<Rigidbody> {
        let removed = self.rigidbodies.remove(entity);
        if removed.is_some() {
            log::debug!("removed rigidbody for {}", entity);
        }
        removed
    }

    /// Drop both registrations of `entity`
    ///
    /// Returns true if anything was removed.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        let collider = self.remove_collider(entity).is_some();
        let body = self.remove_rigidbody(entity).is_some();
        collider || body
    }

    /// Collider registered for `entity`
    pub fn collider(&self, entity: Entity) -> Option<&Collider> {
        self.colliders.get(entity)
    }

    /// Enable or disable detection for the collider of `entity`
    pub fn set_collider_active(&mut self, entity: Entity, active: bool) -> Result<()> {
        let collider = self
            .colliders
            .get_mut(entity)
            .ok_or(PhysicsError::UnknownEntity(entity))?;
        collider.active = active;
        Ok(())
    }

    /// Rigidbody registered for `entity`
    pub fn rigidbody(&self, entity: Entity) -> Option<&Rigidbody> {
        self.rigidbodies.get(entity)
    }

    /// Edit the rigidbody of `entity` in place
    ///
    /// The body is validated afterwards; on failure the edit is reverted
    /// and the validation error returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use scene_physics::ecs::World;
    /// use scene_physics::math::Vec2;
    /// use scene_physics::physics::{PhysicsWorld, Rigidbody};
    ///
    /// let mut world = World::new();
    /// let mut physics = PhysicsWorld::new();
    /// let e = world.create_entity();
    /// physics.add_rigidbody(e, Rigidbody::dynamic(2.0)).unwrap();
    ///
    /// physics.modify_rigidbody(e, |body| body.apply_impulse(Vec2::new(4.0, 0.0))).unwrap();
    /// assert_eq!(physics.rigidbody(e).unwrap().velocity, Vec2::new(2.0, 0.0));
    ///
    /// assert!(physics.modify_rigidbody(e, |body| body.mass = 0.0).is_err());
    /// assert_eq!(physics.rigidbody(e).unwrap().mass, 2.0);
    /// ```
    pub fn modify_rigidbody<F>(&mut self, entity: Entity, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Rigidbody),
    {
        let body = self
            .rigidbodies
            .get_mut(entity)
            .ok_or(PhysicsError::UnknownEntity(entity))?;
        let before = *body;
        edit(body);
        if let Err(err) = body.validate() {
            *body = before;
            return Err(err);
        }
        Ok(())
    }

    /// Set the velocity of the rigidbody of `entity`
    pub fn set_velocity(&mut self, entity: Entity, velocity: Vec2) -> Result<()> {
        self.modify_rigidbody(entity, |body| body.velocity = velocity)
    }

    /// Number of registered colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Number of registered rigidbodies
    pub fn rigidbody_count(&self) -> usize {
        self.rigidbodies.len()
    }

    /// Pairs found touching on the last step
    pub fn contacts(&self) -> &[CollisionPair] {
        self.tracker.contacts()
    }

    /// Whether `a` and `b` were touching on the last step
    pub fn is_touching(&self, a: Entity, b: Entity) -> bool {
        self.tracker.is_touching(a, b)
    }

    /// Events produced by the last step, in dispatch order
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Entities whose active collider contains the world-space `point`
    ///
    /// Results follow collider registration order.
    pub fn query_point(&self, world: &World, point: Vec2) -> Vec<Entity> {
        self.colliders
            .iter()
            .filter(|(entity, collider)| collider.active && world.is_active(*entity))
            .filter_map(|(entity, collider)| {
                let id = world.transform(entity).ok()?;
                let pose = world.scene().world_pose(id).ok()?;
                collider.shape.to_world(&pose).contains_point(point).then_some(entity)
            })
            .collect()
    }

    /// Forget registrations and contacts without emitting exit events
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.rigidbodies.clear();
        self.tracker.clear();
        self.events.clear();
    }

    // Stepping

    /// Advance the simulation by `dt` seconds
    ///
    /// A negative or non-finite `dt` skips the step entirely. Bodies whose
    /// integration would produce a non-finite position or velocity are
    /// left unchanged for this step.
    pub fn update(&mut self, world: &mut World, dt: f64) -> StepStats {
        let mut stats = StepStats::default();
        self.events.clear();

        if !(dt.is_finite() && dt >= 0.0) {
            if self.config.warn_on_invalid_state {
                log::warn!("skipping physics step with invalid dt {}", dt);
            }
            return stats;
        }

        self.prune_dead(world);

        stats.bodies_integrated = self.integrate(world, dt);

        let proxies = self.collect_proxies(world);
        let (pairs, tested) = self.find_contacts(&proxies);
        stats.pairs_tested = tested;
        stats.contacts = pairs.len();

        stats.resolved = self.resolve_contacts(world, &pairs);

        let events = self.tracker.diff(&pairs);
        dispatch(world, &events);
        stats.events = events.len();
        self.events = events;

        log::trace!("physics step dt={} {:?}", dt, stats);
        stats
    }

    /// Drop registrations whose entity has been destroyed
    fn prune_dead(&mut self, world: &World) {
        let dead: Vec<Entity> = self
            .colliders
            .entities()
            .chain(self.rigidbodies.entities())
            .filter(|entity| !world.is_entity_alive(*entity))
            .collect();
        for entity in dead {
            self.remove_entity(entity);
        }
    }

    fn integrate(&mut self, world: &mut World, dt: f64) -> usize {
        let gravity = self.config.gravity;
        let warn = self.config.warn_on_invalid_state;
        let mut integrated = 0;

        for (entity, body) in self.rigidbodies.iter_mut() {
            if !world.is_active(entity) {
                continue;
            }
            let Ok(id) = world.transform(entity) else {
                continue;
            };
            let Ok(mut position) = world.scene().position(id) else {
                continue;
            };

            let before = *body;
            integrate_body(body, &mut position, gravity, dt);
            if !position.is_valid() || !body.velocity.is_valid() {
                *body = before;
                if warn {
                    log::warn!("{} produced a non-finite state, skipping integration", entity);
                }
                continue;
            }

            if world.scene_mut().set_position(id, position).is_ok() {
                integrated += 1;
            }
        }
        integrated
    }

    fn collect_proxies(&self, world: &World) -> Vec<Proxy> {
        let warn = self.config.warn_on_invalid_state;
        self.colliders
            .iter()
            .filter(|(entity, collider)| collider.active && world.is_active(*entity))
            .filter_map(|(entity, collider)| {
                let id = world.transform(entity).ok()?;
                let pose = match world.scene().world_pose(id) {
                    Ok(pose) => pose,
                    Err(err) => {
                        if warn {
                            log::warn!("{} has no usable transform: {}", entity, err);
                        }
                        return None;
                    }
                };
                Some(Proxy {
                    entity,
                    shape: collider.shape.to_world(&pose),
                    layer: collider.layer,
                })
            })
            .collect()
    }

    /// Test every proxy pair `i < j`, returning contacts and the tested count
    fn find_contacts(&self, proxies: &[Proxy]) -> (Vec<CollisionPair>, usize) {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel_detection && proxies.len() >= self.config.parallel_threshold {
                return self.find_contacts_parallel(proxies);
            }
        }
        self.find_contacts_sequential(proxies)
    }

    fn find_contacts_sequential(&self, proxies: &[Proxy]) -> (Vec<CollisionPair>, usize) {
        let filter = self.filter.as_ref();
        let rows: Vec<_> = (0..proxies.len())
            .map(|i| scan_row(proxies, i, filter))
            .collect();
        merge_rows(rows)
    }

    // Rows are collected in index order, so the pair list matches the
    // sequential path exactly.
    #[cfg(feature = "parallel")]
    fn find_contacts_parallel(&self, proxies: &[Proxy]) -> (Vec<CollisionPair>, usize) {
        let filter = self.filter.as_ref();
        let rows: Vec<_> = (0..proxies.len())
            .into_par_iter()
            .map(|i| scan_row(proxies, i, filter))
            .collect();
        merge_rows(rows)
    }

    fn resolve_contacts(&mut self, world: &mut World, pairs: &[CollisionPair]) -> usize {
        let mut resolved = 0;

        for pair in pairs {
            if self.is_trigger(pair.a) || self.is_trigger(pair.b) {
                continue;
            }
            let (Ok(id_a), Ok(id_b)) = (world.transform(pair.a), world.transform(pair.b)) else {
                continue;
            };
            // Re-read positions so earlier corrections this step are seen
            let (Ok(mut pos_a), Ok(mut pos_b)) = (
                world.scene().world_position(id_a),
                world.scene().world_position(id_b),
            ) else {
                continue;
            };

            let outcome = match (
                self.rigidbodies.contains(pair.a),
                self.rigidbodies.contains(pair.b),
            ) {
                (true, true) => match self.rigidbodies.get_pair_mut(pair.a, pair.b) {
                    Some((body_a, body_b)) => resolve_pair(
                        ContactBody { body: Some(body_a), position: &mut pos_a },
                        ContactBody { body: Some(body_b), position: &mut pos_b },
                        &pair.info,
                    ),
                    None => Resolution::Skipped,
                },
                (true, false) => resolve_pair(
                    ContactBody { body: self.rigidbodies.get_mut(pair.a), position: &mut pos_a },
                    ContactBody { body: None, position: &mut pos_b },
                    &pair.info,
                ),
                (false, true) => resolve_pair(
                    ContactBody { body: None, position: &mut pos_a },
                    ContactBody { body: self.rigidbodies.get_mut(pair.b), position: &mut pos_b },
                    &pair.info,
                ),
                (false, false) => Resolution::Skipped,
            };

            match outcome {
                Resolution::Skipped => continue,
                Resolution::MovedA => self.write_back(world, pair.a, id_a, pos_a),
                Resolution::MovedB => self.write_back(world, pair.b, id_b, pos_b),
                Resolution::MovedBoth => {
                    self.write_back(world, pair.a, id_a, pos_a);
                    self.write_back(world, pair.b, id_b, pos_b);
                }
            }
            resolved += 1;
        }
        resolved
    }

    fn is_trigger(&self, entity: Entity) -> bool {
        self.colliders.get(entity).map(|c| c.is_trigger).unwrap_or(false)
    }

    fn write_back(&self, world: &mut World, entity: Entity, id: TransformId, position: Vec2) {
        if let Err(err) = world.scene_mut().set_world_position(id, position) {
            if self.config.warn_on_invalid_state {
                log::warn!("could not move {} out of contact: {}", entity, err);
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PhysicsWorld {
    fn run(&mut self, world: &mut World, dt: f64) {
        self.update(world, dt);
    }

    fn name(&self) -> &str {
        "PhysicsWorld"
    }
}

fn scan_row(proxies: &[Proxy], i: usize, filter: &dyn LayerFilter) -> (Vec<CollisionPair>, usize) {
    let a = &proxies[i];
    let mut found = Vec::new();
    let mut tested = 0;
    for b in &proxies[i + 1..] {
        if a.entity == b.entity || !filter.can_collide(a.layer, b.layer) {
            continue;
        }
        tested += 1;
        if let Some(info) = check_collision(&a.shape, &b.shape) {
            found.push(CollisionPair { a: a.entity, b: b.entity, info });
        }
    }
    (found, tested)
}

fn merge_rows(rows: Vec<(Vec<CollisionPair>, usize)>) -> (Vec<CollisionPair>, usize) {
    let mut pairs = Vec::new();
    let mut tested = 0;
    for (found, count) in rows {
        pairs.extend(found);
        tested += count;
    }
    (pairs, tested)
}
