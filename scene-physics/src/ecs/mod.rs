//! Entity Component System (ECS) core
//!
//! This module provides:
//! - Entity management with generational handles
//! - Insertion-ordered component storage
//! - Collision listeners attached to entities
//! - The [`World`] that ties entities to their transforms
//! - A minimal system execution framework

mod component;
mod entity;
mod listener;
mod system;
mod world;

pub use component::{Component, ComponentStorage, OrderedStorage};
pub use entity::{Entity, EntityId};
pub use listener::{CollisionListener, CollisionPhase, ListenerId};
pub use system::{System, SystemExecutor};
pub use world::World;
