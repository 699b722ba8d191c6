//! Scene graph transform hierarchy
//!
//! This module provides:
//! - [`Transform`]: a node's local position, rotation and scale
//! - [`Pose`]: the same values resolved against the root frame
//! - [`SceneGraph`]: an index-linked forest of transforms with local/world
//!   conversions and world-pose-preserving reparenting

mod graph;
mod transform;

pub use graph::SceneGraph;
pub use transform::{Pose, Transform, TransformId};
