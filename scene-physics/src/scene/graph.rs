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
//! Transform hierarchy
//!
//! The scene graph is an arena of nodes linked by index. A node's parent
//! is a plain [`TransformId`] and its children are an ordered list of ids,
//! so the graph owns every node exactly once and a forest is maintained by
//! rejecting reparent operations that would close a cycle.
//!
//! Slots are recycled through a free list; each reuse bumps the slot's
//! generation so stale handles fail with
//! [`PhysicsError::UnknownTransform`] instead of aliasing a new node.

use crate::error::{PhysicsError, Result};
use crate::math::Vec2;
use crate::scene::transform::{Pose, Transform, TransformId};

#[derive(Debug, Clone)]
struct Node {
    local: Transform,
    parent: Option<TransformId>,
    children: Vec<TransformId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-backed forest of transforms
///
/// # Examples
///
/// ```
/// use scene_physics::math::Vec2;
/// use scene_physics::scene::{SceneGraph, Transform};
///
/// let mut graph = SceneGraph::new();
/// let parent = graph.create(Transform::from_position(Vec2::new(100.0, 0.0)));
/// let child = graph.create(Transform::from_position(Vec2::new(5.0, 0.0)));
/// graph.set_parent(child, Some(parent)).unwrap();
///
/// // Reparenting keeps the child where it was in the world
/// assert_eq!(graph.world_position(child).unwrap(), Vec2::new(5.0, 0.0));
/// assert_eq!(graph.position(child).unwrap(), Vec2::new(-95.0, 0.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        SceneGraph {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Allocate a new root node with the given local transform
    pub fn create(&mut self, local: Transform) -> TransformId {
        let node = Node {
            local,
            parent: None,
            children: Vec::new(),
        };
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return TransformId::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        TransformId::new(index, 0)
    }

    /// Destroy a node
    ///
    /// The node is detached from its parent. Its children become roots and
    /// keep their local transforms unchanged, which means their world pose
    /// jumps; re-attaching them is the caller's job.
    pub fn destroy(&mut self, id: TransformId) -> Result<()> {
        let node = {
            let slot = self.slot_mut(id)?;
            slot.generation = slot.generation.wrapping_add(1);
            slot.node.take().ok_or(PhysicsError::UnknownTransform(id))?
        };

        if let Some(parent) = node.parent {
            if let Ok(parent_node) = self.node_mut(parent) {
                parent_node.children.retain(|c| *c != id);
            }
        }
        for child in node.children {
            if let Ok(child_node) = self.node_mut(child) {
                child_node.parent = None;
            }
        }

        self.free.push(id.index());
        self.len -= 1;
        log::debug!("destroyed {}", id);
        Ok(())
    }

    /// Check whether a handle refers to a live node
    pub fn contains(&self, id: TransformId) -> bool {
        self.node(id).is_ok()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the graph has no live nodes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Local transform of a node
    pub fn local(&self, id: TransformId) -> Result<Transform> {
        Ok(self.node(id)?.local)
    }

    /// Replace the whole local transform of a node
    pub fn set_local(&mut self, id: TransformId, local: Transform) -> Result<()> {
        self.node_mut(id)?.local = local;
        Ok(())
    }

    /// Local position
    pub fn position(&self, id: TransformId) -> Result<Vec2> {
        Ok(self.node(id)?.local.position)
    }

    /// Local rotation, radians
    pub fn rotation(&self, id: TransformId) -> Result<f64> {
        Ok(self.node(id)?.local.rotation)
    }

    /// Local scale
    pub fn scale(&self, id: TransformId) -> Result<Vec2> {
        Ok(self.node(id)?.local.scale)
    }

    /// Set the local position
    pub fn set_position(&mut self, id: TransformId, position: Vec2) -> Result<()> {
        self.node_mut(id)?.local.position = position;
        Ok(())
    }

    /// Set the local rotation, radians
    pub fn set_rotation(&mut self, id: TransformId, rotation: f64) -> Result<()> {
        self.node_mut(id)?.local.rotation = rotation;
        Ok(())
    }

    /// Set the local scale
    pub fn set_scale(&mut self, id: TransformId, scale: Vec2) -> Result<()> {
        self.node_mut(id)?.local.scale = scale;
        Ok(())
    }

    /// Parent of a node, `None` for roots
    pub fn parent(&self, id: TransformId) -> Result<Option<TransformId>> {
        Ok(self.node(id)?.parent)
    }

    /// Children of a node in attachment order
    pub fn children(&self, id: TransformId) -> Result<&[TransformId]> {
        Ok(&self.node(id)?.children)
    }

    /// Move a node under a new parent, or make it a root with `None`
    ///
    /// The node's world pose is preserved by recomputing its local pose
    /// against the new parent. Fails without modifying anything if the new
    /// parent is the node itself or one of its descendants, or if the new
    /// parent's world scale cannot be inverted.
    pub fn set_parent(&mut self, id: TransformId, parent: Option<TransformId>) -> Result<()> {
        let old_parent = self.node(id)?.parent;
        if old_parent == parent {
            return Ok(());
        }

        let world = self.world_pose(id)?;
        let local = match parent {
            Some(new_parent) => {
                if self.is_ancestor_or_self(id, new_parent)? {
                    return Err(PhysicsError::HierarchyCycle {
                        child: id,
                        parent: new_parent,
                    });
                }
                self.world_pose(new_parent)?.solve_local(&world)?
            }
            None => Transform::new(world.position, world.rotation, world.scale),
        };

        if let Some(old) = old_parent {
            if let Ok(old_node) = self.node_mut(old) {
                old_node.children.retain(|c| *c != id);
            }
        }
        if let Some(new_parent) = parent {
            self.node_mut(new_parent)?.children.push(id);
        }

        let node = self.node_mut(id)?;
        node.parent = parent;
        node.local = local;
        log::debug!("reparented {} under {:?}", id, parent);
        Ok(())
    }

    /// World pose of a node, composed from the root down
    pub fn world_pose(&self, id: TransformId) -> Result<Pose> {
        let mut chain = vec![id];
        let mut cursor = self.node(id)?.parent;
        while let Some(ancestor) = cursor {
            chain.push(ancestor);
            cursor = self.node(ancestor)?.parent;
        }

        let mut pose = Pose::IDENTITY;
        for node_id in chain.iter().rev() {
            pose = pose.compose(&self.node(*node_id)?.local);
        }
        Ok(pose)
    }

    /// World pose of a node's parent, or the root frame for roots
    pub fn parent_pose(&self, id: TransformId) -> Result<Pose> {
        match self.node(id)?.parent {
            Some(parent) => self.world_pose(parent),
            None => Ok(Pose::IDENTITY),
        }
    }

    /// World position
    pub fn world_position(&self, id: TransformId) -> Result<Vec2> {
        Ok(self.world_pose(id)?.position)
    }

    /// World rotation, the sum of rotations along the ancestor chain
    pub fn world_rotation(&self, id: TransformId) -> Result<f64> {
        Ok(self.world_pose(id)?.rotation)
    }

    /// World scale, the component-wise product along the ancestor chain
    pub fn world_scale(&self, id: TransformId) -> Result<Vec2> {
        Ok(self.world_pose(id)?.scale)
    }

    /// Set the local position so the world position becomes `position`
    pub fn set_world_position(&mut self, id: TransformId, position: Vec2) -> Result<()> {
        let local = self.parent_pose(id)?.inverse_transform_point(position)?;
        self.set_position(id, local)
    }

    /// Set the local rotation so the world rotation becomes `rotation`
    pub fn set_world_rotation(&mut self, id: TransformId, rotation: f64) -> Result<()> {
        let parent_rotation = self.parent_pose(id)?.rotation;
        self.set_rotation(id, rotation - parent_rotation)
    }

    /// Set the local scale so the world scale becomes `scale`
    pub fn set_world_scale(&mut self, id: TransformId, scale: Vec2) -> Result<()> {
        let parent_scale = self.parent_pose(id)?.scale;
        let local = scale
            .checked_div_elem(parent_scale)
            .ok_or(PhysicsError::DegenerateScale {
                x: parent_scale.x,
                y: parent_scale.y,
            })?;
        self.set_scale(id, local)
    }

    /// Map a point in the node's local space to world space
    pub fn local_to_world(&self, id: TransformId, point: Vec2) -> Result<Vec2> {
        Ok(self.world_pose(id)?.transform_point(point))
    }

    /// Map a world-space point into the node's local space
    ///
    /// Fails with [`PhysicsError::DegenerateScale`] when the node's world
    /// scale has a zero component.
    pub fn world_to_local(&self, id: TransformId, point: Vec2) -> Result<Vec2> {
        self.world_pose(id)?.inverse_transform_point(point)
    }

    /// Iterate over all root nodes in slot order
    pub fn roots(&self) -> impl Iterator<Item = TransformId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node
                .as_ref()
                .filter(|node| node.parent.is_none())
                .map(|_| TransformId::new(index as u32, slot.generation))
        })
    }

    fn is_ancestor_or_self(&self, candidate: TransformId, of: TransformId) -> Result<bool> {
        let mut cursor = Some(of);
        while let Some(current) = cursor {
            if current == candidate {
                return Ok(true);
            }
            cursor = self.node(current)?.parent;
        }
        Ok(false)
    }

    fn slot_mut(&mut self, id: TransformId) -> Result<&mut Slot> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .ok_or(PhysicsError::UnknownTransform(id))
    }

    fn node(&self, id: TransformId) -> Result<&Node> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
            .ok_or(PhysicsError::UnknownTransform(id))
    }

    fn node_mut(&mut self, id: TransformId) -> Result<&mut Node> {
        self.slot_mut(id)?
            .node
            .as_mut()
            .ok_or(PhysicsError::UnknownTransform(id))
    }
}
