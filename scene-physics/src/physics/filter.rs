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
//! Layer filtering
//!
//! Before two colliders are tested, the world asks its [`LayerFilter`]
//! whether their layers interact. The default filter lets every layer
//! collide with every other.

/// Decides whether two collider layers interact
pub trait LayerFilter: Send + Sync {
    /// Whether colliders on `a` and `b` should be tested against each other
    fn can_collide(&self, a: u32, b: u32) -> bool;
}

/// Every layer collides with every layer
#[derive(Debug, Clone, Copy, Default)]
pub struct AllLayers;

impl LayerFilter for AllLayers {
    fn can_collide(&self, _a: u32, _b: u32) -> bool {
        true
    }
}

/// Symmetric collision matrix over layers `0..32`
///
/// Layers outside that range never collide.
///
/// # Examples
///
/// ```
/// use scene_physics::physics::{LayerFilter, LayerMatrix};
///
/// const PLAYER: u32 = 0;
/// const COIN: u32 = 1;
///
/// let mut matrix = LayerMatrix::all();
/// matrix.set(COIN, COIN, false);
/// assert!(matrix.can_collide(PLAYER, COIN));
/// assert!(!matrix.can_collide(COIN, COIN));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerMatrix {
    rows: [u32; LayerMatrix::LAYERS],
}

impl LayerMatrix {
    /// Number of layers the matrix can describe
    pub const LAYERS: usize = 32;

    /// Matrix where no layers collide
    pub fn none() -> Self {
        LayerMatrix { rows: [0; Self::LAYERS] }
    }

    /// Matrix where all layers collide
    pub fn all() -> Self {
        LayerMatrix { rows: [u32::MAX; Self::LAYERS] }
    }

    /// Enable or disable collisions between `a` and `b` (both directions)
    ///
    /// Out-of-range layers are ignored.
    pub fn set(&mut self, a: u32, b: u32, collide: bool) {
        if a as usize >= Self::LAYERS || b as usize >= Self::LAYERS {
            log::warn!("layer pair ({}, {}) is outside the collision matrix", a, b);
            return;
        }
        if collide {
            self.rows[a as usize] |= 1 << b;
            self.rows[b as usize] |= 1 << a;
        } else {
            self.rows[a as usize] &= !(1 << b);
            self.rows[b as usize] &= !(1 << a);
        }
    }
}

impl Default for LayerMatrix {
    fn default() -> Self {
        Self::all()
    }
}

impl LayerFilter for LayerMatrix {
    fn can_collide(&self, a: u32, b: u32) -> bool {
        match self.rows.get(a as usize) {
            Some(row) if (b as usize) < Self::LAYERS => row & (1 << b) != 0,
            _ => false,
        }
    }
}
