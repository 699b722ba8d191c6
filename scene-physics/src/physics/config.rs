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
//! Physics world configuration

use crate::math::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default gravity, pointing down a y-down canvas
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, 9.8);

/// Settings for a [`PhysicsWorld`](crate::physics::PhysicsWorld)
///
/// # Examples
///
/// ```
/// use scene_physics::math::Vec2;
/// use scene_physics::physics::PhysicsConfig;
///
/// let config = PhysicsConfig::default().with_gravity(Vec2::new(0.0, 20.0));
/// assert_eq!(config.gravity, Vec2::new(0.0, 20.0));
/// assert!(config.warn_on_invalid_state);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhysicsConfig {
    /// Acceleration applied to bodies with `use_gravity`
    pub gravity: Vec2,
    /// Whether to log warnings for skipped or degenerate state
    pub warn_on_invalid_state: bool,
    /// Run the narrow phase on the rayon pool when the `parallel` feature is on
    pub parallel_detection: bool,
    /// Below this many colliders the narrow phase stays on the calling thread
    pub parallel_threshold: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: DEFAULT_GRAVITY,
            warn_on_invalid_state: true,
            parallel_detection: true,
            parallel_threshold: 64,
        }
    }
}

impl PhysicsConfig {
    /// Set the gravity vector
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Silence warnings about skipped or degenerate state
    pub fn without_warnings(mut self) -> Self {
        self.warn_on_invalid_state = false;
        self
    }

    /// Enable or disable the parallel narrow phase
    pub fn with_parallel_detection(mut self, enabled: bool) -> Self {
        self.parallel_detection = enabled;
        self
    }

    /// Set the collider count at which the narrow phase goes parallel
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}
