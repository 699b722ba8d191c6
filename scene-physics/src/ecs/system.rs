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
//! System execution framework
//!
//! Systems are stepped once per frame by the owning game loop with the
//! frame's timestep. The physics world is one such system; gameplay code
//! can register its own alongside it.

use crate::ecs::World;

/// Something that advances the world by a timestep
pub trait System: Send {
    /// Advance the world by `dt` seconds
    fn run(&mut self, world: &mut World, dt: f64);

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Runs registered systems in registration order
pub struct SystemExecutor {
    systems: Vec<Box<dyn System>>,
}

impl SystemExecutor {
    /// Create a new system executor
    pub fn new() -> Self {
        SystemExecutor {
            systems: Vec::new(),
        }
    }

    /// Add a system to the executor
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Run all systems sequentially
    ///
    /// Each system completes before the next one starts.
    pub fn run_sequential(&mut self, world: &mut World, dt: f64) {
        for system in &mut self.systems {
            log::trace!("running system {}", system.name());
            system.run(world, dt);
        }
    }

    /// Get the number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self::new()
    }
}
