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
//! Fixed timestep accumulator
//!
//! Converts variable frame times into a whole number of fixed physics
//! steps. Leftover time carries into the next frame, and a per-frame step
//! cap keeps a long stall from triggering a burst of catch-up steps.

/// Accumulates frame time and hands out fixed steps
///
/// # Examples
///
/// ```
/// use scene_physics::integration::FixedTimestep;
///
/// let mut clock = FixedTimestep::new(0.01);
/// assert_eq!(clock.advance(0.025), 2);
/// assert_eq!(clock.advance(0.006), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f64,
    accumulator: f64,
    max_steps_per_frame: usize,
}

impl FixedTimestep {
    /// Default cap on steps handed out per frame
    pub const DEFAULT_MAX_STEPS: usize = 8;

    /// Create a new accumulator with the given step length in seconds
    ///
    /// # Panics
    ///
    /// Panics if `step` is non-positive, NaN, or infinite. Use `try_new`
    /// for fallible construction.
    pub fn new(step: f64) -> Self {
        Self::try_new(step).expect("Timestep must be positive and finite")
    }

    /// Create a new accumulator, returning `None` for an invalid step
    pub fn try_new(step: f64) -> Option<Self> {
        if step > 0.0 && step.is_finite() {
            Some(FixedTimestep {
                step,
                accumulator: 0.0,
                max_steps_per_frame: Self::DEFAULT_MAX_STEPS,
            })
        } else {
            None
        }
    }

    /// Set the per-frame step cap (at least one)
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps_per_frame = max_steps.max(1);
        self
    }

    /// Fixed step length in seconds
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Add `frame_dt` seconds and return how many fixed steps to run
    ///
    /// Negative or non-finite frame times are ignored. Time beyond the step
    /// cap is dropped.
    pub fn advance(&mut self, frame_dt: f64) -> usize {
        if !(frame_dt.is_finite() && frame_dt > 0.0) {
            return 0;
        }
        self.accumulator += frame_dt;

        // Tolerate rounding so 0.03 with a 0.01 step yields three steps
        let epsilon = self.step * 1e-9;
        let mut steps = 0;
        while self.accumulator + epsilon >= self.step && steps < self.max_steps_per_frame {
            self.accumulator = (self.accumulator - self.step).max(0.0);
            steps += 1;
        }

        if steps == self.max_steps_per_frame && self.accumulator >= self.step {
            log::debug!(
                "dropping {:.4}s of simulation time after {} steps",
                self.accumulator,
                steps
            );
            self.accumulator %= self.step;
        }
        steps
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.step
    }

    /// Drop any accumulated time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_leftover() {
        let mut clock = FixedTimestep::new(0.1);
        assert_eq!(clock.advance(0.05), 0);
        assert_eq!(clock.advance(0.05), 1);
        assert_eq!(clock.advance(0.3), 3);
        assert!(clock.alpha() < 1e-6);
    }

    #[test]
    fn test_step_cap() {
        let mut clock = FixedTimestep::new(0.01).with_max_steps(4);
        assert_eq!(clock.advance(1.0), 4);
        assert!(clock.alpha() < 1.0);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(FixedTimestep::try_new(0.0).is_none());
        assert!(FixedTimestep::try_new(f64::NAN).is_none());
        let mut clock = FixedTimestep::new(0.1);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f64::INFINITY), 0);
    }

    #[test]
    #[should_panic(expected = "Timestep must be positive and finite")]
    fn test_zero_step_panics() {
        FixedTimestep::new(0.0);
    }
}
