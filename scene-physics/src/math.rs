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
//! 2D vector math
//!
//! A small double-precision vector type shared by the transform hierarchy
//! and the physics world. Angles are radians; a positive angle rotates +x
//! toward +y, which is clockwise on a y-down canvas.

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Threshold below which a scale component is treated as zero
pub const SCALE_EPSILON: f64 = 1e-12;

/// 2D vector with double-precision components
///
/// # Examples
///
/// ```
/// use scene_physics::math::Vec2;
///
/// let v = Vec2::new(3.0, 4.0);
/// assert_eq!(v.length(), 5.0);
/// assert!(v.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vec2 {
    /// The zero vector
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    /// The unit vector (1, 1), used as identity scale
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };
    /// Unit vector along +x
    pub const X: Vec2 = Vec2 { x: 1.0, y: 0.0 };
    /// Unit vector along +y
    pub const Y: Vec2 = Vec2 { x: 0.0, y: 1.0 };

    /// Create a new vector
    pub const fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Dot product
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Squared length
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or `fallback` when the length is zero
    pub fn normalize_or(self, fallback: Vec2) -> Vec2 {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            self / len
        } else {
            fallback
        }
    }

    /// Component-wise product
    pub fn mul_elem(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x * other.x, self.y * other.y)
    }

    /// Component-wise quotient
    ///
    /// Returns `None` if either component of `other` is (near) zero.
    pub fn checked_div_elem(self, other: Vec2) -> Option<Vec2> {
        if other.x.abs() < SCALE_EPSILON || other.y.abs() < SCALE_EPSILON {
            None
        } else {
            Some(Vec2::new(self.x / other.x, self.y / other.y))
        }
    }

    /// Rotate by `angle` radians
    pub fn rotate(self, angle: f64) -> Vec2 {
        if angle == 0.0 {
            return self;
        }
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Component-wise clamp between `min` and `max`
    ///
    /// Never panics, unlike `f64::clamp`; NaN bounds are ignored.
    pub fn clamp(self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(self.x.max(min.x).min(max.x), self.y.max(min.y).min(max.y))
    }

    /// Larger of the two components
    pub fn max_element(self) -> f64 {
        self.x.max(self.y)
    }

    /// Component-wise absolute value
    pub fn abs(self) -> Vec2 {
        Vec2::new(self.x.abs(), self.y.abs())
    }

    /// Check if both components are finite (not NaN or infinite)
    pub fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Check whether two vectors agree within `tolerance` on each axis
    pub fn approx_eq(self, other: Vec2, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f64> for Vec2 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Vec2::new(x, y)
    }
}
