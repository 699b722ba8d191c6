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
//! Narrow-phase collision tests
//!
//! Exact overlap tests between two world-space shapes. Every test returns
//! a [`CollisionInfo`] whose normal points from the first argument toward
//! the second, or `None` when the shapes do not overlap. Shapes that only
//! touch (zero penetration) are not colliding.
//!
//! When a direction is undefined (coincident circle centers) the normal
//! falls back to `+x`.

use crate::math::Vec2;
use crate::physics::collider::WorldShape;
use crate::physics::contact::CollisionInfo;

/// Normal used when two centers coincide
pub const FALLBACK_NORMAL: Vec2 = Vec2::X;

/// Test two world shapes against each other
///
/// # Examples
///
/// ```
/// use scene_physics::math::Vec2;
/// use scene_physics::physics::{check_collision, WorldShape};
///
/// let a = WorldShape::Circle { center: Vec2::new(0.0, 0.0), radius: 5.0 };
/// let b = WorldShape::Circle { center: Vec2::new(8.0, 0.0), radius: 5.0 };
/// let info = check_collision(&a, &b).unwrap();
/// assert_eq!(info.normal, Vec2::new(1.0, 0.0));
/// assert_eq!(info.depth, 2.0);
/// ```
pub fn check_collision(a: &WorldShape, b: &WorldShape) -> Option<CollisionInfo> {
    match (*a, *b) {
        (
            WorldShape::Circle { center: ca, radius: ra },
            WorldShape::Circle { center: cb, radius: rb },
        ) => circle_circle(ca, ra, cb, rb),
        (
            WorldShape::Aabb { center: ca, half_extents: ha },
            WorldShape::Aabb { center: cb, half_extents: hb },
        ) => box_box(ca, ha, cb, hb),
        (
            WorldShape::Circle { center, radius },
            WorldShape::Aabb { center: box_center, half_extents },
        ) => circle_box(center, radius, box_center, half_extents),
        (
            WorldShape::Aabb { center: box_center, half_extents },
            WorldShape::Circle { center, radius },
        ) => box_circle(box_center, half_extents, center, radius),
    }
}

/// Circle against circle
///
/// The contact point lies on A's surface along the normal.
pub fn circle_circle(ca: Vec2, ra: f64, cb: Vec2, rb: f64) -> Option<CollisionInfo> {
    let delta = cb - ca;
    let distance = delta.length();
    let radii = ra + rb;
    if distance >= radii {
        return None;
    }

    let normal = if distance > 0.0 {
        delta / distance
    } else {
        FALLBACK_NORMAL
    };
    Some(CollisionInfo {
        normal,
        depth: radii - distance,
        point: ca + normal * ra,
    })
}

/// Axis-aligned box against axis-aligned box
///
/// Separation happens along the axis with the smaller overlap; ties go to
/// the vertical axis. The normal is a signed unit axis pointing from A's
/// center toward B's, and `+` when the centers line up on that axis.
pub fn box_box(ca: Vec2, ha: Vec2, cb: Vec2, hb: Vec2) -> Option<CollisionInfo> {
    let (a_min, a_max) = (ca - ha, ca + ha);
    let (b_min, b_max) = (cb - hb, cb + hb);

    let overlap_x = a_max.x.min(b_max.x) - a_min.x.max(b_min.x);
    let overlap_y = a_max.y.min(b_max.y) - a_min.y.max(b_min.y);
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    let delta = cb - ca;
    let (normal, depth) = if overlap_x < overlap_y {
        (Vec2::new(axis_sign(delta.x), 0.0), overlap_x)
    } else {
        (Vec2::new(0.0, axis_sign(delta.y)), overlap_y)
    };
    Some(CollisionInfo {
        normal,
        depth,
        point: cb - normal.mul_elem(hb),
    })
}

/// Circle against axis-aligned box
///
/// The circle center is clamped onto the box to find the closest point and
/// the depth is `radius - distance` to it. When the center is outside the
/// box, the normal runs from the circle center to that point. When the
/// center is inside, the closest point is the center itself, so the depth
/// is the radius and the normal follows the axis of smaller overlap.
///
/// Normals point from the circle toward the box, the reverse of "closest
/// point to circle center", so they agree with the A to B convention that
/// [`box_circle`] negates.
pub fn circle_box(center: Vec2, radius: f64, box_center: Vec2, half_extents: Vec2) -> Option<CollisionInfo> {
    let closest = center.clamp(box_center - half_extents, box_center + half_extents);
    let to_box = closest - center;
    let distance = to_box.length();

    if distance > 0.0 {
        if distance >= radius {
            return None;
        }
        return Some(CollisionInfo {
            normal: to_box / distance,
            depth: radius - distance,
            point: closest,
        });
    }

    // Center is inside the box (or on its boundary)
    let offset = center - box_center;
    let overlap_x = half_extents.x - offset.x.abs();
    let overlap_y = half_extents.y - offset.y.abs();
    let (away, point) = if overlap_x < overlap_y {
        let sign = axis_sign(offset.x);
        (
            Vec2::new(sign, 0.0),
            Vec2::new(box_center.x + sign * half_extents.x, center.y),
        )
    } else {
        let sign = axis_sign(offset.y);
        (
            Vec2::new(0.0, sign),
            Vec2::new(center.x, box_center.y + sign * half_extents.y),
        )
    };

    if radius <= 0.0 {
        return None;
    }
    Some(CollisionInfo {
        normal: -away,
        depth: radius,
        point,
    })
}

/// Axis-aligned box against circle
///
/// Delegates to [`circle_box`] and negates the normal so it still points
/// from the first argument (the box) toward the second (the circle).
pub fn box_circle(box_center: Vec2, half_extents: Vec2, center: Vec2, radius: f64) -> Option<CollisionInfo> {
    circle_box(center, radius, box_center, half_extents).map(|info| info.flipped())
}

fn axis_sign(value: f64) -> f64 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_circle_circle_overlap() {
        let info = circle_circle(Vec2::new(0.0, 0.0), 10.0, Vec2::new(0.0, 15.0), 10.0).unwrap();
        assert_eq!(info.normal, Vec2::new(0.0, 1.0));
        assert_eq!(info.depth, 5.0);
        assert_eq!(info.point, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_circle_circle_touching_is_not_collision() {
        assert!(circle_circle(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0).is_none());
        assert!(circle_circle(Vec2::ZERO, 1.0, Vec2::new(3.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_circle_circle_coincident_fallback() {
        let info = circle_circle(Vec2::new(4.0, 4.0), 2.0, Vec2::new(4.0, 4.0), 3.0).unwrap();
        assert_eq!(info.normal, FALLBACK_NORMAL);
        assert_eq!(info.depth, 5.0);
    }

    #[test]
    fn test_box_box_picks_smaller_overlap_axis() {
        // Overlap x = 2, overlap y = 9 -> horizontal normal
        let info = box_box(Vec2::ZERO, Vec2::new(5.0, 5.0), Vec2::new(8.0, 1.0), Vec2::new(5.0, 5.0)).unwrap();
        assert_eq!(info.normal, Vec2::new(1.0, 0.0));
        assert!((info.depth - 2.0).abs() < EPS);
        assert_eq!(info.point, Vec2::new(3.0, 1.0));

        // Overlap x = 9, overlap y = 3 -> vertical normal, B above A
        let info = box_box(Vec2::ZERO, Vec2::new(5.0, 5.0), Vec2::new(-1.0, -7.0), Vec2::new(5.0, 5.0)).unwrap();
        assert_eq!(info.normal, Vec2::new(0.0, -1.0));
        assert!((info.depth - 3.0).abs() < EPS);
    }

    #[test]
    fn test_box_box_separated() {
        assert!(box_box(Vec2::ZERO, Vec2::ONE, Vec2::new(2.0, 0.0), Vec2::ONE).is_none());
        assert!(box_box(Vec2::ZERO, Vec2::ONE, Vec2::new(0.5, 5.0), Vec2::ONE).is_none());
    }

    #[test]
    fn test_box_box_contained() {
        // Small box fully inside a big one: overlap is the small box's extent
        let info = box_box(Vec2::ZERO, Vec2::new(10.0, 10.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 2.0)).unwrap();
        assert_eq!(info.normal, Vec2::new(1.0, 0.0));
        assert_eq!(info.depth, 2.0);
    }

    #[test]
    fn test_circle_box_outside_center() {
        // Circle above the box (y-down), bottom of circle penetrates the top face by 2
        let info = circle_box(Vec2::new(0.0, 87.0), 10.0, Vec2::new(0.0, 100.0), Vec2::new(50.0, 5.0)).unwrap();
        assert_eq!(info.normal, Vec2::new(0.0, 1.0));
        assert!((info.depth - 2.0).abs() < EPS);
        assert_eq!(info.point, Vec2::new(0.0, 95.0));
    }

    #[test]
    fn test_circle_box_corner() {
        let info = circle_box(Vec2::new(13.0, 14.0), 6.0, Vec2::ZERO, Vec2::new(10.0, 10.0)).unwrap();
        assert!(info.normal.approx_eq(Vec2::new(-0.6, -0.8), EPS));
        assert!((info.depth - 1.0).abs() < EPS);
        assert_eq!(info.point, Vec2::new(10.0, 10.0));

        assert!(circle_box(Vec2::new(13.0, 14.0), 5.0, Vec2::ZERO, Vec2::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_circle_box_center_inside() {
        // Center 1 unit below the box's top face: the closest point is the
        // center itself, so the depth is just the radius
        let info = circle_box(Vec2::new(2.0, -4.0), 3.0, Vec2::ZERO, Vec2::new(10.0, 5.0)).unwrap();
        assert_eq!(info.normal, Vec2::new(0.0, 1.0));
        assert_eq!(info.depth, 3.0);
        assert_eq!(info.point, Vec2::new(2.0, -5.0));
    }

    #[test]
    fn test_box_circle_negates_circle_box() {
        let c = Vec2::new(12.0, 1.0);
        let b = Vec2::ZERO;
        let h = Vec2::new(10.0, 10.0);
        let cb = circle_box(c, 3.0, b, h).unwrap();
        let bc = box_circle(b, h, c, 3.0).unwrap();
        assert_eq!(bc.normal, -cb.normal);
        assert_eq!(bc.normal, Vec2::new(1.0, 0.0));
        assert_eq!(bc.depth, cb.depth);
        assert_eq!(bc.point, cb.point);
    }

    #[test]
    fn test_dispatch_matches_direct_calls() {
        let circle = WorldShape::Circle { center: Vec2::new(0.0, 0.0), radius: 2.0 };
        let aabb = WorldShape::Aabb { center: Vec2::new(3.0, 0.0), half_extents: Vec2::new(2.0, 2.0) };
        assert_eq!(
            check_collision(&circle, &aabb),
            circle_box(Vec2::ZERO, 2.0, Vec2::new(3.0, 0.0), Vec2::new(2.0, 2.0))
        );
        assert_eq!(
            check_collision(&aabb, &circle).map(|i| i.normal),
            Some(Vec2::new(-1.0, 0.0))
        );
    }
}
