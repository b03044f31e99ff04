//! Subdivision of circular and elliptic arcs.
//!
//! The angle covered by one segment is chosen so that the distance between the arc
//! and its chord stays within the tolerance once the arc is scaled to device space:
//!
//! ```text
//! θ = 2·acos(scale·r / (scale·r + tolerance))
//! ```
//!
//! A half turn is approximated with `max(2, ceil(π / θ))` segments and arcs of any other
//! sweep use the same density, so larger (or more zoomed-in) arcs get proportionally
//! more points.

use crate::math::*;
use core::f32::consts::PI;

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Upper bound on the number of segments used for a half turn.
pub const MAX_HALF_TURN_SEGMENTS: u32 = 512;

/// Angle covered by each segment of an arc of the given radius.
#[inline]
pub fn subdivision_angle(radius: f32, scale: f32, tolerance: f32) -> f32 {
    let r = scale.abs() * radius.abs();
    let denom = r + tolerance.abs();
    if denom <= 0.0 {
        return PI;
    }

    2.0 * (r / denom).acos()
}

/// Number of segments used to approximate half a circle.
pub fn half_turn_segments(radius: f32, scale: f32, tolerance: f32) -> u32 {
    let theta = subdivision_angle(radius, scale, tolerance);
    if !(theta > 0.0) {
        return MAX_HALF_TURN_SEGMENTS;
    }

    let n = (PI / theta).ceil();
    if n >= MAX_HALF_TURN_SEGMENTS as f32 {
        return MAX_HALF_TURN_SEGMENTS;
    }

    u32::max(2, n as u32)
}

/// Number of segments used to approximate an arc of the given sweep angle (in radians).
///
/// Always at least one.
pub fn segment_count(sweep: f32, radius: f32, scale: f32, tolerance: f32) -> u32 {
    let per_half_turn = half_turn_segments(radius, scale, tolerance) as f32;
    let n = (per_half_turn * (sweep.abs() / PI)).ceil();

    u32::max(1, n as u32)
}

/// Calls `callback` with the `num_segments + 1` points of an elliptic arc.
///
/// The first point is at `start_angle` and the last one at `start_angle + sweep`,
/// angles are measured from the x axis towards the y axis.
pub fn for_each_arc_point<F>(
    center: Point,
    radii: Vector,
    start_angle: f32,
    sweep: f32,
    num_segments: u32,
    callback: &mut F,
) where
    F: FnMut(Point),
{
    debug_assert!(num_segments > 0);
    let step = sweep / num_segments as f32;
    for i in 0..=num_segments {
        let angle = start_angle + step * i as f32;
        let (sin, cos) = angle.sin_cos();
        callback(point(center.x + radii.x * cos, center.y + radii.y * sin));
    }
}

/// Rotates `v` by `angle` radians.
#[inline]
pub fn rotate(v: Vector, angle: f32) -> Vector {
    let (sin, cos) = angle.sin_cos();
    vector(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[test]
fn test_half_turn_segments_minimum() {
    assert_eq!(half_turn_segments(0.0, 1.0, 0.25), 2);
    assert_eq!(half_turn_segments(0.01, 1.0, 0.25), 2);
    assert_eq!(half_turn_segments(1.0, 1.0, 0.0), MAX_HALF_TURN_SEGMENTS);
}

#[test]
fn test_half_turn_segments_grow_with_radius_and_scale() {
    let mut prev = 0;
    for i in 1..200 {
        let n = half_turn_segments(i as f32 * 0.5, 1.0, 0.25);
        assert!(n >= prev);
        prev = n;
    }
    assert!(prev > 10);

    assert!(half_turn_segments(10.0, 4.0, 0.25) >= half_turn_segments(10.0, 1.0, 0.25));
}

#[test]
fn test_half_turn_segments_grow_as_tolerance_shrinks() {
    let mut prev = 0;
    for i in (1..100).rev() {
        let n = half_turn_segments(20.0, 1.0, i as f32 * 0.01);
        assert!(n >= prev);
        prev = n;
    }
}

#[test]
fn test_segment_count_scales_with_sweep() {
    let half = half_turn_segments(50.0, 1.0, 0.1);
    assert_eq!(segment_count(PI, 50.0, 1.0, 0.1), half);
    assert_eq!(segment_count(-PI, 50.0, 1.0, 0.1), half);
    assert!(segment_count(2.0 * PI, 50.0, 1.0, 0.1) >= 2 * half - 1);
    assert_eq!(segment_count(0.0, 50.0, 1.0, 0.1), 1);
}

#[test]
fn test_arc_points() {
    let mut points = std::vec::Vec::new();
    for_each_arc_point(
        point(1.0, 1.0),
        vector(2.0, 2.0),
        0.0,
        PI * 0.5,
        4,
        &mut |p| points.push(p),
    );

    assert_eq!(points.len(), 5);
    assert!((points[0] - point(3.0, 1.0)).length() < 1e-5);
    assert!((points[4] - point(1.0, 3.0)).length() < 1e-5);
    for p in &points {
        assert!(((*p - point(1.0, 1.0)).length() - 2.0).abs() < 1e-5);
    }
}
