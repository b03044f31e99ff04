//! Vector helpers and the offset math shared by strokes and anti-aliasing fringes.
//!
//! Orientation conventions: `perp_ccw` rotates a vector by +90° (`(x, y) -> (-y, x)`),
//! which in a y-up frame is the left of the direction of travel. Every extrusion
//! vector computed here points to that side; the right side is obtained by negating it.

use crate::math::*;

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Squared distance under which two points are considered coincident.
pub const EPSILON_SQ: f32 = 1.0e-6;

/// Below this absolute cross product, two unit directions are treated as parallel
/// and the exact offset intersection is not computed.
pub const PARALLEL_THRESHOLD: f32 = 1.0e-4;

#[inline]
pub fn add(a: Vector, b: Vector) -> Vector {
    a + b
}

#[inline]
pub fn sub(a: Vector, b: Vector) -> Vector {
    a - b
}

#[inline]
pub fn scale(v: Vector, s: f32) -> Vector {
    v * s
}

/// Rotates `v` by -90°.
#[inline]
pub fn perp_cw(v: Vector) -> Vector {
    vector(v.y, -v.x)
}

/// Rotates `v` by +90°.
#[inline]
pub fn perp_ccw(v: Vector) -> Vector {
    vector(-v.y, v.x)
}

#[inline]
pub fn cross(a: Vector, b: Vector) -> f32 {
    a.x * b.y - a.y * b.x
}

#[inline]
pub fn dot(a: Vector, b: Vector) -> f32 {
    a.x * b.x + a.y * b.y
}

/// Normalized direction from `a` to `b`.
///
/// Returns the zero vector if the two points are closer than the coincidence
/// threshold.
#[inline]
pub fn direction(a: Point, b: Point) -> Vector {
    let d = b - a;
    let sq_len = d.square_length();
    if sq_len < EPSILON_SQ {
        return Vector::zero();
    }

    d / sq_len.sqrt()
}

/// Offset of a unit-width stroke at the vertex shared by two segments.
///
/// `d01` and `d12` are the normalized directions of the incoming and outgoing
/// segments. The result is the intersection of the two lines parallel to the
/// segments at distance 1 on their left side, relative to the shared vertex.
/// Multiplying it by a half width gives the miter point of a stroke of that width.
///
/// If the segments are almost parallel the intersection is numerically unstable,
/// the left normal of `d01` is returned instead.
#[inline]
pub fn extrusion_vector(d01: Vector, d12: Vector) -> Vector {
    let c = cross(d12, d01);
    if c.abs() < PARALLEL_THRESHOLD {
        return perp_ccw(d01);
    }

    (d01 - d12) / c
}

/// Signed area of the triangle `(a, b, c)`, times two.
#[inline]
pub fn signed_area2(a: Point, b: Point, c: Point) -> f32 {
    cross(b - a, c - a)
}

/// Twice the signed area of a closed polygon.
///
/// Positive for counter-clockwise polygons in a y-up frame.
pub fn polygon_signed_area2(points: &[Point]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let mut prev = points[n - 1];
    for &p in points {
        area += prev.x * p.y - p.x * prev.y;
        prev = p;
    }

    area
}

#[cfg(test)]
fn assert_almost_eq(a: Vector, b: Vector) {
    if (a - b).square_length() > 0.00001 {
        panic!("assert almost equal: {:?} != {:?}", a, b);
    }
}

#[test]
fn test_perpendiculars() {
    assert_eq!(perp_ccw(vector(1.0, 0.0)), vector(0.0, 1.0));
    assert_eq!(perp_cw(vector(1.0, 0.0)), vector(0.0, -1.0));
    assert_eq!(perp_cw(perp_ccw(vector(3.0, -2.0))), vector(3.0, -2.0));
}

#[test]
fn test_direction() {
    assert_almost_eq(direction(point(1.0, 1.0), point(4.0, 5.0)), vector(0.6, 0.8));
    assert_eq!(direction(point(1.0, 1.0), point(1.0, 1.0)), Vector::zero());
    assert_eq!(direction(point(1.0, 1.0), point(1.0001, 1.0)), Vector::zero());
}

#[test]
fn test_extrusion_vector() {
    // Left turn: the left side is the inside of the corner.
    assert_almost_eq(
        extrusion_vector(vector(1.0, 0.0), vector(0.0, 1.0)),
        vector(-1.0, 1.0),
    );
    // Right turn.
    assert_almost_eq(
        extrusion_vector(vector(1.0, 0.0), vector(0.0, -1.0)),
        vector(1.0, 1.0),
    );
    // Straight line.
    assert_almost_eq(
        extrusion_vector(vector(1.0, 0.0), vector(1.0, 0.0)),
        vector(0.0, 1.0),
    );
    // U-turn.
    assert_almost_eq(
        extrusion_vector(vector(1.0, 0.0), vector(-1.0, 0.0)),
        vector(0.0, 1.0),
    );
}

#[test]
fn test_extrusion_vector_is_at_unit_distance() {
    let d01 = vector(3.0, 1.0).normalize();
    let d12 = vector(-1.0, 2.0).normalize();
    let v = extrusion_vector(d01, d12);

    assert!((dot(v, perp_ccw(d01)) - 1.0).abs() < 1e-5);
    assert!((dot(v, perp_ccw(d12)) - 1.0).abs() < 1e-5);
}

#[test]
fn test_polygon_area() {
    let square = [
        point(0.0, 0.0),
        point(2.0, 0.0),
        point(2.0, 2.0),
        point(0.0, 2.0),
    ];
    assert_eq!(polygon_signed_area2(&square), 8.0);

    let mut reversed = square;
    reversed.reverse();
    assert_eq!(polygon_signed_area2(&reversed), -8.0);
}
