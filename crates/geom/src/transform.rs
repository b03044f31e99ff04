//! Bulk affine transformation of point arrays.
//!
//! Paths are usually flattened in local space and transformed to device space before
//! being stroked. [`transform_points`] does this for a whole vertex buffer at once,
//! two points per SSE register on x86_64. [`transform_points_scalar`] is the reference
//! implementation and produces the same results as `Transform::transform_point`.

use crate::math::*;

/// Transforms every point of `points` in place.
pub fn transform_points(transform: &Transform, points: &mut [Point]) {
    let coords: &mut [f32] = bytemuck::cast_slice_mut(points);

    let mut pairs = coords.chunks_exact_mut(4);
    for pair in &mut pairs {
        transform_pair(transform, pair);
    }

    let rem = pairs.into_remainder();
    if rem.len() == 2 {
        let p = transform.transform_point(point(rem[0], rem[1]));
        rem[0] = p.x;
        rem[1] = p.y;
    }
}

/// Writes the transformed `src` points into `dst`.
///
/// Both slices must have the same length.
pub fn transform_points_to(transform: &Transform, src: &[Point], dst: &mut [Point]) {
    debug_assert_eq!(src.len(), dst.len());
    dst.copy_from_slice(src);
    transform_points(transform, dst);
}

/// Reference implementation of [`transform_points`].
pub fn transform_points_scalar(transform: &Transform, points: &mut [Point]) {
    for p in points {
        *p = transform.transform_point(*p);
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn transform_pair(t: &Transform, pair: &mut [f32]) {
    use core::arch::x86_64::*;

    debug_assert_eq!(pair.len(), 4);

    // SAFETY: SSE is part of the x86_64 baseline, and `pair` holds exactly four floats.
    unsafe {
        let p = _mm_loadu_ps(pair.as_ptr());
        // [x0, x0, x1, x1] and [y0, y0, y1, y1]
        let xs = _mm_shuffle_ps(p, p, 0b10_10_00_00);
        let ys = _mm_shuffle_ps(p, p, 0b11_11_01_01);

        let col_x = _mm_setr_ps(t.m11, t.m12, t.m11, t.m12);
        let col_y = _mm_setr_ps(t.m21, t.m22, t.m21, t.m22);
        let offset = _mm_setr_ps(t.m31, t.m32, t.m31, t.m32);

        let result = _mm_add_ps(
            _mm_add_ps(_mm_mul_ps(xs, col_x), _mm_mul_ps(ys, col_y)),
            offset,
        );

        _mm_storeu_ps(pair.as_mut_ptr(), result);
    }
}

#[cfg(not(target_arch = "x86_64"))]
#[inline]
fn transform_pair(t: &Transform, pair: &mut [f32]) {
    let a = t.transform_point(point(pair[0], pair[1]));
    let b = t.transform_point(point(pair[2], pair[3]));
    pair[0] = a.x;
    pair[1] = a.y;
    pair[2] = b.x;
    pair[3] = b.y;
}

#[cfg(test)]
fn test_points(n: usize) -> std::vec::Vec<Point> {
    (0..n)
        .map(|i| point(i as f32 * 1.5 - 3.0, (i * i) as f32 * 0.25 + 1.0))
        .collect()
}

#[test]
fn batch_transform_matches_scalar() {
    let transform = Transform::new(1.5, 0.25, -0.75, 2.0, 10.0, -4.0);

    for n in 0..11 {
        let mut batch = test_points(n);
        let mut scalar = test_points(n);
        transform_points(&transform, &mut batch);
        transform_points_scalar(&transform, &mut scalar);

        for (a, b) in batch.iter().zip(scalar.iter()) {
            assert!((*a - *b).length() < 1e-5, "{:?} != {:?}", a, b);
        }
    }
}

#[test]
fn batch_transform_to() {
    let transform = Transform::scale(2.0, 3.0).then_translate(vector(1.0, 1.0));
    let src = test_points(5);
    let mut dst = std::vec![Point::zero(); 5];
    transform_points_to(&transform, &src, &mut dst);

    for (s, d) in src.iter().zip(dst.iter()) {
        assert!((point(s.x * 2.0 + 1.0, s.y * 3.0 + 1.0) - *d).length() < 1e-5);
    }
}

#[test]
fn identity_transform_is_exact() {
    let src = test_points(7);
    let mut points = src.clone();
    transform_points(&Transform::identity(), &mut points);
    assert_eq!(points, src);
}
