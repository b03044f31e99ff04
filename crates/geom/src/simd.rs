//! 4-wide version of [`extrusion_vector`](crate::kernel::extrusion_vector).
//!
//! Anti-aliased convex fills compute one extrusion vector per polygon vertex, this
//! module processes them four at a time. On x86_64 the lanes are evaluated with SSE
//! (part of the baseline instruction set), other targets evaluate the lanes one by one
//! with the scalar kernel. Both produce the same values as the scalar path: the
//! operations are the same IEEE operations performed in the same order.

use crate::kernel::{extrusion_vector, PARALLEL_THRESHOLD};
use crate::math::*;

/// Computes four extrusion vectors at once.
#[inline]
pub fn extrusion_vector_x4(d01: &[Vector; 4], d12: &[Vector; 4]) -> [Vector; 4] {
    let mut ax = [0.0; 4];
    let mut ay = [0.0; 4];
    let mut bx = [0.0; 4];
    let mut by = [0.0; 4];
    for lane in 0..4 {
        ax[lane] = d01[lane].x;
        ay[lane] = d01[lane].y;
        bx[lane] = d12[lane].x;
        by[lane] = d12[lane].y;
    }

    let (rx, ry) = extrusion_lanes(ax, ay, bx, by);

    [
        vector(rx[0], ry[0]),
        vector(rx[1], ry[1]),
        vector(rx[2], ry[2]),
        vector(rx[3], ry[3]),
    ]
}

/// Computes `output[i] = extrusion_vector(d01[i], d12[i])` for every `i`.
///
/// The three slices must have the same length.
pub fn extrusion_vectors(d01: &[Vector], d12: &[Vector], output: &mut [Vector]) {
    debug_assert_eq!(d01.len(), d12.len());
    debug_assert_eq!(d01.len(), output.len());

    let mut d01_chunks = d01.chunks_exact(4);
    let mut d12_chunks = d12.chunks_exact(4);
    let mut out_chunks = output.chunks_exact_mut(4);
    for ((a, b), out) in (&mut d01_chunks).zip(&mut d12_chunks).zip(&mut out_chunks) {
        let a = [a[0], a[1], a[2], a[3]];
        let b = [b[0], b[1], b[2], b[3]];
        out.copy_from_slice(&extrusion_vector_x4(&a, &b));
    }

    let tail = d01_chunks
        .remainder()
        .iter()
        .zip(d12_chunks.remainder())
        .zip(out_chunks.into_remainder());
    for ((a, b), out) in tail {
        *out = extrusion_vector(*a, *b);
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn extrusion_lanes(ax: [f32; 4], ay: [f32; 4], bx: [f32; 4], by: [f32; 4]) -> ([f32; 4], [f32; 4]) {
    use core::arch::x86_64::*;

    let mut rx = [0.0; 4];
    let mut ry = [0.0; 4];

    // SAFETY: SSE is part of the x86_64 baseline, and every load and store goes through
    // a local array of exactly four floats.
    unsafe {
        let ax = _mm_loadu_ps(ax.as_ptr());
        let ay = _mm_loadu_ps(ay.as_ptr());
        let bx = _mm_loadu_ps(bx.as_ptr());
        let by = _mm_loadu_ps(by.as_ptr());
        let sign_bit = _mm_set1_ps(-0.0);

        // cross(d12, d01)
        let c = _mm_sub_ps(_mm_mul_ps(bx, ay), _mm_mul_ps(by, ax));

        let exact_x = _mm_div_ps(_mm_sub_ps(ax, bx), c);
        let exact_y = _mm_div_ps(_mm_sub_ps(ay, by), c);

        // perp_ccw(d01)
        let fallback_x = _mm_xor_ps(ay, sign_bit);
        let fallback_y = ax;

        let abs_c = _mm_andnot_ps(sign_bit, c);
        let parallel = _mm_cmplt_ps(abs_c, _mm_set1_ps(PARALLEL_THRESHOLD));

        let x = _mm_or_ps(
            _mm_and_ps(parallel, fallback_x),
            _mm_andnot_ps(parallel, exact_x),
        );
        let y = _mm_or_ps(
            _mm_and_ps(parallel, fallback_y),
            _mm_andnot_ps(parallel, exact_y),
        );

        _mm_storeu_ps(rx.as_mut_ptr(), x);
        _mm_storeu_ps(ry.as_mut_ptr(), y);
    }

    (rx, ry)
}

#[cfg(not(target_arch = "x86_64"))]
#[inline]
fn extrusion_lanes(ax: [f32; 4], ay: [f32; 4], bx: [f32; 4], by: [f32; 4]) -> ([f32; 4], [f32; 4]) {
    let mut rx = [0.0; 4];
    let mut ry = [0.0; 4];
    for lane in 0..4 {
        let v = extrusion_vector(vector(ax[lane], ay[lane]), vector(bx[lane], by[lane]));
        rx[lane] = v.x;
        ry[lane] = v.y;
    }

    (rx, ry)
}

#[cfg(test)]
fn unit(angle: f32) -> Vector {
    vector(angle.cos(), angle.sin())
}

#[test]
fn simd_matches_scalar() {
    use std::vec::Vec;

    // Sweep through every pair of directions on a coarse grid of angles, including
    // the parallel and anti-parallel cases that take the fallback.
    let mut d01 = Vec::new();
    let mut d12 = Vec::new();
    for i in 0..24 {
        for j in 0..24 {
            let a = i as f32 * core::f32::consts::PI / 12.0;
            let b = j as f32 * core::f32::consts::PI / 12.0;
            d01.push(unit(a));
            d12.push(unit(b));
        }
    }
    // A few degenerate inputs.
    d01.push(Vector::zero());
    d12.push(vector(1.0, 0.0));
    d01.push(vector(0.0, 1.0));
    d12.push(vector(0.0, 1.00001));

    let mut output = std::vec![Vector::zero(); d01.len()];
    extrusion_vectors(&d01, &d12, &mut output);

    for i in 0..d01.len() {
        let expected = extrusion_vector(d01[i], d12[i]);
        let actual = output[i];
        let epsilon = 1e-5 * expected.length().max(1.0);
        assert!(
            (expected - actual).length() <= epsilon,
            "lane {}: {:?} != {:?} (d01 {:?}, d12 {:?})",
            i,
            actual,
            expected,
            d01[i],
            d12[i]
        );
    }
}

#[test]
fn simd_handles_tails() {
    for len in 0..9 {
        let d01: std::vec::Vec<Vector> = (0..len).map(|i| unit(i as f32)).collect();
        let d12: std::vec::Vec<Vector> = (0..len).map(|i| unit(i as f32 * 2.0 + 0.5)).collect();
        let mut output = std::vec![vector(f32::NAN, f32::NAN); len];
        extrusion_vectors(&d01, &d12, &mut output);
        for i in 0..len {
            let expected = extrusion_vector(d01[i], d12[i]);
            assert!((output[i] - expected).length() <= 1e-5 * expected.length().max(1.0));
        }
    }
}
