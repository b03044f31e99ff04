use crate::color::{pack_rgba, PackedColor, TRANSPARENT};
use crate::geom::arc;
use crate::math::*;
use crate::path::Path;
use crate::{LineCap, LineJoin, Mesh, StrokeStyle, Stroker, StrokerOptions, TessellationError};

use core::f32::consts::{FRAC_PI_2, PI};

const RED: PackedColor = pack_rgba(255, 0, 0, 255);

fn check_mesh(mesh: &Mesh) {
    assert_eq!(mesh.indices.len() % 3, 0);
    for idx in mesh.indices {
        assert!((*idx as usize) < mesh.vertex_count(), "index {} out of bounds", idx);
    }
    if let Some(colors) = mesh.colors {
        assert_eq!(colors.len(), mesh.vertex_count());
    }
}

fn area(mesh: &Mesh) -> f32 {
    mesh.triangles()
        .map(|[a, b, c]| ((b - a).cross(c - a) * 0.5).abs())
        .sum()
}

fn assert_approx_eq(a: f32, b: f32, epsilon: f32) {
    assert!((a - b).abs() <= epsilon, "{} != {}", a, b);
}

fn contains(positions: &[Point], p: Point) -> bool {
    positions.iter().any(|v| (*v - p).square_length() < 1e-8)
}

fn segment() -> [Point; 2] {
    [point(0.0, 0.0), point(10.0, 0.0)]
}

#[test]
fn test_open_butt_segment() {
    let mut stroker = Stroker::new();
    let mesh = stroker.stroke(&segment(), false, &StrokeStyle::new(2.0)).unwrap();

    check_mesh(&mesh);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert!(mesh.colors.is_none());
    assert_eq!(
        mesh.positions,
        &[point(0.0, 1.0), point(0.0, -1.0), point(10.0, 1.0), point(10.0, -1.0)]
    );
    assert_approx_eq(area(&mesh), 20.0, 1e-4);
}

#[test]
fn test_square_cap_extends_by_half_width() {
    let mut stroker = Stroker::new();
    let style = StrokeStyle::new(2.0).with_line_cap(LineCap::Square);
    let mesh = stroker.stroke(&segment(), false, &style).unwrap();

    check_mesh(&mesh);
    assert_eq!(mesh.vertex_count(), 4);
    assert!(contains(mesh.positions, point(-1.0, 1.0)));
    assert!(contains(mesh.positions, point(-1.0, -1.0)));
    assert!(contains(mesh.positions, point(11.0, 1.0)));
    assert!(contains(mesh.positions, point(11.0, -1.0)));
    assert_approx_eq(area(&mesh), 24.0, 1e-4);
}

#[test]
fn test_round_caps() {
    let mut stroker = Stroker::new();
    let style = StrokeStyle::new(20.0).with_line_cap(LineCap::Round);
    let mesh = stroker.stroke(&segment(), false, &style).unwrap();

    let n = arc::segment_count(PI, 10.0, 1.0, 0.25) as usize;
    check_mesh(&mesh);
    // A center vertex and an arc of n + 1 vertices per cap.
    assert_eq!(mesh.vertex_count(), 2 * (n + 2));
    assert_eq!(mesh.triangle_count(), 2 * n + 2);

    for p in mesh.positions {
        let d = if p.x < 0.0 {
            p.to_vector().length()
        } else if p.x > 10.0 {
            (*p - point(10.0, 0.0)).length()
        } else {
            continue;
        };
        assert!(d <= 10.0 + 1e-3);
    }

    let exact = 200.0 + PI * 100.0;
    let a = area(&mesh);
    assert!(a <= exact);
    assert!(a >= exact - 2.0 * PI * 10.0 * 0.25);
}

#[test]
fn test_round_cap_density_grows_with_width() {
    let mut stroker = Stroker::new();
    let mut prev_vertices = 0;
    for i in 1..100 {
        let style = StrokeStyle::new(i as f32).with_line_cap(LineCap::Round);
        let mesh = stroker.stroke(&segment(), false, &style).unwrap();
        check_mesh(&mesh);
        assert!(mesh.vertex_count() >= prev_vertices);
        prev_vertices = mesh.vertex_count();
    }
}

#[test]
fn test_round_join_density_grows_when_tolerance_shrinks() {
    let points = [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)];
    let style = StrokeStyle::new(8.0).with_line_join(LineJoin::Round);

    let mut stroker = Stroker::new();
    let mut prev_triangles = 0;
    for tolerance in [1.0, 0.5, 0.25, 0.1, 0.05, 0.01] {
        stroker.set_options(StrokerOptions::tolerance(tolerance));
        let mesh = stroker.stroke(&points, false, &style).unwrap();
        check_mesh(&mesh);
        assert!(mesh.triangle_count() >= prev_triangles);
        prev_triangles = mesh.triangle_count();
    }

    // Zooming in has the same effect as a smaller tolerance.
    stroker.set_options(StrokerOptions::tolerance(0.25).with_scale(4.0));
    let zoomed = stroker.stroke(&points, false, &style).unwrap().triangle_count();
    stroker.set_options(StrokerOptions::tolerance(0.0625));
    let fine = stroker.stroke(&points, false, &style).unwrap().triangle_count();
    assert_eq!(zoomed, fine);
}

#[test]
fn test_bevel_join() {
    let mut stroker = Stroker::new();
    let points = [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)];
    let style = StrokeStyle::new(2.0).with_line_join(LineJoin::Bevel);
    let mesh = stroker.stroke(&points, false, &style).unwrap();

    check_mesh(&mesh);
    // Two caps, two outer vertices and one inner vertex at the corner.
    assert_eq!(mesh.vertex_count(), 7);
    assert_eq!(mesh.triangle_count(), 5);
    // The polyline turns left, the outer side is on the right.
    assert!(contains(mesh.positions, point(10.0, -1.0)));
    assert!(contains(mesh.positions, point(11.0, 0.0)));
    assert!(contains(mesh.positions, point(9.0, 1.0)));
    assert!(!contains(mesh.positions, point(11.0, -1.0)));
}

#[test]
fn test_round_join() {
    let mut stroker = Stroker::new();
    let points = [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)];
    let style = StrokeStyle::new(2.0).with_line_join(LineJoin::Round);
    let mesh = stroker.stroke(&points, false, &style).unwrap();

    let n = arc::segment_count(FRAC_PI_2, 1.0, 1.0, 0.25) as usize;
    check_mesh(&mesh);
    assert_eq!(mesh.vertex_count(), n + 6);
    assert_eq!(mesh.triangle_count(), n + 4);

    // Arc vertices stay on the circle around the corner.
    for p in mesh.positions {
        if p.x > 10.0 && p.y < 0.0 {
            assert_approx_eq((*p - point(10.0, 0.0)).length(), 1.0, 1e-4);
        }
    }
}

#[test]
fn test_miter_join_is_not_clamped() {
    let mut stroker = Stroker::new();
    // A very sharp turn.
    let points = [point(0.0, 0.0), point(10.0, 0.0), point(0.0, 1.0)];
    let mesh = stroker.stroke(&points, false, &StrokeStyle::new(2.0)).unwrap();

    check_mesh(&mesh);
    assert_eq!(mesh.vertex_count(), 6);
    assert!(mesh.positions.iter().any(|p| p.x > 20.0));
}

#[test]
fn test_straight_join_uses_a_single_slice() {
    let mut stroker = Stroker::new();
    let points = [point(0.0, 0.0), point(5.0, 0.0), point(10.0, 0.0)];
    for join in [LineJoin::Miter, LineJoin::Round, LineJoin::Bevel] {
        let style = StrokeStyle::new(2.0).with_line_join(join);
        let mesh = stroker.stroke(&points, false, &style).unwrap();
        check_mesh(&mesh);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 4);
        assert!(contains(mesh.positions, point(5.0, 1.0)));
        assert!(contains(mesh.positions, point(5.0, -1.0)));
    }
}

#[test]
fn test_closed_square_miter() {
    let mut stroker = Stroker::new();
    let square = [point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)];
    let mesh = stroker.stroke(&square, true, &StrokeStyle::new(2.0)).unwrap();

    check_mesh(&mesh);
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.index_count(), 24);
    for corner in [
        point(-1.0, -1.0),
        point(2.0, -1.0),
        point(2.0, 2.0),
        point(-1.0, 2.0),
    ] {
        assert!(contains(mesh.positions, corner), "missing {:?}", corner);
    }
}

#[test]
fn test_closed_square_round_join() {
    let mut stroker = Stroker::new();
    let square = [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0), point(0.0, 10.0)];
    let style = StrokeStyle::new(2.0).with_line_join(LineJoin::Round);
    let mesh = stroker.stroke(&square, true, &style).unwrap();

    let n = arc::segment_count(FRAC_PI_2, 1.0, 1.0, 0.25) as usize;
    check_mesh(&mesh);
    assert_eq!(mesh.vertex_count(), 4 * (n + 2));
    assert_eq!(mesh.triangle_count(), 8 + 4 * n);
}

#[test]
fn test_closing_point_is_ignored() {
    let mut stroker = Stroker::new();
    let square = [point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)];
    let expected = stroker
        .stroke(&square, true, &StrokeStyle::new(2.0))
        .unwrap()
        .to_buffers();

    let repeated = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
        point(0.0, 0.0),
    ];
    let mesh = stroker.stroke(&repeated, true, &StrokeStyle::new(2.0)).unwrap();
    assert_eq!(mesh.to_buffers(), expected);
}

#[test]
fn test_closed_with_two_points_is_open() {
    let mut stroker = Stroker::new();
    let style = StrokeStyle::new(2.0);
    let open = stroker.stroke(&segment(), false, &style).unwrap().to_buffers();
    let closed = stroker.stroke(&segment(), true, &style).unwrap().to_buffers();
    assert_eq!(open, closed);
}

#[test]
fn test_degenerate_input() {
    let mut stroker = Stroker::new();
    let style = StrokeStyle::new(2.0).with_line_cap(LineCap::Round);

    assert!(stroker.stroke(&[], false, &style).unwrap().is_empty());
    assert!(stroker.stroke(&[point(1.0, 1.0)], false, &style).unwrap().is_empty());
    assert!(stroker.stroke(&[point(1.0, 1.0)], true, &style).unwrap().is_empty());

    let same = [point(1.0, 1.0), point(1.0, 1.0), point(1.0, 1.0)];
    let mesh = stroker.stroke(&same, false, &style).unwrap();
    assert!(mesh.is_empty());
    assert_eq!(mesh.vertex_count(), 0);

    let mesh = stroker.stroke_aa(&same, true, &style, RED).unwrap();
    assert!(mesh.is_empty());
}

#[test]
fn test_consecutive_duplicates() {
    let mut stroker = Stroker::new();
    let style = StrokeStyle::new(2.0);
    let expected = stroker.stroke(&segment(), false, &style).unwrap().to_buffers();

    let points = [
        point(0.0, 0.0),
        point(0.0, 0.0),
        point(0.0, 0.0001),
        point(10.0, 0.0),
        point(10.0, 0.0),
    ];
    let mesh = stroker.stroke(&points, false, &style).unwrap();
    assert_eq!(mesh.vertex_count(), expected.positions.len());
    assert_eq!(mesh.indices, &expected.indices[..]);
}

#[test]
fn test_anti_aliased_segment() {
    let mut stroker = Stroker::new();
    let mesh = stroker.stroke_aa(&segment(), false, &StrokeStyle::new(4.0), RED).unwrap();

    check_mesh(&mesh);
    // Each cap has a cross section and a transparent slice past the end.
    assert_eq!(mesh.vertex_count(), 16);
    assert_eq!(mesh.triangle_count(), 18);

    let colors = mesh.colors.unwrap();
    let expected_colors = [TRANSPARENT, RED, RED, TRANSPARENT];
    assert_eq!(&colors[..4], &expected_colors);
    assert_eq!(&colors[4..8], &[TRANSPARENT; 4]);
    assert_eq!(&colors[8..12], &expected_colors);
    assert_eq!(&colors[12..], &[TRANSPARENT; 4]);

    let ys: Vec<f32> = mesh.positions[..4].iter().map(|p| p.y).collect();
    assert_eq!(ys, [3.0, 2.0, -2.0, -3.0]);
    let ys: Vec<f32> = mesh.positions[4..8].iter().map(|p| p.y).collect();
    assert_eq!(ys, [3.0, 2.0, -2.0, -3.0]);
    for p in &mesh.positions[4..8] {
        assert_eq!(p.x, -1.0);
    }
    for p in &mesh.positions[12..] {
        assert_eq!(p.x, 11.0);
    }

    // The opaque part covers the stroke, the fringe adds a band of width 1 around it.
    assert_approx_eq(area(&mesh), 12.0 * 6.0, 1e-3);
}

#[test]
fn test_anti_aliased_square_caps_fade_out() {
    let mut stroker = Stroker::new();
    let style = StrokeStyle::new(4.0).with_line_cap(LineCap::Square);
    let mesh = stroker.stroke_aa(&segment(), false, &style, RED).unwrap();
    check_mesh(&mesh);

    let colors = mesh.colors.unwrap();
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    for (p, c) in mesh.positions.iter().zip(colors) {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        if *c == RED {
            assert!(p.x >= -2.0 && p.x <= 12.0);
            assert!(p.y.abs() <= 2.0);
        }
    }
    assert_eq!(min_x, -3.0);
    assert_eq!(max_x, 13.0);

    // No opaque vertex sits on the outline of the mesh.
    for (p, c) in mesh.positions.iter().zip(colors) {
        if p.x == -3.0 || p.x == 13.0 || p.y.abs() == 3.0 {
            assert_eq!(*c, TRANSPARENT);
        }
    }
    assert_approx_eq(area(&mesh), 16.0 * 6.0, 1e-3);
}

#[test]
fn test_anti_aliased_round_cap_and_join() {
    let mut stroker = Stroker::new();
    let points = [point(0.0, 0.0), point(20.0, 0.0), point(20.0, 20.0)];
    let style = StrokeStyle::new(6.0)
        .with_line_cap(LineCap::Round)
        .with_line_join(LineJoin::Round);
    let mesh = stroker.stroke_aa(&points, false, &style, RED).unwrap();
    check_mesh(&mesh);

    let colors = mesh.colors.unwrap();
    for (p, c) in mesh.positions.iter().zip(colors) {
        let d = distance_to_polyline(*p, &points);
        if *c == TRANSPARENT {
            assert_approx_eq(d, 4.0, 1e-3);
        } else {
            assert_eq!(*c, RED);
            assert!(d <= 3.0 + 1e-3);
        }
    }
}

fn distance_to_polyline(p: Point, points: &[Point]) -> f32 {
    points
        .windows(2)
        .map(|w| {
            let (a, b) = (w[0], w[1]);
            let ab = b - a;
            let t = ((p - a).dot(ab) / ab.square_length()).max(0.0).min(1.0);
            (p - (a + ab * t)).length()
        })
        .fold(f32::MAX, f32::min)
}

#[test]
fn test_thin_stroke() {
    let mut stroker = Stroker::new();
    let mesh = stroker.stroke_aa(&segment(), false, &StrokeStyle::new(0.5), RED).unwrap();

    check_mesh(&mesh);
    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.triangle_count(), 4);
    assert_eq!(
        mesh.colors.unwrap(),
        &[TRANSPARENT, RED, TRANSPARENT, TRANSPARENT, RED, TRANSPARENT]
    );
    assert_eq!(mesh.positions[0], point(0.0, 1.0));
    assert_eq!(mesh.positions[1], point(0.0, 0.0));
    assert_eq!(mesh.positions[2], point(0.0, -1.0));
}

#[test]
fn test_thin_stroke_width_equal_to_fringe() {
    let mut stroker = Stroker::with_options(StrokerOptions::DEFAULT.with_fringe_width(2.0));
    let mesh = stroker.stroke_aa(&segment(), false, &StrokeStyle::new(2.0), RED).unwrap();
    assert_eq!(mesh.vertex_count(), 6);

    let mesh = stroker.stroke_aa(&segment(), false, &StrokeStyle::new(2.5), RED).unwrap();
    assert_eq!(mesh.vertex_count(), 16);
}

#[test]
fn test_thin_stroke_bevel_join() {
    let mut stroker = Stroker::new();
    let points = [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)];
    let style = StrokeStyle::new(0.5).with_line_join(LineJoin::Bevel);
    let mesh = stroker.stroke_aa(&points, false, &style, RED).unwrap();

    check_mesh(&mesh);
    // Caps: 3 + 3, join: 2 on the outer ring, 1 on the center and inner rings.
    assert_eq!(mesh.vertex_count(), 10);
    assert_eq!(mesh.triangle_count(), 9);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic]
fn test_thin_stroke_round_cap_panics() {
    let mut stroker = Stroker::new();
    let style = StrokeStyle::new(0.5).with_line_cap(LineCap::Round);
    let _ = stroker.stroke_aa(&segment(), false, &style, RED);
}

#[cfg(not(debug_assertions))]
#[test]
fn test_thin_stroke_round_cap_falls_back_to_butt() {
    let mut stroker = Stroker::new();
    let points = [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)];
    let round = StrokeStyle::new(0.5)
        .with_line_cap(LineCap::Round)
        .with_line_join(LineJoin::Round);
    let fallback = StrokeStyle::new(0.5)
        .with_line_cap(LineCap::Butt)
        .with_line_join(LineJoin::Bevel);

    let expected = stroker.stroke_aa(&points, false, &fallback, RED).unwrap().to_buffers();
    let mesh = stroker.stroke_aa(&points, false, &round, RED).unwrap();
    assert_eq!(mesh.to_buffers(), expected);
}

#[test]
fn test_buffers_are_reused() {
    let mut stroker = Stroker::new();
    let style = StrokeStyle::new(3.0)
        .with_line_cap(LineCap::Round)
        .with_line_join(LineJoin::Round);

    let zigzag: Vec<Point> = (0..500)
        .map(|i| point(i as f32 * 2.0, (i % 2) as f32 * 5.0))
        .collect();
    let big = stroker.stroke_aa(&zigzag, false, &style, RED).unwrap();
    check_mesh(&big);
    let big_vertex_count = big.vertex_count();

    let small = stroker.stroke(&segment(), false, &StrokeStyle::new(2.0)).unwrap();
    check_mesh(&small);
    assert!(small.vertex_count() < big_vertex_count);
    assert_eq!(small.vertex_count(), 4);
    assert!(small.colors.is_none());

    let big_again = stroker.stroke_aa(&zigzag, false, &style, RED).unwrap();
    assert_eq!(big_again.vertex_count(), big_vertex_count);
}

#[test]
fn test_too_many_vertices() {
    let mut stroker = Stroker::new();
    let zigzag: Vec<Point> = (0..40_000)
        .map(|i| point(i as f32, (i % 2) as f32))
        .collect();

    let result = stroker.stroke(&zigzag, false, &StrokeStyle::new(1.0));
    assert_eq!(result.err(), Some(TessellationError::TooManyVertices));

    // The stroker is still usable.
    let mesh = stroker.stroke(&segment(), false, &StrokeStyle::new(2.0)).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
}

#[test]
fn test_stroke_path() {
    let mut path = Path::new();
    path.reset(1.0, 0.25);
    path.rounded_rect(10.0, 10.0, 100.0, 50.0, 8.0);
    path.move_to(point(0.0, 100.0));
    path.line_to(point(50.0, 120.0));
    path.quadratic_to(point(100.0, 140.0), point(150.0, 100.0));

    let mut stroker = Stroker::new();
    let style = StrokeStyle::new(3.0)
        .with_line_cap(LineCap::Round)
        .with_line_join(LineJoin::Round);

    let mut buffers = crate::MeshBuffers::new();
    let mut num_subpaths = 0;
    for (subpath, points) in &path {
        let mesh = stroker.stroke_aa(points, subpath.closed, &style, RED).unwrap();
        check_mesh(&mesh);
        assert!(!mesh.is_empty());
        buffers.append(&mesh).unwrap();
        num_subpaths += 1;
    }

    assert_eq!(num_subpaths, 2);
    check_mesh(&buffers.as_mesh());
}
