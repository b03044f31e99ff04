use crate::color::{pack_rgba, PackedColor, TRANSPARENT};
use crate::math::*;
use crate::path::Path;
use crate::{
    EarcutTessellator, FillRule, Mesh, OutputMode, PolygonTessellator, Stroker,
    TessellationError, TriangulationError,
};

const BLUE: PackedColor = pack_rgba(0, 0, 255, 255);

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

// Area of the opaque triangles only.
fn opaque_area(mesh: &Mesh) -> f32 {
    let colors = mesh.colors.unwrap();
    mesh.indices
        .chunks_exact(3)
        .filter(|tri| tri.iter().all(|idx| colors[*idx as usize] != TRANSPARENT))
        .map(|tri| {
            let [a, b, c] = [
                mesh.positions[tri[0] as usize],
                mesh.positions[tri[1] as usize],
                mesh.positions[tri[2] as usize],
            ];
            ((b - a).cross(c - a) * 0.5).abs()
        })
        .sum()
}

fn assert_approx_eq(a: f32, b: f32, epsilon: f32) {
    assert!((a - b).abs() <= epsilon, "{} != {}", a, b);
}

fn square(x: f32, y: f32, size: f32) -> [Point; 4] {
    [
        point(x, y),
        point(x + size, y),
        point(x + size, y + size),
        point(x, y + size),
    ]
}

fn reversed<const N: usize>(mut points: [Point; N]) -> [Point; N] {
    points.reverse();
    points
}

#[test]
fn test_convex_fill_triangle() {
    let mut stroker = Stroker::new();
    let triangle = [point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0)];
    let mesh = stroker.convex_fill(&triangle).unwrap();

    assert_eq!(mesh.indices, &[0, 1, 2]);
    assert_eq!(mesh.positions, &triangle[..]);
    assert!(mesh.colors.is_none());
}

#[test]
fn test_convex_fill_path_triangle() {
    let mut path = Path::new();
    let mut stroker = Stroker::new();
    for repeat_start in [false, true] {
        path.reset(1.0, 0.25);
        path.move_to(point(0.0, 0.0));
        path.line_to(point(10.0, 0.0));
        path.line_to(point(10.0, 10.0));
        if repeat_start {
            path.line_to(point(0.0, 0.0));
        }
        path.close();

        // Closing removes a point repeating the start of the subpath.
        let (subpath, points) = path.iter().next().unwrap();
        assert!(subpath.closed);
        assert_eq!(points.len(), 3);

        let mesh = stroker.convex_fill(points).unwrap();
        check_mesh(&mesh);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, &[0, 1, 2]);
        assert_eq!(
            mesh.positions,
            &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)]
        );
        assert_approx_eq(area(&mesh), 50.0, 1e-4);
    }
}

#[test]
fn test_convex_fill_fan() {
    let mut stroker = Stroker::new();
    let hexagon: Vec<Point> = (0..6)
        .map(|i| {
            let angle = i as f32 * core::f32::consts::PI / 3.0;
            point(angle.cos() * 10.0, angle.sin() * 10.0)
        })
        .collect();
    let mesh = stroker.convex_fill(&hexagon).unwrap();

    check_mesh(&mesh);
    assert_eq!(mesh.triangle_count(), 4);
    assert_eq!(mesh.indices, &[0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 5]);
    assert_approx_eq(area(&mesh), 1.5 * 3f32.sqrt() * 100.0, 1e-2);
}

#[test]
fn test_convex_fill_degenerate() {
    let mut stroker = Stroker::new();
    assert!(stroker.convex_fill(&[]).unwrap().is_empty());

    let segment = [point(0.0, 0.0), point(1.0, 0.0)];
    let mesh = stroker.convex_fill(&segment).unwrap();
    assert!(mesh.is_empty());
    assert_eq!(mesh.vertex_count(), 2);
}

#[test]
fn test_convex_fill_aa() {
    let mut stroker = Stroker::new();
    let points = square(0.0, 0.0, 10.0);
    let mesh = stroker.convex_fill_aa(&points, BLUE).unwrap();

    check_mesh(&mesh);
    assert_eq!(mesh.vertex_count(), 8);
    // Interior fan and two triangles per edge.
    assert_eq!(mesh.triangle_count(), 2 + 8);

    let colors = mesh.colors.unwrap();
    for i in 0..4 {
        assert_eq!(colors[2 * i], BLUE);
        assert_eq!(colors[2 * i + 1], TRANSPARENT);
    }

    assert_eq!(mesh.positions[0], point(0.5, 0.5));
    assert_eq!(mesh.positions[1], point(-0.5, -0.5));
    assert_eq!(mesh.positions[4], point(9.5, 9.5));
    assert_eq!(mesh.positions[5], point(10.5, 10.5));

    assert_approx_eq(opaque_area(&mesh), 81.0, 1e-3);
    assert_approx_eq(area(&mesh), 121.0, 1e-3);
}

#[test]
fn test_convex_fill_aa_orientation() {
    let mut stroker = Stroker::new();
    let ccw = stroker
        .convex_fill_aa(&square(0.0, 0.0, 10.0), BLUE)
        .unwrap()
        .to_buffers();
    let cw = stroker
        .convex_fill_aa(&reversed(square(0.0, 0.0, 10.0)), BLUE)
        .unwrap()
        .to_buffers();

    let inner = |positions: &[Point]| {
        let mut v: Vec<(i32, i32)> = positions
            .iter()
            .step_by(2)
            .map(|p| ((p.x * 2.0).round() as i32, (p.y * 2.0).round() as i32))
            .collect();
        v.sort();
        v
    };
    assert_eq!(inner(&ccw.positions), inner(&cw.positions));
    assert_approx_eq(opaque_area(&cw.as_mesh()), 81.0, 1e-3);
}

#[test]
fn test_convex_fill_aa_many_points() {
    let mut stroker = Stroker::new();
    let mut path = Path::new();
    path.reset(1.0, 0.1);
    path.circle(point(0.0, 0.0), 50.0);
    let points = path.subpath_points(&path.subpaths()[0]);
    let n = points.len();
    assert!(n > 8);

    let mesh = stroker.convex_fill_aa(points, BLUE).unwrap();
    check_mesh(&mesh);
    assert_eq!(mesh.vertex_count(), 2 * n);
    assert_eq!(mesh.triangle_count(), (n - 2) + 2 * n);

    for (i, p) in mesh.positions.iter().enumerate() {
        let r = p.to_vector().length();
        if i % 2 == 0 {
            assert!(r < 50.0);
        } else {
            assert!(r > 50.0);
        }
    }
}

fn l_shape() -> [Point; 6] {
    [
        point(0.0, 0.0),
        point(2.0, 0.0),
        point(2.0, 1.0),
        point(1.0, 1.0),
        point(1.0, 2.0),
        point(0.0, 2.0),
    ]
}

#[test]
fn test_concave_fill_l_shape() {
    let mut stroker = Stroker::new();
    let mut tessellator = EarcutTessellator::new();
    let shape = l_shape();
    let mesh = stroker
        .concave_fill(&[&shape], FillRule::NonZero, &mut tessellator)
        .unwrap();

    check_mesh(&mesh);
    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.triangle_count(), 4);
    assert!(mesh.colors.is_none());
    assert_approx_eq(area(&mesh), 3.0, 1e-5);
}

#[test]
fn test_concave_fill_hole() {
    let mut stroker = Stroker::new();
    let mut tessellator = EarcutTessellator::new();
    let outer = square(0.0, 0.0, 4.0);
    let inner = square(1.0, 1.0, 2.0);
    let inner_cw = reversed(square(1.0, 1.0, 2.0));

    let mesh = stroker
        .concave_fill(&[&outer, &inner], FillRule::EvenOdd, &mut tessellator)
        .unwrap();
    check_mesh(&mesh);
    assert_approx_eq(area(&mesh), 12.0, 1e-4);

    // Same orientation, the inner square is not a hole with the non-zero rule.
    let mesh = stroker
        .concave_fill(&[&outer, &inner], FillRule::NonZero, &mut tessellator)
        .unwrap();
    check_mesh(&mesh);
    assert_eq!(mesh.vertex_count(), 4);
    assert_approx_eq(area(&mesh), 16.0, 1e-4);

    let mesh = stroker
        .concave_fill(&[&outer, &inner_cw], FillRule::NonZero, &mut tessellator)
        .unwrap();
    check_mesh(&mesh);
    assert_approx_eq(area(&mesh), 12.0, 1e-4);
}

#[test]
fn test_concave_fill_nested() {
    let mut stroker = Stroker::new();
    let mut tessellator = EarcutTessellator::new();
    let a = square(0.0, 0.0, 8.0);
    let b = square(2.0, 2.0, 4.0);
    let c = square(3.0, 3.0, 2.0);
    let d = square(20.0, 0.0, 1.0);

    let mesh = stroker
        .concave_fill(&[&c, &a, &d, &b], FillRule::EvenOdd, &mut tessellator)
        .unwrap();
    check_mesh(&mesh);
    assert_approx_eq(area(&mesh), 64.0 - 16.0 + 4.0 + 1.0, 1e-3);
}

#[test]
fn test_concave_fill_self_intersection() {
    let mut stroker = Stroker::new();
    let mut tessellator = EarcutTessellator::new();
    let bowtie = [point(0.0, 0.0), point(2.0, 2.0), point(2.0, 0.0), point(0.0, 2.0)];

    let result = stroker.concave_fill(&[&bowtie], FillRule::NonZero, &mut tessellator);
    assert_eq!(
        result.err(),
        Some(TessellationError::Triangulation(TriangulationError::SelfIntersection))
    );

    // Overlapping contours are rejected too.
    let a = square(0.0, 0.0, 2.0);
    let b = square(1.0, 1.0, 2.0);
    let result = stroker.concave_fill(&[&a, &b], FillRule::NonZero, &mut tessellator);
    assert_eq!(
        result.err(),
        Some(TessellationError::Triangulation(TriangulationError::SelfIntersection))
    );

    let shape = l_shape();
    let mesh = stroker
        .concave_fill(&[&shape], FillRule::NonZero, &mut tessellator)
        .unwrap();
    assert_eq!(mesh.triangle_count(), 4);
}

#[test]
fn test_concave_fill_degenerate() {
    let mut stroker = Stroker::new();
    let mut tessellator = EarcutTessellator::new();

    let result = stroker.concave_fill(&[], FillRule::EvenOdd, &mut tessellator);
    assert_eq!(
        result.err(),
        Some(TessellationError::Triangulation(TriangulationError::NoContours))
    );

    let outer = square(0.0, 0.0, 4.0);
    let two_points = [point(10.0, 0.0), point(11.0, 0.0)];
    let result = stroker.concave_fill(&[&outer, &two_points], FillRule::EvenOdd, &mut tessellator);
    assert_eq!(
        result.err(),
        Some(TessellationError::Triangulation(TriangulationError::DegenerateContour(1)))
    );

    let flat = [point(0.0, 10.0), point(1.0, 10.0), point(2.0, 10.0)];
    let result = stroker.concave_fill(&[&flat], FillRule::EvenOdd, &mut tessellator);
    assert_eq!(
        result.err(),
        Some(TessellationError::Triangulation(TriangulationError::DegenerateContour(0)))
    );
}

#[test]
fn test_concave_fill_aa() {
    let mut stroker = Stroker::new();
    let mut tessellator = EarcutTessellator::new();
    let shape = square(0.0, 0.0, 10.0);

    let mesh = stroker
        .concave_fill_aa(&[&shape], FillRule::NonZero, BLUE, &mut tessellator)
        .unwrap();
    check_mesh(&mesh);
    // Four triangulated vertices, and two per corner for the fringe.
    assert_eq!(mesh.vertex_count(), 4 + 8);
    assert_eq!(mesh.triangle_count(), 2 + 8);
    assert_approx_eq(opaque_area(&mesh), 100.0, 1e-3);

    let colors = mesh.colors.unwrap();
    for (p, c) in mesh.positions.iter().zip(colors) {
        let inside = p.x >= 0.0 && p.x <= 10.0 && p.y >= 0.0 && p.y <= 10.0;
        if *c == TRANSPARENT {
            assert!(!inside, "{:?} should be outside", p);
        } else {
            assert_eq!(*c, BLUE);
            assert!(inside, "{:?} should be inside", p);
        }
    }
}

#[test]
fn test_concave_fill_aa_hole_fringe() {
    let mut stroker = Stroker::new();
    let mut tessellator = EarcutTessellator::new();
    let outer = reversed(square(0.0, 0.0, 10.0));
    let hole = square(4.0, 4.0, 2.0);

    let mesh = stroker
        .concave_fill_aa(&[&outer, &hole], FillRule::EvenOdd, BLUE, &mut tessellator)
        .unwrap();
    check_mesh(&mesh);
    assert_approx_eq(opaque_area(&mesh), 96.0, 1e-3);

    // Fringe vertices of the hole are inside of it.
    let colors = mesh.colors.unwrap();
    let mut num_in_hole = 0;
    for (p, c) in mesh.positions.iter().zip(colors) {
        let in_hole = p.x > 4.0 && p.x < 6.0 && p.y > 4.0 && p.y < 6.0;
        if *c == TRANSPARENT && in_hole {
            num_in_hole += 1;
        }
        if *c == BLUE {
            assert!(!in_hole);
        }
    }
    assert_eq!(num_in_hole, 4);
}

#[test]
fn test_earcut_boundary_orientation() {
    let mut tessellator = EarcutTessellator::new();
    let outer = reversed(square(0.0, 0.0, 10.0));
    let hole = square(4.0, 4.0, 2.0);

    tessellator.begin_contours();
    tessellator.add_contour(&outer);
    tessellator.add_contour(&hole);
    tessellator.tessellate(FillRule::EvenOdd, OutputMode::Triangles).unwrap();
    assert!(tessellator.boundary().is_empty());

    tessellator
        .tessellate(FillRule::EvenOdd, OutputMode::TrianglesAndBoundary)
        .unwrap();
    let contours: Vec<&[Point]> = tessellator.boundary().contours().collect();
    assert_eq!(contours.len(), 2);
    assert!(crate::geom::kernel::polygon_signed_area2(contours[0]) > 0.0);
    assert!(crate::geom::kernel::polygon_signed_area2(contours[1]) < 0.0);
}

#[test]
fn test_earcut_closing_point() {
    let mut tessellator = EarcutTessellator::new();
    let closed = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(1.0, 1.0),
        point(0.0, 0.0),
    ];

    tessellator.begin_contours();
    tessellator.add_contour(&closed);
    tessellator.tessellate(FillRule::NonZero, OutputMode::Triangles).unwrap();
    assert_eq!(tessellator.vertices().len(), 3);
    assert_eq!(tessellator.indices().len(), 3);
}

#[test]
fn test_fill_path() {
    let mut path = Path::new();
    path.reset(2.0, 0.25);
    path.move_to(point(0.0, 0.0));
    path.line_to(point(100.0, 0.0));
    path.cubic_to(point(150.0, 50.0), point(50.0, 50.0), point(100.0, 100.0));
    path.line_to(point(0.0, 100.0));
    path.close();
    path.circle(point(30.0, 50.0), 10.0);

    let contours: Vec<&[Point]> = path.iter().map(|(_, points)| points).collect();
    assert_eq!(contours.len(), 2);

    let mut stroker = Stroker::new();
    let mut tessellator = EarcutTessellator::new();
    let mesh = stroker
        .concave_fill_aa(&contours, FillRule::EvenOdd, BLUE, &mut tessellator)
        .unwrap();
    check_mesh(&mesh);
    assert!(!mesh.is_empty());

    let mesh = stroker
        .concave_fill(&contours, FillRule::EvenOdd, &mut tessellator)
        .unwrap();
    check_mesh(&mesh);
    assert!(!mesh.is_empty());
}
