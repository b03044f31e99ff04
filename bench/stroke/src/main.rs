#[macro_use]
extern crate bencher;

use meshvg::math::{point, Point};
use meshvg::path::Path;
use meshvg::tessellation::color::{pack_rgba, PackedColor};
use meshvg::tessellation::{EarcutTessellator, FillRule, LineCap, LineJoin, StrokeStyle, Stroker};

use bencher::Bencher;

const N: usize = 100;
const COLOR: PackedColor = pack_rgba(20, 40, 200, 255);

// A star with rounded tips, a few curves and a circle hole.
fn build_path(path: &mut Path) {
    path.reset(1.0, 0.25);

    let center = point(200.0, 200.0);
    let num_branches = 12;
    for i in 0..(num_branches * 2) {
        let angle = i as f32 * std::f32::consts::PI / num_branches as f32;
        let radius = if i % 2 == 0 { 180.0 } else { 90.0 };
        let p = center + meshvg::math::vector(angle.cos(), angle.sin()) * radius;
        if i == 0 {
            path.move_to(p);
        } else if i % 2 == 0 {
            let ctrl = center + meshvg::math::vector(angle.cos(), angle.sin()) * 200.0;
            path.quadratic_to(ctrl, p);
        } else {
            path.line_to(p);
        }
    }
    path.close();

    path.circle(center, 40.0);
}

fn polylines(path: &Path) -> Vec<(bool, Vec<Point>)> {
    path.iter()
        .map(|(subpath, points)| (subpath.closed, points.to_vec()))
        .collect()
}

fn flatten_path(bench: &mut Bencher) {
    let mut path = Path::new();

    bench.iter(|| {
        for _ in 0..N {
            build_path(&mut path);
        }
    })
}

fn stroke_solid(bench: &mut Bencher) {
    let mut path = Path::new();
    build_path(&mut path);
    let polylines = polylines(&path);

    let mut stroker = Stroker::new();
    let style = StrokeStyle::new(5.0).with_line_join(LineJoin::Miter);

    bench.iter(|| {
        for _ in 0..N {
            for (closed, points) in &polylines {
                stroker.stroke(points, *closed, &style).unwrap();
            }
        }
    })
}

fn stroke_aa_round(bench: &mut Bencher) {
    let mut path = Path::new();
    build_path(&mut path);
    let polylines = polylines(&path);

    let mut stroker = Stroker::new();
    let style = StrokeStyle::new(5.0)
        .with_line_cap(LineCap::Round)
        .with_line_join(LineJoin::Round);

    bench.iter(|| {
        for _ in 0..N {
            for (closed, points) in &polylines {
                stroker.stroke_aa(points, *closed, &style, COLOR).unwrap();
            }
        }
    })
}

fn stroke_aa_thin(bench: &mut Bencher) {
    let mut path = Path::new();
    build_path(&mut path);
    let polylines = polylines(&path);

    let mut stroker = Stroker::new();
    let style = StrokeStyle::new(0.5).with_line_join(LineJoin::Bevel);

    bench.iter(|| {
        for _ in 0..N {
            for (closed, points) in &polylines {
                stroker.stroke_aa(points, *closed, &style, COLOR).unwrap();
            }
        }
    })
}

fn convex_fill_aa(bench: &mut Bencher) {
    let mut path = Path::new();
    path.reset(1.0, 0.05);
    path.circle(point(0.0, 0.0), 500.0);
    let circle = path.vertices().to_vec();

    let mut stroker = Stroker::new();

    bench.iter(|| {
        for _ in 0..N {
            stroker.convex_fill_aa(&circle, COLOR).unwrap();
        }
    })
}

fn concave_fill(bench: &mut Bencher) {
    let mut path = Path::new();
    build_path(&mut path);
    let contours: Vec<&[Point]> = path.iter().map(|(_, points)| points).collect();

    let mut stroker = Stroker::new();
    let mut tessellator = EarcutTessellator::new();

    bench.iter(|| {
        for _ in 0..N {
            stroker
                .concave_fill(&contours, FillRule::EvenOdd, &mut tessellator)
                .unwrap();
        }
    })
}

fn concave_fill_aa(bench: &mut Bencher) {
    let mut path = Path::new();
    build_path(&mut path);
    let contours: Vec<&[Point]> = path.iter().map(|(_, points)| points).collect();

    let mut stroker = Stroker::new();
    let mut tessellator = EarcutTessellator::new();

    bench.iter(|| {
        for _ in 0..N {
            stroker
                .concave_fill_aa(&contours, FillRule::EvenOdd, COLOR, &mut tessellator)
                .unwrap();
        }
    })
}

benchmark_group!(flattening, flatten_path);

benchmark_group!(stroke, stroke_solid, stroke_aa_round, stroke_aa_thin);

benchmark_group!(fill, convex_fill_aa, concave_fill, concave_fill_aa);

benchmark_main!(flattening, stroke, fill);
