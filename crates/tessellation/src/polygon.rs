//! Triangulation of arbitrary polygons, used by concave fills.
//!
//! The stroker does not triangulate concave polygons itself, it delegates to a
//! [`PolygonTessellator`]. [`EarcutTessellator`] is the default implementation.

use crate::error::TriangulationError;
use crate::geom::kernel::{polygon_signed_area2, EPSILON_SQ};
use crate::math::*;
use crate::path::FillRule;

use core::ops::Range;

/// What a [`PolygonTessellator`] must produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OutputMode {
    Triangles,
    /// Triangles and the contours delimiting the filled area, see [`Boundary`].
    TrianglesAndBoundary,
}

/// Contours separating the filled area from the unfilled area.
///
/// Each contour is oriented so that the filled area is on its left side (the side of
/// `perp_ccw` of the edge directions). The first point of a contour is not repeated at
/// its end.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Boundary<'l> {
    pub points: &'l [Point],
    pub contours: &'l [Range<usize>],
}

impl<'l> Boundary<'l> {
    pub fn contours(&self) -> impl Iterator<Item = &'l [Point]> + 'l {
        let points = self.points;
        self.contours
            .iter()
            .map(move |range| &points[range.clone()])
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }
}

/// Triangulates sets of contours according to a fill rule.
///
/// Usage: `begin_contours`, then `add_contour` for each contour, then `tessellate`.
/// The results are available through `vertices`, `indices` and `boundary` until the
/// next `begin_contours`.
pub trait PolygonTessellator {
    /// Removes the contours and results of the previous tessellation.
    fn begin_contours(&mut self);

    /// Adds an implicitly closed contour.
    fn add_contour(&mut self, points: &[Point]);

    fn tessellate(&mut self, fill_rule: FillRule, mode: OutputMode)
        -> Result<(), TriangulationError>;

    fn vertices(&self) -> &[Point];

    /// Three indices into `vertices` per triangle.
    fn indices(&self) -> &[u32];

    /// Only populated in [`OutputMode::TrianglesAndBoundary`].
    fn boundary(&self) -> Boundary;
}

#[derive(Copy, Clone, Debug)]
struct Edge {
    from: Point,
    to: Point,
    contour: usize,
    index: usize,
    min_x: f32,
    max_x: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ContourKind {
    Outer,
    Hole,
    // Same fill state on both sides.
    Ignored,
}

/// A [`PolygonTessellator`] based on ear clipping (`earcutr`).
///
/// Contours must not intersect themselves or each other, including touching at a
/// vertex. Intersecting input is rejected with [`TriangulationError::SelfIntersection`]
/// instead of being triangulated incorrectly.
///
/// Contours are sorted into outer boundaries and holes using the fill rule, and each
/// outer boundary is triangulated along with the holes it directly contains.
///
/// # Limitations
///
/// Since overlapping contours are rejected, `NonZero` and `EvenOdd` only produce
/// different results for nested contours (for example a hole with the same orientation
/// as its outer boundary).
#[derive(Default)]
pub struct EarcutTessellator {
    points: Vec<Point>,
    contours: Vec<Range<usize>>,

    vertices: Vec<Point>,
    indices: Vec<u32>,
    boundary_points: Vec<Point>,
    boundary_contours: Vec<Range<usize>>,

    edges: Vec<Edge>,
    kinds: Vec<ContourKind>,
    areas: Vec<f64>,
    coords: Vec<f64>,
    hole_starts: Vec<usize>,
}

impl EarcutTessellator {
    pub fn new() -> Self {
        Self::default()
    }

    fn contour(&self, idx: usize) -> &[Point] {
        &self.points[self.contours[idx].clone()]
    }

    fn validate(&mut self) -> Result<(), TriangulationError> {
        if self.contours.is_empty() {
            return Err(TriangulationError::NoContours);
        }

        for idx in 0..self.contours.len() {
            if self.contours[idx].len() < 3 {
                return Err(TriangulationError::DegenerateContour(idx));
            }
        }

        if self.has_intersections() {
            return Err(TriangulationError::SelfIntersection);
        }

        self.areas.clear();
        for idx in 0..self.contours.len() {
            let area = polygon_signed_area2(self.contour(idx)) as f64;
            if area.abs() < EPSILON_SQ as f64 {
                return Err(TriangulationError::DegenerateContour(idx));
            }
            self.areas.push(area);
        }

        Ok(())
    }

    // Edges are sorted by their left end, so only the edges starting before the end of
    // an edge along the x axis can intersect it.
    fn has_intersections(&mut self) -> bool {
        self.edges.clear();
        for (contour, range) in self.contours.iter().enumerate() {
            let points = &self.points[range.clone()];
            for index in 0..points.len() {
                let from = points[index];
                let to = points[(index + 1) % points.len()];
                self.edges.push(Edge {
                    from,
                    to,
                    contour,
                    index,
                    min_x: from.x.min(to.x),
                    max_x: from.x.max(to.x),
                });
            }
        }

        self.edges.sort_unstable_by(|a, b| a.min_x.total_cmp(&b.min_x));

        for (i, edge) in self.edges.iter().enumerate() {
            for other in &self.edges[(i + 1)..] {
                if other.min_x > edge.max_x {
                    break;
                }
                if other.contour == edge.contour {
                    let n = self.contours[edge.contour].len();
                    let d = (edge.index + n - other.index) % n;
                    if d == 1 || d == n - 1 {
                        continue;
                    }
                }
                if segments_intersect(edge.from, edge.to, other.from, other.to) {
                    return true;
                }
            }
        }

        false
    }

    fn classify(&mut self, fill_rule: FillRule) {
        self.kinds.clear();
        for idx in 0..self.contours.len() {
            // Contours don't intersect, so the winding number right outside of a contour
            // only depends on the contours enclosing it.
            let sample = self.contour(idx)[0];
            let mut outside: i16 = 0;
            for other in 0..self.contours.len() {
                if other != idx {
                    outside += winding_number(sample, self.contour(other));
                }
            }
            let inside = outside + if self.areas[idx] > 0.0 { 1 } else { -1 };

            let kind = match (fill_rule.is_in(inside), fill_rule.is_in(outside)) {
                (true, false) => ContourKind::Outer,
                (false, true) => ContourKind::Hole,
                _ => ContourKind::Ignored,
            };
            self.kinds.push(kind);
        }
    }

    // Innermost outer boundary containing the hole.
    fn parent_of(&self, hole: usize) -> Option<usize> {
        let sample = self.contour(hole)[0];
        let mut parent: Option<usize> = None;
        for idx in 0..self.contours.len() {
            if self.kinds[idx] != ContourKind::Outer {
                continue;
            }
            if winding_number(sample, self.contour(idx)) == 0 {
                continue;
            }
            let is_smaller = match parent {
                Some(p) => self.areas[idx].abs() < self.areas[p].abs(),
                None => true,
            };
            if is_smaller {
                parent = Some(idx);
            }
        }

        parent
    }

    fn triangulate_group(&mut self, outer: usize, holes: &[usize]) -> Result<(), TriangulationError> {
        self.coords.clear();
        self.hole_starts.clear();

        let base = self.vertices.len();
        let mut num_vertices = 0;
        for (i, &idx) in core::iter::once(&outer).chain(holes.iter()).enumerate() {
            if i > 0 {
                self.hole_starts.push(num_vertices);
            }
            let range = self.contours[idx].clone();
            for p in &self.points[range] {
                self.coords.push(p.x as f64);
                self.coords.push(p.y as f64);
                self.vertices.push(*p);
                num_vertices += 1;
            }
        }

        let triangles = earcutr::earcut(&self.coords, &self.hole_starts, 2)
            .map_err(|_| TriangulationError::Earcut)?;
        if triangles.is_empty() || triangles.len() % 3 != 0 {
            return Err(TriangulationError::Earcut);
        }

        self.indices
            .extend(triangles.iter().map(|idx| (base + idx) as u32));

        Ok(())
    }

    fn build_boundary(&mut self) {
        for idx in 0..self.contours.len() {
            let reverse = match self.kinds[idx] {
                ContourKind::Outer => self.areas[idx] < 0.0,
                ContourKind::Hole => self.areas[idx] > 0.0,
                ContourKind::Ignored => continue,
            };

            let start = self.boundary_points.len();
            let range = self.contours[idx].clone();
            if reverse {
                self.boundary_points
                    .extend(self.points[range].iter().rev());
            } else {
                self.boundary_points.extend_from_slice(&self.points[range]);
            }
            self.boundary_contours
                .push(start..self.boundary_points.len());
        }
    }
}

impl PolygonTessellator for EarcutTessellator {
    fn begin_contours(&mut self) {
        self.points.clear();
        self.contours.clear();
        self.vertices.clear();
        self.indices.clear();
        self.boundary_points.clear();
        self.boundary_contours.clear();
    }

    fn add_contour(&mut self, points: &[Point]) {
        let start = self.points.len();
        for p in points {
            if let Some(last) = self.points[start..].last() {
                if (*p - *last).square_length() < EPSILON_SQ {
                    continue;
                }
            }
            self.points.push(*p);
        }

        while self.points.len() - start > 1 {
            let first = self.points[start];
            let last = self.points[self.points.len() - 1];
            if (last - first).square_length() >= EPSILON_SQ {
                break;
            }
            self.points.pop();
        }

        self.contours.push(start..self.points.len());
    }

    fn tessellate(
        &mut self,
        fill_rule: FillRule,
        mode: OutputMode,
    ) -> Result<(), TriangulationError> {
        self.vertices.clear();
        self.indices.clear();
        self.boundary_points.clear();
        self.boundary_contours.clear();

        self.validate()?;
        self.classify(fill_rule);

        let mut holes = Vec::new();
        for outer in 0..self.contours.len() {
            if self.kinds[outer] != ContourKind::Outer {
                continue;
            }

            holes.clear();
            for hole in 0..self.contours.len() {
                if self.kinds[hole] == ContourKind::Hole && self.parent_of(hole) == Some(outer) {
                    holes.push(hole);
                }
            }

            if let Err(e) = self.triangulate_group(outer, &holes) {
                self.vertices.clear();
                self.indices.clear();
                return Err(e);
            }
        }

        if mode == OutputMode::TrianglesAndBoundary {
            self.build_boundary();
        }

        Ok(())
    }

    fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    fn indices(&self) -> &[u32] {
        &self.indices
    }

    fn boundary(&self) -> Boundary {
        Boundary {
            points: &self.boundary_points,
            contours: &self.boundary_contours,
        }
    }
}

#[inline]
fn orient(a: Point, b: Point, c: Point) -> f64 {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (cx, cy) = (c.x as f64, c.y as f64);
    (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
}

// Assumes `a`, `b` and `p` are collinear.
#[inline]
fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Whether two segments intersect, touching included.
fn segments_intersect(p0: Point, p1: Point, q0: Point, q1: Point) -> bool {
    if p0.x.max(p1.x) < q0.x.min(q1.x)
        || q0.x.max(q1.x) < p0.x.min(p1.x)
        || p0.y.max(p1.y) < q0.y.min(q1.y)
        || q0.y.max(q1.y) < p0.y.min(p1.y)
    {
        return false;
    }

    let d1 = orient(q0, q1, p0);
    let d2 = orient(q0, q1, p1);
    let d3 = orient(p0, p1, q0);
    let d4 = orient(p0, p1, q1);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q0, q1, p0))
        || (d2 == 0.0 && on_segment(q0, q1, p1))
        || (d3 == 0.0 && on_segment(p0, p1, q0))
        || (d4 == 0.0 && on_segment(p0, p1, q1))
}

/// Winding number of `contour` around `p`.
///
/// Positive for counter-clockwise contours (in a y-up frame) containing `p`.
fn winding_number(p: Point, contour: &[Point]) -> i16 {
    let mut winding = 0;
    let mut prev = contour[contour.len() - 1];
    for &current in contour {
        if prev.y <= p.y {
            if current.y > p.y && orient(prev, current, p) > 0.0 {
                winding += 1;
            }
        } else if current.y <= p.y && orient(prev, current, p) < 0.0 {
            winding -= 1;
        }
        prev = current;
    }

    winding
}

#[test]
fn test_segments_intersect() {
    let p = |x, y| point(x, y);
    assert!(segments_intersect(p(0.0, 0.0), p(2.0, 2.0), p(2.0, 0.0), p(0.0, 2.0)));
    assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)));
    // T junction.
    assert!(segments_intersect(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)));
    // Collinear, disjoint.
    assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)));
    // Collinear, overlapping.
    assert!(segments_intersect(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(3.0, 0.0)));
}

#[test]
fn test_winding_number() {
    let square = [point(0.0, 0.0), point(4.0, 0.0), point(4.0, 4.0), point(0.0, 4.0)];
    assert_eq!(winding_number(point(2.0, 2.0), &square), 1);
    assert_eq!(winding_number(point(5.0, 2.0), &square), 0);

    let mut reversed = square;
    reversed.reverse();
    assert_eq!(winding_number(point(2.0, 2.0), &reversed), -1);
}

#[cfg(test)]
fn circle(center: Point, radius: f32, n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let angle = i as f32 * core::f32::consts::TAU / n as f32;
            center + vector(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

#[test]
fn test_intersections_with_many_edges() {
    let mut tessellator = EarcutTessellator::new();
    let outer = circle(point(0.0, 0.0), 100.0, 2000);
    let mut inner = circle(point(0.0, 0.0), 50.0, 1000);
    inner.reverse();

    tessellator.begin_contours();
    tessellator.add_contour(&outer);
    tessellator.add_contour(&inner);
    assert_eq!(tessellator.tessellate(FillRule::NonZero, OutputMode::Triangles), Ok(()));
    let vertices = tessellator.vertices();
    let area: f64 = tessellator
        .indices()
        .chunks(3)
        .map(|tri| {
            let [a, b, c] = [0, 1, 2].map(|i| vertices[tri[i] as usize]);
            orient(a, b, c).abs() * 0.5
        })
        .sum();
    let expected = (polygon_signed_area2(&outer) + polygon_signed_area2(&inner)) as f64 * 0.5;
    assert!((area - expected).abs() < 5.0, "{} != {}", area, expected);

    // A small square crossing the right-most edges of the outer circle.
    let square = [point(99.0, -1.0), point(101.0, -1.0), point(101.0, 1.0), point(99.0, 1.0)];
    tessellator.begin_contours();
    tessellator.add_contour(&outer);
    tessellator.add_contour(&square);
    assert_eq!(
        tessellator.tessellate(FillRule::NonZero, OutputMode::Triangles),
        Err(TriangulationError::SelfIntersection)
    );

    // Touching at a vertex.
    let triangle = [point(100.0, 0.0), point(110.0, -5.0), point(110.0, 5.0)];
    tessellator.begin_contours();
    tessellator.add_contour(&outer);
    tessellator.add_contour(&triangle);
    assert_eq!(
        tessellator.tessellate(FillRule::NonZero, OutputMode::Triangles),
        Err(TriangulationError::SelfIntersection)
    );
}

#[test]
fn test_self_intersection_between_distant_edges() {
    let mut tessellator = EarcutTessellator::new();

    // A comb whose last tooth folds back over the first one.
    let mut comb = Vec::new();
    for i in 0..50 {
        let x = i as f32 * 2.0;
        comb.push(point(x, 0.0));
        comb.push(point(x + 1.0, 10.0));
    }
    comb.push(point(100.0, 0.0));
    comb.push(point(100.0, -5.0));
    comb.push(point(0.5, 5.0));

    tessellator.begin_contours();
    tessellator.add_contour(&comb);
    assert_eq!(
        tessellator.tessellate(FillRule::EvenOdd, OutputMode::Triangles),
        Err(TriangulationError::SelfIntersection)
    );

    // Same comb closed below its base.
    comb.pop();
    comb.push(point(0.0, -5.0));
    tessellator.begin_contours();
    tessellator.add_contour(&comb);
    assert_eq!(tessellator.tessellate(FillRule::EvenOdd, OutputMode::Triangles), Ok(()));
}
