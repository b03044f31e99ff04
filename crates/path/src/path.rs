//! The path builder and its flattened storage.

use crate::geom::arc;
use crate::geom::kernel::{cross, dot, EPSILON_SQ};
use crate::geom::transform::transform_points;
use crate::math::*;
use crate::Winding;

use arrayvec::ArrayVec;
use core::f32::consts::{FRAC_PI_2, TAU};
use core::ops::Range;

/// Maximum number of recursive subdivisions of a cubic bézier curve.
pub const MAX_FLATTENING_DEPTH: u8 = 10;

/// Default flattening tolerance, in device pixels.
pub const DEFAULT_TOLERANCE: f32 = 0.25;

/// Corners of rounded rectangles with radii below this are sharp.
const MIN_CORNER_RADIUS: f32 = 0.1;

/// A contiguous run of vertices in a [`Path`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SubPath {
    /// Offset of the first vertex in the path's vertex buffer.
    pub first_vertex: usize,
    pub vertex_count: usize,
    /// Whether the last vertex connects back to the first.
    ///
    /// The first vertex is never repeated at the end of a closed subpath.
    pub closed: bool,
}

impl SubPath {
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.first_vertex..(self.first_vertex + self.vertex_count)
    }

    /// Whether the subpath has at least one segment.
    #[inline]
    pub fn has_segments(&self) -> bool {
        self.vertex_count > 1
    }
}

/// Builds paths and stores them as flattened polylines.
///
/// Curves and arcs are approximated with line segments as they are added. The
/// approximation error is bounded by `tolerance / scale` in path space, `scale` being
/// the average scale of the transform the path will be drawn with.
///
/// Consecutive vertices of a subpath are never closer than [`EPSILON_SQ`] (squared
/// distance), points that would violate this are dropped.
///
/// The path is meant to be reused: [`Path::reset`] clears it without releasing memory.
#[derive(Clone, Debug)]
pub struct Path {
    vertices: Vec<Point>,
    subpaths: Vec<SubPath>,
    // Index of the subpath receiving commands.
    current: Option<usize>,
    scale: f32,
    tolerance: f32,
}

impl Path {
    /// Creates an empty path with a scale of 1 and the default tolerance.
    pub fn new() -> Self {
        Path::with_capacity(0, 0)
    }

    pub fn with_capacity(vertices: usize, subpaths: usize) -> Self {
        Path {
            vertices: Vec::with_capacity(vertices),
            subpaths: Vec::with_capacity(subpaths),
            current: None,
            scale: 1.0,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Removes all subpaths and sets the parameters used to flatten the next commands.
    ///
    /// Allocations are kept.
    pub fn reset(&mut self, scale: f32, tolerance: f32) {
        debug_assert!(scale > 0.0);
        debug_assert!(tolerance > 0.0);
        self.vertices.clear();
        self.subpaths.clear();
        self.current = None;
        self.scale = scale;
        self.tolerance = tolerance;
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Maximum distance between a curve and its flattened approximation, in path space.
    #[inline]
    pub fn flattening_tolerance(&self) -> f32 {
        self.tolerance / self.scale
    }

    /// Starts a new subpath at `to`.
    ///
    /// If the current subpath has no segment yet, it is moved to `to` instead.
    pub fn move_to(&mut self, to: Point) {
        if let Some(idx) = self.current {
            let subpath = &mut self.subpaths[idx];
            if !subpath.has_segments() {
                self.vertices.truncate(subpath.first_vertex);
                self.vertices.push(to);
                subpath.vertex_count = 1;
                subpath.closed = false;
                return;
            }
        }

        self.begin_subpath(to);
    }

    /// Adds a line segment to the current subpath.
    ///
    /// Must follow a `move_to`. After `close`, a new subpath starting at the first vertex
    /// of the closed one is created.
    pub fn line_to(&mut self, to: Point) {
        if self.segment_start(to).is_some() {
            self.push_vertex(to);
        }
    }

    /// Adds a quadratic bézier curve to the current subpath.
    pub fn quadratic_to(&mut self, ctrl: Point, to: Point) {
        let from = match self.segment_start(to) {
            Some(from) => from,
            None => return,
        };

        // Degree elevation.
        let ctrl1 = from + (ctrl - from) * (2.0 / 3.0);
        let ctrl2 = to + (ctrl - to) * (2.0 / 3.0);
        self.flatten_cubic([from, ctrl1, ctrl2, to]);
    }

    /// Adds a cubic bézier curve to the current subpath.
    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        let from = match self.segment_start(to) {
            Some(from) => from,
            None => return,
        };

        self.flatten_cubic([from, ctrl1, ctrl2, to]);
    }

    /// Adds a circular arc.
    ///
    /// Angles are in radians. The arc goes from `start_angle` to `end_angle` in the
    /// direction given by `winding`, a sweep of a full turn or more draws a full circle.
    /// The start of the arc is connected to the current subpath with a line segment, or
    /// starts a new subpath if there is no open one.
    pub fn arc(
        &mut self,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        winding: Winding,
    ) {
        let mut sweep = end_angle - start_angle;
        match winding {
            Winding::Positive => {
                if sweep >= TAU {
                    sweep = TAU;
                } else if sweep < 0.0 {
                    sweep = sweep.rem_euclid(TAU);
                }
            }
            Winding::Negative => {
                if sweep <= -TAU {
                    sweep = -TAU;
                } else if sweep > 0.0 {
                    sweep = -(-sweep).rem_euclid(TAU);
                }
            }
        }

        let num_segments = arc::segment_count(sweep, radius, self.scale, self.tolerance);
        let mut connect = self.has_open_subpath();
        arc::for_each_arc_point(
            center,
            vector(radius, radius),
            start_angle.rem_euclid(TAU),
            sweep,
            num_segments,
            &mut |p| {
                if connect {
                    self.line_to(p);
                } else {
                    self.move_to(p);
                    connect = true;
                }
            },
        );
    }

    /// Adds a closed rectangle subpath.
    ///
    /// The vertices are `(x, y)`, `(x + w, y)`, `(x + w, y + h)` and `(x, y + h)`.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.move_to(point(x, y));
        self.line_to(point(x + w, y));
        self.line_to(point(x + w, y + h));
        self.line_to(point(x, y + h));
        self.close();
    }

    /// Adds a closed rectangle subpath with circular corners of radius `r`.
    pub fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        self.rounded_rect_varying(x, y, w, h, r, r, r, r);
    }

    /// Adds a closed rectangle subpath with a different radius for each corner.
    ///
    /// Radii are clamped to half of the smallest side. If every radius is smaller than
    /// 0.1 a plain rectangle is added.
    #[allow(clippy::too_many_arguments)]
    pub fn rounded_rect_varying(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top_left: f32,
        top_right: f32,
        bottom_right: f32,
        bottom_left: f32,
    ) {
        if top_left < MIN_CORNER_RADIUS
            && top_right < MIN_CORNER_RADIUS
            && bottom_right < MIN_CORNER_RADIUS
            && bottom_left < MIN_CORNER_RADIUS
        {
            self.rect(x, y, w, h);
            return;
        }

        let max_radius = f32::min(w.abs(), h.abs()) * 0.5;
        let clamp = |r: f32| r.max(0.0).min(max_radius);
        let (tl, tr, br, bl) = (
            clamp(top_left),
            clamp(top_right),
            clamp(bottom_right),
            clamp(bottom_left),
        );

        // Negative sizes mirror the corners.
        let sx = if w < 0.0 { -1.0 } else { 1.0 };
        let sy = if h < 0.0 { -1.0 } else { 1.0 };

        self.move_to(point(x + tl * sx, y));
        self.corner(
            point(x + w - tr * sx, y + tr * sy),
            vector(0.0, -tr * sy),
            vector(tr * sx, 0.0),
            tr,
        );
        self.corner(
            point(x + w - br * sx, y + h - br * sy),
            vector(br * sx, 0.0),
            vector(0.0, br * sy),
            br,
        );
        self.corner(
            point(x + bl * sx, y + h - bl * sy),
            vector(0.0, bl * sy),
            vector(-bl * sx, 0.0),
            bl,
        );
        self.corner(
            point(x + tl * sx, y + tl * sy),
            vector(-tl * sx, 0.0),
            vector(0.0, -tl * sy),
            tl,
        );
        self.close();
    }

    /// Adds a closed circle subpath.
    pub fn circle(&mut self, center: Point, radius: f32) {
        self.ellipse(center, radius, radius);
    }

    /// Adds a closed axis-aligned ellipse subpath.
    pub fn ellipse(&mut self, center: Point, rx: f32, ry: f32) {
        let radius = f32::max(rx.abs(), ry.abs());
        let n = u32::max(
            4,
            arc::segment_count(TAU, radius, self.scale, self.tolerance),
        );

        self.move_to(point(center.x + rx, center.y));
        let step = TAU / n as f32;
        for i in 1..n {
            let (sin, cos) = (step * i as f32).sin_cos();
            self.line_to(point(center.x + rx * cos, center.y + ry * sin));
        }
        self.close();
    }

    /// Appends a run of points to the current subpath.
    ///
    /// Starts a new subpath if there is no open one. Points closer than epsilon to the
    /// previous vertex are dropped.
    pub fn polyline(&mut self, points: &[Point]) {
        let (first, rest) = match points.split_first() {
            Some(split) => split,
            None => return,
        };

        if self.has_open_subpath() {
            self.line_to(*first);
        } else {
            self.move_to(*first);
        }

        for p in rest {
            self.push_vertex(*p);
        }
    }

    /// Closes the current subpath.
    ///
    /// Trailing vertices that coincide with the first one are removed. Closing an
    /// already closed subpath does nothing.
    pub fn close(&mut self) {
        let idx = match self.current {
            Some(idx) => idx,
            None => return,
        };

        let subpath = &mut self.subpaths[idx];
        if subpath.closed {
            return;
        }

        let first = self.vertices[subpath.first_vertex];
        while subpath.vertex_count > 1 {
            let last = self.vertices[subpath.first_vertex + subpath.vertex_count - 1];
            if (last - first).square_length() >= EPSILON_SQ {
                break;
            }
            self.vertices.pop();
            subpath.vertex_count -= 1;
        }

        subpath.closed = true;
    }

    #[inline]
    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    #[inline]
    pub fn subpath_points(&self, subpath: &SubPath) -> &[Point] {
        &self.vertices[subpath.range()]
    }

    /// The shared vertex buffer of every subpath.
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn iter(&self) -> Iter {
        Iter {
            vertices: &self.vertices,
            subpaths: self.subpaths.iter(),
        }
    }

    /// Position the next segment would start from.
    pub fn current_position(&self) -> Option<Point> {
        let subpath = &self.subpaths[self.current?];
        if subpath.closed {
            return Some(self.vertices[subpath.first_vertex]);
        }

        self.vertices.last().cloned()
    }

    /// Bounding box of all vertices, or an empty box at the origin for an empty path.
    pub fn bounding_box(&self) -> Box2D {
        if self.vertices.is_empty() {
            return Box2D::zero();
        }

        Box2D::from_points(self.vertices.iter())
    }

    /// Applies a transform to every vertex.
    ///
    /// Transforms that shrink the path can bring consecutive vertices closer than
    /// epsilon, prefer flattening with the final scale instead of transforming a
    /// flattened path down.
    pub fn transform(&mut self, transform: &Transform) {
        transform_points(transform, &mut self.vertices);
    }

    fn has_open_subpath(&self) -> bool {
        match self.current {
            Some(idx) => !self.subpaths[idx].closed,
            None => false,
        }
    }

    fn begin_subpath(&mut self, at: Point) {
        self.current = Some(self.subpaths.len());
        self.subpaths.push(SubPath {
            first_vertex: self.vertices.len(),
            vertex_count: 1,
            closed: false,
        });
        self.vertices.push(at);
    }

    // Returns the point the next segment starts from, creating a subpath if needed.
    // Returns `None` if there is nothing to draw from, in which case a subpath was
    // started at `to`.
    fn segment_start(&mut self, to: Point) -> Option<Point> {
        let idx = match self.current {
            Some(idx) => idx,
            None => {
                debug_assert!(false, "Path segment added without a move_to.");
                log::warn!("Path segment added without a move_to, starting a subpath at {:?}", to);
                self.begin_subpath(to);
                return None;
            }
        };

        let subpath = self.subpaths[idx];
        if subpath.closed {
            let first = self.vertices[subpath.first_vertex];
            self.begin_subpath(first);
            return Some(first);
        }

        Some(self.vertices[subpath.first_vertex + subpath.vertex_count - 1])
    }

    fn push_vertex(&mut self, p: Point) {
        let idx = match self.current {
            Some(idx) => idx,
            None => return,
        };

        if let Some(last) = self.vertices.last() {
            if (p - *last).square_length() < EPSILON_SQ {
                return;
            }
        }

        self.vertices.push(p);
        self.subpaths[idx].vertex_count += 1;
    }

    // Quarter circle from `center + a` to `center + b`.
    fn corner(&mut self, center: Point, a: Vector, b: Vector, radius: f32) {
        let n = arc::segment_count(FRAC_PI_2, radius, self.scale, self.tolerance);
        let step = FRAC_PI_2 / n as f32;
        for i in 0..=n {
            let (sin, cos) = (step * i as f32).sin_cos();
            self.line_to(center + a * cos + b * sin);
        }
    }

    // Iterative de Casteljau subdivision. Pieces are split in half until they are flat
    // enough or the maximum depth is reached, the end point of each accepted piece is
    // added to the current subpath.
    fn flatten_cubic(&mut self, curve: [Point; 4]) {
        let tolerance = self.flattening_tolerance();
        let mut stack: ArrayVec<([Point; 4], u8), { MAX_FLATTENING_DEPTH as usize + 2 }> =
            ArrayVec::new();
        stack.push((curve, 0));

        while let Some((piece, depth)) = stack.pop() {
            if depth >= MAX_FLATTENING_DEPTH || is_flat(&piece, tolerance) {
                if depth >= MAX_FLATTENING_DEPTH && !is_flat(&piece, tolerance) {
                    log::trace!("Cubic flattening reached the maximum depth");
                }
                self.push_vertex(piece[3]);
                continue;
            }

            let (first, second) = split_cubic(&piece);
            stack.push((second, depth + 1));
            stack.push((first, depth + 1));
        }
    }
}

impl Default for Path {
    fn default() -> Self {
        Path::new()
    }
}

/// Iterator over the subpaths of a [`Path`] and their points.
pub struct Iter<'l> {
    vertices: &'l [Point],
    subpaths: core::slice::Iter<'l, SubPath>,
}

impl<'l> Iterator for Iter<'l> {
    type Item = (SubPath, &'l [Point]);

    fn next(&mut self) -> Option<Self::Item> {
        let subpath = *self.subpaths.next()?;
        Some((subpath, &self.vertices[subpath.range()]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.subpaths.size_hint()
    }
}

impl<'l> IntoIterator for &'l Path {
    type Item = (SubPath, &'l [Point]);
    type IntoIter = Iter<'l>;

    fn into_iter(self) -> Iter<'l> {
        self.iter()
    }
}

fn split_cubic(c: &[Point; 4]) -> ([Point; 4], [Point; 4]) {
    let p01 = c[0].lerp(c[1], 0.5);
    let p12 = c[1].lerp(c[2], 0.5);
    let p23 = c[2].lerp(c[3], 0.5);
    let p012 = p01.lerp(p12, 0.5);
    let p123 = p12.lerp(p23, 0.5);
    let mid = p012.lerp(p123, 0.5);

    ([c[0], p01, p012, mid], [mid, p123, p23, c[3]])
}

// The sum of the distances of the control points to the chord bounds the distance
// between the curve and the chord, as long as the control points project inside it.
fn is_flat(c: &[Point; 4], tolerance: f32) -> bool {
    let chord = c[3] - c[0];
    let chord_sq = chord.square_length();
    let d1 = c[1] - c[0];
    let d2 = c[2] - c[0];
    let tolerance_sq = tolerance * tolerance;

    if chord_sq < EPSILON_SQ {
        return d1.square_length() <= tolerance_sq && d2.square_length() <= tolerance_sq;
    }

    let t1 = dot(d1, chord);
    let t2 = dot(d2, chord);
    if t1 < 0.0 || t1 > chord_sq || t2 < 0.0 || t2 > chord_sq {
        return false;
    }

    let d = cross(chord, d1).abs() + cross(chord, d2).abs();

    d * d <= tolerance_sq * chord_sq
}

#[cfg(test)]
fn cubic_point(c: &[Point; 4], t: f32) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c2 = 3.0 * mt * t * t;
    let d = t * t * t;
    point(
        c[0].x * a + c[1].x * b + c[2].x * c2 + c[3].x * d,
        c[0].y * a + c[1].y * b + c[2].y * c2 + c[3].y * d,
    )
}

#[cfg(test)]
fn distance_to_polyline(p: Point, polyline: &[Point]) -> f32 {
    let mut min = f32::MAX;
    for segment in polyline.windows(2) {
        let (a, b) = (segment[0], segment[1]);
        let ab = b - a;
        let t = (dot(p - a, ab) / ab.square_length()).max(0.0).min(1.0);
        min = min.min((a + ab * t - p).length());
    }
    min
}

#[cfg(test)]
fn assert_no_consecutive_duplicates(path: &Path) {
    for (subpath, points) in path.iter() {
        for pair in points.windows(2) {
            assert!(
                (pair[1] - pair[0]).square_length() >= EPSILON_SQ,
                "duplicate vertices {:?} in {:?}",
                pair,
                subpath
            );
        }
        if subpath.closed && points.len() > 1 {
            assert!((points[points.len() - 1] - points[0]).square_length() >= EPSILON_SQ);
        }
    }
}

#[test]
fn test_cubic_flattening_tolerance() {
    let curves = [
        [point(0.0, 0.0), point(10.0, 20.0), point(30.0, -20.0), point(40.0, 0.0)],
        [point(0.0, 0.0), point(100.0, 0.0), point(100.0, 100.0), point(0.0, 100.0)],
        [point(0.0, 0.0), point(50.0, 50.0), point(-50.0, 50.0), point(0.0, 0.0)],
        [point(5.0, 5.0), point(5.0, 5.0), point(300.0, 5.0), point(300.0, 300.0)],
    ];

    for &(scale, tolerance) in &[(1.0, 0.25), (1.0, 0.01), (4.0, 0.25), (0.5, 1.0)] {
        for curve in &curves {
            let mut path = Path::new();
            path.reset(scale, tolerance);
            path.move_to(curve[0]);
            path.cubic_to(curve[1], curve[2], curve[3]);

            let points = path.subpath_points(&path.subpaths()[0]);
            assert!(points.len() >= 2);
            assert_eq!(points[0], curve[0]);
            assert_eq!(*points.last().unwrap(), curve[3]);

            let max_distance = tolerance / scale + 1e-3;
            for i in 0..=200 {
                let p = cubic_point(curve, i as f32 / 200.0);
                let d = distance_to_polyline(p, points);
                assert!(
                    d <= max_distance,
                    "curve {:?} at scale {} tolerance {}: distance {}",
                    curve,
                    scale,
                    tolerance,
                    d
                );
            }

            assert_no_consecutive_duplicates(&path);
        }
    }
}

#[test]
fn test_flattening_gets_finer_with_scale() {
    let count = |scale: f32| {
        let mut path = Path::new();
        path.reset(scale, 0.25);
        path.move_to(point(0.0, 0.0));
        path.cubic_to(point(0.0, 100.0), point(100.0, 100.0), point(100.0, 0.0));
        path.vertices().len()
    };

    assert!(count(1.0) <= count(2.0));
    assert!(count(2.0) <= count(8.0));
    assert!(count(8.0) > count(0.25));
}

#[test]
fn test_straight_cubic() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0));
    path.cubic_to(point(1.0, 0.0), point(2.0, 0.0), point(3.0, 0.0));

    assert_eq!(path.vertices(), &[point(0.0, 0.0), point(3.0, 0.0)]);
}

#[test]
fn test_quadratic() {
    let mut path = Path::new();
    path.reset(1.0, 0.1);
    path.move_to(point(0.0, 0.0));
    path.quadratic_to(point(10.0, 10.0), point(20.0, 0.0));

    let points = path.vertices();
    assert!(points.len() > 3);
    assert_eq!(*points.last().unwrap(), point(20.0, 0.0));
    // The apex of the parabola is at y = 5.
    let max_y = points.iter().map(|p| p.y).fold(0.0, f32::max);
    assert!((max_y - 5.0).abs() <= 0.1 + 1e-3);
}

#[test]
fn test_line_to_skips_duplicates() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0));
    path.line_to(point(0.0, 0.0));
    path.line_to(point(0.0001, 0.0));
    path.line_to(point(1.0, 0.0));
    path.line_to(point(1.0, 0.0));

    assert_eq!(path.vertices(), &[point(0.0, 0.0), point(1.0, 0.0)]);
    assert_eq!(path.subpaths()[0].vertex_count, 2);
}

#[test]
fn test_move_to_reuses_empty_subpath() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0));
    path.move_to(point(5.0, 5.0));
    path.line_to(point(6.0, 5.0));

    assert_eq!(path.subpaths().len(), 1);
    assert_eq!(path.vertices(), &[point(5.0, 5.0), point(6.0, 5.0)]);

    path.move_to(point(10.0, 10.0));
    assert_eq!(path.subpaths().len(), 2);
    assert_eq!(path.subpaths()[1].first_vertex, 2);
}

#[test]
fn test_close() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0));
    path.line_to(point(1.0, 0.0));
    path.line_to(point(1.0, 1.0));
    path.line_to(point(0.0, 0.0));
    path.close();

    let subpath = path.subpaths()[0];
    assert!(subpath.closed);
    assert_eq!(subpath.vertex_count, 3);

    let vertices = path.vertices().to_vec();
    path.close();
    assert_eq!(path.subpaths(), &[subpath]);
    assert_eq!(path.vertices(), &vertices[..]);

    assert_no_consecutive_duplicates(&path);
}

#[test]
fn test_line_to_after_close() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0));
    path.line_to(point(1.0, 0.0));
    path.line_to(point(1.0, 1.0));
    path.close();
    assert_eq!(path.current_position(), Some(point(0.0, 0.0)));

    path.line_to(point(-1.0, 0.0));

    assert_eq!(path.subpaths().len(), 2);
    assert!(path.subpaths()[0].closed);
    assert!(!path.subpaths()[1].closed);
    assert_eq!(
        path.subpath_points(&path.subpaths()[1]),
        &[point(0.0, 0.0), point(-1.0, 0.0)]
    );
}

#[test]
fn test_rect() {
    let mut path = Path::new();
    path.rect(1.0, 2.0, 3.0, 4.0);

    assert_eq!(path.subpaths().len(), 1);
    assert!(path.subpaths()[0].closed);
    assert_eq!(
        path.vertices(),
        &[point(1.0, 2.0), point(4.0, 2.0), point(4.0, 6.0), point(1.0, 6.0)]
    );
}

#[test]
fn test_rounded_rect() {
    let mut path = Path::new();
    path.reset(1.0, 0.1);
    path.rounded_rect(0.0, 0.0, 100.0, 50.0, 10.0);

    assert_eq!(path.subpaths().len(), 1);
    assert!(path.subpaths()[0].closed);
    assert!(path.vertices().len() > 8);
    assert_no_consecutive_duplicates(&path);

    let bounds = path.bounding_box();
    assert!((bounds.min - point(0.0, 0.0)).length() < 1e-4);
    assert!((bounds.max - point(100.0, 50.0)).length() < 1e-4);

    // Tiny radii produce a plain rectangle.
    let mut path = Path::new();
    path.rounded_rect_varying(0.0, 0.0, 10.0, 10.0, 0.05, 0.0, 0.01, 0.09);
    assert_eq!(path.vertices().len(), 4);

    // Radii larger than half of the smallest side are clamped.
    let mut path = Path::new();
    path.reset(1.0, 0.1);
    path.rounded_rect(0.0, 0.0, 20.0, 10.0, 100.0);
    let bounds = path.bounding_box();
    assert!((bounds.max - point(20.0, 10.0)).length() < 1e-4);
    for p in path.vertices() {
        assert!(p.y >= -1e-4 && p.y <= 10.0 + 1e-4);
    }
}

#[test]
fn test_circle() {
    let mut path = Path::new();
    path.reset(1.0, 0.25);
    path.circle(point(10.0, 10.0), 5.0);

    let subpath = path.subpaths()[0];
    assert!(subpath.closed);
    assert!(subpath.vertex_count >= 4);
    for p in path.vertices() {
        assert!(((*p - point(10.0, 10.0)).length() - 5.0).abs() < 1e-4);
    }

    // Tiny circles still get at least four segments.
    let mut path = Path::new();
    path.circle(point(0.0, 0.0), 0.01);
    assert_eq!(path.vertices().len(), 4);
}

#[test]
fn test_circle_density_grows_with_radius() {
    let mut prev = 0;
    for i in 1..50 {
        let mut path = Path::new();
        path.reset(1.0, 0.25);
        path.circle(point(0.0, 0.0), i as f32 * 2.0);
        let n = path.vertices().len();
        assert!(n >= prev);
        prev = n;
    }
}

#[test]
fn test_arc() {
    use core::f32::consts::PI;

    let mut path = Path::new();
    path.reset(1.0, 0.1);
    path.arc(point(0.0, 0.0), 10.0, 0.0, PI, Winding::Positive);

    let points = path.vertices();
    assert!((points[0] - point(10.0, 0.0)).length() < 1e-4);
    assert!((*points.last().unwrap() - point(-10.0, 0.0)).length() < 1e-4);
    for p in points {
        assert!(p.y >= -1e-4);
    }

    // Same angles, other direction.
    let mut path = Path::new();
    path.reset(1.0, 0.1);
    path.move_to(point(20.0, 0.0));
    path.arc(point(0.0, 0.0), 10.0, 0.0, PI, Winding::Negative);

    assert_eq!(path.subpaths().len(), 1);
    let points = path.vertices();
    assert_eq!(points[0], point(20.0, 0.0));
    for p in &points[1..] {
        assert!(p.y <= 1e-4);
    }
}

#[test]
fn test_arc_multi_turn_sweeps() {
    use core::f32::consts::PI;

    // Start angles far from zero wrap in one step.
    let mut path = Path::new();
    path.reset(1.0, 0.25);
    path.move_to(point(0.0, 0.0));
    path.arc(point(0.0, 0.0), 10.0, 2.0e8, 0.0, Winding::Positive);
    let n = path.vertices().len();
    assert!(n > 1);
    assert!(n <= arc::segment_count(TAU, 10.0, 1.0, 0.25) as usize + 2);
    for p in &path.vertices()[1..] {
        assert!((p.to_vector().length() - 10.0).abs() < 1e-3);
    }

    let mut path = Path::new();
    path.reset(1.0, 0.25);
    path.arc(point(0.0, 0.0), 10.0, -2.0e8, 0.0, Winding::Negative);
    assert!(path.vertices().len() > 1);

    // Extra full turns are dropped, this is a three quarter turn in the negative direction.
    let mut path = Path::new();
    path.reset(1.0, 0.1);
    path.arc(point(0.0, 0.0), 10.0, 0.0, FRAC_PI_2 + 4.0 * PI, Winding::Negative);
    let last = *path.vertices().last().unwrap();
    assert!((last - point(0.0, 10.0)).length() < 1e-3);
    assert!(path.vertices().iter().any(|p| p.y < -9.0));
    for p in path.vertices() {
        assert!(p.x <= 1e-3 || p.y <= 1e-3);
    }

    // Sweeping backward with a positive winding goes the long way around.
    let mut path = Path::new();
    path.reset(1.0, 0.1);
    path.arc(point(0.0, 0.0), 10.0, 0.0, -FRAC_PI_2 - 4.0 * PI, Winding::Positive);
    let last = *path.vertices().last().unwrap();
    assert!((last - point(0.0, -10.0)).length() < 1e-3);
    assert!(path.vertices().iter().any(|p| p.x < -9.0));
}

#[test]
fn test_polyline() {
    let mut path = Path::new();
    path.polyline(&[
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 0.0),
        point(2.0, 0.0),
    ]);
    path.polyline(&[point(2.0, 0.0), point(3.0, 1.0)]);

    assert_eq!(path.subpaths().len(), 1);
    assert_eq!(
        path.vertices(),
        &[point(0.0, 0.0), point(1.0, 0.0), point(2.0, 0.0), point(3.0, 1.0)]
    );

    path.polyline(&[]);
    assert_eq!(path.vertices().len(), 4);
}

#[test]
fn test_reset_keeps_parameters() {
    let mut path = Path::new();
    path.rect(0.0, 0.0, 1.0, 1.0);
    path.reset(2.0, 0.5);

    assert!(path.is_empty());
    assert!(path.vertices().is_empty());
    assert_eq!(path.current_position(), None);
    assert_eq!(path.flattening_tolerance(), 0.25);
}

#[test]
fn test_transform() {
    let mut path = Path::new();
    path.rect(0.0, 0.0, 1.0, 2.0);
    path.transform(&Transform::scale(2.0, 2.0).then_translate(vector(1.0, 0.0)));

    assert_eq!(
        path.vertices(),
        &[point(1.0, 0.0), point(3.0, 0.0), point(3.0, 4.0), point(1.0, 4.0)]
    );
}
