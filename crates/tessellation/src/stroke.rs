use crate::buffers::ScratchBuffer;
use crate::color::{PackedColor, TRANSPARENT};
use crate::error::{TessellationError, TessellationResult};
use crate::geom::arc;
use crate::geom::kernel::{
    cross, direction, dot, extrusion_vector, perp_ccw, EPSILON_SQ, PARALLEL_THRESHOLD,
};
use crate::math::*;
use crate::mesh::{Mesh, MAX_VERTICES};
use crate::{LineCap, LineJoin, StrokeStyle, StrokerOptions};

use arrayvec::ArrayVec;
use core::f32::consts::{PI, TAU};

pub(crate) const MAX_RINGS: usize = 4;

/// A line parallel to the stroked polyline, at a signed distance from it.
///
/// Positive offsets are on the left side of the polyline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Ring {
    pub offset: f32,
    pub opaque: bool,
}

/// The rings of a stroke, ordered from left to right.
///
/// Each connection between two consecutive vertices of the polyline is a quad between
/// each pair of adjacent rings.
#[derive(Clone, Debug)]
pub(crate) struct CrossSection {
    pub rings: ArrayVec<Ring, MAX_RINGS>,
    /// `None` for meshes without vertex colors.
    pub color: Option<PackedColor>,
    /// Width of the fade out beyond butt and square cap ends.
    pub cap_fringe: Option<f32>,
}

impl CrossSection {
    pub fn solid(half_width: f32) -> Self {
        CrossSection {
            rings: [
                Ring { offset: half_width, opaque: true },
                Ring { offset: -half_width, opaque: true },
            ]
            .into_iter()
            .collect(),
            color: None,
            cap_fringe: None,
        }
    }

    pub fn anti_aliased(half_width: f32, fringe: f32, color: PackedColor) -> Self {
        CrossSection {
            rings: [
                Ring { offset: half_width + fringe, opaque: false },
                Ring { offset: half_width, opaque: true },
                Ring { offset: -half_width, opaque: true },
                Ring { offset: -half_width - fringe, opaque: false },
            ]
            .into_iter()
            .collect(),
            color: Some(color),
            cap_fringe: Some(fringe),
        }
    }

    /// An opaque center line fading out on both sides.
    pub fn thin(fringe: f32, color: PackedColor) -> Self {
        CrossSection {
            rings: [
                Ring { offset: fringe, opaque: false },
                Ring { offset: 0.0, opaque: true },
                Ring { offset: -fringe, opaque: false },
            ]
            .into_iter()
            .collect(),
            color: Some(color),
            cap_fringe: None,
        }
    }

    /// Fades out on the right side of a contour.
    pub fn fringe(fringe: f32, color: PackedColor) -> Self {
        CrossSection {
            rings: [
                Ring { offset: 0.0, opaque: true },
                Ring { offset: -fringe, opaque: false },
            ]
            .into_iter()
            .collect(),
            color: Some(color),
            cap_fringe: None,
        }
    }

    fn vertex_color(&self, ring: &Ring) -> Option<PackedColor> {
        self.color
            .map(|color| if ring.opaque { color } else { TRANSPARENT })
    }

    fn max_radius(&self) -> f32 {
        self.rings
            .iter()
            .fold(0.0, |radius, ring| f32::max(radius, ring.offset.abs()))
    }

    fn is_symmetric(&self) -> bool {
        let n = self.rings.len();
        (0..n).all(|i| (self.rings[i].offset + self.rings[n - 1 - i].offset).abs() <= 1e-5)
    }
}

/// One vertex per ring, across the stroke.
type Slice = ArrayVec<u16, MAX_RINGS>;

/// Vertex and index buffers of the mesh being generated.
#[derive(Default)]
pub(crate) struct Geometry {
    pub positions: ScratchBuffer<Point>,
    pub colors: ScratchBuffer<PackedColor>,
    pub indices: ScratchBuffer<u16>,
}

impl Geometry {
    pub fn reset(&mut self) {
        self.positions.reset();
        self.colors.reset();
        self.indices.reset();
    }

    pub fn add_vertex(
        &mut self,
        position: Point,
        color: Option<PackedColor>,
    ) -> TessellationResult<u16> {
        let idx = self.positions.len();
        if idx >= MAX_VERTICES {
            return Err(TessellationError::TooManyVertices);
        }

        self.positions.push(position)?;
        if let Some(color) = color {
            self.colors.push(color)?;
        }

        Ok(idx as u16)
    }

    #[inline]
    pub fn add_triangle(&mut self, a: u16, b: u16, c: u16) -> TessellationResult<()> {
        self.indices.extend_from_slice(&[a, b, c])
    }

    pub fn mesh(&self, with_colors: bool) -> Mesh {
        debug_assert!(!with_colors || self.colors.len() == self.positions.len());
        Mesh {
            positions: self.positions.as_slice(),
            colors: if with_colors {
                Some(self.colors.as_slice())
            } else {
                None
            },
            indices: self.indices.as_slice(),
        }
    }
}

/// Generates fill and stroke meshes for polylines.
///
/// The stroker owns the buffers the meshes are written into. They grow as needed and
/// are reused from one call to the next, the returned [`Mesh`] borrows them until the
/// next call.
///
/// # Examples
///
/// ```
/// use meshvg_tessellation::{Stroker, StrokerOptions, StrokeStyle, LineJoin};
/// use meshvg_tessellation::math::point;
///
/// let mut stroker = Stroker::with_options(StrokerOptions::for_device_pixel_ratio(2.0));
///
/// let square = [point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)];
/// let mesh = stroker
///     .stroke(&square, true, &StrokeStyle::new(2.0).with_line_join(LineJoin::Miter))
///     .unwrap();
///
/// assert_eq!(mesh.vertex_count(), 8);
/// assert_eq!(mesh.triangle_count(), 8);
/// ```
pub struct Stroker {
    pub(crate) options: StrokerOptions,
    pub(crate) geometry: Geometry,
    pub(crate) polyline: ScratchBuffer<Point>,
    pub(crate) d01: ScratchBuffer<Vector>,
    pub(crate) d12: ScratchBuffer<Vector>,
    pub(crate) extrusions: ScratchBuffer<Vector>,
    pub(crate) log: bool,
}

impl Stroker {
    pub fn new() -> Self {
        Stroker::with_options(StrokerOptions::DEFAULT)
    }

    pub fn with_options(options: StrokerOptions) -> Self {
        Stroker {
            options,
            geometry: Geometry::default(),
            polyline: ScratchBuffer::new(),
            d01: ScratchBuffer::new(),
            d12: ScratchBuffer::new(),
            extrusions: ScratchBuffer::new(),
            log: false,
        }
    }

    #[inline]
    pub fn options(&self) -> &StrokerOptions {
        &self.options
    }

    #[inline]
    pub fn set_options(&mut self, options: StrokerOptions) {
        self.options = options;
    }

    /// Enable/disable some verbose logging during the tessellation, for
    /// debugging purposes.
    ///
    /// Messages are emitted with `log::trace!` in debug builds only.
    pub fn set_logging(&mut self, is_enabled: bool) {
        self.log = is_enabled;
    }

    /// Strokes a polyline without anti-aliasing.
    ///
    /// Closed polylines are connected back to their first point with a join and have no
    /// caps. Polylines with less than two distinct points produce an empty mesh.
    pub fn stroke(
        &mut self,
        points: &[Point],
        closed: bool,
        style: &StrokeStyle,
    ) -> TessellationResult<Mesh> {
        self.geometry.reset();

        let half_width = style.width * 0.5;
        let section = CrossSection::solid(half_width);
        self.stroke_section(points, closed, &section, style.cap, style.join, half_width)?;

        Ok(self.geometry.mesh(false))
    }

    /// Strokes a polyline with an anti-aliasing fringe on both sides.
    ///
    /// Strokes that are not wider than the fringe are rendered as thin strokes, which
    /// don't support round caps and joins: debug builds panic, release builds fall back
    /// to butt caps and bevel joins.
    pub fn stroke_aa(
        &mut self,
        points: &[Point],
        closed: bool,
        style: &StrokeStyle,
        color: PackedColor,
    ) -> TessellationResult<Mesh> {
        self.geometry.reset();

        let fringe = self.options.fringe_width;
        let half_width = style.width * 0.5;
        let (section, cap, join) = if style.width <= fringe {
            let (cap, join) = thin_stroke_style(style);
            (CrossSection::thin(fringe, color), cap, join)
        } else {
            (
                CrossSection::anti_aliased(half_width, fringe, color),
                style.cap,
                style.join,
            )
        };

        self.stroke_section(points, closed, &section, cap, join, half_width)?;

        Ok(self.geometry.mesh(true))
    }

    /// Copies `points` into the polyline buffer without consecutive duplicates.
    pub(crate) fn prepare_polyline(
        &mut self,
        points: &[Point],
        closed: bool,
    ) -> TessellationResult<()> {
        self.polyline.reset();
        self.polyline.reserve(points.len())?;
        for p in points {
            if let Some(last) = self.polyline.last() {
                if (*p - *last).square_length() < EPSILON_SQ {
                    continue;
                }
            }
            self.polyline.push(*p)?;
        }

        if closed {
            while self.polyline.len() > 1 {
                let first = self.polyline.as_slice()[0];
                let last = self.polyline.as_slice()[self.polyline.len() - 1];
                if (last - first).square_length() >= EPSILON_SQ {
                    break;
                }
                self.polyline.truncate(self.polyline.len() - 1);
            }
        }

        Ok(())
    }

    /// Appends the stroke of a polyline to the current geometry.
    ///
    /// The geometry is reset if an error occurs.
    pub(crate) fn stroke_section(
        &mut self,
        points: &[Point],
        closed: bool,
        section: &CrossSection,
        cap: LineCap,
        join: LineJoin,
        half_width: f32,
    ) -> TessellationResult<()> {
        let result = self.prepare_polyline(points, closed).and_then(|_| {
            let mut builder = StrokeBuilder {
                geometry: &mut self.geometry,
                section,
                cap,
                join,
                half_width,
                scale: self.options.scale,
                tolerance: self.options.tolerance,
            };

            builder.stroke(self.polyline.as_slice(), closed)
        });

        match result {
            Ok(()) => {
                stroke_log!(
                    self,
                    "stroke: {} points, closed: {}, {:?} {:?}, {} rings -> {} vertices, {} triangles",
                    points.len(),
                    closed,
                    cap,
                    join,
                    section.rings.len(),
                    self.geometry.positions.len(),
                    self.geometry.indices.len() / 3
                );
                Ok(())
            }
            Err(e) => {
                log::debug!("Stroke failed with error: {}", e);
                self.geometry.reset();
                Err(e)
            }
        }
    }
}

impl Default for Stroker {
    fn default() -> Self {
        Stroker::new()
    }
}

fn thin_stroke_style(style: &StrokeStyle) -> (LineCap, LineJoin) {
    debug_assert!(
        style.cap != LineCap::Round && style.join != LineJoin::Round,
        "Thin strokes do not support round caps and joins"
    );

    let mut cap = style.cap;
    let mut join = style.join;
    if cap == LineCap::Round || join == LineJoin::Round {
        log::warn!(
            "Thin stroke (width {}) with round caps or joins, using butt caps and bevel joins",
            style.width
        );
        if cap == LineCap::Round {
            cap = LineCap::Butt;
        }
        if join == LineJoin::Round {
            join = LineJoin::Bevel;
        }
    }

    (cap, join)
}

/// Generates the triangles of one polyline for a given cross section.
struct StrokeBuilder<'l> {
    geometry: &'l mut Geometry,
    section: &'l CrossSection,
    cap: LineCap,
    join: LineJoin,
    half_width: f32,
    scale: f32,
    tolerance: f32,
}

impl<'l> StrokeBuilder<'l> {
    /// `points` must not contain consecutive duplicates.
    fn stroke(&mut self, points: &[Point], closed: bool) -> TessellationResult<()> {
        let n = points.len();
        if n < 2 {
            return Ok(());
        }

        if closed && n >= 3 {
            let (first_in, first_out) = self.join_slices(
                points[0],
                direction(points[n - 1], points[0]),
                direction(points[0], points[1]),
            )?;

            let mut prev = first_out;
            for i in 1..n {
                let (incoming, outgoing) = self.join_slices(
                    points[i],
                    direction(points[i - 1], points[i]),
                    direction(points[i], points[(i + 1) % n]),
                )?;
                self.connect(&prev, &incoming)?;
                prev = outgoing;
            }

            return self.connect(&prev, &first_in);
        }

        let mut prev = self.cap_slice(points[0], direction(points[0], points[1]), true)?;
        for i in 1..(n - 1) {
            let (incoming, outgoing) = self.join_slices(
                points[i],
                direction(points[i - 1], points[i]),
                direction(points[i], points[i + 1]),
            )?;
            self.connect(&prev, &incoming)?;
            prev = outgoing;
        }
        let end = self.cap_slice(points[n - 1], direction(points[n - 2], points[n - 1]), false)?;

        self.connect(&prev, &end)
    }

    fn add_ring_vertex(&mut self, ring: usize, position: Point) -> TessellationResult<u16> {
        let color = self.section.vertex_color(&self.section.rings[ring]);
        self.geometry.add_vertex(position, color)
    }

    /// A quad between each pair of adjacent rings.
    fn connect(&mut self, a: &Slice, b: &Slice) -> TessellationResult<()> {
        debug_assert_eq!(a.len(), b.len());
        for j in 0..(a.len() - 1) {
            self.geometry.add_triangle(a[j], a[j + 1], b[j])?;
            self.geometry.add_triangle(a[j + 1], b[j + 1], b[j])?;
        }

        Ok(())
    }

    /// Generates the vertices of a join and returns the slices ending the incoming
    /// segment and starting the outgoing one.
    fn join_slices(
        &mut self,
        position: Point,
        d01: Vector,
        d12: Vector,
    ) -> TessellationResult<(Slice, Slice)> {
        let v = extrusion_vector(d01, d12);
        let num_rings = self.section.rings.len();

        let straight = cross(d01, d12).abs() < PARALLEL_THRESHOLD && dot(d01, d12) > 0.0;
        if self.join == LineJoin::Miter || straight {
            let mut slice = Slice::new();
            for j in 0..num_rings {
                let offset = self.section.rings[j].offset;
                slice.push(self.add_ring_vertex(j, position + v * offset)?);
            }

            return Ok((slice.clone(), slice));
        }

        // Rings on the outer side of the corner follow an arc from the normal of the
        // incoming segment to the normal of the outgoing one, the others meet at the
        // intersection of their offset lines.
        let outer_sign = if dot(d12, v) > 0.0 { -1.0 } else { 1.0 };
        let n0 = perp_ccw(d01);
        let n1 = perp_ccw(d12);
        let mut angle = cross(n0, n1).atan2(dot(n0, n1));
        if outer_sign > 0.0 && angle > 0.0 {
            angle -= TAU;
        } else if outer_sign < 0.0 && angle < 0.0 {
            angle += TAU;
        }

        let num_segments = match self.join {
            LineJoin::Round => arc::segment_count(
                angle,
                self.section.max_radius(),
                self.scale,
                self.tolerance,
            ),
            _ => 1,
        };

        let mut incoming = Slice::new();
        let mut outgoing = Slice::new();
        for j in 0..num_rings {
            let offset = self.section.rings[j].offset;
            if offset * outer_sign > 0.0 {
                let mut first = 0;
                let mut last = 0;
                for k in 0..=num_segments {
                    let normal = arc::rotate(n0, angle * k as f32 / num_segments as f32);
                    let idx = self.add_ring_vertex(j, position + normal * offset)?;
                    if k == 0 {
                        first = idx;
                    }
                    last = idx;
                }
                incoming.push(first);
                outgoing.push(last);
            } else {
                let idx = self.add_ring_vertex(j, position + v * offset)?;
                incoming.push(idx);
                outgoing.push(idx);
            }
        }

        // Arc vertices of a ring are consecutive, from `incoming[j]` to `outgoing[j]`.
        let section = self.section;
        let is_outer = |j: usize| section.rings[j].offset * outer_sign > 0.0;
        let (innermost_outer, anchor) = if outer_sign > 0.0 {
            let count = (0..num_rings).take_while(|&j| is_outer(j)).count();
            (count.checked_sub(1), Some(count).filter(|&a| a < num_rings))
        } else {
            let count = (0..num_rings).rev().take_while(|&j| is_outer(j)).count();
            let first = num_rings - count;
            (
                Some(first).filter(|_| count > 0),
                first.checked_sub(1),
            )
        };

        for k in 0..num_segments as u16 {
            for j in 0..(num_rings - 1) {
                if is_outer(j) && is_outer(j + 1) {
                    let (a, b) = (incoming[j] + k, incoming[j + 1] + k);
                    self.geometry.add_triangle(a, a + 1, b)?;
                    self.geometry.add_triangle(a + 1, b + 1, b)?;
                }
            }

            if let (Some(outer), Some(anchor)) = (innermost_outer, anchor) {
                let a = incoming[outer] + k;
                self.geometry.add_triangle(incoming[anchor], a, a + 1)?;
            }
        }

        Ok((incoming, outgoing))
    }

    /// Generates a cap and returns the slice connecting it to the rest of the stroke.
    fn cap_slice(&mut self, position: Point, tangent: Vector, start: bool) -> TessellationResult<Slice> {
        let normal = perp_ccw(tangent);
        let along = if start { -self.half_width } else { self.half_width };

        let base = match self.cap {
            LineCap::Butt => position,
            LineCap::Square => position + tangent * along,
            LineCap::Round => {
                let sweep = if start { PI } else { -PI };
                return self.round_cap(position, normal, sweep);
            }
        };

        let mut slice = Slice::new();
        for j in 0..self.section.rings.len() {
            let offset = self.section.rings[j].offset;
            slice.push(self.add_ring_vertex(j, base + normal * offset)?);
        }

        if let Some(fringe) = self.section.cap_fringe {
            // A fully transparent slice past the cap end.
            let section = self.section;
            let outer = base + tangent * fringe.copysign(along);
            let color = section.color.map(|_| TRANSPARENT);
            let mut faded = Slice::new();
            for ring in &section.rings {
                faded.push(self.geometry.add_vertex(outer + normal * ring.offset, color)?);
            }

            if start {
                self.connect(&faded, &slice)?;
            } else {
                self.connect(&slice, &faded)?;
            }
        }

        Ok(slice)
    }

    /// Concentric half circles, one per positive ring, around a center vertex.
    ///
    /// The arcs go from the left side of the stroke (`normal`) to the right side,
    /// rotating by `sweep`.
    fn round_cap(&mut self, position: Point, normal: Vector, sweep: f32) -> TessellationResult<Slice> {
        debug_assert!(self.section.is_symmetric());

        let num_rings = self.section.rings.len();
        let num_segments =
            arc::segment_count(PI, self.section.max_radius(), self.scale, self.tolerance);

        let center_ring = self.section.rings.iter().position(|ring| ring.offset == 0.0);
        let center = match center_ring {
            Some(j) => self.add_ring_vertex(j, position)?,
            None => self.geometry.add_vertex(position, self.section.color)?,
        };

        let mut arc_start: ArrayVec<u16, MAX_RINGS> = ArrayVec::new();
        let num_positive = self
            .section
            .rings
            .iter()
            .take_while(|ring| ring.offset > 0.0)
            .count();
        for j in 0..num_positive {
            let offset = self.section.rings[j].offset;
            let mut first = 0;
            for k in 0..=num_segments {
                let n = arc::rotate(normal, sweep * k as f32 / num_segments as f32);
                let idx = self.add_ring_vertex(j, position + n * offset)?;
                if k == 0 {
                    first = idx;
                }
            }
            arc_start.push(first);
        }

        for k in 0..num_segments as u16 {
            for j in 0..num_positive.saturating_sub(1) {
                let (a, b) = (arc_start[j] + k, arc_start[j + 1] + k);
                self.geometry.add_triangle(a, a + 1, b)?;
                self.geometry.add_triangle(a + 1, b + 1, b)?;
            }
            if num_positive > 0 {
                let a = arc_start[num_positive - 1] + k;
                self.geometry.add_triangle(center, a, a + 1)?;
            }
        }

        let mut slice = Slice::new();
        for j in 0..num_rings {
            let offset = self.section.rings[j].offset;
            let idx = if offset > 0.0 {
                arc_start[j]
            } else if offset == 0.0 {
                center
            } else {
                arc_start[num_rings - 1 - j] + num_segments as u16
            };
            slice.push(idx);
        }

        Ok(slice)
    }
}
