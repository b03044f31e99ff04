use crate::color::{PackedColor, TRANSPARENT};
use crate::error::{TessellationError, TessellationResult};
use crate::geom::kernel::{cross, direction, polygon_signed_area2};
use crate::geom::simd::extrusion_vectors;
use crate::math::*;
use crate::mesh::{Mesh, MAX_VERTICES};
use crate::polygon::{OutputMode, PolygonTessellator};
use crate::stroke::CrossSection;
use crate::{FillRule, LineCap, LineJoin, Stroker};

impl Stroker {
    /// Fills a convex polygon with a triangle fan.
    ///
    /// The mesh uses `points` as vertex positions, only indices are generated: `n - 2`
    /// triangles for `n` points. Polygons with less than three points produce no
    /// triangle.
    pub fn convex_fill<'a>(&'a mut self, points: &'a [Point]) -> TessellationResult<Mesh<'a>> {
        self.geometry.reset();

        let n = points.len();
        if n > MAX_VERTICES {
            log::debug!("Convex fill of {} points exceeds the vertex limit", n);
            return Err(TessellationError::TooManyVertices);
        }

        if n >= 3 {
            let indices = &mut self.geometry.indices;
            indices.reserve(3 * (n - 2))?;
            for i in 1..(n - 1) {
                let i = i as u16;
                indices.extend_from_slice(&[0, i, i + 1])?;
            }
        }

        stroke_log!(self, "convex fill: {} points", n);

        Ok(Mesh {
            positions: points,
            colors: None,
            indices: self.geometry.indices.as_slice(),
        })
    }

    /// Fills a convex polygon with an anti-aliasing fringe along its edges.
    ///
    /// Each point produces an opaque vertex moved half a fringe inside the polygon and a
    /// transparent one moved half a fringe outside. The polygon can be in either
    /// orientation.
    pub fn convex_fill_aa(
        &mut self,
        points: &[Point],
        color: PackedColor,
    ) -> TessellationResult<Mesh> {
        self.geometry.reset();
        if let Err(e) = self.convex_fill_aa_impl(points, color) {
            log::debug!("Anti-aliased convex fill failed with error: {}", e);
            self.geometry.reset();
            return Err(e);
        }

        Ok(self.geometry.mesh(true))
    }

    fn convex_fill_aa_impl(&mut self, points: &[Point], color: PackedColor) -> TessellationResult<()> {
        self.prepare_polyline(points, true)?;
        let polygon = self.polyline.as_slice();
        let n = polygon.len();
        if n < 3 {
            return Ok(());
        }
        if 2 * n > MAX_VERTICES {
            return Err(TessellationError::TooManyVertices);
        }

        // The extrusion vectors point to the left of the edges, which is the inside of
        // counter-clockwise polygons.
        let mut orientation = cross(polygon[1] - polygon[0], polygon[2] - polygon[0]);
        if orientation == 0.0 {
            orientation = polygon_signed_area2(polygon);
        }
        let sign = if orientation < 0.0 { -1.0 } else { 1.0 };
        let aa = sign * 0.5 * self.options.fringe_width;

        self.d01.fill(Vector::zero(), n)?;
        self.d12.fill(Vector::zero(), n)?;
        self.extrusions.fill(Vector::zero(), n)?;
        {
            let d01 = self.d01.as_mut_slice();
            let d12 = self.d12.as_mut_slice();
            for i in 0..n {
                let prev = polygon[(i + n - 1) % n];
                let next = polygon[(i + 1) % n];
                d01[i] = direction(prev, polygon[i]);
                d12[i] = direction(polygon[i], next);
            }
        }
        extrusion_vectors(
            self.d01.as_slice(),
            self.d12.as_slice(),
            self.extrusions.as_mut_slice(),
        );

        for (p, v) in polygon.iter().zip(self.extrusions.as_slice()) {
            self.geometry.add_vertex(*p + *v * aa, Some(color))?;
            self.geometry.add_vertex(*p - *v * aa, Some(TRANSPARENT))?;
        }

        let n = n as u16;
        for i in 1..(n - 1) {
            self.geometry.add_triangle(0, 2 * i, 2 * i + 2)?;
        }
        for i in 0..n {
            let j = (i + 1) % n;
            let (inner0, outer0) = (2 * i, 2 * i + 1);
            let (inner1, outer1) = (2 * j, 2 * j + 1);
            self.geometry.add_triangle(inner0, outer0, inner1)?;
            self.geometry.add_triangle(outer0, outer1, inner1)?;
        }

        stroke_log!(
            self,
            "anti-aliased convex fill: {} points, fringe offset {}",
            n,
            aa
        );

        Ok(())
    }

    /// Fills arbitrary contours according to a fill rule.
    ///
    /// The triangulation is delegated to `tessellator`. Nothing is produced if it fails.
    ///
    /// With [`EarcutTessellator`](crate::EarcutTessellator), intersecting or touching
    /// contours are rejected, so the fill rule only makes a difference for nested
    /// contours.
    pub fn concave_fill(
        &mut self,
        contours: &[&[Point]],
        fill_rule: FillRule,
        tessellator: &mut dyn PolygonTessellator,
    ) -> TessellationResult<Mesh> {
        self.geometry.reset();
        if let Err(e) = self.triangulate(contours, fill_rule, None, tessellator) {
            log::debug!("Concave fill failed with error: {}", e);
            self.geometry.reset();
            return Err(e);
        }

        Ok(self.geometry.mesh(false))
    }

    /// Fills arbitrary contours according to a fill rule, with an anti-aliasing fringe
    /// outside of the filled area.
    pub fn concave_fill_aa(
        &mut self,
        contours: &[&[Point]],
        fill_rule: FillRule,
        color: PackedColor,
        tessellator: &mut dyn PolygonTessellator,
    ) -> TessellationResult<Mesh> {
        self.geometry.reset();
        if let Err(e) = self.triangulate(contours, fill_rule, Some(color), tessellator) {
            log::debug!("Anti-aliased concave fill failed with error: {}", e);
            self.geometry.reset();
            return Err(e);
        }

        // The filled area is on the left of the boundary, the fringe fades out on the
        // right.
        let section = CrossSection::fringe(self.options.fringe_width, color);
        for contour in tessellator.boundary().contours() {
            self.stroke_section(
                contour,
                true,
                &section,
                LineCap::Butt,
                LineJoin::Miter,
                0.0,
            )?;
        }

        Ok(self.geometry.mesh(true))
    }

    fn triangulate(
        &mut self,
        contours: &[&[Point]],
        fill_rule: FillRule,
        color: Option<PackedColor>,
        tessellator: &mut dyn PolygonTessellator,
    ) -> TessellationResult<()> {
        tessellator.begin_contours();
        for contour in contours {
            tessellator.add_contour(contour);
        }

        let mode = if color.is_some() {
            OutputMode::TrianglesAndBoundary
        } else {
            OutputMode::Triangles
        };
        tessellator.tessellate(fill_rule, mode)?;

        let vertices = tessellator.vertices();
        if vertices.len() > MAX_VERTICES {
            return Err(TessellationError::TooManyVertices);
        }

        self.geometry.positions.extend_from_slice(vertices)?;
        if let Some(color) = color {
            self.geometry.colors.reserve(vertices.len())?;
            for _ in vertices {
                self.geometry.colors.push(color)?;
            }
        }

        let indices = tessellator.indices();
        self.geometry.indices.reserve(indices.len())?;
        for idx in indices {
            self.geometry.indices.push(*idx as u16)?;
        }

        stroke_log!(
            self,
            "concave fill: {} contours, {:?} -> {} vertices, {} triangles",
            contours.len(),
            fill_rule,
            vertices.len(),
            indices.len() / 3
        );

        Ok(())
    }
}
