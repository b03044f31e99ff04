#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::too_many_arguments)]

//! Stroke and fill mesh generation for flattened paths.
//!
//! This crate is reexported in [meshvg](../meshvg/index.html).
//!
//! # Overview
//!
//! The [`Stroker`] turns polylines (typically the subpaths of a
//! [`Path`](path::Path)) into indexed triangle meshes:
//!
//! - [`Stroker::convex_fill`] and [`Stroker::convex_fill_aa`] fill convex polygons with a
//!   triangle fan.
//! - [`Stroker::concave_fill`] and [`Stroker::concave_fill_aa`] fill arbitrary sets of
//!   contours according to a [`FillRule`], delegating the triangulation to a
//!   [`PolygonTessellator`].
//! - [`Stroker::stroke`] and [`Stroker::stroke_aa`] generate strokes with any
//!   combination of [`LineCap`] and [`LineJoin`].
//!
//! Generated meshes are returned as [`Mesh`] views on the stroker's internal buffers
//! which are reused from one call to the next, so generating geometry does not allocate
//! once the buffers are large enough.
//!
//! # Anti-aliasing
//!
//! The `_aa` variants surround the shape with a thin band of triangles (the fringe)
//! whose outer vertices are transparent. Once rendered with color interpolation and
//! premultiplied alpha blending, the fringe smooths the edges of the shape without
//! multisampling. The width of the fringe is [`StrokerOptions::fringe_width`], usually
//! one device pixel.
//!
//! Strokes thinner than the fringe ("thin strokes") are rendered as a single opaque
//! line fading out on both sides. Thin strokes do not support round caps and joins.
//!
//! # Flattening and tolerance
//!
//! Round caps and joins are approximated with line segments. The maximum distance
//! between an arc and its approximation is `tolerance / scale`, see [`StrokerOptions`].
//!
//! # Examples
//!
//! ```
//! use meshvg_tessellation::{Stroker, StrokeStyle, LineCap, LineJoin, MeshBuffers};
//! use meshvg_tessellation::color::pack_rgba;
//! use meshvg_tessellation::math::point;
//!
//! let mut stroker = Stroker::new();
//! let mut buffers = MeshBuffers::new();
//!
//! let points = [point(0.0, 0.0), point(100.0, 0.0), point(100.0, 100.0)];
//! let style = StrokeStyle::new(4.0)
//!     .with_line_cap(LineCap::Round)
//!     .with_line_join(LineJoin::Round);
//!
//! let mesh = stroker
//!     .stroke_aa(&points, false, &style, pack_rgba(255, 0, 0, 255))
//!     .unwrap();
//! buffers.append(&mesh).unwrap();
//!
//! assert!(buffers.indices.len() > 0);
//! ```

pub use meshvg_path as path;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

#[cfg(debug_assertions)]
macro_rules! stroke_log {
    ($obj:ident, $fmt:expr) => (
        if $obj.log {
            log::trace!($fmt);
        }
    );
    ($obj:ident, $fmt:expr, $($arg:tt)*) => (
        if $obj.log {
            log::trace!($fmt, $($arg)*);
        }
    );
}

#[cfg(not(debug_assertions))]
macro_rules! stroke_log {
    ($obj:ident, $fmt:expr) => {};
    ($obj:ident, $fmt:expr, $($arg:tt)*) => {};
}

mod buffers;
pub mod color;
mod error;
mod fill;
mod mesh;
mod polygon;
mod stroke;

#[cfg(test)]
mod fill_tests;
#[cfg(test)]
mod stroke_tests;

pub use crate::path::math;

pub use crate::path::geom;

#[doc(inline)]
pub use crate::buffers::{ScratchBuffer, SCRATCH_ALIGNMENT};

#[doc(inline)]
pub use crate::error::*;

#[doc(inline)]
pub use crate::mesh::{Mesh, MeshBuffers, MAX_VERTICES};

#[doc(inline)]
pub use crate::polygon::{Boundary, EarcutTessellator, OutputMode, PolygonTessellator};

#[doc(inline)]
pub use crate::stroke::Stroker;

pub use crate::path::{FillRule, LineCap, LineJoin, Winding};

/// Parameters of the [`Stroker`] that usually depend on the target rather than the shape.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct StrokerOptions {
    /// Average scale of the transform the geometry is drawn with.
    ///
    /// Default value: `StrokerOptions::DEFAULT_SCALE`.
    pub scale: f32,

    /// Maximum allowed distance to the exact shape when approximating arcs.
    ///
    /// See [Flattening and tolerance](index.html#flattening-and-tolerance).
    /// Default value: `StrokerOptions::DEFAULT_TOLERANCE`.
    pub tolerance: f32,

    /// Width of the anti-aliasing fringe.
    ///
    /// Default value: `StrokerOptions::DEFAULT_FRINGE_WIDTH`.
    pub fringe_width: f32,
}

impl StrokerOptions {
    pub const DEFAULT_SCALE: f32 = 1.0;
    pub const DEFAULT_TOLERANCE: f32 = 0.25;
    pub const DEFAULT_FRINGE_WIDTH: f32 = 1.0;

    pub const DEFAULT: Self = StrokerOptions {
        scale: Self::DEFAULT_SCALE,
        tolerance: Self::DEFAULT_TOLERANCE,
        fringe_width: Self::DEFAULT_FRINGE_WIDTH,
    };

    /// Options for geometry expressed in device pixels on a display with the given
    /// device pixel ratio: a quarter of a pixel of tolerance and a one pixel fringe.
    #[inline]
    pub fn for_device_pixel_ratio(ratio: f32) -> Self {
        debug_assert!(ratio > 0.0);
        Self::DEFAULT
            .with_tolerance(0.25 / ratio)
            .with_fringe_width(1.0 / ratio)
    }

    #[inline]
    pub fn tolerance(tolerance: f32) -> Self {
        Self::DEFAULT.with_tolerance(tolerance)
    }

    #[inline]
    pub const fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub const fn with_fringe_width(mut self, width: f32) -> Self {
        self.fringe_width = width;
        self
    }
}

impl Default for StrokerOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameters of a stroke.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct StrokeStyle {
    /// Line width, in the same space as the stroked points.
    ///
    /// Default value: `StrokeStyle::DEFAULT_LINE_WIDTH`.
    pub width: f32,

    /// What cap to use at both ends of open polylines.
    ///
    /// Default value: `LineCap::Butt`.
    pub cap: LineCap,

    /// See the SVG specification.
    ///
    /// Default value: `LineJoin::Miter`.
    pub join: LineJoin,
}

impl StrokeStyle {
    pub const DEFAULT_LINE_CAP: LineCap = LineCap::Butt;
    pub const DEFAULT_LINE_JOIN: LineJoin = LineJoin::Miter;
    pub const DEFAULT_LINE_WIDTH: f32 = 1.0;

    pub const DEFAULT: Self = StrokeStyle {
        width: Self::DEFAULT_LINE_WIDTH,
        cap: Self::DEFAULT_LINE_CAP,
        join: Self::DEFAULT_LINE_JOIN,
    };

    #[inline]
    pub const fn new(width: f32) -> Self {
        Self::DEFAULT.with_line_width(width)
    }

    #[inline]
    pub const fn with_line_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    #[inline]
    pub const fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    #[inline]
    pub const fn with_line_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[test]
fn test_options() {
    let options = StrokerOptions::for_device_pixel_ratio(2.0);
    assert_eq!(options.scale, 1.0);
    assert_eq!(options.tolerance, 0.125);
    assert_eq!(options.fringe_width, 0.5);

    assert_eq!(StrokerOptions::default(), StrokerOptions::for_device_pixel_ratio(1.0));

    let style = StrokeStyle::new(3.0).with_line_join(LineJoin::Bevel);
    assert_eq!(style.width, 3.0);
    assert_eq!(style.cap, LineCap::Butt);
    assert_eq!(style.join, LineJoin::Bevel);
}
