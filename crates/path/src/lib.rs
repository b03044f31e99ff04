#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::match_like_matches_macro)]

//! Build 2D vector paths and flatten them into polylines.
//!
//! A [`Path`] receives drawing commands (`move_to`, `line_to`, `cubic_to`, shapes...)
//! and stores the result as one shared vertex buffer split into [`SubPath`]s. Curves are
//! flattened as they are added, using the scale and tolerance given to [`Path::reset`].
//!
//! This crate is reexported in [meshvg](../meshvg/index.html).
//!
//! # Examples
//!
//! ```
//! use meshvg_path::Path;
//! use meshvg_path::math::point;
//!
//! let mut path = Path::new();
//! path.reset(1.0, 0.25);
//!
//! path.move_to(point(0.0, 0.0));
//! path.line_to(point(10.0, 0.0));
//! path.cubic_to(point(15.0, 0.0), point(15.0, 10.0), point(10.0, 10.0));
//! path.close();
//!
//! path.circle(point(50.0, 50.0), 20.0);
//!
//! for (subpath, points) in path.iter() {
//!     println!("closed: {}, {} points", subpath.closed, points.len());
//! }
//! ```

pub use meshvg_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod path;

#[doc(inline)]
pub use crate::path::{Iter, Path, SubPath};

pub use crate::geom::math;

/// The fill rule defines how to determine what is inside and what is outside of the shape.
///
/// See the SVG specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum FillRule {
    EvenOdd,
    NonZero,
}

impl FillRule {
    #[inline]
    pub fn is_in(&self, winding_number: i16) -> bool {
        match *self {
            FillRule::EvenOdd => winding_number % 2 != 0,
            FillRule::NonZero => winding_number != 0,
        }
    }

    #[inline]
    pub fn is_out(&self, winding_number: i16) -> bool {
        !self.is_in(winding_number)
    }
}

/// The two possible orientations for the edges of a shape to be built in.
///
/// Positive winding corresponds to the positive orientation in trigonometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Winding {
    Positive,
    Negative,
}

/// Line cap as defined by the SVG specification.
///
/// See: <https://svgwg.org/specs/strokes/#StrokeLinecapProperty>
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineCap {
    /// The stroke for each sub-path does not extend beyond its two endpoints.
    Butt,
    /// At the end of each sub-path, the shape representing the stroke will be
    /// extended by a rectangle with the same width as the stroke width and
    /// whose length is half of the stroke width.
    Square,
    /// At each end of each sub-path, the shape representing the stroke will be extended
    /// by a half circle with a radius equal to half of the stroke width.
    Round,
}

/// Line join as defined by the SVG specification.
///
/// See: <https://svgwg.org/specs/strokes/#StrokeLinejoinProperty>
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineJoin {
    /// The outer edges of the two segments are extended until they meet.
    ///
    /// Miter joins are never clamped, sharp angles produce long spikes.
    Miter,
    /// A circular arc is added between the outer edges of the two segments.
    Round,
    /// The outer corners of the two segments are connected by a straight edge.
    Bevel,
}
