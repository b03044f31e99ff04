#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::many_single_char_names)]
#![no_std]

//! Simple 2D geometric primitives on top of euclid, and the math shared by the
//! meshvg path builder and stroker.
//!
//! This crate is reexported in [meshvg](../meshvg/index.html).
//!
//! # Overview
//!
//! - [`math`] contains `f32` aliases of the euclid types used by every other meshvg crate.
//! - [`kernel`] contains the vector helpers and the offset math used to extrude strokes
//!   and anti-aliasing fringes.
//! - [`arc`] computes how finely circular arcs must be subdivided for a given tolerance.
//! - [`simd`] is a 4-wide mirror of [`kernel::extrusion_vector`].
//! - [`transform`] applies an affine transform to point arrays in bulk.
//!
//! # Flattening and tolerance
//!
//! Curves and arcs are approximated with sequences of line segments. The `tolerance`
//! parameter is the maximum allowed distance between a curve and its approximation,
//! expressed in the local (pre-transform) units of the path. It is divided by the
//! average scale of the current transform so that zoomed out shapes use fewer points
//! and zoomed in shapes stay smooth.

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use bytemuck;
pub use euclid;

pub mod arc;
pub mod kernel;
pub mod simd;
pub mod transform;

pub mod math {
    //! f32 version of the euclid types used everywhere. The other meshvg crates
    //! reexport them.

    /// Alias for ```euclid::default::Point2D<f32>```.
    pub type Point = euclid::default::Point2D<f32>;

    /// Alias for ```euclid::default::Vector2D<f32>```.
    pub type Vector = euclid::default::Vector2D<f32>;

    /// Alias for ```euclid::default::Size2D<f32>```.
    pub type Size = euclid::default::Size2D<f32>;

    /// Alias for ```euclid::default::Box2D<f32>```
    pub type Box2D = euclid::default::Box2D<f32>;

    /// Alias for ```euclid::default::Transform2D<f32>```
    pub type Transform = euclid::default::Transform2D<f32>;

    /// An angle in radians (f32).
    pub type Angle = euclid::Angle<f32>;

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    /// Shorthand for `Size::new(x, y)`.
    #[inline]
    pub fn size(w: f32, h: f32) -> Size {
        Size::new(w, h)
    }
}

#[doc(inline)]
pub use crate::kernel::{
    cross, direction, dot, extrusion_vector, perp_ccw, perp_cw, EPSILON_SQ, PARALLEL_THRESHOLD,
};
