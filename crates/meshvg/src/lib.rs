#![deny(bare_trait_objects)]

//! 2D vector path flattening and triangle mesh generation for GPU rendering.
//!
//! # Crates
//!
//! This meta-crate (`meshvg`) reexports the following sub-crates for convenience:
//!
//! * **meshvg_tessellation** - Stroke and fill mesh generation with analytic
//!   anti-aliasing.
//! * **meshvg_path** - A path builder that flattens curves and shapes into polylines.
//! * **meshvg_geom** - Math types, the stroke extrusion kernel and batch transforms.
//!
//! Each `meshvg_<name>` crate is reexported as a `<name>` module in `meshvg`. For example:
//!
//! ```ignore
//! extern crate meshvg_tessellation;
//! use meshvg_tessellation::Stroker;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! extern crate meshvg;
//! use meshvg::tessellation::Stroker;
//! ```
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! # Examples
//!
//! ## Stroking and filling a path
//!
//! A [`Path`](path::Path) flattens the commands it receives into polylines. Each
//! subpath is then handed to the [`Stroker`](tessellation::Stroker), which writes the
//! mesh into buffers it reuses from one call to the next.
//!
//! ```
//! use meshvg::math::point;
//! use meshvg::path::Path;
//! use meshvg::tessellation::color::pack_rgba;
//! use meshvg::tessellation::{
//!     EarcutTessellator, FillRule, LineJoin, MeshBuffers, StrokeStyle, Stroker, StrokerOptions,
//! };
//!
//! // Geometry in device pixels on a display with a device pixel ratio of 2.
//! let options = StrokerOptions::for_device_pixel_ratio(2.0);
//!
//! let mut path = Path::new();
//! path.reset(options.scale, options.tolerance);
//! path.move_to(point(10.0, 10.0));
//! path.line_to(point(100.0, 10.0));
//! path.cubic_to(point(120.0, 50.0), point(80.0, 90.0), point(100.0, 100.0));
//! path.line_to(point(10.0, 100.0));
//! path.close();
//!
//! let mut stroker = Stroker::with_options(options);
//! let mut tessellator = EarcutTessellator::new();
//! let mut fill = MeshBuffers::new();
//! let mut stroke = MeshBuffers::new();
//!
//! let contours: Vec<_> = path.iter().map(|(_, points)| points).collect();
//! let mesh = stroker
//!     .concave_fill_aa(&contours, FillRule::NonZero, pack_rgba(0, 0, 255, 255), &mut tessellator)
//!     .unwrap();
//! fill.append(&mesh).unwrap();
//!
//! let style = StrokeStyle::new(4.0).with_line_join(LineJoin::Round);
//! for (subpath, points) in &path {
//!     let mesh = stroker
//!         .stroke_aa(points, subpath.closed, &style, pack_rgba(0, 0, 0, 255))
//!         .unwrap();
//!     stroke.append(&mesh).unwrap();
//! }
//!
//! println!(
//!     " -- fill: {} vertices, stroke: {} vertices",
//!     fill.positions.len(),
//!     stroke.positions.len()
//! );
//! ```
//!
//! ## What is the tolerance variable in these examples?
//!
//! Curves and arcs are approximated with sequences of line segments. The tolerance is
//! the maximum distance allowed between a curve and its approximation, measured after
//! the transform the geometry is rendered with (of average scale `scale`). A quarter
//! of a device pixel is usually invisible.
//!
//! ## Rendering the generated geometry
//!
//! meshvg does not provide any GPU abstraction. Meshes are plain arrays of positions,
//! optional packed colors (four 8 bits channels, premultiplied alpha) and 16 bits
//! indices, ready to be uploaded to vertex and index buffers. Anti-aliasing fringes
//! require premultiplied alpha blending.

pub extern crate meshvg_tessellation;

pub use meshvg_tessellation as tessellation;
pub use tessellation::geom;
pub use tessellation::path;

pub use path::math;
