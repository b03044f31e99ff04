//! Mesh views produced by the stroker and owned buffers to collect them.

use crate::color::{PackedColor, WHITE};
use crate::error::TessellationError;
use crate::math::Point;

/// Largest number of vertices a mesh can have.
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

/// A triangle mesh borrowed from the [`Stroker`](crate::Stroker) that generated it.
///
/// The view is valid until the next call on the stroker. Renderers copy it into their
/// own buffers, see [`MeshBuffers`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mesh<'l> {
    pub positions: &'l [Point],
    /// One color per vertex for anti-aliased meshes.
    pub colors: Option<&'l [PackedColor]>,
    /// Three indices per triangle.
    pub indices: &'l [u16],
}

impl<'l> Mesh<'l> {
    pub const EMPTY: Mesh<'static> = Mesh {
        positions: &[],
        colors: None,
        indices: &[],
    };

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates over the vertex positions of each triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [Point; 3]> + 'l {
        let positions = self.positions;
        self.indices.chunks_exact(3).map(move |tri| {
            [
                positions[tri[0] as usize],
                positions[tri[1] as usize],
                positions[tri[2] as usize],
            ]
        })
    }

    /// Copies the mesh into owned buffers.
    pub fn to_buffers(&self) -> MeshBuffers {
        let mut buffers = MeshBuffers::with_capacity(self.vertex_count(), self.index_count());
        buffers.positions.extend_from_slice(self.positions);
        if let Some(colors) = self.colors {
            buffers.colors.extend_from_slice(colors);
        }
        buffers.indices.extend_from_slice(self.indices);

        buffers
    }
}

/// Owned vertex and index data.
///
/// `colors` is either empty or has one entry per vertex.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct MeshBuffers {
    pub positions: Vec<Point>,
    pub colors: Vec<PackedColor>,
    pub indices: Vec<u16>,
}

impl MeshBuffers {
    /// Constructor
    pub fn new() -> Self {
        MeshBuffers::with_capacity(512, 1024)
    }

    /// Constructor
    pub fn with_capacity(num_vertices: usize, num_indices: usize) -> Self {
        MeshBuffers {
            positions: Vec::with_capacity(num_vertices),
            colors: Vec::new(),
            indices: Vec::with_capacity(num_indices),
        }
    }

    /// Empty the buffers without freeing memory, for reuse without reallocation.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.indices.clear();
    }

    pub fn as_mesh(&self) -> Mesh {
        Mesh {
            positions: &self.positions,
            colors: if self.colors.is_empty() {
                None
            } else {
                Some(&self.colors)
            },
            indices: &self.indices,
        }
    }

    /// Appends a mesh, offsetting its indices.
    ///
    /// Vertices of uncolored meshes are white once colored and uncolored meshes are
    /// mixed. Fails without modifying the buffers if the result would not be
    /// addressable with 16 bits indices.
    pub fn append(&mut self, mesh: &Mesh) -> Result<(), TessellationError> {
        let offset = self.positions.len();
        if offset + mesh.vertex_count() > MAX_VERTICES {
            return Err(TessellationError::TooManyVertices);
        }

        match mesh.colors {
            Some(colors) => {
                debug_assert_eq!(colors.len(), mesh.vertex_count());
                self.colors.resize(offset, WHITE);
                self.colors.extend_from_slice(colors);
            }
            None if !self.colors.is_empty() => {
                self.colors.resize(offset + mesh.vertex_count(), WHITE);
            }
            None => {}
        }

        self.positions.extend_from_slice(mesh.positions);
        let offset = offset as u16;
        self.indices
            .extend(mesh.indices.iter().map(|idx| idx + offset));

        Ok(())
    }
}

#[test]
fn test_append() {
    use crate::math::point;

    let a = [point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0)];
    let b = [point(5.0, 0.0), point(6.0, 0.0), point(6.0, 1.0), point(5.0, 1.0)];
    let b_colors = [1, 2, 3, 4];

    let mut buffers = MeshBuffers::new();
    buffers
        .append(&Mesh {
            positions: &a,
            colors: None,
            indices: &[0, 1, 2],
        })
        .unwrap();
    assert!(buffers.colors.is_empty());

    buffers
        .append(&Mesh {
            positions: &b,
            colors: Some(&b_colors),
            indices: &[0, 1, 2, 0, 2, 3],
        })
        .unwrap();

    assert_eq!(buffers.positions.len(), 7);
    assert_eq!(buffers.colors, &[WHITE, WHITE, WHITE, 1, 2, 3, 4]);
    assert_eq!(buffers.indices, &[0, 1, 2, 3, 4, 5, 3, 5, 6]);

    let mesh = buffers.as_mesh();
    assert_eq!(mesh.triangle_count(), 3);
    assert_eq!(mesh.triangles().nth(1), Some([b[0], b[1], b[2]]));
    assert_eq!(mesh.to_buffers(), buffers);

    buffers.clear();
    assert_eq!(buffers.as_mesh(), Mesh::EMPTY);
}

#[test]
fn test_append_too_many_vertices() {
    let positions = std::vec![Point::zero(); 40_000];
    let mesh = Mesh {
        positions: &positions,
        colors: None,
        indices: &[0, 1, 2],
    };

    let mut buffers = MeshBuffers::new();
    buffers.append(&mesh).unwrap();
    assert_eq!(
        buffers.append(&mesh),
        Err(TessellationError::TooManyVertices)
    );
    assert_eq!(buffers.positions.len(), 40_000);
}
