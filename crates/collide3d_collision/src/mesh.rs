//! Polygon extraction from raw vertex buffers
//!
//! Meshes arrive as flat `f32` buffers where each vertex occupies `stride`
//! floats and starts with its position. The primitive topology decides how
//! consecutive vertices form triangles.

use collide3d_math::{Polygon3, Vec3};
use serde::{Deserialize, Serialize};

use crate::CollisionError;

/// How consecutive vertices are assembled into primitives
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Every 3 vertices form a triangle
    #[default]
    Triangles,
    /// Each vertex after the second forms a triangle with the previous two;
    /// odd triangles are re-wound to keep a consistent facing
    TriangleStrip,
    /// Every vertex after the second forms a triangle with its predecessor
    /// and the first vertex
    TriangleFan,
    /// Every 4 vertices form a quad, split in two triangles
    Quads,
    /// Each pair of vertices after the first pair forms a quad with the
    /// previous pair
    QuadStrip,
}

impl Topology {
    /// Vertex index triples for a stream of `count` vertices.
    ///
    /// Trailing vertices that do not complete a primitive are ignored.
    pub fn triangle_indices(self, count: usize) -> Vec<[usize; 3]> {
        let mut out = Vec::new();
        match self {
            Topology::Triangles => {
                for j in (0..count / 3).map(|i| i * 3) {
                    out.push([j, j + 1, j + 2]);
                }
            }
            Topology::TriangleStrip => {
                for j in 0..count.saturating_sub(2) {
                    if j % 2 == 0 {
                        out.push([j, j + 1, j + 2]);
                    } else {
                        out.push([j + 1, j, j + 2]);
                    }
                }
            }
            Topology::TriangleFan => {
                for j in 1..count.saturating_sub(1) {
                    out.push([0, j, j + 1]);
                }
            }
            Topology::Quads => {
                for j in (0..count / 4).map(|i| i * 4) {
                    out.push([j, j + 1, j + 2]);
                    out.push([j + 2, j + 1, j + 3]);
                }
            }
            Topology::QuadStrip => {
                let mut j = 0;
                while j + 3 < count {
                    out.push([j, j + 1, j + 2]);
                    out.push([j + 2, j + 1, j + 3]);
                    j += 2;
                }
            }
        }
        out
    }
}

/// A mesh as supplied by the model loader: raw vertices plus layout
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Interleaved vertex data, position first
    pub vertices: Vec<f32>,
    /// Floats per vertex (at least 3)
    pub stride: usize,
    pub topology: Topology,
    /// Optional index buffer; when present the topology applies to the
    /// index stream instead of the vertex order
    pub indices: Option<Vec<u32>>,
}

impl Mesh {
    /// Non-indexed mesh
    pub fn new(vertices: Vec<f32>, stride: usize, topology: Topology) -> Self {
        Self {
            vertices,
            stride,
            topology,
            indices: None,
        }
    }

    /// Add an index buffer (builder pattern)
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Extract every triangle of the mesh
    pub fn polygons(&self) -> Result<Vec<Polygon3>, CollisionError> {
        match &self.indices {
            Some(indices) => polygons_from_indexed(&self.vertices, self.stride, indices, self.topology),
            None => polygons_from_vertices(&self.vertices, self.stride, self.topology),
        }
    }
}

/// Read the vertex positions out of an interleaved buffer
pub fn positions(vertices: &[f32], stride: usize) -> Result<Vec<Vec3>, CollisionError> {
    if stride < 3 {
        return Err(CollisionError::InvalidVertexBuffer(format!(
            "stride {} is smaller than a position",
            stride
        )));
    }
    if vertices.len() % stride != 0 {
        return Err(CollisionError::InvalidVertexBuffer(format!(
            "buffer of {} floats is not a multiple of stride {}",
            vertices.len(),
            stride
        )));
    }

    // Tightly packed positions can be viewed in place
    if stride == 3 {
        if let Ok(packed) = bytemuck::try_cast_slice::<f32, Vec3>(vertices) {
            return Ok(packed.to_vec());
        }
    }

    Ok(vertices
        .chunks_exact(stride)
        .map(|v| Vec3::new(v[0], v[1], v[2]))
        .collect())
}

/// Triangles of a positions list assembled with `topology`
pub fn polygons_from_positions(positions: &[Vec3], topology: Topology) -> Vec<Polygon3> {
    topology
        .triangle_indices(positions.len())
        .into_iter()
        .map(|[a, b, c]| Polygon3::new(positions[a], positions[b], positions[c]))
        .collect()
}

/// Triangles of a non-indexed interleaved vertex buffer
pub fn polygons_from_vertices(
    vertices: &[f32],
    stride: usize,
    topology: Topology,
) -> Result<Vec<Polygon3>, CollisionError> {
    let positions = positions(vertices, stride)?;
    Ok(polygons_from_positions(&positions, topology))
}

/// Triangles of an indexed interleaved vertex buffer
pub fn polygons_from_indexed(
    vertices: &[f32],
    stride: usize,
    indices: &[u32],
    topology: Topology,
) -> Result<Vec<Polygon3>, CollisionError> {
    let positions = positions(vertices, stride)?;
    let resolved = indices
        .iter()
        .map(|&i| {
            positions.get(i as usize).copied().ok_or_else(|| {
                CollisionError::InvalidVertexBuffer(format!(
                    "index {} out of range for {} vertices",
                    i,
                    positions.len()
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(polygons_from_positions(&resolved, topology))
}
