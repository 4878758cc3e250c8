//! # Indexed Mesh
//!
//! Read-only export of a finished solid: positions plus polygon index
//! loops, with helpers for GPU-style flat buffers.

use glam::DVec3;

/// Vertex positions and polygon loops indexing into them.
///
/// # Example
///
/// ```rust
/// use thread_mesh::IndexedMesh;
/// use glam::DVec3;
///
/// let quad = IndexedMesh {
///     positions: vec![DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y],
///     polygons: vec![vec![0, 1, 2, 3]],
/// };
/// assert_eq!(quad.triangulate(), vec![[0, 1, 2], [0, 2, 3]]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Vertex positions (f64 for precision)
    pub positions: Vec<DVec3>,
    /// Polygon loops, each at least three indices
    pub polygons: Vec<Vec<u32>>,
}

impl IndexedMesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of polygons.
    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Fan-triangulates every polygon, preserving winding.
    pub fn triangulate(&self) -> Vec<[u32; 3]> {
        let mut triangles = Vec::with_capacity(self.polygons.len() * 2);
        for poly in &self.polygons {
            for i in 1..poly.len().saturating_sub(1) {
                triangles.push([poly[0], poly[i], poly[i + 1]]);
            }
        }
        triangles
    }

    /// Exports vertices as f32 array for GPU.
    ///
    /// Returns flattened [x, y, z, x, y, z, ...] array.
    pub fn vertices_f32(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.positions.len() * 3);
        for v in &self.positions {
            result.push(v.x as f32);
            result.push(v.y as f32);
            result.push(v.z as f32);
        }
        result
    }

    /// Exports fan-triangulated indices as u32 array for GPU.
    pub fn indices_u32(&self) -> Vec<u32> {
        self.triangulate().into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pentagon() -> IndexedMesh {
        IndexedMesh {
            positions: (0..5)
                .map(|i| {
                    let a = i as f64 * std::f64::consts::TAU / 5.0;
                    DVec3::new(a.cos(), a.sin(), 0.0)
                })
                .collect(),
            polygons: vec![vec![0, 1, 2, 3, 4]],
        }
    }

    #[test]
    fn test_triangulate_fan() {
        let mesh = pentagon();
        assert_eq!(mesh.triangulate(), vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
    }

    #[test]
    fn test_flat_buffers() {
        let mesh = pentagon();
        assert_eq!(mesh.vertices_f32().len(), 15);
        assert_eq!(mesh.vertices_f32()[0], 1.0);
        assert_eq!(mesh.indices_u32(), vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }
}
