//! Types for topology normalization

use dscs_common::{ExportedMesh, ExportedVertex, VertexGroup};
use smallvec::SmallVec;

/// Validated weights of one source vertex: (vertex group slot, weight).
/// Most vertices are influenced by at most four bones.
pub(crate) type WeightList = SmallVec<[(usize, f32); 4]>;

/// Counters reported after a mesh is split
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitStats {
    pub source_vertices: usize,
    pub output_vertices: usize,
    /// Output vertices created beyond one per used source vertex
    pub split_vertices: usize,
    /// Source vertices no corner refers to (dropped)
    pub loose_vertices: usize,
}

/// Result of normalizing one mesh
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMesh {
    pub vertices: Vec<ExportedVertex>,
    pub triangles: Vec<[u32; 3]>,
    /// One group per declared vertex group, in declaration order
    pub vertex_groups: Vec<VertexGroup>,
    pub stats: SplitStats,
}

impl NormalizedMesh {
    /// Attach a name and material index
    pub fn into_exported(self, name: String, material: u32) -> ExportedMesh {
        ExportedMesh {
            name,
            vertices: self.vertices,
            triangles: self.triangles,
            vertex_groups: self.vertex_groups,
            material,
        }
    }
}
