//! Intermediate model
//!
//! The flattened, engine-ready form produced by one export pass. This is the
//! sole contract with the binary writer: everything here is already split,
//! indexed and synchronized, so the writer only has to lay bytes out.
//!
//! Conventions:
//! - Matrices are 16 floats, column-major.
//! - Quaternions are `[w, x, y, z]` (host component order).
//! - Indices into other lists of this model are `u32`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parent index used for root bones
pub const ROOT_PARENT: i32 = -1;

/// Column-major 4×4 identity
pub const IDENTITY_MATRIX: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Complete output of one export pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntermediateModel {
    /// Scene name the model was exported from
    pub name: String,
    /// Bones in parent-before-child order
    pub bones: Vec<ExportedBone>,
    pub meshes: Vec<ExportedMesh>,
    /// Materials in first-use order
    pub materials: Vec<ExportedMaterial>,
    /// Textures in first-use order
    pub textures: Vec<ExportedTexture>,
    pub animations: Vec<AnimationClip>,
}

impl IntermediateModel {
    /// Total number of output vertices across all meshes
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.vertices.len()).sum()
    }

    /// Total number of triangles across all meshes
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.triangles.len()).sum()
    }
}

/// One bone of the flattened skeleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedBone {
    pub name: String,
    /// Index of the parent bone, or [`ROOT_PARENT`]
    pub parent: i32,
    /// Inverse of the world-space bind transform (column-major)
    pub inverse_bind_matrix: [f32; 16],
}

impl ExportedBone {
    pub fn is_root(&self) -> bool {
        self.parent == ROOT_PARENT
    }
}

/// A (bone, weight) pair carried by an output vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoneWeight {
    pub bone: u32,
    pub weight: f32,
}

/// Output vertex: one unique (position, normal, UV tuple) combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// 0–3 UV sets, tiered (UV, UV2, UV3)
    pub uvs: Vec<[f32; 2]>,
    /// Full weight list inherited from the source vertex
    pub weights: Vec<BoneWeight>,
}

/// Per-bone list of weighted output vertices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexGroup {
    pub bone: u32,
    /// (output vertex index, weight) pairs in output vertex order
    pub vertices: Vec<(u32, f32)>,
}

impl VertexGroup {
    /// Sum of all weights in the group
    pub fn weight_mass(&self) -> f32 {
        self.vertices.iter().map(|(_, weight)| weight).sum()
    }
}

/// A mesh after topology normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedMesh {
    pub name: String,
    pub vertices: Vec<ExportedVertex>,
    pub triangles: Vec<[u32; 3]>,
    pub vertex_groups: Vec<VertexGroup>,
    /// Index into [`IntermediateModel::materials`]
    pub material: u32,
}

/// Texture reference from a material slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTexture {
    /// Sampler slot name (e.g. `ColorSampler`)
    pub slot: String,
    /// Index into [`IntermediateModel::textures`]
    pub texture: u32,
    /// Sampler parameters following the texture index
    pub extra: [u32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedMaterial {
    pub name: String,
    pub shader: String,
    pub uniforms: IndexMap<String, Vec<f32>>,
    pub textures: Vec<MaterialTexture>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedTexture {
    pub name: String,
}

/// Synchronized transform channels of one animation target
///
/// Each map is keyed by frame index. A map is either empty (the attribute was
/// never keyed, consumers fall back to the bind pose) or holds one vector per
/// synchronized frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformChannels {
    /// `[w, x, y, z]` per frame
    pub rotation_quaternion: BTreeMap<i32, [f32; 4]>,
    pub location: BTreeMap<i32, [f32; 3]>,
    pub scale: BTreeMap<i32, [f32; 3]>,
}

impl TransformChannels {
    pub fn is_empty(&self) -> bool {
        self.rotation_quaternion.is_empty() && self.location.is_empty() && self.scale.is_empty()
    }
}

/// What an animation target refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationTarget {
    /// The object that owns the action (top-level transform node)
    Object { name: String },
    /// A bone of the exported skeleton
    Bone { name: String, index: u32 },
}

impl AnimationTarget {
    pub fn name(&self) -> &str {
        match self {
            AnimationTarget::Object { name } | AnimationTarget::Bone { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetChannels {
    pub target: AnimationTarget,
    pub channels: TransformChannels,
}

/// One synchronized action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Closed frame range `[start, end]` the clip was synchronized over
    pub frame_range: [i32; 2],
    pub targets: Vec<TargetChannels>,
}

impl AnimationClip {
    pub fn target(&self, name: &str) -> Option<&TargetChannels> {
        self.targets.iter().find(|entry| entry.target.name() == name)
    }
}
