//! Host scene dump
//!
//! The modeling-tool integration describes its in-memory scene with these
//! types (serialized as JSON). Nothing here is transformed; the pipeline
//! components read it and never mutate it.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::animation::RotationMode;

/// Shader assigned to materials that do not name one
pub const DEFAULT_SHADER: &str = "088100c1_00880111_00000000_00058000";

/// Everything one export pass consumes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceScene {
    pub name: String,
    #[serde(default)]
    pub skeleton: SourceSkeleton,
    #[serde(default)]
    pub meshes: Vec<SourceMesh>,
    /// Material library; meshes refer to entries by name
    #[serde(default)]
    pub materials: Vec<SourceMaterial>,
    #[serde(default)]
    pub actions: Vec<SourceAction>,
}

impl SourceScene {
    /// Load a scene dump from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene dump: {:?}", path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scene dump: {:?}", path))
    }

    pub fn material(&self, name: &str) -> Option<&SourceMaterial> {
        self.materials.iter().find(|material| material.name == name)
    }
}

/// Coordinate space of [`SourceBone::bind_matrix`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindSpace {
    /// Relative to the parent bone
    #[default]
    Local,
    /// Already in armature (world) space
    Armature,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSkeleton {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bind_space: BindSpace,
    #[serde(default)]
    pub bones: Vec<SourceBone>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceBone {
    pub name: String,
    /// Parent bone name; `None` for roots
    #[serde(default)]
    pub parent: Option<String>,
    /// Bind transform, column-major
    pub bind_matrix: [f32; 16],
    #[serde(default)]
    pub rotation_mode: RotationMode,
}

/// Vertex group membership of a source vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupWeight {
    /// Index into [`SourceMesh::vertex_groups`]
    pub group: usize,
    pub weight: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    #[serde(default)]
    pub weights: Vec<GroupWeight>,
}

/// Face corner (loop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLoop {
    pub vertex: usize,
}

/// Per-corner UV layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UvLayer {
    pub name: String,
    /// One entry per corner, indexed like [`SourceMesh::loops`]
    pub uvs: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePolygon {
    /// Corner indices into [`SourceMesh::loops`]
    pub loops: Vec<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMesh {
    pub name: String,
    /// Name of the first material slot
    #[serde(default)]
    pub material: Option<String>,
    /// Vertex group names; each must match a bone
    #[serde(default)]
    pub vertex_groups: Vec<String>,
    pub vertices: Vec<SourceVertex>,
    pub loops: Vec<SourceLoop>,
    #[serde(default)]
    pub uv_layers: Vec<UvLayer>,
    pub polygons: Vec<SourcePolygon>,
}

impl SourceMesh {
    pub fn uv_layer(&self, name: &str) -> Option<&UvLayer> {
        self.uv_layers.iter().find(|layer| layer.name == name)
    }
}

/// Image bound to a material sampler slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureSlot {
    pub slot: String,
    pub image: String,
    /// Trailing sampler parameters written after the texture index
    #[serde(default)]
    pub extra: [u32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMaterial {
    pub name: String,
    /// Shader identifier, four underscore-separated hex words
    #[serde(default = "default_shader")]
    pub shader: String,
    /// Non-texture shader uniforms, in host order
    #[serde(default)]
    pub uniforms: IndexMap<String, Vec<f32>>,
    #[serde(default)]
    pub textures: Vec<TextureSlot>,
}

fn default_shader() -> String {
    DEFAULT_SHADER.to_string()
}

/// One scalar animation curve as the host stores it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceChannel {
    /// Host data path, e.g. `pose.bones["Arm"].rotation_euler` or `location`
    pub data_path: String,
    /// Vector component the curve drives
    pub array_index: usize,
    /// `[time, value]` pairs
    #[serde(default)]
    pub keyframes: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceAction {
    pub name: String,
    /// Object the action is assigned to; object-level channels animate it
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub owner_rotation_mode: RotationMode,
    /// Closed range `[start, end]`
    pub frame_range: [i32; 2],
    #[serde(default)]
    pub channels: Vec<SourceChannel>,
}
