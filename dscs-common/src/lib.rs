//! Shared types for the DSCS asset pipeline
//!
//! This crate holds the intermediate model handed from `dscs-export` to the
//! downstream binary serializer:
//! - [`model`] - Flattened bones, split meshes, materials, textures and
//!   synchronized animation channels
//! - [`name_index`] - First-seen name → index assignment

pub mod model;
pub mod name_index;

pub use model::{
    AnimationClip, AnimationTarget, BoneWeight, ExportedBone, ExportedMaterial, ExportedMesh,
    ExportedTexture, ExportedVertex, IntermediateModel, MaterialTexture, TargetChannels,
    TransformChannels, VertexGroup, IDENTITY_MATRIX, ROOT_PARENT,
};
pub use name_index::NameIndex;
