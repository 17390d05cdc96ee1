//! dscs-export library
//!
//! Flattens a host scene dump (shared-vertex meshes, bone hierarchy, sparse
//! animation curves) into the engine-ready intermediate model.

pub mod animation;
pub mod assemble;
pub mod config;
pub mod error;
pub mod mesh;
pub mod output;
pub mod skeleton;
pub mod source;

// Re-export the pipeline entry points
pub use animation::{synchronize_action, synchronize_keyframes};
pub use assemble::export_model;
pub use config::ExportConfig;
pub use error::{ExportError, ExportResult};
pub use mesh::{NormalizedMesh, normalize_topology};
pub use skeleton::{Skeleton, flatten_skeleton};
pub use source::SourceScene;

// Re-export the output model
pub use dscs_common::IntermediateModel;
