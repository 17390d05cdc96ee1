//! Topology normalizer (shared-vertex mesh -> per-corner-attribute vertices)

mod split;
mod types;
mod uv;

// Re-export public API
pub use split::normalize_topology;
pub use types::{NormalizedMesh, SplitStats};
pub use uv::{UvKey, UvTiers, select_uv_layers};
