//! UV tier selection and per-corner UV keys

use smallvec::SmallVec;

use crate::error::{ExportError, ExportResult};
use crate::source::{SourceMesh, UvLayer};

/// Hashable identity of a corner's UV tuple.
///
/// Compares by exact bit pattern, with `-0.0` folded onto `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UvKey(SmallVec<[u32; 6]>);

fn key_bits(value: f32) -> u32 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

/// The active UV layers of a mesh, lowest tier first
#[derive(Debug, Clone, Copy)]
pub struct UvTiers<'a> {
    layers: &'a [&'a UvLayer],
}

impl<'a> UvTiers<'a> {
    pub fn new(layers: &'a [&'a UvLayer]) -> Self {
        Self { layers }
    }

    pub fn count(&self) -> usize {
        self.layers.len()
    }

    pub fn key(&self, corner: usize) -> UvKey {
        UvKey(
            self.layers
                .iter()
                .flat_map(|layer| layer.uvs[corner])
                .map(key_bits)
                .collect(),
        )
    }

    pub fn uvs(&self, corner: usize) -> Vec<[f32; 2]> {
        self.layers.iter().map(|layer| layer.uvs[corner]).collect()
    }
}

/// Pick the active layers by tier name.
///
/// The highest tier present decides how many tiers are used; every lower
/// tier must then exist too, and each layer must cover every corner.
pub fn select_uv_layers<'a>(
    mesh: &'a SourceMesh,
    tier_names: &[String],
) -> ExportResult<Vec<&'a UvLayer>> {
    let present: Vec<Option<&UvLayer>> = tier_names
        .iter()
        .map(|name| mesh.uv_layer(name))
        .collect();
    let count = present
        .iter()
        .rposition(Option::is_some)
        .map_or(0, |highest| highest + 1);

    let mut layers = Vec::with_capacity(count);
    for (name, layer) in tier_names.iter().zip(present.iter().copied()).take(count) {
        let layer = layer.ok_or_else(|| ExportError::MissingUvLayer {
            layer: name.clone(),
        })?;
        if layer.uvs.len() != mesh.loops.len() {
            return Err(ExportError::UvLayerLength {
                layer: name.clone(),
                len: layer.uvs.len(),
                corner_count: mesh.loops.len(),
            });
        }
        layers.push(layer);
    }

    let ignored = mesh.uv_layers.len().saturating_sub(layers.len());
    if ignored > 0 {
        tracing::debug!(
            "Mesh '{}': {} UV layer(s) outside the configured tiers ignored",
            mesh.name,
            ignored
        );
    }

    Ok(layers)
}
