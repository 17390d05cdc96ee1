//! Intermediate model assembler
//!
//! Runs one export pass: flattens the skeleton, normalizes every mesh,
//! synchronizes every action, and numbers materials and textures by first
//! use. Any failure aborts the pass; no partial model is returned.

use anyhow::{Context, Result};
use dscs_common::{
    ExportedMaterial, ExportedMesh, ExportedTexture, IntermediateModel, MaterialTexture, NameIndex,
};

use crate::animation::synchronize_action;
use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::mesh::normalize_topology;
use crate::skeleton::{Skeleton, flatten_skeleton};
use crate::source::{SourceMesh, SourceScene};

/// First-use numbering of materials and the textures they reference
#[derive(Debug, Default)]
struct MaterialTable {
    names: NameIndex,
    materials: Vec<ExportedMaterial>,
    textures: NameIndex,
}

impl MaterialTable {
    /// Index of the material `mesh` uses, registering it (and its textures)
    /// on first sight
    fn resolve(&mut self, scene: &SourceScene, mesh: &SourceMesh) -> Result<u32, ExportError> {
        let name = mesh.material.as_deref().ok_or(ExportError::MissingMaterial)?;
        let source = scene
            .material(name)
            .ok_or_else(|| ExportError::UnknownMaterial(name.to_owned()))?;

        let (index, first_use) = self.names.assign(name);
        if first_use {
            let textures = source
                .textures
                .iter()
                .map(|slot| MaterialTexture {
                    slot: slot.slot.clone(),
                    texture: self.textures.assign(&slot.image).0,
                    extra: slot.extra,
                })
                .collect();
            self.materials.push(ExportedMaterial {
                name: name.to_owned(),
                shader: source.shader.clone(),
                uniforms: source.uniforms.clone(),
                textures,
            });
        }
        Ok(index)
    }

    fn into_parts(self) -> (Vec<ExportedMaterial>, Vec<ExportedTexture>) {
        let textures = self
            .textures
            .names()
            .map(|name| ExportedTexture {
                name: name.to_owned(),
            })
            .collect();
        (self.materials, textures)
    }
}

/// Run a full export pass over `scene`
pub fn export_model(scene: &SourceScene, config: &ExportConfig) -> Result<IntermediateModel> {
    let skeleton = flatten_skeleton(&scene.skeleton)
        .with_context(|| format!("skeleton '{}'", scene.skeleton.name))?;

    let mut table = MaterialTable::default();
    let meshes = scene
        .meshes
        .iter()
        .map(|mesh| {
            export_mesh(scene, mesh, &skeleton, &mut table, config)
                .with_context(|| format!("mesh '{}'", mesh.name))
        })
        .collect::<Result<Vec<_>>>()?;

    let animations = scene
        .actions
        .iter()
        .map(|action| {
            synchronize_action(action, &skeleton, config)
                .with_context(|| format!("action '{}'", action.name))
        })
        .collect::<Result<Vec<_>>>()?;

    let (materials, textures) = table.into_parts();
    let model = IntermediateModel {
        name: scene.name.clone(),
        bones: skeleton.bones,
        meshes,
        materials,
        textures,
        animations,
    };

    tracing::info!(
        "Exported '{}': {} bones, {} meshes ({} vertices, {} triangles), {} materials, {} textures, {} animations",
        model.name,
        model.bones.len(),
        model.meshes.len(),
        model.vertex_count(),
        model.triangle_count(),
        model.materials.len(),
        model.textures.len(),
        model.animations.len()
    );

    Ok(model)
}

fn export_mesh(
    scene: &SourceScene,
    mesh: &SourceMesh,
    skeleton: &Skeleton,
    table: &mut MaterialTable,
    config: &ExportConfig,
) -> Result<ExportedMesh> {
    let material = table.resolve(scene, mesh)?;
    let normalized = normalize_topology(mesh, skeleton, &config.uv_layers)?;
    Ok(normalized.into_exported(mesh.name.clone(), material))
}
