//! Vertex splitting
//!
//! A source vertex is shared by every face corner that touches it, but UVs
//! live on the corners. Each distinct UV tuple among a vertex's corners
//! becomes its own output vertex; triangles are rewritten to point at them.

use dscs_common::{BoneWeight, ExportedVertex, VertexGroup};
use indexmap::IndexMap;

use super::types::{NormalizedMesh, SplitStats, WeightList};
use super::uv::{UvKey, UvTiers, select_uv_layers};
use crate::error::{ExportError, ExportResult};
use crate::skeleton::Skeleton;
use crate::source::SourceMesh;

/// Split `mesh` into per-attribute-set vertices.
///
/// `uv_tier_names` selects the active UV layers (see
/// [`select_uv_layers`]). Every vertex group name must resolve to a bone of
/// `skeleton`. The source mesh is never modified.
pub fn normalize_topology(
    mesh: &SourceMesh,
    skeleton: &Skeleton,
    uv_tier_names: &[String],
) -> ExportResult<NormalizedMesh> {
    let layers = select_uv_layers(mesh, uv_tier_names)?;
    let tiers = UvTiers::new(&layers);

    let group_bones = mesh
        .vertex_groups
        .iter()
        .map(|name| skeleton.require_bone(name))
        .collect::<ExportResult<Vec<u32>>>()?;

    validate_polygons(mesh)?;
    let corners_by_vertex = corners_by_vertex(mesh)?;
    let weights = validate_weights(mesh, group_bones.len())?;

    let mut vertices: Vec<ExportedVertex> = Vec::with_capacity(mesh.vertices.len());
    let mut corner_to_output = vec![0u32; mesh.loops.len()];
    let mut vertex_groups: Vec<VertexGroup> = group_bones
        .iter()
        .map(|&bone| VertexGroup {
            bone,
            vertices: Vec::new(),
        })
        .collect();
    let mut stats = SplitStats {
        source_vertices: mesh.vertices.len(),
        ..Default::default()
    };

    for (source_index, corners) in corners_by_vertex.iter().enumerate() {
        if corners.is_empty() {
            stats.loose_vertices += 1;
            continue;
        }

        let source = &mesh.vertices[source_index];
        let vertex_weights = &weights[source_index];
        let mut groups: IndexMap<UvKey, u32> = IndexMap::new();

        for &corner in corners {
            let output_index = *groups.entry(tiers.key(corner)).or_insert_with(|| {
                let index = vertices.len() as u32;
                vertices.push(ExportedVertex {
                    position: source.position,
                    normal: source.normal,
                    uvs: tiers.uvs(corner),
                    weights: vertex_weights
                        .iter()
                        .map(|&(group, weight)| BoneWeight {
                            bone: group_bones[group],
                            weight,
                        })
                        .collect(),
                });
                for &(group, weight) in vertex_weights {
                    vertex_groups[group].vertices.push((index, weight));
                }
                index
            });
            corner_to_output[corner] = output_index;
        }

        stats.split_vertices += groups.len() - 1;
    }

    let triangles = mesh
        .polygons
        .iter()
        .map(|polygon| {
            [
                corner_to_output[polygon.loops[0]],
                corner_to_output[polygon.loops[1]],
                corner_to_output[polygon.loops[2]],
            ]
        })
        .collect();

    stats.output_vertices = vertices.len();
    if stats.loose_vertices > 0 {
        tracing::debug!(
            "Mesh '{}': dropped {} loose vertices",
            mesh.name,
            stats.loose_vertices
        );
    }
    tracing::debug!(
        "Mesh '{}': {} -> {} vertices ({} split, {} UV tiers)",
        mesh.name,
        stats.source_vertices,
        stats.output_vertices,
        stats.split_vertices,
        tiers.count()
    );

    Ok(NormalizedMesh {
        vertices,
        triangles,
        vertex_groups,
        stats,
    })
}

/// Every polygon must be a triangle whose corners exist
fn validate_polygons(mesh: &SourceMesh) -> ExportResult<()> {
    let corner_count = mesh.loops.len();
    for (polygon, source) in mesh.polygons.iter().enumerate() {
        if source.loops.len() != 3 {
            return Err(ExportError::NonTriangle {
                polygon,
                corners: source.loops.len(),
            });
        }
        if let Some(&corner) = source.loops.iter().find(|&&corner| corner >= corner_count) {
            return Err(ExportError::CornerOutOfRange {
                polygon,
                corner,
                corner_count,
            });
        }
    }
    Ok(())
}

/// Corner indices of each source vertex, in corner order
fn corners_by_vertex(mesh: &SourceMesh) -> ExportResult<Vec<Vec<usize>>> {
    let vertex_count = mesh.vertices.len();
    let mut corners = vec![Vec::new(); vertex_count];
    for (corner, source) in mesh.loops.iter().enumerate() {
        let slot = corners
            .get_mut(source.vertex)
            .ok_or(ExportError::VertexOutOfRange {
                corner,
                vertex: source.vertex,
                vertex_count,
            })?;
        slot.push(corner);
    }
    Ok(corners)
}

/// Check every weight and drop the zero ones
fn validate_weights(mesh: &SourceMesh, group_count: usize) -> ExportResult<Vec<WeightList>> {
    mesh.vertices
        .iter()
        .enumerate()
        .map(|(vertex, source)| {
            let mut list = WeightList::new();
            for entry in &source.weights {
                if entry.group >= group_count {
                    return Err(ExportError::GroupOutOfRange {
                        vertex,
                        group: entry.group,
                        group_count,
                    });
                }
                if !entry.weight.is_finite() || !(0.0..=1.0).contains(&entry.weight) {
                    return Err(ExportError::InvalidWeight {
                        vertex,
                        group: entry.group,
                        weight: entry.weight,
                    });
                }
                if entry.weight > 0.0 {
                    list.push((entry.group, entry.weight));
                }
            }
            Ok(list)
        })
        .collect()
}
