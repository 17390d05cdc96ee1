//! Programmatic host scene dumps for integration tests.
//!
//! The hero scene contains:
//! - 3-bone skeleton (Root -> Spine -> Head), Head listed before Spine
//! - "Body": a 2x2 vertex-column strip of 4 triangles whose upper quad sits on
//!   its own UV island, so the two middle vertices split
//! - "Eyes": one unweighted triangle without UVs
//! - two actions, "Wave" and "Idle"

#![allow(dead_code)]

use dscs_export::animation::RotationMode;
use dscs_export::source::{
    BindSpace, DEFAULT_SHADER, GroupWeight, SourceAction, SourceBone, SourceChannel, SourceLoop,
    SourceMaterial, SourceMesh, SourcePolygon, SourceScene, SourceSkeleton, SourceVertex,
    TextureSlot, UvLayer,
};
use glam::{Mat4, Vec3};
use std::path::Path;

/// Source vertices of the body strip
pub const BODY_SOURCE_VERTICES: usize = 6;
/// Output vertices after the UV seam splits the two middle vertices
pub const BODY_OUTPUT_VERTICES: usize = 8;
/// Frame range of the "Wave" action
pub const WAVE_RANGE: [i32; 2] = [0, 10];
/// Offset of the upper quad's UV island
const ISLAND_OFFSET: f32 = 0.1;

pub fn hero_scene() -> SourceScene {
    SourceScene {
        name: "hero".into(),
        skeleton: hero_skeleton(),
        meshes: vec![body_mesh(), eyes_mesh()],
        materials: vec![
            material("unused", &[("ColorSampler", "unused.png")]),
            material(
                "skin",
                &[("ColorSampler", "hero_skin.png"), ("ToonSampler", "toon_ramp.png")],
            ),
            material(
                "eyes",
                &[("ColorSampler", "eye.png"), ("ToonSampler", "toon_ramp.png")],
            ),
        ],
        actions: vec![wave_action(), idle_action()],
    }
}

/// Serialize `scene` as a host dump at `path`
pub fn write_scene(scene: &SourceScene, path: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(scene)?;
    std::fs::write(path, json)
}

pub fn hero_skeleton() -> SourceSkeleton {
    let up = Mat4::from_translation(Vec3::Y);
    SourceSkeleton {
        name: "Armature".into(),
        bind_space: BindSpace::Local,
        bones: vec![
            bone("root", None, Mat4::IDENTITY, RotationMode::Quaternion),
            bone("head", Some("spine"), up, RotationMode::Zyx),
            bone("spine", Some("root"), up, RotationMode::Xyz),
        ],
    }
}

fn bone(name: &str, parent: Option<&str>, matrix: Mat4, rotation_mode: RotationMode) -> SourceBone {
    SourceBone {
        name: name.into(),
        parent: parent.map(Into::into),
        bind_matrix: matrix.to_cols_array(),
        rotation_mode,
    }
}

fn material(name: &str, slots: &[(&str, &str)]) -> SourceMaterial {
    SourceMaterial {
        name: name.into(),
        shader: DEFAULT_SHADER.into(),
        uniforms: Default::default(),
        textures: slots
            .iter()
            .map(|&(slot, image)| TextureSlot {
                slot: slot.into(),
                image: image.into(),
                extra: [0, 0],
            })
            .collect(),
    }
}

/// Vertex `row * 2 + col` sits at (col, row). Rows are weighted to
/// root, root/spine and spine/head respectively.
pub fn body_mesh() -> SourceMesh {
    let row_weights: [&[(usize, f32)]; 3] = [
        &[(0, 1.0)],
        &[(0, 0.5), (1, 0.5)],
        &[(1, 0.3), (2, 0.7)],
    ];

    let mut vertices = Vec::with_capacity(BODY_SOURCE_VERTICES);
    for (row, weights) in row_weights.iter().enumerate() {
        for col in 0..2 {
            vertices.push(SourceVertex {
                position: [col as f32, row as f32, 0.0],
                normal: [0.0, 0.0, 1.0],
                weights: weights
                    .iter()
                    .map(|&(group, weight)| GroupWeight { group, weight })
                    .collect(),
            });
        }
    }

    // Each quad (a, b, c, d) becomes (a, b, c) + (a, c, d)
    let quads = [[0, 1, 3, 2], [2, 3, 5, 4]];
    let mut loops = Vec::new();
    let mut uvs = Vec::new();
    let mut polygons = Vec::new();
    for (quad_index, quad) in quads.iter().enumerate() {
        let island = quad_index as f32 * ISLAND_OFFSET;
        for triangle in [[quad[0], quad[1], quad[2]], [quad[0], quad[2], quad[3]]] {
            let first = loops.len();
            for vertex in triangle {
                let (row, col) = (vertex / 2, vertex % 2);
                loops.push(SourceLoop { vertex });
                uvs.push([col as f32, row as f32 * 0.5 + island]);
            }
            polygons.push(SourcePolygon {
                loops: (first..first + 3).collect(),
            });
        }
    }

    let lightmap = vec![[0.5, 0.5]; loops.len()];
    SourceMesh {
        name: "Body".into(),
        material: Some("skin".into()),
        vertex_groups: vec!["root".into(), "spine".into(), "head".into()],
        vertices,
        loops,
        uv_layers: vec![
            UvLayer {
                name: "UV2Map".into(),
                uvs: lightmap,
            },
            UvLayer {
                name: "UVMap".into(),
                uvs,
            },
        ],
        polygons,
    }
}

pub fn eyes_mesh() -> SourceMesh {
    SourceMesh {
        name: "Eyes".into(),
        material: Some("eyes".into()),
        vertices: (0..3)
            .map(|i| SourceVertex {
                position: [i as f32, 3.0, 0.1],
                normal: [0.0, 0.0, 1.0],
                weights: Vec::new(),
            })
            .collect(),
        loops: (0..3).map(|vertex| SourceLoop { vertex }).collect(),
        polygons: vec![SourcePolygon {
            loops: vec![0, 1, 2],
        }],
        ..Default::default()
    }
}

pub fn channel(data_path: &str, array_index: usize, keyframes: &[[f32; 2]]) -> SourceChannel {
    SourceChannel {
        data_path: data_path.into(),
        array_index,
        keyframes: keyframes.to_vec(),
    }
}

/// Object location ramps 0 -> 10 on Y, spine bends on X (Euler), head
/// scale has a single key, plus a material channel that is not exported.
pub fn wave_action() -> SourceAction {
    SourceAction {
        name: "Wave".into(),
        owner: "Hero".into(),
        owner_rotation_mode: RotationMode::Quaternion,
        frame_range: WAVE_RANGE,
        channels: vec![
            channel("location", 1, &[[0.0, 0.0], [10.0, 10.0]]),
            channel(r#"pose.bones["spine"].rotation_euler"#, 0, &[[0.0, 0.0], [10.0, 1.0]]),
            channel(r#"pose.bones["spine"].rotation_euler"#, 2, &[[0.0, 0.5]]),
            channel(r#"pose.bones["head"].scale"#, 0, &[[3.0, 7.0]]),
            channel(r#"pose.bones["root"].rotation_quaternion"#, 0, &[[0.0, 1.0], [10.0, 1.0]]),
            channel(r#"pose.bones["root"].rotation_quaternion"#, 3, &[[0.0, 0.0], [10.0, 0.5]]),
            channel("DSCS_MaterialProperties.uv_offset", 0, &[[0.0, 0.0], [10.0, 1.0]]),
        ],
    }
}

pub fn idle_action() -> SourceAction {
    SourceAction {
        name: "Idle".into(),
        owner: "Hero".into(),
        owner_rotation_mode: RotationMode::Quaternion,
        frame_range: [0, 4],
        channels: vec![channel(r#"pose.bones["head"].location"#, 2, &[[2.0, 1.0]])],
    }
}
