//! Skeleton flattener
//!
//! Turns the host bone hierarchy into an ordered bone list with parent
//! indices and inverse bind matrices. Parents are resolved by name after all
//! bones are enumerated, so the host may list children before their parents;
//! the output order still puts every parent before its children.

use dscs_common::{ExportedBone, ROOT_PARENT};
use glam::Mat4;
use hashbrown::HashMap;

use crate::animation::RotationMode;
use crate::error::{ExportError, ExportResult};
use crate::source::{BindSpace, SourceSkeleton};

/// Determinant magnitude at or below which a bind matrix counts as singular
const SINGULAR_EPSILON: f32 = 1e-12;

/// Flattened skeleton plus the lookups the other components need
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    pub name: String,
    pub bones: Vec<ExportedBone>,
    rotation_modes: Vec<RotationMode>,
    lookup: HashMap<String, u32>,
}

impl Skeleton {
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bone_index(&self, name: &str) -> Option<u32> {
        self.lookup.get(name).copied()
    }

    /// Like [`Skeleton::bone_index`], but a miss is a structural error
    pub fn require_bone(&self, name: &str) -> ExportResult<u32> {
        self.bone_index(name)
            .ok_or_else(|| ExportError::UnknownBone(name.to_owned()))
    }

    /// Declared rotation mode of a bone (used by the curve synchronizer)
    pub fn rotation_mode(&self, index: u32) -> RotationMode {
        self.rotation_modes
            .get(index as usize)
            .copied()
            .unwrap_or_default()
    }
}

/// Flatten a host skeleton
pub fn flatten_skeleton(source: &SourceSkeleton) -> ExportResult<Skeleton> {
    let count = source.bones.len();

    // Pass 1: enumerate names
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(count);
    for (i, bone) in source.bones.iter().enumerate() {
        if positions.insert(bone.name.as_str(), i).is_some() {
            return Err(ExportError::DuplicateBone(bone.name.clone()));
        }
    }

    // Pass 2: resolve parent names
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(count);
    for bone in &source.bones {
        let parent = match bone.parent.as_deref() {
            None => None,
            Some(parent_name) => {
                let Some(&position) = positions.get(parent_name) else {
                    return Err(ExportError::UnknownParent {
                        bone: bone.name.clone(),
                        parent: parent_name.to_owned(),
                    });
                };
                Some(position)
            }
        };
        parents.push(parent);
    }

    let order = parent_first_order(source, &parents)?;

    // Source position -> output index
    let mut output_index = vec![0u32; count];
    for (index, &position) in order.iter().enumerate() {
        output_index[position] = index as u32;
    }

    let mut world_matrices: Vec<Mat4> = Vec::with_capacity(count);
    let mut bones = Vec::with_capacity(count);
    let mut rotation_modes = Vec::with_capacity(count);
    let mut lookup = HashMap::with_capacity(count);

    for &position in &order {
        let bone = &source.bones[position];
        let matrix = Mat4::from_cols_array(&bone.bind_matrix);
        let parent = parents[position].map(|p| output_index[p]);

        let world = match (source.bind_space, parent) {
            (BindSpace::Local, Some(parent)) => world_matrices[parent as usize] * matrix,
            _ => matrix,
        };

        let determinant = world.determinant();
        if !determinant.is_finite() || determinant.abs() <= SINGULAR_EPSILON {
            return Err(ExportError::SingularBindMatrix {
                bone: bone.name.clone(),
                determinant,
            });
        }

        lookup.insert(bone.name.clone(), bones.len() as u32);
        rotation_modes.push(bone.rotation_mode);
        bones.push(ExportedBone {
            name: bone.name.clone(),
            parent: parent.map_or(ROOT_PARENT, |p| p as i32),
            inverse_bind_matrix: world.inverse().to_cols_array(),
        });
        world_matrices.push(world);
    }

    tracing::debug!(
        "Flattened skeleton '{}': {} bones, {} roots",
        source.name,
        bones.len(),
        bones.iter().filter(|bone| bone.is_root()).count()
    );

    Ok(Skeleton {
        name: source.name.clone(),
        bones,
        rotation_modes,
        lookup,
    })
}

/// Source order, except that a bone whose parent has not been emitted yet
/// pulls its pending ancestors in front of it.
fn parent_first_order(
    source: &SourceSkeleton,
    parents: &[Option<usize>],
) -> ExportResult<Vec<usize>> {
    let count = parents.len();
    let mut emitted = vec![false; count];
    let mut on_chain = vec![false; count];
    let mut order = Vec::with_capacity(count);
    let mut chain = Vec::new();

    for start in 0..count {
        let mut current = Some(start);
        while let Some(position) = current {
            if emitted[position] {
                break;
            }
            if on_chain[position] {
                return Err(ExportError::CyclicHierarchy(
                    source.bones[position].name.clone(),
                ));
            }
            on_chain[position] = true;
            chain.push(position);
            current = parents[position];
        }

        while let Some(position) = chain.pop() {
            on_chain[position] = false;
            emitted[position] = true;
            order.push(position);
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceBone;
    use glam::{Mat4, Vec3};

    fn bone(name: &str, parent: Option<&str>, matrix: Mat4) -> SourceBone {
        SourceBone {
            name: name.into(),
            parent: parent.map(Into::into),
            bind_matrix: matrix.to_cols_array(),
            rotation_mode: RotationMode::Quaternion,
        }
    }

    fn skeleton(bind_space: BindSpace, bones: Vec<SourceBone>) -> SourceSkeleton {
        SourceSkeleton {
            name: "Armature".into(),
            bind_space,
            bones,
        }
    }

    fn assert_mat_eq(a: [f32; 16], b: Mat4) {
        let b = b.to_cols_array();
        for i in 0..16 {
            assert!((a[i] - b[i]).abs() < 1e-5, "element {}: {} vs {}", i, a[i], b[i]);
        }
    }

    #[test]
    fn test_parent_indices_follow_hierarchy() {
        let source = skeleton(
            BindSpace::Local,
            vec![
                bone("root", None, Mat4::IDENTITY),
                bone("spine", Some("root"), Mat4::IDENTITY),
                bone("head", Some("spine"), Mat4::IDENTITY),
                bone("tail", Some("root"), Mat4::IDENTITY),
            ],
        );
        let flat = flatten_skeleton(&source).unwrap();

        let parents: Vec<i32> = flat.bones.iter().map(|b| b.parent).collect();
        assert_eq!(parents, [-1, 0, 1, 0]);
        assert_eq!(flat.bone_index("tail"), Some(3));
    }

    #[test]
    fn test_children_listed_before_parents_are_reordered() {
        let source = skeleton(
            BindSpace::Local,
            vec![
                bone("hand", Some("arm"), Mat4::IDENTITY),
                bone("arm", Some("root"), Mat4::IDENTITY),
                bone("root", None, Mat4::IDENTITY),
                bone("leg", Some("root"), Mat4::IDENTITY),
            ],
        );
        let flat = flatten_skeleton(&source).unwrap();

        let names: Vec<&str> = flat.bones.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["root", "arm", "hand", "leg"]);
        for (index, bone) in flat.bones.iter().enumerate() {
            assert!(bone.parent < index as i32, "parent of {} not before it", bone.name);
        }
    }

    #[test]
    fn test_inverse_bind_composes_local_transforms() {
        let root = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let child = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let source = skeleton(
            BindSpace::Local,
            vec![bone("root", None, root), bone("child", Some("root"), child)],
        );
        let flat = flatten_skeleton(&source).unwrap();

        assert_mat_eq(
            flat.bones[1].inverse_bind_matrix,
            Mat4::from_translation(Vec3::new(0.0, -3.0, 0.0)),
        );
    }

    #[test]
    fn test_armature_space_matrices_are_inverted_directly() {
        let root = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let child = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let source = skeleton(
            BindSpace::Armature,
            vec![bone("root", None, root), bone("child", Some("root"), child)],
        );
        let flat = flatten_skeleton(&source).unwrap();

        assert_mat_eq(flat.bones[1].inverse_bind_matrix, child.inverse());
    }

    #[test]
    fn test_singular_bind_matrix_is_fatal() {
        let source = skeleton(
            BindSpace::Local,
            vec![
                bone("root", None, Mat4::IDENTITY),
                bone("flat", Some("root"), Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0))),
            ],
        );
        let err = flatten_skeleton(&source).unwrap_err();
        assert!(matches!(err, ExportError::SingularBindMatrix { ref bone, .. } if bone == "flat"));
    }

    #[test]
    fn test_duplicate_bone_name() {
        let source = skeleton(
            BindSpace::Local,
            vec![bone("a", None, Mat4::IDENTITY), bone("a", None, Mat4::IDENTITY)],
        );
        assert_eq!(
            flatten_skeleton(&source).unwrap_err(),
            ExportError::DuplicateBone("a".into())
        );
    }

    #[test]
    fn test_unknown_parent() {
        let source = skeleton(
            BindSpace::Local,
            vec![bone("a", Some("ghost"), Mat4::IDENTITY)],
        );
        assert_eq!(
            flatten_skeleton(&source).unwrap_err(),
            ExportError::UnknownParent {
                bone: "a".into(),
                parent: "ghost".into()
            }
        );
    }

    #[test]
    fn test_parent_cycle() {
        let source = skeleton(
            BindSpace::Local,
            vec![
                bone("a", Some("b"), Mat4::IDENTITY),
                bone("b", Some("a"), Mat4::IDENTITY),
            ],
        );
        assert!(matches!(
            flatten_skeleton(&source).unwrap_err(),
            ExportError::CyclicHierarchy(_)
        ));
    }

    #[test]
    fn test_require_bone_miss() {
        let flat = flatten_skeleton(&skeleton(BindSpace::Local, vec![])).unwrap();
        assert!(flat.is_empty());
        assert_eq!(
            flat.require_bone("arm").unwrap_err(),
            ExportError::UnknownBone("arm".into())
        );
    }

    #[test]
    fn test_rotation_mode_follows_output_order() {
        let mut hand = bone("hand", Some("root"), Mat4::IDENTITY);
        hand.rotation_mode = RotationMode::Xyz;
        let source = skeleton(
            BindSpace::Local,
            vec![hand, bone("root", None, Mat4::IDENTITY)],
        );
        let flat = flatten_skeleton(&source).unwrap();
        assert_eq!(flat.rotation_mode(0), RotationMode::Quaternion);
        assert_eq!(flat.rotation_mode(1), RotationMode::Xyz);
    }
}
