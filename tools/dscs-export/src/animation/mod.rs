//! Curve synchronizer
//!
//! Turns an action's sparse per-component curves into dense per-frame
//! vectors, one [`TargetChannels`] per animated object or bone. Rotations
//! always come out as `[w, x, y, z]` quaternions.

mod channel;
mod rotation;
mod sync;

pub use channel::{ChannelPath, ChannelTarget, MalformedPath, TransformAttribute, parse_data_path};
pub use rotation::{Axis, RotationMode, euler_to_quat, quat_to_wxyz};
pub use sync::{ComponentCurve, ComponentSet, FrameRange, synchronize_keyframes};

use dscs_common::{AnimationClip, AnimationTarget, TargetChannels, TransformChannels};
use hashbrown::HashSet;
use indexmap::IndexMap;

use crate::config::{ChannelErrorPolicy, ExportConfig, FrameSampling};
use crate::error::{ExportError, ExportResult};
use crate::skeleton::Skeleton;
use crate::source::SourceAction;

const DEFAULT_QUATERNION: [f32; 4] = [1.0, 0.0, 0.0, 0.0];
const DEFAULT_EULER: [f32; 3] = [0.0; 3];
const DEFAULT_LOCATION: [f32; 3] = [0.0; 3];
const DEFAULT_SCALE: [f32; 3] = [1.0; 3];

/// Raw curves of one target, grouped by attribute
#[derive(Debug, Clone, Default)]
pub struct TargetCurves {
    pub rotation_quaternion: ComponentSet<4>,
    pub rotation_euler: ComponentSet<3>,
    pub location: ComponentSet<3>,
    pub scale: ComponentSet<3>,
}

impl TargetCurves {
    /// Store a component curve. Returns `false` if `index` is past the
    /// attribute's arity (the curve is dropped).
    pub fn insert(
        &mut self,
        attribute: TransformAttribute,
        index: usize,
        curve: ComponentCurve,
    ) -> bool {
        match attribute {
            TransformAttribute::RotationQuaternion => self.rotation_quaternion.insert(index, curve),
            TransformAttribute::RotationEuler => self.rotation_euler.insert(index, curve),
            TransformAttribute::Location => self.location.insert(index, curve),
            TransformAttribute::Scale => self.scale.insert(index, curve),
        }
    }

    /// Synchronize every attribute and fold rotations into quaternions
    pub fn synchronize(
        &self,
        mode: RotationMode,
        range: FrameRange,
        sampling: FrameSampling,
    ) -> TransformChannels {
        // Euler curves drive the rotation only in an Euler mode, and only when keyed
        let euler_order = mode
            .euler_order()
            .filter(|_| self.rotation_euler.has_keys());

        let rotation_quaternion = match euler_order {
            Some(order) => {
                if self.rotation_quaternion.has_keys() {
                    tracing::debug!("Replacing quaternion curves with Euler curves ({:?})", mode);
                }
                synchronize_keyframes(&self.rotation_euler, DEFAULT_EULER, range, sampling)
                    .into_iter()
                    .map(|(frame, euler)| (frame, euler_to_quat(euler, order)))
                    .collect()
            }
            None => {
                if self.rotation_euler.has_keys() {
                    tracing::debug!("Ignoring Euler curves of a {:?}-mode target", mode);
                }
                synchronize_keyframes(&self.rotation_quaternion, DEFAULT_QUATERNION, range, sampling)
            }
        };

        TransformChannels {
            rotation_quaternion,
            location: synchronize_keyframes(&self.location, DEFAULT_LOCATION, range, sampling),
            scale: synchronize_keyframes(&self.scale, DEFAULT_SCALE, range, sampling),
        }
    }
}

/// Frame range an action is synchronized over
pub fn action_frame_range(action: &SourceAction, config: &ExportConfig) -> ExportResult<FrameRange> {
    let [start, end] = config.frame_range.unwrap_or(action.frame_range);
    FrameRange::new(start, end)
}

/// Synchronize every transform channel of `action`.
///
/// Bone channels resolve against `skeleton`; channels for bones it does not
/// contain are skipped. Object channels animate `action.owner`.
pub fn synchronize_action(
    action: &SourceAction,
    skeleton: &Skeleton,
    config: &ExportConfig,
) -> ExportResult<AnimationClip> {
    let range = action_frame_range(action, config)?;

    let mut object: Option<TargetCurves> = None;
    let mut bones: IndexMap<u32, TargetCurves> = IndexMap::new();
    let mut missing_bones: HashSet<String> = HashSet::new();

    for channel in &action.channels {
        let (target, attribute) = match parse_data_path(&channel.data_path) {
            Ok(ChannelPath::Transform { target, attribute }) => (target, attribute),
            Ok(ChannelPath::Unsupported) => {
                tracing::debug!("Skipping unsupported channel '{}'", channel.data_path);
                continue;
            }
            Err(MalformedPath) => match config.channel_errors {
                ChannelErrorPolicy::Abort => {
                    return Err(ExportError::MalformedChannel {
                        data_path: channel.data_path.clone(),
                        array_index: channel.array_index,
                    });
                }
                ChannelErrorPolicy::Skip => {
                    tracing::warn!(
                        "Skipping malformed channel '{}' [{}] in action '{}'",
                        channel.data_path,
                        channel.array_index,
                        action.name
                    );
                    continue;
                }
            },
        };

        let curves = match target {
            ChannelTarget::Object => object.get_or_insert_with(TargetCurves::default),
            ChannelTarget::Bone(name) => match skeleton.bone_index(&name) {
                Some(index) => bones.entry(index).or_default(),
                None => {
                    if !missing_bones.contains(&name) {
                        tracing::warn!(
                            "Action '{}' animates bone '{}' which is not in skeleton '{}', skipping",
                            action.name,
                            name,
                            skeleton.name
                        );
                        missing_bones.insert(name);
                    }
                    continue;
                }
            },
        };

        let curve = ComponentCurve::from_keyframes(&channel.data_path, &channel.keyframes)?;
        if !curves.insert(attribute, channel.array_index, curve) {
            tracing::debug!(
                "Dropping component {} of '{}' ({} has {} components)",
                channel.array_index,
                channel.data_path,
                attribute.name(),
                attribute.arity()
            );
        }
    }

    let sampling = config.frame_sampling;
    let mut targets = Vec::with_capacity(bones.len() + 1);

    if let Some(curves) = object {
        targets.push(TargetChannels {
            target: AnimationTarget::Object {
                name: action.owner.clone(),
            },
            channels: curves.synchronize(action.owner_rotation_mode, range, sampling),
        });
    }

    for (index, curves) in bones {
        let name = skeleton.bones[index as usize].name.clone();
        targets.push(TargetChannels {
            target: AnimationTarget::Bone { name, index },
            channels: curves.synchronize(skeleton.rotation_mode(index), range, sampling),
        });
    }

    tracing::debug!(
        "Synchronized action '{}': {} targets over frames {}..={}",
        action.name,
        targets.len(),
        range.start,
        range.end
    );

    Ok(AnimationClip {
        name: action.name.clone(),
        frame_range: range.to_array(),
        targets,
    })
}
