//! Rotation conventions
//!
//! Hosts key rotations either as quaternions or as Euler angles with an
//! explicit axis order. Output is always a quaternion in `[w, x, y, z]`.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Declared rotation convention of a bone or object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RotationMode {
    #[default]
    Quaternion,
    AxisAngle,
    Xyz,
    Xzy,
    Yxz,
    Yzx,
    Zxy,
    Zyx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

impl RotationMode {
    /// Axes in application order, `None` for non-Euler modes
    pub fn euler_order(self) -> Option<[Axis; 3]> {
        use Axis::{X, Y, Z};
        match self {
            RotationMode::Quaternion | RotationMode::AxisAngle => None,
            RotationMode::Xyz => Some([X, Y, Z]),
            RotationMode::Xzy => Some([X, Z, Y]),
            RotationMode::Yxz => Some([Y, X, Z]),
            RotationMode::Yzx => Some([Y, Z, X]),
            RotationMode::Zxy => Some([Z, X, Y]),
            RotationMode::Zyx => Some([Z, Y, X]),
        }
    }
}

/// Convert Euler angles (radians, indexed x/y/z) to a `[w, x, y, z]` quaternion.
///
/// The first axis of `order` is applied first, so `XYZ` gives `qZ * qY * qX`.
pub fn euler_to_quat(euler: [f32; 3], order: [Axis; 3]) -> [f32; 4] {
    let q = order.iter().fold(Quat::IDENTITY, |q, &axis| {
        Quat::from_axis_angle(axis.unit(), euler[axis.index()]) * q
    });
    quat_to_wxyz(q)
}

pub fn quat_to_wxyz(q: Quat) -> [f32; 4] {
    [q.w, q.x, q.y, q.z]
}
