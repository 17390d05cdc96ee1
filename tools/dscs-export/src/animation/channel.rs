//! Channel identifiers
//!
//! Decomposes host data paths into (target, attribute). Bone channels look
//! like `pose.bones["Arm"].rotation_euler`; object channels are a bare
//! attribute name such as `location`.

const BONE_PREFIX: &str = "pose.bones";

/// Transform attribute animated by a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformAttribute {
    RotationQuaternion,
    RotationEuler,
    Location,
    Scale,
}

impl TransformAttribute {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rotation_quaternion" => Some(Self::RotationQuaternion),
            "rotation_euler" => Some(Self::RotationEuler),
            "location" => Some(Self::Location),
            "scale" => Some(Self::Scale),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::RotationQuaternion => "rotation_quaternion",
            Self::RotationEuler => "rotation_euler",
            Self::Location => "location",
            Self::Scale => "scale",
        }
    }

    /// Number of vector components
    pub fn arity(self) -> usize {
        match self {
            Self::RotationQuaternion => 4,
            _ => 3,
        }
    }
}

/// What a channel animates
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelTarget {
    /// The object owning the action
    Object,
    Bone(String),
}

/// A decomposed data path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelPath {
    Transform {
        target: ChannelTarget,
        attribute: TransformAttribute,
    },
    /// Well-formed but not a transform channel (material or custom properties)
    Unsupported,
}

/// The data path cannot be decomposed into (target, attribute)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedPath;

/// Decompose a host data path
pub fn parse_data_path(path: &str) -> Result<ChannelPath, MalformedPath> {
    let Some(rest) = path.strip_prefix(BONE_PREFIX) else {
        return Ok(match TransformAttribute::from_name(path) {
            Some(attribute) => ChannelPath::Transform {
                target: ChannelTarget::Object,
                attribute,
            },
            None => ChannelPath::Unsupported,
        });
    };

    let rest = rest.strip_prefix("[\"").ok_or(MalformedPath)?;
    let (bone, rest) = parse_quoted_name(rest)?;
    if bone.is_empty() {
        return Err(MalformedPath);
    }

    // Custom bone property, e.g. pose.bones["Arm"]["stretch"]
    if rest.starts_with('[') {
        return Ok(ChannelPath::Unsupported);
    }

    let attribute_name = rest.strip_prefix('.').ok_or(MalformedPath)?;
    if attribute_name.is_empty() {
        return Err(MalformedPath);
    }

    Ok(match TransformAttribute::from_name(attribute_name) {
        Some(attribute) => ChannelPath::Transform {
            target: ChannelTarget::Bone(bone),
            attribute,
        },
        None => ChannelPath::Unsupported,
    })
}

/// Read a name up to its closing `"]`, resolving `\"` and `\\` escapes.
/// Returns the name and the remainder after the bracket.
fn parse_quoted_name(input: &str) -> Result<(String, &str), MalformedPath> {
    let mut name = String::new();
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next().ok_or(MalformedPath)?;
                name.push(escaped);
            }
            '"' => {
                let rest = input[i + 1..].strip_prefix(']').ok_or(MalformedPath)?;
                return Ok((name, rest));
            }
            _ => name.push(c),
        }
    }
    Err(MalformedPath)
}
