//! Typed errors raised by the pipeline components
//!
//! Every variant identifies the offending element (polygon index, bone name,
//! data path). The assembler wraps these with the asset they came from.

/// Structural and numeric failures of one export pass
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    /// Polygon with a corner count other than 3
    #[error("polygon {polygon} has {corners} corners, only triangles can be exported")]
    NonTriangle { polygon: usize, corners: usize },

    /// Polygon refers to a corner that does not exist
    #[error("polygon {polygon} references corner {corner}, but the mesh has {corner_count} corners")]
    CornerOutOfRange {
        polygon: usize,
        corner: usize,
        corner_count: usize,
    },

    /// Corner refers to a vertex that does not exist
    #[error("corner {corner} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        corner: usize,
        vertex: usize,
        vertex_count: usize,
    },

    /// A lower UV tier is missing while a higher one is present
    #[error("UV layer '{layer}' is required because a higher UV tier is present")]
    MissingUvLayer { layer: String },

    /// UV layer data does not cover every corner
    #[error("UV layer '{layer}' has {len} entries, expected one per corner ({corner_count})")]
    UvLayerLength {
        layer: String,
        len: usize,
        corner_count: usize,
    },

    /// Vertex group name with no matching bone
    #[error("vertex group '{0}' does not name a bone in the skeleton")]
    UnknownBone(String),

    /// Vertex weight refers to an undeclared vertex group
    #[error("vertex {vertex} references vertex group {group}, but only {group_count} are declared")]
    GroupOutOfRange {
        vertex: usize,
        group: usize,
        group_count: usize,
    },

    /// Weight outside [0, 1] or not finite
    #[error("vertex {vertex} has invalid weight {weight} for group {group}")]
    InvalidWeight {
        vertex: usize,
        group: usize,
        weight: f32,
    },

    #[error("bone name '{0}' is used more than once")]
    DuplicateBone(String),

    #[error("bone '{bone}' has unknown parent '{parent}'")]
    UnknownParent { bone: String, parent: String },

    #[error("bone '{0}' is its own ancestor")]
    CyclicHierarchy(String),

    /// Bind transform cannot be inverted
    #[error("bone '{bone}' has a singular bind matrix (determinant {determinant})")]
    SingularBindMatrix { bone: String, determinant: f32 },

    /// Data path that looks like a transform channel but cannot be decomposed
    #[error("malformed channel '{data_path}' (index {array_index})")]
    MalformedChannel {
        data_path: String,
        array_index: usize,
    },

    #[error("keyframe on '{data_path}' has a non-finite time or value")]
    NonFiniteKeyframe { data_path: String },

    /// Empty, or longer than `MAX_FRAME_COUNT` frames
    #[error("frame range [{start}, {end}] is empty or too long")]
    InvalidFrameRange { start: i32, end: i32 },

    #[error("mesh has no material assigned")]
    MissingMaterial,

    #[error("material '{0}' is not in the material library")]
    UnknownMaterial(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
