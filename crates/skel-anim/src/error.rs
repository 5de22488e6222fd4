use crate::animation::TrackKind;
use thiserror::Error;

/// Error types for bone table construction, keyframe sampling and
/// hierarchy evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkelError {
    /// A vertex already holds the maximum number of non-zero bone influences
    #[error(
        "vertex {vertex} already has {capacity} bone influences, cannot add bone {bone}"
    )]
    InfluenceCapacityExceeded {
        vertex: usize,
        bone: u32,
        capacity: usize,
    },

    /// A bone weight references a vertex outside the shared binding array
    #[error("vertex {vertex} is out of range ({vertex_count} vertices)")]
    VertexOutOfRange { vertex: usize, vertex_count: usize },

    /// A bone weight is negative or not a finite number
    #[error("invalid weight {weight} for bone '{bone}'")]
    InvalidWeight { bone: String, weight: f32 },

    /// A node references a mesh that does not exist in the scene
    #[error("mesh index {index} is out of range ({mesh_count} meshes)")]
    MeshIndexOutOfRange { index: usize, mesh_count: usize },

    /// More bones than the skinning shader can address
    #[error("model has {count} bones, limit is {max}")]
    TooManyBones { count: usize, max: usize },

    /// A registered bone has no node of the same name in the hierarchy
    #[error("bone '{0}' has no matching node in the scene hierarchy")]
    BoneWithoutNode(String),

    /// The root bind transform has no inverse
    #[error("root node '{0}' has a singular transform")]
    SingularRootTransform(String),

    /// The scene carries no animation clip
    #[error("scene has no animation clip")]
    NoAnimation,

    /// Clip duration is zero, negative or not finite
    #[error("clip '{clip}' has invalid duration {duration}")]
    InvalidDuration { clip: String, duration: f64 },

    /// A clip's tick rate is negative or not finite, or resolves to zero
    #[error("clip '{clip}' has invalid tick rate {ticks_per_second}")]
    InvalidTickRate { clip: String, ticks_per_second: f64 },

    /// The configured fallback tick rate is not a positive finite number
    #[error("fallback tick rate {0} must be positive and finite")]
    InvalidFallbackTickRate(f64),

    /// Mesh vertex counts add up to more than can be addressed
    #[error("mesh '{mesh}' pushes the model past the addressable vertex count")]
    VertexCountOverflow { mesh: String },

    /// The model-wide binding array could not be allocated
    #[error("cannot allocate bindings for {vertex_count} vertices")]
    VertexAllocation { vertex_count: usize },

    /// A track has no keyframes at all
    #[error("track has no keyframes")]
    EmptyTrack,

    /// A channel track has no keyframes (found during validation)
    #[error("{track} track of '{node}' has no keyframes")]
    MissingKeyframes { node: String, track: TrackKind },

    /// Keyframe times are not strictly increasing
    #[error("{track} track of '{node}': keyframe {index} at {time} does not follow {previous}")]
    UnsortedKeyframes {
        node: String,
        track: TrackKind,
        index: usize,
        time: f64,
        previous: f64,
    },

    /// A keyframe time or value is NaN or infinite
    #[error("{track} track of '{node}': keyframe {index} is not finite")]
    NonFiniteKeyframe {
        node: String,
        track: TrackKind,
        index: usize,
    },

    /// A multi-key track does not span the whole clip
    #[error("{track} track of '{node}' covers [{first}, {last}] but the clip runs [0, {duration}]")]
    TrackCoverage {
        node: String,
        track: TrackKind,
        first: f64,
        last: f64,
        duration: f64,
    },

    /// Sample time lies at or past the final keyframe of a multi-key track
    #[error("no keyframe pair brackets time {time} (last keyframe at {last})")]
    NoBracketingKeyframe { time: f64, last: f64 },

    /// Interpolation factor fell outside [0, 1]
    #[error("interpolation factor {factor} out of range at time {time}")]
    FactorOutOfRange { time: f64, factor: f64 },

    /// Sampling the channel of a node failed
    #[error("channel of node '{node}': {source}")]
    ChannelSample {
        node: String,
        #[source]
        source: Box<SkelError>,
    },

    /// Wall-clock time handed to the animator is NaN or infinite
    #[error("invalid playback time {0}")]
    InvalidTime(f64),

    /// A vertex binding references a bone outside the matrix palette
    #[error("bone index {bone} is out of range ({bone_count} bones)")]
    BoneIndexOutOfRange { bone: u32, bone_count: usize },

    /// Vertex data and bindings disagree on the vertex count
    #[error("{positions} positions but {bindings} vertex bindings")]
    VertexCountMismatch { positions: usize, bindings: usize },
}

/// Result type using SkelError
pub type Result<T> = std::result::Result<T, SkelError>;
