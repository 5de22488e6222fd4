//! Skeletal animation playback
//!
//! This module turns keyframed clips into per-bone matrices:
//! - Keyframe tracks with linear (translation, scale) and spherical (rotation)
//!   interpolation
//! - Clips grouping one channel per animated node
//! - Depth-first hierarchy evaluation into final bone matrices
//! - A time driver that converts wall-clock seconds into looped ticks
//!
//! # Example
//!
//! ```rust,ignore
//! use skel_anim::SkinnedModel;
//!
//! let model = SkinnedModel::from_scene(scene)?;
//! let animator = model.animator()?;
//!
//! // Every frame
//! let matrices = animator.advance(elapsed_seconds)?;
//! upload_bone_uniforms(&matrices.to_gpu_data());
//! ```

mod animator;
mod clip;
mod hierarchy;
mod interpolation;
mod types;

pub use animator::{Animator, wrap_time};
pub use clip::{AnimationClip, DEFAULT_TICKS_PER_SECOND, NodeChannel};
pub use hierarchy::{ChannelMap, FinalBoneMatrices, HierarchyWalker};
pub use interpolation::{find_key_index, sample_track};
pub use types::{Interpolate, Keyframe, Track, TrackKind, normalize_or_identity};
