//! Skeletal animation core for GPU skinning
//!
//! Builds a bone table and per-vertex bone bindings from a [`Scene`] at load
//! time, then evaluates the node hierarchy every frame into one final matrix
//! per bone:
//!
//! ```text
//! final[bone] = global_inverse_root * global_transform(node) * bone_offset
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use skel_anim::{Scene, SkinnedModel};
//!
//! # fn load_scene() -> Scene { unimplemented!() }
//! let model = SkinnedModel::from_scene(load_scene())?;
//! let animator = model.animator()?;
//!
//! let matrices = animator.advance(1.25)?;
//! let uniforms: Vec<f32> = matrices.to_gpu_data();
//! let (bone_ids, weights) = model.vertex_bindings().to_gpu_arrays();
//! # let _ = (uniforms, bone_ids, weights);
//! # Ok::<(), skel_anim::SkelError>(())
//! ```

pub mod animation;
pub mod bones;
pub mod error;
pub mod gpu;
pub mod model;
pub mod scene;
pub mod skinning;

// Re-export common types
pub use animation::{AnimationClip, Animator, FinalBoneMatrices, Keyframe, NodeChannel, Track};
pub use bones::{BoneTable, MAX_BONE_INFLUENCES, VertexBindings, VertexBoneBinding};
pub use error::{Result, SkelError};
pub use model::{AnimationOptions, SkinnedModel};
pub use scene::{MeshBone, MeshData, Scene, SceneNode, VertexWeight};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
