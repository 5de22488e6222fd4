//! CPU vertex skinning
//!
//! Applies final bone matrices to bind-pose positions the same way the
//! skinning shader does:
//!
//! ```text
//! skinned = sum(weight[i] * bones[bone_id[i]] * position)
//! ```
//!
//! Useful for tests, tooling and picking, where the GPU result is not
//! available.

use crate::animation::FinalBoneMatrices;
use crate::bones::{VertexBindings, VertexBoneBinding};
use crate::error::{Result, SkelError};
use glam::Vec3;

/// Options for controlling the skinning behavior
#[derive(Debug, Clone, Default)]
pub struct SkinningOptions {
    /// Scale weights to sum to 1.0 before blending
    ///
    /// Off by default so CPU output matches a shader that uses the raw
    /// weights.
    pub normalize_weights: bool,
}

/// Skin one bind-pose position
///
/// A vertex without any influence keeps its bind-pose position.
pub fn skin_vertex(
    position: Vec3,
    binding: &VertexBoneBinding,
    bones: &FinalBoneMatrices,
    options: &SkinningOptions,
) -> Result<Vec3> {
    if binding.is_empty() {
        return Ok(position);
    }

    let weights = if options.normalize_weights {
        binding.normalized_weights()
    } else {
        *binding.weights()
    };

    let mut skinned = Vec3::ZERO;
    for (&bone, &weight) in binding.bone_ids().iter().zip(weights.iter()) {
        if weight == 0.0 {
            continue;
        }
        let matrix = bones.get(bone).ok_or(SkelError::BoneIndexOutOfRange {
            bone,
            bone_count: bones.len(),
        })?;
        skinned += matrix.transform_point3(position) * weight;
    }

    Ok(skinned)
}

/// Skin every position of the model-wide vertex array
pub fn skin_positions(
    positions: &[Vec3],
    bindings: &VertexBindings,
    bones: &FinalBoneMatrices,
    options: &SkinningOptions,
) -> Result<Vec<Vec3>> {
    if positions.len() != bindings.len() {
        return Err(SkelError::VertexCountMismatch {
            positions: positions.len(),
            bindings: bindings.len(),
        });
    }

    positions
        .iter()
        .zip(bindings.as_slice())
        .map(|(&position, binding)| skin_vertex(position, binding, bones, options))
        .collect()
}
