//! Hierarchy walk from node-local transforms to final bone matrices
//!
//! For every node the walker picks a local transform (sampled from the node's
//! channel when one is bound, the static bind transform otherwise), composes
//! it with the parent's global transform and, when the node is a bone, stores
//!
//! ```text
//! final = global_inverse_root * global * bone_offset
//! ```
//!
//! at the bone's index.

use super::clip::NodeChannel;
use crate::bones::BoneTable;
use crate::error::{Result, SkelError};
use crate::scene::SceneNode;
use custom_debug::Debug;
use glam::Mat4;
use skel_utils::debug;
use std::collections::HashMap;

/// Channels of the active clip keyed by node name
pub type ChannelMap<'a> = HashMap<&'a str, &'a NodeChannel>;

/// One final matrix per bone index, rebuilt from scratch every frame
#[derive(Debug, Clone, PartialEq)]
pub struct FinalBoneMatrices {
    #[debug(with = debug::trimmed_collection_fmt)]
    matrices: Vec<Mat4>,
}

impl FinalBoneMatrices {
    /// `count` identity matrices
    pub fn identity(count: usize) -> Self {
        Self {
            matrices: vec![Mat4::IDENTITY; count],
        }
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn get(&self, bone: u32) -> Option<&Mat4> {
        self.matrices.get(bone as usize)
    }

    pub fn as_slice(&self) -> &[Mat4] {
        &self.matrices
    }

    pub fn into_vec(self) -> Vec<Mat4> {
        self.matrices
    }

    /// Element-wise comparison within `max_abs_diff`
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.len() == other.len()
            && self
                .matrices
                .iter()
                .zip(&other.matrices)
                .all(|(a, b)| a.abs_diff_eq(*b, max_abs_diff))
    }
}

impl From<Vec<Mat4>> for FinalBoneMatrices {
    fn from(matrices: Vec<Mat4>) -> Self {
        Self { matrices }
    }
}

/// Recursive depth-first evaluator of the node hierarchy
pub struct HierarchyWalker<'a> {
    bones: &'a BoneTable,
    channels: Option<&'a ChannelMap<'a>>,
    global_inverse: Mat4,
}

impl<'a> HierarchyWalker<'a> {
    /// Walker for the bind pose (no channels bound)
    pub fn new(bones: &'a BoneTable, global_inverse: Mat4) -> Self {
        Self {
            bones,
            channels: None,
            global_inverse,
        }
    }

    /// Bind animation channels; nodes without a channel keep their static transform
    pub fn with_channels(mut self, channels: &'a ChannelMap<'a>) -> Self {
        self.channels = Some(channels);
        self
    }

    /// Evaluate the hierarchy under `root` at `animation_time` (ticks)
    ///
    /// Fails without partial output if any channel cannot be sampled.
    pub fn compute_final_transforms(
        &self,
        root: &SceneNode,
        animation_time: f64,
    ) -> Result<FinalBoneMatrices> {
        let mut out = FinalBoneMatrices::identity(self.bones.len());
        self.visit(root, animation_time, Mat4::IDENTITY, &mut out)?;
        Ok(out)
    }

    fn visit(
        &self,
        node: &SceneNode,
        animation_time: f64,
        parent_transform: Mat4,
        out: &mut FinalBoneMatrices,
    ) -> Result<()> {
        let local_transform = match self.channel_for(&node.name) {
            Some(channel) => {
                channel
                    .local_transform(animation_time)
                    .map_err(|source| SkelError::ChannelSample {
                        node: node.name.clone(),
                        source: Box::new(source),
                    })?
            }
            None => node.transform,
        };

        let global_transform = parent_transform * local_transform;

        if let Some(index) = self.bones.index_of(&node.name)
            && let Some(bone) = self.bones.get(index)
        {
            out.matrices[index as usize] = self.global_inverse * global_transform * bone.offset;
        }

        for child in &node.children {
            self.visit(child, animation_time, global_transform, out)?;
        }

        Ok(())
    }

    fn channel_for(&self, node_name: &str) -> Option<&'a NodeChannel> {
        self.channels?.get(node_name).copied()
    }
}
