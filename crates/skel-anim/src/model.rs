//! Load-time assembly of a skinned model
//!
//! [`SkinnedModel::load`] turns a [`Scene`] into the immutable state every
//! frame reads: the bone table, the model-wide vertex bindings, per-mesh vertex
//! bases and the global inverse root transform.

use crate::animation::{
    Animator, DEFAULT_TICKS_PER_SECOND, FinalBoneMatrices, HierarchyWalker,
};
use crate::bones::{BoneTable, BoneTableBuilder, VertexBindings};
use crate::error::{Result, SkelError};
use crate::scene::Scene;
use glam::Mat4;
use std::collections::HashSet;

/// Options controlling model loading and playback
#[derive(Debug, Clone)]
pub struct AnimationOptions {
    /// Tick rate used when a clip declares zero ticks per second
    pub fallback_ticks_per_second: f64,
    /// Size of the skinning shader's bone matrix array
    pub max_bones: usize,
    /// Reject clips whose keyframes are unordered or do not span the clip
    pub validate_tracks: bool,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            fallback_ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            max_bones: 100,
            validate_tracks: true,
        }
    }
}

/// A scene with its bone table and vertex bindings built
#[derive(Debug, Clone)]
pub struct SkinnedModel {
    scene: Scene,
    bones: BoneTable,
    bindings: VertexBindings,
    vertex_bases: Vec<usize>,
    global_inverse: Mat4,
    options: AnimationOptions,
}

impl SkinnedModel {
    /// Build a model with default options
    pub fn from_scene(scene: Scene) -> Result<Self> {
        Self::load(scene, AnimationOptions::default())
    }

    /// Build the bone table and vertex bindings for `scene`
    ///
    /// Meshes are registered once each, in mesh index order, so bone indices
    /// follow the order in which bones first appear across meshes.
    pub fn load(scene: Scene, options: AnimationOptions) -> Result<Self> {
        let fallback = options.fallback_ticks_per_second;
        if !fallback.is_finite() || fallback <= 0.0 {
            return Err(SkelError::InvalidFallbackTickRate(fallback));
        }

        let mesh_count = scene.meshes.len();
        if let Some(&index) = scene
            .root
            .iter()
            .flat_map(|node| node.meshes.iter())
            .find(|&&index| index >= mesh_count)
        {
            return Err(SkelError::MeshIndexOutOfRange { index, mesh_count });
        }

        let vertex_bases = scene.vertex_bases()?;
        let total_vertices = scene.total_vertices()?;

        let mut builder = BoneTableBuilder::try_new(total_vertices)?;
        for (mesh, &base) in scene.meshes.iter().zip(&vertex_bases) {
            builder.register_mesh_bones(mesh, base)?;
        }
        let (bones, bindings) = builder.finish();

        if bones.len() > options.max_bones {
            return Err(SkelError::TooManyBones {
                count: bones.len(),
                max: options.max_bones,
            });
        }

        let node_names: HashSet<&str> = scene.root.iter().map(|n| n.name.as_str()).collect();
        if let Some(orphan) = bones
            .bones()
            .iter()
            .find(|bone| !node_names.contains(bone.name.as_str()))
        {
            return Err(SkelError::BoneWithoutNode(orphan.name.clone()));
        }

        if options.validate_tracks {
            for clip in &scene.animations {
                clip.validate()?;
            }
        }

        let root_transform = scene.root.transform;
        let determinant = root_transform.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(SkelError::SingularRootTransform(scene.root.name.clone()));
        }
        let global_inverse = root_transform.inverse();

        log::debug!(
            "Loaded model: {} meshes, {} vertices, {} bones, {} clips",
            mesh_count,
            total_vertices,
            bones.len(),
            scene.animations.len()
        );

        Ok(Self {
            scene,
            bones,
            bindings,
            vertex_bases,
            global_inverse,
            options,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn bone_table(&self) -> &BoneTable {
        &self.bones
    }

    pub fn vertex_bindings(&self) -> &VertexBindings {
        &self.bindings
    }

    /// Offset of each mesh in the model-wide vertex array
    pub fn vertex_bases(&self) -> &[usize] {
        &self.vertex_bases
    }

    /// Inverse of the root node's bind transform
    pub fn global_inverse(&self) -> Mat4 {
        self.global_inverse
    }

    pub fn options(&self) -> &AnimationOptions {
        &self.options
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Final matrices with every node at its static bind transform
    pub fn bind_pose(&self) -> Result<FinalBoneMatrices> {
        HierarchyWalker::new(&self.bones, self.global_inverse)
            .compute_final_transforms(&self.scene.root, 0.0)
    }

    /// Animator playing the first clip
    pub fn animator(&self) -> Result<Animator<'_>> {
        Animator::new(self)
    }
}
