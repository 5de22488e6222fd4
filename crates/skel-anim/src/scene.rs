//! In-memory scene description consumed by the animation core
//!
//! A [`Scene`] is produced by an external model loader (or deserialized from
//! JSON/YAML with the `serde-support` feature) and is read-only from the core's
//! point of view. It carries:
//! - the node hierarchy with local bind transforms,
//! - meshes with their bone bind data (offset matrix and vertex weights),
//! - animation clips with per-node channels.
//!
//! All matrices are column-major [`glam::Mat4`]. Use [`mat4_from_row_major`]
//! when the loader hands out row-major data.

use crate::animation::AnimationClip;
use crate::error::{Result, SkelError};
use custom_debug::Debug;
use glam::Mat4;
use skel_utils::debug;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// One node of the scene hierarchy
///
/// Children are owned, so the hierarchy is a tree by construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct SceneNode {
    pub name: String,
    /// Local bind transform relative to the parent
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub transform: Mat4,
    /// Indices into [`Scene::meshes`] drawn at this node
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub meshes: Vec<usize>,
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            name: name.into(),
            transform,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add a child node
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Attach a mesh by index
    pub fn with_mesh(mut self, mesh_index: usize) -> Self {
        self.meshes.push(mesh_index);
        self
    }

    /// Depth-first, pre-order iterator over this node and its descendants
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }

    /// Find the first node with the given name
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        self.iter().find(|node| node.name == name)
    }

    /// Number of nodes in this subtree
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Longest root-to-leaf path, counting this node as depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }
}

/// Pre-order traversal over a node subtree
pub struct NodeIter<'a> {
    stack: Vec<&'a SceneNode>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Weight of one bone on one mesh-local vertex
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct VertexWeight {
    pub vertex_id: u32,
    pub weight: f32,
}

impl VertexWeight {
    pub const fn new(vertex_id: u32, weight: f32) -> Self {
        Self { vertex_id, weight }
    }
}

/// Bind data for one bone of one mesh
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct MeshBone {
    pub name: String,
    /// Mesh space to bone space in the bind pose
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub offset: Mat4,
    #[debug(with = debug::trimmed_collection_fmt)]
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub weights: Vec<VertexWeight>,
}

impl MeshBone {
    pub fn new(name: impl Into<String>, offset: Mat4, weights: Vec<VertexWeight>) -> Self {
        Self {
            name: name.into(),
            offset,
            weights,
        }
    }
}

/// Skinning-relevant part of a mesh
///
/// Geometry itself stays with the mesh-import collaborator; only the vertex
/// count is needed to place this mesh inside the model-wide binding array.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct MeshData {
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub name: String,
    pub vertex_count: usize,
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub bones: Vec<MeshBone>,
}

impl MeshData {
    pub fn new(name: impl Into<String>, vertex_count: usize, bones: Vec<MeshBone>) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            bones,
        }
    }
}

/// Complete scene: hierarchy, skinned meshes and animation clips
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct Scene {
    pub root: SceneNode,
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub meshes: Vec<MeshData>,
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub animations: Vec<AnimationClip>,
}

impl Scene {
    pub fn new(root: SceneNode) -> Self {
        Self {
            root,
            meshes: Vec::new(),
            animations: Vec::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: MeshData) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn with_animation(mut self, clip: AnimationClip) -> Self {
        self.animations.push(clip);
        self
    }

    /// Sum of all mesh vertex counts
    pub fn total_vertices(&self) -> Result<usize> {
        self.meshes.iter().try_fold(0usize, |total, mesh| {
            total
                .checked_add(mesh.vertex_count)
                .ok_or_else(|| SkelError::VertexCountOverflow {
                    mesh: mesh.name.clone(),
                })
        })
    }

    /// Running vertex offset of each mesh inside the model-wide vertex array
    pub fn vertex_bases(&self) -> Result<Vec<usize>> {
        let mut bases = Vec::with_capacity(self.meshes.len());
        let mut total = 0usize;
        for mesh in &self.meshes {
            bases.push(total);
            total = total
                .checked_add(mesh.vertex_count)
                .ok_or_else(|| SkelError::VertexCountOverflow {
                    mesh: mesh.name.clone(),
                })?;
        }
        Ok(bases)
    }

    /// The clip that drives playback (the first one)
    pub fn active_animation(&self) -> Option<&AnimationClip> {
        self.animations.first()
    }
}

/// Build a column-major matrix from 16 row-major values
pub fn mat4_from_row_major(rows: &[f32; 16]) -> Mat4 {
    Mat4::from_cols_array(rows).transpose()
}
