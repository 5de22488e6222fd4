//! Bone table and per-vertex bone bindings
//!
//! The [`BoneTableBuilder`] runs once per model while meshes are loaded. It
//! assigns every distinct bone name a stable index, keeps the bone's offset
//! matrix, and records up to [`MAX_BONE_INFLUENCES`] (bone, weight) pairs per
//! vertex of the model-wide vertex array. [`BoneTableBuilder::finish`] freezes
//! the result into an immutable [`BoneTable`] and [`VertexBindings`].

use crate::error::{Result, SkelError};
use crate::scene::MeshData;
use custom_debug::Debug;
use glam::Mat4;
use skel_utils::debug;
use std::collections::HashMap;

/// Maximum number of bones influencing a single vertex
pub const MAX_BONE_INFLUENCES: usize = 4;

/// A named joint of the rig
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Mesh space to bone space in the bind pose
    pub offset: Mat4,
}

/// Fixed-capacity list of bone influences for one vertex
///
/// Slots are filled in arrival order. Unused slots hold bone 0 with weight 0
/// and are ignored by skinning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VertexBoneBinding {
    bone_ids: [u32; MAX_BONE_INFLUENCES],
    weights: [f32; MAX_BONE_INFLUENCES],
}

impl VertexBoneBinding {
    /// Add an influence in the first free slot
    ///
    /// A zero weight takes no slot. When every slot already carries a
    /// non-zero weight the binding is left untouched and
    /// [`SkelError::InfluenceCapacityExceeded`] is returned with `vertex`
    /// set to 0; [`BoneTableBuilder`] fills in the real vertex index.
    pub fn add(&mut self, bone_id: u32, weight: f32) -> Result<()> {
        if weight == 0.0 {
            return Ok(());
        }

        match self.weights.iter().position(|&w| w == 0.0) {
            Some(slot) => {
                self.bone_ids[slot] = bone_id;
                self.weights[slot] = weight;
                Ok(())
            }
            None => Err(SkelError::InfluenceCapacityExceeded {
                vertex: 0,
                bone: bone_id,
                capacity: MAX_BONE_INFLUENCES,
            }),
        }
    }

    pub fn bone_ids(&self) -> &[u32; MAX_BONE_INFLUENCES] {
        &self.bone_ids
    }

    pub fn weights(&self) -> &[f32; MAX_BONE_INFLUENCES] {
        &self.weights
    }

    /// Number of slots carrying a non-zero weight
    pub fn len(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupied (bone, weight) pairs in slot order
    pub fn influences(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.bone_ids
            .iter()
            .zip(self.weights.iter())
            .filter(|&(_, &w)| w != 0.0)
            .map(|(&b, &w)| (b, w))
    }

    /// Weights scaled to sum to 1, or all zero for an unbound vertex
    pub fn normalized_weights(&self) -> [f32; MAX_BONE_INFLUENCES] {
        let total: f32 = self.weights.iter().sum();
        if total <= 0.0 {
            return [0.0; MAX_BONE_INFLUENCES];
        }
        self.weights.map(|w| w / total)
    }
}

/// Bone bindings for every vertex of a model, indexed by absolute vertex id
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexBindings {
    #[debug(with = debug::trimmed_collection_fmt)]
    bindings: Vec<VertexBoneBinding>,
}

impl VertexBindings {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            bindings: vec![VertexBoneBinding::default(); vertex_count],
        }
    }

    /// Like [`Self::new`] but reports an allocation failure instead of aborting
    pub fn try_new(vertex_count: usize) -> Result<Self> {
        let mut bindings = Vec::new();
        bindings
            .try_reserve_exact(vertex_count)
            .map_err(|_| SkelError::VertexAllocation { vertex_count })?;
        bindings.resize(vertex_count, VertexBoneBinding::default());
        Ok(Self { bindings })
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, vertex: usize) -> Option<&VertexBoneBinding> {
        self.bindings.get(vertex)
    }

    pub fn as_slice(&self) -> &[VertexBoneBinding] {
        &self.bindings
    }

    /// Add an influence to an absolute vertex
    pub fn add(&mut self, vertex: usize, bone_id: u32, weight: f32) -> Result<()> {
        let vertex_count = self.bindings.len();
        let binding = self
            .bindings
            .get_mut(vertex)
            .ok_or(SkelError::VertexOutOfRange {
                vertex,
                vertex_count,
            })?;

        binding
            .add(bone_id, weight)
            .map_err(|err| at_vertex(err, vertex))
    }
}

fn at_vertex(err: SkelError, vertex: usize) -> SkelError {
    match err {
        SkelError::InfluenceCapacityExceeded { bone, capacity, .. } => {
            SkelError::InfluenceCapacityExceeded {
                vertex,
                bone,
                capacity,
            }
        }
        other => other,
    }
}

/// Immutable bone index table for one model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoneTable {
    bones: Vec<Bone>,
    index: HashMap<String, u32>,
}

impl BoneTable {
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Index of the bone with this name
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.index.get(name).copied()
    }

    pub fn get(&self, index: u32) -> Option<&Bone> {
        self.bones.get(index as usize)
    }

    /// Bones in index order
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }
}

/// Builds a [`BoneTable`] and [`VertexBindings`] mesh by mesh
#[derive(Debug, Clone)]
pub struct BoneTableBuilder {
    table: BoneTable,
    bindings: VertexBindings,
}

impl BoneTableBuilder {
    /// Create a builder for a model with `total_vertices` vertices across all meshes
    pub fn new(total_vertices: usize) -> Self {
        Self {
            table: BoneTable::default(),
            bindings: VertexBindings::new(total_vertices),
        }
    }

    /// Like [`Self::new`] but fails cleanly when the bindings cannot be allocated
    pub fn try_new(total_vertices: usize) -> Result<Self> {
        Ok(Self {
            table: BoneTable::default(),
            bindings: VertexBindings::try_new(total_vertices)?,
        })
    }

    /// Register the bones of one mesh
    ///
    /// `vertex_base` is the mesh's offset in the model-wide vertex array.
    /// Bones seen in an earlier mesh keep their index and first offset.
    /// The mesh is registered completely or not at all: on error the builder
    /// is left as it was before the call.
    pub fn register_mesh_bones(&mut self, mesh: &MeshData, vertex_base: usize) -> Result<()> {
        let first_new_id = self.table.bones.len();
        let mut new_bones: Vec<Bone> = Vec::new();
        let mut new_index: HashMap<&str, u32> = HashMap::new();
        let mut touched: HashMap<usize, VertexBoneBinding> = HashMap::new();
        let mut influences = 0usize;

        for mesh_bone in &mesh.bones {
            let name = mesh_bone.name.as_str();
            let bone_id = match self
                .table
                .index
                .get(name)
                .or_else(|| new_index.get(name))
            {
                Some(&id) => id,
                None => {
                    let id = (first_new_id + new_bones.len()) as u32;
                    new_bones.push(Bone {
                        name: mesh_bone.name.clone(),
                        offset: mesh_bone.offset,
                    });
                    new_index.insert(name, id);
                    id
                }
            };

            for w in &mesh_bone.weights {
                if !w.weight.is_finite() || w.weight < 0.0 {
                    return Err(SkelError::InvalidWeight {
                        bone: mesh_bone.name.clone(),
                        weight: w.weight,
                    });
                }
                let vertex = vertex_base + w.vertex_id as usize;
                let current = self
                    .bindings
                    .get(vertex)
                    .copied()
                    .ok_or(SkelError::VertexOutOfRange {
                        vertex,
                        vertex_count: self.bindings.len(),
                    })?;
                touched
                    .entry(vertex)
                    .or_insert(current)
                    .add(bone_id, w.weight)
                    .map_err(|err| at_vertex(err, vertex))?;
                influences += 1;
            }
        }

        log::debug!(
            "Mesh '{}': {} bones ({} new), {} influences, vertex base {}",
            mesh.name,
            mesh.bones.len(),
            new_bones.len(),
            influences,
            vertex_base
        );

        for bone in new_bones {
            let id = self.table.bones.len() as u32;
            self.table.index.insert(bone.name.clone(), id);
            self.table.bones.push(bone);
        }
        for (vertex, binding) in touched {
            self.bindings.bindings[vertex] = binding;
        }

        Ok(())
    }

    /// Number of bones registered so far
    pub fn bone_count(&self) -> usize {
        self.table.len()
    }

    pub fn finish(self) -> (BoneTable, VertexBindings) {
        (self.table, self.bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MeshBone, VertexWeight};
    use glam::Vec3;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_binding_fills_in_order() {
        let mut binding = VertexBoneBinding::default();
        binding.add(2, 0.3).unwrap();
        binding.add(5, 0.7).unwrap();

        assert_eq!(binding.len(), 2);
        assert_eq!(binding.influences().collect::<Vec<_>>(), vec![(2, 0.3), (5, 0.7)]);

        binding.add(9, 0.1).unwrap();
        assert_eq!(binding.len(), 3);
        assert_eq!(binding.bone_ids(), &[2, 5, 9, 0]);
    }

    #[test]
    fn test_binding_capacity_exceeded() {
        let mut binding = VertexBoneBinding::default();
        for bone in 0..4 {
            binding.add(bone, 0.25).unwrap();
        }
        let before = binding;

        let err = binding.add(7, 0.1).unwrap_err();
        assert_eq!(
            err,
            SkelError::InfluenceCapacityExceeded {
                vertex: 0,
                bone: 7,
                capacity: MAX_BONE_INFLUENCES,
            }
        );
        // Nothing dropped or overwritten
        assert_eq!(binding, before);
    }

    #[test]
    fn test_zero_weight_takes_no_slot() {
        let mut binding = VertexBoneBinding::default();
        binding.add(1, 0.0).unwrap();
        assert!(binding.is_empty());

        for bone in 0..4 {
            binding.add(bone, 0.25).unwrap();
        }
        assert_eq!(binding.add(8, 0.0), Ok(()));
    }

    #[test]
    fn test_normalized_weights() {
        let mut binding = VertexBoneBinding::default();
        binding.add(0, 1.0).unwrap();
        binding.add(1, 3.0).unwrap();
        assert_eq!(binding.normalized_weights(), [0.25, 0.75, 0.0, 0.0]);

        assert_eq!(VertexBoneBinding::default().normalized_weights(), [0.0; 4]);
    }

    #[test]
    fn test_shared_bone_reuses_index() {
        let offset_a = Mat4::from_translation(Vec3::X);
        let offset_b = Mat4::from_translation(Vec3::Y);
        let body = MeshData::new(
            "body",
            3,
            vec![
                MeshBone::new("hips", offset_a, vec![VertexWeight::new(0, 1.0)]),
                MeshBone::new("spine", offset_b, vec![VertexWeight::new(1, 1.0)]),
            ],
        );
        let cape = MeshData::new(
            "cape",
            2,
            vec![MeshBone::new(
                "spine",
                Mat4::IDENTITY,
                vec![VertexWeight::new(1, 0.5)],
            )],
        );

        let mut builder = BoneTableBuilder::new(5);
        builder.register_mesh_bones(&body, 0).unwrap();
        builder.register_mesh_bones(&cape, 3).unwrap();
        let (table, bindings) = builder.finish();

        assert_eq!(table.len(), 2);
        assert_eq!(table.index_of("hips"), Some(0));
        assert_eq!(table.index_of("spine"), Some(1));
        // First offset wins
        assert_eq!(table.get(1).unwrap().offset, offset_b);

        // cape vertex 1 lands at absolute vertex 4
        assert_eq!(
            bindings.get(4).unwrap().influences().collect::<Vec<_>>(),
            vec![(1, 0.5)]
        );
        assert!(bindings.get(2).unwrap().is_empty());
    }

    #[test]
    fn test_capacity_error_reports_absolute_vertex() {
        let bones = (0..5)
            .map(|i| MeshBone::new(format!("b{i}"), Mat4::IDENTITY, vec![VertexWeight::new(1, 0.2)]))
            .collect();
        let mesh = MeshData::new("crowded", 2, bones);

        let mut builder = BoneTableBuilder::new(12);
        let err = builder.register_mesh_bones(&mesh, 10).unwrap_err();
        assert_eq!(
            err,
            SkelError::InfluenceCapacityExceeded {
                vertex: 11,
                bone: 4,
                capacity: MAX_BONE_INFLUENCES,
            }
        );
    }

    #[test]
    fn test_failed_registration_leaves_builder_untouched() {
        let base = MeshData::new(
            "base",
            2,
            vec![MeshBone::new("root", Mat4::IDENTITY, vec![VertexWeight::new(0, 1.0)])],
        );
        // Vertex 1 gets five influences; the fifth fails after four were staged
        let crowded = MeshData::new(
            "crowded",
            2,
            (0..5)
                .map(|i| MeshBone::new(format!("c{i}"), Mat4::IDENTITY, vec![VertexWeight::new(1, 0.2)]))
                .collect(),
        );

        let mut builder = BoneTableBuilder::new(2);
        builder.register_mesh_bones(&base, 0).unwrap();
        let before = builder.clone();

        assert!(matches!(
            builder.register_mesh_bones(&crowded, 0),
            Err(SkelError::InfluenceCapacityExceeded { vertex: 1, bone: 5, .. })
        ));
        assert_eq!(builder.bone_count(), 1);
        let (table, bindings) = builder.finish();
        let (table_before, bindings_before) = before.finish();
        assert_eq!(table, table_before);
        assert_eq!(bindings, bindings_before);
    }

    #[test]
    fn test_bone_repeated_within_mesh_keeps_one_index() {
        let mesh = MeshData::new(
            "twice",
            2,
            vec![
                MeshBone::new("hand", Mat4::IDENTITY, vec![VertexWeight::new(0, 1.0)]),
                MeshBone::new("hand", Mat4::IDENTITY, vec![VertexWeight::new(1, 1.0)]),
            ],
        );
        let mut builder = BoneTableBuilder::new(2);
        builder.register_mesh_bones(&mesh, 0).unwrap();
        let (table, bindings) = builder.finish();

        assert_eq!(table.len(), 1);
        assert_eq!(bindings.get(1).unwrap().influences().collect::<Vec<_>>(), vec![(0, 1.0)]);
    }

    #[test]
    fn test_try_new_reports_allocation_failure() {
        assert_eq!(
            VertexBindings::try_new(usize::MAX).unwrap_err(),
            SkelError::VertexAllocation {
                vertex_count: usize::MAX
            }
        );
        assert_eq!(VertexBindings::try_new(3).unwrap().len(), 3);
    }

    #[test]
    fn test_vertex_out_of_range() {
        let mesh = MeshData::new(
            "bad",
            1,
            vec![MeshBone::new("b", Mat4::IDENTITY, vec![VertexWeight::new(3, 1.0)])],
        );
        let mut builder = BoneTableBuilder::new(2);
        assert_eq!(
            builder.register_mesh_bones(&mesh, 0),
            Err(SkelError::VertexOutOfRange {
                vertex: 3,
                vertex_count: 2,
            })
        );
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mesh = MeshData::new(
            "bad",
            1,
            vec![MeshBone::new("b", Mat4::IDENTITY, vec![VertexWeight::new(0, -0.5)])],
        );
        let mut builder = BoneTableBuilder::new(1);
        assert!(matches!(
            builder.register_mesh_bones(&mesh, 0),
            Err(SkelError::InvalidWeight { .. })
        ));
    }
}
