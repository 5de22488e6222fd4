//! Flat buffers for uploading skinning data to a shader
//!
//! Bone matrices are packed column-major, 16 floats each, in bone index
//! order. Vertex bindings are packed as four bone ids and four weights per
//! vertex, matching a `uvec4`/`vec4` vertex attribute pair.

use crate::animation::FinalBoneMatrices;
use crate::bones::{MAX_BONE_INFLUENCES, VertexBindings};
use glam::Mat4;

/// Floats per packed bone matrix
pub const FLOATS_PER_MATRIX: usize = 16;

impl FinalBoneMatrices {
    /// Column-major floats for every bone, ready for a uniform array
    pub fn to_gpu_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.len() * FLOATS_PER_MATRIX);
        for matrix in self.as_slice() {
            data.extend_from_slice(&matrix.to_cols_array());
        }
        data
    }

    /// Like [`Self::to_gpu_data`] but padded with identity matrices up to
    /// `array_len` entries
    ///
    /// Bones beyond `array_len` are not written.
    pub fn to_gpu_data_padded(&self, array_len: usize) -> Vec<f32> {
        let identity = Mat4::IDENTITY.to_cols_array();
        let mut data = Vec::with_capacity(array_len * FLOATS_PER_MATRIX);
        for index in 0..array_len {
            match self.as_slice().get(index) {
                Some(matrix) => data.extend_from_slice(&matrix.to_cols_array()),
                None => data.extend_from_slice(&identity),
            }
        }
        data
    }
}

impl VertexBindings {
    /// Per-vertex bone ids and weights, four of each per vertex
    pub fn to_gpu_arrays(&self) -> (Vec<u32>, Vec<f32>) {
        let mut bone_ids = Vec::with_capacity(self.len() * MAX_BONE_INFLUENCES);
        let mut weights = Vec::with_capacity(self.len() * MAX_BONE_INFLUENCES);
        for binding in self.as_slice() {
            bone_ids.extend_from_slice(binding.bone_ids());
            weights.extend_from_slice(binding.weights());
        }
        (bone_ids, weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_matrix_packing_is_column_major() {
        let mut matrices = FinalBoneMatrices::identity(2).into_vec();
        matrices[1] = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let final_matrices = FinalBoneMatrices::from(matrices);

        let data = final_matrices.to_gpu_data();
        assert_eq!(data.len(), 2 * FLOATS_PER_MATRIX);
        // Translation lives in the fourth column
        assert_eq!(&data[28..31], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_padding_fills_identity() {
        let data = FinalBoneMatrices::identity(1).to_gpu_data_padded(3);
        assert_eq!(data.len(), 3 * FLOATS_PER_MATRIX);
        assert_eq!(&data[32..48], &Mat4::IDENTITY.to_cols_array());
    }

    #[test]
    fn test_vertex_arrays() {
        let mut bindings = VertexBindings::new(2);
        bindings.add(1, 3, 0.5).unwrap();
        bindings.add(1, 6, 0.5).unwrap();

        let (ids, weights) = bindings.to_gpu_arrays();
        assert_eq!(ids, vec![0, 0, 0, 0, 3, 6, 0, 0]);
        assert_eq!(weights, vec![0.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.0, 0.0]);
    }
}
