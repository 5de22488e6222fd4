use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Mat4, Quat, Vec3};
use skel_anim::skinning::{SkinningOptions, skin_positions};
use skel_anim::{
    AnimationClip, Keyframe, MeshBone, MeshData, NodeChannel, Scene, SceneNode, SkinnedModel,
    Track, VertexWeight,
};
use std::hint::black_box;

const CHAIN_LENGTH: usize = 64;
const VERTICES_PER_BONE: u32 = 32;

/// A single chain of bones, each animated and each skinning its own vertices
fn create_chain_model() -> SkinnedModel {
    let mut node = SceneNode::new(format!("bone{}", CHAIN_LENGTH - 1), Mat4::IDENTITY);
    for i in (0..CHAIN_LENGTH - 1).rev() {
        node = SceneNode::new(format!("bone{i}"), Mat4::from_translation(Vec3::Y)).with_child(node);
    }
    let root = SceneNode::new("root", Mat4::IDENTITY)
        .with_child(node)
        .with_child(SceneNode::new("body", Mat4::IDENTITY).with_mesh(0));

    let bones = (0..CHAIN_LENGTH)
        .map(|i| {
            let first = i as u32 * VERTICES_PER_BONE;
            let weights = (first..first + VERTICES_PER_BONE)
                .map(|v| VertexWeight::new(v, 1.0))
                .collect();
            MeshBone::new(format!("bone{i}"), Mat4::IDENTITY, weights)
        })
        .collect();
    let mesh = MeshData::new("body", CHAIN_LENGTH * VERTICES_PER_BONE as usize, bones);

    let mut clip = AnimationClip::new("sway", 30.0, 30.0);
    for i in 0..CHAIN_LENGTH {
        clip = clip.with_channel(NodeChannel::new(
            format!("bone{i}"),
            Track::constant(Vec3::Y),
            Track::new(vec![
                Keyframe::new(0.0, Quat::IDENTITY),
                Keyframe::new(15.0, Quat::from_rotation_z(0.1)),
                Keyframe::new(30.0, Quat::IDENTITY),
            ]),
            Track::constant(Vec3::ONE),
        ));
    }

    SkinnedModel::from_scene(Scene::new(root).with_mesh(mesh).with_animation(clip)).unwrap()
}

fn bench_advance(c: &mut Criterion) {
    let model = create_chain_model();
    let animator = model.animator().unwrap();

    c.bench_function("advance_64_bone_chain", |b| {
        b.iter(|| {
            let _matrices = animator.advance(black_box(0.37)).unwrap();
        })
    });
}

fn bench_skin_positions(c: &mut Criterion) {
    let model = create_chain_model();
    let pose = model.animator().unwrap().advance(0.37).unwrap();
    let positions = vec![Vec3::ONE; model.vertex_bindings().len()];
    let options = SkinningOptions::default();

    c.bench_function("skin_2048_vertices", |b| {
        b.iter(|| {
            let _skinned =
                skin_positions(black_box(&positions), model.vertex_bindings(), &pose, &options)
                    .unwrap();
        })
    });
}

criterion_group!(benches, bench_advance, bench_skin_positions);
criterion_main!(benches);
