//! Scene hierarchy display

use anyhow::Result;
use skel_anim::{AnimationOptions, BoneTable, SkinnedModel};
use std::path::Path;

use crate::utils::{TreeNode, TreeOptions, load_scene, render_tree};

pub fn execute(path: &Path, max_depth: Option<usize>, no_color: bool) -> Result<()> {
    let scene = load_scene(path)?;

    // Bone markers need the bone table; a scene that fails to load still renders
    let options = AnimationOptions {
        validate_tracks: false,
        max_bones: usize::MAX,
        ..AnimationOptions::default()
    };
    let bones = match SkinnedModel::load(scene.clone(), options) {
        Ok(model) => model.bone_table().clone(),
        Err(e) => {
            log::warn!("Could not build bone table: {e}");
            BoneTable::default()
        }
    };

    let root = TreeNode::from_scene(&scene.root, &bones, scene.active_animation());
    let options = TreeOptions {
        max_depth,
        no_color,
        show_metadata: true,
    };

    print!("{}", render_tree(&root, &options));
    Ok(())
}
