//! Scene summary

use anyhow::Result;
use console::Style;
use std::path::Path;

use crate::cli::LoadArgs;
use crate::utils::load_model;

pub fn execute(path: &Path, load: &LoadArgs) -> Result<()> {
    let model = load_model(path, load.options())?;
    let scene = model.scene();
    let heading = Style::new().bold();

    println!("{}", heading.apply_to("=== Scene Information ==="));
    println!("File: {}", path.display());
    println!("Nodes: {} (depth {})", scene.root.count(), scene.root.depth());
    println!("Meshes: {}", scene.meshes.len());
    for (mesh, base) in scene.meshes.iter().zip(model.vertex_bases()) {
        println!(
            "  {}: {} vertices, {} bones, vertex base {}",
            mesh.name,
            mesh.vertex_count,
            mesh.bones.len(),
            base
        );
    }
    println!("Vertices: {}", model.vertex_bindings().len());
    println!(
        "Bones: {} (shader array {})",
        model.bone_count(),
        model.options().max_bones
    );

    println!("\n{}", heading.apply_to("=== Animation ==="));
    match scene.active_animation() {
        Some(clip) => {
            let tps = clip.effective_ticks_per_second(model.options().fallback_ticks_per_second);
            println!("Clip: {}", clip.name);
            println!("Duration: {} ticks at {} ticks/s", clip.duration, tps);
            println!(
                "Length: {:.3}s",
                clip.duration_seconds(model.options().fallback_ticks_per_second)
            );
            println!("Channels: {}", clip.channels.len());
            if scene.animations.len() > 1 {
                println!(
                    "({} more clips present, only the first is played)",
                    scene.animations.len() - 1
                );
            }
        }
        None => println!("No animation clips"),
    }

    Ok(())
}
