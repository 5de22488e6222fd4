//! Final bone matrices at one instant

use anyhow::{Context, Result};
use glam::Mat4;
use serde::Serialize;
use skel_anim::{FinalBoneMatrices, SkinnedModel};
use std::path::Path;

use crate::cli::{LoadArgs, OutputFormat};
use crate::utils::load_model;

#[derive(Debug, Serialize)]
struct SampleReport<'a> {
    clip: Option<&'a str>,
    time_seconds: f64,
    animation_time: Option<f64>,
    bones: Vec<BoneReport<'a>>,
}

#[derive(Debug, Serialize)]
struct BoneReport<'a> {
    index: usize,
    name: &'a str,
    /// Column-major
    matrix: [f32; 16],
}

pub fn execute(path: &Path, time: f64, format: OutputFormat, load: &LoadArgs) -> Result<()> {
    let model = load_model(path, load.options())?;

    let (clip, animation_time, matrices) = match model.scene().active_animation() {
        Some(_) => {
            let animator = model.animator()?;
            let ticks = animator.animation_time(time)?;
            let matrices = animator
                .advance(time)
                .with_context(|| format!("Failed to sample at {time}s"))?;
            (Some(animator.clip().name.as_str()), Some(ticks), matrices)
        }
        None => {
            log::warn!("Scene has no animation clip, printing the bind pose");
            (None, None, model.bind_pose()?)
        }
    };

    let report = SampleReport {
        clip,
        time_seconds: time,
        animation_time,
        bones: bone_reports(&model, &matrices),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_text(&report),
    }
    Ok(())
}

fn bone_reports<'a>(model: &'a SkinnedModel, matrices: &FinalBoneMatrices) -> Vec<BoneReport<'a>> {
    model
        .bone_table()
        .bones()
        .iter()
        .zip(matrices.as_slice())
        .enumerate()
        .map(|(index, (bone, matrix))| BoneReport {
            index,
            name: &bone.name,
            matrix: matrix.to_cols_array(),
        })
        .collect()
}

fn print_text(report: &SampleReport<'_>) {
    match (report.clip, report.animation_time) {
        (Some(clip), Some(ticks)) => {
            println!("Clip '{clip}' at {}s (tick {ticks:.3})", report.time_seconds);
        }
        _ => println!("Bind pose"),
    }

    for bone in &report.bones {
        println!("\n[{}] {}", bone.index, bone.name);
        let m = Mat4::from_cols_array(&bone.matrix);
        for row in 0..4 {
            let r = m.row(row);
            println!(
                "  {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                r.x, r.y, r.z, r.w
            );
        }
    }
}
