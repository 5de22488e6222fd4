//! Scene validation

use anyhow::{Result, bail};
use console::Style;
use std::path::Path;

use crate::cli::LoadArgs;
use crate::utils::load_model;

pub fn execute(path: &Path, load: &LoadArgs) -> Result<()> {
    println!("Validating scene: {}", path.display());

    let model = match load_model(path, load.options()) {
        Ok(model) => model,
        Err(e) => {
            println!("{} {e:#}", Style::new().red().apply_to("✗ Validation failed:"));
            bail!("scene {} is invalid", path.display());
        }
    };

    // Sampling the first frame catches anything load-time checks let through
    if model.scene().active_animation().is_some() {
        let animator = model.animator()?;
        if let Err(e) = animator.advance(0.0) {
            println!("{} {e}", Style::new().red().apply_to("✗ Validation failed:"));
            bail!("scene {} cannot be sampled", path.display());
        }
    }

    println!(
        "{} {} bones, {} vertices",
        Style::new().green().apply_to("✓ Scene is valid:"),
        model.bone_count(),
        model.vertex_bindings().len()
    );
    Ok(())
}
