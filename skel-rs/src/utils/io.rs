//! Scene file loading

use anyhow::{Context, Result, bail};
use skel_anim::{AnimationOptions, Scene, SkinnedModel};
use std::fs;
use std::path::Path;

/// Scene file encodings understood by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Json,
    Yaml,
}

impl SceneFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Read and deserialize a scene file
pub fn load_scene(path: &Path) -> Result<Scene> {
    let Some(format) = SceneFormat::from_path(path) else {
        bail!(
            "Unsupported scene file '{}': expected .json, .yaml or .yml",
            path.display()
        );
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file {}", path.display()))?;

    let scene = match format {
        SceneFormat::Json => serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON scene {}", path.display()))?,
        SceneFormat::Yaml => serde_yaml_ng::from_str(&text)
            .with_context(|| format!("Failed to parse YAML scene {}", path.display()))?,
    };

    log::info!("Loaded scene from {}", path.display());
    Ok(scene)
}

/// Read a scene file and build its skinned model
pub fn load_model(path: &Path, options: AnimationOptions) -> Result<SkinnedModel> {
    let scene = load_scene(path)?;
    SkinnedModel::load(scene, options)
        .with_context(|| format!("Failed to build skinned model from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            SceneFormat::from_path(Path::new("rig.json")),
            Some(SceneFormat::Json)
        );
        assert_eq!(
            SceneFormat::from_path(Path::new("rig.YML")),
            Some(SceneFormat::Yaml)
        );
        assert_eq!(SceneFormat::from_path(Path::new("rig.fbx")), None);
        assert_eq!(SceneFormat::from_path(Path::new("rig")), None);
    }
}
