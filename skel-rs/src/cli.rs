//! Root CLI structure for skel-rs

use clap::{Args, Parser, Subcommand, ValueEnum};
use skel_anim::AnimationOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skel-rs")]
#[command(about = "Command-line tools for skeletal animation scenes", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display a summary of a scene file
    Info {
        /// Path to the scene file (.json, .yaml or .yml)
        scene: PathBuf,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Display the node hierarchy as a tree
    Tree {
        /// Path to the scene file
        scene: PathBuf,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the final bone matrices at one instant
    Sample {
        /// Path to the scene file
        scene: PathBuf,

        /// Wall-clock time in seconds
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        time: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Load and validate a scene file
    Validate {
        /// Path to the scene file
        scene: PathBuf,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options applied when building the skinned model
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Tick rate for clips that declare none
    #[arg(long, default_value = "25")]
    pub fallback_tps: f64,

    /// Size of the shader's bone matrix array
    #[arg(long, default_value = "100")]
    pub max_bones: usize,

    /// Skip keyframe ordering and coverage checks
    #[arg(long)]
    pub no_validate: bool,
}

impl LoadArgs {
    pub fn options(&self) -> AnimationOptions {
        AnimationOptions {
            fallback_ticks_per_second: self.fallback_tps,
            max_bones: self.max_bones,
            validate_tracks: !self.no_validate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
