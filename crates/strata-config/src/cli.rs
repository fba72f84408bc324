//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use strata_terrain::{DisplayType, World};

use crate::Config;

/// Strata command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Procedural tile terrain generator")]
pub struct CliArgs {
    /// World preset (earth, lava, moon).
    #[arg(long)]
    pub world: Option<World>,

    /// Grid side length.
    #[arg(long)]
    pub dimension: Option<usize>,

    /// Generation seed.
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Display mode (iso, noise).
    #[arg(long)]
    pub display: Option<DisplayType>,

    /// Write the preview PNG to this path.
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(world) = args.world {
            self.world.world = world;
        }
        if let Some(dimension) = args.dimension {
            self.world.dimension = Some(dimension);
        }
        if let Some(seed) = args.seed {
            self.world.seed = Some(seed);
        }
        if let Some(display) = args.display {
            self.world.display = display;
        }
        if let Some(ref path) = args.preview {
            self.preview.path = path.clone();
            self.preview.enabled = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
