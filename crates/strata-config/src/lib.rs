//! Configuration system for Strata.
//!
//! Runtime settings persist to disk as RON files: `config.ron` for the
//! application and `worlds/<name>.ron` for each world's generation settings.
//! Supports CLI overrides via clap and hot-reload detection.

mod cli;
mod config;
mod error;
mod worlds;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, PreviewConfig, WorldConfig, default_config_dir};
pub use error::ConfigError;
pub use worlds::{load_world, save_world, world_path};
