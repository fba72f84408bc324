//! Per-world preset files under `worlds/<name>.ron`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use strata_terrain::{World, WorldSettings};

use crate::error::ConfigError;

/// Path of the preset file for `world` inside `config_dir`.
pub fn world_path(config_dir: &Path, world: World) -> PathBuf {
    config_dir.join("worlds").join(format!("{}.ron", world.name()))
}

/// Load a world's settings, writing the built-in preset first if the file is missing.
pub fn load_world(config_dir: &Path, world: World) -> Result<WorldSettings, ConfigError> {
    let path = world_path(config_dir, world);
    if !path.exists() {
        let preset = world.preset();
        save_world(config_dir, world, &preset)?;
        log::info!("Wrote built-in {world} preset to {}", path.display());
        return Ok(preset);
    }

    let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadError)?;
    let settings = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
    log::info!("Loaded {world} settings from {}", path.display());
    Ok(settings)
}

/// Write a world's settings to its preset file.
pub fn save_world(
    config_dir: &Path,
    world: World,
    settings: &WorldSettings,
) -> Result<(), ConfigError> {
    let path = world_path(config_dir, world);
    let serialized = to_pretty_ron(settings)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(ConfigError::WriteError)?;
    }
    std::fs::write(&path, serialized).map_err(ConfigError::WriteError)
}

pub(crate) fn to_pretty_ron<T: Serialize>(value: &T) -> Result<String, ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .separate_tuple_members(true)
        .enumerate_arrays(false);
    ron::ser::to_string_pretty(value, pretty).map_err(ConfigError::SerializeError)
}
