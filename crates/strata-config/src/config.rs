//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_terrain::{DisplayType, World, WorldSettings};

use crate::error::ConfigError;
use crate::worlds;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Which world to generate and how to show it.
    pub world: WorldConfig,
    /// Preview image output.
    pub preview: PreviewConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World selection and per-run overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World preset to load.
    pub world: World,
    /// What the preview surface shows.
    pub display: DisplayType,
    /// Regenerate automatically when settings change.
    pub auto_update: bool,
    /// Replaces the preset's grid dimension when set.
    pub dimension: Option<usize>,
    /// Replaces the preset's seed when set.
    pub seed: Option<i64>,
}

/// Preview image configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Write a PNG preview after generation.
    pub enabled: bool,
    /// Output path. Relative paths resolve against the working directory.
    pub path: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world: World::Earth,
            display: DisplayType::Iso,
            auto_update: true,
            dimension: None,
            seed: None,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("strata-preview.png"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Default config directory: `<platform config dir>/strata`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("strata"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let serialized = worlds::to_pretty_ron(self)?;
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;
        std::fs::write(config_dir.join("config.ron"), serialized).map_err(ConfigError::WriteError)
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Load the selected world's settings and apply the dimension and seed overrides.
    pub fn resolve_world(&self, config_dir: &Path) -> Result<WorldSettings, ConfigError> {
        let mut settings = worlds::load_world(config_dir, self.world.world)?;
        if let Some(dimension) = self.world.dimension {
            settings.height.dimension = dimension;
        }
        if let Some(seed) = self.world.seed {
            settings.height.seed = seed;
        }
        Ok(settings)
    }
}
