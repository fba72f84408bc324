//! World presets and the [`WorldMap`] orchestrator that regenerates a map
//! whenever one of its settings changes.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::curve::HeightCurve;
use crate::error::TerrainError;
use crate::generator::{TerrainGenerator, TerrainMap};
use crate::levels::{FoliageLevel, FoliageTable, TerrainLevel, TerrainLevelTable, TileId};
use crate::observe::{Listener, ListenerId, Observable};
use crate::params::{FalloffParams, GenerationParameters};

/// Built-in world themes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum World {
    /// Water, sand, grass, forest, rock and snow.
    #[default]
    Earth,
    /// Lava seas under basalt islands.
    Lava,
    /// Flat grey craters.
    Moon,
}

impl World {
    /// Every world, in menu order.
    pub const ALL: [World; 3] = [World::Earth, World::Lava, World::Moon];

    /// Lowercase name used for preset file names.
    pub fn name(self) -> &'static str {
        match self {
            World::Earth => "earth",
            World::Lava => "lava",
            World::Moon => "moon",
        }
    }

    /// The built-in settings for this world.
    pub fn preset(self) -> WorldSettings {
        match self {
            World::Earth => earth(),
            World::Lava => lava(),
            World::Moon => moon(),
        }
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown world name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown world: {0}")]
pub struct UnknownWorld(pub String);

impl FromStr for World {
    type Err = UnknownWorld;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        World::ALL
            .into_iter()
            .find(|w| w.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownWorld(s.to_string()))
    }
}

/// What the preview surface shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayType {
    /// Painted isometric columns.
    #[default]
    Iso,
    /// Flat colored noise texture.
    Noise,
}

/// Error returned when parsing an unknown display mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown display type: {0} (expected iso or noise)")]
pub struct UnknownDisplayType(pub String);

impl FromStr for DisplayType {
    type Err = UnknownDisplayType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iso" => Ok(DisplayType::Iso),
            "noise" => Ok(DisplayType::Noise),
            _ => Err(UnknownDisplayType(s.to_string())),
        }
    }
}

/// The three settings objects that define a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSettings {
    /// Noise, falloff and column parameters.
    pub height: GenerationParameters,
    /// Terrain bands.
    pub terrain: TerrainLevelTable,
    /// Foliage bands.
    #[serde(default)]
    pub foliage: FoliageTable,
}

fn level(threshold: f64, tile: u16, color: [u8; 4], delta: i32) -> TerrainLevel {
    TerrainLevel::new(threshold, TileId(tile))
        .with_color(color)
        .with_elevation_delta(delta)
}

fn earth() -> WorldSettings {
    WorldSettings {
        height: GenerationParameters {
            dimension: 100,
            height_multiplier: 3,
            scale: 30.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            use_falloff: true,
            falloff: FalloffParams::default(),
            height_curve: HeightCurve::Linear(vec![(0.0, 0.0), (0.3, 0.4), (1.0, 1.0)]),
            fill_gaps: true,
            ..Default::default()
        },
        terrain: TerrainLevelTable::from_valid(vec![
            level(20.0, 0, [30, 80, 200, 255], 0).with_animated_tile(TileId(100)),
            level(30.0, 1, [220, 200, 130, 255], 1),
            level(55.0, 2, [80, 170, 60, 255], 1),
            level(70.0, 3, [30, 120, 30, 255], 2),
            level(85.0, 4, [130, 110, 90, 255], 3),
            level(100.0, 5, [240, 240, 250, 255], 3),
        ]),
        foliage: FoliageTable::from_valid(vec![
            FoliageLevel {
                threshold: 20.0,
                tile: TileId(200),
            },
            FoliageLevel {
                threshold: 70.0,
                tile: TileId(201),
            },
        ]),
    }
}

fn lava() -> WorldSettings {
    WorldSettings {
        height: GenerationParameters {
            dimension: 80,
            seed: 7,
            height_multiplier: 2,
            scale: 20.0,
            octaves: 5,
            persistence: 0.45,
            lacunarity: 2.2,
            use_falloff: true,
            invert: false,
            jagged: true,
            jagged_percent: 0.3,
            fill_gaps: true,
            ..Default::default()
        },
        terrain: TerrainLevelTable::from_valid(vec![
            level(35.0, 10, [230, 80, 20, 255], 0).with_animated_tile(TileId(110)),
            level(50.0, 11, [60, 40, 40, 255], 1),
            level(80.0, 12, [40, 30, 30, 255], 2),
            level(100.0, 13, [20, 20, 20, 255], 2),
        ]),
        foliage: FoliageTable::default(),
    }
}

fn moon() -> WorldSettings {
    WorldSettings {
        height: GenerationParameters {
            dimension: 64,
            seed: 3,
            height_multiplier: 1,
            scale: 15.0,
            octaves: 3,
            persistence: 0.6,
            lacunarity: 2.0,
            jagged: true,
            jagged_percent: 0.15,
            ..Default::default()
        },
        terrain: TerrainLevelTable::from_valid(vec![
            level(40.0, 20, [90, 90, 95, 255], 1),
            level(75.0, 21, [140, 140, 145, 255], 1),
            level(100.0, 22, [200, 200, 205, 255], 2),
        ]),
        foliage: FoliageTable::default(),
    }
}

/// Owns observable world settings and regenerates the map when any of them change.
pub struct WorldMap {
    world: World,
    height: Observable<GenerationParameters>,
    terrain: Observable<TerrainLevelTable>,
    foliage: Observable<FoliageTable>,
    dirty: Arc<AtomicBool>,
    listener_ids: [ListenerId; 3],
    /// Regenerate on [`WorldMap::regenerate_if_dirty`] when settings change.
    pub auto_update: bool,
    map: Option<TerrainMap>,
}

impl WorldMap {
    /// Create a map for `world` from explicit settings.
    pub fn new(world: World, settings: WorldSettings) -> Self {
        let dirty = Arc::new(AtomicBool::new(true));
        let mut height = Observable::new(settings.height);
        let mut terrain = Observable::new(settings.terrain);
        let mut foliage = Observable::new(settings.foliage);

        let listener_ids = [
            height.subscribe(dirty_listener(&dirty)),
            terrain.subscribe(dirty_listener(&dirty)),
            foliage.subscribe(dirty_listener(&dirty)),
        ];

        Self {
            world,
            height,
            terrain,
            foliage,
            dirty,
            listener_ids,
            auto_update: true,
            map: None,
        }
    }

    /// Create a map from a world's built-in preset.
    pub fn from_preset(world: World) -> Self {
        Self::new(world, world.preset())
    }

    /// The current world.
    pub fn world(&self) -> World {
        self.world
    }

    /// Switch to another world's settings. Always marks the map dirty.
    pub fn load_world(&mut self, world: World, settings: WorldSettings) {
        info!(%world, "loading world settings");
        self.world = world;
        self.height.set(settings.height);
        self.terrain.set(settings.terrain);
        self.foliage.set(settings.foliage);
    }

    /// Observable height parameters.
    pub fn height_settings(&mut self) -> &mut Observable<GenerationParameters> {
        &mut self.height
    }

    /// Observable terrain table.
    pub fn terrain_settings(&mut self) -> &mut Observable<TerrainLevelTable> {
        &mut self.terrain
    }

    /// Observable foliage table.
    pub fn foliage_settings(&mut self) -> &mut Observable<FoliageTable> {
        &mut self.foliage
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> WorldSettings {
        WorldSettings {
            height: self.height.get().clone(),
            terrain: self.terrain.get().clone(),
            foliage: self.foliage.get().clone(),
        }
    }

    /// Whether a settings change has happened since the last generation.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// The most recently generated map.
    pub fn map(&self) -> Option<&TerrainMap> {
        self.map.as_ref()
    }

    /// Regenerate unconditionally.
    pub fn generate(&mut self) -> Result<&TerrainMap, TerrainError> {
        let map = TerrainGenerator::new(self.height.get(), self.terrain.get())
            .with_foliage(self.foliage.get())
            .generate()?;
        self.dirty.store(false, Ordering::SeqCst);
        info!(world = %self.world, dimension = map.dimension, "world map generated");
        Ok(self.map.insert(map))
    }

    /// Regenerate only if settings changed and `auto_update` is on.
    ///
    /// Returns `true` when a new map was generated.
    pub fn regenerate_if_dirty(&mut self) -> Result<bool, TerrainError> {
        if !self.auto_update || !self.is_dirty() {
            debug!(auto_update = self.auto_update, "skipping regeneration");
            return Ok(false);
        }
        self.generate()?;
        Ok(true)
    }

    /// Stop listening to settings changes.
    pub fn detach(&mut self) {
        let [h, t, f] = self.listener_ids;
        self.height.unsubscribe(h);
        self.terrain.unsubscribe(t);
        self.foliage.unsubscribe(f);
    }
}

fn dirty_listener<T: 'static>(dirty: &Arc<AtomicBool>) -> Listener<T> {
    let dirty = Arc::clone(dirty);
    Arc::new(move |_: &T| dirty.store(true, Ordering::SeqCst))
}
