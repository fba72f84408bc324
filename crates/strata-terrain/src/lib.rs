//! Procedural 2.5D tile terrain: octave noise, island falloff, level
//! classification, stacked columns and tile painting.

mod classifier;
mod column;
mod compositor;
mod curve;
mod error;
mod falloff;
mod generator;
mod grid;
mod levels;
mod noise_field;
mod observe;
mod painter;
mod params;
mod seed;
mod world;

pub mod preview;

pub use classifier::{classify, classify_foliage, classify_grid};
pub use column::{Column, ColumnBuilder, FILL_STRIDE, pillar_fills};
pub use compositor::{CompositeFlags, composite, composite_cell};
pub use curve::{HeightCurve, RemapCurve};
pub use error::TerrainError;
pub use falloff::generate_falloff;
pub use generator::{TerrainGenerator, TerrainMap, generate_map};
pub use grid::Grid;
pub use levels::{FoliageLevel, FoliageTable, TerrainLevel, TerrainLevelTable, TileId};
pub use noise_field::{JITTER_RANGE, NoiseField, normalize_min_max};
pub use observe::{Listener, ListenerId, Observable};
pub use painter::{TileBuffer, TileLayer, TilePainter, TilePlacement, paint_map};
pub use params::{FalloffParams, GenerationParameters, MIN_SCALE, Normalization};
pub use preview::{MapRenderer, NoiseExport, PreviewImage, TexturePreview, export_noise};
pub use seed::{cell_rng, derive_cell_seed, octave_rng, perlin_seed};
pub use world::{DisplayType, UnknownDisplayType, UnknownWorld, World, WorldMap, WorldSettings};
